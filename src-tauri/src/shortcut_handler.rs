use tauri::{Manager, WebviewWindow};

use crate::{
    append_desktop_log, game_window, settings_window, shortcuts, window_actions, AppSettingsState,
};

pub fn handle_shortcut(window: &WebviewWindow, shortcut_id: &str) {
    let Some(action) = shortcuts::action_from_shortcut_id(shortcut_id) else {
        append_desktop_log(&format!("ignored unknown shortcut id: {shortcut_id}"));
        return;
    };
    let app_handle = window.app_handle();
    let settings = app_handle.state::<AppSettingsState>().snapshot();

    match action {
        shortcuts::ShortcutAction::ToggleDevtools => window_actions::toggle_devtools(window),
        shortcuts::ShortcutAction::GoBack => window_actions::go_back(window, append_desktop_log),
        shortcuts::ShortcutAction::GoForward => {
            window_actions::go_forward(window, append_desktop_log)
        }
        shortcuts::ShortcutAction::ClearCacheAndRelaunch => {
            window_actions::clear_cache_and_relaunch(window, append_desktop_log)
        }
        shortcuts::ShortcutAction::OpenSettings => {
            if let Err(error) = settings_window::open_settings_window(app_handle) {
                append_desktop_log(&format!("failed to open settings window: {error}"));
            }
        }
        shortcuts::ShortcutAction::ExitPointerLock => {
            window_actions::exit_pointer_lock(window, append_desktop_log)
        }
        shortcuts::ShortcutAction::ReloadGame => window_actions::reload_game(
            window,
            &settings.game_url(),
            &settings.game_domain,
            append_desktop_log,
        ),
        shortcuts::ShortcutAction::Reload => window_actions::reload(window, append_desktop_log),
        shortcuts::ShortcutAction::HardReload => {
            window_actions::hard_reload(window, append_desktop_log)
        }
        shortcuts::ShortcutAction::ToggleFullscreen => {
            window_actions::toggle_fullscreen(window, &settings.game_domain, append_desktop_log)
        }
        shortcuts::ShortcutAction::CopyUrl => window_actions::copy_url(window, append_desktop_log),
        shortcuts::ShortcutAction::NewWindow => {
            game_window::spawn_game_window(app_handle, settings.game_url())
        }
        shortcuts::ShortcutAction::DuplicateWindow => {
            game_window::spawn_game_window(app_handle, window_actions::current_url(window))
        }
        shortcuts::ShortcutAction::Relaunch => {
            window_actions::relaunch(app_handle, append_desktop_log)
        }
    }
}
