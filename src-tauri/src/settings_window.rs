use tauri::{AppHandle, Manager, WebviewUrl, WebviewWindowBuilder};

use crate::{
    append_desktop_log, browser_args, shortcuts, AppSettingsState, SETTINGS_PAGE,
    SETTINGS_WINDOW_HEIGHT, SETTINGS_WINDOW_LABEL, SETTINGS_WINDOW_WIDTH,
};

/// Focuses the settings window, creating it on first use.
pub fn open_settings_window(app_handle: &AppHandle) -> Result<(), String> {
    if let Some(window) = app_handle.get_webview_window(SETTINGS_WINDOW_LABEL) {
        if let Ok(true) = window.is_minimized() {
            let _ = window.unminimize();
        }
        window
            .show()
            .map_err(|error| format!("Failed to show settings window: {error}"))?;
        return window
            .set_focus()
            .map_err(|error| format!("Failed to focus settings window: {error}"));
    }

    let settings = app_handle.state::<AppSettingsState>().snapshot();
    let bindings = shortcuts::key_bindings(cfg!(target_os = "macos"), false);
    let builder = WebviewWindowBuilder::new(
        app_handle,
        SETTINGS_WINDOW_LABEL,
        WebviewUrl::App(SETTINGS_PAGE.into()),
    )
    .title("idkr settings")
    .inner_size(SETTINGS_WINDOW_WIDTH, SETTINGS_WINDOW_HEIGHT)
    .center()
    .visible(false)
    .initialization_script(&shortcuts::shortcut_listener_script(&bindings));

    let window = browser_args::apply_browser_args(builder, &settings)
        .build()
        .map_err(|error| format!("Failed to create settings window: {error}"))?;
    if let Err(error) = window.remove_menu() {
        append_desktop_log(&format!("failed to remove settings window menu: {error}"));
    }
    append_desktop_log("opened settings window");
    Ok(())
}
