use tauri::{AppHandle, Manager, WebviewWindow};
use tauri_plugin_dialog::{DialogExt, MessageDialogKind};

use crate::{
    location::{location_type, LocationType},
    AppSettingsState,
};

const HARD_RELOAD_SCRIPT: &str =
    "fetch(location.href, { cache: 'reload' }).catch(() => {}).finally(() => location.reload())";

fn eval_safe<F>(window: &WebviewWindow, script: &str, action: &str, log: F)
where
    F: Fn(&str),
{
    if let Err(error) = window.eval(script) {
        log(&format!(
            "failed to run {action} in window {}: {error}",
            window.label()
        ));
    }
}

/// The window's current URL as a string, empty when unavailable.
pub fn current_url(window: &WebviewWindow) -> String {
    window
        .url()
        .map(|url| url.to_string())
        .unwrap_or_default()
}

pub fn toggle_devtools(window: &WebviewWindow) {
    if window.is_devtools_open() {
        window.close_devtools();
    } else {
        window.open_devtools();
    }
}

pub fn go_back<F>(window: &WebviewWindow, log: F)
where
    F: Fn(&str),
{
    eval_safe(window, "history.back()", "go_back", log);
}

pub fn go_forward<F>(window: &WebviewWindow, log: F)
where
    F: Fn(&str),
{
    eval_safe(window, "history.forward()", "go_forward", log);
}

pub fn reload<F>(window: &WebviewWindow, log: F)
where
    F: Fn(&str),
{
    eval_safe(window, "location.reload()", "reload", log);
}

pub fn hard_reload<F>(window: &WebviewWindow, log: F)
where
    F: Fn(&str),
{
    eval_safe(window, HARD_RELOAD_SCRIPT, "hard_reload", log);
}

pub fn exit_pointer_lock<F>(window: &WebviewWindow, log: F)
where
    F: Fn(&str),
{
    eval_safe(
        window,
        "document.exitPointerLock && document.exitPointerLock()",
        "exit_pointer_lock",
        log,
    );
}

pub fn copy_url<F>(window: &WebviewWindow, log: F)
where
    F: Fn(&str),
{
    let url = current_url(window);
    let Ok(url_json) = serde_json::to_string(&url) else {
        return;
    };
    eval_safe(
        window,
        &format!("navigator.clipboard.writeText({url_json}).catch(() => {{}})"),
        "copy_url",
        log,
    );
}

/// Navigates back to the game root, only while already on the game page.
pub fn reload_game<F>(window: &WebviewWindow, game_url: &str, domain: &str, log: F)
where
    F: Fn(&str),
{
    if location_type(&current_url(window), domain) != LocationType::Game {
        return;
    }

    match url::Url::parse(game_url) {
        Ok(url) => {
            if let Err(error) = window.navigate(url) {
                log(&format!("failed to navigate to {game_url}: {error}"));
            }
        }
        Err(error) => log(&format!("invalid game url {game_url}: {error}")),
    }
}

/// Flips fullscreen and remembers the choice when the window shows the game.
pub fn toggle_fullscreen<F>(window: &WebviewWindow, domain: &str, log: F)
where
    F: Fn(&str),
{
    let full = match window.is_fullscreen() {
        Ok(full) => full,
        Err(error) => {
            log(&format!("failed to read fullscreen state: {error}"));
            return;
        }
    };
    if let Err(error) = window.set_fullscreen(!full) {
        log(&format!("failed to toggle fullscreen: {error}"));
        return;
    }

    if location_type(&current_url(window), domain) == LocationType::Game {
        let state = window.app_handle().state::<AppSettingsState>();
        if let Err(error) = state.update("fullScreen", serde_json::Value::Bool(!full)) {
            log(&format!("failed to persist fullscreen setting: {error}"));
        }
    }
}

/// Clears the webview's browsing data and restarts the app. On failure the
/// user is told and the app keeps running.
pub fn clear_cache_and_relaunch<F>(window: &WebviewWindow, log: F)
where
    F: Fn(&str),
{
    match window.clear_all_browsing_data() {
        Ok(()) => {
            log("browsing data cleared, relaunching");
            window.app_handle().request_restart();
        }
        Err(error) => {
            log(&format!("failed to clear cache: {error}"));
            window
                .app_handle()
                .dialog()
                .message("Failed to clear cache")
                .kind(MessageDialogKind::Error)
                .show(|_| {});
        }
    }
}

pub fn relaunch<F>(app_handle: &AppHandle, log: F)
where
    F: Fn(&str),
{
    log("relaunch requested");
    app_handle.request_restart();
}
