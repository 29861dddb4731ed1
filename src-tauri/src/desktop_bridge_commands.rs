use tauri::{AppHandle, Manager, WebviewWindow};

use crate::{
    append_desktop_log, external_url, shortcut_handler, AppSettingsState, BridgeResult, Settings,
    SETTINGS_WINDOW_LABEL,
};

/// Settings are only readable and writable from the bundled settings page.
fn ensure_settings_caller(label: &str) -> Result<(), String> {
    if label == SETTINGS_WINDOW_LABEL {
        Ok(())
    } else {
        Err(format!("settings are not available to window {label}"))
    }
}

/// Async so window creation runs off the main thread.
#[tauri::command]
pub(crate) async fn desktop_shortcut(webview_window: WebviewWindow, id: String) {
    shortcut_handler::handle_shortcut(&webview_window, &id);
}

#[tauri::command]
pub(crate) fn desktop_get_settings(
    app_handle: AppHandle,
    webview_window: WebviewWindow,
) -> Result<Settings, String> {
    ensure_settings_caller(webview_window.label()).inspect_err(|error| {
        append_desktop_log(error);
    })?;
    Ok(app_handle.state::<AppSettingsState>().snapshot())
}

/// Stores one setting. Most settings apply on the next launch; the caller
/// decides whether to offer a relaunch.
#[tauri::command]
pub(crate) fn desktop_set_setting(
    app_handle: AppHandle,
    webview_window: WebviewWindow,
    key: String,
    value: serde_json::Value,
) -> BridgeResult {
    if let Err(error) = ensure_settings_caller(webview_window.label()) {
        append_desktop_log(&format!("rejected update of setting {key}: {error}"));
        return BridgeResult::failed(error);
    }

    match app_handle
        .state::<AppSettingsState>()
        .update(&key, value)
    {
        Ok(_) => {
            append_desktop_log(&format!("setting updated: {key}"));
            BridgeResult::ok()
        }
        Err(error) => {
            append_desktop_log(&format!("failed to update setting {key}: {error}"));
            BridgeResult::failed(error)
        }
    }
}

#[tauri::command]
pub(crate) fn desktop_open_external_url(url: String) -> BridgeResult {
    let parsed = match external_url::parse_openable_url(&url) {
        Ok(parsed) => parsed,
        Err(error) => return BridgeResult::failed(error),
    };

    match external_url::open_url_with_system_browser(&parsed) {
        Ok(()) => BridgeResult::ok(),
        Err(error) => BridgeResult::failed(error),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn settings_commands_accept_only_the_settings_window() {
        assert!(ensure_settings_caller(SETTINGS_WINDOW_LABEL).is_ok());

        let error = ensure_settings_caller("game-1").expect_err("game windows are rejected");
        assert!(error.contains("game-1"));
        assert!(ensure_settings_caller("splash").is_err());
    }
}
