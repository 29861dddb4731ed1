use std::{
    sync::atomic::{AtomicBool, Ordering},
    time::Duration,
};

use tauri::{AppHandle, Manager, WebviewUrl, WebviewWindowBuilder};

use crate::{
    append_startup_log, browser_args, game_window, updater, AppSettingsState, LaunchState,
    SPLASH_CLOSE_DELAY_MS, SPLASH_PAGE, SPLASH_WINDOW_HEIGHT, SPLASH_WINDOW_LABEL,
    SPLASH_WINDOW_WIDTH,
};

/// Makes sure the update check and first game window happen once per
/// process, however many times the splash page reloads.
#[derive(Debug, Default)]
pub(crate) struct StartupState {
    started: AtomicBool,
}

impl StartupState {
    pub(crate) fn try_begin(&self) -> bool {
        !self.started.swap(true, Ordering::SeqCst)
    }
}

pub(crate) fn open_splash_window(app_handle: &AppHandle) -> Result<(), String> {
    let settings = app_handle.state::<AppSettingsState>().snapshot();
    let builder = WebviewWindowBuilder::new(
        app_handle,
        SPLASH_WINDOW_LABEL,
        WebviewUrl::App(SPLASH_PAGE.into()),
    )
    .title("idkr")
    .inner_size(SPLASH_WINDOW_WIDTH, SPLASH_WINDOW_HEIGHT)
    .center()
    .resizable(false)
    .decorations(false)
    .visible(false);

    browser_args::apply_browser_args(builder, &settings)
        .build()
        .map(|_| ())
        .map_err(|error| format!("Failed to create splash window: {error}"))
}

/// Runs the update step, then replaces the splash with the first game window.
/// Later calls are ignored.
pub(crate) fn spawn_startup_task(app_handle: AppHandle) {
    if !app_handle.state::<StartupState>().try_begin() {
        return;
    }

    tauri::async_runtime::spawn(async move {
        let launch = *app_handle.state::<LaunchState>();
        append_startup_log(&format!(
            "startup task running: update_mode={} debug={}",
            launch.update_mode.as_str(),
            launch.debug
        ));

        let outcome = updater::run_startup_update(&app_handle, launch.update_mode).await;
        append_startup_log(&format!("update step finished: {}", outcome.summary()));

        let game_url = app_handle.state::<AppSettingsState>().snapshot().game_url();
        if let Err(error) = game_window::open_game_window(&app_handle, &game_url) {
            append_startup_log(&error);
        }

        delay(Duration::from_millis(SPLASH_CLOSE_DELAY_MS)).await;
        if let Some(splash) = app_handle.get_webview_window(SPLASH_WINDOW_LABEL) {
            if let Err(error) = splash.close() {
                append_startup_log(&format!("failed to close splash window: {error}"));
            }
        }
    });
}

async fn delay(duration: Duration) {
    let _ = tauri::async_runtime::spawn_blocking(move || std::thread::sleep(duration)).await;
}
