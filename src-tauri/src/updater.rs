use std::time::{Duration, Instant};

use serde::Serialize;
use tauri::{
    window::{ProgressBarState, ProgressBarStatus},
    AppHandle, Emitter, Manager,
};
use tauri_plugin_updater::UpdaterExt;

use crate::{append_update_log, AutoUpdateMode, SPLASH_MESSAGE_EVENT, SPLASH_WINDOW_LABEL};

/// Status line shown on the splash screen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub(crate) struct SplashMessage {
    pub(crate) message: Option<String>,
    pub(crate) detail: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum UpdateOutcome {
    Skipped,
    UpToDate,
    Available { version: String },
    Installed { version: String },
    Failed { reason: String },
}

impl UpdateOutcome {
    pub(crate) fn summary(&self) -> String {
        match self {
            Self::Skipped => "skipped".to_string(),
            Self::UpToDate => "up to date".to_string(),
            Self::Available { version } => format!("v{version} available"),
            Self::Installed { version } => format!("v{version} installed"),
            Self::Failed { reason } => format!("failed: {reason}"),
        }
    }
}

/// Download progress as `(percent, kilobytes per second)`.
pub(crate) fn download_progress(
    downloaded: u64,
    total: Option<u64>,
    elapsed: Duration,
) -> (Option<u64>, u64) {
    let percent = total
        .filter(|total| *total > 0)
        .map(|total| (downloaded.saturating_mul(100) / total).min(100));
    let millis = elapsed.as_millis().max(1) as u64;
    let kilobytes_per_second = downloaded.saturating_mul(1000) / millis / 1000;
    (percent, kilobytes_per_second)
}

pub(crate) fn progress_message(percent: Option<u64>, kilobytes_per_second: u64) -> SplashMessage {
    let message = match percent {
        Some(percent) => format!("Downloaded {percent}%"),
        None => "Downloading update".to_string(),
    };
    SplashMessage {
        message: Some(message),
        detail: Some(format!("{kilobytes_per_second}kB/s")),
    }
}

fn emit_splash(app_handle: &AppHandle, message: Option<String>, detail: Option<String>) {
    let payload = SplashMessage { message, detail };
    if let Some(text) = &payload.message {
        append_update_log(text);
    }
    if let Err(error) = app_handle.emit_to(SPLASH_WINDOW_LABEL, SPLASH_MESSAGE_EVENT, payload) {
        append_update_log(&format!("failed to emit splash message: {error}"));
    }
}

fn set_splash_progress(app_handle: &AppHandle, percent: Option<u64>) {
    let Some(window) = app_handle.get_webview_window(SPLASH_WINDOW_LABEL) else {
        return;
    };
    let state = ProgressBarState {
        status: Some(if percent.is_some() {
            ProgressBarStatus::Normal
        } else {
            ProgressBarStatus::Indeterminate
        }),
        progress: percent,
    };
    if let Err(error) = window.set_progress_bar(state) {
        append_update_log(&format!("failed to update progress bar: {error}"));
    }
}

/// Runs the startup update check according to `mode`, reporting progress to
/// the splash window. Errors are reported and never stop the game launch.
pub(crate) async fn run_startup_update(
    app_handle: &AppHandle,
    mode: AutoUpdateMode,
) -> UpdateOutcome {
    if mode == AutoUpdateMode::Skip {
        append_update_log("auto update skipped");
        return UpdateOutcome::Skipped;
    }

    let current_version = app_handle.package_info().version.to_string();
    emit_splash(app_handle, Some("Initializing the auto updater...".to_string()), None);
    let updater = match app_handle.updater() {
        Ok(updater) => updater,
        Err(error) => return fail(app_handle, format!("failed to initialize updater: {error}")),
    };

    emit_splash(app_handle, Some("Checking for update".to_string()), None);
    let check_started = Instant::now();
    let update = match updater.check().await {
        Ok(Some(update)) => update,
        Ok(None) => {
            append_update_log(&format!(
                "update check finished: has_update=false current_version={} elapsed_ms={}",
                current_version,
                check_started.elapsed().as_millis()
            ));
            emit_splash(app_handle, Some("No update available".to_string()), None);
            return UpdateOutcome::UpToDate;
        }
        Err(error) => return fail(app_handle, format!("update check failed: {error}")),
    };

    let version = update.version.to_string();
    append_update_log(&format!(
        "update check finished: has_update=true current_version={} latest_version={} elapsed_ms={}",
        current_version,
        version,
        check_started.elapsed().as_millis()
    ));
    emit_splash(
        app_handle,
        Some(format!("Update v{version} available")),
        update.date.map(|date| date.to_string()),
    );
    if mode == AutoUpdateMode::Check {
        return UpdateOutcome::Available { version };
    }

    let download_started = Instant::now();
    let mut downloaded: u64 = 0;
    let progress_app = app_handle.clone();
    let finished_app = app_handle.clone();
    let result = update
        .download_and_install(
            move |chunk_length, content_length| {
                downloaded = downloaded.saturating_add(chunk_length as u64);
                let (percent, rate) =
                    download_progress(downloaded, content_length, download_started.elapsed());
                let payload = progress_message(percent, rate);
                let _ = progress_app.emit_to(SPLASH_WINDOW_LABEL, SPLASH_MESSAGE_EVENT, payload);
                set_splash_progress(&progress_app, percent);
            },
            move || emit_splash(&finished_app, None, Some("Installing...".to_string())),
        )
        .await;

    if let Err(error) = result {
        return fail(app_handle, format!("failed to install update {version}: {error}"));
    }

    append_update_log(&format!("update {version} installed, restarting"));
    app_handle.request_restart();
    UpdateOutcome::Installed { version }
}

fn fail(app_handle: &AppHandle, reason: String) -> UpdateOutcome {
    append_update_log(&reason);
    emit_splash(app_handle, Some(format!("Error: {reason}")), None);
    UpdateOutcome::Failed { reason }
}
