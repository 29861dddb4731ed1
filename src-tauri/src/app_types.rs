use std::{
    path::PathBuf,
    sync::{
        atomic::{AtomicUsize, Ordering},
        Mutex,
    },
};

use serde::{Deserialize, Serialize};

use crate::{settings, Settings, GAME_WINDOW_LABEL_PREFIX};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub(crate) enum AutoUpdateMode {
    /// Download and install updates before the game starts.
    #[default]
    Download,
    /// Only report that an update exists.
    Check,
    /// Do not contact the update server.
    Skip,
}

impl AutoUpdateMode {
    pub(crate) fn as_str(self) -> &'static str {
        match self {
            Self::Download => "download",
            Self::Check => "check",
            Self::Skip => "skip",
        }
    }
}

/// Effective launch configuration after merging settings and command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct LaunchState {
    pub(crate) debug: bool,
    pub(crate) update_mode: AutoUpdateMode,
}

impl LaunchState {
    pub(crate) fn resolve(settings: &Settings, options: &crate::cli::LaunchOptions) -> Self {
        Self {
            debug: options.debug || settings.debug,
            update_mode: options.update.unwrap_or(settings.auto_update),
        }
    }
}

/// Persisted settings shared by every window.
#[derive(Debug)]
pub(crate) struct AppSettingsState {
    path: Option<PathBuf>,
    settings: Mutex<Settings>,
}

impl AppSettingsState {
    pub(crate) fn new(path: Option<PathBuf>, settings: Settings) -> Self {
        Self {
            path,
            settings: Mutex::new(settings),
        }
    }

    pub(crate) fn snapshot(&self) -> Settings {
        self.settings
            .lock()
            .map(|guard| guard.clone())
            .unwrap_or_default()
    }

    /// Applies one `key = value` change and writes the settings file.
    pub(crate) fn update(&self, key: &str, value: serde_json::Value) -> Result<Settings, String> {
        let mut guard = self
            .settings
            .lock()
            .map_err(|_| "settings lock poisoned".to_string())?;
        let updated =
            settings::apply_setting(&guard, key, value).map_err(|error| error.to_string())?;

        if let Some(path) = &self.path {
            settings::save_settings(path, &updated).map_err(|error| error.to_string())?;
        }
        *guard = updated.clone();
        Ok(updated)
    }
}

/// Reply shape of bridge commands that can fail.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub(crate) struct BridgeResult {
    pub(crate) ok: bool,
    pub(crate) reason: Option<String>,
}

impl BridgeResult {
    pub(crate) fn ok() -> Self {
        Self {
            ok: true,
            reason: None,
        }
    }

    pub(crate) fn failed(reason: String) -> Self {
        Self {
            ok: false,
            reason: Some(reason),
        }
    }
}

/// Hands out unique labels for game windows.
#[derive(Debug, Default)]
pub(crate) struct GameWindowCounter {
    next: AtomicUsize,
}

impl GameWindowCounter {
    pub(crate) fn next_label(&self) -> String {
        let index = self.next.fetch_add(1, Ordering::Relaxed);
        format!("{GAME_WINDOW_LABEL_PREFIX}-{index}")
    }
}

pub(crate) fn is_game_window_label(label: &str) -> bool {
    label
        .strip_prefix(GAME_WINDOW_LABEL_PREFIX)
        .and_then(|rest| rest.strip_prefix('-'))
        .is_some_and(|index| !index.is_empty() && index.bytes().all(|byte| byte.is_ascii_digit()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::LaunchOptions;

    #[test]
    fn launch_state_prefers_command_line_overrides() {
        let settings = Settings {
            auto_update: AutoUpdateMode::Check,
            ..Settings::default()
        };
        let options = LaunchOptions {
            debug: true,
            update: Some(AutoUpdateMode::Skip),
        };

        let state = LaunchState::resolve(&settings, &options);
        assert!(state.debug);
        assert_eq!(state.update_mode, AutoUpdateMode::Skip);

        let state = LaunchState::resolve(&settings, &LaunchOptions::default());
        assert!(!state.debug);
        assert_eq!(state.update_mode, AutoUpdateMode::Check);
    }

    #[test]
    fn game_window_counter_yields_unique_game_labels() {
        let counter = GameWindowCounter::default();
        let first = counter.next_label();
        let second = counter.next_label();

        assert_eq!(first, "game-0");
        assert_eq!(second, "game-1");
        assert!(is_game_window_label(&first));
        assert!(!is_game_window_label("game-"));
        assert!(!is_game_window_label("gamex-1"));
        assert!(!is_game_window_label("settings"));
    }

    #[test]
    fn app_settings_state_updates_and_persists() {
        let temp = tempfile::tempdir().expect("create temp dir");
        let path = temp.path().join("config.json");
        let state = AppSettingsState::new(Some(path.clone()), Settings::default());

        let updated = state
            .update("fullScreen", serde_json::Value::Bool(true))
            .expect("update setting");

        assert!(updated.full_screen);
        assert!(state.snapshot().full_screen);
        assert!(settings::load_settings(&path, |_| {}).full_screen);
    }

    #[test]
    fn app_settings_state_rejects_unknown_keys_without_changes() {
        let state = AppSettingsState::new(None, Settings::default());
        assert!(state.update("noSuchKey", serde_json::Value::Null).is_err());
        assert_eq!(state.snapshot(), Settings::default());
    }
}
