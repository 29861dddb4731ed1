use std::{
    fs, io,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{
    swap::{self, SwapConfig, SwapMode},
    AutoUpdateMode, APP_DOCUMENTS_DIR, DEFAULT_GAME_DOMAIN, SWAP_DIR_NAME, SWAP_SCHEME,
};

#[derive(Debug, thiserror::Error)]
pub(crate) enum SettingsError {
    #[error("failed to read settings {}: {source}", path.display())]
    Read { path: PathBuf, source: io::Error },

    #[error("failed to write settings {}: {source}", path.display())]
    Write { path: PathBuf, source: io::Error },

    #[error("failed to create settings directory {}: {source}", path.display())]
    CreateDir { path: PathBuf, source: io::Error },

    #[error("invalid settings json: {0}")]
    Json(#[from] serde_json::Error),

    #[error("unknown setting '{0}'")]
    UnknownKey(String),
}

/// User settings stored as `config.json` in the app config directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub(crate) struct Settings {
    pub(crate) debug: bool,
    pub(crate) auto_update: AutoUpdateMode,
    pub(crate) accelerated_canvas: bool,
    pub(crate) disable_frame_rate_limit: bool,
    pub(crate) angle_backend: String,
    pub(crate) color_profile: String,
    pub(crate) full_screen: bool,
    pub(crate) resource_swapper_path: String,
    pub(crate) resource_swapper_mode: SwapMode,
    pub(crate) game_domain: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            debug: false,
            auto_update: AutoUpdateMode::Download,
            accelerated_canvas: true,
            disable_frame_rate_limit: true,
            angle_backend: "default".to_string(),
            color_profile: "default".to_string(),
            full_screen: false,
            resource_swapper_path: String::new(),
            resource_swapper_mode: SwapMode::Normal,
            game_domain: DEFAULT_GAME_DOMAIN.to_string(),
        }
    }
}

impl Settings {
    pub(crate) fn game_url(&self) -> String {
        format!("https://{}/", self.game_domain)
    }

    /// Swap root from `resourceSwapperPath`, or `<documents>/idkr/swap`.
    ///
    /// Returns `None` when the configured path is unusable and no documents
    /// directory is available either.
    pub(crate) fn swap_root<F>(&self, documents_dir: Option<&Path>, log: F) -> Option<PathBuf>
    where
        F: Fn(&str),
    {
        let configured = self.resource_swapper_path.trim();
        if swap::is_valid_path(configured) {
            return Some(PathBuf::from(configured));
        }
        if !configured.is_empty() {
            let error = swap::SwapError::ConfigInvalid {
                value: configured.to_string(),
            };
            log(&format!("{error}; falling back to the default swap directory"));
        }

        documents_dir.map(|documents| documents.join(APP_DOCUMENTS_DIR).join(SWAP_DIR_NAME))
    }

    pub(crate) fn swap_config<F>(&self, documents_dir: Option<&Path>, log: F) -> Option<SwapConfig>
    where
        F: Fn(&str),
    {
        let swap_root = self.swap_root(documents_dir, log)?;
        Some(SwapConfig {
            swap_root,
            mode: self.resource_swapper_mode,
            domain: self.game_domain.clone(),
            scheme: SWAP_SCHEME.to_string(),
        })
    }
}

/// Reads settings from `path`. A missing file yields defaults; an unreadable
/// or malformed file is logged and also yields defaults.
pub(crate) fn load_settings<F>(path: &Path, log: F) -> Settings
where
    F: Fn(&str),
{
    let raw = match fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(error) if error.kind() == io::ErrorKind::NotFound => return Settings::default(),
        Err(source) => {
            log(&SettingsError::Read {
                path: path.to_path_buf(),
                source,
            }
            .to_string());
            return Settings::default();
        }
    };

    match serde_json::from_str::<Settings>(&raw) {
        Ok(settings) => settings,
        Err(error) => {
            log(&format!(
                "failed to parse settings {}: {}. using defaults",
                path.display(),
                error
            ));
            Settings::default()
        }
    }
}

pub(crate) fn save_settings(path: &Path, settings: &Settings) -> Result<(), SettingsError> {
    if let Some(parent_dir) = path.parent() {
        fs::create_dir_all(parent_dir).map_err(|source| SettingsError::CreateDir {
            path: parent_dir.to_path_buf(),
            source,
        })?;
    }

    let serialized = serde_json::to_string_pretty(settings)?;
    fs::write(path, serialized).map_err(|source| SettingsError::Write {
        path: path.to_path_buf(),
        source,
    })
}

/// Returns a copy of `settings` with the camelCase field `key` set to `value`.
pub(crate) fn apply_setting(
    settings: &Settings,
    key: &str,
    value: Value,
) -> Result<Settings, SettingsError> {
    let mut object = serde_json::to_value(settings)?;
    let Some(map) = object.as_object_mut() else {
        return Err(SettingsError::UnknownKey(key.to_string()));
    };
    if !map.contains_key(key) {
        return Err(SettingsError::UnknownKey(key.to_string()));
    }
    map.insert(key.to_string(), value);

    Ok(serde_json::from_value(object)?)
}
