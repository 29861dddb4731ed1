use std::{
    env,
    path::{Path, PathBuf},
};

use crate::{APP_DOCUMENTS_DIR, SETTINGS_FILE};

const APP_DATA_DIR: &str = "idkr";
const ROOT_OVERRIDE_ENV: &str = "IDKR_ROOT";

/// Per-user data root. `IDKR_ROOT` overrides the platform location.
pub(crate) fn default_app_root_dir() -> Option<PathBuf> {
    if let Ok(root) = env::var(ROOT_OVERRIDE_ENV) {
        let root = PathBuf::from(root.trim());
        if !root.as_os_str().is_empty() {
            return Some(root);
        }
    }

    dirs::config_dir().map(|dir| dir.join(APP_DATA_DIR))
}

pub(crate) fn settings_path(app_root_dir: Option<&Path>) -> Option<PathBuf> {
    app_root_dir.map(|root| root.join(SETTINGS_FILE))
}

pub(crate) fn log_dir(app_root_dir: Option<&Path>) -> PathBuf {
    app_root_dir
        .map(Path::to_path_buf)
        .unwrap_or_else(|| env::temp_dir().join(APP_DOCUMENTS_DIR))
        .join("logs")
}

/// The documents directory, if this process can read it.
pub(crate) fn accessible_documents_dir() -> Option<PathBuf> {
    let documents = dirs::document_dir()?;
    match std::fs::read_dir(&documents) {
        Ok(_) => Some(documents),
        Err(error) => {
            crate::append_desktop_log(&format!(
                "no access to documents directory {}: {error}",
                documents.display()
            ));
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn settings_and_logs_live_under_app_root() {
        let root = Path::new("/data/idkr");
        assert_eq!(
            settings_path(Some(root)),
            Some(root.join("config.json"))
        );
        assert_eq!(log_dir(Some(root)), root.join("logs"));
        assert_eq!(settings_path(None), None);
    }

    #[test]
    fn log_dir_falls_back_to_temp_dir() {
        assert_eq!(log_dir(None), env::temp_dir().join("idkr").join("logs"));
    }
}
