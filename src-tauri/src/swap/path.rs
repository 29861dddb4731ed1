use std::{fs, path::Path};

/// Returns true when `value` names an absolute path on this platform.
pub(crate) fn is_valid_path(value: &str) -> bool {
    !value.is_empty() && Path::new(value).is_absolute()
}

/// Creates every missing directory in `paths`. Failures are reported through
/// `log` and never abort the remaining directories.
pub(crate) fn ensure_dirs<'a, I, F>(paths: I, log: F)
where
    I: IntoIterator<Item = &'a Path>,
    F: Fn(&str),
{
    for path in paths {
        if path.exists() {
            continue;
        }
        if let Err(error) = fs::create_dir_all(path) {
            log(&format!(
                "failed to create directory {}: {error}",
                path.display()
            ));
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use super::*;

    #[test]
    fn is_valid_path_rejects_empty_and_relative_paths() {
        assert!(!is_valid_path(""));
        assert!(!is_valid_path("relative/path"));
        assert!(!is_valid_path("./swap"));
    }

    #[cfg(unix)]
    #[test]
    fn is_valid_path_accepts_rooted_unix_paths() {
        assert!(is_valid_path("/abs/path"));
        assert!(is_valid_path("/"));
    }

    #[cfg(windows)]
    #[test]
    fn is_valid_path_accepts_drive_paths() {
        assert!(is_valid_path(r"C:\abs\path"));
        assert!(!is_valid_path(r"abs\path"));
    }

    #[test]
    fn ensure_dirs_creates_missing_nested_directories() {
        let temp = tempfile::tempdir().expect("create temp dir");
        let swap = temp.path().join("idkr").join("swap");
        let scripts = temp.path().join("idkr").join("scripts");
        let messages = RefCell::new(Vec::new());

        ensure_dirs([swap.as_path(), scripts.as_path()], |message| {
            messages.borrow_mut().push(message.to_string())
        });

        assert!(swap.is_dir());
        assert!(scripts.is_dir());
        assert!(messages.borrow().is_empty());
    }

    #[test]
    fn ensure_dirs_logs_failures_and_continues() {
        let temp = tempfile::tempdir().expect("create temp dir");
        let blocker = temp.path().join("blocker");
        fs::write(&blocker, b"file").expect("write blocker file");
        let blocked = blocker.join("swap");
        let after = temp.path().join("after");
        let messages = RefCell::new(Vec::new());

        ensure_dirs([blocked.as_path(), after.as_path()], |message| {
            messages.borrow_mut().push(message.to_string())
        });

        assert_eq!(messages.borrow().len(), 1);
        assert!(after.is_dir());
    }
}
