use std::{
    fs, io,
    path::{Path, PathBuf},
};

use walkdir::WalkDir;

use super::SwapError;

const ASSET_NAMESPACES: [&str; 2] = ["models", "textures"];

/// One file discovered under a swap root.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub(crate) struct SwapEntry {
    pub(crate) segments: Vec<String>,
    pub(crate) is_asset: bool,
}

impl SwapEntry {
    pub(crate) fn new(segments: Vec<String>) -> Self {
        let is_asset = segments
            .first()
            .is_some_and(|first| ASSET_NAMESPACES.contains(&first.as_str()));
        Self { segments, is_asset }
    }

    /// `/`-joined relative path with a leading slash, e.g. `/models/foo.json`.
    pub(crate) fn url_path(&self) -> String {
        let mut path = String::new();
        for segment in &self.segments {
            path.push('/');
            path.push_str(segment);
        }
        path
    }

    pub(crate) fn absolute_path(&self, root: &Path) -> PathBuf {
        self.segments
            .iter()
            .fold(root.to_path_buf(), |path, segment| path.join(segment))
    }
}

/// Lists every non-directory entry below `root`, depth first.
///
/// Entry order inside a directory is whatever the OS returns. Any directory
/// that cannot be listed fails the whole walk so a rule set is never built
/// from a partial scan.
pub(crate) fn walk_swap_root(root: &Path) -> Result<Vec<SwapEntry>, SwapError> {
    // A file at the root would otherwise be yielded at depth 0 and skipped.
    fs::read_dir(root).map_err(|source| SwapError::DirectoryUnreadable {
        path: root.to_path_buf(),
        source,
    })?;

    let mut entries = Vec::new();
    for dirent in WalkDir::new(root).min_depth(1) {
        let dirent = dirent.map_err(|error| unreadable(root, error))?;
        if dirent.file_type().is_dir() {
            continue;
        }

        let Ok(relative) = dirent.path().strip_prefix(root) else {
            continue;
        };
        let segments = relative
            .components()
            .map(|component| component.as_os_str().to_string_lossy().into_owned())
            .collect();
        entries.push(SwapEntry::new(segments));
    }

    Ok(entries)
}

fn unreadable(root: &Path, error: walkdir::Error) -> SwapError {
    let path = error
        .path()
        .map(Path::to_path_buf)
        .unwrap_or_else(|| root.to_path_buf());
    let source = error
        .into_io_error()
        .unwrap_or_else(|| io::Error::new(io::ErrorKind::Other, "filesystem loop"));
    SwapError::DirectoryUnreadable { path, source }
}
