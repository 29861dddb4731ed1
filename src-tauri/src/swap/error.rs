use std::{io, path::PathBuf};

#[derive(Debug, thiserror::Error)]
pub(crate) enum SwapError {
    #[error("invalid resource swapper path '{value}'")]
    ConfigInvalid { value: String },

    #[error("failed to read swap directory {}: {source}", path.display())]
    DirectoryUnreadable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("swapped file not found: {}", path.display())]
    FileNotFoundOnResolve { path: PathBuf },

    #[error("invalid swap scheme url '{url}': {reason}")]
    InvalidSchemeUrl { url: String, reason: String },
}
