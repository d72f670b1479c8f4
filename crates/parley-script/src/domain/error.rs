//! Script loading errors.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while loading scripts.
///
/// Malformed rows are not errors; they are logged and skipped.
#[derive(Debug, Error)]
pub enum ScriptError {
    /// The script file could not be read.
    #[error("cannot read script {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A script name tried to leave the script directory.
    #[error("invalid script name: {0}")]
    InvalidName(String),
}
