//! Typed error definitions for folder_merger.
//! Provides a small set of well-known failure modes for better logs and tests.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum MergeError {
    #[error("Source path not found: {0}")]
    SourceNotFound(PathBuf),

    #[error("Source path is not a directory: {0}")]
    SourceNotDirectory(PathBuf),

    #[error("Cannot use destination root {path}: {source}")]
    DestinationUnusable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Could not find a free name for {0} after {1} attempts")]
    NameSearchExhausted(PathBuf, u32),
}
