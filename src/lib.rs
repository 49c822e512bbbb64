//! Core library for `folder_merger`.
//!
//! Contains the core logic: config loading, bucket allocation and the merge
//! engine that flattens a nested tree into capacity-limited `Merged_<N>`
//! folders. Keep the library small and ergonomic: a Config type with sensible
//! defaults, a validation pass for paths/permissions, and an engine that is
//! driven the same way from the CLI or from tests.

pub mod buckets;
pub mod cancel;
pub mod cli;
pub mod config;
pub mod engine;
pub mod errors;
pub mod fs_ops;
pub mod output;
pub mod platform;
pub mod progress;

pub use cancel::CancelFlag;
pub use config::paths::{default_config_path, default_log_path, path_has_symlink_ancestor};
pub use config::types::{Config, ConflictPolicy, LogLevel, OperationMode, RenamePolicy};
pub use engine::{MergeEngine, MergeReport};
pub use errors::MergeError;
pub use progress::{ProgressFn, ProgressUpdate, Stage};
