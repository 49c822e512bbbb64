//! Core configuration types.
//! - Config holds one run's settings with conservative defaults.
//! - The policy enums are closed: parsing rejects unknown names instead of
//!   falling back to a default, so a typo in a config file fails loudly.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use super::paths;
use super::{CUSTOM_PREFIX_DEFAULT, FILES_PER_FOLDER_DEFAULT};

/// Program-defined verbosity levels exposed to users/config.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogLevel {
    /// Only errors
    Quiet,
    /// Informational output (default)
    #[default]
    Normal,
    /// More info (like verbose)
    Info,
    /// Debug/trace
    Debug,
}

impl LogLevel {
    /// Parse common string names into our LogLevel (case-insensitive).
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "quiet" | "error" | "none" => Some(LogLevel::Quiet),
            "normal" => Some(LogLevel::Normal),
            "info" | "verbose" | "detailed" => Some(LogLevel::Info),
            "debug" | "trace" => Some(LogLevel::Debug),
            _ => None,
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            LogLevel::Quiet => "quiet",
            LogLevel::Normal => "normal",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
        };
        f.write_str(s)
    }
}

impl FromStr for LogLevel {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("invalid log level: '{s}'"))
    }
}

/// Whether source files are copied into buckets or moved out of the tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OperationMode {
    #[default]
    Copy,
    Move,
}

impl OperationMode {
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "copy" => Some(OperationMode::Copy),
            "move" => Some(OperationMode::Move),
            _ => None,
        }
    }

    pub fn is_move(self) -> bool {
        matches!(self, OperationMode::Move)
    }
}

impl fmt::Display for OperationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            OperationMode::Copy => "copy",
            OperationMode::Move => "move",
        })
    }
}

impl FromStr for OperationMode {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("invalid operation mode: '{s}' (copy|move)"))
    }
}

/// How destination filenames are derived from source files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RenamePolicy {
    /// Keep the original basename.
    #[default]
    Keep,
    /// Prepend the immediate parent directory's name.
    ParentName,
    /// Replace the name with "<prefix>_<n>" keeping the extension.
    Prefix,
}

impl RenamePolicy {
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "keep" | "none" => Some(RenamePolicy::Keep),
            "parent" | "parent_name" => Some(RenamePolicy::ParentName),
            "prefix" | "sequence" => Some(RenamePolicy::Prefix),
            _ => None,
        }
    }
}

impl fmt::Display for RenamePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            RenamePolicy::Keep => "keep",
            RenamePolicy::ParentName => "parent_name",
            RenamePolicy::Prefix => "prefix",
        })
    }
}

impl FromStr for RenamePolicy {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
            .ok_or_else(|| format!("invalid rename mode: '{s}' (keep|parent_name|prefix)"))
    }
}

/// What to do when a destination file with the chosen name already exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConflictPolicy {
    /// Find a free " (n)"-suffixed name.
    #[default]
    AutoRename,
    /// Leave the source untouched; counts as handled.
    Skip,
    /// Replace the existing destination file.
    Overwrite,
}

impl ConflictPolicy {
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "auto_rename" | "rename" | "auto" => Some(ConflictPolicy::AutoRename),
            "skip" => Some(ConflictPolicy::Skip),
            "overwrite" => Some(ConflictPolicy::Overwrite),
            _ => None,
        }
    }
}

impl fmt::Display for ConflictPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ConflictPolicy::AutoRename => "auto_rename",
            ConflictPolicy::Skip => "skip",
            ConflictPolicy::Overwrite => "overwrite",
        })
    }
}

impl FromStr for ConflictPolicy {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
            .ok_or_else(|| format!("invalid conflict mode: '{s}' (auto_rename|skip|overwrite)"))
    }
}

/// Runtime configuration for one merge run.
#[derive(Debug, Clone)]
pub struct Config {
    /// Root of the tree to flatten
    pub source_dir: PathBuf,
    /// Root under which Merged_<N> buckets live; defaults to source_dir
    pub target_dir: PathBuf,
    /// Capacity of each bucket (must be >= 1)
    pub files_per_folder: u64,
    /// Copy or move
    pub operation_mode: OperationMode,
    /// Destination filename derivation
    pub rename_mode: RenamePolicy,
    /// Existing-destination handling
    pub conflict_mode: ConflictPolicy,
    /// Prefix used by RenamePolicy::Prefix
    pub custom_prefix: String,
    /// Console verbosity
    pub log_level: LogLevel,
    /// Optional path to a log file
    pub log_file: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            source_dir: PathBuf::new(),
            target_dir: PathBuf::new(),
            files_per_folder: FILES_PER_FOLDER_DEFAULT,
            operation_mode: OperationMode::Copy,
            rename_mode: RenamePolicy::Keep,
            conflict_mode: ConflictPolicy::AutoRename,
            custom_prefix: CUSTOM_PREFIX_DEFAULT.to_string(),
            log_level: LogLevel::Normal,
            log_file: paths::default_log_path(),
        }
    }
}

impl Config {
    /// Construct a Config with explicit roots and capacity; other fields use defaults.
    pub fn new(
        source_dir: impl Into<PathBuf>,
        target_dir: impl Into<PathBuf>,
        files_per_folder: u64,
    ) -> Self {
        Self {
            source_dir: source_dir.into(),
            target_dir: target_dir.into(),
            files_per_folder,
            ..Default::default()
        }
    }
}
