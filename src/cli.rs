//! CLI definition and parsing.
//! Defines Args and provides parse() for command-line handling.
//!
//! Notes:
//! - --source-dir takes precedence over the positional SOURCE_DIR.
//! - --debug is a shorthand for --log-level debug.
//! - Policy flags parse into closed enums; an unrecognized value is a hard
//!   usage error, never a silent default.

use clap::{Parser, ValueHint};
use std::path::PathBuf;

use crate::config::types::{Config, ConflictPolicy, LogLevel, OperationMode, RenamePolicy};

/// CLI wrapper for the folder_merger library.
/// CLI flags override config values (which are loaded from XML if present).
#[derive(Parser, Debug, Clone)]
#[command(
    author,
    version,
    about = "Flatten a nested directory tree into capacity-limited Merged_<N> folders"
)]
pub struct Args {
    /// Root of the tree to flatten (positional form).
    #[arg(value_name = "SOURCE_DIR", value_hint = ValueHint::DirPath)]
    pub source_dir_pos: Option<PathBuf>,

    /// Explicit source option; overrides the positional SOURCE_DIR.
    #[arg(
        long = "source-dir",
        short = 's',
        value_name = "PATH",
        value_hint = ValueHint::DirPath,
        help = "Source directory (overrides positional)"
    )]
    pub source_dir: Option<PathBuf>,

    /// Where the Merged_<N> folders are created. Defaults to the source directory.
    #[arg(
        long = "target-dir",
        short = 't',
        value_name = "PATH",
        value_hint = ValueHint::DirPath,
        help = "Destination root for Merged_<N> folders (defaults to SOURCE_DIR)"
    )]
    pub target_dir: Option<PathBuf>,

    /// Capacity of each Merged_<N> folder.
    #[arg(
        long = "files-per-folder",
        short = 'n',
        value_name = "COUNT",
        help = "Files per Merged_<N> folder (>= 1)"
    )]
    pub files_per_folder: Option<u64>,

    /// Whether files are copied into buckets or moved out of the source tree.
    #[arg(long, value_name = "MODE", help = "Operation mode: copy, move")]
    pub mode: Option<OperationMode>,

    /// How destination filenames are derived.
    #[arg(
        long,
        value_name = "POLICY",
        help = "Rename policy: keep, parent_name, prefix"
    )]
    pub rename: Option<RenamePolicy>,

    /// What to do when the destination name already exists.
    #[arg(
        long = "on-conflict",
        value_name = "POLICY",
        help = "Conflict policy: auto_rename, skip, overwrite"
    )]
    pub on_conflict: Option<ConflictPolicy>,

    /// Name stem used by the prefix rename policy.
    #[arg(long, value_name = "NAME", help = "Prefix for --rename prefix")]
    pub prefix: Option<String>,

    /// Enable debug logging (equivalent to `--log-level debug`).
    #[arg(
        short = 'd',
        long,
        help = "Enable debug logging (shorthand for --log-level debug)"
    )]
    pub debug: bool,

    /// Set log level. One of: quiet, normal, info, debug.
    #[arg(long, help = "Set log level: quiet, normal, info, debug")]
    pub log_level: Option<String>,

    /// Write logs to this file in addition to the console.
    #[arg(long, value_name = "PATH", value_hint = ValueHint::FilePath, help = "Log file path")]
    pub log_file: Option<PathBuf>,

    /// Print where folder_merger will look for the config file (or FOLDER_MERGER_CONFIG if set), then exit.
    #[arg(
        long,
        help = "Print the config file location used by folder_merger and exit"
    )]
    pub print_config: bool,

    /// Emit logs in structured JSON (includes timestamp, level, and structured fields).
    #[arg(long, help = "Emit logs in structured JSON")]
    pub json: bool,
}

impl Args {
    /// Effective source directory.
    ///
    /// Precedence:
    /// 1) `--source-dir` if provided
    /// 2) positional `SOURCE_DIR` if provided
    #[inline]
    pub fn resolved_source(&self) -> Option<PathBuf> {
        if let Some(p) = &self.source_dir {
            return Some(Self::sanitize_path(p));
        }
        self.source_dir_pos.as_deref().map(Self::sanitize_path)
    }

    #[inline]
    fn sanitize_path(p: &std::path::Path) -> PathBuf {
        Self::sanitize_str(&p.to_string_lossy())
    }

    #[inline]
    fn sanitize_str(s: &str) -> PathBuf {
        // Trim surrounding single/double quotes left behind by shell quoting
        // (PowerShell/CMD), then any stray embedded quotes from escaping mistakes.
        let trimmed = s.trim();
        // len >= 2 so a lone quote is not treated as a matched pair.
        let mut inner = if trimmed.len() >= 2
            && ((trimmed.starts_with('"') && trimmed.ends_with('"'))
                || (trimmed.starts_with('\'') && trimmed.ends_with('\'')))
        {
            trimmed[1..trimmed.len() - 1].to_string()
        } else {
            trimmed.trim_matches(|c| c == '\'' || c == '"').to_string()
        };
        inner.retain(|c| c != '\'' && c != '"');

        // A single trailing separator survives quote stripping; drop it unless the
        // whole path is a root like "/".
        if (inner.ends_with('\\') || inner.ends_with('/')) && inner.len() > 1 {
            inner.pop();
        }

        PathBuf::from(inner)
    }

    /// Effective log level derived from flags.
    /// Precedence: --debug > --log-level value > None (use config default).
    pub fn effective_log_level(&self) -> Option<LogLevel> {
        if self.debug {
            return Some(LogLevel::Debug);
        }
        self.log_level.as_deref().and_then(LogLevel::parse)
    }

    /// Apply CLI overrides to a loaded Config (in-place). No-ops for unset flags.
    pub fn apply_overrides(&self, cfg: &mut Config) {
        if let Some(src) = self.resolved_source() {
            cfg.source_dir = src;
        }
        if let Some(target) = &self.target_dir {
            cfg.target_dir = target.clone();
        }
        if let Some(n) = self.files_per_folder {
            cfg.files_per_folder = n;
        }
        if let Some(mode) = self.mode {
            cfg.operation_mode = mode;
        }
        if let Some(rename) = self.rename {
            cfg.rename_mode = rename;
        }
        if let Some(conflict) = self.on_conflict {
            cfg.conflict_mode = conflict;
        }
        if let Some(prefix) = &self.prefix {
            cfg.custom_prefix = prefix.clone();
        }
        if let Some(level) = self.effective_log_level() {
            cfg.log_level = level;
        }
        if let Some(lf) = &self.log_file {
            cfg.log_file = Some(lf.clone());
        }
    }
}

pub fn parse() -> Args {
    Args::parse()
}
