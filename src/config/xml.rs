//! XML configuration support.
//! - Loads settings from config.xml (quick_xml).
//! - Creates a secure template if missing (unless FOLDER_MERGER_CONFIG is set).
//! - Exposes helpers to ensure a default config exists.
//!
//! Notes:
//! - This module only reads/writes the config file; directory validation happens elsewhere.
//! - Unknown XML fields and unrecognized policy values are hard errors, so a
//!   misspelled mode can never silently run with a default.

use anyhow::{Context, Result, bail};
use quick_xml::de::from_str as from_xml_str;
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

use super::paths::{
    CONFIG_ENV_VAR, default_config_path, default_log_path, path_has_symlink_ancestor,
};
use super::types::{Config, ConflictPolicy, LogLevel, OperationMode, RenamePolicy};
use super::{CUSTOM_PREFIX_DEFAULT, FILES_PER_FOLDER_DEFAULT};
use crate::platform::{set_dir_mode_0700, set_file_mode_0600, write_config_secure_new_0600};

/// Struct mirroring the XML config for deserialization.
#[derive(Debug, Deserialize)]
#[serde(rename = "config")]
#[serde(deny_unknown_fields)]
struct XmlConfig {
    source_dir: Option<String>,
    target_dir: Option<String>,
    files_per_folder: Option<String>,
    operation_mode: Option<String>,
    rename_mode: Option<String>,
    conflict_mode: Option<String>,
    custom_prefix: Option<String>,
    log_level: Option<String>,
    log_file: Option<String>,
}

/// Trim a raw XML text value; whitespace-only counts as absent.
fn trimmed(raw: &Option<String>) -> Option<&str> {
    raw.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

// Map XmlConfig -> Config. Policy fields fail hard on unrecognized values.
fn xml_to_config(parsed: XmlConfig) -> Result<Config> {
    let mut cfg = Config::default();

    if let Some(s) = trimmed(&parsed.source_dir) {
        cfg.source_dir = PathBuf::from(s);
    }
    if let Some(s) = trimmed(&parsed.target_dir) {
        cfg.target_dir = PathBuf::from(s);
    }
    if let Some(s) = trimmed(&parsed.files_per_folder) {
        cfg.files_per_folder = s
            .parse::<u64>()
            .with_context(|| format!("invalid files_per_folder: '{s}'"))?;
    }
    if let Some(s) = trimmed(&parsed.operation_mode) {
        cfg.operation_mode = match OperationMode::parse(s) {
            Some(m) => m,
            None => bail!("invalid operation_mode in config: '{s}' (copy|move)"),
        };
    }
    if let Some(s) = trimmed(&parsed.rename_mode) {
        cfg.rename_mode = match RenamePolicy::parse(s) {
            Some(m) => m,
            None => bail!("invalid rename_mode in config: '{s}' (keep|parent_name|prefix)"),
        };
    }
    if let Some(s) = trimmed(&parsed.conflict_mode) {
        cfg.conflict_mode = match ConflictPolicy::parse(s) {
            Some(m) => m,
            None => bail!("invalid conflict_mode in config: '{s}' (auto_rename|skip|overwrite)"),
        };
    }
    if let Some(s) = trimmed(&parsed.custom_prefix) {
        cfg.custom_prefix = s.to_string();
    }
    if let Some(s) = trimmed(&parsed.log_level) {
        cfg.log_level = match LogLevel::parse(s) {
            Some(l) => l,
            None => bail!("invalid log_level in config: '{s}' (quiet|normal|info|debug)"),
        };
    }
    if let Some(s) = trimmed(&parsed.log_file) {
        cfg.log_file = Some(PathBuf::from(s));
    }

    Ok(cfg)
}

/// Load a Config from a specific XML file path (quick_xml).
pub fn load_config_from_xml_path(path: &Path) -> Result<Config> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("read config xml '{}'", path.display()))?;
    let parsed: XmlConfig = from_xml_str(&contents)
        .with_context(|| format!("parse config xml '{}'", path.display()))?;
    xml_to_config(parsed).with_context(|| format!("apply config xml '{}'", path.display()))
}

/// If FOLDER_MERGER_CONFIG is set, load and return that Config; otherwise Ok(None).
/// A missing or malformed file named by the variable is an error, not a fallback.
pub fn load_config_from_xml_env() -> Result<Option<Config>> {
    if env::var_os(CONFIG_ENV_VAR).is_none() {
        return Ok(None);
    }
    let path = default_config_path()
        .with_context(|| format!("resolve config path from {CONFIG_ENV_VAR}"))?;
    let cfg = load_config_from_xml_path(&path)?;
    Ok(Some(cfg))
}

/// Try loading Config from the platform default config.xml path.
/// Returns Ok(Some(cfg)) if the file exists and parses; Ok(None) if missing.
pub fn load_config_from_default_xml() -> Result<Option<Config>> {
    let path = default_config_path().context("resolve default config path")?;
    if !path.exists() {
        return Ok(None);
    }
    let cfg = load_config_from_xml_path(&path)?;
    Ok(Some(cfg))
}

/// Create default template config file and parent directory (best-effort permissions).
/// Uses secure creation to avoid following attacker-controlled symlinks on Unix.
pub fn create_template_config(path: &Path) -> Result<()> {
    if path_has_symlink_ancestor(path)? {
        return Err(anyhow::anyhow!(
            "Refusing to create config: ancestor of {} is a symlink",
            path.display()
        ));
    }

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
        let _ = set_dir_mode_0700(parent);
    }

    let suggested_log = default_log_path()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "/path/to/folder_merger.log".into());

    let content = format!(
        "<!--\n  folder_merger configuration (XML)\n\n  Fields:\n    source_dir        -> root of the tree to flatten (required unless given on the CLI)\n    target_dir        -> where Merged_<N> folders are created (defaults to source_dir)\n    files_per_folder  -> files per Merged_<N> folder (>= 1)\n    operation_mode    -> copy | move\n    rename_mode       -> keep | parent_name | prefix\n    conflict_mode     -> auto_rename | skip | overwrite\n    custom_prefix     -> name stem used by rename_mode=prefix\n    log_level         -> quiet | normal | info | debug\n    log_file          -> path to log file (optional; console output still used)\n\n  Notes:\n    - CLI flags override XML values.\n    - Unknown fields or unrecognized mode values abort startup.\n-->\n<config>\n  <source_dir></source_dir>\n  <target_dir></target_dir>\n  <files_per_folder>{}</files_per_folder>\n  <operation_mode>copy</operation_mode>\n  <rename_mode>keep</rename_mode>\n  <conflict_mode>auto_rename</conflict_mode>\n  <custom_prefix>{}</custom_prefix>\n  <log_level>normal</log_level>\n  <log_file>{}</log_file>\n</config>\n",
        FILES_PER_FOLDER_DEFAULT, CUSTOM_PREFIX_DEFAULT, suggested_log
    );

    // Atomic, secure write (O_NOFOLLOW + create_new on Unix), then tighten perms.
    write_config_secure_new_0600(path, content.as_bytes())?;
    let _ = set_file_mode_0600(path);

    info!("Created template config at {}", path.display());
    Ok(())
}

/// Create default config if FOLDER_MERGER_CONFIG not set; return created path so
/// the app can inform the user.
pub fn ensure_default_config_exists() -> Option<PathBuf> {
    if env::var_os(CONFIG_ENV_VAR).is_some() {
        return None;
    }

    let cfg_path = default_config_path()?;
    if cfg_path.exists() {
        return None;
    }

    if let Ok(true) = path_has_symlink_ancestor(&cfg_path) {
        eprintln!(
            "Refusing to create template config because an existing ancestor is a symlink: {}",
            cfg_path.display()
        );
        return None;
    }

    match create_template_config(&cfg_path) {
        Ok(()) => Some(cfg_path),
        Err(e) => {
            eprintln!(
                "Failed to create template config at {}: {}",
                cfg_path.display(),
                e
            );
            None
        }
    }
}
