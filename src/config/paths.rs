//! Default path helpers and symlink checks.
//! Determines OS-appropriate config/log paths, honors the FOLDER_MERGER_CONFIG
//! override, and detects symlinked ancestors for safety.

use dirs::{config_dir, data_dir};
use std::env;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Environment variable overriding the config location. May name a file or a
/// directory (then `config.xml` inside it); relative paths resolve against cwd.
pub const CONFIG_ENV_VAR: &str = "FOLDER_MERGER_CONFIG";

fn env_config_override() -> Option<PathBuf> {
    let raw = env::var_os(CONFIG_ENV_VAR)?;
    if raw.is_empty() {
        return None;
    }
    let mut path = PathBuf::from(raw);
    if path.is_relative() {
        if let Ok(cwd) = env::current_dir() {
            path = cwd.join(path);
        }
    }
    if path.is_dir() {
        path.push("config.xml");
    }
    Some(path)
}

/// OS-appropriate config path, or the FOLDER_MERGER_CONFIG override when set.
pub fn default_config_path() -> Option<PathBuf> {
    if let Some(over) = env_config_override() {
        return Some(over);
    }
    if let Some(mut base) = config_dir() {
        base.push("folder_merger");
        base.push("config.xml");
        Some(base)
    } else {
        env::var("HOME").ok().map(|h| {
            PathBuf::from(h)
                .join(".config")
                .join("folder_merger")
                .join("config.xml")
        })
    }
}

/// OS-appropriate default log file path (data dir). When the config location
/// is overridden, the log colocates next to the overridden config file.
pub fn default_log_path() -> Option<PathBuf> {
    if let Some(over) = env_config_override() {
        let dir = over.parent()?.to_path_buf();
        return Some(dir.join("folder_merger.log"));
    }
    if let Some(mut base) = data_dir() {
        base.push("folder_merger");
        // ensure dir exists (best-effort)
        let _ = fs::create_dir_all(&base);
        base.push("folder_merger.log");
        Some(base)
    } else {
        env::var("HOME").ok().map(|h| {
            PathBuf::from(h)
                .join(".local")
                .join("share")
                .join("folder_merger")
                .join("folder_merger.log")
        })
    }
}

/// Return true if any existing ancestor of `path` is a symlink.
pub fn path_has_symlink_ancestor(path: &Path) -> io::Result<bool> {
    let mut p = path.parent();
    while let Some(anc) = p {
        if anc.exists() {
            let meta = fs::symlink_metadata(anc)?;
            if meta.file_type().is_symlink() {
                return Ok(true);
            }
        }
        p = anc.parent();
    }
    Ok(false)
}
