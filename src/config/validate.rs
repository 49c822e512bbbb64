//! Config validation logic.
//! Verifies directory existence and readability/writability, fills in the
//! defaulted target root, and normalizes paths. The target may live inside the
//! source tree (it defaults to the source root itself); existing Merged_<N>
//! folders are simply picked up by bucket discovery.

use anyhow::{Context, Result, bail};
use std::fs;
use std::path::Path;
use tracing::{debug, info};

use super::types::{Config, RenamePolicy};

/// Validate a run configuration in place. Fills target_dir from source_dir
/// when unset, creates the target root if missing, and canonicalizes both
/// roots (best-effort) so later path comparisons are stable.
pub fn validate_and_normalize(cfg: &mut Config) -> Result<()> {
    if cfg.source_dir.as_os_str().is_empty() {
        bail!("no source directory configured; pass one on the command line or set source_dir");
    }

    ensure_dir_exists_and_is_dir(&cfg.source_dir, "source_dir")?;
    ensure_readable(&cfg.source_dir, "source_dir")?;

    if cfg.target_dir.as_os_str().is_empty() {
        cfg.target_dir = cfg.source_dir.clone();
    }
    ensure_dir_is_or_create(&cfg.target_dir, "target_dir")?;
    ensure_writable(&cfg.target_dir, "target_dir")?;

    if cfg.files_per_folder == 0 {
        bail!("files_per_folder must be at least 1");
    }
    if cfg.rename_mode == RenamePolicy::Prefix && cfg.custom_prefix.trim().is_empty() {
        bail!("rename_mode=prefix requires a non-empty custom_prefix");
    }

    if let Ok(real) = dunce::canonicalize(&cfg.source_dir) {
        cfg.source_dir = real;
    }
    if let Ok(real) = dunce::canonicalize(&cfg.target_dir) {
        cfg.target_dir = real;
    }

    info!(
        "Config validated: source='{}' target='{}' limit={} mode={} rename={} conflict={}",
        cfg.source_dir.display(),
        cfg.target_dir.display(),
        cfg.files_per_folder,
        cfg.operation_mode,
        cfg.rename_mode,
        cfg.conflict_mode
    );
    Ok(())
}

/// Ensure path exists and is a directory; emit clear errors with path context.
fn ensure_dir_exists_and_is_dir(path: &Path, name: &str) -> Result<()> {
    if !path.exists() {
        bail!("{name} does not exist: {}", path.display());
    }
    if !path.is_dir() {
        bail!("{name} is not a directory: {}", path.display());
    }
    Ok(())
}

/// Ensure directory is readable by attempting to open its entries.
fn ensure_readable(path: &Path, name: &str) -> Result<()> {
    fs::read_dir(path).with_context(|| {
        format!(
            "Cannot read {name} directory '{}'; check permissions",
            path.display()
        )
    })?;
    debug!("{name} readable: {}", path.display());
    Ok(())
}

/// Ensure directory exists (create if missing). If exists, it must be a directory.
fn ensure_dir_is_or_create(path: &Path, name: &str) -> Result<()> {
    if path.exists() {
        if !path.is_dir() {
            bail!("{name} exists but isn't a directory: {}", path.display());
        }
    } else {
        fs::create_dir_all(path)
            .with_context(|| format!("Failed to create {name} directory '{}'", path.display()))?;
        info!("Created {name} directory: {}", path.display());
    }
    Ok(())
}

/// Ensure directory is writable using a non-destructive probe file.
fn ensure_writable(path: &Path, name: &str) -> Result<()> {
    is_writable_probe(path).with_context(|| {
        format!(
            "Cannot write to {name} '{}'; check permissions",
            path.display()
        )
    })?;
    debug!("{name} writable: {}", path.display());
    Ok(())
}

/// Quick writable probe: create and remove a small file in `dir`.
/// Uses create_new to avoid clobbering existing files.
fn is_writable_probe(dir: &Path) -> std::io::Result<()> {
    let probe = dir.join(format!(".folder_merger_probe_{}.tmp", std::process::id()));
    match fs::OpenOptions::new()
        .create_new(true)
        .write(true)
        .open(&probe)
    {
        Ok(_) => {
            let _ = fs::remove_file(&probe);
            Ok(())
        }
        Err(e) => Err(e),
    }
}
