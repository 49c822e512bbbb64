//! Single-file relocation primitives.
//! - `copy_file` copies and carries the modification/access times over.
//! - `move_file` renames; on cross-filesystem or other rename failure it falls
//!   back to copy + remove of the original.
//!
//! Overwrite semantics follow the caller's collision policy: an existing
//! destination is replaced (rename replaces on Unix; on Windows the
//! destination is removed first since rename does not overwrite there).

use anyhow::{Context, Result};
use filetime::FileTime;
use std::fs;
use std::io;
use std::path::Path;
use tracing::{trace, warn};

use super::helpers::io_error_with_help;

/// Copy `src` to `dest`, preserving permission bits (fs::copy) and timestamps
/// (best-effort; a failure to set times is logged, never fatal).
pub fn copy_file(src: &Path, dest: &Path) -> Result<()> {
    fs::copy(src, dest).map_err(io_error_with_help("copy file", src))?;
    preserve_times(src, dest);
    Ok(())
}

/// Move `src` to `dest`. Rename first; on failure, copy + remove original.
pub fn move_file(src: &Path, dest: &Path) -> Result<()> {
    match try_atomic_rename(src, dest) {
        Ok(()) => {
            trace!(src = %src.display(), dest = %dest.display(), "renamed file atomically");
            Ok(())
        }
        Err(e) => {
            #[cfg(unix)]
            let hint: &str = match e
                .downcast_ref::<io::Error>()
                .and_then(|ioe| ioe.raw_os_error())
            {
                Some(code) if code == libc::EXDEV => "cross-filesystem; will copy instead",
                Some(code) if code == libc::EACCES || code == libc::EPERM => {
                    "permission denied; check destination perms"
                }
                _ => "falling back to copy",
            };

            #[cfg(not(unix))]
            let hint: &str = match e.downcast_ref::<io::Error>().map(|ioe| ioe.kind()) {
                Some(io::ErrorKind::PermissionDenied) => {
                    "permission denied; check destination perms"
                }
                _ => "falling back to copy",
            };

            warn!(error = %e, hint, "rename failed, using copy + remove");
            copy_file(src, dest)?;
            fs::remove_file(src).map_err(io_error_with_help("remove original file", src))?;
            Ok(())
        }
    }
}

/// Rename with context-rich errors. On Windows an existing destination is
/// removed first; on Unix the destination directory is fsynced afterwards
/// (best-effort).
fn try_atomic_rename(src: &Path, dest: &Path) -> Result<()> {
    #[cfg(windows)]
    {
        if dest.exists() {
            if let Err(e) = fs::remove_file(dest) {
                if e.kind() != io::ErrorKind::NotFound {
                    return Err(e).with_context(|| {
                        format!(
                            "remove existing destination before rename: {}",
                            dest.display()
                        )
                    });
                }
            }
        }
    }

    fs::rename(src, dest)
        .with_context(|| format!("rename '{}' -> '{}'", src.display(), dest.display()))?;

    #[cfg(unix)]
    if let Some(parent) = dest.parent() {
        // Ignore fsync errors; the rename itself already succeeded.
        let _ = fs::File::open(parent).and_then(|f| f.sync_all());
    }

    Ok(())
}

/// Carry atime/mtime from `src` to `dest` (best-effort).
fn preserve_times(src: &Path, dest: &Path) {
    let Ok(meta) = fs::metadata(src) else { return };

    #[cfg(unix)]
    let (at, mt) = {
        use std::os::unix::fs::MetadataExt;
        (
            FileTime::from_unix_time(meta.atime(), meta.atime_nsec() as u32),
            FileTime::from_unix_time(meta.mtime(), meta.mtime_nsec() as u32),
        )
    };

    #[cfg(not(unix))]
    let (at, mt) = {
        let at = meta
            .accessed()
            .map(FileTime::from_system_time)
            .unwrap_or_else(|_| FileTime::now());
        let mt = meta
            .modified()
            .map(FileTime::from_system_time)
            .unwrap_or_else(|_| FileTime::now());
        (at, mt)
    };

    if let Err(e) = filetime::set_file_times(dest, at, mt) {
        warn!(path = %dest.display(), error = %e, "failed to set atime/mtime on destination");
    }
}
