//! Empty-directory removal for move mode.
//!
//! Two passes exist: `try_remove_parent` runs inline after each moved file and
//! removes at most one level, and `remove_empty_dirs` is the authoritative
//! bottom-up sweep at the end of a run. Both treat failure to remove (dir
//! still has entries, permissions) as a non-event.

use std::fs;
use std::path::Path;
use tracing::trace;
use walkdir::WalkDir;

/// Remove `file`'s immediate parent directory if it is now empty. The source
/// root itself is never removed, even when a run drains it completely.
pub fn try_remove_parent(file: &Path, source_root: &Path) {
    let Some(parent) = file.parent() else { return };

    let parent_real = dunce::canonicalize(parent).unwrap_or_else(|_| parent.to_path_buf());
    let root_real =
        dunce::canonicalize(source_root).unwrap_or_else(|_| source_root.to_path_buf());
    if parent_real == root_real {
        return;
    }

    if fs::remove_dir(parent).is_ok() {
        trace!(dir = %parent.display(), "removed empty parent directory");
    }
}

/// Bottom-up sweep deleting every empty directory under `root`. Children are
/// visited before parents, so chains of nested empty directories collapse in
/// one pass. `root` itself is excluded.
pub fn remove_empty_dirs(root: &Path) {
    for entry in WalkDir::new(root)
        .min_depth(1)
        .contents_first(true)
        .into_iter()
        .filter_map(Result::ok)
    {
        if entry.file_type().is_dir() {
            let _ = fs::remove_dir(entry.path());
        }
    }
}
