//! Destination filename construction.
//!
//! Two concerns live here:
//! - `destination_name` applies the configured rename policy to a source file.
//! - `unique_destination` resolves collisions by appending " (n)" before the
//!   extension until a free name is found.
//!
//! Notes:
//! - Non-UTF8 names are preserved via OsString assembly.
//! - This only decides names based on current filesystem state; the engine is
//!   the single mutator, so no locking is needed between check and use.

use std::ffi::{OsStr, OsString};
use std::path::{Path, PathBuf};

use crate::config::RenamePolicy;
use crate::errors::MergeError;

/// Upper bound on " (n)" probing before giving up on a name.
const MAX_SUFFIX_TRIES: u32 = 1_000_000;

/// Compute the destination filename for `src` under the given rename policy.
///
/// `processed` is the run-wide count of files that already reached a terminal
/// outcome; the sequential-prefix policy names this file `<prefix>_<processed+1>`
/// and keeps the original extension. The counter therefore advances over
/// skipped files too, which can leave gaps in the emitted sequence.
pub fn destination_name(
    src: &Path,
    policy: RenamePolicy,
    processed: u64,
    prefix: &str,
) -> OsString {
    let original: OsString = src
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_else(|| OsString::from("file"));

    match policy {
        RenamePolicy::Keep => original,
        RenamePolicy::ParentName => {
            let parent: OsString = src
                .parent()
                .and_then(|p| p.file_name())
                .map(|n| n.to_os_string())
                .unwrap_or_default();
            let mut name = OsString::new();
            name.push(&parent);
            name.push("_");
            name.push(&original);
            name
        }
        RenamePolicy::Prefix => {
            let mut name = OsString::from(format!("{prefix}_{}", processed + 1));
            if let Some(ext) = src.extension() {
                name.push(".");
                name.push(ext);
            }
            name
        }
    }
}

/// Return a free path for `name` inside `dir` by appending " (n)" before the
/// extension: "movie.mkv" -> "movie (1).mkv", ".env" -> ".env (1)",
/// "archive.tar.gz" -> "archive.tar (1).gz".
///
/// Does not create anything. Errs only when the probe cap is exhausted, which
/// the engine treats as a per-file failure.
pub fn unique_destination(dir: &Path, name: &OsStr) -> Result<PathBuf, MergeError> {
    let candidate = dir.join(name);
    if !candidate.exists() {
        return Ok(candidate);
    }

    let base = Path::new(name);
    let stem: OsString = base
        .file_stem()
        .map(|s| s.to_os_string())
        .unwrap_or_else(|| OsString::from(name));
    let ext: Option<OsString> = base.extension().map(|e| e.to_os_string());

    for n in 1..=MAX_SUFFIX_TRIES {
        let mut new_name = OsString::new();
        new_name.push(&stem);
        new_name.push(format!(" ({n})"));
        if let Some(ref e) = ext {
            new_name.push(".");
            new_name.push(e);
        }
        let probe = dir.join(&new_name);
        if !probe.exists() {
            return Ok(probe);
        }
    }

    Err(MergeError::NameSearchExhausted(candidate, MAX_SUFFIX_TRIES))
}
