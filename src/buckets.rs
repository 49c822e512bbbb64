//! Bucket discovery and allocation.
//!
//! Destination folders are named `Merged_<N>` for a positive ordinal N. A run
//! first tops up under-filled ordinals 1..=max (creating missing ones), then
//! mints fresh ordinals past the maximum for as long as files keep coming.
//! If the destination root cannot be scanned, allocation degrades to creating
//! `Merged_1`, `Merged_2`, ... at full capacity and ignoring what exists.

use std::collections::BTreeMap;
use std::ffi::{OsStr, OsString};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::fs_ops::io_error_with_help_io;

/// A writable destination folder and how many files still fit in it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bucket {
    pub path: PathBuf,
    pub remaining: u64,
}

/// Result of scanning the destination root for existing buckets.
#[derive(Debug, Default)]
pub struct BucketIndex {
    /// Ordinal -> directory name as found on disk. The on-disk spelling is
    /// kept so a folder like "Merged_007" keeps being filled under its own
    /// name while counting as ordinal 7.
    pub names: BTreeMap<u64, OsString>,
    pub max_ordinal: u64,
}

/// Parse a directory name of the form `Merged_<digits>`.
fn parse_bucket_ordinal(name: &OsStr) -> Option<u64> {
    let digits = name.to_str()?.strip_prefix("Merged_")?;
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse::<u64>().ok()
}

/// Scan `root` for bucket directories, creating the root if absent.
/// Non-matching children are left alone.
pub fn discover(root: &Path) -> io::Result<BucketIndex> {
    fs::create_dir_all(root).map_err(io_error_with_help_io("create target root", root))?;

    let mut index = BucketIndex::default();
    for entry in fs::read_dir(root)? {
        let entry = entry?;
        if !entry.file_type()?.is_dir() {
            continue;
        }
        let name = entry.file_name();
        if let Some(ordinal) = parse_bucket_ordinal(&name) {
            index.names.insert(ordinal, name);
            index.max_ordinal = index.max_ordinal.max(ordinal);
        }
    }
    debug!(
        root = %root.display(),
        buckets = index.names.len(),
        max_ordinal = index.max_ordinal,
        "destination scan complete"
    );
    Ok(index)
}

/// Count regular files directly inside `dir` (non-recursive).
fn count_files(dir: &Path) -> io::Result<u64> {
    let mut count = 0;
    for entry in fs::read_dir(dir)? {
        if entry?.file_type()?.is_file() {
            count += 1;
        }
    }
    Ok(count)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Backfill,
    Overflow,
    Fallback,
}

/// Forward-only cursor over writable buckets. Each `next_bucket` call yields
/// a directory that exists on disk together with its remaining capacity;
/// full buckets are skipped and never revisited.
pub struct BucketAllocator {
    root: PathBuf,
    limit: u64,
    names: BTreeMap<u64, OsString>,
    max_ordinal: u64,
    cursor: u64,
    phase: Phase,
}

impl BucketAllocator {
    /// Scan the destination root and position the cursor at ordinal 1.
    /// A scan failure is logged and drops the allocator straight into the
    /// fallback sequence instead of aborting.
    pub fn new(root: &Path, limit: u64) -> Self {
        match discover(root) {
            Ok(index) => Self {
                root: root.to_path_buf(),
                limit,
                names: index.names,
                max_ordinal: index.max_ordinal,
                cursor: 1,
                phase: Phase::Backfill,
            },
            Err(e) => {
                warn!(
                    root = %root.display(),
                    error = %e,
                    "could not scan destination root, using fallback bucket sequence"
                );
                Self {
                    root: root.to_path_buf(),
                    limit,
                    names: BTreeMap::new(),
                    max_ordinal: 0,
                    cursor: 1,
                    phase: Phase::Fallback,
                }
            }
        }
    }

    /// Yield the next bucket with free capacity. Errors in the backfill and
    /// overflow phases degrade to the fallback sequence; an error while
    /// already in fallback propagates and ends the run.
    pub fn next_bucket(&mut self) -> io::Result<Bucket> {
        loop {
            match self.phase {
                Phase::Backfill => {
                    if self.cursor > self.max_ordinal {
                        self.phase = Phase::Overflow;
                        self.cursor = self.max_ordinal + 1;
                        continue;
                    }
                    let ordinal = self.cursor;
                    self.cursor += 1;
                    match self.backfill_bucket(ordinal) {
                        Ok(Some(bucket)) => return Ok(bucket),
                        Ok(None) => continue, // already full, skip for good
                        Err(e) => self.degrade("inspect existing bucket", e),
                    }
                }
                Phase::Overflow => {
                    let ordinal = self.cursor;
                    match self.create_bucket(ordinal) {
                        Ok(bucket) => {
                            self.cursor += 1;
                            return Ok(bucket);
                        }
                        Err(e) => self.degrade("create overflow bucket", e),
                    }
                }
                Phase::Fallback => {
                    let bucket = self.create_bucket(self.cursor)?;
                    self.cursor += 1;
                    return Ok(bucket);
                }
            }
        }
    }

    /// Existing ordinal: top up if under the limit. Missing ordinal: create
    /// fresh at full capacity.
    fn backfill_bucket(&self, ordinal: u64) -> io::Result<Option<Bucket>> {
        if let Some(name) = self.names.get(&ordinal) {
            let path = self.root.join(name);
            let occupancy = count_files(&path)?;
            let remaining = self.limit.saturating_sub(occupancy);
            if remaining == 0 {
                return Ok(None);
            }
            Ok(Some(Bucket { path, remaining }))
        } else {
            self.create_bucket(ordinal).map(Some)
        }
    }

    fn create_bucket(&self, ordinal: u64) -> io::Result<Bucket> {
        let path = self.root.join(format!("Merged_{ordinal}"));
        fs::create_dir_all(&path).map_err(io_error_with_help_io("create merged folder", &path))?;
        Ok(Bucket {
            path,
            remaining: self.limit,
        })
    }

    fn degrade(&mut self, what: &str, e: io::Error) {
        warn!(
            root = %self.root.display(),
            error = %e,
            "failed to {what}, switching to fallback bucket sequence"
        );
        self.phase = Phase::Fallback;
        self.cursor = 1;
    }
}
