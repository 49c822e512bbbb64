//! Distribution engine: drives one merge run end to end.
//!
//! A run moves through scanning (materialize the file list), processing
//! (relocate file by file, advancing the bucket cursor whenever capacity runs
//! out), an optional cleanup sweep (move mode), and a final report. Per-file
//! failures are logged and skipped; only an unusable source or destination
//! root ends the run early.

use anyhow::Result;
use std::path::PathBuf;
use tracing::{error, info};

use crate::buckets::BucketAllocator;
use crate::cancel::CancelFlag;
use crate::config::{Config, ConflictPolicy, OperationMode};
use crate::errors::MergeError;
use crate::fs_ops::{
    SourceWalker, copy_file, destination_name, move_file, remove_empty_dirs, try_remove_parent,
    unique_destination,
};
use crate::progress::{ProgressFn, ProgressUpdate, Stage};

/// Scanning updates fire every this many discovered files.
const SCAN_BATCH: u64 = 1000;
/// Processing updates fire every this many handled files.
const PROCESS_BATCH: u64 = 100;

/// Final accounting for one run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MergeReport {
    /// Files that reached a terminal outcome (relocated or skipped).
    pub processed: u64,
    /// Files found by the scan.
    pub total: u64,
    /// True when the run stopped because the cancel flag was set.
    pub cancelled: bool,
}

/// One engine instance runs at most one merge at a time. The cancel flag is
/// handed in at construction so the caller can keep a clone and trip it from
/// another thread (signal handler, interface thread).
pub struct MergeEngine {
    cancel: CancelFlag,
    progress: Option<ProgressFn>,
}

impl MergeEngine {
    pub fn new(cancel: CancelFlag) -> Self {
        Self {
            cancel,
            progress: None,
        }
    }

    /// Attach a progress callback receiving batched updates.
    pub fn with_progress(mut self, f: impl FnMut(ProgressUpdate) + Send + 'static) -> Self {
        self.progress = Some(Box::new(f));
        self
    }

    fn report(&mut self, stage: Stage, current: u64, total: Option<u64>) {
        if let Some(cb) = self.progress.as_mut() {
            cb(ProgressUpdate {
                stage,
                current,
                total,
            });
        }
    }

    /// Execute one merge run.
    ///
    /// `cfg` is expected to be validated (existing readable source, capacity
    /// of at least 1); behavior with a zero capacity is unspecified. The
    /// first bucket is prepared even when the source holds no files, so an
    /// empty run still leaves `Merged_1` behind.
    pub fn run(&mut self, cfg: &Config) -> Result<MergeReport> {
        if !cfg.source_dir.exists() {
            return Err(MergeError::SourceNotFound(cfg.source_dir.clone()).into());
        }
        if !cfg.source_dir.is_dir() {
            return Err(MergeError::SourceNotDirectory(cfg.source_dir.clone()).into());
        }

        info!(
            source = %cfg.source_dir.display(),
            target = %cfg.target_dir.display(),
            limit = cfg.files_per_folder,
            mode = %cfg.operation_mode,
            rename = %cfg.rename_mode,
            conflict = %cfg.conflict_mode,
            "starting merge run"
        );

        // Scanning: the total must be known before processing starts.
        let mut files: Vec<PathBuf> = Vec::new();
        for path in SourceWalker::new(&cfg.source_dir, self.cancel.clone()) {
            files.push(path);
            if files.len() as u64 % SCAN_BATCH == 0 {
                self.report(Stage::Scanning, files.len() as u64, None);
            }
        }
        if self.cancel.is_set() {
            info!("merge cancelled during scan");
            return Ok(MergeReport {
                processed: 0,
                total: files.len() as u64,
                cancelled: true,
            });
        }
        let total = files.len() as u64;
        info!(total, "scan complete");

        // Processing: the initial bucket is pulled before the loop.
        let mut processed: u64 = 0;
        let mut allocator = BucketAllocator::new(&cfg.target_dir, cfg.files_per_folder);
        let first = self.pull_bucket(&mut allocator, cfg)?;
        let (mut bucket_path, mut slots_left) = (first.path, first.remaining);
        info!(bucket = %bucket_path.display(), remaining = slots_left, "initial bucket ready");

        for src in &files {
            if self.cancel.is_set() {
                info!("merge cancelled during processing");
                break;
            }

            if slots_left == 0 {
                let next = self.pull_bucket(&mut allocator, cfg)?;
                bucket_path = next.path;
                slots_left = next.remaining;
                info!(bucket = %bucket_path.display(), remaining = slots_left, "switched bucket");
            }

            let name = destination_name(src, cfg.rename_mode, processed, &cfg.custom_prefix);
            let mut dest = bucket_path.join(&name);

            if dest.exists() {
                match cfg.conflict_mode {
                    ConflictPolicy::Skip => {
                        info!(dest = %dest.display(), "skipping existing destination");
                        processed += 1;
                        continue;
                    }
                    ConflictPolicy::Overwrite => {}
                    ConflictPolicy::AutoRename => match unique_destination(&bucket_path, &name) {
                        Ok(free) => dest = free,
                        Err(e) => {
                            error!(file = %src.display(), error = %e, "could not resolve a unique name");
                            continue;
                        }
                    },
                }
            }

            let outcome = match cfg.operation_mode {
                OperationMode::Copy => copy_file(src, &dest),
                OperationMode::Move => {
                    let moved = move_file(src, &dest);
                    if moved.is_ok() {
                        try_remove_parent(src, &cfg.source_dir);
                    }
                    moved
                }
            };

            match outcome {
                Ok(()) => {
                    slots_left -= 1;
                    processed += 1;
                    if processed % PROCESS_BATCH == 0 {
                        self.report(Stage::Processing, processed, Some(total));
                    }
                }
                Err(e) => {
                    error!(file = %src.display(), error = %e, "failed to relocate file");
                }
            }
        }

        // Cleanup: authoritative bottom-up sweep, move mode only.
        let cancelled = self.cancel.is_set();
        if cfg.operation_mode.is_move() && !cancelled {
            info!(root = %cfg.source_dir.display(), "sweeping empty source directories");
            remove_empty_dirs(&cfg.source_dir);
        }

        info!(processed, total, cancelled, "merge run finished");
        self.report(Stage::Done, processed, Some(total));

        Ok(MergeReport {
            processed,
            total,
            cancelled,
        })
    }

    /// Advance the allocator; a failure here means the destination root is
    /// unusable even by the fallback sequence and the run cannot continue.
    fn pull_bucket(
        &mut self,
        allocator: &mut BucketAllocator,
        cfg: &Config,
    ) -> Result<crate::buckets::Bucket> {
        allocator.next_bucket().map_err(|e| {
            MergeError::DestinationUnusable {
                path: cfg.target_dir.clone(),
                source: e,
            }
            .into()
        })
    }
}
