//! Progress reporting types consumed by callers of the engine.
//! Updates are batched (every 1000 files while scanning, every 100 while
//! processing) so the callback stays cheap even on very large trees.

/// Phase of the run an update belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// Enumerating source files; the total is not yet known.
    Scanning,
    /// Relocating files into buckets.
    Processing,
    /// Terminal update carrying the final counts.
    Done,
}

/// A single progress report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProgressUpdate {
    pub stage: Stage,
    /// Files seen so far (scanning) or handled so far (processing/done).
    pub current: u64,
    /// Total number of source files; `None` until scanning completes.
    pub total: Option<u64>,
}

/// Callback invoked by the engine with batched updates. Must be `Send` so the
/// engine can run on a worker thread owned by the caller.
pub type ProgressFn = Box<dyn FnMut(ProgressUpdate) + Send>;
