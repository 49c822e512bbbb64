//! Filesystem operations: modularized.

mod helpers;
mod naming;
mod prune;
mod relocate;
mod walk;

pub use helpers::{io_error_with_help, io_error_with_help_io};
pub use naming::{destination_name, unique_destination};
pub use prune::{remove_empty_dirs, try_remove_parent};
pub use relocate::{copy_file, move_file};
pub use walk::SourceWalker;
