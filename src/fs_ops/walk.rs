//! Depth-first source enumeration.
//!
//! Yields every regular file under a root. Unreadable subtrees are skipped
//! silently and symlinks are not followed. The shared cancel flag is checked
//! on every pull; once set, the iterator is exhausted for good. Callers tell
//! "cancelled" apart from "tree exhausted" via the flag, not the iterator.

use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::cancel::CancelFlag;

pub struct SourceWalker {
    inner: walkdir::IntoIter,
    cancel: CancelFlag,
}

impl SourceWalker {
    pub fn new(root: &Path, cancel: CancelFlag) -> Self {
        Self {
            inner: WalkDir::new(root).min_depth(1).into_iter(),
            cancel,
        }
    }
}

impl Iterator for SourceWalker {
    type Item = PathBuf;

    fn next(&mut self) -> Option<PathBuf> {
        loop {
            if self.cancel.is_set() {
                return None;
            }
            match self.inner.next()? {
                Ok(entry) if entry.file_type().is_file() => return Some(entry.into_path()),
                // Directories, symlinks, and traversal errors are all passed over.
                _ => continue,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn yields_files_at_every_depth() {
        let td = tempdir().unwrap();
        fs::write(td.path().join("top.txt"), b"x").unwrap();
        fs::create_dir_all(td.path().join("a/b")).unwrap();
        fs::write(td.path().join("a/mid.txt"), b"x").unwrap();
        fs::write(td.path().join("a/b/deep.txt"), b"x").unwrap();

        let names: BTreeSet<String> = SourceWalker::new(td.path(), CancelFlag::new())
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        let expected: BTreeSet<String> = ["top.txt", "mid.txt", "deep.txt"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        assert_eq!(names, expected);
    }

    #[test]
    fn directories_are_not_yielded() {
        let td = tempdir().unwrap();
        fs::create_dir_all(td.path().join("only/dirs/here")).unwrap();
        assert_eq!(SourceWalker::new(td.path(), CancelFlag::new()).count(), 0);
    }

    #[test]
    fn cancelled_walker_yields_nothing() {
        let td = tempdir().unwrap();
        fs::write(td.path().join("a.txt"), b"x").unwrap();
        let cancel = CancelFlag::new();
        cancel.set();
        assert_eq!(SourceWalker::new(td.path(), cancel).count(), 0);
    }

    #[test]
    fn cancel_mid_walk_stops_iteration() {
        let td = tempdir().unwrap();
        for i in 0..20 {
            fs::write(td.path().join(format!("f{i}.txt")), b"x").unwrap();
        }
        let cancel = CancelFlag::new();
        let mut walker = SourceWalker::new(td.path(), cancel.clone());
        assert!(walker.next().is_some());
        cancel.set();
        assert!(walker.next().is_none());
    }
}
