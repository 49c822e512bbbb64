use std::fs;
use std::path::Path;

use folder_merger::{CancelFlag, Config, MergeEngine};
use tempfile::tempdir;

fn count_files(dir: &Path) -> usize {
    fs::read_dir(dir)
        .map(|rd| {
            rd.filter(|e| {
                e.as_ref()
                    .map(|e| e.file_type().map(|t| t.is_file()).unwrap_or(false))
                    .unwrap_or(false)
            })
            .count()
        })
        .unwrap_or(0)
}

#[test]
fn ten_files_with_capacity_three_fill_four_buckets() {
    let src = tempdir().expect("src tempdir");
    let dst = tempdir().expect("dst tempdir");
    for i in 0..10 {
        fs::write(src.path().join(format!("f{i:02}.dat")), format!("{i}")).expect("write");
    }

    let cfg = Config::new(src.path(), dst.path(), 3);
    let report = MergeEngine::new(CancelFlag::new())
        .run(&cfg)
        .expect("merge run");
    assert_eq!(report.processed, 10);
    assert_eq!(report.total, 10);

    assert_eq!(count_files(&dst.path().join("Merged_1")), 3);
    assert_eq!(count_files(&dst.path().join("Merged_2")), 3);
    assert_eq!(count_files(&dst.path().join("Merged_3")), 3);
    assert_eq!(count_files(&dst.path().join("Merged_4")), 1);
    assert!(
        !dst.path().join("Merged_5").exists(),
        "no spare bucket should be minted"
    );
}

#[test]
fn capacity_one_gives_each_file_its_own_bucket() {
    let src = tempdir().expect("src tempdir");
    let dst = tempdir().expect("dst tempdir");
    for name in ["x.txt", "y.txt", "z.txt"] {
        fs::write(src.path().join(name), name).expect("write");
    }

    let cfg = Config::new(src.path(), dst.path(), 1);
    let report = MergeEngine::new(CancelFlag::new())
        .run(&cfg)
        .expect("merge run");
    assert_eq!(report.processed, 3);

    for i in 1..=3 {
        assert_eq!(
            count_files(&dst.path().join(format!("Merged_{i}"))),
            1,
            "bucket {i} should hold exactly one file"
        );
    }
}
