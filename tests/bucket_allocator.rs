use std::fs;

use folder_merger::buckets::BucketAllocator;
use tempfile::tempdir;

#[test]
fn allocator_tops_up_existing_buckets_then_mints_fresh_ones() {
    let td = tempdir().expect("tempdir");
    let m1 = td.path().join("Merged_1");
    let m2 = td.path().join("Merged_2");
    fs::create_dir_all(&m1).expect("mkdir");
    fs::create_dir_all(&m2).expect("mkdir");
    for i in 0..3 {
        fs::write(m1.join(format!("f{i}.txt")), "x").expect("write");
    }
    fs::write(m2.join("g.txt"), "x").expect("write");

    let mut alloc = BucketAllocator::new(td.path(), 3);

    // Merged_1 is full and skipped outright.
    let first = alloc.next_bucket().expect("bucket");
    assert_eq!(first.path, m2);
    assert_eq!(first.remaining, 2);

    let second = alloc.next_bucket().expect("bucket");
    assert_eq!(second.path, td.path().join("Merged_3"));
    assert_eq!(second.remaining, 3);
    assert!(second.path.is_dir(), "fresh buckets exist on disk when yielded");

    let third = alloc.next_bucket().expect("bucket");
    assert_eq!(third.path, td.path().join("Merged_4"));
    assert_eq!(third.remaining, 3);
}

#[test]
fn allocator_creates_a_missing_destination_root() {
    let td = tempdir().expect("tempdir");
    let root = td.path().join("not").join("yet");

    let mut alloc = BucketAllocator::new(&root, 5);
    let bucket = alloc.next_bucket().expect("bucket");

    assert_eq!(bucket.path, root.join("Merged_1"));
    assert_eq!(bucket.remaining, 5);
    assert!(bucket.path.is_dir());
}

#[test]
fn allocator_degrades_to_fixed_sequence_when_a_bucket_cannot_be_inspected() {
    let td = tempdir().expect("tempdir");
    let m1 = td.path().join("Merged_1");
    let m2 = td.path().join("Merged_2");
    fs::create_dir_all(&m1).expect("mkdir");
    fs::create_dir_all(&m2).expect("mkdir");
    for i in 0..4 {
        fs::write(m2.join(format!("f{i}.txt")), "x").expect("write");
    }

    let mut alloc = BucketAllocator::new(td.path(), 3);
    // Removing an indexed folder makes its occupancy count fail.
    fs::remove_dir(&m1).expect("rmdir");

    // Numbering restarts at 1; the vanished folder comes back.
    let first = alloc.next_bucket().expect("bucket");
    assert_eq!(first.path, m1);
    assert_eq!(first.remaining, 3);
    assert!(m1.is_dir(), "fallback recreates the missing folder");

    // Existing contents no longer count: Merged_2 holds four files over a
    // limit of three yet is handed out with every slot free.
    let second = alloc.next_bucket().expect("bucket");
    assert_eq!(second.path, m2);
    assert_eq!(second.remaining, 3);

    let third = alloc.next_bucket().expect("bucket");
    assert_eq!(third.path, td.path().join("Merged_3"));
    assert_eq!(third.remaining, 3);
}

#[test]
fn allocator_fails_when_even_the_fallback_sequence_cannot_create_folders() {
    let td = tempdir().expect("tempdir");
    let root = td.path().join("root_file");
    fs::write(&root, "not a directory").expect("write");

    // Scanning a regular file fails, so the allocator starts out degraded;
    // creating Merged_1 under it then fails too, which is fatal.
    let mut alloc = BucketAllocator::new(&root, 3);
    assert!(alloc.next_bucket().is_err());
}
