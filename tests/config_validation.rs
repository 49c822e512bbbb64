use assert_fs::TempDir;
use folder_merger::config::{validate_and_normalize, Config};
use std::fs;

#[test]
fn target_is_created_when_missing() {
    let td = TempDir::new().unwrap();
    let root = dunce::canonicalize(td.path()).unwrap();
    let source = root.join("incoming");
    fs::create_dir_all(&source).unwrap();
    let target = root.join("merged_out");
    assert!(!target.exists());

    let mut cfg = Config::new(&source, &target, 100);
    validate_and_normalize(&mut cfg).expect("validation succeeds creating target_dir");
    assert!(target.exists(), "target_dir should be created");
}

#[test]
fn unset_target_falls_back_to_the_source_root() {
    let td = TempDir::new().unwrap();
    let root = dunce::canonicalize(td.path()).unwrap();
    let source = root.join("incoming");
    fs::create_dir_all(&source).unwrap();

    let mut cfg = Config::new(&source, "", 100);
    validate_and_normalize(&mut cfg).expect("validation succeeds with defaulted target_dir");
    assert_eq!(cfg.target_dir, source);
}

#[test]
fn missing_source_is_rejected() {
    let td = TempDir::new().unwrap();
    let root = dunce::canonicalize(td.path()).unwrap();
    let mut cfg = Config::new(root.join("nope"), &root, 100);
    let err = validate_and_normalize(&mut cfg).unwrap_err();
    assert!(format!("{err}").contains("source_dir does not exist"));
}

#[test]
fn source_that_is_a_file_is_rejected() {
    let td = TempDir::new().unwrap();
    let root = dunce::canonicalize(td.path()).unwrap();
    let file = root.join("plain.txt");
    fs::write(&file, "x").unwrap();
    let mut cfg = Config::new(&file, &root, 100);
    let err = validate_and_normalize(&mut cfg).unwrap_err();
    assert!(format!("{err}").contains("is not a directory"));
}

#[cfg(unix)]
#[test]
fn symlinked_source_normalizes_to_the_real_path() {
    use std::os::unix::fs as unix_fs;
    let td = TempDir::new().unwrap();
    let root = dunce::canonicalize(td.path()).unwrap();
    let real = root.join("real_root");
    fs::create_dir_all(&real).unwrap();
    let link = root.join("link_root");
    unix_fs::symlink(&real, &link).unwrap();

    // Both roots settle on the resolved path so later comparisons are stable.
    let mut cfg = Config::new(&link, "", 100);
    validate_and_normalize(&mut cfg).expect("validation succeeds through the symlink");
    assert_eq!(cfg.source_dir, real);
    assert_eq!(cfg.target_dir, real);
}
