use std::fs;
use std::path::PathBuf;

use folder_merger::config::paths::CONFIG_ENV_VAR;
use folder_merger::config::xml::{load_config_from_xml_env, load_config_from_xml_path};
use folder_merger::config::{ConflictPolicy, LogLevel, OperationMode, RenamePolicy};
use serial_test::serial;
use tempfile::tempdir;

#[test]
#[serial]
fn full_config_file_parses_into_config() {
    let td = tempdir().expect("tempdir");
    let path = td.path().join("config.xml");
    fs::write(
        &path,
        r#"<config>
  <source_dir>/data/in</source_dir>
  <target_dir>/data/out</target_dir>
  <files_per_folder>250</files_per_folder>
  <operation_mode>move</operation_mode>
  <rename_mode>parent_name</rename_mode>
  <conflict_mode>skip</conflict_mode>
  <custom_prefix>Part</custom_prefix>
  <log_level>debug</log_level>
  <log_file>/tmp/folder_merger.log</log_file>
</config>"#,
    )
    .expect("write config");

    let cfg = load_config_from_xml_path(&path).expect("load config");
    assert_eq!(cfg.source_dir, PathBuf::from("/data/in"));
    assert_eq!(cfg.target_dir, PathBuf::from("/data/out"));
    assert_eq!(cfg.files_per_folder, 250);
    assert_eq!(cfg.operation_mode, OperationMode::Move);
    assert_eq!(cfg.rename_mode, RenamePolicy::ParentName);
    assert_eq!(cfg.conflict_mode, ConflictPolicy::Skip);
    assert_eq!(cfg.custom_prefix, "Part");
    assert_eq!(cfg.log_level, LogLevel::Debug);
    assert_eq!(cfg.log_file, Some(PathBuf::from("/tmp/folder_merger.log")));
}

#[test]
#[serial]
fn whitespace_only_values_fall_back_to_defaults() {
    let td = tempdir().expect("tempdir");
    let path = td.path().join("config.xml");
    fs::write(
        &path,
        "<config>\n  <source_dir>/s</source_dir>\n  <operation_mode>   </operation_mode>\n  <custom_prefix> </custom_prefix>\n</config>",
    )
    .expect("write config");

    let cfg = load_config_from_xml_path(&path).expect("load config");
    assert_eq!(cfg.source_dir, PathBuf::from("/s"));
    assert_eq!(cfg.operation_mode, OperationMode::Copy);
    assert_eq!(cfg.custom_prefix, "File");
    assert_eq!(cfg.files_per_folder, 10_000);
}

#[test]
#[serial]
fn unknown_fields_are_rejected() {
    let td = tempdir().expect("tempdir");
    let path = td.path().join("config.xml");
    fs::write(
        &path,
        "<config>\n  <source_dir>/s</source_dir>\n  <shiny>1</shiny>\n</config>",
    )
    .expect("write config");

    assert!(
        load_config_from_xml_path(&path).is_err(),
        "an unknown field must not be silently dropped"
    );
}

#[test]
#[serial]
fn unrecognized_policy_value_is_rejected() {
    let td = tempdir().expect("tempdir");
    let path = td.path().join("config.xml");
    fs::write(
        &path,
        "<config>\n  <conflict_mode>zap</conflict_mode>\n</config>",
    )
    .expect("write config");

    let err = load_config_from_xml_path(&path).expect_err("must fail");
    assert!(
        format!("{err:#}").contains("invalid conflict_mode"),
        "unexpected error: {err:#}"
    );
}

#[test]
#[serial]
fn non_numeric_capacity_is_rejected() {
    let td = tempdir().expect("tempdir");
    let path = td.path().join("config.xml");
    fs::write(
        &path,
        "<config>\n  <files_per_folder>lots</files_per_folder>\n</config>",
    )
    .expect("write config");

    let err = load_config_from_xml_path(&path).expect_err("must fail");
    assert!(
        format!("{err:#}").contains("invalid files_per_folder"),
        "unexpected error: {err:#}"
    );
}

#[test]
#[serial]
fn env_loader_reads_the_pointed_file() {
    let td = tempdir().expect("tempdir");
    let path = td.path().join("config.xml");
    fs::write(
        &path,
        "<config>\n  <files_per_folder>7</files_per_folder>\n</config>",
    )
    .expect("write config");

    unsafe {
        std::env::set_var(CONFIG_ENV_VAR, &path);
    }
    let loaded = load_config_from_xml_env();
    unsafe {
        std::env::remove_var(CONFIG_ENV_VAR);
    }

    let cfg = loaded.expect("env load").expect("config should be present");
    assert_eq!(cfg.files_per_folder, 7);
}

#[test]
#[serial]
fn env_loader_fails_when_the_named_file_is_missing() {
    let td = tempdir().expect("tempdir");
    let path = td.path().join("nope.xml");

    unsafe {
        std::env::set_var(CONFIG_ENV_VAR, &path);
    }
    let result = load_config_from_xml_env();
    unsafe {
        std::env::remove_var(CONFIG_ENV_VAR);
    }

    assert!(
        result.is_err(),
        "an explicitly named config that cannot be read must be an error"
    );
}

#[test]
#[serial]
fn env_loader_is_inert_when_unset() {
    unsafe {
        std::env::remove_var(CONFIG_ENV_VAR);
    }
    let loaded = load_config_from_xml_env().expect("env load");
    assert!(loaded.is_none());
}
