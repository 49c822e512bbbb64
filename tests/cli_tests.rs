use clap::Parser;
use folder_merger::cli::Args;
use folder_merger::config::types::{Config, ConflictPolicy, LogLevel, OperationMode, RenamePolicy};
use std::path::PathBuf;

#[test]
fn resolved_source_precedence_flag_over_positional() {
    let args = Args::parse_from(["folder_merger", "--source-dir", "/tmp/flag_path", "/tmp/pos"]);
    let src = args.resolved_source().unwrap();
    assert_eq!(src, PathBuf::from("/tmp/flag_path"));
}

#[test]
fn resolved_source_uses_positional_when_flag_absent() {
    let args = Args::parse_from(["folder_merger", "/tmp/pos_path"]);
    let src = args.resolved_source().unwrap();
    assert_eq!(src, PathBuf::from("/tmp/pos_path"));
}

#[test]
fn quoted_and_slash_terminated_paths_are_sanitized() {
    let args = Args::parse_from(["folder_merger", "'/tmp/quoted path/'"]);
    let src = args.resolved_source().unwrap();
    assert_eq!(src, PathBuf::from("/tmp/quoted path"));
}

#[test]
fn stray_quote_arguments_sanitize_to_an_empty_path() {
    // A lone quote is not a matched pair; it must strip cleanly, not slice
    // out of bounds.
    for arg in ["\"", "'", "\"\"", "''"] {
        let args = Args::parse_from(["folder_merger", arg]);
        let src = args.resolved_source().expect("positional present");
        assert_eq!(src, PathBuf::new(), "argument {arg:?}");
    }
}

#[test]
fn effective_log_level_precedence() {
    let args = Args::parse_from(["folder_merger", "--debug", "--log-level", "quiet"]);
    let lvl = args.effective_log_level().unwrap();
    assert_eq!(lvl, LogLevel::Debug); // --debug wins

    let args = Args::parse_from(["folder_merger", "--log-level", "info"]);
    let lvl = args.effective_log_level().unwrap();
    assert_eq!(lvl, LogLevel::Info);
}

#[test]
fn apply_overrides_sets_every_field() {
    let args = Args::parse_from([
        "folder_merger",
        "/in",
        "--target-dir",
        "/out",
        "--files-per-folder",
        "250",
        "--mode",
        "move",
        "--rename",
        "prefix",
        "--on-conflict",
        "skip",
        "--prefix",
        "Part",
        "--log-level",
        "info",
        "--log-file",
        "/tmp/fm.log",
    ]);
    let mut cfg = Config::default();
    args.apply_overrides(&mut cfg);

    assert_eq!(cfg.source_dir, PathBuf::from("/in"));
    assert_eq!(cfg.target_dir, PathBuf::from("/out"));
    assert_eq!(cfg.files_per_folder, 250);
    assert_eq!(cfg.operation_mode, OperationMode::Move);
    assert_eq!(cfg.rename_mode, RenamePolicy::Prefix);
    assert_eq!(cfg.conflict_mode, ConflictPolicy::Skip);
    assert_eq!(cfg.custom_prefix, "Part");
    assert_eq!(cfg.log_level, LogLevel::Info);
    assert_eq!(cfg.log_file, Some(PathBuf::from("/tmp/fm.log")));
}

#[test]
fn unset_flags_leave_the_config_alone() {
    let args = Args::parse_from(["folder_merger"]);
    let mut cfg = Config::default();
    cfg.files_per_folder = 42;
    cfg.operation_mode = OperationMode::Move;
    args.apply_overrides(&mut cfg);

    assert_eq!(cfg.files_per_folder, 42);
    assert_eq!(cfg.operation_mode, OperationMode::Move);
}

#[test]
fn unknown_policy_values_are_usage_errors() {
    assert!(Args::try_parse_from(["folder_merger", "--mode", "shuffle"]).is_err());
    assert!(Args::try_parse_from(["folder_merger", "--rename", "scramble"]).is_err());
    assert!(Args::try_parse_from(["folder_merger", "--on-conflict", "explode"]).is_err());
}
