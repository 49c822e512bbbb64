//! Config module.
//! Provides configuration types, default paths, XML loading, and validation.

pub mod paths;
pub mod types;
pub mod validate;
pub mod xml;

pub use paths::{default_config_path, default_log_path, path_has_symlink_ancestor};
pub use types::{Config, ConflictPolicy, LogLevel, OperationMode, RenamePolicy};
pub use validate::validate_and_normalize;
pub use xml::{
    create_template_config, ensure_default_config_exists, load_config_from_default_xml,
    load_config_from_xml_env, load_config_from_xml_path,
};

/// Defaults shared across submodules.
pub const FILES_PER_FOLDER_DEFAULT: u64 = 10_000;
pub const CUSTOM_PREFIX_DEFAULT: &str = "File";
