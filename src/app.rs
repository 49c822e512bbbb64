//! Application orchestrator.
//! Loads/merges config, initializes logging, installs the interrupt handler,
//! validates paths, and drives the merge engine.

use anyhow::Result;
use folder_merger::MergeError;
use folder_merger::output as out;
use std::sync::{Arc, Mutex};
use tracing::{debug, error, info};

use folder_merger::config::paths::CONFIG_ENV_VAR;
use folder_merger::config::validate_and_normalize;
use folder_merger::config::xml::{
    ensure_default_config_exists, load_config_from_default_xml, load_config_from_xml_env,
};
use folder_merger::{CancelFlag, MergeEngine, ProgressUpdate, Stage, default_config_path};

use crate::logging::init_tracing;
use folder_merger::cli::Args;

/// Run the CLI application.
pub fn run(args: Args) -> Result<()> {
    // Handle --print-config before logging init
    if args.print_config {
        if let Ok(cfg_env) = std::env::var(CONFIG_ENV_VAR) {
            out::print_info(&format!(
                "Using {CONFIG_ENV_VAR} (explicit):\n  {}\n",
                cfg_env
            ));
            out::print_info(&format!(
                "To override, unset {CONFIG_ENV_VAR} or set it to another file."
            ));
            return Ok(());
        }
        match default_config_path() {
            Some(p) => {
                out::print_info(&format!(
                    "Default folder_merger config path:\n  {}\n",
                    p.display()
                ));
                if p.exists() {
                    out::print_info("A config file already exists at that location.");
                } else {
                    out::print_info(
                        "No config file exists there yet. Run without --print-config to create a template.",
                    );
                }
            }
            None => {
                out::print_error("Could not determine a default config path.");
            }
        }
        return Ok(());
    }

    // Create template config if none exists (before logging init). Without a
    // source on the command line there is nothing to run, so stop after
    // telling the user where the template went.
    if let Some(path) = ensure_default_config_exists() {
        out::print_success(&format!(
            "A template folder_merger config was written to: {}",
            path.display()
        ));
        if args.resolved_source().is_none() {
            out::print_info("Edit the file to set `source_dir` and optionally `target_dir`, `files_per_folder` and the policies. Example:\n\n<config>\n  <source_dir>/path/to/untidy/tree</source_dir>\n  <target_dir>/path/to/merged</target_dir>\n  <files_per_folder>10000</files_per_folder>\n  <operation_mode>copy</operation_mode>\n</config>\n");
            out::print_info(&format!(
                "Then re-run this command. To use a different location set {CONFIG_ENV_VAR}."
            ));
            return Ok(());
        }
    }

    // Build config: explicit env config wins, then the default file, then
    // built-in defaults. CLI flags override whatever was loaded.
    let mut cfg = match load_config_from_xml_env()? {
        Some(c) => c,
        None => load_config_from_default_xml()?.unwrap_or_default(),
    };
    args.apply_overrides(&mut cfg);

    // Initialize logging and capture the guard so we can drop it on signal
    let guard_opt: Option<tracing_appender::non_blocking::WorkerGuard> =
        init_tracing(&cfg.log_level, cfg.log_file.as_deref(), args.json).map_err(|e| {
            out::print_error(&format!("Failed to initialize logging: {}", e));
            e
        })?;

    // Guard needs to be dropped on SIGINT to flush logs
    let guard_slot = Arc::new(Mutex::new(guard_opt));
    let cancel = CancelFlag::new();
    {
        let guard_slot = Arc::clone(&guard_slot);
        let cancel = cancel.clone();
        ctrlc::set_handler(move || {
            cancel.set();
            out::print_warn("Received interrupt; finishing the current file and stopping...");
            if let Ok(mut g) = guard_slot.lock() {
                let _ = g.take(); // drop guard here to flush tracing_appender
            }
        })
        .expect("failed to install signal handler");
    }

    if cancel.is_set() {
        return Ok(());
    }

    debug!("Starting folder_merger: {:?}", args);

    // Main run (so we can drop guard after)
    let result = (|| -> Result<()> {
        // Ensure required directories exist and canonicalize paths
        validate_and_normalize(&mut cfg)?;

        let mut engine =
            MergeEngine::new(cancel.clone()).with_progress(|u: ProgressUpdate| match u.stage {
                Stage::Scanning => info!(found = u.current, "scan progress"),
                Stage::Processing => info!(done = u.current, total = u.total, "merge progress"),
                Stage::Done => debug!(done = u.current, total = u.total, "engine finished"),
            });

        match engine.run(&cfg) {
            Ok(report) => {
                out::print_user(&format!(
                    "Processed {} of {} files.",
                    report.processed, report.total
                ));
                if report.cancelled {
                    out::print_warn("Run was cancelled before completing.");
                } else {
                    out::print_success("Merge complete.");
                }
                Ok(())
            }
            Err(e) => {
                if let Some(me) = e.downcast_ref::<MergeError>() {
                    match me {
                        MergeError::SourceNotFound(path) => {
                            error!(kind = "source_not_found", path = %path.display(), "Merge failed")
                        }
                        MergeError::SourceNotDirectory(path) => {
                            error!(kind = "source_not_directory", path = %path.display(), "Merge failed")
                        }
                        MergeError::DestinationUnusable { path, source } => {
                            error!(kind = "destination_unusable", path = %path.display(), error = %source, "Merge failed")
                        }
                        MergeError::NameSearchExhausted(path, tries) => {
                            error!(kind = "name_search_exhausted", path = %path.display(), tries, "Merge failed")
                        }
                    }
                } else {
                    error!(error = ?e, "Merge failed");
                }
                Err(e)
            }
        }
    })();

    // Ensure logs are flushed before exit
    if let Ok(mut g) = guard_slot.lock() {
        let _ = g.take();
    }

    result
}
