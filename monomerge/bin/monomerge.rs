//! `monomerge` builds a hard-linked union of several directory trees.
//!
//! ## Usage
//!
//! ```bash
//! monomerge --target composite overlay/site overlay/base
//! ```
//!
//! or, with an overlay manifest:
//!
//! ```bash
//! monomerge --manifest monomerge.toml
//! ```
//!
//! Run without arguments, `monomerge.toml` in the current directory is used if present.
//!
//! Warnings are logged to stderr. Set `RUST_LOG` to override the log filter.

use std::process::ExitCode;

use clap::{error::ErrorKind, CommandFactory, Parser};
use monomerge::{
    cli::{
        MonomergeArgs, EXIT_FAILURE, EXIT_PRECONDITION, EXIT_SUCCESS, EXIT_USAGE, EXIT_WARNINGS,
    },
    config::{MergeConfig, OverlayManifest},
    utils, MonomergeError,
};
use tracing_subscriber::EnvFilter;

//--------------------------------------------------------------------------------------------------
// Functions: main
//--------------------------------------------------------------------------------------------------

fn main() -> ExitCode {
    // Parse command line arguments
    let args = MonomergeArgs::parse();
    init_tracing(&args);

    // Resolve the merge from the command line and the optional manifest
    let manifest_path = args.manifest.clone().or_else(|| {
        if args.sources.is_empty() && args.target.is_none() {
            OverlayManifest::find_in(".")
        } else {
            None
        }
    });

    let manifest = match manifest_path.map(OverlayManifest::load).transpose() {
        Ok(manifest) => manifest,
        Err(e) => return exit_with(&e),
    };

    let config = match MergeConfig::resolve(args.sources, args.target, manifest) {
        Ok(config) => config,
        Err(MonomergeError::MissingSetting(setting)) => {
            MonomergeArgs::command()
                .error(
                    ErrorKind::MissingRequiredArgument,
                    format!("no {} given on the command line or in a manifest", setting),
                )
                .exit();
        }
        Err(e) => return exit_with(&e),
    };

    // Validate and run the merge
    let report = match monomerge::merge(&config) {
        Ok(report) => report,
        Err(e) => return exit_with(&e),
    };

    if args.strict && !report.is_clean() {
        tracing::error!(
            "merge produced {} warning(s) in strict mode",
            report.get_warnings().len()
        );
        return ExitCode::from(EXIT_WARNINGS);
    }

    ExitCode::from(EXIT_SUCCESS)
}

//--------------------------------------------------------------------------------------------------
// Functions: *
//--------------------------------------------------------------------------------------------------

/// Installs the global tracing subscriber, writing to stderr.
fn init_tracing(args: &MonomergeArgs) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(args.default_log_directive()));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(utils::is_ansi_interactive_terminal())
        .with_target(false)
        .init();
}

/// Logs `error` and maps it to the process exit code.
fn exit_with(error: &MonomergeError) -> ExitCode {
    let code = match error {
        MonomergeError::ManifestRead { .. } | MonomergeError::ManifestParse { .. } => {
            EXIT_PRECONDITION
        }
        MonomergeError::MissingSetting(_) => EXIT_USAGE,
        e if e.is_precondition() => EXIT_PRECONDITION,
        _ => EXIT_FAILURE,
    };

    tracing::error!("{}", error);
    ExitCode::from(code)
}
