use std::path::PathBuf;

use clap::{
    builder::styling::{AnsiColor, Effects, Styles},
    Parser,
};

//--------------------------------------------------------------------------------------------------
// Constants
//--------------------------------------------------------------------------------------------------

/// Exit code for a merge that ran, warnings or not.
pub const EXIT_SUCCESS: u8 = 0;

/// Exit code for an unexpected error outside the merge.
pub const EXIT_FAILURE: u8 = 1;

/// Exit code for invalid usage. Matches the code clap uses for argument errors.
pub const EXIT_USAGE: u8 = 2;

/// Exit code for a failed pre-flight check or an unreadable manifest.
pub const EXIT_PRECONDITION: u8 = 3;

/// Exit code for a merge that produced warnings while `--strict` was set.
pub const EXIT_WARNINGS: u8 = 4;

//--------------------------------------------------------------------------------------------------
// Types
//--------------------------------------------------------------------------------------------------

/// monomerge - Build a hard-linked union of several directory trees
///
/// Sources are listed highest priority first. For every name present in several sources, the
/// first source's entry wins; directories present in several sources are merged recursively.
#[derive(Debug, Parser)]
#[command(name = "monomerge", author, about, version, styles=styles())]
pub struct MonomergeArgs {
    /// Source directories, highest priority first
    #[arg(value_name = "SOURCE")]
    pub sources: Vec<PathBuf>,

    /// Directory to create the merged tree in. Must not exist yet
    #[arg(short, long, value_name = "TARGET")]
    pub target: Option<PathBuf>,

    /// Overlay manifest supplying the target and sources
    #[arg(short, long, value_name = "FILE")]
    pub manifest: Option<PathBuf>,

    /// Exit with a non-zero status if the merge produced any warnings
    #[arg(long)]
    pub strict: bool,

    /// Enable verbose logging
    #[arg(short, long, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Only log errors
    #[arg(short, long)]
    pub quiet: bool,
}

//--------------------------------------------------------------------------------------------------
// Methods
//--------------------------------------------------------------------------------------------------

impl MonomergeArgs {
    /// Returns the log filter to use when `RUST_LOG` is not set.
    pub fn default_log_directive(&self) -> &'static str {
        if self.verbose {
            "monomerge=debug"
        } else if self.quiet {
            "monomerge=error"
        } else {
            "monomerge=info"
        }
    }
}

//--------------------------------------------------------------------------------------------------
// Functions
//--------------------------------------------------------------------------------------------------

/// Returns the help and error colours used by the CLI.
pub fn styles() -> Styles {
    Styles::styled()
        .header(AnsiColor::Yellow.on_default() | Effects::BOLD)
        .usage(AnsiColor::Yellow.on_default() | Effects::BOLD)
        .literal(AnsiColor::Blue.on_default() | Effects::BOLD)
        .placeholder(AnsiColor::Green.on_default())
        .error(AnsiColor::Red.on_default() | Effects::BOLD)
        .valid(AnsiColor::Green.on_default() | Effects::BOLD)
        .invalid(AnsiColor::Red.on_default() | Effects::BOLD)
}

//--------------------------------------------------------------------------------------------------
// Tests
//--------------------------------------------------------------------------------------------------
