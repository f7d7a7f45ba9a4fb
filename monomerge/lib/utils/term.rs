//! Terminal detection used to decide whether log output gets ANSI colours.

//--------------------------------------------------------------------------------------------------
// Functions
//--------------------------------------------------------------------------------------------------

/// Determines if the process is writing diagnostics to an interactive terminal.
///
/// Diagnostics go to stderr, so that is the descriptor that matters here.
pub fn is_interactive_terminal() -> bool {
    let stderr_is_tty = unsafe { libc::isatty(libc::STDERR_FILENO) == 1 };
    let stdout_is_tty = unsafe { libc::isatty(libc::STDOUT_FILENO) == 1 };

    stderr_is_tty && stdout_is_tty
}

/// Determines if the terminal is interactive and understands ANSI escape codes.
pub fn is_ansi_interactive_terminal() -> bool {
    is_interactive_terminal() && std::env::var("TERM").map_or(false, |term| term != "dumb")
}
