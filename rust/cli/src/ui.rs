//! Small helpers for consistent terminal messages.

use std::io::Write;

pub fn write_error(err: &mut dyn Write, msg: &str) -> std::io::Result<()> {
    writeln!(err, "Error: {}", msg)
}

/// Display a warning message to stderr with "WARNING:" prefix
pub fn display_warning(err: &mut dyn Write, message: &str) -> std::io::Result<()> {
    writeln!(err, "WARNING: {}", message)
}

/// Warn that a flag has no effect with the other flags given.
pub fn warn_flag_ignored(err: &mut dyn Write, flag: &str, reason: &str) -> std::io::Result<()> {
    display_warning(err, &format!("--{} is ignored: {}", flag, reason))
}
