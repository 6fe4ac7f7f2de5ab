use crate::env::Environment;
use anyhow::Result;
use std::io::Write;

/// Conventional process exit code type used by this crate.
///
/// A value of 0 indicates success; any non-zero value indicates failure.
/// This mirrors the convention used by POSIX shells and many command-line tools.
pub type ExitCode = i32;

/// The command completed successfully (or a predicate was true).
pub const STATUS_CMD_OK: ExitCode = 0;

/// The command failed (or a predicate was false).
pub const STATUS_CMD_ERROR: ExitCode = 1;

/// The command was invoked with arguments it could not accept.
pub const STATUS_INVALID_ARGS: ExitCode = 121;

/// Output and error channels handed to a running command.
///
/// Builtins write their regular output to `out` and diagnostics to `err`.
pub struct IoStreams<'a> {
    /// Regular output.
    pub out: &'a mut dyn Write,
    /// Diagnostics.
    pub err: &'a mut dyn Write,
}

impl<'a> IoStreams<'a> {
    /// Bundle an output and an error writer.
    pub fn new(out: &'a mut dyn Write, err: &'a mut dyn Write) -> Self {
        Self { out, err }
    }
}

/// Object-safe trait for any command that can be executed by the shell.
///
/// This is implemented by built-ins via a blanket impl.
pub trait ExecutableCommand {
    /// Executes the command.
    fn execute(self: Box<Self>, streams: &mut IoStreams<'_>, env: &mut Environment)
    -> Result<ExitCode>;
}

/// Factory that tries to create a command from a name and its arguments.
///
/// Returns `None` when the factory doesn't recognize the `name`.
pub trait CommandFactory {
    /// Attempt to create a command instance for the provided name and arguments.
    fn try_create(
        &self,
        env: &Environment,
        name: &str,
        args: &[&str],
    ) -> Option<Box<dyn ExecutableCommand>>;
}
