use crate::command::{
    CommandFactory, ExecutableCommand, ExitCode, IoStreams, STATUS_CMD_OK, STATUS_INVALID_ARGS,
};
use crate::env::Environment;
use crate::interpreter::Factory;
use anyhow::Result;
use std::io::Write;

/// Built-in commands known to the shell at compile time.
///
/// Builtins parse their own arguments and are executed directly in-process.
pub(crate) trait BuiltinCommand: Sized {
    /// Canonical name of the command, e.g. "status" or "exit".
    fn name() -> &'static str;

    /// Parse the arguments following the command name.
    ///
    /// `Err` means the command should not run; the [`EarlyExit`] carries what to print
    /// instead (usage text or a diagnostic) and the exit status.
    fn from_args(command_name: &str, args: &[&str]) -> Result<Self, EarlyExit>;

    /// Executes the command using provided IO streams and environment.
    ///
    /// Return value should follow shell conventions: 0 for success, non-zero for error.
    fn execute(self, streams: &mut IoStreams<'_>, env: &mut Environment) -> Result<ExitCode>;
}

/// Output of a builtin that stopped while parsing its arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct EarlyExit {
    pub output: String,
    pub status: ExitCode,
}

impl<T: BuiltinCommand> ExecutableCommand for T {
    fn execute(
        self: Box<Self>,
        streams: &mut IoStreams<'_>,
        env: &mut Environment,
    ) -> Result<ExitCode> {
        T::execute(*self, streams, env)
    }
}

struct InvalidArgs(EarlyExit);

impl ExecutableCommand for InvalidArgs {
    fn execute(
        self: Box<Self>,
        streams: &mut IoStreams<'_>,
        _env: &mut Environment,
    ) -> Result<ExitCode> {
        let EarlyExit { output, status } = self.0;
        if status == STATUS_CMD_OK {
            streams.out.write_all(output.as_bytes())?;
        } else {
            streams.err.write_all(output.as_bytes())?;
        }
        Ok(status)
    }
}

impl<T: BuiltinCommand + 'static> CommandFactory for Factory<T> {
    fn try_create(
        &self,
        _env: &Environment,
        name: &str,
        args: &[&str],
    ) -> Option<Box<dyn ExecutableCommand>> {
        if name == T::name() {
            Some(match T::from_args(name, args) {
                Ok(cmd) => Box::new(cmd),
                Err(early) => Box::new(InvalidArgs(early)),
            })
        } else {
            None
        }
    }
}

/// Leave the interactive loop, optionally with an exit status.
pub struct Exit {
    code: ExitCode,
}

impl BuiltinCommand for Exit {
    fn name() -> &'static str {
        "exit"
    }

    fn from_args(command_name: &str, args: &[&str]) -> Result<Self, EarlyExit> {
        match args {
            [] => Ok(Exit { code: STATUS_CMD_OK }),
            [code] => code
                .trim()
                .parse::<u8>()
                .map(|code| Exit {
                    code: ExitCode::from(code),
                })
                .map_err(|_| EarlyExit {
                    output: format!("{command_name}: {code}: invalid exit status\n"),
                    status: STATUS_INVALID_ARGS,
                }),
            _ => Err(EarlyExit {
                output: format!(
                    "{command_name}: expected at most 1 arguments; got {}\n",
                    args.len()
                ),
                status: STATUS_INVALID_ARGS,
            }),
        }
    }

    fn execute(self, _streams: &mut IoStreams<'_>, env: &mut Environment) -> Result<ExitCode> {
        env.should_exit = true;
        Ok(self.code)
    }
}
