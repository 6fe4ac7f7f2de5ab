use super::subcommand::StatusCmd;
use crate::command::{ExitCode, STATUS_INVALID_ARGS};
use std::io;
use thiserror::Error;

/// Everything that can make a `status` invocation fail.
///
/// The `Display` text is the diagnostic printed to the error stream.
#[derive(Debug, Error)]
pub enum StatusError {
    #[error("{cmd}: {option}: unknown option")]
    UnknownOption { cmd: String, option: String },

    #[error("{cmd}: {option}: ambiguous option")]
    AmbiguousOption { cmd: String, option: String },

    #[error("{cmd}: {option}: option requires an argument")]
    MissingArgument { cmd: String, option: String },

    #[error("{cmd}: {option}: option does not take an argument")]
    UnexpectedOptionArgument { cmd: String, option: String },

    #[error("{cmd}: {value}: invalid integer")]
    NotANumber { cmd: String, value: String },

    #[error("{cmd}: Invalid level value '{value}'")]
    InvalidLevel { cmd: String, value: String },

    #[error("{cmd}: Invalid job control mode '{mode}'")]
    InvalidJobControlMode { cmd: String, mode: String },

    #[error("{cmd}: {previous} {requested}: options cannot be used together")]
    MutuallyExclusive {
        cmd: String,
        previous: StatusCmd,
        requested: StatusCmd,
    },

    #[error("{cmd}: {word}: invalid subcommand")]
    InvalidSubcommand { cmd: String, word: String },

    #[error("{cmd}: {subcmd}: expected {expected} arguments; got {actual}")]
    ArgCount {
        cmd: String,
        subcmd: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("{cmd}: Could not get executable path: '{source}'")]
    ExecutablePath {
        cmd: String,
        #[source]
        source: io::Error,
    },

    #[error(transparent)]
    Io(#[from] io::Error),
}

impl StatusError {
    /// Exit status the invocation ends with.
    pub fn exit_code(&self) -> ExitCode {
        STATUS_INVALID_ARGS
    }
}
