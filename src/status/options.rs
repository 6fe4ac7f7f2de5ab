//! Option grammar and subcommand selection for `status`.
//!
//! Arguments are scanned the way `getopt_long` does it: options may appear anywhere,
//! non-option words keep their order and are looked at after all options are consumed,
//! and `--` ends option processing. Several options are legacy spellings of subcommands;
//! they go through the same set-once selection as subcommand words.

use super::error::StatusError;
use super::subcommand::StatusCmd;
use crate::job_control::JobControlMode;
use std::num::IntErrorKind;
use tracing::{debug, trace};

/// What an option does once recognized.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OptAction {
    Flag(Flag),
    /// The option consumes the next word (or the text after `=`).
    WithValue(ValueOpt),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flag {
    /// Legacy flag form of a subcommand.
    Select(StatusCmd),
    Help,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ValueOpt {
    /// `-j MODE`: select `job-control` with the given mode.
    JobControl,
    /// `-L NUM`.
    Level,
}

const fn select(cmd: StatusCmd) -> OptAction {
    OptAction::Flag(Flag::Select(cmd))
}

const HELP: OptAction = OptAction::Flag(Flag::Help);
const JOB_CONTROL: OptAction = OptAction::WithValue(ValueOpt::JobControl);
const LEVEL: OptAction = OptAction::WithValue(ValueOpt::Level);

const SHORT_OPTIONS: &[(char, OptAction)] = &[
    ('L', LEVEL),
    ('c', select(StatusCmd::IsCommandSub)),
    ('b', select(StatusCmd::IsBlock)),
    ('i', select(StatusCmd::IsInteractive)),
    ('l', select(StatusCmd::IsLogin)),
    ('f', select(StatusCmd::Filename)),
    ('n', select(StatusCmd::LineNumber)),
    ('h', HELP),
    ('j', JOB_CONTROL),
    ('t', select(StatusCmd::StackTrace)),
];

const LONG_OPTIONS: &[(&str, OptAction)] = &[
    ("help", HELP),
    ("current-filename", select(StatusCmd::Filename)),
    ("current-line-number", select(StatusCmd::LineNumber)),
    ("filename", select(StatusCmd::Filename)),
    ("fish-path", select(StatusCmd::FishPath)),
    ("is-block", select(StatusCmd::IsBlock)),
    (
        "is-command-substitution",
        select(StatusCmd::IsCommandSub),
    ),
    (
        "is-full-job-control",
        select(StatusCmd::IsFullJobControl),
    ),
    ("is-interactive", select(StatusCmd::IsInteractive)),
    (
        "is-interactive-job-control",
        select(StatusCmd::IsInteractiveJobControl),
    ),
    ("is-login", select(StatusCmd::IsLogin)),
    (
        "is-no-job-control",
        select(StatusCmd::IsNoJobControl),
    ),
    ("job-control", JOB_CONTROL),
    ("level", LEVEL),
    ("line", select(StatusCmd::LineNumber)),
    ("line-number", select(StatusCmd::LineNumber)),
    ("print-stack-trace", select(StatusCmd::StackTrace)),
];

/// Options accumulated while scanning the command line.
///
/// Every step consumes the value and returns the updated one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusOptions {
    pub subcommand: Option<StatusCmd>,
    pub level: u32,
    pub job_control: Option<JobControlMode>,
    pub help: bool,
}

impl Default for StatusOptions {
    fn default() -> Self {
        Self {
            subcommand: None,
            level: 1,
            job_control: None,
            help: false,
        }
    }
}

impl StatusOptions {
    /// Record the subcommand, refusing to select a second one.
    pub fn select(self, cmd: &str, requested: StatusCmd) -> Result<Self, StatusError> {
        match self.subcommand {
            Some(previous) => Err(StatusError::MutuallyExclusive {
                cmd: cmd.to_string(),
                previous,
                requested,
            }),
            None => Ok(Self {
                subcommand: Some(requested),
                ..self
            }),
        }
    }

    pub fn with_level(self, level: u32) -> Self {
        Self { level, ..self }
    }

    pub fn with_job_control(self, mode: JobControlMode) -> Self {
        Self {
            job_control: Some(mode),
            ..self
        }
    }

    pub fn with_help(self) -> Self {
        Self { help: true, ..self }
    }

    fn apply_flag(self, cmd: &str, flag: Flag) -> Result<Self, StatusError> {
        match flag {
            Flag::Select(sub) => self.select(cmd, sub),
            Flag::Help => Ok(self.with_help()),
        }
    }

    fn apply_value(self, cmd: &str, opt: ValueOpt, value: &str) -> Result<Self, StatusError> {
        match opt {
            ValueOpt::JobControl => {
                let selected = self.select(cmd, StatusCmd::SetJobControl)?;
                let mode = parse_job_control(cmd, value)?;
                Ok(selected.with_job_control(mode))
            }
            ValueOpt::Level => Ok(self.with_level(parse_level(cmd, value)?)),
        }
    }
}

/// A fully resolved `status` command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    /// Name the builtin was invoked as, used in diagnostics.
    pub cmd: String,
    /// `None` when no subcommand was given.
    pub subcommand: Option<StatusCmd>,
    pub level: u32,
    /// Mode given with `-j`, if any.
    pub job_control: Option<JobControlMode>,
    /// Arguments left for the subcommand.
    pub args: Vec<String>,
}

/// Result of parsing a `status` command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Request {
    /// `-h` was given; print usage and do nothing else.
    Help,
    Run(Invocation),
}

/// Parse a job control mode, reporting failures against `cmd`.
pub fn parse_job_control(cmd: &str, mode: &str) -> Result<JobControlMode, StatusError> {
    mode.parse()
        .map_err(|_| StatusError::InvalidJobControlMode {
            cmd: cmd.to_string(),
            mode: mode.to_string(),
        })
}

fn parse_level(cmd: &str, raw: &str) -> Result<u32, StatusError> {
    let invalid = || StatusError::InvalidLevel {
        cmd: cmd.to_string(),
        value: raw.to_string(),
    };
    match raw.trim().parse::<i32>() {
        Ok(level) => u32::try_from(level).map_err(|_| invalid()),
        Err(e) if matches!(e.kind(), IntErrorKind::PosOverflow | IntErrorKind::NegOverflow) => {
            Err(invalid())
        }
        Err(_) => Err(StatusError::NotANumber {
            cmd: cmd.to_string(),
            value: raw.to_string(),
        }),
    }
}

fn lookup_short(c: char) -> Option<OptAction> {
    SHORT_OPTIONS
        .iter()
        .find(|(short, _)| *short == c)
        .map(|(_, action)| *action)
}

/// Exact matches win; otherwise a prefix must not be claimed by options that differ.
fn lookup_long(cmd: &str, name: &str, token: &str) -> Result<OptAction, StatusError> {
    if let Some((_, action)) = LONG_OPTIONS.iter().find(|(long, _)| *long == name) {
        return Ok(*action);
    }
    let mut found: Option<OptAction> = None;
    for (_, action) in LONG_OPTIONS.iter().filter(|(long, _)| long.starts_with(name)) {
        match found {
            None => found = Some(*action),
            Some(prev) if prev == *action => {}
            Some(_) => {
                return Err(StatusError::AmbiguousOption {
                    cmd: cmd.to_string(),
                    option: token.to_string(),
                });
            }
        }
    }
    found.ok_or_else(|| StatusError::UnknownOption {
        cmd: cmd.to_string(),
        option: token.to_string(),
    })
}

/// Consume every option in `args`, returning the options and the non-option words.
fn scan_options(cmd: &str, args: &[&str]) -> Result<(StatusOptions, Vec<String>), StatusError> {
    let mut opts = StatusOptions::default();
    let mut operands = Vec::new();
    let mut rest = args.iter();

    let missing = |token: &str| StatusError::MissingArgument {
        cmd: cmd.to_string(),
        option: token.to_string(),
    };

    while let Some(&token) = rest.next() {
        if token == "--" {
            operands.extend(rest.by_ref().map(|s| s.to_string()));
            break;
        }

        if let Some(long) = token.strip_prefix("--") {
            let (name, inline) = match long.split_once('=') {
                Some((name, value)) => (name, Some(value)),
                None => (long, None),
            };
            let action = lookup_long(cmd, name, token)?;
            opts = match (action, inline) {
                (OptAction::WithValue(opt), Some(value)) => {
                    trace!(option = token, value, "parsed long option");
                    opts.apply_value(cmd, opt, value)?
                }
                (OptAction::WithValue(opt), None) => {
                    let value = *rest.next().ok_or_else(|| missing(token))?;
                    trace!(option = token, value, "parsed long option");
                    opts.apply_value(cmd, opt, value)?
                }
                (OptAction::Flag(_), Some(_)) => {
                    return Err(StatusError::UnexpectedOptionArgument {
                        cmd: cmd.to_string(),
                        option: token.to_string(),
                    });
                }
                (OptAction::Flag(flag), None) => {
                    trace!(option = token, "parsed long option");
                    opts.apply_flag(cmd, flag)?
                }
            };
            continue;
        }

        let Some(cluster) = token.strip_prefix('-').filter(|c| !c.is_empty()) else {
            operands.push(token.to_string());
            continue;
        };

        for (idx, c) in cluster.char_indices() {
            let action = lookup_short(c).ok_or_else(|| StatusError::UnknownOption {
                cmd: cmd.to_string(),
                option: token.to_string(),
            })?;
            match action {
                OptAction::WithValue(opt) => {
                    let attached = &cluster[idx + c.len_utf8()..];
                    let value = if attached.is_empty() {
                        *rest.next().ok_or_else(|| missing(token))?
                    } else {
                        attached
                    };
                    trace!(option = %c, value, "parsed short option");
                    opts = opts.apply_value(cmd, opt, value)?;
                    break;
                }
                OptAction::Flag(flag) => {
                    trace!(option = %c, "parsed short option");
                    opts = opts.apply_flag(cmd, flag)?;
                }
            }
        }
    }

    Ok((opts, operands))
}

/// Turn `argv` (including the command name) into a [`Request`].
///
/// When no option picked a subcommand the first word must name one. When an option did,
/// a first word that also names a subcommand is a conflict; any other words are left for
/// the subcommand's arity check.
pub fn parse_args(argv: &[&str]) -> Result<Request, StatusError> {
    let (cmd, args) = match argv.split_first() {
        Some((cmd, args)) => (*cmd, args),
        None => ("status", argv),
    };

    let (mut opts, mut operands) = scan_options(cmd, args)?;
    if opts.help {
        return Ok(Request::Help);
    }

    if let Some(word) = operands.first().cloned() {
        match (StatusCmd::from_name(&word), opts.subcommand) {
            (Some(sub), _) => {
                opts = opts.select(cmd, sub)?;
                operands.remove(0);
            }
            (None, None) => {
                return Err(StatusError::InvalidSubcommand {
                    cmd: cmd.to_string(),
                    word,
                });
            }
            (None, Some(_)) => {}
        }
    }

    debug!(
        subcommand = ?opts.subcommand,
        level = opts.level,
        args = operands.len(),
        "resolved status subcommand"
    );

    Ok(Request::Run(Invocation {
        cmd: cmd.to_string(),
        subcommand: opts.subcommand,
        level: opts.level,
        job_control: opts.job_control,
        args: operands,
    }))
}
