//! The `status` builtin: query and change interpreter state.
//!
//! An invocation goes through two stages. [`options::parse_args`] resolves the command
//! line to at most one subcommand plus its arguments, then [`dispatch::dispatch`] checks
//! the argument count and runs it against a [`StatusContext`].

pub mod dispatch;
pub mod error;
pub mod options;
pub mod subcommand;

use crate::builtin::{BuiltinCommand, EarlyExit};
use crate::command::{ExitCode, IoStreams, STATUS_CMD_OK};
use crate::env::{Environment, ShellState};
use crate::features::FeatureRegistry;
use crate::job_control::JobControlStore;
use crate::path::ExecutableLocator;
use anyhow::Result;
use std::io::Write;

pub use error::StatusError;
pub use options::{Invocation, Request};
pub use subcommand::StatusCmd;

/// The services `status` reads from and writes to.
#[derive(Clone, Copy)]
pub struct StatusContext<'a> {
    pub shell: &'a dyn ShellState,
    pub job_control: &'a dyn JobControlStore,
    pub features: &'a dyn FeatureRegistry,
    pub executable: &'a dyn ExecutableLocator,
}

impl<'a> StatusContext<'a> {
    /// Everything `status` needs, taken from one interpreter environment.
    pub fn from_env(env: &'a Environment) -> Self {
        Self {
            shell: env,
            job_control: &env.job_control,
            features: &env.features,
            executable: &env.executable,
        }
    }
}

/// Usage text printed by `status -h`.
pub fn usage(cmd: &str) -> String {
    format!(
        "Usage: {cmd} [SUBCOMMAND] [ARGS...]

With no subcommand, print whether this is a login shell, the job control
mode and a stack trace.

Subcommands:
  is-login                     exit 0 if this is a login shell
  is-interactive               exit 0 if this is an interactive shell
  is-block                     exit 0 if a block of code is running
  is-breakpoint                exit 0 if stopped at a breakpoint
  is-command-substitution      exit 0 inside a command substitution
  is-no-job-control            exit 0 if job control is off
  is-interactive-job-control   exit 0 if job control is on for interactive jobs
  is-full-job-control          exit 0 if job control is on for all jobs
  current-filename, filename   print the file being run
  current-basename, basename   print the file name part of the file being run
  current-dirname, dirname     print the directory of the file being run
  current-function, function   print the name of the running function
  current-line-number, line-number
                               print the line number being run
  current-command              print the name of the running command
  current-commandline          print the command line being run
  print-stack-trace, stack-trace
                               print a list of function calls
  job-control MODE             set job control to none, interactive or full
  features                     list feature flags
  test-feature FEATURE         exit 0 if FEATURE is on, 1 if off, 2 if unknown
  fish-path                    print the path of the running shell

Options:
  -L, --level NUM              stack level inspected by `function`
  -h, --help                   print this help
"
    )
}

/// Write a failed invocation's diagnostic, or pass I/O failures through.
fn report(result: Result<ExitCode, StatusError>, streams: &mut IoStreams<'_>) -> Result<ExitCode> {
    match result {
        Ok(code) => Ok(code),
        Err(StatusError::Io(e)) => Err(e.into()),
        Err(e) => {
            writeln!(streams.err, "{e}")?;
            Ok(e.exit_code())
        }
    }
}

/// Parse and run `status` with `argv[0]` as the command name.
pub fn run_status(
    argv: &[&str],
    ctx: &StatusContext<'_>,
    streams: &mut IoStreams<'_>,
) -> Result<ExitCode> {
    let result = options::parse_args(argv).and_then(|request| match request {
        Request::Help => {
            let cmd = argv.first().copied().unwrap_or("status");
            write!(streams.out, "{}", usage(cmd))?;
            Ok(STATUS_CMD_OK)
        }
        Request::Run(inv) => dispatch::dispatch(&inv, ctx, streams),
    });
    report(result, streams)
}

/// `status` as a shell builtin.
pub struct Status {
    invocation: Invocation,
}

impl From<StatusError> for EarlyExit {
    fn from(e: StatusError) -> Self {
        EarlyExit {
            output: format!("{e}\n"),
            status: e.exit_code(),
        }
    }
}

impl BuiltinCommand for Status {
    fn name() -> &'static str {
        "status"
    }

    fn from_args(command_name: &str, args: &[&str]) -> Result<Self, EarlyExit> {
        let argv: Vec<&str> = std::iter::once(command_name)
            .chain(args.iter().copied())
            .collect();
        match options::parse_args(&argv)? {
            Request::Help => Err(EarlyExit {
                output: usage(command_name),
                status: STATUS_CMD_OK,
            }),
            Request::Run(invocation) => Ok(Status { invocation }),
        }
    }

    fn execute(self, streams: &mut IoStreams<'_>, env: &mut Environment) -> Result<ExitCode> {
        let ctx = StatusContext::from_env(env);
        let result = dispatch::dispatch(&self.invocation, &ctx, streams);
        report(result, streams)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::{STATUS_CMD_ERROR, STATUS_INVALID_ARGS};
    use crate::env::{Block, BlockKind};
    use crate::job_control::JobControlMode;
    use std::io;
    use std::path::PathBuf;

    struct Output {
        code: ExitCode,
        out: String,
        err: String,
    }

    fn status_in(env: &Environment, argv: &[&str]) -> Output {
        status_with(StatusContext::from_env(env), argv)
    }

    fn status_with(ctx: StatusContext<'_>, argv: &[&str]) -> Output {
        let mut out = Vec::new();
        let mut err = Vec::new();
        let code = {
            let mut streams = IoStreams::new(&mut out, &mut err);
            run_status(argv, &ctx, &mut streams).unwrap()
        };
        Output {
            code,
            out: String::from_utf8(out).unwrap(),
            err: String::from_utf8(err).unwrap(),
        }
    }

    struct FixedExecutable(Option<&'static str>);

    impl ExecutableLocator for FixedExecutable {
        fn executable_path(&self) -> io::Result<PathBuf> {
            match self.0 {
                Some(p) => Ok(PathBuf::from(p)),
                None => Err(io::Error::new(io::ErrorKind::NotFound, "no such file")),
            }
        }
    }

    #[test]
    fn test_default_prints_summary_and_stack_trace() {
        let mut env = Environment::default();
        env.push_block(
            Block::new(BlockKind::FunctionCall {
                name: "prompt".to_string(),
                args: vec![],
                definition_file: None,
            })
            .called_from(None, 0),
        );

        let res = status_in(&env, &["status"]);
        assert_eq!(res.code, STATUS_CMD_OK);
        assert_eq!(
            res.out,
            "This is not a login shell\n\
             Job control: Only on interactive jobs\n\
             in function 'prompt'\n\
             \tcalled on standard input\n\
             \n"
        );

        env.login = true;
        env.job_control.set_job_control_mode(JobControlMode::None);
        let res = status_in(&env, &["status"]);
        assert!(res.out.starts_with("This is a login shell\nJob control: Never\n"));
    }

    #[test]
    fn test_zero_argument_subcommands_reject_arguments() {
        let env = Environment::default();
        let res = status_in(&env, &["status", "is-login", "extra"]);
        assert_eq!(res.code, STATUS_INVALID_ARGS);
        assert_eq!(res.out, "");
        assert_eq!(res.err, "status: is-login: expected 0 arguments; got 1\n");

        let res = status_in(&env, &["status", "-f", "a", "b"]);
        assert_eq!(
            res.err,
            "status: current-filename: expected 0 arguments; got 2\n"
        );

        let res = status_in(&env, &["status", "--", "-l"]);
        assert_eq!(res.code, STATUS_INVALID_ARGS);
        assert_eq!(res.err, "status: -l: invalid subcommand\n");
    }

    #[test]
    fn test_test_feature_exit_codes() {
        let env = Environment::default();
        env.features.set("qmark-noglob", false);
        env.features.set("stderr-nocaret", true);

        assert_eq!(status_in(&env, &["status", "test-feature", "stderr-nocaret"]).code, 0);
        assert_eq!(status_in(&env, &["status", "test-feature", "qmark-noglob"]).code, 1);
        assert_eq!(status_in(&env, &["status", "test-feature", "no-such"]).code, 2);

        let res = status_in(&env, &["status", "test-feature"]);
        assert_eq!(res.code, STATUS_INVALID_ARGS);
        assert_eq!(res.err, "status: test-feature: expected 1 arguments; got 0\n");
        let res = status_in(&env, &["status", "test-feature", "a", "b"]);
        assert_eq!(res.code, STATUS_INVALID_ARGS);
    }

    #[test]
    fn test_features_listing_is_aligned() {
        let env = Environment::default();
        let res = status_in(&env, &["status", "features"]);
        assert_eq!(res.code, STATUS_CMD_OK);
        assert_eq!(
            res.out,
            "stderr-nocaret          on  3.0 ^ no longer redirects stderr\n\
             qmark-noglob            off 3.0 ? no longer globs\n\
             regex-easyesc           on  3.1 string replace -r needs fewer \\'s\n\
             ampersand-nobg-in-token on  3.4 & only backgrounds if followed by a separator\n"
        );
    }

    #[test]
    fn test_features_ignores_extra_words() {
        let env = Environment::default();
        let plain = status_in(&env, &["status", "features"]);
        let res = status_in(&env, &["status", "features", "x"]);
        assert_eq!(res.code, STATUS_CMD_OK);
        assert_eq!(res.err, "");
        assert_eq!(res.out, plain.out);
        assert_eq!(res.out.lines().count(), 4);
    }

    #[test]
    fn test_job_control_set_and_query_agree() {
        let env = Environment::default();
        let modes = [
            ("none", "is-no-job-control"),
            ("interactive", "is-interactive-job-control"),
            ("full", "is-full-job-control"),
        ];
        for (i, &(mode, _)) in modes.iter().enumerate() {
            let set = if i % 2 == 0 {
                status_in(&env, &["status", "job-control", mode])
            } else {
                status_in(&env, &["status", "-j", mode])
            };
            assert_eq!(set.code, STATUS_CMD_OK, "{mode}");

            for &(other, query) in &modes {
                let expected = if other == mode { STATUS_CMD_OK } else { STATUS_CMD_ERROR };
                assert_eq!(status_in(&env, &["status", query]).code, expected, "{mode} {query}");
            }
        }
    }

    #[test]
    fn test_job_control_errors() {
        let env = Environment::default();

        let res = status_in(&env, &["status", "job-control", "always"]);
        assert_eq!(res.code, STATUS_INVALID_ARGS);
        assert_eq!(res.err, "status: Invalid job control mode 'always'\n");
        assert_eq!(env.job_control.job_control_mode(), JobControlMode::Interactive);

        let res = status_in(&env, &["status", "job-control"]);
        assert_eq!(res.err, "status: job-control: expected 1 arguments; got 0\n");

        let res = status_in(&env, &["status", "-j", "full", "extra"]);
        assert_eq!(res.err, "status: job-control: expected 0 arguments; got 1\n");
        assert_eq!(env.job_control.job_control_mode(), JobControlMode::Interactive);
    }

    #[test]
    fn test_filename_family() {
        let mut env = Environment::default();
        for sub in ["basename", "dirname", "filename", "-f"] {
            assert_eq!(status_in(&env, &["status", sub]).out, "Standard input\n");
        }

        env.filename = Some("/home/u/.config/fish/config.fish".to_string());
        assert_eq!(
            status_in(&env, &["status", "current-filename"]).out,
            "/home/u/.config/fish/config.fish\n"
        );
        assert_eq!(status_in(&env, &["status", "basename"]).out, "config.fish\n");
        assert_eq!(
            status_in(&env, &["status", "current-dirname"]).out,
            "/home/u/.config/fish\n"
        );
    }

    #[test]
    fn test_function_respects_level() {
        let mut env = Environment::default();
        assert_eq!(status_in(&env, &["status", "function"]).out, "Not a function\n");

        for name in ["outer", "inner"] {
            env.push_block(Block::new(BlockKind::FunctionCall {
                name: name.to_string(),
                args: vec![],
                definition_file: None,
            }));
        }
        assert_eq!(status_in(&env, &["status", "current-function"]).out, "inner\n");
        assert_eq!(status_in(&env, &["status", "-L", "2", "function"]).out, "outer\n");
        assert_eq!(
            status_in(&env, &["status", "function", "--level=3"]).out,
            "Not a function\n"
        );
    }

    #[test]
    fn test_line_number_accepts_but_ignores_level() {
        let mut env = Environment::default();
        env.line_number = 42;
        assert_eq!(status_in(&env, &["status", "line-number"]).out, "42\n");
        let res = status_in(&env, &["status", "-L", "3", "-n"]);
        assert_eq!(res.code, STATUS_CMD_OK);
        assert_eq!(res.out, "42\n");
    }

    #[test]
    fn test_predicates() {
        let mut env = Environment::default();
        for sub in ["is-interactive", "-c", "is-block", "is-breakpoint", "--is-login"] {
            assert_eq!(status_in(&env, &["status", sub]).code, STATUS_CMD_ERROR, "{sub}");
        }

        env.interactive = true;
        env.login = true;
        env.push_block(Block::new(BlockKind::Breakpoint));
        env.push_block(Block::new(BlockKind::Subst));
        for sub in ["-i", "is-command-substitution", "-b", "is-breakpoint", "is-login"] {
            assert_eq!(status_in(&env, &["status", sub]).code, STATUS_CMD_OK, "{sub}");
        }
    }

    #[test]
    fn test_current_command_and_commandline() {
        let mut env = Environment::new("fish");
        assert_eq!(status_in(&env, &["status", "current-command"]).out, "fish\n");

        env.status_vars.command = "make".to_string();
        env.status_vars.commandline = "make -j4 all".to_string();
        assert_eq!(status_in(&env, &["status", "current-command"]).out, "make\n");
        assert_eq!(
            status_in(&env, &["status", "current-commandline"]).out,
            "make -j4 all\n"
        );
    }

    #[test]
    fn test_stack_trace_subcommand() {
        let mut env = Environment::default();
        env.push_block(
            Block::new(BlockKind::Source {
                file: "/tmp/x.fish".to_string(),
            })
            .called_from(Some("/tmp/main.fish"), 3),
        );
        let res = status_in(&env, &["status", "-t"]);
        assert_eq!(
            res.out,
            "from sourcing file /tmp/x.fish\n\tcalled on line 3 of file /tmp/main.fish\n\n"
        );
        assert_eq!(status_in(&env, &["status", "stack-trace"]).out, res.out);
    }

    #[test]
    fn test_fish_path() {
        let env = Environment::default();
        let mut ctx = StatusContext::from_env(&env);

        let relative = FixedExecutable(Some("bin/fish"));
        ctx.executable = &relative;
        let res = status_with(ctx, &["status", "fish-path"]);
        assert_eq!(res.code, STATUS_CMD_OK);
        assert_eq!(res.out, "bin/fish\n");

        let missing = FixedExecutable(None);
        ctx.executable = &missing;
        let res = status_with(ctx, &["status", "--fish-path"]);
        assert_eq!(res.code, STATUS_INVALID_ARGS);
        assert_eq!(
            res.err,
            "status: Could not get executable path: 'no such file'\n"
        );
    }

    #[test]
    fn test_help_short_circuits() {
        let env = Environment::default();
        let res = status_in(&env, &["status", "is-login", "-h"]);
        assert_eq!(res.code, STATUS_CMD_OK);
        assert!(res.out.starts_with("Usage: status"));
        assert_eq!(res.err, "");
    }

    #[test]
    fn test_selection_errors_do_not_run_anything() {
        let env = Environment::default();
        let res = status_in(&env, &["status", "-j", "none", "is-login"]);
        assert_eq!(res.code, STATUS_INVALID_ARGS);
        assert_eq!(
            res.err,
            "status: job-control is-login: options cannot be used together\n"
        );
        assert_eq!(env.job_control.job_control_mode(), JobControlMode::Interactive);
    }

    #[test]
    fn test_builtin_parses_through_factory_interface() {
        assert!(Status::from_args("status", &["is-login"]).is_ok());

        let help = Status::from_args("status", &["--help"]).err().unwrap();
        assert_eq!(help.status, STATUS_CMD_OK);

        let bad = Status::from_args("status", &["nope"]).err().unwrap();
        assert_eq!(bad.status, STATUS_INVALID_ARGS);
        assert_eq!(bad.output, "status: nope: invalid subcommand\n");
    }
}
