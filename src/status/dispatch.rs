use super::StatusContext;
use super::error::StatusError;
use super::options::{Invocation, parse_job_control};
use super::subcommand::StatusCmd;
use crate::command::{ExitCode, IoStreams, STATUS_CMD_ERROR, STATUS_CMD_OK};
use crate::features::FeatureRegistry;
use crate::job_control::JobControlMode;
use crate::path;
use std::io::Write;
use tracing::{debug, info};

/// Exit codes of `status test-feature`.
pub const TEST_FEATURE_ON: ExitCode = 0;
pub const TEST_FEATURE_OFF: ExitCode = 1;
pub const TEST_FEATURE_NOT_RECOGNIZED: ExitCode = 2;

fn predicate(value: bool) -> ExitCode {
    if value { STATUS_CMD_OK } else { STATUS_CMD_ERROR }
}

fn expect_args(inv: &Invocation, expected: usize) -> Result<(), StatusError> {
    if inv.args.len() == expected {
        return Ok(());
    }
    Err(StatusError::ArgCount {
        cmd: inv.cmd.clone(),
        subcmd: inv.subcommand.map_or("default", StatusCmd::name),
        expected,
        actual: inv.args.len(),
    })
}

/// Print every feature flag, its value, group and description, aligned on the name.
pub fn print_features(features: &dyn FeatureRegistry, out: &mut dyn Write) -> std::io::Result<()> {
    let width = features
        .metadata()
        .iter()
        .map(|md| md.name.len())
        .max()
        .unwrap_or(0)
        + 1;
    for md in features.metadata() {
        let state = if features.test(md.name).unwrap_or(false) {
            "on"
        } else {
            "off"
        };
        writeln!(
            out,
            "{:<width$}{:<3} {} {}",
            md.name, state, md.groups, md.description
        )?;
    }
    Ok(())
}

/// Run a parsed invocation against the shell state in `ctx`.
pub fn dispatch(
    inv: &Invocation,
    ctx: &StatusContext<'_>,
    streams: &mut IoStreams<'_>,
) -> Result<ExitCode, StatusError> {
    debug!(subcommand = ?inv.subcommand, "dispatching status");

    let Some(sub) = inv.subcommand else {
        expect_args(inv, 0)?;
        if ctx.shell.is_login() {
            writeln!(streams.out, "This is a login shell")?;
        } else {
            writeln!(streams.out, "This is not a login shell")?;
        }
        writeln!(
            streams.out,
            "Job control: {}",
            ctx.job_control.job_control_mode().describe()
        )?;
        write!(streams.out, "{}", ctx.shell.stack_trace())?;
        return Ok(STATUS_CMD_OK);
    };

    let code = match sub {
        StatusCmd::SetJobControl => {
            let mode = match inv.job_control {
                Some(mode) => {
                    expect_args(inv, 0)?;
                    mode
                }
                None => {
                    expect_args(inv, 1)?;
                    parse_job_control(&inv.cmd, &inv.args[0])?
                }
            };
            info!(%mode, "setting job control mode");
            ctx.job_control.set_job_control_mode(mode);
            STATUS_CMD_OK
        }
        StatusCmd::Features => {
            // Extra words are ignored.
            print_features(ctx.features, streams.out)?;
            STATUS_CMD_OK
        }
        StatusCmd::TestFeature => {
            expect_args(inv, 1)?;
            match ctx.features.test(&inv.args[0]) {
                Some(true) => TEST_FEATURE_ON,
                Some(false) => TEST_FEATURE_OFF,
                None => TEST_FEATURE_NOT_RECOGNIZED,
            }
        }
        StatusCmd::Basename | StatusCmd::Dirname | StatusCmd::Filename => {
            expect_args(inv, 0)?;
            let filename = ctx.shell.current_filename().unwrap_or_default();
            let shown = match sub {
                _ if filename.is_empty() => "Standard input",
                StatusCmd::Basename => path::basename(&filename),
                StatusCmd::Dirname => path::dirname(&filename),
                _ => &filename,
            };
            writeln!(streams.out, "{shown}")?;
            STATUS_CMD_OK
        }
        StatusCmd::Function => {
            expect_args(inv, 0)?;
            let name = ctx.shell.function_name(inv.level);
            writeln!(
                streams.out,
                "{}",
                name.as_deref().unwrap_or("Not a function")
            )?;
            STATUS_CMD_OK
        }
        StatusCmd::LineNumber => {
            expect_args(inv, 0)?;
            // TODO: apply `inv.level` once it is settled which frame's line `-L` should report.
            writeln!(streams.out, "{}", ctx.shell.line_number())?;
            STATUS_CMD_OK
        }
        StatusCmd::IsInteractive => {
            expect_args(inv, 0)?;
            predicate(ctx.shell.is_interactive())
        }
        StatusCmd::IsCommandSub => {
            expect_args(inv, 0)?;
            predicate(ctx.shell.is_command_substitution())
        }
        StatusCmd::IsBlock => {
            expect_args(inv, 0)?;
            predicate(ctx.shell.is_block())
        }
        StatusCmd::IsBreakpoint => {
            expect_args(inv, 0)?;
            predicate(ctx.shell.is_breakpoint())
        }
        StatusCmd::IsLogin => {
            expect_args(inv, 0)?;
            predicate(ctx.shell.is_login())
        }
        StatusCmd::IsFullJobControl => {
            expect_args(inv, 0)?;
            predicate(ctx.job_control.job_control_mode() == JobControlMode::All)
        }
        StatusCmd::IsInteractiveJobControl => {
            expect_args(inv, 0)?;
            predicate(ctx.job_control.job_control_mode() == JobControlMode::Interactive)
        }
        StatusCmd::IsNoJobControl => {
            expect_args(inv, 0)?;
            predicate(ctx.job_control.job_control_mode() == JobControlMode::None)
        }
        StatusCmd::StackTrace => {
            expect_args(inv, 0)?;
            write!(streams.out, "{}", ctx.shell.stack_trace())?;
            STATUS_CMD_OK
        }
        StatusCmd::CurrentCommand => {
            expect_args(inv, 0)?;
            let command = match ctx.shell.current_command() {
                "" => ctx.shell.program_name(),
                command => command,
            };
            writeln!(streams.out, "{command}")?;
            STATUS_CMD_OK
        }
        StatusCmd::CurrentCommandline => {
            expect_args(inv, 0)?;
            writeln!(streams.out, "{}", ctx.shell.current_commandline())?;
            STATUS_CMD_OK
        }
        StatusCmd::FishPath => {
            expect_args(inv, 0)?;
            let exe = path::display_executable_path(ctx.executable).map_err(|source| {
                StatusError::ExecutablePath {
                    cmd: inv.cmd.clone(),
                    source,
                }
            })?;
            writeln!(streams.out, "{}", exe.display())?;
            STATUS_CMD_OK
        }
    };

    Ok(code)
}
