use argh::FromArgs;
use shell_status::job_control::{JobControlMode, JobControlStore};
use shell_status::{Environment, Interpreter};
use tracing_subscriber::EnvFilter;

#[derive(FromArgs)]
/// A tiny shell for trying out the `status` builtin.
struct Cli {
    #[argh(switch, short = 'l')]
    /// behave as a login shell.
    login: bool,

    #[argh(switch, short = 'i')]
    /// behave as an interactive shell.
    interactive: bool,

    #[argh(option, default = "JobControlMode::Interactive", from_str_fn(parse_mode))]
    /// initial job control mode: none, interactive or full.
    job_control: JobControlMode,

    #[argh(option)]
    /// feature flags to turn on or off, e.g. `qmark-noglob,no-regex-easyesc`.
    features: Option<String>,

    #[argh(option, short = 'c')]
    /// run one command line and exit with its status.
    command: Option<String>,
}

fn parse_mode(value: &str) -> Result<JobControlMode, String> {
    value.parse().map_err(|e| format!("{e}"))
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    let cli: Cli = argh::from_env();
    let program_name = std::env::args().next().unwrap_or_else(|| "shell_status".into());

    let mut env = Environment::new(program_name);
    env.login = cli.login;
    env.interactive = cli.interactive || cli.command.is_none();
    env.job_control.set_job_control_mode(cli.job_control);
    if let Some(spec) = &cli.features {
        env.features.set_from_spec(spec);
    }

    let mut sh = Interpreter::with_env(env);
    match cli.command {
        Some(line) => {
            let mut stdout = std::io::stdout();
            let mut stderr = std::io::stderr();
            let mut streams = shell_status::command::IoStreams::new(&mut stdout, &mut stderr);
            let code = sh.eval(&line, &mut streams)?;
            std::process::exit(code);
        }
        None => {
            sh.repl()?;
            Ok(())
        }
    }
}
