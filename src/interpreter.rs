use crate::command::{CommandFactory, ExitCode, IoStreams, STATUS_CMD_OK};
use crate::env::Environment;
use rustyline::error::ReadlineError;
use rustyline::{DefaultEditor, Result};
use tracing::{debug, error};

/// Factory allows creating instances of ExecutableCommand.
///
/// Only supports commands defined in this crate.
pub(crate) struct Factory<T> {
    _phantom: std::marker::PhantomData<T>,
}

impl<T> Default for Factory<T> {
    fn default() -> Self {
        Self {
            _phantom: std::marker::PhantomData,
        }
    }
}

/// A minimal shell-like interpreter that runs builtins against its [`Environment`].
///
/// Example
/// ```
/// use shell_status::Interpreter;
/// let mut sh = Interpreter::default();
/// let code = sh.run("status", &["is-login"]).unwrap();
/// assert_eq!(code, 1);
/// ```
pub struct Interpreter {
    env: Environment,
    commands: Vec<Box<dyn CommandFactory>>,
}

impl Interpreter {
    /// Create a new interpreter with a custom set of command factories.
    pub fn new(env: Environment, commands: Vec<Box<dyn CommandFactory>>) -> Self {
        Self { env, commands }
    }

    /// Interpreter with the default builtins and the given environment.
    pub fn with_env(env: Environment) -> Self {
        use crate::builtin::Exit;
        use crate::status::Status;
        Self::new(
            env,
            vec![
                Box::new(Factory::<Status>::default()),
                Box::new(Factory::<Exit>::default()),
            ],
        )
    }

    pub fn env(&self) -> &Environment {
        &self.env
    }

    pub fn env_mut(&mut self) -> &mut Environment {
        &mut self.env
    }

    /// Run a single command invocation by name with arguments on the process's stdout
    /// and stderr.
    pub fn run(&mut self, name: &str, args: &[&str]) -> anyhow::Result<ExitCode> {
        let mut stdout = std::io::stdout();
        let mut stderr = std::io::stderr();
        let mut streams = IoStreams::new(&mut stdout, &mut stderr);
        self.run_with_streams(name, args, &mut streams)
    }

    /// Run a single command invocation, writing to the given streams.
    ///
    /// Returns the command's exit code or an error if the command cannot be created
    /// or fails to execute.
    pub fn run_with_streams(
        &mut self,
        name: &str,
        args: &[&str],
        streams: &mut IoStreams<'_>,
    ) -> anyhow::Result<ExitCode> {
        let commandline = std::iter::once(name)
            .chain(args.iter().copied())
            .collect::<Vec<_>>()
            .join(" ");
        self.env.status_vars.command = name.to_string();
        self.env.status_vars.commandline = commandline;

        for factory in &self.commands {
            if let Some(cmd) = factory.try_create(&self.env, name, args) {
                debug!(command = name, "running builtin");
                return cmd.execute(streams, &mut self.env);
            }
        }
        Err(anyhow::anyhow!("command not found: {}", name))
    }

    /// Split a line on whitespace and run it. Blank lines succeed without doing anything.
    pub fn eval(&mut self, line: &str, streams: &mut IoStreams<'_>) -> anyhow::Result<ExitCode> {
        let words: Vec<&str> = line.split_whitespace().collect();
        match words.split_first() {
            Some((name, args)) => self.run_with_streams(name, args, streams),
            None => Ok(STATUS_CMD_OK),
        }
    }

    /// Read-Eval-Print Loop. Stops on `exit`, end of input or Ctrl-C.
    pub fn repl(&mut self) -> Result<()> {
        let mut rl = DefaultEditor::new()?;

        while !self.env.should_exit {
            match rl.readline("$ ") {
                Ok(line) => {
                    rl.add_history_entry(line.as_str())?;
                    self.env.line_number += 1;
                    let mut stdout = std::io::stdout();
                    let mut stderr = std::io::stderr();
                    let mut streams = IoStreams::new(&mut stdout, &mut stderr);
                    if let Err(e) = self.eval(&line, &mut streams) {
                        eprintln!("{e}");
                    }
                }
                Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => break,
                Err(err) => {
                    error!(error = %err, "readline failed");
                    return Err(err);
                }
            }
        }

        Ok(())
    }
}

impl Default for Interpreter {
    /// Create an interpreter with the default builtins, `status` and `exit`.
    fn default() -> Self {
        Self::with_env(Environment::default())
    }
}
