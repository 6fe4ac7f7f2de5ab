use crate::features::Features;
use crate::job_control::JobControl;
use crate::path::ProcessExecutable;

/// Kind of an entry on the interpreter's block stack.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BlockKind {
    /// Outermost block of the shell.
    Top,
    /// A function call.
    FunctionCall {
        name: String,
        args: Vec<String>,
        /// File the function was defined in, if any.
        definition_file: Option<String>,
    },
    /// A file being run by `source`.
    Source { file: String },
    /// A `breakpoint` pause.
    Breakpoint,
    /// A command substitution, `(...)`.
    Subst,
    /// `if`, `while`, `for`, `begin`, `switch` and friends.
    Plain,
}

/// One entry on the block stack together with where it was entered from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    pub kind: BlockKind,
    /// File the block was entered from, `None` for standard input.
    pub src_file: Option<String>,
    /// Line the block was entered from.
    pub src_line: u32,
}

impl Block {
    pub fn new(kind: BlockKind) -> Self {
        Self {
            kind,
            src_file: None,
            src_line: 0,
        }
    }

    /// Record where the block was entered from.
    pub fn called_from(mut self, file: Option<&str>, line: u32) -> Self {
        self.src_file = file.map(str::to_string);
        self.src_line = line;
        self
    }

    fn is_function_call(&self) -> bool {
        matches!(self.kind, BlockKind::FunctionCall { .. })
    }
}

/// The command currently being run, as reported by `status current-command`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatusVars {
    pub command: String,
    pub commandline: String,
}

/// Read-only view of the interpreter state the `status` builtin reports on.
pub trait ShellState {
    /// Rendered call stack, one or more lines per function or sourced file.
    fn stack_trace(&self) -> String;
    /// File currently being executed, `None` for standard input.
    fn current_filename(&self) -> Option<String>;
    /// Name of the function `level` calls up the stack.
    fn function_name(&self, level: u32) -> Option<String>;
    fn line_number(&self) -> u32;
    /// Name of the running command, empty if none is recorded.
    fn current_command(&self) -> &str;
    fn current_commandline(&self) -> &str;
    fn program_name(&self) -> &str;
    fn is_interactive(&self) -> bool;
    fn is_login(&self) -> bool;
    fn is_command_substitution(&self) -> bool;
    fn is_block(&self) -> bool;
    fn is_breakpoint(&self) -> bool;
}

/// Mutable, user-level view of the interpreter state.
///
/// Besides the block stack and current position this owns the shell-wide job control
/// and feature flag cells plus the executable locator, so that two interpreters never
/// share them by accident.
#[derive(Debug)]
pub struct Environment {
    /// Block stack, innermost block first.
    pub blocks: Vec<Block>,
    /// Top-level script being run, `None` when reading standard input.
    pub filename: Option<String>,
    pub line_number: u32,
    pub login: bool,
    pub interactive: bool,
    pub status_vars: StatusVars,
    pub program_name: String,
    pub job_control: JobControl,
    pub features: Features,
    pub executable: ProcessExecutable,
    /// When set to true, indicates that an interactive loop should exit.
    pub should_exit: bool,
}

impl Environment {
    /// Fresh state with only a top block on the stack.
    pub fn new(program_name: impl Into<String>) -> Self {
        let program_name = program_name.into();
        Self {
            blocks: vec![Block::new(BlockKind::Top)],
            filename: None,
            line_number: 0,
            login: false,
            interactive: false,
            status_vars: StatusVars::default(),
            executable: ProcessExecutable::new(Some(program_name.clone())),
            program_name,
            job_control: JobControl::default(),
            features: Features::default(),
            should_exit: false,
        }
    }

    /// Enter a new innermost block.
    pub fn push_block(&mut self, block: Block) {
        self.blocks.insert(0, block);
    }

    /// Leave the innermost block. The top block is never removed.
    pub fn pop_block(&mut self) -> Option<Block> {
        if self.blocks.len() > 1 {
            Some(self.blocks.remove(0))
        } else {
            None
        }
    }
}

impl Default for Environment {
    fn default() -> Self {
        Self::new("fish")
    }
}

impl ShellState for Environment {
    fn stack_trace(&self) -> String {
        let mut out = String::new();
        for b in &self.blocks {
            match &b.kind {
                BlockKind::FunctionCall { name, args, .. } => {
                    out.push_str(&format!("in function '{name}'"));
                    if !args.is_empty() {
                        out.push_str(&format!(" with arguments '{}'", args.join(" ")));
                    }
                    out.push('\n');
                }
                BlockKind::Source { file } => {
                    out.push_str(&format!("from sourcing file {file}\n"));
                }
                _ => continue,
            }
            match &b.src_file {
                Some(file) => {
                    out.push_str(&format!("\tcalled on line {} of file {file}\n", b.src_line));
                }
                None => out.push_str("\tcalled on standard input\n"),
            }
            out.push('\n');
        }
        out
    }

    fn current_filename(&self) -> Option<String> {
        for b in &self.blocks {
            match &b.kind {
                BlockKind::FunctionCall {
                    definition_file, ..
                } => return definition_file.clone(),
                BlockKind::Source { file } => return Some(file.clone()),
                _ => {}
            }
        }
        self.filename.clone()
    }

    fn function_name(&self, level: u32) -> Option<String> {
        let function_of = |b: &Block| match &b.kind {
            BlockKind::FunctionCall { name, .. } => Some(name.clone()),
            _ => None,
        };

        if level == 0 {
            // The function that hit the innermost breakpoint.
            return self
                .blocks
                .iter()
                .skip_while(|b| b.kind != BlockKind::Breakpoint)
                .find_map(function_of);
        }

        let mut seen = 0;
        for b in &self.blocks {
            if b.is_function_call() {
                seen += 1;
                if seen == level {
                    return function_of(b);
                }
            } else if matches!(b.kind, BlockKind::Source { .. }) && level == 1 {
                // Commands in a sourced file don't belong to the function that sourced it.
                break;
            }
        }
        None
    }

    fn line_number(&self) -> u32 {
        self.line_number
    }

    fn current_command(&self) -> &str {
        &self.status_vars.command
    }

    fn current_commandline(&self) -> &str {
        &self.status_vars.commandline
    }

    fn program_name(&self) -> &str {
        &self.program_name
    }

    fn is_interactive(&self) -> bool {
        self.interactive
    }

    fn is_login(&self) -> bool {
        self.login
    }

    fn is_command_substitution(&self) -> bool {
        self.blocks.iter().any(|b| b.kind == BlockKind::Subst)
    }

    fn is_block(&self) -> bool {
        self.blocks
            .iter()
            .any(|b| !matches!(b.kind, BlockKind::Top | BlockKind::Subst))
    }

    fn is_breakpoint(&self) -> bool {
        self.blocks.iter().any(|b| b.kind == BlockKind::Breakpoint)
    }
}
