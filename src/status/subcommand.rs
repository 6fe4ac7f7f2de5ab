use std::fmt;

/// Every operation `status` can perform.
///
/// Running `status` without a subcommand is represented by `Option::None` at the call
/// sites rather than by a variant of its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatusCmd {
    CurrentCommand,
    Basename,
    Dirname,
    Features,
    Filename,
    FishPath,
    Function,
    IsBlock,
    IsBreakpoint,
    IsCommandSub,
    IsFullJobControl,
    IsInteractive,
    IsInteractiveJobControl,
    IsLogin,
    IsNoJobControl,
    LineNumber,
    SetJobControl,
    StackTrace,
    TestFeature,
    CurrentCommandline,
}

/// Subcommand words and their aliases. Must stay sorted by name.
const NAMES: &[(&str, StatusCmd)] = &[
    ("basename", StatusCmd::Basename),
    ("current-basename", StatusCmd::Basename),
    ("current-command", StatusCmd::CurrentCommand),
    ("current-commandline", StatusCmd::CurrentCommandline),
    ("current-dirname", StatusCmd::Dirname),
    ("current-filename", StatusCmd::Filename),
    ("current-function", StatusCmd::Function),
    ("current-line-number", StatusCmd::LineNumber),
    ("dirname", StatusCmd::Dirname),
    ("features", StatusCmd::Features),
    ("filename", StatusCmd::Filename),
    ("fish-path", StatusCmd::FishPath),
    ("function", StatusCmd::Function),
    ("is-block", StatusCmd::IsBlock),
    ("is-breakpoint", StatusCmd::IsBreakpoint),
    ("is-command-substitution", StatusCmd::IsCommandSub),
    ("is-full-job-control", StatusCmd::IsFullJobControl),
    ("is-interactive", StatusCmd::IsInteractive),
    ("is-interactive-job-control", StatusCmd::IsInteractiveJobControl),
    ("is-login", StatusCmd::IsLogin),
    ("is-no-job-control", StatusCmd::IsNoJobControl),
    ("job-control", StatusCmd::SetJobControl),
    ("line-number", StatusCmd::LineNumber),
    ("print-stack-trace", StatusCmd::StackTrace),
    ("stack-trace", StatusCmd::StackTrace),
    ("test-feature", StatusCmd::TestFeature),
];

impl StatusCmd {
    /// Look up a subcommand word. Exact, case-sensitive match.
    pub fn from_name(name: &str) -> Option<StatusCmd> {
        NAMES
            .binary_search_by(|(candidate, _)| (*candidate).cmp(name))
            .ok()
            .map(|idx| NAMES[idx].1)
    }

    /// First name listed for this subcommand. Used in diagnostics.
    pub fn name(self) -> &'static str {
        NAMES
            .iter()
            .find(|(_, cmd)| *cmd == self)
            .map(|(name, _)| *name)
            .unwrap_or("default")
    }

    /// All accepted subcommand words, sorted.
    pub fn names() -> impl Iterator<Item = &'static str> {
        NAMES.iter().map(|(name, _)| *name)
    }
}

impl fmt::Display for StatusCmd {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
