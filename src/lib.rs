//! A shell's `status` builtin, together with just enough shell around it to run it.
//!
//! The builtin reports and changes interpreter state: whether the shell is a login
//! shell, the job control mode, feature flags, the call stack and the script, function
//! and line currently running. See [`status`] for the argument grammar and dispatch.
//!
//! The state `status` looks at is reached through small traits ([`env::ShellState`],
//! [`job_control::JobControlStore`], [`features::FeatureRegistry`],
//! [`path::ExecutableLocator`]) so it can be swapped out in tests. [`Environment`]
//! provides in-memory implementations and [`Interpreter`] runs builtins against it.

mod builtin;
pub mod command;
pub mod env;
pub mod features;
mod interpreter;
pub mod job_control;
pub mod path;
pub mod status;

pub use env::Environment;
/// Just a convenient re-export of the interactive command runner.
///
/// See [`Interpreter`] for the high-level API and examples.
pub use interpreter::Interpreter;
