use std::fmt;
use std::str::FromStr;
use std::sync::atomic::{AtomicU8, Ordering};
use thiserror::Error;

/// When the shell puts jobs into their own process groups.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum JobControlMode {
    /// Never.
    None,
    /// Only for jobs started from an interactive prompt.
    #[default]
    Interactive,
    /// Always. Spelled `full` on the command line.
    All,
}

impl JobControlMode {
    /// Human readable description used by `status` without arguments.
    pub fn describe(self) -> &'static str {
        match self {
            JobControlMode::None => "Never",
            JobControlMode::Interactive => "Only on interactive jobs",
            JobControlMode::All => "Always",
        }
    }

    fn to_u8(self) -> u8 {
        match self {
            JobControlMode::None => 0,
            JobControlMode::Interactive => 1,
            JobControlMode::All => 2,
        }
    }

    fn from_u8(raw: u8) -> Self {
        match raw {
            0 => JobControlMode::None,
            2 => JobControlMode::All,
            _ => JobControlMode::Interactive,
        }
    }
}

/// The string was not one of `none`, `interactive` or `full`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid job control mode '{0}'")]
pub struct InvalidJobControlMode(pub String);

impl FromStr for JobControlMode {
    type Err = InvalidJobControlMode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "full" => Ok(JobControlMode::All),
            "interactive" => Ok(JobControlMode::Interactive),
            "none" => Ok(JobControlMode::None),
            _ => Err(InvalidJobControlMode(s.to_string())),
        }
    }
}

impl fmt::Display for JobControlMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            JobControlMode::None => "none",
            JobControlMode::Interactive => "interactive",
            JobControlMode::All => "full",
        })
    }
}

/// Read/write access to the shell-wide job control mode.
pub trait JobControlStore {
    fn job_control_mode(&self) -> JobControlMode;
    fn set_job_control_mode(&self, mode: JobControlMode);
}

/// Atomic job control cell shared by everything in one shell.
#[derive(Debug)]
pub struct JobControl {
    mode: AtomicU8,
}

impl JobControl {
    pub fn new(mode: JobControlMode) -> Self {
        Self {
            mode: AtomicU8::new(mode.to_u8()),
        }
    }
}

impl Default for JobControl {
    fn default() -> Self {
        Self::new(JobControlMode::default())
    }
}

impl JobControlStore for JobControl {
    fn job_control_mode(&self) -> JobControlMode {
        JobControlMode::from_u8(self.mode.load(Ordering::Relaxed))
    }

    fn set_job_control_mode(&self, mode: JobControlMode) {
        self.mode.store(mode.to_u8(), Ordering::Relaxed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_accepts_exact_literals_only() {
        assert_eq!("full".parse::<JobControlMode>(), Ok(JobControlMode::All));
        assert_eq!(
            "interactive".parse::<JobControlMode>(),
            Ok(JobControlMode::Interactive)
        );
        assert_eq!("none".parse::<JobControlMode>(), Ok(JobControlMode::None));

        for bad in ["all", "Full", "NONE", "", " none", "interactive "] {
            assert!(bad.parse::<JobControlMode>().is_err(), "{bad:?} parsed");
        }
    }

    #[test]
    fn test_store_round_trips_every_mode() {
        let jc = JobControl::default();
        assert_eq!(jc.job_control_mode(), JobControlMode::Interactive);

        for mode in [
            JobControlMode::None,
            JobControlMode::All,
            JobControlMode::Interactive,
        ] {
            jc.set_job_control_mode(mode);
            assert_eq!(jc.job_control_mode(), mode);
        }
    }

    #[test]
    fn test_display_uses_command_line_spelling() {
        assert_eq!(JobControlMode::All.to_string(), "full");
        assert_eq!(
            JobControlMode::All.to_string().parse::<JobControlMode>(),
            Ok(JobControlMode::All)
        );
    }
}
