use std::env;
use std::io;
use std::path::{Path, PathBuf};
use tracing::warn;

/// Finds the file the running shell was started from.
pub trait ExecutableLocator {
    fn executable_path(&self) -> io::Result<PathBuf>;
}

/// Asks the OS for the current executable, falling back to `argv[0]`.
///
/// The fallback may be relative or a bare name looked up through `$PATH`, in which case
/// it is only meaningful from the parent process's point of view.
#[derive(Debug, Clone, Default)]
pub struct ProcessExecutable {
    argv0: Option<String>,
}

impl ProcessExecutable {
    pub fn new(argv0: Option<String>) -> Self {
        Self { argv0 }
    }
}

impl ExecutableLocator for ProcessExecutable {
    fn executable_path(&self) -> io::Result<PathBuf> {
        match env::current_exe() {
            Ok(path) => Ok(path),
            Err(e) => match self.argv0.as_deref() {
                Some(argv0) if !argv0.is_empty() => Ok(PathBuf::from(argv0)),
                _ => Err(e),
            },
        }
    }
}

/// Resolve the executable path for display.
///
/// Absolute paths are canonicalized when the target can be resolved; otherwise the
/// path is returned as given. Relative paths are returned unchanged.
pub fn display_executable_path(locator: &dyn ExecutableLocator) -> io::Result<PathBuf> {
    let path = locator.executable_path()?;
    if path.as_os_str().is_empty() {
        return Err(io::Error::new(
            io::ErrorKind::NotFound,
            "executable path is empty",
        ));
    }
    if !path.is_absolute() {
        return Ok(path);
    }
    match path.canonicalize() {
        Ok(real) if real.exists() => Ok(real),
        Ok(_) => Ok(path),
        Err(e) => {
            warn!(path = %path.display(), error = %e, "could not canonicalize executable path");
            Ok(path)
        }
    }
}

/// Final component of `path`, following POSIX `basename`.
pub fn basename(path: &str) -> &str {
    let trimmed = path.trim_end_matches('/');
    if trimmed.is_empty() {
        return if path.is_empty() { "." } else { "/" };
    }
    match trimmed.rfind('/') {
        Some(idx) => &trimmed[idx + 1..],
        None => trimmed,
    }
}

/// Everything but the final component of `path`, following POSIX `dirname`.
pub fn dirname(path: &str) -> &str {
    let trimmed = path.trim_end_matches('/');
    if trimmed.is_empty() {
        return if path.is_empty() { "." } else { "/" };
    }
    match trimmed.rfind('/') {
        Some(idx) => {
            let parent = trimmed[..idx].trim_end_matches('/');
            if parent.is_empty() { "/" } else { parent }
        }
        None => ".",
    }
}
