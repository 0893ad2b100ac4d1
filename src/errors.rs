//! Error mapping guide:
//! - Map io::ErrorKind::NotFound (and a missing docker runtime) to exit code 127; all others to 1.
//! - Docker failures keep the daemon's stderr verbatim so test logs show the real cause.
//! - `fail_fast` is the panicking policy used by the test-suite facade in `fixtures`.
use std::fmt;
use std::io;

/// Errors surfaced by fixture operations.
#[derive(Debug)]
pub enum FixtureError {
    Io(io::Error),
    /// The docker client binary could not be located (or was disabled).
    RuntimeNotFound(String),
    /// A docker subcommand ran but exited non-zero.
    Docker {
        command: String,
        code: Option<i32>,
        stderr: String,
    },
    /// A TCP readiness wait exhausted its attempts.
    Unreachable {
        host: String,
        port: u16,
        attempts: u32,
    },
    Exec(anyhow::Error),
    Message(String),
}

impl fmt::Display for FixtureError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FixtureError::Io(e) => write!(f, "{e}"),
            FixtureError::RuntimeNotFound(s) => write!(f, "{s}"),
            FixtureError::Docker {
                command,
                code,
                stderr,
            } => {
                let code = code
                    .map(|c| c.to_string())
                    .unwrap_or_else(|| "signal".to_string());
                if stderr.is_empty() {
                    write!(f, "docker command failed (exit {code}): {command}")
                } else {
                    write!(f, "docker command failed (exit {code}): {command}: {stderr}")
                }
            }
            FixtureError::Unreachable {
                host,
                port,
                attempts,
            } => write!(
                f,
                "service port {host}:{port} unreachable after {attempts} attempts"
            ),
            FixtureError::Exec(e) => write!(f, "{e:#}"),
            FixtureError::Message(s) => write!(f, "{s}"),
        }
    }
}

impl std::error::Error for FixtureError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            FixtureError::Io(e) => Some(e),
            FixtureError::Exec(e) => Some(e.as_ref()),
            _ => None,
        }
    }
}

impl From<io::Error> for FixtureError {
    fn from(e: io::Error) -> Self {
        FixtureError::Io(e)
    }
}

impl From<anyhow::Error> for FixtureError {
    fn from(e: anyhow::Error) -> Self {
        FixtureError::Exec(e)
    }
}

/// Map an io::Error to a process exit code:
/// - 127 for NotFound (command not found)
/// - 1 for all other errors
pub fn exit_code_for_io_error(e: &io::Error) -> u8 {
    if e.kind() == io::ErrorKind::NotFound {
        127
    } else {
        1
    }
}

/// Convert FixtureError to exit code (parity with io::Error mapping).
pub fn exit_code_for_fixture_error(e: &FixtureError) -> u8 {
    match e {
        FixtureError::Io(ioe) => exit_code_for_io_error(ioe),
        FixtureError::RuntimeNotFound(_) => 127,
        _ => 1,
    }
}

/// Render a user-facing string for FixtureError.
pub fn display_for_fixture_error(e: &FixtureError) -> String {
    e.to_string()
}

/// Print the error and panic; returns the value otherwise.
#[track_caller]
pub fn fail_fast<T>(result: Result<T, FixtureError>) -> T {
    match result {
        Ok(v) => v,
        Err(e) => {
            let msg = display_for_fixture_error(&e);
            eprintln!("{msg}");
            panic!("{msg}");
        }
    }
}
