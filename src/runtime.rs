#![allow(clippy::module_name_repetitions)]
//! Docker runtime discovery and the docker CLI client used by every fixture operation.

use std::env;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use which::which;

use crate::config::FixtureConfig;
use crate::errors::FixtureError;
use crate::util::{shell_join, ExecOutput, ExecRequest, ExecService};

pub const ENV_DOCKER_PATH: &str = "DAHU_FIXTURES_DOCKER";
pub const ENV_SKIP_DOCKER: &str = "DAHU_FIXTURES_SKIP_DOCKER";

pub fn container_runtime_path() -> io::Result<PathBuf> {
    // Allow tests or callers to explicitly disable Docker detection to avoid hard failures
    if env::var(ENV_SKIP_DOCKER).ok().as_deref() == Some("1") {
        return Err(io::Error::new(
            io::ErrorKind::NotFound,
            "Docker disabled by environment override.",
        ));
    }

    if let Ok(p) = env::var(ENV_DOCKER_PATH) {
        let p = p.trim();
        if !p.is_empty() {
            let path = PathBuf::from(p);
            if path.is_file() {
                return Ok(path);
            }
            return Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("{ENV_DOCKER_PATH} points to a missing file: {}", path.display()),
            ));
        }
    }

    if let Ok(p) = which("docker") {
        return Ok(p);
    }
    Err(io::Error::new(
        io::ErrorKind::NotFound,
        "Docker is required but was not found in PATH.",
    ))
}

/// Docker CLI invoker pinned to one runtime binary and (optionally) one API version.
#[derive(Debug, Clone)]
pub struct DockerClient {
    runtime: PathBuf,
    api_version: Option<String>,
    exec: ExecService,
    verbose: bool,
}

impl DockerClient {
    /// Locate docker and pin the API version (empty means negotiate).
    pub fn new(api_version: &str) -> Result<Self, FixtureError> {
        let cfg = FixtureConfig::from_env();
        Self::with_config(api_version, &cfg)
    }

    pub fn with_config(api_version: &str, cfg: &FixtureConfig) -> Result<Self, FixtureError> {
        let runtime = container_runtime_path()
            .map_err(|e| FixtureError::RuntimeNotFound(e.to_string()))?;
        Ok(Self::from_parts(
            runtime,
            cfg.effective_api_version(api_version),
            cfg.command_timeout,
            cfg.verbose,
        ))
    }

    pub fn from_parts(
        runtime: PathBuf,
        api_version: Option<String>,
        timeout: Duration,
        verbose: bool,
    ) -> Self {
        Self {
            runtime,
            api_version: api_version.filter(|v| !v.trim().is_empty()),
            exec: ExecService::new(timeout),
            verbose,
        }
    }

    pub fn runtime(&self) -> &Path {
        &self.runtime
    }

    pub fn api_version(&self) -> Option<&str> {
        self.api_version.as_deref()
    }

    fn preview(&self, args: &[String]) -> String {
        let mut words = vec!["docker".to_string()];
        words.extend(args.iter().cloned());
        shell_join(&words)
    }

    fn request(&self, args: &[String], capture: bool, timeout: Option<Duration>) -> ExecRequest {
        let preview = self.preview(args);
        tracing::debug!(api_version = ?self.api_version, "docker: {}", preview);
        if self.verbose {
            eprintln!("dahu-fixtures: docker: {}", preview);
        }
        let mut req = ExecRequest::new(&self.runtime)
            .args(args.iter().cloned())
            .capture_output(capture);
        // Unpinned means negotiate: an inherited DOCKER_API_VERSION must not leak through.
        req = match &self.api_version {
            Some(v) => req.env("DOCKER_API_VERSION", v),
            None => req.env_remove("DOCKER_API_VERSION"),
        };
        if let Some(t) = timeout {
            req = req.timeout(t);
        }
        req
    }

    fn run(&self, req: ExecRequest) -> Result<ExecOutput, FixtureError> {
        self.exec.run(req).map_err(|e| {
            match e.downcast_ref::<io::Error>() {
                Some(ioe) if ioe.kind() == io::ErrorKind::NotFound => FixtureError::RuntimeNotFound(
                    format!("docker runtime not found: {}", self.runtime.display()),
                ),
                _ => FixtureError::Exec(e),
            }
        })
    }

    fn check(&self, args: &[String], out: ExecOutput) -> Result<ExecOutput, FixtureError> {
        if out.status.success() {
            Ok(out)
        } else {
            Err(FixtureError::Docker {
                command: self.preview(args),
                code: out.status.code(),
                stderr: out.stderr.trim().to_string(),
            })
        }
    }

    /// Run a docker subcommand and return its trimmed stdout; non-zero exit is an error.
    pub fn output(&self, args: &[String]) -> Result<String, FixtureError> {
        let out = self.run(self.request(args, true, None))?;
        let out = self.check(args, out)?;
        Ok(out.stdout.trim().to_string())
    }

    /// Boolean check: true on exit 0, false on any failure.
    pub fn succeeds(&self, args: &[String]) -> bool {
        match self.run(self.request(args, true, None)) {
            Ok(out) => out.status.success(),
            Err(e) => {
                tracing::debug!(error = %e, "docker probe failed to run");
                false
            }
        }
    }

    /// Run with stdout streamed to this process and no timeout (image pulls).
    pub fn stream(&self, args: &[String]) -> Result<(), FixtureError> {
        let out = self.run(self.request(args, false, Some(Duration::ZERO)))?;
        self.check(args, out).map(|_| ())
    }
}

/// Build an owned argv from string literals and borrowed values.
pub(crate) fn argv<I, S>(parts: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    parts.into_iter().map(|s| s.as_ref().to_string()).collect()
}
