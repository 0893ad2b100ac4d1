#![allow(clippy::module_name_repetitions)]
//! Environment-driven fixture configuration.
//!
//! All variables are trimmed; empty values are treated as unset. Parsing goes
//! through `from_lookup` so tests can supply values without touching the
//! process environment.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use crate::wait::WaitPolicy;

pub const ENV_API_VERSION: &str = "DAHU_FIXTURES_DOCKER_API_VERSION";
pub const ENV_VERBOSE: &str = "DAHU_FIXTURES_VERBOSE";
pub const ENV_PULL: &str = "DAHU_FIXTURES_PULL";
pub const ENV_WAIT_HOST: &str = "DAHU_FIXTURES_WAIT_HOST";
pub const ENV_WAIT_ATTEMPTS: &str = "DAHU_FIXTURES_WAIT_ATTEMPTS";
pub const ENV_WAIT_INTERVAL_MS: &str = "DAHU_FIXTURES_WAIT_INTERVAL_MS";
pub const ENV_COMMAND_TIMEOUT_SECS: &str = "DAHU_FIXTURES_COMMAND_TIMEOUT_SECS";
pub const ENV_REPLACE_EXISTING: &str = "DAHU_FIXTURES_REPLACE_EXISTING";
pub const ENV_GOGS_IMAGE: &str = "DAHU_FIXTURES_GOGS_IMAGE";
pub const ENV_REGISTRY_IMAGE: &str = "DAHU_FIXTURES_REGISTRY_IMAGE";
pub const ENV_LOCK_DIR: &str = "DAHU_FIXTURES_LOCK_DIR";

/// When to pull fixture images before creating a container.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PullPolicy {
    /// Pull on every start.
    Always,
    /// Pull only when `docker image inspect` fails.
    Missing,
    /// Never pull; creation fails if the image is absent.
    Never,
}

impl PullPolicy {
    pub fn parse(s: &str) -> Option<PullPolicy> {
        match s.trim().to_ascii_lowercase().as_str() {
            "always" => Some(PullPolicy::Always),
            "missing" | "if-missing" | "if_missing" => Some(PullPolicy::Missing),
            "never" => Some(PullPolicy::Never),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PullPolicy::Always => "always",
            PullPolicy::Missing => "missing",
            PullPolicy::Never => "never",
        }
    }
}

#[derive(Debug, Clone)]
pub struct FixtureConfig {
    pub api_version: Option<String>,
    pub verbose: bool,
    pub pull_policy: PullPolicy,
    pub wait: WaitPolicy,
    pub command_timeout: Duration,
    pub replace_existing: bool,
    pub gogs_image: Option<String>,
    pub registry_image: Option<String>,
    pub lock_dir: PathBuf,
}

impl Default for FixtureConfig {
    fn default() -> Self {
        Self {
            api_version: None,
            verbose: false,
            pull_policy: PullPolicy::Always,
            wait: WaitPolicy::default(),
            command_timeout: Duration::from_secs(120),
            replace_existing: true,
            gogs_image: None,
            registry_image: None,
            lock_dir: env::temp_dir(),
        }
    }
}

impl FixtureConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|k| env::var(k).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |k: &str| -> Option<String> {
            lookup(k)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let mut cfg = FixtureConfig::default();

        cfg.api_version = get(ENV_API_VERSION).or_else(|| get("DOCKER_API_VERSION"));
        cfg.verbose = get(ENV_VERBOSE).map(|v| is_truthy(&v)).unwrap_or(false);

        if let Some(p) = get(ENV_PULL) {
            match PullPolicy::parse(&p) {
                Some(policy) => cfg.pull_policy = policy,
                None => tracing::warn!(value = %p, "ignoring unknown {}", ENV_PULL),
            }
        }

        if let Some(host) = get(ENV_WAIT_HOST) {
            cfg.wait.host = host;
        } else if let Some(host) = get("DOCKER_HOST").and_then(|h| docker_host_tcp_host(&h)) {
            cfg.wait.host = host;
        }
        if let Some(n) = get(ENV_WAIT_ATTEMPTS).and_then(|v| v.parse::<u32>().ok()) {
            cfg.wait.attempts = n.max(1);
        }
        if let Some(ms) = get(ENV_WAIT_INTERVAL_MS).and_then(|v| v.parse::<u64>().ok()) {
            cfg.wait.interval = Duration::from_millis(ms);
        }
        if let Some(secs) = get(ENV_COMMAND_TIMEOUT_SECS).and_then(|v| v.parse::<u64>().ok()) {
            cfg.command_timeout = Duration::from_secs(secs);
        }
        if let Some(v) = get(ENV_REPLACE_EXISTING) {
            cfg.replace_existing = is_truthy(&v);
        }

        cfg.gogs_image = get(ENV_GOGS_IMAGE);
        cfg.registry_image = get(ENV_REGISTRY_IMAGE);
        if let Some(dir) = get(ENV_LOCK_DIR) {
            cfg.lock_dir = PathBuf::from(dir);
        }
        cfg
    }

    /// Explicit caller version wins; an empty one falls back to the configured version.
    pub fn effective_api_version(&self, requested: &str) -> Option<String> {
        let r = requested.trim();
        if r.is_empty() {
            self.api_version.clone()
        } else {
            Some(r.to_string())
        }
    }
}

fn is_truthy(v: &str) -> bool {
    matches!(
        v.to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

/// Host part of a `tcp://` DOCKER_HOST; published ports live on that host.
pub fn docker_host_tcp_host(docker_host: &str) -> Option<String> {
    let parsed = url::Url::parse(docker_host.trim()).ok()?;
    if parsed.scheme() != "tcp" {
        return None;
    }
    parsed
        .host_str()
        .map(|h| h.trim_start_matches('[').trim_end_matches(']').to_string())
        .filter(|h| !h.is_empty())
}
