#![allow(clippy::module_name_repetitions)]
//! Named volume lookup and removal.

use crate::errors::FixtureError;
use crate::runtime::{argv, DockerClient};

/// Names of all volumes known to the daemon.
pub fn list_volumes(client: &DockerClient) -> Result<Vec<String>, FixtureError> {
    let out = client.output(&argv(["volume", "ls", "--format", "{{.Name}}"]))?;
    Ok(parse_volume_names(&out))
}

fn parse_volume_names(out: &str) -> Vec<String> {
    out.lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(str::to_string)
        .collect()
}

/// Exact-name match; "data" does not match "data-2".
pub fn volume_exists(client: &DockerClient, name: &str) -> Result<bool, FixtureError> {
    Ok(list_volumes(client)?.iter().any(|v| v == name))
}

/// Force-remove a named volume.
pub fn clean_volume(client: &DockerClient, name: &str) -> Result<(), FixtureError> {
    client.output(&argv(["volume", "rm", "-f", name]))?;
    tracing::info!(volume = name, "volume removed");
    Ok(())
}
