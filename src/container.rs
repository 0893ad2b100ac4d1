#![allow(clippy::module_name_repetitions)]
//! Container lifecycle: create, start, remove.

use crate::errors::FixtureError;
use crate::runtime::{argv, DockerClient};

/// One exposed container port and its host binding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PortBinding {
    pub host_ip: String,
    pub host_port: u16,
    pub container_port: u16,
    pub protocol: String,
}

impl PortBinding {
    /// TCP binding on all host interfaces.
    pub fn tcp(host_port: u16, container_port: u16) -> Self {
        Self {
            host_ip: "0.0.0.0".to_string(),
            host_port,
            container_port,
            protocol: "tcp".to_string(),
        }
    }

    /// `HOSTIP:HOSTPORT:CONTAINERPORT/PROTO`, as accepted by `docker create -p`.
    pub fn publish_arg(&self) -> String {
        format!(
            "{}:{}:{}/{}",
            self.host_ip, self.host_port, self.container_port, self.protocol
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContainerSpec {
    pub name: String,
    pub image: String,
    pub ports: Vec<PortBinding>,
}

/// Full `docker create` argv (including the leading "docker").
pub fn build_create_preview(spec: &ContainerSpec) -> Vec<String> {
    let mut args: Vec<String> = vec![
        "docker".to_string(),
        "create".to_string(),
        "--name".to_string(),
        spec.name.clone(),
    ];
    for p in &spec.ports {
        args.push("-p".to_string());
        args.push(p.publish_arg());
    }
    args.push(spec.image.clone());
    args
}

/// Create the container and return its id.
pub fn create_container(
    client: &DockerClient,
    spec: &ContainerSpec,
) -> Result<String, FixtureError> {
    let args = build_create_preview(spec);
    let out = client.output(&args[1..])?;
    // docker may print pull/platform warnings before the id; the id is the last line
    let id = out
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .last()
        .unwrap_or("")
        .to_string();
    if id.is_empty() {
        return Err(FixtureError::Message(format!(
            "docker create returned no container id for {}",
            spec.name
        )));
    }
    tracing::info!(name = %spec.name, id = %id, "container created");
    Ok(id)
}

pub fn start_container(client: &DockerClient, id: &str) -> Result<(), FixtureError> {
    client.output(&argv(["start", id]))?;
    tracing::info!(id, "container started");
    Ok(())
}

/// Force-remove a container together with its anonymous volumes.
pub fn remove_container(client: &DockerClient, id: &str) -> Result<(), FixtureError> {
    client.output(&argv(["rm", "-f", "-v", id]))?;
    tracing::info!(id, "container removed");
    Ok(())
}

/// True when `docker container inspect` resolves the name or id.
pub fn container_exists(client: &DockerClient, name_or_id: &str) -> bool {
    client.succeeds(&argv(["container", "inspect", name_or_id]))
}

/// `Some(running)` for an existing container, `None` when docker does not know it.
pub fn container_running(client: &DockerClient, name_or_id: &str) -> Option<bool> {
    client
        .output(&argv([
            "container",
            "inspect",
            "--format",
            "{{.State.Running}}",
            name_or_id,
        ]))
        .ok()
        .map(|state| state.trim() == "true")
}
