#![allow(clippy::module_name_repetitions)]
/*!
Fixture lifecycle for the integration suite.

- `Fixtures`: Result-returning API (config from environment, injectable client)
- free functions `start_gogs`, `start_docker_registry`, `stop_container`,
  `find_container_details`, `volume_exist`, `clean_volume`: panicking facade for tests
*/
use std::time::Duration;

use crate::config::FixtureConfig;
use crate::container::{
    container_running, create_container, remove_container, start_container, ContainerSpec,
    PortBinding,
};
use crate::errors::{fail_fast, FixtureError};
use crate::image::ensure_image;
use crate::inspect::{self, ContainerDetail};
use crate::lock::acquire_fixture_lock;
use crate::runtime::DockerClient;
use crate::volume;
use crate::wait::wait_for_service;

pub const GOGS_IMAGE: &str = "jerdct/dahu-gogs";
pub const GOGS_CONTAINER_NAME: &str = "gogs_for_test";
pub const GOGS_SSH_PORT: u16 = 10022;
pub const GOGS_HTTP_PORT: u16 = 10080;

pub const DOCKER_REGISTRY_IMAGE: &str = "jerdct/dahu-docker-registry";
pub const DOCKER_REGISTRY_CONTAINER_NAME: &str = "docker_registry_for_test";
pub const DOCKER_REGISTRY_PORT: u16 = 5000;

const LOCK_TIMEOUT: Duration = Duration::from_secs(300);

/// A container the suite depends on, plus the host port that signals readiness.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixtureSpec {
    pub name: String,
    pub image: String,
    pub ports: Vec<PortBinding>,
    pub wait_port: u16,
}

impl FixtureSpec {
    /// Gogs git server: ssh 22 -> 10022, http 3000 -> 10080.
    pub fn gogs() -> Self {
        Self {
            name: GOGS_CONTAINER_NAME.to_string(),
            image: GOGS_IMAGE.to_string(),
            ports: vec![
                PortBinding::tcp(GOGS_SSH_PORT, 22),
                PortBinding::tcp(GOGS_HTTP_PORT, 3000),
            ],
            wait_port: GOGS_HTTP_PORT,
        }
    }

    /// Docker registry: 5000 -> 5000.
    pub fn docker_registry() -> Self {
        Self {
            name: DOCKER_REGISTRY_CONTAINER_NAME.to_string(),
            image: DOCKER_REGISTRY_IMAGE.to_string(),
            ports: vec![PortBinding::tcp(DOCKER_REGISTRY_PORT, 5000)],
            wait_port: DOCKER_REGISTRY_PORT,
        }
    }

    pub fn with_image(mut self, image: Option<&str>) -> Self {
        if let Some(img) = image {
            self.image = img.to_string();
        }
        self
    }

    pub fn container_spec(&self) -> ContainerSpec {
        ContainerSpec {
            name: self.name.clone(),
            image: self.image.clone(),
            ports: self.ports.clone(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Fixtures {
    client: DockerClient,
    config: FixtureConfig,
}

impl Fixtures {
    /// Docker client for `api_version` with configuration read from the environment.
    pub fn new(api_version: &str) -> Result<Self, FixtureError> {
        let config = FixtureConfig::from_env();
        let client = DockerClient::with_config(api_version, &config)?;
        Ok(Self { client, config })
    }

    pub fn with_client(client: DockerClient, config: FixtureConfig) -> Self {
        Self { client, config }
    }

    pub fn client(&self) -> &DockerClient {
        &self.client
    }

    /// Pull, create, start and wait for `spec`; returns the container id.
    pub fn start(&self, spec: &FixtureSpec) -> Result<String, FixtureError> {
        let _lock = acquire_fixture_lock(&self.config.lock_dir, &spec.name, LOCK_TIMEOUT)?;

        ensure_image(&self.client, &spec.image, self.config.pull_policy)?;

        if self.config.replace_existing {
            match container_running(&self.client, &spec.name) {
                Some(true) => {
                    return Err(FixtureError::Message(format!(
                        "fixture container {} is already running; stop it first",
                        spec.name
                    )));
                }
                Some(false) => {
                    tracing::warn!(name = %spec.name, "removing stale fixture container");
                    remove_container(&self.client, &spec.name)?;
                }
                None => {}
            }
        }

        let id = create_container(&self.client, &spec.container_spec())?;
        start_container(&self.client, &id)?;
        wait_for_service(spec.wait_port, &self.config.wait)?;
        tracing::info!(name = %spec.name, id = %id, port = spec.wait_port, "fixture ready");
        Ok(id)
    }

    pub fn start_gogs(&self) -> Result<String, FixtureError> {
        let spec = FixtureSpec::gogs().with_image(self.config.gogs_image.as_deref());
        self.start(&spec)
    }

    pub fn start_docker_registry(&self) -> Result<String, FixtureError> {
        let spec =
            FixtureSpec::docker_registry().with_image(self.config.registry_image.as_deref());
        self.start(&spec)
    }

    pub fn stop_container(&self, id: &str) -> Result<(), FixtureError> {
        remove_container(&self.client, id)
    }

    pub fn find_container_details(&self, id: &str) -> Result<ContainerDetail, FixtureError> {
        inspect::find_container_details(&self.client, id)
    }

    pub fn volume_exists(&self, name: &str) -> Result<bool, FixtureError> {
        volume::volume_exists(&self.client, name)
    }

    pub fn clean_volume(&self, name: &str) -> Result<(), FixtureError> {
        volume::clean_volume(&self.client, name)
    }
}

/// Start the Gogs fixture and return its container id; panics on failure.
#[track_caller]
pub fn start_gogs(api_version: &str) -> String {
    fail_fast(Fixtures::new(api_version).and_then(|f| f.start_gogs()))
}

/// Start the Docker registry fixture and return its container id; panics on failure.
#[track_caller]
pub fn start_docker_registry(api_version: &str) -> String {
    fail_fast(Fixtures::new(api_version).and_then(|f| f.start_docker_registry()))
}

#[track_caller]
pub fn stop_container(id: &str, api_version: &str) {
    fail_fast(Fixtures::new(api_version).and_then(|f| f.stop_container(id)))
}

#[track_caller]
pub fn find_container_details(id: &str, api_version: &str) -> ContainerDetail {
    fail_fast(Fixtures::new(api_version).and_then(|f| f.find_container_details(id)))
}

#[track_caller]
pub fn volume_exist(name: &str, api_version: &str) -> bool {
    fail_fast(Fixtures::new(api_version).and_then(|f| f.volume_exists(name)))
}

#[track_caller]
pub fn clean_volume(name: &str, api_version: &str) {
    fail_fast(Fixtures::new(api_version).and_then(|f| f.clean_volume(name)))
}
