#![allow(clippy::module_name_repetitions)]
//! Docker-backed fixtures for the Dahu integration suite.
//!
//! Starts and stops the Gogs git server and Docker registry containers the
//! suite depends on, waits for their published TCP ports, inspects container
//! network details and manages named volumes. Docker is driven through the
//! `docker` CLI; the API version is pinned per call via `DOCKER_API_VERSION`.
//!
//! ```no_run
//! let id = dahu_fixtures::start_gogs("1.41");
//! let detail = dahu_fixtures::find_container_details(&id, "1.41");
//! println!("gogs at {}", detail.ip);
//! dahu_fixtures::stop_container(&id, "1.41");
//! ```

pub mod config;
pub mod container;
pub mod errors;
pub mod fixtures;
pub mod image;
pub mod inspect;
pub mod lock;
pub mod runtime;
pub mod telemetry;
pub mod util;
pub mod volume;
pub mod wait;

pub use config::{FixtureConfig, PullPolicy};
pub use container::{
    build_create_preview, container_exists, container_running, create_container, remove_container,
    start_container, ContainerSpec, PortBinding,
};
pub use errors::{
    display_for_fixture_error, exit_code_for_fixture_error, exit_code_for_io_error, fail_fast,
    FixtureError,
};
pub use fixtures::{
    clean_volume, find_container_details, start_docker_registry, start_gogs, stop_container,
    volume_exist, FixtureSpec, Fixtures,
};
pub use image::{ensure_image, image_exists, pull_image};
pub use inspect::{parse_network_settings, ContainerDetail, HostBinding, NetworkEndpoint};
pub use lock::{acquire_fixture_lock, acquire_lock_at, fixture_lock_path, FixtureLock};
pub use runtime::{container_runtime_path, DockerClient};
pub use telemetry::init_logging;
pub use util::{shell_escape, shell_join};
pub use volume::{list_volumes, volume_exists};
pub use wait::{is_host_port_reachable, wait_for_service, WaitPolicy};
