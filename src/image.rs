#![allow(clippy::module_name_repetitions)]
//! Docker image helpers.

use crate::config::PullPolicy;
use crate::errors::FixtureError;
use crate::runtime::{argv, DockerClient};

/// Return true if a docker image exists locally (without pulling).
pub fn image_exists(client: &DockerClient, image: &str) -> bool {
    client.succeeds(&argv(["image", "inspect", image]))
}

/// Pull an image; progress output goes to stdout.
pub fn pull_image(client: &DockerClient, image: &str) -> Result<(), FixtureError> {
    tracing::info!(image, "pulling image");
    client.stream(&argv(["pull", image]))
}

/// Make sure `image` is usable according to `policy`. Returns true when a pull happened.
pub fn ensure_image(
    client: &DockerClient,
    image: &str,
    policy: PullPolicy,
) -> Result<bool, FixtureError> {
    match policy {
        PullPolicy::Always => pull_image(client, image).map(|_| true),
        PullPolicy::Missing => {
            if image_exists(client, image) {
                tracing::debug!(image, "image present locally; skipping pull");
                Ok(false)
            } else {
                pull_image(client, image).map(|_| true)
            }
        }
        PullPolicy::Never => Ok(false),
    }
}
