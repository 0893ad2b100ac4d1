#![allow(clippy::module_name_repetitions)]
/*!
Container network inspection.

Parses the JSON object printed by:
  docker inspect --format "{{json .NetworkSettings}}" <id>

Extracts the primary IP address (`ip`), the gateway and MAC address, per-network
endpoints and the published port map. Newer engines leave the top-level
`IPAddress` empty for user-defined networks; in that case `ip` falls back to the
`bridge` endpoint, then to the first endpoint (by name) with an address.
*/

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::errors::FixtureError;
use crate::runtime::{argv, DockerClient};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ContainerDetail {
    pub id: String,
    pub ip: String,
    pub gateway: String,
    pub mac_address: String,
    pub networks: BTreeMap<String, NetworkEndpoint>,
    /// "3000/tcp" -> host bindings
    pub ports: BTreeMap<String, Vec<HostBinding>>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkEndpoint {
    #[serde(rename(deserialize = "NetworkID"), default)]
    pub network_id: String,
    #[serde(rename(deserialize = "IPAddress"), default)]
    pub ip_address: String,
    #[serde(rename(deserialize = "Gateway"), default)]
    pub gateway: String,
    #[serde(rename(deserialize = "MacAddress"), default)]
    pub mac_address: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostBinding {
    #[serde(rename(deserialize = "HostIp"), default)]
    pub host_ip: String,
    #[serde(rename(deserialize = "HostPort"), default)]
    pub host_port: String,
}

#[derive(Debug, Default, Deserialize)]
struct RawNetworkSettings {
    #[serde(rename = "IPAddress", default)]
    ip_address: String,
    #[serde(rename = "Gateway", default)]
    gateway: String,
    #[serde(rename = "MacAddress", default)]
    mac_address: String,
    #[serde(rename = "Networks", default)]
    networks: Option<BTreeMap<String, NetworkEndpoint>>,
    #[serde(rename = "Ports", default)]
    ports: Option<BTreeMap<String, Option<Vec<HostBinding>>>>,
}

pub fn parse_network_settings(id: &str, raw: &str) -> Result<ContainerDetail, FixtureError> {
    let settings: RawNetworkSettings = serde_json::from_str(raw.trim()).map_err(|e| {
        FixtureError::Message(format!(
            "failed to parse network settings for container {id}: {e}"
        ))
    })?;

    let networks = settings.networks.unwrap_or_default();
    let ports = settings
        .ports
        .unwrap_or_default()
        .into_iter()
        .map(|(k, v)| (k, v.unwrap_or_default()))
        .collect();

    let fallback = networks
        .get("bridge")
        .filter(|n| !n.ip_address.is_empty())
        .or_else(|| networks.values().find(|n| !n.ip_address.is_empty()));

    let (ip, gateway, mac_address) = if !settings.ip_address.is_empty() {
        (settings.ip_address, settings.gateway, settings.mac_address)
    } else if let Some(ep) = fallback {
        (
            ep.ip_address.clone(),
            ep.gateway.clone(),
            ep.mac_address.clone(),
        )
    } else {
        (String::new(), settings.gateway, settings.mac_address)
    };

    Ok(ContainerDetail {
        id: id.to_string(),
        ip,
        gateway,
        mac_address,
        networks,
        ports,
    })
}

pub fn find_container_details(
    client: &DockerClient,
    id: &str,
) -> Result<ContainerDetail, FixtureError> {
    let raw = client.output(&argv([
        "inspect",
        "--type",
        "container",
        "--format",
        "{{json .NetworkSettings}}",
        id,
    ]))?;
    parse_network_settings(id, &raw)
}
