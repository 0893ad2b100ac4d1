#![allow(clippy::module_name_repetitions)]
//! TCP readiness checks for published fixture ports.

use std::net::{TcpStream, ToSocketAddrs};
use std::time::Duration;

use crate::errors::FixtureError;

/// Fixed-budget dial loop: `attempts` dials, `interval` apart, no backoff.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WaitPolicy {
    pub host: String,
    pub attempts: u32,
    pub interval: Duration,
    pub connect_timeout: Duration,
}

impl Default for WaitPolicy {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            attempts: 4,
            interval: Duration::from_secs(1),
            connect_timeout: Duration::from_secs(1),
        }
    }
}

pub fn is_host_port_reachable(host: &str, port: u16, timeout: Duration) -> bool {
    let addrs = (host, port).to_socket_addrs();
    if let Ok(addrs) = addrs {
        for addr in addrs {
            if TcpStream::connect_timeout(&addr, timeout).is_ok() {
                return true;
            }
        }
    }
    false
}

/// Dial `policy.host:port` until a connection succeeds or the budget is spent.
pub fn wait_for_service(port: u16, policy: &WaitPolicy) -> Result<(), FixtureError> {
    let attempts = policy.attempts.max(1);
    for attempt in 1..=attempts {
        if is_host_port_reachable(&policy.host, port, policy.connect_timeout) {
            tracing::info!(host = %policy.host, port, attempt, "service port reachable");
            return Ok(());
        }
        tracing::warn!(
            host = %policy.host,
            port,
            attempt,
            attempts,
            "service port not reachable yet"
        );
        if attempt < attempts {
            std::thread::sleep(policy.interval);
        }
    }
    Err(FixtureError::Unreachable {
        host: policy.host.clone(),
        port,
        attempts,
    })
}
