use crate::api::DEFAULT_BASE_URL;
use std::net::SocketAddr;

/// Default listen address of the proxy.
pub const DEFAULT_BIND: &str = "127.0.0.1:8888";

/// Runtime settings shared by the binaries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub bind: SocketAddr,
    /// Data360 `/data` endpoint (overridable for staging mirrors and tests).
    pub upstream_url: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind: SocketAddr::from(([127, 0, 0, 1], 8888)),
            upstream_url: DEFAULT_BASE_URL.to_string(),
        }
    }
}
