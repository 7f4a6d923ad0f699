//! Node and network configuration.

use serde::{Deserialize, Serialize};
use veilnet_routing::RoutingConfig;

/// Where one overlay process binds and how it addresses the others.
///
/// Routing addresses double as TCP ports in this deployment: relay `n`
/// listens on `relay_address_base + n`, user `m` on `user_address_base + m`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeConfig {
    /// Host every service binds and dials on
    pub host: String,
    /// Port of the directory service
    pub directory_port: u16,
    /// Overlay parameters shared with the routing core
    pub routing: RoutingConfig,
}

impl NodeConfig {
    /// Creates the default local deployment configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the host services bind and dial on.
    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = host.into();
        self
    }

    /// Sets the directory service port.
    pub fn with_directory_port(mut self, port: u16) -> Self {
        self.directory_port = port;
        self
    }

    /// Replaces the routing parameters.
    pub fn with_routing(mut self, routing: RoutingConfig) -> Self {
        self.routing = routing;
        self
    }

    /// Base URL of the directory service.
    pub fn directory_url(&self) -> String {
        format!("http://{}:{}", self.host, self.directory_port)
    }

    /// Base URL of the party listening at a routing address.
    pub fn address_url(&self, address: u64) -> String {
        format!("http://{}:{}", self.host, address)
    }
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".into(),
            directory_port: 8080,
            routing: RoutingConfig::default(),
        }
    }
}

/// How many processes of each role a network launch starts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkConfig {
    /// Per-process configuration shared by every role
    pub node: NodeConfig,
    /// Number of relays to launch
    pub relays: u32,
    /// Number of users to launch
    pub users: u32,
}

impl NetworkConfig {
    /// Creates a launch plan with the given role counts.
    pub fn new(relays: u32, users: u32) -> Self {
        Self {
            node: NodeConfig::default(),
            relays,
            users,
        }
    }

    /// Replaces the per-process configuration.
    pub fn with_node(mut self, node: NodeConfig) -> Self {
        self.node = node;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn urls_follow_the_addressing_convention() {
        let config = NodeConfig::default();
        assert_eq!(config.directory_url(), "http://127.0.0.1:8080");
        assert_eq!(
            config.address_url(config.routing.relay_address(2)),
            "http://127.0.0.1:4002"
        );
    }
}
