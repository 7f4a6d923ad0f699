//! HTTP implementation of the per-hop forward call.

use async_trait::async_trait;
use tracing::debug;
use veilnet_routing::{Forwarder, OnionEnvelope, Result, RoutingError};

use crate::config::NodeConfig;

/// Forwards envelopes as `POST {address}/message`.
///
/// Only transport-level failures (connection refused, DNS, broken pipe)
/// count as a failed forward: once the next hop has taken the bytes, its
/// verdict on them is its own business. That keeps failures deeper in the
/// circuit invisible to earlier hops, as the protocol requires.
#[derive(Debug, Clone)]
pub struct HttpForwarder {
    node: NodeConfig,
    client: reqwest::Client,
}

impl HttpForwarder {
    /// Creates a forwarder that dials addresses under `node`'s host.
    pub fn new(node: NodeConfig) -> Self {
        Self {
            node,
            client: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl Forwarder for HttpForwarder {
    async fn forward(&self, address: u64, envelope: OnionEnvelope) -> Result<()> {
        let url = format!("{}/message", self.node.address_url(address));
        let response = self
            .client
            .post(url)
            .json(&envelope)
            .send()
            .await
            .map_err(|e| RoutingError::Routing(format!("next hop {address} unreachable: {e}")))?;
        debug!(address, status = %response.status(), "envelope forwarded");
        Ok(())
    }
}
