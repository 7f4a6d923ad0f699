//! The node directory: a key-value store of relay id to public key.
//!
//! Served over HTTP by the directory process and consumed through
//! [`HttpDirectoryClient`], which implements the routing core's
//! [`Directory`] seam. Entries are a point-in-time snapshot; nothing here
//! promises a relay still exists by the time its key is used.

use async_trait::async_trait;
use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::info;
use veilnet_routing::{Directory, RelayIdentity, Result, RoutingError};

use crate::http::{self, Ack};

/// Wire shape of `GET /relays`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DirectorySnapshot {
    /// Every currently registered relay
    pub relays: Vec<RelayIdentity>,
}

type SharedRelays = Arc<RwLock<Vec<RelayIdentity>>>;

/// Builds the directory service router with fresh, empty state.
pub fn directory_router() -> Router {
    Router::new()
        .route("/status", get(http::status))
        .route("/relays", get(list).post(publish))
        .with_state(SharedRelays::default())
}

/// Registers a relay; re-publishing an existing id replaces its entry.
async fn publish(
    State(relays): State<SharedRelays>,
    Json(identity): Json<RelayIdentity>,
) -> Json<Ack> {
    let mut relays = relays.write().await;
    info!(relay = identity.id, "relay registered");
    match relays.iter_mut().find(|r| r.id == identity.id) {
        Some(existing) => *existing = identity,
        None => relays.push(identity),
    }
    Ack::ok()
}

/// Returns the current snapshot.
async fn list(State(relays): State<SharedRelays>) -> Json<DirectorySnapshot> {
    Json(DirectorySnapshot {
        relays: relays.read().await.clone(),
    })
}

/// HTTP implementation of the core's [`Directory`] seam.
#[derive(Debug, Clone)]
pub struct HttpDirectoryClient {
    base_url: String,
    client: reqwest::Client,
}

impl HttpDirectoryClient {
    /// Creates a client for the directory at `base_url`.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            client: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl Directory for HttpDirectoryClient {
    async fn publish(&self, identity: &RelayIdentity) -> Result<()> {
        let response = self
            .client
            .post(format!("{}/relays", self.base_url))
            .json(identity)
            .send()
            .await
            .map_err(|e| RoutingError::Directory(e.to_string()))?;
        if !response.status().is_success() {
            return Err(RoutingError::Directory(format!(
                "publish rejected with status {}",
                response.status()
            )));
        }
        Ok(())
    }

    async fn list(&self) -> Result<Vec<RelayIdentity>> {
        let response = self
            .client
            .get(format!("{}/relays", self.base_url))
            .send()
            .await
            .map_err(|e| RoutingError::Directory(e.to_string()))?;
        if !response.status().is_success() {
            return Err(RoutingError::Directory(format!(
                "list rejected with status {}",
                response.status()
            )));
        }
        let snapshot: DirectorySnapshot = response
            .json()
            .await
            .map_err(|e| RoutingError::Directory(e.to_string()))?;
        Ok(snapshot.relays)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn identity(id: u32, key: &str) -> RelayIdentity {
        RelayIdentity {
            id,
            public_key: key.into(),
        }
    }

    #[tokio::test]
    async fn republishing_replaces_the_entry() {
        let relays = SharedRelays::default();

        publish(State(relays.clone()), Json(identity(1, "first"))).await;
        publish(State(relays.clone()), Json(identity(2, "other"))).await;
        publish(State(relays.clone()), Json(identity(1, "rotated"))).await;

        let Json(snapshot) = list(State(relays)).await;
        assert_eq!(snapshot.relays.len(), 2);
        assert_eq!(snapshot.relays[0], identity(1, "rotated"));
        assert_eq!(snapshot.relays[1], identity(2, "other"));
    }
}
