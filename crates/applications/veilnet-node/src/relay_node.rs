//! The relay role: one process that peels one layer per inbound message.

use anyhow::Context;
use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};
use veilnet_crypto::asymmetric;
use veilnet_routing::{Directory, OnionEnvelope, RelayDiagnostics, RelayIdentity, RelayProcessor};

use crate::config::NodeConfig;
use crate::directory::HttpDirectoryClient;
use crate::forwarder::HttpForwarder;
use crate::http::{self, routing_error_response, Ack, ErrorBody};

/// State shared by the relay's handlers.
#[derive(Clone)]
pub struct RelayState {
    processor: Arc<RelayProcessor>,
    forwarder: Arc<HttpForwarder>,
    identity: RelayIdentity,
}

/// Builds the relay service router.
pub fn relay_router(state: RelayState) -> Router {
    Router::new()
        .route("/status", get(http::status))
        .route("/identity", get(identity))
        .route("/diagnostics", get(diagnostics))
        .route("/message", post(message))
        .with_state(state)
}

/// Generates this relay's key pair, publishes its identity to the directory
/// exactly once, then serves until the process exits.
///
/// The returned handle owns the serving task; dropping it does not stop the
/// relay.
pub async fn launch_relay(relay_id: u32, node: NodeConfig) -> anyhow::Result<JoinHandle<()>> {
    let keypair = asymmetric::generate_keypair()?;
    let identity = RelayIdentity {
        id: relay_id,
        public_key: asymmetric::export_public_key(keypair.public())?,
    };

    HttpDirectoryClient::new(node.directory_url())
        .publish(&identity)
        .await
        .context("failed to publish relay identity")?;

    let address = node.routing.relay_address(relay_id);
    let port = u16::try_from(address)
        .with_context(|| format!("relay address {address} does not fit a TCP port"))?;

    let state = RelayState {
        processor: Arc::new(RelayProcessor::new(relay_id, keypair.private().clone())),
        forwarder: Arc::new(HttpForwarder::new(node.clone())),
        identity,
    };

    let listener = tokio::net::TcpListener::bind((node.host.as_str(), port))
        .await
        .with_context(|| format!("relay {relay_id} failed to bind port {port}"))?;
    info!(relay = relay_id, address, "relay listening");

    Ok(tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, relay_router(state)).await {
            error!(relay = relay_id, error = %e, "relay server exited");
        }
    }))
}

/// Peels one layer and forwards the remainder; the whole unit of work
/// completes before the acknowledgment is emitted.
async fn message(
    State(state): State<RelayState>,
    Json(envelope): Json<OnionEnvelope>,
) -> Result<Json<Ack>, (StatusCode, Json<ErrorBody>)> {
    match state
        .processor
        .process(envelope, state.forwarder.as_ref())
        .await
    {
        Ok(_trail) => Ok(Ack::ok()),
        Err(err) => {
            warn!(relay = state.processor.id(), error = %err, "message rejected");
            Err(routing_error_response(err))
        }
    }
}

/// The identity this relay published at startup.
async fn identity(State(state): State<RelayState>) -> Json<RelayIdentity> {
    Json(state.identity.clone())
}

/// Introspection snapshot; never consulted by the protocol.
async fn diagnostics(State(state): State<RelayState>) -> Json<RelayDiagnostics> {
    Json(state.processor.diagnostics())
}
