//! The user role: builds onions on demand and receives delivered plaintext.

use anyhow::Context;
use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};
use veilnet_routing::{
    AuditTrail, CircuitBuilder, Directory, OnionEnvelope, RoutingError,
};

use crate::config::NodeConfig;
use crate::directory::HttpDirectoryClient;
use crate::http::{self, routing_error_response, Ack, ErrorBody};

/// Per-instance "last seen" fields for the user role; introspection only.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserDiagnostics {
    /// Plaintext of the most recent message this user sent
    pub last_sent_message: Option<String>,
    /// Plaintext of the most recent message delivered to this user
    pub last_received_message: Option<String>,
    /// Relay ids of the circuit chosen for the last send
    pub last_circuit: Option<Vec<u32>>,
    /// Audit trail carried by the last delivered message
    pub last_audit_trail: Option<AuditTrail>,
}

/// Body of `POST /send`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendRequest {
    /// Plaintext to deliver
    pub message: String,
    /// Receiving user's id
    pub destination_user_id: u32,
}

struct UserInner {
    user_id: u32,
    node: NodeConfig,
    builder: CircuitBuilder,
    directory: HttpDirectoryClient,
    client: reqwest::Client,
    diagnostics: RwLock<UserDiagnostics>,
}

/// State shared by the user's handlers.
#[derive(Clone)]
pub struct UserState(Arc<UserInner>);

/// Builds the user service router.
pub fn user_router(state: UserState) -> Router {
    Router::new()
        .route("/status", get(http::status))
        .route("/diagnostics", get(diagnostics))
        .route("/message", post(message))
        .route("/send", post(send))
        .with_state(state)
}

/// Serves one user until the process exits.
pub async fn launch_user(user_id: u32, node: NodeConfig) -> anyhow::Result<JoinHandle<()>> {
    let address = node.routing.user_address(user_id);
    let port = u16::try_from(address)
        .with_context(|| format!("user address {address} does not fit a TCP port"))?;

    let state = UserState(Arc::new(UserInner {
        user_id,
        builder: CircuitBuilder::new(node.routing.clone()),
        directory: HttpDirectoryClient::new(node.directory_url()),
        client: reqwest::Client::new(),
        diagnostics: RwLock::new(UserDiagnostics::default()),
        node,
    }));

    let listener = tokio::net::TcpListener::bind((state.0.node.host.as_str(), port))
        .await
        .with_context(|| format!("user {user_id} failed to bind port {port}"))?;
    info!(user = user_id, address, "user listening");

    Ok(tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, user_router(state)).await {
            error!(user = user_id, error = %e, "user server exited");
        }
    }))
}

/// Builds an onion over a fresh directory snapshot and hands it to the
/// circuit's entry relay.
///
/// Success means the entry relay accepted the onion; there is no end-to-end
/// acknowledgment, so failures deeper in the circuit stay invisible here.
async fn send(
    State(state): State<UserState>,
    Json(request): Json<SendRequest>,
) -> Result<Json<Ack>, (StatusCode, Json<ErrorBody>)> {
    let inner = &state.0;

    let result = async {
        let snapshot = inner.directory.list().await?;
        let built = inner
            .builder
            .build(&request.message, request.destination_user_id, &snapshot)?;

        let entry_address = inner.node.routing.relay_address(built.circuit.entry().id);
        let url = format!("{}/message", inner.node.address_url(entry_address));
        let response = inner
            .client
            .post(url)
            .json(&OnionEnvelope::new(built.onion.clone()))
            .send()
            .await
            .map_err(|e| {
                RoutingError::Routing(format!("entry relay {entry_address} unreachable: {e}"))
            })?;
        if !response.status().is_success() {
            return Err(RoutingError::Routing(format!(
                "entry relay rejected the onion with status {}",
                response.status()
            )));
        }
        Ok(built)
    }
    .await;

    match result {
        Ok(built) => {
            let mut diagnostics = inner.diagnostics.write().await;
            diagnostics.last_sent_message = Some(request.message);
            diagnostics.last_circuit = Some(built.circuit.ids());
            info!(user = inner.user_id, hops = ?built.circuit.ids(), "message sent");
            Ok(Ack::ok())
        }
        Err(err) => {
            warn!(user = inner.user_id, error = %err, "send failed");
            Err(routing_error_response(err))
        }
    }
}

/// Terminal delivery: the envelope's blob is plaintext once the last layer
/// is gone.
async fn message(
    State(state): State<UserState>,
    Json(envelope): Json<OnionEnvelope>,
) -> Json<Ack> {
    let inner = &state.0;
    info!(user = inner.user_id, "message delivered");
    let mut diagnostics = inner.diagnostics.write().await;
    diagnostics.last_received_message = Some(envelope.onion);
    diagnostics.last_audit_trail = envelope.audit_trail;
    Ack::ok()
}

/// Introspection snapshot; never consulted by the protocol.
async fn diagnostics(State(state): State<UserState>) -> Json<UserDiagnostics> {
    Json(state.0.diagnostics.read().await.clone())
}
