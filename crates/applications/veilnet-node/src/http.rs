//! Shared HTTP response shapes and error mapping.

use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use veilnet_routing::RoutingError;

/// Acknowledgment body returned by every accepting endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ack {
    /// Whether the request was accepted and fully processed
    pub success: bool,
}

impl Ack {
    /// The affirmative acknowledgment.
    pub fn ok() -> Json<Self> {
        Json(Self { success: true })
    }
}

/// Error body carrying only the error class, no decrypted material.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    /// Human-readable failure description
    pub error: String,
}

/// Maps a routing failure onto an HTTP status plus body.
///
/// Cryptographic failures map to 422 without distinguishing "not the
/// intended hop" from corruption; that distinction must not leak.
pub fn routing_error_response(err: RoutingError) -> (StatusCode, Json<ErrorBody>) {
    let status = match &err {
        RoutingError::InvalidInput(_)
        | RoutingError::InvalidDestination(_)
        | RoutingError::AddressOverflow(_) => StatusCode::BAD_REQUEST,
        RoutingError::Crypto(_) => StatusCode::UNPROCESSABLE_ENTITY,
        RoutingError::InsufficientRelays { .. } => StatusCode::SERVICE_UNAVAILABLE,
        RoutingError::Routing(_) | RoutingError::Directory(_) => StatusCode::BAD_GATEWAY,
    };
    (
        status,
        Json(ErrorBody {
            error: err.to_string(),
        }),
    )
}

/// Liveness handler shared by every role.
pub async fn status() -> &'static str {
    "live"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crypto_failures_map_uniformly() {
        let err = RoutingError::Crypto(veilnet_crypto::CryptoError::Decryption("tag".into()));
        let (status, _) = routing_error_response(err);
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[test]
    fn unreachable_hop_is_a_gateway_error() {
        let (status, _) = routing_error_response(RoutingError::Routing("hop down".into()));
        assert_eq!(status, StatusCode::BAD_GATEWAY);
    }
}
