//! Relay-side layer peeling and forwarding.

use parking_lot::RwLock;
use serde::Serialize;
use tracing::debug;
use veilnet_crypto::asymmetric::{self, PrivateKey};
use veilnet_crypto::{symmetric, CryptoError, SymmetricKey};

use crate::error::{Result, RoutingError};
use crate::framing;
use crate::traits::Forwarder;
use crate::types::{AuditTrail, OnionEnvelope};

/// Per-instance "last seen" fields, kept purely for introspection and tests.
///
/// Written on the success path of each peel; concurrent messages overwrite
/// each other last-write-wins. Protocol logic never reads these.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RelayDiagnostics {
    /// The most recent onion blob this relay accepted
    pub last_received_encrypted: Option<String>,
    /// The content left over after peeling it
    pub last_decrypted_payload: Option<String>,
    /// Where that content was forwarded
    pub last_destination: Option<u64>,
}

/// One peeled layer: where to send the remainder, and the remainder itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PeeledLayer {
    /// Routing address recovered from the layer's fixed-width field
    pub next_address: u64,
    /// Remaining onion (or, at the final hop, the delivered plaintext)
    pub payload: String,
}

/// Peels exactly one encryption layer per inbound onion and forwards the
/// remainder.
///
/// A relay learns only who handed it the onion and the address it forwards
/// to next: never its position in the circuit, the full path, or (unless it
/// is the last hop) any plaintext.
pub struct RelayProcessor {
    id: u32,
    private_key: PrivateKey,
    diagnostics: RwLock<RelayDiagnostics>,
}

impl RelayProcessor {
    /// Creates a processor for a relay that owns `private_key`.
    pub fn new(id: u32, private_key: PrivateKey) -> Self {
        Self {
            id,
            private_key,
            diagnostics: RwLock::new(RelayDiagnostics::default()),
        }
    }

    /// This relay's identifier.
    pub fn id(&self) -> u32 {
        self.id
    }

    /// Peels one layer off `onion`.
    ///
    /// Failure to decapsulate or decrypt surfaces as
    /// [`RoutingError::Crypto`] whether this relay was simply not the
    /// intended hop or the blob was tampered with; the two are deliberately
    /// indistinguishable. Nothing is recorded or forwarded on failure.
    pub fn peel(&self, onion: &str) -> Result<PeeledLayer> {
        let (encapsulated, sealed) = framing::split_layer(onion)?;

        let exported = String::from_utf8(asymmetric::decrypt(encapsulated, &self.private_key)?)
            .map_err(|_| {
                RoutingError::Crypto(CryptoError::KeyEncoding(
                    "decapsulated key is not printable".into(),
                ))
            })?;
        let hop_key = SymmetricKey::import(&exported)?;

        let plain = String::from_utf8(symmetric::decrypt(&hop_key, sealed)?).map_err(|_| {
            RoutingError::InvalidDestination("decrypted payload is not valid UTF-8".into())
        })?;
        let (next_address, payload) = framing::split_addressed(&plain)?;

        debug!(relay = self.id, next_address, "layer peeled");

        let mut diagnostics = self.diagnostics.write();
        diagnostics.last_received_encrypted = Some(onion.to_string());
        diagnostics.last_decrypted_payload = Some(payload.to_string());
        diagnostics.last_destination = Some(next_address);

        Ok(PeeledLayer {
            next_address,
            payload: payload.to_string(),
        })
    }

    /// Processes one inbound envelope to completion: peel, extend the audit
    /// trail, forward.
    ///
    /// Forwarding failures surface as [`RoutingError::Routing`]; the message
    /// is dropped, never buffered or retried. Returns the extended trail as
    /// the acknowledgment payload.
    pub async fn process(
        &self,
        envelope: OnionEnvelope,
        forwarder: &dyn Forwarder,
    ) -> Result<AuditTrail> {
        let peeled = self.peel(&envelope.onion)?;

        let mut trail = envelope.audit_trail.unwrap_or_default();
        trail.record(self.id);

        let outbound = OnionEnvelope {
            onion: peeled.payload,
            audit_trail: Some(trail.clone()),
        };
        forwarder.forward(peeled.next_address, outbound).await?;

        Ok(trail)
    }

    /// Snapshot of the diagnostic fields.
    pub fn diagnostics(&self) -> RelayDiagnostics {
        self.diagnostics.read().clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_blob_is_invalid_input_before_any_crypto() {
        let keypair = asymmetric::generate_keypair().unwrap();
        let relay = RelayProcessor::new(0, keypair.private().clone());
        let err = relay.peel("far too short").unwrap_err();
        assert!(matches!(err, RoutingError::InvalidInput(_)));
        assert_eq!(relay.diagnostics(), RelayDiagnostics::default());
    }
}
