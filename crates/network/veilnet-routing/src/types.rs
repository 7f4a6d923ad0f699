//! Core routing types.

use serde::{Deserialize, Serialize};

/// A relay as the directory advertises it: a numeric id and the base64 SPKI
/// export of its public key.
///
/// Created once per relay process at startup and published exactly once;
/// immutable thereafter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RelayIdentity {
    /// Relay identifier, unique within the overlay
    pub id: u32,
    /// Base64-encoded SPKI public key
    pub public_key: String,
}

/// An ordered sequence of distinct relays a single message will traverse.
///
/// Built by [`crate::CircuitBuilder`] and never mutated afterwards; the
/// length is fixed for the life of one message and every entry is distinct.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Circuit {
    relays: Vec<RelayIdentity>,
}

impl Circuit {
    pub(crate) fn new(relays: Vec<RelayIdentity>) -> Self {
        Self { relays }
    }

    /// The relays in traversal order.
    pub fn relays(&self) -> &[RelayIdentity] {
        &self.relays
    }

    /// The entry relay the finished onion is sent to.
    pub fn entry(&self) -> &RelayIdentity {
        &self.relays[0]
    }

    /// Number of hops.
    pub fn len(&self) -> usize {
        self.relays.len()
    }

    /// Whether the circuit has no hops.
    pub fn is_empty(&self) -> bool {
        self.relays.is_empty()
    }

    /// Relay ids in traversal order.
    pub fn ids(&self) -> Vec<u32> {
        self.relays.iter().map(|r| r.id).collect()
    }
}

/// Ordered list of relay ids a message has passed through.
///
/// Threaded alongside the onion purely for observability and testing; no
/// routing decision ever reads it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AuditTrail(Vec<u32>);

impl AuditTrail {
    /// Appends a relay id to the trail.
    pub fn record(&mut self, relay_id: u32) {
        self.0.push(relay_id);
    }

    /// The recorded hops in order.
    pub fn hops(&self) -> &[u32] {
        &self.0
    }
}

/// The envelope exchanged between sender and relays, transport-agnostic.
///
/// `onion` is the remaining blob for the receiving party; at the final hop
/// it is the delivered plaintext.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OnionEnvelope {
    /// The (remaining) onion blob
    pub onion: String,
    /// Diagnostic trail of relay ids, extended at each hop
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audit_trail: Option<AuditTrail>,
}

impl OnionEnvelope {
    /// Wraps a fresh onion with no trail recorded yet.
    pub fn new(onion: String) -> Self {
        Self {
            onion,
            audit_trail: None,
        }
    }
}
