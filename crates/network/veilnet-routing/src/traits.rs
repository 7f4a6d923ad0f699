//! Seams between the routing core and the transport plumbing.

use async_trait::async_trait;

use crate::error::Result;
use crate::types::{OnionEnvelope, RelayIdentity};

/// The node directory as the core sees it: a key-value store of relay id to
/// public key.
///
/// The core treats `list` results as a point-in-time snapshot with no
/// consistency guarantee across calls; a relay may vanish between listing
/// and use, which is a known limitation of the design.
#[async_trait]
pub trait Directory: Send + Sync {
    /// Publishes a relay's identity. Called once per relay at startup;
    /// publishing an id again replaces the previous entry.
    async fn publish(&self, identity: &RelayIdentity) -> Result<()>;

    /// Returns the current set of known relays.
    async fn list(&self) -> Result<Vec<RelayIdentity>>;
}

/// Delivers an envelope to a routing address.
///
/// The core treats this as an opaque, non-cancellable call with no imposed
/// timeout. Implementations must not retry; a failed forward is a failed
/// delivery.
#[async_trait]
pub trait Forwarder: Send + Sync {
    /// Sends `envelope` to the party listening at `address`.
    async fn forward(&self, address: u64, envelope: OnionEnvelope) -> Result<()>;
}
