//! # Veilnet Routing
//!
//! The layered-encryption core of the veilnet onion overlay.
//!
//! A sender wraps a message in one encryption layer per relay of a short,
//! randomly chosen circuit. Each relay peels exactly one layer, learns only
//! the next hop's address, and forwards the remainder. No single relay sees
//! both the origin and the final destination.
//!
//! This crate provides:
//! - **CircuitBuilder**: relay selection and inside-out layer wrapping
//! - **RelayProcessor**: single-layer peeling and forwarding
//! - **Framing**: the fixed-width key-encapsulation and address conventions
//!   both sides split on
//! - The [`Directory`] and [`Forwarder`] seams the transport layer plugs into
//!
//! ## Example
//!
//! ```rust,no_run
//! use veilnet_routing::{CircuitBuilder, RelayIdentity, RoutingConfig};
//!
//! # fn main() -> veilnet_routing::Result<()> {
//! # let snapshot: Vec<RelayIdentity> = Vec::new();
//! let builder = CircuitBuilder::new(RoutingConfig::new().with_circuit_length(3));
//! let built = builder.build("hello", 1, &snapshot)?;
//! // `built.onion` goes to the circuit's entry relay; `built.circuit` is
//! // kept purely for diagnostics.
//! # Ok(())
//! # }
//! ```

pub mod circuit;
pub mod config;
pub mod error;
pub mod framing;
pub mod relay;
pub mod traits;
pub mod types;

// Re-exports for convenience
pub use circuit::{BuiltOnion, CircuitBuilder};
pub use config::RoutingConfig;
pub use error::{Result, RoutingError};
pub use framing::{ADDRESS_WIDTH, ENCAPSULATED_KEY_B64_LEN, MAX_ADDRESS};
pub use relay::{PeeledLayer, RelayDiagnostics, RelayProcessor};
pub use traits::{Directory, Forwarder};
pub use types::{AuditTrail, Circuit, OnionEnvelope, RelayIdentity};
