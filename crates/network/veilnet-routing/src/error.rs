//! Routing error types.

use thiserror::Error;
use veilnet_crypto::CryptoError;

/// Type alias for Results in this crate.
pub type Result<T> = std::result::Result<T, RoutingError>;

/// Errors surfaced by circuit construction and per-hop processing.
///
/// No stage attempts local recovery: every failure aborts the message's
/// delivery attempt and propagates to the immediate caller. Delivery is
/// at-most-once; nothing is buffered or retried.
#[derive(Error, Debug)]
pub enum RoutingError {
    /// Malformed or missing envelope fields, including onions shorter than
    /// the fixed key-encapsulation width
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Any encrypt/decrypt/import/export failure. Deliberately opaque: a
    /// relay handed an onion not meant for it fails here exactly like one
    /// handed a corrupted onion
    #[error("Cryptographic failure: {0}")]
    Crypto(#[from] CryptoError),

    /// The address field of a peeled layer failed to parse
    #[error("Invalid destination: {0}")]
    InvalidDestination(String),

    /// A destination value does not fit the fixed-width address field
    #[error("Address {0} exceeds the fixed-width address field")]
    AddressOverflow(u64),

    /// The directory snapshot is smaller than the requested circuit length
    #[error("Directory snapshot has {available} relays, circuit needs {required}")]
    InsufficientRelays {
        /// Circuit length requested
        required: usize,
        /// Relays available in the snapshot
        available: usize,
    },

    /// The next hop was unreachable; the message is dropped, not retried
    #[error("Routing failure: {0}")]
    Routing(String),

    /// The directory could not be read or written
    #[error("Directory error: {0}")]
    Directory(String),
}
