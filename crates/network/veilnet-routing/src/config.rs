//! Routing configuration.

use serde::{Deserialize, Serialize};

use crate::error::{Result, RoutingError};

/// Parameters of the overlay shared by senders and relays.
///
/// The circuit length is a protocol parameter, not a literal: framing never
/// depends on it, so deployments can vary hop count freely.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoutingConfig {
    /// Number of relays every circuit traverses
    pub circuit_length: usize,
    /// Base offset of the relay address space
    pub relay_address_base: u64,
    /// Base offset of the end-user address space
    pub user_address_base: u64,
}

impl RoutingConfig {
    /// Creates the default configuration (three hops).
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the number of hops per circuit.
    pub fn with_circuit_length(mut self, length: usize) -> Self {
        self.circuit_length = length;
        self
    }

    /// Sets the base offset of the relay address space.
    pub fn with_relay_address_base(mut self, base: u64) -> Self {
        self.relay_address_base = base;
        self
    }

    /// Sets the base offset of the end-user address space.
    pub fn with_user_address_base(mut self, base: u64) -> Self {
        self.user_address_base = base;
        self
    }

    /// Routing address of a relay.
    pub fn relay_address(&self, relay_id: u32) -> u64 {
        self.relay_address_base + u64::from(relay_id)
    }

    /// Routing address of an end user.
    pub fn user_address(&self, user_id: u32) -> u64 {
        self.user_address_base + u64::from(user_id)
    }

    /// Rejects configurations no circuit can be built under.
    pub fn validate(&self) -> Result<()> {
        if self.circuit_length == 0 {
            return Err(RoutingError::InvalidInput(
                "circuit length must be at least 1".into(),
            ));
        }
        Ok(())
    }
}

impl Default for RoutingConfig {
    fn default() -> Self {
        Self {
            circuit_length: 3,
            relay_address_base: 4000,
            user_address_base: 3000,
        }
    }
}
