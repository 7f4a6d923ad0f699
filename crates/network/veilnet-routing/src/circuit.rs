//! Sender-side circuit construction and layer wrapping.

use rand::rngs::OsRng;
use rand::seq::SliceRandom;
use tracing::debug;
use veilnet_crypto::{asymmetric, symmetric};

use crate::config::RoutingConfig;
use crate::error::{Result, RoutingError};
use crate::framing;
use crate::types::{Circuit, RelayIdentity};

/// The finished onion plus the circuit it was built for.
///
/// The circuit is returned purely for diagnostics; the onion alone carries
/// everything the relays need.
#[derive(Debug, Clone)]
pub struct BuiltOnion {
    /// Blob ready to send to the circuit's entry relay
    pub onion: String,
    /// The relays chosen for this message, in traversal order
    pub circuit: Circuit,
}

/// Builds onions: selects a circuit from a directory snapshot and wraps the
/// message in one encryption layer per hop, innermost first.
#[derive(Debug, Clone)]
pub struct CircuitBuilder {
    config: RoutingConfig,
}

impl CircuitBuilder {
    /// Creates a builder for the given overlay parameters.
    pub fn new(config: RoutingConfig) -> Self {
        Self { config }
    }

    /// The configuration this builder wraps for.
    pub fn config(&self) -> &RoutingConfig {
        &self.config
    }

    /// Draws a circuit of distinct relays uniformly at random, without
    /// replacement, from the snapshot.
    pub fn select_circuit(&self, snapshot: &[RelayIdentity]) -> Result<Circuit> {
        self.config.validate()?;
        let length = self.config.circuit_length;
        if snapshot.len() < length {
            return Err(RoutingError::InsufficientRelays {
                required: length,
                available: snapshot.len(),
            });
        }
        let relays: Vec<RelayIdentity> = snapshot
            .choose_multiple(&mut OsRng, length)
            .cloned()
            .collect();
        let circuit = Circuit::new(relays);
        debug!(hops = ?circuit.ids(), "circuit selected");
        Ok(circuit)
    }

    /// Builds the complete onion for `message` addressed to `destination`.
    ///
    /// Peeling the result at each relay in circuit order reproduces exactly
    /// `message` at the destination, with every intermediate relay learning
    /// only the next hop's address.
    pub fn build(
        &self,
        message: &str,
        destination: u32,
        snapshot: &[RelayIdentity],
    ) -> Result<BuiltOnion> {
        let circuit = self.select_circuit(snapshot)?;
        let onion = self.wrap(message, destination, &circuit)?;
        Ok(BuiltOnion { onion, circuit })
    }

    /// Wraps `message` for an already-selected circuit, processing hops from
    /// the last relay back to the first.
    ///
    /// Each non-final layer's address field tells its relay where to forward;
    /// the innermost layer's address field carries the true destination.
    pub fn wrap(&self, message: &str, destination: u32, circuit: &Circuit) -> Result<String> {
        // Hop keys are independent of one another, so all of them can be
        // drawn before any layer is sealed.
        let hop_keys: Vec<symmetric::SymmetricKey> = circuit
            .relays()
            .iter()
            .map(|_| symmetric::generate_key())
            .collect();

        let mut address = framing::encode_address(self.config.user_address(destination))?;
        let mut content = message.to_string();

        for (position, (relay, hop_key)) in
            circuit.relays().iter().zip(&hop_keys).enumerate().rev()
        {
            let public_key = asymmetric::import_public_key(&relay.public_key)?;
            let encapsulated = asymmetric::encrypt(hop_key.export().as_bytes(), &public_key)?;
            let sealed = symmetric::encrypt(hop_key, format!("{address}{content}").as_bytes())?;
            content = format!("{encapsulated}{sealed}");

            // The layer outside this one must route to this relay.
            if position > 0 {
                address = framing::encode_address(self.config.relay_address(relay.id))?;
            }
        }

        Ok(content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn snapshot(count: u32) -> Vec<RelayIdentity> {
        // Selection never inspects key material, so placeholder keys keep
        // these tests free of RSA generation.
        (0..count)
            .map(|id| RelayIdentity {
                id,
                public_key: format!("key-{id}"),
            })
            .collect()
    }

    #[test]
    fn selects_distinct_relays() {
        let builder = CircuitBuilder::new(RoutingConfig::default());
        let snapshot = snapshot(10);
        for _ in 0..50 {
            let circuit = builder.select_circuit(&snapshot).unwrap();
            assert_eq!(circuit.len(), 3);
            let ids: HashSet<u32> = circuit.ids().into_iter().collect();
            assert_eq!(ids.len(), 3, "relay ids must be pairwise distinct");
        }
    }

    #[test]
    fn fails_when_snapshot_is_too_small() {
        let builder = CircuitBuilder::new(RoutingConfig::default());
        let err = builder.select_circuit(&snapshot(2)).unwrap_err();
        assert!(matches!(
            err,
            RoutingError::InsufficientRelays {
                required: 3,
                available: 2
            }
        ));
    }

    #[test]
    fn circuit_length_follows_configuration() {
        let builder = CircuitBuilder::new(RoutingConfig::new().with_circuit_length(5));
        let circuit = builder.select_circuit(&snapshot(6)).unwrap();
        assert_eq!(circuit.len(), 5);
    }

    #[test]
    fn oversized_destination_fails_at_build_time() {
        let config = RoutingConfig::new().with_user_address_base(framing::MAX_ADDRESS - 1);
        let builder = CircuitBuilder::new(config);
        let err = builder.build("msg", 1, &snapshot(3)).unwrap_err();
        assert!(matches!(err, RoutingError::AddressOverflow(_)));
    }
}
