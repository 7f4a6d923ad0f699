//! Fixed-width framing shared by builder and relays.
//!
//! Two conventions make a layer splittable without length prefixes:
//! - the key encapsulation is always exactly [`ENCAPSULATED_KEY_B64_LEN`]
//!   base64 characters (RSA-2048 ciphertext), so a relay splits the blob at
//!   a fixed offset;
//! - the routing address inside a decrypted layer is always exactly
//!   [`ADDRESS_WIDTH`] zero-padded decimal digits.
//!
//! Both widths are protocol constants. A different RSA modulus or address
//! range is a different, wire-incompatible protocol.

pub use veilnet_crypto::ENCAPSULATED_KEY_B64_LEN;

use crate::error::{Result, RoutingError};

/// Width of the zero-padded decimal address field.
pub const ADDRESS_WIDTH: usize = 10;

/// Exclusive upper bound of encodable addresses (`10^ADDRESS_WIDTH`).
pub const MAX_ADDRESS: u64 = 10_000_000_000;

/// Renders an address as exactly [`ADDRESS_WIDTH`] zero-padded digits.
///
/// Values that do not fit fail with [`RoutingError::AddressOverflow`] rather
/// than silently truncating.
pub fn encode_address(address: u64) -> Result<String> {
    if address >= MAX_ADDRESS {
        return Err(RoutingError::AddressOverflow(address));
    }
    Ok(format!("{:0width$}", address, width = ADDRESS_WIDTH))
}

/// Parses a fixed-width address field back to its numeric value.
pub fn parse_address(field: &str) -> Result<u64> {
    if field.len() != ADDRESS_WIDTH || !field.bytes().all(|b| b.is_ascii_digit()) {
        return Err(RoutingError::InvalidDestination(format!(
            "address field must be {ADDRESS_WIDTH} decimal digits"
        )));
    }
    field
        .parse()
        .map_err(|_| RoutingError::InvalidDestination("address field does not parse".into()))
}

/// Splits one onion layer into `(encapsulated_key, sealed_payload)` at the
/// fixed encapsulation width.
pub fn split_layer(onion: &str) -> Result<(&str, &str)> {
    match (
        onion.get(..ENCAPSULATED_KEY_B64_LEN),
        onion.get(ENCAPSULATED_KEY_B64_LEN..),
    ) {
        (Some(key), Some(payload)) => Ok((key, payload)),
        _ => Err(RoutingError::InvalidInput(format!(
            "onion of {} chars is shorter than the {ENCAPSULATED_KEY_B64_LEN}-char key encapsulation",
            onion.len()
        ))),
    }
}

/// Splits decrypted layer plaintext into `(address, content)`.
pub fn split_addressed(plain: &str) -> Result<(u64, &str)> {
    match (plain.get(..ADDRESS_WIDTH), plain.get(ADDRESS_WIDTH..)) {
        (Some(field), Some(content)) => Ok((parse_address(field)?, content)),
        _ => Err(RoutingError::InvalidDestination(format!(
            "payload of {} chars is shorter than the {ADDRESS_WIDTH}-char address field",
            plain.len()
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn encodes_zero_padded() {
        assert_eq!(encode_address(0).unwrap(), "0000000000");
        assert_eq!(encode_address(4001).unwrap(), "0000004001");
        assert_eq!(encode_address(MAX_ADDRESS - 1).unwrap(), "9999999999");
    }

    #[test]
    fn rejects_overflow_at_encode_time() {
        assert!(matches!(
            encode_address(MAX_ADDRESS),
            Err(RoutingError::AddressOverflow(_))
        ));
    }

    #[test]
    fn rejects_malformed_fields() {
        for field in ["00000x3001", "          ", "3001", "00000030011"] {
            assert!(matches!(
                parse_address(field),
                Err(RoutingError::InvalidDestination(_))
            ));
        }
    }

    #[test]
    fn splits_addressed_payloads() {
        let (address, content) = split_addressed("0000003001hello world").unwrap();
        assert_eq!(address, 3001);
        assert_eq!(content, "hello world");

        // Empty content after the address field is legal.
        let (address, content) = split_addressed("0000004000").unwrap();
        assert_eq!(address, 4000);
        assert_eq!(content, "");
    }

    #[test]
    fn short_onions_fail_as_invalid_input() {
        assert!(matches!(
            split_layer("too short"),
            Err(RoutingError::InvalidInput(_))
        ));
    }

    #[test]
    fn splits_layers_at_the_fixed_offset() {
        let onion = format!("{}{}", "k".repeat(ENCAPSULATED_KEY_B64_LEN), "payload");
        let (key, payload) = split_layer(&onion).unwrap();
        assert_eq!(key.len(), ENCAPSULATED_KEY_B64_LEN);
        assert_eq!(payload, "payload");
    }

    proptest! {
        #[test]
        fn address_round_trips_over_full_range(value in 0..MAX_ADDRESS) {
            let field = encode_address(value).unwrap();
            prop_assert_eq!(field.len(), ADDRESS_WIDTH);
            prop_assert_eq!(parse_address(&field).unwrap(), value);
        }
    }
}
