//! Canonical base64 encoding shared by every exported key and ciphertext.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;

use crate::error::Result;

/// Encodes bytes with the standard (padded) base64 alphabet.
pub fn to_base64(bytes: &[u8]) -> String {
    STANDARD.encode(bytes)
}

/// Decodes a standard base64 string.
pub fn from_base64(input: &str) -> Result<Vec<u8>> {
    Ok(STANDARD.decode(input)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_arbitrary_bytes() {
        let bytes: Vec<u8> = (0u8..=255).collect();
        let encoded = to_base64(&bytes);
        assert_eq!(from_base64(&encoded).unwrap(), bytes);
    }

    #[test]
    fn rejects_invalid_input() {
        assert!(from_base64("not!valid@base64").is_err());
    }
}
