//! Error types for cryptographic operations.

use thiserror::Error;

/// Type alias for Results in this crate.
pub type Result<T> = std::result::Result<T, CryptoError>;

/// Errors raised by the cryptographic primitives.
///
/// Every failure surfaces here immediately; no primitive retries or falls
/// back, and no variant carries partially decrypted output.
#[derive(Error, Debug)]
pub enum CryptoError {
    /// Key pair generation failed
    #[error("Key generation failed: {0}")]
    KeyGeneration(String),

    /// Key export/import failed (SPKI, PKCS#8 or raw encoding)
    #[error("Key encoding error: {0}")]
    KeyEncoding(String),

    /// Base64 decoding failed
    #[error("Invalid base64 encoding: {0}")]
    Encoding(String),

    /// Plaintext exceeds the maximum size the asymmetric cipher can seal
    #[error("Plaintext of {len} bytes exceeds OAEP limit of {max} bytes")]
    PayloadTooLarge {
        /// Size of the rejected plaintext
        len: usize,
        /// Maximum payload the key size admits
        max: usize,
    },

    /// Encryption failed
    #[error("Encryption failed: {0}")]
    Encryption(String),

    /// Decryption failed (wrong key, padding mismatch or tampered input)
    #[error("Decryption failed: {0}")]
    Decryption(String),
}

impl From<base64::DecodeError> for CryptoError {
    fn from(err: base64::DecodeError) -> Self {
        CryptoError::Encoding(err.to_string())
    }
}
