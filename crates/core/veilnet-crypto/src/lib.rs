//! # Veilnet Crypto
//!
//! Cryptographic primitives for the veilnet onion-routing overlay.
//!
//! This crate provides the two cipher layers every onion is built from:
//! - **Asymmetric**: RSA-2048 with OAEP/SHA-256 padding, used to encapsulate
//!   a per-hop symmetric key so only the intended relay can recover it
//! - **Symmetric**: AES-256-GCM with a random per-message nonce, used to
//!   encrypt the addressed payload of each layer
//!
//! All primitives are pure functions over their inputs plus system
//! randomness; nothing here retries or holds state. Keys and ciphertexts
//! cross process boundaries as canonical base64 strings (SPKI for public
//! keys, PKCS#8 for private keys, raw bytes for symmetric keys).
//!
//! ## Example
//!
//! ```rust,no_run
//! use veilnet_crypto::{asymmetric, symmetric};
//!
//! # fn main() -> veilnet_crypto::Result<()> {
//! let keypair = asymmetric::generate_keypair()?;
//! let hop_key = symmetric::generate_key();
//!
//! // Encapsulate the hop key, then seal a payload under it.
//! let encapsulated = asymmetric::encrypt(hop_key.export().as_bytes(), keypair.public())?;
//! let sealed = symmetric::encrypt(&hop_key, b"0000003001hello")?;
//!
//! assert_eq!(encapsulated.len(), veilnet_crypto::ENCAPSULATED_KEY_B64_LEN);
//! # Ok(())
//! # }
//! ```

pub mod asymmetric;
pub mod encoding;
pub mod error;
pub mod symmetric;

pub use asymmetric::{AsymmetricKeypair, RSA_MAX_PLAINTEXT_LEN, RSA_MODULUS_BITS};
pub use error::{CryptoError, Result};
pub use symmetric::{SymmetricKey, NONCE_LEN, SYMMETRIC_KEY_LEN};

/// Width in base64 characters of one RSA-OAEP ciphertext under a 2048-bit
/// modulus. Relays split incoming onions at exactly this offset, so it is a
/// protocol constant shared with the framing layer, not a computed value.
/// Changing [`RSA_MODULUS_BITS`] requires changing this in lockstep.
pub const ENCAPSULATED_KEY_B64_LEN: usize = 344;
