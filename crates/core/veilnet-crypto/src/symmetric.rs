//! AES-256-GCM payload layer.
//!
//! Every hop of every message gets its own fresh key; the key lives exactly
//! as long as the message takes to transit that hop. Ciphertexts embed a
//! random 96-bit nonce so the same key and plaintext never produce the same
//! blob twice.

use aes_gcm::aead::{Aead, AeadCore, KeyInit};
use aes_gcm::{Aes256Gcm, Key, Nonce};
use rand::rngs::OsRng;
use rand::RngCore;
use std::fmt;
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::encoding::{from_base64, to_base64};
use crate::error::{CryptoError, Result};

/// Symmetric key width (AES-256).
pub const SYMMETRIC_KEY_LEN: usize = 32;

/// Nonce width prepended to every symmetric ciphertext.
pub const NONCE_LEN: usize = 12;

/// A per-message, per-hop AES-256-GCM key.
///
/// Key material is zeroized when the value is dropped and is never printed
/// by the `Debug` impl.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct SymmetricKey([u8; SYMMETRIC_KEY_LEN]);

impl SymmetricKey {
    /// Exports the raw key as canonical base64.
    pub fn export(&self) -> String {
        to_base64(&self.0)
    }

    /// Imports a key previously produced by [`SymmetricKey::export`].
    pub fn import(encoded: &str) -> Result<Self> {
        let raw = from_base64(encoded)?;
        let bytes: [u8; SYMMETRIC_KEY_LEN] = raw
            .try_into()
            .map_err(|_| CryptoError::KeyEncoding("symmetric key must be 32 bytes".into()))?;
        Ok(Self(bytes))
    }
}

impl fmt::Debug for SymmetricKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SymmetricKey")
            .field("bytes", &"<redacted>")
            .finish()
    }
}

/// Generates a fresh random 256-bit key.
pub fn generate_key() -> SymmetricKey {
    let mut bytes = [0u8; SYMMETRIC_KEY_LEN];
    OsRng.fill_bytes(&mut bytes);
    SymmetricKey(bytes)
}

/// Encrypts a plaintext, returning base64 of `nonce || ciphertext`.
pub fn encrypt(key: &SymmetricKey, plaintext: &[u8]) -> Result<String> {
    let cipher = Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(&key.0));
    let nonce = Aes256Gcm::generate_nonce(&mut OsRng);
    let ciphertext = cipher
        .encrypt(&nonce, plaintext)
        .map_err(|e| CryptoError::Encryption(e.to_string()))?;

    let mut combined = Vec::with_capacity(NONCE_LEN + ciphertext.len());
    combined.extend_from_slice(&nonce);
    combined.extend_from_slice(&ciphertext);
    Ok(to_base64(&combined))
}

/// Decrypts a blob produced by [`encrypt`], extracting the nonce first.
///
/// Tampering, a truncated blob or the wrong key all fail with
/// [`CryptoError::Decryption`]; no partial plaintext is ever returned.
pub fn decrypt(key: &SymmetricKey, blob: &str) -> Result<Vec<u8>> {
    let raw = from_base64(blob)?;
    if raw.len() < NONCE_LEN {
        return Err(CryptoError::Decryption(
            "blob shorter than the embedded nonce".into(),
        ));
    }
    let (nonce, ciphertext) = raw.split_at(NONCE_LEN);
    let cipher = Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(&key.0));
    cipher
        .decrypt(Nonce::from_slice(nonce), ciphertext)
        .map_err(|e| CryptoError::Decryption(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn round_trips_including_empty_and_non_ascii() {
        let key = generate_key();
        for plaintext in ["", "plain ascii", "héllo wörld — ☂ 日本語"] {
            let blob = encrypt(&key, plaintext.as_bytes()).unwrap();
            assert_eq!(decrypt(&key, &blob).unwrap(), plaintext.as_bytes());
        }
    }

    #[test]
    fn repeated_encryption_differs_but_both_decrypt() {
        let key = generate_key();
        let first = encrypt(&key, b"same input").unwrap();
        let second = encrypt(&key, b"same input").unwrap();
        assert_ne!(first, second);
        assert_eq!(decrypt(&key, &first).unwrap(), b"same input");
        assert_eq!(decrypt(&key, &second).unwrap(), b"same input");
    }

    #[test]
    fn wrong_key_fails() {
        let key = generate_key();
        let blob = encrypt(&key, b"payload").unwrap();
        let err = decrypt(&generate_key(), &blob).unwrap_err();
        assert!(matches!(err, CryptoError::Decryption(_)));
    }

    #[test]
    fn tampered_blob_fails() {
        let key = generate_key();
        let blob = encrypt(&key, b"payload").unwrap();
        let mut raw = crate::encoding::from_base64(&blob).unwrap();
        *raw.last_mut().unwrap() ^= 0x01;
        let tampered = crate::encoding::to_base64(&raw);
        assert!(matches!(
            decrypt(&key, &tampered),
            Err(CryptoError::Decryption(_))
        ));
    }

    #[test]
    fn truncated_blob_fails() {
        let key = generate_key();
        let short = to_base64(&[0u8; NONCE_LEN - 1]);
        assert!(matches!(
            decrypt(&key, &short),
            Err(CryptoError::Decryption(_))
        ));
    }

    #[test]
    fn key_export_round_trips() {
        let key = generate_key();
        let imported = SymmetricKey::import(&key.export()).unwrap();
        assert_eq!(imported.export(), key.export());
    }

    #[test]
    fn key_import_rejects_wrong_length() {
        let short = to_base64(&[0u8; 16]);
        assert!(SymmetricKey::import(&short).is_err());
    }

    proptest! {
        #[test]
        fn round_trips_arbitrary_strings(plaintext in ".*") {
            let key = generate_key();
            let blob = encrypt(&key, plaintext.as_bytes()).unwrap();
            prop_assert_eq!(decrypt(&key, &blob).unwrap(), plaintext.as_bytes());
        }
    }
}
