//! RSA-OAEP key encapsulation layer.
//!
//! Each relay owns one RSA-2048 key pair for the lifetime of its process.
//! Senders use the public half to encapsulate a per-hop symmetric key; the
//! relay uses the private half to recover it. OAEP with SHA-256 keeps the
//! ciphertext non-malleable, and a 2048-bit modulus keeps its width fixed
//! (see [`crate::ENCAPSULATED_KEY_B64_LEN`]).

use rand::rngs::OsRng;
use rsa::pkcs8::{DecodePrivateKey, DecodePublicKey, EncodePrivateKey, EncodePublicKey};
use rsa::{Oaep, RsaPrivateKey, RsaPublicKey};
use sha2::Sha256;

pub use rsa::{RsaPrivateKey as PrivateKey, RsaPublicKey as PublicKey};

use crate::encoding::{from_base64, to_base64};
use crate::error::{CryptoError, Result};

/// RSA modulus size. Changing this breaks the fixed ciphertext width every
/// relay splits on; see [`crate::ENCAPSULATED_KEY_B64_LEN`].
pub const RSA_MODULUS_BITS: usize = 2048;

/// Largest plaintext OAEP/SHA-256 can seal under a 2048-bit modulus
/// (modulus bytes minus two hash widths minus two).
pub const RSA_MAX_PLAINTEXT_LEN: usize = RSA_MODULUS_BITS / 8 - 2 * 32 - 2;

/// An RSA key pair generated once at relay startup.
///
/// The public half is exported and published to the directory; the private
/// half never leaves the process except through [`export_private_key`].
#[derive(Debug, Clone)]
pub struct AsymmetricKeypair {
    public: RsaPublicKey,
    private: RsaPrivateKey,
}

impl AsymmetricKeypair {
    /// Returns the public key.
    pub fn public(&self) -> &RsaPublicKey {
        &self.public
    }

    /// Returns the private key.
    pub fn private(&self) -> &RsaPrivateKey {
        &self.private
    }
}

/// Generates a fresh RSA-2048 key pair with the standard public exponent.
pub fn generate_keypair() -> Result<AsymmetricKeypair> {
    let private = RsaPrivateKey::new(&mut OsRng, RSA_MODULUS_BITS)
        .map_err(|e| CryptoError::KeyGeneration(e.to_string()))?;
    let public = RsaPublicKey::from(&private);
    Ok(AsymmetricKeypair { public, private })
}

/// Exports a public key as base64-encoded SPKI DER.
pub fn export_public_key(key: &RsaPublicKey) -> Result<String> {
    let der = key
        .to_public_key_der()
        .map_err(|e| CryptoError::KeyEncoding(e.to_string()))?;
    Ok(to_base64(der.as_bytes()))
}

/// Imports a public key from its base64 SPKI encoding. Exact inverse of
/// [`export_public_key`].
pub fn import_public_key(encoded: &str) -> Result<RsaPublicKey> {
    let der = from_base64(encoded)?;
    RsaPublicKey::from_public_key_der(&der).map_err(|e| CryptoError::KeyEncoding(e.to_string()))
}

/// Exports a private key as base64-encoded PKCS#8 DER.
pub fn export_private_key(key: &RsaPrivateKey) -> Result<String> {
    let der = key
        .to_pkcs8_der()
        .map_err(|e| CryptoError::KeyEncoding(e.to_string()))?;
    Ok(to_base64(der.as_bytes()))
}

/// Imports a private key from its base64 PKCS#8 encoding. Exact inverse of
/// [`export_private_key`].
pub fn import_private_key(encoded: &str) -> Result<RsaPrivateKey> {
    let der = from_base64(encoded)?;
    RsaPrivateKey::from_pkcs8_der(&der).map_err(|e| CryptoError::KeyEncoding(e.to_string()))
}

/// Encrypts a plaintext under the given public key, returning base64
/// ciphertext of fixed width.
///
/// Plaintexts longer than [`RSA_MAX_PLAINTEXT_LEN`] are rejected up front;
/// OAEP cannot seal them and silent truncation is never acceptable here.
pub fn encrypt(plaintext: &[u8], key: &RsaPublicKey) -> Result<String> {
    if plaintext.len() > RSA_MAX_PLAINTEXT_LEN {
        return Err(CryptoError::PayloadTooLarge {
            len: plaintext.len(),
            max: RSA_MAX_PLAINTEXT_LEN,
        });
    }
    let ciphertext = key
        .encrypt(&mut OsRng, Oaep::new::<Sha256>(), plaintext)
        .map_err(|e| CryptoError::Encryption(e.to_string()))?;
    Ok(to_base64(&ciphertext))
}

/// Decrypts a base64 ciphertext with the given private key.
///
/// A wrong key, corrupted ciphertext or padding mismatch all fail the same
/// way; the error never carries partial plaintext.
pub fn decrypt(ciphertext: &str, key: &RsaPrivateKey) -> Result<Vec<u8>> {
    let raw = from_base64(ciphertext)?;
    key.decrypt(Oaep::new::<Sha256>(), &raw)
        .map_err(|e| CryptoError::Decryption(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ENCAPSULATED_KEY_B64_LEN;

    #[test]
    fn round_trips_through_generated_pair() {
        let keypair = generate_keypair().unwrap();
        let ciphertext = encrypt(b"per-hop key material", keypair.public()).unwrap();
        let plaintext = decrypt(&ciphertext, keypair.private()).unwrap();
        assert_eq!(plaintext, b"per-hop key material");
    }

    #[test]
    fn ciphertext_width_is_the_protocol_constant() {
        let keypair = generate_keypair().unwrap();
        for plaintext in [b"" as &[u8], b"x", &[0u8; RSA_MAX_PLAINTEXT_LEN]] {
            let ciphertext = encrypt(plaintext, keypair.public()).unwrap();
            assert_eq!(ciphertext.len(), ENCAPSULATED_KEY_B64_LEN);
        }
    }

    #[test]
    fn oversized_plaintext_is_rejected_not_truncated() {
        let keypair = generate_keypair().unwrap();
        let err = encrypt(&[0u8; RSA_MAX_PLAINTEXT_LEN + 1], keypair.public()).unwrap_err();
        assert!(matches!(err, CryptoError::PayloadTooLarge { .. }));
    }

    #[test]
    fn unrelated_private_key_fails_to_decrypt() {
        let keypair = generate_keypair().unwrap();
        let other = generate_keypair().unwrap();
        let ciphertext = encrypt(b"secret", keypair.public()).unwrap();
        let err = decrypt(&ciphertext, other.private()).unwrap_err();
        assert!(matches!(err, CryptoError::Decryption(_)));
    }

    #[test]
    fn key_exports_are_exact_inverses() {
        let keypair = generate_keypair().unwrap();

        let public = import_public_key(&export_public_key(keypair.public()).unwrap()).unwrap();
        assert_eq!(&public, keypair.public());

        let private = import_private_key(&export_private_key(keypair.private()).unwrap()).unwrap();
        assert_eq!(&private, keypair.private());
    }
}
