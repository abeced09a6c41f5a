//! Secret vault for sealed configuration values
//!
//! AES-256-GCM encryption with an HKDF-derived encryption key, so the raw
//! master key never encrypts data directly. The vault is the opaque,
//! reversible transform the sync pipeline relies on: whatever sealed a
//! value must unseal it to the identical plaintext.

use aes_gcm::{
    aead::{Aead, KeyInit},
    Aes256Gcm, Key, Nonce,
};
use base64::Engine;
use hkdf::Hkdf;
use rand::RngCore;
use sha2::Sha256;

use crate::error::{SyncError, SyncResult};

/// Length of an AES-256 key in bytes.
const KEY_LENGTH: usize = 32;

/// Length of a GCM nonce in bytes.
const NONCE_LENGTH: usize = 12;

/// Length of the GCM authentication tag in bytes.
const TAG_LENGTH: usize = 16;

/// Context string for HKDF key derivation.
const HKDF_INFO: &[u8] = b"dirsync-sealed-config-v1";

/// Vault for sealing and unsealing directory connection secrets.
#[derive(Clone)]
pub struct SecretVault {
    /// Master key; the encryption key is derived from it.
    master_key: [u8; KEY_LENGTH],
}

impl SecretVault {
    /// Create a new vault with the given master key.
    #[must_use]
    pub fn new(master_key: [u8; KEY_LENGTH]) -> Self {
        Self { master_key }
    }

    /// Create a vault from a hex-encoded master key.
    pub fn from_hex(hex_key: &str) -> SyncResult<Self> {
        let bytes = hex::decode(hex_key).map_err(|e| SyncError::EncryptionFailed {
            message: format!("invalid hex key: {e}"),
        })?;
        Self::from_bytes(&bytes)
    }

    /// Create a vault from a base64-encoded master key.
    pub fn from_base64(base64_key: &str) -> SyncResult<Self> {
        let bytes = base64::engine::general_purpose::STANDARD
            .decode(base64_key)
            .map_err(|e| SyncError::EncryptionFailed {
                message: format!("invalid base64 key: {e}"),
            })?;
        Self::from_bytes(&bytes)
    }

    fn from_bytes(bytes: &[u8]) -> SyncResult<Self> {
        if bytes.len() != KEY_LENGTH {
            return Err(SyncError::EncryptionFailed {
                message: format!("key must be {} bytes, got {}", KEY_LENGTH, bytes.len()),
            });
        }

        let mut key = [0u8; KEY_LENGTH];
        key.copy_from_slice(bytes);
        Ok(Self::new(key))
    }

    /// Derive the encryption key from the master key.
    fn derive_key(&self) -> SyncResult<[u8; KEY_LENGTH]> {
        let hk = Hkdf::<Sha256>::new(None, &self.master_key);
        let mut okm = [0u8; KEY_LENGTH];
        hk.expand(HKDF_INFO, &mut okm)
            .map_err(|e| SyncError::EncryptionFailed {
                message: format!("key derivation failed: {e}"),
            })?;
        Ok(okm)
    }

    /// Encrypt a plaintext value. Output layout: nonce || ciphertext+tag.
    pub fn encrypt(&self, plaintext: &[u8]) -> SyncResult<Vec<u8>> {
        let key = self.derive_key()?;
        let cipher = Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(&key));

        let mut nonce_bytes = [0u8; NONCE_LENGTH];
        rand::rngs::OsRng.fill_bytes(&mut nonce_bytes);
        let nonce = Nonce::from_slice(&nonce_bytes);

        let ciphertext =
            cipher
                .encrypt(nonce, plaintext)
                .map_err(|e| SyncError::EncryptionFailed {
                    message: format!("encryption failed: {e}"),
                })?;

        let mut out = Vec::with_capacity(NONCE_LENGTH + ciphertext.len());
        out.extend_from_slice(&nonce_bytes);
        out.extend_from_slice(&ciphertext);
        Ok(out)
    }

    /// Decrypt a value produced by [`encrypt`](Self::encrypt).
    pub fn decrypt(&self, sealed: &[u8]) -> SyncResult<Vec<u8>> {
        if sealed.len() < NONCE_LENGTH + TAG_LENGTH {
            return Err(SyncError::DecryptionFailed {
                message: format!(
                    "sealed value too short: {} bytes, need at least {}",
                    sealed.len(),
                    NONCE_LENGTH + TAG_LENGTH
                ),
            });
        }

        let key = self.derive_key().map_err(|e| SyncError::DecryptionFailed {
            message: e.to_string(),
        })?;
        let cipher = Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(&key));

        let (nonce_bytes, ciphertext) = sealed.split_at(NONCE_LENGTH);
        let nonce = Nonce::from_slice(nonce_bytes);

        cipher
            .decrypt(nonce, ciphertext)
            .map_err(|_| SyncError::DecryptionFailed {
                message: "authentication failed".to_string(),
            })
    }

    /// Seal a string, returning base64 for storage alongside configuration.
    pub fn seal_string(&self, plaintext: &str) -> SyncResult<String> {
        let sealed = self.encrypt(plaintext.as_bytes())?;
        Ok(base64::engine::general_purpose::STANDARD.encode(sealed))
    }

    /// Unseal a base64 value produced by [`seal_string`](Self::seal_string).
    pub fn unseal_string(&self, sealed: &str) -> SyncResult<String> {
        let bytes = base64::engine::general_purpose::STANDARD
            .decode(sealed)
            .map_err(|e| SyncError::DecryptionFailed {
                message: format!("invalid base64: {e}"),
            })?;

        let plaintext = self.decrypt(&bytes)?;
        String::from_utf8(plaintext).map_err(|e| SyncError::DecryptionFailed {
            message: format!("sealed value is not valid UTF-8: {e}"),
        })
    }
}

impl std::fmt::Debug for SecretVault {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SecretVault")
            .field("master_key", &"***REDACTED***")
            .finish()
    }
}

/// Generate a new random master key.
pub fn generate_master_key() -> [u8; KEY_LENGTH] {
    let mut key = [0u8; KEY_LENGTH];
    rand::rngs::OsRng.fill_bytes(&mut key);
    key
}

/// Generate a new random master key as a hex string.
pub fn generate_master_key_hex() -> String {
    hex::encode(generate_master_key())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_vault() -> SecretVault {
        SecretVault::new([42u8; KEY_LENGTH])
    }

    #[test]
    fn test_encrypt_decrypt_roundtrip() {
        let vault = test_vault();
        let plaintext = b"cn=svc-sync,dc=example,dc=com";

        let sealed = vault.encrypt(plaintext).unwrap();
        assert_ne!(&sealed[NONCE_LENGTH..], plaintext.as_slice());

        let recovered = vault.decrypt(&sealed).unwrap();
        assert_eq!(recovered, plaintext);
    }

    #[test]
    fn test_seal_unseal_string() {
        let vault = test_vault();
        let sealed = vault.seal_string("ldap://dc01.example.com").unwrap();
        assert_eq!(vault.unseal_string(&sealed).unwrap(), "ldap://dc01.example.com");
    }

    #[test]
    fn test_nonce_makes_ciphertext_unique() {
        let vault = test_vault();
        let a = vault.encrypt(b"same plaintext").unwrap();
        let b = vault.encrypt(b"same plaintext").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_wrong_key_fails() {
        let sealed = test_vault().encrypt(b"secret").unwrap();
        let other = SecretVault::new([1u8; KEY_LENGTH]);
        assert!(other.decrypt(&sealed).is_err());
    }

    #[test]
    fn test_sealed_value_too_short() {
        let vault = test_vault();
        let err = vault.decrypt(&[0u8; 10]).unwrap_err();
        assert_eq!(err.error_code(), "DECRYPTION_FAILED");
    }

    #[test]
    fn test_corrupted_ciphertext() {
        let vault = test_vault();
        let mut sealed = vault.encrypt(b"secret").unwrap();
        let last = sealed.len() - 1;
        sealed[last] ^= 0xFF;
        assert!(vault.decrypt(&sealed).is_err());
    }

    #[test]
    fn test_from_hex() {
        let hex_key = "00".repeat(KEY_LENGTH);
        assert!(SecretVault::from_hex(&hex_key).is_ok());
    }

    #[test]
    fn test_from_hex_invalid_length() {
        assert!(SecretVault::from_hex("deadbeef").is_err());
    }

    #[test]
    fn test_from_hex_invalid_chars() {
        let bad = "zz".repeat(KEY_LENGTH);
        assert!(SecretVault::from_hex(&bad).is_err());
    }

    #[test]
    fn test_from_base64() {
        let key = base64::engine::general_purpose::STANDARD.encode([9u8; KEY_LENGTH]);
        assert!(SecretVault::from_base64(&key).is_ok());
    }

    #[test]
    fn test_generate_master_key() {
        let a = generate_master_key();
        let b = generate_master_key();
        assert_ne!(a, b);

        let hex_key = generate_master_key_hex();
        assert_eq!(hex_key.len(), KEY_LENGTH * 2);
        assert!(SecretVault::from_hex(&hex_key).is_ok());
    }

    #[test]
    fn test_empty_plaintext() {
        let vault = test_vault();
        let sealed = vault.encrypt(b"").unwrap();
        assert_eq!(vault.decrypt(&sealed).unwrap(), Vec::<u8>::new());
    }

    #[test]
    fn test_debug_redacts_key() {
        let rendered = format!("{:?}", test_vault());
        assert!(rendered.contains("***REDACTED***"));
        assert!(!rendered.contains("42"));
    }
}
