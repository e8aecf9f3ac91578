//! Key derivation, master-credential hashing, and the field cipher
//!
//! Implements Argon2id for master-password hashing and symmetric key
//! derivation, SHA-256 deterministic lookup hashes, and ChaCha20-Poly1305
//! field encryption with key zeroization.

use crate::{Error, Result};
use argon2::{Argon2, ParamsBuilder, Version};
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use chacha20poly1305::{
    aead::{Aead, KeyInit, OsRng},
    ChaCha20Poly1305, Nonce,
};
use rand::RngCore;
use sha2::{Digest, Sha256};
use zeroize::Zeroizing;

/// Argon2id parameters (MANDATORY)
/// Memory: 64 MiB (65536 KiB), Iterations: 3, Parallelism: 4
const ARGON2_PARAMS: (u32, u32, u32) = (65536, 3, 4); // m_cost (KiB), t_cost, p_cost

/// Salt length for the master credential
const MASTER_SALT_LEN: usize = 16;

/// Derived key length (256 bits)
const KEY_LEN: usize = 32;

/// Field token format version
const TOKEN_VERSION: u8 = 1;

/// Nonce length for ChaCha20-Poly1305
const NONCE_LEN: usize = 12;

/// Derive raw key bytes from a password using Argon2id.
///
/// Single authoritative derivation primitive: the master credential hash and
/// the session key both go through here, differing only in their salt.
fn derive_key_bytes(password: &str, salt: &[u8]) -> Result<[u8; KEY_LEN]> {
    if salt.len() < MASTER_SALT_LEN {
        return Err(Error::Crypto("Salt too short".to_string()));
    }

    let params = ParamsBuilder::new()
        .m_cost(ARGON2_PARAMS.0)
        .t_cost(ARGON2_PARAMS.1)
        .p_cost(ARGON2_PARAMS.2)
        .output_len(KEY_LEN)
        .build()
        .map_err(|e| Error::Crypto(e.to_string()))?;

    let argon2 = Argon2::new(argon2::Algorithm::Argon2id, Version::V0x13, params);

    let mut key = Zeroizing::new([0u8; KEY_LEN]);
    argon2
        .hash_password_into(password.as_bytes(), salt, &mut *key)
        .map_err(|e| Error::Crypto(e.to_string()))?;

    let mut out = [0u8; KEY_LEN];
    out.copy_from_slice(&key[..]);
    Ok(out)
}

/// Constant-time byte comparison. Folds the XOR of every byte pair so the
/// comparison never exits early on a mismatch.
fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b.iter()).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}

/// Generate a random salt for the master credential
pub fn generate_salt() -> [u8; MASTER_SALT_LEN] {
    let mut salt = [0u8; MASTER_SALT_LEN];
    OsRng.fill_bytes(&mut salt);
    salt
}

/// Deterministic, unsalted SHA-256 lookup hash, hex-encoded.
///
/// Used strictly as a non-secret index key: equal plaintext names map to the
/// same token so rows can be found without decrypting anything.
pub fn deterministic_hash(plaintext: &str) -> String {
    hex::encode(Sha256::digest(plaintext.as_bytes()))
}

/// Master credential gating access to one database.
///
/// Both fields are hex-encoded for the config record; the hash is Argon2id
/// over a fresh random salt.
#[derive(Debug, Clone)]
pub struct MasterCredential {
    /// Hex-encoded password hash
    pub hash: String,
    /// Hex-encoded salt
    pub salt: String,
}

impl MasterCredential {
    /// Hash a master password under a fresh random salt.
    pub fn generate(password: &str) -> Result<Self> {
        if password.is_empty() {
            return Err(Error::Crypto("Master password cannot be empty".to_string()));
        }

        let salt = generate_salt();
        let hash = derive_key_bytes(password, &salt)?;

        Ok(Self {
            hash: hex::encode(hash),
            salt: hex::encode(salt),
        })
    }

    /// Verify a candidate password against a stored (hash, salt) pair.
    ///
    /// Recomputes the hash under the stored salt and compares in constant
    /// time.
    pub fn verify(candidate: &str, hash: &str, salt: &str) -> Result<bool> {
        let salt_bytes = hex::decode(salt)
            .map_err(|e| Error::Crypto(format!("Invalid stored salt: {}", e)))?;
        let expected = hex::decode(hash)
            .map_err(|e| Error::Crypto(format!("Invalid stored hash: {}", e)))?;

        let recomputed = derive_key_bytes(candidate, &salt_bytes)?;
        Ok(constant_time_eq(&recomputed, &expected))
    }
}

/// Symmetric key derived from the master password for one operation.
///
/// The derivation is intentionally deterministic: the salt is
/// SHA-256(password), so the same password always re-derives the same key
/// without persisting a second salt. The key changes only when the master
/// password changes.
pub struct SessionKey(Zeroizing<[u8; KEY_LEN]>);

impl SessionKey {
    /// Derive the session key from the master password.
    pub fn derive(password: &str) -> Result<Self> {
        if password.is_empty() {
            return Err(Error::Crypto("Master password cannot be empty".to_string()));
        }

        let salt = Sha256::digest(password.as_bytes());
        let key = derive_key_bytes(password, &salt)?;
        Ok(Self(Zeroizing::new(key)))
    }

    /// Create from raw key bytes
    #[cfg(test)]
    pub(crate) fn from_bytes(bytes: [u8; KEY_LEN]) -> Self {
        Self(Zeroizing::new(bytes))
    }

    /// Get key bytes
    pub fn as_bytes(&self) -> &[u8; KEY_LEN] {
        &self.0
    }
}

/// Encrypt one field value under the session key.
///
/// Format: base64([version(1)][nonce(12)][ciphertext+tag]). Each field is
/// encrypted independently with a fresh nonce, never whole rows.
pub fn encrypt_field(plaintext: &str, key: &SessionKey) -> Result<String> {
    let cipher = ChaCha20Poly1305::new(key.as_bytes().into());

    let mut nonce_bytes = [0u8; NONCE_LEN];
    OsRng.fill_bytes(&mut nonce_bytes);
    let nonce = Nonce::from_slice(&nonce_bytes);

    let ciphertext = cipher
        .encrypt(nonce, plaintext.as_bytes())
        .map_err(|e| Error::Crypto(e.to_string()))?;

    let mut token = Vec::with_capacity(1 + NONCE_LEN + ciphertext.len());
    token.push(TOKEN_VERSION);
    token.extend_from_slice(&nonce_bytes);
    token.extend_from_slice(&ciphertext);

    Ok(BASE64.encode(token))
}

/// Decrypt one field token under the session key.
///
/// Fails on authentication failure (wrong key or tampered token), unknown
/// version, or malformed input. Never returns plausible garbage.
pub fn decrypt_field(token: &str, key: &SessionKey) -> Result<String> {
    let data = BASE64
        .decode(token)
        .map_err(|_| Error::Crypto("Malformed field token".to_string()))?;

    if data.len() < 1 + NONCE_LEN {
        return Err(Error::Crypto("Field token too short".to_string()));
    }

    let version = data[0];
    if version != TOKEN_VERSION {
        return Err(Error::Crypto(format!(
            "Unsupported field token version: {}",
            version
        )));
    }

    let cipher = ChaCha20Poly1305::new(key.as_bytes().into());
    let nonce = Nonce::from_slice(&data[1..1 + NONCE_LEN]);
    let ciphertext = &data[1 + NONCE_LEN..];

    let plaintext = cipher
        .decrypt(nonce, ciphertext)
        .map_err(|_| Error::Crypto("Field authentication failed".to_string()))?;

    String::from_utf8(plaintext)
        .map_err(|_| Error::Crypto("Decrypted field is not valid UTF-8".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_master_credential_roundtrip() {
        let cred = MasterCredential::generate("MySecurePass123!").unwrap();
        assert!(MasterCredential::verify("MySecurePass123!", &cred.hash, &cred.salt).unwrap());
        assert!(!MasterCredential::verify("wrong_password", &cred.hash, &cred.salt).unwrap());
    }

    #[test]
    fn test_empty_master_password_rejected() {
        assert!(MasterCredential::generate("").is_err());
        assert!(SessionKey::derive("").is_err());
    }

    #[test]
    fn test_master_salts_are_unique() {
        let a = MasterCredential::generate("same password").unwrap();
        let b = MasterCredential::generate("same password").unwrap();
        assert_ne!(a.salt, b.salt);
        assert_ne!(a.hash, b.hash);
    }

    #[test]
    fn test_verify_rejects_bad_encoding() {
        assert!(MasterCredential::verify("pw", "not-hex", "also not hex").is_err());
    }

    #[test]
    fn test_deterministic_hash_is_stable() {
        let h1 = deterministic_hash("Work");
        let h2 = deterministic_hash("Work");
        assert_eq!(h1, h2);
        assert_eq!(h1.len(), 64);
        assert_ne!(deterministic_hash("Work"), deterministic_hash("work"));
    }

    #[test]
    fn test_session_key_is_deterministic() {
        let k1 = SessionKey::derive("M1").unwrap();
        let k2 = SessionKey::derive("M1").unwrap();
        assert_eq!(k1.as_bytes(), k2.as_bytes());

        let k3 = SessionKey::derive("M2").unwrap();
        assert_ne!(k1.as_bytes(), k3.as_bytes());
    }

    #[test]
    fn test_field_roundtrip() {
        let key = SessionKey::from_bytes([7u8; 32]);
        let token = encrypt_field("Secret1!", &key).unwrap();
        assert_ne!(token, "Secret1!");
        assert_eq!(decrypt_field(&token, &key).unwrap(), "Secret1!");
    }

    #[test]
    fn test_field_roundtrip_empty_string() {
        let key = SessionKey::from_bytes([7u8; 32]);
        let token = encrypt_field("", &key).unwrap();
        assert_eq!(decrypt_field(&token, &key).unwrap(), "");
    }

    #[test]
    fn test_fresh_nonce_per_encryption() {
        let key = SessionKey::from_bytes([7u8; 32]);
        let t1 = encrypt_field("same value", &key).unwrap();
        let t2 = encrypt_field("same value", &key).unwrap();
        assert_ne!(t1, t2);
    }

    #[test]
    fn test_wrong_key_decryption_fails() {
        let k1 = SessionKey::derive("M1").unwrap();
        let k2 = SessionKey::derive("M2").unwrap();

        let token = encrypt_field("Secret", &k1).unwrap();
        assert!(matches!(decrypt_field(&token, &k2), Err(Error::Crypto(_))));
    }

    #[test]
    fn test_tampered_token_fails() {
        let key = SessionKey::from_bytes([7u8; 32]);
        let token = encrypt_field("Secret", &key).unwrap();

        let mut raw = BASE64.decode(&token).unwrap();
        let last = raw.len() - 1;
        raw[last] ^= 0x01;
        let tampered = BASE64.encode(raw);

        assert!(decrypt_field(&tampered, &key).is_err());
    }

    #[test]
    fn test_malformed_token_fails() {
        let key = SessionKey::from_bytes([7u8; 32]);
        assert!(decrypt_field("not base64 !!!", &key).is_err());
        assert!(decrypt_field(&BASE64.encode([1u8, 2, 3]), &key).is_err());
    }

    #[test]
    fn test_unknown_token_version_fails() {
        let key = SessionKey::from_bytes([7u8; 32]);
        let token = encrypt_field("Secret", &key).unwrap();

        let mut raw = BASE64.decode(&token).unwrap();
        raw[0] = 9;
        assert!(decrypt_field(&BASE64.encode(raw), &key).is_err());
    }
}
