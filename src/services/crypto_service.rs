//! Password cipher for the stored WideChat password.
//!
//! PBKDF2-HMAC-SHA256 (100 000 iterations) derives a 256-bit AES-GCM key from a
//! passphrase. Blobs are `base64(nonce || ciphertext || tag)` with a fresh
//! 12-byte nonce per call, the same layout WebCrypto produces, so blobs written
//! by the extension decrypt here and vice versa.

use std::num::NonZeroU32;

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use ring::aead::{self, Aad, BoundKey, Nonce, NonceSequence, UnboundKey, AES_256_GCM};
use ring::pbkdf2;
use ring::rand::{SecureRandom, SystemRandom};
use zeroize::Zeroizing;

use crate::types::errors::CryptoError;

/// PBKDF2 iteration count for key derivation.
pub const PBKDF2_ITERATIONS: u32 = 100_000;

/// Salt used when the caller does not supply one. Not a secret.
pub const DEFAULT_SALT: &str = "widechat";

/// AES-256-GCM key length in bytes.
pub const KEY_LENGTH: usize = 32;

/// AES-256-GCM nonce/IV length in bytes.
pub const NONCE_LENGTH: usize = 12;

/// AES-256-GCM authentication tag length in bytes.
pub const TAG_LENGTH: usize = 16;

/// Trait defining the password cipher operations.
pub trait PasswordCipherTrait {
    /// Derives a key from a passphrase and salt. Deterministic per pair.
    fn derive_key(&self, password: &str, salt: &[u8]) -> Result<Zeroizing<Vec<u8>>, CryptoError>;

    /// Encrypts `plaintext` under a key derived from `password`.
    fn encrypt(&self, plaintext: &str, password: &str) -> Result<String, CryptoError>;

    /// Decrypts a blob. Any failure yields `None`.
    fn decrypt(&self, blob: &str, password: &str) -> Option<Zeroizing<String>>;
}

/// A nonce sequence that yields a single nonce value.
struct SingleNonce {
    nonce: Option<[u8; NONCE_LENGTH]>,
}

impl SingleNonce {
    fn new(nonce_bytes: [u8; NONCE_LENGTH]) -> Self {
        Self {
            nonce: Some(nonce_bytes),
        }
    }
}

impl NonceSequence for SingleNonce {
    fn advance(&mut self) -> Result<Nonce, ring::error::Unspecified> {
        self.nonce
            .take()
            .map(Nonce::assume_unique_for_key)
            .ok_or(ring::error::Unspecified)
    }
}

/// Password cipher backed by `ring`.
#[derive(Clone)]
pub struct PasswordCipher {
    rng: SystemRandom,
    salt: Vec<u8>,
}

impl PasswordCipher {
    /// Creates a cipher using [`DEFAULT_SALT`].
    pub fn new() -> Self {
        Self::with_salt(DEFAULT_SALT.as_bytes())
    }

    /// Creates a cipher that derives keys with a caller-supplied salt.
    pub fn with_salt(salt: &[u8]) -> Self {
        Self {
            rng: SystemRandom::new(),
            salt: salt.to_vec(),
        }
    }

    /// Decrypts a blob, reporting why it failed.
    pub fn try_decrypt(&self, blob: &str, password: &str) -> Result<Zeroizing<String>, CryptoError> {
        let data = BASE64
            .decode(blob.trim())
            .map_err(|e| CryptoError::MalformedBlob(e.to_string()))?;

        if data.len() < NONCE_LENGTH + TAG_LENGTH {
            return Err(CryptoError::MalformedBlob(format!(
                "Blob must be at least {} bytes, got {}",
                NONCE_LENGTH + TAG_LENGTH,
                data.len()
            )));
        }

        let mut nonce_bytes = [0u8; NONCE_LENGTH];
        nonce_bytes.copy_from_slice(&data[..NONCE_LENGTH]);

        let key = self.derive_key(password, &self.salt)?;
        let unbound_key = UnboundKey::new(&AES_256_GCM, &key)
            .map_err(|_| CryptoError::Decryption("Failed to create decryption key".to_string()))?;
        let mut opening_key = aead::OpeningKey::new(unbound_key, SingleNonce::new(nonce_bytes));

        let mut in_out = Zeroizing::new(data[NONCE_LENGTH..].to_vec());
        let plaintext = opening_key
            .open_in_place(Aad::empty(), &mut in_out)
            .map_err(|_| {
                CryptoError::Decryption("Decryption failed: invalid key or corrupted data".to_string())
            })?;

        let text = std::str::from_utf8(plaintext)
            .map_err(|e| CryptoError::Decryption(format!("Plaintext is not UTF-8: {}", e)))?;
        Ok(Zeroizing::new(text.to_string()))
    }
}

impl Default for PasswordCipher {
    fn default() -> Self {
        Self::new()
    }
}

impl PasswordCipherTrait for PasswordCipher {
    fn derive_key(&self, password: &str, salt: &[u8]) -> Result<Zeroizing<Vec<u8>>, CryptoError> {
        let iterations = NonZeroU32::new(PBKDF2_ITERATIONS)
            .ok_or_else(|| CryptoError::KeyDerivation("Invalid iteration count".to_string()))?;

        let mut key = Zeroizing::new(vec![0u8; KEY_LENGTH]);
        pbkdf2::derive(
            pbkdf2::PBKDF2_HMAC_SHA256,
            iterations,
            salt,
            password.as_bytes(),
            &mut key,
        );

        Ok(key)
    }

    fn encrypt(&self, plaintext: &str, password: &str) -> Result<String, CryptoError> {
        let mut nonce_bytes = [0u8; NONCE_LENGTH];
        self.rng
            .fill(&mut nonce_bytes)
            .map_err(|_| CryptoError::RandomGeneration("Failed to generate nonce".to_string()))?;

        let key = self.derive_key(password, &self.salt)?;
        let unbound_key = UnboundKey::new(&AES_256_GCM, &key)
            .map_err(|_| CryptoError::Encryption("Failed to create encryption key".to_string()))?;
        let mut sealing_key = aead::SealingKey::new(unbound_key, SingleNonce::new(nonce_bytes));

        // ring appends the tag, which matches the WebCrypto layout
        let mut in_out = plaintext.as_bytes().to_vec();
        sealing_key
            .seal_in_place_append_tag(Aad::empty(), &mut in_out)
            .map_err(|_| CryptoError::Encryption("Encryption operation failed".to_string()))?;

        let mut combined = Vec::with_capacity(NONCE_LENGTH + in_out.len());
        combined.extend_from_slice(&nonce_bytes);
        combined.extend_from_slice(&in_out);

        Ok(BASE64.encode(combined))
    }

    fn decrypt(&self, blob: &str, password: &str) -> Option<Zeroizing<String>> {
        match self.try_decrypt(blob, password) {
            Ok(plaintext) => Some(plaintext),
            Err(err) => {
                tracing::warn!(error = %err, "Failed to decrypt saved password");
                None
            }
        }
    }
}
