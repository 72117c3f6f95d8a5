//! Key derivation: PBKDF2-HMAC-SHA256 password → master key

use pbkdf2::pbkdf2_hmac;
use secrecy::{ExposeSecret, SecretSlice};
use sha2::Sha256;
use zeroize::Zeroize;

use crate::error::CryptoResult;
use crate::{rng, KEY_SIZE, PBKDF2_ITERATIONS, SALT_SIZE};

/// A password as raw bytes. Zeroized on drop, redacted in `Debug`.
pub type Password = SecretSlice<u8>;

/// A 256-bit master key derived from a password.
///
/// Only ever used to wrap or unwrap a data key. Zeroized on drop.
pub struct MasterKey {
    bytes: [u8; KEY_SIZE],
}

impl MasterKey {
    pub fn from_bytes(bytes: [u8; KEY_SIZE]) -> Self {
        Self { bytes }
    }

    pub fn as_bytes(&self) -> &[u8; KEY_SIZE] {
        &self.bytes
    }
}

impl Drop for MasterKey {
    fn drop(&mut self) {
        self.bytes.zeroize();
    }
}

impl std::fmt::Debug for MasterKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MasterKey")
            .field("bytes", &"[REDACTED]")
            .finish()
    }
}

/// The 16-byte PBKDF2 salt stored at the front of every key file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Salt([u8; SALT_SIZE]);

impl Salt {
    /// Draw a fresh salt from the OS random source.
    pub fn generate() -> CryptoResult<Self> {
        Ok(Self(rng::random_array()?))
    }

    pub fn from_bytes(bytes: [u8; SALT_SIZE]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; SALT_SIZE] {
        &self.0
    }
}

/// Derive the master key for `password` and `salt`.
///
/// Deterministic, and slow on purpose: 100,000 rounds of HMAC-SHA256.
pub fn derive_master_key(password: &Password, salt: &Salt) -> MasterKey {
    let mut key = [0u8; KEY_SIZE];
    pbkdf2_hmac::<Sha256>(
        password.expose_secret(),
        salt.as_bytes(),
        PBKDF2_ITERATIONS,
        &mut key,
    );
    let master = MasterKey::from_bytes(key);
    key.zeroize();
    master
}
