//! fcr-crypto: password-based envelope encryption for FileCryptor
//!
//! Key hierarchy:
//! ```text
//! Password + Salt (16 bytes, random per file)
//!   └── Master Key (256-bit, PBKDF2-HMAC-SHA256, 100,000 rounds)
//!       └── Data Key (per-file, 256-bit random, wrapped by master key)
//!           └── Payload AEAD: AES-256-GCM (key=data_key, nonce=random_96bit, AAD=empty)
//! ```
//!
//! Artifacts (bit-exact, no version marker):
//! ```text
//! key file:    [16 salt][12 key nonce][16 key tag][32 wrapped data key]   = 76 bytes
//! cipher file: [12 payload nonce][16 payload tag][N ciphertext]           = 28 + N bytes
//! ```
//!
//! The engine never touches the filesystem; callers hand in byte buffers.

pub mod envelope;
pub mod error;
pub mod format;
pub mod kdf;
pub mod keys;
pub mod nonce;
pub mod payload;

mod aead;
mod rng;

pub use envelope::{decrypt, encrypt, EncryptedArtifacts};
pub use error::{Artifact, CryptoError, CryptoResult};
pub use format::{CipherFile, KeyFile};
pub use kdf::{derive_master_key, MasterKey, Password, Salt};
pub use keys::{generate_data_key, unwrap_data_key, wrap_data_key, DataKey, WrappedKey};
pub use nonce::{AuthTag, KeyWrap, Nonce, Payload};
pub use payload::{open_payload, seal_payload, SealedPayload};

/// Size of the master key and the data key in bytes (256-bit)
pub const KEY_SIZE: usize = 32;

/// Size of the PBKDF2 salt in bytes
pub const SALT_SIZE: usize = 16;

/// Size of an AES-GCM nonce (96-bit)
pub const NONCE_SIZE: usize = 12;

/// Size of a GCM authentication tag
pub const TAG_SIZE: usize = 16;

/// PBKDF2-HMAC-SHA256 iteration count. Baked into the key-file format.
pub const PBKDF2_ITERATIONS: u32 = 100_000;

/// Exact length of a key file.
pub const KEY_FILE_SIZE: usize = SALT_SIZE + NONCE_SIZE + TAG_SIZE + KEY_SIZE;

/// Minimum length of a cipher file (empty payload).
pub const CIPHER_FILE_MIN_SIZE: usize = NONCE_SIZE + TAG_SIZE;
