//! On-disk artifact layouts.
//!
//! Key file (exactly 76 bytes when written):
//! ```text
//! [0..16)  salt
//! [16..28) key-wrap nonce
//! [28..44) key-wrap tag
//! [44..76) wrapped data key
//! ```
//!
//! Cipher file (28 + N bytes):
//! ```text
//! [0..12)  payload nonce
//! [12..28) payload tag
//! [28..)   ciphertext (N = plaintext length)
//! ```
//!
//! There is no magic number or version field. Parsing only checks minimum
//! lengths; everything else is left to tag verification.

use crate::error::{Artifact, CryptoError, CryptoResult};
use crate::kdf::Salt;
use crate::keys::WrappedKey;
use crate::nonce::{AuthTag, Nonce};
use crate::payload::SealedPayload;
use crate::{CIPHER_FILE_MIN_SIZE, KEY_FILE_SIZE, NONCE_SIZE, SALT_SIZE, TAG_SIZE};

const KEY_NONCE_AT: usize = SALT_SIZE;
const KEY_TAG_AT: usize = KEY_NONCE_AT + NONCE_SIZE;
const WRAPPED_KEY_AT: usize = KEY_TAG_AT + TAG_SIZE;

const PAYLOAD_TAG_AT: usize = NONCE_SIZE;
const CIPHERTEXT_AT: usize = PAYLOAD_TAG_AT + TAG_SIZE;

/// The key file: everything needed to recover the data key given the password.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyFile {
    pub salt: Salt,
    pub wrapped: WrappedKey,
}

impl KeyFile {
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(WRAPPED_KEY_AT + self.wrapped.ciphertext.len());
        out.extend_from_slice(self.salt.as_bytes());
        out.extend_from_slice(self.wrapped.nonce.as_bytes());
        out.extend_from_slice(self.wrapped.tag.as_bytes());
        out.extend_from_slice(&self.wrapped.ciphertext);
        out
    }

    /// Parse a key file. Anything past the tag is taken as the wrapped key.
    pub fn from_bytes(bytes: &[u8]) -> CryptoResult<Self> {
        if bytes.len() < KEY_FILE_SIZE {
            return Err(CryptoError::FormatError {
                artifact: Artifact::KeyFile,
                len: bytes.len(),
                min: KEY_FILE_SIZE,
            });
        }

        Ok(Self {
            salt: Salt::from_bytes(fixed(&bytes[..KEY_NONCE_AT])),
            wrapped: WrappedKey {
                nonce: Nonce::from_bytes(fixed(&bytes[KEY_NONCE_AT..KEY_TAG_AT])),
                tag: AuthTag::from_bytes(fixed(&bytes[KEY_TAG_AT..WRAPPED_KEY_AT])),
                ciphertext: bytes[WRAPPED_KEY_AT..].to_vec(),
            },
        })
    }
}

/// The cipher file: the sealed payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CipherFile {
    pub payload: SealedPayload,
}

impl CipherFile {
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(CIPHERTEXT_AT + self.payload.ciphertext.len());
        out.extend_from_slice(self.payload.nonce.as_bytes());
        out.extend_from_slice(self.payload.tag.as_bytes());
        out.extend_from_slice(&self.payload.ciphertext);
        out
    }

    pub fn from_bytes(bytes: &[u8]) -> CryptoResult<Self> {
        if bytes.len() < CIPHER_FILE_MIN_SIZE {
            return Err(CryptoError::FormatError {
                artifact: Artifact::CipherFile,
                len: bytes.len(),
                min: CIPHER_FILE_MIN_SIZE,
            });
        }

        Ok(Self {
            payload: SealedPayload {
                nonce: Nonce::from_bytes(fixed(&bytes[..PAYLOAD_TAG_AT])),
                tag: AuthTag::from_bytes(fixed(&bytes[PAYLOAD_TAG_AT..CIPHERTEXT_AT])),
                ciphertext: bytes[CIPHERTEXT_AT..].to_vec(),
            },
        })
    }
}

/// Copy a slice whose length the caller has already checked.
fn fixed<const N: usize>(slice: &[u8]) -> [u8; N] {
    let mut out = [0u8; N];
    out.copy_from_slice(slice);
    out
}
