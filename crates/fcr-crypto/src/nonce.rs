//! Role-tagged nonces and authentication tags.
//!
//! A file is protected by two independent AEAD operations: wrapping the data
//! key and sealing the payload. Each has its own nonce and tag. The role
//! marker makes the two non-interchangeable at compile time:
//!
//! ```compile_fail
//! use fcr_crypto::{KeyWrap, Nonce, Payload};
//! let wrap: Nonce<KeyWrap> = Nonce::from_bytes([0u8; 12]);
//! let payload: Nonce<Payload> = wrap;
//! ```

use std::fmt;
use std::marker::PhantomData;

use crate::error::CryptoResult;
use crate::{rng, NONCE_SIZE, TAG_SIZE};

/// Role marker: nonce/tag of the data-key wrap in the key file.
#[derive(Debug)]
pub enum KeyWrap {}

/// Role marker: nonce/tag of the payload in the cipher file.
#[derive(Debug)]
pub enum Payload {}

/// A 96-bit AES-GCM nonce bound to one role.
pub struct Nonce<R> {
    bytes: [u8; NONCE_SIZE],
    role: PhantomData<fn() -> R>,
}

impl<R> Nonce<R> {
    /// Draw a fresh nonce from the OS random source.
    pub fn generate() -> CryptoResult<Self> {
        Ok(Self::from_bytes(rng::random_array()?))
    }

    pub fn from_bytes(bytes: [u8; NONCE_SIZE]) -> Self {
        Self {
            bytes,
            role: PhantomData,
        }
    }

    pub fn as_bytes(&self) -> &[u8; NONCE_SIZE] {
        &self.bytes
    }
}

/// A 128-bit GCM authentication tag bound to one role.
pub struct AuthTag<R> {
    bytes: [u8; TAG_SIZE],
    role: PhantomData<fn() -> R>,
}

impl<R> AuthTag<R> {
    pub fn from_bytes(bytes: [u8; TAG_SIZE]) -> Self {
        Self {
            bytes,
            role: PhantomData,
        }
    }

    pub fn as_bytes(&self) -> &[u8; TAG_SIZE] {
        &self.bytes
    }
}

// Manual impls: derives would demand the same traits of the uninhabited marker.

impl<R> Clone for Nonce<R> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<R> Copy for Nonce<R> {}

impl<R> PartialEq for Nonce<R> {
    fn eq(&self, other: &Self) -> bool {
        self.bytes == other.bytes
    }
}

impl<R> Eq for Nonce<R> {}

impl<R> fmt::Debug for Nonce<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Nonce").field(&self.bytes).finish()
    }
}

impl<R> Clone for AuthTag<R> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<R> Copy for AuthTag<R> {}

impl<R> PartialEq for AuthTag<R> {
    fn eq(&self, other: &Self) -> bool {
        self.bytes == other.bytes
    }
}

impl<R> Eq for AuthTag<R> {}

impl<R> fmt::Debug for AuthTag<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("AuthTag").field(&self.bytes).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_nonces_differ() {
        let a = Nonce::<Payload>::generate().unwrap();
        let b = Nonce::<Payload>::generate().unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_nonce_bytes_preserved() {
        let n = Nonce::<KeyWrap>::from_bytes([7u8; NONCE_SIZE]);
        assert_eq!(n.as_bytes(), &[7u8; NONCE_SIZE]);
    }

    #[test]
    fn test_tag_is_copy() {
        let t = AuthTag::<Payload>::from_bytes([1u8; TAG_SIZE]);
        let u = t;
        assert_eq!(t, u);
    }
}
