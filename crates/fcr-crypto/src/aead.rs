//! AES-256-GCM with a detached tag and empty associated data.
//!
//! Shared by the key wrapper and the payload cipher. Ciphertext is written
//! in place, so ciphertext length always equals plaintext length.

use aes_gcm::aead::{AeadInPlace, KeyInit};
use aes_gcm::{Aes256Gcm, Nonce, Tag};

use crate::error::{CryptoError, CryptoResult};
use crate::{KEY_SIZE, NONCE_SIZE, TAG_SIZE};

fn cipher(key: &[u8; KEY_SIZE]) -> CryptoResult<Aes256Gcm> {
    Aes256Gcm::new_from_slice(key)
        .map_err(|_| CryptoError::CipherInitFailure("AES-256 key rejected"))
}

/// Encrypt `buffer` in place, returning the authentication tag.
pub(crate) fn seal_in_place(
    key: &[u8; KEY_SIZE],
    nonce: &[u8; NONCE_SIZE],
    buffer: &mut [u8],
) -> CryptoResult<[u8; TAG_SIZE]> {
    let tag = cipher(key)?
        .encrypt_in_place_detached(Nonce::from_slice(nonce), b"", buffer)
        .map_err(|_| CryptoError::CipherInitFailure("AES-GCM refused the buffer"))?;

    let mut out = [0u8; TAG_SIZE];
    out.copy_from_slice(tag.as_slice());
    Ok(out)
}

/// Verify `tag` and decrypt `buffer` in place.
///
/// On failure the buffer contents are unspecified and must not be used.
pub(crate) fn open_in_place(
    key: &[u8; KEY_SIZE],
    nonce: &[u8; NONCE_SIZE],
    buffer: &mut [u8],
    tag: &[u8; TAG_SIZE],
) -> CryptoResult<()> {
    cipher(key)?
        .decrypt_in_place_detached(
            Nonce::from_slice(nonce),
            b"",
            buffer,
            Tag::from_slice(tag),
        )
        .map_err(|_| CryptoError::AuthenticationFailure)
}
