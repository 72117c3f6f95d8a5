//! Payload encryption under the data key
//!
//! Same AES-256-GCM construction as the key wrap, with its own nonce. The
//! nonce type is `Nonce<Payload>`, so a key-wrap nonce cannot end up here.

use zeroize::Zeroizing;

use crate::aead;
use crate::error::CryptoResult;
use crate::keys::DataKey;
use crate::nonce::{AuthTag, Nonce, Payload};

/// An encrypted payload with its nonce and tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SealedPayload {
    pub nonce: Nonce<Payload>,
    pub tag: AuthTag<Payload>,
    /// Same length as the plaintext.
    pub ciphertext: Vec<u8>,
}

/// Encrypt `plaintext` under `data_key` with a fresh random nonce.
pub fn seal_payload(data_key: &DataKey, plaintext: &[u8]) -> CryptoResult<SealedPayload> {
    let nonce = Nonce::<Payload>::generate()?;

    let mut buffer = plaintext.to_vec();
    let tag = aead::seal_in_place(data_key.as_bytes(), nonce.as_bytes(), &mut buffer)?;

    tracing::debug!(bytes = buffer.len(), "payload sealed");
    Ok(SealedPayload {
        nonce,
        tag: AuthTag::from_bytes(tag),
        ciphertext: buffer,
    })
}

/// Verify and decrypt a sealed payload.
///
/// Returns [`CryptoError::AuthenticationFailure`](crate::CryptoError::AuthenticationFailure)
/// if any bit of the nonce, tag or ciphertext was altered, or the key is wrong.
/// No plaintext is released unless the tag verifies, and the scratch buffer
/// is zeroized on failure.
pub fn open_payload(data_key: &DataKey, sealed: &SealedPayload) -> CryptoResult<Vec<u8>> {
    let mut buffer = Zeroizing::new(sealed.ciphertext.clone());
    aead::open_in_place(
        data_key.as_bytes(),
        sealed.nonce.as_bytes(),
        &mut buffer,
        sealed.tag.as_bytes(),
    )?;

    tracing::debug!(bytes = buffer.len(), "payload opened");
    Ok(std::mem::take(&mut *buffer))
}
