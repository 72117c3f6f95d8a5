//! The two public operations: encrypt a buffer into (cipher file, key file)
//! and decrypt it back.
//!
//! ```text
//! encrypt: salt ─► PBKDF2 ─► master ─┐
//!          random data key ──────────┼─► wrap ──► key file
//!                                    └─► seal ──► cipher file
//!
//! decrypt: parse both ─► PBKDF2 ─► unwrap ─► open ─► plaintext
//! ```
//!
//! Master key and data key live only for the duration of one call and are
//! zeroized when they go out of scope, on success and on every error path.

use crate::error::CryptoResult;
use crate::format::{CipherFile, KeyFile};
use crate::kdf::{derive_master_key, Password, Salt};
use crate::keys::{generate_data_key, unwrap_data_key, wrap_data_key};
use crate::payload::{open_payload, seal_payload};

/// Output of [`encrypt`]. Both artifacts are needed to decrypt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncryptedArtifacts {
    /// Payload nonce ‖ payload tag ‖ ciphertext
    pub cipher_file: Vec<u8>,
    /// Salt ‖ key nonce ‖ key tag ‖ wrapped data key (76 bytes)
    pub key_file: Vec<u8>,
}

/// Encrypt `plaintext` under a fresh data key protected by `password`.
///
/// Salt, data key and both nonces are drawn fresh on every call, so
/// encrypting the same input twice yields unrelated artifacts.
pub fn encrypt(plaintext: &[u8], password: &Password) -> CryptoResult<EncryptedArtifacts> {
    let salt = Salt::generate()?;
    let master = derive_master_key(password, &salt);
    let data_key = generate_data_key()?;

    let wrapped = wrap_data_key(&master, &data_key)?;
    drop(master);

    let payload = seal_payload(&data_key, plaintext)?;
    drop(data_key);

    let key_file = KeyFile { salt, wrapped }.to_bytes();
    let cipher_file = CipherFile { payload }.to_bytes();

    tracing::debug!(
        plaintext_bytes = plaintext.len(),
        cipher_file_bytes = cipher_file.len(),
        key_file_bytes = key_file.len(),
        "encrypted"
    );
    Ok(EncryptedArtifacts {
        cipher_file,
        key_file,
    })
}

/// Decrypt a cipher file using its key file and `password`.
///
/// Both artifacts are length-checked before any key derivation happens.
/// A wrong password, a swapped key file and any tampering all surface as
/// [`CryptoError::AuthenticationFailure`](crate::CryptoError::AuthenticationFailure).
pub fn decrypt(cipher_file: &[u8], key_file: &[u8], password: &Password) -> CryptoResult<Vec<u8>> {
    let key_file = KeyFile::from_bytes(key_file)?;
    let cipher_file = CipherFile::from_bytes(cipher_file)?;

    let master = derive_master_key(password, &key_file.salt);
    let data_key = unwrap_data_key(&master, &key_file.wrapped)?;
    drop(master);

    let plaintext = open_payload(&data_key, &cipher_file.payload)?;

    tracing::debug!(plaintext_bytes = plaintext.len(), "decrypted");
    Ok(plaintext)
}
