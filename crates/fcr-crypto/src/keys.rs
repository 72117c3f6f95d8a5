//! Data key generation and wrapping under the master key

use zeroize::{Zeroize, Zeroizing};

use crate::aead;
use crate::error::{CryptoError, CryptoResult};
use crate::kdf::MasterKey;
use crate::nonce::{AuthTag, KeyWrap, Nonce};
use crate::{rng, KEY_SIZE};

/// A per-file 256-bit encryption key. Zeroized on drop.
pub struct DataKey {
    bytes: [u8; KEY_SIZE],
}

impl DataKey {
    pub fn from_bytes(bytes: [u8; KEY_SIZE]) -> Self {
        Self { bytes }
    }

    pub fn as_bytes(&self) -> &[u8; KEY_SIZE] {
        &self.bytes
    }
}

impl Drop for DataKey {
    fn drop(&mut self) {
        self.bytes.zeroize();
    }
}

impl std::fmt::Debug for DataKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DataKey")
            .field("bytes", &"[REDACTED]")
            .finish()
    }
}

/// Generate a random 256-bit data key from the OS random source.
pub fn generate_data_key() -> CryptoResult<DataKey> {
    Ok(DataKey::from_bytes(rng::random_array()?))
}

/// A data key encrypted under a master key, as stored in the key file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WrappedKey {
    pub nonce: Nonce<KeyWrap>,
    pub tag: AuthTag<KeyWrap>,
    /// Encrypted data key. 32 bytes for anything this crate produced.
    pub ciphertext: Vec<u8>,
}

/// Wrap (encrypt) a data key using the master key.
///
/// AES-256-GCM, fresh random nonce, empty AAD.
pub fn wrap_data_key(master: &MasterKey, data_key: &DataKey) -> CryptoResult<WrappedKey> {
    let nonce = Nonce::<KeyWrap>::generate()?;

    // Holds the plaintext key until sealing succeeds.
    let mut buffer = Zeroizing::new(data_key.as_bytes().to_vec());
    let tag = aead::seal_in_place(master.as_bytes(), nonce.as_bytes(), &mut buffer)?;

    Ok(WrappedKey {
        nonce,
        tag: AuthTag::from_bytes(tag),
        ciphertext: std::mem::take(&mut *buffer),
    })
}

/// Unwrap (decrypt) a data key using the master key.
///
/// A wrong master key and a corrupted wrap are indistinguishable: both are
/// reported as [`CryptoError::AuthenticationFailure`].
pub fn unwrap_data_key(master: &MasterKey, wrapped: &WrappedKey) -> CryptoResult<DataKey> {
    let mut buffer = Zeroizing::new(wrapped.ciphertext.clone());
    aead::open_in_place(
        master.as_bytes(),
        wrapped.nonce.as_bytes(),
        &mut buffer,
        wrapped.tag.as_bytes(),
    )?;

    let bytes: [u8; KEY_SIZE] = buffer.as_slice().try_into().map_err(|_| {
        CryptoError::CipherInitFailure("unwrapped data key is not 256 bits")
    })?;
    Ok(DataKey::from_bytes(bytes))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::TAG_SIZE;

    fn test_master_key() -> MasterKey {
        MasterKey::from_bytes([42u8; KEY_SIZE])
    }

    #[test]
    fn test_data_key_generation() {
        let k1 = generate_data_key().unwrap();
        let k2 = generate_data_key().unwrap();
        assert_ne!(k1.as_bytes(), k2.as_bytes(), "random keys must differ");
    }

    #[test]
    fn test_key_wrap_unwrap_roundtrip() {
        let master = test_master_key();
        let data_key = generate_data_key().unwrap();

        let wrapped = wrap_data_key(&master, &data_key).unwrap();
        let unwrapped = unwrap_data_key(&master, &wrapped).unwrap();

        assert_eq!(data_key.as_bytes(), unwrapped.as_bytes());
    }

    #[test]
    fn test_wrapped_key_size() {
        let master = test_master_key();
        let data_key = generate_data_key().unwrap();
        let wrapped = wrap_data_key(&master, &data_key).unwrap();

        assert_eq!(wrapped.ciphertext.len(), KEY_SIZE);
        assert_ne!(wrapped.ciphertext.as_slice(), data_key.as_bytes());
    }

    #[test]
    fn test_wrapped_ciphertext_survives_scratch_zeroize() {
        let master = test_master_key();
        let data_key = DataKey::from_bytes([0x5Au8; KEY_SIZE]);
        let wrapped = wrap_data_key(&master, &data_key).unwrap();

        assert_eq!(wrapped.ciphertext.len(), KEY_SIZE);
        assert!(wrapped.ciphertext.iter().any(|&b| b != 0));
        assert_eq!(
            unwrap_data_key(&master, &wrapped).unwrap().as_bytes(),
            &[0x5Au8; KEY_SIZE]
        );
    }

    #[test]
    fn test_wrap_uses_fresh_nonce() {
        let master = test_master_key();
        let data_key = generate_data_key().unwrap();

        let a = wrap_data_key(&master, &data_key).unwrap();
        let b = wrap_data_key(&master, &data_key).unwrap();

        assert_ne!(a.nonce, b.nonce);
        assert_ne!(a.ciphertext, b.ciphertext);
    }

    #[test]
    fn test_key_unwrap_wrong_master() {
        let master1 = MasterKey::from_bytes([1u8; KEY_SIZE]);
        let master2 = MasterKey::from_bytes([2u8; KEY_SIZE]);
        let data_key = generate_data_key().unwrap();

        let wrapped = wrap_data_key(&master1, &data_key).unwrap();
        let result = unwrap_data_key(&master2, &wrapped);

        assert_eq!(result.unwrap_err(), CryptoError::AuthenticationFailure);
    }

    #[test]
    fn test_every_bit_flip_in_wrap_is_detected() {
        let master = test_master_key();
        let data_key = generate_data_key().unwrap();
        let wrapped = wrap_data_key(&master, &data_key).unwrap();

        for bit in 0..KEY_SIZE * 8 {
            let mut tampered = wrapped.clone();
            tampered.ciphertext[bit / 8] ^= 1 << (bit % 8);
            assert_eq!(
                unwrap_data_key(&master, &tampered).unwrap_err(),
                CryptoError::AuthenticationFailure,
                "ciphertext bit {bit}"
            );
        }

        for bit in 0..TAG_SIZE * 8 {
            let mut tag = *wrapped.tag.as_bytes();
            tag[bit / 8] ^= 1 << (bit % 8);
            let tampered = WrappedKey {
                tag: AuthTag::from_bytes(tag),
                ..wrapped.clone()
            };
            assert_eq!(
                unwrap_data_key(&master, &tampered).unwrap_err(),
                CryptoError::AuthenticationFailure,
                "tag bit {bit}"
            );
        }
    }

    #[test]
    fn test_trailing_bytes_fail_authentication() {
        let master = test_master_key();
        let data_key = generate_data_key().unwrap();
        let mut wrapped = wrap_data_key(&master, &data_key).unwrap();
        wrapped.ciphertext.push(0);

        assert_eq!(
            unwrap_data_key(&master, &wrapped).unwrap_err(),
            CryptoError::AuthenticationFailure
        );
    }

    #[test]
    fn test_authentic_short_key_is_rejected() {
        // Authentic under the master key, but only 16 bytes long.
        let master = test_master_key();
        let nonce = Nonce::<KeyWrap>::from_bytes([5u8; crate::NONCE_SIZE]);
        let mut buffer = vec![0x11u8; 16];
        let tag = aead::seal_in_place(master.as_bytes(), nonce.as_bytes(), &mut buffer).unwrap();
        let wrapped = WrappedKey {
            nonce,
            tag: AuthTag::from_bytes(tag),
            ciphertext: buffer,
        };

        assert!(matches!(
            unwrap_data_key(&master, &wrapped),
            Err(CryptoError::CipherInitFailure(_))
        ));
    }
}
