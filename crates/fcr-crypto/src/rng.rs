//! OS CSPRNG access. Every random byte in the engine comes through here.

use rand::rngs::OsRng;
use rand::RngCore;

use crate::error::{CryptoError, CryptoResult};

/// Fill a fixed-size array from the OS entropy source.
///
/// Fails instead of falling back to a weaker generator.
pub(crate) fn random_array<const N: usize>() -> CryptoResult<[u8; N]> {
    let mut bytes = [0u8; N];
    OsRng.try_fill_bytes(&mut bytes).map_err(|e| {
        tracing::error!("OS random source failed: {e}");
        CryptoError::RandomSourceFailure
    })?;
    Ok(bytes)
}
