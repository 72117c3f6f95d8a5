use thiserror::Error;

pub type CryptoResult<T> = Result<T, CryptoError>;

/// Which of the two on-disk artifacts a format error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Artifact {
    KeyFile,
    CipherFile,
}

impl std::fmt::Display for Artifact {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Artifact::KeyFile => f.write_str("key file"),
            Artifact::CipherFile => f.write_str("cipher file"),
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CryptoError {
    /// The OS random source could not supply entropy. Nothing was produced.
    #[error("secure random source unavailable")]
    RandomSourceFailure,

    #[error("cipher initialization failed: {0}")]
    CipherInitFailure(&'static str),

    /// Tag verification failed. Deliberately carries no detail about why.
    #[error("authentication failed: wrong password or corrupted data")]
    AuthenticationFailure,

    #[error("invalid {artifact}: {len} bytes (expected at least {min})")]
    FormatError {
        artifact: Artifact,
        len: usize,
        min: usize,
    },
}

impl CryptoError {
    pub fn is_format(&self) -> bool {
        matches!(self, Self::FormatError { .. })
    }
}
