//! Default artifact paths.
//!
//! Every derived path is `<input without final extension><suffix>`:
//!
//! ```text
//! encrypt  report.pdf            -> report_encrypted.bin
//!                                   report_encrypted_key.bin
//! decrypt  report_encrypted.bin  -> report_encrypted_decrypted
//!          (key file looked up at report_encrypted_key.bin)
//! ```
//!
//! Explicit paths from the command line always win over these.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use crate::config::PathsConfig;

/// Strip the final extension from the last component of `path` and append `suffix`.
pub fn with_suffix(path: &Path, suffix: &str) -> PathBuf {
    let mut name: OsString = path.with_extension("").into_os_string();
    name.push(suffix);
    PathBuf::from(name)
}

/// Artifact locations for an encrypt run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncryptPaths {
    pub cipher_file: PathBuf,
    pub key_file: PathBuf,
}

/// Artifact locations for a decrypt run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecryptPaths {
    pub key_file: PathBuf,
    pub output: PathBuf,
}

/// Resolve encrypt destinations. The key file is named after the cipher
/// file, so a custom `-o` also moves the default key file.
pub fn encrypt_paths(
    input: &Path,
    output: Option<&Path>,
    key_file: Option<&Path>,
    cfg: &PathsConfig,
) -> EncryptPaths {
    let cipher_file = output
        .map(Path::to_path_buf)
        .unwrap_or_else(|| with_suffix(input, &cfg.encrypted_suffix));
    let key_file = key_file
        .map(Path::to_path_buf)
        .unwrap_or_else(|| with_suffix(&cipher_file, &cfg.key_suffix));

    EncryptPaths {
        cipher_file,
        key_file,
    }
}

/// Resolve decrypt sources and destination.
pub fn decrypt_paths(
    input: &Path,
    key_file: Option<&Path>,
    output: Option<&Path>,
    cfg: &PathsConfig,
) -> DecryptPaths {
    DecryptPaths {
        key_file: key_file
            .map(Path::to_path_buf)
            .unwrap_or_else(|| with_suffix(input, &cfg.key_suffix)),
        output: output
            .map(Path::to_path_buf)
            .unwrap_or_else(|| with_suffix(input, &cfg.decrypted_suffix)),
    }
}
