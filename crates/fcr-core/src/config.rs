use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{FcrError, FcrResult};

/// Top-level configuration (loaded from fcr.toml)
///
/// Key-derivation parameters are intentionally absent: the key-file layout has
/// no field to record them, so they cannot vary per installation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FcrConfig {
    pub paths: PathsConfig,
    pub output: OutputConfig,
    pub log: LogConfig,
}

/// Suffixes used to derive default artifact paths
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    /// Replaces the input's extension on encrypt (default: "_encrypted.bin")
    pub encrypted_suffix: String,
    /// Replaces the cipher file's extension to name its key file (default: "_key.bin")
    pub key_suffix: String,
    /// Replaces the cipher file's extension on decrypt (default: "_decrypted")
    pub decrypted_suffix: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Unix permission bits for written artifacts (default: "0600").
    /// Written as an octal string; a TOML integer such as `0o640` is also accepted.
    #[serde(with = "octal_mode")]
    pub file_mode: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// Log level (default: warn)
    pub level: String,
    /// Log format: "json" or "text"
    pub format: String,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            encrypted_suffix: "_encrypted.bin".into(),
            key_suffix: "_key.bin".into(),
            decrypted_suffix: "_decrypted".into(),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self { file_mode: 0o600 }
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "warn".into(),
            format: "text".into(),
        }
    }
}

impl FcrConfig {
    /// Load and validate `path`. Returns `None` when the file does not exist,
    /// leaving the caller to decide how to report falling back to defaults.
    pub fn try_load(path: &Path) -> FcrResult<Option<Self>> {
        if !path.exists() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)
            .map_err(|e| FcrError::Config(format!("parsing {}: {e}", path.display())))?;
        config.validate()?;
        Ok(Some(config))
    }

    pub fn validate(&self) -> FcrResult<()> {
        let suffixes = [
            ("paths.encrypted_suffix", &self.paths.encrypted_suffix),
            ("paths.key_suffix", &self.paths.key_suffix),
            ("paths.decrypted_suffix", &self.paths.decrypted_suffix),
        ];
        for (name, value) in suffixes {
            if value.is_empty() {
                return Err(FcrError::Config(format!("{name} must not be empty")));
            }
            if value.contains('/') || value.contains('\\') {
                return Err(FcrError::Config(format!(
                    "{name} must not contain a path separator: {value:?}"
                )));
            }
        }

        if self.output.file_mode > 0o777 {
            return Err(FcrError::Config(format!(
                "output.file_mode out of range: {:o}",
                self.output.file_mode
            )));
        }

        match self.log.format.as_str() {
            "json" | "text" => Ok(()),
            other => Err(FcrError::Config(format!(
                "log.format must be \"json\" or \"text\", got {other:?}"
            ))),
        }
    }
}

/// `file_mode` as an octal string ("0600"), since TOML has no octal output.
mod octal_mode {
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(mode: &u32, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&format!("{mode:04o}"))
    }

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Int(u32),
        Str(String),
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u32, D::Error> {
        match Raw::deserialize(deserializer)? {
            Raw::Int(mode) => Ok(mode),
            Raw::Str(s) => {
                let digits = s.strip_prefix("0o").unwrap_or(&s);
                u32::from_str_radix(digits, 8)
                    .map_err(|_| de::Error::custom(format!("invalid octal file mode: {s:?}")))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_config() {
        let toml_str = r#"
[paths]
encrypted_suffix = ".fcr"
key_suffix = ".fcrkey"
decrypted_suffix = ".plain"

[output]
file_mode = 0o640

[log]
level = "debug"
format = "json"
"#;
        let config: FcrConfig = toml::from_str(toml_str).unwrap();

        assert_eq!(config.paths.encrypted_suffix, ".fcr");
        assert_eq!(config.paths.key_suffix, ".fcrkey");
        assert_eq!(config.paths.decrypted_suffix, ".plain");
        assert_eq!(config.output.file_mode, 0o640);
        assert_eq!(config.log.level, "debug");
        assert_eq!(config.log.format, "json");
        config.validate().unwrap();
    }

    #[test]
    fn test_parse_defaults() {
        let config: FcrConfig = toml::from_str("").unwrap();

        assert_eq!(config.paths.encrypted_suffix, "_encrypted.bin");
        assert_eq!(config.paths.key_suffix, "_key.bin");
        assert_eq!(config.paths.decrypted_suffix, "_decrypted");
        assert_eq!(config.output.file_mode, 0o600);
        assert_eq!(config.log.level, "warn");
        assert_eq!(config.log.format, "text");
    }

    #[test]
    fn test_parse_partial_config() {
        let toml_str = r#"
[paths]
key_suffix = ".key"
"#;
        let config: FcrConfig = toml::from_str(toml_str).unwrap();

        // Overridden
        assert_eq!(config.paths.key_suffix, ".key");
        // Defaults
        assert_eq!(config.paths.encrypted_suffix, "_encrypted.bin");
        assert_eq!(config.output.file_mode, 0o600);
    }

    #[test]
    fn test_serialize_roundtrip() {
        let config = FcrConfig::default();
        let toml_str = toml::to_string(&config).unwrap();
        let parsed: FcrConfig = toml::from_str(&toml_str).unwrap();

        assert_eq!(config, parsed);
    }

    #[test]
    fn test_validate_rejects_empty_suffix() {
        let mut config = FcrConfig::default();
        config.paths.key_suffix.clear();

        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("paths.key_suffix"));
    }

    #[test]
    fn test_validate_rejects_separator_in_suffix() {
        let mut config = FcrConfig::default();
        config.paths.encrypted_suffix = "/../evil".into();

        assert!(matches!(config.validate(), Err(FcrError::Config(_))));
    }

    #[test]
    fn test_validate_rejects_unknown_log_format() {
        let mut config = FcrConfig::default();
        config.log.format = "xml".into();

        assert!(config.validate().is_err());
    }

    #[test]
    fn test_file_mode_serialized_as_octal_string() {
        let toml_str = toml::to_string(&FcrConfig::default()).unwrap();
        assert!(toml_str.contains(r#"file_mode = "0600""#), "{toml_str}");
    }

    #[test]
    fn test_file_mode_accepts_octal_string() {
        let config: FcrConfig = toml::from_str("[output]\nfile_mode = \"0640\"").unwrap();
        assert_eq!(config.output.file_mode, 0o640);

        let config: FcrConfig = toml::from_str("[output]\nfile_mode = \"0o600\"").unwrap();
        assert_eq!(config.output.file_mode, 0o600);

        assert!(toml::from_str::<FcrConfig>("[output]\nfile_mode = \"0689\"").is_err());
    }

    #[test]
    fn test_try_load_missing_file_is_none() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(FcrConfig::try_load(&dir.path().join("absent.toml")).unwrap(), None);
    }

    #[test]
    fn test_try_load_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("fcr.toml");
        std::fs::write(&path, "[log]\nlevel = \"debug\"\n").unwrap();

        let config = FcrConfig::try_load(&path).unwrap().unwrap();
        assert_eq!(config.log.level, "debug");
    }

    #[test]
    fn test_load_invalid_toml_is_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("fcr.toml");
        std::fs::write(&path, "[paths\nkey_suffix = 1").unwrap();

        assert!(matches!(FcrConfig::try_load(&path), Err(FcrError::Config(_))));
    }
}
