//! fcr: FileCryptor command-line interface
//!
//! Commands:
//!   encrypt <input>   - write <input>_encrypted.bin and its 76-byte key file
//!   decrypt <input>   - recover the plaintext from a cipher file and key file
//!   config show       - display the effective configuration
//!
//! Both artifacts plus the password are required to decrypt. Losing the key
//! file loses the data.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use fcr_core::config::FcrConfig;
use fcr_core::output::{self, ArtifactWriter};
use fcr_core::paths::{self, DecryptPaths, EncryptPaths};
use fcr_core::FcrError;
use fcr_crypto::Password;

// ── CLI structure ──────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(
    name = "fcr",
    version,
    about = "Encrypt and decrypt files with a password",
    long_about = "fcr: password-based envelope encryption. A random data key encrypts the file \
                  (AES-256-GCM); a PBKDF2-derived key wraps the data key into a separate key file."
)]
struct Cli {
    /// Path to fcr.toml configuration file
    #[arg(long, short = 'c', env = "FCR_CONFIG")]
    config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error); overrides the config file
    #[arg(long, env = "FCR_LOG")]
    log: Option<String>,

    /// Log format; overrides the config file
    #[arg(long, env = "FCR_LOG_FORMAT")]
    log_format: Option<LogFormat>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Encrypt a file, producing a cipher file and a key file
    Encrypt {
        /// File to encrypt
        input: PathBuf,
        /// Password (prompted if omitted)
        #[arg(long, short = 'p', env = "FCR_PASSWORD", hide_env_values = true)]
        password: Option<String>,
        /// Cipher file path (default: <input>_encrypted.bin)
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,
        /// Key file path (default: <output>_key.bin)
        #[arg(long, short = 'k')]
        key: Option<PathBuf>,
        /// Overwrite existing files
        #[arg(long, short = 'f')]
        force: bool,
    },

    /// Decrypt a cipher file using its key file
    Decrypt {
        /// Cipher file to decrypt
        input: PathBuf,
        /// Password (prompted if omitted)
        #[arg(long, short = 'p', env = "FCR_PASSWORD", hide_env_values = true)]
        password: Option<String>,
        /// Key file path (default: <input>_key.bin)
        #[arg(long, short = 'k')]
        key: Option<PathBuf>,
        /// Output path (default: <input>_decrypted)
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,
        /// Overwrite existing files
        #[arg(long, short = 'f')]
        force: bool,
    },

    /// Configuration management
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigAction {
    /// Print the active configuration (merged defaults + config file)
    Show,
}

#[derive(Clone, Debug, ValueEnum)]
enum LogFormat {
    Json,
    Text,
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    let cli = Cli::parse();

    let (config, source) = load_config(cli.config.as_deref())?;

    let level = cli.log.clone().unwrap_or_else(|| config.log.level.clone());
    let format = cli.log_format.clone().unwrap_or(match config.log.format.as_str() {
        "json" => LogFormat::Json,
        _ => LogFormat::Text,
    });
    init_logging(&level, &format);
    log_config_source(&source);

    match cli.command {
        Commands::Encrypt {
            input,
            password,
            output,
            key,
            force,
        } => {
            let password = resolve_password(password)?;
            let paths = cmd_encrypt(
                &config,
                &input,
                &password,
                output.as_deref(),
                key.as_deref(),
                force,
            )?;
            println!("Encrypted");
            println!("  output:   {}", paths.cipher_file.display());
            println!("  key file: {}", paths.key_file.display());
            Ok(())
        }
        Commands::Decrypt {
            input,
            password,
            key,
            output,
            force,
        } => {
            let password = resolve_password(password)?;
            let paths = cmd_decrypt(
                &config,
                &input,
                &password,
                key.as_deref(),
                output.as_deref(),
                force,
            )?;
            println!("Decrypted");
            println!("  output: {}", paths.output.display());
            Ok(())
        }
        Commands::Config {
            action: ConfigAction::Show,
        } => cmd_config_show(&config, &source),
    }
}

/// Where the active configuration came from.
#[derive(Debug, Clone, PartialEq, Eq)]
enum ConfigSource {
    Defaults,
    File(PathBuf),
    Missing(PathBuf),
}

/// Load the config before logging exists; the outcome is reported later by
/// [`log_config_source`].
fn load_config(path: Option<&Path>) -> Result<(FcrConfig, ConfigSource)> {
    let Some(path) = path else {
        return Ok((FcrConfig::default(), ConfigSource::Defaults));
    };
    let loaded = FcrConfig::try_load(path)
        .with_context(|| format!("loading config: {}", path.display()))?;
    Ok(match loaded {
        Some(config) => (config, ConfigSource::File(path.to_path_buf())),
        None => (FcrConfig::default(), ConfigSource::Missing(path.to_path_buf())),
    })
}

fn log_config_source(source: &ConfigSource) {
    match source {
        ConfigSource::Defaults => debug!("no config file given, using defaults"),
        ConfigSource::File(path) => debug!("loaded config from {}", path.display()),
        ConfigSource::Missing(path) => {
            warn!("config file not found: {}  (using defaults)", path.display())
        }
    }
}

fn init_logging(level: &str, format: &LogFormat) {
    use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    match format {
        LogFormat::Json => {
            tracing_subscriber::registry()
                .with(filter)
                .with(fmt::layer().json().with_writer(std::io::stderr))
                .init();
        }
        LogFormat::Text => {
            tracing_subscriber::registry()
                .with(filter)
                .with(fmt::layer().with_writer(std::io::stderr))
                .init();
        }
    }
}

/// Take the password from the flag/env, or prompt without echo.
fn resolve_password(flag: Option<String>) -> Result<Password> {
    let password = match flag {
        Some(p) => p,
        None => rpassword::prompt_password("Password: ").context("reading password")?,
    };
    if password.is_empty() {
        anyhow::bail!("password must not be empty");
    }
    Ok(Password::from(password.into_bytes()))
}

// ── encrypt ───────────────────────────────────────────────────────────────────

fn cmd_encrypt(
    config: &FcrConfig,
    input: &Path,
    password: &Password,
    output: Option<&Path>,
    key: Option<&Path>,
    force: bool,
) -> Result<EncryptPaths> {
    if !input.is_file() {
        return Err(FcrError::NotFound(input.to_path_buf()).into());
    }

    let paths = paths::encrypt_paths(input, output, key, &config.paths);
    if paths.cipher_file == paths.key_file {
        anyhow::bail!(
            "cipher file and key file would both be written to {}",
            paths.cipher_file.display()
        );
    }
    output::ensure_writable(&paths.cipher_file, force)?;
    output::ensure_writable(&paths.key_file, force)?;

    let plaintext = output::read_input(input)
        .with_context(|| format!("reading {}", input.display()))?;

    info!(input = %input.display(), bytes = plaintext.len(), "encrypting");
    let artifacts = fcr_crypto::encrypt(&plaintext, password).context("encryption failed")?;

    let mut writer = ArtifactWriter::new(force, config.output.file_mode);
    writer
        .stage(&paths.key_file, &artifacts.key_file)
        .with_context(|| format!("writing {}", paths.key_file.display()))?;
    writer
        .stage(&paths.cipher_file, &artifacts.cipher_file)
        .with_context(|| format!("writing {}", paths.cipher_file.display()))?;
    writer.commit()?;

    Ok(paths)
}

// ── decrypt ───────────────────────────────────────────────────────────────────

fn cmd_decrypt(
    config: &FcrConfig,
    input: &Path,
    password: &Password,
    key: Option<&Path>,
    output: Option<&Path>,
    force: bool,
) -> Result<DecryptPaths> {
    if !input.is_file() {
        return Err(FcrError::NotFound(input.to_path_buf()).into());
    }

    let paths = paths::decrypt_paths(input, key, output, &config.paths);
    if key.is_none() && !paths.key_file.is_file() {
        anyhow::bail!(
            "key file not found at {}; pass it with --key",
            paths.key_file.display()
        );
    }
    output::ensure_writable(&paths.output, force)?;

    let cipher_file = output::read_input(input)
        .with_context(|| format!("reading {}", input.display()))?;
    let key_file = output::read_input(&paths.key_file)
        .with_context(|| format!("reading key file {}", paths.key_file.display()))?;

    info!(input = %input.display(), key = %paths.key_file.display(), "decrypting");
    let plaintext =
        fcr_crypto::decrypt(&cipher_file, &key_file, password).context("decryption failed")?;

    let mut writer = ArtifactWriter::new(force, config.output.file_mode);
    writer
        .stage(&paths.output, &plaintext)
        .with_context(|| format!("writing {}", paths.output.display()))?;
    writer.commit()?;

    Ok(paths)
}

// ── config ────────────────────────────────────────────────────────────────────

fn cmd_config_show(config: &FcrConfig, source: &ConfigSource) -> Result<()> {
    match source {
        ConfigSource::Defaults => println!("# config: (defaults)"),
        ConfigSource::File(p) => println!("# config: {}", p.display()),
        ConfigSource::Missing(p) => {
            println!("# config: {} (not found, using defaults)", p.display())
        }
    }
    let rendered = toml::to_string_pretty(config).context("serializing config")?;
    print!("{rendered}");
    Ok(())
}
