//! rsacrypto: RSA command-line tool
//!
//! Commands:
//!   keygen              - generate a key pair and write it text-encoded
//!   inspect <key>       - show container format, modulus size, chunk limits
//!   encrypt / decrypt   - chunked RSA over a file or stdin
//!   sign / verify       - whole-message signatures
//!   config show         - display the active configuration

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use rsa::traits::PublicKeyParts;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use rsacrypto::{
    generate_private_key, identify_private_key_der, identify_public_key_der, private_key_to_der,
    public_key_to_der, CipherOptions, Encoding, PrivateKeyFormat, PrivateKeyHandle,
    PublicKeyFormat, PublicKeyHandle, DEFAULT_KEY_BITS,
};
use rsacrypto_core::{CryptoConfig, HashAlgorithm, Scheme, TextEncoding};

// ── CLI structure ──────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(
    name = "rsacrypto",
    version,
    about = "Chunked RSA encryption and signatures",
    long_about = "rsacrypto: encrypt, decrypt, sign, and verify with RSA keys in PKIX, PKCS#1, or PKCS#8 form"
)]
struct Cli {
    /// Path to rsacrypto.toml configuration file
    #[arg(long, short = 'c', env = "RSACRYPTO_CONFIG", default_value = "rsacrypto.toml")]
    config: PathBuf,

    /// Log level filter (overrides config; RUST_LOG overrides both)
    #[arg(long, env = "RSACRYPTO_LOG")]
    log: Option<String>,

    /// Log format (overrides config)
    #[arg(long, env = "RSACRYPTO_LOG_FORMAT")]
    log_format: Option<LogFormat>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Generate a new key pair
    ///
    /// Keys are written text-encoded; without output paths both go to stdout.
    Keygen {
        /// Modulus size in bits
        #[arg(long, short = 'b', default_value_t = DEFAULT_KEY_BITS)]
        bits: usize,
        /// Private key output file
        #[arg(long)]
        private_out: Option<PathBuf>,
        /// Public key output file
        #[arg(long)]
        public_out: Option<PathBuf>,
        #[arg(long, value_enum, default_value = "pkcs8")]
        private_format: PrivateFormatArg,
        #[arg(long, value_enum, default_value = "pkix")]
        public_format: PublicFormatArg,
        /// Key text encoding (overrides config)
        #[arg(long)]
        encoding: Option<TextEncoding>,
    },

    /// Describe a key file
    Inspect {
        #[command(flatten)]
        key: KeyArgs,
        /// Treat the key file as a private key
        #[arg(long)]
        private: bool,
    },

    /// Encrypt input with a public key
    Encrypt {
        #[command(flatten)]
        key: KeyArgs,
        #[command(flatten)]
        io: IoArgs,
        #[command(flatten)]
        scheme: SchemeArgs,
        /// OAEP label
        #[arg(long)]
        label: Option<String>,
    },

    /// Decrypt text-encoded ciphertext with a private key
    Decrypt {
        #[command(flatten)]
        key: KeyArgs,
        #[command(flatten)]
        io: IoArgs,
        #[command(flatten)]
        scheme: SchemeArgs,
        /// OAEP label
        #[arg(long)]
        label: Option<String>,
    },

    /// Sign input with a private key
    Sign {
        #[command(flatten)]
        key: KeyArgs,
        #[command(flatten)]
        io: IoArgs,
        #[command(flatten)]
        scheme: SchemeArgs,
        /// PSS salt length in bytes
        #[arg(long)]
        salt_len: Option<usize>,
    },

    /// Verify a text-encoded signature over input
    Verify {
        #[command(flatten)]
        key: KeyArgs,
        #[command(flatten)]
        io: IoArgs,
        #[command(flatten)]
        scheme: SchemeArgs,
        /// Signature text
        #[arg(long, short = 's')]
        signature: String,
        /// PSS salt length in bytes
        #[arg(long)]
        salt_len: Option<usize>,
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

#[derive(Args, Debug)]
struct KeyArgs {
    /// Key file holding text-encoded DER
    #[arg(long, short = 'k')]
    key: PathBuf,
    /// Key file encoding (overrides config)
    #[arg(long)]
    key_encoding: Option<TextEncoding>,
}

#[derive(Args, Debug)]
struct IoArgs {
    /// Input file (default: stdin)
    #[arg(long, short = 'i')]
    input: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct SchemeArgs {
    /// Padding scheme (overrides config)
    #[arg(long)]
    scheme: Option<Scheme>,
    /// Hash algorithm (overrides config)
    #[arg(long)]
    hash: Option<HashAlgorithm>,
    /// Ciphertext/signature encoding (overrides config)
    #[arg(long)]
    encoding: Option<TextEncoding>,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum LogFormat {
    Json,
    Text,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum PrivateFormatArg {
    Pkcs8,
    Pkcs1,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum PublicFormatArg {
    Pkix,
    Pkcs1,
}

impl From<PrivateFormatArg> for PrivateKeyFormat {
    fn from(arg: PrivateFormatArg) -> Self {
        match arg {
            PrivateFormatArg::Pkcs8 => PrivateKeyFormat::Pkcs8,
            PrivateFormatArg::Pkcs1 => PrivateKeyFormat::Pkcs1,
        }
    }
}

impl From<PublicFormatArg> for PublicKeyFormat {
    fn from(arg: PublicFormatArg) -> Self {
        match arg {
            PublicFormatArg::Pkix => PublicKeyFormat::Pkix,
            PublicFormatArg::Pkcs1 => PublicKeyFormat::Pkcs1,
        }
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = CryptoConfig::load(&cli.config)?;

    let level = cli.log.clone().unwrap_or_else(|| config.log.level.clone());
    let format = cli.log_format.unwrap_or(match config.log.format.as_str() {
        "json" => LogFormat::Json,
        _ => LogFormat::Text,
    });
    init_logging(&level, format);

    let mut out = std::io::stdout().lock();
    run(cli.command, config, &cli.config, &mut out)
}

fn run(
    command: Commands,
    mut config: CryptoConfig,
    config_path: &Path,
    out: &mut impl Write,
) -> Result<()> {
    match command {
        Commands::Keygen {
            bits,
            private_out,
            public_out,
            private_format,
            public_format,
            encoding,
        } => {
            let encoding = encoding.unwrap_or(config.encoding.key);
            let paths = KeygenOutput {
                private: private_out.as_deref(),
                public: public_out.as_deref(),
            };
            cmd_keygen(bits, private_format.into(), public_format.into(), encoding, paths, out)
        }
        Commands::Inspect { key, private } => cmd_inspect(&config, &key, private, out),
        Commands::Encrypt { key, io, scheme, label } => {
            apply_cipher_overrides(&mut config, &scheme, label);
            cmd_encrypt(&config, &key, io.input.as_deref(), out)
        }
        Commands::Decrypt { key, io, scheme, label } => {
            apply_cipher_overrides(&mut config, &scheme, label);
            cmd_decrypt(&config, &key, io.input.as_deref(), out)
        }
        Commands::Sign { key, io, scheme, salt_len } => {
            apply_signer_overrides(&mut config, &scheme, salt_len);
            cmd_sign(&config, &key, io.input.as_deref(), out)
        }
        Commands::Verify { key, io, scheme, signature, salt_len } => {
            apply_signer_overrides(&mut config, &scheme, salt_len);
            cmd_verify(&config, &key, io.input.as_deref(), &signature, out)
        }
        Commands::Config { action: ConfigAction::Show } => {
            cmd_config_show(&config, config_path, out)
        }
    }
}

fn init_logging(level: &str, format: LogFormat) {
    use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    // logs go to stderr so stdout stays clean for ciphertext
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

fn apply_cipher_overrides(config: &mut CryptoConfig, args: &SchemeArgs, label: Option<String>) {
    if let Some(scheme) = args.scheme {
        config.cipher.scheme = scheme;
    }
    if let Some(hash) = args.hash {
        config.cipher.hash = hash;
    }
    if let Some(encoding) = args.encoding {
        config.encoding.output = encoding;
    }
    if label.is_some() {
        config.cipher.label = label;
    }
}

fn apply_signer_overrides(config: &mut CryptoConfig, args: &SchemeArgs, salt_len: Option<usize>) {
    if let Some(scheme) = args.scheme {
        config.signer.scheme = scheme;
    }
    if let Some(hash) = args.hash {
        config.signer.hash = hash;
    }
    if let Some(encoding) = args.encoding {
        config.encoding.output = encoding;
    }
    if salt_len.is_some() {
        config.signer.salt_len = salt_len;
    }
}

// ── Input helpers ─────────────────────────────────────────────────────────────

fn read_input(path: Option<&Path>) -> Result<Vec<u8>> {
    match path {
        Some(path) => {
            std::fs::read(path).with_context(|| format!("reading input: {}", path.display()))
        }
        None => {
            let mut buf = Vec::new();
            std::io::stdin()
                .read_to_end(&mut buf)
                .context("reading stdin")?;
            Ok(buf)
        }
    }
}

fn read_text_input(path: Option<&Path>) -> Result<String> {
    let bytes = read_input(path)?;
    let text = String::from_utf8(bytes).context("input is not valid UTF-8 text")?;
    Ok(text.trim().to_string())
}

fn read_key_text(key: &KeyArgs) -> Result<String> {
    let text = std::fs::read_to_string(&key.key)
        .with_context(|| format!("reading key: {}", key.key.display()))?;
    Ok(text.trim().to_string())
}

fn key_encoding(config: &CryptoConfig, key: &KeyArgs) -> TextEncoding {
    key.key_encoding.unwrap_or(config.encoding.key)
}

fn load_public(config: &CryptoConfig, key: &KeyArgs) -> Result<PublicKeyHandle> {
    let text = read_key_text(key)?;
    let handle = PublicKeyHandle::new()
        .with_encoded_key(&text, &key_encoding(config, key))
        .with_context(|| format!("parsing public key: {}", key.key.display()))?;
    Ok(handle.with_config(config)?)
}

fn load_private(config: &CryptoConfig, key: &KeyArgs) -> Result<PrivateKeyHandle> {
    let text = read_key_text(key)?;
    let handle = PrivateKeyHandle::new()
        .with_encoded_key(&text, &key_encoding(config, key))
        .with_context(|| format!("parsing private key: {}", key.key.display()))?;
    Ok(handle.with_config(config)?)
}

// ── `rsacrypto keygen` ────────────────────────────────────────────────────────

struct KeygenOutput<'a> {
    private: Option<&'a Path>,
    public: Option<&'a Path>,
}

fn cmd_keygen(
    bits: usize,
    private_format: PrivateKeyFormat,
    public_format: PublicKeyFormat,
    encoding: TextEncoding,
    paths: KeygenOutput<'_>,
    out: &mut impl Write,
) -> Result<()> {
    tracing::info!(bits, "generating key pair");
    let private = generate_private_key(bits).context("generating key")?;
    let public = private.to_public_key();

    let private_der = private_key_to_der(&private, private_format)?;
    let public_der = public_key_to_der(&public, public_format)?;
    let private_text = zeroize::Zeroizing::new(encoding.encode_to_string(&private_der));
    let public_text = encoding.encode_to_string(&public_der);

    match paths.private {
        Some(path) => {
            write_private_file(path, &private_text)?;
            writeln!(out, "private key ({private_format}, {encoding}): {}", path.display())?;
        }
        None => writeln!(out, "{}", private_text.as_str())?,
    }
    match paths.public {
        Some(path) => {
            std::fs::write(path, format!("{public_text}\n"))
                .with_context(|| format!("writing public key: {}", path.display()))?;
            writeln!(out, "public key ({public_format}, {encoding}): {}", path.display())?;
        }
        None => writeln!(out, "{public_text}")?,
    }
    Ok(())
}

fn write_private_file(path: &Path, text: &str) -> Result<()> {
    std::fs::write(path, format!("{text}\n"))
        .with_context(|| format!("writing private key: {}", path.display()))?;
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o600))
            .with_context(|| format!("restricting permissions: {}", path.display()))?;
    }
    Ok(())
}

// ── `rsacrypto inspect` ───────────────────────────────────────────────────────

fn cmd_inspect(
    config: &CryptoConfig,
    key: &KeyArgs,
    private: bool,
    out: &mut impl Write,
) -> Result<()> {
    let text = read_key_text(key)?;
    let der = zeroize::Zeroizing::new(key_encoding(config, key).decode_string(&text)?);

    let (public, kind, format) = if private {
        let (key, format) = identify_private_key_der(&der)?;
        (key.to_public_key(), "private", format.to_string())
    } else {
        let (key, format) = identify_public_key_der(&der)?;
        (key, "public", format.to_string())
    };

    let size = public.size();
    writeln!(out, "kind:      {kind}")?;
    writeln!(out, "format:    {format}")?;
    writeln!(out, "bits:      {}", public.n().bits())?;
    writeln!(out, "exponent:  {}", public.e())?;
    writeln!(out, "block:     {size} bytes")?;
    writeln!(
        out,
        "pkcs1v15:  {} bytes per chunk",
        CipherOptions::Pkcs1v15.plaintext_limit(size)?
    )?;
    let oaep = CipherOptions::oaep(config.cipher.hash);
    match oaep.plaintext_limit(size) {
        Ok(limit) => writeln!(out, "oaep/{}: {limit} bytes per chunk", config.cipher.hash)?,
        Err(_) => writeln!(out, "oaep/{}: key too small", config.cipher.hash)?,
    }
    Ok(())
}

// ── `rsacrypto encrypt` / `decrypt` ───────────────────────────────────────────

fn cmd_encrypt(
    config: &CryptoConfig,
    key: &KeyArgs,
    input: Option<&Path>,
    out: &mut impl Write,
) -> Result<()> {
    let handle = load_public(config, key)?;
    let plain = read_input(input)?;
    let cipher = handle
        .encrypt_and_encode(&plain, &config.encoding.output)
        .context("encrypting")?;
    writeln!(out, "{cipher}")?;
    Ok(())
}

fn cmd_decrypt(
    config: &CryptoConfig,
    key: &KeyArgs,
    input: Option<&Path>,
    out: &mut impl Write,
) -> Result<()> {
    let handle = load_private(config, key)?;
    let cipher = read_text_input(input)?;
    let plain = zeroize::Zeroizing::new(
        handle
            .decode_and_decrypt(&cipher, &config.encoding.output)
            .context("decrypting")?,
    );
    out.write_all(&plain)?;
    out.flush()?;
    Ok(())
}

// ── `rsacrypto sign` / `verify` ───────────────────────────────────────────────

fn cmd_sign(
    config: &CryptoConfig,
    key: &KeyArgs,
    input: Option<&Path>,
    out: &mut impl Write,
) -> Result<()> {
    let handle = load_private(config, key)?;
    let data = read_input(input)?;
    let signature = handle
        .sign_and_encode(&data, &config.encoding.output)
        .context("signing")?;
    writeln!(out, "{signature}")?;
    Ok(())
}

fn cmd_verify(
    config: &CryptoConfig,
    key: &KeyArgs,
    input: Option<&Path>,
    signature: &str,
    out: &mut impl Write,
) -> Result<()> {
    let handle = load_public(config, key)?;
    let data = read_input(input)?;
    if let Err(e) = handle.decode_and_verify(&data, signature.trim(), &config.encoding.output) {
        bail!("signature verification failed: {e}");
    }
    writeln!(out, "signature OK")?;
    Ok(())
}

// ── `rsacrypto config show` ───────────────────────────────────────────────────

fn cmd_config_show(config: &CryptoConfig, config_path: &Path, out: &mut impl Write) -> Result<()> {
    if config_path.exists() {
        writeln!(out, "# Configuration from: {}", config_path.display())?;
    } else {
        writeln!(out, "# Configuration: defaults (no file at {})", config_path.display())?;
    }
    writeln!(out)?;
    let rendered = config.to_toml().context("serializing config to TOML")?;
    write!(out, "{rendered}")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn keygen(dir: &TempDir, private_format: PrivateKeyFormat) -> (PathBuf, PathBuf) {
        let private = dir.path().join("id_rsa.b64");
        let public = dir.path().join("id_rsa.pub.b64");
        let mut out = Vec::new();
        cmd_keygen(
            1024,
            private_format,
            PublicKeyFormat::Pkix,
            TextEncoding::Base64,
            KeygenOutput {
                private: Some(&private),
                public: Some(&public),
            },
            &mut out,
        )
        .unwrap();
        (private, public)
    }

    fn key_args(path: &Path) -> KeyArgs {
        KeyArgs {
            key: path.to_path_buf(),
            key_encoding: None,
        }
    }

    fn run_to_string(f: impl FnOnce(&mut Vec<u8>) -> Result<()>) -> String {
        let mut out = Vec::new();
        f(&mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_parse_encrypt_args() {
        let cli = Cli::try_parse_from([
            "rsacrypto",
            "encrypt",
            "--key",
            "pub.b64",
            "--scheme",
            "oaep",
            "--hash",
            "sha-1",
            "--encoding",
            "hex",
        ])
        .unwrap();
        let Commands::Encrypt { key, scheme, .. } = cli.command else {
            panic!("expected encrypt");
        };
        assert_eq!(key.key, PathBuf::from("pub.b64"));
        assert_eq!(scheme.scheme, Some(Scheme::Oaep));
        assert_eq!(scheme.hash, Some(HashAlgorithm::Sha1));
        assert_eq!(scheme.encoding, Some(TextEncoding::Hex));
    }

    #[test]
    fn test_parse_rejects_unknown_hash() {
        let result = Cli::try_parse_from(["rsacrypto", "sign", "--key", "k", "--hash", "md5"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_overrides_replace_config_values() {
        let mut config = CryptoConfig::default();
        let args = SchemeArgs {
            scheme: Some(Scheme::Pss),
            hash: None,
            encoding: Some(TextEncoding::Base64Url),
        };
        apply_signer_overrides(&mut config, &args, Some(8));
        assert_eq!(config.signer.scheme, Scheme::Pss);
        assert_eq!(config.signer.hash, HashAlgorithm::Sha256);
        assert_eq!(config.signer.salt_len, Some(8));
        assert_eq!(config.encoding.output, TextEncoding::Base64Url);
        assert_eq!(config.cipher.scheme, Scheme::Pkcs1v15);
    }

    #[test]
    fn test_encrypt_decrypt_files() {
        let dir = TempDir::new().unwrap();
        let (private, public) = keygen(&dir, PrivateKeyFormat::Pkcs1);
        let mut config = CryptoConfig::default();
        config.cipher.scheme = Scheme::Oaep;

        let plain_path = dir.path().join("plain.txt");
        let message = "line one\nline two 第二行\n".repeat(20);
        std::fs::write(&plain_path, &message).unwrap();

        let cipher = run_to_string(|out| {
            cmd_encrypt(&config, &key_args(&public), Some(&plain_path), out)
        });
        let cipher_path = dir.path().join("cipher.b64");
        std::fs::write(&cipher_path, &cipher).unwrap();

        let plain = run_to_string(|out| {
            cmd_decrypt(&config, &key_args(&private), Some(&cipher_path), out)
        });
        assert_eq!(plain, message);
    }

    #[test]
    fn test_sign_verify_files() {
        let dir = TempDir::new().unwrap();
        let (private, public) = keygen(&dir, PrivateKeyFormat::Pkcs8);
        let mut config = CryptoConfig::default();
        config.encoding.output = TextEncoding::Hex;

        let data_path = dir.path().join("data.json");
        std::fs::write(&data_path, r#"{"amount": 100}"#).unwrap();

        let signature = run_to_string(|out| {
            cmd_sign(&config, &key_args(&private), Some(&data_path), out)
        });
        let verdict = run_to_string(|out| {
            cmd_verify(&config, &key_args(&public), Some(&data_path), &signature, out)
        });
        assert_eq!(verdict.trim(), "signature OK");

        std::fs::write(&data_path, r#"{"amount": 900}"#).unwrap();
        let mut out = Vec::new();
        let result =
            cmd_verify(&config, &key_args(&public), Some(&data_path), &signature, &mut out);
        assert!(result.is_err());
    }

    #[test]
    fn test_inspect_reports_format_and_limits() {
        let dir = TempDir::new().unwrap();
        let (private, public) = keygen(&dir, PrivateKeyFormat::Pkcs1);
        let config = CryptoConfig::default();

        let report = run_to_string(|out| cmd_inspect(&config, &key_args(&private), true, out));
        assert!(report.contains("format:    pkcs1"));
        assert!(report.contains("bits:      1024"));
        assert!(report.contains("pkcs1v15:  117 bytes per chunk"));
        assert!(report.contains("oaep/sha256: 62 bytes per chunk"));

        let report = run_to_string(|out| cmd_inspect(&config, &key_args(&public), false, out));
        assert!(report.contains("kind:      public"));
        assert!(report.contains("format:    pkix"));
    }

    #[test]
    fn test_inspect_wrong_kind_fails() {
        let dir = TempDir::new().unwrap();
        let (_, public) = keygen(&dir, PrivateKeyFormat::Pkcs8);
        let mut out = Vec::new();
        let err = cmd_inspect(&CryptoConfig::default(), &key_args(&public), true, &mut out)
            .unwrap_err();
        assert!(err.to_string().contains("malformed key data"));
    }

    #[cfg(unix)]
    #[test]
    fn test_private_key_file_is_owner_only() {
        use std::os::unix::fs::PermissionsExt;
        let dir = TempDir::new().unwrap();
        let (private, _) = keygen(&dir, PrivateKeyFormat::Pkcs8);
        let mode = std::fs::metadata(private).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }

    #[test]
    fn test_config_show_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("missing.toml");
        let rendered = run_to_string(|out| cmd_config_show(&CryptoConfig::default(), &path, out));
        assert!(rendered.starts_with("# Configuration: defaults"));
        assert!(rendered.contains("[cipher]"));
        assert!(rendered.contains("scheme = \"pkcs1v15\""));
    }
}
