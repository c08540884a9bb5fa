//! Hush command-line client.
//!
//! Sends and receives one-time secrets against a Hush server. All protocol
//! work happens in `hush-core`; this binary only gathers input and writes
//! output.
//!
//! ```bash
//! echo "hunter2" | hush send --ttl 600
//! hush send --file report.pdf --passphrase "open sesame"
//! hush receive 'https://hush.example/s/abc#key:hash'
//! ```

use std::fs::OpenOptions;
use std::io::{ErrorKind, IsTerminal, Read, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::{Parser, Subcommand};
use color_eyre::eyre::{bail, eyre, WrapErr};
use hush_core::{
    ClientConfig, ContentKind, Payload, Restrictions, SecretClient, Ttl, UrlFormat,
};

// ── CLI Arguments ─────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "hush", version, about = "Share one-time secrets with end-to-end encryption")]
struct Args {
    /// Secret server base URL
    #[arg(long, global = true, default_value = hush_core::config::DEFAULT_SERVER_URL, env = "HUSH_SERVER_URL")]
    server: String,

    /// Accept links without a content hash
    #[arg(long, global = true, env = "HUSH_ACCEPT_LEGACY_URLS")]
    legacy_urls: bool,

    /// Abort requests after this many seconds
    #[arg(long, global = true, env = "HUSH_TIMEOUT_SECS")]
    timeout_secs: Option<u64>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Encrypt and upload a secret, then print its link
    Send(SendArgs),
    /// Fetch, decrypt and print or save a secret
    Receive(ReceiveArgs),
}

#[derive(clap::Args, Debug)]
struct SendArgs {
    /// Secret text. Read from stdin when neither this nor --file is given.
    #[arg(conflicts_with = "file")]
    text: Option<String>,

    /// Send a file instead of text
    #[arg(short, long)]
    file: Option<PathBuf>,

    /// Seconds until the secret expires
    #[arg(long, default_value = "3600", env = "HUSH_TTL")]
    ttl: Ttl,

    /// Authentication token for servers that require one
    #[arg(long, env = "HUSH_TOKEN", hide_env_values = true)]
    token: Option<String>,

    /// Only allow retrieval from this IP address or CIDR block
    #[arg(long = "allow-ip", value_name = "CIDR")]
    allow_ips: Vec<String>,

    /// Only allow retrieval from this country (ISO 3166-1 alpha-2)
    #[arg(long = "allow-country", value_name = "CC")]
    allow_countries: Vec<String>,

    /// Only allow retrieval from this autonomous system
    #[arg(long = "allow-asn", value_name = "ASN")]
    allow_asns: Vec<u32>,

    /// Require this passphrase on retrieval. Only its hash is sent.
    #[arg(long, env = "HUSH_PASSPHRASE", hide_env_values = true)]
    passphrase: Option<String>,
}

#[derive(clap::Args, Debug)]
struct ReceiveArgs {
    /// Secret link
    url: String,

    /// Where to write file and binary secrets
    #[arg(short, long)]
    output: Option<PathBuf>,
}

// ── Entry Point ───────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    // Logs go to stderr so stdout carries only the link or the secret
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "hush=info,hush_core=info".into()),
        )
        .init();

    let args = Args::parse();

    let mut config = ClientConfig::new(&args.server).wrap_err("Invalid --server")?;
    if args.legacy_urls {
        config = config.with_url_format(UrlFormat::Legacy);
    }
    if let Some(secs) = args.timeout_secs.filter(|&s| s > 0) {
        config = config.with_timeout(Duration::from_secs(secs));
    }
    tracing::debug!(server = config.base(), format = ?config.url_format, "Client configured");
    let client = SecretClient::new(config)?;

    match args.command {
        Command::Send(send) => run_send(&client, send).await,
        Command::Receive(receive) => run_receive(&client, receive).await,
    }
}

// ── Commands ──────────────────────────────────────────────────────────────────

async fn run_send(client: &SecretClient, args: SendArgs) -> color_eyre::Result<()> {
    let payload = read_payload(&args)?;
    let restrictions = build_restrictions(&args)?;

    let url = client
        .send(
            &payload,
            args.ttl,
            args.token.as_deref(),
            Some(&restrictions),
        )
        .await
        .wrap_err("Failed to send secret")?;

    println!("{}", url);
    Ok(())
}

async fn run_receive(client: &SecretClient, args: ReceiveArgs) -> color_eyre::Result<()> {
    let payload = client
        .receive(&args.url)
        .await
        .wrap_err("Failed to receive secret")?;

    // Only a path the recipient typed may replace an existing file
    let save_as = match (args.output, payload.filename()) {
        (Some(path), _) => Some((path, Overwrite::Allow)),
        (None, Some(name)) => Some((safe_file_name(name)?, Overwrite::Refuse)),
        (None, None) => None,
    };

    match save_as {
        Some((path, overwrite)) => {
            write_secret(&path, &payload.decode_bytes()?, overwrite)?;
            eprintln!("Saved to {}", path.display());
        }
        None if payload.kind()? == ContentKind::Binary => {
            bail!("Secret is binary; pass --output to save it");
        }
        None => {
            let text = payload.decode()?;
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(text.as_bytes())?;
            if !text.ends_with('\n') {
                stdout.write_all(b"\n")?;
            }
        }
    }
    Ok(())
}

// ── Helpers ───────────────────────────────────────────────────────────────────

fn read_payload(args: &SendArgs) -> color_eyre::Result<Payload> {
    if let Some(path) = &args.file {
        let bytes = std::fs::read(path)
            .wrap_err_with(|| format!("Failed to read {}", path.display()))?;
        let payload = Payload::from_bytes(&bytes);
        return Ok(match path.file_name().and_then(|n| n.to_str()) {
            Some(name) => payload.with_filename(name),
            None => payload,
        });
    }

    if let Some(text) = &args.text {
        return Ok(Payload::from_text(text));
    }

    let mut stdin = std::io::stdin();
    if stdin.is_terminal() {
        eprintln!("Enter the secret, then press Ctrl-D:");
    }
    let mut bytes = Vec::new();
    stdin.read_to_end(&mut bytes)?;
    Ok(Payload::from_bytes(&bytes))
}

fn build_restrictions(args: &SendArgs) -> color_eyre::Result<Restrictions> {
    let mut restrictions = Restrictions::new();
    for ip in &args.allow_ips {
        restrictions = restrictions.allow_ip(ip);
    }
    for country in &args.allow_countries {
        restrictions = restrictions.allow_country(country);
    }
    for &asn in &args.allow_asns {
        restrictions = restrictions.allow_asn(asn);
    }
    if let Some(passphrase) = &args.passphrase {
        restrictions = restrictions.with_passphrase(passphrase)?;
    }
    Ok(restrictions)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Overwrite {
    Allow,
    Refuse,
}

fn write_secret(path: &Path, bytes: &[u8], overwrite: Overwrite) -> color_eyre::Result<()> {
    let mut options = OpenOptions::new();
    options.write(true);
    match overwrite {
        Overwrite::Allow => options.create(true).truncate(true),
        Overwrite::Refuse => options.create_new(true),
    };

    let mut file = match options.open(path) {
        Err(e) if e.kind() == ErrorKind::AlreadyExists => bail!(
            "{} already exists; pass --output to choose where to save the secret",
            path.display()
        ),
        other => other.wrap_err_with(|| format!("Failed to create {}", path.display()))?,
    };
    file.write_all(bytes)
        .wrap_err_with(|| format!("Failed to write {}", path.display()))
}

/// Base name of a sender-supplied file name. Directory parts are dropped so
/// a secret can never be written outside the current directory.
fn safe_file_name(name: &str) -> color_eyre::Result<PathBuf> {
    Path::new(name)
        .file_name()
        .filter(|n| !n.is_empty())
        .map(PathBuf::from)
        .ok_or_else(|| eyre!("Secret has an unusable file name: {:?}", name))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_args_parse() {
        let args = Args::try_parse_from([
            "hush",
            "--server",
            "https://hush.example",
            "send",
            "hello",
            "--ttl",
            "600",
            "--allow-country",
            "US",
            "--allow-asn",
            "13335",
        ])
        .unwrap();

        assert_eq!(args.server, "https://hush.example");
        match args.command {
            Command::Send(send) => {
                assert_eq!(send.text.as_deref(), Some("hello"));
                assert_eq!(send.ttl.as_secs(), 600);
                assert_eq!(send.allow_countries, vec!["US"]);
                assert_eq!(send.allow_asns, vec![13335]);
            }
            Command::Receive(_) => panic!("expected send"),
        }
    }

    #[test]
    fn test_invalid_ttl_rejected_by_parser() {
        assert!(Args::try_parse_from(["hush", "send", "x", "--ttl", "0"]).is_err());
        assert!(Args::try_parse_from(["hush", "send", "x", "--ttl", "1.5"]).is_err());
    }

    #[test]
    fn test_text_and_file_conflict() {
        assert!(Args::try_parse_from(["hush", "send", "x", "--file", "a.txt"]).is_err());
    }

    #[test]
    fn test_restrictions_from_args() {
        let args = Args::try_parse_from([
            "hush",
            "send",
            "x",
            "--allow-ip",
            "10.0.0.0/8",
            "--passphrase",
            "abc",
        ])
        .unwrap();

        let Command::Send(send) = args.command else {
            panic!("expected send");
        };
        let restrictions = build_restrictions(&send).unwrap();
        assert_eq!(restrictions.allowed_ips, Some(vec!["10.0.0.0/8".to_string()]));
        assert!(restrictions.allowed_countries.is_none());
        assert_eq!(restrictions.passphrase_hash.as_ref().map(String::len), Some(64));
    }

    #[test]
    fn test_safe_file_name_strips_directories() {
        assert_eq!(safe_file_name("doc.pdf").unwrap(), PathBuf::from("doc.pdf"));
        assert_eq!(
            safe_file_name("../../etc/passwd").unwrap(),
            PathBuf::from("passwd")
        );
        assert!(safe_file_name("..").is_err());
        assert!(safe_file_name("").is_err());
    }

    #[test]
    fn test_sender_named_file_never_replaces_existing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(".bashrc");
        std::fs::write(&path, b"original").unwrap();

        let err = write_secret(&path, b"from sender", Overwrite::Refuse).unwrap_err();
        assert!(err.to_string().contains("--output"));
        assert_eq!(std::fs::read(&path).unwrap(), b"original");
    }

    #[test]
    fn test_sender_named_file_created_when_absent() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.pdf");

        write_secret(&path, b"%PDF", Overwrite::Refuse).unwrap();
        assert_eq!(std::fs::read(&path).unwrap(), b"%PDF");
    }

    #[test]
    fn test_explicit_output_replaces_existing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.bin");
        std::fs::write(&path, b"a much longer original body").unwrap();

        write_secret(&path, b"new", Overwrite::Allow).unwrap();
        assert_eq!(std::fs::read(&path).unwrap(), b"new");
    }
}
