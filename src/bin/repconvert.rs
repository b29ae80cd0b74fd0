//! CLI binary for repconvert.
//!
//! A thin shim over the library crate: it builds an invocation from flags or
//! an event file, runs it once, and prints the caller-facing message. This is
//! also how the handler is wired into a function runtime that hands the
//! event over on stdin.

use anyhow::{bail, Context, Result};
use clap::Parser;
use repconvert::config::{
    ENV_API_BASE_URL, ENV_CLIENT_ID, ENV_CLIENT_SECRET, ENV_TOKEN_URL, ENV_UPLOAD_BASE_URL,
};
use repconvert::{ConversionPipeline, ConverterConfig, InvocationRequest, InvocationResult};
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

const AFTER_HELP: &str = r#"EXAMPLES:
  # Convert file 111 to PDF
  repconvert --code "$AUTH_CODE" --file-id 111 --conversion-type pdf

  # Run an event as delivered by the gateway
  echo '{"code":"abc","fileId":"111","conversionType":"extracted_text"}' | repconvert --event -

  # Callback-shaped JSON output
  repconvert --event event.json --json

CONVERSION TYPES:
  pdf             → <name>.pdf
  extracted_text  → <name>.txt

ENVIRONMENT VARIABLES:
  BOX_CLIENT_ID        OAuth client id (required)
  BOX_CLIENT_SECRET    OAuth client secret (required)
  BOX_API_BASE_URL     Override https://api.box.com/2.0
  BOX_UPLOAD_BASE_URL  Override https://upload.box.com/api/2.0
  BOX_TOKEN_URL        Override https://api.box.com/oauth2/token
  RUST_LOG             tracing filter, e.g. repconvert=debug
"#;

/// Save a file's PDF or extracted-text representation as a new file.
#[derive(Parser, Debug)]
#[command(
    name = "repconvert",
    version,
    about = "Save a file's PDF or extracted-text representation as a new file next to it",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Event JSON file ({code, fileId, conversionType}); `-` reads stdin.
    #[arg(long, conflicts_with_all = ["code", "file_id", "conversion_type"])]
    event: Option<PathBuf>,

    /// OAuth authorization code.
    #[arg(long, requires_all = ["file_id", "conversion_type"])]
    code: Option<String>,

    /// Id of the file to convert.
    #[arg(long)]
    file_id: Option<String>,

    /// Representation to fetch: pdf or extracted_text.
    #[arg(long)]
    conversion_type: Option<String>,

    /// OAuth client id.
    #[arg(long, env = ENV_CLIENT_ID, hide_env_values = true)]
    client_id: String,

    /// OAuth client secret.
    #[arg(long, env = ENV_CLIENT_SECRET, hide_env_values = true)]
    client_secret: String,

    /// Metadata API base URL.
    #[arg(long, env = ENV_API_BASE_URL)]
    api_base_url: Option<String>,

    /// Upload API base URL.
    #[arg(long, env = ENV_UPLOAD_BASE_URL)]
    upload_base_url: Option<String>,

    /// OAuth token endpoint.
    #[arg(long, env = ENV_TOKEN_URL)]
    token_url: Option<String>,

    /// Per-request timeout in seconds (none by default).
    #[arg(long, env = "REPCONVERT_TIMEOUT")]
    timeout: Option<u64>,

    /// Print `{"error": …, "result": …}` instead of the bare message.
    #[arg(long)]
    json: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "REPCONVERT_VERBOSE")]
    verbose: bool,

    /// Suppress all logs except errors.
    #[arg(short, long, env = "REPCONVERT_QUIET")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet {
        "error"
    } else {
        "info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    // ── Build pipeline ───────────────────────────────────────────────────
    let config = build_config(&cli)?;
    let pipeline = ConversionPipeline::new(config).context("Failed to set up pipeline")?;

    // ── Run ──────────────────────────────────────────────────────────────
    let outcome = match cli.event {
        Some(ref path) => pipeline.handle_event(read_event(path)?).await,
        None => pipeline.convert(&request_from_flags(&cli)?).await,
    };

    print_outcome(&outcome, cli.json)?;
    if !outcome.is_success() {
        std::process::exit(1);
    }
    Ok(())
}

/// Map CLI args to `ConverterConfig`.
fn build_config(cli: &Cli) -> Result<ConverterConfig> {
    let mut builder = ConverterConfig::builder()
        .client_id(&cli.client_id)
        .client_secret(&cli.client_secret);

    if let Some(ref url) = cli.api_base_url {
        builder = builder.api_base_url(url);
    }
    if let Some(ref url) = cli.upload_base_url {
        builder = builder.upload_base_url(url);
    }
    if let Some(ref url) = cli.token_url {
        builder = builder.token_url(url);
    }
    if let Some(secs) = cli.timeout {
        builder = builder.request_timeout_secs(secs);
    }

    builder.build().context("Invalid configuration")
}

fn request_from_flags(cli: &Cli) -> Result<InvocationRequest> {
    match (&cli.code, &cli.file_id, &cli.conversion_type) {
        (Some(code), Some(file_id), Some(conversion_type)) => {
            Ok(InvocationRequest::new(code, file_id, conversion_type))
        }
        _ => bail!("Provide either --event or all of --code, --file-id and --conversion-type"),
    }
}

fn read_event(path: &Path) -> Result<serde_json::Value> {
    let raw = if path.as_os_str() == "-" {
        let mut buf = String::new();
        io::stdin()
            .read_to_string(&mut buf)
            .context("Failed to read event from stdin")?;
        buf
    } else {
        std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read event from {:?}", path))?
    };
    serde_json::from_str(&raw).context("Event is not valid JSON")
}

fn print_outcome(outcome: &InvocationResult, json: bool) -> Result<()> {
    if json {
        let body = serde_json::to_string_pretty(outcome).context("Failed to serialise result")?;
        println!("{body}");
    } else if outcome.is_success() {
        println!("{}", outcome.message());
    } else {
        eprintln!("{}", outcome.message());
    }
    Ok(())
}
