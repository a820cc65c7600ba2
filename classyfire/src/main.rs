//! ClassyFire command-line client
//!
//! `classyfire <INPUT>` where INPUT is an InChIKey, a SMILES string, or a
//! delimited file of identifiers. Results are printed as JSON (or one summary
//! line per result with `--short`).

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::Parser;
use classyfire::models::is_valid_inchikey;
use classyfire::output::{short_summary, write_json};
use classyfire::services::tabular::{delimiter_for_path, read_delimited};
use classyfire::services::{ClassifiedRow, ColumnSelection, LogProgress};
use classyfire::{ClassyFire, ClientConfig, ConfigOverrides, Identifier};
use classyfire_common::config::{load_default_toml_config, ENV_CACHE_DIR, ENV_URL};
use futures::{pin_mut, StreamExt};
use tracing::{debug, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Command-line arguments for classyfire
#[derive(Parser, Debug)]
#[command(name = "classyfire")]
#[command(about = "Chemical taxonomy lookups against the ClassyFire web service")]
#[command(version)]
struct Args {
    /// InChIKey, SMILES string, or path to a CSV/TSV/SSV file
    input: String,

    /// Output file (stdout when omitted; `.gz` compresses)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Per-request timeout in seconds
    #[arg(long)]
    timeout: Option<u64>,

    /// Minimum seconds between requests
    #[arg(long)]
    sleep: Option<u64>,

    /// Seconds to wait before retrying empty classifications
    #[arg(long)]
    retry_delay: Option<u64>,

    /// ClassyFire service URL
    #[arg(long, env = ENV_URL)]
    url: Option<String>,

    /// Cache directory
    #[arg(long, env = ENV_CACHE_DIR)]
    cache_dir: Option<PathBuf>,

    /// Empty classification policy: raise, retry-last, accept
    #[arg(long)]
    on_empty: Option<String>,

    /// Request failure policy: abort, skip
    #[arg(long)]
    on_error: Option<String>,

    /// Input file has no header row
    #[arg(long)]
    no_header: bool,

    /// Field separator (default from extension, else comma)
    #[arg(short, long)]
    separator: Option<char>,

    /// Column holding InChIKeys (repeatable)
    #[arg(long = "inchikey-column")]
    inchikey_columns: Vec<String>,

    /// Column holding SMILES (repeatable)
    #[arg(long = "smiles-column")]
    smiles_columns: Vec<String>,

    /// One summary line per result on stdout instead of JSON
    #[arg(long, conflicts_with = "output")]
    short: bool,

    /// Debug logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let args = Args::parse();
    let toml_config = load_default_toml_config();

    let default_filter = if args.verbose {
        "classyfire=debug,classyfire_common=debug".to_string()
    } else {
        format!(
            "classyfire={0},classyfire_common={0}",
            toml_config.logging.level
        )
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let overrides = ConfigOverrides {
        base_url: args.url.clone(),
        timeout_secs: args.timeout,
        sleep_secs: args.sleep,
        retry_delay_secs: args.retry_delay,
        on_empty: args.on_empty.clone(),
        on_error: args.on_error.clone(),
        cache_dir: args.cache_dir.clone(),
    };
    let config = ClientConfig::resolve(&overrides, &toml_config)?;

    let client = ClassyFire::new(config)
        .await
        .context("Failed to initialize ClassyFire client")?;

    let input = args.input.trim();
    let path = Path::new(input);

    if is_valid_inchikey(input) {
        let identifier = Identifier::inchikey(input)?;
        classify_one(&client, &identifier, &args).await
    } else if path.is_file() {
        let client = client.with_progress(Arc::new(LogProgress));
        classify_file(&client, path, &args).await
    } else {
        debug!(input, "Input is neither an InChIKey nor a file, treating as SMILES");
        let identifier = Identifier::smiles(input)?;
        classify_one(&client, &identifier, &args).await
    }
}

async fn classify_one(client: &ClassyFire, identifier: &Identifier, args: &Args) -> Result<()> {
    let classification = client
        .classify(identifier)
        .await
        .with_context(|| format!("Failed to classify {}", identifier))?;

    if args.short {
        println!("{}", short_summary(identifier.as_str(), &classification));
        return Ok(());
    }

    write_json(&classification, args.output.as_deref()).context("Failed to write output")
}

async fn classify_file(client: &ClassyFire, path: &Path, args: &Args) -> Result<()> {
    let delimiter = match args.separator {
        Some(c) if c.is_ascii() => c as u8,
        Some(c) => bail!("Separator must be a single ASCII character, got '{}'", c),
        None => delimiter_for_path(path).unwrap_or(b','),
    };

    let rows = read_delimited(path, delimiter, !args.no_header)?;
    let selection =
        ColumnSelection::designated(args.inchikey_columns.clone(), args.smiles_columns.clone());
    info!(path = %path.display(), rows = rows.len(), "Classifying file");

    let results = client.classify_rows(rows.clone(), selection);
    pin_mut!(results);

    let mut classified: Vec<ClassifiedRow> = Vec::with_capacity(rows.len());
    let mut source_rows = rows.iter();
    while let Some(row) = results.next().await {
        let row = row.with_context(|| format!("Failed to classify {}", path.display()))?;

        if args.short {
            if let Some(source) = source_rows.next() {
                for (column, classification) in &row {
                    let label = source.get(column).map(String::as_str).unwrap_or(column.as_str());
                    println!("{}", short_summary(label, classification));
                }
            }
        }
        classified.push(row);
    }

    if args.short {
        return Ok(());
    }

    write_json(&classified, args.output.as_deref()).context("Failed to write output")
}
