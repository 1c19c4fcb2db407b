use std::io::Read;
use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use plagscan::config::Config;
use plagscan::corpus::StaticCorpus;
use plagscan::extract::{DocumentExtractor, FileExtractor, extract_documents};
use plagscan::{ScanMethod, ScanOptions, ScanResult, Scanner};

const MIN_INPUT_CHARS: usize = 20;
const DEFAULT_CONFIG_PATH: &str = "plagscan.json";

/// Estimate how much of a text overlaps with known sources
#[derive(Parser)]
#[command(name = "plagscan", version, about)]
#[command(propagate_version = true)]
struct Cli {
    /// Verbosity level (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Scan a text for overlapping sources
    Scan(ScanArgs),
    /// List corpus collections and their record counts
    Collections {
        #[arg(long, default_value = DEFAULT_CONFIG_PATH)]
        config: String,
    },
    /// Write a configuration template
    InitConfig {
        #[arg(default_value = DEFAULT_CONFIG_PATH)]
        path: String,
    },
}

#[derive(Args)]
struct ScanArgs {
    /// Text to scan; read from stdin when neither this nor --file is given
    text: Option<String>,

    /// Read the text to scan from a file (txt, md, pdf, docx, html)
    #[arg(short, long, conflicts_with = "text")]
    file: Option<PathBuf>,

    /// Where to look for sources: web or corpus
    #[arg(short, long, default_value = "web")]
    method: ScanMethod,

    /// Corpus collection for --method corpus
    #[arg(short, long)]
    collection: Option<String>,

    /// Documents to compare against; paths or glob patterns, repeatable
    #[arg(short, long = "document")]
    documents: Vec<String>,

    #[arg(long, default_value = DEFAULT_CONFIG_PATH)]
    config: String,

    /// Print the result as JSON
    #[arg(long)]
    json: bool,
}

#[derive(Serialize)]
struct Report<'a> {
    method: ScanMethod,
    scanned_at: DateTime<Utc>,
    #[serde(flatten)]
    result: &'a ScanResult,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        1 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };
    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Scan(args) => run_scan(args).await,
        Commands::Collections { config } => list_collections(&config),
        Commands::InitConfig { path } => {
            Config::default().save(&path)?;
            info!("Wrote configuration template to {path}");
            Ok(())
        }
    }
}

async fn run_scan(args: ScanArgs) -> Result<()> {
    let config = Config::load(&args.config)?;
    config.validate().context("invalid configuration")?;

    let text = read_input(&args).await?;
    anyhow::ensure!(
        text.trim().chars().count() >= MIN_INPUT_CHARS,
        "text must be at least {MIN_INPUT_CHARS} characters long"
    );

    let paths = expand_document_patterns(&args.documents);
    let (uploaded_documents, extraction_warnings) =
        tokio::task::spawn_blocking(move || extract_documents(&FileExtractor, &paths))
            .await
            .context("document extraction task failed")?;

    let options = ScanOptions {
        collection: args.collection,
        uploaded_documents,
        search_credentials: config.search.credentials(),
    };

    let scanner = Scanner::from_config(config)?;
    let mut result = scanner.scan(&text, args.method, options).await?;
    result.warnings.splice(0..0, extraction_warnings);

    if args.json {
        let report = Report {
            method: args.method,
            scanned_at: Utc::now(),
            result: &result,
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&result);
    }
    Ok(())
}

async fn read_input(args: &ScanArgs) -> Result<String> {
    if let Some(text) = &args.text {
        return Ok(text.clone());
    }

    if let Some(path) = args.file.clone() {
        let display = path.display().to_string();
        return tokio::task::spawn_blocking(move || FileExtractor.extract_text(&path))
            .await?
            .with_context(|| format!("failed to read {display}"));
    }

    let mut buf = String::new();
    std::io::stdin()
        .read_to_string(&mut buf)
        .context("failed to read text from stdin")?;
    Ok(buf)
}

/// Expands glob patterns; a pattern matching nothing is kept as a literal
/// path so the extractor reports it.
fn expand_document_patterns(patterns: &[String]) -> Vec<PathBuf> {
    let mut paths = Vec::new();
    for pattern in patterns {
        match glob::glob(pattern) {
            Ok(entries) => {
                let before = paths.len();
                paths.extend(entries.filter_map(|e| e.ok()).filter(|p| p.is_file()));
                if paths.len() == before {
                    paths.push(PathBuf::from(pattern));
                }
            }
            Err(e) => {
                warn!("Invalid document pattern {pattern:?}: {e}");
                paths.push(PathBuf::from(pattern));
            }
        }
    }
    paths
}

fn print_report(result: &ScanResult) {
    println!("Overall similarity: {}%", result.overall_percentage);

    if result.matches.is_empty() {
        println!("No matching sources found.");
    } else {
        println!();
        for (i, m) in result.matches.iter().enumerate() {
            println!("{}. [{:>3}%] {}", i + 1, m.similarity, m.title);
            println!("   {}", m.source_url);
            if let Some(snippet) = &m.snippet {
                println!("   {snippet}");
            }
        }
    }

    if !result.warnings.is_empty() {
        println!();
        for w in &result.warnings {
            println!("warning: {w}");
        }
    }
}

fn list_collections(config_path: &str) -> Result<()> {
    let config = Config::load(config_path)?;
    let corpus = StaticCorpus::from_config(&config.corpus)?;
    for (name, count) in corpus.summary() {
        let marker = if name == corpus.default_collection() {
            " (default)"
        } else {
            ""
        };
        println!("{name}: {count} records{marker}");
    }
    Ok(())
}
