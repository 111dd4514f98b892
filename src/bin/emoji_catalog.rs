//! Command-line front end for the emoji catalog.
//!
//! Usage:
//!   emoji-catalog update
//!   emoji-catalog lookup :apple:
//!   emoji-catalog list --names
//!
//! Every subcommand reads `emojis.json` from the working directory (or
//! `--snapshot`). Only `update` touches the network, and it rebuilds over a
//! snapshot that fails to load instead of refusing to run. Set `RUST_LOG` (for
//! example `RUST_LOG=emoji_catalog=info`) to see scrape progress.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use emoji_catalog::{CatalogStore, RebuildOutcome, ScrapeConfig, StalenessCheck};
use log::warn;
use std::io::{self, Write};
use std::path::PathBuf;
use std::time::Duration;

#[derive(Parser, Debug)]
#[command(name = "emoji-catalog")]
#[command(about = "Scrape, cache and query emoji metadata")]
struct Cli {
    /// Snapshot file (defaults to ./emojis.json or EMOJI_CATALOG_SNAPSHOT).
    #[arg(long, global = true)]
    snapshot: Option<PathBuf>,
    /// Source site root.
    #[arg(long, global = true)]
    base_url: Option<String>,
    /// Attempts per page before giving up; 0 retries forever.
    #[arg(long, global = true)]
    max_attempts: Option<u32>,
    /// Pause between attempts, in milliseconds.
    #[arg(long, global = true)]
    backoff_ms: Option<u64>,
    /// Abort the whole update after this many seconds.
    #[arg(long, global = true)]
    deadline_secs: Option<u64>,
    /// Detail pages fetched concurrently per category.
    #[arg(long, global = true, value_parser = clap::value_parser!(u64).range(1..))]
    parallelism: Option<u64>,
    /// Replace the snapshot when any record changed, not only the count.
    #[arg(long, global = true)]
    content_staleness: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Scrape the site and rewrite the snapshot if the catalog changed.
    Update,
    /// Print the first record matching a code point, name, short name or slug.
    Lookup {
        value: String,
    },
    /// Print the whole catalog.
    List {
        /// One `<glyph> <name>` line per emoji instead of JSON.
        #[arg(long)]
        names: bool,
    },
}

fn main() {
    if let Err(err) = pretty_env_logger::try_init() {
        eprintln!("logger already initialized: {err}");
    }
    match run() {
        Ok(code) => std::process::exit(code),
        Err(err) => {
            eprintln!("{err:#}");
            std::process::exit(1);
        }
    }
}

fn run() -> Result<i32> {
    let cli = Cli::parse();
    let config = apply_flags(ScrapeConfig::from_env()?, &cli);
    let mut store = config.store()?;
    let initialized = store.initialize();

    match &cli.command {
        Command::Update => {
            if let Err(err) = initialized {
                warn!(
                    target: "emoji_catalog",
                    "ignoring unreadable snapshot, rebuilding from scratch: {err:#}"
                );
            }
            update(&config, &mut store)
        }
        Command::Lookup { value } => {
            initialized?;
            lookup(&store, value)
        }
        Command::List { names } => {
            initialized?;
            list(&store, *names)
        }
    }
}

fn apply_flags(mut config: ScrapeConfig, cli: &Cli) -> ScrapeConfig {
    if let Some(path) = &cli.snapshot {
        config.snapshot_path = Some(path.clone());
    }
    if let Some(base_url) = &cli.base_url {
        config.base_url = base_url.clone();
    }
    if let Some(attempts) = cli.max_attempts {
        config.retry.max_attempts = (attempts > 0).then_some(attempts);
    }
    if let Some(ms) = cli.backoff_ms {
        config.retry.backoff = Duration::from_millis(ms);
    }
    if let Some(secs) = cli.deadline_secs {
        config.retry.deadline = Some(Duration::from_secs(secs));
    }
    if let Some(parallelism) = cli.parallelism {
        config.parallelism = usize::try_from(parallelism).unwrap_or(usize::MAX);
    }
    if cli.content_staleness {
        config.staleness = StalenessCheck::Content;
    }
    config
}

fn update(config: &ScrapeConfig, store: &mut CatalogStore) -> Result<i32> {
    let builder = config.http_builder()?;
    match store.rebuild(&builder)? {
        RebuildOutcome::Replaced { previous, current } => println!(
            "updated {}: {previous} -> {current} emojis",
            store.snapshot_path().display()
        ),
        RebuildOutcome::Unchanged { count } => {
            println!("{} unchanged ({count} emojis)", store.snapshot_path().display())
        }
    }
    Ok(0)
}

fn lookup(store: &CatalogStore, value: &str) -> Result<i32> {
    let Some(record) = store.lookup(value) else {
        eprintln!("no emoji matches '{value}'");
        return Ok(1);
    };
    let json = serde_json::to_string_pretty(record).context("serializing record")?;
    println!("{json}");
    Ok(0)
}

fn list(store: &CatalogStore, names: bool) -> Result<i32> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    if names {
        for record in store.list() {
            writeln!(out, "{} {}", record.emoji, record.name)?;
        }
    } else {
        serde_json::to_writer_pretty(&mut out, store.list()).context("serializing catalog")?;
        writeln!(out)?;
    }
    Ok(0)
}
