use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{error, info, warn};

use item_recovery::config::RecoveryConfig;
use item_recovery::logging::init_tracing;
use item_recovery::models::qualified_id;
use item_recovery::recovery::{render_report, write_report, BatchRecovery, LogScanner};
use item_recovery::storage::{
    merge_into, open_cache, render_listing, render_record, render_stats, CacheIndex,
};
use item_recovery::{DefaultSynthesizer, ItemRarity, ResolutionPipeline};

#[derive(Parser)]
#[command(name = "item-recovery")]
#[command(about = "Recover item metadata through an ordered chain of fallback sources")]
struct Cli {
    /// JSON configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Re-resolve every product whose primary scrape failed in a log
    Recover {
        /// Scraper log to scan
        #[arg(long, default_value = "pasted.txt")]
        log: PathBuf,

        /// Where to write the text report (default from config)
        #[arg(long)]
        report: Option<PathBuf>,

        /// Do not write results to the cache
        #[arg(long)]
        no_cache: bool,
    },

    /// Resolve ids through the full pipeline and print them as JSON
    Resolve {
        #[arg(required = true)]
        ids: Vec<String>,
    },

    /// Print the synthesized default record for ids
    Synthesize {
        #[arg(required = true)]
        ids: Vec<String>,
    },

    /// Query the record cache (lists everything without a subcommand)
    Cache {
        #[command(subcommand)]
        action: Option<CacheCommand>,
    },
}

#[derive(Subcommand)]
enum CacheCommand {
    /// Show one cached record, or its synthesized default when absent
    Info { id: String },

    /// Find records whose name, id or description contains the terms
    Search {
        #[arg(required = true)]
        terms: Vec<String>,
    },

    /// List records of one rarity (case-insensitive)
    Rarity { rarity: String },

    /// List tradeable records
    Tradeable,

    /// Totals by source and rarity
    Stats,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose)?;

    let config = RecoveryConfig::load(cli.config.as_deref())
        .await
        .context("failed to load configuration")?;

    match cli.command {
        Command::Recover {
            log,
            report,
            no_cache,
        } => run_recover(&config, &log, report, no_cache).await,
        Command::Resolve { ids } => {
            let pipeline = ResolutionPipeline::from_config(&config).await?;
            for id in ids {
                let record = pipeline.resolve(&id).await;
                println!("{}", serde_json::to_string_pretty(&record)?);
            }
            Ok(())
        }
        Command::Synthesize { ids } => {
            let synthesizer = DefaultSynthesizer::new();
            for id in ids {
                println!("{}", serde_json::to_string_pretty(&synthesizer.synthesize(&id))?);
            }
            Ok(())
        }
        Command::Cache { action } => run_cache(&config, action).await,
    }
}

async fn run_cache(config: &RecoveryConfig, action: Option<CacheCommand>) -> Result<()> {
    let Some(cache) = open_cache(&config.cache).await? else {
        warn!("caching is disabled in the configuration");
        return Ok(());
    };
    let index = CacheIndex::load(cache.as_ref())
        .await
        .context("failed to load cache")?;

    match action {
        None => {
            if index.is_empty() {
                println!("No products in cache. Run 'item-recovery recover' first.");
            } else {
                println!("{}", render_listing(index.records()));
            }
        }
        Some(CacheCommand::Info { id }) => match index.get(&id) {
            Some(record) => println!("{}", render_record(record)),
            None => {
                warn!(id = %id, "not in cache, showing synthesized default");
                let record = DefaultSynthesizer::new().synthesize(&qualified_id(&id));
                println!("{}", render_record(&record));
            }
        },
        Some(CacheCommand::Search { terms }) => {
            let term = terms.join(" ");
            let found = index.search(&term);
            if found.is_empty() {
                println!("No products found matching '{}'", term);
            } else {
                println!("{}", render_listing(found.iter().copied()));
                println!("Found {} product(s)", found.len());
            }
        }
        Some(CacheCommand::Rarity { rarity }) => {
            let Some(rarity) = ItemRarity::parse(&rarity) else {
                let known: Vec<_> = ItemRarity::ALL.iter().map(|r| r.as_str()).collect();
                bail!("unknown rarity '{}', expected one of: {}", rarity, known.join(", "));
            };
            let found = index.by_rarity(rarity);
            if found.is_empty() {
                println!("No products found with rarity '{}'", rarity);
            } else {
                println!("{}", render_listing(found.iter().copied()));
                println!("Total: {} products", found.len());
            }
        }
        Some(CacheCommand::Tradeable) => {
            let found = index.tradeable();
            println!("{}", render_listing(found.iter().copied()));
            println!("Total: {} tradeable products", found.len());
        }
        Some(CacheCommand::Stats) => println!("{}", render_stats(&index.stats())),
    }
    Ok(())
}

async fn run_recover(
    config: &RecoveryConfig,
    log: &Path,
    report_path: Option<PathBuf>,
    no_cache: bool,
) -> Result<()> {
    info!("starting product recovery from failed scraping attempts");

    let scanner = LogScanner::new()?;
    let ids = scanner
        .scan_file(log)
        .await
        .with_context(|| format!("failed to read log file {}", log.display()))?;

    let pipeline = ResolutionPipeline::from_config(config).await?;
    let outcome = BatchRecovery::new(&pipeline)
        .with_throttle(
            config.throttle_delay(),
            Duration::from_millis(config.throttle.jitter_ms),
        )
        .recover(&ids)
        .await;

    if outcome.is_empty() {
        warn!("no products were recovered");
        return Ok(());
    }

    if !no_cache {
        // A broken cache must not cost us the report.
        match open_cache(&config.cache).await {
            Ok(Some(cache)) => match merge_into(cache.as_ref(), &outcome.records).await {
                Ok(total) => info!(total, "cache updated"),
                Err(e) => error!(error = %e, "error saving cache"),
            },
            Ok(None) => {}
            Err(e) => error!(error = %e, "error opening cache"),
        }
    }

    let report = render_report(&outcome);
    let report_path = report_path.unwrap_or_else(|| config.report_path.clone());
    write_report(&report_path, &report).await?;

    println!("{}", report);
    info!(count = outcome.len(), "recovered products using fallback methods");
    info!(path = %report_path.display(), "report saved");
    Ok(())
}
