//! OI Advisor CLI
//!
//! Polls an option chain, prints key indicators, the history trend and a
//! strategy suggestion after every poll.

use std::path::PathBuf;
use std::thread;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use clap::Parser;

use oi_advisor::prelude::*;

#[derive(Parser, Debug)]
#[command(name = "oi_advisor")]
#[command(about = "Option-chain max pain / PCR tracker with a rule-based strategy suggestion")]
#[command(version)]
struct Cli {
    /// Path to a JSON config file
    #[arg(short, long, env = "OI_ADVISOR_CONFIG")]
    config: Option<PathBuf>,

    /// Index or stock symbol (e.g. NIFTY, BANKNIFTY, RELIANCE)
    #[arg(short, long)]
    symbol: Option<String>,

    /// Expiry to analyze (DD-Mon-YYYY); defaults to the nearest
    #[arg(short, long)]
    expiry: Option<String>,

    /// Number of polls, 0 to run until interrupted
    #[arg(short = 'n', long, default_value_t = 1)]
    polls: u64,

    /// Seconds between polls (overrides config)
    #[arg(short, long)]
    interval: Option<u64>,

    /// Read snapshots from <DIR>/<SYMBOL>.json instead of NSE
    #[arg(long, value_name = "DIR")]
    snapshot_dir: Option<PathBuf>,

    /// Save every fetched snapshot to <DIR>/<SYMBOL>.json
    #[arg(long, value_name = "DIR")]
    save_dir: Option<PathBuf>,

    /// Print available expiries and exit
    #[arg(long)]
    list_expiries: bool,

    /// Bypass the fetch cache on every poll
    #[arg(long)]
    refresh: bool,

    /// Log format (pretty, json, compact)
    #[arg(long)]
    log_format: Option<LogFormat>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => AppConfig::from_file(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => AppConfig::default(),
    };
    if let Some(symbol) = &cli.symbol {
        config.symbol = symbol.to_uppercase();
    }
    if let Some(interval) = cli.interval {
        config.poll_interval_secs = interval;
    }
    if let Some(format) = cli.log_format {
        config.log_format = format;
    }
    config.validate()?;

    init_logging(config.log_format)?;

    if !config.symbols.contains(&config.symbol) {
        tracing::warn!(
            "{} is not in the configured symbol list {:?}",
            config.symbol,
            config.symbols
        );
    }

    let provider: Box<dyn ChainProvider> = match &cli.snapshot_dir {
        Some(dir) => Box::new(FileProvider::new(dir)),
        None => Box::new(NseClient::new(&config.nse)?),
    };
    let provider = CachedProvider::new(provider, SystemClock, config.cache.clone());
    let mut session = Session::with_config(provider, SystemClock, config.advisor.clone());
    let archive = cli.save_dir.as_ref().map(FileProvider::new);

    let symbol = config.symbol.clone();
    let requested = cli.expiry.as_deref().map(ExpiryDate::new);

    if cli.list_expiries {
        let expiries = session.expiries(&symbol)?;
        println!("Expiries for {}:", symbol);
        for expiry in &expiries {
            println!("  {}", expiry);
        }
        return Ok(());
    }

    let mut poll = 0u64;
    loop {
        poll += 1;
        if cli.refresh {
            session.provider_mut().invalidate_symbol(&symbol);
        }

        match run_poll(&mut session, archive.as_ref(), &symbol, requested.as_ref()) {
            Ok(outcome) => {
                let dashboard =
                    Dashboard::new(&outcome, session.history()).with_rows(config.table_rows);
                println!("{}", dashboard);
            }
            Err(e) => eprintln!("Error fetching data: {:#}", e),
        }

        if cli.polls != 0 && poll >= cli.polls {
            break;
        }
        thread::sleep(Duration::from_secs(config.poll_interval_secs));
    }

    Ok(())
}

/// Fetch once, list expiries, pick one and record the poll
fn run_poll<P: ChainProvider, C: Clock>(
    session: &mut Session<P, C>,
    archive: Option<&FileProvider>,
    symbol: &str,
    requested: Option<&ExpiryDate>,
) -> Result<PollOutcome> {
    let raw = session.fetch(symbol)?;
    if let Some(archive) = archive {
        archive.save(symbol, &raw)?;
    }

    let expiries = session.analyzer().expiries(&raw)?;
    let expiry = match requested {
        Some(expiry) if expiries.contains(expiry) => expiry.clone(),
        Some(expiry) => bail!(
            "expiry {} not available; choose one of: {}",
            expiry,
            expiries
                .iter()
                .map(|e| e.as_str())
                .collect::<Vec<_>>()
                .join(", ")
        ),
        None => match expiries.iter().next() {
            Some(first) => first.clone(),
            None => bail!("snapshot for {} has no expiries", symbol),
        },
    };

    Ok(session.process(symbol, &raw, &expiry)?)
}
