use std::path::PathBuf;
use clap::{Parser, ValueEnum};
use eyre::{WrapErr, eyre};
use tracing::{info, warn, error};

use xueqiu_fetcher::api::{RankingCategory, XueqiuClient};
use xueqiu_fetcher::config;
use xueqiu_fetcher::logging;
use xueqiu_fetcher::output;
use xueqiu_fetcher::render;
use xueqiu_fetcher::session::Session;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum DataType {
    /// Current holdings of a portfolio
    Holdings,
    /// Rebalancing history of a portfolio
    History,
    /// Portfolio return leaderboard
    Ranking,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Json,
    Table,
}

/// Fetch portfolio data from xueqiu.com using cookies exported from a browser.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Args {
    /// Cookie export file (defaults to XUEQIU_COOKIE_FILE or xueqiu_cookie.txt)
    #[arg(long)]
    cookie_file: Option<PathBuf>,

    /// Portfolio code such as ZH123456 (required for holdings and history)
    #[arg(long)]
    portfolio: Option<String>,

    /// What to fetch
    #[arg(long = "type", value_enum, default_value_t = DataType::Holdings)]
    data_type: DataType,

    /// Leaderboard category: daily, weekly, monthly, annual or total. Only annual is reliably served.
    #[arg(long, default_value = "annual")]
    ranking_category: RankingCategory,

    /// Number of history records or leaderboard entries
    #[arg(long, default_value_t = 20)]
    count: u32,

    /// Write JSON output to this file instead of stdout
    #[arg(long, short = 'o')]
    output: Option<PathBuf>,

    #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
    format: OutputFormat,
}

fn main() -> eyre::Result<()> {
    let args = Args::parse();

    // Initialize logging
    if let Err(e) = logging::init_logging(env!("CARGO_BIN_NAME").to_string()) {
        eprintln!("Failed to initialize logging: {}", e);
        return Err(e);
    }

    let cfg = config::Config::load()?;
    let cookie_file = args.cookie_file.clone().unwrap_or_else(|| cfg.cookie_file.clone());
    info!(base_url = %cfg.base_url, cookie_file = %cookie_file.display(), "Configuration loaded");

    let mut session = Session::new(&cfg).wrap_err("Failed to build HTTP session")?;
    if let Err(e) = session.load_from_file(&cookie_file) {
        error!(error = %e, "Authentication failed");
        error!("Check that the cookie file exists and contains xueqiu.com cookies");
        return Err(e.into());
    }
    let client = XueqiuClient::new(session);
    info!(
        base_url = %client.session().base_url(),
        cookies = client.session().cookies().len(),
        "Session ready"
    );

    if args.format == OutputFormat::Table && args.output.is_some() {
        warn!("--output is only used with --format json, printing the table to stdout");
    }

    match args.data_type {
        DataType::Holdings => {
            let portfolio = require_portfolio(&args)?;
            let snapshot = client
                .fetch_holdings(portfolio)
                .wrap_err_with(|| format!("Failed to fetch holdings of {}", portfolio))?;
            info!(holdings = snapshot.holding_count, "Holdings fetched");
            match args.format {
                OutputFormat::Json => output::write_json(&snapshot, args.output.as_deref())?,
                OutputFormat::Table => print!("{}", render::holdings_table(&snapshot)?),
            }
        }
        DataType::History => {
            let portfolio = require_portfolio(&args)?;
            let records = client
                .fetch_rebalancing_history(portfolio, args.count)
                .wrap_err_with(|| format!("Failed to fetch rebalancing history of {}", portfolio))?;
            info!(records = records.len(), "Rebalancing history fetched");
            match args.format {
                OutputFormat::Json => output::write_json(&records, args.output.as_deref())?,
                OutputFormat::Table => print!("{}", render::history_table(&records)?),
            }
        }
        DataType::Ranking => {
            let category = args.ranking_category;
            if category != RankingCategory::Annual {
                warn!(%category, "Only the annual leaderboard is known to be available upstream");
            }
            let entries = client
                .fetch_ranking(category.code(), args.count)
                .wrap_err_with(|| format!("Failed to fetch {} leaderboard", category))?;
            info!(entries = entries.len(), "Leaderboard fetched");
            match args.format {
                OutputFormat::Json => output::write_json(&entries, args.output.as_deref())?,
                OutputFormat::Table => print!("{}", render::ranking_table(category, &entries)?),
            }
        }
    }

    Ok(())
}

fn require_portfolio(args: &Args) -> eyre::Result<&str> {
    args.portfolio
        .as_deref()
        .ok_or_else(|| eyre!("--portfolio is required for holdings and history"))
}
