//! Stock Scout CLI: scan, universe and credential commands.
//!
//! Commands:
//! - `scan`: rank a universe by predicted return and print the table
//! - `universe`: list the canonical symbols a universe resolves to
//! - `hash-password`: print the Argon2id hash to put in `[auth]`

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

use scout_core::data::{UniverseId, UniverseSpec};
use scout_core::domain::{Horizon, SignClass};
use scout_core::strategy::StrategyKind;
use scout_runner::export::default_csv_name;
use scout_runner::{
    hash_password, write_csv, write_json, ScanOutcome, ScanParams, Scout, ScoutConfig,
};

/// Password source for `scan --user` when `--password` is omitted.
const PASSWORD_ENV: &str = "SCOUT_PASSWORD";

#[derive(Parser)]
#[command(
    name = "scout",
    about = "Stock Scout — NSE stock scanner with projected returns"
)]
struct Cli {
    /// Path to a TOML config file.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Rank a universe by predicted return.
    Scan {
        #[command(flatten)]
        universe: UniverseArgs,

        /// Horizon: 7d, 15d, 1mo, 3mo, 6mo, 12mo, 3y, 5y.
        #[arg(long, default_value = "7d")]
        horizon: String,

        /// Investment amount in rupees. Defaults to the configured amount.
        #[arg(long)]
        invest: Option<f64>,

        /// Return strategy: mock, momentum, sma.
        #[arg(long, default_value = "mock")]
        strategy: String,

        /// Write the table as CSV. Pass a directory to use the default file name.
        #[arg(long)]
        csv: Option<PathBuf>,

        /// Write the table as JSON.
        #[arg(long)]
        json: Option<PathBuf>,

        /// Username, when the config requires a login.
        #[arg(long)]
        user: Option<String>,

        /// Password. Read from SCOUT_PASSWORD when omitted.
        #[arg(long)]
        password: Option<String>,
    },
    /// List the symbols a universe resolves to.
    Universe {
        #[command(flatten)]
        universe: UniverseArgs,
    },
    /// Print the Argon2id hash of a password for `[auth] password_hash`.
    HashPassword {
        password: String,
    },
}

#[derive(clap::Args)]
struct UniverseArgs {
    /// Universe: nifty100, penny, both.
    #[arg(long, default_value = "nifty100", conflicts_with = "symbols")]
    universe: String,

    /// Comma-separated custom tickers (e.g. "TCS, INFY, M&M").
    #[arg(long)]
    symbols: Option<String>,

    /// Only keep stocks priced below the penny threshold.
    #[arg(long, default_value_t = false)]
    penny: bool,
}

impl UniverseArgs {
    fn to_spec(&self) -> Result<UniverseSpec> {
        let id = match &self.symbols {
            Some(list) => UniverseId::Custom(list.clone()),
            None => self.universe.parse::<UniverseId>()?,
        };
        Ok(UniverseSpec::new(id, self.penny))
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Scan {
            universe,
            horizon,
            invest,
            strategy,
            csv,
            json,
            user,
            password,
        } => {
            let config = load_config(cli.config.as_deref())?;
            let params = ScanParams {
                universe: universe.to_spec()?,
                horizon: horizon.parse::<Horizon>()?,
                investment: invest.unwrap_or(config.scan.default_investment),
                strategy: strategy.parse::<StrategyKind>()?,
            };
            if !(params.investment.is_finite() && params.investment > 0.0) {
                bail!("--invest must be a positive amount");
            }
            run_scan(config, params, user, password, csv, json)
        }
        Commands::Universe { universe } => {
            let config = load_config(cli.config.as_deref())?;
            run_universe(config, &universe.to_spec()?)
        }
        Commands::HashPassword { password } => {
            println!("{}", hash_password(&password)?);
            Ok(())
        }
    }
}

fn load_config(path: Option<&Path>) -> Result<ScoutConfig> {
    match path {
        Some(path) => {
            let config = ScoutConfig::from_file(path)
                .with_context(|| format!("failed to load config {}", path.display()))?;
            tracing::debug!(path = %path.display(), "loaded config");
            Ok(config)
        }
        None => Ok(ScoutConfig::default()),
    }
}

fn run_scan(
    config: ScoutConfig,
    params: ScanParams,
    user: Option<String>,
    password: Option<String>,
    csv: Option<PathBuf>,
    json: Option<PathBuf>,
) -> Result<()> {
    let scout = Scout::from_config(config)?;
    let mut session = scout.open_session(params);

    if scout.credentials().requires_login() {
        let Some(user) = user else {
            bail!("this configuration requires --user");
        };
        let password = match password {
            Some(p) => p,
            None => std::env::var(PASSWORD_ENV)
                .with_context(|| format!("no --password given and {PASSWORD_ENV} is not set"))?,
        };
        session.login(scout.credentials(), &user, &password)?;
    }

    let outcome = scout.scan(&session)?;
    print_outcome(&outcome);

    if let Some(path) = csv {
        let path = if path.is_dir() {
            path.join(default_csv_name(outcome.params.horizon.label()))
        } else {
            path
        };
        write_csv(&outcome.table, &path)?;
        println!("CSV saved to: {}", path.display());
    }
    if let Some(path) = json {
        write_json(&outcome.table, &path)?;
        println!("JSON saved to: {}", path.display());
    }

    Ok(())
}

fn run_universe(config: ScoutConfig, spec: &UniverseSpec) -> Result<()> {
    let scout = Scout::from_config(config)?;
    let symbols = scout.resolve_universe(&spec.id);
    println!("{} ({} symbols)", spec.id, symbols.len());
    for sym in &symbols {
        println!("  {sym}");
    }
    Ok(())
}

fn money(value: Option<f64>) -> String {
    value.map(|v| format!("{v:.2}")).unwrap_or_else(|| "-".to_string())
}

fn print_outcome(outcome: &ScanOutcome) {
    let params = &outcome.params;
    println!(
        "Stock Scout — {} | {} | ₹{:.2} | {}",
        params.universe.id,
        params.horizon.long_label(),
        params.investment,
        params.strategy
    );
    println!(
        "Scanned {} symbols at {}, {} without price data",
        outcome.universe_size,
        outcome.scanned_at.format("%Y-%m-%d %H:%M:%S"),
        outcome.missing.len()
    );

    if let Some(warning) = outcome.table.empty_warning() {
        println!();
        println!("{warning}");
        return;
    }

    let sma = outcome.table.has_suggestions;
    println!();
    print!(
        "{:>4}  {:<14} {:<16} {:>12} {:>10} {:>16} {:>6}",
        "#", "Stock", "Ticker", "Price (₹)", "Return %", "Projected (₹)", "Conf %"
    );
    if sma {
        print!(" {:>12} {:<10}", "SMA20 (₹)", "Suggestion");
    }
    println!();

    for ranked in &outcome.table.rows {
        let r = &ranked.row;
        let marker = match ranked.sign {
            SignClass::Negative => '▼',
            SignClass::NonNegative => '▲',
        };
        print!(
            "{:>4}  {:<14} {:<16} {:>12} {:>9.2}{} {:>16} {:>6}",
            ranked.rank,
            r.name,
            r.symbol.as_str(),
            money(r.latest_price),
            r.return_pct,
            marker,
            money(r.projected_value),
            r.confidence
        );
        if sma {
            let suggestion = r.suggestion.map(|s| s.to_string()).unwrap_or_default();
            print!(" {:>12} {:<10}", money(r.sma20), suggestion);
        }
        println!();
    }
}
