//! carrybot CLI
//!
//! Simulates a funding-rate carry on a synthetic BTC price walk, sizes a
//! hedge by ATR risk budget, and lets you step through entering, accruing
//! and exiting the carry against a virtual cash balance.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use carrybot::dashboard::Dashboard;
use carrybot::session::Session;
use carrybot::trading::SessionConfig;

/// Funding carry + ATR risk paper trader CLI.
#[derive(Parser)]
#[command(name = "carrybot")]
#[command(about = "Paper-trade a BTC funding carry with ATR position sizing", long_about = None)]
struct Cli {
    /// JSON config file (missing fields use defaults)
    #[arg(short, long, global = true, env = "CARRYBOT_CONFIG")]
    config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, global = true, default_value = "warn")]
    log_level: String,

    #[command(flatten)]
    overrides: Overrides,

    #[command(subcommand)]
    command: Commands,
}

/// Per-parameter overrides applied on top of the config file.
#[derive(Args, Default)]
struct Overrides {
    /// Random seed for the price walk
    #[arg(long, global = true)]
    seed: Option<u64>,

    /// Number of generated prices
    #[arg(long, global = true)]
    points: Option<usize>,

    /// Account equity in USD
    #[arg(long, global = true)]
    equity: Option<Decimal>,

    /// Risk per trade as a fraction of equity
    #[arg(long, global = true)]
    risk_pct: Option<f64>,

    /// Maximum gross leverage
    #[arg(long, global = true)]
    max_leverage: Option<f64>,

    /// ATR window
    #[arg(long, global = true)]
    atr_period: Option<usize>,

    /// Stop distance in ATR multiples
    #[arg(long, global = true)]
    atr_multiple: Option<f64>,

    /// Maker fee fraction
    #[arg(long, global = true)]
    maker_fee: Option<Decimal>,

    /// Taker fee fraction
    #[arg(long, global = true)]
    taker_fee: Option<Decimal>,

    /// Slippage in basis points
    #[arg(long, global = true)]
    slippage_bps: Option<Decimal>,

    /// Annualized funding rate
    #[arg(long, global = true)]
    funding_annual: Option<Decimal>,

    /// Daily borrow rate
    #[arg(long, global = true)]
    borrow_daily: Option<Decimal>,

    /// Minimum net daily return to enter
    #[arg(long, global = true)]
    min_net_daily: Option<Decimal>,
}

impl Overrides {
    fn apply(&self, config: &mut SessionConfig) {
        if let Some(v) = self.seed {
            config.data.seed = v;
        }
        if let Some(v) = self.points {
            config.data.points = v;
        }
        if let Some(v) = self.equity {
            config.risk.equity = v;
        }
        if let Some(v) = self.risk_pct {
            config.risk.risk_pct = v;
        }
        if let Some(v) = self.max_leverage {
            config.risk.max_leverage = v;
        }
        if let Some(v) = self.atr_period {
            config.risk.atr_period = v;
        }
        if let Some(v) = self.atr_multiple {
            config.risk.atr_multiple = v;
        }
        if let Some(v) = self.maker_fee {
            config.costs.maker_fee = v;
        }
        if let Some(v) = self.taker_fee {
            config.costs.taker_fee = v;
        }
        if let Some(v) = self.slippage_bps {
            config.costs.slippage_bps = v;
        }
        if let Some(v) = self.funding_annual {
            config.costs.funding_annual = v;
        }
        if let Some(v) = self.borrow_daily {
            config.costs.borrow_daily = v;
        }
        if let Some(v) = self.min_net_daily {
            config.costs.min_net_daily = v;
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Show price, ATR, position size, loss lock and carry quote
    Dashboard {
        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Show the tail of the price and ATR series
    Series {
        /// Number of most recent points to print
        #[arg(short, long, default_value = "10")]
        tail: usize,

        /// Print the full series as JSON
        #[arg(long)]
        json: bool,
    },

    /// Size a hedge from the latest price and ATR
    Size,

    /// Show the carry quote and whether it clears the threshold
    Quote,

    /// Start an interactive paper carry session on stdin
    Paper,

    /// Show the effective configuration
    Config,
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    // Setup logging; RUST_LOG wins over --log-level
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(cli.log_level.to_lowercase()));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let mut config = match &cli.config {
        Some(path) => {
            info!(path = %path.display(), "Loading config");
            SessionConfig::load(path)?
        }
        None => SessionConfig::default(),
    };
    cli.overrides.apply(&mut config);
    config.validate()?;
    debug!(config = ?config, "Effective configuration");

    match cli.command {
        Commands::Dashboard { json } => {
            let dashboard = Dashboard::build(&config)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&dashboard)?);
            } else {
                println!("{}", dashboard);
            }
        }

        Commands::Series { tail, json } => {
            let dashboard = Dashboard::build(&config)?;
            let prices = dashboard.prices.values();
            let atr = dashboard.atr_series.values();

            if json {
                let body = serde_json::json!({
                    "prices": dashboard.prices,
                    "atr": dashboard.atr_series,
                    "summary": dashboard.prices.summary(),
                });
                println!("{}", serde_json::to_string_pretty(&body)?);
                return Ok(());
            }

            println!("\n=== Price Walk (seed {}) ===", config.data.seed);
            println!("{}", dashboard.prices.summary());

            println!("\n{:>6} {:>14} {:>12}", "STEP", "PRICE", format!("ATR({})", config.risk.atr_period));
            println!("{}", "-".repeat(34));
            let start = prices.len().saturating_sub(tail);
            for i in start..prices.len() {
                println!("{:>6} {:>14.2} {:>12.2}", i, prices[i], atr[i]);
            }
        }

        Commands::Size => {
            let dashboard = Dashboard::build(&config)?;
            let sizing = dashboard.sizing;

            println!("\n=== ATR Position Size ===");
            println!("Price:            {:.2}", dashboard.price);
            println!("ATR({}):          {:.2}", config.risk.atr_period, dashboard.atr);
            println!("Equity:           ${:.2}", config.risk.equity);
            println!("Risk Budget:      ${:.2} ({:.2}%)", sizing.risk_usd, config.risk.risk_pct * 100.0);
            println!("Stop Distance:    ${:.2} ({}x ATR)", sizing.stop_usd, config.risk.atr_multiple);
            println!("Size (BTC):       {:.4}", sizing.size);
            println!("Position Value:   ${:.2}", sizing.notional_usd);
            println!(
                "Binding Limit:    {}",
                if sizing.leverage_capped {
                    format!("leverage ({}x)", config.risk.max_leverage)
                } else {
                    "risk budget".to_string()
                }
            );
        }

        Commands::Quote => {
            let quote = config.costs.costs().quote();
            println!("\n=== Funding Carry (1:1 Hedge) ===");
            println!("{}", quote);
        }

        Commands::Paper => {
            let mut session = Session::new(&config)?;

            println!("\n=== Paper Carry Mode ===");
            println!("Cash: ${:.2}", config.risk.equity);
            println!("Default notional: ${:.2}", config.risk.default_notional()?);
            println!("\nThis is SIMULATED trading - no real money involved.\n");

            let stdin = std::io::stdin();
            session.run(stdin.lock(), std::io::stdout())?;

            println!("{}", session.stats());
        }

        Commands::Config => {
            let d = &config.data;
            let r = &config.risk;
            let c = &config.costs;

            println!("\n=== Data ===\n");
            println!("  Seed:                 {}", d.seed);
            println!("  Points:               {}", d.points);
            println!("  Start Price:          {:.2}", d.start_price);
            println!("  Step Volatility:      {:.2}", d.step_volatility);

            println!("\n=== Risk ===\n");
            println!("  Equity:               ${}", r.equity);
            println!("  Risk per Trade:       {:.2}%", r.risk_pct * 100.0);
            println!("  Max Gross Leverage:   {:.1}x", r.max_leverage);
            println!("  ATR Period:           {}", r.atr_period);
            println!("  Stop Multiple (ATR):  {}", r.atr_multiple);
            println!("  Daily Loss Lock:      {}%", r.daily_loss_lock_pct * dec!(100));

            println!("\n=== Costs & Carry ===\n");
            println!("  Maker Fee:            {}%", c.maker_fee * dec!(100));
            println!("  Taker Fee:            {}%", c.taker_fee * dec!(100));
            println!("  Slippage:             {} bps", c.slippage_bps);
            println!("  Funding Annualized:   {}%", c.funding_annual * dec!(100));
            println!("  Borrow Daily:         {}%", c.borrow_daily * dec!(100));
            println!("  Min Net Daily:        {}%", c.min_net_daily * dec!(100));
        }
    }

    Ok(())
}
