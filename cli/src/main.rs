//! curvekit - offline quoting tool for bonding-curve token launches
//!
//! Reads JSON snapshots of the on-chain accounts, runs the curve model and
//! prints quotes together with the slippage bounds to embed in instructions.

use clap::{Parser, Subcommand};
use colored::Colorize;
use std::path::PathBuf;

mod config;
mod display;
mod incentives;
mod pda;
mod quote;
mod sharing;
mod snapshot;

use config::CliConfig;

#[derive(Parser)]
#[command(name = "curvekit")]
#[command(about = "Bonding-curve quoting, fee and incentive calculator", long_about = None)]
#[command(version)]
struct Cli {
    /// Path to config file (default: ~/.config/curvekit/config.toml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Slippage tolerance in basis points (overrides config)
    #[arg(short, long)]
    slippage_bps: Option<u64>,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Quote trades against a market snapshot
    Quote {
        #[command(subcommand)]
        command: QuoteCommands,
    },

    /// Market cap of a curve
    MarketCap {
        /// Market snapshot (JSON)
        market: PathBuf,
    },

    /// Resolve the fee tier that applies to the next trade
    Fees {
        /// Market snapshot (JSON)
        market: PathBuf,
    },

    /// Price, progress and reserves overview
    Summary {
        /// Market snapshot (JSON)
        market: PathBuf,
    },

    /// Plan a creator fee distribution
    Distribute {
        /// Sharing config snapshot (JSON)
        sharing: PathBuf,

        /// Creator vault balance (lamports)
        amount: u64,

        /// Minimum distributable amount (lamports)
        #[arg(long, default_value = "0")]
        minimum: u64,
    },

    /// Check a shareholder update against a sharing config
    UpdateShares {
        /// Sharing config snapshot (JSON)
        sharing: PathBuf,

        /// Signing admin address
        #[arg(long)]
        signer: String,

        /// New shareholders as ADDRESS:BPS
        #[arg(required = true)]
        shares: Vec<String>,
    },

    /// Unclaimed incentive tokens and cashback for a user
    Incentives {
        /// Volume accumulator snapshot (JSON)
        volume: PathBuf,

        /// Unix timestamp to evaluate at (default: now)
        #[arg(long)]
        now: Option<i64>,
    },

    /// Derive program addresses
    Pda {
        /// Token mint
        #[arg(long)]
        mint: Option<String>,

        /// Curve creator
        #[arg(long)]
        creator: Option<String>,

        /// Trader
        #[arg(long)]
        user: Option<String>,
    },
}

#[derive(Subcommand)]
enum QuoteCommands {
    /// Buy an exact amount of tokens
    Buy {
        /// Market snapshot (JSON)
        market: PathBuf,

        /// Tokens to buy (raw units, 6 decimals)
        tokens: u64,
    },

    /// Spend an exact amount of SOL, fees included
    BuyExactSol {
        /// Market snapshot (JSON)
        market: PathBuf,

        /// SOL to spend (lamports)
        lamports: u64,
    },

    /// Sell an exact amount of tokens
    Sell {
        /// Market snapshot (JSON)
        market: PathBuf,

        /// Tokens to sell (raw units, 6 decimals)
        tokens: u64,
    },

    /// SOL budget needed to buy a token amount via the exact-SOL path
    Budget {
        /// Market snapshot (JSON)
        market: PathBuf,

        /// Tokens wanted (raw units, 6 decimals)
        tokens: u64,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();

    let cli = Cli::parse();

    let config = CliConfig::new(cli.config.clone(), cli.slippage_bps)?;

    if cli.verbose {
        match &config.config_path {
            Some(path) => println!("{} {}", "Config:".bright_cyan(), path.display()),
            None => println!("{} {}", "Config:".bright_cyan(), "built-in defaults".dimmed()),
        }
        println!("{} {}", "Slippage:".bright_cyan(), display::format_bps(config.slippage_bps));
        println!("{} {}", "Bonding curve program:".bright_cyan(), config.bonding_curve_program_id);
        println!("{} {}", "AMM program:".bright_cyan(), config.amm_program_id);
        println!("{} {}", "Fee program:".bright_cyan(), config.fee_program_id);
        println!();
    }

    match cli.command {
        Commands::Quote { command } => match command {
            QuoteCommands::Buy { market, tokens } => {
                quote::buy_exact_tokens(&config, &market, tokens).await?;
            }
            QuoteCommands::BuyExactSol { market, lamports } => {
                quote::buy_exact_sol(&config, &market, lamports).await?;
            }
            QuoteCommands::Sell { market, tokens } => {
                quote::sell_exact_tokens(&config, &market, tokens).await?;
            }
            QuoteCommands::Budget { market, tokens } => {
                quote::budget_for_tokens(&market, tokens).await?;
            }
        },
        Commands::MarketCap { market } => {
            quote::show_market_cap(&market).await?;
        }
        Commands::Fees { market } => {
            quote::show_fees(&market).await?;
        }
        Commands::Summary { market } => {
            quote::show_summary(&market).await?;
        }
        Commands::Distribute { sharing, amount, minimum } => {
            sharing::show_distribution(&sharing, amount, minimum).await?;
        }
        Commands::UpdateShares { sharing, signer, shares } => {
            sharing::check_update(&sharing, &signer, &shares).await?;
        }
        Commands::Incentives { volume, now } => {
            let now = now.unwrap_or_else(|| chrono::Utc::now().timestamp());
            incentives::show_incentives(&volume, now).await?;
        }
        Commands::Pda { mint, creator, user } => {
            pda::show_pdas(&config, mint.as_deref(), creator.as_deref(), user.as_deref())?;
        }
    }

    Ok(())
}
