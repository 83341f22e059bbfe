//! Trade quotes, market cap, fee resolution and curve summary

use std::path::Path;

use anyhow::{Context, Result};
use colored::Colorize;
use curve_model::{
    buy_price_impact, curve_summary, fee_market_cap, graduation_progress, quote_price_impact,
    sell_price_impact, with_slippage_down, with_slippage_up, BuyQuote, CurvePhase, FeeSource,
    SellQuote,
};

use crate::config::CliConfig;
use crate::display::{field, format_address, format_bps, format_sol, format_sol_wide, format_tokens};
use crate::snapshot::{self, Market, MarketSnapshot};

async fn load_market(path: &Path) -> Result<Market> {
    let snapshot: MarketSnapshot = snapshot::load(path).await?;
    let market = snapshot.to_market()?;
    log::info!(
        "market loaded: new_curve={} mint_supply={}",
        market.is_new_curve,
        market.quoter.mint_supply
    );
    Ok(market)
}

fn print_market_header(title: &str, market: &Market) {
    println!("{}", format!("=== {} ===", title).bright_green().bold());
    if market.is_new_curve {
        println!("{}", "Curve not created yet; quoting the first trade".dimmed());
    }
    field("Creator", format_address(&market.reserves.creator));
}

fn print_buy(quote: &BuyQuote) -> Result<()> {
    let total_bps = quote.fees.total_bps().context("fee total failed")?;
    field("Tokens out", format_tokens(quote.token_amount));
    field("SOL into curve", format_sol(quote.sol_amount));
    field("Fees", format!("{} @ {}", format_sol(quote.fee), format_bps(total_bps)));
    field("Total cost", format_sol(quote.total_cost).bright_white().bold());
    Ok(())
}

fn print_sell(quote: &SellQuote) -> Result<()> {
    let total_bps = quote.fees.total_bps().context("fee total failed")?;
    field("Tokens in", format_tokens(quote.token_amount));
    field("Gross SOL", format_sol(quote.gross_sol));
    field("Fees", format!("{} @ {}", format_sol(quote.fee), format_bps(total_bps)));
    field("Net SOL", format_sol(quote.net_sol).bright_white().bold());
    Ok(())
}

/// Buy an exact token amount; prints `max_sol_cost` to embed
pub async fn buy_exact_tokens(config: &CliConfig, market_path: &Path, tokens: u64) -> Result<()> {
    let market = load_market(market_path).await?;
    print_market_header("Buy Quote (exact tokens)", &market);

    let quote = market
        .quoter
        .quote_buy_exact_tokens(&market.reserves, tokens, u64::MAX)
        .context("buy quote failed")?;
    print_buy(&quote)?;

    let max_sol_cost = with_slippage_up(quote.total_cost, config.slippage_bps)
        .context("slippage bound failed")?;
    println!();
    field(
        &format!("max_sol_cost (+{})", format_bps(config.slippage_bps)),
        format_sol(max_sol_cost).bright_yellow(),
    );

    let impact = quote_price_impact(&market.reserves, &quote).context("price impact failed")?;
    field("Price impact", format_bps(impact.impact_bps));
    Ok(())
}

/// Spend an exact SOL budget; prints `min_tokens_out` to embed
pub async fn buy_exact_sol(config: &CliConfig, market_path: &Path, lamports: u64) -> Result<()> {
    let market = load_market(market_path).await?;
    print_market_header("Buy Quote (exact SOL)", &market);

    let quote = market
        .quoter
        .quote_buy_exact_sol(&market.reserves, lamports, 0)
        .context("buy quote failed")?;
    field("Budget", format_sol(lamports));
    print_buy(&quote)?;

    let min_tokens_out = with_slippage_down(quote.token_amount, config.slippage_bps)
        .context("slippage bound failed")?;
    println!();
    field(
        &format!("min_tokens_out (-{})", format_bps(config.slippage_bps)),
        format_tokens(min_tokens_out).bright_yellow(),
    );

    let impact = buy_price_impact(&market.quoter, &market.reserves, lamports)
        .context("price impact failed")?;
    field("Price impact", format_bps(impact.impact_bps));
    Ok(())
}

/// SOL budget that buys at least `tokens` through the exact-SOL path
pub async fn budget_for_tokens(market_path: &Path, tokens: u64) -> Result<()> {
    let market = load_market(market_path).await?;
    print_market_header("SOL Budget", &market);

    let budget = market
        .quoter
        .sol_budget_for_tokens(&market.reserves, tokens)
        .context("budget failed")?;
    field("Tokens wanted", format_tokens(tokens));
    field("Budget", format_sol(budget).bright_white().bold());
    Ok(())
}

/// Sell an exact token amount; prints `min_sol_output` to embed
pub async fn sell_exact_tokens(config: &CliConfig, market_path: &Path, tokens: u64) -> Result<()> {
    let market = load_market(market_path).await?;
    print_market_header("Sell Quote", &market);

    let quote = market
        .quoter
        .quote_sell_exact_tokens(&market.reserves, tokens, 0)
        .context("sell quote failed")?;
    print_sell(&quote)?;

    let min_sol_output = with_slippage_down(quote.net_sol, config.slippage_bps)
        .context("slippage bound failed")?;
    println!();
    field(
        &format!("min_sol_output (-{})", format_bps(config.slippage_bps)),
        format_sol(min_sol_output).bright_yellow(),
    );

    let impact = sell_price_impact(&market.quoter, &market.reserves, tokens)
        .context("price impact failed")?;
    field("Price impact", format_bps(impact.impact_bps));
    Ok(())
}

pub async fn show_market_cap(market_path: &Path) -> Result<()> {
    let market = load_market(market_path).await?;
    print_market_header("Market Cap", &market);

    let mc = market
        .reserves
        .market_cap(market.quoter.mint_supply)
        .context("market cap failed")?;
    field("Mint supply", format_tokens(market.quoter.mint_supply));
    field("Market cap", format_sol_wide(mc).bright_white().bold());
    Ok(())
}

/// Which fee tier applies right now, and why
pub async fn show_fees(market_path: &Path) -> Result<()> {
    let market = load_market(market_path).await?;
    print_market_header("Fees", &market);

    let mc = fee_market_cap(&market.reserves, market.quoter.mint_supply)
        .context("fee market cap failed")?;
    field("Fee market cap", format_sol_wide(mc));
    if market.reserves.mayhem_mode {
        println!("{}", "Mayhem mode: market cap uses the live mint supply".yellow());
    }

    match &market.quoter.fee_source {
        FeeSource::UseFlatDefault => field("Source", "global flat fees"),
        FeeSource::Tiered(schedule) => {
            field("Source", format!("fee config, {} tier(s)", schedule.tiers().len()));
            for tier in schedule.tiers() {
                let marker = if tier.market_cap_threshold <= mc { "*" } else { " " };
                println!(
                    "  {} {:>24}  protocol {}  creator {}",
                    marker,
                    format_sol_wide(tier.market_cap_threshold),
                    format_bps(tier.fees.protocol_bps),
                    format_bps(tier.fees.creator_bps)
                );
            }
        }
    }

    let fees = market
        .quoter
        .trade_fees(&market.reserves)
        .context("fee resolution failed")?;
    field("Protocol fee", format_bps(fees.protocol_bps));
    field("Creator fee", format_bps(fees.creator_bps));
    let total_bps = fees.total_bps().context("fee total failed")?;
    field("Total", format_bps(total_bps).bright_white().bold());
    Ok(())
}

pub async fn show_summary(market_path: &Path) -> Result<()> {
    let market = load_market(market_path).await?;
    print_market_header("Curve Summary", &market);

    if market.reserves.phase() == CurvePhase::Complete {
        let progress = graduation_progress(&market.quoter.global, &market.reserves);
        field("Status", "graduated".bright_magenta());
        field("SOL accumulated", format_sol(progress.sol_accumulated));
        return Ok(());
    }

    let summary = curve_summary(&market.quoter, &market.reserves)
        .context("summary failed")?;
    field("Status", "active".bright_green());
    field("Market cap", format_sol_wide(summary.market_cap));
    field("Progress", format_bps(summary.progress_bps));
    field("Buy 1 token", format_sol(summary.buy_price_per_token));
    field("Sell 1 token", format_sol(summary.sell_price_per_token));
    field("Real SOL", format_sol(summary.real_sol));
    field("Real tokens", format_tokens(summary.real_token));
    field("Virtual SOL", format_sol(summary.virtual_sol));
    field("Virtual tokens", format_tokens(summary.virtual_token));
    Ok(())
}
