//! Display helpers built on the quoter: price impact, graduation, summaries

use crate::curve::{BuyQuote, Quoter};
use crate::math::{div_floor, mul_u64, to_u64};
use crate::state::{GlobalParams, ReserveState};
use crate::{CurveError, BPS_SCALE, LAMPORTS_PER_SOL, ONE_TOKEN};

/// Price movement caused by one trade
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PriceImpact {
    /// Spot price before, lamports per raw token scaled by 1e9
    pub price_before: u128,
    /// Spot price after, same scale
    pub price_after: u128,
    pub impact_bps: u64,
    /// Tokens out for a buy, net SOL out for a sell
    pub output_amount: u64,
}

/// How far a curve is from migrating
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GraduationProgress {
    /// 0..=10_000
    pub progress_bps: u64,
    pub is_graduated: bool,
    pub tokens_remaining: u64,
    pub tokens_total: u64,
    pub sol_accumulated: u64,
}

/// Per-whole-token prices
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenPrice {
    /// Total cost (fees included) of one whole token
    pub buy_price_per_token: u64,
    /// Net proceeds of selling one whole token; zero when the curve holds no SOL
    pub sell_price_per_token: u64,
    pub market_cap: u128,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CurveSummary {
    pub market_cap: u128,
    pub progress_bps: u64,
    pub is_graduated: bool,
    pub buy_price_per_token: u64,
    pub sell_price_per_token: u64,
    pub real_sol: u64,
    pub real_token: u64,
    pub virtual_sol: u64,
    pub virtual_token: u64,
}

/// `virtual_sol * 1e9 / virtual_token`, zero for an empty curve
pub fn spot_price(reserves: &ReserveState) -> u128 {
    if reserves.virtual_token == 0 {
        return 0;
    }
    mul_u64(reserves.virtual_sol, LAMPORTS_PER_SOL) / reserves.virtual_token as u128
}

fn impact_bps(delta: u128, before: u128) -> Result<u64, CurveError> {
    if before == 0 {
        return Ok(0);
    }
    let scaled = delta.checked_mul(BPS_SCALE as u128).ok_or(CurveError::Overflow)?;
    to_u64(div_floor(scaled, before)?)
}

/// Impact of spending `sol_amount` (fees included) on a buy
pub fn buy_price_impact(
    quoter: &Quoter,
    reserves: &ReserveState,
    sol_amount: u64,
) -> Result<PriceImpact, CurveError> {
    let quote = quoter.quote_buy_exact_sol(reserves, sol_amount, 0)?;
    quote_price_impact(reserves, &quote)
}

/// Impact of an already quoted buy, whichever shape produced it
pub fn quote_price_impact(reserves: &ReserveState, quote: &BuyQuote) -> Result<PriceImpact, CurveError> {
    let price_before = spot_price(reserves);
    let price_after = spot_price(&reserves.after_buy(quote)?);

    Ok(PriceImpact {
        price_before,
        price_after,
        impact_bps: impact_bps(price_after.saturating_sub(price_before), price_before)?,
        output_amount: quote.token_amount,
    })
}

/// Impact of selling `token_amount` tokens
pub fn sell_price_impact(
    quoter: &Quoter,
    reserves: &ReserveState,
    token_amount: u64,
) -> Result<PriceImpact, CurveError> {
    let price_before = spot_price(reserves);
    let quote = quoter.quote_sell_exact_tokens(reserves, token_amount, 0)?;
    let price_after = spot_price(&reserves.after_sell(&quote)?);

    Ok(PriceImpact {
        price_before,
        price_after,
        impact_bps: impact_bps(price_before.saturating_sub(price_after), price_before)?,
        output_amount: quote.net_sol,
    })
}

/// Share of the initial real token reserve already sold
pub fn graduation_progress(global: &GlobalParams, reserves: &ReserveState) -> GraduationProgress {
    let tokens_total = global.initial_real_token_reserves;

    if reserves.complete {
        return GraduationProgress {
            progress_bps: BPS_SCALE,
            is_graduated: true,
            tokens_remaining: 0,
            tokens_total,
            sol_accumulated: reserves.real_sol,
        };
    }
    if tokens_total == 0 {
        return GraduationProgress {
            progress_bps: 0,
            is_graduated: false,
            tokens_remaining: 0,
            tokens_total: 0,
            sol_accumulated: 0,
        };
    }

    let sold = tokens_total.saturating_sub(reserves.real_token);
    // sold <= tokens_total, so this fits
    let progress_bps = (mul_u64(sold, BPS_SCALE) / tokens_total as u128) as u64;

    GraduationProgress {
        progress_bps,
        is_graduated: false,
        tokens_remaining: reserves.real_token,
        tokens_total,
        sol_accumulated: reserves.real_sol,
    }
}

/// Buy and sell price of one whole token plus market cap
pub fn token_price(quoter: &Quoter, reserves: &ReserveState) -> Result<TokenPrice, CurveError> {
    let buy = quoter.quote_buy_exact_tokens(reserves, ONE_TOKEN, u64::MAX)?;
    let sell_price_per_token = match quoter.quote_sell_exact_tokens(reserves, ONE_TOKEN, 0) {
        Ok(quote) => quote.net_sol,
        Err(CurveError::NotEnoughTokensToSell) => 0,
        Err(e) => return Err(e),
    };

    Ok(TokenPrice {
        buy_price_per_token: buy.total_cost,
        sell_price_per_token,
        market_cap: reserves.market_cap(quoter.mint_supply)?,
    })
}

/// Everything a curve overview page shows
pub fn curve_summary(quoter: &Quoter, reserves: &ReserveState) -> Result<CurveSummary, CurveError> {
    let progress = graduation_progress(&quoter.global, reserves);
    let price = token_price(quoter, reserves)?;

    Ok(CurveSummary {
        market_cap: price.market_cap,
        progress_bps: progress.progress_bps,
        is_graduated: progress.is_graduated,
        buy_price_per_token: price.buy_price_per_token,
        sell_price_per_token: price.sell_price_per_token,
        real_sol: reserves.real_sol,
        real_token: reserves.real_token,
        virtual_sol: reserves.virtual_sol,
        virtual_token: reserves.virtual_token,
    })
}
