//! Bonding curve quotes (constant product on virtual reserves)
//!
//! Two trade shapes per side:
//! - exact tokens: the token amount is fixed, SOL is derived
//! - exact SOL: the SOL budget is fixed (fees included), tokens are derived
//!
//! Divisions floor unless noted. Fees round up, against the trader.

use crate::fees::{fee_market_cap, FeeSource, TradeFees};
use crate::math::{bps_ceil, bps_floor, div_ceil, div_floor, mul_u64, to_u64};
use crate::state::{Address, GlobalParams, ReserveState};
use crate::{CurveError, BPS_SCALE};

/// Lifecycle of a curve
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CurvePhase {
    /// Trading on the curve
    Active,
    /// Migrated; terminal
    Complete,
}

impl ReserveState {
    pub fn phase(&self) -> CurvePhase {
        if self.complete {
            CurvePhase::Complete
        } else {
            CurvePhase::Active
        }
    }

    /// Creator set at creation time (for curves that do not exist yet)
    pub fn with_creator(mut self, creator: Address) -> Self {
        self.creator = creator;
        self
    }

    /// Market cap of an active curve
    pub fn market_cap(&self, mint_supply: u64) -> Result<u128, CurveError> {
        if self.complete {
            return Err(CurveError::BondingCurveComplete);
        }
        market_cap(mint_supply, self.virtual_sol, self.virtual_token)
    }

    /// Reserves after a buy settles
    pub fn after_buy(&self, quote: &BuyQuote) -> Result<Self, CurveError> {
        let mut next = *self;
        next.virtual_sol = next
            .virtual_sol
            .checked_add(quote.sol_amount)
            .ok_or(CurveError::Overflow)?;
        next.real_sol = next
            .real_sol
            .checked_add(quote.sol_amount)
            .ok_or(CurveError::Overflow)?;
        next.virtual_token = next
            .virtual_token
            .checked_sub(quote.token_amount)
            .ok_or(CurveError::NotEnoughTokensToBuy)?;
        next.real_token = next
            .real_token
            .checked_sub(quote.token_amount)
            .ok_or(CurveError::NotEnoughTokensToBuy)?;
        Ok(next)
    }

    /// Reserves after a sell settles
    pub fn after_sell(&self, quote: &SellQuote) -> Result<Self, CurveError> {
        let mut next = *self;
        next.virtual_sol = next
            .virtual_sol
            .checked_sub(quote.gross_sol)
            .ok_or(CurveError::NotEnoughTokensToSell)?;
        next.real_sol = next
            .real_sol
            .checked_sub(quote.gross_sol)
            .ok_or(CurveError::NotEnoughTokensToSell)?;
        next.virtual_token = next
            .virtual_token
            .checked_add(quote.token_amount)
            .ok_or(CurveError::Overflow)?;
        next.real_token = next
            .real_token
            .checked_add(quote.token_amount)
            .ok_or(CurveError::Overflow)?;
        Ok(next)
    }
}

/// `floor(mint_supply * virtual_sol / virtual_token)`
pub fn market_cap(mint_supply: u64, virtual_sol: u64, virtual_token: u64) -> Result<u128, CurveError> {
    div_floor(mul_u64(mint_supply, virtual_sol), virtual_token as u128)
}

/// Buy quote
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuyQuote {
    /// Tokens received
    pub token_amount: u64,
    /// SOL entering the curve, before fees
    pub sol_amount: u64,
    /// Protocol + creator fees
    pub fee: u64,
    /// `sol_amount + fee`
    pub total_cost: u64,
    pub fees: TradeFees,
}

/// Sell quote
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SellQuote {
    /// Tokens sold
    pub token_amount: u64,
    /// SOL leaving the curve, before fees
    pub gross_sol: u64,
    /// Protocol + creator fees
    pub fee: u64,
    /// `gross_sol - fee`
    pub net_sol: u64,
    pub fees: TradeFees,
}

/// Stateless quoting context
///
/// Holds everything a quote needs besides the curve itself. Build one per
/// snapshot of the global and fee config accounts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Quoter {
    pub global: GlobalParams,
    pub fee_source: FeeSource,
    /// Current supply of the curve's mint
    pub mint_supply: u64,
    /// Quoting the creation trade; the creator fee is always charged
    pub new_curve: bool,
}

impl Quoter {
    pub fn new(global: GlobalParams, fee_source: FeeSource, mint_supply: u64) -> Self {
        Self { global, fee_source, mint_supply, new_curve: false }
    }

    /// Context for a curve that has not been created yet
    pub fn for_new_curve(global: GlobalParams, fee_source: FeeSource) -> Self {
        let mint_supply = global.token_total_supply;
        Self { global, fee_source, mint_supply, new_curve: true }
    }

    /// Resolved fee bps for a trade against `reserves`
    pub fn trade_fees(&self, reserves: &ReserveState) -> Result<TradeFees, CurveError> {
        let mc = fee_market_cap(reserves, self.mint_supply)?;
        let fees = self.fee_source.fees_bps(&self.global, mc)?;
        Ok(TradeFees::new(fees, self.new_curve || !reserves.creator.is_zero()))
    }

    /// Buy exactly `token_amount_out` tokens
    ///
    /// `raw = ceil(tokens * vSol / (vTok - tokens))`,
    /// `fee = ceil(raw * total_bps / 10_000)`.
    pub fn quote_buy_exact_tokens(
        &self,
        reserves: &ReserveState,
        token_amount_out: u64,
        max_sol_cost: u64,
    ) -> Result<BuyQuote, CurveError> {
        reserves.ensure_quotable()?;
        if token_amount_out >= reserves.virtual_token || token_amount_out > reserves.real_token {
            return Err(CurveError::NotEnoughTokensToBuy);
        }

        let remaining = (reserves.virtual_token - token_amount_out) as u128;
        let sol_amount = to_u64(div_ceil(
            mul_u64(token_amount_out, reserves.virtual_sol),
            remaining,
        )?)?;

        let fees = self.trade_fees(reserves)?;
        let fee = bps_ceil(sol_amount, fees.total_bps()?)?;
        let total_cost = sol_amount.checked_add(fee).ok_or(CurveError::Overflow)?;

        if total_cost > max_sol_cost {
            return Err(CurveError::TooMuchSolRequired);
        }

        Ok(BuyQuote {
            token_amount: token_amount_out,
            sol_amount,
            fee,
            total_cost,
            fees,
        })
    }

    /// Spend at most `spendable_sol_in` (fees included)
    ///
    /// Fees come out of the budget. The `- 1` on the net amount keeps the
    /// estimate at or below what the program grants.
    pub fn quote_buy_exact_sol(
        &self,
        reserves: &ReserveState,
        spendable_sol_in: u64,
        min_tokens_out: u64,
    ) -> Result<BuyQuote, CurveError> {
        reserves.ensure_quotable()?;

        let fees = self.trade_fees(reserves)?;
        let divisor = BPS_SCALE
            .checked_add(fees.total_bps()?)
            .ok_or(CurveError::Overflow)? as u128;

        let mut net_sol = to_u64(div_floor(mul_u64(spendable_sol_in, BPS_SCALE), divisor)?)?;
        let fee = fees.component_fees(net_sol)?;
        let gross = net_sol.checked_add(fee).ok_or(CurveError::Overflow)?;
        if gross > spendable_sol_in {
            let excess = gross - spendable_sol_in;
            net_sol = net_sol.checked_sub(excess).ok_or(CurveError::Overflow)?;
        }

        // A zero net amount buys nothing rather than underflowing the bias
        let biased = net_sol.saturating_sub(1);
        let denominator = (reserves.virtual_sol as u128)
            .checked_add(biased as u128)
            .ok_or(CurveError::Overflow)?;
        let tokens = to_u64(div_floor(mul_u64(biased, reserves.virtual_token), denominator)?)?;
        let token_amount = tokens.min(reserves.real_token);

        if token_amount < min_tokens_out {
            return Err(CurveError::BuySlippageBelowMinTokensOut);
        }

        let total_cost = net_sol.checked_add(fee).ok_or(CurveError::Overflow)?;
        Ok(BuyQuote {
            token_amount,
            sol_amount: net_sol,
            fee,
            total_cost,
            fees,
        })
    }

    /// SOL budget (fees included) needed for `quote_buy_exact_sol` to yield `tokens`
    pub fn sol_budget_for_tokens(&self, reserves: &ReserveState, tokens: u64) -> Result<u64, CurveError> {
        reserves.ensure_quotable()?;
        if tokens == 0 {
            return Ok(0);
        }
        if tokens >= reserves.virtual_token {
            return Err(CurveError::NotEnoughTokensToBuy);
        }

        let remaining = (reserves.virtual_token - tokens) as u128;
        let net_sol = div_ceil(mul_u64(tokens, reserves.virtual_sol), remaining)?
            .checked_add(1)
            .ok_or(CurveError::Overflow)?;

        let fees = self.trade_fees(reserves)?;
        let multiplier = BPS_SCALE
            .checked_add(fees.total_bps()?)
            .ok_or(CurveError::Overflow)?;
        let scaled = net_sol
            .checked_mul(multiplier as u128)
            .ok_or(CurveError::Overflow)?;
        to_u64(div_ceil(scaled, BPS_SCALE as u128)?)
    }

    /// Sell exactly `token_amount_in` tokens
    ///
    /// `gross = floor(tokens * vSol / (vTok + tokens))`, then per-component
    /// ceil fees are taken out of the gross.
    pub fn quote_sell_exact_tokens(
        &self,
        reserves: &ReserveState,
        token_amount_in: u64,
        min_sol_output: u64,
    ) -> Result<SellQuote, CurveError> {
        reserves.ensure_quotable()?;

        let denominator = (reserves.virtual_token as u128) + (token_amount_in as u128);
        let gross_sol = to_u64(div_floor(
            mul_u64(token_amount_in, reserves.virtual_sol),
            denominator,
        )?)?;
        if gross_sol > reserves.real_sol {
            return Err(CurveError::NotEnoughTokensToSell);
        }

        let fees = self.trade_fees(reserves)?;
        let fee = fees.component_fees(gross_sol)?;
        let net_sol = gross_sol.checked_sub(fee).ok_or(CurveError::Overflow)?;

        if net_sol < min_sol_output {
            return Err(CurveError::TooLittleSolReceived);
        }

        Ok(SellQuote {
            token_amount: token_amount_in,
            gross_sol,
            fee,
            net_sol,
            fees,
        })
    }
}

/// Upper bound to embed as `max_sol_cost`: `amount + floor(amount * bps / 10_000)`
pub fn with_slippage_up(amount: u64, slippage_bps: u64) -> Result<u64, CurveError> {
    if slippage_bps > BPS_SCALE {
        return Err(CurveError::InvalidSlippage);
    }
    amount
        .checked_add(bps_floor(amount, slippage_bps)?)
        .ok_or(CurveError::Overflow)
}

/// Lower bound to embed as `min_sol_output` / `min_tokens_out`
pub fn with_slippage_down(amount: u64, slippage_bps: u64) -> Result<u64, CurveError> {
    if slippage_bps > BPS_SCALE {
        return Err(CurveError::InvalidSlippage);
    }
    Ok(amount - bps_floor(amount, slippage_bps)?)
}
