//! Curve Model - Pure bonding-curve accounting for off-chain quoting
//!
//! This crate mirrors the integer arithmetic the on-chain bonding-curve
//! program performs, so a client can quote trades, resolve fees, plan
//! fee-sharing payouts and estimate token incentives before submitting.
//!
//! Every function is total over its inputs: snapshots come in by value or
//! shared reference, results come back as `Result<_, CurveError>`, and no
//! state is mutated.

#![no_std]
#![forbid(unsafe_code)]

#[cfg(feature = "std")]
extern crate std;

#[cfg(kani)]
extern crate kani;

pub mod analytics;
pub mod curve;
pub mod fees;
pub mod incentives;
pub mod math;
pub mod sharing;
pub mod state;

pub use analytics::*;
pub use curve::{
    market_cap, with_slippage_down, with_slippage_up, BuyQuote, CurvePhase, Quoter, SellQuote,
};
pub use fees::{fee, fee_market_cap, resolve, FeeSource, TradeFees};
pub use incentives::{
    cashback_for_trade, current_day_tokens, current_day_volume, unclaimed_tokens,
    UserVolumeTotals,
};
pub use sharing::{
    distribute, distribute_raw, DistributionPlan, Payout, Shareholder, ShareholderList, SharingConfig,
};
pub use state::*;

/// Basis points scale (10,000 bps = 100%)
pub const BPS_SCALE: u64 = 10_000;

/// Upper bound for any single fee component
pub const MAX_FEE_BPS: u64 = 10_000;

/// Maximum number of tiers a fee config carries
pub const MAX_FEE_TIERS: usize = 16;

/// Maximum number of shareholders in a fee-sharing config
pub const MAX_SHAREHOLDERS: usize = 10;

/// Length of the rolling volume window, in days
pub const VOLUME_WINDOW_DAYS: usize = 30;

/// Supply used for fee-tier market cap outside mayhem mode (1B tokens, 6 decimals)
pub const ONE_BILLION_SUPPLY: u64 = 1_000_000_000_000_000;

/// Raw units in one whole token (6 decimals)
pub const ONE_TOKEN: u64 = 1_000_000;

/// Lamports per SOL
pub const LAMPORTS_PER_SOL: u64 = 1_000_000_000;

/// Error types for curve accounting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CurveError {
    // Arithmetic
    /// Arithmetic overflow or underflow
    Overflow,
    /// Result does not fit the narrower output width
    Truncation,
    /// Division by a zero reserve or volume
    DivisionByZero,

    // Slippage
    /// Total buy cost exceeds the caller's maximum
    TooMuchSolRequired,
    /// Net sell proceeds fall below the caller's minimum
    TooLittleSolReceived,
    /// Tokens bought fall below the caller's minimum
    BuySlippageBelowMinTokensOut,

    // State
    /// Curve has migrated; quoting is closed
    BondingCurveComplete,
    /// Requested more tokens than the curve holds
    NotEnoughTokensToBuy,
    /// Curve cannot pay out the SOL this sale would produce
    NotEnoughTokensToSell,

    // Configuration
    /// Shareholder list is empty
    NoShareholders,
    /// Shareholder list is longer than `MAX_SHAREHOLDERS`
    TooManyShareholders,
    /// A shareholder has a zero share
    ZeroShareNotAllowed,
    /// Shares do not sum to 10,000 bps
    InvalidShareTotal,
    /// The same address appears twice
    DuplicateShareholder,
    /// Share payout does not fit the accumulator
    ShareCalculationOverflow,
    /// Fee config has more than `MAX_FEE_TIERS` tiers
    TooManyFeeTiers,
    /// Fee tier thresholds are not strictly ascending
    TiersNotAscending,
    /// A fee component exceeds `MAX_FEE_BPS`
    FeeBpsTooLarge,
    /// Sharing config admin authority has been revoked
    AdminRevoked,
    /// Signer is not the sharing config admin
    Unauthorized,
    /// Slippage tolerance above 100%
    InvalidSlippage,
}

impl core::fmt::Display for CurveError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let msg = match self {
            CurveError::Overflow => "arithmetic overflow",
            CurveError::Truncation => "value does not fit in 64 bits",
            CurveError::DivisionByZero => "division by zero",
            CurveError::TooMuchSolRequired => "too much SOL required to buy the given amount of tokens",
            CurveError::TooLittleSolReceived => "too little SOL received to sell the given amount of tokens",
            CurveError::BuySlippageBelowMinTokensOut => "tokens out below the minimum requested",
            CurveError::BondingCurveComplete => "bonding curve is complete",
            CurveError::NotEnoughTokensToBuy => "not enough tokens in the curve to buy",
            CurveError::NotEnoughTokensToSell => "not enough SOL in the curve to sell",
            CurveError::NoShareholders => "no shareholders provided",
            CurveError::TooManyShareholders => "too many shareholders",
            CurveError::ZeroShareNotAllowed => "zero share not allowed",
            CurveError::InvalidShareTotal => "shares must total 10,000 bps",
            CurveError::DuplicateShareholder => "duplicate shareholder addresses not allowed",
            CurveError::ShareCalculationOverflow => "share calculation overflow",
            CurveError::TooManyFeeTiers => "too many fee tiers",
            CurveError::TiersNotAscending => "fee tier thresholds must be strictly ascending",
            CurveError::FeeBpsTooLarge => "fee basis points above maximum",
            CurveError::AdminRevoked => "sharing config admin has been revoked",
            CurveError::Unauthorized => "signer is not the sharing config admin",
            CurveError::InvalidSlippage => "slippage above 10,000 bps",
        };
        f.write_str(msg)
    }
}

#[cfg(feature = "std")]
impl std::error::Error for CurveError {}
