//! Snapshot types for the on-chain accounts the core reads
//!
//! These are plain values. The account decoder lives outside this crate and
//! hands over already-decoded snapshots.

use arrayvec::ArrayVec;

use crate::{CurveError, MAX_FEE_BPS, MAX_FEE_TIERS, VOLUME_WINDOW_DAYS};

// ============================================================================
// Identifiers
// ============================================================================

/// 32-byte account address
#[repr(transparent)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Address(pub [u8; 32]);

impl Address {
    /// The all-zero (unset) address
    pub const ZERO: Self = Self([0u8; 32]);

    pub const fn new(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    pub fn is_zero(&self) -> bool {
        self.0 == [0u8; 32]
    }

    pub fn to_bytes(self) -> [u8; 32] {
        self.0
    }
}

impl From<[u8; 32]> for Address {
    fn from(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }
}

// ============================================================================
// Global program parameters
// ============================================================================

/// Program-wide parameters from the global account
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GlobalParams {
    pub initial_virtual_token_reserves: u64,
    pub initial_virtual_sol_reserves: u64,
    pub initial_real_token_reserves: u64,
    pub token_total_supply: u64,
    /// Flat protocol fee used when no fee config exists
    pub fee_basis_points: u64,
    /// Flat creator fee used when no fee config exists
    pub creator_fee_basis_points: u64,
    pub mayhem_mode_enabled: bool,
}

// ============================================================================
// Bonding curve reserves
// ============================================================================

/// Bonding curve account snapshot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ReserveState {
    pub virtual_sol: u64,
    pub virtual_token: u64,
    pub real_sol: u64,
    pub real_token: u64,
    pub token_total_supply: u64,
    /// Set once the curve migrates; terminal
    pub complete: bool,
    /// `Address::ZERO` when the curve has no creator
    pub creator: Address,
    pub mayhem_mode: bool,
}

impl ReserveState {
    /// Reserves of a curve that has not been created yet
    pub fn from_global(global: &GlobalParams) -> Self {
        Self {
            virtual_sol: global.initial_virtual_sol_reserves,
            virtual_token: global.initial_virtual_token_reserves,
            real_sol: 0,
            real_token: global.initial_real_token_reserves,
            token_total_supply: global.token_total_supply,
            complete: false,
            creator: Address::ZERO,
            mayhem_mode: global.mayhem_mode_enabled,
        }
    }

    /// Both virtual reserves must be non-zero before any quote
    pub fn ensure_quotable(&self) -> Result<(), CurveError> {
        if self.complete {
            return Err(CurveError::BondingCurveComplete);
        }
        if self.virtual_sol == 0 || self.virtual_token == 0 {
            return Err(CurveError::DivisionByZero);
        }
        Ok(())
    }
}

// ============================================================================
// Fees
// ============================================================================

/// Fee split in basis points
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FeeBps {
    pub lp_bps: u64,
    pub protocol_bps: u64,
    pub creator_bps: u64,
}

impl FeeBps {
    pub const fn new(lp_bps: u64, protocol_bps: u64, creator_bps: u64) -> Self {
        Self { lp_bps, protocol_bps, creator_bps }
    }

    pub(crate) fn validate(&self) -> Result<(), CurveError> {
        if self.lp_bps > MAX_FEE_BPS
            || self.protocol_bps > MAX_FEE_BPS
            || self.creator_bps > MAX_FEE_BPS
        {
            return Err(CurveError::FeeBpsTooLarge);
        }
        Ok(())
    }
}

/// One market-cap tier of a fee config
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeeTier {
    /// Lowest market cap (lamports) this tier applies at
    pub market_cap_threshold: u128,
    pub fees: FeeBps,
}

/// Flat fees plus ascending market-cap tiers
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeeSchedule {
    pub flat: FeeBps,
    tiers: ArrayVec<FeeTier, MAX_FEE_TIERS>,
}

impl FeeSchedule {
    /// Build a schedule; thresholds must be strictly ascending
    pub fn new(flat: FeeBps, tiers: &[FeeTier]) -> Result<Self, CurveError> {
        flat.validate()?;
        if tiers.len() > MAX_FEE_TIERS {
            return Err(CurveError::TooManyFeeTiers);
        }

        let mut out = ArrayVec::new();
        let mut prev: Option<u128> = None;
        for tier in tiers {
            tier.fees.validate()?;
            if let Some(p) = prev {
                if tier.market_cap_threshold <= p {
                    return Err(CurveError::TiersNotAscending);
                }
            }
            prev = Some(tier.market_cap_threshold);
            out.push(*tier);
        }

        Ok(Self { flat, tiers: out })
    }

    /// Flat fees only
    pub fn flat(flat: FeeBps) -> Result<Self, CurveError> {
        Self::new(flat, &[])
    }

    pub fn tiers(&self) -> &[FeeTier] {
        &self.tiers
    }
}

// ============================================================================
// Volume accumulators
// ============================================================================

/// Campaign-wide daily volume and incentive supply
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GlobalVolumeAccumulator {
    pub start_time: i64,
    pub end_time: i64,
    pub seconds_per_day: i64,
    pub mint: Address,
    pub total_token_supply: [u64; VOLUME_WINDOW_DAYS],
    pub sol_volumes: [u64; VOLUME_WINDOW_DAYS],
}

impl Default for GlobalVolumeAccumulator {
    fn default() -> Self {
        Self {
            start_time: 0,
            end_time: 0,
            seconds_per_day: 0,
            mint: Address::ZERO,
            total_token_supply: [0; VOLUME_WINDOW_DAYS],
            sol_volumes: [0; VOLUME_WINDOW_DAYS],
        }
    }
}

/// Per-user volume and reward state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct UserVolumeAccumulator {
    pub user: Address,
    pub needs_claim: bool,
    pub total_unclaimed_tokens: u64,
    pub total_claimed_tokens: u64,
    pub current_sol_volume: u64,
    pub last_update_timestamp: i64,
    pub cashback_earned: u64,
    pub total_cashback_claimed: u64,
}
