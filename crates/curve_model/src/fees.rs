//! Fee tier resolution and basis-point fee amounts

use crate::curve::market_cap;
use crate::math::bps_ceil;
use crate::state::{FeeBps, FeeSchedule, GlobalParams, ReserveState};
use crate::{CurveError, ONE_BILLION_SUPPLY};

/// Where a trade's fee bps come from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeeSource {
    /// A fee config account exists; fees depend on market cap
    Tiered(FeeSchedule),
    /// No fee config account; use the global flat fees
    UseFlatDefault,
}

impl FeeSource {
    /// Fee split for a given market cap
    ///
    /// Global flat fees are validated here; schedules were validated when built.
    pub fn fees_bps(&self, global: &GlobalParams, market_cap: u128) -> Result<FeeBps, CurveError> {
        match self {
            FeeSource::Tiered(schedule) => Ok(resolve(schedule, market_cap)),
            FeeSource::UseFlatDefault => {
                let fees = FeeBps::new(0, global.fee_basis_points, global.creator_fee_basis_points);
                fees.validate()?;
                Ok(fees)
            }
        }
    }
}

/// Highest tier whose threshold is at or below `market_cap`, else the flat fees
///
/// A market cap exactly on a threshold belongs to that (upper) tier.
pub fn resolve(schedule: &FeeSchedule, market_cap: u128) -> FeeBps {
    schedule
        .tiers()
        .iter()
        .rev()
        .find(|tier| tier.market_cap_threshold <= market_cap)
        .map(|tier| tier.fees)
        .unwrap_or(schedule.flat)
}

/// Market cap used to pick the fee tier
///
/// Outside mayhem mode the program keys tiers on a fixed one-billion supply
/// rather than the live mint supply.
pub fn fee_market_cap(reserves: &ReserveState, mint_supply: u64) -> Result<u128, CurveError> {
    let supply = if reserves.mayhem_mode {
        mint_supply
    } else {
        ONE_BILLION_SUPPLY
    };
    market_cap(supply, reserves.virtual_sol, reserves.virtual_token)
}

/// `ceil(amount * bps / 10_000)`; fees always round against the trader
#[inline]
pub fn fee(amount: u64, bps: u64) -> Result<u64, CurveError> {
    bps_ceil(amount, bps)
}

/// Fee bps charged on one trade
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TradeFees {
    pub protocol_bps: u64,
    /// Zero when an existing curve has no creator
    pub creator_bps: u64,
}

impl TradeFees {
    /// Apply the creator-presence rule to a resolved split
    ///
    /// Creator fees are charged on a curve that does not exist yet (the
    /// creator is set at creation) or on one with a non-zero creator.
    pub fn new(fees: FeeBps, charge_creator: bool) -> Self {
        Self {
            protocol_bps: fees.protocol_bps,
            creator_bps: if charge_creator { fees.creator_bps } else { 0 },
        }
    }

    pub fn total_bps(&self) -> Result<u64, CurveError> {
        self.protocol_bps
            .checked_add(self.creator_bps)
            .ok_or(CurveError::Overflow)
    }

    /// Sum of the per-component ceil fees on `amount`
    pub fn component_fees(&self, amount: u64) -> Result<u64, CurveError> {
        fee(amount, self.protocol_bps)?
            .checked_add(fee(amount, self.creator_bps)?)
            .ok_or(CurveError::Overflow)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::FeeTier;

    fn bps(p: u64) -> FeeBps {
        FeeBps::new(0, p, p / 4)
    }

    fn schedule() -> FeeSchedule {
        let tiers = [
            FeeTier { market_cap_threshold: 1_000, fees: bps(100) },
            FeeTier { market_cap_threshold: 5_000, fees: bps(60) },
            FeeTier { market_cap_threshold: 20_000, fees: bps(20) },
        ];
        FeeSchedule::new(bps(120), &tiers).unwrap()
    }

    #[test]
    fn test_resolve_below_lowest_tier_is_flat() {
        let s = schedule();
        assert_eq!(resolve(&s, 0), bps(120));
        assert_eq!(resolve(&s, 999), bps(120));
    }

    #[test]
    fn test_resolve_boundary_belongs_to_upper_tier() {
        let s = schedule();
        assert_eq!(resolve(&s, 1_000), bps(100));
        assert_eq!(resolve(&s, 4_999), bps(100));
        assert_eq!(resolve(&s, 5_000), bps(60));
        assert_eq!(resolve(&s, 20_000), bps(20));
        assert_eq!(resolve(&s, u128::MAX), bps(20));
    }

    #[test]
    fn test_resolve_empty_tiers() {
        let s = FeeSchedule::flat(bps(95)).unwrap();
        assert_eq!(resolve(&s, 0), bps(95));
        assert_eq!(resolve(&s, u128::MAX), bps(95));
    }

    #[test]
    fn test_flat_default_uses_global() {
        let global = GlobalParams {
            fee_basis_points: 95,
            creator_fee_basis_points: 5,
            ..Default::default()
        };
        let f = FeeSource::UseFlatDefault.fees_bps(&global, 123).unwrap();
        assert_eq!(f, FeeBps::new(0, 95, 5));
    }

    #[test]
    fn test_flat_default_rejects_oversized_global_bps() {
        let global = GlobalParams {
            fee_basis_points: u64::MAX,
            creator_fee_basis_points: 1,
            ..Default::default()
        };
        assert_eq!(
            FeeSource::UseFlatDefault.fees_bps(&global, 0),
            Err(CurveError::FeeBpsTooLarge)
        );
    }

    #[test]
    fn test_total_bps_is_checked() {
        let t = TradeFees { protocol_bps: u64::MAX, creator_bps: 1 };
        assert_eq!(t.total_bps(), Err(CurveError::Overflow));
    }

    #[test]
    fn test_fee_market_cap_ignores_supply_outside_mayhem() {
        let mut r = ReserveState {
            virtual_sol: 30_000_000_000,
            virtual_token: 1_073_000_000_000_000,
            ..Default::default()
        };
        let normal = fee_market_cap(&r, 2 * ONE_BILLION_SUPPLY).unwrap();
        assert_eq!(normal, market_cap(ONE_BILLION_SUPPLY, r.virtual_sol, r.virtual_token).unwrap());

        r.mayhem_mode = true;
        let mayhem = fee_market_cap(&r, 2 * ONE_BILLION_SUPPLY).unwrap();
        assert_eq!(mayhem, market_cap(2 * ONE_BILLION_SUPPLY, r.virtual_sol, r.virtual_token).unwrap());
    }

    #[test]
    fn test_trade_fees_without_creator() {
        let t = TradeFees::new(FeeBps::new(20, 95, 5), false);
        assert_eq!(t.total_bps().unwrap(), 95);
        assert_eq!(t.component_fees(10_000).unwrap(), 95);

        let t = TradeFees::new(FeeBps::new(20, 95, 5), true);
        assert_eq!(t.total_bps().unwrap(), 100);
        // 1 lamport: each component rounds up on its own
        assert_eq!(t.component_fees(1).unwrap(), 2);
    }
}
