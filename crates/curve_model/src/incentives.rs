//! Volume accumulator ledger: token incentives and cashback estimates
//!
//! The global accumulator splits a campaign into days of `seconds_per_day`
//! and records, per day, the incentive token supply and the total SOL volume
//! traded. A user's share of a day is
//! `floor(user_volume * day_supply / day_volume)`.
//!
//! The user's volume only counts once its day has closed; until then it
//! shows up as `current_day_tokens`. Arrays are a 30-slot ring keyed by
//! `day % 30`.

use crate::fees::fee;
use crate::math::mul_div_floor;
use crate::state::{Address, GlobalVolumeAccumulator, UserVolumeAccumulator};
use crate::{CurveError, VOLUME_WINDOW_DAYS};

impl GlobalVolumeAccumulator {
    /// Whether a campaign has been configured at all
    pub fn is_configured(&self) -> bool {
        self.start_time != 0
            && self.end_time != 0
            && self.seconds_per_day > 0
            && self.end_time >= self.start_time
    }

    /// `start_time <= now < end_time`
    pub fn is_active(&self, now: i64) -> bool {
        self.is_configured() && self.start_time <= now && now < self.end_time
    }

    /// Campaign day containing `ts`; `None` before the campaign or when unset
    pub fn day_index(&self, ts: i64) -> Option<u64> {
        if !self.is_configured() || ts < self.start_time {
            return None;
        }
        let elapsed = ts.checked_sub(self.start_time)?;
        Some((elapsed / self.seconds_per_day) as u64)
    }

    /// Day containing `end_time`
    pub fn end_day_index(&self) -> Option<u64> {
        self.day_index(self.end_time)
    }

    /// Ring slot for a campaign day
    pub fn slot(day: u64) -> usize {
        (day % VOLUME_WINDOW_DAYS as u64) as usize
    }

    /// Tokens earned on `day` for `user_volume` lamports of volume
    pub fn day_share(&self, day: u64, user_volume: u64) -> Result<u64, CurveError> {
        let slot = Self::slot(day);
        let supply = self.total_token_supply[slot];
        let volume = self.sol_volumes[slot];
        if supply == 0 || volume == 0 {
            return Ok(0);
        }
        mul_div_floor(user_volume, supply, volume)
    }
}

/// Tokens the user can claim as of `now`
///
/// `total_unclaimed_tokens` plus the share for the user's last trading day
/// once that day has closed and lies within the campaign.
pub fn unclaimed_tokens(
    global: &GlobalVolumeAccumulator,
    user: &UserVolumeAccumulator,
    now: i64,
) -> Result<u64, CurveError> {
    let base = user.total_unclaimed_tokens;

    let (Some(current_day), Some(last_day), Some(end_day)) = (
        global.day_index(now),
        global.day_index(user.last_update_timestamp),
        global.end_day_index(),
    ) else {
        return Ok(base);
    };

    if current_day > last_day && last_day <= end_day {
        let accrued = global.day_share(last_day, user.current_sol_volume)?;
        return base.checked_add(accrued).ok_or(CurveError::Overflow);
    }

    Ok(base)
}

/// Tokens accruing on the still-open current day
pub fn current_day_tokens(
    global: &GlobalVolumeAccumulator,
    user: &UserVolumeAccumulator,
    now: i64,
) -> Result<u64, CurveError> {
    match open_day(global, user, now) {
        Some(day) => global.day_share(day, user.current_sol_volume),
        None => Ok(0),
    }
}

/// User SOL volume on the still-open current day
pub fn current_day_volume(global: &GlobalVolumeAccumulator, user: &UserVolumeAccumulator, now: i64) -> u64 {
    match open_day(global, user, now) {
        Some(_) => user.current_sol_volume,
        None => 0,
    }
}

/// Current day, if the campaign is active and the user last traded today
fn open_day(global: &GlobalVolumeAccumulator, user: &UserVolumeAccumulator, now: i64) -> Option<u64> {
    if !global.is_active(now) {
        return None;
    }
    let current_day = global.day_index(now)?;
    let last_day = global.day_index(user.last_update_timestamp)?;
    (current_day == last_day).then_some(current_day)
}

/// Cashback credited for a trade: same ceil-bps rule as creator fees
pub fn cashback_for_trade(sol_amount: u64, cashback_bps: u64) -> Result<u64, CurveError> {
    fee(sol_amount, cashback_bps)
}

impl UserVolumeAccumulator {
    /// Fresh accumulator for `user`
    pub fn new(user: Address, now: i64) -> Self {
        Self {
            user,
            last_update_timestamp: now,
            ..Default::default()
        }
    }

    /// Fold a closed day into `total_unclaimed_tokens`
    ///
    /// Calling twice with the same `now` gives the same snapshot.
    pub fn sync(&self, global: &GlobalVolumeAccumulator, now: i64) -> Result<Self, CurveError> {
        let mut next = *self;
        let unclaimed = unclaimed_tokens(global, self, now)?;
        // None orders before Some: pre-campaign volume is dropped too
        if global.day_index(now) > global.day_index(self.last_update_timestamp) {
            next.current_sol_volume = 0;
        }
        next.total_unclaimed_tokens = unclaimed;
        next.last_update_timestamp = next.last_update_timestamp.max(now);
        next.needs_claim = unclaimed > 0 || next.claimable_cashback()? > 0;
        Ok(next)
    }

    /// Record a trade of `sol_amount` lamports at `now`
    ///
    /// Volume counts toward incentives only while the campaign is active.
    pub fn record_trade(
        &self,
        global: &GlobalVolumeAccumulator,
        now: i64,
        sol_amount: u64,
        cashback_bps: u64,
    ) -> Result<Self, CurveError> {
        let mut next = self.sync(global, now)?;
        if global.is_active(now) {
            next.current_sol_volume = next
                .current_sol_volume
                .checked_add(sol_amount)
                .ok_or(CurveError::Overflow)?;
        }
        next.accrue_cashback(sol_amount, cashback_bps)
    }

    /// Credit cashback for one trade
    pub fn accrue_cashback(&self, sol_amount: u64, cashback_bps: u64) -> Result<Self, CurveError> {
        let mut next = *self;
        let cashback = cashback_for_trade(sol_amount, cashback_bps)?;
        next.cashback_earned = next
            .cashback_earned
            .checked_add(cashback)
            .ok_or(CurveError::Overflow)?;
        if cashback > 0 {
            next.needs_claim = true;
        }
        Ok(next)
    }

    /// Cashback earned but not yet claimed
    pub fn claimable_cashback(&self) -> Result<u64, CurveError> {
        self.cashback_earned
            .checked_sub(self.total_cashback_claimed)
            .ok_or(CurveError::Overflow)
    }

    /// The account can be closed once nothing is left to claim
    pub fn can_close(&self) -> bool {
        self.total_unclaimed_tokens == 0 && self.cashback_earned == self.total_cashback_claimed
    }
}

/// Incentive figures for one user across the bonding-curve and AMM programs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct UserVolumeTotals {
    pub total_unclaimed_tokens: u64,
    pub total_claimed_tokens: u64,
    pub current_sol_volume: u64,
}

impl UserVolumeTotals {
    pub fn from_accumulator(
        global: &GlobalVolumeAccumulator,
        user: &UserVolumeAccumulator,
        now: i64,
    ) -> Result<Self, CurveError> {
        Ok(Self {
            total_unclaimed_tokens: unclaimed_tokens(global, user, now)?,
            total_claimed_tokens: user.total_claimed_tokens,
            current_sol_volume: user.current_sol_volume,
        })
    }

    pub fn combine(&self, other: &Self) -> Result<Self, CurveError> {
        Ok(Self {
            total_unclaimed_tokens: self
                .total_unclaimed_tokens
                .checked_add(other.total_unclaimed_tokens)
                .ok_or(CurveError::Overflow)?,
            total_claimed_tokens: self
                .total_claimed_tokens
                .checked_add(other.total_claimed_tokens)
                .ok_or(CurveError::Overflow)?,
            current_sol_volume: self
                .current_sol_volume
                .checked_add(other.current_sol_volume)
                .ok_or(CurveError::Overflow)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::Address;

    const START: i64 = 1_700_000_000;
    const DAY: i64 = 86_400;

    fn global() -> GlobalVolumeAccumulator {
        let mut g = GlobalVolumeAccumulator {
            start_time: START,
            end_time: START + 30 * DAY,
            seconds_per_day: DAY,
            mint: Address([5u8; 32]),
            ..Default::default()
        };
        for d in 0..VOLUME_WINDOW_DAYS {
            g.total_token_supply[d] = 1_000_000_000;
            g.sol_volumes[d] = 400_000_000_000;
        }
        g
    }

    fn user(volume: u64, last_update: i64) -> UserVolumeAccumulator {
        UserVolumeAccumulator {
            user: Address([1u8; 32]),
            total_unclaimed_tokens: 7,
            current_sol_volume: volume,
            last_update_timestamp: last_update,
            ..Default::default()
        }
    }

    #[test]
    fn test_day_index() {
        let g = global();
        assert_eq!(g.day_index(START - 1), None);
        assert_eq!(g.day_index(START), Some(0));
        assert_eq!(g.day_index(START + DAY - 1), Some(0));
        assert_eq!(g.day_index(START + DAY), Some(1));
        assert_eq!(g.end_day_index(), Some(30));
        assert_eq!(GlobalVolumeAccumulator::slot(31), 1);
        assert!(!GlobalVolumeAccumulator::default().is_configured());
    }

    #[test]
    fn test_same_day_not_yet_unclaimed() {
        let g = global();
        let u = user(100_000_000_000, START + 10);
        let now = START + 3_600;
        assert_eq!(unclaimed_tokens(&g, &u, now).unwrap(), 7);
        // 100 SOL of 400 SOL day volume -> a quarter of the day's supply
        assert_eq!(current_day_tokens(&g, &u, now).unwrap(), 250_000_000);
        assert_eq!(current_day_volume(&g, &u, now), 100_000_000_000);
    }

    #[test]
    fn test_closed_day_rolls_into_unclaimed() {
        let g = global();
        let u = user(100_000_000_000, START + 10);
        let now = START + DAY + 5;
        assert_eq!(unclaimed_tokens(&g, &u, now).unwrap(), 7 + 250_000_000);
        assert_eq!(current_day_tokens(&g, &u, now).unwrap(), 0);
        assert_eq!(current_day_volume(&g, &u, now), 0);
    }

    #[test]
    fn test_unclaimed_is_idempotent() {
        let g = global();
        let u = user(123_456_789, START + 10);
        let now = START + 2 * DAY;
        assert_eq!(
            unclaimed_tokens(&g, &u, now).unwrap(),
            unclaimed_tokens(&g, &u, now).unwrap()
        );
        let once = u.sync(&g, now).unwrap();
        let twice = once.sync(&g, now).unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn test_before_campaign_and_unset_campaign() {
        let g = global();
        let u = user(100, START - 10);
        assert_eq!(unclaimed_tokens(&g, &u, START - 1).unwrap(), 7);
        assert_eq!(unclaimed_tokens(&g, &u, START + 5 * DAY).unwrap(), 7);

        let unset = GlobalVolumeAccumulator::default();
        assert_eq!(unclaimed_tokens(&unset, &user(100, 0), START).unwrap(), 7);
        assert_eq!(current_day_tokens(&unset, &user(100, 0), START).unwrap(), 0);
    }

    #[test]
    fn test_after_campaign_end() {
        let g = global();
        // Last trade on the final day; accrues once the day closes
        let u = user(100_000_000_000, START + 29 * DAY + 1);
        let after = START + 40 * DAY;
        assert_eq!(unclaimed_tokens(&g, &u, after).unwrap(), 7 + 250_000_000);
        assert_eq!(current_day_tokens(&g, &u, after).unwrap(), 0);
    }

    #[test]
    fn test_current_day_stops_at_end_time() {
        let mut g = global();
        // End mid-day so end_time and end_time - 1 share a day
        g.end_time = START + 29 * DAY + DAY / 2;
        let u = user(100_000_000_000, START + 29 * DAY + 1);

        assert_eq!(current_day_tokens(&g, &u, g.end_time - 1).unwrap(), 250_000_000);
        assert_eq!(current_day_volume(&g, &u, g.end_time - 1), 100_000_000_000);
        assert_eq!(current_day_tokens(&g, &u, g.end_time).unwrap(), 0);
        assert_eq!(current_day_volume(&g, &u, g.end_time), 0);
    }

    #[test]
    fn test_zero_day_volume() {
        let mut g = global();
        g.sol_volumes[0] = 0;
        let u = user(100, START + 1);
        assert_eq!(unclaimed_tokens(&g, &u, START + DAY).unwrap(), 7);
    }

    #[test]
    fn test_record_trade_and_cashback() {
        let g = global();
        let u = UserVolumeAccumulator::new(Address([2u8; 32]), START);
        assert!(u.can_close());

        let u = u.record_trade(&g, START + 100, 1_000_000_000, 50).unwrap();
        assert_eq!(u.current_sol_volume, 1_000_000_000);
        assert_eq!(u.cashback_earned, 5_000_000);
        assert_eq!(u.claimable_cashback().unwrap(), 5_000_000);
        assert!(u.needs_claim);
        assert!(!u.can_close());

        // Next day: yesterday's volume rolls into unclaimed tokens
        let u = u.record_trade(&g, START + DAY + 100, 2_000_000_000, 0).unwrap();
        assert_eq!(u.total_unclaimed_tokens, 2_500_000);
        assert_eq!(u.current_sol_volume, 2_000_000_000);
    }

    #[test]
    fn test_close_requires_cashback_claimed() {
        let mut u = UserVolumeAccumulator::new(Address([2u8; 32]), START);
        u.cashback_earned = 10;
        u.total_cashback_claimed = 9;
        assert!(!u.can_close());
        u.total_cashback_claimed = 10;
        assert!(u.can_close());
    }

    #[test]
    fn test_totals_combine() {
        let g = global();
        let a = UserVolumeTotals::from_accumulator(&g, &user(100_000_000_000, START), START + DAY).unwrap();
        let b = UserVolumeTotals {
            total_unclaimed_tokens: 1,
            total_claimed_tokens: 2,
            current_sol_volume: 3,
        };
        let c = a.combine(&b).unwrap();
        assert_eq!(c.total_unclaimed_tokens, 7 + 250_000_000 + 1);
        assert_eq!(c.total_claimed_tokens, 2);
        assert_eq!(c.current_sol_volume, 100_000_000_003);
    }
}
