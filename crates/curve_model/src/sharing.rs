//! Creator fee sharing: shareholder validation and payout planning
//!
//! Payouts floor per shareholder; the rounding loss stays undistributed and
//! is reported as `remainder`. Payout order matches shareholder order, since
//! the program checks shareholder accounts positionally.

use arrayvec::ArrayVec;

use crate::state::Address;
use crate::{CurveError, BPS_SCALE, MAX_SHAREHOLDERS};

/// One fee-sharing participant
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Shareholder {
    pub address: Address,
    pub share_bps: u16,
}

/// Validated shareholder list (non-empty, unique, positive, totals 10,000 bps)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShareholderList {
    entries: ArrayVec<Shareholder, MAX_SHAREHOLDERS>,
}

impl ShareholderList {
    pub fn new(shareholders: &[Shareholder]) -> Result<Self, CurveError> {
        if shareholders.is_empty() {
            return Err(CurveError::NoShareholders);
        }
        if shareholders.len() > MAX_SHAREHOLDERS {
            return Err(CurveError::TooManyShareholders);
        }

        let mut total: u64 = 0;
        for sh in shareholders {
            if sh.share_bps == 0 {
                return Err(CurveError::ZeroShareNotAllowed);
            }
            total += sh.share_bps as u64;
        }
        if total != BPS_SCALE {
            return Err(CurveError::InvalidShareTotal);
        }

        let mut entries = ArrayVec::new();
        for (i, sh) in shareholders.iter().enumerate() {
            if shareholders[..i].iter().any(|prev| prev.address == sh.address) {
                return Err(CurveError::DuplicateShareholder);
            }
            entries.push(*sh);
        }

        Ok(Self { entries })
    }

    pub fn as_slice(&self) -> &[Shareholder] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// One payout line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Payout {
    pub address: Address,
    pub amount: u64,
}

/// Result of splitting a fee amount across shareholders
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DistributionPlan {
    pub payouts: ArrayVec<Payout, MAX_SHAREHOLDERS>,
    /// Rounding loss, left with the vault
    pub remainder: u64,
}

impl DistributionPlan {
    pub fn distributed(&self) -> u64 {
        self.payouts.iter().map(|p| p.amount).sum()
    }

    /// Whether the vault holds enough to be worth a distribution
    pub fn can_distribute(&self, minimum_required: u64) -> bool {
        let total = self.distributed() + self.remainder;
        total > 0 && total >= minimum_required
    }
}

/// Split `amount` across a validated shareholder list
pub fn distribute(amount: u64, shareholders: &ShareholderList) -> Result<DistributionPlan, CurveError> {
    let mut payouts = ArrayVec::new();
    let mut paid: u64 = 0;

    for sh in shareholders.as_slice() {
        let share = (amount as u128)
            .checked_mul(sh.share_bps as u128)
            .ok_or(CurveError::ShareCalculationOverflow)?
            / BPS_SCALE as u128;
        let share = u64::try_from(share).map_err(|_| CurveError::ShareCalculationOverflow)?;
        paid = paid
            .checked_add(share)
            .ok_or(CurveError::ShareCalculationOverflow)?;
        payouts.push(Payout { address: sh.address, amount: share });
    }

    let remainder = amount
        .checked_sub(paid)
        .ok_or(CurveError::ShareCalculationOverflow)?;

    Ok(DistributionPlan { payouts, remainder })
}

/// Validate a raw list, then split `amount` across it
pub fn distribute_raw(amount: u64, shareholders: &[Shareholder]) -> Result<DistributionPlan, CurveError> {
    let list = ShareholderList::new(shareholders)?;
    distribute(amount, &list)
}

/// Fee-sharing config account snapshot
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SharingConfig {
    pub mint: Address,
    pub admin: Address,
    pub admin_revoked: bool,
    pub shareholders: ShareholderList,
}

impl SharingConfig {
    /// Replace the whole shareholder list; on error nothing changes
    pub fn update_shares(&mut self, signer: &Address, new_shareholders: &[Shareholder]) -> Result<(), CurveError> {
        if self.admin_revoked {
            return Err(CurveError::AdminRevoked);
        }
        if *signer != self.admin {
            return Err(CurveError::Unauthorized);
        }
        self.shareholders = ShareholderList::new(new_shareholders)?;
        Ok(())
    }
}
