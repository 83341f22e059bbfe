//! JSON snapshots of on-chain accounts
//!
//! Field names follow the account layouts. Addresses are base58 strings.
//! Conversion into model types validates everything the model relies on.

use std::path::Path;
use std::str::FromStr;

use anyhow::{Context, Result};
use curve_model::{
    Address, CurveError, FeeBps, FeeSchedule, FeeSource, FeeTier, GlobalParams,
    GlobalVolumeAccumulator, Quoter, ReserveState, Shareholder, ShareholderList, SharingConfig,
    UserVolumeAccumulator, VOLUME_WINDOW_DAYS,
};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use solana_sdk::pubkey::Pubkey;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("invalid address in `{field}`: {value}")]
    InvalidAddress { field: &'static str, value: String },

    #[error("`{field}` must hold {expected} entries, found {found}")]
    WindowLength {
        field: &'static str,
        expected: usize,
        found: usize,
    },

    #[error(transparent)]
    Model(#[from] CurveError),
}

/// Read and parse a JSON snapshot file
pub async fn load<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let data = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read snapshot: {}", path.display()))?;
    log::debug!("loaded {} bytes from {}", data.len(), path.display());
    serde_json::from_str(&data)
        .with_context(|| format!("Failed to parse snapshot JSON: {}", path.display()))
}

pub fn parse_address(field: &'static str, value: &str) -> Result<Address, SnapshotError> {
    Pubkey::from_str(value)
        .map(|key| Address(key.to_bytes()))
        .map_err(|_| SnapshotError::InvalidAddress {
            field,
            value: value.to_string(),
        })
}

fn window(field: &'static str, values: &[u64]) -> Result<[u64; VOLUME_WINDOW_DAYS], SnapshotError> {
    values.try_into().map_err(|_| SnapshotError::WindowLength {
        field,
        expected: VOLUME_WINDOW_DAYS,
        found: values.len(),
    })
}

// ============================================================================
// Market: global + fee config + bonding curve
// ============================================================================

#[derive(Debug, Clone, Deserialize)]
pub struct GlobalSnapshot {
    pub initial_virtual_token_reserves: u64,
    pub initial_virtual_sol_reserves: u64,
    pub initial_real_token_reserves: u64,
    pub token_total_supply: u64,
    pub fee_basis_points: u64,
    pub creator_fee_basis_points: u64,
    #[serde(default)]
    pub mayhem_mode_enabled: bool,
}

impl From<&GlobalSnapshot> for GlobalParams {
    fn from(g: &GlobalSnapshot) -> Self {
        GlobalParams {
            initial_virtual_token_reserves: g.initial_virtual_token_reserves,
            initial_virtual_sol_reserves: g.initial_virtual_sol_reserves,
            initial_real_token_reserves: g.initial_real_token_reserves,
            token_total_supply: g.token_total_supply,
            fee_basis_points: g.fee_basis_points,
            creator_fee_basis_points: g.creator_fee_basis_points,
            mayhem_mode_enabled: g.mayhem_mode_enabled,
        }
    }
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct FeesSnapshot {
    #[serde(default)]
    pub lp_fee_bps: u64,
    pub protocol_fee_bps: u64,
    pub creator_fee_bps: u64,
}

impl From<FeesSnapshot> for FeeBps {
    fn from(f: FeesSnapshot) -> Self {
        FeeBps::new(f.lp_fee_bps, f.protocol_fee_bps, f.creator_fee_bps)
    }
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct FeeTierSnapshot {
    pub market_cap_lamports_threshold: u128,
    pub fees: FeesSnapshot,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FeeConfigSnapshot {
    pub flat_fees: FeesSnapshot,
    #[serde(default)]
    pub fee_tiers: Vec<FeeTierSnapshot>,
}

impl FeeConfigSnapshot {
    pub fn to_schedule(&self) -> Result<FeeSchedule, SnapshotError> {
        let tiers: Vec<FeeTier> = self
            .fee_tiers
            .iter()
            .map(|t| FeeTier {
                market_cap_threshold: t.market_cap_lamports_threshold,
                fees: t.fees.into(),
            })
            .collect();
        Ok(FeeSchedule::new(self.flat_fees.into(), &tiers)?)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct BondingCurveSnapshot {
    pub virtual_token_reserves: u64,
    pub virtual_sol_reserves: u64,
    pub real_token_reserves: u64,
    pub real_sol_reserves: u64,
    pub token_total_supply: u64,
    #[serde(default)]
    pub complete: bool,
    pub creator: Option<String>,
    #[serde(default)]
    pub is_mayhem_mode: bool,
}

impl BondingCurveSnapshot {
    pub fn to_reserves(&self) -> Result<ReserveState, SnapshotError> {
        let creator = match &self.creator {
            Some(c) => parse_address("bonding_curve.creator", c)?,
            None => Address::ZERO,
        };
        Ok(ReserveState {
            virtual_sol: self.virtual_sol_reserves,
            virtual_token: self.virtual_token_reserves,
            real_sol: self.real_sol_reserves,
            real_token: self.real_token_reserves,
            token_total_supply: self.token_total_supply,
            complete: self.complete,
            creator,
            mayhem_mode: self.is_mayhem_mode,
        })
    }
}

/// Everything a quote needs
///
/// `bonding_curve: null` quotes the first buy on a curve that does not exist
/// yet; `creator` then names its future creator.
#[derive(Debug, Clone, Deserialize)]
pub struct MarketSnapshot {
    pub global: GlobalSnapshot,
    #[serde(default)]
    pub fee_config: Option<FeeConfigSnapshot>,
    #[serde(default)]
    pub bonding_curve: Option<BondingCurveSnapshot>,
    /// Current mint supply; defaults to the curve's `token_total_supply`
    #[serde(default)]
    pub mint_supply: Option<u64>,
    #[serde(default)]
    pub creator: Option<String>,
}

/// Decoded market, ready to quote against
#[derive(Debug, Clone)]
pub struct Market {
    pub quoter: Quoter,
    pub reserves: ReserveState,
    pub is_new_curve: bool,
}

impl MarketSnapshot {
    pub fn to_market(&self) -> Result<Market, SnapshotError> {
        let global = GlobalParams::from(&self.global);
        let fee_source = match &self.fee_config {
            Some(config) => FeeSource::Tiered(config.to_schedule()?),
            None => FeeSource::UseFlatDefault,
        };

        match &self.bonding_curve {
            Some(curve) => {
                let reserves = curve.to_reserves()?;
                let mint_supply = self.mint_supply.unwrap_or(reserves.token_total_supply);
                Ok(Market {
                    quoter: Quoter::new(global, fee_source, mint_supply),
                    reserves,
                    is_new_curve: false,
                })
            }
            None => {
                let creator = match &self.creator {
                    Some(c) => parse_address("creator", c)?,
                    None => Address::ZERO,
                };
                let mut quoter = Quoter::for_new_curve(global, fee_source);
                if let Some(supply) = self.mint_supply {
                    quoter.mint_supply = supply;
                }
                Ok(Market {
                    quoter,
                    reserves: ReserveState::from_global(&global).with_creator(creator),
                    is_new_curve: true,
                })
            }
        }
    }
}

// ============================================================================
// Fee sharing
// ============================================================================

#[derive(Debug, Clone, Deserialize)]
pub struct ShareholderSnapshot {
    pub address: String,
    pub share_bps: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SharingSnapshot {
    pub mint: String,
    pub admin: String,
    #[serde(default)]
    pub admin_revoked: bool,
    pub shareholders: Vec<ShareholderSnapshot>,
}

impl SharingSnapshot {
    pub fn shareholders(&self) -> Result<Vec<Shareholder>, SnapshotError> {
        self.shareholders
            .iter()
            .map(|s| {
                Ok(Shareholder {
                    address: parse_address("shareholders.address", &s.address)?,
                    share_bps: s.share_bps,
                })
            })
            .collect()
    }

    pub fn to_config(&self) -> Result<SharingConfig, SnapshotError> {
        Ok(SharingConfig {
            mint: parse_address("mint", &self.mint)?,
            admin: parse_address("admin", &self.admin)?,
            admin_revoked: self.admin_revoked,
            shareholders: ShareholderList::new(&self.shareholders()?)?,
        })
    }
}

// ============================================================================
// Volume accumulators
// ============================================================================

#[derive(Debug, Clone, Deserialize)]
pub struct GlobalVolumeSnapshot {
    pub start_time: i64,
    pub end_time: i64,
    pub seconds_per_day: i64,
    pub mint: String,
    pub total_token_supply: Vec<u64>,
    pub sol_volumes: Vec<u64>,
}

impl GlobalVolumeSnapshot {
    pub fn to_accumulator(&self) -> Result<GlobalVolumeAccumulator, SnapshotError> {
        Ok(GlobalVolumeAccumulator {
            start_time: self.start_time,
            end_time: self.end_time,
            seconds_per_day: self.seconds_per_day,
            mint: parse_address("global.mint", &self.mint)?,
            total_token_supply: window("global.total_token_supply", &self.total_token_supply)?,
            sol_volumes: window("global.sol_volumes", &self.sol_volumes)?,
        })
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct UserVolumeSnapshot {
    pub user: String,
    #[serde(default)]
    pub needs_claim: bool,
    pub total_unclaimed_tokens: u64,
    pub total_claimed_tokens: u64,
    pub current_sol_volume: u64,
    pub last_update_timestamp: i64,
    #[serde(default)]
    pub cashback_earned: u64,
    #[serde(default)]
    pub total_cashback_claimed: u64,
}

impl UserVolumeSnapshot {
    pub fn to_accumulator(&self) -> Result<UserVolumeAccumulator, SnapshotError> {
        Ok(UserVolumeAccumulator {
            user: parse_address("user.user", &self.user)?,
            needs_claim: self.needs_claim,
            total_unclaimed_tokens: self.total_unclaimed_tokens,
            total_claimed_tokens: self.total_claimed_tokens,
            current_sol_volume: self.current_sol_volume,
            last_update_timestamp: self.last_update_timestamp,
            cashback_earned: self.cashback_earned,
            total_cashback_claimed: self.total_cashback_claimed,
        })
    }
}

/// One program's global/user accumulator pair
#[derive(Debug, Clone, Deserialize)]
pub struct VolumePair {
    pub global: GlobalVolumeSnapshot,
    pub user: UserVolumeSnapshot,
}

impl VolumePair {
    pub fn decode(&self) -> Result<(GlobalVolumeAccumulator, UserVolumeAccumulator), SnapshotError> {
        Ok((self.global.to_accumulator()?, self.user.to_accumulator()?))
    }
}

/// Bonding-curve accumulators, plus the AMM's when the user traded there too
#[derive(Debug, Clone, Deserialize)]
pub struct VolumeSnapshot {
    #[serde(flatten)]
    pub bonding_curve: VolumePair,
    #[serde(default)]
    pub amm: Option<VolumePair>,
}
