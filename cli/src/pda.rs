//! Program-derived account addresses

use std::str::FromStr;

use anyhow::{Context, Result};
use colored::Colorize;
use solana_sdk::pubkey::Pubkey;

use crate::config::CliConfig;
use crate::display::field;

pub const GLOBAL_SEED: &[u8] = b"global";
pub const AMM_GLOBAL_SEED: &[u8] = b"amm_global";
pub const BONDING_CURVE_SEED: &[u8] = b"bonding-curve";
pub const CREATOR_VAULT_SEED: &[u8] = b"creator-vault";
pub const AMM_CREATOR_VAULT_SEED: &[u8] = b"creator_vault";
pub const POOL_AUTHORITY_SEED: &[u8] = b"pool-authority";
pub const FEE_CONFIG_SEED: &[u8] = b"fee_config";
pub const SHARING_CONFIG_SEED: &[u8] = b"sharing-config";
pub const GLOBAL_VOLUME_ACCUMULATOR_SEED: &[u8] = b"global_volume_accumulator";
pub const USER_VOLUME_ACCUMULATOR_SEED: &[u8] = b"user_volume_accumulator";
pub const EVENT_AUTHORITY_SEED: &[u8] = b"__event_authority";

/// Canonical PDA (bump discarded)
pub fn derive(seeds: &[&[u8]], program_id: &Pubkey) -> Pubkey {
    Pubkey::find_program_address(seeds, program_id).0
}

/// Address derivation bound to the configured program ids
pub struct Pdas<'a> {
    config: &'a CliConfig,
}

impl<'a> Pdas<'a> {
    pub fn new(config: &'a CliConfig) -> Self {
        Self { config }
    }

    pub fn global(&self) -> Pubkey {
        derive(&[GLOBAL_SEED], &self.config.bonding_curve_program_id)
    }

    pub fn amm_global(&self) -> Pubkey {
        derive(&[AMM_GLOBAL_SEED], &self.config.amm_program_id)
    }

    pub fn bonding_curve(&self, mint: &Pubkey) -> Pubkey {
        derive(&[BONDING_CURVE_SEED, mint.as_ref()], &self.config.bonding_curve_program_id)
    }

    pub fn creator_vault(&self, creator: &Pubkey) -> Pubkey {
        derive(&[CREATOR_VAULT_SEED, creator.as_ref()], &self.config.bonding_curve_program_id)
    }

    /// Creator vault on the AMM, used after graduation
    pub fn amm_creator_vault(&self, creator: &Pubkey) -> Pubkey {
        derive(&[AMM_CREATOR_VAULT_SEED, creator.as_ref()], &self.config.amm_program_id)
    }

    pub fn pool_authority(&self, mint: &Pubkey) -> Pubkey {
        derive(&[POOL_AUTHORITY_SEED, mint.as_ref()], &self.config.bonding_curve_program_id)
    }

    /// Fee config owned by the fee program for the bonding-curve program
    pub fn fee_config(&self) -> Pubkey {
        derive(
            &[FEE_CONFIG_SEED, self.config.bonding_curve_program_id.as_ref()],
            &self.config.fee_program_id,
        )
    }

    /// Fee config owned by the fee program for the AMM
    pub fn amm_fee_config(&self) -> Pubkey {
        derive(
            &[FEE_CONFIG_SEED, self.config.amm_program_id.as_ref()],
            &self.config.fee_program_id,
        )
    }

    pub fn sharing_config(&self, mint: &Pubkey) -> Pubkey {
        derive(&[SHARING_CONFIG_SEED, mint.as_ref()], &self.config.fee_program_id)
    }

    pub fn global_volume_accumulator(&self) -> Pubkey {
        derive(&[GLOBAL_VOLUME_ACCUMULATOR_SEED], &self.config.bonding_curve_program_id)
    }

    pub fn amm_global_volume_accumulator(&self) -> Pubkey {
        derive(&[GLOBAL_VOLUME_ACCUMULATOR_SEED], &self.config.amm_program_id)
    }

    pub fn user_volume_accumulator(&self, user: &Pubkey) -> Pubkey {
        derive(&[USER_VOLUME_ACCUMULATOR_SEED, user.as_ref()], &self.config.bonding_curve_program_id)
    }

    pub fn amm_user_volume_accumulator(&self, user: &Pubkey) -> Pubkey {
        derive(&[USER_VOLUME_ACCUMULATOR_SEED, user.as_ref()], &self.config.amm_program_id)
    }

    pub fn event_authority(&self, program_id: &Pubkey) -> Pubkey {
        derive(&[EVENT_AUTHORITY_SEED], program_id)
    }
}

fn parse_key(label: &str, value: &str) -> Result<Pubkey> {
    Pubkey::from_str(value).with_context(|| format!("Invalid {} address: {}", label, value))
}

/// Print program-wide addresses plus those for any given mint, creator or user
pub fn show_pdas(
    config: &CliConfig,
    mint: Option<&str>,
    creator: Option<&str>,
    user: Option<&str>,
) -> Result<()> {
    let pdas = Pdas::new(config);

    println!("{}", "=== Program Addresses ===".bright_green().bold());
    field("Global", pdas.global());
    field("AMM global", pdas.amm_global());
    field("Fee config", pdas.fee_config());
    field("AMM fee config", pdas.amm_fee_config());
    field("Global volume accumulator", pdas.global_volume_accumulator());
    field("AMM global volume accumulator", pdas.amm_global_volume_accumulator());
    field("Event authority", pdas.event_authority(&config.bonding_curve_program_id));

    if let Some(mint) = mint {
        let mint = parse_key("mint", mint)?;
        println!("\n{} {}", "Mint".bright_white().bold(), mint);
        field("Bonding curve", pdas.bonding_curve(&mint));
        field("Pool authority", pdas.pool_authority(&mint));
        field("Sharing config", pdas.sharing_config(&mint));
    }
    if let Some(creator) = creator {
        let creator = parse_key("creator", creator)?;
        println!("\n{} {}", "Creator".bright_white().bold(), creator);
        field("Creator vault", pdas.creator_vault(&creator));
        field("AMM creator vault", pdas.amm_creator_vault(&creator));
    }
    if let Some(user) = user {
        let user = parse_key("user", user)?;
        println!("\n{} {}", "User".bright_white().bold(), user);
        field("User volume accumulator", pdas.user_volume_accumulator(&user));
        field("AMM user volume accumulator", pdas.amm_user_volume_accumulator(&user));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> CliConfig {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "").unwrap();
        CliConfig::new(Some(path), None).unwrap()
    }

    #[test]
    fn test_derive_matches_find_program_address() {
        let program = Pubkey::new_unique();
        let mint = Pubkey::new_unique();
        let (expected, _bump) =
            Pubkey::find_program_address(&[BONDING_CURVE_SEED, mint.as_ref()], &program);
        assert_eq!(derive(&[BONDING_CURVE_SEED, mint.as_ref()], &program), expected);
    }

    #[test]
    fn test_pdas_are_off_curve_and_distinct() {
        let config = config();
        let pdas = Pdas::new(&config);
        let key = Pubkey::new_unique();

        let all = [
            pdas.global(),
            pdas.amm_global(),
            pdas.bonding_curve(&key),
            pdas.creator_vault(&key),
            pdas.amm_creator_vault(&key),
            pdas.pool_authority(&key),
            pdas.fee_config(),
            pdas.amm_fee_config(),
            pdas.sharing_config(&key),
            pdas.global_volume_accumulator(),
            pdas.amm_global_volume_accumulator(),
            pdas.user_volume_accumulator(&key),
            pdas.amm_user_volume_accumulator(&key),
            pdas.event_authority(&config.bonding_curve_program_id),
        ];
        for (i, a) in all.iter().enumerate() {
            assert!(!a.is_on_curve());
            for b in &all[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn test_derivation_is_stable() {
        let config = config();
        let pdas = Pdas::new(&config);
        let mint = Pubkey::new_unique();
        assert_eq!(pdas.bonding_curve(&mint), pdas.bonding_curve(&mint));
        assert_ne!(pdas.bonding_curve(&mint), pdas.bonding_curve(&Pubkey::new_unique()));
    }
}
