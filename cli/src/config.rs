//! CLI configuration: program ids and quoting defaults

use anyhow::{Context, Result};
use serde::Deserialize;
use solana_sdk::pubkey::Pubkey;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Default config location
pub const DEFAULT_CONFIG_PATH: &str = "~/.config/curvekit/config.toml";

/// Bonding curve program (mainnet)
pub const BONDING_CURVE_PROGRAM_ID: &str = "6EF8rrecthR5Dkzon8Nwu78hRvfCKubJ14M5uBEwF6P";
/// Graduated AMM program (mainnet)
pub const AMM_PROGRAM_ID: &str = "pAMMBay6oceH9fJKBRHGP5D4bD4sWpmSwMn52FMfXEA";
/// Fee-sharing program (mainnet)
pub const FEE_PROGRAM_ID: &str = "pfeeUxB6jkeY1Hxd7CsFCAjcbHA9rWtchMGdZ6VojVZ";

/// Default slippage tolerance (1%)
pub const DEFAULT_SLIPPAGE_BPS: u64 = 100;

/// On-disk layout (every field optional)
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    slippage_bps: Option<u64>,
    #[serde(default)]
    programs: ProgramsFile,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ProgramsFile {
    bonding_curve: Option<String>,
    amm: Option<String>,
    fees: Option<String>,
}

pub struct CliConfig {
    pub config_path: Option<PathBuf>,
    pub slippage_bps: u64,
    pub bonding_curve_program_id: Pubkey,
    pub amm_program_id: Pubkey,
    pub fee_program_id: Pubkey,
}

impl CliConfig {
    /// Load config from `path` (or the default location), then apply flag overrides
    ///
    /// A missing file at the default location means built-in defaults; a
    /// missing file at an explicit path is an error.
    pub fn new(path: Option<PathBuf>, slippage_bps: Option<u64>) -> Result<Self> {
        let (file, config_path) = match path {
            Some(path) => {
                let path = expand(&path)?;
                (load_config_file(&path)?, Some(path))
            }
            None => {
                let path = expand(Path::new(DEFAULT_CONFIG_PATH))?;
                if path.exists() {
                    (load_config_file(&path)?, Some(path))
                } else {
                    log::debug!("no config at {}, using defaults", path.display());
                    (ConfigFile::default(), None)
                }
            }
        };

        let slippage_bps = slippage_bps
            .or(file.slippage_bps)
            .unwrap_or(DEFAULT_SLIPPAGE_BPS);
        if slippage_bps > 10_000 {
            anyhow::bail!("Slippage must be at most 10000 bps, got {}", slippage_bps);
        }

        Ok(Self {
            config_path,
            slippage_bps,
            bonding_curve_program_id: parse_program_id(
                "bonding_curve",
                file.programs.bonding_curve.as_deref(),
                BONDING_CURVE_PROGRAM_ID,
            )?,
            amm_program_id: parse_program_id("amm", file.programs.amm.as_deref(), AMM_PROGRAM_ID)?,
            fee_program_id: parse_program_id("fees", file.programs.fees.as_deref(), FEE_PROGRAM_ID)?,
        })
    }
}

fn expand(path: &Path) -> Result<PathBuf> {
    let raw = path.to_string_lossy();
    let expanded = shellexpand::full(&raw)
        .with_context(|| format!("Failed to expand config path: {}", raw))?;
    Ok(PathBuf::from(expanded.into_owned()))
}

/// Read and parse a TOML config file
fn load_config_file(path: &Path) -> Result<ConfigFile> {
    if !path.exists() {
        anyhow::bail!("Config file not found: {}", path.display());
    }

    let data = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    toml::from_str(&data).with_context(|| format!("Failed to parse config TOML: {}", path.display()))
}

fn parse_program_id(name: &str, configured: Option<&str>, default: &str) -> Result<Pubkey> {
    let value = configured.unwrap_or(default);
    Pubkey::from_str(value).with_context(|| format!("Invalid {} program ID: {}", name, value))
}
