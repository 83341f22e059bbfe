//! Creator fee-sharing: distribution plans and share updates

use std::path::Path;

use anyhow::{Context, Result};
use colored::Colorize;
use curve_model::{distribute, Shareholder, SharingConfig};

use crate::display::{field, format_address, format_bps, format_sol};
use crate::snapshot::{self, parse_address, SharingSnapshot};

async fn load_config(path: &Path) -> Result<SharingConfig> {
    let snapshot: SharingSnapshot = snapshot::load(path).await?;
    Ok(snapshot.to_config()?)
}

/// Parse `ADDRESS:BPS`
pub fn parse_shareholder(arg: &str) -> Result<Shareholder> {
    let (address, bps) = arg
        .split_once(':')
        .with_context(|| format!("Expected ADDRESS:BPS, got {}", arg))?;
    Ok(Shareholder {
        address: parse_address("shareholder", address)?,
        share_bps: bps
            .parse()
            .with_context(|| format!("Invalid share bps: {}", bps))?,
    })
}

/// Split a creator-vault balance across the configured shareholders
pub async fn show_distribution(sharing_path: &Path, vault_lamports: u64, minimum: u64) -> Result<()> {
    let config = load_config(sharing_path).await?;

    println!("{}", "=== Fee Distribution ===".bright_green().bold());
    field("Mint", format_address(&config.mint));
    field("Vault balance", format_sol(vault_lamports));

    let plan = distribute(vault_lamports, &config.shareholders)
        .context("distribution failed")?;

    println!();
    for (holder, payout) in config.shareholders.as_slice().iter().zip(plan.payouts.iter()) {
        println!(
            "  {}  {:>20}  {}",
            format_address(&payout.address),
            format_bps(holder.share_bps as u64),
            format_sol(payout.amount)
        );
    }
    println!();
    field("Distributed", format_sol(plan.distributed()));
    field("Left in vault", format_sol(plan.remainder));

    if plan.can_distribute(minimum) {
        println!("{}", "Distribution can proceed".bright_green());
    } else {
        println!(
            "{} {}",
            "Below minimum distributable amount:".yellow(),
            format_sol(minimum)
        );
    }
    Ok(())
}

/// Dry-run a share update: checks authority and the new list
pub async fn check_update(sharing_path: &Path, signer: &str, shares: &[String]) -> Result<()> {
    let mut config = load_config(sharing_path).await?;
    let signer = parse_address("signer", signer)?;
    let shareholders = shares
        .iter()
        .map(|s| parse_shareholder(s))
        .collect::<Result<Vec<_>>>()?;

    println!("{}", "=== Update Shares ===".bright_green().bold());
    field("Admin", format_address(&config.admin));
    field("Signer", format_address(&signer));

    config
        .update_shares(&signer, &shareholders)
        .context("share update failed")?;

    for holder in config.shareholders.as_slice() {
        println!("  {}  {}", format_address(&holder.address), format_bps(holder.share_bps as u64));
    }
    println!("\n{}", "Update is valid".bright_green());
    Ok(())
}
