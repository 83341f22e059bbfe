//! Volume incentives: unclaimed tokens, today's accrual, cashback

use std::path::Path;

use anyhow::{Context, Result};
use chrono::{TimeZone, Utc};
use colored::Colorize;
use curve_model::{
    current_day_tokens, current_day_volume, GlobalVolumeAccumulator, UserVolumeAccumulator,
    UserVolumeTotals,
};

use crate::display::{field, format_address, format_sol, format_tokens};
use crate::snapshot::{self, VolumeSnapshot};

fn format_ts(ts: i64) -> String {
    match Utc.timestamp_opt(ts, 0).single() {
        Some(dt) => dt.format("%Y-%m-%d %H:%M:%S UTC").to_string(),
        None => ts.to_string(),
    }
}

fn print_program(
    label: &str,
    global: &GlobalVolumeAccumulator,
    user: &UserVolumeAccumulator,
    now: i64,
) -> Result<UserVolumeTotals> {
    println!("\n{}", label.bright_white().bold());
    if !global.is_configured() {
        println!("  {}", "No incentive campaign configured".dimmed());
    } else {
        field("  Campaign", format!("{} .. {}", format_ts(global.start_time), format_ts(global.end_time)));
        let status = if global.is_active(now) { "active".bright_green() } else { "inactive".yellow() };
        field("  Status", status);
        if let Some(day) = global.day_index(now) {
            field("  Day", day);
        }
    }

    let totals = UserVolumeTotals::from_accumulator(global, user, now)
        .context("unclaimed tokens failed")?;
    let today = current_day_tokens(global, user, now).context("current day tokens failed")?;
    let cashback = user
        .claimable_cashback()
        .context("cashback failed")?;

    field("  Unclaimed tokens", format_tokens(totals.total_unclaimed_tokens));
    field("  Claimed tokens", format_tokens(totals.total_claimed_tokens));
    field("  Today's volume", format_sol(current_day_volume(global, user, now)));
    field("  Accruing today", format_tokens(today));
    field("  Claimable cashback", format_sol(cashback));
    field("  Closable", user.can_close());
    Ok(totals)
}

pub async fn show_incentives(volume_path: &Path, now: i64) -> Result<()> {
    let snapshot: VolumeSnapshot = snapshot::load(volume_path).await?;
    let (global, user) = snapshot.bonding_curve.decode()?;
    log::debug!("incentives as of {}", now);

    println!("{}", "=== Volume Incentives ===".bright_green().bold());
    field("User", format_address(&user.user));
    field("As of", format_ts(now));

    let mut totals = print_program("Bonding curve", &global, &user, now)?;

    if let Some(amm) = &snapshot.amm {
        let (amm_global, amm_user) = amm.decode()?;
        let amm_totals = print_program("AMM", &amm_global, &amm_user, now)?;
        totals = totals
            .combine(&amm_totals)
            .context("totals failed")?;

        println!("\n{}", "Combined".bright_white().bold());
        field("  Unclaimed tokens", format_tokens(totals.total_unclaimed_tokens));
        field("  Claimed tokens", format_tokens(totals.total_claimed_tokens));
        field("  SOL volume", format_sol(totals.current_sol_volume));
    }
    Ok(())
}
