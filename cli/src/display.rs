//! Formatting helpers for terminal reports

use colored::Colorize;
use curve_model::{Address, LAMPORTS_PER_SOL, ONE_TOKEN};
use solana_sdk::pubkey::Pubkey;

/// Format lamports as SOL, exact to the lamport
pub fn format_sol(lamports: u64) -> String {
    format!("{}.{:09} SOL", lamports / LAMPORTS_PER_SOL, lamports % LAMPORTS_PER_SOL)
}

/// Format a u128 lamport amount (market caps) as SOL
pub fn format_sol_wide(lamports: u128) -> String {
    let per = LAMPORTS_PER_SOL as u128;
    format!("{}.{:09} SOL", lamports / per, lamports % per)
}

/// Format raw token units as whole tokens (6 decimals)
pub fn format_tokens(raw: u64) -> String {
    format!("{}.{:06}", raw / ONE_TOKEN, raw % ONE_TOKEN)
}

/// Basis points as a percentage
pub fn format_bps(bps: u64) -> String {
    format!("{} bps ({}.{:02}%)", bps, bps / 100, bps % 100)
}

/// Pretty print a pubkey as shortened address
pub fn format_pubkey(pubkey: &Pubkey) -> String {
    let addr = pubkey.to_string();
    format!("{}...{}", &addr[0..8], &addr[addr.len() - 8..]).bright_yellow().to_string()
}

pub fn format_address(address: &Address) -> String {
    if address.is_zero() {
        return "none".dimmed().to_string();
    }
    format_pubkey(&Pubkey::new_from_array(address.to_bytes()))
}

/// One `label value` line
pub fn field(label: &str, value: impl std::fmt::Display) {
    println!("{} {}", format!("{}:", label).bright_cyan(), value);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_sol_exact() {
        assert_eq!(format_sol(0), "0.000000000 SOL");
        assert_eq!(format_sol(1_000_000_001), "1.000000001 SOL");
        assert_eq!(format_sol_wide(27_958_993_476), "27.958993476 SOL");
    }

    #[test]
    fn test_format_tokens_and_bps() {
        assert_eq!(format_tokens(34_281_150_096_027), "34281150.096027");
        assert_eq!(format_bps(125), "125 bps (1.25%)");
    }

    #[test]
    fn test_format_pubkey_shortens() {
        colored::control::set_override(false);
        let key = Pubkey::new_unique();
        let s = format_pubkey(&key);
        assert_eq!(s.len(), 19);
        assert!(key.to_string().starts_with(&s[..8]));
    }

    #[test]
    fn test_model_errors_keep_their_source() {
        use anyhow::Context;
        use curve_model::CurveError;

        let failed: Result<(), CurveError> = Err(CurveError::Overflow);
        let err = failed.context("buy quote failed").unwrap_err();
        assert_eq!(err.to_string(), "buy quote failed");
        assert_eq!(err.downcast_ref::<CurveError>(), Some(&CurveError::Overflow));
        assert_eq!(err.chain().count(), 2);
    }
}
