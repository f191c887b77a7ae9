/// Output formatting: base-unit conversion and display helpers.
///
/// The ledger's native unit is scaled at 10^18 base units (wei) per unit.
use chrono::{Local, LocalResult, TimeZone};
use ethers::types::U256;
use ethers::utils::parse_ether;

use crate::controller::TransferRecord;

/// Truncate an address for display: first 5 characters, a literal ellipsis,
/// last 4. Absent addresses render as the empty string. No well-formedness
/// check; anything shorter than 9 characters passes through unchanged.
#[must_use]
pub fn shorten_address(address: Option<&str>) -> String {
    match address {
        None => String::new(),
        Some(a) => {
            let chars: Vec<char> = a.chars().collect();
            if chars.len() < 9 {
                return a.to_string();
            }
            let head: String = chars[..5].iter().collect();
            let tail: String = chars[chars.len() - 4..].iter().collect();
            format!("{head}...{tail}")
        }
    }
}

/// Parse a human-readable amount string into base units.
/// Accepts: "1.5" -> 1_500_000_000_000_000_000, "1" -> 10^18, "0.001" -> 10^15
#[must_use = "parsing result should be checked"]
pub fn parse_amount(input: &str) -> Result<U256, String> {
    let input = input.trim();

    if input.is_empty() {
        return Err("Amount cannot be empty".to_string());
    }
    if input.starts_with('-') {
        return Err("Amount must be positive".to_string());
    }

    parse_ether(input).map_err(|e| format!("Invalid amount '{input}': {e}"))
}

/// Convert base units to the decimal display value.
/// Precision beyond what f64 carries is lost; this is display-only.
#[must_use]
pub fn wei_to_display(wei: U256) -> f64 {
    let unit = U256::exp10(18);
    let whole = (wei / unit).min(U256::from(u64::MAX)).as_u64() as f64;
    let frac = (wei % unit).as_u128() as f64 / 1e18;
    whole + frac
}

/// Format base units as a trimmed decimal string.
/// Examples: 10^18 -> "1", 1_500_000_000_000_000_000 -> "1.5", 0 -> "0"
#[must_use]
pub fn format_wei(wei: U256) -> String {
    let unit = U256::exp10(18);
    let whole = wei / unit;
    let frac = (wei % unit).as_u128();
    let frac_str = format!("{frac:018}");
    let trimmed = frac_str.trim_end_matches('0');
    if trimmed.is_empty() {
        format!("{whole}")
    } else {
        format!("{whole}.{trimmed}")
    }
}

/// Render a seconds-since-epoch timestamp as a localized date string.
#[must_use]
pub fn format_timestamp(secs: u64) -> String {
    match Local.timestamp_opt(secs as i64, 0) {
        LocalResult::Single(dt) => dt.format("%-m/%-d/%Y").to_string(),
        _ => secs.to_string(),
    }
}

/// Format the transfer list for display, newest-last as the ledger returns it.
#[must_use]
pub fn format_transfers(records: &[TransferRecord]) -> String {
    if records.is_empty() {
        return "No transfers found.".to_string();
    }

    let mut lines = Vec::with_capacity(records.len());
    for r in records {
        let keyword = if r.keyword.is_empty() {
            String::new()
        } else {
            format!("  [{}]", r.keyword)
        };
        lines.push(format!(
            "{}  ->  {}  {}  {}{}  {}",
            shorten_address(Some(&r.address_from)),
            shorten_address(Some(&r.address_to)),
            r.amount,
            r.timestamp,
            keyword,
            r.message,
        ));
    }
    lines.join("\n")
}
