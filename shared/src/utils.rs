//! # Shared Utility Functions
//!
//! Display helpers used by the client and the server logs.
//!
//! - [`format_balance`] - Group a decimal balance string into thousands
//! - [`mask_address`] - Shorten a wallet address for display
//! - [`parse_amount`] / [`format_amount`] - Decimal strings to and from paisa
//!
//! ```rust
//! use shared::utils::{format_balance, mask_address};
//!
//! assert_eq!(format_balance("1234567.5", "NPR"), "NPR 1,234,567.50");
//! assert_eq!(mask_address("0x8W6QginkhTTxoP2deQjq7rZ9", 6, 4), "0x8W6Q...7rZ9");
//! ```

/// Format a decimal balance string with thousands separators and two decimals.
///
/// Input that is not a plain decimal number (`"abc"`, `""`) is returned unchanged
/// after the currency prefix so the UI never hides the raw value.
pub fn format_balance(raw: &str, currency: &str) -> String {
    let trimmed = raw.trim();
    let (negative, digits) = match trimmed.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, trimmed),
    };

    let (whole, fraction) = digits.split_once('.').unwrap_or((digits, ""));
    let valid = !whole.is_empty()
        && whole.chars().all(|c| c.is_ascii_digit())
        && fraction.chars().all(|c| c.is_ascii_digit());
    if !valid {
        return format!("{} {}", currency, trimmed);
    }

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, c) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }

    // Truncate, never round: balances are displayed, not computed
    let mut cents: String = fraction.chars().take(2).collect();
    while cents.len() < 2 {
        cents.push('0');
    }

    let sign = if negative { "-" } else { "" };
    format!("{} {}{}.{}", currency, sign, grouped, cents)
}

/// Shorten an address to its first `prefix_len` and last `suffix_len` characters.
///
/// Addresses too short to shorten are returned as-is.
pub fn mask_address(address: &str, prefix_len: usize, suffix_len: usize) -> String {
    let chars: Vec<char> = address.chars().collect();
    if chars.len() <= prefix_len + suffix_len {
        return address.to_string();
    }

    let prefix: String = chars[..prefix_len].iter().collect();
    let suffix: String = chars[chars.len() - suffix_len..].iter().collect();
    format!("{}...{}", prefix, suffix)
}

/// Paisa per rupee.
const MINOR_UNITS: i64 = 100;

/// Parse a positive decimal amount (`"250"`, `"250.5"`, `"250.50"`) into paisa.
///
/// Returns `None` for zero, negative, malformed or more than two fraction digits.
pub fn parse_amount(raw: &str) -> Option<i64> {
    let (whole, fraction) = raw.trim().split_once('.').unwrap_or((raw.trim(), ""));
    if whole.is_empty()
        || fraction.len() > 2
        || !whole.chars().all(|c| c.is_ascii_digit())
        || !fraction.chars().all(|c| c.is_ascii_digit())
    {
        return None;
    }

    let whole: i64 = whole.parse().ok()?;
    let fraction: i64 = match fraction.len() {
        0 => 0,
        1 => fraction.parse::<i64>().ok()? * 10,
        _ => fraction.parse().ok()?,
    };

    let paisa = whole.checked_mul(MINOR_UNITS)?.checked_add(fraction)?;
    (paisa > 0).then_some(paisa)
}

/// Render paisa as a decimal string with two fraction digits.
pub fn format_amount(paisa: i64) -> String {
    let sign = if paisa < 0 { "-" } else { "" };
    let abs = paisa.unsigned_abs();
    format!("{}{}.{:02}", sign, abs / MINOR_UNITS as u64, abs % MINOR_UNITS as u64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_balance_groups_thousands() {
        assert_eq!(format_balance("5000", "NPR"), "NPR 5,000.00");
        assert_eq!(format_balance("1234567.891", "NPR"), "NPR 1,234,567.89");
        assert_eq!(format_balance("999", "USD"), "USD 999.00");
        assert_eq!(format_balance("-1500.5", "NPR"), "NPR -1,500.50");
    }

    #[test]
    fn test_format_balance_passes_through_garbage() {
        assert_eq!(format_balance("abc", "NPR"), "NPR abc");
        assert_eq!(format_balance("", "NPR"), "NPR ");
    }

    #[test]
    fn test_mask_address() {
        assert_eq!(mask_address("0x1234567890abcdef", 4, 4), "0x12...cdef");
        assert_eq!(mask_address("short", 4, 4), "short");
    }

    #[test]
    fn test_parse_amount() {
        assert_eq!(parse_amount("250"), Some(25_000));
        assert_eq!(parse_amount("250.5"), Some(25_050));
        assert_eq!(parse_amount(" 0.01 "), Some(1));
        assert_eq!(parse_amount("0"), None);
        assert_eq!(parse_amount("-5"), None);
        assert_eq!(parse_amount("1.234"), None);
        assert_eq!(parse_amount("abc"), None);
        assert_eq!(parse_amount(""), None);
        assert_eq!(parse_amount("99999999999999999999"), None);
    }

    #[test]
    fn test_format_amount() {
        assert_eq!(format_amount(500_000), "5000.00");
        assert_eq!(format_amount(25_050), "250.50");
        assert_eq!(format_amount(7), "0.07");
        assert_eq!(format_amount(-150), "-1.50");
    }
}
