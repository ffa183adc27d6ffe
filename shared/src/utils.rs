//! # Shared Utility Functions
//!
//! Common helpers used by the wallet core and the dashboard.
//!
//! ## Address Handling
//!
//! - [`short_address`] - Shorten an address to `0x1234…abcd`
//! - [`is_valid_evm_address`] - `0x` followed by exactly 40 hex characters
//!
//! ## Amount Formatting
//!
//! - [`format_units`] - Scale an integer amount by `10^decimals` for display
//!
//! ## Usage
//!
//! ```rust
//! use shared::utils::{format_units, short_address};
//!
//! assert_eq!(format_units("1000000000000000000", 18), "1");
//! assert_eq!(short_address(Some("0x1234567890abcdef1234567890abcdef12345678")), "0x1234…5678");
//! ```

/// Maximum fractional digits shown for a token amount.
pub const MAX_DISPLAY_DECIMALS: usize = 6;

/// Placeholder shown for absent values.
pub const EMPTY_PLACEHOLDER: &str = "—";

/// Format an integer token amount (decimal digit string) as a human amount.
///
/// The amount is divided by `10^decimals`, the fraction is **truncated** (never
/// rounded) to [`MAX_DISPLAY_DECIMALS`] digits, and trailing zero fraction
/// digits are stripped. No thousands separators are inserted.
///
/// # Examples
///
/// ```rust
/// use shared::utils::format_units;
///
/// assert_eq!(format_units("1234500000000000000", 18), "1.2345");
/// assert_eq!(format_units("1000000000000000000", 18), "1");
/// assert_eq!(format_units("1999999999", 9), "1.999999");
/// assert_eq!(format_units("0", 6), "0");
/// ```
pub fn format_units(raw: &str, decimals: u8) -> String {
    let decimals = decimals as usize;
    let digits = raw.trim().trim_start_matches('0');

    // Left-pad so there is always at least one integer digit
    let padded = if digits.len() <= decimals {
        format!("{:0>width$}", digits, width = decimals + 1)
    } else {
        digits.to_string()
    };

    let (integer_part, fractional_part) = padded.split_at(padded.len() - decimals);
    let shown = &fractional_part[..decimals.min(MAX_DISPLAY_DECIMALS)];
    let shown = shown.trim_end_matches('0');

    if shown.is_empty() {
        integer_part.to_string()
    } else {
        format!("{}.{}", integer_part, shown)
    }
}

/// Shorten an address to `left` leading and `right` trailing characters.
///
/// Returns [`EMPTY_PLACEHOLDER`] for `None` or blank input, and the address
/// unchanged when it is too short to shorten.
pub fn format_address(address: Option<&str>, left: usize, right: usize) -> String {
    let address = match address.map(str::trim) {
        Some(addr) if !addr.is_empty() => addr,
        _ => return EMPTY_PLACEHOLDER.to_string(),
    };

    // EVM addresses are ASCII, byte slicing is safe once lengths are checked
    if !address.is_ascii() || address.len() <= left + right {
        return address.to_string();
    }

    format!("{}…{}", &address[..left], &address[address.len() - right..])
}

/// Shorten an address with the default 6/4 split: `0x1234…abcd`.
pub fn short_address(address: Option<&str>) -> String {
    format_address(address, 6, 4)
}

/// `true` if `address` is `0x` followed by exactly 40 hexadecimal characters.
///
/// Checksum casing is not verified; mixed case is accepted.
pub fn is_valid_evm_address(address: &str) -> bool {
    match address.strip_prefix("0x") {
        Some(hex) => hex.len() == 40 && hex.chars().all(|c| c.is_ascii_hexdigit()),
        None => false,
    }
}

/// Parse a `0x`-prefixed hex chain id into its decimal value.
///
/// ```rust
/// use shared::utils::parse_chain_id;
///
/// assert_eq!(parse_chain_id("0x1"), Some(1));
/// assert_eq!(parse_chain_id("0x89"), Some(137));
/// assert_eq!(parse_chain_id("banana"), None);
/// ```
pub fn parse_chain_id(chain_id_hex: &str) -> Option<u64> {
    let trimmed = chain_id_hex.trim();
    let hex = trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))?;
    if hex.is_empty() {
        return None;
    }
    u64::from_str_radix(hex, 16).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_units_strips_trailing_zeros() {
        assert_eq!(format_units("1234500000000000000", 18), "1.2345");
        assert_eq!(format_units("1000000000000000000", 18), "1");
        assert_eq!(format_units("2500000", 6), "2.5");
    }

    #[test]
    fn test_format_units_truncates_without_rounding() {
        // 0.9999999 would round to 1.0; truncation keeps 0.999999
        assert_eq!(format_units("999999900000000000", 18), "0.999999");
        assert_eq!(format_units("1123456789", 9), "1.123456");
    }

    #[test]
    fn test_format_units_small_and_zero() {
        assert_eq!(format_units("0", 18), "0");
        assert_eq!(format_units("1", 18), "0");
        assert_eq!(format_units("1000000000000", 18), "0.000001");
        assert_eq!(format_units("42", 0), "42");
        assert_eq!(format_units("", 0), "0");
    }

    #[test]
    fn test_format_units_large_values() {
        assert_eq!(
            format_units("115792089237316195423570985008687907853269984665640564039457584007913129639935", 18),
            "115792089237316195423570985008687907853269984665640564039457.584007"
        );
    }

    #[test]
    fn test_short_address() {
        let addr = "0x1234567890abcdef1234567890abcdef12345678";
        assert_eq!(short_address(Some(addr)), "0x1234…5678");
        assert_eq!(format_address(Some(addr), 4, 2), "0x12…78");
        assert_eq!(short_address(None), "—");
        assert_eq!(short_address(Some("  ")), "—");
        assert_eq!(short_address(Some("0xabc")), "0xabc");
    }

    #[test]
    fn test_address_validation() {
        assert!(is_valid_evm_address("0xA0b86991c6218b36c1d19d4a2e9eb0ce3606eb48"));
        assert!(!is_valid_evm_address("A0b86991c6218b36c1d19d4a2e9eb0ce3606eb48"));
        assert!(!is_valid_evm_address("0xA0b86991c6218b36c1d19d4a2e9eb0ce3606eb4"));
        assert!(!is_valid_evm_address("0xZ0b86991c6218b36c1d19d4a2e9eb0ce3606eb48"));
        assert!(!is_valid_evm_address(""));
    }

    #[test]
    fn test_parse_chain_id() {
        assert_eq!(parse_chain_id("0x1"), Some(1));
        assert_eq!(parse_chain_id("0x89"), Some(137));
        assert_eq!(parse_chain_id("0xaa36a7"), Some(11155111));
        assert_eq!(parse_chain_id("0x"), None);
        assert_eq!(parse_chain_id("137"), None);
    }
}
