//! Amount list parsing and aggregation
//!
//! Two views over the same comma/newline delimited text:
//!
//! - [`calculate_total`] is forgiving. It never fails and silently drops tokens
//!   that do not start with a number. It drives the "tokens needed" display.
//! - [`parse_units`] is strict. It converts one entry into the token's
//!   smallest-unit integer and rejects anything that cannot be encoded as a
//!   `uint256`. It is used when a transaction intent is built.

use alloy_primitives::utils::{format_units as alloy_format_units, parse_units as alloy_parse_units};
use alloy_primitives::U256;

use crate::error::{AirdropError, Result};

/// Split a list on any run of commas and/or newlines.
///
/// Entries are trimmed and empty entries are dropped, so `",,\n"` yields
/// nothing and `"a,\n\nb"` yields `["a", "b"]`.
pub fn split_entries(text: &str) -> Vec<&str> {
    text.split(|c| c == ',' || c == '\n')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .collect()
}

/// Sum every entry of an amount list that starts with a number.
///
/// Entries are parsed with [`numeric_prefix`]; entries without a numeric
/// prefix are ignored rather than reported. Negative values are summed as is.
/// Empty, whitespace-only and delimiter-only input yields `0.0`.
pub fn calculate_total(amounts: &str) -> f64 {
    if amounts.trim().is_empty() {
        return 0.0;
    }

    split_entries(amounts)
        .into_iter()
        .filter_map(numeric_prefix)
        .fold(0.0, |sum, value| sum + value)
}

/// Parse the longest numeric prefix of `token`.
///
/// Accepts an optional sign, digits with an optional fraction, and an
/// exponent when it is followed by at least one digit. `"100abc"` gives
/// `Some(100.0)`, `"1e2"` gives `Some(100.0)`, `"def300"` gives `None`.
pub fn numeric_prefix(token: &str) -> Option<f64> {
    let s = token.trim_start();
    let bytes = s.as_bytes();

    let mut end = 0;
    if matches!(bytes.first(), Some(b'+') | Some(b'-')) {
        end = 1;
    }

    if s[end..].starts_with("Infinity") {
        return Some(if bytes[0] == b'-' {
            f64::NEG_INFINITY
        } else {
            f64::INFINITY
        });
    }

    let int_digits = count_digits(&bytes[end..]);
    end += int_digits;

    let mut frac_digits = 0;
    if bytes.get(end) == Some(&b'.') {
        frac_digits = count_digits(&bytes[end + 1..]);
        end += 1 + frac_digits;
    }

    if int_digits == 0 && frac_digits == 0 {
        return None;
    }

    if matches!(bytes.get(end), Some(b'e') | Some(b'E')) {
        let mut exp_end = end + 1;
        if matches!(bytes.get(exp_end), Some(b'+') | Some(b'-')) {
            exp_end += 1;
        }
        let exp_digits = count_digits(&bytes[exp_end..]);
        if exp_digits > 0 {
            end = exp_end + exp_digits;
        }
    }

    s[..end].parse::<f64>().ok()
}

fn count_digits(bytes: &[u8]) -> usize {
    bytes.iter().take_while(|b| b.is_ascii_digit()).count()
}

/// Convert a decimal amount into the token's smallest unit.
///
/// The whole entry must be a plain non-negative decimal number. Digits beyond
/// the token's precision are floored away.
pub fn parse_units(amount: &str, decimals: u8) -> Result<U256> {
    let text = amount.trim();
    let invalid = || AirdropError::InvalidInput(format!("invalid amount '{}'", text));
    let overflow = || AirdropError::InvalidInput(format!("amount '{}' does not fit in uint256", text));

    if text.starts_with('-') {
        return Err(AirdropError::InvalidInput(format!("negative amount '{}'", text)));
    }
    let unsigned = text.strip_prefix('+').unwrap_or(text);

    let (whole, fraction) = unsigned.split_once('.').unwrap_or((unsigned, ""));
    let is_digits = |part: &str| part.bytes().all(|b| b.is_ascii_digit());
    if (whole.is_empty() && fraction.is_empty()) || !is_digits(whole) || !is_digits(fraction) {
        return Err(invalid());
    }

    let parsed = alloy_parse_units(unsigned, decimals)
        .map_err(|e| AirdropError::InvalidInput(format!("invalid amount '{}': {}", text, e)))?;

    // whole * 10^decimals must stay below uint256 max
    if !whole.is_empty() {
        let whole = U256::from_str_radix(whole, 10).map_err(|_| overflow())?;
        let scale = U256::from(10u8).pow(U256::from(decimals));
        if whole >= U256::MAX / scale {
            return Err(overflow());
        }
    }

    Ok(parsed.get_absolute())
}

/// Render a smallest-unit value as a decimal string, without trailing zeros.
pub fn format_units(value: U256, decimals: u8) -> String {
    match alloy_format_units(value, decimals) {
        Ok(formatted) if formatted.contains('.') => formatted
            .trim_end_matches('0')
            .trim_end_matches('.')
            .to_string(),
        Ok(formatted) => formatted,
        Err(_) => value.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(actual: f64, expected: f64, digits: i32) {
        let tolerance = 10f64.powi(-digits) / 2.0;
        assert!(
            (actual - expected).abs() < tolerance,
            "expected {} to be close to {}",
            actual,
            expected
        );
    }

    #[test]
    fn test_comma_delimited_totals() {
        assert_eq!(calculate_total("100, 200, 300"), 600.0);
        assert_eq!(calculate_total("100,200,300"), 600.0);
        assert_eq!(calculate_total("100,  200,   300"), 600.0);
        assert_eq!(calculate_total("100"), 100.0);
        assert_eq!(calculate_total("10.5, 20.3, 30.2"), 61.0);
    }

    #[test]
    fn test_signed_values_are_summed() {
        assert_eq!(calculate_total("-10, 20, 30"), 40.0);
        assert_eq!(calculate_total("100, -50, 200, -25"), 225.0);
    }

    #[test]
    fn test_newline_delimited_totals() {
        assert_eq!(calculate_total("100\n200\n300"), 600.0);
        assert_eq!(calculate_total("100  \n  200  \n  300"), 600.0);
        assert_eq!(calculate_total("100\n\n200\n\n\n300"), 600.0);
    }

    #[test]
    fn test_mixed_delimiters() {
        assert_eq!(calculate_total("100, 200\n300"), 600.0);
        assert_eq!(calculate_total("100, 200\n300, 400"), 1000.0);
        assert_eq!(calculate_total("100,200\n300\n400,500"), 1500.0);
        assert_eq!(calculate_total("100, 200, 300,\n"), 600.0);
        assert_eq!(calculate_total(",\n100, 200, 300"), 600.0);
    }

    #[test]
    fn test_delimiter_style_does_not_change_total() {
        let styles = [
            "1.5,2.5,3",
            "1.5\n2.5\n3",
            "1.5,\n,\n2.5\n\n\n3,,,",
            "\n\n1.5 , 2.5\n3\n",
        ];
        for input in styles {
            assert_eq!(calculate_total(input), 7.0, "input {:?}", input);
        }
    }

    #[test]
    fn test_empty_input_totals_zero() {
        assert_eq!(calculate_total(""), 0.0);
        assert_eq!(calculate_total("   "), 0.0);
        assert_eq!(calculate_total(",,,\n\n"), 0.0);
        assert_eq!(calculate_total("0, 0, 0"), 0.0);
        assert_eq!(calculate_total("abc, def, xyz"), 0.0);
    }

    #[test]
    fn test_large_and_small_values() {
        assert_eq!(calculate_total("0, 100, 0, 200"), 300.0);
        assert_eq!(calculate_total("1000000, 2000000, 3000000"), 6_000_000.0);
        assert_close(calculate_total("0.001, 0.002, 0.003"), 0.006, 3);
        assert_close(calculate_total("0.1, 0.2, 0.3"), 0.6, 10);
        assert_close(calculate_total("1.111111, 2.222222, 3.333333"), 6.666666, 6);
    }

    #[test]
    fn test_invalid_tokens_are_ignored() {
        assert_eq!(calculate_total("100, abc, 200"), 300.0);
        assert_eq!(calculate_total("100, , 200"), 300.0);
        assert_eq!(calculate_total("100, invalid, 200, xyz, 300"), 600.0);
        assert_eq!(calculate_total("100, @#$, 200"), 300.0);
        assert_eq!(calculate_total("100abc, 200, def300"), 300.0);
    }

    #[test]
    fn test_scientific_notation() {
        assert_eq!(calculate_total("1e2, 2e2, 3e2"), 600.0);
        assert_eq!(calculate_total("100, 1e2, 200"), 400.0);
    }

    #[test]
    fn test_real_world_lists() {
        assert_eq!(calculate_total("1000, 2000, 1500, 3000, 500"), 8000.0);
        let amounts = vec!["10"; 100].join(",");
        assert_eq!(calculate_total(&amounts), 1000.0);
    }

    #[test]
    fn test_numeric_prefix() {
        assert_eq!(numeric_prefix("100abc"), Some(100.0));
        assert_eq!(numeric_prefix("def300"), None);
        assert_eq!(numeric_prefix("-2.5kg"), Some(-2.5));
        assert_eq!(numeric_prefix(".5"), Some(0.5));
        assert_eq!(numeric_prefix("7."), Some(7.0));
        assert_eq!(numeric_prefix("1e"), Some(1.0));
        assert_eq!(numeric_prefix("1e+"), Some(1.0));
        assert_eq!(numeric_prefix("2E-1x"), Some(0.2));
        assert_eq!(numeric_prefix("-Infinity"), Some(f64::NEG_INFINITY));
        assert_eq!(numeric_prefix("."), None);
        assert_eq!(numeric_prefix("-"), None);
        assert_eq!(numeric_prefix("+.e5"), None);
    }

    #[test]
    fn test_split_entries() {
        assert_eq!(split_entries(" 0xaa ,\n\n0xbb,,0xcc\n"), vec!["0xaa", "0xbb", "0xcc"]);
        assert!(split_entries(",,,\n\n").is_empty());
        assert_eq!(split_entries("1\r\n2"), vec!["1", "2"]);
    }

    #[test]
    fn test_parse_units_scales_by_decimals() {
        let one_and_a_half = U256::from(1_500_000_000_000_000_000u128);
        assert_eq!(parse_units("1.5", 18).unwrap(), one_and_a_half);
        assert_eq!(parse_units("100", 6).unwrap(), U256::from(100_000_000u64));
        assert_eq!(parse_units("+3", 0).unwrap(), U256::from(3u8));
        assert_eq!(parse_units(".25", 2).unwrap(), U256::from(25u8));
        assert_eq!(parse_units("000", 18).unwrap(), U256::ZERO);
    }

    #[test]
    fn test_parse_units_floors_extra_precision() {
        assert_eq!(parse_units("1.23456789", 6).unwrap(), U256::from(1_234_567u64));
        assert_eq!(parse_units("0.0000009", 6).unwrap(), U256::ZERO);
        assert_eq!(parse_units("1.999", 0).unwrap(), U256::from(1u8));
    }

    #[test]
    fn test_parse_units_rejects_scientific_notation() {
        // The display total reads "1e2" as 100, the on-chain amount does not
        assert_eq!(calculate_total("1e2"), 100.0);
        for entry in ["1e2", "2.5e-1", "1E3"] {
            assert!(matches!(parse_units(entry, 18), Err(AirdropError::InvalidInput(_))));
        }
    }

    #[test]
    fn test_parse_units_rejects_invalid_entries() {
        for entry in ["-10", "100abc", "abc", "", ".", "1e", "1.2.3", "0x10"] {
            let result = parse_units(entry, 18);
            assert!(
                matches!(result, Err(AirdropError::InvalidInput(_))),
                "entry {:?} should be rejected",
                entry
            );
        }
    }

    #[test]
    fn test_parse_units_rejects_overflow() {
        let too_many_digits = format!("1{}", "0".repeat(78));
        assert!(matches!(parse_units(&too_many_digits, 0), Err(AirdropError::InvalidInput(_))));

        // Fits as an integer but not once scaled by 18 decimals
        let too_large_scaled = format!("1{}", "0".repeat(70));
        assert!(matches!(parse_units(&too_large_scaled, 18), Err(AirdropError::InvalidInput(_))));

        assert!(parse_units("1", 78).is_err());
        assert_eq!(
            parse_units("1", 77).unwrap(),
            U256::from(10u8).pow(U256::from(77u8))
        );
    }

    #[test]
    fn test_format_units() {
        let value = U256::from(1_500_000_000_000_000_000u128);
        assert_eq!(format_units(value, 18), "1.5");
        assert_eq!(format_units(U256::from(100_000_000u64), 6), "100");
        assert_eq!(format_units(U256::ZERO, 18), "0");
    }
}
