//! Shared formatting helpers.

use rust_decimal::Decimal;

/// Convert an integer amount in minor units (paise, cents) to major units.
pub fn minor_to_major(minor: i64) -> Decimal {
    Decimal::new(minor, 2)
}

/// Format a major-unit amount with thousands separators and two decimals,
/// e.g. `₹52,500.00`.
pub fn format_money(symbol: &str, amount: Decimal) -> String {
    let fixed = format!("{:.2}", amount.round_dp(2).abs());
    let (whole, frac) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, ch) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if amount.is_sign_negative() && !amount.is_zero() {
        "-"
    } else {
        ""
    };
    format!("{}{}{}.{}", sign, symbol, grouped, frac)
}

/// Title-case a word or phrase: `"fEMALE"` → `"Female"`, `"non-binary"` → `"Non-Binary"`.
pub fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut at_word_start = true;
    for ch in s.chars() {
        if ch.is_alphabetic() {
            if at_word_start {
                out.extend(ch.to_uppercase());
            } else {
                out.extend(ch.to_lowercase());
            }
            at_word_start = false;
        } else {
            out.push(ch);
            at_word_start = true;
        }
    }
    out
}

/// Truncate to at most `max_chars` characters for log output.
pub fn truncate(s: &str, max_chars: usize) -> &str {
    match s.char_indices().nth(max_chars) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

/// Treat empty and whitespace-only strings as absent.
pub fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minor_to_major() {
        assert_eq!(minor_to_major(52500).to_string(), "525.00");
        assert_eq!(minor_to_major(525).to_string(), "5.25");
        assert_eq!(minor_to_major(0).to_string(), "0.00");
    }

    #[test]
    fn test_format_money() {
        assert_eq!(format_money("₹", minor_to_major(52500)), "₹525.00");
        assert_eq!(format_money("₹", minor_to_major(5250000)), "₹52,500.00");
        assert_eq!(format_money("$", minor_to_major(123456789)), "$1,234,567.89");
        assert_eq!(format_money("₹", minor_to_major(5)), "₹0.05");
        assert_eq!(format_money("₹", minor_to_major(-100000)), "-₹1,000.00");
    }

    #[test]
    fn test_title_case() {
        assert_eq!(title_case("male"), "Male");
        assert_eq!(title_case("FEMALE"), "Female");
        assert_eq!(title_case("non-binary"), "Non-Binary");
        assert_eq!(title_case(""), "");
    }

    #[test]
    fn test_truncate_respects_char_boundaries() {
        assert_eq!(truncate("hello", 10), "hello");
        assert_eq!(truncate("hello", 3), "hel");
        assert_eq!(truncate("₹₹₹₹", 2), "₹₹");
    }

    #[test]
    fn test_non_empty() {
        assert_eq!(non_empty(Some("x".into())), Some("x".into()));
        assert_eq!(non_empty(Some("  ".into())), None);
        assert_eq!(non_empty(None), None);
    }
}
