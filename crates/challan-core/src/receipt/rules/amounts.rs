//! Amount and reference-number parsing for receipt text.

use rust_decimal::{Decimal, RoundingStrategy};
use std::str::FromStr;

/// Drop thousands separators (`1,24,050.50` -> `124050.50`).
pub fn strip_separators(s: &str) -> String {
    s.trim().replace(',', "")
}

/// Parse a locale-formatted amount such as `1,20,000.00`.
pub fn parse_amount(s: &str) -> Option<Decimal> {
    let cleaned = strip_separators(s);
    if cleaned.is_empty() {
        return None;
    }
    Decimal::from_str(&cleaned).ok()
}

/// Parse a reference number such as a challan number (`00457` -> 457).
pub fn parse_integer(s: &str) -> Option<u64> {
    strip_separators(s).parse().ok()
}

/// Round an amount for display; halves go away from zero (`0.125` -> `0.13`).
pub fn round_amount(amount: Decimal, decimal_places: u32) -> Decimal {
    amount.round_dp_with_strategy(decimal_places, RoundingStrategy::MidpointAwayFromZero)
}

/// Render an amount with exactly `decimal_places` places and no grouping.
pub fn format_amount(amount: Decimal, decimal_places: u32) -> String {
    format!(
        "{:.*}",
        decimal_places as usize,
        round_amount(amount, decimal_places)
    )
}

/// Format an amount with Indian digit grouping (`1,24,050.50`).
pub fn format_indian_amount(amount: Decimal, decimal_places: u32) -> String {
    let s = format_amount(amount, decimal_places);
    let (sign, unsigned) = match s.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", s.as_str()),
    };
    let (integer_part, fraction) = match unsigned.split_once('.') {
        Some((integer_part, decimals)) => (integer_part, format!(".{}", decimals)),
        None => (unsigned, String::new()),
    };

    // Last three digits, then groups of two.
    let digits: Vec<char> = integer_part.chars().collect();
    let mut formatted = String::new();
    let head_len = digits.len().saturating_sub(3);

    for (i, c) in digits[..head_len].iter().enumerate() {
        if i > 0 && (head_len - i) % 2 == 0 {
            formatted.push(',');
        }
        formatted.push(*c);
    }
    if head_len > 0 {
        formatted.push(',');
    }
    formatted.extend(&digits[head_len..]);

    format!("{}{}{}", sign, formatted, fraction)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_amount() {
        assert_eq!(
            parse_amount("1,20,000.00"),
            Some(Decimal::from_str("120000.00").unwrap())
        );
        assert_eq!(
            parse_amount(" 2,350.50 "),
            Some(Decimal::from_str("2350.50").unwrap())
        );
        assert_eq!(parse_amount("0.00"), Some(Decimal::ZERO));
        assert_eq!(parse_amount(""), None);
        assert_eq!(parse_amount("Rupees"), None);
    }

    #[test]
    fn test_parse_integer() {
        assert_eq!(parse_integer("00457"), Some(457));
        assert_eq!(parse_integer("10,234"), Some(10234));
        assert_eq!(parse_integer("12.5"), None);
        assert_eq!(parse_integer("NA"), None);
    }

    #[test]
    fn test_format_indian_amount() {
        let amount = |s: &str| Decimal::from_str(s).unwrap();

        assert_eq!(format_indian_amount(amount("124050.5"), 2), "1,24,050.50");
        assert_eq!(format_indian_amount(amount("12345678.9"), 2), "1,23,45,678.90");
        assert_eq!(format_indian_amount(amount("200"), 2), "200.00");
        assert_eq!(format_indian_amount(amount("-1500"), 2), "-1,500.00");
        assert_eq!(format_indian_amount(amount("124050.5"), 0), "1,24,051");
        assert_eq!(format_indian_amount(amount("2350.505"), 3), "2,350.505");
    }

    #[test]
    fn test_amounts_round_half_away_from_zero() {
        let amount = |s: &str| Decimal::from_str(s).unwrap();

        assert_eq!(format_amount(amount("0.125"), 2), "0.13");
        assert_eq!(format_amount(amount("2.675"), 2), "2.68");
        assert_eq!(format_amount(amount("-0.125"), 2), "-0.13");
        assert_eq!(format_amount(amount("1500"), 0), "1500");
        assert_eq!(round_amount(amount("0.124"), 2), amount("0.12"));
    }
}
