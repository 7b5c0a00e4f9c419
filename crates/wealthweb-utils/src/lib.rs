//! Utility functions and helpers

use rust_decimal::Decimal;

/// Format the integer part of a number with thousands separators
pub fn format_number<T: ToString>(n: T) -> String {
    let s = n.to_string();
    let (sign, digits) = match s.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", s.as_str()),
    };
    let mut result = String::new();
    let mut count = 0;
    for c in digits.chars().rev() {
        if count == 3 {
            result.push(',');
            count = 0;
        }
        result.push(c);
        count += 1;
    }
    let grouped: String = result.chars().rev().collect();
    format!("{}{}", sign, grouped)
}

/// Format an amount with a currency symbol, two decimals and grouped thousands
///
/// `format_amount(dec!(-1234.5), "$")` gives `-$1,234.50`.
pub fn format_amount(amount: Decimal, symbol: &str) -> String {
    let rounded = amount.round_dp(2);
    let negative = rounded.is_sign_negative() && !rounded.is_zero();
    let abs = rounded.abs();
    let text = format!("{:.2}", abs);
    let (int_part, frac_part) = text.split_once('.').unwrap_or((text.as_str(), "00"));
    format!(
        "{}{}{}.{}",
        if negative { "-" } else { "" },
        symbol,
        format_number(int_part),
        frac_part
    )
}

/// Generate a unique ID
pub fn generate_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// Key used for case-insensitive name matching
pub fn name_key(name: &str) -> String {
    name.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(1234567), "1,234,567");
        assert_eq!(format_number(999), "999");
        assert_eq!(format_number(-1000), "-1,000");
    }

    #[test]
    fn test_format_amount() {
        assert_eq!(format_amount(Decimal::new(123450, 2), "$"), "$1,234.50");
        assert_eq!(format_amount(Decimal::new(-5, 0), "€"), "-€5.00");
        assert_eq!(format_amount(Decimal::ZERO, "USD "), "USD 0.00");
    }

    #[test]
    fn test_generate_id_unique() {
        let a = generate_id();
        let b = generate_id();
        assert_ne!(a, b);
        assert_eq!(a.len(), 36);
    }

    #[test]
    fn test_name_key() {
        assert_eq!(name_key("  Bank "), "bank");
        assert_eq!(name_key("CASH"), name_key("cash"));
    }
}
