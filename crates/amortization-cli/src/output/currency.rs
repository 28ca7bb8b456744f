use rust_decimal::Decimal;
use serde_json::Value;
use std::str::FromStr;

/// `$1,234.56` style, two decimals, thousands separated by commas.
pub fn format_currency(amount: Decimal) -> String {
    let fixed = format!("{:.2}", amount.abs().round_dp(2));
    let (whole, cents) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, ch) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if amount.is_sign_negative() && !amount.round_dp(2).is_zero() {
        "-"
    } else {
        ""
    };
    format!("{sign}${grouped}.{cents}")
}

/// Percentage with a fixed number of decimals, e.g. `0.9864%`.
pub fn format_percent(value: Decimal, dp: u32) -> String {
    format!("{:.*}%", dp as usize, value.round_dp(dp))
}

/// Read a Decimal back out of a JSON value (string or number).
pub fn decimal_from_value(value: &Value) -> Option<Decimal> {
    match value {
        Value::String(s) => Decimal::from_str(s).ok(),
        Value::Number(n) => Decimal::from_str(&n.to_string()).ok(),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_format_currency_groups_thousands() {
        assert_eq!(format_currency(dec!(10652.667)), "$10,652.67");
        assert_eq!(format_currency(dec!(1234567.891)), "$1,234,567.89");
        assert_eq!(format_currency(dec!(887.72)), "$887.72");
        assert_eq!(format_currency(dec!(0)), "$0.00");
        assert_eq!(format_currency(dec!(100)), "$100.00");
    }

    #[test]
    fn test_format_currency_negative() {
        assert_eq!(format_currency(dec!(-1500.5)), "-$1,500.50");
        assert_eq!(format_currency(dec!(-0.001)), "$0.00");
    }

    #[test]
    fn test_format_percent() {
        assert_eq!(format_percent(dec!(0.98635805), 4), "0.9864%");
        assert_eq!(format_percent(dec!(12.5), 2), "12.50%");
    }

    #[test]
    fn test_decimal_from_value() {
        assert_eq!(decimal_from_value(&Value::String("887.72".into())), Some(dec!(887.72)));
        assert_eq!(decimal_from_value(&serde_json::json!(12)), Some(dec!(12)));
        assert_eq!(decimal_from_value(&Value::Null), None);
    }
}
