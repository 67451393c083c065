//! Display formatting for pool fields.
//!
//! Every formatter is total: anything that does not coerce to a finite number renders as
//! [`PLACEHOLDER`].

use chrono::{DateTime, Local, Utc};
use num_format::{Locale, ToFormattedString};

pub const PLACEHOLDER: &str = "—";

const COMPACT_SUFFIXES: [&str; 5] = ["", "K", "M", "B", "T"];

/// Coercion of raw field values to a number.
pub trait Numeric {
    fn to_number(&self) -> Option<f64>;
}

impl Numeric for str {
    fn to_number(&self) -> Option<f64> {
        let trimmed = self.trim();
        if trimmed.is_empty() {
            return None;
        }
        trimmed.parse::<f64>().ok()
    }
}

impl Numeric for String {
    fn to_number(&self) -> Option<f64> {
        self.as_str().to_number()
    }
}

impl Numeric for serde_json::Value {
    fn to_number(&self) -> Option<f64> {
        match self {
            serde_json::Value::Number(n) => n.as_f64(),
            serde_json::Value::String(s) => s.to_number(),
            _ => None,
        }
    }
}

macro_rules! numeric_primitive {
    ($($ty:ty),*) => {
        $(impl Numeric for $ty {
            fn to_number(&self) -> Option<f64> {
                Some(*self as f64)
            }
        })*
    };
}

numeric_primitive!(f64, f32, i32, i64, u32, u64);

fn finite<T: Numeric + ?Sized>(value: &T) -> Option<f64> {
    value.to_number().filter(|n| n.is_finite())
}

/// `1234.5` -> `$1,234.50`
pub fn format_currency_usd<T: Numeric + ?Sized>(value: &T) -> String {
    let Some(number) = finite(value) else {
        return PLACEHOLDER.to_string();
    };

    let fixed = fixed_half_away(number.abs(), 2);
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));
    let sign = if number < 0.0 && fixed != "0.00" { "-" } else { "" };

    format!("{}${}.{}", sign, grouped(int_part), frac_part)
}

/// `1234` -> `1.23K`, `2500000` -> `2.5M`, `12.346` -> `12.35`
pub fn format_compact_volume<T: Numeric + ?Sized>(value: &T) -> String {
    let Some(number) = finite(value) else {
        return PLACEHOLDER.to_string();
    };

    let abs = number.abs();
    let top = COMPACT_SUFFIXES.len() - 1;
    let mut exp = 0;
    while exp < top && abs >= 1000f64.powi(exp as i32 + 1) {
        exp += 1;
    }

    let mut fixed = fixed_half_away(abs / 1000f64.powi(exp as i32), 2);
    // rounding up to 1000 moves to the next suffix
    while exp < top && fixed.parse::<f64>().map_or(false, |r| r >= 1000.0) {
        exp += 1;
        fixed = fixed_half_away(abs / 1000f64.powi(exp as i32), 2);
    }

    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), ""));
    let frac_part = frac_part.trim_end_matches('0');
    let mut body = grouped(int_part);
    if !frac_part.is_empty() {
        body.push('.');
        body.push_str(frac_part);
    }

    let sign = if number < 0.0 && body != "0" { "-" } else { "" };
    format!("{}{}{}", sign, body, COMPACT_SUFFIXES[exp])
}

/// Fee tier is in hundredths of a basis point: `3000` -> `0.30%`.
pub fn format_fee_percent<T: Numeric + ?Sized>(fee_tier: &T) -> String {
    let Some(tier) = finite(fee_tier) else {
        return PLACEHOLDER.to_string();
    };

    let percent = tier / 10_000.0;
    // avoid rendering -0
    let percent = if percent == 0.0 { 0.0 } else { percent };
    format!("{:.2}%", percent)
}

/// Wall-clock time of the last refresh, rendered in local time.
pub fn format_clock(at: DateTime<Utc>) -> String {
    at.with_timezone(&Local).format("%H:%M:%S").to_string()
}

/// Fixed-point text of a non-negative value, ties rounded away from zero.
fn fixed_half_away(abs: f64, decimals: usize) -> String {
    let scale = 10f64.powi(decimals as i32);
    let scaled = abs * scale;
    // `{:.N}` rounds exact ties (0.125, 1.125) to even
    if scaled.fract() == 0.5 {
        return format!("{:.*}", decimals, (scaled.trunc() + 1.0) / scale);
    }
    format!("{:.*}", decimals, abs)
}

/// en-US thousands grouping of an integer digit string.
fn grouped(digits: &str) -> String {
    match digits.parse::<u128>() {
        Ok(n) => n.to_formatted_string(&Locale::en),
        // beyond u128 range, left ungrouped
        Err(_) => digits.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn currency_uses_grouping_and_two_decimals() {
        assert_eq!(format_currency_usd(&1234.5), "$1,234.50");
        assert_eq!(format_currency_usd("1234.5"), "$1,234.50");
        assert_eq!(format_currency_usd("0"), "$0.00");
        assert_eq!(format_currency_usd("999.999"), "$1,000.00");
        assert_eq!(format_currency_usd("412345678.9"), "$412,345,678.90");
        assert_eq!(format_currency_usd(&-12.0), "-$12.00");
        assert_eq!(format_currency_usd(" 42 "), "$42.00");
    }

    #[test]
    fn compact_volume_abbreviates() {
        assert_eq!(format_compact_volume(&0.0), "0");
        assert_eq!(format_compact_volume("12.346"), "12.35");
        assert_eq!(format_compact_volume("999"), "999");
        assert_eq!(format_compact_volume("1234"), "1.23K");
        assert_eq!(format_compact_volume("1500000"), "1.5M");
        assert_eq!(format_compact_volume("2000000000"), "2B");
        assert_eq!(format_compact_volume("3210000000000"), "3.21T");
        assert_eq!(format_compact_volume(&-1500.0), "-1.5K");
    }

    #[test]
    fn compact_volume_promotes_on_rounding() {
        assert_eq!(format_compact_volume("999.999"), "1K");
        assert_eq!(format_compact_volume("999999"), "1M");
    }

    #[test]
    fn compact_volume_groups_beyond_trillions() {
        assert_eq!(format_compact_volume(&1e18), "1,000,000T");
    }

    #[test]
    fn fee_percent() {
        assert_eq!(format_fee_percent(&3000u32), "0.30%");
        assert_eq!(format_fee_percent(&10000u32), "1.00%");
        assert_eq!(format_fee_percent("500"), "0.05%");
        assert_eq!(format_fee_percent("100"), "0.01%");
        assert_eq!(format_fee_percent("-0"), "0.00%");
    }

    #[test]
    fn non_numeric_input_degrades_to_placeholder() {
        let bad: [&str; 6] = ["", "   ", "abc", "NaN", "inf", "-infinity"];
        for input in bad {
            assert_eq!(format_currency_usd(input), PLACEHOLDER, "{input:?}");
            assert_eq!(format_compact_volume(input), PLACEHOLDER, "{input:?}");
            assert_eq!(format_fee_percent(input), PLACEHOLDER, "{input:?}");
        }

        assert_eq!(format_currency_usd(&f64::NAN), PLACEHOLDER);
        assert_eq!(format_compact_volume(&f64::INFINITY), PLACEHOLDER);
        assert_eq!(format_fee_percent(&serde_json::Value::Null), PLACEHOLDER);
    }

    #[test]
    fn json_values_coerce() {
        assert_eq!(format_fee_percent(&serde_json::json!(3000)), "0.30%");
        assert_eq!(format_fee_percent(&serde_json::json!("3000")), "0.30%");
        assert_eq!(format_fee_percent(&serde_json::json!(true)), PLACEHOLDER);
    }

    #[test]
    fn exact_ties_round_away_from_zero() {
        assert_eq!(format_currency_usd(&0.125), "$0.13");
        assert_eq!(format_currency_usd(&-0.125), "-$0.13");
        assert_eq!(format_currency_usd(&2.375), "$2.38");
        assert_eq!(format_compact_volume(&1125.0), "1.13K");
        assert_eq!(format_compact_volume(&0.375), "0.38");
        assert_eq!(format_compact_volume(&0.125), "0.13");
    }

    #[test]
    fn near_ties_follow_binary_value() {
        // 1.005 is stored just below the tie
        assert_eq!(format_currency_usd(&1.005), "$1.00");
        assert_eq!(format_fee_percent(&125.0), "0.01%");
    }

    #[test]
    fn grouping() {
        assert_eq!(grouped("1"), "1");
        assert_eq!(grouped("123"), "123");
        assert_eq!(grouped("1234"), "1,234");
        assert_eq!(grouped("1234567"), "1,234,567");
    }
}
