//! Number formatting for table cells.

/// Format `value` with at most `digits` significant digits, en-US style:
/// thousands grouped with commas, no exponent, trailing zeros dropped.
///
/// `format_significant(101325.7, 5)` gives `"101,330"`;
/// `format_significant(0.00123456, 5)` gives `"0.0012346"`.
pub fn format_significant(value: f64, digits: usize) -> String {
    if value.is_nan() {
        return "NaN".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "∞" } else { "-∞" }.to_string();
    }
    if value == 0.0 {
        return "0".to_string();
    }

    let digits = digits.max(1);
    // Round through scientific notation so carries (99999.5 -> 1.0000e5)
    // land in the exponent.
    let sci = format!("{:.*e}", digits - 1, value.abs());
    let (mantissa, exponent) = sci.split_once('e').unwrap_or((&sci, "0"));
    let exponent: i32 = exponent.parse().unwrap_or(0);
    let rounded: f64 = format!("{mantissa}e{exponent}").parse().unwrap_or(value.abs());

    let decimals = (digits as i32 - 1 - exponent).max(0) as usize;
    let fixed = format!("{rounded:.decimals$}");
    let (int_part, frac_part) = match fixed.split_once('.') {
        Some((i, f)) => (i, f.trim_end_matches('0')),
        None => (fixed.as_str(), ""),
    };

    let mut out = String::new();
    if value < 0.0 {
        out.push('-');
    }
    out.push_str(&group_thousands(int_part));
    if !frac_part.is_empty() {
        out.push('.');
        out.push_str(frac_part);
    }
    out
}

fn group_thousands(int_part: &str) -> String {
    let len = int_part.len();
    let mut out = String::with_capacity(len + len / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rounds_to_five_significant_digits() {
        assert_eq!(format_significant(300.0, 5), "300");
        assert_eq!(format_significant(373.124567, 5), "373.12");
        assert_eq!(format_significant(101325.7, 5), "101,330");
        assert_eq!(format_significant(0.00123456, 5), "0.0012346");
        assert_eq!(format_significant(1.0, 5), "1");
        assert_eq!(format_significant(0.5, 5), "0.5");
    }

    #[test]
    fn carries_into_next_decade() {
        assert_eq!(format_significant(99999.5, 5), "100,000");
        assert_eq!(format_significant(9.99999, 5), "10");
    }

    #[test]
    fn groups_large_values() {
        assert_eq!(format_significant(1234567.0, 5), "1,234,600");
        assert_eq!(format_significant(-2500.26, 5), "-2,500.3");
    }

    #[test]
    fn special_values() {
        assert_eq!(format_significant(0.0, 5), "0");
        assert_eq!(format_significant(f64::NAN, 5), "NaN");
        assert_eq!(format_significant(f64::INFINITY, 5), "∞");
    }
}
