//! Fail-soft conversion of noisy listing text into numbers.
//!
//! Every function here is total: malformed or absent input degrades to the
//! zero value of the target type instead of returning an error.

use super::model::Listing;

/// Parse a currency-formatted price such as `"US $45.00/ea"` or `"$1,234.50"`.
///
/// Everything except ASCII digits and `.` is stripped before parsing. Text
/// with more than one decimal point (`"1.2.3"`) does not parse and yields
/// `0.0`, as does text with no digits at all.
pub fn parse_currency(text: Option<&str>) -> f64 {
    let Some(text) = text else {
        return 0.0;
    };
    let kept: String = text
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.')
        .collect();
    match kept.parse::<f64>() {
        Ok(v) if v.is_finite() => v,
        _ => 0.0,
    }
}

/// Parse a count such as `"1,024 sold"`. Only ASCII digits survive; an empty
/// or overflowing remainder yields `0`.
pub fn parse_count(text: Option<&str>) -> u64 {
    let Some(text) = text else {
        return 0;
    };
    let digits: String = text.chars().filter(|c| c.is_ascii_digit()).collect();
    digits.parse::<u64>().unwrap_or(0)
}

/// Coerce a stock cell to a non-negative integer.
///
/// Integer text parses directly, fractional text (`"12.0"`, `"3.7"`) is
/// truncated toward zero. Negative, non-numeric and absent cells become `0`.
pub fn parse_stock(value: Option<&str>) -> u64 {
    let Some(value) = value.map(str::trim).filter(|v| !v.is_empty()) else {
        return 0;
    };
    if let Ok(i) = value.parse::<i64>() {
        return u64::try_from(i).unwrap_or(0);
    }
    match value.parse::<f64>() {
        Ok(f) if f.is_finite() && f > 0.0 => f.trunc() as u64,
        _ => 0,
    }
}

/// Counters describing how many cells degraded to zero during a pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NormalizeStats {
    pub rows: usize,
    pub zero_prices: usize,
    pub zero_sold: usize,
}

/// Populate the derived `price` and `sold` columns from their raw text.
///
/// `available` is coerced at rename time, so this pass only touches the two
/// text-shaped columns.
pub fn normalize_listings(listings: &mut [Listing]) -> NormalizeStats {
    let mut stats = NormalizeStats {
        rows: listings.len(),
        ..Default::default()
    };
    for listing in listings.iter_mut() {
        listing.price = parse_currency(listing.price_raw.as_deref());
        listing.sold = parse_count(listing.sold_raw.as_deref());
        if listing.price == 0.0 {
            stats.zero_prices += 1;
        }
        if listing.sold == 0 {
            stats.zero_sold += 1;
        }
    }
    stats
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn currency_with_symbols_and_separators() {
        assert_eq!(parse_currency(Some("$1,234.50")), 1234.50);
        assert_eq!(parse_currency(Some("US $45.00/ea")), 45.0);
        assert_eq!(parse_currency(Some("EUR 12")), 12.0);
    }

    #[test]
    fn currency_without_digits_is_zero() {
        assert_eq!(parse_currency(Some("N/A")), 0.0);
        assert_eq!(parse_currency(Some("")), 0.0);
        assert_eq!(parse_currency(Some(".")), 0.0);
        assert_eq!(parse_currency(None), 0.0);
    }

    #[test]
    fn currency_with_several_points_is_zero() {
        assert_eq!(parse_currency(Some("1.2.3")), 0.0);
    }

    #[test]
    fn count_strips_unit_words() {
        assert_eq!(parse_count(Some("1,024 sold")), 1024);
        assert_eq!(parse_count(Some("1200 sold")), 1200);
        assert_eq!(parse_count(Some("-5")), 5);
        assert_eq!(parse_count(Some("sold out")), 0);
        assert_eq!(parse_count(None), 0);
    }

    #[test]
    fn count_overflow_is_zero() {
        assert_eq!(parse_count(Some("99999999999999999999999 sold")), 0);
    }

    #[test]
    fn stock_truncates_and_clamps() {
        assert_eq!(parse_stock(Some("12")), 12);
        assert_eq!(parse_stock(Some("12.0")), 12);
        assert_eq!(parse_stock(Some("3.7")), 3);
        assert_eq!(parse_stock(Some("-4")), 0);
        assert_eq!(parse_stock(Some("many")), 0);
        assert_eq!(parse_stock(Some("  ")), 0);
        assert_eq!(parse_stock(None), 0);
    }
}
