use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use rust_decimal::Decimal;

/// Serialize records to CSV with a header row.
pub fn write_csv<I, R, W>(records: I, writer: W) -> anyhow::Result<()>
where
    I: IntoIterator<Item = R>,
    R: serde::Serialize,
    W: std::io::Write,
{
    let mut wtr = csv::Writer::from_writer(writer);
    for record in records.into_iter() {
        wtr.serialize(record)?;
    }
    wtr.flush()?;
    Ok(())
}

/// Parse a timestamp in RFC 3339 or `YYYY-MM-DD[ T]HH:MM:SS[.fff]` form,
/// normalized to UTC. Date-only values default to midnight.
pub fn parse_timestamp(s: &str) -> Option<DateTime<Utc>> {
    let s = s.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    for format in ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, format) {
            return Some(dt.and_utc());
        }
    }
    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return date.and_hms_opt(0, 0, 0).map(|dt| dt.and_utc());
    }
    None
}

/// Parse a monetary amount, tolerating `$`, thousands separators, and
/// parenthesized negatives as found in platform exports.
pub fn parse_amount(s: &str) -> Option<Decimal> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    let (s, negated) = match s.strip_prefix('(').and_then(|rest| rest.strip_suffix(')')) {
        Some(inner) => (inner, true),
        None => (s, false),
    };
    let cleaned: String = s
        .chars()
        .filter(|c| !matches!(c, '$' | ',' | ' '))
        .collect();
    let amount: Decimal = cleaned.parse().ok()?;
    Some(if negated { -amount } else { amount })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rust_decimal_macros::dec;

    #[test]
    fn parse_rfc3339_timestamp() {
        assert_eq!(
            parse_timestamp("2023-06-13T15:27:27Z"),
            Some(Utc.with_ymd_and_hms(2023, 6, 13, 15, 27, 27).unwrap())
        );
    }

    #[test]
    fn parse_naive_timestamp_with_millis() {
        let expected = NaiveDate::from_ymd_opt(2020, 6, 23)
            .unwrap()
            .and_hms_milli_opt(20, 42, 26, 889)
            .unwrap()
            .and_utc();
        assert_eq!(parse_timestamp("2020-06-23 20:42:26.889"), Some(expected));
    }

    #[test]
    fn parse_date_only_timestamp() {
        assert_eq!(
            parse_timestamp("2021-01-05"),
            Some(Utc.with_ymd_and_hms(2021, 1, 5, 0, 0, 0).unwrap())
        );
    }

    #[test]
    fn parse_invalid_timestamp() {
        assert_eq!(parse_timestamp("yesterday"), None);
    }

    #[test]
    fn parse_plain_amount() {
        assert_eq!(parse_amount("-5.00"), Some(dec!(-5.00)));
    }

    #[test]
    fn parse_formatted_amount() {
        assert_eq!(parse_amount("$1,967.95"), Some(dec!(1967.95)));
        assert_eq!(parse_amount("-$24.99"), Some(dec!(-24.99)));
    }

    #[test]
    fn parse_parenthesized_negative() {
        assert_eq!(parse_amount("($871.84)"), Some(dec!(-871.84)));
    }

    #[test]
    fn parse_blank_amount() {
        assert_eq!(parse_amount(""), None);
        assert_eq!(parse_amount("   "), None);
    }
}
