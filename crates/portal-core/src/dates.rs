//! Lenient parsing of backend date columns.
//!
//! Date columns arrive as plain `YYYY-MM-DD` (form inputs) or as full timestamps
//! (`created_at`). Values that fail to parse are treated as absent.

use chrono::{DateTime, NaiveDate, NaiveDateTime};

/// Parses the calendar date of a stored date or timestamp.
pub fn parse_date(value: &str) -> Option<NaiveDate> {
	let value = value.trim();
	if value.is_empty() {
		return None;
	}
	if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
		return Some(date);
	}
	if let Ok(timestamp) = DateTime::parse_from_rfc3339(value) {
		return Some(timestamp.date_naive());
	}
	NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f")
		.or_else(|_| NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S%.f"))
		.map(|timestamp| timestamp.date())
		.ok()
}

/// Parses an optional column.
pub fn parse_optional_date(value: Option<&str>) -> Option<NaiveDate> {
	value.and_then(parse_date)
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	#[case("2024-03-05", Some((2024, 3, 5)))]
	#[case("2024-03-05T10:20:30.123456+00:00", Some((2024, 3, 5)))]
	#[case("2024-03-05T10:20:30", Some((2024, 3, 5)))]
	#[case("2024-03-05 10:20:30.5", Some((2024, 3, 5)))]
	#[case("next tuesday", None)]
	#[case("", None)]
	fn test_parse_date(#[case] raw: &str, #[case] expected: Option<(i32, u32, u32)>) {
		let expected = expected.and_then(|(y, m, d)| NaiveDate::from_ymd_opt(y, m, d));

		assert_eq!(parse_date(raw), expected);
	}
}
