//! Job numbers.

use serde::{Deserialize, Deserializer, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// Human-assigned job number of a report.
///
/// Job numbers group a report with its uploaded cover images. They are usually
/// numeric text ("1042", "07") but nothing enforces it, so ordering goes through
/// [`JobNumber::numeric_value`], which maps anything non-numeric to 0.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(transparent)]
pub struct JobNumber(String);

impl JobNumber {
	pub fn new(value: impl Into<String>) -> Self {
		Self(value.into())
	}

	pub fn as_str(&self) -> &str {
		&self.0
	}

	pub fn is_empty(&self) -> bool {
		self.0.trim().is_empty()
	}

	/// Numeric value of the trimmed text, or 0 when it is not a finite number.
	pub fn numeric_value(&self) -> f64 {
		let trimmed = self.0.trim();
		if trimmed.is_empty() {
			return 0.0;
		}
		trimmed
			.parse::<f64>()
			.ok()
			.filter(|value| value.is_finite())
			.unwrap_or(0.0)
	}

	/// Descending numeric order, for use with a stable sort.
	pub fn cmp_descending(&self, other: &Self) -> Ordering {
		other.numeric_value().total_cmp(&self.numeric_value())
	}
}

impl fmt::Display for JobNumber {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.0)
	}
}

impl From<&str> for JobNumber {
	fn from(value: &str) -> Self {
		Self(value.to_string())
	}
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawJobNumber {
	Text(String),
	Integer(i64),
	Float(f64),
}

impl<'de> Deserialize<'de> for JobNumber {
	fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
		Ok(match Option::<RawJobNumber>::deserialize(deserializer)? {
			Some(RawJobNumber::Text(text)) => Self(text),
			Some(RawJobNumber::Integer(n)) => Self(n.to_string()),
			Some(RawJobNumber::Float(n)) => Self(n.to_string()),
			None => Self::default(),
		})
	}
}

/// Sorts by descending job number; equal values keep their relative order.
pub fn sort_by_job_descending<T>(items: &mut [T], job: impl Fn(&T) -> &JobNumber) {
	items.sort_by(|a, b| job(a).cmp_descending(job(b)));
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	#[case("12", 12.0)]
	#[case("07", 7.0)]
	#[case(" 3 ", 3.0)]
	#[case("X", 0.0)]
	#[case("", 0.0)]
	#[case("inf", 0.0)]
	fn test_numeric_value(#[case] raw: &str, #[case] expected: f64) {
		assert_eq!(JobNumber::from(raw).numeric_value(), expected);
	}

	#[rstest]
	fn test_descending_sort_places_non_numeric_last() {
		// Arrange
		let mut jobs: Vec<JobNumber> = ["12", "07", "X", "3"].into_iter().map(JobNumber::from).collect();

		// Act
		sort_by_job_descending(&mut jobs, |job| job);

		// Assert
		let order: Vec<&str> = jobs.iter().map(JobNumber::as_str).collect();
		assert_eq!(order, ["12", "07", "3", "X"]);
	}

	#[rstest]
	fn test_numeric_job_numbers_deserialize_as_text() {
		let job: JobNumber = serde_json::from_str("1042").unwrap();

		assert_eq!(job.as_str(), "1042");
	}
}
