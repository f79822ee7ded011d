//! Backend record identifiers.

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Identifier of a backend row.
///
/// The hosted backend hands out UUID strings for clients and integer keys for
/// some legacy tables, and the portal compares ids by their text form. Both
/// encodings therefore deserialize into the same string-backed id.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Default)]
#[serde(transparent)]
pub struct RecordId(String);

impl RecordId {
	/// Creates an id from its text form.
	pub fn new(id: impl Into<String>) -> Self {
		Self(id.into())
	}

	/// Returns the text form of the id.
	pub fn as_str(&self) -> &str {
		&self.0
	}

	/// Returns true for the empty id used by unsaved rows.
	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}
}

impl fmt::Display for RecordId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.0)
	}
}

impl From<&str> for RecordId {
	fn from(value: &str) -> Self {
		Self(value.to_string())
	}
}

impl From<String> for RecordId {
	fn from(value: String) -> Self {
		Self(value)
	}
}

impl PartialEq<str> for RecordId {
	fn eq(&self, other: &str) -> bool {
		self.0 == other
	}
}

impl PartialEq<&str> for RecordId {
	fn eq(&self, other: &&str) -> bool {
		self.0 == *other
	}
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
	Text(String),
	Integer(i64),
	Float(f64),
}

impl<'de> Deserialize<'de> for RecordId {
	fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
	where
		D: Deserializer<'de>,
	{
		Ok(match RawId::deserialize(deserializer)? {
			RawId::Text(text) => Self(text),
			RawId::Integer(n) => Self(n.to_string()),
			RawId::Float(n) => Self(n.to_string()),
		})
	}
}

/// Deserializes an optional id that may be `null` or missing.
pub(crate) fn deserialize_optional<'de, D>(deserializer: D) -> Result<Option<RecordId>, D::Error>
where
	D: Deserializer<'de>,
{
	Ok(Option::<RawId>::deserialize(deserializer)?.map(|raw| match raw {
		RawId::Text(text) => RecordId(text),
		RawId::Integer(n) => RecordId(n.to_string()),
		RawId::Float(n) => RecordId(n.to_string()),
	}))
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	#[case(r#""8f0c1a""#, "8f0c1a")]
	#[case("42", "42")]
	fn test_deserialize_text_and_numeric_ids(#[case] json: &str, #[case] expected: &str) {
		// Act
		let id: RecordId = serde_json::from_str(json).unwrap();

		// Assert
		assert_eq!(id, expected);
	}

	#[rstest]
	fn test_numeric_and_text_ids_compare_equal() {
		// Arrange
		let from_number: RecordId = serde_json::from_str("7").unwrap();
		let from_text = RecordId::from("7");

		// Assert
		assert_eq!(from_number, from_text);
	}
}
