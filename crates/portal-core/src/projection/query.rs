/// Normalized search text: trimmed and lowercased.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SearchQuery(String);

impl SearchQuery {
	pub fn new(raw: &str) -> Self {
		Self(raw.trim().to_lowercase())
	}

	pub fn as_str(&self) -> &str {
		&self.0
	}

	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}

	/// Case-insensitive substring match. An empty query matches everything.
	pub fn matches(&self, field: &str) -> bool {
		self.is_empty() || field.to_lowercase().contains(&self.0)
	}

	/// Matches when any present field matches.
	pub fn matches_any<'a>(&self, fields: impl IntoIterator<Item = Option<&'a str>>) -> bool {
		self.is_empty() || fields.into_iter().flatten().any(|field| self.matches(field))
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	#[case("  HARBOUR ", "Harbour Holdings", true)]
	#[case("hold", "Harbour Holdings", true)]
	#[case("quay", "Harbour Holdings", false)]
	#[case("", "anything", true)]
	fn test_matches(#[case] raw: &str, #[case] field: &str, #[case] expected: bool) {
		assert_eq!(SearchQuery::new(raw).matches(field), expected);
	}

	#[rstest]
	fn test_matches_any_skips_missing_fields() {
		let query = SearchQuery::new("retail");

		assert!(query.matches_any([None, Some("Retail")]));
		assert!(!query.matches_any([None, None]));
	}
}
