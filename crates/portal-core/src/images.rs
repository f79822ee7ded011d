//! Normalization of stored report image lists.
//!
//! `reports.image_url` has been written three ways over time: a native JSON array,
//! JSON-encoded array text, and a comma-separated string. [`ImageList`] accepts all
//! of them (plus empty text and null) and always yields an ordered list of distinct,
//! non-blank URLs.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

/// Ordered, deduplicated list of image URLs.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ImageList(Vec<String>);

impl ImageList {
	/// Builds a list from URLs, dropping blanks and repeats.
	pub fn from_urls<I, S>(urls: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		let mut list = Self::default();
		list.extend(urls);
		list
	}

	/// Normalizes stored text, which may be JSON or comma-separated.
	pub fn parse_text(text: &str) -> Self {
		let trimmed = text.trim();
		if trimmed.is_empty() {
			return Self::default();
		}
		match serde_json::from_str::<Value>(trimmed) {
			Ok(Value::Array(items)) => Self::from_json_items(items),
			// Valid JSON that is not an array is kept as one opaque entry.
			Ok(_) => Self::from_urls([text.to_string()]),
			Err(_) => Self::from_urls(trimmed.split(',').map(str::trim)),
		}
	}

	/// Normalizes any JSON representation of the column.
	pub fn from_value(value: Value) -> Self {
		match value {
			Value::Null => Self::default(),
			Value::Array(items) => Self::from_json_items(items),
			Value::String(text) => Self::parse_text(&text),
			other => Self::from_urls([other.to_string()]),
		}
	}

	fn from_json_items(items: Vec<Value>) -> Self {
		Self::from_urls(items.into_iter().filter_map(|item| match item {
			Value::String(url) => Some(url),
			Value::Null => None,
			other => Some(other.to_string()),
		}))
	}

	/// Appends URLs, keeping first occurrences.
	pub fn extend<I, S>(&mut self, urls: I)
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		for url in urls {
			let url = url.into();
			let url = url.trim();
			if url.is_empty() || self.0.iter().any(|existing| existing == url) {
				continue;
			}
			self.0.push(url.to_string());
		}
	}

	pub fn first(&self) -> Option<&str> {
		self.0.first().map(String::as_str)
	}

	pub fn len(&self) -> usize {
		self.0.len()
	}

	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}

	pub fn iter(&self) -> impl Iterator<Item = &str> {
		self.0.iter().map(String::as_str)
	}

	pub fn as_slice(&self) -> &[String] {
		&self.0
	}

	pub fn into_vec(self) -> Vec<String> {
		self.0
	}
}

impl<'a> IntoIterator for &'a ImageList {
	type Item = &'a String;
	type IntoIter = std::slice::Iter<'a, String>;

	fn into_iter(self) -> Self::IntoIter {
		self.0.iter()
	}
}

impl Serialize for ImageList {
	fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
		self.0.serialize(serializer)
	}
}

impl<'de> Deserialize<'de> for ImageList {
	fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
		Ok(Self::from_value(Value::deserialize(deserializer)?))
	}
}
