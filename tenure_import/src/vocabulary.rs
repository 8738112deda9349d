use std::collections::BTreeSet;

/// The choice lists location and tenure types are validated against.
pub trait Vocabulary {
	fn is_location_type(&self, code: &str) -> bool;
	fn tenure_type_exists(&self, id: &str) -> bool;
}

/// A fixed vocabulary held in memory.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StaticVocabulary {
	location_types: BTreeSet<String>,
	tenure_types: BTreeSet<String>,
}

pub const LOCATION_TYPES: [(&str, &str); 9] = [
	("PA", "Parcel"),
	("CB", "Community boundary"),
	("BU", "Building"),
	("AP", "Apartment"),
	("PX", "Project extent"),
	("RW", "Right-of-way"),
	("UC", "Utility corridor"),
	("NP", "National park boundary"),
	("MI", "Miscellaneous"),
];

pub const TENURE_TYPES: [&str; 18] = [
	"CR", "CO", "CU", "EA", "ES", "FH", "GR", "HR", "IN", "JT", "LH", "LL", "MR", "OC", "TN", "TC", "UC", "WR",
];

impl StaticVocabulary {
	pub fn new<L, T>(location_types: L, tenure_types: T) -> Self
	where
		L: IntoIterator,
		L::Item: Into<String>,
		T: IntoIterator,
		T::Item: Into<String>,
	{
		Self {
			location_types: location_types.into_iter().map(Into::into).collect(),
			tenure_types: tenure_types.into_iter().map(Into::into).collect(),
		}
	}
}

impl Default for StaticVocabulary {
	fn default() -> Self {
		Self::new(LOCATION_TYPES.map(|(code, _)| code), TENURE_TYPES)
	}
}

impl Vocabulary for StaticVocabulary {
	fn is_location_type(&self, code: &str) -> bool {
		self.location_types.contains(code)
	}

	fn tenure_type_exists(&self, id: &str) -> bool {
		self.tenure_types.contains(id)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	#[case("PA", true)]
	#[case("MI", true)]
	#[case("ZZ", false)]
	#[case("pa", false)]
	#[case("", false)]
	fn location_types(#[case] code: &str, #[case] expected: bool) {
		assert_eq!(StaticVocabulary::default().is_location_type(code), expected);
	}

	#[rstest]
	#[case("FH", true)]
	#[case("WR", true)]
	#[case("XX", false)]
	fn tenure_types(#[case] id: &str, #[case] expected: bool) {
		assert_eq!(StaticVocabulary::default().tenure_type_exists(id), expected);
	}

	#[test]
	fn custom_vocabulary() {
		let vocabulary = StaticVocabulary::new(["FARM"], ["LEASE"]);
		assert!(vocabulary.is_location_type("FARM"));
		assert!(!vocabulary.is_location_type("PA"));
		assert!(vocabulary.tenure_type_exists("LEASE"));
	}
}
