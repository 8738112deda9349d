//! Matching of source headers against the questionnaire attributes.

use crate::{
	config::SourceFormat,
	model::{AttributeDefinition, ContentType, EntityType},
	schema::SchemaAttrs,
};
use std::collections::{BTreeMap, BTreeSet};

/// An attribute that was found in the source headers.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MappedAttribute {
	pub attribute: AttributeDefinition,
	pub content_type: ContentType,
	pub label: &'static str,
	/// The source column holding the attribute's values.
	pub header: String,
}

/// Attributes found in the headers, keyed by model name and lower-cased
/// attribute name.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AttributeMap {
	models: BTreeMap<&'static str, BTreeMap<String, MappedAttribute>>,
	headers: BTreeMap<String, (&'static str, String)>,
}

impl AttributeMap {
	#[must_use]
	pub fn get(&self, model: &str, name: &str) -> Option<&MappedAttribute> {
		self.models.get(model)?.get(name)
	}

	/// The attribute a source column was mapped to.
	#[must_use]
	pub fn by_header(&self, header: &str) -> Option<&MappedAttribute> {
		let (model, name) = self.headers.get(header)?;
		self.get(model, name)
	}

	/// Resolves a requested attribute key: `model::name` is looked up directly,
	/// a bare name is looked up through the column it was matched against.
	#[must_use]
	pub fn lookup_key(&self, model: Option<&str>, name: &str) -> Option<&MappedAttribute> {
		match model {
			Some(model) => self.get(model, name),
			None => self.by_header(name),
		}
	}

	/// Mapped attributes of one model.
	pub fn model(&self, model: &str) -> impl Iterator<Item = &MappedAttribute> {
		self.models.get(model).into_iter().flat_map(BTreeMap::values)
	}

	pub fn iter(&self) -> impl Iterator<Item = &MappedAttribute> {
		self.models.values().flat_map(BTreeMap::values)
	}

	#[must_use]
	pub fn len(&self) -> usize {
		self.headers.len()
	}

	#[must_use]
	pub fn is_empty(&self) -> bool {
		self.headers.is_empty()
	}

	fn insert(&mut self, mapped: MappedAttribute) {
		let model = mapped.content_type.model_name();
		let name = mapped.attribute.name.to_lowercase();
		if let Some((previous_model, previous_name)) =
			self.headers.insert(mapped.header.clone(), (model, name.clone()))
		{
			log::warn!(
				"column '{}' matches attributes of both '{previous_model}' and '{model}', using '{model}'",
				mapped.header
			);
			if let Some(entries) = self.models.get_mut(previous_model) {
				entries.remove(&previous_name);
			}
		}
		self.models.entry(model).or_default().insert(name, mapped);
	}
}

/// Result of matching the headers of a source.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct HeaderMapping {
	pub attribute_map: AttributeMap,
	/// Schema attributes that will not be imported, sorted.
	pub extra_attrs: Vec<String>,
	/// Source columns that match no schema attribute, sorted.
	pub extra_headers: Vec<String>,
}

fn header_for(format: SourceFormat, content_type: ContentType, name: &str) -> String {
	match format {
		SourceFormat::Csv => name.to_string(),
		SourceFormat::Xls => format!("{}::{name}", content_type.model_name()),
	}
}

/// Partitions `headers` into mapped attributes, attributes that will not be
/// imported and columns without an attribute.
///
/// `entity_types` must already contain the implied tenure relationship.
/// Header matching is case-insensitive. When a column matches attributes of
/// two content types the later content type wins.
#[must_use]
pub fn build_map(
	schema_attrs: &SchemaAttrs,
	headers: &[String],
	entity_types: &BTreeSet<EntityType>,
	format: SourceFormat,
) -> HeaderMapping {
	let header_set: BTreeSet<String> = headers.iter().map(|h| h.trim().to_lowercase()).collect();
	let mut attribute_map = AttributeMap::default();
	let mut extra_attrs = BTreeSet::new();
	let mut explained = BTreeSet::new();

	for (content_type, attributes) in schema_attrs {
		let selected = content_type
			.entity_type()
			.is_some_and(|entity_type| entity_types.contains(&entity_type));

		for attribute in attributes {
			let header = header_for(format, *content_type, &attribute.name.to_lowercase());
			if !selected {
				if header_set.contains(&header) {
					explained.insert(header.clone());
				}
				extra_attrs.insert(header);
			} else if header_set.contains(&header) {
				attribute_map.insert(MappedAttribute {
					attribute: attribute.clone(),
					content_type: *content_type,
					label: content_type.label(),
					header,
				});
			} else {
				extra_attrs.insert(header);
			}
		}
	}

	let extra_headers = header_set
		.into_iter()
		.filter(|h| attribute_map.by_header(h).is_none() && !explained.contains(h))
		.collect();

	log::debug!(
		"mapped {} columns to attributes, {} extra attributes",
		attribute_map.len(),
		extra_attrs.len()
	);

	HeaderMapping {
		attribute_map,
		extra_attrs: extra_attrs.into_iter().collect(),
		extra_headers,
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::model::AttributeType;
	use pretty_assertions::assert_eq;

	fn attr(name: &str) -> AttributeDefinition {
		AttributeDefinition::new(name, AttributeType::Text)
	}

	fn schema() -> SchemaAttrs {
		let mut attrs = SchemaAttrs::new();
		attrs.insert(ContentType::Party, vec![attr("gender"), attr("Homeowner")]);
		attrs.insert(ContentType::SpatialUnit, vec![attr("quality"), attr("infrastructure")]);
		attrs.insert(ContentType::TenureRelationship, vec![attr("notes_tr")]);
		attrs.insert(ContentType::PartyRelationship, vec![]);
		attrs.insert(ContentType::SpatialRelationship, vec![attr("shared_wall")]);
		attrs
	}

	fn strings(items: &[&str]) -> Vec<String> {
		items.iter().map(|s| (*s).to_string()).collect()
	}

	fn types(items: &[EntityType]) -> BTreeSet<EntityType> {
		items.iter().copied().collect()
	}

	#[test]
	fn only_unmapped_column_is_extra() {
		let headers = strings(&["gender", "homeowner", "quality", "infrastructure", "notes_tr", "notes"]);
		let mut attrs = schema();
		attrs.insert(ContentType::SpatialRelationship, vec![]);
		let mapping = build_map(
			&attrs,
			&headers,
			&types(&[EntityType::Party, EntityType::Location, EntityType::TenureRelationship]),
			SourceFormat::Csv,
		);
		assert_eq!(mapping.extra_headers, vec!["notes"]);
		assert_eq!(mapping.extra_attrs, Vec::<String>::new());
		assert_eq!(mapping.attribute_map.len(), 5);
	}

	#[test]
	fn unselected_types_are_extra_attrs() {
		let headers = strings(&["Gender", "quality", "shared_wall", "comment"]);
		let mapping = build_map(&schema(), &headers, &types(&[EntityType::Party]), SourceFormat::Csv);

		let gender = mapping.attribute_map.get("party", "gender").unwrap();
		assert_eq!(gender.content_type, ContentType::Party);
		assert_eq!(gender.label, "Party");
		assert_eq!(gender.header, "gender");

		assert_eq!(
			mapping.extra_attrs,
			vec!["homeowner", "infrastructure", "notes_tr", "quality", "shared_wall"]
		);
		// "quality" and "shared_wall" are explained by attributes of unselected types
		assert_eq!(mapping.extra_headers, vec!["comment"]);
	}

	#[test]
	fn namespaced_spreadsheet_headers() {
		let headers = strings(&[
			"party::gender",
			"party::id",
			"spatialunit::quality",
			"spatialunit::gender",
			"tenurerelationship::notes_tr",
		]);
		let mapping = build_map(
			&schema(),
			&headers,
			&types(&[EntityType::Party, EntityType::Location, EntityType::TenureRelationship]),
			SourceFormat::Xls,
		);
		let map = &mapping.attribute_map;
		assert!(map.get("party", "gender").is_some());
		assert!(map.get("spatialunit", "quality").is_some());
		assert!(map.get("tenurerelationship", "notes_tr").is_some());
		assert_eq!(
			map.lookup_key(Some("spatialunit"), "quality").map(|m| m.header.as_str()),
			Some("spatialunit::quality")
		);
		assert_eq!(mapping.extra_headers, vec!["party::id", "spatialunit::gender"]);
		assert_eq!(
			mapping.extra_attrs,
			vec![
				"party::homeowner",
				"spatialrelationship::shared_wall",
				"spatialunit::infrastructure"
			]
		);
	}

	#[test]
	fn collision_last_content_type_wins() {
		let mut attrs = SchemaAttrs::new();
		attrs.insert(ContentType::Party, vec![attr("notes")]);
		attrs.insert(ContentType::SpatialUnit, vec![attr("notes")]);
		let mapping = build_map(
			&attrs,
			&strings(&["notes"]),
			&types(&[EntityType::Party, EntityType::Location]),
			SourceFormat::Csv,
		);
		let map = &mapping.attribute_map;
		assert_eq!(map.by_header("notes").unwrap().content_type, ContentType::SpatialUnit);
		assert!(map.get("party", "notes").is_none());
		assert_eq!(map.model("party").count(), 0);
		assert_eq!(map.iter().count(), 1);
		assert!(mapping.extra_headers.is_empty());
	}
}
