//! Assembly of attribute payloads from a validated row.

use crate::{
	config::SourceFormat,
	error::ValidationError,
	mapper::AttributeMap,
	model::{AttributeType, AttributeValue, Attributes, ContentType},
	validator::cell,
};
use std::collections::BTreeMap;

/// Attribute payload per content type of one row.
///
/// Only content types with an entry are filled, so the caller seeds one entry
/// per entity it is going to create for the row.
pub type Payloads = BTreeMap<ContentType, Attributes>;

/// Splits a `select_multiple` cell into its trimmed, non-empty choices.
#[must_use]
pub fn split_choices(raw: &str) -> Vec<String> {
	raw
		.split(',')
		.map(str::trim)
		.filter(|choice| !choice.is_empty())
		.map(String::from)
		.collect()
}

/// Fills `payloads` with the values of the requested attributes.
///
/// Keys that match no mapped attribute are skipped. An empty cell is skipped
/// for optional attributes and fails the row for required ones.
pub fn materialize(
	headers: &[String],
	row: &[String],
	payloads: &mut Payloads,
	attribute_keys: &[String],
	attribute_map: &AttributeMap,
	format: SourceFormat,
) -> Result<(), ValidationError> {
	for key in attribute_keys {
		let (model, name) = format.attribute_key_for(key);
		let Some(mapped) = attribute_map.lookup_key(model.as_deref(), &name) else {
			log::warn!("attribute '{key}' is not part of the project schema or the source, skipping it");
			continue;
		};
		let Some(payload) = payloads.get_mut(&mapped.content_type) else {
			continue;
		};

		let raw = cell(headers, row, &mapped.header).unwrap_or_default();
		if raw.trim().is_empty() {
			if mapped.attribute.required {
				return Err(ValidationError::new(format!(
					"Missing value for required attribute '{}'.",
					mapped.attribute.name
				)));
			}
			continue;
		}

		let value = match mapped.attribute.attr_type {
			AttributeType::SelectMultiple => AttributeValue::List(split_choices(raw)),
			_ => AttributeValue::Text(raw.to_string()),
		};
		payload.insert(mapped.attribute.name.clone(), value);
	}
	Ok(())
}
