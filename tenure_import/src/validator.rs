//! Per-row structural and value checks.

use crate::{
	config::{FieldRole, ImportConfig, SourceFormat},
	error::ValidationError,
	model::EntityType,
	vocabulary::Vocabulary,
};
use std::collections::BTreeSet;
use tenure_geometry::{Geometry, GeometryKind, decode_geometry};

/// Returns the cell below `name`, if the column exists.
#[must_use]
pub fn cell<'r>(headers: &[String], row: &'r [String], name: &str) -> Option<&'r str> {
	let index = headers.iter().position(|h| h == name)?;
	row.get(index).map(String::as_str)
}

/// The columns the validator reads, resolved for one source format.
///
/// A `None` role is not checked at all.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FieldNames {
	pub party_name: Option<String>,
	pub party_type: Option<String>,
	pub geometry: Option<String>,
	pub location_type: Option<String>,
	pub tenure_type: Option<String>,
	pub party_id: Option<String>,
	pub location_id: Option<String>,
}

impl FieldNames {
	#[must_use]
	pub fn resolve(config: &ImportConfig, format: SourceFormat, active: &BTreeSet<EntityType>) -> Self {
		let name = |role| format.field_name_for(role, config);
		let parties = active.contains(&EntityType::Party);
		let locations = active.contains(&EntityType::Location);

		let mut fields = FieldNames::default();
		if parties {
			fields.party_name = name(FieldRole::PartyName);
			fields.party_type = name(FieldRole::PartyType);
			fields.party_id = name(FieldRole::PartyId);
		}
		if locations {
			fields.geometry = name(FieldRole::Geometry);
			fields.location_type = name(FieldRole::LocationType);
			fields.location_id = name(FieldRole::LocationId);
		}
		if fields.party_name.is_some() && fields.geometry.is_some() {
			fields.tenure_type = name(FieldRole::TenureType);
		}
		fields
	}
}

/// The core fields of a row that passed validation. Empty cells become
/// `None`, except the party name which is kept as read.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ValidatedRow {
	pub party_name: Option<String>,
	pub party_type: Option<String>,
	pub geometry: Option<Geometry>,
	pub location_type: Option<String>,
	pub tenure_type: Option<String>,
}

fn non_empty(value: &str) -> Option<String> {
	let value = value.trim();
	(!value.is_empty()).then(|| value.to_string())
}

fn required_column<'r>(headers: &[String], row: &'r [String], field: &str) -> Result<&'r str, ValidationError> {
	cell(headers, row, field).ok_or_else(|| ValidationError::new(format!("No '{field}' column found.")))
}

/// Checks one row. The first failing check ends validation.
pub fn validate_row(
	headers: &[String],
	row: &[String],
	fields: &FieldNames,
	geometry_kind: GeometryKind,
	vocabulary: &dyn Vocabulary,
) -> Result<ValidatedRow, ValidationError> {
	if headers.len() != row.len() {
		return Err(ValidationError::new("Number of headers and columns do not match."));
	}

	let mut result = ValidatedRow::default();

	if let (Some(name_field), Some(type_field)) = (&fields.party_name, &fields.party_type) {
		result.party_name = Some(required_column(headers, row, name_field)?.trim().to_string());
		result.party_type = non_empty(required_column(headers, row, type_field)?);
	}

	if let Some(field) = &fields.geometry {
		let raw = required_column(headers, row, field)?;
		result.geometry = decode_geometry(raw, geometry_kind).map_err(|err| {
			log::debug!("{err}");
			ValidationError::new("Invalid geometry.")
		})?;
	}

	if let Some(field) = &fields.location_type {
		let value = non_empty(required_column(headers, row, field)?);
		if let Some(code) = value.as_deref().filter(|code| !vocabulary.is_location_type(code)) {
			return Err(ValidationError::new(format!("Invalid location_type: '{code}'.")));
		}
		result.location_type = value;
	}

	if let Some(field) = &fields.tenure_type {
		let value = non_empty(required_column(headers, row, field)?);
		if let Some(id) = value.as_deref().filter(|id| !vocabulary.tenure_type_exists(id)) {
			return Err(ValidationError::new(format!("Invalid tenure_type: '{id}'.")));
		}
		result.tenure_type = value;
	}

	Ok(result)
}
