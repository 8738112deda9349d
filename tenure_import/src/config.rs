//! Per-run import options and the format specific naming of columns.

use crate::model::EntityType;
use anyhow::{Context, Result, ensure};
use serde::Deserialize;
use std::{
	collections::BTreeSet,
	fs::File,
	io::{BufReader, Read},
	path::Path,
};
use tenure_geometry::GeometryKind;

/// Source file format.
#[derive(Clone, Copy, Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SourceFormat {
	/// Delimited text with a single header line.
	#[default]
	Csv,
	/// Spreadsheet with `locations`, `parties` and `relationships` worksheets.
	Xls,
}

/// The columns the importer reads for its own purposes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FieldRole {
	PartyName,
	PartyType,
	LocationType,
	Geometry,
	TenureType,
	PartyId,
	LocationId,
}

impl FieldRole {
	fn namespace(&self) -> &'static str {
		match self {
			FieldRole::PartyName | FieldRole::PartyType | FieldRole::PartyId => "party",
			FieldRole::LocationType | FieldRole::Geometry | FieldRole::LocationId => "spatialunit",
			FieldRole::TenureType => "tenurerelationship",
		}
	}
}

impl SourceFormat {
	/// The header a field role is read from, or `None` if the role is not
	/// configured.
	///
	/// Spreadsheet columns are namespaced by their worksheet, so the role name
	/// gets a `model::` prefix unless it already has one. External ids are
	/// always the worksheet's `id` column there.
	#[must_use]
	pub fn field_name_for(&self, role: FieldRole, config: &ImportConfig) -> Option<String> {
		let name = match (self, role) {
			(SourceFormat::Xls, FieldRole::PartyId | FieldRole::LocationId) => "id",
			(_, FieldRole::PartyName) => config.party_name_field.as_deref()?,
			(_, FieldRole::PartyType) => config.party_type_field.as_deref()?,
			(_, FieldRole::LocationType) => config.location_type_field.as_deref()?,
			(_, FieldRole::Geometry) => config.geometry_field.as_deref()?,
			(_, FieldRole::TenureType) => config.tenure_type_field.as_str(),
			(_, FieldRole::PartyId) => config.party_id_field.as_str(),
			(_, FieldRole::LocationId) => config.location_id_field.as_str(),
		};
		let name = name.trim().to_lowercase();
		Some(match self {
			SourceFormat::Csv => name,
			SourceFormat::Xls if name.contains("::") => name,
			SourceFormat::Xls => format!("{}::{name}", role.namespace()),
		})
	}

	/// Splits a requested attribute key into its optional model namespace and
	/// the lower-cased attribute name.
	#[must_use]
	pub fn attribute_key_for(&self, key: &str) -> (Option<String>, String) {
		let key = key.trim().to_lowercase();
		match key.split_once("::") {
			Some((model, name)) => (Some(model.to_string()), name.to_string()),
			None => (None, key),
		}
	}
}

/// Collects `entity_types`, adding a tenure relationship when both parties and
/// locations are present.
pub fn with_implied_relationship(entity_types: impl IntoIterator<Item = EntityType>) -> BTreeSet<EntityType> {
	let mut types: BTreeSet<EntityType> = entity_types.into_iter().collect();
	if types.contains(&EntityType::Party) && types.contains(&EntityType::Location) {
		types.insert(EntityType::TenureRelationship);
	}
	types
}

fn default_tenure_type_field() -> String {
	String::from("tenure_type")
}

fn default_party_id_field() -> String {
	String::from("party_id")
}

fn default_location_id_field() -> String {
	String::from("location_id")
}

fn default_delimiter() -> char {
	','
}

/// Options of one import run.
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ImportConfig {
	pub entity_types: Vec<EntityType>,

	#[serde(default, rename = "type")]
	pub format: SourceFormat,

	#[serde(default)]
	pub party_name_field: Option<String>,
	#[serde(default)]
	pub party_type_field: Option<String>,
	#[serde(default)]
	pub location_type_field: Option<String>,
	#[serde(default)]
	pub geometry_field: Option<String>,
	#[serde(default = "default_tenure_type_field")]
	pub tenure_type_field: String,

	/// Column with the external party id used for deduplication (delimited text only).
	#[serde(default = "default_party_id_field")]
	pub party_id_field: String,
	/// Column with the external location id used for deduplication (delimited text only).
	#[serde(default = "default_location_id_field")]
	pub location_id_field: String,

	#[serde(default)]
	pub geometry_kind: GeometryKind,

	#[serde(default = "default_delimiter")]
	pub delimiter: char,

	/// Attribute keys to import, `model::name` for spreadsheets.
	#[serde(default)]
	pub attributes: Vec<String>,
}

impl ImportConfig {
	pub fn new(entity_types: &[EntityType]) -> Self {
		Self {
			entity_types: entity_types.to_vec(),
			format: SourceFormat::default(),
			party_name_field: None,
			party_type_field: None,
			location_type_field: None,
			geometry_field: None,
			tenure_type_field: default_tenure_type_field(),
			party_id_field: default_party_id_field(),
			location_id_field: default_location_id_field(),
			geometry_kind: GeometryKind::default(),
			delimiter: default_delimiter(),
			attributes: Vec::new(),
		}
	}

	#[must_use]
	pub fn with_format(mut self, format: SourceFormat) -> Self {
		self.format = format;
		self
	}

	#[must_use]
	pub fn with_party_fields(mut self, name: &str, party_type: &str) -> Self {
		self.party_name_field = Some(name.to_string());
		self.party_type_field = Some(party_type.to_string());
		self
	}

	#[must_use]
	pub fn with_location_fields(mut self, geometry: &str, location_type: Option<&str>) -> Self {
		self.geometry_field = Some(geometry.to_string());
		self.location_type_field = location_type.map(String::from);
		self
	}

	#[must_use]
	pub fn with_tenure_type_field(mut self, name: &str) -> Self {
		self.tenure_type_field = name.to_string();
		self
	}

	#[must_use]
	pub fn with_geometry_kind(mut self, kind: GeometryKind) -> Self {
		self.geometry_kind = kind;
		self
	}

	#[must_use]
	pub fn with_delimiter(mut self, delimiter: char) -> Self {
		self.delimiter = delimiter;
		self
	}

	#[must_use]
	pub fn with_attributes(mut self, attributes: &[&str]) -> Self {
		self.attributes = attributes.iter().map(|a| (*a).to_string()).collect();
		self
	}

	pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
		Ok(serde_yaml_ng::from_reader(reader)?)
	}

	pub fn from_string(text: &str) -> Result<Self> {
		Ok(serde_yaml_ng::from_str(text)?)
	}

	pub fn from_path(path: &Path) -> Result<Self> {
		let file = File::open(path).with_context(|| format!("opening import config {path:?}"))?;
		ImportConfig::from_reader(BufReader::new(file)).with_context(|| format!("parsing import config {path:?}"))
	}

	/// Requested entity types, with a tenure relationship added whenever both
	/// parties and locations are imported.
	#[must_use]
	pub fn active_entity_types(&self) -> BTreeSet<EntityType> {
		with_implied_relationship(self.entity_types.iter().copied())
	}

	pub fn validate(&self) -> Result<()> {
		ensure!(!self.entity_types.is_empty(), "no entity types selected");
		if self.entity_types.contains(&EntityType::Party) {
			ensure!(
				self.party_name_field.is_some() && self.party_type_field.is_some(),
				"importing parties requires 'party_name_field' and 'party_type_field'"
			);
		}
		if self.entity_types.contains(&EntityType::Location) {
			ensure!(
				self.geometry_field.is_some(),
				"importing locations requires 'geometry_field'"
			);
		}
		ensure!(
			self.delimiter.is_ascii(),
			"delimiter '{}' is not an ASCII character",
			self.delimiter
		);
		Ok(())
	}
}
