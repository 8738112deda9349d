//! Core vocabulary of the importer: entity and content types, attribute
//! definitions, and the entities handed to the store.

use serde::Deserialize;
use std::{collections::BTreeMap, fmt::Display, str::FromStr};
use tenure_geometry::Geometry;

/// The entity types a caller can ask to import.
#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum EntityType {
	#[serde(rename = "PT")]
	Party,
	#[serde(rename = "SU")]
	Location,
	#[serde(rename = "TR")]
	TenureRelationship,
}

impl EntityType {
	#[must_use]
	pub fn code(&self) -> &'static str {
		match self {
			EntityType::Party => "PT",
			EntityType::Location => "SU",
			EntityType::TenureRelationship => "TR",
		}
	}

	#[must_use]
	pub fn content_type(&self) -> ContentType {
		match self {
			EntityType::Party => ContentType::Party,
			EntityType::Location => ContentType::SpatialUnit,
			EntityType::TenureRelationship => ContentType::TenureRelationship,
		}
	}
}

impl Display for EntityType {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.write_str(self.code())
	}
}

/// Every model that can carry questionnaire attributes, in resolution order.
///
/// The order matters: when two content types claim the same header, the later
/// one wins.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ContentType {
	Party,
	SpatialUnit,
	TenureRelationship,
	PartyRelationship,
	SpatialRelationship,
}

impl ContentType {
	pub const ALL: [ContentType; 5] = [
		ContentType::Party,
		ContentType::SpatialUnit,
		ContentType::TenureRelationship,
		ContentType::PartyRelationship,
		ContentType::SpatialRelationship,
	];

	/// Model name, also used as the column namespace in spreadsheets.
	#[must_use]
	pub fn model_name(&self) -> &'static str {
		match self {
			ContentType::Party => "party",
			ContentType::SpatialUnit => "spatialunit",
			ContentType::TenureRelationship => "tenurerelationship",
			ContentType::PartyRelationship => "partyrelationship",
			ContentType::SpatialRelationship => "spatialrelationship",
		}
	}

	/// `app_label.model` key under which schemas are registered.
	#[must_use]
	pub fn key(&self) -> &'static str {
		match self {
			ContentType::Party => "party.party",
			ContentType::SpatialUnit => "spatial.spatialunit",
			ContentType::TenureRelationship => "party.tenurerelationship",
			ContentType::PartyRelationship => "party.partyrelationship",
			ContentType::SpatialRelationship => "spatial.spatialrelationship",
		}
	}

	#[must_use]
	pub fn label(&self) -> &'static str {
		match self {
			ContentType::Party => "Party",
			ContentType::SpatialUnit => "Location",
			ContentType::TenureRelationship => "Tenure Relationship",
			ContentType::PartyRelationship => "Party Relationship",
			ContentType::SpatialRelationship => "Spatial Relationship",
		}
	}

	/// The importable entity type backed by this content type, if any.
	#[must_use]
	pub fn entity_type(&self) -> Option<EntityType> {
		match self {
			ContentType::Party => Some(EntityType::Party),
			ContentType::SpatialUnit => Some(EntityType::Location),
			ContentType::TenureRelationship => Some(EntityType::TenureRelationship),
			ContentType::PartyRelationship | ContentType::SpatialRelationship => None,
		}
	}
}

/// Questionnaire field type of an attribute.
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
#[serde(from = "String")]
pub enum AttributeType {
	Text,
	Integer,
	Decimal,
	Date,
	DateTime,
	Time,
	SelectOne,
	SelectMultiple,
	Boolean,
	Note,
	Photo,
	Audio,
	Video,
	GeoPoint,
	GeoTrace,
	GeoShape,
	Other(String),
}

impl FromStr for AttributeType {
	type Err = std::convert::Infallible;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		use AttributeType::*;
		Ok(match s {
			"text" => Text,
			"integer" => Integer,
			"decimal" => Decimal,
			"date" => Date,
			"dateTime" => DateTime,
			"time" => Time,
			"select_one" => SelectOne,
			"select_multiple" => SelectMultiple,
			"boolean" => Boolean,
			"note" => Note,
			"photo" => Photo,
			"audio" => Audio,
			"video" => Video,
			"geopoint" => GeoPoint,
			"geotrace" => GeoTrace,
			"geoshape" => GeoShape,
			other => Other(other.to_string()),
		})
	}
}

impl From<String> for AttributeType {
	fn from(value: String) -> Self {
		match value.parse() {
			Ok(t) => t,
			Err(never) => match never {},
		}
	}
}

impl From<&str> for AttributeType {
	fn from(value: &str) -> Self {
		AttributeType::from(value.to_string())
	}
}

/// One attribute of a project's questionnaire schema.
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
pub struct AttributeDefinition {
	pub name: String,
	#[serde(rename = "type")]
	pub attr_type: AttributeType,
	#[serde(default)]
	pub required: bool,
	#[serde(default)]
	pub omit: bool,
}

impl AttributeDefinition {
	pub fn new(name: &str, attr_type: impl Into<AttributeType>) -> Self {
		Self {
			name: name.to_string(),
			attr_type: attr_type.into(),
			required: false,
			omit: false,
		}
	}

	#[must_use]
	pub fn required(mut self) -> Self {
		self.required = true;
		self
	}

	#[must_use]
	pub fn omitted(mut self) -> Self {
		self.omit = true;
		self
	}
}

/// (organization, project, active questionnaire) triple that selects the
/// attribute schemas of one project.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct EntitySelector {
	pub organization: String,
	pub project: String,
	pub questionnaire: String,
}

impl EntitySelector {
	pub fn new(organization: &str, project: &str, questionnaire: &str) -> Self {
		Self {
			organization: organization.to_string(),
			project: project.to_string(),
			questionnaire: questionnaire.to_string(),
		}
	}
}

impl Display for EntitySelector {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "{}/{}/{}", self.organization, self.project, self.questionnaire)
	}
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AttributeValue {
	Text(String),
	List(Vec<String>),
}

impl From<&str> for AttributeValue {
	fn from(value: &str) -> Self {
		AttributeValue::Text(value.to_string())
	}
}

impl From<Vec<&str>> for AttributeValue {
	fn from(value: Vec<&str>) -> Self {
		AttributeValue::List(value.into_iter().map(String::from).collect())
	}
}

pub type Attributes = BTreeMap<String, AttributeValue>;

/// Identifier handed out by the entity store.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EntityId(pub u64);

impl Display for EntityId {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "#{}", self.0)
	}
}

/// Type specific fields of an entity.
#[derive(Clone, Debug, PartialEq)]
pub enum CoreFields {
	Party {
		name: String,
		party_type: Option<String>,
	},
	Location {
		geometry: Option<Geometry>,
		location_type: Option<String>,
	},
	TenureRelationship {
		party: EntityId,
		location: EntityId,
		tenure_type: Option<String>,
	},
}

/// An entity assembled from one row, ready to be persisted.
#[derive(Clone, Debug, PartialEq)]
pub struct MaterializedEntity {
	pub core: CoreFields,
	pub attributes: Attributes,
}

impl MaterializedEntity {
	#[must_use]
	pub fn entity_type(&self) -> EntityType {
		match self.core {
			CoreFields::Party { .. } => EntityType::Party,
			CoreFields::Location { .. } => EntityType::Location,
			CoreFields::TenureRelationship { .. } => EntityType::TenureRelationship,
		}
	}
}
