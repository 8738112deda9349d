//! Lookup of the questionnaire attributes that apply to a project.

use crate::model::{AttributeDefinition, ContentType, EntitySelector};
use anyhow::Result;
use std::collections::{BTreeMap, HashMap};
use tenure_derive::context;

/// A set of attributes registered for one content type and selector.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Schema {
	pub attributes: Vec<AttributeDefinition>,
}

impl Schema {
	pub fn new(attributes: Vec<AttributeDefinition>) -> Self {
		Self { attributes }
	}
}

/// Read-only access to the attribute schemas of a project.
pub trait SchemaStore {
	/// Returns every schema registered for `content_type` under `selector`.
	/// A content type without schemas yields an empty list.
	fn lookup(&self, content_type: ContentType, selector: &EntitySelector) -> Result<Vec<Schema>>;
}

/// Schema store that keeps everything in memory.
#[derive(Default)]
pub struct MemorySchemaStore {
	schemas: HashMap<(ContentType, EntitySelector), Vec<Schema>>,
}

impl MemorySchemaStore {
	#[must_use]
	pub fn new() -> Self {
		Self::default()
	}

	pub fn register(&mut self, content_type: ContentType, selector: &EntitySelector, schema: Schema) {
		self
			.schemas
			.entry((content_type, selector.clone()))
			.or_default()
			.push(schema);
	}
}

impl SchemaStore for MemorySchemaStore {
	fn lookup(&self, content_type: ContentType, selector: &EntitySelector) -> Result<Vec<Schema>> {
		Ok(self
			.schemas
			.get(&(content_type, selector.clone()))
			.cloned()
			.unwrap_or_default())
	}
}

/// Non-omitted attributes per content type.
pub type SchemaAttrs = BTreeMap<ContentType, Vec<AttributeDefinition>>;

/// Resolves the attribute schemas of one project, once per import run.
pub struct SchemaResolver<'a> {
	store: &'a dyn SchemaStore,
	selector: EntitySelector,
	cache: Option<SchemaAttrs>,
}

impl<'a> SchemaResolver<'a> {
	pub fn new(store: &'a dyn SchemaStore, selector: EntitySelector) -> Self {
		Self {
			store,
			selector,
			cache: None,
		}
	}

	#[must_use]
	pub fn selector(&self) -> &EntitySelector {
		&self.selector
	}

	/// Attributes of every content type, in content type order, without the
	/// ones flagged `omit`. Only the first call hits the store.
	pub fn get_schema_attrs(&mut self) -> Result<&SchemaAttrs> {
		if self.cache.is_none() {
			let attrs = self.load()?;
			self.cache = Some(attrs);
		}
		Ok(self.cache.get_or_insert_default())
	}

	#[context("resolving attribute schemas for {}", self.selector)]
	fn load(&self) -> Result<SchemaAttrs> {
		let mut result = SchemaAttrs::new();
		for content_type in ContentType::ALL {
			let attributes: Vec<AttributeDefinition> = self
				.store
				.lookup(content_type, &self.selector)?
				.into_iter()
				.flat_map(|schema| schema.attributes)
				.filter(|attr| !attr.omit)
				.collect();
			log::trace!("{} attributes for {}", attributes.len(), content_type.key());
			result.insert(content_type, attributes);
		}
		Ok(result)
	}
}
