//! The import run: header mapping, then validate, materialize and persist
//! every row inside one transaction.

use crate::{
	config::{ImportConfig, SourceFormat, with_implied_relationship},
	dedup::DedupContext,
	error::{DataImportError, ImportError},
	mapper::{HeaderMapping, build_map},
	materializer::{Payloads, materialize},
	model::{Attributes, ContentType, EntityId, EntitySelector, EntityType},
	schema::{SchemaResolver, SchemaStore},
	source::{CsvSource, ImportSource, XlsSource},
	store::EntityStore,
	validator::{FieldNames, cell, validate_row},
	vocabulary::Vocabulary,
};
use anyhow::{Context, Result, bail};
use std::{collections::BTreeSet, path::Path};

/// Where an import run currently is.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ImportPhase {
	#[default]
	Idle,
	HeaderRead,
	PerRow,
	Committed,
	Aborted,
}

/// Summary of a successful run.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ImportReport {
	pub rows: usize,
	pub parties_created: usize,
	pub locations_created: usize,
	pub relationships_created: usize,
	pub extra_headers: Vec<String>,
	pub extra_attrs: Vec<String>,
}

/// How a row's party or location was resolved.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Resolved {
	Created(EntityId),
	Reused(EntityId),
}

impl Resolved {
	#[must_use]
	pub fn id(&self) -> EntityId {
		match self {
			Resolved::Created(id) | Resolved::Reused(id) => *id,
		}
	}

	fn is_created(&self) -> bool {
		matches!(self, Resolved::Created(_))
	}
}

/// What a single row produced.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RowOutcome {
	pub party: Option<Resolved>,
	pub location: Option<Resolved>,
	pub relationship: Option<EntityId>,
}

/// Everything fixed for the duration of one run.
struct RunContext<'c> {
	config: &'c ImportConfig,
	format: SourceFormat,
	active: BTreeSet<EntityType>,
	headers: Vec<String>,
	fields: FieldNames,
	mapping: HeaderMapping,
}

/// Imports parties, locations and tenure relationships into an entity store.
///
/// A run is all-or-nothing: if any row fails, the store transaction is rolled
/// back and the error names the failing line.
pub struct Importer<'a, S: EntityStore> {
	resolver: SchemaResolver<'a>,
	vocabulary: &'a dyn Vocabulary,
	store: S,
	phase: ImportPhase,
}

impl<'a, S: EntityStore> Importer<'a, S> {
	pub fn new(schemas: &'a dyn SchemaStore, selector: EntitySelector, vocabulary: &'a dyn Vocabulary, store: S) -> Self {
		Self {
			resolver: SchemaResolver::new(schemas, selector),
			vocabulary,
			store,
			phase: ImportPhase::Idle,
		}
	}

	#[must_use]
	pub fn phase(&self) -> ImportPhase {
		self.phase
	}

	#[must_use]
	pub fn store(&self) -> &S {
		&self.store
	}

	pub fn into_store(self) -> S {
		self.store
	}

	fn set_phase(&mut self, phase: ImportPhase) {
		log::debug!("import {:?} -> {:?}", self.phase, phase);
		self.phase = phase;
	}

	/// Maps the headers of `source` against the project schema without
	/// importing anything.
	pub fn attribute_map(&mut self, source: &dyn ImportSource, entity_types: &[EntityType]) -> Result<HeaderMapping> {
		let active = with_implied_relationship(entity_types.iter().copied());
		let schema_attrs = self.resolver.get_schema_attrs()?;
		Ok(build_map(schema_attrs, &source.mappable_headers(), &active, source.format()))
	}

	/// Opens the file at `path` with the front-end selected by `config.format`
	/// and imports it.
	pub fn import_path(&mut self, path: &Path, config: &ImportConfig) -> Result<ImportReport, DataImportError> {
		config.validate()?;
		match config.format {
			SourceFormat::Csv => {
				let mut source = CsvSource::open(path, config.delimiter)?;
				self.run(&mut source, config)
			}
			SourceFormat::Xls => {
				let mut source = XlsSource::open(path, &config.active_entity_types())?;
				self.run(&mut source, config)
			}
		}
	}

	/// Imports every row of `source`.
	pub fn import(&mut self, source: &mut dyn ImportSource, config: &ImportConfig) -> Result<ImportReport, DataImportError> {
		config.validate()?;
		self.run(source, config)
	}

	/// Runs an import with an already validated `config`.
	fn run(&mut self, source: &mut dyn ImportSource, config: &ImportConfig) -> Result<ImportReport, DataImportError> {
		self.set_phase(ImportPhase::Idle);
		let context = self.read_header(&*source, config)?;

		self.store.begin().context("starting transaction")?;
		self.set_phase(ImportPhase::PerRow);

		let mut dedup = DedupContext::new();
		let mut report = ImportReport::default();

		for (index, row) in source.rows().enumerate() {
			let line = index + 1;
			let outcome = row
				.map_err(ImportError::from)
				.and_then(|row| self.process_row(&context, &mut dedup, &row));

			match outcome {
				Ok(outcome) => {
					log::trace!("line {line}: {outcome:?}");
					report.rows += 1;
					report.parties_created += usize::from(outcome.party.is_some_and(|r| r.is_created()));
					report.locations_created += usize::from(outcome.location.is_some_and(|r| r.is_created()));
					report.relationships_created += usize::from(outcome.relationship.is_some());
				}
				Err(err) => return Err(self.abort(DataImportError::from_row(line, &err))),
			}
		}

		if let Err(err) = self.store.commit() {
			return Err(self.abort(DataImportError::format(format!("{:#}", err.context("committing import")))));
		}
		self.set_phase(ImportPhase::Committed);

		report.extra_headers = context.mapping.extra_headers;
		report.extra_attrs = context.mapping.extra_attrs;
		log::info!(
			"imported {} rows: {} parties, {} locations, {} tenure relationships",
			report.rows,
			report.parties_created,
			report.locations_created,
			report.relationships_created
		);
		Ok(report)
	}

	fn read_header<'c>(
		&mut self,
		source: &dyn ImportSource,
		config: &'c ImportConfig,
	) -> Result<RunContext<'c>, DataImportError> {
		let format = source.format();
		if format != config.format {
			return Err(DataImportError::format(format!(
				"source is {format:?} but the import is configured for {:?}",
				config.format
			)));
		}

		let active = config.active_entity_types();
		let mapping = self.attribute_map(source, &config.entity_types)?;
		let context = RunContext {
			config,
			format,
			fields: FieldNames::resolve(config, format, &active),
			headers: source.headers().to_vec(),
			active,
			mapping,
		};
		self.set_phase(ImportPhase::HeaderRead);
		log::debug!("read {} headers", context.headers.len());
		Ok(context)
	}

	fn abort(&mut self, err: DataImportError) -> DataImportError {
		if let Err(rollback_err) = self.store.rollback() {
			log::warn!("rolling back the import failed: {rollback_err:#}");
		}
		self.set_phase(ImportPhase::Aborted);
		log::debug!("import aborted: {err}");
		err
	}

	fn process_row(&mut self, ctx: &RunContext<'_>, dedup: &mut DedupContext, row: &[String]) -> Result<RowOutcome, ImportError> {
		let headers = &ctx.headers;
		let validated = validate_row(headers, row, &ctx.fields, ctx.config.geometry_kind, self.vocabulary)?;

		let external_id = |field: Option<&str>| {
			field
				.and_then(|f| cell(headers, row, f))
				.map(str::trim)
				.unwrap_or_default()
		};
		let party_id = external_id(ctx.fields.party_id.as_deref());
		let location_id = external_id(ctx.fields.location_id.as_deref());

		// A row referring to an entity seen before links to it even when its
		// own core cells are blank.
		let party_seen = dedup.lookup(EntityType::Party, party_id).is_some();
		let location_seen = dedup.lookup(EntityType::Location, location_id).is_some();

		let party_active = ctx.active.contains(&EntityType::Party)
			&& (party_seen || validated.party_name.as_deref().is_some_and(|name| !name.is_empty()));
		let location_active = ctx.active.contains(&EntityType::Location)
			&& (location_seen || validated.geometry.is_some() || validated.location_type.is_some());
		let relationship_active = party_active && location_active;

		// Reused entities keep their attributes, so only new ones get a payload.
		let mut payloads = Payloads::new();
		for (active, content_type) in [
			(party_active && !party_seen, ContentType::Party),
			(location_active && !location_seen, ContentType::SpatialUnit),
			(relationship_active, ContentType::TenureRelationship),
		] {
			if active {
				payloads.insert(content_type, Attributes::new());
			}
		}
		materialize(
			headers,
			row,
			&mut payloads,
			&ctx.config.attributes,
			&ctx.mapping.attribute_map,
			ctx.format,
		)?;
		let mut payload = |content_type: ContentType| payloads.remove(&content_type).unwrap_or_default();

		let mut outcome = RowOutcome::default();

		if location_active {
			let attributes = payload(ContentType::SpatialUnit);
			let geometry = validated.geometry.clone();
			let location_type = validated.location_type.as_deref();
			outcome.location = Some(self.resolve(dedup, EntityType::Location, location_id, |store| {
				store
					.create_location(geometry, location_type, attributes)
					.context("creating location")
			})?);
		}

		if party_active {
			let attributes = payload(ContentType::Party);
			let name = validated.party_name.as_deref().unwrap_or_default();
			let party_type = validated.party_type.as_deref();
			outcome.party = Some(self.resolve(dedup, EntityType::Party, party_id, |store| {
				store
					.create_party(name, party_type, attributes)
					.context("creating party")
			})?);
		}

		if let (Some(party), Some(location)) = (outcome.party, outcome.location) {
			let id = self
				.store
				.create_relationship(
					party.id(),
					location.id(),
					validated.tenure_type.as_deref(),
					payload(ContentType::TenureRelationship),
				)
				.context("creating tenure relationship")?;
			outcome.relationship = Some(id);
		}

		Ok(outcome)
	}

	/// Reuses the entity recorded for `external_id`, or creates a new one and
	/// records it.
	fn resolve(
		&mut self,
		dedup: &mut DedupContext,
		entity_type: EntityType,
		external_id: &str,
		create: impl FnOnce(&mut S) -> Result<EntityId>,
	) -> Result<Resolved> {
		if let Some(id) = dedup.lookup(entity_type, external_id) {
			if self.store.get(entity_type, id)?.is_none() {
				bail!("{entity_type} {id} created for '{external_id}' no longer exists");
			}
			return Ok(Resolved::Reused(id));
		}
		let id = create(&mut self.store)?;
		dedup.record(entity_type, external_id, id);
		Ok(Resolved::Created(id))
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::{
		model::{AttributeDefinition, AttributeValue, CoreFields},
		schema::{MemorySchemaStore, Schema},
		store::MemoryStore,
		vocabulary::StaticVocabulary,
	};
	use pretty_assertions::assert_eq;

	fn selector() -> EntitySelector {
		EntitySelector::new("org", "proj", "q1")
	}

	fn schemas() -> MemorySchemaStore {
		let mut store = MemorySchemaStore::new();
		store.register(
			ContentType::Party,
			&selector(),
			Schema::new(vec![AttributeDefinition::new("gender", "select_one")]),
		);
		store.register(
			ContentType::SpatialUnit,
			&selector(),
			Schema::new(vec![AttributeDefinition::new("infrastructure", "select_multiple")]),
		);
		store
	}

	fn config() -> ImportConfig {
		ImportConfig::new(&[EntityType::Party, EntityType::Location])
			.with_party_fields("name", "ptype")
			.with_location_fields("geom", Some("ltype"))
			.with_attributes(&["gender", "infrastructure"])
	}

	fn csv(text: &str) -> CsvSource<&[u8]> {
		CsvSource::from_reader(text.as_bytes(), ',').unwrap()
	}

	const HEADER: &str = "name,ptype,ltype,geom,tenure_type,gender,infrastructure,location_id\n";

	#[test]
	fn imports_rows_and_attributes() -> Result<()> {
		let schemas = schemas();
		let vocabulary = StaticVocabulary::default();
		let mut importer = Importer::new(&schemas, selector(), &vocabulary, MemoryStore::new());

		let text = format!("{HEADER}Jane,IN,PA,1 2,FH,f,\"water, road\",L1\nJohn,IN,,1 2,,m,,L1\n");
		let report = importer.import(&mut csv(&text), &config()).map_err(anyhow::Error::from)?;

		assert_eq!(importer.phase(), ImportPhase::Committed);
		assert_eq!(report.rows, 2);
		assert_eq!(report.parties_created, 2);
		assert_eq!(report.locations_created, 1);
		assert_eq!(report.relationships_created, 2);
		assert_eq!(report.extra_headers, vec!["geom", "location_id", "ltype", "name", "ptype", "tenure_type"]);

		let store = importer.store();
		let (_, location) = store.entities(EntityType::Location).next().unwrap();
		assert_eq!(
			location.attributes["infrastructure"],
			AttributeValue::from(vec!["water", "road"])
		);
		let (_, john) = store.entities(EntityType::Party).nth(1).unwrap();
		assert_eq!(
			john.core,
			CoreFields::Party {
				name: "John".into(),
				party_type: Some("IN".into())
			}
		);
		assert_eq!(john.attributes["gender"], AttributeValue::from("m"));
		Ok(())
	}

	#[test]
	fn failure_rolls_back_and_names_line() {
		let schemas = schemas();
		let vocabulary = StaticVocabulary::default();
		let mut importer = Importer::new(&schemas, selector(), &vocabulary, MemoryStore::new());

		let text = format!("{HEADER}Jane,IN,PA,1 2,FH,f,,L1\nJohn,IN,PA,1 2,XX,m,,L2\n");
		let err = importer.import(&mut csv(&text), &config()).unwrap_err();

		assert_eq!(err, DataImportError::at_line(2, "Invalid tenure_type: 'XX'."));
		assert_eq!(importer.phase(), ImportPhase::Aborted);
		let store = importer.into_store();
		assert!(!store.in_transaction());
		assert_eq!(store.count(EntityType::Party), 0);
		assert_eq!(store.count(EntityType::Location), 0);
	}

	#[test]
	fn configuration_errors_have_no_line() {
		let schemas = schemas();
		let vocabulary = StaticVocabulary::default();
		let mut importer = Importer::new(&schemas, selector(), &vocabulary, MemoryStore::new());

		let err = importer
			.import(&mut csv(HEADER), &ImportConfig::new(&[EntityType::Party]))
			.unwrap_err();
		assert_eq!(err.line, None);

		let err = importer
			.import(&mut csv(HEADER), &config().with_format(SourceFormat::Xls))
			.unwrap_err();
		assert_eq!(err.to_string(), "source is Csv but the import is configured for Xls");
		assert!(!importer.store().in_transaction());

		// the configuration is checked before the file is opened
		let err = importer
			.import_path(Path::new("/does/not/exist.xlsx"), &ImportConfig::new(&[]).with_format(SourceFormat::Xls))
			.unwrap_err();
		assert_eq!(err, DataImportError::format("no entity types selected"));
		assert_eq!(importer.phase(), ImportPhase::Idle);
	}

	#[test]
	fn location_only_rows() -> Result<()> {
		let schemas = schemas();
		let vocabulary = StaticVocabulary::default();
		let mut importer = Importer::new(&schemas, selector(), &vocabulary, MemoryStore::new());
		let config = ImportConfig::new(&[EntityType::Location]).with_location_fields("geom", None);

		let report = importer
			.import(&mut csv("geom,location_id\n1 2,A\n3 4,A\n,B\n"), &config)
			.map_err(anyhow::Error::from)?;
		assert_eq!(report.rows, 3);
		assert_eq!(report.locations_created, 1);
		assert_eq!(report.relationships_created, 0);
		assert_eq!(importer.store().count(EntityType::Party), 0);
		Ok(())
	}

	#[test]
	fn attribute_map_without_import() -> Result<()> {
		let schemas = schemas();
		let vocabulary = StaticVocabulary::default();
		let mut importer = Importer::new(&schemas, selector(), &vocabulary, MemoryStore::new());

		let mapping = importer.attribute_map(&csv("gender,infrastructure,_uuid,notes\n"), &[EntityType::Party])?;
		assert!(mapping.attribute_map.get("party", "gender").is_some());
		assert_eq!(mapping.extra_attrs, vec!["infrastructure"]);
		assert_eq!(mapping.extra_headers, vec!["notes"]);
		assert_eq!(importer.phase(), ImportPhase::Idle);
		Ok(())
	}
}
