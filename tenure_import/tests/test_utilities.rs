#![allow(unused)]

use assert_fs::{TempDir, prelude::*};
use std::path::PathBuf;
use tenure_import::*;

pub fn selector() -> EntitySelector {
	EntitySelector::new("org-1", "project-1", "questionnaire-3")
}

/// Party: `gender` (select_one), `homeowner`. Location: `infrastructure`
/// (select_multiple). Tenure relationship: `acquired_how`.
pub fn schemas() -> MemorySchemaStore {
	let mut store = MemorySchemaStore::new();
	store.register(
		ContentType::Party,
		&selector(),
		Schema::new(vec![
			AttributeDefinition::new("gender", "select_one"),
			AttributeDefinition::new("homeowner", "boolean"),
			AttributeDefinition::new("internal_code", "text").omitted(),
		]),
	);
	store.register(
		ContentType::SpatialUnit,
		&selector(),
		Schema::new(vec![AttributeDefinition::new("infrastructure", "select_multiple")]),
	);
	store.register(
		ContentType::TenureRelationship,
		&selector(),
		Schema::new(vec![AttributeDefinition::new("acquired_how", "select_one")]),
	);
	store
}

pub fn parcel_config() -> ImportConfig {
	ImportConfig::new(&[EntityType::Party, EntityType::Location])
		.with_party_fields("name", "ptype")
		.with_location_fields("geom", Some("ltype"))
		.with_tenure_type_field("tenure_type")
}

/// Writes `content` to a file in a fresh temporary directory. The directory
/// is removed when the returned guard is dropped.
pub fn write_temp(name: &str, content: &str) -> (TempDir, PathBuf) {
	let dir = TempDir::new().unwrap();
	let file = dir.child(name);
	file.write_str(content).unwrap();
	let path = file.path().to_path_buf();
	(dir, path)
}

pub fn run_csv(content: &str, config: &ImportConfig) -> (Result<ImportReport, DataImportError>, MemoryStore) {
	let schemas = schemas();
	let vocabulary = StaticVocabulary::default();
	let (_dir, path) = write_temp("data.csv", content);
	let mut importer = Importer::new(&schemas, selector(), &vocabulary, MemoryStore::new());
	let result = importer.import_path(&path, config);
	(result, importer.into_store())
}
