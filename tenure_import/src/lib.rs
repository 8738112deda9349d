//! Bulk import of parties, locations and tenure relationships from delimited
//! text and spreadsheets.
//!
//! An [`Importer`] maps the source headers against the project's questionnaire
//! attributes, then validates and materializes every row and persists the
//! resulting entities through an [`EntityStore`] in a single transaction.
//! Rows that describe the same party or location (same external id) share one
//! entity.
//!
//! ```no_run
//! use std::path::Path;
//! use tenure_import::*;
//!
//! let schemas = MemorySchemaStore::new();
//! let vocabulary = StaticVocabulary::default();
//! let selector = EntitySelector::new("org", "project", "questionnaire");
//! let mut importer = Importer::new(&schemas, selector, &vocabulary, MemoryStore::new());
//!
//! let config = ImportConfig::from_path(Path::new("import.yml")).unwrap();
//! let report = importer.import_path(Path::new("parcels.csv"), &config).unwrap();
//! println!("{} parties created", report.parties_created);
//! ```

pub mod config;
pub mod dedup;
pub mod error;
pub mod importer;
pub mod mapper;
pub mod materializer;
pub mod model;
pub mod schema;
pub mod source;
pub mod store;
pub mod validator;
pub mod vocabulary;

pub use config::*;
pub use dedup::*;
pub use error::*;
pub use importer::*;
pub use mapper::*;
pub use materializer::*;
pub use model::*;
pub use schema::*;
pub use source::*;
pub use store::*;
pub use validator::*;
pub use vocabulary::*;
pub use tenure_geometry::{Geometry, GeometryKind};
