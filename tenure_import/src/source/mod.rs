//! Front-ends that turn source files into a header row and a stream of rows.

mod delimited;
mod table;
mod xls;

pub use delimited::*;
pub use table::*;
pub use xls::*;

use crate::config::SourceFormat;
use anyhow::Result;

/// A row of cells, aligned with the headers of its source.
pub type Row = Vec<String>;

/// A tabular source feeding the importer.
///
/// Headers are lower-cased. Rows are produced in source order and are not
/// guaranteed to have as many cells as there are headers.
pub trait ImportSource {
	fn format(&self) -> SourceFormat;

	fn headers(&self) -> &[String];

	/// The headers that may hold questionnaire attributes.
	fn mappable_headers(&self) -> Vec<String> {
		self.headers().to_vec()
	}

	fn rows(&mut self) -> Box<dyn Iterator<Item = Result<Row>> + '_>;
}
