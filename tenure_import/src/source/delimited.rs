use super::{ImportSource, Row};
use crate::config::SourceFormat;
use anyhow::{Context, Result, ensure};
use std::{
	fs::File,
	io::{BufReader, Read},
	path::Path,
};

/// Columns added by data collection tools. They stay in the rows but never
/// map to attributes.
pub const META_COLUMNS: [&str; 20] = [
	"deviceid",
	"end",
	"start",
	"today",
	"subscriberid",
	"simserial",
	"phonenumber",
	"instanceid",
	"meta/instanceid",
	"uuid",
	"_id",
	"_uuid",
	"_submission_time",
	"_index",
	"_parent_index",
	"_parent_table_name",
	"_tags",
	"_notes",
	"_version",
	"_xform_id_string",
];

/// Delimited text with one header line.
///
/// Rows with a different number of cells than the header are passed through
/// unchanged, the validator rejects them.
pub struct CsvSource<R: Read> {
	reader: csv::Reader<R>,
	headers: Vec<String>,
}

impl CsvSource<BufReader<File>> {
	pub fn open(path: &Path, delimiter: char) -> Result<Self> {
		let file = File::open(path).with_context(|| format!("opening {path:?}"))?;
		Self::from_reader(BufReader::new(file), delimiter)
	}
}

impl<R: Read> CsvSource<R> {
	/// Reads the header line from `reader`.
	pub fn from_reader(reader: R, delimiter: char) -> Result<Self> {
		ensure!(delimiter.is_ascii(), "delimiter '{delimiter}' is not an ASCII character");
		let delimiter = u8::try_from(delimiter)?;

		let mut reader = csv::ReaderBuilder::new()
			.has_headers(false)
			.flexible(true)
			.delimiter(delimiter)
			.from_reader(reader);

		let mut record = csv::StringRecord::new();
		let found = reader.read_record(&mut record).context("reading header line")?;
		ensure!(found, "missing header line");

		let headers = record
			.iter()
			.map(|h| h.trim_start_matches('\u{feff}').trim().to_lowercase())
			.collect();

		Ok(Self { reader, headers })
	}
}

impl<R: Read> ImportSource for CsvSource<R> {
	fn format(&self) -> SourceFormat {
		SourceFormat::Csv
	}

	fn headers(&self) -> &[String] {
		&self.headers
	}

	fn mappable_headers(&self) -> Vec<String> {
		self
			.headers
			.iter()
			.filter(|h| !META_COLUMNS.contains(&h.as_str()))
			.cloned()
			.collect()
	}

	fn rows(&mut self) -> Box<dyn Iterator<Item = Result<Row>> + '_> {
		Box::new(self.reader.records().map(|record| {
			let record = record.context("reading delimited text")?;
			Ok(record.iter().map(String::from).collect())
		}))
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use assert_fs::{NamedTempFile, prelude::*};
	use pretty_assertions::assert_eq;

	fn source(text: &str, delimiter: char) -> CsvSource<&[u8]> {
		CsvSource::from_reader(text.as_bytes(), delimiter).unwrap()
	}

	#[test]
	fn headers_are_normalized() {
		let source = source("\u{feff}Name, PTYPE ,_uuid,geom\n", ',');
		assert_eq!(source.headers(), ["name", "ptype", "_uuid", "geom"]);
		assert_eq!(source.mappable_headers(), vec!["name", "ptype", "geom"]);
		assert_eq!(source.format(), SourceFormat::Csv);
	}

	#[test]
	fn ragged_rows_pass_through() -> Result<()> {
		let mut source = source("a;b\n1;2\n3\n\"x;y\";z;extra\n", ';');
		let rows = source.rows().collect::<Result<Vec<_>>>()?;
		assert_eq!(rows, vec![vec!["1", "2"], vec!["3"], vec!["x;y", "z", "extra"]]);
		Ok(())
	}

	#[test]
	fn empty_input_has_no_header() {
		let err = CsvSource::from_reader("".as_bytes(), ',').err().unwrap();
		assert_eq!(err.to_string(), "missing header line");
	}

	#[test]
	fn non_ascii_delimiter() {
		assert!(CsvSource::from_reader("a§b".as_bytes(), '§').is_err());
	}

	#[test]
	fn open_file() -> Result<()> {
		let file = NamedTempFile::new("parties.csv")?;
		file.write_str("name,ptype\nJane,IN\n")?;
		let mut source = CsvSource::open(file.path(), ',')?;
		assert_eq!(source.headers(), ["name", "ptype"]);
		assert_eq!(source.rows().count(), 1);
		Ok(())
	}
}
