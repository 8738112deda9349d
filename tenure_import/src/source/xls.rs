//! Spreadsheets with one worksheet per entity type, flattened into one table.

use super::{ImportSource, Row, Table};
use crate::{config::SourceFormat, model::EntityType};
use anyhow::{Context, Result, bail, ensure};
use calamine::{Data, Range, Reader, open_workbook_auto};
use std::{
	collections::{BTreeMap, BTreeSet},
	path::Path,
};

pub const LOCATIONS_SHEET: &str = "locations";
pub const PARTIES_SHEET: &str = "parties";
pub const RELATIONSHIPS_SHEET: &str = "relationships";

const LOCATION_REF: &str = "tenurerelationship::spatial_unit_id";
const PARTY_REF: &str = "tenurerelationship::party_id";

/// Renders a cell the way it reads in the spreadsheet. Whole numbers lose
/// their fractional part.
#[must_use]
pub fn cell_to_string(cell: &Data) -> String {
	match cell {
		Data::String(s) | Data::DateTimeIso(s) | Data::DurationIso(s) => s.clone(),
		Data::Int(i) => i.to_string(),
		Data::Float(f) if f.fract() == 0.0 && f.abs() < 1e15 => (*f as i64).to_string(),
		Data::Float(f) => f.to_string(),
		Data::Bool(b) => b.to_string(),
		Data::Empty | Data::Error(_) => String::new(),
		other => other.to_string(),
	}
}

/// Turns a worksheet into a table. The first non-blank row is the header,
/// blank rows are skipped.
#[must_use]
pub fn table_from_range(range: &Range<Data>) -> Table {
	let mut rows = range
		.rows()
		.map(|cells| cells.iter().map(cell_to_string).collect::<Row>())
		.filter(|row| row.iter().any(|c| !c.trim().is_empty()));

	let Some(headers) = rows.next() else {
		return Table::default();
	};
	let headers = headers.into_iter().map(|h| h.trim().to_lowercase()).collect();
	Table::new(headers, rows.collect())
}

fn take_sheet(sheets: &mut BTreeMap<String, Table>, name: &str) -> Result<Table> {
	let Some(table) = sheets.remove(name) else {
		bail!("Missing '{name}' worksheet.");
	};
	ensure!(!table.is_empty(), "Empty worksheet.");
	Ok(table)
}

/// Joins the worksheets needed for `entity_types` into one namespaced table.
///
/// Parties and locations are linked through the relationships worksheet:
/// locations ⟗ relationships on `spatial_unit_id`, then ⟗ parties on
/// `party_id`. The relationship's reference columns are dropped afterwards,
/// the `id` columns of parties and locations stay for deduplication. A single
/// entity type is read from its own worksheet without the `id` column.
pub fn flatten_workbook(mut sheets: BTreeMap<String, Table>, entity_types: &BTreeSet<EntityType>) -> Result<Table> {
	let parties = entity_types.contains(&EntityType::Party);
	let locations = entity_types.contains(&EntityType::Location);
	let relationships = entity_types.contains(&EntityType::TenureRelationship);

	let table = match (parties, locations, relationships) {
		(true, true, _) => {
			let locations = take_sheet(&mut sheets, LOCATIONS_SHEET)?.namespaced("spatialunit");
			let parties = take_sheet(&mut sheets, PARTIES_SHEET)?.namespaced("party");
			let relationships = take_sheet(&mut sheets, RELATIONSHIPS_SHEET)?.namespaced("tenurerelationship");
			locations
				.outer_join("spatialunit::id", &relationships, LOCATION_REF)?
				.outer_join(PARTY_REF, &parties, "party::id")?
				.drop_columns(&[LOCATION_REF, PARTY_REF])
		}
		(true, false, false) => take_sheet(&mut sheets, PARTIES_SHEET)?
			.namespaced("party")
			.drop_columns(&["party::id"]),
		(false, true, false) => take_sheet(&mut sheets, LOCATIONS_SHEET)?
			.namespaced("spatialunit")
			.drop_columns(&["spatialunit::id"]),
		_ => bail!("Unsupported import format."),
	};

	log::debug!(
		"flattened workbook into {} columns and {} rows",
		table.headers().len(),
		table.rows().len()
	);
	Ok(table)
}

/// A spreadsheet source (xls, xlsx, xlsb or ods).
#[derive(Debug)]
pub struct XlsSource {
	table: Table,
}

impl XlsSource {
	/// Reads the entity worksheets of the workbook at `path`. Worksheet names
	/// are matched case-insensitively.
	pub fn open(path: &Path, entity_types: &BTreeSet<EntityType>) -> Result<Self> {
		let mut workbook = open_workbook_auto(path).with_context(|| format!("opening workbook {path:?}"))?;

		let mut sheets = BTreeMap::new();
		for sheet_name in workbook.sheet_names() {
			let name = sheet_name.to_lowercase();
			if ![LOCATIONS_SHEET, PARTIES_SHEET, RELATIONSHIPS_SHEET].contains(&name.as_str()) {
				continue;
			}
			let range = workbook
				.worksheet_range(&sheet_name)
				.with_context(|| format!("reading worksheet '{sheet_name}'"))?;
			sheets.insert(name, table_from_range(&range));
		}

		Self::from_tables(sheets, entity_types)
	}

	/// Builds the source from already loaded worksheets, keyed by lower-cased
	/// worksheet name.
	pub fn from_tables(sheets: BTreeMap<String, Table>, entity_types: &BTreeSet<EntityType>) -> Result<Self> {
		Ok(Self {
			table: flatten_workbook(sheets, entity_types)?,
		})
	}

	#[must_use]
	pub fn table(&self) -> &Table {
		&self.table
	}
}

impl ImportSource for XlsSource {
	fn format(&self) -> SourceFormat {
		SourceFormat::Xls
	}

	fn headers(&self) -> &[String] {
		self.table.headers()
	}

	fn rows(&mut self) -> Box<dyn Iterator<Item = Result<Row>> + '_> {
		Box::new(self.table.rows().iter().cloned().map(Ok))
	}
}
