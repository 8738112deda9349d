use super::Row;
use anyhow::{Result, bail};
use std::collections::HashMap;

/// An in-memory table of string cells. Every row has exactly one cell per
/// header; [`Table::new`] is the only way in.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Table {
	headers: Vec<String>,
	rows: Vec<Row>,
}

impl Table {
	/// Creates a table, padding or truncating rows to the header width.
	pub fn new(headers: Vec<String>, rows: Vec<Row>) -> Self {
		let width = headers.len();
		let rows = rows
			.into_iter()
			.map(|mut row| {
				row.resize(width, String::new());
				row
			})
			.collect();
		Self { headers, rows }
	}

	#[must_use]
	pub fn headers(&self) -> &[String] {
		&self.headers
	}

	#[must_use]
	pub fn rows(&self) -> &[Row] {
		&self.rows
	}

	#[must_use]
	pub fn column(&self, name: &str) -> Option<usize> {
		self.headers.iter().position(|h| h == name)
	}

	fn require_column(&self, name: &str) -> Result<usize> {
		match self.column(name) {
			Some(index) => Ok(index),
			None => bail!("Missing '{name}' column."),
		}
	}

	#[must_use]
	pub fn is_empty(&self) -> bool {
		self.rows.is_empty()
	}

	/// Prefixes every header with `namespace::`.
	#[must_use]
	pub fn namespaced(mut self, namespace: &str) -> Self {
		for header in &mut self.headers {
			*header = format!("{namespace}::{header}");
		}
		self
	}

	/// Removes the named columns. Unknown names are ignored.
	#[must_use]
	pub fn drop_columns(mut self, names: &[&str]) -> Self {
		let keep: Vec<bool> = self.headers.iter().map(|h| !names.contains(&h.as_str())).collect();
		let retain = |cells: &mut Vec<String>| {
			let mut flags = keep.iter();
			cells.retain(|_| flags.next().copied().unwrap_or(true));
		};
		retain(&mut self.headers);
		for row in &mut self.rows {
			retain(row);
		}
		self
	}

	/// Full outer join on `self[left_key] == right[right_key]`.
	///
	/// Output columns are the left headers followed by the right headers.
	/// Left rows come first, in order, each repeated once per matching right
	/// row; right rows that matched nothing follow in their own order. Empty
	/// keys never match.
	pub fn outer_join(&self, left_key: &str, right: &Table, right_key: &str) -> Result<Table> {
		let left_index = self.require_column(left_key)?;
		let right_index = right.require_column(right_key)?;

		let mut by_key: HashMap<&str, Vec<usize>> = HashMap::new();
		for (i, row) in right.rows.iter().enumerate() {
			let key = row[right_index].as_str();
			if !key.is_empty() {
				by_key.entry(key).or_default().push(i);
			}
		}

		let left_blank = vec![String::new(); self.headers.len()];
		let right_blank = vec![String::new(); right.headers.len()];
		let mut matched = vec![false; right.rows.len()];
		let mut rows = Vec::new();

		for left_row in &self.rows {
			let key = left_row[left_index].as_str();
			let matches = by_key.get(key).map(Vec::as_slice).unwrap_or_default();
			if matches.is_empty() {
				rows.push([left_row.as_slice(), right_blank.as_slice()].concat());
			}
			for &i in matches {
				matched[i] = true;
				rows.push([left_row.as_slice(), right.rows[i].as_slice()].concat());
			}
		}

		for (i, right_row) in right.rows.iter().enumerate() {
			if !matched[i] {
				rows.push([left_blank.as_slice(), right_row.as_slice()].concat());
			}
		}

		Ok(Table {
			headers: [self.headers.as_slice(), right.headers.as_slice()].concat(),
			rows,
		})
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use pretty_assertions::assert_eq;

	fn table(headers: &[&str], rows: &[&[&str]]) -> Table {
		Table::new(
			headers.iter().map(|s| (*s).to_string()).collect(),
			rows.iter().map(|r| r.iter().map(|s| (*s).to_string()).collect()).collect(),
		)
	}

	#[test]
	fn new_pads_and_truncates() {
		let t = table(&["a", "b"], &[&["1"], &["1", "2", "3"]]);
		assert_eq!(t.rows, vec![vec!["1", ""], vec!["1", "2"]]);
	}

	#[test]
	fn ragged_rows_join_on_padded_cells() -> Result<()> {
		let left = table(&["id", "name"], &[&[], &["L1"]]);
		let right = table(&["location_id", "party_id", "share"], &[&["L1"], &[]]);
		let joined = left.outer_join("id", &right, "location_id")?;
		assert_eq!(
			joined.rows(),
			[
				vec!["", "", "", "", ""],
				vec!["L1", "", "L1", "", ""],
				vec!["", "", "", "", ""],
			]
		);
		Ok(())
	}

	#[test]
	fn namespace_and_drop() {
		let t = table(&["id", "name", "type"], &[&["1", "Jane", "IN"]])
			.namespaced("party")
			.drop_columns(&["party::type", "nope"]);
		assert_eq!(t, table(&["party::id", "party::name"], &[&["1", "Jane"]]));
	}

	#[test]
	fn outer_join_order_and_fan_out() -> Result<()> {
		let locations = table(&["id", "geom"], &[&["l1", "g1"], &["l2", "g2"], &["", "g3"]]);
		let relationships = table(
			&["loc", "tenure"],
			&[&["l1", "FH"], &["l9", "LH"], &["l1", "CO"], &["", "OC"]],
		);
		let joined = locations.outer_join("id", &relationships, "loc")?;
		assert_eq!(joined.headers, vec!["id", "geom", "loc", "tenure"]);
		assert_eq!(
			joined.rows,
			vec![
				vec!["l1", "g1", "l1", "FH"],
				vec!["l1", "g1", "l1", "CO"],
				vec!["l2", "g2", "", ""],
				vec!["", "g3", "", ""],
				vec!["", "", "l9", "LH"],
				vec!["", "", "", "OC"],
			]
		);
		Ok(())
	}

	#[test]
	fn join_on_missing_column() {
		let a = table(&["id"], &[]);
		let b = table(&["other"], &[]);
		assert_eq!(
			a.outer_join("id", &b, "party_id").unwrap_err().to_string(),
			"Missing 'party_id' column."
		);
	}
}
