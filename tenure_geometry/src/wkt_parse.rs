//! Parsing of WKT and EWKT strings into [`Geometry`].
//!
//! Parsing itself is done by the `wkt` crate into `geo_types`; this module
//! strips an optional EWKT `SRID=<n>;` prefix, converts the result into the
//! crate's own types, and verifies the structure (e.g. closed rings).

use crate::Geometry;
use anyhow::{Result, anyhow};
use regex::Regex;
use std::{str::FromStr, sync::LazyLock};
use tenure_derive::context;

static RE_WKT: LazyLock<Regex> = LazyLock::new(|| {
	Regex::new(r"(?i)^(?:SRID=(\d+);)?\s*([a-z]+)").expect("static regex is valid")
});

/// Returns true if `text` starts like a WKT or EWKT geometry, i.e. with a keyword
/// rather than a number.
#[must_use]
pub fn looks_like_wkt(text: &str) -> bool {
	RE_WKT.is_match(text.trim_start())
}

/// Parses a WKT or EWKT string. The SRID of an EWKT string is ignored.
#[context("parsing WKT '{}'", text)]
pub fn parse_wkt(text: &str) -> Result<Geometry> {
	let text = text.trim();
	let body = match RE_WKT.captures(text).and_then(|c| c.get(1)) {
		Some(srid) => {
			log::trace!("ignoring EWKT srid {}", srid.as_str());
			text.split_once(';').map_or(text, |(_, rest)| rest)
		}
		None => text,
	};

	let wkt = wkt::Wkt::<f64>::from_str(body).map_err(|e| anyhow!("{e:?}"))?;
	let geometry = geo_types::Geometry::<f64>::try_from(wkt).map_err(|e| anyhow!("{e:?}"))?;
	let geometry = Geometry::try_from(geometry)?;
	geometry.verify()?;
	Ok(geometry)
}
