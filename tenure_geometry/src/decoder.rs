use crate::{Geometry, decode_mobile, looks_like_wkt, parse_wkt};
use serde::Deserialize;

/// The field type the geometry column was captured with.
///
/// Only `GeoShape` changes decoding: it enables the closing-point correction
/// of [`decode_mobile`].
#[derive(Clone, Copy, Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum GeometryKind {
	#[default]
	None,
	GeoPoint,
	GeoTrace,
	GeoShape,
}

/// A geometry cell could not be decoded by any of the supported encodings.
#[derive(Debug, thiserror::Error)]
#[error("invalid geometry '{raw}': {reason}")]
pub struct GeometryDecodeError {
	pub raw: String,
	pub reason: String,
}

/// Decodes a geometry cell.
///
/// An empty (or whitespace only) cell yields `Ok(None)`. Values that start
/// like WKT/EWKT go through the WKT parser first and fall back to the mobile
/// point-list decoder once; everything else is decoded as a mobile point list.
pub fn decode_geometry(raw: &str, kind: GeometryKind) -> Result<Option<Geometry>, GeometryDecodeError> {
	let text = raw.trim();
	if text.is_empty() {
		return Ok(None);
	}

	let result = if looks_like_wkt(text) {
		parse_wkt(text).or_else(|wkt_err| {
			log::debug!("WKT parsing failed, retrying as mobile encoding: {wkt_err:#}");
			decode_mobile(text, kind).map_err(|_| wkt_err)
		})
	} else {
		decode_mobile(text, kind)
	};

	result.map(Some).map_err(|err| GeometryDecodeError {
		raw: raw.to_string(),
		reason: format!("{err:#}"),
	})
}

#[cfg(test)]
mod tests {
	use super::*;
	use pretty_assertions::assert_eq;
	use rstest::rstest;

	#[rstest]
	#[case("")]
	#[case("   ")]
	#[case("\n")]
	fn empty_is_no_geometry(#[case] raw: &str) {
		assert_eq!(decode_geometry(raw, GeometryKind::None).unwrap(), None);
	}

	#[rstest]
	#[case("POINT (36.8 -1.3)", "POINT (36.8 -1.3)")]
	#[case("SRID=4326;LINESTRING (0 0, 1 1)", "LINESTRING (0 0, 1 1)")]
	#[case("-1.3 36.8", "POINT (36.8 -1.3)")]
	#[case("-1.3 36.8 0 0;-1.4 36.9 0 0;", "LINESTRING (36.8 -1.3, 36.9 -1.4)")]
	fn decodes(#[case] raw: &str, #[case] expected: &str) {
		let geometry = decode_geometry(raw, GeometryKind::None).unwrap().unwrap();
		assert_eq!(geometry.to_string(), expected);
	}

	#[rstest]
	#[case("POINT (1)")]
	#[case("not a geometry")]
	#[case("1.0;2.0")]
	fn rejects(#[case] raw: &str) {
		let err = decode_geometry(raw, GeometryKind::None).unwrap_err();
		assert_eq!(err.raw, raw);
		assert!(err.to_string().starts_with("invalid geometry"));
	}

	#[test]
	fn geoshape_kind_is_forwarded() {
		let geometry = decode_geometry("1 1;2 2;3 1;2 2", GeometryKind::GeoShape).unwrap().unwrap();
		assert_eq!(geometry.get_type_name(), "Polygon");
	}

	#[test]
	fn kind_from_config_text() {
		#[derive(Deserialize)]
		struct Wrapper {
			kind: GeometryKind,
		}
		let parsed: Wrapper = serde_yaml_ng::from_str("kind: geoshape").unwrap();
		assert_eq!(parsed.kind, GeometryKind::GeoShape);
	}
}
