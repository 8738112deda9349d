//! Decoding of the point lists produced by field data collection apps.
//!
//! A value is a `;` separated list of points, each written as
//! `"lat lon [altitude] [accuracy]"`. Only latitude and longitude are used and
//! they are swapped into `(lon, lat)` order.

use crate::{Coordinates, Geometry, GeometryKind};
use anyhow::{Result, bail, ensure};
use tenure_derive::context;

/// Parses a single `"lat lon [alt] [acc]"` token into `(lon, lat)`.
#[context("parsing point '{}'", token)]
fn parse_point(token: &str) -> Result<Coordinates> {
	let mut parts = token.split_whitespace();
	let (Some(lat), Some(lon)) = (parts.next(), parts.next()) else {
		bail!("expected at least latitude and longitude");
	};
	let lat: f64 = lat.parse()?;
	let lon: f64 = lon.parse()?;
	ensure!(lat.is_finite() && lon.is_finite(), "coordinates must be finite");
	Ok(Coordinates::new(lon, lat))
}

/// Splits the raw value into points. A trailing empty segment caused by a
/// terminal `;` is dropped; any other empty segment is an error.
pub fn parse_mobile_points(raw: &str) -> Result<Vec<Coordinates>> {
	let cleaned = raw.replace(['\n', '\r'], "");
	let mut segments: Vec<&str> = cleaned.split(';').collect();
	if segments.last().is_some_and(|s| s.trim().is_empty()) {
		segments.pop();
	}
	ensure!(!segments.is_empty(), "no points found");
	segments.into_iter().map(parse_point).collect()
}

/// Decodes a mobile point list into a point, line string or polygon.
///
/// For `GeometryKind::GeoShape` the collection app repeats the second point
/// instead of closing the ring with the first one, so the last point is
/// replaced by a copy of the first.
#[context("decoding mobile geometry '{}'", raw)]
pub fn decode_mobile(raw: &str, kind: GeometryKind) -> Result<Geometry> {
	let mut points = parse_mobile_points(raw)?;

	if kind == GeometryKind::GeoShape && points.len() > 2 {
		points.pop();
		points.push(points[0]);
	}

	let is_ring = points.len() > 2 && points.first() == points.last();
	let geometry = match points.len() {
		1 => Geometry::new_point(points[0]),
		_ if is_ring => Geometry::new_polygon(points),
		_ => Geometry::new_line_string(points),
	};
	geometry.verify()?;
	Ok(geometry)
}
