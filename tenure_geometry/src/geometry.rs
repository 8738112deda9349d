use crate::types::*;
use anyhow::{Result, bail};
use std::fmt::{Debug, Display};

/// The canonical geometry value attached to a location.
#[derive(Clone, PartialEq)]
pub enum Geometry {
	Point(PointGeometry),
	LineString(LineStringGeometry),
	Polygon(PolygonGeometry),
	MultiPoint(MultiPointGeometry),
	MultiLineString(MultiLineStringGeometry),
	MultiPolygon(MultiPolygonGeometry),
}

impl Geometry {
	pub fn new_point<T>(value: T) -> Self
	where
		Coordinates: From<T>,
	{
		Self::Point(PointGeometry::from(value))
	}

	pub fn new_line_string<T>(value: Vec<T>) -> Self
	where
		Coordinates: From<T>,
	{
		Self::LineString(LineStringGeometry::from(value))
	}

	/// A polygon with a single exterior ring.
	pub fn new_polygon<T>(ring: Vec<T>) -> Self
	where
		Coordinates: From<T>,
	{
		Self::Polygon(PolygonGeometry(vec![RingGeometry::from(ring)]))
	}

	#[must_use]
	pub fn get_type_name(&self) -> &'static str {
		match self {
			Geometry::Point(_) => "Point",
			Geometry::LineString(_) => "LineString",
			Geometry::Polygon(_) => "Polygon",
			Geometry::MultiPoint(_) => "MultiPoint",
			Geometry::MultiLineString(_) => "MultiLineString",
			Geometry::MultiPolygon(_) => "MultiPolygon",
		}
	}

	fn wkt_keyword(&self) -> &'static str {
		match self {
			Geometry::Point(_) => "POINT",
			Geometry::LineString(_) => "LINESTRING",
			Geometry::Polygon(_) => "POLYGON",
			Geometry::MultiPoint(_) => "MULTIPOINT",
			Geometry::MultiLineString(_) => "MULTILINESTRING",
			Geometry::MultiPolygon(_) => "MULTIPOLYGON",
		}
	}

	pub fn verify(&self) -> Result<()> {
		match self {
			Geometry::Point(g) => g.verify(),
			Geometry::LineString(g) => g.verify(),
			Geometry::Polygon(g) => g.verify(),
			Geometry::MultiPoint(g) => g.verify(),
			Geometry::MultiLineString(g) => g.verify(),
			Geometry::MultiPolygon(g) => g.verify(),
		}
	}

	fn wkt_body(&self) -> String {
		match self {
			Geometry::Point(g) => g.wkt_body(),
			Geometry::LineString(g) => g.wkt_body(),
			Geometry::Polygon(g) => g.wkt_body(),
			Geometry::MultiPoint(g) => g.wkt_body(),
			Geometry::MultiLineString(g) => g.wkt_body(),
			Geometry::MultiPolygon(g) => g.wkt_body(),
		}
	}
}

/// Renders the geometry as WKT, e.g. `POINT (36.8 -1.3)`.
impl Display for Geometry {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "{} {}", self.wkt_keyword(), self.wkt_body())
	}
}

impl Debug for Geometry {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		let inner: &dyn Debug = match self {
			Geometry::Point(g) => g,
			Geometry::LineString(g) => g,
			Geometry::Polygon(g) => g,
			Geometry::MultiPoint(g) => g,
			Geometry::MultiLineString(g) => g,
			Geometry::MultiPolygon(g) => g,
		};
		f.debug_tuple(self.get_type_name()).field(inner).finish()
	}
}

fn line_from_geo(line: geo_types::LineString<f64>) -> LineStringGeometry {
	LineStringGeometry(line.0.into_iter().map(Coordinates::from).collect())
}

impl TryFrom<geo_types::Geometry<f64>> for Geometry {
	type Error = anyhow::Error;

	fn try_from(geometry: geo_types::Geometry<f64>) -> Result<Self> {
		use geo_types::Geometry as G;
		Ok(match geometry {
			G::Point(p) => Geometry::Point(PointGeometry::from(p.0)),
			G::Line(l) => Geometry::LineString(LineStringGeometry(vec![l.start.into(), l.end.into()])),
			G::LineString(l) => Geometry::LineString(line_from_geo(l)),
			G::Polygon(p) => Geometry::Polygon(PolygonGeometry::from(p)),
			G::MultiPoint(m) => {
				Geometry::MultiPoint(MultiPointGeometry(m.0.into_iter().map(|p| PointGeometry::from(p.0)).collect()))
			}
			G::MultiLineString(m) => {
				Geometry::MultiLineString(MultiLineStringGeometry(m.0.into_iter().map(line_from_geo).collect()))
			}
			G::MultiPolygon(m) => {
				Geometry::MultiPolygon(MultiPolygonGeometry(m.0.into_iter().map(PolygonGeometry::from).collect()))
			}
			G::Rect(r) => Geometry::Polygon(PolygonGeometry::from(r.to_polygon())),
			G::Triangle(t) => Geometry::Polygon(PolygonGeometry::from(t.to_polygon())),
			G::GeometryCollection(_) => bail!("geometry collections are not supported"),
		})
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use pretty_assertions::assert_eq;
	use rstest::rstest;
	use geo_types::polygon;

	#[rstest]
	#[case(Geometry::new_point([1.0, 2.0]), "POINT (1 2)")]
	#[case(Geometry::new_line_string(vec![[0.0, 0.0], [1.5, 2.0]]), "LINESTRING (0 0, 1.5 2)")]
	#[case(
		Geometry::new_polygon(vec![[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 0.0]]),
		"POLYGON ((0 0, 1 0, 1 1, 0 0))"
	)]
	#[case(Geometry::MultiPoint(MultiPointGeometry::from(&[[1, 1], [2, 2]])), "MULTIPOINT ((1 1), (2 2))")]
	fn display_as_wkt(#[case] geometry: Geometry, #[case] expected: &str) {
		assert_eq!(geometry.to_string(), expected);
	}

	#[test]
	fn debug_format() {
		assert_eq!(format!("{:?}", Geometry::new_point([1.0, 2.0])), "Point([1.0, 2.0])");
	}

	#[test]
	fn try_from_geo_types() -> Result<()> {
		let polygon = geo_types::polygon![(x: 0.0, y: 0.0), (x: 2.0, y: 0.0), (x: 2.0, y: 2.0)];
		let geometry = Geometry::try_from(geo_types::Geometry::Polygon(polygon))?;
		assert_eq!(geometry.get_type_name(), "Polygon");
		assert_eq!(geometry.to_string(), "POLYGON ((0 0, 2 0, 2 2, 0 0))");
		geometry.verify()?;

		let collection = geo_types::Geometry::GeometryCollection(geo_types::GeometryCollection(vec![]));
		assert!(Geometry::try_from(collection).is_err());
		Ok(())
	}
}
