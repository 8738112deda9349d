use super::{CompositeGeometryTrait, GeometryTrait, RingGeometry, join_wkt};
use anyhow::{Result, ensure};
use std::fmt::Debug;

/// An exterior ring followed by zero or more interior rings (holes).
#[derive(Clone, PartialEq)]
pub struct PolygonGeometry(pub Vec<RingGeometry>);

impl PolygonGeometry {
	#[must_use]
	pub fn exterior(&self) -> Option<&RingGeometry> {
		self.0.first()
	}
}

impl GeometryTrait for PolygonGeometry {
	fn verify(&self) -> Result<()> {
		ensure!(!self.0.is_empty(), "Polygon must have at least one ring");
		for ring in &self.0 {
			ring.verify()?;
		}
		Ok(())
	}

	fn wkt_body(&self) -> String {
		join_wkt(&self.0, |r| r.wkt_body())
	}
}

impl CompositeGeometryTrait<RingGeometry> for PolygonGeometry {
	fn as_vec(&self) -> &Vec<RingGeometry> {
		&self.0
	}

	fn into_inner(self) -> Vec<RingGeometry> {
		self.0
	}
}

impl Debug for PolygonGeometry {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_list().entries(&self.0).finish()
	}
}

super::macros::impl_list_from!(PolygonGeometry => RingGeometry);

impl From<geo_types::Polygon<f64>> for PolygonGeometry {
	fn from(geometry: geo_types::Polygon<f64>) -> Self {
		let (exterior, interiors) = geometry.into_inner();
		let mut rings = Vec::with_capacity(interiors.len() + 1);
		rings.push(RingGeometry::from(exterior));
		rings.extend(interiors.into_iter().map(RingGeometry::from));
		PolygonGeometry(rings)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn wkt_body_with_hole() {
		let polygon = PolygonGeometry::from(&[
			[[0, 0], [4, 0], [4, 4], [0, 0]],
			[[1, 1], [2, 1], [2, 2], [1, 1]],
		]);
		assert_eq!(polygon.wkt_body(), "((0 0, 4 0, 4 4, 0 0), (1 1, 2 1, 2 2, 1 1))");
		assert!(polygon.verify().is_ok());
		assert_eq!(polygon.exterior().unwrap().len(), 4);
	}

	#[test]
	fn verify_empty() {
		assert!(PolygonGeometry(vec![]).verify().is_err());
	}
}
