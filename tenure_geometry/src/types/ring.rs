use super::{CompositeGeometryTrait, Coordinates, GeometryTrait, join_wkt};
use anyhow::{Result, ensure};
use std::fmt::Debug;

/// A closed loop of positions; first and last position are identical.
#[derive(Clone, PartialEq)]
pub struct RingGeometry(pub Vec<Coordinates>);

impl RingGeometry {
	#[must_use]
	pub fn is_closed(&self) -> bool {
		self.0.len() > 1 && self.0.first() == self.0.last()
	}
}

impl GeometryTrait for RingGeometry {
	fn verify(&self) -> Result<()> {
		ensure!(self.0.len() >= 4, "Ring must have at least 4 points");
		ensure!(self.is_closed(), "Ring must be closed");
		Ok(())
	}

	fn wkt_body(&self) -> String {
		join_wkt(&self.0, |c| c.to_string())
	}
}

impl CompositeGeometryTrait<Coordinates> for RingGeometry {
	fn as_vec(&self) -> &Vec<Coordinates> {
		&self.0
	}

	fn into_inner(self) -> Vec<Coordinates> {
		self.0
	}
}

impl Debug for RingGeometry {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_list().entries(&self.0).finish()
	}
}

super::macros::impl_list_from!(RingGeometry => Coordinates);

impl From<geo_types::LineString<f64>> for RingGeometry {
	fn from(line: geo_types::LineString<f64>) -> Self {
		RingGeometry(line.0.into_iter().map(Coordinates::from).collect())
	}
}
