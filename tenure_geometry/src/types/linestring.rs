use super::{CompositeGeometryTrait, Coordinates, GeometryTrait, join_wkt};
use anyhow::{Result, ensure};
use std::fmt::Debug;

/// An open path of at least two positions.
#[derive(Clone, PartialEq)]
pub struct LineStringGeometry(pub Vec<Coordinates>);

impl GeometryTrait for LineStringGeometry {
	fn verify(&self) -> Result<()> {
		ensure!(self.0.len() >= 2, "LineString must have at least two points");
		Ok(())
	}

	fn wkt_body(&self) -> String {
		join_wkt(&self.0, |c| c.to_string())
	}
}

impl CompositeGeometryTrait<Coordinates> for LineStringGeometry {
	fn as_vec(&self) -> &Vec<Coordinates> {
		&self.0
	}

	fn into_inner(self) -> Vec<Coordinates> {
		self.0
	}
}

impl Debug for LineStringGeometry {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_list().entries(&self.0).finish()
	}
}

super::macros::impl_list_from!(LineStringGeometry => Coordinates);
