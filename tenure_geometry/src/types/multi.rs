use super::{
	CompositeGeometryTrait, GeometryTrait, LineStringGeometry, PointGeometry, PolygonGeometry, join_wkt,
};
use anyhow::{Result, ensure};
use std::fmt::Debug;

macro_rules! define_multi {
	($name:ident, $item:ty, $label:literal) => {
		#[doc = concat!("A collection of ", $label, " geometries.")]
		#[derive(Clone, PartialEq)]
		pub struct $name(pub Vec<$item>);

		impl GeometryTrait for $name {
			fn verify(&self) -> Result<()> {
				ensure!(!self.0.is_empty(), concat!("Multi", $label, " must not be empty"));
				for item in &self.0 {
					item.verify()?;
				}
				Ok(())
			}

			fn wkt_body(&self) -> String {
				join_wkt(&self.0, |item| item.wkt_body())
			}
		}

		impl CompositeGeometryTrait<$item> for $name {
			fn as_vec(&self) -> &Vec<$item> {
				&self.0
			}

			fn into_inner(self) -> Vec<$item> {
				self.0
			}
		}

		impl Debug for $name {
			fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
				f.debug_list().entries(&self.0).finish()
			}
		}

		super::macros::impl_list_from!($name => $item);
	};
}

define_multi!(MultiPointGeometry, PointGeometry, "Point");
define_multi!(MultiLineStringGeometry, LineStringGeometry, "LineString");
define_multi!(MultiPolygonGeometry, PolygonGeometry, "Polygon");
