use anyhow::Result;
use std::fmt::Debug;

/// Shared behaviour of every geometry primitive.
pub trait GeometryTrait: Debug + Clone + Sized {
	/// Checks structural validity, e.g. enough points, closed rings.
	fn verify(&self) -> Result<()>;

	/// The parenthesised coordinate part of the WKT representation,
	/// e.g. `(1 2, 3 4)` for a line string.
	fn wkt_body(&self) -> String;
}

/// Geometries that are an ordered list of simpler items.
pub trait CompositeGeometryTrait<Item>: Debug + Clone {
	fn as_vec(&self) -> &Vec<Item>;

	fn into_inner(self) -> Vec<Item>;

	fn is_empty(&self) -> bool {
		self.as_vec().is_empty()
	}

	fn len(&self) -> usize {
		self.as_vec().len()
	}

	fn first(&self) -> Option<&Item> {
		self.as_vec().first()
	}

	fn last(&self) -> Option<&Item> {
		self.as_vec().last()
	}
}

pub(crate) fn join_wkt<T>(items: &[T], f: impl Fn(&T) -> String) -> String {
	use itertools::Itertools;
	format!("({})", items.iter().map(f).join(", "))
}
