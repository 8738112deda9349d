use std::fmt::{Debug, Display};

/// A position in the target convention: `x` is longitude, `y` is latitude.
#[derive(Clone, Copy, PartialEq)]
pub struct Coordinates([f64; 2]);

impl Coordinates {
	#[must_use]
	pub fn new(x: f64, y: f64) -> Self {
		Self([x, y])
	}

	#[must_use]
	pub fn x(&self) -> f64 {
		self.0[0]
	}

	#[must_use]
	pub fn y(&self) -> f64 {
		self.0[1]
	}
}

impl<'a, T> From<&'a [T; 2]> for Coordinates
where
	T: Copy + Into<f64>,
{
	fn from(value: &'a [T; 2]) -> Self {
		Coordinates([value[0].into(), value[1].into()])
	}
}

impl From<[f64; 2]> for Coordinates {
	fn from(value: [f64; 2]) -> Self {
		Coordinates(value)
	}
}

impl From<(f64, f64)> for Coordinates {
	fn from(value: (f64, f64)) -> Self {
		Coordinates([value.0, value.1])
	}
}

impl From<Coordinates> for [f64; 2] {
	fn from(value: Coordinates) -> Self {
		value.0
	}
}

impl From<geo_types::Coord<f64>> for Coordinates {
	fn from(value: geo_types::Coord<f64>) -> Self {
		Coordinates([value.x, value.y])
	}
}

impl From<&geo_types::Coord<f64>> for Coordinates {
	fn from(value: &geo_types::Coord<f64>) -> Self {
		Coordinates([value.x, value.y])
	}
}

impl Debug for Coordinates {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		self.0.fmt(f)
	}
}

/// WKT coordinate pair: `"x y"`.
impl Display for Coordinates {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "{} {}", self.0[0], self.0[1])
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[test]
	fn new_and_accessors() {
		let c = Coordinates::new(-1.2921, 36.8219);
		assert_eq!(c.x(), -1.2921);
		assert_eq!(c.y(), 36.8219);
	}

	#[test]
	fn debug_formats_like_array() {
		assert_eq!(format!("{:?}", Coordinates::new(1.0, 2.0)), "[1.0, 2.0]");
	}

	#[rstest]
	#[case(Coordinates::new(1.0, 2.0), "1 2")]
	#[case(Coordinates::new(-0.5, 10.25), "-0.5 10.25")]
	#[case(Coordinates::new(36.8219, -1.2921), "36.8219 -1.2921")]
	fn display_as_wkt(#[case] c: Coordinates, #[case] expected: &str) {
		assert_eq!(c.to_string(), expected);
	}

	#[test]
	fn conversions() {
		assert_eq!(Coordinates::from(&[3, 4]), Coordinates::new(3.0, 4.0));
		assert_eq!(Coordinates::from((5.0, 6.0)), Coordinates::new(5.0, 6.0));
		assert_eq!(Coordinates::from(geo_types::coord! { x: 7.0, y: 8.0 }), Coordinates::new(7.0, 8.0));
		let arr: [f64; 2] = Coordinates::new(1.5, 2.5).into();
		assert_eq!(arr, [1.5, 2.5]);
	}
}
