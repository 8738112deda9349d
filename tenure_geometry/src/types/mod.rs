// Geometry primitives. Every type renders its coordinates as WKT and can
// verify its own structural validity; `Geometry` in the parent module ties
// them together into the single value the importer stores.

mod coordinates;
mod linestring;
mod macros;
mod multi;
mod point;
mod polygon;
mod ring;
mod traits;

pub use coordinates::*;
pub use linestring::*;
pub use multi::*;
pub use point::*;
pub use polygon::*;
pub use ring::*;
pub use traits::*;
