//! Geometry values for imported locations and the decoders that produce them
//! from spreadsheet and delimited-text cells.
//!
//! Two encodings are understood: WKT/EWKT (see [`parse_wkt`]) and the
//! `;` separated point lists written by mobile data collection tools (see
//! [`decode_mobile`]). [`decode_geometry`] picks the right one for a cell.

mod decoder;
mod geometry;
mod mobile;
mod types;
mod wkt_parse;

pub use decoder::*;
pub use geometry::*;
pub use mobile::*;
pub use types::*;
pub use wkt_parse::*;
