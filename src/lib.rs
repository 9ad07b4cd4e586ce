//! Helpers for combining SVG documents: id namespacing so fragments can be
//! merged without collisions, and conversion between SVG length units.

pub mod namespace;
pub mod svg;
pub mod tree;
pub mod unit;

pub use namespace::prefix_ids;
pub use tree::{Element, Node};
pub use unit::{LengthUnit, Unit, UnitError};
