//! Geometry-driven extraction over the token model.
//!
//! - [`AnchorLocator`] finds literal anchor phrases
//! - [`PositionExtractor`] reads the value to the right of an anchor or on the
//!   nearest line below it

pub mod anchor;
pub mod position;

pub use anchor::{anchor_box, AnchorBox, AnchorLocator, AnchorSpan};
pub use position::{Direction, PositionExtractor, PositionQuery};
