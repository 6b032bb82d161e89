//! This module has things for managing the domain,
//! which really means retrieving values based on world coordinates.
//! A worker only holds a band of the grid, so we use views to
//! represent the piece of space a buffer covers and translate from
//! world coordinates into buffer indices.

mod grid;
mod mask;
mod view;

pub use grid::*;
pub use mask::*;
pub use view::*;
