pub use nalgebra::{matrix, vector};
pub use num_traits::Zero;

mod aabb;
pub mod indexing;
pub use aabb::*;

/// Grid coordinate, `(row, column)` in two dimensions.
pub type Coord<const GRID_DIMENSION: usize> =
    nalgebra::SVector<i32, { GRID_DIMENSION }>;

/// Inclusive per-axis bounds, column 0 is min and column 1 is max.
pub type Bounds<const GRID_DIMENSION: usize> =
    nalgebra::SMatrix<i32, { GRID_DIMENSION }, 2>;

/// Stencil weights or gathered neighbor values.
pub type Values<const NEIGHBORHOOD_SIZE: usize> =
    nalgebra::SVector<f64, { NEIGHBORHOOD_SIZE }>;
