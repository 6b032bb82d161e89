use crate::util::indexing::*;
use crate::util::*;

/// Axis Aligned Bounding Box (AABB) for coordinate types.
/// Each instance is inclusive of both corners.
/// This class is responsible for alot of indexing operations,
/// where we map between a linear buffer and coordinates.
#[derive(Hash, Debug, Copy, Clone, Eq, PartialEq)]
pub struct AABB<const DIMENSION: usize> {
    pub bounds: Bounds<DIMENSION>,
}

impl<const GRID_DIMENSION: usize> std::fmt::Display for AABB<GRID_DIMENSION> {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> Result<(), std::fmt::Error> {
        write!(f, "{:?}", self.bounds)
    }
}

impl<const DIMENSION: usize> AABB<DIMENSION> {
    /// Create AABB from raw bounds.
    #[inline]
    pub fn new(bounds: Bounds<DIMENSION>) -> Self {
        AABB { bounds }
    }

    /// Moving min to the origin, returns the exclusive size in each direction
    /// i.e. [0, 9]  would have exclusive size of 10.
    pub fn exclusive_bounds(&self) -> Coord<DIMENSION> {
        (self.bounds.column(1) - self.bounds.column(0)).add_scalar(1)
    }

    /// Return the number of coordinates contained in the instance.
    #[inline]
    pub fn buffer_size(&self) -> usize {
        real_buffer_size(&self.exclusive_bounds())
    }

    /// Return the linear index for a coord in the instance
    pub fn coord_to_linear(&self, coord: &Coord<DIMENSION>) -> usize {
        coord_to_linear(&(coord - self.min()), &self.exclusive_bounds())
    }

    /// Return the coordinate in the instance for a given linear index.
    pub fn linear_to_coord(&self, index: usize) -> Coord<DIMENSION> {
        linear_to_coord(index, &self.exclusive_bounds()) + self.min()
    }

    /// Check whether the instance contains a coordinate.
    pub fn contains(&self, coord: &Coord<DIMENSION>) -> bool {
        for d in 0..DIMENSION {
            if coord[d] < self.bounds[(d, 0)] || coord[d] > self.bounds[(d, 1)]
            {
                return false;
            }
        }
        true
    }

    /// Check whether another AABB is contained in the instance.
    pub fn contains_aabb(&self, other: &Self) -> bool {
        for d in 0..DIMENSION {
            if other.bounds[(d, 0)] < self.bounds[(d, 0)]
                || other.bounds[(d, 1)] > self.bounds[(d, 1)]
            {
                return false;
            }
        }
        true
    }

    /// Overlap of two boxes, `None` when they are disjoint.
    pub fn intersection(&self, other: &Self) -> Option<Self> {
        let mut result = *self;
        for d in 0..DIMENSION {
            result.bounds[(d, 0)] =
                self.bounds[(d, 0)].max(other.bounds[(d, 0)]);
            result.bounds[(d, 1)] =
                self.bounds[(d, 1)].min(other.bounds[(d, 1)]);
        }
        if result.check_validity() {
            Some(result)
        } else {
            None
        }
    }

    /// Grow the box by `margin`, column 0 is subtracted from min and
    /// column 1 added to max. Stencil slopes have this layout.
    pub fn add_margin(&self, margin: Bounds<DIMENSION>) -> Self {
        let mut result = *self;
        for d in 0..DIMENSION {
            result.bounds[(d, 0)] -= margin[(d, 0)];
            result.bounds[(d, 1)] += margin[(d, 1)];
        }
        result
    }

    /// Return min corner.
    pub fn min(&self) -> Coord<DIMENSION> {
        self.bounds.column(0).into()
    }

    /// Return max corner
    pub fn max(&self) -> Coord<DIMENSION> {
        self.bounds.column(1).into()
    }

    /// Check that max >= min
    pub fn check_validity(&self) -> bool {
        for d in 0..DIMENSION {
            if self.bounds[(d, 0)] > self.bounds[(d, 1)] {
                return false;
            }
        }
        true
    }

    /// Return iterator over contained coords
    /// in linear ordering.
    pub fn coord_iter(&self) -> impl Iterator<Item = Coord<DIMENSION>> + '_ {
        (0..self.buffer_size()).map(|i| self.linear_to_coord(i))
    }

    /// Convert neighbor offsets into linear buffer offsets for this box.
    pub fn coord_offset_to_linear<const NEIGHBORHOOD_SIZE: usize>(
        &self,
        coord_offsets: &[Coord<DIMENSION>; NEIGHBORHOOD_SIZE],
    ) -> [isize; NEIGHBORHOOD_SIZE] {
        // highest dimension goes the fastest
        let exclusive_bounds = self.exclusive_bounds();
        let mut linear_offsets = [0; NEIGHBORHOOD_SIZE];
        let mut accumulator: isize = 1;
        for d in (0..DIMENSION).rev() {
            for o in 0..NEIGHBORHOOD_SIZE {
                linear_offsets[o] += coord_offsets[o][d] as isize * accumulator;
            }
            accumulator *= exclusive_bounds[d] as isize;
        }

        linear_offsets
    }
}

impl AABB<2> {
    /// Square `n x n` grid anchored at the origin.
    pub fn square(n: usize) -> Self {
        let inclusive = n as i32 - 1;
        AABB::new(matrix![0, inclusive; 0, inclusive])
    }

    /// Full-width row band `[row_min, row_max]`, both inclusive.
    pub fn row_band(row_min: i32, row_max: i32, n: usize) -> Self {
        AABB::new(matrix![row_min, row_max; 0, n as i32 - 1])
    }

    pub fn row_min(&self) -> i32 {
        self.bounds[(0, 0)]
    }

    pub fn row_max(&self) -> i32 {
        self.bounds[(0, 1)]
    }

    pub fn col_min(&self) -> i32 {
        self.bounds[(1, 0)]
    }

    pub fn col_max(&self) -> i32 {
        self.bounds[(1, 1)]
    }

    /// Number of columns, i.e. the contiguous row length in a buffer.
    pub fn row_len(&self) -> usize {
        self.exclusive_bounds()[1] as usize
    }
}
