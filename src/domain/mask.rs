use crate::util::*;
use rayon::prelude::*;

/// Static wall map. `true` cells are never touched by the stencil.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mask {
    aabb: AABB<2>,
    walls: Vec<bool>,
}

/// Whether global cell `(row, col)` of an `n x n` grid is a wall.
///
/// Edges are walls, as is the barrier band `[n/4, 9n/32)` over columns
/// `[0, n-1)`. The two slits `[5n/16, 3n/8)` and `[5n/8, 11n/16)` are open
/// on every non-edge row. Anything outside the grid counts as a wall, which
/// is what chain-end ghost rows see.
pub fn is_wall(n: usize, row: i32, col: i32) -> bool {
    let n = n as i32;
    if row < 0 || row >= n || col < 0 || col >= n {
        return true;
    }
    if row == 0 || row == n - 1 || col == 0 || col == n - 1 {
        return true;
    }
    let in_slit = (5 * n / 16..3 * n / 8).contains(&col)
        || (5 * n / 8..11 * n / 16).contains(&col);
    if in_slit {
        return false;
    }
    (n / 4..9 * n / 32).contains(&row) && col < n - 1
}

impl Mask {
    /// Evaluate the global wall map over `aabb`, which may extend past the
    /// grid. Partitioned and unpartitioned grids see the same walls.
    pub fn for_domain(n: usize, aabb: AABB<2>) -> Self {
        let mut walls = vec![false; aabb.buffer_size()];
        walls.par_iter_mut().enumerate().for_each(|(i, w)| {
            let c = aabb.linear_to_coord(i);
            *w = is_wall(n, c[0], c[1]);
        });
        Mask { aabb, walls }
    }

    pub fn aabb(&self) -> &AABB<2> {
        &self.aabb
    }

    pub fn walls(&self) -> &[bool] {
        &self.walls
    }

    #[track_caller]
    pub fn is_wall(&self, world_coord: &Coord<2>) -> bool {
        debug_assert!(self.aabb.contains(world_coord));
        self.walls[self.aabb.coord_to_linear(world_coord)]
    }

    /// Number of wall cells, handy for logging.
    pub fn wall_count(&self) -> usize {
        self.walls.iter().filter(|w| **w).count()
    }
}

/// Mask for the full `n x n` grid.
pub fn build_mask(n: usize) -> Mask {
    Mask::for_domain(n, AABB::square(n))
}
