mod chunk;
mod owned;

pub use chunk::*;
pub use owned::*;

use crate::util::*;
use rayon::prelude::*;

/// A buffer together with the world coordinates it covers.
/// Partitioned workers hold domains whose boxes extend past the
/// global grid into their ghost rows.
pub trait DomainView<const GRID_DIMENSION: usize>: Sync {
    fn aabb(&self) -> &AABB<GRID_DIMENSION>;

    fn buffer(&self) -> &[f64];

    fn buffer_mut(&mut self) -> &mut [f64];

    fn aabb_buffer_mut(&mut self) -> (&AABB<GRID_DIMENSION>, &mut [f64]);

    #[track_caller]
    fn view(&self, world_coord: &Coord<GRID_DIMENSION>) -> f64 {
        debug_assert!(
            self.aabb().contains(world_coord),
            "{:?} does not contain {:?}",
            self.aabb(),
            world_coord
        );
        let index = self.aabb().coord_to_linear(world_coord);
        self.buffer()[index]
    }

    #[track_caller]
    fn set_coord(&mut self, world_coord: &Coord<GRID_DIMENSION>, value: f64) {
        debug_assert!(
            self.aabb().contains(world_coord),
            "{:?} does not contain {:?}",
            self.aabb(),
            world_coord
        );
        let index = self.aabb().coord_to_linear(world_coord);
        self.buffer_mut()[index] = value;
    }

    fn par_modify_access<'a>(
        &'a mut self,
        chunk_size: usize,
    ) -> impl ParallelIterator<Item = DomainChunk<'a, GRID_DIMENSION>> {
        let (aabb, buffer) = self.aabb_buffer_mut();
        par_modify_access_impl(buffer, aabb, chunk_size)
    }

    fn par_set_values<F: Fn(Coord<GRID_DIMENSION>) -> f64 + Send + Sync>(
        &mut self,
        f: F,
        chunk_size: usize,
    ) {
        self.par_modify_access(chunk_size).for_each(
            |mut d: DomainChunk<'_, GRID_DIMENSION>| {
                d.coord_iter_mut().for_each(|(world_coord, value_mut)| {
                    *value_mut = f(world_coord);
                })
            },
        );
    }
}

/// Row access for two dimensional domains, rows are contiguous.
pub trait RowAccess: DomainView<2> {
    #[track_caller]
    fn row(&self, row: i32) -> &[f64] {
        let aabb = self.aabb();
        debug_assert!(row >= aabb.row_min() && row <= aabb.row_max());
        let len = aabb.row_len();
        let start = (row - aabb.row_min()) as usize * len;
        &self.buffer()[start..start + len]
    }

    #[track_caller]
    fn row_mut(&mut self, row: i32) -> &mut [f64] {
        let aabb = *self.aabb();
        debug_assert!(row >= aabb.row_min() && row <= aabb.row_max());
        let len = aabb.row_len();
        let start = (row - aabb.row_min()) as usize * len;
        &mut self.buffer_mut()[start..start + len]
    }
}

impl<DomainType: DomainView<2>> RowAccess for DomainType {}

/// Why not just put this into Domain::par_modify_access?
/// Rust compiler can't figure out how to borrow aabb and buffer
/// at the same time in this way.
/// By putting their borrows into one function call first we work around it.
fn par_modify_access_impl<'a, const GRID_DIMENSION: usize>(
    buffer: &'a mut [f64],
    aabb: &'a AABB<GRID_DIMENSION>,
    chunk_size: usize,
) -> impl ParallelIterator<Item = DomainChunk<'a, GRID_DIMENSION>> + 'a {
    buffer[0..aabb.buffer_size()]
        .par_chunks_mut(chunk_size)
        .enumerate()
        .map(move |(i, buffer_chunk): (usize, &mut [f64])| {
            let offset = i * chunk_size;
            DomainChunk::new(offset, aabb, buffer_chunk)
        })
}
