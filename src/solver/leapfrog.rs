use crate::boundary::*;
use crate::config::{Scheme, DEFAULT_CHUNK_SIZE};
use crate::domain::*;
use crate::stencil::standard_stencils::wave_laplacian_2d;
use crate::stencil::*;
use crate::util::*;
use rayon::prelude::*;

/// One stencil pass over every non-wall cell of `update`.
///
/// Reads `previous` and `current`, writes only `next`. Cells outside
/// `update` and wall cells of `next` are left as they are. All three
/// domains and the mask must share one AABB, and `update` must keep a
/// one cell margin inside it. Rows are handed to rayon in chunks of about
/// `chunk_size` cells; the call returns once every chunk is written.
#[allow(clippy::too_many_arguments)]
pub fn apply_step<DomainType: DomainView<2>>(
    scheme: Scheme,
    stencil: &Stencil<2, 5>,
    previous: &DomainType,
    current: &DomainType,
    next: &mut DomainType,
    mask: &Mask,
    update: &AABB<2>,
    chunk_size: usize,
) {
    profiling::scope!("leapfrog::apply_step");
    let aabb = *current.aabb();
    debug_assert_eq!(previous.aabb(), &aabb);
    debug_assert_eq!(next.aabb(), &aabb);
    debug_assert_eq!(mask.aabb(), &aabb);
    debug_assert!(aabb.contains_aabb(&update.add_margin(stencil.slopes())));

    let row_len = aabb.row_len();
    let rows_per_task = (chunk_size / row_len).max(1);
    let offsets = aabb.coord_offset_to_linear(stencil.offsets());
    let w = stencil.weights();
    let cb = current.buffer();
    let pb = previous.buffer();
    let walls = mask.walls();

    let first_row = update.row_min() - aabb.row_min();
    let last_row = update.row_max() - aabb.row_min();
    let col_min = (update.col_min() - aabb.col_min()) as usize;
    let col_max = (update.col_max() - aabb.col_min()) as usize;

    next.buffer_mut()
        .par_chunks_mut(rows_per_task * row_len)
        .enumerate()
        .for_each(|(task, chunk): (usize, &mut [f64])| {
            let task_first_row = (task * rows_per_task) as i32;
            for (r, row) in chunk.chunks_mut(row_len).enumerate() {
                let local_row = task_first_row + r as i32;
                if local_row < first_row || local_row > last_row {
                    continue;
                }
                let row_start = local_row as usize * row_len;
                for col in col_min..=col_max {
                    let index = row_start + col;
                    if walls[index] {
                        continue;
                    }
                    let mut lap = 0.0;
                    for (k, offset) in offsets.iter().enumerate() {
                        let n_index = (index as isize + offset) as usize;
                        lap += w[k] * cb[n_index];
                    }
                    row[col] = match scheme {
                        Scheme::Leapfrog => 2.0 * cb[index] - pb[index] + lap,
                        Scheme::TwoLayer => cb[index] + lap,
                    };
                }
            }
        });
}

/// Interior of an `n x n` grid, the cells a stencil pass may write.
pub fn interior(n: usize) -> AABB<2> {
    let inner = n as i32 - 2;
    AABB::new(matrix![1, inner; 1, inner])
}

/// Full grid step with the reference leapfrog scheme: the stencil pass
/// writes `next` from `current` and `previous`, then the boundary
/// conditions for time `t` are applied to `next`.
/// Rolling the layers is left to the caller.
pub fn step<DomainType: DomainView<2>>(
    current: &DomainType,
    previous: &DomainType,
    next: &mut DomainType,
    mask: &Mask,
    fac: f64,
    t: f64,
    xlin: &[f64],
) {
    let n = xlin.len();
    let stencil = wave_laplacian_2d(fac);
    apply_step(
        Scheme::Leapfrog,
        &stencil,
        previous,
        current,
        next,
        mask,
        &interior(n),
        DEFAULT_CHUNK_SIZE,
    );
    let region = *next.aabb();
    apply_boundary_conditions(next, mask, xlin, &region, t);
}
