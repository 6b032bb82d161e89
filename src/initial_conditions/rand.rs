use crate::domain::*;
use rand::prelude::*;
use rayon::prelude::*;

/// Uniform values in `[-max, max]`. Each row draws from its own
/// generator seeded with `seed` and the row index, so the result does
/// not depend on how rows are scheduled.
pub fn rand_ic<DomainType: DomainView<2>>(
    domain: &mut DomainType,
    seed: u64,
    max: f64,
    chunk_size: usize,
) {
    let row_len = domain.aabb().row_len();
    let first_row = domain.aabb().row_min();
    let rows_per_task = (chunk_size / row_len).max(1);
    domain
        .buffer_mut()
        .par_chunks_mut(rows_per_task * row_len)
        .enumerate()
        .for_each(|(task, chunk): (usize, &mut [f64])| {
            for (r, row) in chunk.chunks_mut(row_len).enumerate() {
                let global_row =
                    first_row as i64 + (task * rows_per_task + r) as i64;
                let row_seed = seed.wrapping_mul(0x9E37_79B9_7F4A_7C15)
                    ^ global_row as u64;
                let mut rng = StdRng::seed_from_u64(row_seed);
                for value in row.iter_mut() {
                    *value = if max > 0.0 {
                        rng.gen_range(-max..=max)
                    } else {
                        0.0
                    };
                }
            }
        });
}
