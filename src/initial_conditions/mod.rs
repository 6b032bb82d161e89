//! Initial fields for `previous` and `current`.
//!
//! Every generator produces the whole `n x n` field in global
//! coordinates, so a band sees exactly the values a serial run would.

mod impulse;
mod rand;

pub use self::impulse::*;
pub use self::rand::*;

use crate::domain::*;
use crate::error::Result;
use crate::util::*;
use clap::ValueEnum;
use rayon::prelude::*;

#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub enum ICType {
    /// Everything at rest, the reference runs.
    #[default]
    Zero,
    /// A single displaced cell.
    Impulse { row: i32, col: i32, amplitude: f64 },
    /// Uniform values in `[-max, max]`, reproducible from `seed`.
    Rand { seed: u64, max: f64 },
}

#[derive(Copy, Clone, Debug, ValueEnum, Default)]
pub enum ClapICType {
    #[default]
    Zero,
    Impulse,
    Rand,
}

impl ClapICType {
    /// `dial` is the impulse amplitude or the random bound, the impulse
    /// lands in the middle of the grid.
    pub fn to_ic_type(&self, n: usize, dial: f64, seed: u64) -> ICType {
        match self {
            ClapICType::Zero => ICType::Zero,
            ClapICType::Impulse => ICType::Impulse {
                row: n as i32 / 2,
                col: n as i32 / 2,
                amplitude: dial,
            },
            ClapICType::Rand => ICType::Rand { seed, max: dial },
        }
    }
}

/// Build the global initial field. Wall cells are always zero.
pub fn generate_ic(
    n: usize,
    ic_type: ICType,
    chunk_size: usize,
) -> Result<OwnedDomain<2>> {
    let mut field = OwnedDomain::new(AABB::square(n));
    match ic_type {
        // Special case, domains are initialized to zero
        ICType::Zero => {}
        ICType::Impulse {
            row,
            col,
            amplitude,
        } => {
            impulse_ic(&mut field, n, vector![row, col], amplitude)?;
        }
        ICType::Rand { seed, max } => {
            rand_ic(&mut field, seed, max, chunk_size);
            zero_walls(&mut field, &build_mask(n));
        }
    }
    Ok(field)
}

fn zero_walls(field: &mut OwnedDomain<2>, mask: &Mask) {
    debug_assert_eq!(field.aabb(), mask.aabb());
    field
        .buffer_mut()
        .par_iter_mut()
        .zip(mask.walls().par_iter())
        .for_each(|(value, wall)| {
            if *wall {
                *value = 0.0;
            }
        });
}
