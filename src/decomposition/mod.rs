//! Row band decomposition of the global grid.
//!
//! Each worker owns a contiguous block of full rows and keeps one ghost
//! row above and one below it. Neighbors are named by the direction of
//! the row index: `Upper` holds smaller rows, `Lower` holds larger ones.

mod halo;

pub use halo::*;

use crate::config::EndPolicy;
use crate::error::{Error, Result};
use crate::util::*;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    Upper,
    Lower,
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Direction::Upper => write!(f, "upper"),
            Direction::Lower => write!(f, "lower"),
        }
    }
}

/// The rows one worker owns, `[row_start, row_end)`, and who its
/// neighbors are.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Band {
    pub rank: usize,
    pub workers: usize,
    pub n: usize,
    pub row_start: usize,
    pub row_end: usize,
    pub upper: Option<usize>,
    pub lower: Option<usize>,
}

impl Band {
    /// Owned rows only.
    pub fn owned(&self) -> AABB<2> {
        AABB::row_band(self.first_row(), self.last_row(), self.n)
    }

    /// Owned rows plus both ghost rows. For the first and last band the
    /// ghost rows lie outside the grid at `-1` and `n`.
    pub fn with_ghosts(&self) -> AABB<2> {
        AABB::row_band(self.upper_ghost_row(), self.lower_ghost_row(), self.n)
    }

    pub fn rows(&self) -> usize {
        self.row_end - self.row_start
    }

    pub fn first_row(&self) -> i32 {
        self.row_start as i32
    }

    pub fn last_row(&self) -> i32 {
        self.row_end as i32 - 1
    }

    pub fn upper_ghost_row(&self) -> i32 {
        self.first_row() - 1
    }

    pub fn lower_ghost_row(&self) -> i32 {
        self.row_end as i32
    }

    /// Does this band own global row `row`.
    pub fn owns(&self, row: i32) -> bool {
        row >= self.first_row() && row <= self.last_row()
    }
}

/// Split of `n` rows into `workers` equal bands.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RowPartition {
    n: usize,
    policy: EndPolicy,
    bands: Vec<Band>,
}

impl RowPartition {
    pub fn new(n: usize, workers: usize, policy: EndPolicy) -> Result<Self> {
        if workers == 0 {
            return Err(Error::InvalidConfig(
                "at least one worker is required".to_string(),
            ));
        }
        if n % workers != 0 {
            return Err(Error::PartitionMismatch { rows: n, workers });
        }

        let rows = n / workers;
        let bands: Vec<Band> = (0..workers)
            .map(|rank| {
                let (upper, lower) = match policy {
                    EndPolicy::Fixed => (
                        rank.checked_sub(1),
                        (rank + 1 < workers).then_some(rank + 1),
                    ),
                    EndPolicy::Periodic => (
                        Some((rank + workers - 1) % workers),
                        Some((rank + 1) % workers),
                    ),
                };
                Band {
                    rank,
                    workers,
                    n,
                    row_start: rank * rows,
                    row_end: (rank + 1) * rows,
                    upper,
                    lower,
                }
            })
            .collect();

        for band in &bands {
            tracing::debug!(
                rank = band.rank,
                rows = ?(band.row_start..band.row_end),
                upper = ?band.upper,
                lower = ?band.lower,
                "band"
            );
        }

        Ok(RowPartition { n, policy, bands })
    }

    pub fn n(&self) -> usize {
        self.n
    }

    pub fn workers(&self) -> usize {
        self.bands.len()
    }

    pub fn policy(&self) -> EndPolicy {
        self.policy
    }

    pub fn bands(&self) -> &[Band] {
        &self.bands
    }

    pub fn band(&self, rank: usize) -> &Band {
        &self.bands[rank]
    }
}
