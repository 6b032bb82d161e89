use crate::domain::*;
use crate::error::{Error, Result};
use crate::util::*;

/// Displace the single cell `at`, it must be a non-wall cell of the grid.
pub fn impulse_ic<DomainType: DomainView<2>>(
    domain: &mut DomainType,
    n: usize,
    at: Coord<2>,
    amplitude: f64,
) -> Result<()> {
    if !domain.aabb().contains(&at) || is_wall(n, at[0], at[1]) {
        return Err(Error::InvalidConfig(format!(
            "impulse at {:?} is not an open cell of the {n}x{n} grid",
            (at[0], at[1])
        )));
    }
    domain.set_coord(&at, amplitude);
    Ok(())
}
