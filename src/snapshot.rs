//! Field output for external tools. The solver never reads these back
//! during a run.

use crate::domain::*;
use crate::error::Result;
use crate::util::*;
use std::io::prelude::*;

/// One line per row, values separated by `, `.
pub fn write_csv_2d<DomainType: DomainView<2>, P: AsRef<std::path::Path>>(
    domain: &DomainType,
    path: &P,
) -> Result<()> {
    tracing::debug!(path = ?path.as_ref(), "writing csv");
    let mut output = std::io::BufWriter::new(std::fs::File::create(path)?);
    let aabb = domain.aabb();
    for row in aabb.row_min()..=aabb.row_max() {
        let values = domain.row(row);
        write!(output, "{}", values[0])?;
        for v in &values[1..] {
            write!(output, ", {v}")?;
        }
        writeln!(output)?;
    }
    output.flush()?;
    Ok(())
}

/// Dense row-major `f64` values in native byte order, no header.
pub fn write_raw<DomainType: DomainView<2>, P: AsRef<std::path::Path>>(
    domain: &DomainType,
    path: &P,
) -> Result<()> {
    tracing::debug!(path = ?path.as_ref(), "writing raw field");
    let mut output = std::io::BufWriter::new(std::fs::File::create(path)?);
    output.write_all(bytemuck::cast_slice(domain.buffer()))?;
    output.flush()?;
    Ok(())
}

/// Read a field written by [`write_raw`] back over `aabb`.
pub fn read_raw<P: AsRef<std::path::Path>>(
    aabb: AABB<2>,
    path: &P,
) -> Result<OwnedDomain<2>> {
    let mut buffer = vec![0.0f64; aabb.buffer_size()];
    let mut input = std::fs::File::open(path)?;
    input.read_exact(bytemuck::cast_slice_mut(&mut buffer))?;
    OwnedDomain::from_buffer(aabb, buffer)
}
