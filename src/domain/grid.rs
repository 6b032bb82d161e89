use crate::domain::*;
use crate::util::*;

/// Cell centre coordinate along one axis, `0.5 dx + i dx`.
pub fn coordinate_vector(n: usize, boxsize: f64) -> Vec<f64> {
    let dx = boxsize / n as f64;
    (0..n).map(|i| 0.5 * dx + i as f64 * dx).collect()
}

/// The three time layers of the leapfrog scheme plus the static
/// mask and coordinate vector. Everything is sized once at construction.
///
/// `aabb` is the square grid for a serial solve, or a worker's band
/// including its two ghost rows.
#[derive(Debug, Clone)]
pub struct WaveGrid {
    n: usize,
    previous: OwnedDomain<2>,
    current: OwnedDomain<2>,
    next: OwnedDomain<2>,
    mask: Mask,
    xlin: Vec<f64>,
}

impl WaveGrid {
    pub fn new(n: usize, boxsize: f64, aabb: AABB<2>) -> Self {
        WaveGrid {
            n,
            previous: OwnedDomain::new(aabb),
            current: OwnedDomain::new(aabb),
            next: OwnedDomain::new(aabb),
            mask: Mask::for_domain(n, aabb),
            xlin: coordinate_vector(n, boxsize),
        }
    }

    pub fn n(&self) -> usize {
        self.n
    }

    pub fn aabb(&self) -> &AABB<2> {
        self.current.aabb()
    }

    pub fn mask(&self) -> &Mask {
        &self.mask
    }

    pub fn xlin(&self) -> &[f64] {
        &self.xlin
    }

    pub fn previous(&self) -> &OwnedDomain<2> {
        &self.previous
    }

    pub fn current(&self) -> &OwnedDomain<2> {
        &self.current
    }

    pub fn next(&self) -> &OwnedDomain<2> {
        &self.next
    }

    pub fn previous_mut(&mut self) -> &mut OwnedDomain<2> {
        &mut self.previous
    }

    pub fn current_mut(&mut self) -> &mut OwnedDomain<2> {
        &mut self.current
    }

    /// Copy the rows of a global field this grid covers into both
    /// `previous` and `current`, i.e. start at rest in that shape.
    /// Rows outside `field` are left alone.
    pub fn load_field<DomainType: DomainView<2>>(
        &mut self,
        field: &DomainType,
    ) {
        let rows = match self.aabb().intersection(field.aabb()) {
            Some(rows) => rows,
            None => return,
        };
        for row in rows.row_min()..=rows.row_max() {
            let values = field.row(row);
            self.previous.row_mut(row).copy_from_slice(values);
            self.current.row_mut(row).copy_from_slice(values);
        }
    }

    /// Drop everything but the latest layer.
    pub fn into_current(self) -> OwnedDomain<2> {
        self.current
    }

    /// Split borrows for one stencil pass: `(previous, current, next, mask)`.
    pub fn stencil_parts(
        &mut self,
    ) -> (&OwnedDomain<2>, &OwnedDomain<2>, &mut OwnedDomain<2>, &Mask) {
        (&self.previous, &self.current, &mut self.next, &self.mask)
    }

    /// Split borrows for the boundary pass: `(current, mask, xlin)`.
    pub fn boundary_parts(&mut self) -> (&mut OwnedDomain<2>, &Mask, &[f64]) {
        (&mut self.current, &self.mask, &self.xlin)
    }

    /// `previous <- current <- next`. The old previous buffer becomes
    /// the next write target.
    pub fn roll(&mut self) {
        std::mem::swap(&mut self.previous, &mut self.current);
        std::mem::swap(&mut self.current, &mut self.next);
    }
}
