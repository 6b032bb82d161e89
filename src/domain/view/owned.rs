use super::*;
use crate::error::{Error, Result};
use crate::util::*;

/// Domain that owns its buffer. The buffer is allocated once, zeroed,
/// and never resized.
#[derive(Debug, Clone)]
pub struct OwnedDomain<const GRID_DIMENSION: usize> {
    aabb: AABB<GRID_DIMENSION>,
    buffer: Vec<f64>,
}

impl<const GRID_DIMENSION: usize> OwnedDomain<GRID_DIMENSION> {
    pub fn new(aabb: AABB<GRID_DIMENSION>) -> Self {
        let buffer = vec![0.0; aabb.buffer_size()];
        OwnedDomain { aabb, buffer }
    }

    /// Wrap an existing buffer, its length must match the box.
    pub fn from_buffer(
        aabb: AABB<GRID_DIMENSION>,
        buffer: Vec<f64>,
    ) -> Result<Self> {
        if buffer.len() != aabb.buffer_size() {
            return Err(Error::InvalidConfig(format!(
                "buffer of {} values does not cover {}",
                buffer.len(),
                aabb
            )));
        }
        Ok(OwnedDomain { aabb, buffer })
    }
}

impl<const GRID_DIMENSION: usize> DomainView<GRID_DIMENSION>
    for OwnedDomain<GRID_DIMENSION>
{
    fn aabb(&self) -> &AABB<GRID_DIMENSION> {
        &self.aabb
    }

    fn buffer(&self) -> &[f64] {
        &self.buffer
    }

    fn buffer_mut(&mut self) -> &mut [f64] {
        &mut self.buffer
    }

    fn aabb_buffer_mut(&mut self) -> (&AABB<GRID_DIMENSION>, &mut [f64]) {
        (&self.aabb, &mut self.buffer)
    }
}

#[cfg(test)]
mod unit_tests {
    use super::*;

    fn mock_roll<
        const GRID_DIMENSION: usize,
        DomainType: DomainView<GRID_DIMENSION>,
    >(
        input: &mut DomainType,
        output: &mut DomainType,
    ) {
        std::mem::swap(input, output);
    }

    #[test]
    fn swap_test() {
        let mut a = OwnedDomain::new(AABB::new(matrix![0, 1]));
        let mut b = OwnedDomain::new(AABB::new(matrix![0, 1]));
        let a_ptr = a.buffer().as_ptr();
        let b_ptr = b.buffer().as_ptr();
        mock_roll(&mut a, &mut b);
        let sa_ptr = a.buffer().as_ptr();
        let sb_ptr = b.buffer().as_ptr();
        assert_eq!(a_ptr, sb_ptr);
        assert_eq!(b_ptr, sa_ptr);
    }

    #[test]
    fn zero_initialized() {
        let a = OwnedDomain::new(AABB::square(6));
        assert_eq!(a.buffer().len(), 36);
        assert!(a.buffer().iter().all(|v| *v == 0.0));
    }

    #[test]
    fn from_buffer_checks_length() {
        let aabb = AABB::square(3);
        assert!(OwnedDomain::from_buffer(aabb, vec![0.0; 8]).is_err());
        let d = OwnedDomain::from_buffer(aabb, (0..9).map(f64::from).collect())
            .unwrap();
        assert_eq!(d.view(&vector![1, 2]), 5.0);
    }
}
