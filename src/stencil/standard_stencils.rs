use crate::stencil::*;

/// Offsets shared by the 5 point stencils, the centre is last.
pub const FIVE_POINT_OFFSETS: [[i32; 2]; 5] =
    [[-1, 0], [1, 0], [0, -1], [0, 1], [0, 0]];

/// Scaled 5 point Laplacian, `fac * (up + down + left + right - 4 centre)`.
/// With `fac = dt^2 c^2 / dx^2` this is the spatial part of the
/// explicit wave update.
pub fn wave_laplacian_2d(fac: f64) -> Stencil<2, 5> {
    Stencil::new(FIVE_POINT_OFFSETS, move |args: &[f64; 5]| {
        let up = args[0];
        let down = args[1];
        let left = args[2];
        let right = args[3];
        let middle = args[4];
        fac * (up + down + left + right - 4.0 * middle)
    })
}

#[cfg(test)]
mod unit_tests {
    use super::*;
    use crate::util::*;
    use float_cmp::assert_approx_eq;

    #[test]
    fn wave_laplacian_weights() {
        let s = wave_laplacian_2d(0.5);
        let w = s.weights();
        for i in 0..4 {
            assert_approx_eq!(f64, w[i], 0.5);
        }
        assert_approx_eq!(f64, w[4], -2.0);
        assert_eq!(s.slopes(), matrix![1, 1; 1, 1]);
    }

    #[test]
    fn constant_field_has_no_laplacian() {
        let s = wave_laplacian_2d(0.3);
        let r = s.apply(&Values::from([2.5; 5]));
        assert_approx_eq!(f64, r, 0.0, epsilon = 1e-15);
    }
}
