use crate::domain::*;
use crate::util::*;

/// Source angular frequency, `sin(20 pi t)`.
pub const SOURCE_OMEGA: f64 = 20.0 * std::f64::consts::PI;

/// Inflow value on the source edge at time `t` and coordinate `x`,
/// `sin(20 pi t) sin^2(pi x)`.
pub fn source_value(t: f64, x: f64) -> f64 {
    let s = (std::f64::consts::PI * x).sin();
    (SOURCE_OMEGA * t).sin() * s * s
}

/// Dirichlet walls plus the time dependent source on global row 0.
///
/// Only rows of `region` that lie inside the grid are touched, so a worker
/// passes its owned rows and leaves its ghost rows alone. Must run after the
/// stencil pass and before time advances, the next pass reads these values
/// as fixed data.
pub fn apply_boundary_conditions<DomainType: DomainView<2>>(
    domain: &mut DomainType,
    mask: &Mask,
    xlin: &[f64],
    region: &AABB<2>,
    t: f64,
) {
    profiling::scope!("boundary_conditions");
    let n = xlin.len() as i32;
    debug_assert!(domain.aabb().contains_aabb(region));
    let grid = AABB::<2>::square(n as usize);
    let rows = match region.intersection(&grid) {
        Some(rows) => rows,
        None => return,
    };

    let mut zero_wall = |row: i32, col: i32| {
        let c = vector![row, col];
        if mask.is_wall(&c) {
            domain.set_coord(&c, 0.0);
        }
    };
    for row in rows.row_min()..=rows.row_max() {
        if row == 0 || row == n - 1 {
            for col in 0..n {
                zero_wall(row, col);
            }
        } else {
            zero_wall(row, 0);
            zero_wall(row, n - 1);
        }
    }

    if rows.row_min() == 0 {
        let source_row = domain.row_mut(0);
        for (value, x) in source_row.iter_mut().zip(xlin) {
            *value = source_value(t, *x);
        }
    }
}

#[cfg(test)]
mod unit_tests {
    use super::*;
    use float_cmp::assert_approx_eq;

    fn filled_grid(n: usize) -> (OwnedDomain<2>, Mask, Vec<f64>) {
        let aabb = AABB::square(n);
        let mut domain = OwnedDomain::new(aabb);
        domain.par_set_values(|_| 1.0, 16);
        (domain, build_mask(n), coordinate_vector(n, 1.0))
    }

    #[test]
    fn source_is_silent_at_time_zero() {
        let n = 16;
        let (mut domain, mask, xlin) = filled_grid(n);
        let aabb = *domain.aabb();
        apply_boundary_conditions(&mut domain, &mask, &xlin, &aabb, 0.0);
        let m = n as i32 - 1;
        for i in 0..n as i32 {
            assert_eq!(domain.view(&vector![0, i]), 0.0);
            assert_eq!(domain.view(&vector![m, i]), 0.0);
            assert_eq!(domain.view(&vector![i, 0]), 0.0);
            assert_eq!(domain.view(&vector![i, m]), 0.0);
        }
        // interior is untouched
        assert_eq!(domain.view(&vector![5, 5]), 1.0);
    }

    #[test]
    fn source_row_follows_formula() {
        let n = 32;
        let (mut domain, mask, xlin) = filled_grid(n);
        let aabb = *domain.aabb();
        let t = 0.0125;
        apply_boundary_conditions(&mut domain, &mask, &xlin, &aabb, t);
        for (i, x) in xlin.iter().enumerate() {
            let e = (20.0 * std::f64::consts::PI * t).sin()
                * (std::f64::consts::PI * x).sin().powi(2);
            assert_approx_eq!(f64, domain.view(&vector![0, i as i32]), e);
        }
        // the source overrides the zeroed corners of row 0
        assert!(domain.view(&vector![0, 0]) > 0.0);
        assert_eq!(domain.view(&vector![1, 0]), 0.0);
    }

    #[test]
    fn band_region_leaves_ghosts_alone() {
        let n = 8;
        let aabb = AABB::row_band(3, 6, n);
        let mut domain = OwnedDomain::new(aabb);
        domain.par_set_values(|_| 1.0, 4);
        let mask = Mask::for_domain(n, aabb);
        let xlin = coordinate_vector(n, 1.0);
        let owned = AABB::row_band(4, 5, n);
        apply_boundary_conditions(&mut domain, &mask, &xlin, &owned, 0.3);
        for col in 0..8 {
            assert_eq!(domain.view(&vector![3, col]), 1.0);
            assert_eq!(domain.view(&vector![6, col]), 1.0);
        }
        for row in 4..=5 {
            assert_eq!(domain.view(&vector![row, 0]), 0.0);
            assert_eq!(domain.view(&vector![row, 7]), 0.0);
            assert_eq!(domain.view(&vector![row, 3]), 1.0);
        }
    }
}
