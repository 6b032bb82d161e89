use crate::error::{Error, Result};
use clap::ValueEnum;

/// Largest stable courant number `c dt / dx` for the 5 point leapfrog.
pub const CFL_LIMIT: f64 = std::f64::consts::FRAC_1_SQRT_2;

/// Largest grid edge whose wall layout still fits `i32` arithmetic.
pub const MAX_GRID_SIZE: usize = i32::MAX as usize / 11;

/// Upper bound on the number of time steps in one run.
pub const MAX_STEPS: usize = u32::MAX as usize;

pub const DEFAULT_CHUNK_SIZE: usize = 4096;

/// What the chain-end ghost rows of a row partition hold.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum EndPolicy {
    /// First and last workers have no outer neighbor, their outer ghost
    /// rows stay at zero for the whole run.
    #[default]
    Fixed,
    /// The chain wraps, worker 0 and the last worker are neighbors.
    Periodic,
}

/// Time integration scheme.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum Scheme {
    /// Three layer leapfrog, `next = 2 cur - prev + fac lap(cur)`.
    #[default]
    Leapfrog,
    /// Two layer variant, `next = cur + fac lap(cur)`. This is not the
    /// wave equation's leapfrog and diverges from it after one step,
    /// it only exists for comparison runs.
    TwoLayer,
}

/// Immutable run configuration. Build it with [`WaveConfig::build`] or
/// check a hand made one with [`WaveConfig::validate`]; components only
/// ever receive validated copies.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct WaveConfig {
    /// Grid edge length, the domain is `n x n`.
    pub n: usize,

    /// Physical size of the domain.
    pub boxsize: f64,

    /// Propagation speed.
    pub c: f64,

    /// Simulation end time.
    pub t_end: f64,

    /// Explicit time step, derived from the CFL bound when `None`.
    pub dt: Option<f64>,

    /// Number of row bands, `1` runs the unpartitioned solver.
    pub workers: usize,

    /// Chain-end ghost row behavior for partitioned runs.
    pub end_policy: EndPolicy,

    pub scheme: Scheme,

    /// Some multithreaded operations on buffers are chunked with this size.
    pub chunk_size: usize,
}

impl std::default::Default for WaveConfig {
    fn default() -> Self {
        WaveConfig {
            n: 256,
            boxsize: 1.0,
            c: 1.0,
            t_end: 2.0,
            dt: None,
            workers: 1,
            end_policy: EndPolicy::Fixed,
            scheme: Scheme::Leapfrog,
            chunk_size: DEFAULT_CHUNK_SIZE,
        }
    }
}

fn check_positive(name: &str, value: f64) -> Result<()> {
    if !value.is_finite() || value <= 0.0 {
        return Err(Error::InvalidConfig(format!(
            "{name} must be positive and finite, got {value}"
        )));
    }
    Ok(())
}

impl WaveConfig {
    /// Grid with the reference physical constants.
    pub fn with_size(n: usize) -> Self {
        WaveConfig {
            n,
            ..Default::default()
        }
    }

    /// Validate and return the configuration.
    pub fn build(self) -> Result<Self> {
        self.validate()?;
        Ok(self)
    }

    pub fn validate(&self) -> Result<()> {
        if self.n < 4 {
            return Err(Error::InvalidConfig(format!(
                "grid size must be at least 4, got {}",
                self.n
            )));
        }
        if self.n > MAX_GRID_SIZE {
            return Err(Error::InvalidConfig(format!(
                "grid size {} does not fit grid coordinates",
                self.n
            )));
        }
        check_positive("boxsize", self.boxsize)?;
        check_positive("c", self.c)?;
        check_positive("t_end", self.t_end)?;
        if let Some(dt) = self.dt {
            check_positive("dt", dt)?;
        }
        if self.chunk_size == 0 {
            return Err(Error::InvalidConfig(
                "chunk size must be at least 1".to_string(),
            ));
        }
        if self.workers == 0 {
            return Err(Error::InvalidConfig(
                "at least one worker is required".to_string(),
            ));
        }
        if self.n % self.workers != 0 {
            return Err(Error::PartitionMismatch {
                rows: self.n,
                workers: self.workers,
            });
        }

        let courant = self.courant();
        if courant > CFL_LIMIT * (1.0 + 4.0 * f64::EPSILON) {
            return Err(Error::CflViolation {
                courant,
                limit: CFL_LIMIT,
            });
        }

        let steps = (self.t_end / self.dt()).ceil();
        if !(steps < MAX_STEPS as f64) {
            return Err(Error::InvalidConfig(format!(
                "t_end {} needs {steps} steps, at most {MAX_STEPS} allowed",
                self.t_end
            )));
        }
        Ok(())
    }

    pub fn dx(&self) -> f64 {
        self.boxsize / self.n as f64
    }

    /// Time step, `(sqrt(2) / 2) dx / c` unless given explicitly.
    pub fn dt(&self) -> f64 {
        self.dt.unwrap_or_else(|| stable_dt(self.dx(), self.c))
    }

    /// `c dt / dx`
    pub fn courant(&self) -> f64 {
        self.c * self.dt() / self.dx()
    }

    /// `dt^2 c^2 / dx^2`
    pub fn fac(&self) -> f64 {
        let dt = self.dt();
        let dx = self.dx();
        dt * dt * self.c * self.c / (dx * dx)
    }

    /// Smallest `k` with `k dt >= t_end`, i.e. `ceil(t_end / dt)`.
    /// Only meaningful on a validated configuration.
    pub fn total_steps(&self) -> usize {
        let dt = self.dt();
        let steps = (self.t_end / dt).ceil() as usize;
        // ceil of a rounded quotient can land one step short
        if (steps as f64) * dt < self.t_end {
            steps.saturating_add(1)
        } else {
            steps
        }
    }

    /// Rows owned by each worker.
    pub fn rows_per_worker(&self) -> usize {
        self.n / self.workers
    }
}

/// The largest time step allowed by the CFL bound used here.
pub fn stable_dt(dx: f64, c: f64) -> f64 {
    CFL_LIMIT * dx / c
}

#[cfg(test)]
mod unit_tests {
    use super::*;
    use float_cmp::assert_approx_eq;

    #[test]
    fn derived_dt_is_stable() {
        let config = WaveConfig::default().build().unwrap();
        let dx = 1.0 / 256.0;
        assert_approx_eq!(f64, config.dx(), dx);
        assert_approx_eq!(f64, config.dt(), (2.0f64.sqrt() / 2.0) * dx);
        assert!(config.courant() <= CFL_LIMIT * (1.0 + 4.0 * f64::EPSILON));
        assert_approx_eq!(f64, config.fac(), 0.5, epsilon = 1e-12);
    }

    #[test]
    fn large_dt_is_rejected() {
        let dx = 1.0 / 256.0;
        let config = WaveConfig {
            dt: Some(0.8 * dx),
            ..WaveConfig::default()
        };
        match config.validate() {
            Err(Error::CflViolation { courant, limit }) => {
                assert_approx_eq!(f64, courant, 0.8, epsilon = 1e-12);
                assert_approx_eq!(f64, limit, CFL_LIMIT);
            }
            other => panic!("expected CFL violation, got {other:?}"),
        }
    }

    #[test]
    fn smaller_dt_is_accepted() {
        let dx = 1.0 / 256.0;
        let config = WaveConfig {
            dt: Some(0.5 * dx),
            ..WaveConfig::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn indivisible_partition_is_rejected() {
        let config = WaveConfig {
            n: 10,
            workers: 4,
            ..WaveConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(Error::PartitionMismatch {
                rows: 10,
                workers: 4
            })
        ));
    }

    #[test]
    fn bad_values_are_rejected() {
        let cases = [
            WaveConfig::with_size(2),
            WaveConfig {
                c: 0.0,
                ..WaveConfig::default()
            },
            WaveConfig {
                t_end: f64::NAN,
                ..WaveConfig::default()
            },
            WaveConfig {
                workers: 0,
                ..WaveConfig::default()
            },
            WaveConfig {
                chunk_size: 0,
                ..WaveConfig::default()
            },
            WaveConfig {
                dt: Some(-1.0),
                ..WaveConfig::default()
            },
        ];
        for config in cases {
            assert!(
                matches!(config.validate(), Err(Error::InvalidConfig(_))),
                "{config:?}"
            );
        }
    }

    #[test]
    fn huge_end_time_is_rejected() {
        for t_end in [1e300, 1.2345e17, 1.2345e16] {
            let config = WaveConfig {
                t_end,
                ..WaveConfig::default()
            };
            assert!(
                matches!(config.validate(), Err(Error::InvalidConfig(_))),
                "{t_end}"
            );
        }
        let config = WaveConfig {
            t_end: 1000.0,
            ..WaveConfig::default()
        };
        assert!(config.validate().is_ok());
        assert_eq!(config.total_steps(), 362_039);
    }

    #[test]
    fn oversized_grid_is_rejected() {
        let config = WaveConfig {
            n: 200_000_000,
            ..WaveConfig::default()
        };
        assert!(matches!(config.validate(), Err(Error::InvalidConfig(_))));
    }

    #[test]
    fn step_count_reaches_end_time() {
        let config = WaveConfig::default();
        let steps = config.total_steps();
        assert_eq!(steps, (config.t_end / config.dt()).ceil() as usize);
        assert_eq!(steps, 725);
        assert!(steps as f64 * config.dt() >= config.t_end);
        assert!(((steps - 1) as f64) * config.dt() < config.t_end);
    }
}
