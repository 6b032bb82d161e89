use crate::boundary::*;
use crate::config::*;
use crate::domain::*;
use crate::error::Result;
use crate::initial_conditions::*;
use crate::solver::banded::BandedSolver;
use crate::solver::leapfrog::{apply_step, interior};
use crate::stencil::standard_stencils::wave_laplacian_2d;
use crate::stencil::*;
use crate::util::*;
use std::time::{Duration, Instant};

/// What a finished run hands back to its caller.
#[derive(Debug, Clone)]
pub struct RunReport {
    pub steps: usize,

    /// Simulation time reached, `steps * dt`.
    pub t: f64,

    /// Wall time of the whole run.
    pub elapsed: Duration,

    /// Wall time of each worker in rank order, a single entry for an
    /// unpartitioned run.
    pub worker_times: Vec<Duration>,

    /// The `current` layer over the full `n x n` grid.
    pub field: OwnedDomain<2>,
}

impl RunReport {
    /// Sum of the worker times.
    pub fn total_worker_time(&self) -> Duration {
        self.worker_times.iter().sum()
    }
}

/// Unpartitioned solver over the whole grid. Ignores `config.workers`,
/// use [`run_config`] to dispatch on it.
///
/// Lifecycle is `Init -> Step* -> Done`: [`WaveSolver::new`] validates
/// and allocates everything, every [`WaveSolver::step`] advances the
/// time by one `dt`, and the solver is done once `t >= t_end`.
#[derive(Debug)]
pub struct WaveSolver {
    config: WaveConfig,
    grid: WaveGrid,
    stencil: Stencil<2, 5>,
    update: AABB<2>,
    dt: f64,
    steps_taken: usize,
    total_steps: usize,
}

impl WaveSolver {
    pub fn new(config: WaveConfig) -> Result<Self> {
        config.validate()?;
        let n = config.n;
        let grid = WaveGrid::new(n, config.boxsize, AABB::square(n));
        tracing::debug!(walls = grid.mask().wall_count(), "built mask");
        Ok(WaveSolver {
            config,
            grid,
            stencil: wave_laplacian_2d(config.fac()),
            update: interior(n),
            dt: config.dt(),
            steps_taken: 0,
            total_steps: config.total_steps(),
        })
    }

    /// Replace the (zero) starting field. Wall cells stay zero.
    pub fn set_initial_conditions(&mut self, ic_type: ICType) -> Result<()> {
        let field =
            generate_ic(self.config.n, ic_type, self.config.chunk_size)?;
        self.grid.load_field(&field);
        Ok(())
    }

    pub fn config(&self) -> &WaveConfig {
        &self.config
    }

    pub fn grid(&self) -> &WaveGrid {
        &self.grid
    }

    /// Simulation time, `steps_taken * dt`.
    pub fn time(&self) -> f64 {
        self.steps_taken as f64 * self.dt
    }

    pub fn steps_taken(&self) -> usize {
        self.steps_taken
    }

    pub fn total_steps(&self) -> usize {
        self.total_steps
    }

    pub fn is_done(&self) -> bool {
        self.steps_taken >= self.total_steps
    }

    /// Read only view of the latest field.
    pub fn snapshot(&self) -> &OwnedDomain<2> {
        self.grid.current()
    }

    /// Stencil, roll, boundary conditions at the current time, then
    /// advance the time.
    pub fn step(&mut self) {
        profiling::scope!("wave_solver::step");
        let t = self.time();
        {
            let (previous, current, next, mask) = self.grid.stencil_parts();
            apply_step(
                self.config.scheme,
                &self.stencil,
                previous,
                current,
                next,
                mask,
                &self.update,
                self.config.chunk_size,
            );
        }
        self.grid.roll();
        let region = *self.grid.aabb();
        let (current, mask, xlin) = self.grid.boundary_parts();
        apply_boundary_conditions(current, mask, xlin, &region, t);
        self.steps_taken += 1;
    }

    /// Step until done.
    pub fn run(&mut self) -> RunReport {
        tracing::info!(
            n = self.config.n,
            dt = self.dt,
            steps = self.total_steps,
            "starting run"
        );
        let start = Instant::now();
        while !self.is_done() {
            self.step();
            profiling::finish_frame!();
        }
        let elapsed = start.elapsed();
        tracing::info!(?elapsed, t = self.time(), "run finished");

        RunReport {
            steps: self.steps_taken,
            t: self.time(),
            elapsed,
            worker_times: vec![elapsed],
            field: self.grid.current().clone(),
        }
    }
}

/// Run the reference problem on an unpartitioned grid from rest and
/// return the elapsed wall time.
pub fn run(n: usize, boxsize: f64, c: f64, t_end: f64) -> Result<Duration> {
    let config = WaveConfig {
        n,
        boxsize,
        c,
        t_end,
        ..WaveConfig::default()
    };
    let report = WaveSolver::new(config)?.run();
    Ok(report.elapsed)
}

/// Run `config` to completion, partitioned into row bands when it asks
/// for more than one worker.
pub fn run_config(config: WaveConfig, ic_type: ICType) -> Result<RunReport> {
    config.validate()?;
    if config.workers == 1 {
        let mut solver = WaveSolver::new(config)?;
        solver.set_initial_conditions(ic_type)?;
        Ok(solver.run())
    } else {
        BandedSolver::new(config)?
            .with_initial_conditions(ic_type)?
            .run()
    }
}
