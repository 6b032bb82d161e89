use crate::boundary::*;
use crate::config::*;
use crate::decomposition::*;
use crate::domain::*;
use crate::error::{Error, Result};
use crate::initial_conditions::*;
use crate::solver::driver::RunReport;
use crate::solver::leapfrog::{apply_step, interior};
use crate::stencil::standard_stencils::wave_laplacian_2d;
use crate::stencil::*;
use crate::util::*;
use std::time::{Duration, Instant};

/// One row band with its own three layers, ghost rows included, and
/// the channels to its neighbors.
#[derive(Debug)]
pub struct BandWorker {
    band: Band,
    link: HaloLink,
    grid: WaveGrid,
    stencil: Stencil<2, 5>,
    /// Owned interior rows, `None` for a band made only of edge rows.
    update: Option<AABB<2>>,
    scheme: Scheme,
    dt: f64,
    chunk_size: usize,
    steps_taken: usize,
}

/// A band's final state after [`BandWorker::run`].
#[derive(Debug)]
pub struct FinishedBand {
    pub band: Band,
    pub steps: usize,
    pub elapsed: Duration,
    /// Latest layer over the band, ghost rows included.
    pub current: OwnedDomain<2>,
}

impl BandWorker {
    pub fn new(config: &WaveConfig, band: Band, link: HaloLink) -> Self {
        debug_assert_eq!(band.rank, link.rank());
        let grid = WaveGrid::new(config.n, config.boxsize, band.with_ghosts());
        BandWorker {
            band,
            link,
            grid,
            stencil: wave_laplacian_2d(config.fac()),
            update: band.owned().intersection(&interior(config.n)),
            scheme: config.scheme,
            dt: config.dt(),
            chunk_size: config.chunk_size,
            steps_taken: 0,
        }
    }

    pub fn band(&self) -> &Band {
        &self.band
    }

    pub fn grid(&self) -> &WaveGrid {
        &self.grid
    }

    pub fn grid_mut(&mut self) -> &mut WaveGrid {
        &mut self.grid
    }

    pub fn steps_taken(&self) -> usize {
        self.steps_taken
    }

    /// Refresh the ghost rows of `current` from the neighbors. Blocks
    /// until both neighbors reached the same step.
    pub fn exchange_halos(&mut self) -> Result<()> {
        self.link
            .exchange(&self.band, self.grid.current_mut(), self.steps_taken)
    }

    /// Exchange, stencil over the owned rows, roll, boundary conditions
    /// on the owned rows, advance.
    pub fn step(&mut self) -> Result<()> {
        profiling::scope!("band_worker::step");
        self.exchange_halos()?;
        if let Some(update) = &self.update {
            let (previous, current, next, mask) = self.grid.stencil_parts();
            apply_step(
                self.scheme,
                &self.stencil,
                previous,
                current,
                next,
                mask,
                update,
                self.chunk_size,
            );
        }
        self.grid.roll();
        let t = self.steps_taken as f64 * self.dt;
        let owned = self.band.owned();
        let (current, mask, xlin) = self.grid.boundary_parts();
        apply_boundary_conditions(current, mask, xlin, &owned, t);
        self.steps_taken += 1;
        Ok(())
    }

    /// Take `steps` steps. The worker is consumed so its channels close
    /// as soon as it stops, for better or worse, and no neighbor is left
    /// waiting on it.
    pub fn run(mut self, steps: usize) -> Result<FinishedBand> {
        let start = Instant::now();
        while self.steps_taken < steps {
            self.step()?;
        }
        let elapsed = start.elapsed();
        tracing::debug!(rank = self.band.rank, ?elapsed, "band finished");
        let BandWorker {
            band,
            grid,
            steps_taken,
            ..
        } = self;
        Ok(FinishedBand {
            band,
            steps: steps_taken,
            elapsed,
            current: grid.into_current(),
        })
    }
}

/// Row partitioned solver, one scoped thread per band.
#[derive(Debug)]
pub struct BandedSolver {
    config: WaveConfig,
    partition: RowPartition,
    workers: Vec<BandWorker>,
}

impl BandedSolver {
    pub fn new(config: WaveConfig) -> Result<Self> {
        config.validate()?;
        let partition =
            RowPartition::new(config.n, config.workers, config.end_policy)?;
        let workers = halo_links(&partition)
            .into_iter()
            .zip(partition.bands())
            .map(|(link, band)| BandWorker::new(&config, *band, link))
            .collect();
        Ok(BandedSolver {
            config,
            partition,
            workers,
        })
    }

    /// The global field is generated once and every band copies its rows.
    pub fn with_initial_conditions(mut self, ic_type: ICType) -> Result<Self> {
        let field =
            generate_ic(self.config.n, ic_type, self.config.chunk_size)?;
        for worker in &mut self.workers {
            worker.grid_mut().load_field(&field);
        }
        Ok(self)
    }

    pub fn partition(&self) -> &RowPartition {
        &self.partition
    }

    pub fn workers(&self) -> &[BandWorker] {
        &self.workers
    }

    /// Run every band to `t_end` and gather the owned rows into one
    /// field.
    pub fn run(self) -> Result<RunReport> {
        let BandedSolver {
            config,
            partition,
            workers,
        } = self;
        let steps = config.total_steps();
        tracing::info!(
            n = config.n,
            workers = partition.workers(),
            policy = ?partition.policy(),
            dt = config.dt(),
            steps,
            "starting partitioned run"
        );

        let start = Instant::now();
        let results: Vec<Result<FinishedBand>> = std::thread::scope(|s| {
            let handles: Vec<_> = workers
                .into_iter()
                .map(|worker| {
                    let rank = worker.band().rank;
                    let handle = std::thread::Builder::new()
                        .name(format!("band_{rank}"))
                        .spawn_scoped(s, move || worker.run(steps));
                    (rank, handle)
                })
                .collect();
            handles
                .into_iter()
                .map(|(rank, handle)| match handle {
                    Ok(handle) => handle
                        .join()
                        .unwrap_or(Err(Error::WorkerPanicked { rank })),
                    Err(e) => Err(Error::Io(e)),
                })
                .collect()
        });
        let elapsed = start.elapsed();

        let finished = first_failure(results)?;
        let mut field = OwnedDomain::new(AABB::square(config.n));
        for band in &finished {
            for row in band.band.first_row()..=band.band.last_row() {
                field.row_mut(row).copy_from_slice(band.current.row(row));
            }
        }
        let worker_times: Vec<Duration> =
            finished.iter().map(|band| band.elapsed).collect();
        tracing::info!(?elapsed, "partitioned run finished");

        Ok(RunReport {
            steps,
            t: steps as f64 * config.dt(),
            elapsed,
            worker_times,
            field,
        })
    }
}

/// A failing worker hangs up on its neighbors, who then report a
/// disconnect. Report the failure that started it when there is one.
fn first_failure(
    results: Vec<Result<FinishedBand>>,
) -> Result<Vec<FinishedBand>> {
    let mut finished = Vec::with_capacity(results.len());
    let mut disconnect = None;
    let mut failure = None;
    for result in results {
        match result {
            Ok(band) => finished.push(band),
            Err(e @ Error::HaloDisconnected { .. }) => {
                disconnect.get_or_insert(e);
            }
            Err(e) => {
                failure.get_or_insert(e);
            }
        }
    }
    match failure.or(disconnect) {
        Some(e) => Err(e),
        None => Ok(finished),
    }
}
