use crate::build_info;
use crate::config::*;
use crate::error::{Error, Result};
use crate::initial_conditions::*;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

#[cfg(feature = "profile-with-puffin")]
static PUFFIN_SERVER: std::sync::Mutex<Option<puffin_http::Server>> =
    std::sync::Mutex::new(None);

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum SnapshotFormat {
    #[default]
    Csv,
    Raw,
}

impl SnapshotFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            SnapshotFormat::Csv => "csv",
            SnapshotFormat::Raw => "raw",
        }
    }
}

/// fdwave 2D wave equation solver
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Args {
    /// Directory for snapshots, created when missing.
    #[arg(short, long)]
    pub output_dir: Option<PathBuf>,

    /// Snapshot file format.
    #[arg(long, default_value = "csv")]
    pub snapshot_format: SnapshotFormat,

    /// Write a snapshot every this many steps, 0 writes only the final field.
    #[arg(long, default_value = "0")]
    pub snapshot_every: usize,

    /// Chunk size to use for parallelism.
    #[arg(short, long, default_value = "4096")]
    pub chunk_size: usize,

    /// Domain size, assume square
    #[arg(short, long, default_value = "256")]
    pub domain_size: usize,

    /// Physical edge length of the domain.
    #[arg(long, default_value = "1.0")]
    pub boxsize: f64,

    /// Propagation speed.
    #[arg(long, default_value = "1.0")]
    pub speed: f64,

    /// Simulation end time.
    #[arg(long, default_value = "2.0")]
    pub t_end: f64,

    /// Explicit time step, derived from the CFL bound when missing.
    #[arg(long)]
    pub dt: Option<f64>,

    /// Number of row bands, each runs on its own thread.
    #[arg(short, long, default_value = "1")]
    pub workers: usize,

    /// What the outer ghost rows of the first and last band hold.
    #[arg(long, default_value = "fixed")]
    pub end_policy: EndPolicy,

    /// Time integration scheme.
    #[arg(long, default_value = "leapfrog")]
    pub scheme: Scheme,

    /// Initial condition.
    #[arg(long, default_value = "zero")]
    pub ic: ClapICType,

    /// Impulse amplitude, or the bound of random values.
    #[arg(long, default_value = "1.0")]
    pub ic_dial: f64,

    /// Seed for random initial conditions.
    #[arg(long, default_value = "0")]
    pub ic_seed: u64,

    /// The number of threads to use.
    #[arg(short, long, default_value = "8")]
    pub threads: usize,

    /// Print build information and quit
    #[arg(long)]
    pub build_info: bool,
}

impl Args {
    pub fn wave_config(&self) -> Result<WaveConfig> {
        WaveConfig {
            n: self.domain_size,
            boxsize: self.boxsize,
            c: self.speed,
            t_end: self.t_end,
            dt: self.dt,
            workers: self.workers,
            end_policy: self.end_policy,
            scheme: self.scheme,
            chunk_size: self.chunk_size,
        }
        .build()
    }

    pub fn ic_type(&self) -> ICType {
        self.ic
            .to_ic_type(self.domain_size, self.ic_dial, self.ic_seed)
    }

    /// Parse arguments, start logging, size the rayon pool and prepare
    /// the output directory.
    pub fn cli_setup(name: &str) -> Result<Self> {
        let args = Args::parse();

        if args.build_info {
            build_info::print_report(name);
            std::process::exit(0);
        }

        init_logging();

        if let Some(output_dir) = &args.output_dir {
            std::fs::create_dir_all(output_dir)?;
        }

        #[cfg(feature = "profile-with-puffin")]
        {
            let server_addr =
                format!("127.0.0.1:{}", puffin_http::DEFAULT_PORT);
            match puffin_http::Server::new(&server_addr) {
                Ok(server) => {
                    tracing::info!(
                        "Run this to view profiling data:  puffin_viewer {server_addr}"
                    );
                    if let Ok(mut slot) = PUFFIN_SERVER.lock() {
                        *slot = Some(server);
                    }
                    profiling::puffin::set_scopes_on(true);
                    profiling::finish_frame!();
                }
                Err(e) => tracing::warn!("profiling server not started: {e}"),
            }
        }

        rayon::ThreadPoolBuilder::new()
            .num_threads(args.threads)
            .thread_name(|i| format!("rayon_thread_{}", i))
            .build_global()
            .map_err(|e| {
                Error::InvalidConfig(format!("rayon thread pool: {e}"))
            })?;

        Ok(args)
    }

    /// Path for snapshot `i`, `None` without an output directory.
    pub fn snapshot_path(&self, i: usize) -> Option<PathBuf> {
        self.output_dir.as_ref().map(|dir| {
            let mut result = dir.clone();
            result.push(format!(
                "field_{:06}.{}",
                i,
                self.snapshot_format.extension()
            ));
            result
        })
    }

    pub fn finish(&self) {
        #[cfg(feature = "profile-with-puffin")]
        {
            tracing::info!("Flushing profiler");
            // Dropping the server flushes the profiling data
            if let Ok(mut slot) = PUFFIN_SERVER.lock() {
                slot.take();
            }
        }
    }
}

/// `RUST_LOG` style filtering, `fdwave=info` unless the environment says
/// otherwise. Safe to call more than once.
pub fn init_logging() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("fdwave=info"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

#[cfg(test)]
mod unit_tests {
    use super::*;

    #[test]
    fn defaults_match_reference_problem() {
        let args = Args::try_parse_from(["wave_2d"]).unwrap();
        let config = args.wave_config().unwrap();
        assert_eq!(config, WaveConfig::default().build().unwrap());
        assert_eq!(args.ic_type(), ICType::Zero);
        assert_eq!(args.snapshot_path(3), None);
    }

    #[test]
    fn flags_reach_config() {
        let args = Args::try_parse_from([
            "wave_2d_bands",
            "--domain-size",
            "64",
            "--workers",
            "4",
            "--end-policy",
            "periodic",
            "--scheme",
            "two-layer",
            "--ic",
            "rand",
            "--ic-seed",
            "9",
            "--output-dir",
            "out",
            "--snapshot-format",
            "raw",
        ])
        .unwrap();
        let config = args.wave_config().unwrap();
        assert_eq!(config.n, 64);
        assert_eq!(config.workers, 4);
        assert_eq!(config.end_policy, EndPolicy::Periodic);
        assert_eq!(config.scheme, Scheme::TwoLayer);
        assert_eq!(args.ic_type(), ICType::Rand { seed: 9, max: 1.0 });
        assert_eq!(
            args.snapshot_path(12),
            Some(PathBuf::from("out/field_000012.raw"))
        );
    }

    #[test]
    fn bad_partition_is_reported() {
        let args = Args::try_parse_from([
            "wave_2d_bands",
            "--domain-size",
            "10",
            "--workers",
            "4",
        ])
        .unwrap();
        assert!(matches!(
            args.wave_config(),
            Err(Error::PartitionMismatch { .. })
        ));
    }
}
