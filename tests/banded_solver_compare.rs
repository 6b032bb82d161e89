use fdwave::domain::*;
use fdwave::initial_conditions::*;
use fdwave::solver::*;
use fdwave::*;

fn compare(config: WaveConfig, ic_type: ICType) {
    let serial = run_config(
        WaveConfig {
            workers: 1,
            ..config
        },
        ic_type,
    )
    .unwrap();
    let banded = run_config(config, ic_type).unwrap();

    assert_eq!(serial.steps, banded.steps);
    assert_eq!(serial.t, banded.t);
    assert_eq!(banded.worker_times.len(), config.workers);
    assert_eq!(serial.field.aabb(), banded.field.aabb());
    assert_eq!(
        serial.field.buffer(),
        banded.field.buffer(),
        "{config:?} {ic_type:?}"
    );
}

#[test]
fn random_start_matches_serial() {
    for workers in [2, 4] {
        for end_policy in [EndPolicy::Fixed, EndPolicy::Periodic] {
            let config = WaveConfig {
                n: 32,
                t_end: 0.3,
                workers,
                end_policy,
                ..WaveConfig::default()
            };
            compare(config, ICType::Rand { seed: 11, max: 1.0 });
        }
    }
}

#[test]
fn source_driven_run_matches_serial() {
    for end_policy in [EndPolicy::Fixed, EndPolicy::Periodic] {
        let config = WaveConfig {
            n: 64,
            t_end: 0.5,
            workers: 4,
            end_policy,
            chunk_size: 100,
            ..WaveConfig::default()
        };
        compare(config, ICType::Zero);
    }
}

#[test]
fn impulse_across_band_edge_matches_serial() {
    // row 16 is the first row of the second band
    let config = WaveConfig {
        n: 32,
        t_end: 0.1,
        workers: 2,
        ..WaveConfig::default()
    };
    compare(
        config,
        ICType::Impulse {
            row: 16,
            col: 14,
            amplitude: 1.0,
        },
    );
}

#[test]
fn two_layer_scheme_matches_serial() {
    let config = WaveConfig {
        n: 32,
        t_end: 0.2,
        workers: 4,
        scheme: Scheme::TwoLayer,
        ..WaveConfig::default()
    };
    compare(config, ICType::Rand { seed: 5, max: 0.5 });
}

#[test]
fn single_row_bands_match_serial() {
    let config = WaveConfig {
        n: 16,
        t_end: 0.3,
        workers: 16,
        ..WaveConfig::default()
    };
    compare(config, ICType::Rand { seed: 2, max: 1.0 });
}

#[test]
fn uneven_partition_fails_before_stepping() {
    let config = WaveConfig {
        n: 30,
        workers: 4,
        ..WaveConfig::default()
    };
    assert!(matches!(
        BandedSolver::new(config),
        Err(Error::PartitionMismatch {
            rows: 30,
            workers: 4
        })
    ));
}
