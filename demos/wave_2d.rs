use fdwave::cli::*;
use fdwave::snapshot::*;
use fdwave::solver::*;

fn write_snapshot(
    args: &Args,
    solver: &WaveSolver,
    i: usize,
) -> fdwave::Result<()> {
    if let Some(path) = args.snapshot_path(i) {
        match args.snapshot_format {
            SnapshotFormat::Csv => write_csv_2d(solver.snapshot(), &path)?,
            SnapshotFormat::Raw => write_raw(solver.snapshot(), &path)?,
        }
    }
    Ok(())
}

fn main() -> fdwave::Result<()> {
    let args = Args::cli_setup("wave_2d")?;
    let config = args.wave_config()?;

    let mut solver = WaveSolver::new(config)?;
    solver.set_initial_conditions(args.ic_type())?;

    let mut frame = 0;
    if args.snapshot_every > 0 {
        write_snapshot(&args, &solver, frame)?;
        frame += 1;
    }

    let start = std::time::Instant::now();
    while !solver.is_done() {
        solver.step();
        profiling::finish_frame!();
        if args.snapshot_every > 0
            && solver.steps_taken() % args.snapshot_every == 0
        {
            write_snapshot(&args, &solver, frame)?;
            frame += 1;
        }
    }
    let elapsed = start.elapsed();
    if args.snapshot_every == 0 {
        write_snapshot(&args, &solver, frame)?;
    }

    println!(
        "steps: {}, t: {:.6}, elapsed: {:.6}s",
        solver.steps_taken(),
        solver.time(),
        elapsed.as_secs_f64()
    );
    args.finish();
    Ok(())
}
