use fdwave::cli::*;
use fdwave::snapshot::*;
use fdwave::solver::*;

fn main() -> fdwave::Result<()> {
    let args = Args::cli_setup("wave_2d_bands")?;
    let config = args.wave_config()?;

    let report = run_config(config, args.ic_type())?;

    if let Some(path) = args.snapshot_path(0) {
        match args.snapshot_format {
            SnapshotFormat::Csv => write_csv_2d(&report.field, &path)?,
            SnapshotFormat::Raw => write_raw(&report.field, &path)?,
        }
    }

    let times: Vec<String> = report
        .worker_times
        .iter()
        .map(|t| format!("{:.6}", t.as_secs_f64()))
        .collect();
    println!("worker times: [{}]", times.join(", "));
    println!("total: {:.6}s", report.total_worker_time().as_secs_f64());
    println!(
        "steps: {}, t: {:.6}, elapsed: {:.6}s",
        report.steps,
        report.t,
        report.elapsed.as_secs_f64()
    );
    args.finish();
    Ok(())
}
