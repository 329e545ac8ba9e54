use super::args::GeoArgs;
use indicatif::{ProgressBar, ProgressStyle};
use slider_crank::{csv, plot, Rates};
use std::{path::PathBuf, time::Instant};

#[derive(clap::Args)]
pub(super) struct Sweep {
    #[clap(flatten)]
    geo: GeoArgs,
    /// Number of samples (resolution)
    #[clap(long, default_value_t = 360)]
    res: usize,
    /// Start crank angle (degrees)
    #[clap(long, default_value_t = 0., allow_hyphen_values = true)]
    start: f64,
    /// End crank angle (degrees), an end not after the start wraps one turn
    #[clap(long, default_value_t = 360., allow_hyphen_values = true)]
    end: f64,
    /// Output path of the CSV table, default to stdout
    #[clap(short, long)]
    out: Option<PathBuf>,
    /// Plot the slider motion to an SVG file
    #[clap(long)]
    plot: Option<PathBuf>,
}

pub(super) fn sweep(sweep: Sweep) -> anyhow::Result<()> {
    let Sweep { geo, res, start, end, out, plot } = sweep;
    anyhow::ensure!(res > 0, "the resolution must be positive");
    anyhow::ensure!(end.is_finite(), "the end angle must be a finite number");
    let v = geo.validate_crank(start)?;
    let Rates { vel: omega, acc: alpha, .. } = v.rates;
    let t0 = Instant::now();
    let pb = ProgressBar::new(res as u64)
        .with_style(ProgressStyle::with_template("{bar:40} {pos}/{len} {elapsed}")?);
    let interval = [start.to_radians(), end.to_radians()];
    let states = slider_crank::sweep_in(&v.geo, interval, omega, alpha, res, |n| {
        pb.set_position(n as u64);
    });
    pb.finish_and_clear();
    let skipped = res - states.len();
    if skipped > 0 {
        tracing::warn!(skipped, "some configurations failed to solve");
    }
    tracing::info!(samples = states.len(), elapsed = ?t0.elapsed(), "sweep done");
    let table = csv::dump_states(&states)
        .map_err(|e| anyhow::anyhow!("csv serialization error: {e}"))?;
    match &out {
        Some(path) => {
            std::fs::write(path, table)?;
            tracing::info!(path = %path.display(), "table saved");
        }
        None => print!("{table}"),
    }
    if let Some(path) = plot {
        plot::plot_motion(plot::SVGBackend::new(&path, (1600, 900)), &states)?;
        tracing::info!(path = %path.display(), "figure saved");
    }
    Ok(())
}
