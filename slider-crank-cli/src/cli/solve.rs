use super::{args::MechArgs, logger::Logger};
use slider_crank::{plot, Branch, Driver, Geometry, Rates, State};
use std::{io::Write, path::PathBuf};

#[derive(clap::Args)]
pub(super) struct Solve {
    #[clap(flatten)]
    mech: MechArgs,
    /// Write the report to a file instead of stdout
    #[clap(short, long)]
    out: Option<PathBuf>,
    /// Draw the posed linkage to an SVG file
    #[clap(long)]
    plot: Option<PathBuf>,
    /// Decimal places of the report
    #[clap(long, default_value_t = 4)]
    prec: usize,
}

#[derive(serde::Serialize)]
struct Input {
    driver: Driver,
    branch: Branch,
    rates: Rates,
}

#[derive(serde::Serialize)]
struct Position {
    theta_m_deg: f64,
    theta_b_deg: f64,
    s: f64,
}

#[derive(serde::Serialize)]
struct Analysis {
    ratio: f64,
    stroke: Option<[f64; 2]>,
    dead_centers_deg: Option<[f64; 2]>,
    time_ratio: Option<f64>,
}

impl Analysis {
    fn new(geo: &Geometry) -> Self {
        Self {
            ratio: geo.ratio(),
            stroke: geo.stroke(),
            dead_centers_deg: geo.dead_centers().map(|a| a.map(f64::to_degrees)),
            time_ratio: geo.time_ratio(),
        }
    }
}

pub(super) fn solve(solve: Solve) -> anyhow::Result<()> {
    let Solve { mech, out, plot, prec } = solve;
    let (v, branch) = mech.validate()?;
    let state = v.solve(branch)?;
    tracing::debug!(?state, "solved");
    let writer: Box<dyn Write> = match &out {
        Some(path) => Box::new(std::fs::File::create(path)?),
        None => Box::new(std::io::stdout().lock()),
    };
    let mut log = Logger::new(writer).with_prec(prec);
    report(&mut log, &v.geo, Input { driver: v.driver, branch, rates: v.rates }, &state)?;
    log.flush()?;
    if let Some(path) = out {
        tracing::info!(path = %path.display(), "report saved");
    }
    if let Some(path) = plot {
        plot::plot_linkage(plot::SVGBackend::new(&path, (800, 800)), &v.geo, &state.pose)?;
        tracing::info!(path = %path.display(), "figure saved");
    }
    Ok(())
}

fn report<W: Write>(
    log: &mut Logger<W>,
    geo: &Geometry,
    input: Input,
    state: &State,
) -> std::io::Result<()> {
    let pose = &state.pose;
    log.top_title("slider-crank")?;
    log.title("geometry")?;
    log.log(geo)?;
    log.title("input")?;
    log.log(input)?;
    log.title("position")?;
    log.log(Position { theta_m_deg: pose.theta_m_deg(), theta_b_deg: pose.theta_b_deg(), s: pose.s })?;
    log.title("velocity")?;
    log.log(state.vel)?;
    log.title("acceleration")?;
    log.log(state.acc)?;
    log.title("analysis")?;
    log.log(Analysis::new(geo))
}

#[test]
fn report_sections() {
    let geo = Geometry::new(1., 3., 0.);
    let rates = Rates::crank(1., 0.);
    let state = slider_crank::solve(&geo, Driver::CrankAngle(90.), Branch::B1, rates).unwrap();
    let mut buf = Vec::new();
    let input = Input { driver: Driver::CrankAngle(90.), branch: Branch::B1, rates };
    report(&mut Logger::new(&mut buf), &geo, input, &state).unwrap();
    let s = String::from_utf8(buf).unwrap();
    assert!(s.starts_with("[slider-crank]\n\n[geometry]\nlm = 1.0000\n"));
    assert!(s.contains("driver = CrankAngle(90.0000)\nbranch = B1\n"));
    assert!(s.contains("theta_b_deg = 19.4712\ns = 2.8284\n"));
    assert!(s.contains("stroke = (2.0000, 4.0000)\n"));
    assert!(s.contains("dead_centers_deg = (0.0000, 180.0000)\ntime_ratio = 1.0000\n"));
}
