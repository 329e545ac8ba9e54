use super::{args::GeoArgs, logger::Logger};
use anyhow::Context as _;
use slider_crank::{plot, Animator, Error, State};
use std::path::PathBuf;

#[derive(clap::Args)]
pub(super) struct Animate {
    #[clap(flatten)]
    geo: GeoArgs,
    /// Start crank angle (degrees)
    #[clap(long, default_value_t = 0., allow_hyphen_values = true)]
    start: f64,
    /// Number of frames after the start frame
    #[clap(long, default_value_t = 60)]
    frames: usize,
    /// Time step of a frame (seconds)
    #[clap(long, default_value_t = 1. / 60.)]
    dt: f64,
    /// Draw the final frame to an SVG file
    #[clap(long)]
    plot: Option<PathBuf>,
}

#[derive(serde::Serialize)]
struct Frame {
    frame: usize,
    t: f64,
    theta_m_deg: f64,
    theta_b_deg: f64,
    s: f64,
    omega_m: f64,
    s_dot: f64,
    s_ddot: f64,
}

impl Frame {
    fn new(frame: usize, t: f64, state: &State) -> Self {
        Self {
            frame,
            t,
            theta_m_deg: state.pose.theta_m_deg(),
            theta_b_deg: state.pose.theta_b_deg(),
            s: state.pose.s,
            omega_m: state.vel.omega_m,
            s_dot: state.vel.s_dot,
            s_ddot: state.acc.s_ddot,
        }
    }
}

pub(super) fn animate(animate: Animate) -> anyhow::Result<()> {
    let Animate { geo, start, frames, dt, plot } = animate;
    if !dt.is_finite() || dt < 0. {
        return Err(Error::TimeStep(dt).into());
    }
    let v = geo.validate_crank(start)?;
    if v.rates.vel < 0. {
        tracing::warn!(omega = v.rates.vel, "the crank only turns forward, start from rest");
    }
    let mut anim = Animator::new(start, v.rates.vel, v.rates.acc);
    let mut log = Logger::new(std::io::stdout().lock());
    let mut last = None;
    for i in 0..=frames {
        let state = if i == 0 { anim.state(&v.geo) } else { anim.step(&v.geo, dt) };
        match state {
            Ok(state) => {
                log.row(Frame::new(i, i as f64 * dt, &state))?;
                last.replace(state);
            }
            Err(e) => tracing::warn!(frame = i, "{e}"),
        }
    }
    log.flush()?;
    if let Some(path) = plot {
        let state = last.context("no frame is solved")?;
        plot::plot_linkage(plot::SVGBackend::new(&path, (800, 800)), &v.geo, &state.pose)?;
        tracing::info!(path = %path.display(), "figure saved");
    }
    Ok(())
}
