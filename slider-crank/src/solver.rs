//! Position, velocity and acceleration stages.
//!
//! The loop-closure equations hold through every stage:
//!
//! ```text
//! lm sin(θm) + e = lb sin(θb)
//! s = lm cos(θm) + lb cos(θb)
//! ```
//!
//! Angles are radians inside the stages; [`Driver`] angles and the reported
//! degrees are converted at the boundary only.
pub use self::{acc::*, pos::*, vel::*};
use crate::*;

mod acc;
mod linsys;
mod pos;
mod vel;

/// Tolerance of the singular checks, on dimensionless trigonometric values.
pub const SINGULAR_TOL: f64 = 1e-9;

/// A full kinematic state: position, velocity and acceleration.
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct State {
    /// Position
    pub pose: Pose,
    /// Velocity
    pub vel: Vel,
    /// Acceleration
    pub acc: Acc,
}

/// Solve the position, velocity and acceleration in order.
pub fn solve(geo: &Geometry, driver: Driver, branch: Branch, rates: Rates) -> Result<State> {
    let pose = solve_pos(geo, driver, branch)?;
    let vel = solve_vel(geo, &pose, rates.vel_driver())?;
    let acc = solve_acc(geo, &pose, &vel, rates.acc_driver())?;
    Ok(State { pose, vel, acc })
}

/// The loop-closure matrix shared by the rate stages, unknowns
/// `[θm, θb, s]` with the selector row of the driven variable.
fn rate_matrix(geo: &Geometry, pose: &Pose, kind: RateKind) -> [[f64; 3]; 3] {
    let Geometry { lm, lb, .. } = *geo;
    let (sm, cm) = pose.theta_m.sin_cos();
    let (sb, cb) = pose.theta_b.sin_cos();
    let mut select = [0.; 3];
    select[kind as usize] = 1.;
    [[lm * cm, -lb * cb, 0.], [lm * sm, lb * sb, 1.], select]
}

/// Check the singular configuration of a rate driver.
fn check_singular(pose: &Pose, kind: RateKind) -> Result<()> {
    let det = match kind {
        RateKind::Crank => pose.theta_b.cos(),
        RateKind::Coupler => pose.theta_m.cos(),
        RateKind::Slider => (pose.theta_m + pose.theta_b).sin(),
    };
    if det.abs() < SINGULAR_TOL {
        Err(Error::Singular(Singularity::of(kind)))
    } else {
        Ok(())
    }
}

fn solve_rates(geo: &Geometry, pose: &Pose, rate: RateDriver, rhs: [f64; 2]) -> Result<[f64; 3]> {
    let kind = rate.kind();
    check_singular(pose, kind)?;
    let [r1, r2] = rhs;
    linsys::solve3(rate_matrix(geo, pose, kind), [r1, r2, rate.value()])
        .ok_or(Error::Singular(Singularity::of(kind)))
}
