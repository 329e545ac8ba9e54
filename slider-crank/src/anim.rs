use crate::*;

/// Crank driver of an animation.
///
/// Integrates the crank rates with an explicit Euler step per frame. The
/// crank only turns counter-clockwise: the angular velocity never drops
/// below zero.
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct Animator {
    /// Crank angle (radians, in `[0, 2π)`)
    pub theta_m: f64,
    /// Crank angular velocity (rad/s)
    pub omega: f64,
    /// Crank angular acceleration (rad/s²)
    pub alpha: f64,
}

impl Animator {
    /// Create a new animator from the start angle in degrees.
    pub fn new(theta_m_deg: f64, omega: f64, alpha: f64) -> Self {
        let theta_m = wrap_angle(theta_m_deg.to_radians());
        Self { theta_m, omega: omega.max(0.), alpha }
    }

    /// Solve the linkage at the current frame.
    pub fn state(&self, geo: &Geometry) -> Result<State> {
        let rates = Rates::crank(self.omega, self.alpha);
        solve(geo, Driver::CrankAngle(self.theta_m.to_degrees()), Branch::B1, rates)
    }

    /// Advance the crank by `dt` seconds, then solve the new frame.
    pub fn step(&mut self, geo: &Geometry, dt: f64) -> Result<State> {
        if !dt.is_finite() || dt < 0. {
            return Err(Error::TimeStep(dt));
        }
        self.omega = (self.omega + self.alpha * dt).max(0.);
        self.theta_m = wrap_angle(self.theta_m + self.omega * dt);
        self.state(geo)
    }
}
