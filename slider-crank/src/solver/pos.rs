use crate::*;
use std::f64::consts::PI;
#[cfg(test)]
use std::f64::consts::TAU;

/// Tolerance of the `asin`/`acos` arguments, clamped inside it.
pub const DOMAIN_TOL: f64 = 1e-12;

/// Position state of the linkage.
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct Pose {
    /// Crank angle (radians, in `[0, 2π)`)
    pub theta_m: f64,
    /// Coupler angle (radians)
    pub theta_b: f64,
    /// Slider position
    pub s: f64,
}

impl Pose {
    /// Crank angle in degrees.
    pub fn theta_m_deg(&self) -> f64 {
        self.theta_m.to_degrees()
    }

    /// Coupler angle in degrees.
    pub fn theta_b_deg(&self) -> f64 {
        self.theta_b.to_degrees()
    }

    /// Joint coordinates `[pivot, crank tip, slider]`.
    pub fn joints(&self, geo: &Geometry) -> Joints {
        let (sm, cm) = self.theta_m.sin_cos();
        [[0., 0.], [geo.lm * cm, geo.lm * sm], [self.s, -geo.e]]
    }

    /// Residuals of the loop-closure equations, zero for a consistent pose.
    pub fn residual(&self, geo: &Geometry) -> [f64; 2] {
        let Geometry { lm, lb, e } = *geo;
        let (sm, cm) = self.theta_m.sin_cos();
        let (sb, cb) = self.theta_b.sin_cos();
        [lm * sm + e - lb * sb, lm * cm + lb * cb - self.s]
    }

    /// The branch that a coupler-angle solve needs to reproduce this pose.
    pub fn coupler_branch(&self) -> Branch {
        Branch::from_sign(self.theta_m.cos())
    }

    /// The branch that a slider-position solve needs to reproduce this pose.
    pub fn slider_branch(&self, geo: &Geometry) -> Branch {
        let [_, [x, y], [sx, sy]] = self.joints(geo);
        Branch::from_sign(sx * y - sy * x)
    }
}

/// Solve the position from the driving quantity.
///
/// Only the assembly reachable by the crank is solved, where the coupler
/// points towards the slider (`cos(θb) >= 0`). Coupler angles and slider
/// positions (outside the stroke) of the crossed assembly are unreachable.
pub fn solve_pos(geo: &Geometry, driver: Driver, branch: Branch) -> Result<Pose> {
    let Geometry { lm, lb, e } = *geo;
    let unreachable = || Error::Unreachable { driver: driver.kind(), value: driver.value() };
    let domain = |arg: f64| {
        if arg.abs() <= 1. + DOMAIN_TOL {
            Ok(arg.clamp(-1., 1.))
        } else {
            Err(unreachable())
        }
    };
    let (theta_m, theta_b, s) = match driver {
        Driver::CrankAngle(deg) => {
            let theta_m = deg.to_radians();
            let theta_b = domain((lm * theta_m.sin() + e) / lb)?.asin();
            (theta_m, theta_b, lm * theta_m.cos() + lb * theta_b.cos())
        }
        Driver::CouplerAngle(deg) => {
            let theta_b = deg.to_radians();
            let a = domain((lb * theta_b.sin() - e) / lm)?.asin();
            let theta_m = if branch.is_b1() { a } else { PI - a };
            (theta_m, theta_b, lm * theta_m.cos() + lb * theta_b.cos())
        }
        Driver::SliderPos(s) => {
            if let Some([s_min, s_max]) = geo.stroke() {
                let tol = DOMAIN_TOL * s_max.max(1.);
                if s < s_min - tol || s > s_max + tol {
                    return Err(unreachable());
                }
            }
            let d = s.hypot(e);
            if d < DOMAIN_TOL {
                return Err(unreachable());
            }
            let k = (s * s + e * e + lb * lb - lm * lm) / (2. * lb * d);
            let theta_b = e.atan2(s) + branch.sign() * domain(k)?.acos();
            let (sb, cb) = theta_b.sin_cos();
            ((lb * sb - e).atan2(s - lb * cb), theta_b, s)
        }
    };
    if theta_b.cos() < -DOMAIN_TOL {
        return Err(unreachable());
    }
    Ok(Pose { theta_m: wrap_angle(theta_m), theta_b, s })
}
