use super::{check_singular, solve_rates};
use crate::*;

/// Acceleration state of the linkage.
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct Acc {
    /// Crank angular acceleration (rad/s²)
    pub alpha_m: f64,
    /// Coupler angular acceleration (rad/s²)
    pub alpha_b: f64,
    /// Slider acceleration
    pub s_ddot: f64,
}

/// Solve the acceleration from the acceleration of the driven variable.
///
/// The velocity must come from the same pose.
pub fn solve_acc(geo: &Geometry, pose: &Pose, vel: &Vel, rate: RateDriver) -> Result<Acc> {
    let Geometry { lm, lb, .. } = *geo;
    let Vel { omega_m, omega_b, .. } = *vel;
    let (sm, cm) = pose.theta_m.sin_cos();
    let (sb, cb) = pose.theta_b.sin_cos();
    let [wm2, wb2] = [omega_m * omega_m, omega_b * omega_b];
    let rhs = [
        lm * wm2 * sm - lb * wb2 * sb,
        -lm * wm2 * cm - lb * wb2 * cb,
    ];
    let [alpha_m, alpha_b, s_ddot] = solve_rates(geo, pose, rate, rhs)?;
    Ok(Acc { alpha_m, alpha_b, s_ddot })
}

/// Solve the acceleration from the crank angular acceleration by
/// substitution.
///
/// Same result as [`solve_acc`] with a crank rate.
pub fn crank_acc(geo: &Geometry, pose: &Pose, vel: &Vel, alpha_m: f64) -> Result<Acc> {
    check_singular(pose, RateKind::Crank)?;
    let Geometry { lm, lb, .. } = *geo;
    let Vel { omega_m, omega_b, .. } = *vel;
    let (sm, cm) = pose.theta_m.sin_cos();
    let (sb, cb) = pose.theta_b.sin_cos();
    let wm2 = omega_m * omega_m;
    let wb2 = omega_b * omega_b;
    let alpha_b = (lm * (alpha_m * cm - wm2 * sm) + lb * wb2 * sb) / (lb * cb);
    let s_ddot = -lm * (alpha_m * sm + wm2 * cm) - lb * (alpha_b * sb + wb2 * cb);
    Ok(Acc { alpha_m, alpha_b, s_ddot })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn linear_system_matches_substitution() {
        let geo = Geometry::new(1., 3.2, -0.7);
        for deg in (0..360).step_by(15) {
            let pose = solve_pos(&geo, Driver::CrankAngle(deg as f64), Branch::B1).unwrap();
            let vel = crank_vel(&geo, &pose, 2.).unwrap();
            let a = solve_acc(&geo, &pose, &vel, RateDriver::Crank(0.5)).unwrap();
            let b = crank_acc(&geo, &pose, &vel, 0.5).unwrap();
            assert_abs_diff_eq!(a.alpha_m, 0.5, epsilon = 1e-12);
            assert_abs_diff_eq!(a.alpha_b, b.alpha_b, epsilon = 1e-9);
            assert_abs_diff_eq!(a.s_ddot, b.s_ddot, epsilon = 1e-9);
        }
    }

    #[test]
    fn singular() {
        let geo = Geometry::new(1., 3., 2.);
        let pose = solve_pos(&geo, Driver::CrankAngle(90.), Branch::B1).unwrap();
        let vel = Vel { omega_m: 1., ..Vel::default() };
        let err = Error::Singular(Singularity::CouplerNormal);
        assert_eq!(solve_acc(&geo, &pose, &vel, RateDriver::Crank(1.)), Err(err.clone()));
        assert_eq!(crank_acc(&geo, &pose, &vel, 1.), Err(err));
    }
}
