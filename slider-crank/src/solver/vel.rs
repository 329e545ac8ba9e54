use super::{check_singular, solve_rates};
use crate::*;

/// Velocity state of the linkage.
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct Vel {
    /// Crank angular velocity (rad/s)
    pub omega_m: f64,
    /// Coupler angular velocity (rad/s)
    pub omega_b: f64,
    /// Slider velocity
    pub s_dot: f64,
}

/// Solve the velocity from the rate of the driven variable.
///
/// The first derivative of the loop closure is solved as a linear system,
/// the given rate folded in as the third equation.
pub fn solve_vel(geo: &Geometry, pose: &Pose, rate: RateDriver) -> Result<Vel> {
    let [omega_m, omega_b, s_dot] = solve_rates(geo, pose, rate, [0., 0.])?;
    Ok(Vel { omega_m, omega_b, s_dot })
}

/// Solve the velocity from the crank angular velocity by substitution.
///
/// Same result as [`solve_vel`] with a crank rate.
pub fn crank_vel(geo: &Geometry, pose: &Pose, omega_m: f64) -> Result<Vel> {
    check_singular(pose, RateKind::Crank)?;
    let Geometry { lm, lb, .. } = *geo;
    let (sm, cm) = pose.theta_m.sin_cos();
    let (sb, cb) = pose.theta_b.sin_cos();
    let omega_b = lm * omega_m * cm / (lb * cb);
    let s_dot = -lm * omega_m * sm - lb * omega_b * sb;
    Ok(Vel { omega_m, omega_b, s_dot })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn linear_system_matches_substitution() {
        let geo = Geometry::new(1., 3.2, 0.7);
        for deg in (0..360).step_by(15) {
            let pose = solve_pos(&geo, Driver::CrankAngle(deg as f64), Branch::B1).unwrap();
            let a = solve_vel(&geo, &pose, RateDriver::Crank(2.5)).unwrap();
            let b = crank_vel(&geo, &pose, 2.5).unwrap();
            assert_abs_diff_eq!(a.omega_m, 2.5, epsilon = 1e-12);
            assert_abs_diff_eq!(a.omega_b, b.omega_b, epsilon = 1e-9);
            assert_abs_diff_eq!(a.s_dot, b.s_dot, epsilon = 1e-9);
        }
    }

    #[test]
    fn any_variable_drives() {
        let geo = Geometry::new(1., 3., 0.5);
        let pose = solve_pos(&geo, Driver::CrankAngle(40.), Branch::B1).unwrap();
        let vel = solve_vel(&geo, &pose, RateDriver::Crank(1.5)).unwrap();
        let by_coupler = solve_vel(&geo, &pose, RateDriver::Coupler(vel.omega_b)).unwrap();
        let by_slider = solve_vel(&geo, &pose, RateDriver::Slider(vel.s_dot)).unwrap();
        for v in [by_coupler, by_slider] {
            assert_abs_diff_eq!(v.omega_m, vel.omega_m, epsilon = 1e-9);
            assert_abs_diff_eq!(v.omega_b, vel.omega_b, epsilon = 1e-9);
            assert_abs_diff_eq!(v.s_dot, vel.s_dot, epsilon = 1e-9);
        }
    }

    #[test]
    fn singular() {
        // (lm sin 90° + e) / lb = 1, the coupler stands upright
        let geo = Geometry::new(1., 3., 2.);
        let pose = solve_pos(&geo, Driver::CrankAngle(90.), Branch::B1).unwrap();
        let err = Error::Singular(Singularity::CouplerNormal);
        assert_eq!(solve_vel(&geo, &pose, RateDriver::Crank(1.)), Err(err.clone()));
        assert_eq!(crank_vel(&geo, &pose, 1.), Err(err));
        // Extended dead center
        let geo = Geometry::new(1., 3., 0.);
        let pose = solve_pos(&geo, Driver::CrankAngle(0.), Branch::B1).unwrap();
        let err = solve_vel(&geo, &pose, RateDriver::Slider(1.)).unwrap_err();
        assert_eq!(err, Error::Singular(Singularity::DeadCenter));
        let pose = solve_pos(&geo, Driver::CrankAngle(90.), Branch::B1).unwrap();
        let err = solve_vel(&geo, &pose, RateDriver::Coupler(1.)).unwrap_err();
        assert_eq!(err, Error::Singular(Singularity::CrankNormal));
    }
}
