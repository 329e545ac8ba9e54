use crate::*;
use approx::assert_abs_diff_eq;
use proptest::prelude::*;
use std::f64::consts::{PI, TAU};

/// Geometries that pass the validator: `lb >= 2 lm` and `lm + |e| <= lb`.
fn valid_geo() -> impl Strategy<Value = Geometry> {
    (0.5f64..5., 2.05f64..4., -0.9f64..0.9).prop_map(|(lm, ratio, e_frac)| {
        let lb = lm * ratio;
        Geometry::new(lm, lb, e_frac * (lb - lm))
    })
}

fn angle_diff(a: f64, b: f64) -> f64 {
    let d = (a - b).rem_euclid(TAU);
    d.min(TAU - d)
}

proptest! {
    #[test]
    fn loop_closure_holds(geo in valid_geo(), deg in 0f64..360.) {
        let pose = solve_pos(&geo, Driver::CrankAngle(deg), Branch::B1).unwrap();
        let [r1, r2] = pose.residual(&geo);
        prop_assert!(r1.abs() < 1e-9 && r2.abs() < 1e-9);
        prop_assert!(pose.theta_b.cos() > 0.);
    }

    #[test]
    fn round_trip_by_slider(geo in valid_geo(), deg in 0f64..360.) {
        let pose = solve_pos(&geo, Driver::CrankAngle(deg), Branch::B1).unwrap();
        let branch = pose.slider_branch(&geo);
        let back = solve_pos(&geo, Driver::SliderPos(pose.s), branch).unwrap();
        prop_assert!(angle_diff(back.theta_m, pose.theta_m) < 1e-6);
        prop_assert!((back.theta_b - pose.theta_b).abs() < 1e-6);
    }

    #[test]
    fn round_trip_by_coupler(geo in valid_geo(), deg in 0f64..360.) {
        let pose = solve_pos(&geo, Driver::CrankAngle(deg), Branch::B1).unwrap();
        let driver = Driver::CouplerAngle(pose.theta_b_deg());
        let back = solve_pos(&geo, driver, pose.coupler_branch()).unwrap();
        prop_assert!(angle_diff(back.theta_m, pose.theta_m) < 1e-6);
        prop_assert!((back.s - pose.s).abs() < 1e-6);
    }

    #[test]
    fn validated_geometry_solves(geo in valid_geo(), deg in 0f64..=360.) {
        let params = Params {
            lm: Some(geo.lm),
            lb: Some(geo.lb),
            e: Some(geo.e),
            theta_m_deg: Some(deg),
            ..Params::default()
        };
        let v = validate(&params, &ValidCfg::default()).unwrap();
        prop_assert!(v.warnings.is_empty());
        prop_assert!(v.geo.is_valid());
        prop_assert!(v.solve(Branch::B1).is_ok());
    }
}

#[test]
fn concrete_poses() {
    let geo = Geometry::new(1., 3., 0.);
    let pose = solve_pos(&geo, Driver::CrankAngle(0.), Branch::B1).unwrap();
    assert_abs_diff_eq!(pose.theta_b_deg(), 0., epsilon = 1e-12);
    assert_abs_diff_eq!(pose.s, 4., epsilon = 1e-12);
    // The coupler tilts by asin(lm / lb) at a right crank angle
    let pose = solve_pos(&geo, Driver::CrankAngle(90.), Branch::B1).unwrap();
    assert_abs_diff_eq!(pose.theta_b_deg(), 19.471220634490695, epsilon = 1e-9);
    assert_abs_diff_eq!(pose.s, 2. * 2f64.sqrt(), epsilon = 1e-12);
    assert_eq!(
        pose.joints(&geo)[2],
        [pose.s, 0.],
        "the slider runs on the pivot line without offset",
    );
}

#[test]
fn concrete_rejections() {
    let params = |lm, lb, e| Params {
        lm: Some(lm),
        lb: Some(lb),
        e: Some(e),
        theta_m_deg: Some(30.),
        ..Params::default()
    };
    let cfg = ValidCfg::default();
    let err = validate(&params(1., 1.9, 0.), &cfg).unwrap_err();
    assert!(matches!(err, ValidationError::Ratio(_)));
    let err = validate(&params(2., 3., 4.), &cfg).unwrap_err();
    assert!(matches!(err, ValidationError::LoopClosure { .. }));
}

#[test]
fn upright_coupler_is_singular() {
    let geo = Geometry::new(1., 3., 2.);
    let err = solve(&geo, Driver::CrankAngle(90.), Branch::B1, Rates::crank(1., 0.)).unwrap_err();
    assert_eq!(err, Error::Singular(Singularity::CouplerNormal));
    assert!(err.to_string().starts_with("singular configuration"));
}

#[test]
fn unreachable_is_not_nan() {
    let geo = Geometry::new(1., 3., 0.);
    for driver in [Driver::CouplerAngle(60.), Driver::SliderPos(5.)] {
        let err = solve_pos(&geo, driver, Branch::B1).unwrap_err();
        assert!(matches!(err, Error::Unreachable { .. }), "{driver:?}");
    }
}

#[test]
fn crossed_assembly_is_unreachable() {
    let params = |theta_b_deg, s| Params {
        lm: Some(1.),
        lb: Some(3.),
        e: Some(0.),
        theta_b_deg,
        s,
        ..Params::default()
    };
    for p in [params(None, Some(-3.)), params(Some(170.), None)] {
        // The fields are fine, the pose is not
        let v = validate(&p, &ValidCfg::default()).unwrap();
        for branch in [Branch::B1, Branch::B2] {
            let err = v.solve(branch).unwrap_err();
            assert!(matches!(err, Error::Unreachable { .. }), "{:?}", v.driver);
        }
    }
}

/// Velocity and acceleration against central differences of the position.
#[test]
fn rates_match_finite_difference() {
    const H: f64 = 1e-5;
    let geo = Geometry::new(1., 3.2, 0.7);
    let [omega, alpha] = [2., 0.5];
    for deg in [10., 75., 140., 200., 290.] {
        let t0 = f64::to_radians(deg);
        let at = |t: f64| {
            let theta = t0 + omega * t + 0.5 * alpha * t * t;
            solve_pos(&geo, Driver::CrankAngle(theta.to_degrees()), Branch::B1).unwrap()
        };
        let [p0, p1, p2] = [at(-H), at(0.), at(H)];
        let state = solve(&geo, Driver::CrankAngle(deg), Branch::B1, Rates::crank(omega, alpha))
            .unwrap();
        let d1 = |a: f64, b: f64| (b - a) / (2. * H);
        let d2 = |a: f64, b: f64, c: f64| (a - 2. * b + c) / (H * H);
        assert_abs_diff_eq!(state.vel.omega_b, d1(p0.theta_b, p2.theta_b), epsilon = 1e-6);
        assert_abs_diff_eq!(state.vel.s_dot, d1(p0.s, p2.s), epsilon = 1e-6);
        assert_abs_diff_eq!(
            state.acc.alpha_b,
            d2(p0.theta_b, p1.theta_b, p2.theta_b),
            epsilon = 1e-3
        );
        assert_abs_diff_eq!(state.acc.s_ddot, d2(p0.s, p1.s, p2.s), epsilon = 1e-3);
    }
}

#[test]
fn dead_centers_bound_the_stroke() {
    let geo = Geometry::new(1., 3., 0.8);
    let [s_min, s_max] = geo.stroke().unwrap();
    let [ext, ret] = geo.dead_centers().unwrap();
    let at = |t: f64| solve_pos(&geo, Driver::CrankAngle(t.to_degrees()), Branch::B1).unwrap();
    assert_abs_diff_eq!(at(ext).s, s_max, epsilon = 1e-12);
    assert_abs_diff_eq!(at(ret).s, s_min, epsilon = 1e-12);
    // Slider velocity vanishes at both ends of the stroke
    for t in [ext, ret] {
        let state = solve(&geo, Driver::CrankAngle(t.to_degrees()), Branch::B1, Rates::crank(1., 0.))
            .unwrap();
        assert_abs_diff_eq!(state.vel.s_dot, 0., epsilon = 1e-9);
    }
    assert!(ret > PI / 2. && ret < 3. * PI / 2.);
}
