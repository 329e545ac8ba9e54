use crate::*;
use std::f64::consts::TAU;
#[cfg(test)]
use std::f64::consts::PI;

/// Sample one crank revolution with constant crank rates.
///
/// The crank angles start at zero and are evenly spaced. Configurations that
/// fail to solve are skipped.
pub fn sweep(geo: &Geometry, omega: f64, alpha: f64, res: usize) -> Vec<State> {
    sweep_in(geo, [0., TAU], omega, alpha, res, |_| ())
}

/// Sample the crank angles in `[start, end)` (radians) with constant crank
/// rates.
///
/// An end angle not greater than the start angle wraps around one turn. The
/// callback receives the number of processed samples.
pub fn sweep_in<C>(
    geo: &Geometry,
    [start, end]: [f64; 2],
    omega: f64,
    alpha: f64,
    res: usize,
    mut callback: C,
) -> Vec<State>
where
    C: FnMut(usize),
{
    let end = if end > start { end } else { end + TAU };
    let interval = (end - start) / res as f64;
    let rates = Rates::crank(omega, alpha);
    (0..res)
        .filter_map(|n| {
            let deg = (start + n as f64 * interval).to_degrees();
            let state = solve(geo, Driver::CrankAngle(deg), Branch::B1, rates);
            callback(n + 1);
            state.ok()
        })
        .collect()
}

/// Slider positions of the states, `[θm (degrees), s]`.
pub fn slider_curve(states: &[State]) -> Vec<[f64; 2]> {
    states.iter().map(|st| [st.pose.theta_m_deg(), st.pose.s]).collect()
}

#[test]
fn full_revolution() {
    use approx::assert_abs_diff_eq;

    let geo = Geometry::new(1., 3., 0.5);
    let states = sweep(&geo, 1., 0., 360);
    // The coupler never stands upright when the loop closes with slack
    assert_eq!(states.len(), 360);
    let [s_min, s_max] = geo.stroke().unwrap();
    let (lo, hi) = states
        .iter()
        .fold((f64::INFINITY, -f64::INFINITY), |(lo, hi), st| {
            (lo.min(st.pose.s), hi.max(st.pose.s))
        });
    assert!(lo >= s_min - 1e-12 && hi <= s_max + 1e-12);
    assert_abs_diff_eq!(hi, s_max, epsilon = 1e-3);
    assert_abs_diff_eq!(lo, s_min, epsilon = 1e-3);
    let curve = slider_curve(&states);
    assert_abs_diff_eq!(curve[90][0], 90., epsilon = 1e-9);
}

#[test]
fn wrapped_interval() {
    let geo = Geometry::new(1., 3., 0.);
    let mut count = 0;
    let states = sweep_in(&geo, [1.5 * PI, 0.5 * PI], 1., 0., 4, |n| count = n);
    assert_eq!(count, 4);
    let angles = slider_curve(&states).into_iter().map(|[a, _]| a.round()).collect::<Vec<_>>();
    assert_eq!(angles, [270., 315., 0., 45.]);
}
