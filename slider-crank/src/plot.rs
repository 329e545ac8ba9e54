//! The functions used to plot the linkage and its motion curves.
pub use plotters::{prelude::*, *};

use crate::{Geometry, Pose, State};

/// Get font setting.
pub fn font() -> TextStyle<'static> {
    ("Times New Roman", 24).into_font().color(&BLACK)
}

/// Plot the motion curves over the crank angle (degrees).
///
/// Each curve is a list of `[θm, value]`.
pub fn plot_curve<B>(backend: B, title: &str, curves: &[(&str, &[[f64; 2]])]) -> anyhow::Result<()>
where
    B: DrawingBackend,
    B::ErrorType: 'static,
{
    let root = backend.into_drawing_area();
    root.fill(&WHITE)?;
    let (y_min, y_max) = curves
        .iter()
        .flat_map(|(_, c)| c.iter())
        .fold((f64::INFINITY, -f64::INFINITY), |(lo, hi), [_, y]| {
            (lo.min(*y), hi.max(*y))
        });
    anyhow::ensure!(y_min <= y_max, "nothing to plot");
    let margin = ((y_max - y_min) * 0.05).max(1e-6);
    let mut chart = ChartBuilder::on(&root)
        .caption(title, font())
        .set_label_area_size(LabelAreaPosition::Left, (10).percent())
        .set_label_area_size(LabelAreaPosition::Bottom, (6).percent())
        .margin((6).percent())
        .build_cartesian_2d(0.0..360.0, y_min - margin..y_max + margin)?;
    chart
        .configure_mesh()
        .disable_x_mesh()
        .disable_y_mesh()
        .x_desc("Crank angle (deg)")
        .x_label_style(font())
        .y_label_style(font())
        .draw()?;
    for (i, &(label, curve)) in curves.iter().enumerate() {
        let color = Palette99::pick(i);
        chart
            .draw_series(LineSeries::new(curve.iter().map(|&[x, y]| (x, y)), &color))?
            .label(label)
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], &color));
    }
    chart
        .configure_series_labels()
        .background_style(&WHITE)
        .border_style(&BLACK)
        .label_font(font())
        .draw()?;
    Ok(())
}

/// Plot the slider position, velocity and acceleration of sampled states.
pub fn plot_motion<B>(backend: B, states: &[State]) -> anyhow::Result<()>
where
    B: DrawingBackend,
    B::ErrorType: 'static,
{
    let curve = |f: fn(&State) -> f64| {
        states.iter().map(|st| [st.pose.theta_m_deg(), f(st)]).collect::<Vec<_>>()
    };
    let s = curve(|st| st.pose.s);
    let v = curve(|st| st.vel.s_dot);
    let a = curve(|st| st.acc.s_ddot);
    plot_curve(
        backend,
        "Slider Motion",
        &[("Position", &s[..]), ("Velocity", &v[..]), ("Acceleration", &a[..])],
    )
}

/// Plot the linkage at a pose, with the slider line and the stroke.
pub fn plot_linkage<B>(backend: B, geo: &Geometry, pose: &Pose) -> anyhow::Result<()>
where
    B: DrawingBackend,
    B::ErrorType: 'static,
{
    let root = backend.into_drawing_area();
    root.fill(&WHITE)?;
    let [p0, p1, p2] = pose.joints(geo);
    let [s_min, s_max] = geo.stroke().unwrap_or([p2[0], p2[0]]);
    let frame = [
        [-geo.lm, -geo.lm],
        [geo.lm, geo.lm],
        [s_max + geo.lm * 0.5, -geo.e],
        [s_min.min(0.), -geo.e],
    ];
    let [x_min, x_max, y_min, y_max] = bounding_box(&[("", &frame[..])]);
    let cap = format!(
        "θm = {:.02}°, θb = {:.02}°, s = {:.04}",
        pose.theta_m_deg(),
        pose.theta_b_deg(),
        pose.s
    );
    let mut chart = ChartBuilder::on(&root)
        .caption(cap, font())
        .set_label_area_size(LabelAreaPosition::Left, (8).percent())
        .set_label_area_size(LabelAreaPosition::Bottom, (4).percent())
        .margin((8).percent())
        .build_cartesian_2d(x_min..x_max, y_min..y_max)?;
    chart
        .configure_mesh()
        .disable_x_mesh()
        .disable_y_mesh()
        .x_label_style(font())
        .y_label_style(font())
        .draw()?;
    let line = [(x_min, -geo.e), (x_max, -geo.e)];
    chart.draw_series(LineSeries::new(line, BLACK.mix(0.3).stroke_width(1)))?;
    let stroke = [(s_min, -geo.e), (s_max, -geo.e)];
    chart.draw_series(LineSeries::new(stroke, GREEN.mix(0.3).stroke_width(5)))?;
    let crank = [p0, p1].map(|[x, y]| (x, y));
    chart.draw_series(LineSeries::new(crank, RED.stroke_width(3)))?;
    let coupler = [p1, p2].map(|[x, y]| (x, y));
    chart.draw_series(LineSeries::new(coupler, BLUE.stroke_width(3)))?;
    let half = geo.lm * 0.15;
    let block = [(p2[0] - half, p2[1] - half * 0.6), (p2[0] + half, p2[1] + half * 0.6)];
    chart.draw_series([Rectangle::new(block, GREEN.filled())])?;
    chart.draw_series([p0, p1, p2].map(|[x, y]| Circle::new((x, y), 5, BLACK.filled())))?;
    Ok(())
}

/// Get the bounding box of the data, ignore the labels.
pub fn bounding_box<L>(curves: &[(L, &[[f64; 2]])]) -> [f64; 4] {
    let [mut x_min, mut x_max] = [&f64::INFINITY, &-f64::INFINITY];
    let [mut y_min, mut y_max] = [&f64::INFINITY, &-f64::INFINITY];
    for [x, y] in curves.iter().flat_map(|(_, curve)| curve.iter()) {
        if x < x_min {
            x_min = x;
        }
        if x > x_max {
            x_max = x;
        }
        if y < y_min {
            y_min = y;
        }
        if y > y_max {
            y_max = y;
        }
    }
    let dx = (x_max - x_min).abs();
    let dy = (y_max - y_min).abs();
    if dx > dy {
        let cen = (y_min + y_max) * 0.5;
        let r = dx * 0.5;
        [*x_min, *x_max, cen - r, cen + r]
    } else {
        let cen = (x_min + x_max) * 0.5;
        let r = dy * 0.5;
        [cen - r, cen + r, *y_min, *y_max]
    }
}

#[test]
fn svg_figures() {
    use crate::*;

    let geo = Geometry::new(1., 3., 0.5);
    let states = sweep(&geo, 2., 0., 90);
    let mut buf = String::new();
    plot_motion(SVGBackend::with_string(&mut buf, (800, 600)), &states).unwrap();
    assert!(buf.contains("<svg"));
    let mut buf = String::new();
    let pose = solve_pos(&geo, Driver::CrankAngle(30.), Branch::B1).unwrap();
    plot_linkage(SVGBackend::with_string(&mut buf, (800, 600)), &geo, &pose).unwrap();
    assert!(buf.contains("<svg"));
    let box_ = bounding_box(&[("", &[[0., 0.], [4., 1.]][..])]);
    assert_eq!(box_, [0., 4., -1.5, 2.5]);
}
