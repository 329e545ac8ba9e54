use std::f64::consts::{PI, TAU};

/// Minimum coupler/crank ratio accepted by the validator.
pub const MIN_RATIO: f64 = 2.;

/// Fixed geometry of an offset slider-crank linkage.
///
/// # Parameters
///
/// + Crank link `lm`
/// + Coupler link `lb`
/// + Eccentricity `e`, the offset of the slider line from the crank pivot
///
/// The crank pivot is the origin, the slider moves along `y = -e`, and the
/// crank angle is measured counter-clockwise from the slider direction.
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Geometry {
    /// Length of the crank link
    pub lm: f64,
    /// Length of the coupler link
    pub lb: f64,
    /// Eccentricity
    pub e: f64,
}

impl Default for Geometry {
    fn default() -> Self {
        Self::example()
    }
}

impl Geometry {
    /// Create a new instance.
    pub const fn new(lm: f64, lb: f64, e: f64) -> Self {
        Self { lm, lb, e }
    }

    /// An example offset slider-crank.
    pub const fn example() -> Self {
        Self::new(35., 90., 10.)
    }

    /// Coupler/crank ratio.
    pub fn ratio(&self) -> f64 {
        self.lb / self.lm
    }

    /// Return true if the coupler is long enough to close the loop at every
    /// crank angle.
    pub fn can_close(&self) -> bool {
        self.lm + self.e.abs() <= self.lb
    }

    /// Check if the data is valid.
    ///
    /// Positive links, a closable loop, and the ratio rule.
    pub fn is_valid(&self) -> bool {
        self.lm > 0.
            && self.lb > 0.
            && self.e.is_finite()
            && self.can_close()
            && self.ratio() >= MIN_RATIO
    }

    /// Slider stroke limits `[s_min, s_max]`.
    ///
    /// Return `None` if the loop cannot close.
    pub fn stroke(&self) -> Option<[f64; 2]> {
        let Self { lm, lb, e } = *self;
        if !self.can_close() {
            return None;
        }
        let e2 = e * e;
        let s_min = ((lb - lm).powi(2) - e2).max(0.).sqrt();
        let s_max = ((lb + lm).powi(2) - e2).sqrt();
        Some([s_min, s_max])
    }

    /// Crank angles of the dead centers `[extended, retracted]`, in radians
    /// in `[0, 2π)`.
    ///
    /// At the extended dead center the crank and the coupler are aligned, at
    /// the retracted one they overlap.
    pub fn dead_centers(&self) -> Option<[f64; 2]> {
        let [s_min, s_max] = self.stroke()?;
        let ext = (-self.e).atan2(s_max);
        let ret = (-self.e).atan2(s_min) + PI;
        Some([ext, ret].map(wrap_angle))
    }

    /// Quick-return ratio, the crank travel of the slower stroke over the
    /// faster one. Always at least one, exactly one without offset.
    pub fn time_ratio(&self) -> Option<f64> {
        let [ext, ret] = self.dead_centers()?;
        let inward = (ret - ext).rem_euclid(TAU);
        let outward = TAU - inward;
        Some(inward.max(outward) / inward.min(outward))
    }
}

/// Wrap an angle (radians) into `[0, 2π)`.
pub fn wrap_angle(a: f64) -> f64 {
    match a.rem_euclid(TAU) {
        // Tiny negative angles round up to 2π
        a if a == TAU => 0.,
        // Adding zero clears the sign of a negative zero
        a => a + 0.,
    }
}

/// Joint coordinates of a posed linkage: `[pivot, crank tip, slider]`.
pub type Joints = [[f64; 2]; 3];

#[test]
fn stroke_and_dead_centers() {
    use approx::assert_abs_diff_eq;

    let geo = Geometry::new(1., 3., 0.);
    assert_eq!(geo.stroke(), Some([2., 4.]));
    let [ext, ret] = geo.dead_centers().unwrap();
    assert_abs_diff_eq!(ext, 0., epsilon = 1e-12);
    assert_abs_diff_eq!(ret, PI, epsilon = 1e-12);
    assert_abs_diff_eq!(geo.time_ratio().unwrap(), 1., epsilon = 1e-12);

    let geo = Geometry::new(1., 3., 0.5);
    let [s_min, s_max] = geo.stroke().unwrap();
    assert_abs_diff_eq!(s_min, 3.75f64.sqrt(), epsilon = 1e-12);
    assert_abs_diff_eq!(s_max, 15.75f64.sqrt(), epsilon = 1e-12);
    assert!(geo.time_ratio().unwrap() > 1.);
    assert_eq!(Geometry::new(2., 3., 4.).stroke(), None);
}

#[test]
fn wrapped_angles() {
    assert_eq!(wrap_angle(-1e-17), 0.);
    assert!(wrap_angle(-1e-17).is_sign_positive());
    assert_eq!(wrap_angle(-0.), 0.);
    assert!(wrap_angle(-0.).is_sign_positive());
    assert_eq!(wrap_angle(TAU), 0.);
    assert_eq!(wrap_angle(-PI), PI);
    assert!(wrap_angle(-f64::EPSILON) < TAU);
    assert!(wrap_angle(f64::NAN).is_nan());
}
