use anyhow::Context as _;
use slider_crank::*;
use std::path::{Path, PathBuf};

/// A project file in RON format, every field is optional.
///
/// ```ron
/// #![enable(implicit_some)]
/// (
///     params: (lm: 35.0, lb: 90.0, e: 10.0, theta_m_deg: 30.0, omega: 6.28),
///     valid: (angle_range: Signed, ratio: Warn),
///     branch: B2,
/// )
/// ```
#[derive(Clone, Debug, Default, PartialEq, serde::Deserialize, serde::Serialize)]
#[serde(default)]
pub(super) struct Project {
    pub(super) params: Params,
    pub(super) valid: ValidCfg,
    pub(super) branch: Branch,
}

impl Project {
    pub(super) fn load(path: &Path) -> anyhow::Result<Self> {
        let s = std::fs::read_to_string(path)
            .with_context(|| format!("reading file error: {}", path.display()))?;
        let project = ron::from_str(&s)
            .with_context(|| format!("ron deserialization error: {}", path.display()))?;
        tracing::debug!(path = %path.display(), "project loaded");
        Ok(project)
    }
}

/// Geometry and rates, shared by all commands.
#[derive(clap::Args)]
pub(super) struct GeoArgs {
    /// Load the parameters from a RON project file, the flags override it
    #[clap(long)]
    cfg: Option<PathBuf>,
    /// Crank length (Lm)
    #[clap(long, allow_hyphen_values = true)]
    lm: Option<String>,
    /// Coupler length (Lb)
    #[clap(long, allow_hyphen_values = true)]
    lb: Option<String>,
    /// Eccentricity (e), the slider runs on the line y = -e
    #[clap(long, allow_hyphen_values = true)]
    e: Option<String>,
    /// Velocity of the driven variable (rad/s, or length/s for the slider)
    #[clap(long, allow_hyphen_values = true)]
    omega: Option<String>,
    /// Acceleration of the driven variable (rad/s², or length/s² for the slider)
    #[clap(long, allow_hyphen_values = true)]
    alpha: Option<String>,
    /// Accept a coupler/crank ratio below 2 with a warning
    #[clap(long)]
    allow_ratio: bool,
}

impl GeoArgs {
    /// Load the project file then apply the flags.
    ///
    /// An empty flag value clears the field.
    pub(super) fn load(&self) -> anyhow::Result<Project> {
        let mut project = match &self.cfg {
            Some(path) => Project::load(path)?,
            None => Project::default(),
        };
        let p = &mut project.params;
        set(&mut p.lm, Field::Lm, self.lm.as_deref())?;
        set(&mut p.lb, Field::Lb, self.lb.as_deref())?;
        set(&mut p.e, Field::E, self.e.as_deref())?;
        set(&mut p.omega, Field::Omega, self.omega.as_deref())?;
        set(&mut p.alpha, Field::Alpha, self.alpha.as_deref())?;
        if self.allow_ratio {
            project.valid.ratio = RatioPolicy::Warn;
        }
        Ok(project)
    }

    /// Validate the parameters with the crank angle as the driver.
    ///
    /// The angle is wrapped into `[0°, 360°)` first.
    pub(super) fn validate_crank(&self, theta_m_deg: f64) -> anyhow::Result<Validated> {
        let Project { mut params, valid, .. } = self.load()?;
        if params.rate != RateKind::Crank {
            tracing::warn!(rate = ?params.rate, "the rates are applied to the crank");
            params.rate = RateKind::Crank;
        }
        params.theta_m_deg = Some(wrap_deg(theta_m_deg));
        params.theta_b_deg = None;
        params.s = None;
        checked(&params, &valid)
    }
}

/// Parameters of a single configuration.
#[derive(clap::Args)]
pub(super) struct MechArgs {
    #[clap(flatten)]
    geo: GeoArgs,
    /// Driving crank angle (degrees)
    #[clap(long, allow_hyphen_values = true)]
    crank: Option<String>,
    /// Driving coupler angle (degrees)
    #[clap(long, allow_hyphen_values = true)]
    coupler: Option<String>,
    /// Driving slider position
    #[clap(long, allow_hyphen_values = true)]
    slider: Option<String>,
    /// The variable driven by `--omega` and `--alpha`
    #[clap(long, value_enum)]
    rate_of: Option<RateKind>,
    /// Assembly branch of the coupler and slider drivers
    #[clap(long, value_enum)]
    branch: Option<Branch>,
    /// Accept driving angles in [-360°, 360°] instead of [0°, 360°]
    #[clap(long)]
    signed_angles: bool,
}

impl MechArgs {
    /// Load the project file then apply the flags.
    ///
    /// The driver flags replace the driver of the project file.
    pub(super) fn load(&self) -> anyhow::Result<Project> {
        let mut project = self.geo.load()?;
        let p = &mut project.params;
        if self.crank.is_some() || self.coupler.is_some() || self.slider.is_some() {
            p.theta_m_deg = None;
            p.theta_b_deg = None;
            p.s = None;
            set(&mut p.theta_m_deg, Field::ThetaM, self.crank.as_deref())?;
            set(&mut p.theta_b_deg, Field::ThetaB, self.coupler.as_deref())?;
            set(&mut p.s, Field::S, self.slider.as_deref())?;
        }
        if let Some(rate) = self.rate_of {
            p.rate = rate;
        }
        if let Some(branch) = self.branch {
            project.branch = branch;
        }
        if self.signed_angles {
            project.valid.angle_range = AngleRange::Signed;
        }
        Ok(project)
    }

    /// Validate the parameters, returns the assembly branch together.
    pub(super) fn validate(&self) -> anyhow::Result<(Validated, Branch)> {
        let Project { params, valid, branch } = self.load()?;
        Ok((checked(&params, &valid)?, branch))
    }
}

fn wrap_deg(deg: f64) -> f64 {
    match deg.rem_euclid(360.) {
        // Tiny negative angles round up to 360°
        wrapped if wrapped == 360. => 0.,
        wrapped => wrapped + 0.,
    }
}

fn set(value: &mut Option<f64>, field: Field, text: Option<&str>) -> Result<(), ValidationError> {
    if let Some(text) = text {
        *value = parse_field(field, text)?;
    }
    Ok(())
}

fn checked(params: &Params, valid: &ValidCfg) -> anyhow::Result<Validated> {
    tracing::debug!(?params, ?valid, "validate");
    let v = validate(params, valid)?;
    for w in &v.warnings {
        eprintln!("warning: {w}");
    }
    Ok(v)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser as _;

    #[derive(clap::Parser)]
    struct Test {
        #[clap(flatten)]
        mech: MechArgs,
    }

    fn parse(args: &[&str]) -> MechArgs {
        Test::parse_from(std::iter::once("test").chain(args.iter().copied())).mech
    }

    #[test]
    fn flags() {
        let args = parse(&["--lm", "1", "--lb", "3", "--e", "-0.5", "--coupler", "-10"]);
        let project = args.load().unwrap();
        let p = &project.params;
        assert_eq!([p.lm, p.lb, p.e], [Some(1.), Some(3.), Some(-0.5)]);
        assert_eq!(p.theta_b_deg, Some(-10.));
        // Negative angles need the signed range
        let err = args.validate().unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ValidationError>(),
            Some(ValidationError::AngleRange { field: Field::ThetaB, .. })
        ));
        let args = parse(&["--lm=1", "--lb=3", "--e=0", "--coupler=-10", "--signed-angles"]);
        let (v, branch) = args.validate().unwrap();
        assert_eq!(v.driver, Driver::CouplerAngle(-10.));
        assert_eq!(branch, Branch::B1);
    }

    #[test]
    fn text_errors() {
        let args = parse(&["--lm", "one", "--lb", "3", "--e", "0", "--crank", "0"]);
        let err = args.load().unwrap_err();
        assert_eq!(
            err.downcast_ref::<ValidationError>(),
            Some(&ValidationError::NotNumeric(Field::Lm))
        );
        // An empty value is absent
        let args = parse(&["--lm", "1", "--lb", "3", "--e", "", "--crank", "0"]);
        let err = args.validate().unwrap_err();
        assert_eq!(
            err.downcast_ref::<ValidationError>(),
            Some(&ValidationError::Missing(Field::E))
        );
    }

    #[test]
    fn project_file() {
        let s = "#![enable(implicit_some)]
(
    params: (lm: 1.0, lb: 1.9, e: 0.0, theta_m_deg: 30.0, rate: Coupler, omega: 2.0),
    valid: (ratio: Warn),
    branch: B2,
)";
        let project = ron::from_str::<Project>(s).unwrap();
        assert_eq!(project.params.lb, Some(1.9));
        assert_eq!(project.params.rate, RateKind::Coupler);
        assert_eq!(project.valid.ratio, RatioPolicy::Warn);
        assert_eq!(project.valid.angle_range, AngleRange::Positive);
        assert_eq!(project.branch, Branch::B2);
        let v = validate(&project.params, &project.valid).unwrap();
        assert_eq!(v.warnings.len(), 1);
        assert_eq!(v.rates, Rates { kind: RateKind::Coupler, vel: 2., acc: 0. });
    }

    #[test]
    fn crank_driver() {
        let args = parse(&["--lm", "1", "--lb", "3", "--e", "0", "--slider", "3", "--omega", "2"]);
        let v = args.geo.validate_crank(45.).unwrap();
        assert_eq!(v.driver, Driver::CrankAngle(45.));
        assert_eq!(v.rates, Rates::crank(2., 0.));
    }

    #[test]
    fn crank_driver_wraps() {
        let args = parse(&["--lm", "1", "--lb", "3", "--e", "0"]);
        let v = args.geo.validate_crank(-90.).unwrap();
        assert_eq!(v.driver, Driver::CrankAngle(270.));
        let v = args.geo.validate_crank(400.).unwrap();
        assert_eq!(v.driver, Driver::CrankAngle(40.));
        let v = args.geo.validate_crank(-1e-15).unwrap();
        assert_eq!(v.driver, Driver::CrankAngle(0.));
        let err = args.geo.validate_crank(f64::NAN).unwrap_err();
        assert_eq!(
            err.downcast_ref::<ValidationError>(),
            Some(&ValidationError::NotNumeric(Field::ThetaM))
        );
    }
}
