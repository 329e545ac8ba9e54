use crate::*;

/// Raw parameters, each field numeric or absent.
///
/// The form-like counterpart of [`Geometry`], [`Driver`] and [`Rates`].
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[cfg_attr(feature = "serde", serde(default))]
#[derive(Clone, Debug, PartialEq, Default)]
pub struct Params {
    /// Crank length
    pub lm: Option<f64>,
    /// Coupler length
    pub lb: Option<f64>,
    /// Eccentricity
    pub e: Option<f64>,
    /// Crank angle (degrees)
    pub theta_m_deg: Option<f64>,
    /// Coupler angle (degrees)
    pub theta_b_deg: Option<f64>,
    /// Slider position
    pub s: Option<f64>,
    /// Driven variable of the rates
    pub rate: RateKind,
    /// Velocity of the driven variable, zero if absent
    pub omega: Option<f64>,
    /// Acceleration of the driven variable, zero if absent
    pub alpha: Option<f64>,
}

/// Fields of [`Params`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Field {
    /// Crank length
    Lm,
    /// Coupler length
    Lb,
    /// Eccentricity
    E,
    /// Crank angle
    ThetaM,
    /// Coupler angle
    ThetaB,
    /// Slider position
    S,
    /// Velocity
    Omega,
    /// Acceleration
    Alpha,
}

impl std::fmt::Display for Field {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Self::Lm => write!(f, "crank length (Lm)"),
            Self::Lb => write!(f, "coupler length (Lb)"),
            Self::E => write!(f, "eccentricity (e)"),
            Self::ThetaM => write!(f, "crank angle"),
            Self::ThetaB => write!(f, "coupler angle"),
            Self::S => write!(f, "slider position (s)"),
            Self::Omega => write!(f, "velocity"),
            Self::Alpha => write!(f, "acceleration"),
        }
    }
}

/// Accepted range of the driving angles.
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Hash)]
pub enum AngleRange {
    /// `[0°, 360°]`
    #[default]
    Positive,
    /// `[-360°, 360°]`
    Signed,
}

impl AngleRange {
    /// Bounds in degrees `[min, max]`.
    pub const fn bounds(&self) -> [f64; 2] {
        match self {
            Self::Positive => [0., 360.],
            Self::Signed => [-360., 360.],
        }
    }

    /// Check if the angle (degrees) is in the range.
    pub fn contains(&self, deg: f64) -> bool {
        let [min, max] = self.bounds();
        (min..=max).contains(&deg)
    }
}

impl std::fmt::Display for AngleRange {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let [min, max] = self.bounds();
        write!(f, "[{min}°, {max}°]")
    }
}

/// Policy of the coupler/crank ratio rule.
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Hash)]
pub enum RatioPolicy {
    /// Reject the parameters
    #[default]
    Block,
    /// Accept the parameters with a warning
    Warn,
}

/// Validator configuration.
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[cfg_attr(feature = "serde", serde(default))]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct ValidCfg {
    /// Accepted range of the driving angles
    pub angle_range: AngleRange,
    /// Policy of the ratio rule
    pub ratio: RatioPolicy,
}

/// Severity of a validation error.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Severity {
    /// The parameters cannot be solved.
    Hard,
    /// The parameters are solvable but outside the recommended range.
    Warning,
}

/// Error of the parameter validation.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    /// A required field is empty.
    #[error("{0} is required")]
    Missing(Field),
    /// A field is not a number.
    #[error("{0} is not a valid number")]
    NotNumeric(Field),
    /// A length is zero or negative.
    #[error("{0} must be positive")]
    NonPositive(Field),
    /// Zero or several driving quantities.
    #[error("must supply exactly one driving quantity (crank angle, coupler angle or slider position), got {0}")]
    DriverCount(usize),
    /// A driving angle is out of the accepted range.
    #[error("{field} {value}° is out of the range {range}")]
    AngleRange {
        /// Angle field
        field: Field,
        /// The angle (degrees)
        value: f64,
        /// Accepted range
        range: AngleRange,
    },
    /// The coupler cannot close the loop, `lm + |e| > lb`.
    #[error("the loop cannot close: Lm + |e| = {lm} + |{e}| is greater than Lb = {lb}")]
    LoopClosure {
        /// Crank length
        lm: f64,
        /// Coupler length
        lb: f64,
        /// Eccentricity
        e: f64,
    },
    /// The coupler/crank ratio is below [`MIN_RATIO`].
    #[error("the ratio Lb/Lm = {0} is below {}, near-singular configurations are likely", MIN_RATIO)]
    Ratio(f64),
}

impl ValidationError {
    /// Severity of this error.
    pub const fn severity(&self) -> Severity {
        match self {
            Self::Ratio(_) => Severity::Warning,
            _ => Severity::Hard,
        }
    }
}

/// Validated parameters.
#[derive(Clone, Debug, PartialEq)]
pub struct Validated {
    /// Geometry
    pub geo: Geometry,
    /// Driving quantity
    pub driver: Driver,
    /// Motion rates
    pub rates: Rates,
    /// Accepted warnings
    pub warnings: Vec<ValidationError>,
}

impl Validated {
    /// Solve the validated parameters.
    pub fn solve(&self, branch: Branch) -> Result<State> {
        solve(&self.geo, self.driver, branch, self.rates)
    }
}

/// Parse a text field. Empty text is an absent value.
pub fn parse_field(field: Field, text: &str) -> Result<Option<f64>, ValidationError> {
    let text = text.trim();
    if text.is_empty() {
        return Ok(None);
    }
    match text.parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(Some(v)),
        _ => Err(ValidationError::NotNumeric(field)),
    }
}

/// Validate the parameters before solving.
///
/// The checks run in order and the first failure is returned.
pub fn validate(params: &Params, cfg: &ValidCfg) -> Result<Validated, ValidationError> {
    let finite = |field: Field, v: Option<f64>| match v {
        Some(v) if !v.is_finite() => Err(ValidationError::NotNumeric(field)),
        v => Ok(v),
    };
    let required = |field: Field, v: Option<f64>| -> Result<f64, ValidationError> {
        finite(field, v)?.ok_or(ValidationError::Missing(field))
    };
    let positive = |field: Field, v: Option<f64>| -> Result<f64, ValidationError> {
        match required(field, v)? {
            v if v > 0. => Ok(v),
            _ => Err(ValidationError::NonPositive(field)),
        }
    };
    let lm = positive(Field::Lm, params.lm)?;
    let lb = positive(Field::Lb, params.lb)?;
    let e = required(Field::E, params.e)?;
    let drivers = [
        finite(Field::ThetaM, params.theta_m_deg)?.map(Driver::CrankAngle),
        finite(Field::ThetaB, params.theta_b_deg)?.map(Driver::CouplerAngle),
        finite(Field::S, params.s)?.map(Driver::SliderPos),
    ];
    let given = drivers.into_iter().flatten().collect::<Vec<_>>();
    let driver = match given[..] {
        [driver] => driver,
        _ => return Err(ValidationError::DriverCount(given.len())),
    };
    let angle = match driver {
        Driver::CrankAngle(v) => Some((Field::ThetaM, v)),
        Driver::CouplerAngle(v) => Some((Field::ThetaB, v)),
        Driver::SliderPos(_) => None,
    };
    if let Some((field, value)) = angle {
        let range = cfg.angle_range;
        if !range.contains(value) {
            return Err(ValidationError::AngleRange { field, value, range });
        }
    }
    let geo = Geometry::new(lm, lb, e);
    if !geo.can_close() {
        return Err(ValidationError::LoopClosure { lm, lb, e });
    }
    let mut warnings = Vec::new();
    if geo.ratio() < MIN_RATIO {
        let err = ValidationError::Ratio(geo.ratio());
        match cfg.ratio {
            RatioPolicy::Block => return Err(err),
            RatioPolicy::Warn => warnings.push(err),
        }
    }
    let rates = Rates {
        kind: params.rate,
        vel: finite(Field::Omega, params.omega)?.unwrap_or_default(),
        acc: finite(Field::Alpha, params.alpha)?.unwrap_or_default(),
    };
    Ok(Validated { geo, driver, rates, warnings })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(lm: f64, lb: f64, e: f64) -> Params {
        Params {
            lm: Some(lm),
            lb: Some(lb),
            e: Some(e),
            theta_m_deg: Some(0.),
            ..Params::default()
        }
    }

    #[test]
    fn fields() {
        let cfg = ValidCfg::default();
        let p = Params { lm: None, ..params(1., 3., 0.) };
        assert_eq!(validate(&p, &cfg), Err(ValidationError::Missing(Field::Lm)));
        let p = Params { lb: Some(-1.), ..params(1., 3., 0.) };
        assert_eq!(validate(&p, &cfg), Err(ValidationError::NonPositive(Field::Lb)));
        let p = Params { e: Some(f64::NAN), ..params(1., 3., 0.) };
        assert_eq!(validate(&p, &cfg), Err(ValidationError::NotNumeric(Field::E)));
        // Negative eccentricity is fine
        assert!(validate(&params(1., 3., -1.), &cfg).is_ok());
    }

    #[test]
    fn driver_count() {
        let cfg = ValidCfg::default();
        let p = Params { theta_m_deg: None, ..params(1., 3., 0.) };
        assert_eq!(validate(&p, &cfg), Err(ValidationError::DriverCount(0)));
        let p = Params { s: Some(3.), ..params(1., 3., 0.) };
        assert_eq!(validate(&p, &cfg), Err(ValidationError::DriverCount(2)));
        // A zero angle is a driving value
        let v = validate(&params(1., 3., 0.), &cfg).unwrap();
        assert_eq!(v.driver, Driver::CrankAngle(0.));
    }

    #[test]
    fn angle_range() {
        let p = Params { theta_m_deg: None, theta_b_deg: Some(-30.), ..params(1., 3., 0.) };
        let err = validate(&p, &ValidCfg::default()).unwrap_err();
        assert!(matches!(err, ValidationError::AngleRange { field: Field::ThetaB, .. }));
        let cfg = ValidCfg { angle_range: AngleRange::Signed, ..ValidCfg::default() };
        assert_eq!(validate(&p, &cfg).unwrap().driver, Driver::CouplerAngle(-30.));
        let p = Params { theta_m_deg: Some(361.), ..params(1., 3., 0.) };
        assert!(validate(&p, &cfg).is_err());
    }

    #[test]
    fn geometry() {
        let cfg = ValidCfg::default();
        let err = validate(&params(2., 3., 4.), &cfg).unwrap_err();
        assert_eq!(err, ValidationError::LoopClosure { lm: 2., lb: 3., e: 4. });
        assert_eq!(err.severity(), Severity::Hard);
        let err = validate(&params(1., 1.9, 0.), &cfg).unwrap_err();
        assert_eq!(err, ValidationError::Ratio(1.9));
        assert_eq!(err.severity(), Severity::Warning);
        let cfg = ValidCfg { ratio: RatioPolicy::Warn, ..cfg };
        let v = validate(&params(1., 1.9, 0.), &cfg).unwrap();
        assert_eq!(v.warnings, [ValidationError::Ratio(1.9)]);
    }

    #[test]
    fn text_field() {
        assert_eq!(parse_field(Field::Lm, "  "), Ok(None));
        assert_eq!(parse_field(Field::Lm, " 2.5 "), Ok(Some(2.5)));
        assert_eq!(parse_field(Field::S, "-.5"), Ok(Some(-0.5)));
        assert_eq!(parse_field(Field::E, "abc"), Err(ValidationError::NotNumeric(Field::E)));
        assert_eq!(parse_field(Field::E, "inf"), Err(ValidationError::NotNumeric(Field::E)));
    }
}
