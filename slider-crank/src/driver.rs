/// The driving quantity of a position solve.
///
/// Angles are in degrees. Zero is a valid driving value.
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Driver {
    /// Crank angle (degrees)
    CrankAngle(f64),
    /// Coupler angle (degrees)
    CouplerAngle(f64),
    /// Slider position
    SliderPos(f64),
}

impl Driver {
    /// Kind of this driver.
    pub const fn kind(&self) -> DriverKind {
        match self {
            Self::CrankAngle(_) => DriverKind::CrankAngle,
            Self::CouplerAngle(_) => DriverKind::CouplerAngle,
            Self::SliderPos(_) => DriverKind::SliderPos,
        }
    }

    /// The driving value.
    pub const fn value(&self) -> f64 {
        match self {
            Self::CrankAngle(v) | Self::CouplerAngle(v) | Self::SliderPos(v) => *v,
        }
    }
}

/// Kind of the driving quantity.
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DriverKind {
    /// Crank angle
    CrankAngle,
    /// Coupler angle
    CouplerAngle,
    /// Slider position
    SliderPos,
}

impl std::fmt::Display for DriverKind {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Self::CrankAngle => write!(f, "crank angle"),
            Self::CouplerAngle => write!(f, "coupler angle"),
            Self::SliderPos => write!(f, "slider position"),
        }
    }
}

/// Assembly branch of a position solve.
///
/// A crank angle has a single solution. The other two drivers have two:
///
/// + Coupler angle: `B1` is the crank angle `asin(x)` (crank tip towards the
///   slider), `B2` is `π - asin(x)`.
/// + Slider position: `B1` puts the crank tip on the counter-clockwise side
///   of the pivot-slider line, `B2` mirrors it to the other side.
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Hash)]
pub enum Branch {
    /// Branch 1
    #[default]
    B1,
    /// Branch 2
    B2,
}

impl Branch {
    /// Check if the branch is on branch 1.
    pub const fn is_b1(&self) -> bool {
        matches!(self, Self::B1)
    }

    /// Branch from a sign, non-negative values are branch 1.
    pub fn from_sign(v: f64) -> Self {
        if v >= 0. {
            Self::B1
        } else {
            Self::B2
        }
    }

    /// Sign of the branch.
    pub const fn sign(&self) -> f64 {
        match self {
            Self::B1 => 1.,
            Self::B2 => -1.,
        }
    }
}

impl std::fmt::Display for Branch {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Self::B1 => write!(f, "Branch 1"),
            Self::B2 => write!(f, "Branch 2"),
        }
    }
}

/// The variable whose rates are given to the velocity and acceleration
/// stages.
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Hash)]
pub enum RateKind {
    /// Crank angle (rad/s, rad/s²)
    #[default]
    Crank,
    /// Coupler angle (rad/s, rad/s²)
    Coupler,
    /// Slider position (length/s, length/s²)
    Slider,
}

/// A rate of the driven variable, velocity or acceleration.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum RateDriver {
    /// Crank rate
    Crank(f64),
    /// Coupler rate
    Coupler(f64),
    /// Slider rate
    Slider(f64),
}

impl RateDriver {
    /// Create from a kind and a value.
    pub const fn new(kind: RateKind, v: f64) -> Self {
        match kind {
            RateKind::Crank => Self::Crank(v),
            RateKind::Coupler => Self::Coupler(v),
            RateKind::Slider => Self::Slider(v),
        }
    }

    /// Kind of this rate.
    pub const fn kind(&self) -> RateKind {
        match self {
            Self::Crank(_) => RateKind::Crank,
            Self::Coupler(_) => RateKind::Coupler,
            Self::Slider(_) => RateKind::Slider,
        }
    }

    /// The rate value.
    pub const fn value(&self) -> f64 {
        match self {
            Self::Crank(v) | Self::Coupler(v) | Self::Slider(v) => *v,
        }
    }
}

/// Motion rates attached to a driving input.
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[cfg_attr(feature = "serde", serde(default))]
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct Rates {
    /// Driven variable of the rates
    pub kind: RateKind,
    /// Velocity of the driven variable
    pub vel: f64,
    /// Acceleration of the driven variable
    pub acc: f64,
}

impl Rates {
    /// Crank angular velocity and acceleration.
    pub const fn crank(omega: f64, alpha: f64) -> Self {
        Self { kind: RateKind::Crank, vel: omega, acc: alpha }
    }

    /// Velocity input of the velocity stage.
    pub const fn vel_driver(&self) -> RateDriver {
        RateDriver::new(self.kind, self.vel)
    }

    /// Acceleration input of the acceleration stage.
    pub const fn acc_driver(&self) -> RateDriver {
        RateDriver::new(self.kind, self.acc)
    }
}
