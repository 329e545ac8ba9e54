use crate::{DriverKind, RateKind};

/// Result type of the solver.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Error of the solver stages.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Error {
    /// The mechanism cannot attain the driving value with its geometry.
    ///
    /// Includes the crossed assembly, where the coupler points away from the
    /// slider (`cos(θb) < 0`), which no crank angle can reach.
    #[error("unreachable configuration: the {driver} {value} cannot be attained")]
    Unreachable {
        /// Driver of the position solve
        driver: DriverKind,
        /// The driving value
        value: f64,
    },
    /// The velocity or acceleration equations are singular at this pose.
    #[error("singular configuration: {0}")]
    Singular(Singularity),
    /// Invalid animation time step.
    #[error("invalid time step: {0}")]
    TimeStep(f64),
}

/// Singular configurations of the rate stages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Singularity {
    /// The coupler is perpendicular to the slider line, `cos(θb) = 0`.
    ///
    /// Singular when the crank rates are given.
    CouplerNormal,
    /// The crank is perpendicular to the slider line, `cos(θm) = 0`.
    ///
    /// Singular when the coupler rates are given.
    CrankNormal,
    /// The crank and the coupler are collinear, `sin(θm + θb) = 0`.
    ///
    /// Singular when the slider rates are given.
    DeadCenter,
}

impl Singularity {
    /// The singular configuration of a rate driver.
    pub const fn of(kind: RateKind) -> Self {
        match kind {
            RateKind::Crank => Self::CouplerNormal,
            RateKind::Coupler => Self::CrankNormal,
            RateKind::Slider => Self::DeadCenter,
        }
    }
}

impl std::fmt::Display for Singularity {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Self::CouplerNormal => write!(f, "coupler perpendicular to the slider line"),
            Self::CrankNormal => write!(f, "crank perpendicular to the slider line"),
            Self::DeadCenter => write!(f, "crank and coupler are collinear (dead center)"),
        }
    }
}
