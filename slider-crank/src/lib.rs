//! Slider-crank is a kinematic solver for the offset slider-crank
//! (biela-manivela) linkage.
//!
//! ```
//! use slider_crank::*;
//!
//! let geo = Geometry::new(1., 3., 0.);
//! let state = solve(&geo, Driver::CrankAngle(0.), Branch::B1, Rates::crank(1., 0.)).unwrap();
//! assert_eq!(state.pose.s, 4.);
//! ```
#![cfg_attr(doc_cfg, feature(doc_cfg))]
pub use crate::{anim::*, driver::*, error::*, geo::*, solver::*, sweep::*, valid::*};

mod anim;
#[cfg(feature = "csv")]
#[cfg_attr(doc_cfg, doc(cfg(feature = "csv")))]
pub mod csv;
mod driver;
mod error;
mod geo;
#[cfg(feature = "plot")]
#[cfg_attr(doc_cfg, doc(cfg(feature = "plot")))]
pub mod plot;
pub mod solver;
mod sweep;
#[cfg(test)]
mod tests;
mod valid;
