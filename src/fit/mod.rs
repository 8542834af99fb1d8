//! Curve fitting orchestration.
//!
//! Responsibilities:
//!
//! - fit a single model with Levenberg–Marquardt (`fitter`)
//! - fit both models and select the better one by R² (`selection`)

pub mod fitter;
pub mod selection;

pub use fitter::*;
pub use selection::*;
