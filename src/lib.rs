//! `psd-fit` library crate.
//!
//! Particle-size distribution analysis: Gates-Gaudin-Schuhmann and
//! Rosin-Rammler models, nonlinear least-squares fitting, model selection by
//! R², and the Rosin-Rammler probability axis.
//!
//! The binary (`psd`) is a thin wrapper around this library so that:
//!
//! - core logic is testable without spawning processes
//! - modules are reusable (e.g., a plotting front-end can drive `scale` directly)

pub mod app;
pub mod cli;
pub mod data;
pub mod domain;
pub mod error;
pub mod fit;
pub mod io;
pub mod math;
pub mod models;
pub mod plot;
pub mod report;
pub mod scale;
