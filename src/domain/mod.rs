//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - model identifiers and selection modes (`ModelKind`, `ModelSpec`, `ResponseKind`)
//! - validated input data (`SampleSeries`)
//! - fit outputs (`FitResult`, `FitSelection`) and the saved `FitFile`

pub mod types;

pub use types::*;
