//! Input datasets: the bundled reference analysis and a synthetic generator.

pub mod sample;

pub use sample::*;
