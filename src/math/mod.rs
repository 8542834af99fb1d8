//! Mathematical utilities: the least-squares adapter, conditioning, and fit statistics.

pub mod linalg;
pub mod lm;
pub mod stats;

pub use linalg::*;
pub use lm::*;
pub use stats::*;
