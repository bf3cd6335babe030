//! Sampling

use crate::geometry::*;
use crate::pbrt::*;

mod common;
mod piecewise_linear;

// Re-export
pub use common::*;
pub use piecewise_linear::*;
