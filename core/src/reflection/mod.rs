//! Reflection models

use crate::geometry::*;
use crate::pbrt::*;
use crate::spectrum::*;

mod abc;
mod bxdf_type;
mod common;
mod compressed_brdf;
mod fresnel;
mod measured_bsdf;
mod merl_reader;
mod merl_table;
mod sgd;
mod surface_sample;

// Re-export
pub use abc::*;
pub use bxdf_type::*;
pub use common::*;
pub use compressed_brdf::*;
pub use fresnel::*;
pub use measured_bsdf::*;
pub use merl_reader::*;
pub use merl_table::*;
pub use sgd::*;
pub use surface_sample::*;
