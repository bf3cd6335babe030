//! Geometry

use super::pbrt::*;

// Define macros for property based testing.
#[cfg(test)]
macro_rules! prop_vector3 {
    ($name: ident, $t: ty, $xr: expr, $yr: expr, $zr: expr) => {
        prop_compose! {
            fn $name()(x in $xr, y in $yr, z in $zr) -> Vector3<$t> {
                Vector3 { x, y, z }
            }
        }
    };
}

mod common;
mod point2;
mod vector3;

// Re-export
pub use common::*;
pub use point2::*;
pub use vector3::*;
