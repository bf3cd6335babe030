//! Synthetic measured tables shared by unit tests.

use crate::geometry::*;
use crate::reflection::*;
use std::f64::consts::PI as PI_F64;

/// Roughness of the Beckmann table.
pub const BECKMANN_ALPHA: f64 = 0.25;

lazy_static! {
    /// Pure specular Beckmann surface with Smith shadowing.
    pub static ref BECKMANN_TABLE: MerlTable = MerlTable::from_fn("beckmann", beckmann_brdf);

    /// Table tabulated from `reference_abc`.
    pub static ref ABC_TABLE: MerlTable = {
        let brdf = reference_abc();
        MerlTable::from_fn("abc", |wi, wo| above_horizon(wi, wo, |wi, wo| brdf.eval(wo, wi)))
    };

    /// Table tabulated from `reference_sgd`.
    pub static ref SGD_TABLE: MerlTable = {
        let brdf = reference_sgd();
        MerlTable::from_fn("sgd", |wi, wo| above_horizon(wi, wo, |wi, wo| brdf.eval(wo, wi)))
    };

    /// A table that reflects nothing.
    pub static ref BLACK_TABLE: MerlTable = MerlTable::from_fn("black", |_, _| [0.0; 3]);

    /// A table with every sample missing.
    pub static ref MISSING_TABLE: MerlTable = MerlTable::from_fn("missing", |_, _| [-1.0; 3]);
}

/// A glossy plastic-like ABC model.
pub fn reference_abc() -> AbcBrdf {
    AbcBrdf::from_params(
        "abc",
        AbcParams {
            kd: [0.05, 0.08, 0.12],
            a: [20.0, 25.0, 30.0],
            b: 200.0,
            c: 1.2,
            eta: 1.5,
        },
    )
}

/// A glossy SGD model.
pub fn reference_sgd() -> SgdBrdf {
    SgdBrdf::from_params(
        "sgd",
        SgdParams {
            kd: [0.04, 0.06, 0.1],
            ks: [0.5, 0.6, 0.7],
            alpha: 0.05,
            p: 0.6,
            f0: 0.05,
        },
    )
}

/// Beckmann distribution of microfacet normals.
pub fn beckmann_d(cos_h: f64, alpha: f64) -> f64 {
    if cos_h <= 0.0 {
        return 0.0;
    }
    let c2 = cos_h * cos_h;
    let tan2 = (1.0 - c2) / c2;
    (-tan2 / (alpha * alpha)).exp() / (PI_F64 * alpha * alpha * c2 * c2)
}

/// Smith masking for Beckmann using the usual rational fit of `Λ`.
fn beckmann_g1(cos_theta: f64, alpha: f64) -> f64 {
    let tan = (1.0 - cos_theta * cos_theta).max(0.0).sqrt() / cos_theta;
    if tan == 0.0 {
        return 1.0;
    }
    let a = 1.0 / (alpha * tan);
    if a >= 1.6 {
        return 1.0;
    }
    let lambda = (1.0 - 1.259 * a + 0.396 * a * a) / (3.535 * a + 2.181 * a * a);
    1.0 / (1.0 + lambda)
}

fn beckmann_brdf(wi: &Vector3d, wo: &Vector3d) -> [f64; 3] {
    if wi.z <= 0.0 || wo.z <= 0.0 {
        return [-1.0; 3];
    }
    let h = (*wi + *wo).normalize();
    let specular = beckmann_d(h.z, BECKMANN_ALPHA)
        * fr_schlick(0.05, wi.dot(&h))
        * beckmann_g1(wi.z, BECKMANN_ALPHA)
        * beckmann_g1(wo.z, BECKMANN_ALPHA)
        / (4.0 * wi.z * wo.z);
    [0.8 * specular, 0.9 * specular, specular]
}

/// Marks bins with a direction on or below the horizon as missing, the way
/// measured files do.
fn above_horizon<F>(wi: &Vector3d, wo: &Vector3d, f: F) -> [f64; 3]
where
    F: Fn(&Vector3d, &Vector3d) -> [f64; 3],
{
    if wi.z <= 0.0 || wo.z <= 0.0 {
        [-1.0; 3]
    } else {
        f(wi, wo)
    }
}
