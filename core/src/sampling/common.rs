//! Common

use super::*;

/// Sample a direction on a hemisphere using cosine-weighted sampling
/// (Malley's method over a uniformly sampled disk).
///
/// * `u` - The random sample point.
#[inline]
pub fn cosine_sample_hemisphere(u: &Point2f) -> Vector3f {
    let r = u.x.sqrt();
    let phi = TWO_PI * u.y;
    let z = max(0.0, 1.0 - u.x).sqrt();
    spherical_direction(r, z, phi)
}
