//! Common

use super::{abs, Vector3};
use num_traits::{Num, Zero};
use std::ops::Neg;

/// Dot product trait.
pub trait Dot<V> {
    type Output: Num + Zero + Neg<Output = Self::Output> + PartialOrd + Copy;

    /// Returns the dot product.
    ///
    /// * `other` - The other vector.
    fn dot(&self, other: &V) -> Self::Output;

    /// Returns the absolute value of dot product.
    ///
    /// * `other` - The other vector.
    fn abs_dot(&self, other: &V) -> Self::Output {
        abs(self.dot(other))
    }
}

/// Returns the direction for the given spherical coordinates in the local
/// shading frame (z-axis is the surface normal).
///
/// * `sin_theta` - sin(θ).
/// * `cos_theta` - cos(θ).
/// * `phi`       - Azimuth φ.
#[inline]
pub fn spherical_direction<T>(sin_theta: T, cos_theta: T, phi: T) -> Vector3<T>
where
    T: num_traits::Float,
{
    Vector3::new(sin_theta * phi.cos(), sin_theta * phi.sin(), cos_theta)
}

/// Rotates a vector about the z-axis by the given angle.
///
/// * `v`     - The vector.
/// * `angle` - Rotation angle in radians.
#[inline]
pub fn rotate_z<T>(v: &Vector3<T>, angle: T) -> Vector3<T>
where
    T: num_traits::Float,
{
    let (s, c) = angle.sin_cos();
    Vector3::new(v.x * c - v.y * s, v.x * s + v.y * c, v.z)
}

/// Rotates a vector about the y-axis by the given angle.
///
/// * `v`     - The vector.
/// * `angle` - Rotation angle in radians.
#[inline]
pub fn rotate_y<T>(v: &Vector3<T>, angle: T) -> Vector3<T>
where
    T: num_traits::Float,
{
    let (s, c) = angle.sin_cos();
    Vector3::new(v.x * c + v.z * s, v.y, v.z * c - v.x * s)
}
