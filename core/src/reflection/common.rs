//! Common

use super::{max, Dot, Float, Vector3f};

/// Returns the cosine of the angle θ measured from the given direction to the
/// z-axis.
///
/// * `w` - The direction vector.
#[inline]
pub fn cos_theta(w: &Vector3f) -> Float {
    w.z
}

/// Returns the square of the cosine of the angle θ measured from the given
/// direction to the z-axis.
///
/// * `w` - The direction vector.
#[inline]
pub fn cos_2_theta(w: &Vector3f) -> Float {
    w.z * w.z
}

/// Returns the absolute value of the cosine of the angle θ measured from the
/// given direction to the z-axis.
///
/// * `w` - The direction vector.
#[inline]
pub fn abs_cos_theta(w: &Vector3f) -> Float {
    w.z.abs()
}

/// Returns the square of the sine of the angle θ measured from the given
/// direction to the z-axis.
///
/// * `w` - The direction vector.
#[inline]
pub fn sin_2_theta(w: &Vector3f) -> Float {
    max(0.0, 1.0 - cos_2_theta(w))
}

/// Returns the sine of the angle θ measured from the given direction to the
/// z-axis.
///
/// * `w` - The direction vector.
#[inline]
pub fn sin_theta(w: &Vector3f) -> Float {
    sin_2_theta(w).sqrt()
}

/// Mirror-reflects a direction about a normal: `2(w·n)n - w`.
///
/// * `w` - The direction to reflect.
/// * `n` - The normal to reflect about.
#[inline]
pub fn reflect(w: &Vector3f, n: &Vector3f) -> Vector3f {
    -(*w) + 2.0 * w.dot(n) * *n
}

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn reflect_about_normal_keeps_angle(
            x in -1.0..1.0f32, y in -1.0..1.0f32, z in 0.05..1.0f32
        ) {
            let w = Vector3f::new(x, y, z).normalize();
            let n = Vector3f::new(0.0, 0.0, 1.0);
            let r = reflect(&w, &n);
            prop_assert!(approx_eq!(f32, cos_theta(&r), cos_theta(&w), epsilon = 1e-6));
            prop_assert!(approx_eq!(f32, r.x, -w.x, epsilon = 1e-6));
            prop_assert!(cos_theta(&r) > 0.0);
            prop_assert!(approx_eq!(f32, sin_theta(&r), sin_theta(&w), epsilon = 1e-5));
        }
    }
}
