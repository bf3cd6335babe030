//! Fresnel

use super::*;
use std::mem::swap;

/// Returns the Fresnel reflection at the boundary between two dielectric
/// media for unpolarized light.
///
/// * `cos_theta_i` - cos(θi) for angle between incident direction and geometric
///                   surface normal on the same side as incident direction `wi`.
/// * `eta_i`       - Index of refraction for medium that incident ray is in.
/// * `eta_t`       - Index of refraction for medium that incident ray is entering.
pub fn fr_dielectric<T>(cos_theta_i: T, eta_i: T, eta_t: T) -> T
where
    T: num_traits::Float,
{
    let one = T::one();
    let mut cos_theta_i = clamp(cos_theta_i, -one, one);
    let mut eta_i = eta_i;
    let mut eta_t = eta_t;

    // Potentially swap indices of refraction.
    let entering = cos_theta_i > T::zero();
    if !entering {
        swap(&mut eta_i, &mut eta_t);
        cos_theta_i = cos_theta_i.abs();
    }

    // Compute _cosThetaT_ using Snell's law.
    let sin_theta_i = max(T::zero(), one - cos_theta_i * cos_theta_i).sqrt();
    let sin_theta_t = eta_i / eta_t * sin_theta_i;

    // Handle total internal reflection.
    if sin_theta_t >= one {
        one
    } else {
        let cos_theta_t = max(T::zero(), one - sin_theta_t * sin_theta_t).sqrt();
        let r_parl = ((eta_t * cos_theta_i) - (eta_i * cos_theta_t))
            / ((eta_t * cos_theta_i) + (eta_i * cos_theta_t));
        let r_perp = ((eta_i * cos_theta_i) - (eta_t * cos_theta_t))
            / ((eta_i * cos_theta_i) + (eta_t * cos_theta_t));
        (r_parl * r_parl + r_perp * r_perp) / (one + one)
    }
}

/// Returns Schlick's approximation of the Fresnel reflectance.
///
/// * `r0`        - Reflectance at normal incidence.
/// * `cos_theta` - Cosine of the angle to the (micro) surface normal.
#[inline]
pub fn fr_schlick<T>(r0: T, cos_theta: T) -> T
where
    T: num_traits::Float,
{
    let one = T::one();
    let m = clamp(one - cos_theta, T::zero(), one);
    let m2 = m * m;
    r0 + (one - r0) * m2 * m2 * m
}

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::*;
    use proptest::prelude::*;

    #[test]
    fn dielectric_normal_incidence() {
        // ((η - 1) / (η + 1))² for η = 1.5.
        let f = fr_dielectric(1.0_f64, 1.0, 1.5);
        assert!(approx_eq!(f64, f, 0.04, epsilon = 1e-12));
        assert!(approx_eq!(f64, fr_dielectric(0.0_f64, 1.0, 1.5), 1.0, epsilon = 1e-9));
    }

    #[test]
    fn dielectric_total_internal_reflection() {
        // Leaving glass at a grazing angle.
        assert_eq!(fr_dielectric(-0.1_f32, 1.0, 1.5), 1.0);
    }

    #[test]
    fn schlick_end_points() {
        assert_eq!(fr_schlick(0.04_f64, 1.0), 0.04);
        assert!(approx_eq!(f64, fr_schlick(0.04_f64, 0.0), 1.0, epsilon = 1e-12));
    }

    proptest! {
        #[test]
        fn fresnel_in_unit_interval(c in 0.0..1.0f64, eta in 1.01..3.0f64) {
            let f = fr_dielectric(c, 1.0, eta);
            prop_assert!((0.0..=1.0).contains(&f));
            let s = fr_schlick(0.04, c);
            prop_assert!((0.0..=1.0).contains(&s));
        }
    }
}
