//! Common

use num_traits::Num;
use std::ops::Neg;

/// Use 32-bit precision for floating point numbers.
pub type Float = f32;

/// Infinty (∞)
pub const INFINITY: Float = Float::INFINITY;

/// PI (π)
pub const PI: Float = std::f32::consts::PI;

/// PI/2 (π/2)
pub const PI_OVER_TWO: Float = PI * 0.5;

/// 2*PI (2π)
pub const TWO_PI: Float = PI * 2.0;

/// Returns the absolute value of a number.
///
/// * `n` - The number.
#[inline(always)]
pub fn abs<T>(n: T) -> T
where
    T: Num + Neg<Output = T> + PartialOrd + Copy,
{
    if n < T::zero() {
        -n
    } else {
        n
    }
}

/// Returns the minimum of 2 numbers.
///
/// * `a` - First number.
/// * `b` - Second number.
#[inline(always)]
pub fn min<T>(a: T, b: T) -> T
where
    T: PartialOrd + Copy,
{
    if a < b {
        a
    } else {
        b
    }
}

/// Returns the maximum of 2 numbers.
///
/// * `a` - First number.
/// * `b` - Second number.
#[inline(always)]
pub fn max<T>(a: T, b: T) -> T
where
    T: PartialOrd + Copy,
{
    if a > b {
        a
    } else {
        b
    }
}

/// Clamps a value to the closed interval `[low, high]`.
///
/// * `val`  - The value.
/// * `low`  - Lower bound.
/// * `high` - Upper bound.
#[inline(always)]
pub fn clamp<T>(val: T, low: T, high: T) -> T
where
    T: PartialOrd + Copy,
{
    if val < low {
        low
    } else if val > high {
        high
    } else {
        val
    }
}

/// Emulates the behavior of `upper_bound` but uses a function object to get
/// values at various indices instead of requiring access to an actual array.
/// Returns the index `i` in `[0, size - 2]` such that `pred(i)` is true and
/// `pred(i + 1)` is false.
///
/// * `size` - Size of array (must be at least 2).
/// * `pred` - Function that returns a value at a given index.
pub fn find_interval<Predicate>(size: usize, pred: Predicate) -> usize
where
    Predicate: Fn(usize) -> bool,
{
    debug_assert!(size >= 2);

    let (mut first, mut len) = (0, size);
    while len > 0 {
        let half = len >> 1;
        let middle = first + half;

        // Bisect range based on value of `pred` at `middle`.
        if pred(middle) {
            first = middle + 1;
            len -= half + 1;
        } else {
            len = half;
        }
    }

    clamp(first.saturating_sub(1), 0, size.saturating_sub(2))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn find_interval_bounds() {
        let nodes = [0.0, 0.25, 0.5, 1.0];
        assert_eq!(find_interval(nodes.len(), |i| nodes[i] <= -1.0), 0);
        assert_eq!(find_interval(nodes.len(), |i| nodes[i] <= 0.0), 0);
        assert_eq!(find_interval(nodes.len(), |i| nodes[i] <= 0.3), 1);
        assert_eq!(find_interval(nodes.len(), |i| nodes[i] <= 1.0), 2);
        assert_eq!(find_interval(nodes.len(), |i| nodes[i] <= 2.0), 2);
    }

    proptest! {
        #[test]
        fn find_interval_brackets(v in 0.0..1.0f64) {
            let nodes: Vec<f64> = (0..10).map(|i| (i as f64 / 9.0).powi(2)).collect();
            let i = find_interval(nodes.len(), |k| nodes[k] <= v);
            prop_assert!(nodes[i] <= v && v <= nodes[i + 1]);
        }

        #[test]
        fn clamp_in_range(v in -10.0..10.0f32) {
            let c = clamp(v, -1.0, 1.0);
            prop_assert!((-1.0..=1.0).contains(&c));
        }
    }
}
