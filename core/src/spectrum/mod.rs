//! Spectrum

use super::pbrt::*;

mod rgb_spectrum;

// Re-export
pub use rgb_spectrum::*;

/// Spectrum type used throughout the renderer-facing API.
pub type Spectrum = RGBSpectrum;
