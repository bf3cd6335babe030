//! Errors raised while constructing measured surfaces.
//!
//! Queries never fail. A direction below the horizon or an unsupported lobe
//! request yields a zero result instead.

use std::io;
use thiserror::Error;

/// Failure to load a measured BRDF table.
#[derive(Debug, Error)]
pub enum LoadError {
    /// The dataset file could not be opened or read.
    #[error("could not open MERL file '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: io::Error,
    },

    /// The header dimensions do not describe a 90 x 90 x 180 table.
    #[error("MERL file '{path}' has dimensions {dims:?}; expected {expected} samples")]
    InvalidDimensions {
        path: String,
        dims: [i32; 3],
        expected: usize,
    },

    /// The sample payload ended early.
    #[error("MERL file '{path}' is truncated: {source}")]
    Truncated {
        path: String,
        #[source]
        source: io::Error,
    },
}

/// Failure to fit a compressed reflectance model or build a sampling
/// distribution from a table.
#[derive(Debug, Error)]
pub enum FitError {
    /// The table has no valid samples in the fitting domain.
    #[error("'{name}': no valid samples to fit")]
    NoSamples { name: String },

    /// The solver stopped without converging.
    #[error("'{name}': fit did not converge ({reason})")]
    NotConverged { name: String, reason: String },

    /// The solver produced non-finite or negative parameters.
    #[error("'{name}': fit produced invalid parameters")]
    InvalidParameters { name: String },

    /// The table cannot support a normalizable distribution (e.g. it has no
    /// retro-reflection).
    #[error("'{name}': microfacet distribution is degenerate")]
    DegenerateDistribution { name: String },
}
