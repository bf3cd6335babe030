//! Application related stuff

use crate::fitting::FitOptions;
use crate::geometry::*;
use crate::pbrt::Float;
use crate::spectrum::Spectrum;
use clap::{Parser, ValueEnum};

lazy_static! {
    /// The global application options.
    pub static ref OPTIONS: Options = Options::parse();
}

/// Compressed reflectance model used by the surface.
#[derive(ValueEnum, Copy, Clone, Debug, PartialEq, Eq)]
pub enum ModelKind {
    /// Löw et al. smooth-surface model.
    Abc,

    /// Shifted-gamma distribution model.
    Sgd,
}

/// System wide options.
#[derive(Parser, Clone, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Options {
    /// Compressed model to fit.
    #[arg(long, short = 'm', value_enum, default_value_t = ModelKind::Abc)]
    pub model: ModelKind,

    /// Number of samples for the directional albedo estimate. 0 disables it.
    #[arg(
        long,
        short = 'n',
        value_name = "NUM",
        default_value_t = 0,
        help = "Estimate directional albedo with the given number of samples."
    )]
    pub samples: usize,

    /// Point evaluation angles θi, θo, φ in degrees.
    #[arg(
        long,
        value_name = "DEG",
        num_args = 3,
        allow_negative_numbers = true,
        help = "Evaluate the surface at incident/outgoing zenith and relative azimuth (degrees)."
    )]
    pub eval: Vec<Float>,

    /// Print the preview shader.
    #[arg(long, help = "Print the GLSL preview shader.")]
    pub shader: bool,

    /// Preview reflectance.
    #[arg(
        long,
        value_name = "FLOAT",
        num_args = 3,
        help = "Constant RGB reflectance used by the preview shader."
    )]
    pub reflectance: Vec<Float>,

    /// Table strides θh, θd, φd used when fitting.
    #[arg(
        long,
        value_name = "NUM",
        num_args = 3,
        help = "Fit every n-th table bin along θh, θd and φd."
    )]
    pub strides: Vec<usize>,

    /// Fit a sparse subset of the table.
    #[arg(long = "quick", help = "Fit a sparse subset of the table to run more quickly.")]
    pub quick_fit: bool,

    /// Input file paths.
    #[arg(value_name = "FILE", required = true, help = "MERL binary files")]
    pub paths: Vec<String>,
}

impl Options {
    /// Returns the fit options selected on the command line.
    pub fn fit_options(&self) -> FitOptions {
        let mut options = if self.quick_fit {
            FitOptions::coarse()
        } else {
            FitOptions::default()
        };
        if let [theta_h, theta_d, phi_d] = self.strides[..] {
            options.theta_h_stride = theta_h;
            options.theta_d_stride = theta_d;
            options.phi_d_stride = phi_d;
        }
        options
    }

    /// Returns the `(wi, wo)` pair requested for point evaluation.
    pub fn eval_directions(&self) -> Option<(Vector3f, Vector3f)> {
        match self.eval[..] {
            [theta_i, theta_o, phi] => {
                let (theta_i, theta_o, phi) =
                    (theta_i.to_radians(), theta_o.to_radians(), phi.to_radians());
                let wi = spherical_direction(theta_i.sin(), theta_i.cos(), 0.0);
                let wo = spherical_direction(theta_o.sin(), theta_o.cos(), phi);
                Some((wi, wo))
            }
            _ => None,
        }
    }

    /// Returns the preview reflectance override.
    pub fn reflectance(&self) -> Option<Spectrum> {
        match self.reflectance[..] {
            [r, g, b] => Some(Spectrum::rgb(r, g, b)),
            _ => None,
        }
    }
}
