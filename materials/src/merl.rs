//! Measured Materials

use crate::shader::*;
use merl_core::error::*;
use merl_core::fitting::*;
use merl_core::geometry::*;
use merl_core::material::*;
use merl_core::paramset::*;
use merl_core::pbrt::*;
use merl_core::reflection::*;
use merl_core::spectrum::*;
use std::fmt;
use thiserror::Error;

/// Default preview reflectance.
const DEFAULT_REFLECTANCE: Float = 0.5;

/// Failure to construct a measured material.
#[derive(Debug, Error)]
pub enum MaterialError {
    /// A required parameter was not supplied.
    #[error("measured material requires parameter '{0}'")]
    MissingParameter(&'static str),

    /// The dataset could not be loaded.
    #[error(transparent)]
    Load(#[from] LoadError),

    /// The dataset could not be compressed.
    #[error(transparent)]
    Fit(#[from] FitError),
}

/// Construction parameters of a measured material.
#[derive(Clone, Debug, PartialEq)]
pub struct MerlMaterialConfig {
    /// Path of the MERL binary file.
    pub filename: String,

    /// Constant reflectance used only by the preview shader.
    pub reflectance: Spectrum,

    /// Fit options.
    pub fit: FitOptions,
}

impl MerlMaterialConfig {
    /// Returns a configuration with default reflectance and fit options.
    ///
    /// * `filename` - Path of the MERL binary file.
    pub fn new(filename: &str) -> Self {
        Self {
            filename: filename.to_string(),
            reflectance: Spectrum::new(DEFAULT_REFLECTANCE),
            fit: FitOptions::default(),
        }
    }

    /// Reads the configuration from a parameter set. `filename` is required
    /// and resolved against `cwd`; the preview reflectance is read from
    /// `reflectance`, else `diffuseReflectance`, else defaults to 0.5.
    ///
    /// * `params` - Parameter set.
    /// * `cwd`    - Directory relative file names are resolved against.
    pub fn from_params(params: &ParamSet, cwd: Option<&str>) -> Result<Self, MaterialError> {
        let filename = params
            .find_one_filename("filename", cwd)
            .ok_or(MaterialError::MissingParameter("filename"))?;

        let name = if params.has("reflectance") {
            "reflectance"
        } else {
            "diffuseReflectance"
        };
        let reflectance = params.find_one_spectrum(name, Spectrum::new(DEFAULT_REFLECTANCE));

        Ok(Self {
            reflectance,
            ..Self::new(&filename)
        })
    }

    /// Replaces the fit options.
    ///
    /// * `fit` - Fit options.
    pub fn with_fit_options(mut self, fit: FitOptions) -> Self {
        self.fit = fit;
        self
    }
}

/// A surface material backed by a MERL measured BRDF compressed into the
/// model `M`.
pub struct MerlMaterial<M: CompressedBrdf> {
    /// The measured surface.
    bsdf: MeasuredBSDF<M>,

    /// Preview reflectance.
    reflectance: Spectrum,
}

/// Measured material compressed with the ABC model.
pub type AbcMaterial = MerlMaterial<AbcBrdf>;

/// Measured material compressed with the SGD model.
pub type SgdMaterial = MerlMaterial<SgdBrdf>;

impl<M: CompressedBrdf> MerlMaterial<M> {
    /// Loads the dataset, fits the model and extracts the sampling
    /// distribution. The table itself is dropped afterwards. The material is
    /// returned unconfigured.
    ///
    /// * `config` - Construction parameters.
    pub fn new(config: &MerlMaterialConfig) -> Result<Self, MaterialError> {
        let table = MerlTable::from_file(&config.filename)?;
        let bsdf = MeasuredBSDF::from_table(&table, &config.fit)?;
        info!("Created {} material for '{}'", M::MODEL, table.name);

        Ok(Self {
            bsdf,
            reflectance: config.reflectance,
        })
    }

    /// Creates a material from a parameter set.
    ///
    /// * `params` - Parameter set.
    /// * `cwd`    - Directory relative file names are resolved against.
    pub fn from_params(params: &ParamSet, cwd: Option<&str>) -> Result<Self, MaterialError> {
        Self::new(&MerlMaterialConfig::from_params(params, cwd)?)
    }

    /// Returns the measured surface.
    pub fn bsdf(&self) -> &MeasuredBSDF<M> {
        &self.bsdf
    }

    /// Returns the preview reflectance.
    pub fn reflectance(&self) -> Spectrum {
        self.reflectance
    }
}

impl<M: CompressedBrdf> Material for MerlMaterial<M> {
    fn configure(&mut self) {
        self.bsdf.configure();
    }

    fn components(&self) -> &[BxDFType] {
        self.bsdf.components()
    }

    fn uses_ray_differentials(&self) -> bool {
        self.bsdf.uses_ray_differentials()
    }

    fn roughness(&self, component: usize) -> Float {
        self.bsdf.roughness(component)
    }

    fn f(&self, query: &SurfaceQuery, measure: Measure) -> Spectrum {
        self.bsdf.f(query, measure)
    }

    fn pdf(&self, query: &SurfaceQuery, measure: Measure) -> Float {
        self.bsdf.pdf(query, measure)
    }

    fn sample_f(&self, query: &SurfaceQuery, u: &Point2f) -> SurfaceSample {
        self.bsdf.sample_f(query, u)
    }

    fn shader_code(&self, eval_name: &str, dep_names: &[String]) -> String {
        LambertianShader::new(self.reflectance).generate_code(eval_name, dep_names)
    }
}

impl<M: CompressedBrdf> fmt::Display for MerlMaterial<M> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        self.bsdf.fmt(f)
    }
}
