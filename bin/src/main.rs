#[macro_use]
extern crate log;

use materials::*;
use merl_core::app::*;
use merl_core::geometry::*;
use merl_core::material::*;
use merl_core::paramset::*;
use merl_core::pbrt::*;
use merl_core::reflection::*;
use merl_core::rng::*;
use merl_core::spectrum::*;
use std::env;

/// Incident zenith angles (degrees) at which albedo is estimated.
const ALBEDO_ANGLES: [Float; 5] = [0.0, 30.0, 45.0, 60.0, 75.0];

fn main() {
    // Initialize `env_logger`.
    env_logger::init();

    let cwd = env::current_dir()
        .ok()
        .map(|dir| dir.to_string_lossy().to_string());

    for path in OPTIONS.paths.iter() {
        // In case of error report it and continue.
        if let Err(e) = process(path, cwd.as_deref()) {
            error!("{e}");
        }
    }
}

fn process(path: &str, cwd: Option<&str>) -> Result<(), MaterialError> {
    let mut params = ParamSet::new();
    params.add_string("filename", &[path.to_string()]);
    if let Some(reflectance) = OPTIONS.reflectance() {
        params.add_spectrum("reflectance", &[reflectance]);
    }

    let config = MerlMaterialConfig::from_params(&params, cwd)?.with_fit_options(OPTIONS.fit_options());
    let mut material: Box<dyn Material> = match OPTIONS.model {
        ModelKind::Abc => Box::new(AbcMaterial::new(&config)?),
        ModelKind::Sgd => Box::new(SgdMaterial::new(&config)?),
    };
    material.configure();

    println!("{material}");

    if let Some((wi, wo)) = OPTIONS.eval_directions() {
        let query = SurfaceQuery::new(wi, wo);
        let f = material.f(&query, Measure::SolidAngle);
        let pdf = material.pdf(&query, Measure::SolidAngle);
        println!("f = {f}, pdf = {pdf}");
    }

    if OPTIONS.samples > 0 {
        for theta in ALBEDO_ANGLES {
            let albedo = estimate_albedo(material.as_ref(), theta.to_radians(), OPTIONS.samples);
            println!("albedo(θi = {theta}°) = {albedo}");
        }
    }

    if OPTIONS.shader {
        println!("{}", material.shader_code("bsdf", &[]));
    }

    Ok(())
}

/// Monte Carlo estimate of the directional albedo for incident zenith angle
/// `theta`.
fn estimate_albedo(material: &dyn Material, theta: Float, n: usize) -> Spectrum {
    let wi = spherical_direction(theta.sin(), theta.cos(), 0.0);
    let query = SurfaceQuery::new(wi, Vector3f::new(0.0, 0.0, 1.0));
    let mut rng = RNG::new(0);

    let mut sum = Spectrum::default();
    for _ in 0..n {
        let sample = material.sample_f(&query, &rng.uniform_point2());
        if sample.is_valid() {
            sum += sample.weight;
        }
    }
    sum / n as Float
}
