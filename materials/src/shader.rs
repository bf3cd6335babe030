//! Preview Shader

use merl_core::spectrum::*;

/// Generates a Lambertian GLSL stand-in for measured materials in real-time
/// previews.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct LambertianShader {
    /// Constant albedo used when no reflectance shader is bound.
    albedo: Spectrum,
}

impl LambertianShader {
    /// Returns a new `LambertianShader`.
    ///
    /// * `albedo` - Constant albedo.
    pub fn new(albedo: Spectrum) -> Self {
        Self { albedo }
    }

    /// Returns the GLSL source of `<eval_name>` and `<eval_name>_diffuse`.
    ///
    /// * `eval_name` - Name of the generated function.
    /// * `dep_names` - Dependency shader names; the first one evaluates the
    ///                 albedo at `uv`. The constant albedo is inlined when it
    ///                 is missing.
    pub fn generate_code(&self, eval_name: &str, dep_names: &[String]) -> String {
        let albedo = match dep_names.first() {
            Some(dep) if !dep.is_empty() => format!("{dep}(uv)"),
            _ => {
                let [r, g, b] = self.albedo.to_rgb();
                format!("vec3({r:.6}, {g:.6}, {b:.6})")
            }
        };

        format!(
            "vec3 {eval_name}(vec2 uv, vec3 wi, vec3 wo) {{\n\
             \x20   if (cosTheta(wi) < 0.0 || cosTheta(wo) < 0.0)\n\
             \x20       return vec3(0.0);\n\
             \x20   return {albedo} * inv_pi * cosTheta(wo);\n\
             }}\n\
             \n\
             vec3 {eval_name}_diffuse(vec2 uv, vec3 wi, vec3 wo) {{\n\
             \x20   return {eval_name}(uv, wi, wo);\n\
             }}\n"
        )
    }
}
