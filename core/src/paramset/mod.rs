//! Parameter Sets

use crate::fileutil::*;
use crate::pbrt::*;
use crate::spectrum::*;
use std::collections::HashMap;
use std::fmt;

/// Stores the values of a single named parameter.
#[derive(Clone, Debug)]
pub struct ParamSetItem<T> {
    /// The values.
    pub values: Vec<T>,
}

impl<T> ParamSetItem<T> {
    /// Create new `ParamSetItem<T>`.
    ///
    /// * `values` - The values.
    pub fn new(values: Vec<T>) -> Self {
        Self { values }
    }
}

/// A hashmap of parameter sets stored by name.
pub type ParamSetMap<T> = HashMap<String, ParamSetItem<T>>;

/// Stores named material parameters of different types, as they come from a
/// scene description.
#[derive(Clone, Debug, Default)]
pub struct ParamSet {
    pub spectra: ParamSetMap<Spectrum>,
    pub strings: ParamSetMap<String>,
}

/// Define a macro that can be used to generate a function for adding/replacing
/// parameter set item.
macro_rules! paramset_add {
    ($func: ident, $t: ty, $paramset: ident) => {
        pub fn $func(&mut self, name: &str, values: &[$t]) {
            let n = String::from(name);
            self.$paramset.insert(n, ParamSetItem::new(values.to_vec()));
        }
    };
}

/// Define a macro that can be used to generate a function for finding
/// parameter set item that is stored as a single item.
macro_rules! paramset_find_one {
    ($func: ident, $t: ty, $paramset: ident) => {
        pub fn $func(&self, name: &str, default: $t) -> $t {
            match self.$paramset.get(name) {
                Some(param) if param.values.len() == 1 => param.values[0].clone(),
                _ => default,
            }
        }
    };
}

impl ParamSet {
    /// Returns a new `ParamSet`.
    pub fn new() -> Self {
        Self::default()
    }

    paramset_add!(add_string, String, strings);
    paramset_find_one!(find_one_string, String, strings);

    paramset_add!(add_spectrum, Spectrum, spectra);
    paramset_find_one!(find_one_spectrum, Spectrum, spectra);

    /// Add/replace an RGB spectrum.
    ///
    /// * `name`   - Parameter name.
    /// * `values` - RGB values in a linear slice.
    pub fn add_rgb_spectrum(&mut self, name: &str, values: &[Float]) {
        let n = values.len();
        assert!(n % 3 == 0, "RGB spectrum values % 3 != 0");

        self.spectra.insert(
            String::from(name),
            ParamSetItem::new(
                values
                    .chunks_exact(3)
                    .map(|c| Spectrum::rgb(c[0], c[1], c[2]))
                    .collect(),
            ),
        );
    }

    /// Returns true if a parameter with the given name exists in any map.
    ///
    /// * `name` - Parameter name.
    pub fn has(&self, name: &str) -> bool {
        self.spectra.contains_key(name) || self.strings.contains_key(name)
    }

    /// Find a file name parameter and resolve it relative to the working
    /// directory. Returns `None` if the parameter is missing or empty.
    ///
    /// * `name` - Parameter name.
    /// * `cwd`  - Working directory used for relative paths (usually the scene
    ///            file's directory).
    pub fn find_one_filename(&self, name: &str, cwd: Option<&str>) -> Option<String> {
        let filename = self.find_one_string(name, String::new());
        if filename.is_empty() {
            None
        } else {
            Some(resolve_filename(&filename, cwd))
        }
    }
}

impl fmt::Display for ParamSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<(&str, String)> = Vec::new();
        for (name, p) in self.strings.iter() {
            let values: Vec<String> = p.values.iter().map(|v| format!("\"{v}\"")).collect();
            names.push((name.as_str(), format!("\"string {}\" [ {} ]", name, values.join(" "))));
        }
        for (name, p) in self.spectra.iter() {
            let values: Vec<String> = p.values.iter().map(|v| v.to_string()).collect();
            names.push((name.as_str(), format!("\"rgb {}\" [ {} ]", name, values.join(" "))));
        }

        // Hash map order is unstable; print sorted by name.
        names.sort_by(|a, b| a.0.cmp(b.0));
        for (_, line) in names {
            writeln!(f, "{line}")?;
        }
        Ok(())
    }
}
