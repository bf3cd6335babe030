//! Core

extern crate bitflags;
#[macro_use]
extern crate hexf;
#[macro_use]
extern crate lazy_static;
#[macro_use]
extern crate log;

// Re-export.
pub mod app;
pub mod error;
pub mod fileutil;
pub mod fitting;
pub mod geometry;
pub mod material;
pub mod microfacet;
pub mod paramset;
pub mod pbrt;
pub mod reflection;
pub mod rng;
pub mod sampling;
pub mod spectrum;

#[cfg(test)]
mod testing;
