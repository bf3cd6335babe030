//! Materials

#[macro_use]
extern crate log;

#[cfg(test)]
#[macro_use]
extern crate lazy_static;

mod merl;
mod shader;

// Re-export
pub use merl::*;
pub use shader::*;
