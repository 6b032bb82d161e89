//! Finite difference solver for the 2D scalar wave equation on a walled
//! grid, either over the whole grid or split into row bands that trade
//! ghost rows every step.

pub mod boundary;
pub mod build_info;
pub mod cli;
pub mod config;
pub mod decomposition;
pub mod domain;
pub mod error;
pub mod initial_conditions;
pub mod snapshot;
pub mod solver;
pub mod stencil;
pub mod util;

pub use config::{EndPolicy, Scheme, WaveConfig};
pub use error::{Error, Result};
