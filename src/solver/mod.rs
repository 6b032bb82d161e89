//! Time stepping: the stencil pass, the serial driver and the row
//! partitioned driver built on top of it.

pub mod banded;
pub mod driver;
pub mod leapfrog;

pub use banded::*;
pub use driver::*;
pub use leapfrog::*;
