//! Compute module - Numerical core of the neural worms automaton.

mod activation;
mod convolution;
mod field;
mod kernel;
mod simulator;
mod terrain;

pub use activation::*;
pub use convolution::*;
pub use field::*;
pub use kernel::*;
pub use simulator::*;
pub use terrain::*;
