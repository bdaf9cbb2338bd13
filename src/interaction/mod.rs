//! Interaction module - Keyboard and pointer handling.
//!
//! The platform layer fills an [`InputSnapshot`] each frame; [`Controls`]
//! turns it into [`Command`](crate::compute::Command)s for the simulator.

mod controls;
mod input;

pub use controls::*;
pub use input::*;
