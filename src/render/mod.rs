//! Render module - Composes the backdrop and kernel panel into a screen frame.
//!
//! Presenting the frame (window, swap chain, pacing) belongs to the platform
//! layer; this module only fills pixels.

mod frame;

pub use frame::*;
