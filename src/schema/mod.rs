//! Schema module - Configuration and seeding types for neural worms sessions.

mod config;
mod seed;

pub use config::*;
pub use seed::*;
