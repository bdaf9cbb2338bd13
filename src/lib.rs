//! Neural worms - an interactive 3x3 convolutional cellular automaton.
//!
//! An RGB field is convolved with a hand-tuned 3x3 kernel on a torus, blended
//! with a static random terrain, squashed by a selectable activation and fed
//! back as the next frame. Small kernel edits produce organic, worm-like
//! patterns.
//!
//! # Architecture
//!
//! - `schema`: Configuration and seeding types
//! - `compute`: Field, kernels, activations, terrain and the per-frame simulator
//! - `interaction`: Input snapshot to command translation
//! - `render`: Screen frame composition (backdrop plus kernel panel)
//!
//! Windowing, event polling and frame pacing are left to the embedding
//! platform layer.
//!
//! # Example
//!
//! ```rust,no_run
//! use neural_worms::{
//!     compute::Simulator,
//!     interaction::{Controls, InputSnapshot, Key},
//!     render::Renderer,
//!     schema::SessionConfig,
//! };
//!
//! let config = SessionConfig::default();
//! let mut simulator = Simulator::new(&config);
//! let controls = Controls::new(&config);
//! let mut renderer = Renderer::new(&config.screen);
//!
//! // One frame: input, step, render
//! let input = InputSnapshot::default()
//!     .pressing(&[Key::Digit(3)])
//!     .dragging(320, 300);
//! for command in controls.translate(&input) {
//!     simulator.apply(command);
//! }
//! simulator.step();
//! let frame = renderer.compose(simulator.backdrop(), &simulator.kernel(), input.pointer);
//!
//! println!("Frame {}x{}", frame.width(), frame.height());
//! ```

pub mod compute;
pub mod interaction;
pub mod render;
pub mod schema;

// Re-export commonly used types
pub use compute::{Activation, Command, Field, FieldStats, Kernel, Simulator, Surface};
pub use schema::{FieldSeed, SessionConfig};
