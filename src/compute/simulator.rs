//! Simulator - per-frame driver for the neural worms automaton.
//!
//! Orchestrates convolution, terrain blending and activation for each frame,
//! and applies the user's edits in between frames.

use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::Rng;

use crate::schema::SessionConfig;

use super::{
    Activation, Field, FieldStats, Kernel, KernelStore, Surface, Terrain, activate_field_inplace,
    convolve_field_into,
};

/// Live simulation parameters, mutated by the interaction layer between frames.
#[derive(Debug, Clone)]
pub struct SimulationParams {
    /// Active kernel and preset slots.
    pub kernels: KernelStore,
    /// Terrain blend weight in [0, 1].
    pub terrain_alpha: f32,
    /// Current activation.
    pub activation: Activation,
}

impl Default for SimulationParams {
    fn default() -> Self {
        Self {
            kernels: KernelStore::default(),
            terrain_alpha: 0.1,
            activation: Activation::default(),
        }
    }
}

/// A mutation applied before the next step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Command {
    /// Add `delta` to one kernel cell.
    AdjustCell { row: usize, col: usize, delta: f32 },
    /// Add `delta` to the terrain alpha, clamped to [0, 1].
    AdjustTerrainAlpha(f32),
    SetActivation(Activation),
    /// Move through the activation catalog.
    CycleActivation(i32),
    LoadPreset(usize),
    /// Save the active kernel into a slot.
    SavePreset(usize),
    /// Paint a brush ring centred at field coordinates.
    Paint { x: i32, y: i32 },
    /// Set the field to black now; the next frame does not step.
    Reset,
    /// Replace the field with squared noise now; the next frame does not step.
    RandomizeField,
    RandomizeKernel,
}

/// Neural worms simulator.
///
/// The backdrop surface is the canonical state: every frame it is converted to
/// a field, convolved into a separate buffer, blended, activated, clipped and
/// quantized back.
pub struct Simulator {
    params: SimulationParams,
    terrain: Terrain,
    backdrop: Surface,
    /// Previous frame as floats (read-only during convolution).
    current: Field,
    /// Convolution output, blended and activated in place.
    next: Field,
    rng: StdRng,
    brush_radius: usize,
    /// Set by reset / randomize-field: the next step leaves the field as is.
    skip_step: bool,
    frame: u64,
}

impl Simulator {
    /// Create a simulator from a session configuration.
    pub fn new(config: &SessionConfig) -> Self {
        let width = config.screen.backdrop_width();
        let height = config.screen.backdrop_height();

        let mut rng = match config.random_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        let terrain = Terrain::generate(&config.terrain, width, height, &mut rng);
        let backdrop = config
            .seed
            .generate(width, height, config.controls.brush_radius, &mut rng);

        let mut kernels = KernelStore::new(config.simulation.kernel);
        if let Some(index) = config.simulation.preset {
            kernels.load_preset(index);
        }

        let params = SimulationParams {
            kernels,
            terrain_alpha: config.simulation.terrain_alpha,
            activation: config.simulation.activation,
        };

        log::info!(
            "Simulator {}x{} with activation {}, terrain alpha {}",
            width,
            height,
            params.activation,
            params.terrain_alpha
        );

        Self::with_parts(params, terrain, backdrop, rng, config.controls.brush_radius)
    }

    /// Assemble a simulator from explicit parts.
    pub fn with_parts(
        params: SimulationParams,
        terrain: Terrain,
        backdrop: Surface,
        rng: StdRng,
        brush_radius: usize,
    ) -> Self {
        let width = backdrop.width();
        let height = backdrop.height();
        debug_assert_eq!(terrain.field().width, width);
        debug_assert_eq!(terrain.field().height, height);

        Self {
            params,
            terrain,
            backdrop,
            current: Field::zeros(width, height),
            next: Field::zeros(width, height),
            rng,
            brush_radius,
            skip_step: false,
            frame: 0,
        }
    }

    /// Apply one user mutation.
    ///
    /// Field edits (paint, reset, randomize) change the backdrop immediately,
    /// in command order. Parameter edits take effect on the next step.
    pub fn apply(&mut self, command: Command) {
        match command {
            Command::AdjustCell { row, col, delta } => {
                self.params.kernels.adjust(row, col, delta);
                log::debug!("Kernel: {:?}", self.params.kernels.get_active().rows);
            }
            Command::AdjustTerrainAlpha(delta) => {
                self.params.terrain_alpha = (self.params.terrain_alpha + delta).clamp(0.0, 1.0);
                log::debug!("Terrain alpha: {}", self.params.terrain_alpha);
            }
            Command::SetActivation(activation) => self.set_activation(activation),
            Command::CycleActivation(offset) => {
                self.set_activation(self.params.activation.cycle(offset));
            }
            Command::LoadPreset(index) => {
                self.params.kernels.load_preset(index);
            }
            Command::SavePreset(index) => {
                let active = self.params.kernels.get_active();
                self.params.kernels.save_preset(index, active);
            }
            Command::Paint { x, y } => {
                let color = [self.rng.r#gen(), self.rng.r#gen(), self.rng.r#gen()];
                self.backdrop.draw_ring(x, y, self.brush_radius, color);
            }
            Command::Reset => {
                self.backdrop.clear();
                self.skip_step = true;
                log::info!("Field reset");
            }
            Command::RandomizeField => {
                let field =
                    Field::random_squared(self.backdrop.width(), self.backdrop.height(), &mut self.rng);
                field.write_surface(&mut self.backdrop);
                self.skip_step = true;
                log::info!("Field randomized");
            }
            Command::RandomizeKernel => {
                let kernel = self.params.kernels.randomize(&mut self.rng);
                log::info!("Random kernel: {:?}", kernel.rows);
            }
        }
    }

    fn set_activation(&mut self, activation: Activation) {
        self.params.activation = activation;
        log::info!("Activation: {}", activation);
    }

    /// Advance one frame.
    pub fn step(&mut self) {
        if !std::mem::take(&mut self.skip_step) {
            self.advance();
        }
        self.frame += 1;
    }

    /// Run the simulation for a number of frames without input.
    pub fn run(&mut self, frames: u64) {
        for _ in 0..frames {
            self.step();
        }
    }

    fn advance(&mut self) {
        let kernel = self.params.kernels.get_active();

        // 1. Surface -> normalized field
        self.current.read_surface(&self.backdrop);

        // 2. Convolution into a separate buffer
        convolve_field_into(&self.current, &kernel, &mut self.next);

        // 3. Terrain blend
        self.terrain.blend_into(&mut self.next, self.params.terrain_alpha);

        // 4. Activation
        activate_field_inplace(&mut self.next, self.params.activation);

        // 5. Clip to [0, 1) and quantize back
        self.next.clip_for_display();
        self.next.write_surface(&mut self.backdrop);
    }

    /// Rendered backdrop (the canonical state).
    #[inline]
    pub fn backdrop(&self) -> &Surface {
        &self.backdrop
    }

    /// Normalized view of the current backdrop.
    pub fn field(&self) -> Field {
        Field::from_surface(&self.backdrop)
    }

    #[inline]
    pub fn params(&self) -> &SimulationParams {
        &self.params
    }

    #[inline]
    pub fn kernel(&self) -> Kernel {
        self.params.kernels.get_active()
    }

    /// Number of frames stepped so far.
    #[inline]
    pub fn frame_count(&self) -> u64 {
        self.frame
    }

    /// Statistics of the current backdrop.
    pub fn stats(&self) -> FieldStats {
        FieldStats::from_field(&self.field())
    }
}
