//! Configuration types for neural worms sessions.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::FieldSeed;
use crate::compute::{Activation, Kernel, PRESET_SLOTS};

fn default_display_alpha() -> u8 {
    240
}

/// Top-level session configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Window layout.
    pub screen: ScreenConfig,
    /// Background texture parameters.
    pub terrain: TerrainConfig,
    /// Simulation parameters at startup.
    pub simulation: SimulationConfig,
    /// Input tuning.
    pub controls: ControlsConfig,
    /// Initial field contents.
    #[serde(default)]
    pub seed: FieldSeed,
    /// RNG seed. `None` draws from entropy.
    #[serde(default)]
    pub random_seed: Option<u64>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            screen: ScreenConfig::default(),
            terrain: TerrainConfig::default(),
            simulation: SimulationConfig::default(),
            controls: ControlsConfig::default(),
            seed: FieldSeed::default(),
            random_seed: None,
        }
    }
}

/// Screen layout: the simulated backdrop on the left, the kernel panel on the right.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScreenConfig {
    /// Total screen width in pixels.
    pub width: usize,
    /// Total screen height in pixels.
    pub height: usize,
    /// Fraction of the screen width occupied by the backdrop (0.0-1.0].
    pub backdrop_fraction: f32,
    /// Opacity used when blitting the backdrop onto the screen.
    #[serde(default = "default_display_alpha")]
    pub display_alpha: u8,
}

impl Default for ScreenConfig {
    fn default() -> Self {
        Self {
            width: 800,
            height: 600,
            backdrop_fraction: 0.8,
            display_alpha: default_display_alpha(),
        }
    }
}

impl ScreenConfig {
    /// Backdrop (field) width in pixels.
    #[inline]
    pub fn backdrop_width(&self) -> usize {
        (self.width as f32 * self.backdrop_fraction) as usize
    }

    /// Backdrop (field) height in pixels.
    #[inline]
    pub fn backdrop_height(&self) -> usize {
        self.height
    }

    /// Width of the kernel panel to the right of the backdrop.
    #[inline]
    pub fn panel_width(&self) -> usize {
        self.width.saturating_sub(self.backdrop_width())
    }
}

/// Terrain texture parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TerrainConfig {
    /// Side length of the coarse random grid before upscaling.
    pub resolution: usize,
    /// Copy one random value to every channel (grey texture).
    #[serde(default)]
    pub monochrome: bool,
}

impl Default for TerrainConfig {
    fn default() -> Self {
        Self {
            resolution: 13,
            monochrome: false,
        }
    }
}

/// Initial values of the live simulation parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// Multiplicative terrain blend weight in [0, 1].
    pub terrain_alpha: f32,
    /// Activation applied after convolution.
    pub activation: Activation,
    /// Active kernel at startup.
    pub kernel: Kernel,
    /// Preset slot loaded over `kernel` at startup, if any.
    #[serde(default)]
    pub preset: Option<usize>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            terrain_alpha: 0.1,
            activation: Activation::default(),
            kernel: Kernel::identity(),
            preset: None,
        }
    }
}

/// Per-tick increments applied while keys are held.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ControlsConfig {
    /// Kernel cell change per tick.
    pub kernel_step: f32,
    /// Terrain alpha change per tick.
    pub terrain_step: f32,
    /// Radius of the seed brush ring in pixels.
    pub brush_radius: usize,
}

impl Default for ControlsConfig {
    fn default() -> Self {
        Self {
            kernel_step: 0.01,
            terrain_step: 0.005,
            brush_radius: 3,
        }
    }
}

impl SessionConfig {
    /// Parse a configuration from JSON and validate it.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a configuration file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let json = fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// Validate configuration parameters.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let screen = &self.screen;
        if !(screen.backdrop_fraction > 0.0 && screen.backdrop_fraction <= 1.0) {
            return Err(ConfigError::InvalidBackdropFraction(screen.backdrop_fraction));
        }
        if screen.backdrop_width() == 0 || screen.backdrop_height() == 0 {
            return Err(ConfigError::InvalidDimensions);
        }
        if self.terrain.resolution == 0 {
            return Err(ConfigError::InvalidTerrainResolution);
        }
        let alpha = self.simulation.terrain_alpha;
        if !(0.0..=1.0).contains(&alpha) {
            return Err(ConfigError::InvalidTerrainAlpha(alpha));
        }
        if let Some(index) = self.simulation.preset {
            if index >= PRESET_SLOTS {
                return Err(ConfigError::InvalidPresetIndex(index));
            }
        }
        if self.controls.brush_radius == 0 {
            return Err(ConfigError::InvalidBrushRadius);
        }
        Ok(())
    }
}

/// Configuration loading and validation errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Backdrop dimensions must be non-zero")]
    InvalidDimensions,
    #[error("Backdrop fraction {0} must be in (0, 1]")]
    InvalidBackdropFraction(f32),
    #[error("Terrain resolution must be non-zero")]
    InvalidTerrainResolution,
    #[error("Terrain alpha {0} must be in [0, 1]")]
    InvalidTerrainAlpha(f32),
    #[error("Preset index {0} is outside the available slots")]
    InvalidPresetIndex(usize),
    #[error("Brush radius must be non-zero")]
    InvalidBrushRadius,
    #[error("Failed to read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
}
