//! 3x3 convolution kernels and the in-session preset catalog.
//!
//! Kernel coefficients are unconstrained in sign and magnitude; nothing is
//! normalized, so a kernel may amplify or attenuate the field.

use std::collections::BTreeMap;

use rand::Rng;
use serde::{Deserialize, Serialize};

/// Number of preset slots, addressed by the digits 0-9.
pub const PRESET_SLOTS: usize = 10;

/// A 3x3 matrix of convolution weights, `rows[row][col]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Kernel {
    pub rows: [[f32; 3]; 3],
}

impl Kernel {
    pub const fn new(rows: [[f32; 3]; 3]) -> Self {
        Self { rows }
    }

    /// All coefficients zero.
    pub const fn zero() -> Self {
        Self::new([[0.0; 3]; 3])
    }

    /// Pure identity stencil (centre 1, all else 0).
    pub const fn identity() -> Self {
        Self::new([[0.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 0.0]])
    }

    /// Every coefficient independently uniform in [-1, 1].
    pub fn random<R: Rng>(rng: &mut R) -> Self {
        let mut kernel = Self::zero();
        for row in &mut kernel.rows {
            for v in row.iter_mut() {
                *v = rng.gen_range(-1.0..=1.0);
            }
        }
        kernel
    }

    /// Get coefficient at (row, col).
    #[inline]
    pub fn get(&self, row: usize, col: usize) -> f32 {
        self.rows[row][col]
    }

    /// Sum of all coefficients (the kernel's gain on a uniform field).
    pub fn sum(&self) -> f32 {
        self.rows.iter().flatten().sum()
    }
}

impl Default for Kernel {
    fn default() -> Self {
        Self::identity()
    }
}

/// Hand-tuned presets loaded into slots 0-9 at startup.
pub const DEFAULT_PRESETS: [Kernel; PRESET_SLOTS] = [
    Kernel::new([
        [-0.795, -0.671, 0.501],
        [-0.993, -0.792, 0.609],
        [0.392, 0.74, -0.987],
    ]),
    Kernel::new([
        [-0.04884933, -0.44665813, 0.61806521],
        [-0.91224085, -0.06480854, 0.28417327],
        [0.37040991, -0.73425871, 0.31814526],
    ]),
    Kernel::new([[0.3, -1.0, 0.51], [-0.78, -1.66, -0.78], [-1.43, 0.38, -0.07]]),
    Kernel::new([
        [0.17075394, 0.21331279, 0.25395169],
        [0.22687523, 0.09328171, -0.36148304],
        [0.20261168, 0.21646832, 0.22501386],
    ]),
    Kernel::new([
        [-0.27924606, 0.13331279, 0.28395169],
        [0.40687523, 0.29328171, 0.16851696],
        [-0.29738832, 0.30646832, 0.13501386],
    ]),
    Kernel::new([
        [0.21075394, 0.17331279, -0.05604831],
        [0.51687523, 0.11328171, 0.14851696],
        [-0.76738832, 0.46646832, 0.20501386],
    ]),
    Kernel::new([
        [0.19075394, 0.17331279, -0.05604831],
        [0.54687523, 0.03328171, 0.14851696],
        [-0.76738832, 0.49646832, 0.18501386],
    ]),
    Kernel::new([
        [-0.45459072, -0.91901521, 0.32544112],
        [-0.69739655, 0.24759039, -0.65519655],
        [-0.42030883, 0.85556822, 0.57564318],
    ]),
    // Shift taps: drift the field diagonally / vertically
    Kernel::new([[1.0, 0.0, 0.0], [0.0, 0.0, 0.0], [0.0, 0.0, 0.0]]),
    Kernel::new([[0.0, 1.0, 0.0], [0.0, 0.0, 0.0], [0.0, 0.0, 0.0]]),
];

/// The active kernel plus the preset slots.
///
/// Presets live only in process memory. Saving stores a copy, so later edits
/// to the active kernel never leak into a saved slot.
#[derive(Debug, Clone)]
pub struct KernelStore {
    active: Kernel,
    presets: BTreeMap<usize, Kernel>,
}

impl KernelStore {
    /// Create a store with the given active kernel and the default presets.
    pub fn new(active: Kernel) -> Self {
        Self {
            active,
            presets: DEFAULT_PRESETS.iter().copied().enumerate().collect(),
        }
    }

    #[inline]
    pub fn get_active(&self) -> Kernel {
        self.active
    }

    pub fn set_active(&mut self, kernel: Kernel) {
        self.active = kernel;
    }

    /// Add `delta` to one cell of the active kernel.
    ///
    /// Out-of-range cells are ignored.
    pub fn adjust(&mut self, row: usize, col: usize, delta: f32) {
        if let Some(cell) = self.active.rows.get_mut(row).and_then(|r| r.get_mut(col)) {
            *cell += delta;
        }
    }

    /// Replace the active kernel with a saved preset.
    ///
    /// Returns the active kernel afterwards; an empty slot leaves it unchanged.
    pub fn load_preset(&mut self, index: usize) -> Kernel {
        match self.presets.get(&index) {
            Some(preset) => {
                self.active = *preset;
                log::info!("Loaded kernel preset {}", index);
            }
            None => log::warn!("Kernel preset {} is empty", index),
        }
        self.active
    }

    /// Store a kernel in a slot, overwriting any previous preset.
    pub fn save_preset(&mut self, index: usize, kernel: Kernel) {
        self.presets.insert(index, kernel);
        log::info!("Saved kernel preset {}", index);
    }

    /// Saved preset at `index`, if any.
    pub fn preset(&self, index: usize) -> Option<&Kernel> {
        self.presets.get(&index)
    }

    /// Replace the active kernel with a random one and return it.
    pub fn randomize<R: Rng>(&mut self, rng: &mut R) -> Kernel {
        self.active = Kernel::random(rng);
        self.active
    }
}

impl Default for KernelStore {
    fn default() -> Self {
        Self::new(Kernel::identity())
    }
}
