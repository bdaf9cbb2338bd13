//! Seed types for initializing the backdrop.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::compute::{Field, Surface};

/// Initial backdrop contents.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum FieldSeed {
    /// All-black field.
    #[default]
    Blank,
    /// Squared uniform noise in every channel (same as the randomize action).
    Noise,
    /// Explicit pixel values.
    Pixels {
        /// List of (x, y, rgb) entries, values in [0, 1].
        values: Vec<(usize, usize, [f32; 3])>,
    },
    /// Brush rings in random colours, as if painted with the pointer.
    Strokes {
        /// Ring centres in field coordinates.
        points: Vec<(i32, i32)>,
    },
}

impl FieldSeed {
    /// Generate the initial backdrop surface.
    pub fn generate<R: Rng>(
        &self,
        width: usize,
        height: usize,
        brush_radius: usize,
        rng: &mut R,
    ) -> Surface {
        match self {
            FieldSeed::Blank => Surface::new(width, height),
            FieldSeed::Noise => Field::random_squared(width, height, rng).to_surface(),
            FieldSeed::Pixels { values } => {
                let mut field = Field::zeros(width, height);
                for &(x, y, rgb) in values {
                    if x < width && y < height {
                        field.set_pixel(x, y, rgb);
                    }
                }
                field.to_surface()
            }
            FieldSeed::Strokes { points } => {
                let mut surface = Surface::new(width, height);
                for &(x, y) in points {
                    let color = [rng.r#gen::<u8>(), rng.r#gen::<u8>(), rng.r#gen::<u8>()];
                    surface.draw_ring(x, y, brush_radius, color);
                }
                surface
            }
        }
    }
}
