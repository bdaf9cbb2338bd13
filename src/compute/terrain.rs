//! Static terrain texture blended into the field every frame.
//!
//! A coarse grid of random colours is quantized to 8 bits, bilinearly
//! upscaled to the field resolution and normalized back to [0, 1]. It is
//! generated once and never changes during a run.

use rand::Rng;

use super::{CHANNELS, Field};
use crate::schema::TerrainConfig;

/// Immutable blending mask at field resolution.
#[derive(Debug, Clone)]
pub struct Terrain {
    field: Field,
}

impl Terrain {
    /// Generate a random terrain for a `width` x `height` field.
    pub fn generate<R: Rng>(
        config: &TerrainConfig,
        width: usize,
        height: usize,
        rng: &mut R,
    ) -> Self {
        let res = config.resolution.max(1);
        let mut coarse: [Vec<u8>; CHANNELS] = Default::default();
        for plane in &mut coarse {
            *plane = Vec::with_capacity(res * res);
        }

        for _ in 0..res * res {
            let mut sample = || (rng.r#gen::<f32>() * 255.0) as u8;
            if config.monochrome {
                let v = sample();
                for plane in &mut coarse {
                    plane.push(v);
                }
            } else {
                for plane in &mut coarse {
                    plane.push(sample());
                }
            }
        }

        let mut field = Field::zeros(width, height);
        for (src, dst) in coarse.iter().zip(field.channels.iter_mut()) {
            upscale_bilinear(src, res, res, dst, width, height);
        }

        Self { field }
    }

    /// Terrain with the same value everywhere.
    pub fn uniform(width: usize, height: usize, value: f32) -> Self {
        Self {
            field: Field::filled(width, height, value),
        }
    }

    /// Normalized texture values.
    #[inline]
    pub fn field(&self) -> &Field {
        &self.field
    }

    /// Blend a convolved field with the terrain in place.
    ///
    /// `v = (1 - alpha) * v + alpha * (v * terrain)`, so alpha 0 passes the
    /// field through and alpha 1 fully modulates it by the texture.
    pub fn blend_into(&self, field: &mut Field, alpha: f32) {
        debug_assert_eq!(field.width, self.field.width);
        debug_assert_eq!(field.height, self.field.height);

        let keep = 1.0 - alpha;
        for (plane, texture) in field.channels.iter_mut().zip(self.field.channels.iter()) {
            for (v, &t) in plane.iter_mut().zip(texture.iter()) {
                *v = keep * *v + alpha * (*v * t);
            }
        }
    }
}

/// Bilinear upscale of an 8-bit plane to a normalized `f32` plane.
///
/// Pixel centres are aligned, so a constant source yields a constant output.
fn upscale_bilinear(
    src: &[u8],
    src_width: usize,
    src_height: usize,
    dst: &mut [f32],
    dst_width: usize,
    dst_height: usize,
) {
    const INV_255: f32 = 1.0 / 255.0;

    let scale_x = src_width as f32 / dst_width as f32;
    let scale_y = src_height as f32 / dst_height as f32;
    let max_x = (src_width - 1) as f32;
    let max_y = (src_height - 1) as f32;

    for y in 0..dst_height {
        let sy = ((y as f32 + 0.5) * scale_y - 0.5).clamp(0.0, max_y);
        let y0 = sy.floor() as usize;
        let y1 = (y0 + 1).min(src_height - 1);
        let fy = sy - y0 as f32;

        for x in 0..dst_width {
            let sx = ((x as f32 + 0.5) * scale_x - 0.5).clamp(0.0, max_x);
            let x0 = sx.floor() as usize;
            let x1 = (x0 + 1).min(src_width - 1);
            let fx = sx - x0 as f32;

            let v00 = src[y0 * src_width + x0] as f32;
            let v10 = src[y0 * src_width + x1] as f32;
            let v01 = src[y1 * src_width + x0] as f32;
            let v11 = src[y1 * src_width + x1] as f32;

            let top = v00 + (v10 - v00) * fx;
            let bottom = v01 + (v11 - v01) * fx;
            dst[y * dst_width + x] = (top + (bottom - top) * fy) * INV_255;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compute::FieldStats;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_terrain_in_unit_range() {
        let mut rng = StdRng::seed_from_u64(5);
        let terrain = Terrain::generate(&TerrainConfig::default(), 64, 48, &mut rng);
        assert_eq!(terrain.field().width, 64);
        assert_eq!(terrain.field().height, 48);

        let stats = FieldStats::from_field(terrain.field());
        assert!(stats.min >= 0.0 && stats.max <= 1.0);
        assert_eq!(stats.non_finite, 0);
    }

    #[test]
    fn test_terrain_is_smooth() {
        let mut rng = StdRng::seed_from_u64(6);
        let terrain = Terrain::generate(&TerrainConfig::default(), 130, 130, &mut rng);
        let plane = &terrain.field().channels[0];
        // Each coarse cell spans 10 pixels, so neighbours differ by at most one tenth of the range
        for y in 0..130 {
            for x in 1..130 {
                let d = (plane[y * 130 + x] - plane[y * 130 + x - 1]).abs();
                assert!(d <= 0.11, "jump {} at ({}, {})", d, x, y);
            }
        }
    }

    #[test]
    fn test_monochrome_channels_match() {
        let mut rng = StdRng::seed_from_u64(7);
        let config = TerrainConfig {
            resolution: 13,
            monochrome: true,
        };
        let terrain = Terrain::generate(&config, 40, 30, &mut rng);
        let f = terrain.field();
        assert_eq!(f.channels[0], f.channels[1]);
        assert_eq!(f.channels[1], f.channels[2]);
    }

    #[test]
    fn test_colour_channels_differ() {
        let mut rng = StdRng::seed_from_u64(8);
        let terrain = Terrain::generate(&TerrainConfig::default(), 40, 30, &mut rng);
        let f = terrain.field();
        assert_ne!(f.channels[0], f.channels[1]);
    }

    #[test]
    fn test_upscale_constant_source() {
        let src = vec![51u8; 4];
        let mut dst = vec![0.0f32; 25];
        upscale_bilinear(&src, 2, 2, &mut dst, 5, 5);
        for &v in &dst {
            assert!((v - 0.2).abs() < 1e-6);
        }
    }

    #[test]
    fn test_single_cell_resolution() {
        let mut rng = StdRng::seed_from_u64(10);
        let config = TerrainConfig {
            resolution: 1,
            monochrome: false,
        };
        let terrain = Terrain::generate(&config, 8, 8, &mut rng);
        let plane = &terrain.field().channels[0];
        assert!(plane.iter().all(|&v| v == plane[0]));
    }

    #[test]
    fn test_blend_alpha_zero_passthrough() {
        let terrain = Terrain::uniform(4, 4, 0.3);
        let mut field = Field::filled(4, 4, 0.8);
        terrain.blend_into(&mut field, 0.0);
        assert_eq!(field, Field::filled(4, 4, 0.8));
    }

    #[test]
    fn test_blend_alpha_one_modulates() {
        let terrain = Terrain::uniform(4, 4, 0.5);
        let mut field = Field::filled(4, 4, 0.8);
        terrain.blend_into(&mut field, 1.0);
        for plane in &field.channels {
            assert!(plane.iter().all(|&v| (v - 0.4).abs() < 1e-6));
        }
    }
}
