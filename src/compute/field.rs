//! The continuous RGB field and its renderable 8-bit surface form.
//!
//! A [`Field`] holds one `f32` plane per colour channel, row-major
//! (`y * width + x`). A [`Surface`] is the interleaved RGB `u8` buffer the
//! presentation layer draws. Each frame the previous surface is converted to a
//! field, simulated, and quantized back, so the feedback loop always passes
//! through 256 levels per channel.

use rand::Rng;

/// Number of colour channels.
pub const CHANNELS: usize = 3;

/// Largest value kept by [`Field::clip_for_display`]; the upper bound is open.
pub const MAX_INTENSITY: f32 = 1.0 - f32::EPSILON / 2.0;

/// Interleaved 8-bit RGB pixel buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Surface {
    width: usize,
    height: usize,
    data: Vec<u8>,
}

impl Surface {
    /// Create an all-black surface.
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            data: vec![0; width * height * CHANNELS],
        }
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    /// Raw interleaved RGB bytes, row-major.
    #[inline]
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    #[inline]
    pub fn pixel(&self, x: usize, y: usize) -> [u8; 3] {
        let i = (y * self.width + x) * CHANNELS;
        [self.data[i], self.data[i + 1], self.data[i + 2]]
    }

    #[inline]
    pub fn set_pixel(&mut self, x: usize, y: usize, rgb: [u8; 3]) {
        let i = (y * self.width + x) * CHANNELS;
        self.data[i..i + CHANNELS].copy_from_slice(&rgb);
    }

    /// Set every pixel to black.
    pub fn clear(&mut self) {
        self.data.fill(0);
    }

    /// Fill an axis-aligned rectangle, clipped to the surface.
    pub fn fill_rect(&mut self, x: usize, y: usize, w: usize, h: usize, rgb: [u8; 3]) {
        let x_end = (x + w).min(self.width);
        let y_end = (y + h).min(self.height);
        for py in y.min(y_end)..y_end {
            for px in x.min(x_end)..x_end {
                self.set_pixel(px, py, rgb);
            }
        }
    }

    /// Draw a one-pixel-wide circle outline, clipped to the surface.
    ///
    /// A pixel belongs to the ring when its squared distance `d2` from the
    /// centre satisfies `(radius - 1)^2 < d2 <= radius^2`.
    pub fn draw_ring(&mut self, cx: i32, cy: i32, radius: usize, rgb: [u8; 3]) {
        let r = radius as i32;
        let outer = r * r;
        let inner = (r - 1) * (r - 1);

        for dy in -r..=r {
            for dx in -r..=r {
                let d2 = dx * dx + dy * dy;
                if d2 > outer || d2 <= inner {
                    continue;
                }
                let x = cx + dx;
                let y = cy + dy;
                if x < 0 || y < 0 || x as usize >= self.width || y as usize >= self.height {
                    continue;
                }
                self.set_pixel(x as usize, y as usize, rgb);
            }
        }
    }
}

/// Continuous-valued RGB image, nominally in [0, 1].
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    /// Per-channel planes [channel][y * width + x].
    pub channels: [Vec<f32>; CHANNELS],
    pub width: usize,
    pub height: usize,
}

impl Field {
    /// All-zero field.
    pub fn zeros(width: usize, height: usize) -> Self {
        Self::filled(width, height, 0.0)
    }

    /// Field with every channel of every pixel set to `value`.
    pub fn filled(width: usize, height: usize, value: f32) -> Self {
        let plane = vec![value; width * height];
        Self {
            channels: [plane.clone(), plane.clone(), plane],
            width,
            height,
        }
    }

    /// Independent uniform values, squared to bias toward dark, sparse seeds.
    pub fn random_squared<R: Rng>(width: usize, height: usize, rng: &mut R) -> Self {
        let mut field = Self::zeros(width, height);
        for plane in &mut field.channels {
            for v in plane.iter_mut() {
                let u: f32 = rng.r#gen();
                *v = u * u;
            }
        }
        field
    }

    /// Forward conversion: 8-bit surface to normalized floats (divide by 255).
    pub fn from_surface(surface: &Surface) -> Self {
        let mut field = Self::zeros(surface.width, surface.height);
        field.read_surface(surface);
        field
    }

    /// Forward conversion into an existing field of the same dimensions.
    pub fn read_surface(&mut self, surface: &Surface) {
        debug_assert_eq!(self.width, surface.width);
        debug_assert_eq!(self.height, surface.height);

        for (idx, rgb) in surface.data.chunks_exact(CHANNELS).enumerate() {
            for (c, &v) in rgb.iter().enumerate() {
                self.channels[c][idx] = v as f32 / 255.0;
            }
        }
    }

    /// Reverse conversion: multiply by 255 into a new surface.
    pub fn to_surface(&self) -> Surface {
        let mut surface = Surface::new(self.width, self.height);
        self.write_surface(&mut surface);
        surface
    }

    /// Reverse conversion into an existing surface of the same dimensions.
    ///
    /// Values are rounded and saturated to [0, 255]. NaN becomes 0 and
    /// +Inf becomes 255, so corrupted pixels render as black or white.
    pub fn write_surface(&self, surface: &mut Surface) {
        debug_assert_eq!(self.width, surface.width);
        debug_assert_eq!(self.height, surface.height);

        for (idx, rgb) in surface.data.chunks_exact_mut(CHANNELS).enumerate() {
            for (c, out) in rgb.iter_mut().enumerate() {
                *out = quantize(self.channels[c][idx]);
            }
        }
    }

    /// Clip every value to [0, 1) ahead of the reverse conversion.
    pub fn clip_for_display(&mut self) {
        for plane in &mut self.channels {
            for v in plane.iter_mut() {
                *v = v.clamp(0.0, MAX_INTENSITY);
            }
        }
    }

    /// Total number of pixels.
    #[inline]
    pub fn grid_size(&self) -> usize {
        self.width * self.height
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize, channel: usize) -> f32 {
        self.channels[channel][y * self.width + x]
    }

    #[inline]
    pub fn pixel(&self, x: usize, y: usize) -> [f32; 3] {
        let idx = y * self.width + x;
        [
            self.channels[0][idx],
            self.channels[1][idx],
            self.channels[2][idx],
        ]
    }

    #[inline]
    pub fn set_pixel(&mut self, x: usize, y: usize, rgb: [f32; 3]) {
        let idx = y * self.width + x;
        for (plane, v) in self.channels.iter_mut().zip(rgb) {
            plane[idx] = v;
        }
    }

    /// Copy of this field shifted circularly by (dx, dy) pixels.
    pub fn rolled(&self, dx: isize, dy: isize) -> Self {
        let mut out = Self::zeros(self.width, self.height);
        let w = self.width as isize;
        let h = self.height as isize;
        for (src, dst) in self.channels.iter().zip(out.channels.iter_mut()) {
            for y in 0..self.height {
                let ty = (y as isize + dy).rem_euclid(h) as usize;
                for x in 0..self.width {
                    let tx = (x as isize + dx).rem_euclid(w) as usize;
                    dst[ty * self.width + tx] = src[y * self.width + x];
                }
            }
        }
        out
    }
}

#[inline]
fn quantize(v: f32) -> u8 {
    // Float-to-int `as` casts saturate and map NaN to 0.
    (v * 255.0).round() as u8
}

/// Field statistics for monitoring.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct FieldStats {
    pub mean: f32,
    pub min: f32,
    pub max: f32,
    /// Pixels with any channel above zero.
    pub active_pixels: usize,
    /// Values that are NaN or infinite.
    pub non_finite: usize,
}

impl FieldStats {
    /// Compute statistics from a field. Non-finite values are counted, not aggregated.
    pub fn from_field(field: &Field) -> Self {
        let mut sum = 0.0f64;
        let mut min = f32::INFINITY;
        let mut max = f32::NEG_INFINITY;
        let mut count = 0usize;
        let mut non_finite = 0usize;

        for plane in &field.channels {
            for &v in plane {
                if !v.is_finite() {
                    non_finite += 1;
                    continue;
                }
                sum += v as f64;
                min = min.min(v);
                max = max.max(v);
                count += 1;
            }
        }

        let active_pixels = (0..field.grid_size())
            .filter(|&i| field.channels.iter().any(|c| c[i] > 0.0))
            .count();

        Self {
            mean: if count > 0 { (sum / count as f64) as f32 } else { 0.0 },
            min,
            max,
            active_pixels,
            non_finite,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_surface_roundtrip_exact() {
        let mut surface = Surface::new(4, 3);
        surface.set_pixel(0, 0, [255, 0, 17]);
        surface.set_pixel(3, 2, [1, 128, 254]);

        let field = Field::from_surface(&surface);
        assert!((field.get(0, 0, 0) - 1.0).abs() < 1e-6);
        assert!((field.get(3, 2, 1) - 128.0 / 255.0).abs() < 1e-6);
        assert_eq!(field.to_surface(), surface);
    }

    #[test]
    fn test_reverse_conversion_saturates() {
        let mut field = Field::zeros(4, 1);
        field.set_pixel(0, 0, [-3.0, 7.5, 0.5]);
        field.set_pixel(1, 0, [f32::NAN, f32::INFINITY, f32::NEG_INFINITY]);

        let surface = field.to_surface();
        assert_eq!(surface.pixel(0, 0), [0, 255, 128]);
        assert_eq!(surface.pixel(1, 0), [0, 255, 0]);
    }

    #[test]
    fn test_clip_for_display() {
        let mut field = Field::zeros(2, 1);
        field.set_pixel(0, 0, [-0.5, 1.0, 12.0]);
        field.set_pixel(1, 0, [0.25, 0.0, 0.999]);
        field.clip_for_display();

        let p = field.pixel(0, 0);
        assert_eq!(p[0], 0.0);
        assert!(p[1] < 1.0 && p[2] < 1.0);
        assert_eq!(field.pixel(1, 0), [0.25, 0.0, 0.999]);
        // Just below 1 still renders at full intensity
        assert_eq!(field.to_surface().pixel(0, 0), [0, 255, 255]);
    }

    #[test]
    fn test_random_squared_range() {
        let mut rng = StdRng::seed_from_u64(42);
        let field = Field::random_squared(32, 32, &mut rng);
        let stats = FieldStats::from_field(&field);
        assert!(stats.min >= 0.0 && stats.max < 1.0);
        // Mean of u^2 for uniform u is 1/3
        assert!((stats.mean - 1.0 / 3.0).abs() < 0.05, "mean {}", stats.mean);
    }

    #[test]
    fn test_draw_ring_clips_at_edges() {
        let mut surface = Surface::new(8, 8);
        surface.draw_ring(0, 0, 3, [9, 9, 9]);
        assert_eq!(surface.pixel(3, 0), [9, 9, 9]);
        assert_eq!(surface.pixel(0, 3), [9, 9, 9]);
        assert_eq!(surface.pixel(0, 0), [0, 0, 0]);
        // Nothing wraps to the far side
        assert_eq!(surface.pixel(7, 7), [0, 0, 0]);
    }

    #[test]
    fn test_rolled_wraps() {
        let mut field = Field::zeros(4, 3);
        field.set_pixel(3, 2, [1.0, 0.5, 0.25]);
        let rolled = field.rolled(1, 1);
        assert_eq!(rolled.pixel(0, 0), [1.0, 0.5, 0.25]);
    }

    #[test]
    fn test_stats_counts_non_finite() {
        let mut field = Field::zeros(2, 2);
        field.set_pixel(0, 0, [f32::NAN, 0.5, 0.0]);
        let stats = FieldStats::from_field(&field);
        assert_eq!(stats.non_finite, 1);
        assert_eq!(stats.active_pixels, 1);
        assert_eq!(stats.max, 0.5);
    }

    proptest! {
        #[test]
        fn prop_reverse_conversion_in_byte_range(values in prop::collection::vec(any::<f32>(), 12)) {
            let mut field = Field::zeros(2, 2);
            for (i, v) in values.iter().enumerate() {
                field.channels[i % CHANNELS][i / CHANNELS] = *v;
            }
            let surface = field.to_surface();
            let back = Field::from_surface(&surface);
            for plane in &back.channels {
                for &v in plane {
                    prop_assert!((0.0..=1.0).contains(&v));
                }
            }
        }

        #[test]
        fn prop_roundtrip_within_one_step(values in prop::collection::vec(0.0f32..=1.0, 12)) {
            let mut field = Field::zeros(2, 2);
            for (i, v) in values.iter().enumerate() {
                field.channels[i % CHANNELS][i / CHANNELS] = *v;
            }
            let back = Field::from_surface(&field.to_surface());
            for (a, b) in field.channels.iter().zip(back.channels.iter()) {
                for (x, y) in a.iter().zip(b.iter()) {
                    prop_assert!((x - y).abs() <= 1.0 / 255.0 + 1e-6);
                }
            }
        }
    }
}
