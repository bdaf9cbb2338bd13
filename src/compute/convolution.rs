//! Direct 3x3 convolution with periodic boundary conditions.
//!
//! The kernel never exceeds 3x3, so the stencil is unrolled instead of going
//! through a generic or FFT convolution. For output pixel (x, y):
//!
//! ```text
//! out[x, y] = sum over dy, dx in {-1, 0, 1} of
//!             in[(x + dx) mod W, (y + dy) mod H] * k[dy + 1][dx + 1]
//! ```
//!
//! # Complexity
//!
//! O(W * H * 9) per channel. Rows are processed in parallel; the input plane
//! is only read and the output plane only written.

use rayon::prelude::*;

use super::{Field, Kernel};

/// Map a possibly out-of-range coordinate onto the torus.
#[inline]
pub fn wrap_coord(coord: i32, size: usize) -> usize {
    let s = size as i32;
    ((coord % s) + s) as usize % size
}

/// Convolve every channel of a field with the same kernel into a new field.
pub fn convolve_field(input: &Field, kernel: &Kernel) -> Field {
    let mut output = Field::zeros(input.width, input.height);
    convolve_field_into(input, kernel, &mut output);
    output
}

/// Convolve every channel into a pre-allocated field of the same dimensions.
pub fn convolve_field_into(input: &Field, kernel: &Kernel, output: &mut Field) {
    debug_assert_eq!(input.width, output.width);
    debug_assert_eq!(input.height, output.height);

    for (src, dst) in input.channels.iter().zip(output.channels.iter_mut()) {
        convolve_plane_into(src, kernel, input.width, input.height, dst);
    }
}

/// Convolve a single row-major plane.
pub fn convolve_plane(input: &[f32], kernel: &Kernel, width: usize, height: usize) -> Vec<f32> {
    let mut output = vec![0.0f32; width * height];
    convolve_plane_into(input, kernel, width, height, &mut output);
    output
}

/// Convolve a single plane into a pre-allocated buffer.
pub fn convolve_plane_into(
    input: &[f32],
    kernel: &Kernel,
    width: usize,
    height: usize,
    output: &mut [f32],
) {
    debug_assert_eq!(input.len(), width * height);
    debug_assert_eq!(output.len(), width * height);

    if width == 0 || height == 0 {
        return;
    }

    let [k0, k1, k2] = kernel.rows;

    output
        .par_chunks_mut(width)
        .enumerate()
        .for_each(|(y, out_row)| {
            let up = &input[wrap_coord(y as i32 - 1, height) * width..][..width];
            let mid = &input[y * width..][..width];
            let down = &input[wrap_coord(y as i32 + 1, height) * width..][..width];

            for (x, out) in out_row.iter_mut().enumerate() {
                let xl = wrap_coord(x as i32 - 1, width);
                let xr = wrap_coord(x as i32 + 1, width);

                *out = up[xl] * k0[0]
                    + up[x] * k0[1]
                    + up[xr] * k0[2]
                    + mid[xl] * k1[0]
                    + mid[x] * k1[1]
                    + mid[xr] * k1[2]
                    + down[xl] * k2[0]
                    + down[x] * k2[1]
                    + down[xr] * k2[2];
            }
        });
}

/// Reference implementation used to check the unrolled stencil.
#[cfg(test)]
fn convolve_plane_naive(input: &[f32], kernel: &Kernel, width: usize, height: usize) -> Vec<f32> {
    let mut output = vec![0.0f32; width * height];
    for y in 0..height {
        for x in 0..width {
            let mut sum = 0.0f32;
            for ky in 0..3 {
                for kx in 0..3 {
                    let sx = wrap_coord(x as i32 + kx as i32 - 1, width);
                    let sy = wrap_coord(y as i32 + ky as i32 - 1, height);
                    sum += input[sy * width + sx] * kernel.rows[ky][kx];
                }
            }
            output[y * width + x] = sum;
        }
    }
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn ramp_field(width: usize, height: usize) -> Field {
        let mut field = Field::zeros(width, height);
        for (c, plane) in field.channels.iter_mut().enumerate() {
            for (i, v) in plane.iter_mut().enumerate() {
                *v = ((i * 17 + c * 31) % 100) as f32 / 100.0;
            }
        }
        field
    }

    fn kernel_strategy() -> impl Strategy<Value = Kernel> {
        prop::array::uniform3(prop::array::uniform3(-2.0f32..2.0)).prop_map(Kernel::new)
    }

    #[test]
    fn test_wrap_coord() {
        assert_eq!(wrap_coord(-1, 5), 4);
        assert_eq!(wrap_coord(5, 5), 0);
        assert_eq!(wrap_coord(0, 1), 0);
        assert_eq!(wrap_coord(-1, 1), 0);
    }

    #[test]
    fn test_zero_kernel_gives_zero() {
        let input = ramp_field(9, 7);
        let output = convolve_field(&input, &Kernel::zero());
        for plane in &output.channels {
            assert!(plane.iter().all(|&v| v == 0.0));
        }
    }

    #[test]
    fn test_identity_is_exact() {
        for (w, h) in [(1, 1), (1, 4), (3, 1), (2, 2), (13, 8)] {
            let input = ramp_field(w, h);
            let output = convolve_field(&input, &Kernel::identity());
            assert_eq!(output, input, "identity failed for {}x{}", w, h);
        }
    }

    #[test]
    fn test_impulse_wraps_to_corners() {
        let width = 8;
        let height = 6;
        let mut input = vec![0.0f32; width * height];
        input[0] = 1.0;

        let kernel = Kernel::new([[1.0; 3]; 3]);
        let output = convolve_plane(&input, &kernel, width, height);

        assert_eq!(output[0], 1.0);
        assert_eq!(output[width - 1], 1.0, "top-right should wrap");
        assert_eq!(output[(height - 1) * width], 1.0, "bottom-left should wrap");
        assert_eq!(output[(height - 1) * width + width - 1], 1.0);
        assert_eq!(output[2], 0.0);
    }

    #[test]
    fn test_orientation() {
        // Only the top-left tap set: each output reads its up-left neighbour.
        let width = 5;
        let height = 5;
        let mut input = vec![0.0f32; width * height];
        input[2 * width + 2] = 1.0;

        let mut kernel = Kernel::zero();
        kernel.rows[0][0] = 1.0;
        let output = convolve_plane(&input, &kernel, width, height);

        assert_eq!(output[3 * width + 3], 1.0);
        assert_eq!(output.iter().sum::<f32>(), 1.0);
    }

    #[test]
    fn test_uniform_field_preserved_by_unit_sum_kernel() {
        let kernel = Kernel::new([[0.5, -0.25, 0.25], [0.1, 0.2, 0.3], [-0.3, 0.1, 0.1]]);
        assert!((kernel.sum() - 1.0).abs() < 1e-6);

        let input = Field::filled(11, 9, 0.37);
        let output = convolve_field(&input, &kernel);
        for plane in &output.channels {
            for &v in plane {
                assert!((v - 0.37).abs() < 1e-5, "got {}", v);
            }
        }
    }

    #[test]
    fn test_channels_independent() {
        let mut input = Field::zeros(4, 4);
        input.set_pixel(1, 1, [1.0, 0.0, 0.0]);
        let output = convolve_field(&input, &Kernel::new([[1.0; 3]; 3]));
        assert!(output.channels[1].iter().all(|&v| v == 0.0));
        assert!(output.channels[2].iter().all(|&v| v == 0.0));
        assert_eq!(output.channels[0].iter().sum::<f32>(), 9.0);
    }

    proptest! {
        #[test]
        fn prop_matches_naive(kernel in kernel_strategy(), w in 1usize..12, h in 1usize..12) {
            let input = ramp_field(w, h);
            let fast = convolve_plane(&input.channels[0], &kernel, w, h);
            let slow = convolve_plane_naive(&input.channels[0], &kernel, w, h);
            for (a, b) in fast.iter().zip(slow.iter()) {
                prop_assert!((a - b).abs() < 1e-5);
            }
        }

        #[test]
        fn prop_shift_commutes(kernel in kernel_strategy(), w in 1usize..10, h in 1usize..10, shift in 1isize..4) {
            let input = ramp_field(w, h);
            let shifted_then_conv = convolve_field(&input.rolled(shift, 0), &kernel);
            let conv_then_shifted = convolve_field(&input, &kernel).rolled(shift, 0);
            for (a, b) in shifted_then_conv.channels.iter().zip(conv_then_shifted.channels.iter()) {
                for (x, y) in a.iter().zip(b.iter()) {
                    prop_assert!((x - y).abs() < 1e-5);
                }
            }
        }
    }
}
