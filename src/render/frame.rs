//! Screen frame composition.

use crate::compute::{Kernel, Surface};
use crate::schema::ScreenConfig;

/// Colour of the pointer ring.
pub const CURSOR_COLOR: [u8; 3] = [50, 128, 200];

/// Radius of the pointer ring.
pub const CURSOR_RADIUS: usize = 3;

/// Builds the screen image for one frame.
#[derive(Debug, Clone)]
pub struct Renderer {
    screen: ScreenConfig,
    frame: Surface,
}

impl Renderer {
    pub fn new(screen: &ScreenConfig) -> Self {
        Self {
            screen: screen.clone(),
            frame: Surface::new(screen.width, screen.height),
        }
    }

    /// Compose the frame: cursor ring under a translucent backdrop, kernel panel to the right.
    pub fn compose(&mut self, backdrop: &Surface, kernel: &Kernel, pointer: (i32, i32)) -> &Surface {
        self.frame.clear();
        self.frame
            .draw_ring(pointer.0, pointer.1, CURSOR_RADIUS, CURSOR_COLOR);
        self.blit_backdrop(backdrop);
        self.draw_kernel(kernel);
        &self.frame
    }

    fn blit_backdrop(&mut self, backdrop: &Surface) {
        let alpha = self.screen.display_alpha as u32;
        let width = backdrop.width().min(self.frame.width());
        let height = backdrop.height().min(self.frame.height());

        for y in 0..height {
            for x in 0..width {
                let src = backdrop.pixel(x, y);
                let dst = self.frame.pixel(x, y);
                let mut out = [0u8; 3];
                for c in 0..3 {
                    let v = src[c] as u32 * alpha + dst[c] as u32 * (255 - alpha);
                    out[c] = (v / 255) as u8;
                }
                self.frame.set_pixel(x, y, out);
            }
        }
    }

    fn draw_kernel(&mut self, kernel: &Kernel) {
        let block = self.screen.panel_width() / 3;
        let left = self.screen.backdrop_width();

        for (i, row) in kernel.rows.iter().enumerate() {
            for (j, &k) in row.iter().enumerate() {
                self.frame
                    .fill_rect(left + j * block, i * block, block, block, heat_color(k));
            }
        }
    }
}

/// Kernel coefficient colour: positive weights red, negative weights blue.
pub fn heat_color(k: f32) -> [u8; 3] {
    let channel = |v: f32| (v.clamp(0.0, 1.0) * 255.0) as u8;
    [channel(k), 0, channel(-k)]
}
