use chip8_base::{Display, Pixel};

pub const WIDTH: usize = 64;
pub const HEIGHT: usize = 32;

/// Monochrome 64x32 framebuffer, laid out the way the host window expects it.
pub struct Framebuffer {
    pixels: Display,
    dirty: bool,
}

impl Default for Framebuffer {
    fn default() -> Self {
        Framebuffer {
            pixels: [[Pixel::Black; WIDTH]; HEIGHT],
            dirty: true,
        }
    }
}

impl Framebuffer {
    /// Is the pixel at column `x`, row `y` set? Coordinates wrap.
    pub fn get(&self, x: usize, y: usize) -> bool {
        self.pixels[y % HEIGHT][x % WIDTH] == Pixel::White
    }

    pub fn clear(&mut self) {
        self.pixels = [[Pixel::Black; WIDTH]; HEIGHT];
        self.dirty = true;
    }

    /// XORs `rows` onto the screen with the top-left corner at `(x, y)`,
    /// wrapping at the edges. Returns true if any set pixel was cleared.
    pub fn draw_sprite(&mut self, x: usize, y: usize, rows: &[u8]) -> bool {
        let mut collision = false;

        for (yline, row) in rows.iter().enumerate() {
            let py = (y + yline) % HEIGHT;
            for xline in 0..8 {
                if row & (0x80 >> xline) == 0 {
                    continue;
                }
                let px = (x + xline) % WIDTH;
                let pixel = &mut self.pixels[py][px];
                if *pixel == Pixel::White {
                    collision = true;
                    *pixel = Pixel::Black;
                } else {
                    *pixel = Pixel::White;
                }
            }
        }

        self.dirty = true;
        collision
    }

    pub fn lit(&self) -> usize {
        self.pixels
            .iter()
            .flatten()
            .filter(|p| **p == Pixel::White)
            .count()
    }

    /// Copy of the screen if it changed since the last call.
    pub fn take_frame(&mut self) -> Option<Display> {
        if !self.dirty {
            return None;
        }
        self.dirty = false;
        Some(self.pixels)
    }
}
