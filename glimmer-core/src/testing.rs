//! Test double for the matrix surface

use glimmer_hal::{Color565, MatrixSurface};
use heapless::{String, Vec};

/// In-memory surface that also records drawn text
pub struct GridSurface<const W: usize, const H: usize> {
    pub pixels: [[Color565; W]; H],
    pub text: Vec<(u8, u8, String<32>), 16>,
    pub clears: u32,
}

impl<const W: usize, const H: usize> GridSurface<W, H> {
    pub fn new() -> Self {
        Self {
            pixels: [[Color565::BLACK; W]; H],
            text: Vec::new(),
            clears: 0,
        }
    }

    pub fn at(&self, index: usize) -> Color565 {
        self.pixels[index / W][index % W]
    }

    pub fn lit(&self) -> usize {
        self.pixels
            .iter()
            .flatten()
            .filter(|c| **c != Color565::BLACK)
            .count()
    }

    pub fn line(&self, row: u8) -> Option<&str> {
        self.text
            .iter()
            .rev()
            .find(|(r, _, _)| *r == row)
            .map(|(_, _, s)| s.as_str())
    }
}

impl<const W: usize, const H: usize> MatrixSurface for GridSurface<W, H> {
    fn dimensions(&self) -> (u16, u16) {
        (W as u16, H as u16)
    }

    fn set_pixel(&mut self, x: u16, y: u16, color: Color565) {
        if (x as usize) < W && (y as usize) < H {
            self.pixels[y as usize][x as usize] = color;
        }
    }

    fn pixel(&self, x: u16, y: u16) -> Option<Color565> {
        self.pixels.get(y as usize)?.get(x as usize).copied()
    }

    fn clear(&mut self) {
        self.pixels = [[Color565::BLACK; W]; H];
        self.text.clear();
        self.clears += 1;
    }

    fn draw_text(&mut self, row: u8, col: u8, text: &str, _color: Color565) {
        let mut line = String::new();
        let _ = line.push_str(&text[..text.len().min(32)]);
        if self.text.is_full() {
            self.text.remove(0);
        }
        let _ = self.text.push((row, col, line));
    }

    fn text_grid(&self) -> (u8, u8) {
        ((W / 4) as u8, (H / 6) as u8)
    }
}
