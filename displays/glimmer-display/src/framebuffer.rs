//! RGB565 frame buffer

use core::convert::Infallible;

use embedded_graphics::mono_font::ascii::FONT_4X6;
use embedded_graphics::mono_font::MonoTextStyleBuilder;
use embedded_graphics::pixelcolor::raw::RawU16;
use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics::text::{Baseline, Text};
use glimmer_hal::{Color565, MatrixSurface};

/// Character cell width of the status font, in pixels
pub const GLYPH_WIDTH: u16 = 4;

/// Character cell height of the status font, in pixels
pub const GLYPH_HEIGHT: u16 = 6;

/// Pixel store for a `W` x `H` panel, row-major
pub struct FrameBuffer<const W: usize, const H: usize> {
    pixels: [[Color565; W]; H],
}

impl<const W: usize, const H: usize> FrameBuffer<W, H> {
    /// Create a blank (black) frame buffer
    pub const fn new() -> Self {
        Self {
            pixels: [[Color565::BLACK; W]; H],
        }
    }

    /// All rows, top to bottom
    pub fn rows(&self) -> &[[Color565; W]; H] {
        &self.pixels
    }

    /// Pixels that are not black
    pub fn lit(&self) -> usize {
        self.pixels
            .iter()
            .flatten()
            .filter(|c| **c != Color565::BLACK)
            .count()
    }

    /// Fill every pixel with one colour
    pub fn fill(&mut self, color: Color565) {
        for row in self.pixels.iter_mut() {
            row.fill(color);
        }
    }
}

#[cfg(feature = "defmt")]
impl<const W: usize, const H: usize> defmt::Format for FrameBuffer<W, H> {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "FrameBuffer[{}x{}, {} lit]", W, H, self.lit());
    }
}

impl<const W: usize, const H: usize> Default for FrameBuffer<W, H> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const W: usize, const H: usize> MatrixSurface for FrameBuffer<W, H> {
    fn dimensions(&self) -> (u16, u16) {
        (W as u16, H as u16)
    }

    fn set_pixel(&mut self, x: u16, y: u16, color: Color565) {
        if let Some(px) = self
            .pixels
            .get_mut(y as usize)
            .and_then(|row| row.get_mut(x as usize))
        {
            *px = color;
        }
    }

    fn pixel(&self, x: u16, y: u16) -> Option<Color565> {
        self.pixels.get(y as usize)?.get(x as usize).copied()
    }

    fn clear(&mut self) {
        self.fill(Color565::BLACK);
    }

    fn draw_text(&mut self, row: u8, col: u8, text: &str, color: Color565) {
        let style = MonoTextStyleBuilder::new()
            .font(&FONT_4X6)
            .text_color(to_rgb565(color))
            .background_color(Rgb565::BLACK)
            .build();
        let origin = Point::new(
            i32::from(col) * i32::from(GLYPH_WIDTH),
            i32::from(row) * i32::from(GLYPH_HEIGHT),
        );
        // Drawing into RAM cannot fail
        let _ = Text::with_baseline(text, origin, style, Baseline::Top).draw(self);
    }

    fn text_grid(&self) -> (u8, u8) {
        let cols = (W / GLYPH_WIDTH as usize).min(u8::MAX as usize) as u8;
        let rows = (H / GLYPH_HEIGHT as usize).min(u8::MAX as usize) as u8;
        (cols, rows)
    }
}

impl<const W: usize, const H: usize> OriginDimensions for FrameBuffer<W, H> {
    fn size(&self) -> Size {
        Size::new(W as u32, H as u32)
    }
}

impl<const W: usize, const H: usize> DrawTarget for FrameBuffer<W, H> {
    type Color = Rgb565;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(point, color) in pixels {
            if let (Ok(x), Ok(y)) = (u16::try_from(point.x), u16::try_from(point.y)) {
                self.set_pixel(x, y, from_rgb565(color));
            }
        }
        Ok(())
    }

    fn clear(&mut self, color: Self::Color) -> Result<(), Self::Error> {
        self.fill(from_rgb565(color));
        Ok(())
    }
}

fn to_rgb565(color: Color565) -> Rgb565 {
    Rgb565::from(RawU16::new(color.raw()))
}

fn from_rgb565(color: Rgb565) -> Color565 {
    Color565(color.into_storage())
}
