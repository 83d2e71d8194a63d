//! Matrix surface abstraction
//!
//! The surface is the pixel store the panel refresh reads from. Writers
//! (frame assembly, status drawing) only ever go through this trait, so the
//! same receiver logic runs against a real frame buffer or a test double.

/// A pixel in the panel's native RGB565 encoding
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Color565(pub u16);

impl Color565 {
    pub const BLACK: Self = Self(0x0000);
    pub const WHITE: Self = Self(0xFFFF);
    pub const RED: Self = Self(0xF800);
    pub const GREEN: Self = Self(0x07E0);
    pub const BLUE: Self = Self(0x001F);

    /// Pack an 8-bit-per-channel colour (drops the low bits)
    pub const fn from_rgb888(r: u8, g: u8, b: u8) -> Self {
        Self(((r as u16 & 0xF8) << 8) | ((g as u16 & 0xFC) << 3) | (b as u16 >> 3))
    }

    /// Raw RGB565 word
    pub const fn raw(self) -> u16 {
        self.0
    }

    /// Red channel scaled back to 0-255
    pub const fn red8(self) -> u8 {
        let r5 = ((self.0 >> 11) & 0x1F) as u8;
        (r5 << 3) | (r5 >> 2)
    }

    /// Green channel scaled back to 0-255
    pub const fn green8(self) -> u8 {
        let g6 = ((self.0 >> 5) & 0x3F) as u8;
        (g6 << 2) | (g6 >> 4)
    }

    /// Blue channel scaled back to 0-255
    pub const fn blue8(self) -> u8 {
        let b5 = (self.0 & 0x1F) as u8;
        (b5 << 3) | (b5 >> 2)
    }
}

/// Addressable LED matrix surface
///
/// Coordinates are `(x, y)` with the origin in the top-left corner. Linear
/// indices follow `index = y * width + x`.
pub trait MatrixSurface {
    /// Surface size in pixels as `(width, height)`
    fn dimensions(&self) -> (u16, u16);

    /// Set a single pixel
    ///
    /// Out-of-range coordinates are ignored.
    fn set_pixel(&mut self, x: u16, y: u16, color: Color565);

    /// Read back a single pixel, `None` when out of range
    fn pixel(&self, x: u16, y: u16) -> Option<Color565>;

    /// Blank the whole surface
    fn clear(&mut self);

    /// Draw a line of status text
    ///
    /// - `row`: Text row (0-based, in character cells)
    /// - `col`: Text column (0-based, in character cells)
    ///
    /// Text that runs past the right edge is clipped.
    fn draw_text(&mut self, row: u8, col: u8, text: &str, color: Color565);

    /// Text grid size as `(columns, rows)` in character cells
    fn text_grid(&self) -> (u8, u8);

    /// Total number of addressable pixels
    fn pixel_count(&self) -> usize {
        let (w, h) = self.dimensions();
        w as usize * h as usize
    }

    /// Set a pixel by linear index
    ///
    /// Returns `false` (and writes nothing) when the index lies outside the
    /// surface.
    fn set_index(&mut self, index: usize, color: Color565) -> bool {
        let (w, _) = self.dimensions();
        if w == 0 || index >= self.pixel_count() {
            return false;
        }
        let w = w as usize;
        self.set_pixel((index % w) as u16, (index / w) as u16, color);
        true
    }
}
