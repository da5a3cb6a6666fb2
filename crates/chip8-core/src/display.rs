//! Monochrome framebuffer with sprite XOR drawing and change tracking.

use std::fmt;

use crate::fault::FrameError;

/// Default display width in pixels.
pub const DISPLAY_WIDTH: usize = 64;
/// Default display height in pixels.
pub const DISPLAY_HEIGHT: usize = 32;
/// Sprite rows are one byte wide.
pub const SPRITE_WIDTH: usize = 8;

/// Row-major boolean pixel grid.
///
/// Only [`clear`](Self::clear), [`set`](Self::set) and
/// [`draw_sprite`](Self::draw_sprite) mutate pixels; each sets the dirty flag,
/// which [`take_snapshot`](Self::take_snapshot) observes and resets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameBuffer {
    width: usize,
    height: usize,
    pixels: Vec<bool>,
    dirty: bool,
}

impl Default for FrameBuffer {
    fn default() -> Self {
        Self::new(DISPLAY_WIDTH, DISPLAY_HEIGHT)
    }
}

impl FrameBuffer {
    /// Creates a blank framebuffer. Zero dimensions are raised to one pixel.
    #[must_use]
    pub fn new(width: usize, height: usize) -> Self {
        let width = width.max(1);
        let height = height.max(1);
        Self {
            width,
            height,
            pixels: vec![false; width * height],
            dirty: false,
        }
    }

    /// Width in pixels.
    #[must_use]
    pub const fn width(&self) -> usize {
        self.width
    }

    /// Height in pixels.
    #[must_use]
    pub const fn height(&self) -> usize {
        self.height
    }

    /// Reads one pixel. Out-of-bounds coordinates read as unlit.
    #[must_use]
    pub fn get(&self, x: usize, y: usize) -> bool {
        self.offset(x, y).is_some_and(|offset| self.pixels[offset])
    }

    /// Writes one pixel. Out-of-bounds coordinates are ignored.
    pub fn set(&mut self, x: usize, y: usize, lit: bool) {
        if let Some(offset) = self.offset(x, y) {
            self.pixels[offset] = lit;
            self.dirty = true;
        }
    }

    /// Turns every pixel off.
    pub fn clear(&mut self) {
        self.pixels.fill(false);
        self.dirty = true;
    }

    /// XORs a sprite onto the display and reports whether any lit pixel was
    /// turned off.
    ///
    /// The origin wraps (`x mod width`, `y mod height`); the sprite body is
    /// clipped at the right and bottom edges rather than wrapped.
    pub fn draw_sprite(&mut self, x: u8, y: u8, rows: &[u8]) -> bool {
        let origin_x = usize::from(x) % self.width;
        let origin_y = usize::from(y) % self.height;
        let mut collision = false;

        for (row_offset, row) in rows.iter().enumerate() {
            let py = origin_y + row_offset;
            if py >= self.height {
                break;
            }
            for bit in 0..SPRITE_WIDTH {
                let px = origin_x + bit;
                if px >= self.width {
                    break;
                }
                if row & (0x80 >> bit) == 0 {
                    continue;
                }
                let offset = py * self.width + px;
                collision |= self.pixels[offset];
                self.pixels[offset] = !self.pixels[offset];
                self.dirty = true;
            }
        }

        collision
    }

    /// Returns `true` when pixels changed since the last snapshot was taken.
    #[must_use]
    pub const fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Copies the pixels out if they changed since the last call, resetting
    /// the dirty flag.
    pub fn take_snapshot(&mut self) -> Option<FrameSnapshot> {
        if !self.dirty {
            return None;
        }
        self.dirty = false;
        Some(self.snapshot())
    }

    /// Copies the pixels out without touching the dirty flag.
    #[must_use]
    pub fn snapshot(&self) -> FrameSnapshot {
        FrameSnapshot {
            width: self.width,
            height: self.height,
            pixels: self.pixels.clone(),
        }
    }

    const fn offset(&self, x: usize, y: usize) -> Option<usize> {
        if x < self.width && y < self.height {
            Some(y * self.width + x)
        } else {
            None
        }
    }
}

/// Immutable copy of the framebuffer handed to the display consumer.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[cfg_attr(feature = "serde", serde(try_from = "RawFrame"))]
pub struct FrameSnapshot {
    width: usize,
    height: usize,
    pixels: Vec<bool>,
}

#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
struct RawFrame {
    width: usize,
    height: usize,
    pixels: Vec<bool>,
}

#[cfg(feature = "serde")]
impl TryFrom<RawFrame> for FrameSnapshot {
    type Error = FrameError;

    fn try_from(raw: RawFrame) -> Result<Self, Self::Error> {
        Self::from_parts(raw.width, raw.height, raw.pixels)
    }
}

impl FrameSnapshot {
    /// Builds a snapshot from row-major pixels.
    ///
    /// # Errors
    ///
    /// Returns [`FrameError`] when either dimension is zero or `pixels` does
    /// not hold exactly `width * height` entries.
    pub fn from_parts(width: usize, height: usize, pixels: Vec<bool>) -> Result<Self, FrameError> {
        let fits = width > 0 && height > 0 && width.checked_mul(height) == Some(pixels.len());
        if !fits {
            return Err(FrameError {
                width,
                height,
                pixels: pixels.len(),
            });
        }
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    /// Width in pixels.
    #[must_use]
    pub const fn width(&self) -> usize {
        self.width
    }

    /// Height in pixels.
    #[must_use]
    pub const fn height(&self) -> usize {
        self.height
    }

    /// Reads one pixel. Out-of-bounds coordinates read as unlit.
    #[must_use]
    pub fn get(&self, x: usize, y: usize) -> bool {
        x < self.width && y < self.height && self.pixels[y * self.width + x]
    }

    /// Row-major pixel slice.
    #[must_use]
    pub fn pixels(&self) -> &[bool] {
        &self.pixels
    }

    /// Number of lit pixels.
    #[must_use]
    pub fn lit_count(&self) -> usize {
        self.pixels.iter().filter(|lit| **lit).count()
    }
}

impl fmt::Display for FrameSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.pixels.chunks(self.width) {
            let line: String = row.iter().map(|&lit| if lit { '#' } else { '.' }).collect();
            writeln!(f, "{line}")?;
        }
        Ok(())
    }
}
