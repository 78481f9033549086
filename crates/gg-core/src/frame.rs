use std::fmt;

use crate::color::luminance;
use crate::error::CoreError;
use crate::traits::SampleSource;

/// Grille d'échantillons couleur (ColorSampleGrid).
///
/// Stocke les pixels en RGBA row-major, 4 bytes par pixel, origine en haut à
/// gauche. Produite une fois par requête, jamais modifiée ensuite.
///
/// # Example
/// ```
/// use gg_core::frame::FrameBuffer;
/// let fb = FrameBuffer::new(10, 10);
/// assert_eq!(fb.data.len(), 400);
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FrameBuffer {
    /// Pixels RGBA, row-major, 4 bytes par pixel.
    pub data: Vec<u8>,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl FrameBuffer {
    /// Crée un buffer transparent (tout à zéro) aux dimensions données.
    ///
    /// # Example
    /// ```
    /// use gg_core::frame::FrameBuffer;
    /// let fb = FrameBuffer::new(100, 50);
    /// assert_eq!(fb.width, 100);
    /// assert_eq!(fb.height, 50);
    /// assert_eq!(fb.data.len(), 100 * 50 * 4);
    /// ```
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            data: vec![0u8; width as usize * height as usize * 4],
            width,
            height,
        }
    }

    /// Crée un buffer uniformément rempli d'une couleur RGBA.
    ///
    /// # Example
    /// ```
    /// use gg_core::frame::FrameBuffer;
    /// let fb = FrameBuffer::filled(2, 2, [255, 255, 255, 255]);
    /// assert_eq!(fb.pixel(1, 1), [255, 255, 255, 255]);
    /// ```
    #[must_use]
    pub fn filled(width: u32, height: u32, rgba: [u8; 4]) -> Self {
        let mut data = Vec::with_capacity(width as usize * height as usize * 4);
        for _ in 0..(width as usize * height as usize) {
            data.extend_from_slice(&rgba);
        }
        Self {
            data,
            width,
            height,
        }
    }

    /// Wrap decoded RGBA bytes, checking that the length matches `width × height × 4`.
    ///
    /// # Errors
    /// Returns [`CoreError::InvalidInput`] on a length mismatch.
    ///
    /// # Example
    /// ```
    /// use gg_core::frame::FrameBuffer;
    /// assert!(FrameBuffer::from_rgba(1, 1, vec![0, 0, 0, 255]).is_ok());
    /// assert!(FrameBuffer::from_rgba(2, 1, vec![0, 0, 0, 255]).is_err());
    /// ```
    pub fn from_rgba(width: u32, height: u32, data: Vec<u8>) -> Result<Self, CoreError> {
        let expected = width as usize * height as usize * 4;
        if data.len() != expected {
            return Err(CoreError::InvalidInput(format!(
                "buffer RGBA de {} octets pour {width}×{height} (attendu {expected})",
                data.len()
            )));
        }
        Ok(Self {
            data,
            width,
            height,
        })
    }

    /// Accès au pixel (x, y) → [r, g, b, a].
    ///
    /// Out-of-range coordinates read as transparent black.
    ///
    /// # Example
    /// ```
    /// use gg_core::frame::FrameBuffer;
    /// let fb = FrameBuffer::new(10, 10);
    /// assert_eq!(fb.pixel(0, 0), [0, 0, 0, 0]);
    /// ```
    #[inline(always)]
    #[must_use]
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        if x >= self.width || y >= self.height {
            return [0, 0, 0, 0];
        }
        let idx = (y as usize * self.width as usize + x as usize) * 4;
        [
            self.data[idx],
            self.data[idx + 1],
            self.data[idx + 2],
            self.data[idx + 3],
        ]
    }

    /// Écrit un pixel. Hors limites : ignoré.
    #[inline(always)]
    pub fn put_pixel(&mut self, x: u32, y: u32, rgba: [u8; 4]) {
        if x >= self.width || y >= self.height {
            return;
        }
        let idx = (y as usize * self.width as usize + x as usize) * 4;
        self.data[idx..idx + 4].copy_from_slice(&rgba);
    }

    /// Luminance perceptuelle BT.601, normalisée [0.0, 1.0].
    ///
    /// # Example
    /// ```
    /// use gg_core::frame::FrameBuffer;
    /// let fb = FrameBuffer::filled(1, 1, [255, 255, 255, 255]);
    /// assert!((fb.luminance(0, 0) - 1.0).abs() < 1e-9);
    /// ```
    #[inline(always)]
    #[must_use]
    pub fn luminance(&self, x: u32, y: u32) -> f64 {
        luminance(self.pixel(x, y))
    }

    /// True when the grid has no pixels.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

impl SampleSource for FrameBuffer {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    #[inline(always)]
    fn sample_at(&self, x: u32, y: u32) -> [u8; 4] {
        self.pixel(x, y)
    }
}

/// Grille de sortie ASCII : `height` lignes de exactement `width` caractères.
///
/// # Example
/// ```
/// use gg_core::frame::AsciiGrid;
/// let mut grid = AsciiGrid::new(3, 2);
/// grid.set(0, 0, '@');
/// assert_eq!(grid.get(0, 0), '@');
/// assert_eq!(grid.to_text(), "@  \n   ");
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AsciiGrid {
    /// Flat array of glyphs, row-major.
    pub cells: Vec<char>,
    /// Width in characters (cols).
    pub width: u32,
    /// Height in characters (rows).
    pub height: u32,
}

impl AsciiGrid {
    /// Crée une grille remplie d'espaces.
    ///
    /// # Example
    /// ```
    /// use gg_core::frame::AsciiGrid;
    /// let grid = AsciiGrid::new(80, 24);
    /// assert_eq!(grid.cells.len(), 80 * 24);
    /// ```
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            cells: vec![' '; width as usize * height as usize],
            width,
            height,
        }
    }

    /// Set the glyph at column `x`, row `y`.
    #[inline(always)]
    pub fn set(&mut self, x: u32, y: u32, ch: char) {
        self.cells[y as usize * self.width as usize + x as usize] = ch;
    }

    /// Glyph at column `x`, row `y`.
    #[inline(always)]
    #[must_use]
    pub fn get(&self, x: u32, y: u32) -> char {
        self.cells[y as usize * self.width as usize + x as usize]
    }

    /// One row of glyphs.
    #[must_use]
    pub fn row(&self, y: u32) -> &[char] {
        let start = y as usize * self.width as usize;
        &self.cells[start..start + self.width as usize]
    }

    /// Iterate over rows, top to bottom.
    pub fn rows(&self) -> impl Iterator<Item = &[char]> {
        self.cells.chunks(self.width.max(1) as usize)
    }

    /// Zero rows (or zero columns).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Rows joined with `\n`, no trailing newline. Zero rows → empty string.
    ///
    /// # Example
    /// ```
    /// use gg_core::frame::AsciiGrid;
    /// assert_eq!(AsciiGrid::new(4, 0).to_text(), "");
    /// ```
    #[must_use]
    pub fn to_text(&self) -> String {
        let mut out =
            String::with_capacity(self.cells.len() + self.height.saturating_sub(1) as usize);
        for (i, row) in self.rows().enumerate() {
            if i > 0 {
                out.push('\n');
            }
            out.extend(row.iter());
        }
        out
    }
}

impl fmt::Display for AsciiGrid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_text())
    }
}
