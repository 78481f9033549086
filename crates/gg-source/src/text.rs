use gg_core::config::CanvasConfig;
use gg_core::frame::FrameBuffer;
use gg_core::traits::TextShaper;

/// Fraction de la largeur du canevas que le texte peut occuper.
pub const FIT_RATIO: f32 = 0.9;
/// Taille de police initiale, avant réduction.
pub const START_FONT_SIZE: f32 = 200.0;
/// Plancher de la taille de police.
pub const MIN_FONT_SIZE: f32 = 12.0;
/// Décalage de ligne de base, en fraction de la taille de police.
pub const BASELINE_RATIO: f32 = 0.75;

const WHITE: [u8; 4] = [255, 255, 255, 255];
const BLACK: [u8; 4] = [0, 0, 0, 255];

/// Résultat de l'ajustement : taille retenue et largeur mesurée à cette taille.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TextFit {
    pub font_size: f32,
    pub width: f32,
}

/// Largest font size (starting at 200, floored at 12) whose measured width
/// fits within 90% of `canvas_width`.
///
/// # Example
/// ```
/// use gg_source::{BlockShaper, text::fit_font_size};
/// let fit = fit_font_size("ASCII", 1000, &BlockShaper);
/// assert_eq!(fit.font_size, 200.0);
/// ```
pub fn fit_font_size(text: &str, canvas_width: u32, shaper: &dyn TextShaper) -> TextFit {
    let limit = canvas_width as f32 * FIT_RATIO;
    let mut font_size = START_FONT_SIZE;
    let mut width = shaper.measure(text, font_size);
    if width > limit {
        let scale = limit / width.max(1.0);
        font_size = (START_FONT_SIZE * scale).floor().max(MIN_FONT_SIZE);
        width = shaper.measure(text, font_size);
        log::debug!("Texte réduit à {font_size}px (largeur {width:.1} / {limit:.1})");
    }
    TextFit { font_size, width }
}

/// Rasterise une chaîne sur un canevas de taille fixe : fond blanc, texte noir,
/// centré horizontalement et verticalement.
///
/// # Example
/// ```
/// use gg_source::{BlockShaper, TextRasterizer};
/// let raster = TextRasterizer::default();
/// let frame = raster.rasterize("HI", &BlockShaper);
/// assert_eq!((frame.width, frame.height), (1000, 360));
/// assert_eq!(frame.pixel(0, 0), [255, 255, 255, 255]);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TextRasterizer {
    pub width: u32,
    pub height: u32,
}

impl Default for TextRasterizer {
    fn default() -> Self {
        Self::from(CanvasConfig::default())
    }
}

impl From<CanvasConfig> for TextRasterizer {
    fn from(canvas: CanvasConfig) -> Self {
        Self {
            width: canvas.width,
            height: canvas.height,
        }
    }
}

impl TextRasterizer {
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Lay `text` onto the canvas and return it as a sample grid.
    ///
    /// Blank input is treated as a single space.
    #[must_use]
    pub fn rasterize(&self, text: &str, shaper: &dyn TextShaper) -> FrameBuffer {
        let text = if text.is_empty() { " " } else { text };
        let fit = fit_font_size(text, self.width, shaper);

        let mut canvas = FrameBuffer::filled(self.width, self.height, WHITE);
        let x = ((self.width as f32 - fit.width) / 2.0).floor();
        let y = ((self.height as f32 + fit.font_size * BASELINE_RATIO) / 2.0).floor();
        shaper.draw(text, fit.font_size, (x, y), &mut canvas, BLACK);

        log::debug!(
            "Texte rasterisé : {}×{}, police {}px, origine ({x}, {y})",
            self.width,
            self.height,
            fit.font_size
        );
        canvas
    }
}

/// Blend `ink` over the canvas pixel at (x, y) by `coverage` ∈ [0, 1].
/// Coordinates outside the canvas are ignored.
pub(crate) fn blend_pixel(canvas: &mut FrameBuffer, x: i64, y: i64, ink: [u8; 4], coverage: f32) {
    if x < 0 || y < 0 || x >= i64::from(canvas.width) || y >= i64::from(canvas.height) {
        return;
    }
    let (x, y) = (x as u32, y as u32);
    let a = coverage.clamp(0.0, 1.0);
    let base = canvas.pixel(x, y);
    let mut out = [0u8; 4];
    for i in 0..3 {
        out[i] = (f32::from(ink[i]) * a + f32::from(base[i]) * (1.0 - a)).round() as u8;
    }
    out[3] = base[3].max((f32::from(ink[3]) * a).round() as u8);
    canvas.put_pixel(x, y, out);
}
