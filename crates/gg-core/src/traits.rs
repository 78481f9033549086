use crate::frame::FrameBuffer;

/// Accès minimal en lecture à une grille d'échantillons couleur.
///
/// Implémenté par : `FrameBuffer`. Les tests peuvent fournir des grilles
/// synthétiques sans surface graphique.
///
/// # Example
/// ```
/// use gg_core::traits::SampleSource;
///
/// struct Checker;
/// impl SampleSource for Checker {
///     fn width(&self) -> u32 { 4 }
///     fn height(&self) -> u32 { 4 }
///     fn sample_at(&self, x: u32, y: u32) -> [u8; 4] {
///         if (x + y) % 2 == 0 { [255, 255, 255, 255] } else { [0, 0, 0, 255] }
///     }
/// }
/// assert_eq!(Checker.sample_at(1, 0), [0, 0, 0, 255]);
/// ```
pub trait SampleSource {
    /// Width in samples.
    fn width(&self) -> u32;

    /// Height in samples.
    fn height(&self) -> u32;

    /// Sample at (x, y). Callers guarantee `x < width()` and `y < height()`.
    fn sample_at(&self, x: u32, y: u32) -> [u8; 4];
}

/// Service de mise en forme du texte : mesure et tracé des glyphes.
///
/// Les métriques de police dépendent de la plateforme ; le rasteriseur ne
/// les code jamais en dur.
///
/// # Example
/// ```
/// use gg_core::traits::TextShaper;
/// use gg_core::frame::FrameBuffer;
///
/// struct Fixed;
/// impl TextShaper for Fixed {
///     fn measure(&self, text: &str, font_size: f32) -> f32 {
///         text.chars().count() as f32 * font_size * 0.5
///     }
///     fn draw(&self, _: &str, _: f32, _: (f32, f32), _: &mut FrameBuffer, _: [u8; 4]) {}
/// }
/// assert_eq!(Fixed.measure("ab", 10.0), 10.0);
/// ```
pub trait TextShaper {
    /// Advance width of `text` at `font_size`, in pixels.
    fn measure(&self, text: &str, font_size: f32) -> f32;

    /// Draw `text` with its left edge at `origin.0` and baseline at `origin.1`,
    /// blending `ink` over `canvas` by glyph coverage.
    fn draw(
        &self,
        text: &str,
        font_size: f32,
        origin: (f32, f32),
        canvas: &mut FrameBuffer,
        ink: [u8; 4],
    );
}
