use gg_core::frame::FrameBuffer;
use gg_core::traits::TextShaper;

use crate::text::blend_pixel;

/// Police monospace synthétique : chaque glyphe visible est un pavé plein.
///
/// Avance `0.6 × taille`, pavé de `0.5 × taille` de large et `0.7 × taille`
/// de haut posé sur la ligne de base. Sert de repli quand aucune police n'est
/// configurée, et de face déterministe pour les tests.
///
/// # Example
/// ```
/// use gg_core::traits::TextShaper;
/// use gg_source::BlockShaper;
/// assert_eq!(BlockShaper.measure("abc", 10.0), 18.0);
/// ```
#[derive(Clone, Copy, Debug, Default)]
pub struct BlockShaper;

impl BlockShaper {
    /// Horizontal advance of one glyph at `font_size`.
    #[inline]
    #[must_use]
    pub fn advance(font_size: f32) -> f32 {
        font_size * 3.0 / 5.0
    }
}

impl TextShaper for BlockShaper {
    fn measure(&self, text: &str, font_size: f32) -> f32 {
        text.chars().count() as f32 * font_size * 3.0 / 5.0
    }

    fn draw(
        &self,
        text: &str,
        font_size: f32,
        origin: (f32, f32),
        canvas: &mut FrameBuffer,
        ink: [u8; 4],
    ) {
        let advance = Self::advance(font_size);
        let top = (origin.1 - font_size * 7.0 / 10.0).round() as i64;
        let bottom = origin.1.round() as i64;
        for (i, ch) in text.chars().enumerate() {
            if ch.is_whitespace() {
                continue;
            }
            let left = (origin.0 + i as f32 * advance + font_size / 20.0).round() as i64;
            let right = left + (font_size / 2.0).round() as i64;
            for y in top..bottom {
                for x in left..right {
                    blend_pixel(canvas, x, y, ink, 1.0);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn whitespace_draws_nothing() {
        let mut fb = FrameBuffer::filled(50, 50, [255; 4]);
        BlockShaper.draw("  \t", 20.0, (0.0, 40.0), &mut fb, [0, 0, 0, 255]);
        assert!(fb.data.iter().all(|&b| b == 255));
    }

    #[test]
    fn glyph_box_has_expected_extent() {
        let mut fb = FrameBuffer::filled(40, 40, [255; 4]);
        BlockShaper.draw("#", 20.0, (0.0, 30.0), &mut fb, [0, 0, 0, 255]);
        // left = 1, right = 11, top = 16, bottom = 30
        assert_eq!(fb.pixel(1, 16), [0, 0, 0, 255]);
        assert_eq!(fb.pixel(10, 29), [0, 0, 0, 255]);
        assert_eq!(fb.pixel(0, 20), [255; 4]);
        assert_eq!(fb.pixel(11, 20), [255; 4]);
        assert_eq!(fb.pixel(5, 15), [255; 4]);
        assert_eq!(fb.pixel(5, 30), [255; 4]);
    }

    #[test]
    fn drawing_clips_at_canvas_edges() {
        let mut fb = FrameBuffer::filled(8, 8, [255; 4]);
        BlockShaper.draw("WWW", 40.0, (-10.0, 50.0), &mut fb, [0, 0, 0, 255]);
        assert_eq!(fb.data.len(), 8 * 8 * 4);
    }
}
