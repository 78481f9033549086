use std::path::Path;

use ab_glyph::{Font, FontVec, GlyphId, PxScale, ScaleFont, point};
use anyhow::{Context, Result};
use gg_core::frame::FrameBuffer;
use gg_core::traits::TextShaper;

use crate::text::blend_pixel;

/// Mise en forme réelle via `ab_glyph` : avances, crénage et tracé des
/// contours avec couverture anti-aliasée.
///
/// # Example
/// ```no_run
/// use gg_core::traits::TextShaper;
/// use gg_source::FontShaper;
/// use std::path::Path;
/// let shaper = FontShaper::from_file(Path::new("assets/fonts/DejaVuSansMono.ttf")).unwrap();
/// let w = shaper.measure("M", 12.0);
/// ```
pub struct FontShaper {
    font: FontVec,
}

impl FontShaper {
    /// Parse a TTF/OTF font from owned bytes.
    ///
    /// # Errors
    /// Returns an error if the data is not a valid font.
    pub fn from_bytes(data: Vec<u8>) -> Result<Self> {
        let font = FontVec::try_from_vec(data).context("Police invalide")?;
        Ok(Self { font })
    }

    /// Load a TTF/OTF font from disk.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or is not a valid font.
    pub fn from_file(path: &Path) -> Result<Self> {
        let data = std::fs::read(path)
            .with_context(|| format!("Impossible de lire la police {}", path.display()))?;
        Self::from_bytes(data).with_context(|| format!("Police invalide : {}", path.display()))
    }

    fn glyph_ids(&self, text: &str) -> impl Iterator<Item = GlyphId> {
        text.chars().map(|ch| self.font.glyph_id(ch))
    }
}

impl TextShaper for FontShaper {
    fn measure(&self, text: &str, font_size: f32) -> f32 {
        let scaled = self.font.as_scaled(PxScale::from(font_size));
        let mut width = 0.0;
        let mut prev: Option<GlyphId> = None;
        for id in self.glyph_ids(text) {
            if let Some(p) = prev {
                width += scaled.kern(p, id);
            }
            width += scaled.h_advance(id);
            prev = Some(id);
        }
        width
    }

    fn draw(
        &self,
        text: &str,
        font_size: f32,
        origin: (f32, f32),
        canvas: &mut FrameBuffer,
        ink: [u8; 4],
    ) {
        let scale = PxScale::from(font_size);
        let scaled = self.font.as_scaled(scale);
        let mut caret = origin.0;
        let mut prev: Option<GlyphId> = None;

        for id in self.glyph_ids(text) {
            if let Some(p) = prev {
                caret += scaled.kern(p, id);
            }
            let glyph = id.with_scale_and_position(scale, point(caret, origin.1));
            caret += scaled.h_advance(id);
            prev = Some(id);

            if let Some(outline) = self.font.outline_glyph(glyph) {
                let bounds = outline.px_bounds();
                let (bx, by) = (bounds.min.x as i64, bounds.min.y as i64);
                outline.draw(|x, y, coverage| {
                    blend_pixel(
                        canvas,
                        bx + i64::from(x),
                        by + i64::from(y),
                        ink,
                        coverage,
                    );
                });
            }
        }
    }
}
