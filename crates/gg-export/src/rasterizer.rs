use std::collections::HashMap;
use std::path::Path;

use ab_glyph::{Font, FontVec, PxScale, ScaleFont, point};
use anyhow::{Context, Result};
use gg_core::color::{Theme, Tint};
use gg_core::frame::{AsciiGrid, FrameBuffer};
use rayon::prelude::*;

/// Couleurs de l'aperçu : un tint unique sur un fond uni.
///
/// # Example
/// ```
/// use gg_core::color::{Theme, Tint};
/// use gg_export::Palette;
/// let p = Palette::new(Tint::Lime, Theme::Dark);
/// assert_eq!(p.fg, Tint::Lime.rgb());
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Palette {
    pub fg: (u8, u8, u8),
    pub bg: (u8, u8, u8),
}

impl Palette {
    #[must_use]
    pub fn new(tint: Tint, theme: Theme) -> Self {
        Self {
            fg: tint.rgb(),
            bg: theme.background(),
        }
    }

    /// Mix fg over bg by glyph coverage.
    #[inline(always)]
    #[must_use]
    pub fn shade(&self, alpha: u8) -> [u8; 4] {
        let a = f32::from(alpha) / 255.0;
        let mix = |f: u8, b: u8| (f32::from(f) * a + f32::from(b) * (1.0 - a)).round() as u8;
        [
            mix(self.fg.0, self.bg.0),
            mix(self.fg.1, self.bg.1),
            mix(self.fg.2, self.bg.2),
            255,
        ]
    }
}

/// Convertit une AsciiGrid en pixels RGBA pour l'aperçu PNG.
/// Cache atlas de couverture par caractère, rempli à la construction.
pub struct Rasterizer {
    font: FontVec,
    scale: PxScale,
    char_width: u32,
    char_height: u32,
    /// Maps a char to its 1D alpha buffer (size = char_width * char_height)
    glyph_cache: HashMap<char, Vec<u8>>,
    /// Fallback for chars missing from the font.
    empty_glyph: Vec<u8>,
}

impl Rasterizer {
    /// Mesure la cellule (avance de 'M' × hauteur de ligne) et pré-calcule
    /// les glyphes ASCII imprimables, les blocs et le Latin-1.
    ///
    /// # Errors
    /// Retourne une erreur si la police fournie est invalide.
    pub fn new(font_data: Vec<u8>, scale_px: f32) -> Result<Self> {
        let font = FontVec::try_from_vec(font_data).context("Police invalide")?;
        let scale = PxScale::from(scale_px);
        let scaled = font.as_scaled(scale);

        let height = (scaled.height() + scaled.line_gap()).ceil() as u32;
        let width = scaled.h_advance(font.glyph_id('M')).ceil() as u32;

        let char_width = width.max(1);
        let char_height = height.max(1);

        let mut rasterizer = Self {
            font,
            scale,
            char_width,
            char_height,
            glyph_cache: HashMap::new(),
            empty_glyph: vec![0u8; (char_width * char_height) as usize],
        };

        rasterizer.cache_chars((32..=126).filter_map(char::from_u32));
        rasterizer.cache_chars((0x00A0..=0x00FF).filter_map(char::from_u32));
        rasterizer.cache_chars((0x2580..=0x259F).filter_map(char::from_u32));

        Ok(rasterizer)
    }

    /// Add any chars not yet in the atlas (e.g. `€`, `•` from the symbols ramp).
    pub fn cache_chars(&mut self, chars: impl IntoIterator<Item = char>) {
        let scaled = self.font.as_scaled(self.scale);
        let ascent = scaled.ascent();
        for ch in chars {
            if self.glyph_cache.contains_key(&ch) {
                continue;
            }
            // glyph_id 0 = .notdef : évite les boîtes "?" dans l'aperçu.
            let gid = self.font.glyph_id(ch);
            if gid.0 == 0 {
                continue;
            }

            let mut buffer = vec![0u8; (self.char_width * self.char_height) as usize];
            let glyph = gid.with_scale_and_position(self.scale, point(0.0, ascent));
            if let Some(outline) = self.font.outline_glyph(glyph) {
                let bounds = outline.px_bounds();
                let (cw, chh) = (self.char_width, self.char_height);
                outline.draw(|x, y, v| {
                    let px = (x as i32 + bounds.min.x as i32).max(0) as u32;
                    let py = (y as i32 + bounds.min.y as i32).max(0) as u32;
                    if px < cw && py < chh {
                        buffer[(py * cw + px) as usize] = (v * 255.0).round() as u8;
                    }
                });
            }
            self.glyph_cache.insert(ch, buffer);
        }
    }

    /// Pixel dimensions of the preview for a grid.
    #[must_use]
    pub fn target_dimensions(&self, grid: &AsciiGrid) -> (u32, u32) {
        (
            grid.width * self.char_width,
            grid.height * self.char_height,
        )
    }

    /// Rendu de la grille, une bande de pixels par ligne, en parallèle.
    #[must_use]
    pub fn render(&self, grid: &AsciiGrid, palette: &Palette) -> FrameBuffer {
        let (w, h) = self.target_dimensions(grid);
        let mut fb = FrameBuffer::filled(w, h, palette.shade(0));
        if grid.is_empty() {
            return fb;
        }

        let stride = (w * 4) as usize;
        let band_size = stride * self.char_height as usize;
        let cw = self.char_width as usize;

        fb.data
            .par_chunks_exact_mut(band_size)
            .zip(grid.cells.par_chunks(grid.width as usize))
            .for_each(|(band, row)| {
                for (gx, ch) in row.iter().enumerate() {
                    let alpha = self.glyph_cache.get(ch).unwrap_or(&self.empty_glyph);
                    for cy in 0..self.char_height as usize {
                        for cx in 0..cw {
                            let px = cy * stride + (gx * cw + cx) * 4;
                            band[px..px + 4].copy_from_slice(&palette.shade(alpha[cy * cw + cx]));
                        }
                    }
                }
            });

        log::debug!("Aperçu rendu : {w}×{h}");
        fb
    }
}

/// Save a frame as PNG.
///
/// # Errors
/// Returns an error for an empty frame or if the file cannot be written.
pub fn save_png(frame: &FrameBuffer, path: &Path) -> Result<()> {
    if frame.is_empty() {
        anyhow::bail!("Aperçu vide : rien à écrire dans {}", path.display());
    }
    let img = image::RgbaImage::from_raw(frame.width, frame.height, frame.data.clone())
        .context("Buffer RGBA incohérent")?;
    img.save(path)
        .with_context(|| format!("Impossible d'écrire {}", path.display()))?;
    log::info!("Aperçu PNG : {}", path.display());
    Ok(())
}
