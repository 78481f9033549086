//! Caller-side policies applied around the quantizer: image column choice
//! and glyph aspect measurement.

use gg_core::TextShaper;
use gg_core::config::DEFAULT_ASPECT;

/// Gamma used for decoded images unless the request sets one.
pub const IMAGE_GAMMA: f32 = 0.9;
/// Samples per axis used for decoded images unless the request sets one.
pub const IMAGE_SAMPLES: u32 = 3;
/// Preview glyph size at `preview_size == 1.0`, in pixels.
pub const PREVIEW_BASE_PX: f32 = 12.0;

/// Column count for an image of `width × height`, from the requested `cols`.
///
/// Square-ish images get fewer columns, wide ones more, tall ones fewer still.
#[must_use]
pub fn image_target_cols(width: u32, height: u32, cols: u32) -> u32 {
    if height == 0 {
        return cols;
    }
    let r = f64::from(width) / f64::from(height);
    let c = f64::from(cols);
    let target = if (r - 1.0).abs() < 0.3 {
        (c * 0.8).clamp(40.0, 100.0)
    } else if r > 1.5 {
        c.clamp(60.0, 120.0)
    } else if r < 0.7 {
        (c * 0.7).clamp(40.0, 80.0)
    } else {
        (c * 0.9).clamp(50.0, 100.0)
    };
    target.floor() as u32
}

/// Height/width ratio of a glyph cell, measured on `'M'` at the preview size.
///
/// Without a shaper there are no metrics and the default aspect is returned.
/// A zero width is treated as half the font size.
#[must_use]
pub fn measure_char_aspect(shaper: Option<&dyn TextShaper>, preview_size: f32) -> f32 {
    let Some(shaper) = shaper else {
        return DEFAULT_ASPECT;
    };
    let size = PREVIEW_BASE_PX * preview_size;
    let width = shaper.measure("M", size);
    let width = if width > 0.0 && width.is_finite() {
        width
    } else {
        size / 2.0
    };
    let aspect = size / width;
    log::debug!("Aspect mesuré : {aspect:.3} (taille {size:.1}px, largeur M {width:.2}px)");
    aspect
}
