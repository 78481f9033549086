use gg_core::color::luminance;
use gg_core::config::{DEFAULT_ASPECT, DEFAULT_SAMPLES, GenerationRequest, MAX_SAMPLES, MIN_SAMPLES};
use gg_core::error::CoreError;
use gg_core::frame::AsciiGrid;
use gg_core::ramp::Ramp;
use gg_core::traits::SampleSource;
use rayon::prelude::*;

use crate::layout::{GridLayout, MAX_CELLS};

/// Paramètres numériques du quantificateur, passés par valeur.
///
/// # Example
/// ```
/// use gg_ascii::QuantizeParams;
/// let p = QuantizeParams::default();
/// assert_eq!(p.samples, 3);
/// assert_eq!(p.gamma, 1.0);
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct QuantizeParams {
    /// Colonnes cible, bornées à [1, 800].
    pub cols: u32,
    /// Inverser la valeur de cellule avant le gamma.
    pub invert: bool,
    /// Hauteur / largeur de cellule. Doit être > 0.
    pub aspect: f32,
    /// Exposant. ≤ 0 ou non fini = 1.0.
    pub gamma: f32,
    /// Sous-échantillons par axe, bornés à [1, 6].
    pub samples: u32,
}

impl Default for QuantizeParams {
    fn default() -> Self {
        Self {
            cols: 80,
            invert: false,
            aspect: DEFAULT_ASPECT,
            gamma: 1.0,
            samples: DEFAULT_SAMPLES,
        }
    }
}

impl From<&GenerationRequest> for QuantizeParams {
    fn from(req: &GenerationRequest) -> Self {
        Self {
            cols: req.cols,
            invert: req.invert,
            aspect: req.aspect,
            gamma: req.tuning.gamma(),
            samples: req.tuning.samples(),
        }
    }
}

/// Convert a sample grid into a `rows × cols` glyph grid.
///
/// Each cell averages the luminance of an s×s sub-grid of nearest-pixel
/// samples, optionally inverts it, applies gamma, and picks
/// `ramp[round(v · (L − 1))]`.
///
/// # Errors
/// [`CoreError::InvalidInput`] if the source has zero width or height, if
/// `aspect` is not strictly positive, or if the grid would exceed
/// [`MAX_CELLS`](crate::layout::MAX_CELLS). Every other parameter is clamped.
///
/// # Example
/// ```
/// use gg_ascii::{QuantizeParams, quantize};
/// use gg_core::{FrameBuffer, Ramp};
///
/// let white = FrameBuffer::filled(2, 2, [255, 255, 255, 255]);
/// let params = QuantizeParams { cols: 1, aspect: 1.0, samples: 1, ..Default::default() };
/// let grid = quantize(&white, &Ramp::named("blocks"), &params).unwrap();
/// assert_eq!(grid.to_text(), "@");
/// ```
pub fn quantize<S>(source: &S, ramp: &Ramp, params: &QuantizeParams) -> Result<AsciiGrid, CoreError>
where
    S: SampleSource + Sync + ?Sized,
{
    let (width, height) = (source.width(), source.height());
    if width == 0 || height == 0 {
        return Err(CoreError::zero_area(width, height));
    }
    if params.aspect.is_nan() || params.aspect <= 0.0 {
        return Err(CoreError::bad_aspect(params.aspect));
    }

    let layout = GridLayout::compute(width, height, params.cols, params.aspect);
    if !layout.within_budget() {
        return Err(CoreError::too_many_cells(layout.cols, layout.rows, MAX_CELLS));
    }
    let shaping = Shaping {
        invert: params.invert,
        gamma: effective_gamma(params.gamma),
        samples: params.samples.clamp(MIN_SAMPLES, MAX_SAMPLES),
    };
    log::debug!(
        "Quantification {width}×{height} → {}×{} (cellule {:.3}×{:.3}, s={}, γ={})",
        layout.cols,
        layout.rows,
        layout.cell_width,
        layout.cell_height,
        shaping.samples,
        shaping.gamma
    );

    let mut grid = AsciiGrid::new(layout.cols, layout.rows);
    if grid.is_empty() {
        return Ok(grid);
    }

    grid.cells
        .par_chunks_mut(layout.cols as usize)
        .enumerate()
        .for_each(|(row, glyphs)| {
            for (col, glyph) in glyphs.iter_mut().enumerate() {
                let v = cell_luminance(source, &layout, row as u32, col as u32, shaping.samples);
                *glyph = ramp.glyph_for(shaping.apply(v));
            }
        });

    Ok(grid)
}

/// Inversion et gamma, appliqués dans cet ordre.
#[derive(Clone, Copy, Debug)]
struct Shaping {
    invert: bool,
    gamma: f64,
    samples: u32,
}

impl Shaping {
    #[inline(always)]
    #[allow(clippy::float_cmp)]
    fn apply(self, mut v: f64) -> f64 {
        if self.invert {
            v = 1.0 - v;
        }
        if self.gamma != 1.0 {
            v = v.clamp(0.0, 1.0).powf(self.gamma).clamp(0.0, 1.0);
        }
        v
    }
}

fn effective_gamma(gamma: f32) -> f64 {
    if gamma.is_finite() && gamma > 0.0 {
        f64::from(gamma)
    } else {
        1.0
    }
}

/// Mean luminance over an s×s grid of points centered in their sub-cells.
#[inline(always)]
fn cell_luminance<S>(source: &S, layout: &GridLayout, row: u32, col: u32, samples: u32) -> f64
where
    S: SampleSource + ?Sized,
{
    let (x0, y0) = layout.cell_origin(row, col);
    let s = f64::from(samples);
    let mut sum = 0.0;
    for sy in 0..samples {
        let py = y0 + (f64::from(sy) + 0.5) / s * layout.cell_height;
        let iy = nearest(py, source.height());
        for sx in 0..samples {
            let px = x0 + (f64::from(sx) + 0.5) / s * layout.cell_width;
            let ix = nearest(px, source.width());
            sum += luminance(source.sample_at(ix, iy));
        }
    }
    sum / (s * s)
}

/// Truncate a sample coordinate to a pixel index within `[0, len − 1]`.
#[inline(always)]
fn nearest(coord: f64, len: u32) -> u32 {
    if coord.is_nan() || coord <= 0.0 {
        0
    } else {
        (coord as u64).min(u64::from(len - 1)) as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gg_core::frame::FrameBuffer;

    const WHITE: [u8; 4] = [255, 255, 255, 255];
    const BLACK: [u8; 4] = [0, 0, 0, 255];

    fn gray(v: u8) -> [u8; 4] {
        [v, v, v, 255]
    }

    /// Horizontal gradient, with a vertical ripple so rows differ.
    fn gradient(width: u32, height: u32) -> FrameBuffer {
        let mut fb = FrameBuffer::new(width, height);
        for y in 0..height {
            for x in 0..width {
                let v = (x * 255 / width.max(1) + y * 7) % 256;
                fb.put_pixel(x, y, gray(v as u8));
            }
        }
        fb
    }

    /// Panics on any read outside the grid.
    struct Strict(FrameBuffer);

    impl SampleSource for Strict {
        fn width(&self) -> u32 {
            self.0.width
        }
        fn height(&self) -> u32 {
            self.0.height
        }
        fn sample_at(&self, x: u32, y: u32) -> [u8; 4] {
            assert!(x < self.0.width && y < self.0.height, "lecture hors grille ({x}, {y})");
            self.0.pixel(x, y)
        }
    }

    fn params(cols: u32, aspect: f32) -> QuantizeParams {
        QuantizeParams {
            cols,
            aspect,
            samples: 1,
            ..QuantizeParams::default()
        }
    }

    #[test]
    fn white_grid_maps_to_densest() {
        let fb = FrameBuffer::filled(2, 2, WHITE);
        let grid = quantize(&fb, &Ramp::named("blocks"), &params(1, 1.0)).unwrap();
        assert_eq!(grid.to_text(), "@");
    }

    #[test]
    fn inverted_white_grid_maps_to_lightest() {
        let fb = FrameBuffer::filled(2, 2, WHITE);
        let p = QuantizeParams {
            invert: true,
            ..params(1, 1.0)
        };
        let grid = quantize(&fb, &Ramp::named("blocks"), &p).unwrap();
        assert_eq!(grid.to_text(), " ");
    }

    #[test]
    fn two_glyph_ramp_splits_at_mid_gray() {
        let ramp = Ramp::new("AB").unwrap();
        let p = params(4, 1.0);
        let light = quantize(&FrameBuffer::filled(8, 8, gray(128)), &ramp, &p).unwrap();
        let dark = quantize(&FrameBuffer::filled(8, 8, gray(127)), &ramp, &p).unwrap();
        assert!(light.cells.iter().all(|&c| c == 'B'));
        assert!(dark.cells.iter().all(|&c| c == 'A'));
    }

    #[test]
    fn every_row_has_cols_glyphs() {
        let fb = gradient(97, 61);
        let ramp = Ramp::named("detailed");
        for cols in [1, 2, 7, 33, 97, 150, 800] {
            for aspect in [0.5, 1.0, 1.8, 3.0] {
                let p = QuantizeParams {
                    cols,
                    aspect,
                    ..QuantizeParams::default()
                };
                let grid = quantize(&fb, &ramp, &p).unwrap();
                let layout = GridLayout::compute(97, 61, cols, aspect);
                assert_eq!(grid.height, layout.rows);
                let text = grid.to_text();
                if layout.rows == 0 {
                    assert!(text.is_empty());
                    continue;
                }
                for line in text.split('\n') {
                    assert_eq!(line.chars().count(), cols as usize, "cols={cols} aspect={aspect}");
                }
            }
        }
    }

    #[test]
    fn cols_are_clamped_before_use() {
        let fb = FrameBuffer::filled(1600, 10, WHITE);
        let grid = quantize(&fb, &Ramp::named("blocks"), &params(5000, 1.0)).unwrap();
        assert_eq!(grid.width, 800);
        assert_eq!(grid.height, 5);

        let grid = quantize(&fb, &Ramp::named("blocks"), &params(0, 0.001)).unwrap();
        assert_eq!(grid.width, 1);
    }

    #[test]
    fn brighter_cells_never_map_lower() {
        let ramp = Ramp::named("blocks");
        for invert in [false, true] {
            for gamma in [0.5, 1.0, 2.2] {
                let p = QuantizeParams {
                    invert,
                    gamma,
                    ..params(1, 1.0)
                };
                let mut prev: Option<usize> = None;
                for g in 0..=255u8 {
                    let grid = quantize(&FrameBuffer::filled(1, 1, gray(g)), &ramp, &p).unwrap();
                    let ch = grid.get(0, 0);
                    let idx = ramp.chars().iter().position(|&c| c == ch).unwrap();
                    if let Some(prev) = prev {
                        if invert {
                            assert!(idx <= prev, "inversé, g={g}");
                        } else {
                            assert!(idx >= prev, "g={g}");
                        }
                    }
                    prev = Some(idx);
                }
            }
        }
    }

    /// Holds away from exact halfway values, see the next test.
    #[test]
    fn invert_matches_reversed_ramp() {
        let fb = gradient(120, 90);
        let ramp = Ramp::named("blocks");
        let p = QuantizeParams {
            cols: 40,
            aspect: 1.5,
            ..QuantizeParams::default()
        };
        let inverted = quantize(
            &fb,
            &ramp,
            &QuantizeParams {
                invert: true,
                ..p
            },
        )
        .unwrap();
        let mirrored = quantize(&fb, &ramp.reversed(), &p).unwrap();
        assert_eq!(inverted.to_text(), mirrored.to_text());
    }

    /// Rounding is half-up in both cases, so a cell at exactly 0.5 picks the
    /// upper glyph when inverted and the lower one with the reversed ramp.
    #[test]
    fn invert_and_reversed_ramp_differ_on_exact_half() {
        let mut fb = FrameBuffer::filled(2, 1, BLACK);
        fb.put_pixel(1, 0, WHITE);
        let ramp = Ramp::new("AB").unwrap();
        let p = QuantizeParams {
            cols: 1,
            aspect: 0.5,
            samples: 2,
            ..QuantizeParams::default()
        };
        let inverted = quantize(&fb, &ramp, &QuantizeParams { invert: true, ..p }).unwrap();
        let mirrored = quantize(&fb, &ramp.reversed(), &p).unwrap();
        assert_eq!(inverted.to_text(), "B");
        assert_eq!(mirrored.to_text(), "A");
    }

    #[test]
    fn single_glyph_ramp_fills_grid() {
        let ramp = Ramp::new("#").unwrap();
        let grid = quantize(&gradient(64, 64), &ramp, &QuantizeParams::default()).unwrap();
        assert!(!grid.is_empty());
        assert!(grid.cells.iter().all(|&c| c == '#'));
    }

    #[test]
    fn one_pixel_grid_is_uniform() {
        let fb = FrameBuffer::filled(1, 1, gray(90));
        let p = QuantizeParams {
            cols: 5,
            aspect: 2.0,
            ..QuantizeParams::default()
        };
        let grid = quantize(&fb, &Ramp::named("detailed"), &p).unwrap();
        assert_eq!((grid.width, grid.height), (5, 2));
        let first = grid.cells[0];
        assert!(grid.cells.iter().all(|&c| c == first));
    }

    #[test]
    fn short_source_yields_empty_text() {
        let fb = FrameBuffer::filled(10, 1, WHITE);
        let grid = quantize(&fb, &Ramp::named("blocks"), &params(1, 2.0)).unwrap();
        assert_eq!(grid.height, 0);
        assert_eq!(grid.to_text(), "");
    }

    #[test]
    fn zero_area_is_rejected() {
        let ramp = Ramp::default();
        for (w, h) in [(0, 5), (5, 0), (0, 0)] {
            let err = quantize(&FrameBuffer::new(w, h), &ramp, &QuantizeParams::default());
            assert!(matches!(err, Err(CoreError::InvalidInput(_))));
        }
    }

    #[test]
    fn non_positive_aspect_is_rejected() {
        let fb = FrameBuffer::filled(4, 4, WHITE);
        for aspect in [0.0, -1.0, f32::NAN] {
            let err = quantize(&fb, &Ramp::default(), &params(2, aspect));
            assert!(matches!(err, Err(CoreError::InvalidInput(_))), "aspect={aspect}");
        }
    }

    #[test]
    fn oversized_grid_is_rejected_before_allocating() {
        let fb = FrameBuffer::filled(1000, 360, WHITE);
        let err = quantize(&fb, &Ramp::default(), &params(800, 1e-7));
        assert!(matches!(err, Err(CoreError::InvalidInput(ref m)) if m.contains("trop grande")));
    }

    #[test]
    fn samples_never_read_out_of_bounds() {
        let strict = Strict(gradient(37, 23));
        let ramp = Ramp::named("smooth");
        for cols in [1, 5, 36, 37, 38, 200] {
            for samples in [0, 1, 3, 6, 9] {
                for aspect in [0.5, 0.7, 2.0] {
                    let p = QuantizeParams {
                        cols,
                        aspect,
                        samples,
                        ..QuantizeParams::default()
                    };
                    quantize(&strict, &ramp, &p).unwrap();
                }
            }
        }
    }

    #[test]
    fn box_sampling_averages_within_cell() {
        let mut fb = FrameBuffer::filled(2, 2, BLACK);
        fb.put_pixel(1, 1, WHITE);
        let ramp = Ramp::named("blocks");

        let single = quantize(&fb, &ramp, &params(1, 1.0)).unwrap();
        assert_eq!(single.to_text(), "@");

        let boxed = quantize(
            &fb,
            &ramp,
            &QuantizeParams {
                samples: 2,
                ..params(1, 1.0)
            },
        )
        .unwrap();
        // mean 0.25 → round(2.25) = 2
        assert_eq!(boxed.to_text(), ":");
    }

    #[test]
    fn gamma_darkens_mid_tones() {
        let fb = FrameBuffer::filled(4, 4, gray(128));
        let ramp = Ramp::named("blocks");
        let linear = quantize(&fb, &ramp, &params(1, 1.0)).unwrap();
        let shaped = quantize(
            &fb,
            &ramp,
            &QuantizeParams {
                gamma: 2.0,
                ..params(1, 1.0)
            },
        )
        .unwrap();
        assert_eq!(linear.to_text(), "+");
        // 0.502² ≈ 0.252 → round(2.27) = 2
        assert_eq!(shaped.to_text(), ":");
    }

    #[test]
    fn invalid_gamma_is_identity() {
        let fb = gradient(50, 50);
        let ramp = Ramp::named("detailed");
        let base = quantize(&fb, &ramp, &QuantizeParams::default()).unwrap();
        for gamma in [0.0, -1.0, f32::NAN, f32::INFINITY] {
            let p = QuantizeParams {
                gamma,
                ..QuantizeParams::default()
            };
            assert_eq!(quantize(&fb, &ramp, &p).unwrap(), base);
        }
    }

    #[test]
    fn output_is_deterministic() {
        let fb = gradient(300, 200);
        let ramp = Ramp::named("symbols");
        let p = QuantizeParams {
            cols: 90,
            gamma: 0.9,
            ..QuantizeParams::default()
        };
        let first = quantize(&fb, &ramp, &p).unwrap();
        let again = quantize(&fb.clone(), &ramp, &QuantizeParams { cols: first.width, ..p }).unwrap();
        assert_eq!(first.to_text(), again.to_text());
    }

    #[test]
    fn params_follow_request() {
        let mut req = GenerationRequest {
            cols: 120,
            invert: true,
            aspect: 1.2,
            ..GenerationRequest::default()
        };
        req.tuning.samples = Some(10);
        let p = QuantizeParams::from(&req);
        assert_eq!(p.cols, 120);
        assert!(p.invert);
        assert_eq!(p.samples, 6);
        assert_eq!(p.gamma, 1.0);
    }
}
