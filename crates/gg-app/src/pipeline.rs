use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use gg_ascii::{QuantizeParams, quantize};
use gg_core::config::Config;
use gg_core::{AsciiGrid, FrameBuffer, TextShaper};
use gg_export::{Palette, Rasterizer, save_png, write_text};
use gg_remote::{GenerateImageParams, ImageGenClient};
use gg_source::{BlockShaper, FontShaper, TextRasterizer};

use crate::cli::Cli;
use crate::policy::{self, IMAGE_GAMMA, IMAGE_SAMPLES, PREVIEW_BASE_PX};

/// Where the sample grid comes from.
#[derive(Clone, Debug, PartialEq)]
pub enum Source {
    Text(String),
    Image(PathBuf),
    Prompt(String),
}

impl Source {
    /// Pick the single source given on the command line.
    ///
    /// # Errors
    /// Returns an error unless exactly one source is specified.
    pub fn from_cli(cli: &Cli) -> Result<Self> {
        cli.validate_source()?;
        if let Some(ref text) = cli.text {
            Ok(Self::Text(text.clone()))
        } else if let Some(ref path) = cli.image {
            Ok(Self::Image(path.clone()))
        } else if let Some(ref prompt) = cli.prompt {
            Ok(Self::Prompt(prompt.clone()))
        } else {
            anyhow::bail!("Aucune source spécifiée.")
        }
    }

    /// Decoded images get the image policies (column heuristic, measured aspect).
    #[must_use]
    pub fn is_raster_image(&self) -> bool {
        !matches!(self, Self::Text(_))
    }
}

/// Options for the remote generation source.
#[derive(Clone, Debug)]
pub struct RemoteOptions {
    pub model: Option<String>,
    pub timeout: Duration,
}

impl Default for RemoteOptions {
    fn default() -> Self {
        Self {
            model: None,
            timeout: gg_remote::DEFAULT_GENERATION_TIMEOUT,
        }
    }
}

/// Load the configured font, if any.
///
/// # Errors
/// Returns an error if a font is configured but cannot be read or parsed.
pub fn load_font(config: &Config) -> Result<Option<FontShaper>> {
    config
        .export
        .font
        .as_deref()
        .map(FontShaper::from_file)
        .transpose()
}

/// Produce the sample grid for `source`.
///
/// Text is laid out with `font` when present, with block glyphs otherwise.
///
/// # Errors
/// Returns an error if the image cannot be decoded or remote generation fails.
pub fn acquire(
    source: &Source,
    config: &Config,
    font: Option<&FontShaper>,
    remote: &RemoteOptions,
) -> Result<FrameBuffer> {
    match source {
        Source::Text(text) => {
            let shaper: &dyn TextShaper = match font {
                Some(f) => f,
                None => {
                    log::info!("Pas de police configurée : glyphes en blocs.");
                    &BlockShaper
                }
            };
            Ok(TextRasterizer::from(config.canvas).rasterize(text, shaper))
        }
        Source::Image(path) => {
            log::info!("Chargement de l'image : {}", path.display());
            gg_source::image::load_image(path)
        }
        Source::Prompt(prompt) => generate_remote(prompt, remote),
    }
}

/// Generate an image remotely and decode it.
///
/// # Errors
/// Returns an error on missing API key, network or API failure, timeout, or
/// undecodable bytes.
pub fn generate_remote(prompt: &str, options: &RemoteOptions) -> Result<FrameBuffer> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("Impossible de créer le runtime tokio")?;

    let mut params = GenerateImageParams::new(prompt);
    params.model.clone_from(&options.model);

    let (image, bytes) = runtime.block_on(async {
        let client = ImageGenClient::new()?;
        client.generate_and_fetch(&params, options.timeout).await
    })?;

    log::info!("Image générée (seed {}) : {}", image.seed, image.image_url);
    if image.nsfw_content {
        log::warn!("Le service a signalé un contenu NSFW.");
    }
    gg_source::image::decode_image(&bytes)
}

/// Quantizer parameters for this source.
///
/// Text uses the request as is. Raster images get the column heuristic,
/// image gamma/samples defaults, and the measured glyph aspect unless
/// `aspect_override` is set.
#[must_use]
pub fn quantize_params(
    source: &Source,
    frame: &FrameBuffer,
    config: &Config,
    font: Option<&FontShaper>,
    aspect_override: Option<f32>,
) -> QuantizeParams {
    let request = &config.request;
    if !source.is_raster_image() {
        return QuantizeParams::from(request);
    }
    let aspect = aspect_override.unwrap_or_else(|| {
        policy::measure_char_aspect(
            font.map(|f| f as &dyn TextShaper),
            config.export.preview_size,
        )
    });
    let cols = policy::image_target_cols(frame.width, frame.height, request.cols);
    log::debug!(
        "Image {}x{} : {cols} colonnes (demandé {}), aspect {aspect:.3}",
        frame.width,
        frame.height,
        request.cols
    );
    QuantizeParams {
        cols,
        invert: request.invert,
        aspect,
        gamma: request.tuning.gamma.unwrap_or(IMAGE_GAMMA),
        samples: request.tuning.samples.unwrap_or(IMAGE_SAMPLES),
    }
}

/// Quantize `frame` with the configured ramp.
///
/// # Errors
/// Returns an error for a zero-area grid or an invalid aspect.
pub fn render(frame: &FrameBuffer, config: &Config, params: &QuantizeParams) -> Result<AsciiGrid> {
    let ramp = config.request.ramp();
    let grid = quantize(frame, &ramp, params).context("Quantification impossible")?;
    log::info!("Grille {}x{} générée", grid.width, grid.height);
    Ok(grid)
}

/// Write the grid to `out`, or to stdout.
///
/// # Errors
/// Returns an error if writing fails.
pub fn emit(grid: &AsciiGrid, out: Option<&Path>) -> Result<()> {
    if let Some(path) = out {
        write_text(grid, path)?;
        log::info!("Texte écrit : {}", path.display());
        return Ok(());
    }
    let mut stdout = std::io::stdout().lock();
    writeln!(stdout, "{grid}").context("Écriture stdout impossible")?;
    Ok(())
}

/// Render a tinted PNG preview of the grid.
///
/// # Errors
/// Returns an error if no font is configured or the PNG cannot be written.
pub fn export_preview(grid: &AsciiGrid, config: &Config, path: &Path) -> Result<()> {
    let font_path = config
        .export
        .font
        .as_deref()
        .context("L'aperçu PNG requiert une police (--font ou [export] font).")?;
    let font_data = std::fs::read(font_path)
        .with_context(|| format!("Impossible de lire la police : {}", font_path.display()))?;

    let mut rasterizer = Rasterizer::new(font_data, PREVIEW_BASE_PX * config.export.preview_size)?;
    rasterizer.cache_chars(grid.cells.iter().copied());
    let palette = Palette::new(config.export.tint, config.export.theme);
    let frame = rasterizer.render(grid, &palette);
    save_png(&frame, path)?;
    log::info!("Aperçu écrit : {}", path.display());
    Ok(())
}
