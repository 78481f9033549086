use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::color::{Theme, Tint};
use crate::ramp::{DEFAULT_RAMP, Ramp};

/// Borne basse du nombre de colonnes.
pub const MIN_COLS: u32 = 1;
/// Borne haute du nombre de colonnes.
pub const MAX_COLS: u32 = 800;
/// Sous-échantillons par axe, bornes incluses.
pub const MIN_SAMPLES: u32 = 1;
pub const MAX_SAMPLES: u32 = 6;
pub const DEFAULT_SAMPLES: u32 = 3;
/// Fallback cell aspect (height / width) when no glyph metrics are available.
pub const DEFAULT_ASPECT: f32 = 2.0;

/// Réglages fins du quantificateur.
///
/// # Example
/// ```
/// use gg_core::config::Tuning;
/// let t = Tuning { gamma: Some(0.0), samples: Some(12) };
/// assert_eq!(t.gamma(), 1.0);
/// assert_eq!(t.samples(), 6);
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Deserialize, Serialize)]
pub struct Tuning {
    /// Exposant appliqué à la valeur de cellule. `None` = 1.0.
    pub gamma: Option<f32>,
    /// Sous-échantillons par axe. `None` = 3.
    pub samples: Option<u32>,
}

impl Tuning {
    /// Effective gamma: unset, zero, negative or non-finite values mean 1.0.
    #[must_use]
    pub fn gamma(&self) -> f32 {
        match self.gamma {
            Some(g) if g.is_finite() && g > 0.0 => g,
            _ => 1.0,
        }
    }

    /// Effective samples per axis, clamped to [1, 6].
    #[must_use]
    pub fn samples(&self) -> u32 {
        self.samples
            .unwrap_or(DEFAULT_SAMPLES)
            .clamp(MIN_SAMPLES, MAX_SAMPLES)
    }
}

/// Paramètres d'une génération, possédés par l'appelant et passés par valeur.
///
/// # Example
/// ```
/// use gg_core::config::GenerationRequest;
/// let mut req = GenerationRequest { cols: 5000, ..Default::default() };
/// req.clamp_all();
/// assert_eq!(req.cols, 800);
/// ```
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct GenerationRequest {
    /// Nombre de colonnes cible, [1, 800].
    pub cols: u32,
    /// Nom du preset de rampe.
    pub ramp: String,
    /// Inverser la luminance (pour fond clair).
    pub invert: bool,
    /// Hauteur / largeur d'une cellule. Doit être > 0.
    pub aspect: f32,
    /// Gamma et sous-échantillonnage.
    #[serde(default)]
    pub tuning: Tuning,
}

impl Default for GenerationRequest {
    fn default() -> Self {
        Self {
            cols: 80,
            ramp: DEFAULT_RAMP.to_string(),
            invert: false,
            aspect: 1.8,
            tuning: Tuning::default(),
        }
    }
}

impl GenerationRequest {
    /// Clamp numeric fields into range. The aspect factor is left alone: a
    /// non-positive aspect is rejected by the quantizer instead.
    pub fn clamp_all(&mut self) {
        self.cols = self.cols.clamp(MIN_COLS, MAX_COLS);
        if let Some(s) = self.tuning.samples {
            self.tuning.samples = Some(s.clamp(MIN_SAMPLES, MAX_SAMPLES));
        }
        if let Some(g) = self.tuning.gamma
            && !(g.is_finite() && g > 0.0)
        {
            self.tuning.gamma = None;
        }
    }

    /// Resolve the ramp preset, falling back to the default for unknown names.
    #[must_use]
    pub fn ramp(&self) -> Ramp {
        Ramp::named(&self.ramp)
    }
}

/// Dimensions du canevas de rasterisation du texte.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct CanvasConfig {
    pub width: u32,
    pub height: u32,
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            width: 1000,
            height: 360,
        }
    }
}

/// Réglages de sortie : tint unique, thème, taille d'aperçu.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct ExportConfig {
    pub tint: Tint,
    pub theme: Theme,
    /// Facteur de taille d'aperçu [0.3, 2.0]. La police d'aperçu fait `12 × preview_size` px.
    pub preview_size: f32,
    /// Police TTF/OTF pour la mesure des glyphes et l'aperçu PNG.
    pub font: Option<PathBuf>,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            tint: Tint::White,
            theme: Theme::Dark,
            preview_size: 0.8,
            font: None,
        }
    }
}

/// Configuration complète, sérialisable en TOML.
///
/// # Example
/// ```
/// use gg_core::config::Config;
/// let config = Config::default();
/// assert_eq!(config.canvas.width, 1000);
/// ```
#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
pub struct Config {
    pub request: GenerationRequest,
    pub canvas: CanvasConfig,
    pub export: ExportConfig,
}

impl Config {
    /// Clamp all numeric fields to their valid ranges.
    /// Called after TOML deserialization and CLI overrides.
    pub fn clamp_all(&mut self) {
        self.request.clamp_all();
        self.canvas.width = self.canvas.width.clamp(1, 8192);
        self.canvas.height = self.canvas.height.clamp(1, 8192);
        self.export.preview_size = if self.export.preview_size.is_finite() {
            self.export.preview_size.clamp(0.3, 2.0)
        } else {
            1.0
        };
    }
}

/// Structure TOML intermédiaire, toutes sections optionnelles.
#[derive(Deserialize)]
struct ConfigFile {
    request: Option<RequestSection>,
    canvas: Option<CanvasSection>,
    export: Option<ExportSection>,
}

#[derive(Deserialize)]
struct RequestSection {
    cols: Option<u32>,
    ramp: Option<String>,
    invert: Option<bool>,
    aspect: Option<f32>,
    gamma: Option<f32>,
    samples: Option<u32>,
}

#[derive(Deserialize)]
struct CanvasSection {
    width: Option<u32>,
    height: Option<u32>,
}

#[derive(Deserialize)]
struct ExportSection {
    tint: Option<Tint>,
    theme: Option<Theme>,
    preview_size: Option<f32>,
    font: Option<PathBuf>,
}

/// Parse TOML text and merge it over the defaults.
///
/// # Errors
/// Returns an error if the TOML is malformed or a value has the wrong type.
///
/// # Example
/// ```
/// use gg_core::config::parse_config;
/// let config = parse_config("[request]\ncols = 120\n").unwrap();
/// assert_eq!(config.request.cols, 120);
/// assert_eq!(config.request.ramp, "detailed");
/// ```
pub fn parse_config(content: &str) -> Result<Config> {
    let file: ConfigFile = toml::from_str(content).context("Erreur de parsing TOML")?;
    let mut config = Config::default();

    if let Some(r) = file.request {
        if let Some(v) = r.cols {
            config.request.cols = v;
        }
        if let Some(v) = r.ramp {
            config.request.ramp = v;
        }
        if let Some(v) = r.invert {
            config.request.invert = v;
        }
        if let Some(v) = r.aspect {
            config.request.aspect = v;
        }
        if let Some(v) = r.gamma {
            config.request.tuning.gamma = Some(v);
        }
        if let Some(v) = r.samples {
            config.request.tuning.samples = Some(v);
        }
    }
    if let Some(c) = file.canvas {
        if let Some(v) = c.width {
            config.canvas.width = v;
        }
        if let Some(v) = c.height {
            config.canvas.height = v;
        }
    }
    if let Some(e) = file.export {
        if let Some(v) = e.tint {
            config.export.tint = v;
        }
        if let Some(v) = e.theme {
            config.export.theme = v;
        }
        if let Some(v) = e.preview_size {
            config.export.preview_size = v;
        }
        if e.font.is_some() {
            config.export.font = e.font;
        }
    }

    config.clamp_all();
    Ok(config)
}

/// Charge un fichier TOML et fusionne avec les valeurs par défaut.
///
/// # Errors
/// Returns an error if the file cannot be read or parsed.
///
/// # Example
/// ```no_run
/// use gg_core::config::load_config;
/// use std::path::Path;
/// let config = load_config(Path::new("config/default.toml")).unwrap();
/// ```
pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Impossible de lire {}", path.display()))?;
    parse_config(&content).with_context(|| format!("Config invalide : {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn empty_file_gives_defaults() {
        assert_eq!(parse_config("").unwrap(), Config::default());
    }

    #[test]
    fn partial_sections_merge() {
        let config = parse_config(
            r#"
            [request]
            ramp = "heavy"
            invert = true
            gamma = 0.9

            [export]
            tint = "lime"
            theme = "light"
            "#,
        )
        .unwrap();
        assert_eq!(config.request.ramp, "heavy");
        assert!(config.request.invert);
        assert_eq!(config.request.tuning.gamma(), 0.9);
        assert_eq!(config.request.cols, 80);
        assert_eq!(config.export.tint, Tint::Lime);
        assert_eq!(config.export.theme, Theme::Light);
        assert_eq!(config.canvas, CanvasConfig::default());
    }

    #[test]
    fn out_of_range_values_are_clamped() {
        let config = parse_config(
            r"
            [request]
            cols = 0
            samples = 40
            gamma = -2.0

            [canvas]
            width = 0

            [export]
            preview_size = 9.0
            ",
        )
        .unwrap();
        assert_eq!(config.request.cols, 1);
        assert_eq!(config.request.tuning.samples, Some(6));
        assert_eq!(config.request.tuning.gamma, None);
        assert_eq!(config.canvas.width, 1);
        assert_eq!(config.export.preview_size, 2.0);
    }

    #[test]
    fn aspect_is_not_clamped() {
        let config = parse_config("[request]\naspect = -1.0\n").unwrap();
        assert_eq!(config.request.aspect, -1.0);
    }

    #[test]
    fn malformed_toml_is_an_error() {
        assert!(parse_config("[request\ncols = 3").is_err());
        assert!(parse_config("[request]\ncols = \"many\"").is_err());
    }

    #[test]
    fn tuning_defaults() {
        let t = Tuning::default();
        assert_eq!(t.gamma(), 1.0);
        assert_eq!(t.samples(), 3);
        let t = Tuning {
            gamma: Some(f32::NAN),
            samples: Some(0),
        };
        assert_eq!(t.gamma(), 1.0);
        assert_eq!(t.samples(), 1);
    }

    #[test]
    fn load_config_reads_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[request]\ncols = 42\n[canvas]\nheight = 200").unwrap();
        let config = load_config(file.path()).unwrap();
        assert_eq!(config.request.cols, 42);
        assert_eq!(config.canvas.height, 200);
    }

    #[test]
    fn load_config_missing_file_errors() {
        assert!(load_config(Path::new("/nonexistent/glyphgrid.toml")).is_err());
    }

    #[test]
    fn shipped_default_file_matches_defaults() {
        let config = parse_config(include_str!("../../../config/default.toml")).unwrap();
        let mut expected = Config::default();
        expected.request.tuning.samples = Some(DEFAULT_SAMPLES);
        assert_eq!(config, expected);
    }
}
