use std::path::PathBuf;

use clap::Parser;

/// glyphgrid: text and image to monospace ASCII art.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Source : texte à rasteriser sur le canevas.
    #[arg(long)]
    pub text: Option<String>,

    /// Source : chemin vers une image (PNG, JPEG, BMP, GIF, WEBP).
    #[arg(long)]
    pub image: Option<PathBuf>,

    /// Source : prompt de génération d'image distante. Requiert RUNWARE_API_KEY.
    #[arg(long)]
    pub prompt: Option<String>,

    /// Nombre de colonnes [1, 800].
    #[arg(long)]
    pub cols: Option<u32>,

    /// Preset de rampe (voir --list-ramps).
    #[arg(long)]
    pub ramp: Option<String>,

    /// Inverser la luminance.
    #[arg(long, default_value_t = false)]
    pub invert: bool,

    /// Désactiver l'inversion, même si un style ou la config l'active.
    #[arg(long, default_value_t = false, conflicts_with = "invert")]
    pub no_invert: bool,

    /// Aspect des cellules (hauteur / largeur). En mode image, remplace l'aspect mesuré.
    #[arg(long)]
    pub aspect: Option<f32>,

    /// Correction gamma (> 0).
    #[arg(long)]
    pub gamma: Option<f32>,

    /// Échantillons par axe et par cellule [1, 6].
    #[arg(long)]
    pub samples: Option<u32>,

    /// Style prédéfini : retro, minimal, dense, neon, cyber, random.
    #[arg(long)]
    pub style: Option<String>,

    /// Graine du tirage des styles (reproductible).
    #[arg(long)]
    pub seed: Option<u64>,

    /// Thème : dark ou light.
    #[arg(long)]
    pub theme: Option<String>,

    /// Couleur du tracé : white, yellow, red, lime, blue, purple.
    #[arg(long)]
    pub tint: Option<String>,

    /// Police TTF/OTF : rasterisation du texte, mesure des glyphes, aperçu PNG.
    #[arg(long)]
    pub font: Option<PathBuf>,

    /// Fichier texte de sortie. Défaut : stdout.
    #[arg(short, long)]
    pub out: Option<PathBuf>,

    /// Aperçu PNG coloré. Requiert une police.
    #[arg(long)]
    pub png: Option<PathBuf>,

    /// Modèle de génération distante.
    #[arg(long)]
    pub model: Option<String>,

    /// Délai maximal de génération distante, en secondes.
    #[arg(long, default_value_t = 120)]
    pub timeout: u64,

    /// Fichier de configuration TOML. Défaut : config/default.toml.
    #[arg(short, long, default_value = "config/default.toml")]
    pub config: PathBuf,

    /// Lister les presets de rampe et quitter.
    #[arg(long, default_value_t = false)]
    pub list_ramps: bool,

    /// Niveau de log : error, warn, info, debug, trace.
    #[arg(long, default_value = "warn")]
    pub log_level: String,
}

impl Cli {
    /// Validate that exactly one source is provided.
    ///
    /// # Errors
    /// Returns an error if zero or more than one source is specified.
    pub fn validate_source(&self) -> anyhow::Result<()> {
        let count = usize::from(self.text.is_some())
            + usize::from(self.image.is_some())
            + usize::from(self.prompt.is_some());

        if count == 0 {
            anyhow::bail!("Aucune source spécifiée. Utilisez --text, --image, ou --prompt.");
        }
        if count > 1 {
            anyhow::bail!(
                "Une seule source à la fois. Spécifiez --text, --image, OU --prompt."
            );
        }
        Ok(())
    }
}
