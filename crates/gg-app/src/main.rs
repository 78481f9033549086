use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use gg_core::config::{self, Config};

pub mod cli;
pub mod pipeline;
pub mod policy;
pub mod styles;

fn main() -> Result<()> {
    // 1. Parser CLI
    let cli = cli::Cli::parse();

    // 2. Initialiser le logging
    env_logger::Builder::new()
        .filter_level(cli.log_level.parse().unwrap_or(log::LevelFilter::Warn))
        .init();

    if cli.list_ramps {
        list_ramps();
        return Ok(());
    }

    // 3. Valider la source
    let source = pipeline::Source::from_cli(&cli)?;

    // 4. Charger la config puis appliquer style et overrides CLI
    let mut config = resolve_config(&cli)?;
    let mut rng = cli.seed.map_or_else(fastrand::Rng::new, fastrand::Rng::with_seed);
    apply_overrides(&cli, &mut config, &mut rng)?;

    // 5. Acquérir la source
    let font = pipeline::load_font(&config)?;
    let remote = pipeline::RemoteOptions {
        model: cli.model.clone(),
        timeout: Duration::from_secs(cli.timeout),
    };
    let frame = pipeline::acquire(&source, &config, font.as_ref(), &remote)?;

    // 6. Quantifier
    let params = pipeline::quantize_params(&source, &frame, &config, font.as_ref(), cli.aspect);
    let grid = pipeline::render(&frame, &config, &params)?;

    // 7. Sorties
    pipeline::emit(&grid, cli.out.as_deref())?;
    if let Some(ref png) = cli.png {
        pipeline::export_preview(&grid, &config, png)?;
    }
    Ok(())
}

fn list_ramps() {
    for name in gg_core::ramp::preset_names() {
        println!("{name:<10} \"{}\"", gg_core::Ramp::named(name));
    }
}

/// Resolve config: the TOML file when present, defaults otherwise.
fn resolve_config(cli: &cli::Cli) -> Result<Config> {
    if cli.config.exists() {
        config::load_config(&cli.config)
    } else {
        log::warn!(
            "Config introuvable : {}. Utilisation des défauts.",
            cli.config.display()
        );
        Ok(Config::default())
    }
}

/// Apply theme, style, then individual flags over `config`, and clamp.
///
/// Explicit flags win over the style draw.
fn apply_overrides(cli: &cli::Cli, config: &mut Config, rng: &mut fastrand::Rng) -> Result<()> {
    if let Some(ref theme) = cli.theme {
        config.export.theme = theme.parse().map_err(anyhow::Error::msg)?;
    }
    if let Some(ref name) = cli.style {
        let style: styles::StylePreset = name.parse().map_err(anyhow::Error::msg)?;
        let outcome = style.apply(&config.request, config.export.theme, rng);
        config.request = outcome.request;
        config.export.tint = outcome.tint;
        if let Some(size) = outcome.preview_size {
            config.export.preview_size = size;
        }
    }
    if let Some(ref tint) = cli.tint {
        config.export.tint = tint.parse().map_err(anyhow::Error::msg)?;
    }
    if let Some(cols) = cli.cols {
        config.request.cols = cols;
    }
    if let Some(ref ramp) = cli.ramp {
        config.request.ramp.clone_from(ramp);
    }
    if cli.invert {
        config.request.invert = true;
    }
    if cli.no_invert {
        config.request.invert = false;
    }
    if let Some(aspect) = cli.aspect {
        config.request.aspect = aspect;
    }
    if let Some(gamma) = cli.gamma {
        config.request.tuning.gamma = Some(gamma);
    }
    if let Some(samples) = cli.samples {
        config.request.tuning.samples = Some(samples);
    }
    if let Some(ref font) = cli.font {
        config.export.font = Some(font.clone());
    }
    config.clamp_all();
    if config.request.aspect <= 0.0 || config.request.aspect.is_nan() {
        return Err(gg_core::CoreError::bad_aspect(config.request.aspect))
            .context("Aspect invalide");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use gg_core::color::{Theme, Tint};

    fn parse(args: &[&str]) -> cli::Cli {
        cli::Cli::try_parse_from(std::iter::once("glyphgrid").chain(args.iter().copied())).unwrap()
    }

    fn overridden(args: &[&str]) -> Result<Config> {
        let mut config = Config::default();
        let mut rng = fastrand::Rng::with_seed(1);
        apply_overrides(&parse(args), &mut config, &mut rng)?;
        Ok(config)
    }

    #[test]
    fn flags_override_config() {
        let config = overridden(&[
            "--text", "x", "--cols", "2000", "--ramp", "heavy", "--invert", "--samples", "9",
            "--gamma=-1", "--tint", "red", "--theme", "light",
        ])
        .unwrap();
        assert_eq!(config.request.cols, 800);
        assert_eq!(config.request.ramp, "heavy");
        assert!(config.request.invert);
        assert_eq!(config.request.tuning.samples, Some(6));
        assert_eq!(config.request.tuning.gamma, None);
        assert_eq!(config.export.tint, Tint::Red);
        assert_eq!(config.export.theme, Theme::Light);
    }

    #[test]
    fn explicit_flags_beat_style() {
        let config = overridden(&["--text", "x", "--style", "retro", "--cols", "33"]).unwrap();
        assert_eq!(config.request.cols, 33);
        assert_eq!(config.request.ramp, "blocks");
        assert_eq!(config.export.tint, Tint::Lime);
        assert!((config.export.preview_size - 1.2).abs() < f32::EPSILON);
    }

    #[test]
    fn no_invert_beats_style_and_config() {
        let config = overridden(&["--text", "x", "--style", "neon", "--no-invert"]).unwrap();
        assert_eq!(config.request.ramp, "symbols");
        assert!(!config.request.invert);

        let mut config = Config::default();
        config.request.invert = true;
        let mut rng = fastrand::Rng::with_seed(1);
        apply_overrides(&parse(&["--text", "x", "--no-invert"]), &mut config, &mut rng).unwrap();
        assert!(!config.request.invert);
    }

    #[test]
    fn style_uses_overridden_theme() {
        let config = overridden(&["--text", "x", "--style", "retro", "--theme", "light"]).unwrap();
        assert_eq!(config.export.tint, Tint::Red);
    }

    #[test]
    fn unknown_names_are_errors() {
        assert!(overridden(&["--text", "x", "--style", "nope"]).is_err());
        assert!(overridden(&["--text", "x", "--theme", "sepia"]).is_err());
        assert!(overridden(&["--text", "x", "--tint", "beige"]).is_err());
    }

    #[test]
    fn bad_aspect_is_rejected() {
        assert!(overridden(&["--text", "x", "--aspect", "0"]).is_err());
        assert!(overridden(&["--text", "x", "--aspect", "1.1"]).is_ok());
    }

    #[test]
    fn missing_config_falls_back_to_defaults() {
        let cli = parse(&["--text", "x", "--config", "/nonexistent/glyphgrid.toml"]);
        assert_eq!(resolve_config(&cli).unwrap(), Config::default());
    }

    #[test]
    fn config_file_is_loaded() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("c.toml");
        std::fs::write(&path, "[request]\ncols = 42\n").unwrap();
        let cli = parse(&["--text", "x", "--config", path.to_str().unwrap()]);
        assert_eq!(resolve_config(&cli).unwrap().request.cols, 42);
    }
}
