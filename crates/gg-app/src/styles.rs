//! Style presets: one-shot randomized parameter sets.

use std::str::FromStr;

use gg_core::GenerationRequest;
use gg_core::color::{Theme, Tint};
use gg_core::ramp::PRESETS;

/// Named style presets.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StylePreset {
    /// Blocks ramp, green-on-black terminal look.
    Retro,
    /// Smooth ramp, few columns.
    Minimal,
    /// Detailed ramp, many columns.
    Dense,
    /// Symbols ramp, always inverted.
    Neon,
    /// Binary ramp.
    Cyber,
    /// Everything randomized.
    Random,
}

impl StylePreset {
    pub const ALL: [Self; 6] = [
        Self::Retro,
        Self::Minimal,
        Self::Dense,
        Self::Neon,
        Self::Cyber,
        Self::Random,
    ];

    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Retro => "retro",
            Self::Minimal => "minimal",
            Self::Dense => "dense",
            Self::Neon => "neon",
            Self::Cyber => "cyber",
            Self::Random => "random",
        }
    }

    /// Draw a parameter set for this style.
    ///
    /// `base` supplies what the style does not touch (gamma, samples).
    /// RANDOM leaves the preview size alone.
    #[must_use]
    pub fn apply(self, base: &GenerationRequest, theme: Theme, rng: &mut fastrand::Rng) -> StyleOutcome {
        let tints = theme.tints();
        let mut request = base.clone();
        let (tint, preview_size) = match self {
            Self::Retro => {
                request.cols = 60 + rng.u32(0..20);
                request.aspect = 1.5 + rng.f32() * 0.5;
                "blocks".clone_into(&mut request.ramp);
                request.invert = false;
                let tint = match theme {
                    Theme::Dark => Tint::Lime,
                    Theme::Light => Tint::Red,
                };
                (tint, Some(1.2))
            }
            Self::Minimal => {
                request.cols = 40 + rng.u32(0..15);
                request.aspect = 2.0 + rng.f32() * 0.3;
                "smooth".clone_into(&mut request.ramp);
                request.invert = rng.f32() > 0.7;
                (Tint::White, Some(1.0))
            }
            Self::Dense => {
                request.cols = 90 + rng.u32(0..30);
                request.aspect = 1.0 + rng.f32() * 0.8;
                "detailed".clone_into(&mut request.ramp);
                request.invert = rng.f32() > 0.6;
                (tints[rng.usize(..tints.len())], Some(0.8))
            }
            Self::Neon => {
                request.cols = 70 + rng.u32(0..20);
                request.aspect = 1.8 + rng.f32() * 0.4;
                "symbols".clone_into(&mut request.ramp);
                request.invert = true;
                (Tint::Purple, Some(1.1))
            }
            Self::Cyber => {
                request.cols = 55 + rng.u32(0..25);
                request.aspect = 1.6 + rng.f32() * 0.6;
                "binary".clone_into(&mut request.ramp);
                request.invert = rng.f32() > 0.5;
                (Tint::Blue, Some(1.3))
            }
            Self::Random => {
                request.cols = 20 + rng.u32(0..80);
                request.aspect = 0.5 + rng.f32() * 2.0;
                PRESETS[rng.usize(..PRESETS.len())]
                    .0
                    .clone_into(&mut request.ramp);
                request.invert = rng.f32() > 0.5;
                (tints[rng.usize(..tints.len())], None)
            }
        };
        log::info!(
            "Style {} : {} colonnes, aspect {:.2}, rampe {}, invert {}",
            self.name(),
            request.cols,
            request.aspect,
            request.ramp,
            request.invert
        );
        StyleOutcome {
            request,
            tint,
            preview_size,
        }
    }
}

impl FromStr for StylePreset {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|style| style.name() == wanted)
            .ok_or_else(|| {
                let names: Vec<&str> = Self::ALL.iter().map(|s| s.name()).collect();
                format!("Style inconnu : {s}. Disponibles : {}", names.join(", "))
            })
    }
}

/// Result of applying a style.
#[derive(Clone, Debug, PartialEq)]
pub struct StyleOutcome {
    pub request: GenerationRequest,
    pub tint: Tint,
    /// `None` keeps the current preview size.
    pub preview_size: Option<f32>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use gg_core::Ramp;

    fn draw(style: StylePreset, theme: Theme, seed: u64) -> StyleOutcome {
        let mut rng = fastrand::Rng::with_seed(seed);
        style.apply(&GenerationRequest::default(), theme, &mut rng)
    }

    #[test]
    fn parse_names() {
        assert_eq!("RETRO".parse::<StylePreset>(), Ok(StylePreset::Retro));
        assert_eq!(" neon ".parse::<StylePreset>(), Ok(StylePreset::Neon));
        assert!("vaporwave".parse::<StylePreset>().is_err());
    }

    #[test]
    fn ranges_hold_across_seeds() {
        for seed in 0..200 {
            let o = draw(StylePreset::Retro, Theme::Dark, seed);
            assert!((60..80).contains(&o.request.cols));
            assert!((1.5..=2.0).contains(&o.request.aspect));
            assert_eq!(o.request.ramp, "blocks");
            assert!(!o.request.invert);

            let o = draw(StylePreset::Minimal, Theme::Dark, seed);
            assert!((40..55).contains(&o.request.cols));
            assert!((2.0..=2.3).contains(&o.request.aspect));

            let o = draw(StylePreset::Dense, Theme::Dark, seed);
            assert!((90..120).contains(&o.request.cols));
            assert!((1.0..=1.8).contains(&o.request.aspect));
            assert!(Theme::Dark.tints().contains(&o.tint));

            let o = draw(StylePreset::Neon, Theme::Dark, seed);
            assert!((70..90).contains(&o.request.cols));
            assert!(o.request.invert);

            let o = draw(StylePreset::Cyber, Theme::Dark, seed);
            assert!((55..80).contains(&o.request.cols));
            assert!((1.6..=2.2).contains(&o.request.aspect));
            assert_eq!(o.request.ramp, "binary");

            let o = draw(StylePreset::Random, Theme::Light, seed);
            assert!((20..100).contains(&o.request.cols));
            assert!((0.5..=2.5).contains(&o.request.aspect));
            assert!(Ramp::preset(&o.request.ramp).is_some());
            assert!(Theme::Light.tints().contains(&o.tint));
            assert_eq!(o.preview_size, None);
        }
    }

    #[test]
    fn theme_dependent_tints() {
        assert_eq!(draw(StylePreset::Retro, Theme::Dark, 1).tint, Tint::Lime);
        assert_eq!(draw(StylePreset::Retro, Theme::Light, 1).tint, Tint::Red);
        assert_eq!(draw(StylePreset::Neon, Theme::Light, 1).tint, Tint::Purple);
        assert_eq!(draw(StylePreset::Cyber, Theme::Dark, 1).tint, Tint::Blue);
    }

    #[test]
    fn preview_sizes() {
        assert_eq!(draw(StylePreset::Retro, Theme::Dark, 3).preview_size, Some(1.2));
        assert_eq!(draw(StylePreset::Minimal, Theme::Dark, 3).preview_size, Some(1.0));
        assert_eq!(draw(StylePreset::Cyber, Theme::Dark, 3).preview_size, Some(1.3));
    }

    #[test]
    fn same_seed_same_outcome() {
        for style in StylePreset::ALL {
            assert_eq!(draw(style, Theme::Dark, 42), draw(style, Theme::Dark, 42));
        }
    }

    #[test]
    fn tuning_is_preserved() {
        let mut base = GenerationRequest::default();
        base.tuning.gamma = Some(1.4);
        let mut rng = fastrand::Rng::with_seed(9);
        let o = StylePreset::Dense.apply(&base, Theme::Dark, &mut rng);
        assert_eq!(o.request.tuning.gamma, Some(1.4));
    }
}
