use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Luminance perceptuelle BT.601 d'un échantillon RGBA, normalisée [0.0, 1.0].
///
/// L'alpha est ignoré.
///
/// # Example
/// ```
/// use gg_core::color::luminance;
/// assert!((luminance([255, 255, 255, 255]) - 1.0).abs() < 1e-9);
/// assert_eq!(luminance([0, 0, 0, 255]), 0.0);
/// ```
#[inline(always)]
#[must_use]
pub fn luminance(rgba: [u8; 4]) -> f64 {
    let [r, g, b, _] = rgba;
    (0.299 * f64::from(r) + 0.587 * f64::from(g) + 0.114 * f64::from(b)) / 255.0
}

/// Couleur de tracé unique appliquée à toute la grille.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Tint {
    #[default]
    White,
    Yellow,
    Red,
    Lime,
    Blue,
    Purple,
}

impl Tint {
    /// Valeur RGB du tint.
    ///
    /// # Example
    /// ```
    /// use gg_core::color::Tint;
    /// assert_eq!(Tint::White.rgb(), (255, 255, 255));
    /// ```
    #[must_use]
    pub fn rgb(self) -> (u8, u8, u8) {
        match self {
            Self::White => (255, 255, 255),
            Self::Yellow => (250, 204, 21),
            Self::Red => (239, 68, 68),
            Self::Lime => (132, 204, 22),
            Self::Blue => (59, 130, 246),
            Self::Purple => (168, 85, 247),
        }
    }

    /// Lowercase name, as used in config files and on the command line.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::White => "white",
            Self::Yellow => "yellow",
            Self::Red => "red",
            Self::Lime => "lime",
            Self::Blue => "blue",
            Self::Purple => "purple",
        }
    }
}

impl FromStr for Tint {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "white" => Ok(Self::White),
            "yellow" => Ok(Self::Yellow),
            "red" => Ok(Self::Red),
            "lime" => Ok(Self::Lime),
            "blue" => Ok(Self::Blue),
            "purple" => Ok(Self::Purple),
            other => Err(format!("tint inconnu : {other}")),
        }
    }
}

/// Thème d'affichage : fixe le fond et l'ordre des tints proposés.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Dark,
    Light,
}

impl Theme {
    /// Tints offered under this theme, in display order.
    ///
    /// # Example
    /// ```
    /// use gg_core::color::{Theme, Tint};
    /// assert_eq!(Theme::Light.tints()[1], Tint::Red);
    /// ```
    #[must_use]
    pub fn tints(self) -> &'static [Tint; 6] {
        const DARK: [Tint; 6] = [
            Tint::White,
            Tint::Yellow,
            Tint::Blue,
            Tint::Red,
            Tint::Lime,
            Tint::Purple,
        ];
        const LIGHT: [Tint; 6] = [
            Tint::White,
            Tint::Red,
            Tint::Lime,
            Tint::Purple,
            Tint::Yellow,
            Tint::Blue,
        ];
        match self {
            Self::Dark => &DARK,
            Self::Light => &LIGHT,
        }
    }

    /// Background RGB behind the glyphs.
    #[must_use]
    pub fn background(self) -> (u8, u8, u8) {
        match self {
            Self::Dark => (12, 12, 14),
            Self::Light => (38, 38, 46),
        }
    }
}

impl FromStr for Theme {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "dark" => Ok(Self::Dark),
            "light" => Ok(Self::Light),
            other => Err(format!("thème inconnu : {other}")),
        }
    }
}
