use std::fmt;

use crate::error::CoreError;

/// 10 caractères: compact, bon contraste.
pub const RAMP_BLOCKS: &str = " .:-=+*#%@";

/// 70 caractères: Paul Bourke étendu, résolution maximale.
pub const RAMP_DETAILED: &str =
    " .'`\",:;Il!i><~+_-?][}{1)(|\\/*tfjrxnuvczXYUJCLQ0OZmwqpdbkhao*#MW&8%B@$";

/// Dégradé doux, peu de glyphes lettres.
pub const RAMP_SMOOTH: &str = " .'`\",:;~-_=+*#%@";

/// Blocs Unicode: pseudo-pixels.
pub const RAMP_HEAVY: &str = " ░▒▓█";

/// Glyphes à traits fins, contours nets.
pub const RAMP_SHARP: &str = " .,:;!ilI|/\\tfxjrvnczXYUJCLQ0OZmwqpdbkhao#MW&8%B@$";

/// Ponctuation et symboles monétaires.
pub const RAMP_SYMBOLS: &str =
    " .'`^\"~,.:;_-+=*|/\\()[]{}<>!?%$#@&£€¥§°•·=÷×|~'\"-+_<>/\\";

/// Binaire: style terminal.
pub const RAMP_BINARY: &str = " 01";

/// Name of the ramp used when a caller supplies an unknown name or an empty ramp.
pub const DEFAULT_RAMP: &str = "detailed";

/// Presets nommés, ordre d'affichage.
pub const PRESETS: &[(&str, &str)] = &[
    ("blocks", RAMP_BLOCKS),
    ("detailed", RAMP_DETAILED),
    ("smooth", RAMP_SMOOTH),
    ("heavy", RAMP_HEAVY),
    ("sharp", RAMP_SHARP),
    ("symbols", RAMP_SYMBOLS),
    ("binary", RAMP_BINARY),
];

/// Ordered, non-empty glyph sequence. Index 0 carries the least ink, the last
/// index the most.
///
/// # Example
/// ```
/// use gg_core::ramp::Ramp;
/// let ramp = Ramp::named("blocks");
/// assert_eq!(ramp.len(), 10);
/// assert_eq!(ramp.glyph_for(0.0), ' ');
/// assert_eq!(ramp.glyph_for(1.0), '@');
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Ramp {
    chars: Vec<char>,
}

impl Ramp {
    /// Build a ramp from arbitrary text, lightest → densest.
    ///
    /// # Errors
    /// Returns [`CoreError::EmptyRamp`] if `chars` is empty.
    ///
    /// # Example
    /// ```
    /// use gg_core::ramp::Ramp;
    /// assert!(Ramp::new("").is_err());
    /// assert_eq!(Ramp::new(" #").unwrap().len(), 2);
    /// ```
    pub fn new(chars: &str) -> Result<Self, CoreError> {
        let chars: Vec<char> = chars.chars().collect();
        if chars.is_empty() {
            return Err(CoreError::EmptyRamp);
        }
        Ok(Self { chars })
    }

    /// Like [`Ramp::new`], but falls back to the default preset on empty input.
    #[must_use]
    pub fn from_chars_or_default(chars: &str) -> Self {
        Self::new(chars).unwrap_or_else(|_| {
            log::warn!("Rampe vide fournie, repli sur '{DEFAULT_RAMP}'");
            Self::default()
        })
    }

    /// Look up a named preset (case-insensitive).
    ///
    /// # Example
    /// ```
    /// use gg_core::ramp::Ramp;
    /// assert!(Ramp::preset("HEAVY").is_some());
    /// assert!(Ramp::preset("nope").is_none());
    /// ```
    #[must_use]
    pub fn preset(name: &str) -> Option<Self> {
        PRESETS
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name.trim()))
            .map(|(_, chars)| Self {
                chars: chars.chars().collect(),
            })
    }

    /// Named preset, falling back to [`DEFAULT_RAMP`] for unknown names.
    #[must_use]
    pub fn named(name: &str) -> Self {
        Self::preset(name).unwrap_or_else(|| {
            log::warn!("Rampe inconnue '{name}', repli sur '{DEFAULT_RAMP}'");
            Self::default()
        })
    }

    /// Number of glyphs (always ≥ 1).
    #[must_use]
    #[allow(clippy::len_without_is_empty)]
    pub fn len(&self) -> usize {
        self.chars.len()
    }

    /// Glyphs, lightest first.
    #[must_use]
    pub fn chars(&self) -> &[char] {
        &self.chars
    }

    /// Same glyphs, densest first.
    ///
    /// # Example
    /// ```
    /// use gg_core::ramp::Ramp;
    /// let r = Ramp::new("ab").unwrap().reversed();
    /// assert_eq!(r.chars(), &['b', 'a']);
    /// ```
    #[must_use]
    pub fn reversed(&self) -> Self {
        Self {
            chars: self.chars.iter().rev().copied().collect(),
        }
    }

    /// Map a cell value in [0, 1] to a ramp index: `round(v · (L − 1))`,
    /// clamped to `[0, L − 1]`. Halves round up.
    ///
    /// # Example
    /// ```
    /// use gg_core::ramp::Ramp;
    /// let ramp = Ramp::new("AB").unwrap();
    /// assert_eq!(ramp.index_for(0.5), 1);
    /// assert_eq!(ramp.index_for(0.49), 0);
    /// ```
    #[inline(always)]
    #[must_use]
    pub fn index_for(&self, v: f64) -> usize {
        let last = self.chars.len() - 1;
        let idx = (v * last as f64).round();
        // NaN and negatives land on 0.
        if idx.is_nan() || idx <= 0.0 {
            0
        } else {
            (idx as usize).min(last)
        }
    }

    /// Glyph for a cell value in [0, 1].
    #[inline(always)]
    #[must_use]
    pub fn glyph_for(&self, v: f64) -> char {
        self.chars[self.index_for(v)]
    }
}

impl Default for Ramp {
    fn default() -> Self {
        Self {
            chars: RAMP_DETAILED.chars().collect(),
        }
    }
}

impl fmt::Display for Ramp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for ch in &self.chars {
            write!(f, "{ch}")?;
        }
        Ok(())
    }
}

/// Names of every built-in ramp, in display order.
pub fn preset_names() -> impl Iterator<Item = &'static str> {
    PRESETS.iter().map(|(name, _)| *name)
}
