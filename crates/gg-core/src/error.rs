use thiserror::Error;

/// Errors originating from the core module.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CoreError {
    /// Contract violation on an input: zero-area grid, non-positive aspect,
    /// RGBA buffer whose length does not match its dimensions.
    #[error("Entrée invalide : {0}")]
    InvalidInput(String),

    /// A ramp was built from zero characters.
    #[error("Rampe vide : au moins un caractère est requis")]
    EmptyRamp,
}

impl CoreError {
    /// Zero-area grid.
    ///
    /// # Example
    /// ```
    /// use gg_core::error::CoreError;
    /// let e = CoreError::zero_area(0, 10);
    /// assert!(e.to_string().contains("0×10"));
    /// ```
    #[must_use]
    pub fn zero_area(width: u32, height: u32) -> Self {
        Self::InvalidInput(format!("grille de surface nulle ({width}×{height})"))
    }

    /// Output grid larger than the cell budget.
    #[must_use]
    pub fn too_many_cells(cols: u32, rows: u32, max: u64) -> Self {
        Self::InvalidInput(format!(
            "grille trop grande ({cols}×{rows} cellules, maximum {max})"
        ))
    }

    /// Non-positive or NaN aspect factor.
    #[must_use]
    pub fn bad_aspect(aspect: f32) -> Self {
        Self::InvalidInput(format!("facteur d'aspect non positif ({aspect})"))
    }
}
