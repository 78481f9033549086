use gg_core::config::{MAX_COLS, MIN_COLS};

/// Plancher de la hauteur de cellule, évite la division par zéro.
pub const MIN_CELL_HEIGHT: f64 = 1e-6;

/// Budget de cellules d'une grille (800 colonnes × 10 000 lignes).
pub const MAX_CELLS: u64 = 8_000_000;

/// Géométrie de la grille de sortie pour une source W×H.
///
/// `cell_width = W / cols`, `cell_height = max(ε, cell_width × aspect)`,
/// `rows = floor(H / cell_height)`, saturé à `u32::MAX`. Zéro ligne est un
/// résultat valide.
///
/// # Example
/// ```
/// use gg_ascii::GridLayout;
/// let layout = GridLayout::compute(1000, 360, 100, 2.0);
/// assert_eq!(layout.cell_width, 10.0);
/// assert_eq!(layout.cell_height, 20.0);
/// assert_eq!(layout.rows, 18);
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GridLayout {
    /// Colonnes, déjà bornées à [1, 800].
    pub cols: u32,
    pub rows: u32,
    pub cell_width: f64,
    pub cell_height: f64,
}

impl GridLayout {
    /// Compute the layout. `cols` is clamped; `aspect` is taken as given
    /// (callers reject non-positive values before getting here).
    #[must_use]
    pub fn compute(width: u32, height: u32, cols: u32, aspect: f32) -> Self {
        let cols = cols.clamp(MIN_COLS, MAX_COLS);
        let cell_width = f64::from(width) / f64::from(cols);
        let cell_height = (cell_width * f64::from(aspect)).max(MIN_CELL_HEIGHT);
        let rows = (f64::from(height) / cell_height).floor() as u32;
        Self {
            cols,
            rows,
            cell_width,
            cell_height,
        }
    }

    /// Total cell count, without overflow.
    #[must_use]
    pub fn cell_count(&self) -> u64 {
        u64::from(self.cols) * u64::from(self.rows)
    }

    /// Whether the grid fits within [`MAX_CELLS`].
    #[must_use]
    pub fn within_budget(&self) -> bool {
        self.cell_count() <= MAX_CELLS
    }

    /// Top-left corner of cell (`row`, `col`) in source coordinates.
    #[inline(always)]
    #[must_use]
    pub fn cell_origin(&self, row: u32, col: u32) -> (f64, f64) {
        (
            f64::from(col) * self.cell_width,
            f64::from(row) * self.cell_height,
        )
    }
}
