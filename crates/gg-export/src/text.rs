use std::path::Path;

use anyhow::{Context, Result};
use gg_core::frame::AsciiGrid;

/// Écrit la grille telle quelle (lignes jointes par `\n`, sans métadonnées).
///
/// # Errors
/// Returns an error if the file cannot be written.
///
/// # Example
/// ```no_run
/// use gg_core::frame::AsciiGrid;
/// use gg_export::write_text;
/// use std::path::Path;
/// write_text(&AsciiGrid::new(10, 2), Path::new("ascii-art.txt")).unwrap();
/// ```
pub fn write_text(grid: &AsciiGrid, path: &Path) -> Result<()> {
    std::fs::write(path, grid.to_text())
        .with_context(|| format!("Impossible d'écrire {}", path.display()))?;
    log::info!(
        "Export texte : {}×{} → {}",
        grid.width,
        grid.height,
        path.display()
    );
    Ok(())
}
