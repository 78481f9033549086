/// Export of ASCII grids: plain `.txt` files and tinted PNG previews.

pub mod rasterizer;
pub mod text;

pub use rasterizer::{Palette, Rasterizer, save_png};
pub use text::write_text;
