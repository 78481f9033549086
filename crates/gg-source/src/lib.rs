/// Source rasterizers for glyphgrid: text layout onto a canvas, font
/// shaping, and image decoding.

pub mod block;
pub mod font;
pub mod image;
pub mod text;

pub use block::BlockShaper;
pub use font::FontShaper;
pub use text::{TextFit, TextRasterizer};
