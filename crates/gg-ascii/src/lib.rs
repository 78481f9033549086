/// Pixel-to-glyph quantization engine for glyphgrid.
///
/// Converts a color sample grid into a monospace character grid.
pub mod layout;
pub mod quantize;

pub use layout::GridLayout;
pub use quantize::{QuantizeParams, quantize};
