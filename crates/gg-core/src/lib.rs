/// Configuration, types, and shared structures for glyphgrid.
///
/// This crate contains the sample grid, the ASCII output grid, ramp presets,
/// request configuration and the capability traits shared across the
/// workspace.

pub mod color;
pub mod config;
pub mod error;
pub mod frame;
pub mod ramp;
pub mod traits;

pub use config::{Config, GenerationRequest, Tuning};
pub use error::CoreError;
pub use frame::{AsciiGrid, FrameBuffer};
pub use ramp::Ramp;
pub use traits::{SampleSource, TextShaper};
