//! Remote text-to-image generation.
//!
//! A single request/response future with its own timeout and error surface.
//! The quantizer never sees this crate; callers decode the fetched bytes and
//! hand the resulting sample grid to the core.

mod client;

pub use client::{
    API_BASE_URL, API_KEY_ENV, DEFAULT_GENERATION_TIMEOUT, DEFAULT_MODEL, GenerateImageParams,
    GeneratedImage, ImageGenClient, RemoteError, validate_prompt,
};
