use std::path::Path;

use anyhow::{Context, Result};
use gg_core::frame::FrameBuffer;

/// Décode une image (PNG, JPEG, BMP, GIF, WEBP) depuis le disque.
///
/// # Errors
/// Returns an error if the file cannot be read or decoded.
///
/// # Example
/// ```no_run
/// use gg_source::image::load_image;
/// use std::path::Path;
/// let frame = load_image(Path::new("photo.png")).unwrap();
/// ```
pub fn load_image(path: &Path) -> Result<FrameBuffer> {
    let img =
        image::open(path).with_context(|| format!("Impossible de charger {}", path.display()))?;
    into_frame(&img)
}

/// Décode une image déjà en mémoire (upload, téléchargement distant).
///
/// # Errors
/// Returns an error if the bytes are not a supported image.
pub fn decode_image(bytes: &[u8]) -> Result<FrameBuffer> {
    let img = image::load_from_memory(bytes).context("Décodage de l'image impossible")?;
    into_frame(&img)
}

fn into_frame(img: &image::DynamicImage) -> Result<FrameBuffer> {
    let rgba = img.to_rgba8();
    let (width, height) = rgba.dimensions();
    log::info!("Image décodée : {width}×{height}");
    Ok(FrameBuffer::from_rgba(width, height, rgba.into_raw())?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageFormat, Rgba, RgbaImage};
    use std::io::Cursor;

    fn png_bytes(img: &RgbaImage) -> Vec<u8> {
        let mut out = Cursor::new(Vec::new());
        img.write_to(&mut out, ImageFormat::Png).unwrap();
        out.into_inner()
    }

    #[test]
    fn decode_preserves_pixels() {
        let mut img = RgbaImage::from_pixel(3, 2, Rgba([255, 255, 255, 255]));
        img.put_pixel(2, 1, Rgba([10, 20, 30, 255]));
        let frame = decode_image(&png_bytes(&img)).unwrap();
        assert_eq!((frame.width, frame.height), (3, 2));
        assert_eq!(frame.pixel(2, 1), [10, 20, 30, 255]);
        assert_eq!(frame.pixel(0, 0), [255, 255, 255, 255]);
    }

    #[test]
    fn decode_rejects_garbage() {
        assert!(decode_image(b"definitely not an image").is_err());
    }

    #[test]
    fn load_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dot.png");
        RgbaImage::from_pixel(4, 4, Rgba([0, 0, 0, 255]))
            .save(&path)
            .unwrap();
        let frame = load_image(&path).unwrap();
        assert_eq!(frame.data.len(), 4 * 4 * 4);
        assert!(load_image(&dir.path().join("missing.png")).is_err());
    }
}
