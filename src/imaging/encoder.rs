//! PNG serialization with pinned encoder settings.
//!
//! Cached and freshly rendered avatars must be byte-identical, and so must
//! avatars produced by two different builds of this crate on two different
//! machines. The `image` crate's defaults are stable today, but they are
//! defaults; naming them here keeps a dependency bump from silently changing
//! every output file.

use image::codecs::png::{CompressionType, FilterType, PngEncoder};
use image::{ExtendedColorType, ImageEncoder, ImageError, RgbaImage};
use thiserror::Error;

/// Deflate level for every avatar.
pub const COMPRESSION: CompressionType = CompressionType::Default;

/// Row filter strategy for every avatar.
pub const FILTER: FilterType = FilterType::Adaptive;

#[derive(Error, Debug)]
#[error("PNG encoding failed: {0}")]
pub struct EncodingError(#[from] ImageError);

/// Encode `canvas` as an RGBA8 PNG.
pub fn encode_png(canvas: &RgbaImage) -> Result<Vec<u8>, EncodingError> {
    // Roughly what a flat two-tone 256² avatar compresses to.
    let mut bytes = Vec::with_capacity(8 * 1024);
    PngEncoder::new_with_quality(&mut bytes, COMPRESSION, FILTER).write_image(
        canvas.as_raw(),
        canvas.width(),
        canvas.height(),
        ExtendedColorType::Rgba8,
    )?;
    Ok(bytes)
}
