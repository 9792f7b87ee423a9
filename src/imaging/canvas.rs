//! Canvas composition: solid background, then text.

use super::color::derive_color;
use super::glyph::GlyphRenderer;
use image::RgbaImage;

/// Build the finished canvas for `initials`.
///
/// The canvas is fresh on every call, so the background is a plain fill
/// rather than a blend.
pub fn compose(renderer: &GlyphRenderer, width: u32, height: u32, initials: &str) -> RgbaImage {
    let mut canvas = RgbaImage::from_pixel(width, height, derive_color(initials));
    renderer.draw(&mut canvas, initials);
    canvas
}
