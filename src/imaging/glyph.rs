//! Glyph measurement, placement, and rasterization.
//!
//! The font is parsed exactly once, when the [`GlyphRenderer`] is built, and
//! is read-only afterwards. Rendering a string is then cheap: lay out the
//! glyphs along one baseline, rasterize each outline into coverage, and
//! blend white over the canvas.
//!
//! ## Sizing
//!
//! Point size maps to pixels-per-em at 72 DPI, so a 160 pt face draws an em
//! square 160 px tall. `ab_glyph` scales by the font's *height*
//! (ascent − descent) rather than by its em, so the configured size is
//! converted with `size × height / units_per_em` before building a
//! [`PxScale`].
//!
//! ## Placement
//!
//! ```text
//! x = (canvas_width  − text_width) / 2
//! y =  canvas_height / 2 + text_height / 4     (baseline)
//! ```
//!
//! The vertical term is an empirical offset tuned for two uppercase letters,
//! not a geometric center. Output compatibility depends on it, so it stays
//! exactly as written.

use ab_glyph::{Font, FontVec, Glyph, GlyphId, InvalidFont, Point, PxScale, ScaleFont, point};
use image::{Rgba, RgbaImage};
use thiserror::Error;

/// Text color. Fully opaque white.
pub const FOREGROUND: Rgba<u8> = Rgba([255, 255, 255, 255]);

#[derive(Error, Debug)]
pub enum FaceError {
    #[error("not a valid TrueType/OpenType outline font: {0}")]
    Invalid(#[from] InvalidFont),
    #[error("font does not declare units per em")]
    MissingUnitsPerEm,
}

/// Pixel extent of a laid-out string, rounded up to whole pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextMetrics {
    /// Sum of horizontal advances plus kerning.
    pub width: i32,
    /// `ceil(ascent) + ceil(descent)`, descent taken as a positive distance.
    pub height: i32,
}

/// A parsed outline font at a fixed size.
pub struct GlyphRenderer {
    font: FontVec,
    scale: PxScale,
}

impl GlyphRenderer {
    /// Parse `font_data` and fix the face at `point_size`.
    pub fn new(font_data: Vec<u8>, point_size: u32) -> Result<Self, FaceError> {
        let font = FontVec::try_from_vec(font_data)?;
        let units_per_em = font.units_per_em().ok_or(FaceError::MissingUnitsPerEm)?;
        let scale = PxScale::from(point_size as f32 * font.height_unscaled() / units_per_em);
        Ok(Self { font, scale })
    }

    /// Measure `text` at the configured size.
    pub fn measure(&self, text: &str) -> TextMetrics {
        let font = self.font.as_scaled(self.scale);
        let (_, advance) = self.layout(text, point(0.0, 0.0));
        TextMetrics {
            width: advance.ceil() as i32,
            height: font.ascent().ceil() as i32 + (-font.descent()).ceil() as i32,
        }
    }

    /// Draw `text` in [`FOREGROUND`] onto `canvas` at the centered origin.
    ///
    /// Glyphs entirely off the canvas are skipped without rasterizing;
    /// the rest are clipped per pixel. Code points the font lacks
    /// render as the font's `.notdef` glyph.
    pub fn draw(&self, canvas: &mut RgbaImage, text: &str) {
        let metrics = self.measure(text);
        let (x, y) = baseline_origin(canvas.width(), canvas.height(), metrics);
        let (glyphs, _) = self.layout(text, point(x as f32, y as f32));

        for glyph in glyphs {
            // Whitespace has no outline.
            let Some(outlined) = self.font.outline_glyph(glyph) else {
                continue;
            };
            let bounds = outlined.px_bounds();
            if bounds.max.x <= 0.0
                || bounds.max.y <= 0.0
                || bounds.min.x >= canvas.width() as f32
                || bounds.min.y >= canvas.height() as f32
            {
                continue;
            }
            let left = bounds.min.x as i64;
            let top = bounds.min.y as i64;
            outlined.draw(|gx, gy, coverage| {
                blend(canvas, left + i64::from(gx), top + i64::from(gy), coverage);
            });
        }
    }

    /// Position every glyph of `text` along the baseline starting at
    /// `origin`. Returns the glyphs and the total advance.
    fn layout(&self, text: &str, origin: Point) -> (Vec<Glyph>, f32) {
        let font = self.font.as_scaled(self.scale);
        let mut glyphs = Vec::with_capacity(text.len());
        let mut caret = 0.0f32;
        let mut previous: Option<GlyphId> = None;

        for c in text.chars() {
            let id = font.glyph_id(c);
            if let Some(prev) = previous {
                caret += font.kern(prev, id);
            }
            glyphs.push(id.with_scale_and_position(self.scale, point(origin.x + caret, origin.y)));
            caret += font.h_advance(id);
            previous = Some(id);
        }
        (glyphs, caret)
    }
}

/// Baseline origin for text of the given extent on a canvas.
///
/// Integer division truncates toward zero, so text wider than the canvas
/// gets a negative `x` and spills past both edges.
pub fn baseline_origin(canvas_width: u32, canvas_height: u32, metrics: TextMetrics) -> (i32, i32) {
    let x = (canvas_width as i32).saturating_sub(metrics.width) / 2;
    let y = canvas_height as i32 / 2 + metrics.height / 4;
    (x, y)
}

/// Blend [`FOREGROUND`] over one pixel by `coverage`. Out-of-bounds is a no-op.
fn blend(canvas: &mut RgbaImage, x: i64, y: i64, coverage: f32) {
    if x < 0 || y < 0 || x >= i64::from(canvas.width()) || y >= i64::from(canvas.height()) {
        return;
    }
    let coverage = coverage.clamp(0.0, 1.0);
    let pixel = canvas.get_pixel_mut(x as u32, y as u32);
    for (dst, src) in pixel.0.iter_mut().zip(FOREGROUND.0) {
        let delta = (f32::from(src) - f32::from(*dst)) * coverage;
        *dst = (f32::from(*dst) + delta).round() as u8;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::test_font;

    fn renderer() -> GlyphRenderer {
        GlyphRenderer::new(test_font(), 160).unwrap()
    }

    fn gray_canvas() -> RgbaImage {
        RgbaImage::from_pixel(256, 256, Rgba([40, 40, 40, 255]))
    }

    #[test]
    fn rejects_garbage_font() {
        let result = GlyphRenderer::new(b"definitely not a font".to_vec(), 160);
        assert!(matches!(result, Err(FaceError::Invalid(_))));
    }

    #[test]
    fn rejects_empty_font() {
        assert!(GlyphRenderer::new(Vec::new(), 160).is_err());
    }

    #[test]
    fn empty_text_has_no_width_but_keeps_line_height() {
        let m = renderer().measure("");
        assert_eq!(m.width, 0);
        assert!(m.height > 0);
    }

    #[test]
    fn width_grows_with_text() {
        let r = renderer();
        let one = r.measure("A").width;
        let two = r.measure("AB").width;
        let three = r.measure("ABC").width;
        assert!(one > 0);
        assert!(two > one);
        assert!(three > two);
    }

    #[test]
    fn line_height_independent_of_text() {
        let r = renderer();
        assert_eq!(r.measure("AB").height, r.measure("gy").height);
    }

    #[test]
    fn line_height_scales_with_size() {
        let small = GlyphRenderer::new(test_font(), 40).unwrap().measure("AB");
        let large = GlyphRenderer::new(test_font(), 160).unwrap().measure("AB");
        assert!(large.height > small.height * 3);
        assert!(large.width > small.width * 3);
    }

    #[test]
    fn origin_centers_horizontally() {
        let m = TextMetrics {
            width: 100,
            height: 80,
        };
        assert_eq!(baseline_origin(256, 256, m), (78, 148));
    }

    #[test]
    fn origin_truncates_odd_remainders() {
        let m = TextMetrics {
            width: 101,
            height: 83,
        };
        // (256 - 101) / 2 = 77, 256 / 2 + 83 / 4 = 128 + 20
        assert_eq!(baseline_origin(256, 256, m), (77, 148));
    }

    #[test]
    fn origin_goes_negative_for_wide_text() {
        let m = TextMetrics {
            width: 317,
            height: 0,
        };
        // -61 / 2 truncates toward zero
        assert_eq!(baseline_origin(256, 256, m), (-30, 128));
    }

    #[test]
    fn draw_brightens_pixels_and_keeps_opacity() {
        let mut canvas = gray_canvas();
        renderer().draw(&mut canvas, "AB");

        let touched = canvas.pixels().filter(|p| p.0 != [40, 40, 40, 255]).count();
        assert!(touched > 1000, "only {touched} pixels drawn");
        assert!(canvas.pixels().all(|p| p.0[3] == 255));
        assert!(canvas.pixels().any(|p| p.0 == FOREGROUND.0));
        // Foreground only ever lightens a darker background.
        assert!(canvas.pixels().all(|p| p.0[0] >= 40));
    }

    #[test]
    fn draw_leaves_corners_alone() {
        let mut canvas = gray_canvas();
        renderer().draw(&mut canvas, "AB");
        for (x, y) in [(0, 0), (255, 0), (0, 255), (255, 255)] {
            assert_eq!(canvas.get_pixel(x, y).0, [40, 40, 40, 255]);
        }
    }

    #[test]
    fn whitespace_draws_nothing() {
        let mut canvas = gray_canvas();
        renderer().draw(&mut canvas, "   ");
        assert!(canvas.pixels().all(|p| p.0 == [40, 40, 40, 255]));
    }

    #[test]
    fn text_wider_than_canvas_is_clipped() {
        let mut canvas = RgbaImage::from_pixel(32, 32, Rgba([40, 40, 40, 255]));
        renderer().draw(&mut canvas, "WWWWWWWW");
        assert_eq!(canvas.dimensions(), (32, 32));
    }

    #[test]
    fn huge_text_on_tiny_canvas_completes() {
        let r = GlyphRenderer::new(test_font(), 4096).unwrap();
        let mut canvas = RgbaImage::from_pixel(4, 4, Rgba([40, 40, 40, 255]));
        r.draw(&mut canvas, "MMMMMMMM");
        assert!(canvas.pixels().all(|p| p[3] == 255));
    }

    #[test]
    fn missing_code_point_is_not_an_error() {
        let mut canvas = gray_canvas();
        // Private-use code point, absent from the font.
        renderer().draw(&mut canvas, "\u{E000}\u{E001}");
        assert!(canvas.pixels().all(|p| p.0[3] == 255));
    }

    #[test]
    fn drawing_is_deterministic() {
        let r = renderer();
        let mut a = gray_canvas();
        let mut b = gray_canvas();
        r.draw(&mut a, "QZ");
        r.draw(&mut b, "QZ");
        assert_eq!(a.as_raw(), b.as_raw());
    }
}
