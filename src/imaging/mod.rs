//! Avatar rendering in pure Rust.
//!
//! | Stage | Crate / function |
//! |---|---|
//! | **Background color** | [`derive_color`] (code-point sum, no crate) |
//! | **Font parse + metrics** | `ab_glyph::FontVec`, `ScaleFont` |
//! | **Glyph coverage** | `ab_glyph::OutlinedGlyph::draw` |
//! | **Canvas** | `image::RgbaImage` |
//! | **PNG** | `image::codecs::png::PngEncoder` with pinned settings |
//!
//! The module is split into:
//! - **Color**: string → background, pure arithmetic (unit testable)
//! - **Glyph**: [`GlyphRenderer`] owns the parsed font, measures and draws text
//! - **Canvas**: [`compose`] fills the background and draws the text
//! - **Encoder**: [`encode_png`] turns a finished canvas into bytes

mod canvas;
mod color;
mod encoder;
mod glyph;

pub use canvas::compose;
pub use color::derive_color;
pub use encoder::{EncodingError, encode_png};
pub use glyph::{FOREGROUND, FaceError, GlyphRenderer, TextMetrics, baseline_origin};
