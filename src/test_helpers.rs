//! Shared test utilities.
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let g = generator(CacheMode::Unbounded);
//! let img = decode(&g.generate("AB").unwrap());
//! assert_eq!(img.dimensions(), (256, 256));
//! ```

use crate::cache::CacheMode;
use crate::font::EMBEDDED_FONT;
use crate::generator::{AvatarOptions, Generator};
use image::{ImageFormat, RgbaImage};

/// The bundled bold font.
pub fn test_font() -> Vec<u8> {
    EMBEDDED_FONT.to_vec()
}

/// A 256×256, 160 pt generator with the given cache mode.
pub fn generator(cache: CacheMode) -> Generator {
    let mut options = AvatarOptions::new(test_font());
    options.cache = cache;
    Generator::new(options).unwrap()
}

/// Decode PNG bytes into an RGBA buffer. Panics if not a PNG.
pub fn decode(bytes: &[u8]) -> RgbaImage {
    image::load_from_memory_with_format(bytes, ImageFormat::Png)
        .unwrap_or_else(|e| panic!("output is not a decodable PNG: {e}"))
        .to_rgba8()
}

