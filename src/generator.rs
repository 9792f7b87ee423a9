//! The avatar generator: one string in, one PNG out.
//!
//! ```text
//! generate("AB")
//!   ├─ cache hit?  → return stored bytes
//!   └─ miss:
//!        derive_color → compose (fill + glyphs) → encode_png → cache → return
//! ```
//!
//! Construction does all the fallible setup (validating dimensions, parsing
//! the font) so that a built [`Generator`] only fails on encoder errors.
//! For fixed [`AvatarOptions`], `generate` is a pure function of its input:
//! identical strings yield bit-identical bytes whether served from the cache
//! or rendered again.
//!
//! A `Generator` is `Send + Sync`. Share it behind an `Arc` or a plain
//! reference (e.g. across rayon workers); the parsed font is never mutated
//! after construction, and the cache carries its own lock.

use crate::cache::{AvatarCache, CacheMode, CacheStats};
use crate::imaging::{EncodingError, FaceError, GlyphRenderer, compose, encode_png};
use crate::initials::all_initials;
use crate::types::{CacheOutcome, RenderedAvatar};
use thiserror::Error;

/// Longest accepted canvas edge, in pixels.
pub const MAX_CANVAS_EDGE: u32 = 8192;

/// Largest accepted point size. Glyphs are rasterized at full size before
/// clipping, so the bound keeps one glyph's coverage buffer in the tens of
/// megabytes.
pub const MAX_FONT_SIZE: u32 = MAX_CANVAS_EDGE / 2;

#[derive(Error, Debug)]
pub enum ConfigurationError {
    #[error("canvas {0} must be greater than zero")]
    ZeroDimension(&'static str),
    #[error("canvas {width}x{height} exceeds the {max}px edge limit")]
    CanvasTooLarge { width: u32, height: u32, max: u32 },
    #[error("font size must be greater than zero")]
    ZeroFontSize,
    #[error("font size {size}pt exceeds the {max}pt limit")]
    FontTooLarge { size: u32, max: u32 },
    #[error("font resource is empty")]
    EmptyFont,
    #[error("font resource rejected: {0}")]
    Font(#[from] FaceError),
}

/// Everything that fixes the output of a [`Generator`].
#[derive(Debug, Clone)]
pub struct AvatarOptions {
    pub width: u32,
    pub height: u32,
    /// Point size; 1 pt renders as 1 px per em.
    pub font_size: u32,
    /// Raw TrueType/OpenType bytes.
    pub font: Vec<u8>,
    pub cache: CacheMode,
}

impl AvatarOptions {
    /// 256×256 canvas, 160 pt text, unbounded cache.
    pub fn new(font: Vec<u8>) -> Self {
        Self {
            width: 256,
            height: 256,
            font_size: 160,
            font,
            cache: CacheMode::Unbounded,
        }
    }

    pub fn caching_enabled(&self) -> bool {
        self.cache.is_enabled()
    }

    fn validate(&self) -> Result<(), ConfigurationError> {
        if self.width == 0 {
            return Err(ConfigurationError::ZeroDimension("width"));
        }
        if self.height == 0 {
            return Err(ConfigurationError::ZeroDimension("height"));
        }
        if self.width > MAX_CANVAS_EDGE || self.height > MAX_CANVAS_EDGE {
            return Err(ConfigurationError::CanvasTooLarge {
                width: self.width,
                height: self.height,
                max: MAX_CANVAS_EDGE,
            });
        }
        if self.font_size == 0 {
            return Err(ConfigurationError::ZeroFontSize);
        }
        if self.font_size > MAX_FONT_SIZE {
            return Err(ConfigurationError::FontTooLarge {
                size: self.font_size,
                max: MAX_FONT_SIZE,
            });
        }
        if self.font.is_empty() {
            return Err(ConfigurationError::EmptyFont);
        }
        Ok(())
    }
}

/// Renders initials avatars. See the [module docs](self).
pub struct Generator {
    width: u32,
    height: u32,
    renderer: GlyphRenderer,
    cache: AvatarCache,
}

impl Generator {
    /// Validate `options` and parse the font once.
    pub fn new(options: AvatarOptions) -> Result<Self, ConfigurationError> {
        options.validate()?;
        let AvatarOptions {
            width,
            height,
            font_size,
            font,
            cache,
        } = options;
        let renderer = GlyphRenderer::new(font, font_size)?;
        Ok(Self {
            width,
            height,
            renderer,
            cache: AvatarCache::new(cache),
        })
    }

    /// Render `initials` (any string) to PNG bytes.
    pub fn generate(&self, initials: &str) -> Result<RenderedAvatar, EncodingError> {
        self.render(initials).map(|(avatar, _)| avatar)
    }

    /// Like [`generate`](Self::generate), also reporting whether the cache
    /// served the result.
    pub fn render(&self, initials: &str) -> Result<(RenderedAvatar, CacheOutcome), EncodingError> {
        if !self.cache.mode().is_enabled() {
            return Ok((self.render_uncached(initials)?, CacheOutcome::Bypassed));
        }
        if let Some(avatar) = self.cache.get(initials) {
            return Ok((avatar, CacheOutcome::Hit));
        }
        let avatar = self.render_uncached(initials)?;
        self.cache.put(initials, avatar.clone());
        Ok((avatar, CacheOutcome::Miss))
    }

    /// Generate every key in `keys`, filling the cache. Stops at the first
    /// error.
    pub fn preload<I, S>(&self, keys: I) -> Result<(), EncodingError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for key in keys {
            self.generate(key.as_ref())?;
        }
        Ok(())
    }

    /// Preload all 676 two-letter uppercase initials.
    pub fn preload_all_initials(&self) -> Result<(), EncodingError> {
        self.preload(all_initials())
    }

    /// Number of cached avatars; always 0 with caching disabled.
    pub fn cache_size(&self) -> usize {
        self.cache.len()
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }

    pub fn cache_mode(&self) -> CacheMode {
        self.cache.mode()
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    fn render_uncached(&self, initials: &str) -> Result<RenderedAvatar, EncodingError> {
        let canvas = compose(&self.renderer, self.width, self.height, initials);
        Ok(encode_png(&canvas)?.into())
    }
}
