//! # Initials Avatar
//!
//! Deterministic avatar images from initials. `"AB"` always becomes the
//! same 256×256 PNG: a solid background picked from the letters, with the
//! letters drawn in white, bold, centered.
//!
//! ```no_run
//! use initials_avatar::{AvatarOptions, Generator, font::FontSource};
//!
//! let font = FontSource::Embedded.load()?;
//! let generator = Generator::new(AvatarOptions::new(font))?;
//! let png = generator.generate("AB")?;
//! std::fs::write("AB.png", &png)?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! # Architecture: One Pipeline, One Cache
//!
//! ```text
//! generate("AB")
//!   1. Cache     key → stored bytes?              (hit: done)
//!   2. Color     "AB" → Rgba(133, 76, 179, 255)
//!   3. Compose   fill canvas, rasterize glyphs
//!   4. Encode    canvas → PNG bytes
//!   5. Store     key → bytes
//! ```
//!
//! Every stage except the cache is a pure function of its input, which is
//! what makes caching safe: the cache can only ever return bytes that a
//! fresh render would have produced.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`generator`] | [`Generator`]: construction, `generate`, `preload`, cache size |
//! | [`imaging`] | Color derivation, glyph rendering, composition, PNG encoding |
//! | [`cache`] | Thread-safe memo with an explicit eviction policy |
//! | [`initials`] | The 676 two-letter keys and a seedable random source |
//! | [`font`] | Embedded or on-disk font bytes |
//! | [`config`] | `avatar.toml` loading, merging, and validation |
//! | [`bulk`] | Writing one or many avatars to disk, plus a manifest |
//! | [`output`] | CLI output formatting |
//! | [`types`] | Shared value types ([`RenderedAvatar`], [`CacheOutcome`]) |
//!
//! # Design Decisions
//!
//! ## Determinism Over Everything
//!
//! Avatars get cached by browsers, CDNs, and this crate. Any drift in output
//! bytes for the same input would be a cache-busting bug, so the PNG encoder
//! runs with explicitly pinned settings and the color is plain integer
//! arithmetic on code points.
//!
//! ## Parse the Font Once
//!
//! Font parsing is the only expensive setup step. A [`Generator`] parses the
//! font at construction and holds it immutably; rendering borrows it. This
//! also moves every configuration error to construction time, so a built
//! generator can only fail while encoding.
//!
//! ## Explicit Cache Policy
//!
//! In normal use there are 676 possible keys and an unbounded cache is fine.
//! The generator accepts any string, though, so the policy is a named choice
//! ([`CacheMode`]): disabled, unbounded, LRU with a capacity, or TTL.
//!
//! ## Embedded Font
//!
//! DejaVu Sans Bold ships inside the binary. The tool works on a machine
//! with no fonts installed, and output does not depend on whatever fonts the
//! host happens to have.

pub mod bulk;
pub mod cache;
pub mod config;
pub mod font;
pub mod generator;
pub mod imaging;
pub mod initials;
pub mod output;
pub mod types;

pub use cache::{CacheMode, CacheStats};
pub use generator::{AvatarOptions, ConfigurationError, Generator};
pub use imaging::{EncodingError, derive_color};
pub use initials::{InitialsSource, RandomInitials, all_initials};
pub use types::{CacheOutcome, RenderedAvatar};

#[cfg(test)]
pub(crate) mod test_helpers;
