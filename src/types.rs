//! Shared value types passed between the generator, the cache, and callers.

use std::fmt;
use std::ops::Deref;
use std::sync::Arc;

/// A finished, encoded avatar (PNG bytes).
///
/// Immutable once produced. Cloning shares the underlying buffer, so a cache
/// hit hands out the stored bytes without copying them.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct RenderedAvatar(Arc<[u8]>);

impl RenderedAvatar {
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn into_vec(self) -> Vec<u8> {
        self.0.to_vec()
    }
}

impl From<Vec<u8>> for RenderedAvatar {
    fn from(bytes: Vec<u8>) -> Self {
        Self(bytes.into())
    }
}

impl Deref for RenderedAvatar {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        &self.0
    }
}

impl AsRef<[u8]> for RenderedAvatar {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Debug for RenderedAvatar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RenderedAvatar({} bytes)", self.0.len())
    }
}

/// Where a generated avatar came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheOutcome {
    /// Served from the cache.
    Hit,
    /// Rendered and stored in the cache.
    Miss,
    /// Rendered; caching is disabled.
    Bypassed,
}
