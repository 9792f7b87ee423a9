//! In-memory avatar cache.
//!
//! Rendering an avatar costs a few milliseconds: fill, rasterize two glyphs,
//! deflate. Serving the same initials again should cost a hash lookup. This
//! module memoizes encoded avatars keyed by the input string.
//!
//! # Eviction policy
//!
//! The key space in normal use is small (676 two-letter combinations), but
//! nothing stops a caller from passing arbitrary strings. Growth is therefore
//! a stated choice, picked through [`CacheMode`]:
//!
//! | Mode | Behavior |
//! |---|---|
//! | `Disabled` | Never stores anything; `len()` is always 0 |
//! | `Unbounded` | Keeps every entry for the lifetime of the cache |
//! | `Lru { capacity }` | Evicts the least recently used entry once over capacity |
//! | `Expiring { ttl }` | Entries older than `ttl` read as absent and are purged |
//!
//! # Concurrency
//!
//! All state sits behind one mutex. Callers never hold it while rendering,
//! so two threads asking for the same missing key may both render it; the
//! bytes are identical, and the second `put` simply overwrites the first.

use crate::types::RenderedAvatar;
use lru::LruCache;
use std::collections::HashMap;
use std::fmt;
use std::num::NonZeroUsize;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

/// Cache eviction policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheMode {
    Disabled,
    Unbounded,
    Lru { capacity: NonZeroUsize },
    Expiring { ttl: Duration },
}

impl CacheMode {
    pub fn is_enabled(self) -> bool {
        self != CacheMode::Disabled
    }
}

/// Hit/miss counters for the lifetime of a cache.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
}

impl CacheStats {
    pub fn total(&self) -> u64 {
        self.hits + self.misses
    }
}

impl fmt::Display for CacheStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.hits > 0 {
            write!(
                f,
                "{} cached, {} rendered ({} total)",
                self.hits,
                self.misses,
                self.total()
            )
        } else {
            write!(f, "{} rendered", self.misses)
        }
    }
}

/// Entry storage, one shape per [`CacheMode`].
enum Store {
    Disabled,
    Unbounded(HashMap<String, RenderedAvatar>),
    Lru(LruCache<String, RenderedAvatar>),
    Expiring {
        ttl: Duration,
        entries: HashMap<String, (RenderedAvatar, Instant)>,
    },
}

impl Store {
    fn new(mode: CacheMode) -> Self {
        match mode {
            CacheMode::Disabled => Store::Disabled,
            CacheMode::Unbounded => Store::Unbounded(HashMap::new()),
            CacheMode::Lru { capacity } => Store::Lru(LruCache::new(capacity)),
            CacheMode::Expiring { ttl } => Store::Expiring {
                ttl,
                entries: HashMap::new(),
            },
        }
    }

    fn get(&mut self, key: &str, now: Instant) -> Option<RenderedAvatar> {
        match self {
            Store::Disabled => None,
            Store::Unbounded(entries) => entries.get(key).cloned(),
            // `LruCache::get` promotes the entry to most recently used.
            Store::Lru(entries) => entries.get(key).cloned(),
            Store::Expiring { ttl, entries } => {
                let (value, inserted) = entries.get(key)?;
                if now.duration_since(*inserted) < *ttl {
                    return Some(value.clone());
                }
                entries.remove(key);
                None
            }
        }
    }

    fn put(&mut self, key: String, value: RenderedAvatar, now: Instant) {
        match self {
            Store::Disabled => {}
            Store::Unbounded(entries) => {
                entries.insert(key, value);
            }
            Store::Lru(entries) => {
                entries.put(key, value);
            }
            Store::Expiring { ttl, entries } => {
                drop_expired(entries, *ttl, now);
                entries.insert(key, (value, now));
            }
        }
    }

    fn len(&mut self, now: Instant) -> usize {
        self.purge_expired(now);
        match self {
            Store::Disabled => 0,
            Store::Unbounded(entries) => entries.len(),
            Store::Lru(entries) => entries.len(),
            Store::Expiring { entries, .. } => entries.len(),
        }
    }

    fn purge_expired(&mut self, now: Instant) {
        if let Store::Expiring { ttl, entries } = self {
            drop_expired(entries, *ttl, now);
        }
    }
}

fn drop_expired(
    entries: &mut HashMap<String, (RenderedAvatar, Instant)>,
    ttl: Duration,
    now: Instant,
) {
    entries.retain(|_, (_, inserted)| now.duration_since(*inserted) < ttl);
}

struct CacheState {
    store: Store,
    stats: CacheStats,
}

/// Thread-safe memo of rendered avatars.
pub struct AvatarCache {
    mode: CacheMode,
    state: Mutex<CacheState>,
}

impl AvatarCache {
    pub fn new(mode: CacheMode) -> Self {
        Self {
            mode,
            state: Mutex::new(CacheState {
                store: Store::new(mode),
                stats: CacheStats::default(),
            }),
        }
    }

    pub fn mode(&self) -> CacheMode {
        self.mode
    }

    /// Look up `key`. Counts a hit or a miss unless the cache is disabled.
    pub fn get(&self, key: &str) -> Option<RenderedAvatar> {
        self.get_at(key, Instant::now())
    }

    /// Insert or overwrite `key`. A no-op when the cache is disabled.
    pub fn put(&self, key: impl Into<String>, value: RenderedAvatar) {
        self.put_at(key.into(), value, Instant::now());
    }

    /// Number of live entries.
    pub fn len(&self) -> usize {
        self.len_at(Instant::now())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn stats(&self) -> CacheStats {
        self.state().stats
    }

    fn get_at(&self, key: &str, now: Instant) -> Option<RenderedAvatar> {
        if !self.mode.is_enabled() {
            return None;
        }
        let mut state = self.state();
        let found = state.store.get(key, now);
        match found {
            Some(_) => state.stats.hits += 1,
            None => state.stats.misses += 1,
        }
        found
    }

    fn put_at(&self, key: String, value: RenderedAvatar, now: Instant) {
        if !self.mode.is_enabled() {
            return;
        }
        self.state().store.put(key, value, now);
    }

    fn len_at(&self, now: Instant) -> usize {
        self.state().store.len(now)
    }

    /// Every critical section leaves the state consistent, so a panic on
    /// another thread cannot corrupt it; keep serving after poisoning.
    fn state(&self) -> MutexGuard<'_, CacheState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
