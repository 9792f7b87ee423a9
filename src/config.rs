//! Generator configuration module.
//!
//! Handles loading, validating, and merging an `avatar.toml` file on top of
//! stock defaults. Every key is optional; a file only needs the values it
//! wants to change.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [canvas]
//! width = 256               # Output width in pixels
//! height = 256              # Output height in pixels
//!
//! [font]
//! size = 160                # Point size (1pt = 1px per em)
//! # path = "fonts/MyBold.ttf"  # Omit to use the embedded font
//!
//! [cache]
//! policy = "unbounded"      # none | unbounded | lru | ttl
//! capacity = 1024           # Max entries for "lru"
//! ttl_secs = 3600           # Entry lifetime for "ttl"
//!
//! [processing]
//! max_processes = 4         # Max parallel workers (omit for auto = CPU cores)
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use crate::cache::CacheMode;
use crate::generator::AvatarOptions;
use serde::{Deserialize, Serialize};
use std::fs;
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Generator configuration loaded from `avatar.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AvatarConfig {
    /// Output dimensions.
    pub canvas: CanvasConfig,
    /// Font size and optional font file.
    pub font: FontConfig,
    /// Memoization policy.
    pub cache: CacheConfig,
    /// Parallel generation settings.
    pub processing: ProcessingConfig,
}

impl AvatarConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.canvas.width == 0 || self.canvas.height == 0 {
            return Err(ConfigError::Validation(
                "canvas.width and canvas.height must be non-zero".into(),
            ));
        }
        if self.font.size == 0 {
            return Err(ConfigError::Validation("font.size must be non-zero".into()));
        }
        match self.cache.policy {
            CachePolicy::Lru if self.cache.capacity == 0 => Err(ConfigError::Validation(
                "cache.capacity must be non-zero for the lru policy".into(),
            )),
            CachePolicy::Ttl if self.cache.ttl_secs == 0 => Err(ConfigError::Validation(
                "cache.ttl_secs must be non-zero for the ttl policy".into(),
            )),
            _ => Ok(()),
        }
    }

    /// Resolve the cache section into a typed [`CacheMode`].
    ///
    /// Assumes [`validate`](Self::validate) passed; zero values fall back to
    /// the defaults.
    pub fn cache_mode(&self) -> CacheMode {
        match self.cache.policy {
            CachePolicy::Disabled => CacheMode::Disabled,
            CachePolicy::Unbounded => CacheMode::Unbounded,
            CachePolicy::Lru => CacheMode::Lru {
                capacity: NonZeroUsize::new(self.cache.capacity).unwrap_or(FALLBACK_CAPACITY),
            },
            CachePolicy::Ttl => CacheMode::Expiring {
                ttl: Duration::from_secs(self.cache.ttl_secs.max(1)),
            },
        }
    }

    /// Build generator options around already-loaded font bytes.
    pub fn to_options(&self, font: Vec<u8>) -> AvatarOptions {
        AvatarOptions {
            width: self.canvas.width,
            height: self.canvas.height,
            font_size: self.font.size,
            font,
            cache: self.cache_mode(),
        }
    }
}

/// Output canvas settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CanvasConfig {
    pub width: u32,
    pub height: u32,
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            width: 256,
            height: 256,
        }
    }
}

/// Font settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FontConfig {
    /// Point size of the initials.
    pub size: u32,
    /// TrueType/OpenType file to use instead of the embedded font.
    /// Relative paths resolve against the config file's directory.
    pub path: Option<PathBuf>,
}

impl Default for FontConfig {
    fn default() -> Self {
        Self {
            size: 160,
            path: None,
        }
    }
}

/// Cache eviction policy names as written in `avatar.toml`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CachePolicy {
    #[serde(rename = "none")]
    Disabled,
    #[default]
    Unbounded,
    Lru,
    Ttl,
}

const DEFAULT_CACHE_CAPACITY: usize = 1024;
const FALLBACK_CAPACITY: NonZeroUsize = NonZeroUsize::new(DEFAULT_CACHE_CAPACITY).unwrap();
const DEFAULT_CACHE_TTL_SECS: u64 = 3600;

/// Cache settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CacheConfig {
    pub policy: CachePolicy,
    /// Max entries, only used by the `lru` policy.
    pub capacity: usize,
    /// Entry lifetime in seconds, only used by the `ttl` policy.
    pub ttl_secs: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            policy: CachePolicy::default(),
            capacity: DEFAULT_CACHE_CAPACITY,
            ttl_secs: DEFAULT_CACHE_TTL_SECS,
        }
    }
}

/// Parallel processing settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProcessingConfig {
    /// Maximum number of parallel workers for bulk generation.
    /// When absent, defaults to the number of CPU cores.
    /// Values larger than the core count are clamped down.
    pub max_processes: Option<usize>,
}

/// Resolve the effective thread count from config.
///
/// - `None` → use all available cores
/// - `Some(n)` → use `min(n, cores)` (user can constrain down, not up)
pub fn effective_threads(config: &ProcessingConfig) -> usize {
    let cores = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1);
    config
        .max_processes
        .map(|n| n.clamp(1, cores))
        .unwrap_or(cores)
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
pub fn stock_defaults_value() -> Result<toml::Value, ConfigError> {
    toml::Value::try_from(AvatarConfig::default())
        .map_err(|e| ConfigError::Validation(format!("default config must serialize: {e}")))
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Merge an optional overlay onto the stock defaults, then deserialize and
/// validate.
pub fn resolve_config(overlay: Option<toml::Value>) -> Result<AvatarConfig, ConfigError> {
    let base = stock_defaults_value()?;
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: AvatarConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load config from an explicit file, or stock defaults when `path` is `None`.
///
/// A relative `font.path` is rewritten to be relative to the config file's
/// directory, so a config works regardless of the caller's working directory.
pub fn load_config(path: Option<&Path>) -> Result<AvatarConfig, ConfigError> {
    let Some(path) = path else {
        return resolve_config(None);
    };
    let content = fs::read_to_string(path)?;
    let overlay: toml::Value = toml::from_str(&content)?;
    let mut config = resolve_config(Some(overlay))?;
    if let (Some(font), Some(dir)) = (config.font.path.as_mut(), path.parent())
        && font.is_relative()
    {
        *font = dir.join(&*font);
    }
    Ok(config)
}

/// Returns a fully-commented stock `avatar.toml` with all keys and explanations.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# Initials Avatar Configuration
# =============================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults.
# Unknown keys will cause an error.

# ---------------------------------------------------------------------------
# Canvas
# ---------------------------------------------------------------------------
[canvas]
# Output image size in pixels.
width = 256
height = 256

# ---------------------------------------------------------------------------
# Font
# ---------------------------------------------------------------------------
[font]
# Point size of the initials. One point renders as one pixel per em.
size = 160

# TrueType/OpenType file to render with, relative to this file.
# Omit to use the embedded DejaVu Sans Bold.
# path = "fonts/MyBold.ttf"

# ---------------------------------------------------------------------------
# Cache
# ---------------------------------------------------------------------------
[cache]
# Eviction policy for rendered avatars:
#   none      - never cache
#   unbounded - keep everything (fine for the 676 two-letter keys)
#   lru       - keep at most `capacity` entries, evict least recently used
#   ttl       - drop entries older than `ttl_secs`
policy = "unbounded"

# Max entries for the lru policy.
capacity = 1024

# Entry lifetime in seconds for the ttl policy.
ttl_secs = 3600

# ---------------------------------------------------------------------------
# Processing
# ---------------------------------------------------------------------------
[processing]
# Maximum parallel workers for bulk generation.
# Omit or comment out to auto-detect (= number of CPU cores).
# max_processes = 4
"##
}
