//! Writing avatars to disk.
//!
//! The generator produces bytes; this module decides where they go. Two
//! entry points:
//!
//! - [`write_single`]: one avatar to one path, parent directories created.
//! - [`generate_all`]: many avatars into one directory, in parallel, plus a
//!   `manifest.json` describing what was written.
//!
//! ## Output Structure
//!
//! ```text
//! avatars/
//! ├── manifest.json     # canvas size + per-avatar file, size, SHA-256
//! ├── AA.png
//! ├── AB.png
//! └── ...
//! ```
//!
//! ## Parallel Processing
//!
//! Keys are rendered on the global [rayon](https://docs.rs/rayon) pool. The
//! generator is shared by reference across workers; the manifest keeps the
//! input order regardless of which worker finished first.

use crate::cache::CacheStats;
use crate::generator::Generator;
use crate::imaging::EncodingError;
use crate::types::{CacheOutcome, RenderedAvatar};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::mpsc::Sender;
use thiserror::Error;

/// Name of the manifest written next to the avatars.
pub const MANIFEST_FILENAME: &str = "manifest.json";

#[derive(Error, Debug)]
pub enum BulkError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("{0}")]
    Encoding(#[from] EncodingError),
    #[error("cannot use {0:?} as a file name (letters, digits, '-' and '_' only)")]
    InvalidKey(String),
}

/// Progress reported while writing avatars.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BulkEvent {
    Started {
        total: usize,
        output_dir: PathBuf,
    },
    Written {
        initials: String,
        file: String,
        bytes: usize,
        outcome: CacheOutcome,
    },
}

/// Description of a directory of generated avatars.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AvatarManifest {
    pub width: u32,
    pub height: u32,
    pub avatars: Vec<AvatarEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AvatarEntry {
    pub initials: String,
    /// File name relative to the output directory.
    pub file: String,
    pub bytes: usize,
    /// Hex SHA-256 of the file contents.
    pub sha256: String,
}

/// Outcome of a [`generate_all`] run.
#[derive(Debug)]
pub struct BulkResult {
    pub manifest: AvatarManifest,
    /// Cache hits and renders during this run only.
    pub stats: CacheStats,
}

/// Render one avatar and write it to `path`.
pub fn write_single(
    generator: &Generator,
    initials: &str,
    path: &Path,
) -> Result<RenderedAvatar, BulkError> {
    let avatar = generator.generate(initials)?;
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, &avatar)?;
    Ok(avatar)
}

/// Render every key into `output_dir/<KEY>.png` and write the manifest.
///
/// Duplicate keys are written once. Keys must be usable as file names.
pub fn generate_all(
    generator: &Generator,
    keys: &[String],
    output_dir: &Path,
    progress: Option<Sender<BulkEvent>>,
) -> Result<BulkResult, BulkError> {
    let mut seen = HashSet::new();
    let keys: Vec<&str> = keys
        .iter()
        .map(String::as_str)
        .filter(|k| seen.insert(*k))
        .collect();
    if let Some(bad) = keys.iter().find(|k| !is_valid_key(k)) {
        return Err(BulkError::InvalidKey(bad.to_string()));
    }

    fs::create_dir_all(output_dir)?;
    if let Some(tx) = &progress {
        // A dropped receiver only loses progress lines.
        let _ = tx.send(BulkEvent::Started {
            total: keys.len(),
            output_dir: output_dir.to_path_buf(),
        });
    }

    let written = keys
        .par_iter()
        .map(|key| -> Result<(AvatarEntry, CacheOutcome), BulkError> {
            let (avatar, outcome) = generator.render(key)?;
            let file = avatar_filename(key);
            fs::write(output_dir.join(&file), &avatar)?;
            if let Some(tx) = &progress {
                let _ = tx.send(BulkEvent::Written {
                    initials: key.to_string(),
                    file: file.clone(),
                    bytes: avatar.len(),
                    outcome,
                });
            }
            let entry = AvatarEntry {
                initials: key.to_string(),
                file,
                bytes: avatar.len(),
                sha256: sha256_hex(&avatar),
            };
            Ok((entry, outcome))
        })
        .collect::<Result<Vec<_>, _>>()?;

    let mut stats = CacheStats::default();
    let mut avatars = Vec::with_capacity(written.len());
    for (entry, outcome) in written {
        match outcome {
            CacheOutcome::Hit => stats.hits += 1,
            CacheOutcome::Miss | CacheOutcome::Bypassed => stats.misses += 1,
        }
        avatars.push(entry);
    }

    let manifest = AvatarManifest {
        width: generator.width(),
        height: generator.height(),
        avatars,
    };
    let json = serde_json::to_string_pretty(&manifest)?;
    fs::write(output_dir.join(MANIFEST_FILENAME), json)?;

    Ok(BulkResult { manifest, stats })
}

/// Read a manifest previously written by [`generate_all`].
pub fn load_manifest(output_dir: &Path) -> Result<AvatarManifest, BulkError> {
    let content = fs::read_to_string(output_dir.join(MANIFEST_FILENAME))?;
    Ok(serde_json::from_str(&content)?)
}

/// `AB` → `AB.png`.
pub fn avatar_filename(initials: &str) -> String {
    format!("{initials}.png")
}

/// SHA-256 of `bytes` as lowercase hex.
pub fn sha256_hex(bytes: &[u8]) -> String {
    format!("{:x}", Sha256::digest(bytes))
}

fn is_valid_key(key: &str) -> bool {
    !key.is_empty()
        && key
            .chars()
            .all(|c| c.is_alphanumeric() || c == '-' || c == '_')
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::CacheMode;
    use crate::test_helpers::{decode, generator};
    use std::sync::mpsc;
    use tempfile::TempDir;

    fn keys(list: &[&str]) -> Vec<String> {
        list.iter().map(|k| k.to_string()).collect()
    }

    // =========================================================================
    // write_single
    // =========================================================================

    #[test]
    fn write_single_creates_parent_dirs() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("nested/deeper/AB.png");
        let g = generator(CacheMode::Disabled);

        let avatar = write_single(&g, "AB", &path).unwrap();

        assert_eq!(fs::read(&path).unwrap(), avatar.as_bytes());
        assert_eq!(decode(&fs::read(&path).unwrap()).dimensions(), (256, 256));
    }

    #[test]
    fn write_single_accepts_any_initials() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("out.png");
        let g = generator(CacheMode::Disabled);
        write_single(&g, "名前", &path).unwrap();
        assert!(path.exists());
    }

    // =========================================================================
    // generate_all
    // =========================================================================

    #[test]
    fn generate_all_writes_files_and_manifest() {
        let tmp = TempDir::new().unwrap();
        let out = tmp.path().join("avatars");
        let g = generator(CacheMode::Unbounded);

        let result = generate_all(&g, &keys(&["AB", "CD", "EF"]), &out, None).unwrap();

        for key in ["AB", "CD", "EF"] {
            assert!(out.join(format!("{key}.png")).exists(), "{key}.png missing");
        }
        assert_eq!(result.manifest.avatars.len(), 3);
        assert_eq!(load_manifest(&out).unwrap(), result.manifest);
    }

    #[test]
    fn manifest_keeps_input_order() {
        let tmp = TempDir::new().unwrap();
        let g = generator(CacheMode::Disabled);
        let result = generate_all(&g, &keys(&["ZZ", "AA", "MM"]), tmp.path(), None).unwrap();
        let order: Vec<&str> = result
            .manifest
            .avatars
            .iter()
            .map(|a| a.initials.as_str())
            .collect();
        assert_eq!(order, vec!["ZZ", "AA", "MM"]);
    }

    #[test]
    fn manifest_hashes_match_files() {
        let tmp = TempDir::new().unwrap();
        let g = generator(CacheMode::Disabled);
        let result = generate_all(&g, &keys(&["QR", "ST"]), tmp.path(), None).unwrap();
        for entry in &result.manifest.avatars {
            let bytes = fs::read(tmp.path().join(&entry.file)).unwrap();
            assert_eq!(bytes.len(), entry.bytes);
            assert_eq!(sha256_hex(&bytes), entry.sha256);
        }
        assert_eq!((result.manifest.width, result.manifest.height), (256, 256));
    }

    #[test]
    fn duplicate_keys_written_once() {
        let tmp = TempDir::new().unwrap();
        let g = generator(CacheMode::Unbounded);
        let result = generate_all(&g, &keys(&["AB", "AB", "CD"]), tmp.path(), None).unwrap();
        assert_eq!(result.manifest.avatars.len(), 2);
    }

    #[test]
    fn invalid_key_rejected_before_writing() {
        let tmp = TempDir::new().unwrap();
        let out = tmp.path().join("out");
        let g = generator(CacheMode::Disabled);
        let err = generate_all(&g, &keys(&["AB", "../x"]), &out, None).unwrap_err();
        assert!(matches!(err, BulkError::InvalidKey(k) if k == "../x"));
        assert!(!out.exists());
    }

    #[test]
    fn empty_key_rejected() {
        let tmp = TempDir::new().unwrap();
        let g = generator(CacheMode::Disabled);
        assert!(generate_all(&g, &keys(&[""]), tmp.path(), None).is_err());
    }

    #[test]
    fn stats_reflect_cache_hits() {
        let tmp = TempDir::new().unwrap();
        let g = generator(CacheMode::Unbounded);
        let list = keys(&["AB", "CD"]);

        let first = generate_all(&g, &list, tmp.path(), None).unwrap();
        assert_eq!(first.stats, CacheStats { hits: 0, misses: 2 });

        let second = generate_all(&g, &list, tmp.path(), None).unwrap();
        assert_eq!(second.stats, CacheStats { hits: 2, misses: 0 });
        assert_eq!(first.manifest, second.manifest);
    }

    #[test]
    fn progress_events_are_sent() {
        let tmp = TempDir::new().unwrap();
        let g = generator(CacheMode::Disabled);
        let (tx, rx) = mpsc::channel();

        generate_all(&g, &keys(&["AB", "CD"]), tmp.path(), Some(tx)).unwrap();

        let events: Vec<BulkEvent> = rx.iter().collect();
        assert_eq!(events.len(), 3);
        assert!(matches!(&events[0], BulkEvent::Started { total: 2, .. }));
        let mut written: Vec<&str> = events[1..]
            .iter()
            .map(|e| match e {
                BulkEvent::Written {
                    initials, outcome, ..
                } => {
                    assert_eq!(*outcome, CacheOutcome::Bypassed);
                    initials.as_str()
                }
                other => panic!("unexpected event {other:?}"),
            })
            .collect();
        written.sort();
        assert_eq!(written, vec!["AB", "CD"]);
    }

    #[test]
    fn dropped_receiver_does_not_fail() {
        let tmp = TempDir::new().unwrap();
        let g = generator(CacheMode::Disabled);
        let (tx, rx) = mpsc::channel();
        drop(rx);
        assert!(generate_all(&g, &keys(&["AB"]), tmp.path(), Some(tx)).is_ok());
    }

    // =========================================================================
    // Helpers
    // =========================================================================

    #[test]
    fn filename_appends_png() {
        assert_eq!(avatar_filename("AB"), "AB.png");
    }

    #[test]
    fn sha256_hex_known_value() {
        assert_eq!(
            sha256_hex(b"abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn key_validation() {
        assert!(is_valid_key("AB"));
        assert!(is_valid_key("jd-2"));
        assert!(!is_valid_key(""));
        assert!(!is_valid_key("a/b"));
        assert!(!is_valid_key(".."));
    }
}
