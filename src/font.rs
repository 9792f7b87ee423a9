//! Font resource loading.
//!
//! The generator only ever sees font *bytes*; where they come from is decided
//! here. The default is DejaVu Sans Bold compiled into the binary, so the
//! tool works with no font installed. A TrueType/OpenType file on disk can be
//! used instead via config or `--font`.

use std::path::{Path, PathBuf};
use thiserror::Error;

/// DejaVu Sans Bold, see `fonts/LICENSE-DejaVu`.
pub const EMBEDDED_FONT: &[u8] = include_bytes!("../fonts/DejaVuSans-Bold.ttf");

#[derive(Error, Debug)]
pub enum FontError {
    #[error("cannot read font {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Where the outline font comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FontSource {
    Embedded,
    File(PathBuf),
}

impl FontSource {
    /// Pick the source for an optional configured path.
    pub fn from_path(path: Option<&Path>) -> Self {
        match path {
            Some(p) => FontSource::File(p.to_path_buf()),
            None => FontSource::Embedded,
        }
    }

    /// Read the raw font bytes. Parsing happens later, in the generator.
    pub fn load(&self) -> Result<Vec<u8>, FontError> {
        match self {
            FontSource::Embedded => Ok(EMBEDDED_FONT.to_vec()),
            FontSource::File(path) => std::fs::read(path).map_err(|source| FontError::Io {
                path: path.clone(),
                source,
            }),
        }
    }
}
