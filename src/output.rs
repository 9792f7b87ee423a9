//! CLI output formatting.
//!
//! # Output Format
//!
//! ## single
//!
//! ```text
//! AB → out/AB.png (1843 bytes)
//! ```
//!
//! ## all / sample
//!
//! ```text
//! Generating 676 avatars → avatars/
//!     AA.png  rendered  1702 bytes
//!     AB.png  cached    1843 bytes
//!     ...
//! Wrote 676 avatars + manifest.json
//! Cache: 12 cached, 664 rendered (676 total)
//! ```
//!
//! # Architecture
//!
//! Each command has a `format_*` function (returns `Vec<String>`) for
//! testability and, where useful, a `print_*` wrapper that writes to stdout.
//! Format functions are pure: no I/O.

use crate::bulk::{BulkEvent, BulkResult, MANIFEST_FILENAME};
use crate::types::CacheOutcome;
use std::path::Path;

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

fn avatar_noun(count: usize) -> &'static str {
    if count == 1 { "avatar" } else { "avatars" }
}

fn outcome_label(outcome: CacheOutcome) -> &'static str {
    match outcome {
        CacheOutcome::Hit => "cached",
        CacheOutcome::Miss | CacheOutcome::Bypassed => "rendered",
    }
}

/// Format the result of a `single` command.
pub fn format_single_output(initials: &str, path: &Path, bytes: usize) -> Vec<String> {
    vec![format!("{} → {} ({} bytes)", initials, path.display(), bytes)]
}

pub fn print_single_output(initials: &str, path: &Path, bytes: usize) {
    for line in format_single_output(initials, path, bytes) {
        println!("{}", line);
    }
}

/// Format a single bulk progress event as display lines.
pub fn format_bulk_event(event: &BulkEvent) -> Vec<String> {
    match event {
        BulkEvent::Started { total, output_dir } => {
            vec![format!(
                "Generating {} {} → {}/",
                total,
                avatar_noun(*total),
                output_dir.display()
            )]
        }
        BulkEvent::Written {
            file,
            bytes,
            outcome,
            ..
        } => vec![format!(
            "{}{}  {:<8}  {} bytes",
            indent(1),
            file,
            outcome_label(*outcome),
            bytes
        )],
    }
}

/// Format the closing summary of a bulk run.
pub fn format_bulk_summary(result: &BulkResult) -> Vec<String> {
    vec![
        format!(
            "Wrote {} {} + {}",
            result.manifest.avatars.len(),
            avatar_noun(result.manifest.avatars.len()),
            MANIFEST_FILENAME
        ),
        format!("Cache: {}", result.stats),
    ]
}

pub fn print_bulk_summary(result: &BulkResult) {
    for line in format_bulk_summary(result) {
        println!("{}", line);
    }
}
