//! Story file discovery and reading.

use std::io;
use std::path::{Path, PathBuf};

use crate::error::CliError;

/// Any story path containing this marker is a template, not a story.
const TEMPLATE_MARKER: &str = "_template";

/// All `*.md` files below `stories_root`, sorted, skipping paths that contain `_template`.
///
/// A missing stories directory yields an empty list.
pub fn discover_stories(stories_root: &Path) -> Result<Vec<PathBuf>, CliError> {
    if !stories_root.is_dir() {
        tracing::debug!(path = %stories_root.display(), "stories directory absent");
        return Ok(Vec::new());
    }

    let pattern = format!(
        "{}/**/*.md",
        glob::Pattern::escape(&stories_root.to_string_lossy())
    );
    let entries = glob::glob(&pattern).map_err(|e| anyhow::anyhow!("bad glob pattern: {e}"))?;

    let mut files = Vec::new();
    for entry in entries {
        match entry {
            Ok(path) if path.is_file() && !is_template(stories_root, &path) => files.push(path),
            Ok(_) => {}
            Err(e) => tracing::warn!(path = %e.path().display(), "skipping unreadable path"),
        }
    }

    files.sort();
    tracing::debug!(count = files.len(), "discovered story files");
    Ok(files)
}

fn is_template(stories_root: &Path, path: &Path) -> bool {
    path.strip_prefix(stories_root)
        .unwrap_or(path)
        .to_string_lossy()
        .contains(TEMPLATE_MARKER)
}

/// Read a UTF-8 file, reporting a missing file as not-found.
pub async fn read_text(path: &Path, kind: &str) -> Result<String, CliError> {
    tokio::fs::read_to_string(path).await.map_err(|e| match e.kind() {
        io::ErrorKind::NotFound => CliError::not_found(kind, path.display().to_string()),
        _ => CliError::io_with_path(format!("Failed to read {}", path.display()), e, path),
    })
}
