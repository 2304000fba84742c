//! Narrative root discovery and standard paths.

use std::path::{Path, PathBuf};

use serde::Serialize;

/// Marker file of a narrative repository.
pub const ROOT_MARKER: &str = "NARA.md";
/// Project configuration file, also accepted as a root marker.
pub const PROJECT_CONFIG: &str = "nara.json";
/// Subdirectory used when Nara is adopted into an existing codebase.
pub const ADOPTED_DIR: &str = "nara";
/// Per-user state directory below the narrative root.
pub const USER_DIR: &str = ".nara";

/// How the narrative layer sits in the repository.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RootMode {
    /// The repository itself is the narrative root.
    Fresh,
    /// The narrative layer lives in a `nara/` subdirectory.
    Adopted,
}

impl RootMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Fresh => "fresh",
            Self::Adopted => "adopted",
        }
    }
}

/// A discovered narrative root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NarrativeRoot {
    /// Directory holding `NARA.md` / `nara.json`.
    pub root: PathBuf,
    pub mode: RootMode,
    /// Repository directory the root was found in.
    pub repo_root: PathBuf,
}

/// Walk up from `start` looking for a narrative root.
///
/// At each level the adopted `nara/NARA.md` wins over a local `NARA.md`;
/// `nara.json` is only consulted when neither marker file exists.
pub fn find_narrative_root(start: impl AsRef<Path>) -> Option<NarrativeRoot> {
    let mut current = start.as_ref().to_path_buf();

    loop {
        if let Some(found) = root_at(&current) {
            tracing::debug!(root = %found.root.display(), mode = found.mode.as_str(), "found narrative root");
            return Some(found);
        }

        if !current.pop() {
            return None;
        }
    }
}

fn root_at(dir: &Path) -> Option<NarrativeRoot> {
    let adopted = dir.join(ADOPTED_DIR);
    let candidates = [
        (adopted.join(ROOT_MARKER), RootMode::Adopted),
        (dir.join(ROOT_MARKER), RootMode::Fresh),
        (adopted.join(PROJECT_CONFIG), RootMode::Adopted),
        (dir.join(PROJECT_CONFIG), RootMode::Fresh),
    ];

    candidates
        .into_iter()
        .find(|(marker, _)| marker.exists())
        .map(|(_, mode)| NarrativeRoot {
            root: match mode {
                RootMode::Adopted => adopted.clone(),
                RootMode::Fresh => dir.to_path_buf(),
            },
            mode,
            repo_root: dir.to_path_buf(),
        })
}

/// Well-known locations relative to a narrative root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NarrativePaths {
    pub narrative_root: PathBuf,
    pub specs: PathBuf,
    pub stories: PathBuf,
    pub conventions: PathBuf,
    pub manifest: PathBuf,
    pub user_config: PathBuf,
    pub project_config: PathBuf,
}

impl NarrativePaths {
    pub fn new(narrative_root: impl AsRef<Path>) -> Self {
        let root = narrative_root.as_ref();
        let specs = root.join("specs");
        Self {
            narrative_root: root.to_path_buf(),
            stories: specs.join("stories"),
            conventions: specs.join("conventions"),
            manifest: specs.join("manifest.md"),
            specs,
            user_config: root.join(USER_DIR).join("config.json"),
            project_config: root.join(PROJECT_CONFIG),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_fresh_root_found_from_subdirectory() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join(ROOT_MARKER), "# Nara\n").unwrap();
        let nested = dir.path().join("specs/stories/auth");
        fs::create_dir_all(&nested).unwrap();

        let found = find_narrative_root(&nested).unwrap();
        assert_eq!(found.root, dir.path());
        assert_eq!(found.mode, RootMode::Fresh);
        assert_eq!(found.repo_root, dir.path());
    }

    #[test]
    fn test_adopted_marker_wins() {
        let dir = tempdir().unwrap();
        fs::create_dir_all(dir.path().join(ADOPTED_DIR)).unwrap();
        fs::write(dir.path().join(ADOPTED_DIR).join(ROOT_MARKER), "").unwrap();
        fs::write(dir.path().join(ROOT_MARKER), "").unwrap();

        let found = find_narrative_root(dir.path()).unwrap();
        assert_eq!(found.mode, RootMode::Adopted);
        assert_eq!(found.root, dir.path().join(ADOPTED_DIR));
        assert_eq!(found.repo_root, dir.path());
    }

    #[test]
    fn test_config_file_is_fallback_marker() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join(PROJECT_CONFIG), "{}").unwrap();

        let found = find_narrative_root(dir.path()).unwrap();
        assert_eq!(found.mode, RootMode::Fresh);
        assert_eq!(found.root, dir.path());
    }

    #[test]
    fn test_paths_layout() {
        let paths = NarrativePaths::new("/repo");
        assert_eq!(paths.stories, PathBuf::from("/repo/specs/stories"));
        assert_eq!(paths.manifest, PathBuf::from("/repo/specs/manifest.md"));
        assert_eq!(paths.user_config, PathBuf::from("/repo/.nara/config.json"));
        assert_eq!(paths.project_config, PathBuf::from("/repo/nara.json"));
    }
}
