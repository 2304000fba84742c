//! Story identifiers.
//!
//! A story is addressed as `story.<subsystem>.<verb>`. Both components start
//! with a lowercase letter and contain only lowercase letters, digits and
//! hyphens. Users usually type the short form `<subsystem>.<verb>`, which
//! gets the `story.` prefix applied.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Literal first component of every story identifier.
pub const ID_PREFIX: &str = "story";

static ID_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^story\.[a-z][a-z0-9-]*\.[a-z][a-z0-9-]*$").expect("story id pattern")
});

static COMPONENT_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-z][a-z0-9-]*$").expect("id component pattern"));

/// A validated `story.<subsystem>.<verb>` identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StoryId {
    subsystem: String,
    verb: String,
}

impl StoryId {
    /// Parse a full identifier. Returns `None` for anything outside the grammar.
    pub fn parse(id: &str) -> Option<Self> {
        if !is_valid_id(id) {
            return None;
        }
        let mut parts = id.split('.').skip(1);
        let subsystem = parts.next()?.to_string();
        let verb = parts.next()?.to_string();
        Some(Self { subsystem, verb })
    }

    /// Build an identifier from a short `<subsystem>.<verb>` name.
    pub fn from_name(name: &str) -> Result<Self, NameError> {
        validate_name(name)?;
        let (subsystem, verb) = name.split_once('.').ok_or(NameError::PartCount)?;
        Ok(Self {
            subsystem: subsystem.to_string(),
            verb: verb.to_string(),
        })
    }

    /// The subsystem component.
    pub fn subsystem(&self) -> &str {
        &self.subsystem
    }

    /// The verb component.
    pub fn verb(&self) -> &str {
        &self.verb
    }

    /// The short `<subsystem>.<verb>` form.
    pub fn name(&self) -> String {
        format!("{}.{}", self.subsystem, self.verb)
    }

    /// Location of this story below `stories_root`: `<root>/<subsystem>/<verb>.md`.
    pub fn path_in(&self, stories_root: impl AsRef<Path>) -> PathBuf {
        stories_root
            .as_ref()
            .join(&self.subsystem)
            .join(format!("{}.md", self.verb))
    }
}

impl fmt::Display for StoryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", ID_PREFIX, self.subsystem, self.verb)
    }
}

impl FromStr for StoryId {
    type Err = IdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| IdError::Invalid(s.to_string()))
    }
}

impl Serialize for StoryId {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for StoryId {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// Error for a full identifier that does not match the grammar.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IdError {
    /// The string is not `story.<subsystem>.<verb>`.
    #[error("Invalid story ID: {0}")]
    Invalid(String),
}

/// Reason a short story name was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum NameError {
    /// Nothing was supplied.
    #[error("Name is required")]
    Empty,

    /// The name did not split into exactly two dotted parts.
    #[error("Name must be in format: subsystem.verb (e.g., storage.read)")]
    PartCount,

    /// The subsystem part has bad characters or does not start with a letter.
    #[error("Subsystem must be lowercase, start with letter, contain only letters/numbers/hyphens")]
    Subsystem,

    /// The verb part has bad characters or does not start with a letter.
    #[error("Verb must be lowercase, start with letter, contain only letters/numbers/hyphens")]
    Verb,
}

/// Whether `id` matches the full identifier grammar.
pub fn is_valid_id(id: &str) -> bool {
    ID_PATTERN.is_match(id)
}

/// Decompose a full identifier into `(subsystem, verb)`.
pub fn parse_id(id: &str) -> Option<StoryId> {
    StoryId::parse(id)
}

/// Apply the `story.` prefix to a short name. No validation is performed.
pub fn name_to_id(name: &str) -> String {
    format!("{ID_PREFIX}.{name}")
}

/// Map a full identifier to `<stories_root>/<subsystem>/<verb>.md`.
pub fn id_to_path(id: &str, stories_root: impl AsRef<Path>) -> Result<PathBuf, IdError> {
    let id: StoryId = id.parse()?;
    Ok(id.path_in(stories_root))
}

/// Check a short `<subsystem>.<verb>` name, reporting the first rule it breaks.
pub fn validate_name(name: &str) -> Result<(), NameError> {
    if name.is_empty() {
        return Err(NameError::Empty);
    }

    let parts: Vec<&str> = name.split('.').collect();
    let [subsystem, verb] = parts.as_slice() else {
        return Err(NameError::PartCount);
    };

    if !COMPONENT_PATTERN.is_match(subsystem) {
        return Err(NameError::Subsystem);
    }
    if !COMPONENT_PATTERN.is_match(verb) {
        return Err(NameError::Verb);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use test_case::test_case;

    #[test_case("story.storage.read" ; "simple")]
    #[test_case("story.auth-v2.log-in" ; "hyphens")]
    #[test_case("story.s3.get2" ; "digits after first letter")]
    fn test_valid_ids(id: &str) {
        assert!(is_valid_id(id));
        assert!(parse_id(id).is_some());
    }

    #[test_case("" ; "empty")]
    #[test_case("storage.read" ; "missing prefix")]
    #[test_case("story.storage" ; "two parts")]
    #[test_case("story.storage.read.all" ; "four parts")]
    #[test_case("Story.storage.read" ; "uppercase prefix")]
    #[test_case("story.Storage.read" ; "uppercase subsystem")]
    #[test_case("story.3d.render" ; "digit first")]
    #[test_case("story.storage.-read" ; "hyphen first")]
    #[test_case("story.stor_age.read" ; "underscore")]
    #[test_case("story.storage.read\n" ; "trailing newline")]
    #[test_case(" story.storage.read" ; "leading space")]
    fn test_invalid_ids(id: &str) {
        assert!(!is_valid_id(id));
        assert!(parse_id(id).is_none());
        assert!(id.parse::<StoryId>().is_err());
    }

    #[test]
    fn test_parse_components() {
        let id = parse_id("story.storage.read").unwrap();
        assert_eq!(id.subsystem(), "storage");
        assert_eq!(id.verb(), "read");
        assert_eq!(id.name(), "storage.read");
        assert_eq!(id.to_string(), "story.storage.read");
    }

    #[test]
    fn test_id_to_path() {
        let path = id_to_path("story.storage.read", "specs/stories").unwrap();
        assert_eq!(path, PathBuf::from("specs/stories/storage/read.md"));
    }

    #[test]
    fn test_id_to_path_rejects_invalid() {
        let err = id_to_path("story.Bad.id", "specs/stories").unwrap_err();
        assert_eq!(err.to_string(), "Invalid story ID: story.Bad.id");
    }

    #[test]
    fn test_name_to_id() {
        assert_eq!(name_to_id("auth.login"), "story.auth.login");
    }

    #[test_case("", NameError::Empty ; "empty")]
    #[test_case("storage", NameError::PartCount ; "one part")]
    #[test_case("a.b.c", NameError::PartCount ; "three parts")]
    #[test_case("Storage.read", NameError::Subsystem ; "bad subsystem")]
    #[test_case("storage.Read", NameError::Verb ; "bad verb")]
    #[test_case("1x.2y", NameError::Subsystem ; "subsystem checked first")]
    fn test_validate_name_errors(name: &str, expected: NameError) {
        assert_eq!(validate_name(name), Err(expected));
    }

    #[test]
    fn test_validate_name_ok() {
        assert!(validate_name("storage.read").is_ok());
        let id = StoryId::from_name("storage.read").unwrap();
        assert_eq!(id.to_string(), "story.storage.read");
    }

    #[test]
    fn test_serde_as_string() {
        let id = parse_id("story.auth.login").unwrap();
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"story.auth.login\"");
        let back: StoryId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
        assert!(serde_json::from_str::<StoryId>("\"nope\"").is_err());
    }

    proptest! {
        #[test]
        fn prop_valid_ids_map_to_stable_paths(
            subsystem in "[a-z][a-z0-9-]{0,12}",
            verb in "[a-z][a-z0-9-]{0,12}",
        ) {
            let raw = format!("story.{subsystem}.{verb}");
            let id = parse_id(&raw).expect("grammar-generated id parses");
            prop_assert_eq!(id.subsystem(), subsystem.as_str());
            prop_assert_eq!(id.verb(), verb.as_str());
            prop_assert_eq!(id.to_string(), raw.clone());

            let first = id_to_path(&raw, "stories").unwrap();
            let second = id_to_path(&raw, "stories").unwrap();
            prop_assert_eq!(&first, &second);
            prop_assert_eq!(first, PathBuf::from("stories").join(&subsystem).join(format!("{verb}.md")));
        }

        #[test]
        fn prop_ids_with_uppercase_are_rejected(
            subsystem in "[a-z][a-z0-9-]{0,6}[A-Z][a-z]{0,4}",
            verb in "[a-z][a-z0-9-]{0,8}",
        ) {
            let raw = format!("story.{subsystem}.{verb}");
            prop_assert!(!is_valid_id(&raw));
            prop_assert!(parse_id(&raw).is_none());
        }
    }
}
