//! Content gate for generated or edited stories and manifests.
//!
//! The validator collects every violation it finds instead of stopping at the
//! first one, and never rewrites the content it is given.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::id::{is_valid_id, name_to_id};
use crate::parsing::{parse_story, UnknownSection, OPEN_QUESTIONS};
use crate::story_types::{is_known_type, required_sections};

/// Headings every manifest must contain, in order.
pub const MANIFEST_HEADINGS: &[&str] = &[
    "## Name",
    "## Description",
    "## Intended Users",
    "## Primary Goal",
    "## Non-Goals",
    "## Project Type",
    "## Key Constraints",
    "## Success Criteria",
    "## Current State",
    "## Maturity",
    "## Key Decisions",
    "## Open Questions",
];

const MANIFEST_OPEN_QUESTIONS: &str = "## Open Questions";

static NORMATIVE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b(MUST|MUST NOT|SHALL|SHALL NOT|SHOULD|SHOULD NOT|REQUIRED)\b")
        .expect("normative keyword pattern")
});

static PLACEHOLDER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\b(TODO|TBD)\b").expect("placeholder pattern"));

/// Kind of artifact being validated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArtifactKind {
    /// A single story document.
    Story,
    /// The project manifest.
    Manifest,
}

impl ArtifactKind {
    fn label(&self) -> &'static str {
        match self {
            Self::Story => "Story",
            Self::Manifest => "Manifest",
        }
    }
}

/// Caller-supplied context for a validation run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ValidationOptions {
    /// The human's original request. Normative keywords are only allowed
    /// when this text contains one too.
    pub intent_text: String,
    /// Expected short `<subsystem>.<verb>` name of the story.
    pub name_constraint: Option<String>,
    /// Story type declared out-of-band, e.g. by the generator.
    pub story_type: Option<String>,
    /// Story ID declared out-of-band.
    pub story_id: Option<String>,
    /// Questions that must appear verbatim in the open questions region.
    pub open_questions: Vec<String>,
}

impl ValidationOptions {
    /// Options carrying only the user's intent text.
    pub fn with_intent(intent_text: impl Into<String>) -> Self {
        Self {
            intent_text: intent_text.into(),
            ..Self::default()
        }
    }
}

/// One rejected property of an artifact.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A `TODO` or `TBD` marker is present.
    #[error("{0} contains TODO/TBD placeholders.")]
    Placeholder(&'static str),

    /// Normative keywords appear but the intent text has none.
    #[error("Normative keywords are not allowed unless present in user input.")]
    NormativeLanguage,

    /// A heading outside the story allowlist.
    #[error("{0}")]
    UnknownSection(UnknownSection),

    /// The `ID` section is absent, blank, or not a valid identifier.
    #[error("Invalid or missing story ID.")]
    InvalidId,

    /// The document ID differs from the declared one.
    #[error("Story ID does not match the AI-provided storyId.")]
    IdMismatch,

    /// The document ID differs from `story.<name constraint>`.
    #[error("Story ID must match provided name ({expected}).")]
    NameMismatch {
        /// The identifier the name constraint implies.
        expected: String,
    },

    /// The `Type` section is absent or blank.
    #[error("Missing Type section.")]
    MissingType,

    /// The `Type` body is not a known story type.
    #[error("Unknown story type: {0}")]
    UnknownType(String),

    /// The document type differs from the declared one.
    #[error("Story type does not match the AI-provided storyType.")]
    TypeMismatch,

    /// A required section is absent or has an empty body.
    #[error("Missing or empty required section: {0}")]
    MissingSection(String),

    /// A required open question was not echoed.
    #[error("Open Questions section is missing: {0}")]
    MissingOpenQuestion(String),

    /// A manifest heading marker is absent.
    #[error("Missing manifest heading: {0}")]
    MissingManifestHeading(&'static str),
}

impl Serialize for ValidationError {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Outcome of a validation run. Valid exactly when `errors` is empty.
#[derive(Debug, Clone, Serialize)]
pub struct ValidationResult {
    /// Whether the artifact may be accepted.
    pub valid: bool,
    /// Every violation, in rule order.
    pub errors: Vec<ValidationError>,
    /// Story ID read from the document.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Story type read from the document.
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub story_type: Option<String>,
}

impl ValidationResult {
    fn new(errors: Vec<ValidationError>, id: Option<String>, story_type: Option<String>) -> Self {
        Self {
            valid: errors.is_empty(),
            errors,
            id,
            story_type,
        }
    }

    /// Error messages as displayed to users.
    pub fn messages(&self) -> Vec<String> {
        self.errors.iter().map(ToString::to_string).collect()
    }
}

/// Whether `text` contains a normative keyword (case-sensitive).
pub fn has_normative_keywords(text: &str) -> bool {
    NORMATIVE.is_match(text)
}

/// Whether `text` contains a `TODO` or `TBD` word in any case.
pub fn has_placeholders(text: &str) -> bool {
    PLACEHOLDER.is_match(text)
}

/// Whether the user's intent authorizes normative keywords.
pub fn intent_allows_normative(intent_text: &str) -> bool {
    has_normative_keywords(&intent_text.to_uppercase())
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

fn check_shared(
    kind: ArtifactKind,
    content: &str,
    options: &ValidationOptions,
    errors: &mut Vec<ValidationError>,
) {
    if has_placeholders(content) {
        errors.push(ValidationError::Placeholder(kind.label()));
    }

    if has_normative_keywords(content) && !intent_allows_normative(&options.intent_text) {
        errors.push(ValidationError::NormativeLanguage);
    }
}

fn check_open_questions(region: &str, questions: &[String], errors: &mut Vec<ValidationError>) {
    for question in questions {
        if !region.contains(question.as_str()) {
            errors.push(ValidationError::MissingOpenQuestion(question.clone()));
        }
    }
}

/// Validate a story document.
pub fn validate_story_content(content: &str, options: &ValidationOptions) -> ValidationResult {
    let mut errors = Vec::new();
    check_shared(ArtifactKind::Story, content, options, &mut errors);

    let parsed = parse_story(content);
    errors.extend(parsed.warnings.iter().cloned().map(ValidationError::UnknownSection));

    let id = parsed.extract_id();
    if !id.is_some_and(is_valid_id) {
        errors.push(ValidationError::InvalidId);
    }

    if let (Some(declared), Some(found)) = (non_empty(&options.story_id), id) {
        if declared != found {
            errors.push(ValidationError::IdMismatch);
        }
    }

    if let (Some(name), Some(found)) = (non_empty(&options.name_constraint), id) {
        let expected = name_to_id(name);
        if found != expected {
            errors.push(ValidationError::NameMismatch { expected });
        }
    }

    let story_type = parsed.declared_type();
    if story_type.is_empty() {
        errors.push(ValidationError::MissingType);
    } else if !is_known_type(story_type) {
        errors.push(ValidationError::UnknownType(story_type.to_string()));
    }

    if let Some(declared) = non_empty(&options.story_type) {
        if !story_type.is_empty() && declared != story_type {
            errors.push(ValidationError::TypeMismatch);
        }
    }

    for section in required_sections(story_type) {
        let filled = parsed.get(section).is_some_and(|body| !body.trim().is_empty());
        if !filled {
            errors.push(ValidationError::MissingSection(section.to_string()));
        }
    }

    let region = parsed.get(OPEN_QUESTIONS).unwrap_or("");
    check_open_questions(region, &options.open_questions, &mut errors);

    tracing::debug!(id, errors = errors.len(), "validated story content");
    ValidationResult::new(
        errors,
        id.map(str::to_string),
        Some(story_type.to_string()),
    )
}

/// Validate a project manifest.
///
/// Manifests are checked for literal heading markers rather than parsed into
/// sections. Open questions are searched from the `## Open Questions` marker
/// to the end, or in the whole document when the marker is absent.
pub fn validate_manifest_content(content: &str, options: &ValidationOptions) -> ValidationResult {
    let mut errors = Vec::new();
    check_shared(ArtifactKind::Manifest, content, options, &mut errors);

    for &heading in MANIFEST_HEADINGS {
        if !content.contains(heading) {
            errors.push(ValidationError::MissingManifestHeading(heading));
        }
    }

    let region = content
        .find(MANIFEST_OPEN_QUESTIONS)
        .map_or(content, |start| &content[start..]);
    check_open_questions(region, &options.open_questions, &mut errors);

    tracing::debug!(errors = errors.len(), "validated manifest content");
    ValidationResult::new(errors, None, None)
}

/// Validate content of either kind.
pub fn validate_content(
    kind: ArtifactKind,
    content: &str,
    options: &ValidationOptions,
) -> ValidationResult {
    match kind {
        ArtifactKind::Story => validate_story_content(content, options),
        ArtifactKind::Manifest => validate_manifest_content(content, options),
    }
}
