//! Story completeness analysis.
//!
//! Analysis runs over drafts that are still being written, so it never fails:
//! missing structure shows up in the result instead.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::parsing::{parse_story, ParsedStory, UnknownSection};
use crate::story_types::{is_known_type, required_sections};

/// A structural problem found while analyzing a story.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StructuralIssue {
    /// A heading outside the allowlist.
    UnknownSection(UnknownSection),
    /// A non-empty `Type` that is not a known story type.
    UnknownType(String),
}

impl fmt::Display for StructuralIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownSection(section) => section.fmt(f),
            Self::UnknownType(ty) => write!(f, "Unknown story type: {ty}"),
        }
    }
}

impl Serialize for StructuralIssue {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Completeness summary of one story document.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    /// First non-blank line of the `ID` section; not checked against the grammar.
    pub id: Option<String>,
    /// Trimmed `Type` body, possibly empty.
    #[serde(rename = "type")]
    pub story_type: String,
    /// No required section missing and no open questions.
    pub complete: bool,
    /// Required sections whose heading is absent, in canonical order.
    pub missing: Vec<String>,
    /// Question-shaped lines in `Open Questions`.
    pub open_questions: usize,
    /// Unknown headings, then an unknown type if any.
    pub errors: Vec<StructuralIssue>,
}

impl AnalysisResult {
    /// Every required section is present but questions remain.
    pub fn has_only_open_questions(&self) -> bool {
        self.missing.is_empty() && self.open_questions > 0
    }
}

/// Required sections whose headings are absent. Empty bodies count as present.
pub fn missing_sections(parsed: &ParsedStory) -> Vec<String> {
    required_sections(parsed.declared_type())
        .iter()
        .filter(|name| !parsed.contains(name))
        .map(|name| name.to_string())
        .collect()
}

/// Analyze raw story text.
pub fn analyze_story(content: &str) -> AnalysisResult {
    analyze_parsed(&parse_story(content))
}

/// Analyze an already parsed story.
pub fn analyze_parsed(parsed: &ParsedStory) -> AnalysisResult {
    let story_type = parsed.declared_type().to_string();
    let missing = missing_sections(parsed);
    let open_questions = parsed.open_question_count();

    let mut errors: Vec<StructuralIssue> = parsed
        .warnings
        .iter()
        .cloned()
        .map(StructuralIssue::UnknownSection)
        .collect();
    if !story_type.is_empty() && !is_known_type(&story_type) {
        errors.push(StructuralIssue::UnknownType(story_type.clone()));
    }

    let complete = missing.is_empty() && open_questions == 0;
    tracing::debug!(
        id = parsed.extract_id(),
        complete,
        missing = missing.len(),
        open_questions,
        "analyzed story"
    );

    AnalysisResult {
        id: parsed.extract_id().map(str::to_string),
        story_type,
        complete,
        missing,
        open_questions,
        errors,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parsing::ALL_SECTIONS;
    use proptest::prelude::*;

    const OPERATION_STORY: &str = "## ID\nstory.storage.read\n\n## Type\noperation\n\n## Purpose\nRead.\n\n## Inputs\n- key\n\n## Outputs\n- bytes\n\n## Behavior\nLook up.\n\n## Errors\n- NotFound\n";

    #[test]
    fn test_complete_operation() {
        let result = analyze_story(OPERATION_STORY);

        assert_eq!(result.id.as_deref(), Some("story.storage.read"));
        assert_eq!(result.story_type, "operation");
        assert!(result.missing.is_empty());
        assert_eq!(result.open_questions, 0);
        assert!(result.errors.is_empty());
        assert!(result.complete);
    }

    #[test]
    fn test_missing_sections_in_canonical_order() {
        let result = analyze_story("## Type\noperation\n\n## Behavior\nx\n");
        assert_eq!(result.missing, vec!["ID", "Purpose", "Inputs", "Outputs", "Errors"]);
        assert!(!result.complete);
        assert_eq!(result.id, None);
    }

    #[test]
    fn test_empty_body_counts_as_present() {
        let story = OPERATION_STORY.replace("- bytes", "");
        let result = analyze_story(&story);
        assert!(result.missing.is_empty());
        assert!(result.complete);
    }

    #[test]
    fn test_open_questions_block_completion() {
        let story = format!("{OPERATION_STORY}\n## Open Questions\n\n- Q1: Cache?\n- Q2: Stream?\n");
        let result = analyze_story(&story);

        assert!(result.missing.is_empty());
        assert_eq!(result.open_questions, 2);
        assert!(!result.complete);
        assert!(result.has_only_open_questions());
    }

    #[test]
    fn test_unknown_type_uses_fallback_and_reports() {
        let result = analyze_story("## ID\nstory.a.b\n## Type\nwidget\n## Purpose\nx\n## Behavior\ny\n");

        assert!(result.missing.is_empty());
        assert!(result.complete);
        assert_eq!(result.errors.len(), 1);
        assert_eq!(result.errors[0].to_string(), "Unknown story type: widget");
    }

    #[test]
    fn test_unknown_sections_come_before_type_error() {
        let result = analyze_story("## Type\nwidget\n## Notes\nx\n");
        let messages: Vec<String> = result.errors.iter().map(ToString::to_string).collect();
        assert_eq!(messages, vec!["Unknown section: Notes", "Unknown story type: widget"]);
    }

    #[test]
    fn test_garbage_input_does_not_fail() {
        let result = analyze_story("\u{0}\u{1}## \n####\n");
        assert_eq!(result.id, None);
        assert_eq!(result.story_type, "");
        assert_eq!(result.missing, vec!["ID", "Type", "Purpose", "Behavior"]);
        assert!(result.errors.is_empty());
    }

    #[test]
    fn test_serializes_with_camel_case() {
        let result = analyze_story("## Type\npage\n");
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["type"], "page");
        assert_eq!(json["openQuestions"], 0);
        assert_eq!(json["complete"], false);
    }

    proptest! {
        #[test]
        fn prop_complete_iff_nothing_missing_and_no_questions(
            mask in proptest::collection::vec(any::<bool>(), ALL_SECTIONS.len()),
            story_type in prop_oneof![
                Just("page"), Just("component"), Just("operation"), Just("endpoint"), Just("")
            ],
            questions in 0usize..3,
        ) {
            let mut doc = String::new();
            for (name, include) in ALL_SECTIONS.iter().zip(&mask) {
                if !include {
                    continue;
                }
                let body = match *name {
                    "ID" => "story.x.y".to_string(),
                    "Type" => story_type.to_string(),
                    "Open Questions" => (1..=questions).map(|n| format!("- Q{n}: q\n")).collect(),
                    _ => "body".to_string(),
                };
                doc.push_str(&format!("## {name}\n{body}\n\n"));
            }

            let result = analyze_story(&doc);
            prop_assert_eq!(result.complete, result.missing.is_empty() && result.open_questions == 0);

            let has_questions = mask[ALL_SECTIONS.iter().position(|s| *s == "Open Questions").unwrap()];
            prop_assert_eq!(result.open_questions, if has_questions { questions } else { 0 });
        }
    }
}
