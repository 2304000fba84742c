//! Markdown section parsing for story documents.
//!
//! A story is a flat list of `## Heading` blocks. Everything before the first
//! heading is ignored, and deeper headings (`###`) are ordinary body text.

use std::collections::HashMap;
use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Every heading a story document is allowed to use.
pub const ALL_SECTIONS: &[&str] = &[
    "ID",
    "Type",
    "Purpose",
    "Inputs",
    "Outputs",
    "Behavior",
    "Errors",
    "Constraints",
    "Dependencies",
    "Tests",
    "Open Questions",
    "Existing Implementation",
    "As Implemented",
    "Intended Behavior",
];

/// Heading that holds open questions.
pub const OPEN_QUESTIONS: &str = "Open Questions";

static HEADING: Lazy<Regex> = Lazy::new(|| Regex::new(r"^##\s+(.+)$").expect("heading pattern"));

static QUESTION_LINE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(Q\d+:|[-*]|\d+\.)\s*.+").expect("question pattern"));

/// Whether `name` is one of the recognized story headings.
pub fn is_known_section(name: &str) -> bool {
    ALL_SECTIONS.contains(&name)
}

/// A heading that is not in [`ALL_SECTIONS`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnknownSection {
    /// Heading text as written.
    pub name: String,
    /// Zero-based line of the heading.
    pub line: usize,
}

impl fmt::Display for UnknownSection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Unknown section: {}", self.name)
    }
}

/// Result of splitting a document into sections.
///
/// When a heading repeats, the body of its last occurrence wins; the heading
/// keeps the position of its first occurrence in [`ParsedStory::section_order`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ParsedStory {
    /// Section bodies by heading.
    pub sections: HashMap<String, String>,
    /// Headings in the order they first appeared.
    pub section_order: Vec<String>,
    /// Zero-based line of the last occurrence of each heading.
    pub section_starts: HashMap<String, usize>,
    /// Headings outside the allowlist. Parsing continues past them.
    pub warnings: Vec<UnknownSection>,
}

impl ParsedStory {
    /// Body of a section, if the heading is present.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.sections.get(name).map(String::as_str)
    }

    /// Whether the heading is present, regardless of its body.
    pub fn contains(&self, name: &str) -> bool {
        self.sections.contains_key(name)
    }

    /// Sections in document order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.section_order
            .iter()
            .filter_map(|name| self.get(name).map(|body| (name.as_str(), body)))
    }

    /// Number of distinct headings.
    pub fn len(&self) -> usize {
        self.sections.len()
    }

    /// Whether the document had no headings at all.
    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    /// First non-blank line of the `ID` section, trimmed.
    pub fn extract_id(&self) -> Option<&str> {
        self.get("ID")?
            .lines()
            .map(str::trim)
            .find(|line| !line.is_empty())
    }

    /// Trimmed `Type` body; empty when the section is absent.
    pub fn declared_type(&self) -> &str {
        self.get("Type").map(str::trim).unwrap_or("")
    }

    /// Body of `Open Questions`, or an empty string.
    pub fn open_questions_body(&self) -> &str {
        self.get(OPEN_QUESTIONS).unwrap_or("")
    }

    /// Number of question-shaped lines in `Open Questions`.
    pub fn open_question_count(&self) -> usize {
        count_open_questions(self.open_questions_body())
    }
}

/// Split a markdown document into `## ` sections.
///
/// Never fails: unknown headings are recorded as warnings and stored anyway.
pub fn parse_story(content: &str) -> ParsedStory {
    let mut parsed = ParsedStory::default();
    let mut current: Option<(String, usize)> = None;
    let mut body: Vec<&str> = Vec::new();

    for (line_num, line) in content.lines().enumerate() {
        match heading_name(line) {
            Some(name) => {
                if let Some((section, start)) = current.take() {
                    finalize_section(&mut parsed, section, start, &body);
                }
                body.clear();

                if !is_known_section(name) {
                    parsed.warnings.push(UnknownSection {
                        name: name.to_string(),
                        line: line_num,
                    });
                }
                current = Some((name.to_string(), line_num));
            }
            None if current.is_some() => body.push(line),
            None => {}
        }
    }

    if let Some((section, start)) = current {
        finalize_section(&mut parsed, section, start, &body);
    }

    tracing::trace!(
        sections = parsed.len(),
        warnings = parsed.warnings.len(),
        "parsed story sections"
    );
    parsed
}

/// Count lines that look like open questions: `Q<n>:`, `-`, `*` or `<n>.`
/// followed by text. Blank lines and prose are ignored.
pub fn count_open_questions(body: &str) -> usize {
    body.lines()
        .map(str::trim)
        .filter(|line| QUESTION_LINE.is_match(line))
        .count()
}

fn heading_name(line: &str) -> Option<&str> {
    let caps = HEADING.captures(line)?;
    let name = caps.get(1)?.as_str().trim();
    (!name.is_empty()).then_some(name)
}

fn finalize_section(parsed: &mut ParsedStory, section: String, start: usize, body: &[&str]) {
    let text = body.join("\n").trim().to_string();
    if !parsed.sections.contains_key(&section) {
        parsed.section_order.push(section.clone());
    }
    parsed.section_starts.insert(section.clone(), start);
    parsed.sections.insert(section, text);
}
