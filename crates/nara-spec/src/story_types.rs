//! Story types and the sections each one requires.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Sections required when the declared type is a page, a component, or unknown.
const VIEW_SECTIONS: &[&str] = &["ID", "Type", "Purpose", "Behavior"];

/// Sections required for operations and endpoints.
const CALL_SECTIONS: &[&str] = &[
    "ID", "Type", "Purpose", "Inputs", "Outputs", "Behavior", "Errors",
];

/// The fixed set of story types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoryType {
    /// A user-facing page.
    Page,
    /// A reusable UI or system component.
    Component,
    /// An internal operation with inputs and outputs.
    Operation,
    /// An externally reachable endpoint.
    Endpoint,
}

impl StoryType {
    /// Every story type, in declaration order.
    pub const ALL: [StoryType; 4] = [
        StoryType::Page,
        StoryType::Component,
        StoryType::Operation,
        StoryType::Endpoint,
    ];

    /// Parse the exact lowercase tag used in a `## Type` section.
    pub fn parse(tag: &str) -> Option<Self> {
        match tag {
            "page" => Some(Self::Page),
            "component" => Some(Self::Component),
            "operation" => Some(Self::Operation),
            "endpoint" => Some(Self::Endpoint),
            _ => None,
        }
    }

    /// The tag as written in story documents.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Page => "page",
            Self::Component => "component",
            Self::Operation => "operation",
            Self::Endpoint => "endpoint",
        }
    }

    /// Sections a story of this type must contain, in canonical order.
    pub fn required_sections(&self) -> &'static [&'static str] {
        match self {
            Self::Page | Self::Component => VIEW_SECTIONS,
            Self::Operation | Self::Endpoint => CALL_SECTIONS,
        }
    }
}

impl fmt::Display for StoryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a type tag is not one of the known story types.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown story type: {0}")]
pub struct UnknownStoryType(pub String);

impl FromStr for StoryType {
    type Err = UnknownStoryType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| UnknownStoryType(s.to_string()))
    }
}

/// Whether `tag` names one of the known story types.
pub fn is_known_type(tag: &str) -> bool {
    StoryType::parse(tag).is_some()
}

/// Required sections for a raw type tag.
///
/// Unknown or empty tags fall back to the page/component set so analysis
/// never fails on malformed input; the validator reports the bad tag itself.
pub fn required_sections(tag: &str) -> &'static [&'static str] {
    StoryType::parse(tag)
        .map(|t| t.required_sections())
        .unwrap_or(VIEW_SECTIONS)
}
