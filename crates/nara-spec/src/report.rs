//! Narrative health summary across many stories.

use serde::Serialize;

use crate::analysis::AnalysisResult;

/// One analyzed story file.
#[derive(Debug, Clone)]
pub struct StoryFile {
    /// Path relative to the narrative root.
    pub file: String,
    /// Analysis of the file's content.
    pub analysis: AnalysisResult,
}

/// Counts per story state.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StoryCounts {
    pub total: usize,
    pub complete: usize,
    pub with_open_questions: usize,
    pub incomplete: usize,
}

/// A story whose sections are all present but has open questions.
#[derive(Debug, Clone, Serialize)]
pub struct PendingStory {
    pub id: Option<String>,
    pub file: String,
    pub count: usize,
}

/// A story with required sections missing.
#[derive(Debug, Clone, Serialize)]
pub struct IncompleteStory {
    pub id: Option<String>,
    pub file: String,
    pub missing: Vec<String>,
}

/// Aggregated story health.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusReport {
    pub stories: StoryCounts,
    pub open_questions: Vec<PendingStory>,
    pub incomplete: Vec<IncompleteStory>,
}

impl StatusReport {
    /// Summarize analyzed story files, keeping their order.
    pub fn build(files: &[StoryFile]) -> Self {
        let mut report = Self::default();
        report.stories.total = files.len();

        for StoryFile { file, analysis } in files {
            if analysis.complete {
                report.stories.complete += 1;
            } else if analysis.has_only_open_questions() {
                report.open_questions.push(PendingStory {
                    id: analysis.id.clone(),
                    file: file.clone(),
                    count: analysis.open_questions,
                });
            } else {
                report.incomplete.push(IncompleteStory {
                    id: analysis.id.clone(),
                    file: file.clone(),
                    missing: analysis.missing.clone(),
                });
            }
        }

        report.stories.with_open_questions = report.open_questions.len();
        report.stories.incomplete = report.incomplete.len();
        report
    }
}
