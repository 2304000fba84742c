//! Analyze command implementation.

use std::fmt;
use std::path::PathBuf;

use clap::Parser;
use serde::Serialize;

use nara_spec::{analyze_story, AnalysisResult};

use crate::cli::CommandContext;
use crate::error::CliError;
use crate::output::Output;
use crate::stories::read_text;

/// Show which sections a story is missing and how many questions remain
#[derive(Debug, Parser)]
pub struct AnalyzeCommand {
    /// Story markdown file
    pub file: PathBuf,
}

#[derive(Debug, Serialize)]
struct AnalyzeReport {
    file: String,
    #[serde(flatten)]
    analysis: AnalysisResult,
}

impl fmt::Display for AnalyzeReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let analysis = &self.analysis;
        writeln!(f, "File: {}", self.file)?;
        writeln!(f, "ID: {}", analysis.id.as_deref().unwrap_or("(none)"))?;
        let story_type = match analysis.story_type.as_str() {
            "" => "(none)",
            tag => tag,
        };
        writeln!(f, "Type: {story_type}")?;
        writeln!(f, "Complete: {}", if analysis.complete { "yes" } else { "no" })?;
        if !analysis.missing.is_empty() {
            writeln!(f, "Missing: {}", analysis.missing.join(", "))?;
        }
        write!(f, "Open questions: {}", analysis.open_questions)?;
        for issue in &analysis.errors {
            write!(f, "\n  ! {issue}")?;
        }
        Ok(())
    }
}

impl AnalyzeCommand {
    pub async fn execute(&self, ctx: &CommandContext) -> Result<(), CliError> {
        let content = read_text(&self.file, "Story file").await?;
        let report = AnalyzeReport {
            file: ctx.display_path(&self.file),
            analysis: analyze_story(&content),
        };

        Output::new(ctx).print(&report)?;
        Ok(())
    }
}
