//! Status command implementation.

use std::fmt;

use clap::Parser;
use serde::Serialize;

use nara_common_config::{AiConfig, AiProvider, RootMode};
use nara_spec::{analyze_story, StatusReport, StoryFile};

use crate::cli::CommandContext;
use crate::error::CliError;
use crate::output::Output;
use crate::stories::{discover_stories, read_text};

/// Summarize story completeness under the narrative root
#[derive(Debug, Parser)]
pub struct StatusCommand {}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct StatusView {
    root: String,
    mode: RootMode,
    stories_root: String,
    #[serde(flatten)]
    report: StatusReport,
    ai: AiStatus,
}

/// Which AI tool is selected; nothing is invoked.
#[derive(Debug, Serialize)]
struct AiStatus {
    provider: AiProvider,
    configured: bool,
}

impl From<&AiConfig> for AiStatus {
    fn from(ai: &AiConfig) -> Self {
        Self {
            provider: ai.provider,
            configured: ai.is_configured(),
        }
    }
}

impl fmt::Display for AiStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = if self.configured { "configured" } else { "not configured" };
        write!(f, "AI Provider: {} ({state})", self.provider.as_str())
    }
}

impl fmt::Display for StatusView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let counts = &self.report.stories;
        writeln!(f, "Narrative root: {} ({})", self.root, self.mode.as_str())?;
        if counts.total == 0 {
            writeln!(f, "No stories found under {}", self.stories_root)?;
            return write!(f, "\n{}", self.ai);
        }

        write!(
            f,
            "Stories: {} total, {} complete, {} with open questions, {} incomplete",
            counts.total, counts.complete, counts.with_open_questions, counts.incomplete
        )?;

        if !self.report.open_questions.is_empty() {
            write!(f, "\n\nOpen questions:")?;
            for story in &self.report.open_questions {
                let label = story.id.as_deref().unwrap_or(&story.file);
                write!(f, "\n  {label}: {}", story.count)?;
            }
        }

        if !self.report.incomplete.is_empty() {
            write!(f, "\n\nIncomplete:")?;
            for story in &self.report.incomplete {
                let label = story.id.as_deref().unwrap_or(&story.file);
                write!(f, "\n  {label}: missing {}", story.missing.join(", "))?;
            }
        }
        write!(f, "\n\n{}", self.ai)
    }
}

impl StatusCommand {
    pub async fn execute(&self, ctx: &CommandContext) -> Result<(), CliError> {
        let root = ctx.require_root()?;
        let stories_dir = ctx.stories_dir();

        let mut files = Vec::new();
        for path in discover_stories(&stories_dir)? {
            let content = match read_text(&path, "Story file").await {
                Ok(content) => content,
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "skipping unreadable story");
                    continue;
                }
            };
            files.push(StoryFile {
                file: ctx.display_path(&path),
                analysis: analyze_story(&content),
            });
        }

        let view = StatusView {
            root: root.root.display().to_string(),
            mode: root.mode,
            stories_root: ctx.display_path(&stories_dir),
            report: StatusReport::build(&files),
            ai: AiStatus::from(&ctx.config.ai),
        };
        Output::new(ctx).print(&view)?;
        Ok(())
    }
}
