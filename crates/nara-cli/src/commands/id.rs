//! Identifier lookup command.

use std::fmt;

use clap::Parser;
use serde::Serialize;

use nara_spec::StoryId;

use super::story::resolve_story_id;
use crate::cli::CommandContext;
use crate::error::CliError;
use crate::output::Output;

/// Check a story name or ID and print where its file lives
#[derive(Debug, Parser)]
pub struct IdCommand {
    /// Story name (<subsystem>.<verb>) or full ID
    pub value: String,
}

#[derive(Debug, Serialize)]
struct IdInfo {
    id: StoryId,
    subsystem: String,
    verb: String,
    path: String,
    exists: bool,
}

impl fmt::Display for IdInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "ID:   {}", self.id)?;
        write!(f, "Path: {}", self.path)?;
        if !self.exists {
            write!(f, " (not created)")?;
        }
        Ok(())
    }
}

impl IdCommand {
    pub async fn execute(&self, ctx: &CommandContext) -> Result<(), CliError> {
        let id = resolve_story_id(&self.value)?;
        let path = id.path_in(ctx.stories_dir());
        let exists = tokio::fs::try_exists(&path)
            .await
            .map_err(|e| CliError::io_with_path("Failed to check story path", e, &path))?;

        let info = IdInfo {
            subsystem: id.subsystem().to_string(),
            verb: id.verb().to_string(),
            path: ctx.display_path(&path),
            exists,
            id,
        };
        Output::new(ctx).print(&info)?;
        Ok(())
    }
}
