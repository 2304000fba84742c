//! Story scaffolding command.

use std::fmt;

use clap::Parser;
use serde::Serialize;

use nara_spec::{render_minimal_story, StoryId};

use crate::cli::CommandContext;
use crate::error::CliError;
use crate::output::Output;

/// Write a minimal story whose sections defer to open questions
#[derive(Debug, Parser)]
pub struct StoryCommand {
    /// Story name (<subsystem>.<verb>) or full ID (story.<subsystem>.<verb>)
    pub name: String,

    /// Overwrite an existing story file
    #[arg(long)]
    pub force: bool,
}

#[derive(Debug, Serialize)]
struct CreatedStory {
    id: StoryId,
    path: String,
    overwritten: bool,
}

impl fmt::Display for CreatedStory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let verb = if self.overwritten { "Rewrote" } else { "Created" };
        write!(f, "{verb} {} at {}", self.id, self.path)
    }
}

/// Accept either a full ID or a short name.
pub(crate) fn resolve_story_id(value: &str) -> Result<StoryId, CliError> {
    match StoryId::parse(value) {
        Some(id) => Ok(id),
        None => Ok(StoryId::from_name(value)?),
    }
}

impl StoryCommand {
    pub async fn execute(&self, ctx: &CommandContext) -> Result<(), CliError> {
        let id = resolve_story_id(&self.name)?;
        ctx.require_root()?;

        let path = id.path_in(ctx.stories_dir());
        let exists = tokio::fs::try_exists(&path).await?;
        if exists && !self.force {
            return Err(CliError::user_with_hint(
                format!("Story already exists: {}", ctx.display_path(&path)),
                "Use --force to overwrite it",
            ));
        }

        let output = Output::new(ctx);
        if exists {
            output.warning(&format!("Overwriting {}", ctx.display_path(&path)));
        }

        let content = render_minimal_story(&id)?;
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| CliError::io_with_path("Failed to create story directory", e, parent))?;
        }
        tokio::fs::write(&path, content)
            .await
            .map_err(|e| CliError::io_with_path("Failed to write story", e, &path))?;
        tracing::info!(id = %id, path = %path.display(), "wrote story");

        let created = CreatedStory {
            id,
            path: ctx.display_path(&path),
            overwritten: exists,
        };
        if output.is_json() {
            output.print_json(&created)?;
        } else {
            output.success(&created.to_string());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_name_or_id() {
        assert_eq!(resolve_story_id("auth.login").unwrap().to_string(), "story.auth.login");
        assert_eq!(resolve_story_id("story.auth.login").unwrap().name(), "auth.login");
        assert!(matches!(
            resolve_story_id("Auth.login"),
            Err(CliError::User { .. })
        ));
    }

    #[test]
    fn test_created_text() {
        let created = CreatedStory {
            id: StoryId::from_name("auth.login").unwrap(),
            path: "specs/stories/auth/login.md".to_string(),
            overwritten: false,
        };
        assert_eq!(
            created.to_string(),
            "Created story.auth.login at specs/stories/auth/login.md"
        );
        let json = serde_json::to_value(&created).unwrap();
        assert_eq!(json["id"], "story.auth.login");
    }
}
