//! Validate command implementation.

use std::fmt;
use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand, ValueHint};
use serde::Serialize;

use nara_spec::{validate_content, ArtifactKind, ValidationOptions, ValidationResult};

use crate::cli::CommandContext;
use crate::error::CliError;
use crate::output::Output;
use crate::stories::read_text;

/// Run the content gate on a story or the manifest
#[derive(Debug, Parser)]
pub struct ValidateCommand {
    #[command(subcommand)]
    pub target: ValidateTarget,
}

#[derive(Debug, Subcommand)]
pub enum ValidateTarget {
    /// Validate a story file
    Story(ValidateStoryArgs),

    /// Validate the manifest (default: specs/manifest.md)
    Manifest(ValidateManifestArgs),
}

/// Options shared by both validation targets.
#[derive(Debug, Clone, Default, Args)]
pub struct IntentArgs {
    /// Intent text; normative keywords here allow them in the content
    #[arg(long, conflicts_with = "intent_file")]
    pub intent: Option<String>,

    /// Read intent text from a file
    #[arg(long, value_hint = ValueHint::FilePath)]
    pub intent_file: Option<PathBuf>,

    /// Question that must appear under Open Questions (repeatable)
    #[arg(long = "open-question", value_name = "QUESTION")]
    pub open_questions: Vec<String>,
}

#[derive(Debug, Args)]
pub struct ValidateStoryArgs {
    /// Story markdown file
    #[arg(value_hint = ValueHint::FilePath)]
    pub file: PathBuf,

    /// Expected short name, <subsystem>.<verb>
    #[arg(long)]
    pub name: Option<String>,

    /// Expected story type
    #[arg(long = "story-type", value_name = "TYPE")]
    pub story_type: Option<String>,

    /// Expected full story ID
    #[arg(long = "story-id", value_name = "ID")]
    pub story_id: Option<String>,

    #[command(flatten)]
    pub intent: IntentArgs,
}

#[derive(Debug, Args)]
pub struct ValidateManifestArgs {
    /// Manifest markdown file
    #[arg(value_hint = ValueHint::FilePath)]
    pub file: Option<PathBuf>,

    #[command(flatten)]
    pub intent: IntentArgs,
}

#[derive(Debug, Serialize)]
struct ValidationReport {
    file: String,
    kind: ArtifactKind,
    #[serde(flatten)]
    result: ValidationResult,
}

impl fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self.kind {
            ArtifactKind::Story => "Story",
            ArtifactKind::Manifest => "Manifest",
        };
        if self.result.valid {
            write!(f, "{label} is valid: {}", self.file)?;
            if let Some(id) = &self.result.id {
                write!(f, " ({id})")?;
            }
            return Ok(());
        }

        write!(f, "{label} is invalid: {}", self.file)?;
        for message in self.result.messages() {
            write!(f, "\n  - {message}")?;
        }
        Ok(())
    }
}

impl ValidateCommand {
    pub async fn execute(&self, ctx: &CommandContext) -> Result<(), CliError> {
        let (kind, file, options) = match &self.target {
            ValidateTarget::Story(args) => {
                let mut options = args.intent.options().await?;
                options.name_constraint = args.name.clone();
                options.story_type = args.story_type.clone();
                options.story_id = args.story_id.clone();
                (ArtifactKind::Story, args.file.clone(), options)
            }
            ValidateTarget::Manifest(args) => {
                let file = match &args.file {
                    Some(file) => file.clone(),
                    None => ctx.manifest_path()?,
                };
                (ArtifactKind::Manifest, file, args.intent.options().await?)
            }
        };

        run(ctx, kind, &file, &options).await
    }
}

impl IntentArgs {
    async fn options(&self) -> Result<ValidationOptions, CliError> {
        let intent_text = match (&self.intent, &self.intent_file) {
            (Some(text), _) => text.clone(),
            (None, Some(path)) => read_text(path, "Intent file").await?,
            (None, None) => String::new(),
        };

        Ok(ValidationOptions {
            open_questions: self.open_questions.clone(),
            ..ValidationOptions::with_intent(intent_text)
        })
    }
}

async fn run(
    ctx: &CommandContext,
    kind: ArtifactKind,
    file: &Path,
    options: &ValidationOptions,
) -> Result<(), CliError> {
    let content = read_text(file, "File").await?;
    let result = validate_content(kind, &content, options);
    tracing::debug!(file = %file.display(), valid = result.valid, "validated");

    let report = ValidationReport {
        file: ctx.display_path(file),
        kind,
        result,
    };
    Output::new(ctx).print(&report)?;

    if report.result.valid {
        Ok(())
    } else {
        let count = report.result.errors.len();
        Err(CliError::validation(
            format!("{} failed validation with {count} error(s)", report.file),
            count,
        ))
    }
}
