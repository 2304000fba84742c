//! CLI argument definitions using clap derive macros.

use std::path::{Path, PathBuf};

use clap::{ArgAction, ColorChoice, Parser, Subcommand, ValueHint};

use nara_common_config::{find_narrative_root, ConfigLoader, NaraConfig, NarrativeRoot};

use crate::commands::{AnalyzeCommand, IdCommand, StatusCommand, StoryCommand, ValidateCommand};
use crate::error::CliError;

/// Nara - narrative specs for codebases
///
/// Check, analyze and scaffold story specs kept under specs/stories.
#[derive(Debug, Parser)]
#[command(
    name = "nara",
    author,
    version,
    about,
    long_about = None,
    propagate_version = true,
    arg_required_else_help = true
)]
pub struct Cli {
    /// Increase verbosity level (-v, -vv, -vvv)
    #[arg(
        short,
        long,
        action = ArgAction::Count,
        global = true,
        help = "Increase verbosity level"
    )]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(
        short,
        long,
        global = true,
        conflicts_with = "verbose",
        help = "Suppress non-error output"
    )]
    pub quiet: bool,

    /// Directory to start narrative root discovery from
    #[arg(
        long,
        global = true,
        env = "NARA_ROOT",
        value_hint = ValueHint::DirPath,
        help = "Directory to search for the narrative root (default: current directory)"
    )]
    pub root: Option<PathBuf>,

    /// When to use colors
    #[arg(
        long,
        global = true,
        default_value = "auto",
        value_enum,
        help = "When to use terminal colors"
    )]
    pub color: ColorChoice,

    /// Output format
    #[arg(
        long,
        global = true,
        default_value = "text",
        value_enum,
        help = "Output format (text, json)"
    )]
    pub format: OutputFormat,

    #[command(subcommand)]
    pub command: Command,
}

/// Output format selection
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Available subcommands
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Report story completeness across the narrative root
    Status(StatusCommand),

    /// Validate a story or the manifest
    Validate(ValidateCommand),

    /// Show the completeness analysis of one story
    Analyze(AnalyzeCommand),

    /// Create a minimal story for <subsystem>.<verb>
    #[command(visible_alias = "new")]
    Story(StoryCommand),

    /// Check a story name or ID and show its path
    Id(IdCommand),
}

impl Cli {
    /// Discover the narrative root and load its configuration
    pub async fn load_context(&self) -> Result<CommandContext, CliError> {
        let cwd = std::env::current_dir()?;
        let start = match &self.root {
            Some(dir) => cwd.join(dir),
            None => cwd,
        };

        let root = find_narrative_root(&start);
        let config = match &root {
            Some(found) => ConfigLoader::new(&found.root).load()?,
            None => {
                tracing::debug!(start = %start.display(), "no narrative root found");
                NaraConfig::default()
            }
        };

        Ok(CommandContext {
            root,
            config,
            format: self.format,
            color: self.color,
            quiet: self.quiet,
        })
    }

    /// Execute the selected command
    pub async fn execute(self, ctx: CommandContext) -> Result<(), CliError> {
        match self.command {
            Command::Status(cmd) => cmd.execute(&ctx).await,
            Command::Validate(cmd) => cmd.execute(&ctx).await,
            Command::Analyze(cmd) => cmd.execute(&ctx).await,
            Command::Story(cmd) => cmd.execute(&ctx).await,
            Command::Id(cmd) => cmd.execute(&ctx).await,
        }
    }
}

/// Context passed to all commands
#[derive(Debug)]
pub struct CommandContext {
    pub root: Option<NarrativeRoot>,
    pub config: NaraConfig,
    pub format: OutputFormat,
    pub color: ColorChoice,
    pub quiet: bool,
}

impl CommandContext {
    /// The narrative root, or a config error when none was found.
    pub fn require_root(&self) -> Result<&NarrativeRoot, CliError> {
        self.root.as_ref().ok_or_else(|| {
            CliError::config_with_hint(
                "No narrative root found",
                "Run inside a repository containing NARA.md or nara.json, or pass --root",
            )
        })
    }

    /// Stories directory: under the narrative root when one exists,
    /// otherwise the configured path relative to the working directory.
    pub fn stories_dir(&self) -> PathBuf {
        match &self.root {
            Some(found) => found.root.join(&self.config.stories_root),
            None => PathBuf::from(&self.config.stories_root),
        }
    }

    /// Manifest path below the narrative root.
    pub fn manifest_path(&self) -> Result<PathBuf, CliError> {
        let root = self.require_root()?;
        Ok(root.root.join(&self.config.spec_root).join("manifest.md"))
    }

    /// Path shown to the user, relative to the narrative root when possible.
    pub fn display_path(&self, path: &Path) -> String {
        let relative = self
            .root
            .as_ref()
            .and_then(|found| path.strip_prefix(&found.root).ok())
            .unwrap_or(path);
        relative.to_string_lossy().replace('\\', "/")
    }
}
