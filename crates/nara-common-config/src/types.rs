//! Configuration types.

use serde::{Deserialize, Serialize};

/// Merged configuration: defaults, then `nara.json`, then `.nara/config.json`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct NaraConfig {
    /// Spec directory, relative to the narrative root.
    pub spec_root: String,
    /// Conventions index file.
    pub conventions_index: String,
    /// Directory holding `<subsystem>/<verb>.md` stories.
    pub stories_root: String,
    /// Limits on how much context is handed to AI tools.
    pub token_policy: TokenPolicy,
    /// AI provider settings.
    pub ai: AiConfig,
}

impl Default for NaraConfig {
    fn default() -> Self {
        Self::merge(ProjectConfig::default(), UserConfig::default())
    }
}

impl NaraConfig {
    /// Combine project and user layers. The user layer only carries AI settings.
    pub fn merge(project: ProjectConfig, user: UserConfig) -> Self {
        Self {
            spec_root: project.spec_root,
            conventions_index: project.conventions_index,
            stories_root: project.stories_root,
            token_policy: project.token_policy,
            ai: user.ai,
        }
    }
}

/// Project configuration, `nara.json`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ProjectConfig {
    pub spec_root: String,
    pub conventions_index: String,
    pub stories_root: String,
    pub token_policy: TokenPolicy,
}

impl Default for ProjectConfig {
    fn default() -> Self {
        Self {
            spec_root: "specs".to_string(),
            conventions_index: "specs/conventions/index.md".to_string(),
            stories_root: "specs/stories".to_string(),
            token_policy: TokenPolicy::default(),
        }
    }
}

/// Context budget for AI prompts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TokenPolicy {
    /// Maximum files included (at least 1).
    pub max_files: u32,
    /// Maximum bytes included (at least 1000).
    pub max_bytes: u64,
    /// Whether the glossary is included.
    pub include_glossary: bool,
}

impl Default for TokenPolicy {
    fn default() -> Self {
        Self {
            max_files: 6,
            max_bytes: 120_000,
            include_glossary: true,
        }
    }
}

/// User configuration, `.nara/config.json`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserConfig {
    pub ai: AiConfig,
}

/// AI tool selection.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AiConfig {
    pub provider: AiProvider,
    /// Executable for the `custom` provider.
    pub command: Option<String>,
    pub args: Vec<String>,
    pub prompt_mode: PromptMode,
    pub output_mode: OutputMode,
}

impl AiConfig {
    /// Whether a provider other than `none` is selected.
    pub fn is_configured(&self) -> bool {
        self.provider != AiProvider::None
    }
}

/// Supported AI command-line tools.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AiProvider {
    Codex,
    Claude,
    Gemini,
    Custom,
    #[default]
    None,
}

impl AiProvider {
    /// Name as written in config files.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Codex => "codex",
            Self::Claude => "claude",
            Self::Gemini => "gemini",
            Self::Custom => "custom",
            Self::None => "none",
        }
    }
}

/// How the prompt reaches the AI tool.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PromptMode {
    #[default]
    Stdin,
    Arg,
}

/// Expected shape of AI output.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputMode {
    #[default]
    Json,
    Sections,
    Raw,
}
