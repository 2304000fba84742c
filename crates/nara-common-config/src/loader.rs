//! Configuration file loading and parsing.

use std::path::{Path, PathBuf};

use once_cell::sync::Lazy;
use regex::Regex;
use serde::de::DeserializeOwned;
use thiserror::Error;

use crate::root::NarrativePaths;
use crate::types::{NaraConfig, ProjectConfig, UserConfig};

static ENV_VAR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\$\{([^}:]+)(?::-([^}]*))?\}").expect("env var pattern"));

/// Config loading errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config at {path} (line {line}): {message}")]
    Parse {
        path: PathBuf,
        line: usize,
        message: String,
    },

    #[error("validation error: {message}")]
    Validation { message: String },

    #[error("environment variable not found: {var}")]
    EnvVarNotFound { var: String },
}

/// Loads and merges `nara.json` and `.nara/config.json` for one narrative root.
pub struct ConfigLoader {
    paths: NarrativePaths,
}

impl ConfigLoader {
    /// Create a loader for the given narrative root.
    pub fn new(narrative_root: impl AsRef<Path>) -> Self {
        Self {
            paths: NarrativePaths::new(narrative_root),
        }
    }

    /// Load configuration; missing files fall back to defaults.
    pub fn load(&self) -> Result<NaraConfig, ConfigError> {
        let project: ProjectConfig = self.load_layer(&self.paths.project_config)?;
        let user: UserConfig = self.load_layer(&self.paths.user_config)?;

        let config = NaraConfig::merge(project, user);
        validate(&config)?;
        Ok(config)
    }

    fn load_layer<T>(&self, path: &Path) -> Result<T, ConfigError>
    where
        T: DeserializeOwned + Default,
    {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "config file absent, using defaults");
            return Ok(T::default());
        }

        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let expanded = expand_env_vars(&contents)?;

        let layer = serde_json::from_str(&expanded).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            line: e.line(),
            message: e.to_string(),
        })?;
        tracing::debug!(path = %path.display(), "loaded config file");
        Ok(layer)
    }
}

/// Expand environment variables in the form `${VAR}` or `${VAR:-default}`.
pub fn expand_env_vars(content: &str) -> Result<String, ConfigError> {
    let mut result = content.to_string();

    for cap in ENV_VAR.captures_iter(content) {
        let full_match = &cap[0];
        let var_name = &cap[1];
        let default = cap.get(2).map(|m| m.as_str());

        let value = match (std::env::var(var_name), default) {
            (Ok(v), _) => v,
            (Err(_), Some(d)) => d.to_string(),
            (Err(_), None) => {
                return Err(ConfigError::EnvVarNotFound {
                    var: var_name.to_string(),
                })
            }
        };

        result = result.replace(full_match, &value);
    }

    Ok(result)
}

/// Validate configuration values.
pub fn validate(config: &NaraConfig) -> Result<(), ConfigError> {
    if config.token_policy.max_files < 1 {
        return Err(ConfigError::Validation {
            message: "tokenPolicy.maxFiles must be at least 1".to_string(),
        });
    }

    if config.token_policy.max_bytes < 1000 {
        return Err(ConfigError::Validation {
            message: "tokenPolicy.maxBytes must be at least 1000".to_string(),
        });
    }

    if config.stories_root.trim().is_empty() {
        return Err(ConfigError::Validation {
            message: "storiesRoot must not be empty".to_string(),
        });
    }

    Ok(())
}
