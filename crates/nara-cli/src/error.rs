//! CLI error handling.

use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

use thiserror::Error;

use nara_common_config::ConfigError;
use nara_spec::{IdError, NameError, TemplateError};

/// Application exit codes
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Exit {
    Success = 0,
    GeneralError = 1,
    ConfigError = 2,
    IoError = 3,
    ValidationError = 5,
    NotFound = 6,
}

impl From<Exit> for ExitCode {
    fn from(exit: Exit) -> Self {
        ExitCode::from(exit as u8)
    }
}

/// CLI error type
#[derive(Debug, Error)]
pub enum CliError {
    #[error("{message}")]
    Config {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
        hint: Option<String>,
    },

    #[error("{message}")]
    Io {
        message: String,
        #[source]
        source: io::Error,
        path: Option<PathBuf>,
    },

    #[error("{message}")]
    Validation { message: String, errors: usize },

    #[error("{message}")]
    NotFound {
        message: String,
        resource_type: String,
        resource_name: String,
    },

    #[error("{message}")]
    User {
        message: String,
        hint: Option<String>,
    },

    #[error("{0}")]
    Other(#[from] anyhow::Error),
}

impl CliError {
    /// Exit status for this error.
    pub fn exit(&self) -> Exit {
        match self {
            Self::Config { .. } => Exit::ConfigError,
            Self::Io { .. } => Exit::IoError,
            Self::Validation { .. } => Exit::ValidationError,
            Self::NotFound { .. } => Exit::NotFound,
            Self::User { .. } | Self::Other(_) => Exit::GeneralError,
        }
    }

    /// Get the exit code for this error
    pub fn exit_code(&self) -> ExitCode {
        self.exit().into()
    }

    /// Get hint for this error if available
    pub fn hint(&self) -> Option<&str> {
        match self {
            Self::Config { hint, .. } | Self::User { hint, .. } => hint.as_deref(),
            _ => None,
        }
    }

    /// Create a config error with hint
    pub fn config_with_hint(message: impl Into<String>, hint: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
            source: None,
            hint: Some(hint.into()),
        }
    }

    /// Create an IO error with path
    pub fn io_with_path(
        message: impl Into<String>,
        source: io::Error,
        path: impl Into<PathBuf>,
    ) -> Self {
        Self::Io {
            message: message.into(),
            source,
            path: Some(path.into()),
        }
    }

    /// Create a not found error
    pub fn not_found(resource_type: impl Into<String>, resource_name: impl Into<String>) -> Self {
        let resource_type = resource_type.into();
        let resource_name = resource_name.into();
        Self::NotFound {
            message: format!("{resource_type} not found: {resource_name}"),
            resource_type,
            resource_name,
        }
    }

    /// Create a validation error reporting how many problems were found
    pub fn validation(message: impl Into<String>, errors: usize) -> Self {
        Self::Validation {
            message: message.into(),
            errors,
        }
    }

    /// Create a user error with hint
    pub fn user_with_hint(message: impl Into<String>, hint: impl Into<String>) -> Self {
        Self::User {
            message: message.into(),
            hint: Some(hint.into()),
        }
    }
}

impl From<io::Error> for CliError {
    fn from(err: io::Error) -> Self {
        Self::Io {
            message: err.to_string(),
            source: err,
            path: None,
        }
    }
}

impl From<serde_json::Error> for CliError {
    fn from(err: serde_json::Error) -> Self {
        Self::Other(anyhow::Error::new(err).context("failed to serialize output"))
    }
}

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        Self::Config {
            message: format!("Configuration error: {err}"),
            source: Some(Box::new(err)),
            hint: Some("Check nara.json and .nara/config.json".to_string()),
        }
    }
}

impl From<NameError> for CliError {
    fn from(err: NameError) -> Self {
        Self::user_with_hint(
            format!("Invalid story name: {err}"),
            "Story names look like <subsystem>.<verb>, e.g. auth.login",
        )
    }
}

impl From<IdError> for CliError {
    fn from(err: IdError) -> Self {
        Self::user_with_hint(
            err.to_string(),
            "Story IDs look like story.<subsystem>.<verb>",
        )
    }
}

impl From<TemplateError> for CliError {
    fn from(err: TemplateError) -> Self {
        Self::Other(anyhow::Error::new(err).context("failed to render story"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_codes() {
        assert_eq!(
            CliError::config_with_hint("no root", "run nara init").exit(),
            Exit::ConfigError
        );
        assert_eq!(
            CliError::from(io::Error::new(io::ErrorKind::Other, "boom")).exit(),
            Exit::IoError
        );
        assert_eq!(CliError::validation("invalid", 2).exit(), Exit::ValidationError);
        assert_eq!(CliError::not_found("File", "x.md").exit(), Exit::NotFound);
        assert_eq!(CliError::from(NameError::Empty).exit(), Exit::GeneralError);
        assert_eq!(Exit::NotFound as u8, 6);
    }

    #[test]
    fn test_not_found_message() {
        let err = CliError::not_found("Story file", "specs/stories/a/b.md");
        assert_eq!(err.to_string(), "Story file not found: specs/stories/a/b.md");
        assert!(err.hint().is_none());
    }

    #[test]
    fn test_name_error_carries_hint() {
        let err = CliError::from(NameError::PartCount);
        assert!(err.to_string().starts_with("Invalid story name: "));
        assert!(err.hint().unwrap().contains("auth.login"));
    }

    #[test]
    fn test_config_error_conversion() {
        let err = CliError::from(ConfigError::Validation {
            message: "tokenPolicy.maxFiles must be at least 1".to_string(),
        });
        assert_eq!(err.exit(), Exit::ConfigError);
        assert!(err.to_string().contains("maxFiles"));
    }
}
