//! Error types for extension setup and directive execution.

use thiserror::Error;

/// A fatal configuration or setup error.
///
/// These abort the documentation build; they are raised at setup or
/// config-inited time, never deferred to first use.
#[derive(Error, Debug)]
pub enum SetupError {
    #[error("unknown config value '{0}'")]
    UnknownConfigValue(String),

    #[error("invalid value for config '{name}': {source}")]
    InvalidConfigValue {
        name: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("extension '{extension}' requires extension '{requirement}' to be active")]
    MissingDependency {
        extension: &'static str,
        requirement: &'static str,
    },

    #[error("extension '{requirement}' must be loaded before '{extension}'")]
    ExtensionOrder {
        extension: &'static str,
        requirement: &'static str,
    },

    #[error("{0}")]
    Config(String),
}

/// An error raised while running a markup directive.
#[derive(Error, Debug)]
pub enum DirectiveError {
    #[error("{0}")]
    Message(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = SetupError::MissingDependency {
            extension: "a",
            requirement: "b",
        };
        assert_eq!(err.to_string(), "extension 'a' requires extension 'b' to be active");

        let err = DirectiveError::Message("Not a directory: /x".into());
        assert_eq!(err.to_string(), "Not a directory: /x");
    }
}
