//! Error types for manifest loading and CLI runs.

use thiserror::Error;

/// Errors raised while loading a command manifest or running a command.
#[derive(Debug, Error)]
pub enum CliError {
    /// File I/O failure.
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// YAML parsing or serialization failure.
    #[error("YAML error: {0}")]
    YamlError(#[from] serde_yaml::Error),

    /// JSON serialization failure.
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Manifest failed structural checks.
    #[error("invalid manifest: {0}")]
    InvalidManifest(String),

    /// No command with that name in the manifest.
    #[error("unknown command: {0}")]
    UnknownCommand(String),

    /// Arguments could not be parsed for the selected command.
    #[error("{0}")]
    Parse(#[from] clap::Error),
}

/// Convenience alias for results with [`CliError`].
pub type Result<T> = std::result::Result<T, CliError>;
