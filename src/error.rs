//! Error types for style loading and program generation.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while loading or checking a post-processor style.
#[derive(Error, Debug)]
pub enum StyleError {
    /// The style file could not be read.
    #[error("failed to read style file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The TOML document is malformed or names an unknown field.
    #[error("invalid TOML style: {0}")]
    Toml(#[from] toml::de::Error),

    /// The JSON document is malformed or names an unknown field.
    #[error("invalid JSON style: {0}")]
    Json(#[from] serde_json::Error),

    /// The document parsed but its values are out of range.
    #[error("invalid style: {0}")]
    Invalid(String),
}

/// Errors raised by the toolpath generators.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GenerateError {
    /// The pocket cannot accept the tool.
    #[error(
        "pocket diameter {diameter} must be larger than tool diameter {tool_diameter}"
    )]
    PocketTooSmall { diameter: f64, tool_diameter: f64 },

    /// A geometric or cutting parameter is out of range.
    #[error("invalid parameter '{name}': {reason}")]
    InvalidParameter { name: &'static str, reason: String },
}

impl GenerateError {
    pub(crate) fn invalid(name: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidParameter {
            name,
            reason: reason.into(),
        }
    }
}
