//! Error types for implgen

use std::path::PathBuf;
use thiserror::Error;

use crate::render::RenderError;

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// implgen errors
#[derive(Error, Debug)]
pub enum Error {
    /// A method signature the engine cannot express in Go
    #[error("Model error in {interface}.{method}: {source}")]
    Model {
        interface: String,
        method: String,
        #[source]
        source: RenderError,
    },

    /// Two logical sources were planned onto the same output path
    #[error("Path collision: {} is produced by both {first} and {second}", path.display())]
    PathCollision {
        path: PathBuf,
        first: String,
        second: String,
    },

    #[error("Go parse error: {0}")]
    Parse(String),

    #[error("Config error: {0}")]
    Config(String),

    #[error("Template error: {0}")]
    Template(#[from] minijinja::Error),

    #[error("Render error: {0}")]
    Render(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_norway::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{0}")]
    Other(String),
}

impl From<&str> for Error {
    fn from(s: &str) -> Self {
        Error::Other(s.to_string())
    }
}

impl From<String> for Error {
    fn from(s: String) -> Self {
        Error::Other(s)
    }
}
