/// Error types for the point store, configuration and command parsing
use std::path::PathBuf;

use crate::store::PointId;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("point not found: {0}")]
    NotFound(PointId),
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config `{}`: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CommandError {
    #[error("syntax error: {0}")]
    Syntax(String),

    #[error("no point matches `{0}`")]
    UnknownTarget(String),

    #[error("no point is selected")]
    NoSelection,

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("line {line}: {source}")]
    AtLine {
        line: usize,
        source: Box<CommandError>,
    },
}
