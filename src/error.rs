//! Error type shared by every pipeline stage.

use std::path::PathBuf;

use thiserror::Error;

use crate::tags::TagError;

pub type Result<T> = std::result::Result<T, BuildError>;

#[derive(Error, Debug)]
pub enum BuildError {
    #[error("{path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid YAML data: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("invalid JSON data: {0}")]
    Json(#[from] serde_json::Error),

    #[error("resume data must be a mapping at the top level, found {0}")]
    DataShape(&'static str),

    #[error("template error: {0}")]
    Template(#[from] minijinja::Error),

    /// Malformed `<% %>` markup in the rendered document.
    #[error(transparent)]
    Tags(#[from] TagError),

    #[error("no headless browser found (looked for {0})")]
    BrowserNotFound(String),

    #[error("failed to run '{binary}': {source}")]
    Convert {
        binary: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl BuildError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        BuildError::Io {
            path: path.into(),
            source,
        }
    }
}
