//! Errors surfaced by the CLI.

use std::{io, path::PathBuf};

use thiserror::Error;

use stencil::StencilError;

use crate::config::ConfigError;

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Stencil(#[from] StencilError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The input file is not a valid component or library.
    #[error("invalid input {}: {err}", path.display())]
    Input {
        path: PathBuf,
        src: String,
        err: serde_json::Error,
    },

    #[error("invalid command-line option: {0}")]
    Option(String),
}

impl CliError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
