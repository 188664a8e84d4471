//! Error types for Stencil operations.
//!
//! [`StencilError`] is the crate-level error returned by
//! [`RenderBuilder`](crate::RenderBuilder). Failures of individual drawing
//! calls are [`DrawError`]s; the renderers log and skip those per primitive,
//! so they only surface here when the document itself cannot be completed.

use std::io;

use thiserror::Error;

pub use crate::context::DrawError;

/// The main error type for Stencil operations.
#[derive(Debug, Error)]
pub enum StencilError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("invalid render options: {0}")]
    InvalidOptions(String),

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("draw error: {0}")]
    Draw(#[from] DrawError),

    #[error("export error: {0}")]
    Export(Box<dyn std::error::Error + Send + Sync>),

    #[error("rendering cancelled after {rendered} component(s)")]
    Cancelled { rendered: usize },
}

impl From<crate::export::Error> for StencilError {
    fn from(error: crate::export::Error) -> Self {
        match error {
            crate::export::Error::Io(err) => Self::Io(err),
            other => Self::Export(Box::new(other)),
        }
    }
}
