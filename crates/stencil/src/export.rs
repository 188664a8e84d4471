//! Drawing backends.
//!
//! A backend implements [`RenderContext`](crate::context::RenderContext) and
//! turns the renderers' drawing calls into an output.
//!
//! # Pipeline Position
//!
//! ```text
//! Library Component (model)
//!     ↓ CoordTransform
//! Screen Geometry
//!     ↓ Sch/Pcb renderer
//! Drawing Calls
//!     ↓ backend (this module)
//! Output (SVG document, display list)
//! ```
//!
//! # Available Backends
//!
//! - [`svg`]: SVG output via [`svg::SvgContext`] and [`svg::SvgBuilder`]
//! - [`record`]: an in-memory display list via [`record::RecordingContext`]
//!
//! # Error Handling
//!
//! Writing output returns [`Error`]. It converts into [`StencilError`] at the
//! crate boundary.
//!
//! [`StencilError`]: crate::StencilError

/// Display-list backend.
pub mod record;
/// SVG backend.
pub mod svg;

/// Errors that can occur while producing backend output.
#[derive(Debug)]
pub enum Error {
    /// The drawing could not be turned into the output format.
    Render(String),
    /// An I/O error encountered while writing output.
    Io(std::io::Error),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Render(msg) => write!(f, "Render error: {msg}"),
            Self::Io(err) => write!(f, "I/O error: {err}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Render(_) => None,
            Self::Io(err) => Some(err),
        }
    }
}

impl From<crate::context::DrawError> for Error {
    fn from(err: crate::context::DrawError) -> Self {
        Self::Render(err.to_string())
    }
}
