//! Primitive renderers.
//!
//! [`SchComponentRenderer`] and [`PcbComponentRenderer`] walk a component's
//! primitives, convert their geometry through a
//! [`CoordTransform`](crate::transform::CoordTransform) and issue calls on a
//! [`RenderContext`](crate::context::RenderContext).
//!
//! A primitive that fails to draw is logged and skipped; the rest of the
//! component is still drawn. The returned [`RenderSummary`] counts what
//! happened.

mod text;

pub mod pcb;
pub mod sch;

use log::{trace, warn};

pub use pcb::PcbComponentRenderer;
pub use sch::SchComponentRenderer;

use crate::context::DrawError;

/// What happened to one primitive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Outcome {
    Drawn,
    /// Hidden, filtered out or degenerate.
    Skipped,
}

/// Primitive counts from one render call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderSummary {
    /// Primitives that were drawn.
    pub drawn: usize,
    /// Primitives that were hidden, filtered out or degenerate.
    pub skipped: usize,
    /// Primitives whose drawing calls failed.
    pub failed: usize,
}

impl RenderSummary {
    pub(crate) fn record(&mut self, kind: &str, index: usize, outcome: Result<Outcome, DrawError>) {
        match outcome {
            Ok(Outcome::Drawn) => {
                trace!(kind, index; "Primitive drawn");
                self.drawn += 1;
            }
            Ok(Outcome::Skipped) => {
                trace!(kind, index; "Primitive skipped");
                self.skipped += 1;
            }
            Err(err) => {
                warn!(kind, index, err:%; "Failed to draw primitive");
                self.failed += 1;
            }
        }
    }

    /// Total number of primitives visited.
    pub fn total(&self) -> usize {
        self.drawn + self.skipped + self.failed
    }
}

/// Normalizes an angle into `[0, 360)`.
pub(crate) fn normalize_degrees(degrees: f64) -> f64 {
    let normalized = degrees.rem_euclid(360.0);
    if normalized >= 360.0 { 0.0 } else { normalized }
}

/// Counter-clockwise sweep from `start` to `end`, in `(0, 360]`.
///
/// Equal angles give a full turn.
pub(crate) fn sweep_degrees(start: f64, end: f64) -> f64 {
    let sweep = normalize_degrees(end) - normalize_degrees(start);
    if sweep <= 0.0 { sweep + 360.0 } else { sweep }
}

/// Sweeps within this many degrees of a full turn are drawn as ellipses.
pub(crate) const FULL_CIRCLE_EPSILON: f64 = 1e-3;
