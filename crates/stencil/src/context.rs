//! The drawing contract.
//!
//! Renderers never talk to an output format directly; they issue calls on a
//! [`RenderContext`]. Every coordinate is in screen pixels and every angle
//! is in screen degrees, where 0 points along +X and positive angles turn
//! clockwise (the Y axis points down). Converting from design space is the
//! renderer's job, see [`crate::transform::CoordTransform`].
//!
//! # State
//!
//! `save_state`/`restore_state` nest strictly LIFO. Transforms
//! (`translate`, `rotate`, `scale`) and clips set after a save are undone by
//! the matching restore. Prefer [`with_saved_state`], which restores even
//! when the body fails.
//!
//! # Backends
//!
//! - [`SvgContext`](crate::export::svg::SvgContext) builds an SVG document
//! - [`RecordingContext`](crate::export::record::RecordingContext) keeps a
//!   display list of [`DrawCommand`](crate::export::record::DrawCommand)s

use thiserror::Error;

use stencil_core::{
    color::Color,
    draw::{FontSpec, Stroke, TextStyle},
    geometry::{Bounds, Point, Size},
};

/// A failed drawing call.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DrawError {
    /// The output was finished with saved states or clips still open.
    #[error("state stack is unbalanced: {depth} frame(s) still open")]
    Unbalanced { depth: usize },

    #[error("restore_state called without a matching save_state")]
    RestoreWithoutSave,

    #[error("reset_clip called without a matching set_clip_rect")]
    ResetWithoutClip,

    /// Non-finite or otherwise unusable coordinates.
    #[error("invalid geometry: {0}")]
    InvalidGeometry(String),
}

/// Backend-agnostic drawing operations.
///
/// Colors are ARGB; backends honor partial alpha.
pub trait RenderContext {
    /// Paints the whole canvas with `color`.
    fn clear(&mut self, color: Color) -> Result<(), DrawError>;

    fn draw_line(&mut self, from: Point, to: Point, stroke: &Stroke) -> Result<(), DrawError>;

    fn draw_rectangle(&mut self, bounds: Bounds, stroke: &Stroke) -> Result<(), DrawError>;

    fn fill_rectangle(&mut self, bounds: Bounds, color: Color) -> Result<(), DrawError>;

    fn draw_rounded_rectangle(
        &mut self,
        bounds: Bounds,
        radius_x: f32,
        radius_y: f32,
        stroke: &Stroke,
    ) -> Result<(), DrawError>;

    fn fill_rounded_rectangle(
        &mut self,
        bounds: Bounds,
        radius_x: f32,
        radius_y: f32,
        color: Color,
    ) -> Result<(), DrawError>;

    fn draw_ellipse(
        &mut self,
        center: Point,
        radius_x: f32,
        radius_y: f32,
        stroke: &Stroke,
    ) -> Result<(), DrawError>;

    fn fill_ellipse(
        &mut self,
        center: Point,
        radius_x: f32,
        radius_y: f32,
        color: Color,
    ) -> Result<(), DrawError>;

    /// Outlines a closed polygon.
    fn draw_polygon(&mut self, points: &[Point], stroke: &Stroke) -> Result<(), DrawError>;

    fn fill_polygon(&mut self, points: &[Point], color: Color) -> Result<(), DrawError>;

    /// Strokes an open path through `points`.
    fn draw_polyline(&mut self, points: &[Point], stroke: &Stroke) -> Result<(), DrawError>;

    /// Strokes one cubic Bézier segment.
    fn draw_bezier(
        &mut self,
        start: Point,
        control1: Point,
        control2: Point,
        end: Point,
        stroke: &Stroke,
    ) -> Result<(), DrawError>;

    /// Strokes an elliptical arc starting at `start_angle` and turning by
    /// `sweep_angle` degrees.
    fn draw_arc(
        &mut self,
        center: Point,
        radius_x: f32,
        radius_y: f32,
        start_angle: f32,
        sweep_angle: f32,
        stroke: &Stroke,
    ) -> Result<(), DrawError>;

    /// Outlines a pie slice: the arc closed through the center.
    fn draw_pie(
        &mut self,
        center: Point,
        radius_x: f32,
        radius_y: f32,
        start_angle: f32,
        sweep_angle: f32,
        stroke: &Stroke,
    ) -> Result<(), DrawError>;

    fn fill_pie(
        &mut self,
        center: Point,
        radius_x: f32,
        radius_y: f32,
        start_angle: f32,
        sweep_angle: f32,
        color: Color,
    ) -> Result<(), DrawError>;

    /// Draws one line of text anchored at `position` per the style's
    /// alignment.
    fn draw_text(&mut self, text: &str, position: Point, style: &TextStyle)
    -> Result<(), DrawError>;

    /// Returns the rendered size of `text` in pixels.
    fn measure_text(&self, text: &str, font: &FontSpec) -> Size;

    /// Draws encoded image bytes (PNG, JPEG or BMP) stretched into `bounds`.
    fn draw_image(&mut self, bounds: Bounds, data: &[u8]) -> Result<(), DrawError>;

    /// Restricts subsequent drawing to `bounds` until the matching
    /// [`reset_clip`]. Every clip must be reset before the state it was set
    /// in is restored.
    ///
    /// [`reset_clip`]: RenderContext::reset_clip
    fn set_clip_rect(&mut self, bounds: Bounds) -> Result<(), DrawError>;

    /// Ends the innermost clip.
    fn reset_clip(&mut self) -> Result<(), DrawError>;

    fn save_state(&mut self) -> Result<(), DrawError>;

    fn restore_state(&mut self) -> Result<(), DrawError>;

    fn translate(&mut self, dx: f32, dy: f32) -> Result<(), DrawError>;

    /// Rotates subsequent drawing by `degrees` (clockwise on screen).
    fn rotate(&mut self, degrees: f32) -> Result<(), DrawError>;

    fn scale(&mut self, sx: f32, sy: f32) -> Result<(), DrawError>;
}

/// Runs `body` between `save_state` and `restore_state`.
///
/// The state is restored even when `body` fails; the first error wins.
///
/// # Examples
///
/// ```
/// use stencil::context::{RenderContext, with_saved_state};
/// use stencil::export::record::RecordingContext;
///
/// let mut ctx = RecordingContext::new();
/// with_saved_state(&mut ctx, |ctx| ctx.translate(10.0, 0.0)).unwrap();
/// assert_eq!(ctx.depth(), 0);
/// assert_eq!(ctx.commands().len(), 3);
/// ```
pub fn with_saved_state<C, F>(ctx: &mut C, body: F) -> Result<(), DrawError>
where
    C: RenderContext + ?Sized,
    F: FnOnce(&mut C) -> Result<(), DrawError>,
{
    ctx.save_state()?;
    let result = body(ctx);
    let restored = ctx.restore_state();
    result.and(restored)
}

/// Fails with [`DrawError::InvalidGeometry`] if any value is not finite.
pub(crate) fn ensure_finite(what: &str, values: &[f32]) -> Result<(), DrawError> {
    if values.iter().all(|v| v.is_finite()) {
        Ok(())
    } else {
        Err(DrawError::InvalidGeometry(format!(
            "{what} has non-finite coordinates"
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export::record::{DrawCommand, RecordingContext};

    #[test]
    fn test_with_saved_state_restores_on_error() {
        let mut ctx = RecordingContext::new();
        let result = with_saved_state(&mut ctx, |_| {
            Err(DrawError::InvalidGeometry("boom".to_string()))
        });
        assert!(matches!(result, Err(DrawError::InvalidGeometry(_))));
        assert_eq!(ctx.depth(), 0);
        assert_eq!(ctx.commands().last(), Some(&DrawCommand::RestoreState));
    }

    #[test]
    fn test_ensure_finite() {
        assert!(ensure_finite("line", &[0.0, 1.0]).is_ok());
        assert!(ensure_finite("line", &[f32::NAN]).is_err());
        assert!(ensure_finite("line", &[f32::INFINITY, 0.0]).is_err());
    }

    #[test]
    fn test_error_messages() {
        assert_eq!(
            DrawError::Unbalanced { depth: 2 }.to_string(),
            "state stack is unbalanced: 2 frame(s) still open"
        );
    }
}
