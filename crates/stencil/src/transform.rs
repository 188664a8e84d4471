//! Design-space to screen-space mapping.
//!
//! [`CoordTransform`] maps raw [`Coord`] units (Y up) onto a pixel canvas
//! (Y down). Because the Y axis flips, every angle crossing the boundary
//! changes sign; [`CoordTransform::screen_angle`] and friends are the only
//! place that flip happens.
//!
//! ```text
//!  design                       screen
//!    +Y                      (0,0) ────► +X
//!     ▲                        │
//!     │        center ──►      │   (w/2, h/2)
//!     └────► +X                ▼
//!                             +Y
//! ```

use log::debug;

use stencil_core::{
    coord::{Coord, CoordPoint, CoordRect},
    geometry::Point,
    model::LineWidth,
};

/// Fraction of the canvas auto-zoom fills.
pub const DEFAULT_ZOOM_MARGIN: f64 = 0.95;

/// Maps design coordinates to screen pixels.
///
/// # Examples
///
/// ```
/// use stencil::CoordTransform;
/// use stencil_core::coord::{CoordPoint, CoordRect};
///
/// let mut transform = CoordTransform::new(100.0, 100.0);
/// transform.auto_zoom(&CoordRect::new(
///     CoordPoint::from_raw(0, 0),
///     CoordPoint::from_raw(2000, 1000),
/// ));
/// assert!((transform.scale() - 0.0475).abs() < 1e-12);
///
/// let center = transform.world_to_screen(CoordPoint::from_raw(1000, 500));
/// assert_eq!((center.x(), center.y()), (50.0, 50.0));
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoordTransform {
    screen_width: f64,
    screen_height: f64,
    center_x: f64,
    center_y: f64,
    scale: f64,
}

impl CoordTransform {
    /// A transform for a canvas of the given pixel size, centered on the
    /// design origin at scale 1.
    pub fn new(screen_width: f64, screen_height: f64) -> Self {
        Self {
            screen_width,
            screen_height,
            center_x: 0.0,
            center_y: 0.0,
            scale: 1.0,
        }
    }

    pub fn with_scale(mut self, scale: f64) -> Self {
        self.scale = scale;
        self
    }

    /// Sets the design point shown at the canvas center (raw units).
    pub fn with_center(mut self, center_x: f64, center_y: f64) -> Self {
        self.center_x = center_x;
        self.center_y = center_y;
        self
    }

    /// Pixels per raw design unit.
    pub fn scale(&self) -> f64 {
        self.scale
    }

    /// Design point at the canvas center, in raw units.
    pub fn center(&self) -> (f64, f64) {
        (self.center_x, self.center_y)
    }

    pub fn screen_width(&self) -> f64 {
        self.screen_width
    }

    pub fn screen_height(&self) -> f64 {
        self.screen_height
    }

    /// Maps a design point to the screen.
    pub fn world_to_screen(&self, point: CoordPoint) -> Point {
        self.world_to_screen_f64(point.x.to_f64(), point.y.to_f64())
    }

    /// Maps floating point raw design units to the screen.
    pub fn world_to_screen_f64(&self, x: f64, y: f64) -> Point {
        let sx = (x - self.center_x) * self.scale + self.screen_width / 2.0;
        let sy = (self.center_y - y) * self.scale + self.screen_height / 2.0;
        Point::new(sx as f32, sy as f32)
    }

    /// Maps a screen point back to raw design units.
    pub fn screen_to_world(&self, point: Point) -> (f64, f64) {
        let x = (f64::from(point.x()) - self.screen_width / 2.0) / self.scale + self.center_x;
        let y = self.center_y - (f64::from(point.y()) - self.screen_height / 2.0) / self.scale;
        (x, y)
    }

    /// Scales a design length to pixels.
    pub fn scale_value(&self, length: Coord) -> f32 {
        (length.to_f64() * self.scale) as f32
    }

    /// Fits `bounds` into the canvas with [`DEFAULT_ZOOM_MARGIN`].
    pub fn auto_zoom(&mut self, bounds: &CoordRect) {
        self.auto_zoom_with_margin(bounds, DEFAULT_ZOOM_MARGIN);
    }

    /// Centers on `bounds` and scales it to fill `margin` of the canvas.
    ///
    /// Fully empty bounds leave the transform unchanged. A zero-width or
    /// zero-height rectangle is fitted along its other dimension only.
    pub fn auto_zoom_with_margin(&mut self, bounds: &CoordRect, margin: f64) {
        if bounds.is_empty() {
            debug!("Auto-zoom skipped for empty bounds");
            return;
        }

        let width = bounds.width().to_f64();
        let height = bounds.height().to_f64();
        let fit = [
            (width > 0.0).then(|| self.screen_width / width),
            (height > 0.0).then(|| self.screen_height / height),
        ]
        .into_iter()
        .flatten()
        .fold(f64::INFINITY, f64::min);

        let center = bounds.location1();
        self.center_x = center.x.to_f64() + width / 2.0;
        self.center_y = center.y.to_f64() + height / 2.0;
        self.scale = fit * margin;

        debug!(
            scale = self.scale,
            center_x = self.center_x,
            center_y = self.center_y;
            "Auto-zoom applied"
        );
    }

    /// Pixel width of a schematic line weight class; never scaled by zoom.
    pub fn line_width_px(width: LineWidth) -> f32 {
        match width {
            LineWidth::Small => 1.0,
            LineWidth::Medium => 3.0,
            LineWidth::Large => 5.0,
            LineWidth::Smallest => 1.0,
        }
    }

    /// Converts a counter-clockwise design angle to a clockwise screen angle.
    pub fn screen_angle(world_degrees: f64) -> f32 {
        (-world_degrees) as f32
    }

    /// Converts a design sweep to a screen sweep.
    pub fn screen_sweep(world_sweep: f64) -> f32 {
        (-world_sweep) as f32
    }

    /// Converts a design rotation to the argument of a context `rotate`.
    pub fn screen_rotation(world_rotation: f64) -> f32 {
        (-world_rotation) as f32
    }
}

#[cfg(test)]
mod tests {
    use float_cmp::assert_approx_eq;

    use super::*;

    #[test]
    fn test_auto_zoom_fits_wide_bounds() {
        let mut transform = CoordTransform::new(100.0, 100.0);
        transform.auto_zoom(&CoordRect::new(
            CoordPoint::from_raw(0, 0),
            CoordPoint::from_raw(2000, 1000),
        ));
        assert_approx_eq!(f64, transform.scale(), 0.0475, epsilon = 1e-12);
        assert_eq!(transform.center(), (1000.0, 500.0));
    }

    #[test]
    fn test_auto_zoom_skips_empty_bounds() {
        let mut transform = CoordTransform::new(100.0, 100.0).with_scale(2.0);
        transform.auto_zoom(&CoordRect::default());
        assert_eq!(transform.scale(), 2.0);
        assert_eq!(transform.center(), (0.0, 0.0));
    }

    #[test]
    fn test_auto_zoom_degenerate_width_uses_height() {
        let mut transform = CoordTransform::new(200.0, 100.0);
        transform.auto_zoom_with_margin(
            &CoordRect::new(CoordPoint::from_raw(5, 0), CoordPoint::from_raw(5, 50)),
            1.0,
        );
        assert_approx_eq!(f64, transform.scale(), 2.0);
        assert_eq!(transform.center(), (5.0, 25.0));
    }

    #[test]
    fn test_y_axis_inverted() {
        let transform = CoordTransform::new(100.0, 100.0);
        let above = transform.world_to_screen(CoordPoint::from_raw(0, 10));
        let below = transform.world_to_screen(CoordPoint::from_raw(0, -10));
        assert!(above.y() < 50.0);
        assert!(below.y() > 50.0);
        assert_eq!(above.x(), 50.0);
    }

    #[test]
    fn test_scale_value() {
        let transform = CoordTransform::new(10.0, 10.0).with_scale(0.5);
        assert_approx_eq!(f32, transform.scale_value(Coord::from_raw(30)), 15.0);
    }

    #[test]
    fn test_line_width_px_ignores_zoom() {
        assert_eq!(CoordTransform::line_width_px(LineWidth::Small), 1.0);
        assert_eq!(CoordTransform::line_width_px(LineWidth::Medium), 3.0);
        assert_eq!(CoordTransform::line_width_px(LineWidth::Large), 5.0);
        assert_eq!(CoordTransform::line_width_px(LineWidth::Smallest), 1.0);
    }

    #[test]
    fn test_angle_helpers_flip_sign() {
        assert_eq!(CoordTransform::screen_angle(90.0), -90.0);
        assert_eq!(CoordTransform::screen_sweep(-45.0), 45.0);
        assert_eq!(CoordTransform::screen_rotation(180.0), -180.0);
    }
}

#[cfg(test)]
mod proptest_tests {
    use float_cmp::approx_eq;
    use proptest::prelude::*;

    use super::*;

    // ===================
    // Strategies
    // ===================

    fn transform_strategy() -> impl Strategy<Value = CoordTransform> {
        (
            10.0f64..2000.0,
            10.0f64..2000.0,
            -1e6f64..1e6,
            -1e6f64..1e6,
            1e-4f64..1.0,
        )
            .prop_map(|(w, h, cx, cy, scale)| {
                CoordTransform::new(w, h)
                    .with_center(cx, cy)
                    .with_scale(scale)
            })
    }

    fn bounds_strategy() -> impl Strategy<Value = CoordRect> {
        (
            -1_000_000i32..1_000_000,
            -1_000_000i32..1_000_000,
            1i32..1_000_000,
            1i32..1_000_000,
        )
            .prop_map(|(x, y, w, h)| {
                CoordRect::new(CoordPoint::from_raw(x, y), CoordPoint::from_raw(x + w, y + h))
            })
    }

    // ===================
    // Property Test Functions
    // ===================

    /// Screen positions map back to the design point they came from.
    fn check_screen_round_trip(
        transform: CoordTransform,
        x: i32,
        y: i32,
    ) -> Result<(), TestCaseError> {
        let screen = transform.world_to_screen(CoordPoint::from_raw(x, y));
        let (wx, wy) = transform.screen_to_world(screen);
        // f32 screen precision, expressed in design units.
        let tolerance = 1.0 / transform.scale() * 0.01 + 1.0;
        prop_assert!(approx_eq!(f64, wx, f64::from(x), epsilon = tolerance));
        prop_assert!(approx_eq!(f64, wy, f64::from(y), epsilon = tolerance));
        Ok(())
    }

    /// Auto-zoomed bounds land inside the canvas.
    fn check_auto_zoom_fits(bounds: CoordRect) -> Result<(), TestCaseError> {
        let mut transform = CoordTransform::new(400.0, 300.0);
        transform.auto_zoom(&bounds);
        for corner in bounds.corners() {
            let p = transform.world_to_screen(corner);
            prop_assert!(p.x() >= -0.01 && p.x() <= 400.01);
            prop_assert!(p.y() >= -0.01 && p.y() <= 300.01);
        }
        Ok(())
    }

    // ===================
    // Proptest Wrappers
    // ===================

    proptest! {
        #[test]
        fn screen_round_trip(
            transform in transform_strategy(),
            x in -1_000_000i32..1_000_000,
            y in -1_000_000i32..1_000_000,
        ) {
            check_screen_round_trip(transform, x, y)?;
        }

        #[test]
        fn auto_zoom_fits(bounds in bounds_strategy()) {
            check_auto_zoom_fits(bounds)?;
        }
    }
}
