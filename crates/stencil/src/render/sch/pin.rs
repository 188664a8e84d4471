//! Pins: the connection line, electrical arrows and the name and
//! designator texts.

use stencil_core::{
    color::Color,
    coord::Coord,
    draw::{HorizontalAlign, Stroke, TextStyle, VerticalAlign},
    geometry::Point,
    model::{LineWidth, Pin, PinOrientation},
};

use super::SchComponentRenderer;
use crate::{
    context::{DrawError, RenderContext},
    render::{Outcome, text::draw_text_rotated},
};

/// Length of an electrical arrow along the pin, in mils.
const ARROW_LENGTH_MILS: f64 = 60.0;

/// Half the base width of an electrical arrow, in mils.
const ARROW_HALF_WIDTH_MILS: f64 = 25.0;

/// Distance between a pin text and the line or body, in mils.
const TEXT_GAP_MILS: f64 = 50.0;

/// Screen rotation of texts on vertical pins; they read bottom to top.
const VERTICAL_TEXT_ROTATION: f32 = -90.0;

impl SchComponentRenderer<'_> {
    pub(super) fn draw_pin(&self, pin: &Pin, ctx: &mut dyn RenderContext) -> Result<Outcome, DrawError> {
        if pin.hidden {
            return Ok(Outcome::Skipped);
        }

        let body = self.point(pin.location);
        let hot_spot = self.point(pin.hot_spot());
        let direction = screen_direction(pin.orientation);
        let stroke = Self::stroke(pin.color, LineWidth::Small);
        ctx.draw_line(body, hot_spot, &stroke)?;

        let arrow_length = self.length(Coord::from_mils(ARROW_LENGTH_MILS));
        let arrow_half = self.length(Coord::from_mils(ARROW_HALF_WIDTH_MILS));
        if pin.electrical.has_input_arrow() {
            // Apex on the body, pointing in.
            let base = body.add_point(direction.scale(arrow_length));
            draw_arrow(ctx, body, base, direction, arrow_half, &stroke)?;
        }
        if pin.electrical.has_output_arrow() {
            let offset = if pin.electrical.has_input_arrow() {
                arrow_length
            } else {
                0.0
            };
            let base = body.add_point(direction.scale(offset));
            let apex = base.add_point(direction.scale(arrow_length));
            draw_arrow(ctx, apex, base, direction, arrow_half, &stroke)?;
        }

        let gap = self.length(Coord::from_mils(TEXT_GAP_MILS));
        let mut rotation = if pin.orientation.is_vertical() {
            VERTICAL_TEXT_ROTATION
        } else {
            0.0
        };
        if pin.text_flipped {
            rotation += 180.0;
        }
        let font = self.font(&pin.font);
        let legibility = self.options.legibility();

        if pin.show_name && !pin.name.is_empty() {
            let mut h_align = match pin.orientation {
                PinOrientation::Right | PinOrientation::Up => HorizontalAlign::Right,
                PinOrientation::Left | PinOrientation::Down => HorizontalAlign::Left,
            };
            if pin.text_flipped {
                h_align = h_align.mirrored();
            }
            let style = TextStyle::new(font.clone(), pin.color).with_align(h_align, VerticalAlign::Middle);
            let anchor = body.sub_point(direction.scale(gap));
            draw_text_rotated(ctx, &pin.name, anchor, rotation, &style, &legibility)?;
        }

        if pin.show_designator && !pin.designator.is_empty() {
            let style =
                TextStyle::new(font, pin.color).with_align(HorizontalAlign::Center, VerticalAlign::Bottom);
            // Lift the text off the line in its own frame.
            let lift = Point::new(0.0, -gap / 2.0).rotate(rotation);
            let anchor = body.midpoint(hot_spot).add_point(lift);
            draw_text_rotated(ctx, &pin.designator, anchor, rotation, &style, &legibility)?;
        }

        Ok(Outcome::Drawn)
    }
}

/// Unit vector from the body to the hot spot on screen (Y down).
fn screen_direction(orientation: PinOrientation) -> Point {
    let (dx, dy) = orientation.direction();
    Point::new(dx as f32, -dy as f32)
}

/// White triangle with its apex at `apex` and its base centered on `base`.
fn draw_arrow(
    ctx: &mut dyn RenderContext,
    apex: Point,
    base: Point,
    direction: Point,
    half_width: f32,
    stroke: &Stroke,
) -> Result<(), DrawError> {
    let normal = Point::new(-direction.y(), direction.x()).scale(half_width);
    let points = [apex, base.add_point(normal), base.sub_point(normal)];
    ctx.fill_polygon(&points, Color::WHITE)?;
    ctx.draw_polygon(&points, stroke)
}
