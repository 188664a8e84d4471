//! Power ports.
//!
//! The glyph is drawn in a local frame: origin on the port location, +X
//! along the stub, in units of ten mils. The frame is rotated, then flipped
//! across its Y axis when mirrored. The net name stays upright.

use stencil_core::{
    coord::Coord,
    draw::{HorizontalAlign, Stroke, TextStyle, VerticalAlign},
    geometry::Point,
    model::{LineWidth, PowerObject, PowerStyle},
};

use super::SchComponentRenderer;
use crate::{
    context::{DrawError, RenderContext, with_saved_state},
    render::{Outcome, text::draw_text_line},
    transform::CoordTransform,
};

const STUB_MILS: f64 = 50.0;
const UNIT_MILS: f64 = 10.0;

/// Net name distance past the end of the stub, in glyph units.
const NAME_OFFSET_UNITS: f32 = 7.0;

impl SchComponentRenderer<'_> {
    pub(super) fn draw_power_object(
        &self,
        power: &PowerObject,
        ctx: &mut dyn RenderContext,
    ) -> Result<Outcome, DrawError> {
        let origin = self.point(power.location);
        let rotation = CoordTransform::screen_rotation(power.rotation);
        let stub = self.length(Coord::from_mils(STUB_MILS));
        let unit = self.length(Coord::from_mils(UNIT_MILS));
        let stroke = Self::stroke(power.color, LineWidth::Small);

        with_saved_state(&mut *ctx, |ctx| {
            ctx.translate(origin.x(), origin.y())?;
            if rotation != 0.0 {
                ctx.rotate(rotation)?;
            }
            if power.mirrored {
                ctx.scale(-1.0, 1.0)?;
            }
            ctx.draw_line(Point::default(), Point::new(stub, 0.0), &stroke)?;
            draw_glyph(ctx, power.style, stub, unit, &stroke)
        })?;

        if power.show_net_name && !power.text.is_empty() {
            let mut direction = Point::from_angle(rotation);
            if power.mirrored {
                direction = direction.scale(-1.0);
            }
            let anchor = origin.add_point(direction.scale(stub + unit * NAME_OFFSET_UNITS));
            let (h_align, v_align) = name_alignment(direction);
            let style = TextStyle::new(self.font(&power.font), power.color).with_align(h_align, v_align);
            draw_text_line(ctx, &power.text, anchor, &style, &self.options.legibility())?;
        }
        Ok(Outcome::Drawn)
    }
}

/// Aligns the net name so it grows away from the glyph.
fn name_alignment(direction: Point) -> (HorizontalAlign, VerticalAlign) {
    if direction.x().abs() >= direction.y().abs() {
        if direction.x() >= 0.0 {
            (HorizontalAlign::Left, VerticalAlign::Middle)
        } else {
            (HorizontalAlign::Right, VerticalAlign::Middle)
        }
    } else if direction.y() > 0.0 {
        (HorizontalAlign::Center, VerticalAlign::Top)
    } else {
        (HorizontalAlign::Center, VerticalAlign::Bottom)
    }
}

/// Draws the style glyph at the end of a stub of length `s`.
fn draw_glyph(
    ctx: &mut dyn RenderContext,
    style: PowerStyle,
    s: f32,
    u: f32,
    stroke: &Stroke,
) -> Result<(), DrawError> {
    let p = |x: f32, y: f32| Point::new(s + x * u, y * u);

    match style {
        PowerStyle::Bar => draw_bar(ctx, p(0.0, 0.0), 5.0 * u, stroke),
        PowerStyle::GostBar => {
            let thick = stroke.with_width(stroke.width() * 2.0);
            ctx.draw_line(p(0.0, -5.0), p(0.0, 5.0), &thick)
        }
        PowerStyle::Circle => ctx.draw_ellipse(p(2.0, 0.0), 2.0 * u, 2.0 * u, stroke),
        PowerStyle::Arrow => ctx.draw_polyline(&[p(0.0, -3.0), p(4.0, 0.0), p(0.0, 3.0)], stroke),
        PowerStyle::GostArrow => {
            ctx.draw_polyline(&[p(-3.0, -2.0), p(0.0, 0.0), p(-3.0, 2.0)], stroke)
        }
        PowerStyle::Wave => ctx.draw_bezier(
            p(0.0, -5.0),
            p(3.0, -2.5),
            p(-3.0, 2.5),
            p(0.0, 5.0),
            stroke,
        ),
        PowerStyle::PowerGround => {
            draw_bar(ctx, p(0.0, 0.0), 5.0 * u, stroke)?;
            draw_bar(ctx, p(2.0, 0.0), 3.0 * u, stroke)?;
            draw_bar(ctx, p(4.0, 0.0), 1.0 * u, stroke)
        }
        PowerStyle::GostPowerGround => {
            draw_bar(ctx, p(0.0, 0.0), 4.0 * u, stroke)?;
            draw_bar(ctx, p(2.0, 0.0), 2.5 * u, stroke)?;
            draw_bar(ctx, p(4.0, 0.0), 1.0 * u, stroke)
        }
        PowerStyle::SignalGround => {
            ctx.draw_polygon(&[p(0.0, -5.0), p(0.0, 5.0), p(5.0, 0.0)], stroke)
        }
        PowerStyle::Earth => {
            draw_bar(ctx, p(0.0, 0.0), 5.0 * u, stroke)?;
            for y in [-5.0, 0.0, 5.0] {
                ctx.draw_line(p(0.0, y), p(3.0, y - 2.0), stroke)?;
            }
            Ok(())
        }
        PowerStyle::GostEarth => {
            draw_bar(ctx, p(0.0, 0.0), 3.0 * u, stroke)?;
            draw_bar(ctx, p(1.5, 0.0), 2.0 * u, stroke)?;
            draw_bar(ctx, p(3.0, 0.0), 1.0 * u, stroke)?;
            ctx.draw_ellipse(p(1.5, 0.0), 4.0 * u, 4.0 * u, stroke)
        }
    }
}

/// Vertical bar of half-length `half` centered on `at`.
fn draw_bar(ctx: &mut dyn RenderContext, at: Point, half: f32, stroke: &Stroke) -> Result<(), DrawError> {
    ctx.draw_line(
        Point::new(at.x(), at.y() - half),
        Point::new(at.x(), at.y() + half),
        stroke,
    )
}

#[cfg(test)]
mod tests {
    use float_cmp::assert_approx_eq;
    use stencil_core::{
        coord::CoordPoint,
        model::{SchComponent, SchPrimitive},
    };

    use super::*;
    use crate::{export::record::DrawCommand, options::RenderOptions, render::sch::tests::render};

    fn render_power(power: PowerObject) -> Vec<DrawCommand> {
        let component = SchComponent {
            primitives: vec![SchPrimitive::PowerObject(power)],
            ..SchComponent::default()
        };
        render(&component, &RenderOptions::default())
    }

    #[test]
    fn test_bar_glyph_in_local_frame() {
        let commands = render_power(PowerObject {
            location: CoordPoint::from_mils(100.0, 0.0),
            text: "VCC".to_string(),
            ..PowerObject::default()
        });
        assert_eq!(commands[0], DrawCommand::SaveState);
        assert_eq!(commands[1], DrawCommand::Translate { dx: 600.0, dy: 500.0 });
        assert!(matches!(
            commands[2],
            DrawCommand::Line { to, .. } if to == Point::new(50.0, 0.0)
        ));
        assert!(matches!(
            commands[3],
            DrawCommand::Line { from, to, .. } if from.x() == 50.0 && to.x() == 50.0
        ));
        assert_eq!(commands[4], DrawCommand::RestoreState);
        match &commands[5] {
            DrawCommand::Text { text, position, style } => {
                assert_eq!(text, "VCC");
                assert_approx_eq!(f32, position.x(), 720.0, epsilon = 1e-3);
                assert_eq!(style.h_align(), HorizontalAlign::Left);
            }
            other => panic!("expected the net name, got {other:?}"),
        }
    }

    #[test]
    fn test_rotated_port_places_name_above() {
        let commands = render_power(PowerObject {
            text: "GND".to_string(),
            style: PowerStyle::PowerGround,
            rotation: 90.0,
            ..PowerObject::default()
        });
        assert!(commands.contains(&DrawCommand::Rotate { degrees: -90.0 }));
        let text = commands.iter().find_map(|c| match c {
            DrawCommand::Text { position, style, .. } => Some((*position, style.v_align())),
            _ => None,
        });
        let (position, v_align) = text.unwrap();
        assert!(position.y() < 500.0);
        assert_eq!(v_align, VerticalAlign::Bottom);
    }

    #[test]
    fn test_mirrored_port_flips_after_rotation() {
        let commands = render_power(PowerObject {
            text: "VCC".to_string(),
            rotation: 90.0,
            mirrored: true,
            ..PowerObject::default()
        });
        assert_eq!(
            &commands[..4],
            &[
                DrawCommand::SaveState,
                DrawCommand::Translate { dx: 500.0, dy: 500.0 },
                DrawCommand::Rotate { degrees: -90.0 },
                DrawCommand::Scale { sx: -1.0, sy: 1.0 },
            ]
        );
        let (position, v_align) = commands
            .iter()
            .find_map(|c| match c {
                DrawCommand::Text { position, style, .. } => Some((*position, style.v_align())),
                _ => None,
            })
            .unwrap();
        assert!(position.y() > 500.0);
        assert_eq!(v_align, VerticalAlign::Top);
    }

    #[test]
    fn test_hidden_net_name() {
        let commands = render_power(PowerObject {
            text: "VCC".to_string(),
            show_net_name: false,
            style: PowerStyle::Circle,
            ..PowerObject::default()
        });
        assert!(!commands.iter().any(|c| matches!(c, DrawCommand::Text { .. })));
        assert!(commands.iter().any(|c| matches!(c, DrawCommand::Ellipse { .. })));
    }

    #[test]
    fn test_every_style_balances_state() {
        for style in [
            PowerStyle::Circle,
            PowerStyle::Arrow,
            PowerStyle::Bar,
            PowerStyle::Wave,
            PowerStyle::PowerGround,
            PowerStyle::SignalGround,
            PowerStyle::Earth,
            PowerStyle::GostArrow,
            PowerStyle::GostPowerGround,
            PowerStyle::GostEarth,
            PowerStyle::GostBar,
        ] {
            let commands = render_power(PowerObject {
                style,
                ..PowerObject::default()
            });
            assert!(commands.len() > 3, "{style:?} drew nothing");
        }
    }
}
