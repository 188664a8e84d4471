//! Pads and vias.

use stencil_core::{
    color::Color,
    coord::Coord,
    draw::{FontSpec, HorizontalAlign, TextStyle, VerticalAlign},
    geometry::{Bounds, Point, Size},
    layer::Layer,
    model::{HoleShape, Pad, PadLayerShape, PadShape, Via},
};

use super::PcbComponentRenderer;
use crate::{
    context::{DrawError, RenderContext, with_saved_state},
    measure::AVERAGE_GLYPH_RATIO,
    render::Outcome,
    transform::CoordTransform,
};

/// Solder mask expansion used when a pad does not set its own.
const DEFAULT_MASK_EXPANSION_MILS: f64 = 4.0;

/// Largest designator height as a fraction of the pad's smaller side.
const DESIGNATOR_SIZE_RATIO: f32 = 0.5;

const DESIGNATOR_FONT_FAMILY: &str = "Arial";

impl PcbComponentRenderer<'_> {
    /// Draws masks, copper, the hole and the designator of one pad.
    pub(super) fn draw_pad(&self, pad: &Pad, ctx: &mut dyn RenderContext) -> Result<Outcome, DrawError> {
        let center = self.point(pad.location);
        let rotation = CoordTransform::screen_rotation(pad.rotation);
        let (top, bottom) = pad.sides();
        let expansion = self.length(
            pad.solder_mask_expansion
                .unwrap_or_else(|| Coord::from_mils(DEFAULT_MASK_EXPANSION_MILS)),
        );
        let copper = self.colors.color(pad.layer);

        with_saved_state(&mut *ctx, |ctx| {
            ctx.translate(center.x(), center.y())?;
            if rotation != 0.0 {
                ctx.rotate(rotation)?;
            }
            if bottom {
                let mask = self.colors.color(Layer::BOTTOM_SOLDER);
                self.fill_pad_shape(ctx, &pad.bottom, expansion, mask)?;
            }
            if top {
                let mask = self.colors.color(Layer::TOP_SOLDER);
                self.fill_pad_shape(ctx, &pad.top, expansion, mask)?;
            }
            if bottom {
                self.fill_pad_shape(ctx, &pad.bottom, 0.0, copper)?;
            }
            if top {
                self.fill_pad_shape(ctx, &pad.top, 0.0, copper)?;
            }
            Ok(())
        })?;

        if pad.has_hole() {
            self.draw_hole(pad, center, ctx)?;
        }
        self.draw_designator(pad, center, if top { &pad.top } else { &pad.bottom }, ctx)?;
        Ok(Outcome::Drawn)
    }

    /// Fills one pad outline centered on the local origin, grown by `grow`
    /// pixels on every side.
    fn fill_pad_shape(
        &self,
        ctx: &mut dyn RenderContext,
        shape: &PadLayerShape,
        grow: f32,
        color: Color,
    ) -> Result<(), DrawError> {
        let hw = self.length(shape.size_x) / 2.0 + grow;
        let hh = self.length(shape.size_y) / 2.0 + grow;
        if hw <= 0.0 || hh <= 0.0 {
            return Ok(());
        }
        let bounds = Bounds::from_corners(Point::new(-hw, -hh), Point::new(hw, hh));
        let short = hw.min(hh);

        match shape.shape {
            PadShape::Round if (hw - hh).abs() <= f32::EPSILON => {
                ctx.fill_ellipse(Point::default(), hw, hh, color)
            }
            // Oblong round pads are capsules.
            PadShape::Round => ctx.fill_rounded_rectangle(bounds, short, short, color),
            PadShape::Rectangular => ctx.fill_rectangle(bounds, color),
            PadShape::Octagonal => ctx.fill_polygon(&octagon(hw, hh, short * 0.5), color),
            PadShape::RoundedRectangle => {
                let radius = short * f32::from(shape.corner_radius_percent.min(100)) / 100.0;
                ctx.fill_rounded_rectangle(bounds, radius, radius, color)
            }
        }
    }

    fn draw_hole(&self, pad: &Pad, center: Point, ctx: &mut dyn RenderContext) -> Result<(), DrawError> {
        let color = self.colors.color(Layer::PAD_HOLE);
        let radius = self.length(pad.hole_size) / 2.0;
        if pad.hole_shape == HoleShape::Round {
            return ctx.fill_ellipse(center, radius, radius, color);
        }

        let rotation = CoordTransform::screen_rotation(pad.rotation + pad.hole_rotation);
        with_saved_state(ctx, |ctx| {
            ctx.translate(center.x(), center.y())?;
            if rotation != 0.0 {
                ctx.rotate(rotation)?;
            }
            match pad.hole_shape {
                HoleShape::Square => ctx.fill_rectangle(
                    Bounds::new_from_center(Point::default(), Size::new(radius * 2.0, radius * 2.0)),
                    color,
                ),
                _ => {
                    let length = self.length(pad.hole_slot_length).max(radius * 2.0);
                    let slot = Bounds::new_from_center(Point::default(), Size::new(length, radius * 2.0));
                    ctx.fill_rounded_rectangle(slot, radius, radius, color)
                }
            }
        })
    }

    /// Draws the designator upright at the pad center, sized to fit the pad.
    fn draw_designator(
        &self,
        pad: &Pad,
        center: Point,
        shape: &PadLayerShape,
        ctx: &mut dyn RenderContext,
    ) -> Result<(), DrawError> {
        let chars = pad.designator.chars().count();
        if chars == 0 {
            return Ok(());
        }
        let width = self.length(shape.size_x);
        let height = self.length(shape.size_y);
        let (sin, cos) = (pad.rotation as f32).to_radians().sin_cos();
        let screen_width = (width * cos).abs() + (height * sin).abs();

        let by_height = width.min(height) * DESIGNATOR_SIZE_RATIO;
        let by_width = screen_width / (chars as f32 * AVERAGE_GLYPH_RATIO);
        let size = by_height.min(by_width);
        if size <= self.options.legibility().min_pad_designator_px() {
            return Ok(());
        }

        let style = TextStyle::new(FontSpec::new(DESIGNATOR_FONT_FAMILY, size), Color::WHITE)
            .with_align(HorizontalAlign::Center, VerticalAlign::Middle);
        ctx.draw_text(&pad.designator, center, &style)
    }

    /// Draws a via: one disc when both end layers share a color, otherwise
    /// two half discs, then the hole.
    pub(super) fn draw_via(&self, via: &Via, ctx: &mut dyn RenderContext) -> Result<Outcome, DrawError> {
        let center = self.point(via.location);
        let radius = self.length(via.diameter) / 2.0;
        if radius <= 0.0 {
            return Ok(Outcome::Skipped);
        }

        let from = self.colors.color(via.from_layer);
        let to = self.colors.color(via.to_layer);
        if from == to {
            ctx.fill_ellipse(center, radius, radius, from)?;
        } else {
            ctx.fill_pie(center, radius, radius, 90.0, 180.0, from)?;
            ctx.fill_pie(center, radius, radius, -90.0, 180.0, to)?;
        }

        let hole = self.length(via.hole_size) / 2.0;
        if hole > 0.0 {
            ctx.fill_ellipse(center, hole, hole, self.colors.color(Layer::VIA_HOLE))?;
        }
        Ok(Outcome::Drawn)
    }
}

/// Octagon of half-size `hw` × `hh` with corners cut by `chamfer`.
fn octagon(hw: f32, hh: f32, chamfer: f32) -> [Point; 8] {
    [
        Point::new(-hw + chamfer, -hh),
        Point::new(hw - chamfer, -hh),
        Point::new(hw, -hh + chamfer),
        Point::new(hw, hh - chamfer),
        Point::new(hw - chamfer, hh),
        Point::new(-hw + chamfer, hh),
        Point::new(-hw, hh - chamfer),
        Point::new(-hw, -hh + chamfer),
    ]
}

#[cfg(test)]
mod tests {
    use float_cmp::assert_approx_eq;
    use stencil_core::{layer::LayerColors, model::PcbPrimitive};

    use super::*;
    use crate::{
        export::record::DrawCommand,
        render::pcb::tests::{render, render_with},
    };

    fn shape(shape: PadShape, x: f64, y: f64) -> PadLayerShape {
        PadLayerShape {
            shape,
            size_x: Coord::from_mils(x),
            size_y: Coord::from_mils(y),
            corner_radius_percent: 50,
        }
    }

    fn fill_colors(commands: &[DrawCommand]) -> Vec<Color> {
        commands
            .iter()
            .filter_map(|c| match c {
                DrawCommand::FillEllipse { color, .. }
                | DrawCommand::FillRectangle { color, .. }
                | DrawCommand::FillRoundedRectangle { color, .. }
                | DrawCommand::FillPolygon { color, .. } => Some(*color),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_through_hole_pad_draw_order() {
        let colors = LayerColors::default();
        let commands = render(vec![PcbPrimitive::Pad(Pad {
            top: shape(PadShape::Rectangular, 60.0, 60.0),
            bottom: shape(PadShape::Round, 60.0, 60.0),
            ..Pad::default()
        })]);
        assert_eq!(
            fill_colors(&commands),
            vec![
                colors.color(Layer::BOTTOM_SOLDER),
                colors.color(Layer::TOP_SOLDER),
                colors.color(Layer::MULTI_LAYER),
                colors.color(Layer::MULTI_LAYER),
                colors.color(Layer::PAD_HOLE),
            ]
        );
        // Top copper keeps its own shape.
        assert!(commands.iter().any(|c| matches!(c, DrawCommand::FillRectangle { .. })));
    }

    #[test]
    fn test_smd_pad_draws_one_side() {
        let colors = LayerColors::default();
        let commands = render(vec![PcbPrimitive::Pad(Pad {
            layer: Layer::TOP,
            top: shape(PadShape::Rectangular, 40.0, 20.0),
            hole_size: Coord::ZERO,
            ..Pad::default()
        })]);
        assert_eq!(
            fill_colors(&commands),
            vec![colors.color(Layer::TOP_SOLDER), colors.color(Layer::TOP)]
        );
    }

    #[test]
    fn test_mask_grows_by_expansion() {
        let commands = render(vec![PcbPrimitive::Pad(Pad {
            layer: Layer::TOP,
            top: shape(PadShape::Rectangular, 40.0, 20.0),
            hole_size: Coord::ZERO,
            solder_mask_expansion: Some(Coord::from_mils(5.0)),
            ..Pad::default()
        })]);
        let widths: Vec<f32> = commands
            .iter()
            .filter_map(|c| match c {
                DrawCommand::FillRectangle { bounds, .. } => Some(bounds.width()),
                _ => None,
            })
            .collect();
        assert_approx_eq!(f32, widths[0], 50.0, epsilon = 1e-3);
        assert_approx_eq!(f32, widths[1], 40.0, epsilon = 1e-3);
    }

    #[test]
    fn test_pad_rotation_is_local() {
        let commands = render(vec![PcbPrimitive::Pad(Pad {
            rotation: 30.0,
            hole_size: Coord::ZERO,
            ..Pad::default()
        })]);
        assert_eq!(commands[0], DrawCommand::SaveState);
        assert_eq!(commands[2], DrawCommand::Rotate { degrees: -30.0 });
    }

    #[test]
    fn test_oblong_round_pad_is_capsule() {
        let commands = render(vec![PcbPrimitive::Pad(Pad {
            layer: Layer::TOP,
            top: shape(PadShape::Round, 80.0, 40.0),
            hole_size: Coord::ZERO,
            ..Pad::default()
        })]);
        assert!(commands.iter().any(|c| matches!(
            c,
            DrawCommand::FillRoundedRectangle { radius_x, .. } if (*radius_x - 20.0).abs() < 1e-3
        )));
    }

    #[test]
    fn test_octagon_has_eight_points() {
        let commands = render(vec![PcbPrimitive::Pad(Pad {
            layer: Layer::BOTTOM,
            bottom: shape(PadShape::Octagonal, 60.0, 60.0),
            hole_size: Coord::ZERO,
            ..Pad::default()
        })]);
        assert!(commands.iter().any(|c| matches!(
            c,
            DrawCommand::FillPolygon { points, .. } if points.len() == 8
        )));
    }

    #[test]
    fn test_slot_hole_uses_combined_rotation() {
        let commands = render(vec![PcbPrimitive::Pad(Pad {
            rotation: 10.0,
            hole_rotation: 80.0,
            hole_shape: HoleShape::Slot,
            hole_slot_length: Coord::from_mils(60.0),
            ..Pad::default()
        })]);
        assert!(commands.contains(&DrawCommand::Rotate { degrees: -90.0 }));
        let hole = LayerColors::default().color(Layer::PAD_HOLE);
        assert!(commands.iter().any(|c| matches!(
            c,
            DrawCommand::FillRoundedRectangle { bounds, color, .. }
                if *color == hole && (bounds.width() - 60.0).abs() < 1e-3
        )));
    }

    #[test]
    fn test_designator_fits_pad() {
        let commands = render(vec![PcbPrimitive::Pad(Pad {
            designator: "12".to_string(),
            top: shape(PadShape::Round, 60.0, 60.0),
            ..Pad::default()
        })]);
        match commands.last() {
            Some(DrawCommand::Text { text, position, style }) => {
                assert_eq!(text, "12");
                assert_eq!(*position, Point::new(500.0, 500.0));
                assert_eq!(style.color(), Color::WHITE);
                // min(60 * 0.5, 60 / (2 * 0.6))
                assert_approx_eq!(f32, style.font().size(), 30.0, epsilon = 1e-3);
            }
            other => panic!("expected the designator, got {other:?}"),
        }
    }

    #[test]
    fn test_designator_skipped_on_tiny_pad() {
        let commands = render(vec![PcbPrimitive::Pad(Pad {
            designator: "1".to_string(),
            top: shape(PadShape::Round, 6.0, 6.0),
            bottom: shape(PadShape::Round, 6.0, 6.0),
            hole_size: Coord::ZERO,
            ..Pad::default()
        })]);
        assert!(!commands.iter().any(|c| matches!(c, DrawCommand::Text { .. })));
    }

    #[test]
    fn test_via_split_colors() {
        let colors = LayerColors::default();
        let commands = render(vec![PcbPrimitive::Via(Via {
            hole_size: Coord::ZERO,
            ..Via::default()
        })]);
        let pies: Vec<_> = commands
            .iter()
            .filter_map(|c| match c {
                DrawCommand::FillPie { start_angle, sweep_angle, color, .. } => {
                    Some((*start_angle, *sweep_angle, *color))
                }
                _ => None,
            })
            .collect();
        assert_eq!(
            pies,
            vec![
                (90.0, 180.0, colors.color(Layer::TOP)),
                (-90.0, 180.0, colors.color(Layer::BOTTOM)),
            ]
        );
        assert!(!commands.iter().any(|c| matches!(c, DrawCommand::FillEllipse { .. })));
    }

    #[test]
    fn test_via_same_color_single_disc() {
        let commands = render(vec![PcbPrimitive::Via(Via {
            from_layer: Layer::TOP,
            to_layer: Layer::TOP,
            hole_size: Coord::ZERO,
            ..Via::default()
        })]);
        assert!(matches!(commands.as_slice(), [DrawCommand::FillEllipse { .. }]));
    }

    #[test]
    fn test_via_hole_on_top() {
        let (_, commands) = render_with(
            vec![PcbPrimitive::Via(Via::default())],
            &LayerColors::default(),
        );
        match commands.last() {
            Some(DrawCommand::FillEllipse { radius_x, color, .. }) => {
                assert_approx_eq!(f32, *radius_x, 14.0, epsilon = 1e-3);
                assert_eq!(*color, LayerColors::default().color(Layer::VIA_HOLE));
            }
            other => panic!("expected the via hole, got {other:?}"),
        }
    }
}
