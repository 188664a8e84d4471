//! Geometric schematic primitives.

use log::warn;

use stencil_core::{
    color::Color,
    coord::Coord,
    draw::Stroke,
    geometry::{Bounds, Point, Size},
    model::{
        Bezier, Ellipse, EllipticalArc, Image, Junction, Line, LineShape, LineWidth, Pie, Polygon,
        Polyline, Rectangle, RoundedRectangle, Wire, sch,
    },
};

use super::SchComponentRenderer;
use crate::{
    context::{DrawError, RenderContext},
    render::{FULL_CIRCLE_EPSILON, Outcome, sweep_degrees},
    transform::CoordTransform,
};

/// Smallest drawn line-end shape, in pixels.
const MIN_LINE_SHAPE_PX: f32 = 4.0;

/// Smallest drawn junction dot, in pixels.
const MIN_JUNCTION_PX: f32 = 2.0;

impl SchComponentRenderer<'_> {
    pub(super) fn draw_line(
        &self,
        line: &Line,
        ctx: &mut dyn RenderContext,
    ) -> Result<Outcome, DrawError> {
        let stroke = Self::stroke(line.color, line.line_width).with_style(line.line_style);
        ctx.draw_line(self.point(line.start), self.point(line.end), &stroke)?;
        Ok(Outcome::Drawn)
    }

    pub(super) fn draw_rectangle(
        &self,
        rect: &Rectangle,
        ctx: &mut dyn RenderContext,
    ) -> Result<Outcome, DrawError> {
        let bounds = self.bounds(&rect.rect);
        if let Some(fill) = Self::fill(rect.fill_color, rect.is_solid, rect.transparent) {
            ctx.fill_rectangle(bounds, fill)?;
        }
        ctx.draw_rectangle(bounds, &Self::stroke(rect.color, rect.line_width))?;
        Ok(Outcome::Drawn)
    }

    pub(super) fn draw_rounded_rectangle(
        &self,
        rect: &RoundedRectangle,
        ctx: &mut dyn RenderContext,
    ) -> Result<Outcome, DrawError> {
        let bounds = self.bounds(&rect.rect);
        let rx = self.length(rect.corner_x_radius);
        let ry = self.length(rect.corner_y_radius);
        if let Some(fill) = Self::fill(rect.fill_color, rect.is_solid, rect.transparent) {
            ctx.fill_rounded_rectangle(bounds, rx, ry, fill)?;
        }
        ctx.draw_rounded_rectangle(bounds, rx, ry, &Self::stroke(rect.color, rect.line_width))?;
        Ok(Outcome::Drawn)
    }

    pub(super) fn draw_wire(
        &self,
        wire: &Wire,
        ctx: &mut dyn RenderContext,
    ) -> Result<Outcome, DrawError> {
        if wire.vertices.len() < 2 {
            warn!(vertices = wire.vertices.len(); "Wire needs at least two vertices");
            return Ok(Outcome::Skipped);
        }
        let stroke = Stroke::round(wire.color, CoordTransform::line_width_px(wire.line_width));
        ctx.draw_polyline(&self.points(&wire.vertices), &stroke)?;
        Ok(Outcome::Drawn)
    }

    pub(super) fn draw_polygon(
        &self,
        polygon: &Polygon,
        ctx: &mut dyn RenderContext,
    ) -> Result<Outcome, DrawError> {
        if polygon.vertices.len() < 3 {
            warn!(vertices = polygon.vertices.len(); "Polygon needs at least three vertices");
            return Ok(Outcome::Skipped);
        }
        let points = self.points(&polygon.vertices);
        if let Some(fill) = Self::fill(polygon.fill_color, polygon.is_solid, polygon.transparent) {
            ctx.fill_polygon(&points, fill)?;
        }
        ctx.draw_polygon(&points, &Self::stroke(polygon.color, polygon.line_width))?;
        Ok(Outcome::Drawn)
    }

    pub(super) fn draw_polyline(
        &self,
        polyline: &Polyline,
        ctx: &mut dyn RenderContext,
    ) -> Result<Outcome, DrawError> {
        if polyline.vertices.len() < 2 {
            warn!(vertices = polyline.vertices.len(); "Polyline needs at least two vertices");
            return Ok(Outcome::Skipped);
        }
        let points = self.points(&polyline.vertices);
        let stroke = Self::stroke(polyline.color, polyline.line_width).with_style(polyline.line_style);
        ctx.draw_polyline(&points, &stroke)?;

        let size = (polyline.shape_size.factor() * stroke.width()).max(MIN_LINE_SHAPE_PX);
        let cap_stroke = Stroke::solid(polyline.color, stroke.width());
        let last = points.len() - 1;
        draw_line_shape(
            ctx,
            polyline.start_shape,
            points[0],
            points[1],
            size,
            &cap_stroke,
        )?;
        draw_line_shape(
            ctx,
            polyline.end_shape,
            points[last],
            points[last - 1],
            size,
            &cap_stroke,
        )?;
        Ok(Outcome::Drawn)
    }

    pub(super) fn draw_arc(
        &self,
        arc: &sch::Arc,
        ctx: &mut dyn RenderContext,
    ) -> Result<Outcome, DrawError> {
        let radius = self.length(arc.radius);
        self.stroke_arc(
            ctx,
            self.point(arc.location),
            (radius, radius),
            (arc.start_angle, arc.end_angle),
            &Self::stroke(arc.color, arc.line_width),
        )
    }

    pub(super) fn draw_elliptical_arc(
        &self,
        arc: &EllipticalArc,
        ctx: &mut dyn RenderContext,
    ) -> Result<Outcome, DrawError> {
        self.stroke_arc(
            ctx,
            self.point(arc.location),
            (self.length(arc.primary_radius), self.length(arc.secondary_radius)),
            (arc.start_angle, arc.end_angle),
            &Self::stroke(arc.color, arc.line_width),
        )
    }

    /// Strokes a counter-clockwise design arc; a full turn becomes an
    /// ellipse outline.
    fn stroke_arc(
        &self,
        ctx: &mut dyn RenderContext,
        center: Point,
        (radius_x, radius_y): (f32, f32),
        (start, end): (f64, f64),
        stroke: &Stroke,
    ) -> Result<Outcome, DrawError> {
        if radius_x <= 0.0 || radius_y <= 0.0 {
            return Ok(Outcome::Skipped);
        }
        let sweep = sweep_degrees(start, end);
        if 360.0 - sweep < FULL_CIRCLE_EPSILON {
            ctx.draw_ellipse(center, radius_x, radius_y, stroke)?;
        } else {
            ctx.draw_arc(
                center,
                radius_x,
                radius_y,
                CoordTransform::screen_angle(start),
                CoordTransform::screen_sweep(sweep),
                stroke,
            )?;
        }
        Ok(Outcome::Drawn)
    }

    pub(super) fn draw_bezier(
        &self,
        bezier: &Bezier,
        ctx: &mut dyn RenderContext,
    ) -> Result<Outcome, DrawError> {
        let points = self.points(&bezier.control_points);
        if points.len() < 2 {
            warn!(points = points.len(); "Bezier needs at least two control points");
            return Ok(Outcome::Skipped);
        }
        let stroke = Self::stroke(bezier.color, bezier.line_width);
        if points.len() < 4 {
            ctx.draw_polyline(&points, &stroke)?;
            return Ok(Outcome::Drawn);
        }

        let mut i = 0;
        while i + 3 < points.len() {
            ctx.draw_bezier(points[i], points[i + 1], points[i + 2], points[i + 3], &stroke)?;
            i += 3;
        }
        // Control points that do not complete a segment are joined straight.
        if i + 1 < points.len() {
            ctx.draw_polyline(&points[i..], &stroke)?;
        }
        Ok(Outcome::Drawn)
    }

    pub(super) fn draw_ellipse(
        &self,
        ellipse: &Ellipse,
        ctx: &mut dyn RenderContext,
    ) -> Result<Outcome, DrawError> {
        let center = self.point(ellipse.location);
        let rx = self.length(ellipse.radius_x);
        let ry = self.length(ellipse.radius_y);
        if let Some(fill) = Self::fill(ellipse.fill_color, ellipse.is_solid, ellipse.transparent) {
            ctx.fill_ellipse(center, rx, ry, fill)?;
        }
        ctx.draw_ellipse(center, rx, ry, &Self::stroke(ellipse.color, ellipse.line_width))?;
        Ok(Outcome::Drawn)
    }

    pub(super) fn draw_pie(&self, pie: &Pie, ctx: &mut dyn RenderContext) -> Result<Outcome, DrawError> {
        let center = self.point(pie.location);
        let radius = self.length(pie.radius);
        if radius <= 0.0 {
            return Ok(Outcome::Skipped);
        }
        let stroke = Self::stroke(pie.color, pie.line_width);
        let fill = Self::fill(pie.fill_color, pie.is_solid, false);

        let sweep = sweep_degrees(pie.start_angle, pie.end_angle);
        if 360.0 - sweep < FULL_CIRCLE_EPSILON {
            if let Some(fill) = fill {
                ctx.fill_ellipse(center, radius, radius, fill)?;
            }
            ctx.draw_ellipse(center, radius, radius, &stroke)?;
            return Ok(Outcome::Drawn);
        }

        let start = CoordTransform::screen_angle(pie.start_angle);
        let sweep = CoordTransform::screen_sweep(sweep);
        if let Some(fill) = fill {
            ctx.fill_pie(center, radius, radius, start, sweep, fill)?;
        }
        ctx.draw_pie(center, radius, radius, start, sweep, &stroke)?;
        Ok(Outcome::Drawn)
    }

    pub(super) fn draw_junction(
        &self,
        junction: &Junction,
        ctx: &mut dyn RenderContext,
    ) -> Result<Outcome, DrawError> {
        let diameter = self
            .length(junction_diameter(junction.size))
            .max(MIN_JUNCTION_PX);
        let radius = diameter / 2.0;
        ctx.fill_ellipse(self.point(junction.location), radius, radius, junction.color)?;
        Ok(Outcome::Drawn)
    }

    /// Draws an embedded image, or a crossed-out box when it has no data.
    pub(super) fn draw_image(
        &self,
        image: &Image,
        ctx: &mut dyn RenderContext,
    ) -> Result<Outcome, DrawError> {
        let bounds = self.bounds(&image.rect);
        if image.data.is_empty() {
            let stroke = Stroke::solid(Color::GRAY, 1.0);
            ctx.draw_rectangle(bounds, &stroke)?;
            ctx.draw_line(
                Point::new(bounds.min_x(), bounds.min_y()),
                Point::new(bounds.max_x(), bounds.max_y()),
                &stroke,
            )?;
            ctx.draw_line(
                Point::new(bounds.max_x(), bounds.min_y()),
                Point::new(bounds.min_x(), bounds.max_y()),
                &stroke,
            )?;
            return Ok(Outcome::Drawn);
        }

        let target = if image.keep_aspect {
            image_dimensions(&image.data)
                .map(|(width, height)| fit_aspect(bounds, width, height))
                .unwrap_or(bounds)
        } else {
            bounds
        };
        ctx.draw_image(target, &image.data)?;
        Ok(Outcome::Drawn)
    }
}

fn junction_diameter(size: LineWidth) -> Coord {
    let mils = match size {
        LineWidth::Smallest => 15.0,
        LineWidth::Small => 30.0,
        LineWidth::Medium => 50.0,
        LineWidth::Large => 70.0,
    };
    Coord::from_mils(mils)
}

/// Draws the decoration at polyline end `tip`, whose neighbour on the line
/// is `from`.
fn draw_line_shape(
    ctx: &mut dyn RenderContext,
    shape: LineShape,
    tip: Point,
    from: Point,
    size: f32,
    stroke: &Stroke,
) -> Result<(), DrawError> {
    if shape == LineShape::None {
        return Ok(());
    }
    let delta = tip.sub_point(from);
    let length = delta.hypot();
    if length <= f32::EPSILON {
        return Ok(());
    }
    let direction = delta.scale(1.0 / length);
    let normal = Point::new(-direction.y(), direction.x());
    let half = size / 2.0;
    let back = tip.sub_point(direction.scale(size));
    let color = stroke.color();

    match shape {
        LineShape::Arrow => ctx.draw_polyline(
            &[
                back.add_point(normal.scale(half)),
                tip,
                back.sub_point(normal.scale(half)),
            ],
            stroke,
        ),
        LineShape::SolidArrow => ctx.fill_polygon(
            &[
                tip,
                back.add_point(normal.scale(half)),
                back.sub_point(normal.scale(half)),
            ],
            color,
        ),
        LineShape::Tail => ctx.draw_polyline(&tail_points(tip, back, normal, half), stroke),
        LineShape::SolidTail => ctx.fill_polygon(&tail_points(tip, back, normal, half), color),
        LineShape::Circle => ctx.fill_ellipse(tip, half, half, color),
        LineShape::Square => ctx.fill_rectangle(Bounds::new_from_center(tip, Size::new(size, size)), color),
        LineShape::None => Ok(()),
    }
}

fn tail_points(tip: Point, back: Point, normal: Point, half: f32) -> [Point; 3] {
    [
        tip.add_point(normal.scale(half)),
        back,
        tip.sub_point(normal.scale(half)),
    ]
}

/// Pixel dimensions from a PNG or BMP header.
fn image_dimensions(data: &[u8]) -> Option<(u32, u32)> {
    const PNG_SIGNATURE: &[u8] = b"\x89PNG\r\n\x1a\n";
    if data.starts_with(PNG_SIGNATURE) {
        let width = u32::from_be_bytes(data.get(16..20)?.try_into().ok()?);
        let height = u32::from_be_bytes(data.get(20..24)?.try_into().ok()?);
        return (width > 0 && height > 0).then_some((width, height));
    }
    if data.starts_with(b"BM") {
        let width = i32::from_le_bytes(data.get(18..22)?.try_into().ok()?).unsigned_abs();
        let height = i32::from_le_bytes(data.get(22..26)?.try_into().ok()?).unsigned_abs();
        return (width > 0 && height > 0).then_some((width, height));
    }
    None
}

/// Largest box of the image's aspect ratio centered in `bounds`.
fn fit_aspect(bounds: Bounds, width: u32, height: u32) -> Bounds {
    let aspect = width as f32 / height as f32;
    let size = if bounds.width() / bounds.height().max(f32::EPSILON) > aspect {
        Size::new(bounds.height() * aspect, bounds.height())
    } else {
        Size::new(bounds.width(), bounds.width() / aspect)
    };
    Bounds::new_from_center(bounds.center(), size)
}

#[cfg(test)]
mod tests {
    use float_cmp::assert_approx_eq;
    use stencil_core::{
        coord::{CoordPoint, CoordRect},
        model::{LineShapeSize, SchComponent, SchPrimitive},
    };

    use super::*;
    use crate::{
        export::record::DrawCommand,
        options::RenderOptions,
        render::sch::tests::render,
    };

    fn render_one(primitive: SchPrimitive) -> Vec<DrawCommand> {
        let component = SchComponent {
            primitives: vec![primitive],
            ..SchComponent::default()
        };
        render(&component, &RenderOptions::default())
    }

    fn mils(x: f64, y: f64) -> CoordPoint {
        CoordPoint::from_mils(x, y)
    }

    #[test]
    fn test_line_uses_fixed_pixel_width() {
        let commands = render_one(SchPrimitive::Line(Line {
            start: mils(0.0, 0.0),
            end: mils(100.0, 0.0),
            line_width: LineWidth::Medium,
            ..Line::default()
        }));
        match commands.as_slice() {
            [DrawCommand::Line { from, to, stroke }] => {
                assert_approx_eq!(f32, to.x() - from.x(), 100.0, epsilon = 1e-3);
                assert_approx_eq!(f32, stroke.width(), 3.0);
            }
            other => panic!("unexpected commands {other:?}"),
        }
    }

    #[test]
    fn test_transparent_fill_is_translucent() {
        let commands = render_one(SchPrimitive::Rectangle(Rectangle {
            rect: CoordRect::new(mils(0.0, 0.0), mils(50.0, 50.0)),
            fill_color: Color::from_rgb(255, 0, 0),
            is_solid: true,
            transparent: true,
            ..Rectangle::default()
        }));
        assert!(matches!(
            commands.as_slice(),
            [DrawCommand::FillRectangle { color, .. }, DrawCommand::Rectangle { .. }]
                if color.a() == 0x80 && color.r() == 255
        ));
    }

    #[test]
    fn test_outline_only_when_not_solid() {
        let commands = render_one(SchPrimitive::Ellipse(Ellipse {
            radius_x: Coord::from_mils(20.0),
            radius_y: Coord::from_mils(10.0),
            ..Ellipse::default()
        }));
        assert!(matches!(commands.as_slice(), [DrawCommand::Ellipse { .. }]));
    }

    #[test]
    fn test_full_arc_draws_ellipse() {
        let commands = render_one(SchPrimitive::Arc(sch::Arc {
            radius: Coord::from_mils(50.0),
            start_angle: 0.0,
            end_angle: 360.0,
            ..sch::Arc::default()
        }));
        assert!(matches!(
            commands.as_slice(),
            [DrawCommand::Ellipse { radius_x, radius_y, .. }] if radius_x == radius_y
        ));
    }

    #[test]
    fn test_quarter_arc_is_counter_clockwise_in_design() {
        let commands = render_one(SchPrimitive::Arc(sch::Arc {
            radius: Coord::from_mils(50.0),
            start_angle: 0.0,
            end_angle: 90.0,
            ..sch::Arc::default()
        }));
        match commands.as_slice() {
            [DrawCommand::Arc { start_angle, sweep_angle, .. }] => {
                assert_approx_eq!(f32, *start_angle, 0.0);
                assert_approx_eq!(f32, *sweep_angle, -90.0);
            }
            other => panic!("unexpected commands {other:?}"),
        }
    }

    #[test]
    fn test_pie_fills_then_outlines() {
        let commands = render_one(SchPrimitive::Pie(Pie {
            radius: Coord::from_mils(40.0),
            start_angle: 90.0,
            end_angle: 180.0,
            is_solid: true,
            fill_color: Color::from_rgb(0, 0, 255),
            ..Pie::default()
        }));
        assert!(matches!(
            commands.as_slice(),
            [DrawCommand::FillPie { start_angle, .. }, DrawCommand::Pie { .. }] if *start_angle == -90.0
        ));
    }

    #[test]
    fn test_bezier_segments_and_leftover() {
        let points = (0..6).map(|i| mils(f64::from(i) * 10.0, 0.0)).collect();
        let commands = render_one(SchPrimitive::Bezier(Bezier {
            control_points: points,
            ..Bezier::default()
        }));
        assert!(matches!(
            commands.as_slice(),
            [DrawCommand::Bezier { .. }, DrawCommand::Polyline { points, .. }] if points.len() == 3
        ));
    }

    #[test]
    fn test_short_bezier_is_polyline() {
        let commands = render_one(SchPrimitive::Bezier(Bezier {
            control_points: vec![mils(0.0, 0.0), mils(10.0, 10.0), mils(20.0, 0.0)],
            ..Bezier::default()
        }));
        assert!(matches!(commands.as_slice(), [DrawCommand::Polyline { .. }]));
    }

    #[test]
    fn test_degenerate_polygon_skipped() {
        let commands = render_one(SchPrimitive::Polygon(Polygon {
            vertices: vec![mils(0.0, 0.0), mils(10.0, 0.0)],
            ..Polygon::default()
        }));
        assert!(commands.is_empty());
    }

    #[test]
    fn test_polyline_solid_arrow_points_outward() {
        let commands = render_one(SchPrimitive::Polyline(Polyline {
            vertices: vec![mils(0.0, 0.0), mils(100.0, 0.0)],
            end_shape: LineShape::SolidArrow,
            shape_size: LineShapeSize::Small,
            ..Polyline::default()
        }));
        match commands.as_slice() {
            [DrawCommand::Polyline { points: line, .. }, DrawCommand::FillPolygon { points, .. }] => {
                let tip = line[1];
                assert_eq!(points[0], tip);
                // Base of the arrow sits back along the line.
                assert!(points[1].x() < tip.x());
                assert_approx_eq!(f32, tip.x() - points[1].x(), 4.0, epsilon = 1e-3);
            }
            other => panic!("unexpected commands {other:?}"),
        }
    }

    #[test]
    fn test_polyline_circle_cap_at_start() {
        let commands = render_one(SchPrimitive::Polyline(Polyline {
            vertices: vec![mils(0.0, 0.0), mils(0.0, 100.0)],
            start_shape: LineShape::Circle,
            shape_size: LineShapeSize::Large,
            ..Polyline::default()
        }));
        assert!(matches!(
            commands.as_slice(),
            [DrawCommand::Polyline { .. }, DrawCommand::FillEllipse { radius_x, .. }] if *radius_x == 4.0
        ));
    }

    #[test]
    fn test_junction_has_minimum_size() {
        let transform = CoordTransform::new(100.0, 100.0).with_scale(1e-7);
        let options = RenderOptions::default();
        let renderer = SchComponentRenderer::new(&transform, &options);
        let mut ctx = crate::export::record::RecordingContext::new();
        renderer
            .draw_junction(&Junction::default(), &mut ctx)
            .unwrap();
        assert!(matches!(
            ctx.commands(),
            [DrawCommand::FillEllipse { radius_x, .. }] if *radius_x == 1.0
        ));
    }

    #[test]
    fn test_empty_image_placeholder() {
        let commands = render_one(SchPrimitive::Image(Image {
            rect: CoordRect::new(mils(0.0, 0.0), mils(100.0, 50.0)),
            ..Image::default()
        }));
        assert_eq!(commands.len(), 3);
        assert!(commands.iter().all(|c| match c {
            DrawCommand::Rectangle { stroke, .. } | DrawCommand::Line { stroke, .. } =>
                stroke.color() == Color::GRAY,
            _ => false,
        }));
    }

    #[test]
    fn test_image_keeps_png_aspect() {
        let mut png = b"\x89PNG\r\n\x1a\n\0\0\0\x0dIHDR".to_vec();
        png.extend_from_slice(&20u32.to_be_bytes());
        png.extend_from_slice(&10u32.to_be_bytes());
        assert_eq!(image_dimensions(&png), Some((20, 10)));

        let commands = render_one(SchPrimitive::Image(Image {
            rect: CoordRect::new(mils(0.0, 0.0), mils(100.0, 100.0)),
            data: png,
            keep_aspect: true,
            ..Image::default()
        }));
        match commands.as_slice() {
            [DrawCommand::Image { bounds, .. }] => {
                assert_approx_eq!(f32, bounds.width(), 100.0, epsilon = 1e-3);
                assert_approx_eq!(f32, bounds.height(), 50.0, epsilon = 1e-3);
            }
            other => panic!("unexpected commands {other:?}"),
        }
    }
}
