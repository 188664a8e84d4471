//! Schematic symbol renderer.
//!
//! Primitives are drawn in fixed back-to-front phases. Within a phase each
//! kind draws in the listed order, and primitives of one kind keep their
//! order in the component:
//!
//! | Phase | Primitives |
//! |-------|------------|
//! | images | image |
//! | filled | polygon, rectangle, rounded rectangle, ellipse, pie, text frame |
//! | lines | line, arc, elliptical arc, polyline, bezier, wire |
//! | junctions | junction |
//! | pins | pin |
//! | text | label, parameter, net label, power object, symbol |
//!
//! Schematic line weights are fixed pixel widths
//! ([`CoordTransform::line_width_px`]); everything else scales with zoom.

mod pin;
mod power;
mod shapes;
mod text_frame;

use log::info;

use stencil_core::{
    color::Color,
    coord::{Coord, CoordPoint, CoordRect},
    draw::{FontSpec, Stroke, TextStyle},
    geometry::{Bounds, Point},
    model::{LineWidth, SchComponent, SchFont, SchPrimitive, TextJustification},
};

use crate::{
    context::{DrawError, RenderContext},
    options::RenderOptions,
    render::{
        Outcome, RenderSummary,
        text::draw_text_rotated,
    },
    transform::CoordTransform,
};

/// Alpha of fills on shapes marked transparent.
const TRANSPARENT_FILL_ALPHA: u8 = 0x80;

/// Back-to-front draw rank: images, then filled shapes, lines and curves,
/// junctions, pins and finally text. Every variant has its own slot so
/// e.g. all polygons draw before any rectangle.
fn draw_rank(primitive: &SchPrimitive) -> u8 {
    match primitive {
        SchPrimitive::Image(_) => 0,
        SchPrimitive::Polygon(_) => 1,
        SchPrimitive::Rectangle(_) => 2,
        SchPrimitive::RoundedRectangle(_) => 3,
        SchPrimitive::Ellipse(_) => 4,
        SchPrimitive::Pie(_) => 5,
        SchPrimitive::TextFrame(_) => 6,
        SchPrimitive::Line(_) => 7,
        SchPrimitive::Arc(_) => 8,
        SchPrimitive::EllipticalArc(_) => 9,
        SchPrimitive::Polyline(_) => 10,
        SchPrimitive::Bezier(_) => 11,
        SchPrimitive::Wire(_) => 12,
        SchPrimitive::Junction(_) => 13,
        SchPrimitive::Pin(_) => 14,
        SchPrimitive::Label(_) => 15,
        SchPrimitive::Parameter(_) => 16,
        SchPrimitive::NetLabel(_) => 17,
        SchPrimitive::PowerObject(_) => 18,
        SchPrimitive::Symbol(_) => 19,
    }
}

/// Draws [`SchComponent`]s.
///
/// # Examples
///
/// ```
/// use stencil::{CoordTransform, RenderOptions};
/// use stencil::export::record::RecordingContext;
/// use stencil::render::SchComponentRenderer;
/// use stencil_core::coord::CoordPoint;
/// use stencil_core::model::{Line, SchComponent, SchPrimitive};
///
/// let mut component = SchComponent::default();
/// component.primitives.push(SchPrimitive::Line(Line {
///     end: CoordPoint::from_mils(100.0, 0.0),
///     ..Line::default()
/// }));
///
/// let options = RenderOptions::default();
/// let transform = CoordTransform::new(800.0, 600.0).with_scale(1e-4);
/// let mut ctx = RecordingContext::new();
/// let summary = SchComponentRenderer::new(&transform, &options).render(&component, &mut ctx);
/// assert_eq!(summary.drawn, 1);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct SchComponentRenderer<'a> {
    transform: &'a CoordTransform,
    options: &'a RenderOptions,
}

impl<'a> SchComponentRenderer<'a> {
    pub fn new(transform: &'a CoordTransform, options: &'a RenderOptions) -> Self {
        Self { transform, options }
    }

    /// Draws every primitive of `component` that belongs to the selected
    /// part.
    pub fn render(&self, component: &SchComponent, ctx: &mut dyn RenderContext) -> RenderSummary {
        info!(
            name = component.name.as_str(),
            primitives = component.primitives.len();
            "Rendering schematic component"
        );

        let mut ordered: Vec<_> = component.primitives.iter().enumerate().collect();
        // Stable: same-kind primitives keep insertion order.
        ordered.sort_by_key(|(_, primitive)| draw_rank(primitive));

        let mut summary = RenderSummary::default();
        for (index, primitive) in ordered {
            let outcome = if self.is_selected(primitive) {
                self.draw_primitive(component, primitive, ctx)
            } else {
                Ok(Outcome::Skipped)
            };
            summary.record(primitive.kind(), index, outcome);
        }

        info!(
            name = component.name.as_str(),
            drawn = summary.drawn,
            skipped = summary.skipped,
            failed = summary.failed;
            "Schematic component rendered"
        );
        summary
    }

    fn is_selected(&self, primitive: &SchPrimitive) -> bool {
        self.options
            .part()
            .is_none_or(|part| primitive.belongs_to_part(part))
    }

    fn draw_primitive(
        &self,
        component: &SchComponent,
        primitive: &SchPrimitive,
        ctx: &mut dyn RenderContext,
    ) -> Result<Outcome, DrawError> {
        match primitive {
            SchPrimitive::Pin(pin) => self.draw_pin(pin, ctx),
            SchPrimitive::Line(line) => self.draw_line(line, ctx),
            SchPrimitive::Label(label) => {
                if label.hidden {
                    return Ok(Outcome::Skipped);
                }
                self.draw_label_text(
                    ctx,
                    component.resolve_text(&label.text),
                    label.location,
                    &label.font,
                    label.color,
                    label.rotation,
                    label.justification,
                    label.mirrored,
                )
            }
            SchPrimitive::Rectangle(rect) => self.draw_rectangle(rect, ctx),
            SchPrimitive::Wire(wire) => self.draw_wire(wire, ctx),
            SchPrimitive::Polygon(polygon) => self.draw_polygon(polygon, ctx),
            SchPrimitive::Polyline(polyline) => self.draw_polyline(polyline, ctx),
            SchPrimitive::Arc(arc) => self.draw_arc(arc, ctx),
            SchPrimitive::Bezier(bezier) => self.draw_bezier(bezier, ctx),
            SchPrimitive::Ellipse(ellipse) => self.draw_ellipse(ellipse, ctx),
            SchPrimitive::RoundedRectangle(rect) => self.draw_rounded_rectangle(rect, ctx),
            SchPrimitive::Pie(pie) => self.draw_pie(pie, ctx),
            SchPrimitive::NetLabel(label) => self.draw_label_text(
                ctx,
                &label.text,
                label.location,
                &label.font,
                label.color,
                label.rotation,
                label.justification,
                false,
            ),
            SchPrimitive::Junction(junction) => self.draw_junction(junction, ctx),
            SchPrimitive::Parameter(param) => {
                if param.hidden {
                    return Ok(Outcome::Skipped);
                }
                let value = component.resolve_text(&param.value);
                let text = if param.show_name {
                    format!("{}: {value}", param.name)
                } else {
                    value.to_string()
                };
                self.draw_label_text(
                    ctx,
                    &text,
                    param.location,
                    &param.font,
                    param.color,
                    param.rotation,
                    param.justification,
                    param.mirrored,
                )
            }
            SchPrimitive::TextFrame(frame) => self.draw_text_frame(component, frame, ctx),
            SchPrimitive::Image(image) => self.draw_image(image, ctx),
            SchPrimitive::EllipticalArc(arc) => self.draw_elliptical_arc(arc, ctx),
            SchPrimitive::PowerObject(power) => self.draw_power_object(power, ctx),
            SchPrimitive::Symbol(_) => Ok(Outcome::Skipped),
        }
    }

    /// Draws single-line text about its anchor. Mirroring flips the
    /// horizontal justification.
    #[allow(clippy::too_many_arguments)]
    fn draw_label_text(
        &self,
        ctx: &mut dyn RenderContext,
        text: &str,
        location: CoordPoint,
        font: &SchFont,
        color: Color,
        rotation: f64,
        justification: TextJustification,
        mirrored: bool,
    ) -> Result<Outcome, DrawError> {
        if text.is_empty() {
            return Ok(Outcome::Skipped);
        }
        let (mut h_align, v_align) = justification.align();
        if mirrored {
            h_align = h_align.mirrored();
        }
        let style = TextStyle::new(self.font(font), color).with_align(h_align, v_align);
        draw_text_rotated(
            ctx,
            text,
            self.point(location),
            CoordTransform::screen_rotation(rotation),
            &style,
            &self.options.legibility(),
        )?;
        Ok(Outcome::Drawn)
    }

    fn point(&self, point: CoordPoint) -> Point {
        self.transform.world_to_screen(point)
    }

    fn points(&self, points: &[CoordPoint]) -> Vec<Point> {
        points.iter().map(|&p| self.point(p)).collect()
    }

    fn bounds(&self, rect: &CoordRect) -> Bounds {
        Bounds::from_corners(self.point(rect.location1()), self.point(rect.location2()))
    }

    fn length(&self, length: Coord) -> f32 {
        self.transform.scale_value(length)
    }

    fn font(&self, font: &SchFont) -> FontSpec {
        FontSpec::new(font.family.as_str(), self.length(font.world_height()))
            .with_bold(font.bold)
            .with_italic(font.italic)
    }

    fn stroke(color: Color, width: LineWidth) -> Stroke {
        Stroke::new(color, CoordTransform::line_width_px(width))
    }

    /// Fill color of a closed shape, if it is filled at all.
    fn fill(fill_color: Color, is_solid: bool, transparent: bool) -> Option<Color> {
        is_solid.then(|| {
            if transparent {
                fill_color.with_alpha(TRANSPARENT_FILL_ALPHA)
            } else {
                fill_color
            }
        })
    }
}
