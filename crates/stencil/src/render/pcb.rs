//! Footprint renderer.
//!
//! Every primitive goes into one draw queue keyed by its layer's priority.
//! The queue is sorted with a stable sort, so primitives on the same layer
//! keep their order in the component.

mod pad;

use log::{debug, info, warn};

use stencil_core::{
    color::Color,
    coord::{Coord, CoordPoint},
    draw::{FontSpec, HorizontalAlign, Stroke, TextStyle, VerticalAlign},
    geometry::{Bounds, Point},
    layer::{Layer, LayerColors},
    model::{ComponentBody, Fill, PcbComponent, PcbFontKind, PcbPrimitive, Region, Track, pcb},
};

use crate::{
    context::{DrawError, RenderContext, with_saved_state},
    options::RenderOptions,
    render::{
        FULL_CIRCLE_EPSILON, Outcome, RenderSummary, normalize_degrees, sweep_degrees,
        text::draw_text_line,
    },
    transform::CoordTransform,
};

/// Alpha of component body fills.
const BODY_FILL_ALPHA: u8 = 0x60;

/// Family used for stroke-font text.
const STROKE_FONT_FAMILY: &str = "Arial";

/// One queued primitive.
#[derive(Debug, Clone, Copy)]
struct QueueEntry<'c> {
    index: usize,
    layer: Layer,
    priority: u32,
    primitive: &'c PcbPrimitive,
}

/// Draws [`PcbComponent`]s.
///
/// # Examples
///
/// ```
/// use stencil::{CoordTransform, RenderOptions};
/// use stencil::export::record::RecordingContext;
/// use stencil::render::PcbComponentRenderer;
/// use stencil_core::layer::LayerColors;
/// use stencil_core::model::{PcbComponent, PcbPrimitive, Via};
///
/// let mut component = PcbComponent::default();
/// component.primitives.push(PcbPrimitive::Via(Via::default()));
///
/// let options = RenderOptions::default();
/// let colors = LayerColors::default();
/// let transform = CoordTransform::new(800.0, 600.0).with_scale(1e-4);
/// let mut ctx = RecordingContext::new();
/// let summary = PcbComponentRenderer::new(&transform, &options, &colors)
///     .render(&component, &mut ctx);
/// assert_eq!(summary.drawn, 1);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct PcbComponentRenderer<'a> {
    transform: &'a CoordTransform,
    options: &'a RenderOptions,
    colors: &'a LayerColors,
}

impl<'a> PcbComponentRenderer<'a> {
    pub fn new(
        transform: &'a CoordTransform,
        options: &'a RenderOptions,
        colors: &'a LayerColors,
    ) -> Self {
        Self {
            transform,
            options,
            colors,
        }
    }

    /// Draws every primitive of `component`, back layers first.
    pub fn render(&self, component: &PcbComponent, ctx: &mut dyn RenderContext) -> RenderSummary {
        info!(
            name = component.name.as_str(),
            primitives = component.primitives.len();
            "Rendering footprint"
        );

        let queue = self.draw_queue(component);
        debug!(queued = queue.len(); "Draw queue sorted");

        let mut summary = RenderSummary::default();
        for entry in queue {
            let outcome = self.draw_primitive(entry, ctx);
            summary.record(entry.primitive.kind(), entry.index, outcome);
        }

        info!(
            name = component.name.as_str(),
            drawn = summary.drawn,
            skipped = summary.skipped,
            failed = summary.failed;
            "Footprint rendered"
        );
        summary
    }

    fn draw_queue<'c>(&self, component: &'c PcbComponent) -> Vec<QueueEntry<'c>> {
        let mut queue: Vec<_> = component
            .primitives
            .iter()
            .enumerate()
            .map(|(index, primitive)| {
                let layer = primitive.layer();
                QueueEntry {
                    index,
                    layer,
                    priority: self.colors.priority(layer),
                    primitive,
                }
            })
            .collect();
        queue.sort_by_key(|entry| entry.priority);
        queue
    }

    fn draw_primitive(
        &self,
        entry: QueueEntry<'_>,
        ctx: &mut dyn RenderContext,
    ) -> Result<Outcome, DrawError> {
        let color = self.colors.color(entry.layer);
        match entry.primitive {
            PcbPrimitive::Pad(pad) => self.draw_pad(pad, ctx),
            PcbPrimitive::Via(via) => self.draw_via(via, ctx),
            PcbPrimitive::Track(track) => self.draw_track(track, color, ctx),
            PcbPrimitive::Arc(arc) => self.draw_arc(arc, color, ctx),
            PcbPrimitive::Text(text) => self.draw_text(text, color, ctx),
            PcbPrimitive::Fill(fill) => self.draw_fill(fill, color, ctx),
            PcbPrimitive::Region(region) => self.draw_region(region, color, ctx),
            PcbPrimitive::ComponentBody(body) => self.draw_body(body, color, ctx),
        }
    }

    fn draw_track(
        &self,
        track: &Track,
        color: Color,
        ctx: &mut dyn RenderContext,
    ) -> Result<Outcome, DrawError> {
        let stroke = Stroke::round(color, self.length(track.width));
        ctx.draw_line(self.point(track.start), self.point(track.end), &stroke)?;
        Ok(Outcome::Drawn)
    }

    fn draw_arc(
        &self,
        arc: &pcb::Arc,
        color: Color,
        ctx: &mut dyn RenderContext,
    ) -> Result<Outcome, DrawError> {
        let radius = self.length(arc.radius);
        if radius <= 0.0 {
            return Ok(Outcome::Skipped);
        }
        let center = self.point(arc.location);
        let stroke = Stroke::round(color, self.length(arc.width));
        let sweep = sweep_degrees(arc.start_angle, arc.end_angle);
        if 360.0 - sweep < FULL_CIRCLE_EPSILON {
            ctx.draw_ellipse(center, radius, radius, &stroke)?;
        } else {
            ctx.draw_arc(
                center,
                radius,
                radius,
                CoordTransform::screen_angle(arc.start_angle),
                CoordTransform::screen_sweep(sweep),
                &stroke,
            )?;
        }
        Ok(Outcome::Drawn)
    }

    fn draw_fill(
        &self,
        fill: &Fill,
        color: Color,
        ctx: &mut dyn RenderContext,
    ) -> Result<Outcome, DrawError> {
        if normalize_degrees(fill.rotation) == 0.0 {
            let bounds = Bounds::from_corners(
                self.point(fill.rect.location1()),
                self.point(fill.rect.location2()),
            );
            ctx.fill_rectangle(bounds, color)?;
        } else {
            let corners = fill
                .rect
                .rotated_corners(fill.rect.center(), fill.rotation)
                .map(|(x, y)| self.transform.world_to_screen_f64(x, y));
            ctx.fill_polygon(&corners, color)?;
        }
        Ok(Outcome::Drawn)
    }

    fn draw_region(
        &self,
        region: &Region,
        color: Color,
        ctx: &mut dyn RenderContext,
    ) -> Result<Outcome, DrawError> {
        if region.outline.len() < 3 {
            warn!(vertices = region.outline.len(); "Region needs at least three vertices");
            return Ok(Outcome::Skipped);
        }
        ctx.fill_polygon(&self.points(&region.outline), color)?;
        Ok(Outcome::Drawn)
    }

    fn draw_body(
        &self,
        body: &ComponentBody,
        color: Color,
        ctx: &mut dyn RenderContext,
    ) -> Result<Outcome, DrawError> {
        if body.outline.len() < 3 {
            warn!(
                name = body.name.as_str(),
                vertices = body.outline.len();
                "Component body needs at least three vertices"
            );
            return Ok(Outcome::Skipped);
        }
        let points = self.points(&body.outline);
        ctx.fill_polygon(&points, color.with_alpha(BODY_FILL_ALPHA))?;
        ctx.draw_polygon(&points, &Stroke::solid(color, 1.0))?;
        Ok(Outcome::Drawn)
    }

    /// Draws text from its bottom-left anchor. Stroke-font height covers the
    /// stroke width too.
    fn draw_text(
        &self,
        text: &pcb::Text,
        color: Color,
        ctx: &mut dyn RenderContext,
    ) -> Result<Outcome, DrawError> {
        if text.text.is_empty() {
            return Ok(Outcome::Skipped);
        }
        let family = match text.font_kind {
            PcbFontKind::TrueType => text.font_name.as_str(),
            PcbFontKind::Stroke => STROKE_FONT_FAMILY,
        };
        let font = FontSpec::new(family, self.length(text.height + text.stroke_width))
            .with_bold(text.bold)
            .with_italic(text.italic);
        let style = TextStyle::new(font, color).with_align(HorizontalAlign::Left, VerticalAlign::Bottom);
        let legibility = self.options.legibility();
        let anchor = self.point(text.location);
        let rotation = CoordTransform::screen_rotation(text.rotation);

        if rotation == 0.0 && !text.mirrored {
            draw_text_line(ctx, &text.text, anchor, &style, &legibility)?;
            return Ok(Outcome::Drawn);
        }
        with_saved_state(ctx, |ctx| {
            ctx.translate(anchor.x(), anchor.y())?;
            if rotation != 0.0 {
                ctx.rotate(rotation)?;
            }
            if text.mirrored {
                ctx.scale(-1.0, 1.0)?;
            }
            draw_text_line(ctx, &text.text, Point::default(), &style, &legibility)
        })?;
        Ok(Outcome::Drawn)
    }

    fn point(&self, point: CoordPoint) -> Point {
        self.transform.world_to_screen(point)
    }

    fn points(&self, points: &[CoordPoint]) -> Vec<Point> {
        points.iter().map(|&p| self.point(p)).collect()
    }

    fn length(&self, length: Coord) -> f32 {
        self.transform.scale_value(length)
    }
}
