//! SVG drawing backend.
//!
//! [`SvgContext`] implements [`RenderContext`] by building an SVG element
//! tree with the `svg` crate; [`SvgBuilder`] configures it and writes the
//! finished document to any [`std::io::Write`] sink.
//!
//! # Group structure
//!
//! The context keeps a stack of open groups:
//!
//! - `save_state` opens a `<g>`; `restore_state` closes it together with
//!   everything opened after it.
//! - `set_clip_rect` adds a `<clipPath>` to `<defs>` and opens a `<g>`
//!   referencing it; `reset_clip` closes it.
//! - `translate`, `rotate` and `scale` append to the open group's
//!   `transform` attribute, left to right. If that group already has drawn
//!   children, or is a clip group, a nested group is opened first so those
//!   children and the clip region keep their placement. The nested group
//!   closes with the enclosing restore or clip reset.
//!
//! Numbers are written with at most three decimals so output is stable
//! across platforms.

use std::io::Write;

use base64::{Engine, engine::general_purpose::STANDARD as BASE64};
use log::{debug, error, info};
use svg::{Document, Node, node::element as svg_element};

use stencil_core::{
    color::Color,
    draw::{FontSpec, Stroke, TextStyle},
    geometry::{Bounds, Point, Size},
};

use crate::{
    context::{DrawError, RenderContext, ensure_finite},
    export::Error,
    measure::{HeuristicMeasurer, TextMeasurer},
};

/// Sweeps this close to a full turn are drawn as closed ellipses.
const FULL_TURN_EPSILON: f32 = 1e-3;

/// Applies stroke attributes (and `fill="none"`) to an SVG element.
macro_rules! apply_stroke {
    ($element:expr, $stroke:expr) => {{
        let stroke: &Stroke = $stroke;
        let mut elem = $element
            .set("fill", "none")
            .set("stroke", stroke.color().to_rgb_string())
            .set("stroke-width", num(stroke.width()))
            .set("stroke-linecap", stroke.cap().to_svg_value())
            .set("stroke-linejoin", stroke.join().to_svg_value());

        if !stroke.color().is_opaque() {
            elem = elem.set("stroke-opacity", num(stroke.color().opacity()));
        }
        if let Some(dasharray) = stroke.style().dash_array() {
            elem = elem.set("stroke-dasharray", dasharray);
        }

        elem
    }};
}

/// Applies a solid fill to an SVG element.
macro_rules! apply_fill {
    ($element:expr, $color:expr) => {{
        let color: Color = $color;
        let mut elem = $element.set("fill", color.to_rgb_string());
        if !color.is_opaque() {
            elem = elem.set("fill-opacity", num(color.opacity()));
        }
        elem
    }};
}

/// Rounds to three decimals and normalizes negative zero.
fn num(value: f32) -> f64 {
    let rounded = (f64::from(value) * 1000.0).round() / 1000.0;
    if rounded == 0.0 { 0.0 } else { rounded }
}

fn points_attr(points: &[Point]) -> String {
    points
        .iter()
        .map(|p| format!("{},{}", num(p.x()), num(p.y())))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Returns the MIME type of encoded image bytes from their signature.
fn sniff_mime(data: &[u8]) -> &'static str {
    match data {
        [0xFF, 0xD8, ..] => "image/jpeg",
        [b'B', b'M', ..] => "image/bmp",
        _ => "image/png",
    }
}

fn is_full_turn(sweep: f32) -> bool {
    sweep.abs() >= 360.0 - FULL_TURN_EPSILON
}

/// Point on an ellipse at a screen angle.
fn ellipse_point(center: Point, radius_x: f32, radius_y: f32, degrees: f32) -> (f64, f64) {
    let radians = f64::from(degrees).to_radians();
    (
        f64::from(center.x()) + f64::from(radius_x) * radians.cos(),
        f64::from(center.y()) + f64::from(radius_y) * radians.sin(),
    )
}

/// Path data for an elliptical arc; `close_through_center` turns it into a
/// pie slice.
fn arc_path_data(
    center: Point,
    radius_x: f32,
    radius_y: f32,
    start_angle: f32,
    sweep_angle: f32,
    close_through_center: bool,
) -> String {
    let (x1, y1) = ellipse_point(center, radius_x, radius_y, start_angle);
    let (x2, y2) = ellipse_point(center, radius_x, radius_y, start_angle + sweep_angle);
    let large_arc = u8::from(sweep_angle.abs() > 180.0);
    let sweep_flag = u8::from(sweep_angle > 0.0);
    let arc = format!(
        "A{} {} 0 {large_arc} {sweep_flag} {} {}",
        num(radius_x),
        num(radius_y),
        num(x2 as f32),
        num(y2 as f32),
    );
    if close_through_center {
        format!(
            "M{} {} L{} {} {arc} Z",
            num(center.x()),
            num(center.y()),
            num(x1 as f32),
            num(y1 as f32),
        )
    } else {
        format!("M{} {} {arc}", num(x1 as f32), num(y1 as f32))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FrameKind {
    Root,
    Save,
    Clip,
    /// Opened by a transform call after drawing; closed with its parent.
    Implicit,
}

#[derive(Debug)]
struct Frame {
    kind: FrameKind,
    transform: Vec<String>,
    clip_id: Option<String>,
    children: Vec<Box<dyn Node>>,
}

impl Frame {
    fn new(kind: FrameKind) -> Self {
        Self {
            kind,
            transform: Vec::new(),
            clip_id: None,
            children: Vec::new(),
        }
    }

    fn into_group(self) -> svg_element::Group {
        let mut group = svg_element::Group::new();
        if !self.transform.is_empty() {
            group = group.set("transform", self.transform.join(" "));
        }
        if let Some(id) = self.clip_id {
            group = group.set("clip-path", format!("url(#{id})"));
        }
        for child in self.children {
            group = group.add(child);
        }
        group
    }
}

/// A [`RenderContext`] that builds an SVG document.
///
/// # Examples
///
/// ```
/// use stencil::context::RenderContext;
/// use stencil::export::svg::SvgBuilder;
/// use stencil_core::{color::Color, draw::Stroke, geometry::Point};
///
/// let mut ctx = SvgBuilder::new(100, 50).build();
/// ctx.draw_line(Point::new(0.0, 0.0), Point::new(10.0, 10.0), &Stroke::solid(Color::BLACK, 1.0))
///     .unwrap();
/// let svg = ctx.finish().unwrap().to_string();
/// assert!(svg.contains(r#"viewBox="0 0 100 50""#));
/// assert!(svg.contains("<line"));
/// ```
pub struct SvgContext {
    width: u32,
    height: u32,
    root: Frame,
    stack: Vec<Frame>,
    clip_paths: Vec<svg_element::ClipPath>,
    measurer: Box<dyn TextMeasurer>,
}

impl std::fmt::Debug for SvgContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SvgContext")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("depth", &self.depth())
            .finish_non_exhaustive()
    }
}

impl SvgContext {
    fn new(width: u32, height: u32, measurer: Box<dyn TextMeasurer>) -> Self {
        Self {
            width,
            height,
            root: Frame::new(FrameKind::Root),
            stack: Vec::new(),
            clip_paths: Vec::new(),
            measurer,
        }
    }

    /// Number of open save and clip frames.
    pub fn depth(&self) -> usize {
        self.stack
            .iter()
            .filter(|frame| frame.kind != FrameKind::Implicit)
            .count()
    }

    fn current(&mut self) -> &mut Frame {
        self.stack.last_mut().unwrap_or(&mut self.root)
    }

    fn append(&mut self, node: impl Node) {
        self.current().children.push(Box::new(node));
    }

    fn push_transform(&mut self, op: String) {
        // A clip group's own transform would move its clip path too.
        let current = self.current();
        if !current.children.is_empty() || current.kind == FrameKind::Clip {
            self.stack.push(Frame::new(FrameKind::Implicit));
        }
        self.current().transform.push(op);
    }

    /// Closes the innermost open frame into its parent; empty frames vanish.
    fn close_frame(&mut self) -> Option<FrameKind> {
        let frame = self.stack.pop()?;
        let kind = frame.kind;
        if !frame.children.is_empty() {
            let group = frame.into_group();
            self.append(group);
        }
        Some(kind)
    }

    /// Completes the document.
    ///
    /// # Errors
    ///
    /// Returns [`DrawError::Unbalanced`] when a saved state or clip is still
    /// open.
    pub fn finish(mut self) -> Result<Document, DrawError> {
        let depth = self.depth();
        if depth > 0 {
            error!(depth; "SVG state stack left open");
            return Err(DrawError::Unbalanced { depth });
        }
        while self.close_frame().is_some() {}

        let mut document = Document::new()
            .set("width", self.width)
            .set("height", self.height)
            .set("viewBox", format!("0 0 {} {}", self.width, self.height));

        if !self.clip_paths.is_empty() {
            let mut defs = svg_element::Definitions::new();
            for clip_path in self.clip_paths {
                defs = defs.add(clip_path);
            }
            document = document.add(defs);
        }

        if self.root.transform.is_empty() {
            for child in self.root.children {
                document = document.add(child);
            }
        } else {
            document = document.add(self.root.into_group());
        }

        debug!("SVG document finished");
        Ok(document)
    }

    /// Finishes the document and writes it to `sink`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Render`] for an unbalanced state stack and
    /// [`Error::Io`] if writing fails.
    pub fn write_to<W: Write>(self, sink: W) -> Result<(), Error> {
        let document = self.finish()?;
        SvgBuilder::write_document(&document, sink)
    }
}

impl RenderContext for SvgContext {
    fn clear(&mut self, color: Color) -> Result<(), DrawError> {
        let rect = svg_element::Rectangle::new()
            .set("x", 0)
            .set("y", 0)
            .set("width", self.width)
            .set("height", self.height);
        self.append(apply_fill!(rect, color));
        Ok(())
    }

    fn draw_line(&mut self, from: Point, to: Point, stroke: &Stroke) -> Result<(), DrawError> {
        ensure_finite("line", &[from.x(), from.y(), to.x(), to.y()])?;
        let line = svg_element::Line::new()
            .set("x1", num(from.x()))
            .set("y1", num(from.y()))
            .set("x2", num(to.x()))
            .set("y2", num(to.y()));
        self.append(apply_stroke!(line, stroke));
        Ok(())
    }

    fn draw_rectangle(&mut self, bounds: Bounds, stroke: &Stroke) -> Result<(), DrawError> {
        self.draw_rounded_rectangle(bounds, 0.0, 0.0, stroke)
    }

    fn fill_rectangle(&mut self, bounds: Bounds, color: Color) -> Result<(), DrawError> {
        self.fill_rounded_rectangle(bounds, 0.0, 0.0, color)
    }

    fn draw_rounded_rectangle(
        &mut self,
        bounds: Bounds,
        radius_x: f32,
        radius_y: f32,
        stroke: &Stroke,
    ) -> Result<(), DrawError> {
        let rect = rect_element(bounds, radius_x, radius_y)?;
        self.append(apply_stroke!(rect, stroke));
        Ok(())
    }

    fn fill_rounded_rectangle(
        &mut self,
        bounds: Bounds,
        radius_x: f32,
        radius_y: f32,
        color: Color,
    ) -> Result<(), DrawError> {
        let rect = rect_element(bounds, radius_x, radius_y)?;
        self.append(apply_fill!(rect, color));
        Ok(())
    }

    fn draw_ellipse(
        &mut self,
        center: Point,
        radius_x: f32,
        radius_y: f32,
        stroke: &Stroke,
    ) -> Result<(), DrawError> {
        let ellipse = ellipse_element(center, radius_x, radius_y)?;
        self.append(apply_stroke!(ellipse, stroke));
        Ok(())
    }

    fn fill_ellipse(
        &mut self,
        center: Point,
        radius_x: f32,
        radius_y: f32,
        color: Color,
    ) -> Result<(), DrawError> {
        let ellipse = ellipse_element(center, radius_x, radius_y)?;
        self.append(apply_fill!(ellipse, color));
        Ok(())
    }

    fn draw_polygon(&mut self, points: &[Point], stroke: &Stroke) -> Result<(), DrawError> {
        ensure_points("polygon", points)?;
        let polygon = svg_element::Polygon::new().set("points", points_attr(points));
        self.append(apply_stroke!(polygon, stroke));
        Ok(())
    }

    fn fill_polygon(&mut self, points: &[Point], color: Color) -> Result<(), DrawError> {
        ensure_points("polygon", points)?;
        let polygon = svg_element::Polygon::new().set("points", points_attr(points));
        self.append(apply_fill!(polygon, color));
        Ok(())
    }

    fn draw_polyline(&mut self, points: &[Point], stroke: &Stroke) -> Result<(), DrawError> {
        ensure_points("polyline", points)?;
        let polyline = svg_element::Polyline::new().set("points", points_attr(points));
        self.append(apply_stroke!(polyline, stroke));
        Ok(())
    }

    fn draw_bezier(
        &mut self,
        start: Point,
        control1: Point,
        control2: Point,
        end: Point,
        stroke: &Stroke,
    ) -> Result<(), DrawError> {
        ensure_points("bezier", &[start, control1, control2, end])?;
        let data = format!(
            "M{} {} C{} {} {} {} {} {}",
            num(start.x()),
            num(start.y()),
            num(control1.x()),
            num(control1.y()),
            num(control2.x()),
            num(control2.y()),
            num(end.x()),
            num(end.y()),
        );
        let path = svg_element::Path::new().set("d", data);
        self.append(apply_stroke!(path, stroke));
        Ok(())
    }

    fn draw_arc(
        &mut self,
        center: Point,
        radius_x: f32,
        radius_y: f32,
        start_angle: f32,
        sweep_angle: f32,
        stroke: &Stroke,
    ) -> Result<(), DrawError> {
        ensure_finite(
            "arc",
            &[center.x(), center.y(), radius_x, radius_y, start_angle, sweep_angle],
        )?;
        if is_full_turn(sweep_angle) {
            return self.draw_ellipse(center, radius_x, radius_y, stroke);
        }
        if sweep_angle == 0.0 {
            return Ok(());
        }
        let data = arc_path_data(center, radius_x, radius_y, start_angle, sweep_angle, false);
        let path = svg_element::Path::new().set("d", data);
        self.append(apply_stroke!(path, stroke));
        Ok(())
    }

    fn draw_pie(
        &mut self,
        center: Point,
        radius_x: f32,
        radius_y: f32,
        start_angle: f32,
        sweep_angle: f32,
        stroke: &Stroke,
    ) -> Result<(), DrawError> {
        ensure_finite(
            "pie",
            &[center.x(), center.y(), radius_x, radius_y, start_angle, sweep_angle],
        )?;
        if is_full_turn(sweep_angle) {
            return self.draw_ellipse(center, radius_x, radius_y, stroke);
        }
        if sweep_angle == 0.0 {
            return Ok(());
        }
        let data = arc_path_data(center, radius_x, radius_y, start_angle, sweep_angle, true);
        let path = svg_element::Path::new().set("d", data);
        self.append(apply_stroke!(path, stroke));
        Ok(())
    }

    fn fill_pie(
        &mut self,
        center: Point,
        radius_x: f32,
        radius_y: f32,
        start_angle: f32,
        sweep_angle: f32,
        color: Color,
    ) -> Result<(), DrawError> {
        ensure_finite(
            "pie",
            &[center.x(), center.y(), radius_x, radius_y, start_angle, sweep_angle],
        )?;
        if is_full_turn(sweep_angle) {
            return self.fill_ellipse(center, radius_x, radius_y, color);
        }
        if sweep_angle == 0.0 {
            return Ok(());
        }
        let data = arc_path_data(center, radius_x, radius_y, start_angle, sweep_angle, true);
        let path = svg_element::Path::new().set("d", data);
        self.append(apply_fill!(path, color));
        Ok(())
    }

    fn draw_text(
        &mut self,
        text: &str,
        position: Point,
        style: &TextStyle,
    ) -> Result<(), DrawError> {
        ensure_finite("text", &[position.x(), position.y(), style.font().size()])?;
        if text.is_empty() {
            return Ok(());
        }
        let font = style.font();
        let mut element = svg_element::Text::new(text)
            .set("x", num(position.x()))
            .set("y", num(position.y()))
            .set("font-family", font.family())
            .set("font-size", num(font.size()))
            .set("text-anchor", style.h_align().to_svg_value())
            .set("dominant-baseline", style.v_align().to_svg_value());
        if font.bold() {
            element = element.set("font-weight", "bold");
        }
        if font.italic() {
            element = element.set("font-style", "italic");
        }
        self.append(apply_fill!(element, style.color()));
        Ok(())
    }

    fn measure_text(&self, text: &str, font: &FontSpec) -> Size {
        self.measurer.measure(text, font)
    }

    fn draw_image(&mut self, bounds: Bounds, data: &[u8]) -> Result<(), DrawError> {
        ensure_bounds("image", bounds)?;
        if data.is_empty() {
            return Err(DrawError::InvalidGeometry("image has no data".to_string()));
        }
        let href = format!("data:{};base64,{}", sniff_mime(data), BASE64.encode(data));
        let image = svg_element::Image::new()
            .set("x", num(bounds.min_x()))
            .set("y", num(bounds.min_y()))
            .set("width", num(bounds.width()))
            .set("height", num(bounds.height()))
            .set("preserveAspectRatio", "none")
            .set("href", href);
        self.append(image);
        Ok(())
    }

    fn set_clip_rect(&mut self, bounds: Bounds) -> Result<(), DrawError> {
        ensure_bounds("clip", bounds)?;
        let id = format!("clip-{}", self.clip_paths.len());
        let rect = rect_element(bounds, 0.0, 0.0)?;
        self.clip_paths
            .push(svg_element::ClipPath::new().set("id", id.as_str()).add(rect));

        let mut frame = Frame::new(FrameKind::Clip);
        frame.clip_id = Some(id);
        self.stack.push(frame);
        Ok(())
    }

    fn reset_clip(&mut self) -> Result<(), DrawError> {
        let Some(index) = self
            .stack
            .iter()
            .rposition(|frame| frame.kind != FrameKind::Implicit)
        else {
            return Err(DrawError::ResetWithoutClip);
        };
        if self.stack[index].kind != FrameKind::Clip {
            return Err(DrawError::ResetWithoutClip);
        }
        while self.stack.len() > index {
            self.close_frame();
        }
        Ok(())
    }

    fn save_state(&mut self) -> Result<(), DrawError> {
        self.stack.push(Frame::new(FrameKind::Save));
        Ok(())
    }

    fn restore_state(&mut self) -> Result<(), DrawError> {
        if !self.stack.iter().any(|frame| frame.kind == FrameKind::Save) {
            return Err(DrawError::RestoreWithoutSave);
        }
        while let Some(kind) = self.close_frame() {
            if kind == FrameKind::Save {
                break;
            }
        }
        Ok(())
    }

    fn translate(&mut self, dx: f32, dy: f32) -> Result<(), DrawError> {
        ensure_finite("translate", &[dx, dy])?;
        self.push_transform(format!("translate({},{})", num(dx), num(dy)));
        Ok(())
    }

    fn rotate(&mut self, degrees: f32) -> Result<(), DrawError> {
        ensure_finite("rotate", &[degrees])?;
        self.push_transform(format!("rotate({})", num(degrees)));
        Ok(())
    }

    fn scale(&mut self, sx: f32, sy: f32) -> Result<(), DrawError> {
        ensure_finite("scale", &[sx, sy])?;
        self.push_transform(format!("scale({},{})", num(sx), num(sy)));
        Ok(())
    }
}

fn ensure_bounds(what: &str, bounds: Bounds) -> Result<(), DrawError> {
    ensure_finite(
        what,
        &[bounds.min_x(), bounds.min_y(), bounds.max_x(), bounds.max_y()],
    )
}

fn ensure_points(what: &str, points: &[Point]) -> Result<(), DrawError> {
    if points.iter().all(|p| p.x().is_finite() && p.y().is_finite()) {
        Ok(())
    } else {
        Err(DrawError::InvalidGeometry(format!(
            "{what} has non-finite coordinates"
        )))
    }
}

fn rect_element(
    bounds: Bounds,
    radius_x: f32,
    radius_y: f32,
) -> Result<svg_element::Rectangle, DrawError> {
    ensure_bounds("rectangle", bounds)?;
    let mut rect = svg_element::Rectangle::new()
        .set("x", num(bounds.min_x()))
        .set("y", num(bounds.min_y()))
        .set("width", num(bounds.width()))
        .set("height", num(bounds.height()));
    if radius_x > 0.0 || radius_y > 0.0 {
        rect = rect.set("rx", num(radius_x)).set("ry", num(radius_y));
    }
    Ok(rect)
}

fn ellipse_element(
    center: Point,
    radius_x: f32,
    radius_y: f32,
) -> Result<svg_element::Ellipse, DrawError> {
    ensure_finite("ellipse", &[center.x(), center.y(), radius_x, radius_y])?;
    Ok(svg_element::Ellipse::new()
        .set("cx", num(center.x()))
        .set("cy", num(center.y()))
        .set("rx", num(radius_x.abs()))
        .set("ry", num(radius_y.abs())))
}

/// Builder for [`SvgContext`].
pub struct SvgBuilder {
    width: u32,
    height: u32,
    measurer: Box<dyn TextMeasurer>,
}

impl SvgBuilder {
    /// Starts a document of `width` x `height` pixels measuring text with
    /// [`HeuristicMeasurer`].
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            measurer: Box::new(HeuristicMeasurer),
        }
    }

    pub fn with_measurer(mut self, measurer: Box<dyn TextMeasurer>) -> Self {
        self.measurer = measurer;
        self
    }

    pub fn build(self) -> SvgContext {
        SvgContext::new(self.width, self.height, self.measurer)
    }

    /// Writes an SVG document to `sink`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] if writing fails.
    pub fn write_document<W: Write>(document: &Document, mut sink: W) -> Result<(), Error> {
        info!("Writing SVG document");
        if let Err(err) = write!(sink, "{document}").and_then(|()| sink.flush()) {
            error!(err:err; "Failed to write SVG content");
            return Err(Error::Io(err));
        }
        Ok(())
    }
}
