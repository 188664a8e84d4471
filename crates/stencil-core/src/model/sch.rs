//! Schematic symbol primitives.
//!
//! A [`SchComponent`] is an ordered list of [`SchPrimitive`]s. Every primitive
//! carries its own `owner_part_id` so multi-part symbols can be filtered by
//! part with a single field read; ids `<= 0` belong to every part.

use serde::{Deserialize, Serialize};

use crate::{
    color::Color,
    coord::{Coord, CoordPoint, CoordRect},
    draw::{HorizontalAlign, StrokeStyle, VerticalAlign},
};

/// World height of one font point.
pub const MILS_PER_POINT: f64 = 10.0;

/// Average glyph advance as a fraction of the font height, for bounds only.
const GLYPH_WIDTH_RATIO: f64 = 0.6;

// =============================================================================
// Enumerations
// =============================================================================

/// Zoom-independent line weight classes.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LineWidth {
    #[default]
    Small,
    Medium,
    Large,
    #[serde(other)]
    Smallest,
}

/// Direction a pin points away from the symbol body.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PinOrientation {
    Up,
    Left,
    Down,
    #[default]
    #[serde(other)]
    Right,
}

impl PinOrientation {
    /// Unit direction in design space (Y up).
    pub fn direction(self) -> (i32, i32) {
        match self {
            Self::Right => (1, 0),
            Self::Up => (0, 1),
            Self::Left => (-1, 0),
            Self::Down => (0, -1),
        }
    }

    pub fn is_vertical(self) -> bool {
        matches!(self, Self::Up | Self::Down)
    }
}

/// Electrical type of a pin.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PinElectrical {
    Input,
    InputOutput,
    Output,
    OpenCollector,
    HiZ,
    OpenEmitter,
    Power,
    #[default]
    #[serde(other)]
    Passive,
}

impl PinElectrical {
    /// Returns `true` if the pin carries an inward arrow glyph.
    pub fn has_input_arrow(self) -> bool {
        matches!(self, Self::Input | Self::InputOutput)
    }

    /// Returns `true` if the pin carries an outward arrow glyph.
    pub fn has_output_arrow(self) -> bool {
        matches!(self, Self::Output | Self::InputOutput)
    }
}

/// Anchor point of a text on its location.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TextJustification {
    BottomCenter,
    BottomRight,
    MiddleLeft,
    MiddleCenter,
    MiddleRight,
    TopLeft,
    TopCenter,
    TopRight,
    #[default]
    #[serde(other)]
    BottomLeft,
}

impl TextJustification {
    /// Splits the justification into horizontal and vertical alignment.
    pub fn align(self) -> (HorizontalAlign, VerticalAlign) {
        use HorizontalAlign as H;
        use VerticalAlign as V;
        match self {
            Self::BottomLeft => (H::Left, V::Bottom),
            Self::BottomCenter => (H::Center, V::Bottom),
            Self::BottomRight => (H::Right, V::Bottom),
            Self::MiddleLeft => (H::Left, V::Middle),
            Self::MiddleCenter => (H::Center, V::Middle),
            Self::MiddleRight => (H::Right, V::Middle),
            Self::TopLeft => (H::Left, V::Top),
            Self::TopCenter => (H::Center, V::Top),
            Self::TopRight => (H::Right, V::Top),
        }
    }
}

/// Shape drawn at a polyline end.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LineShape {
    Arrow,
    SolidArrow,
    Tail,
    SolidTail,
    Circle,
    Square,
    #[default]
    #[serde(other)]
    None,
}

/// Size class of polyline end shapes.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LineShapeSize {
    Small,
    Medium,
    Large,
    #[default]
    #[serde(other)]
    ExtraSmall,
}

impl LineShapeSize {
    /// Multiplier applied to the line width in pixels.
    pub fn factor(self) -> f32 {
        match self {
            Self::ExtraSmall => 2.0,
            Self::Small => 4.0,
            Self::Medium => 6.0,
            Self::Large => 8.0,
        }
    }
}

/// Power port glyph styles.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PowerStyle {
    Circle,
    Arrow,
    Wave,
    PowerGround,
    SignalGround,
    Earth,
    GostArrow,
    GostPowerGround,
    GostEarth,
    GostBar,
    #[default]
    #[serde(other)]
    Bar,
}

/// A schematic font.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SchFont {
    pub family: String,
    /// Size in points.
    pub size: f32,
    pub bold: bool,
    pub italic: bool,
}

impl SchFont {
    /// Height of the font in design space.
    pub fn world_height(&self) -> Coord {
        Coord::from_mils(f64::from(self.size) * MILS_PER_POINT)
    }
}

impl Default for SchFont {
    fn default() -> Self {
        Self {
            family: "Times New Roman".to_string(),
            size: 10.0,
            bold: false,
            italic: false,
        }
    }
}

// =============================================================================
// Primitives
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Pin {
    pub owner_part_id: i32,
    /// Point where the pin meets the symbol body.
    pub location: CoordPoint,
    pub length: Coord,
    pub orientation: PinOrientation,
    pub electrical: PinElectrical,
    pub name: String,
    pub designator: String,
    pub show_name: bool,
    pub show_designator: bool,
    pub hidden: bool,
    /// Turns name and designator upside down.
    pub text_flipped: bool,
    pub color: Color,
    pub font: SchFont,
}

impl Pin {
    /// The electrical end of the pin, `length` away from the body.
    pub fn hot_spot(&self) -> CoordPoint {
        let (dx, dy) = self.orientation.direction();
        self.location.offset(self.length * dx, self.length * dy)
    }
}

impl Default for Pin {
    fn default() -> Self {
        Self {
            owner_part_id: 0,
            location: CoordPoint::default(),
            length: Coord::from_mils(300.0),
            orientation: PinOrientation::default(),
            electrical: PinElectrical::default(),
            name: String::new(),
            designator: String::new(),
            show_name: true,
            show_designator: true,
            hidden: false,
            text_flipped: false,
            color: Color::BLACK,
            font: SchFont::default(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Line {
    pub owner_part_id: i32,
    pub start: CoordPoint,
    pub end: CoordPoint,
    pub color: Color,
    pub line_width: LineWidth,
    pub line_style: StrokeStyle,
}

/// Free text; `=Name` displays the value of parameter `Name`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Label {
    pub owner_part_id: i32,
    pub location: CoordPoint,
    pub text: String,
    pub color: Color,
    pub font: SchFont,
    /// Counter-clockwise degrees.
    pub rotation: f64,
    pub justification: TextJustification,
    pub mirrored: bool,
    pub hidden: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Rectangle {
    pub owner_part_id: i32,
    pub rect: CoordRect,
    pub color: Color,
    pub fill_color: Color,
    pub is_solid: bool,
    pub transparent: bool,
    pub line_width: LineWidth,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Wire {
    pub owner_part_id: i32,
    pub vertices: Vec<CoordPoint>,
    pub color: Color,
    pub line_width: LineWidth,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Polygon {
    pub owner_part_id: i32,
    pub vertices: Vec<CoordPoint>,
    pub color: Color,
    pub fill_color: Color,
    pub is_solid: bool,
    pub transparent: bool,
    pub line_width: LineWidth,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Polyline {
    pub owner_part_id: i32,
    pub vertices: Vec<CoordPoint>,
    pub color: Color,
    pub line_width: LineWidth,
    pub line_style: StrokeStyle,
    pub start_shape: LineShape,
    pub end_shape: LineShape,
    pub shape_size: LineShapeSize,
}

/// Circular arc; angles are counter-clockwise degrees from +X.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Arc {
    pub owner_part_id: i32,
    pub location: CoordPoint,
    pub radius: Coord,
    pub start_angle: f64,
    pub end_angle: f64,
    pub color: Color,
    pub line_width: LineWidth,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EllipticalArc {
    pub owner_part_id: i32,
    pub location: CoordPoint,
    pub primary_radius: Coord,
    pub secondary_radius: Coord,
    pub start_angle: f64,
    pub end_angle: f64,
    pub color: Color,
    pub line_width: LineWidth,
}

/// Cubic bezier chain: `3n + 1` control points make `n` segments.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Bezier {
    pub owner_part_id: i32,
    pub control_points: Vec<CoordPoint>,
    pub color: Color,
    pub line_width: LineWidth,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Ellipse {
    pub owner_part_id: i32,
    pub location: CoordPoint,
    pub radius_x: Coord,
    pub radius_y: Coord,
    pub color: Color,
    pub fill_color: Color,
    pub is_solid: bool,
    pub transparent: bool,
    pub line_width: LineWidth,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RoundedRectangle {
    pub owner_part_id: i32,
    pub rect: CoordRect,
    pub corner_x_radius: Coord,
    pub corner_y_radius: Coord,
    pub color: Color,
    pub fill_color: Color,
    pub is_solid: bool,
    pub transparent: bool,
    pub line_width: LineWidth,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Pie {
    pub owner_part_id: i32,
    pub location: CoordPoint,
    pub radius: Coord,
    pub start_angle: f64,
    pub end_angle: f64,
    pub color: Color,
    pub fill_color: Color,
    pub is_solid: bool,
    pub line_width: LineWidth,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NetLabel {
    pub owner_part_id: i32,
    pub location: CoordPoint,
    pub text: String,
    pub color: Color,
    pub font: SchFont,
    pub rotation: f64,
    pub justification: TextJustification,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Junction {
    pub owner_part_id: i32,
    pub location: CoordPoint,
    pub color: Color,
    pub size: LineWidth,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Parameter {
    pub owner_part_id: i32,
    pub location: CoordPoint,
    pub name: String,
    pub value: String,
    pub color: Color,
    pub font: SchFont,
    pub rotation: f64,
    pub justification: TextJustification,
    pub mirrored: bool,
    pub hidden: bool,
    /// Draw as `name: value`.
    pub show_name: bool,
}

impl Default for Parameter {
    fn default() -> Self {
        Self {
            owner_part_id: 0,
            location: CoordPoint::default(),
            name: String::new(),
            value: String::new(),
            color: Color::BLACK,
            font: SchFont::default(),
            rotation: 0.0,
            justification: TextJustification::default(),
            mirrored: false,
            hidden: true,
            show_name: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TextFrame {
    pub owner_part_id: i32,
    pub rect: CoordRect,
    pub text: String,
    /// Border color.
    pub color: Color,
    pub fill_color: Color,
    pub text_color: Color,
    pub font: SchFont,
    pub is_solid: bool,
    pub show_border: bool,
    pub word_wrap: bool,
    pub clip_to_rect: bool,
    pub alignment: HorizontalAlign,
    pub vertical_alignment: VerticalAlign,
    pub line_width: LineWidth,
    pub text_margin: Coord,
}

impl Default for TextFrame {
    fn default() -> Self {
        Self {
            owner_part_id: 0,
            rect: CoordRect::default(),
            text: String::new(),
            color: Color::BLACK,
            fill_color: Color::WHITE,
            text_color: Color::BLACK,
            font: SchFont::default(),
            is_solid: true,
            show_border: true,
            word_wrap: true,
            clip_to_rect: true,
            alignment: HorizontalAlign::Left,
            vertical_alignment: VerticalAlign::Top,
            line_width: LineWidth::Small,
            text_margin: Coord::from_mils(50.0),
        }
    }
}

/// Embedded raster image; `data` is base64 in JSON.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Image {
    pub owner_part_id: i32,
    pub rect: CoordRect,
    #[serde(with = "super::base64_bytes")]
    pub data: Vec<u8>,
    pub keep_aspect: bool,
}

/// Power port: a stub ending in a style glyph, optionally labelled.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PowerObject {
    pub owner_part_id: i32,
    pub location: CoordPoint,
    pub text: String,
    pub style: PowerStyle,
    pub color: Color,
    pub font: SchFont,
    pub rotation: f64,
    /// Flips the glyph about the port location, after rotation.
    pub mirrored: bool,
    pub show_net_name: bool,
}

impl Default for PowerObject {
    fn default() -> Self {
        Self {
            owner_part_id: 0,
            location: CoordPoint::default(),
            text: String::new(),
            style: PowerStyle::default(),
            color: Color::BLACK,
            font: SchFont::default(),
            rotation: 0.0,
            mirrored: false,
            show_net_name: true,
        }
    }
}

/// Placeholder for symbol records the renderer ignores.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Symbol {
    pub owner_part_id: i32,
}

/// A schematic primitive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SchPrimitive {
    Pin(Pin),
    Line(Line),
    Label(Label),
    Rectangle(Rectangle),
    Wire(Wire),
    Polygon(Polygon),
    Polyline(Polyline),
    Arc(Arc),
    Bezier(Bezier),
    Ellipse(Ellipse),
    RoundedRectangle(RoundedRectangle),
    Pie(Pie),
    NetLabel(NetLabel),
    Junction(Junction),
    Parameter(Parameter),
    TextFrame(TextFrame),
    Image(Image),
    EllipticalArc(EllipticalArc),
    PowerObject(PowerObject),
    Symbol(Symbol),
}

impl SchPrimitive {
    /// The part this primitive belongs to; `<= 0` means every part.
    pub fn owner_part_id(&self) -> i32 {
        match self {
            Self::Pin(p) => p.owner_part_id,
            Self::Line(p) => p.owner_part_id,
            Self::Label(p) => p.owner_part_id,
            Self::Rectangle(p) => p.owner_part_id,
            Self::Wire(p) => p.owner_part_id,
            Self::Polygon(p) => p.owner_part_id,
            Self::Polyline(p) => p.owner_part_id,
            Self::Arc(p) => p.owner_part_id,
            Self::Bezier(p) => p.owner_part_id,
            Self::Ellipse(p) => p.owner_part_id,
            Self::RoundedRectangle(p) => p.owner_part_id,
            Self::Pie(p) => p.owner_part_id,
            Self::NetLabel(p) => p.owner_part_id,
            Self::Junction(p) => p.owner_part_id,
            Self::Parameter(p) => p.owner_part_id,
            Self::TextFrame(p) => p.owner_part_id,
            Self::Image(p) => p.owner_part_id,
            Self::EllipticalArc(p) => p.owner_part_id,
            Self::PowerObject(p) => p.owner_part_id,
            Self::Symbol(p) => p.owner_part_id,
        }
    }

    /// Returns `true` if the primitive is drawn for `part`.
    pub fn belongs_to_part(&self, part: i32) -> bool {
        let owner = self.owner_part_id();
        owner <= 0 || owner == part
    }

    /// Short lowercase name, used in log records.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Pin(_) => "pin",
            Self::Line(_) => "line",
            Self::Label(_) => "label",
            Self::Rectangle(_) => "rectangle",
            Self::Wire(_) => "wire",
            Self::Polygon(_) => "polygon",
            Self::Polyline(_) => "polyline",
            Self::Arc(_) => "arc",
            Self::Bezier(_) => "bezier",
            Self::Ellipse(_) => "ellipse",
            Self::RoundedRectangle(_) => "rounded_rectangle",
            Self::Pie(_) => "pie",
            Self::NetLabel(_) => "net_label",
            Self::Junction(_) => "junction",
            Self::Parameter(_) => "parameter",
            Self::TextFrame(_) => "text_frame",
            Self::Image(_) => "image",
            Self::EllipticalArc(_) => "elliptical_arc",
            Self::PowerObject(_) => "power_object",
            Self::Symbol(_) => "symbol",
        }
    }

    /// Approximate design-space extent, or `None` for invisible primitives.
    ///
    /// Text extents use an average glyph width, so they are estimates.
    pub fn bounds(&self) -> Option<CoordRect> {
        match self {
            Self::Pin(pin) => {
                (!pin.hidden).then(|| CoordRect::new(pin.location, pin.hot_spot()))
            }
            Self::Line(line) => Some(CoordRect::new(line.start, line.end)),
            Self::Label(label) => (!label.hidden).then(|| {
                text_extent(label.location, &label.text, &label.font, label.justification)
            }),
            Self::Rectangle(rect) => Some(rect.rect),
            Self::Wire(wire) => CoordRect::from_points(wire.vertices.iter().copied()),
            Self::Polygon(poly) => CoordRect::from_points(poly.vertices.iter().copied()),
            Self::Polyline(poly) => CoordRect::from_points(poly.vertices.iter().copied()),
            Self::Arc(arc) => Some(CoordRect::from_center(
                arc.location,
                arc.radius * 2,
                arc.radius * 2,
            )),
            Self::Bezier(bezier) => CoordRect::from_points(bezier.control_points.iter().copied()),
            Self::Ellipse(ellipse) => Some(CoordRect::from_center(
                ellipse.location,
                ellipse.radius_x * 2,
                ellipse.radius_y * 2,
            )),
            Self::RoundedRectangle(rect) => Some(rect.rect),
            Self::Pie(pie) => Some(CoordRect::from_center(
                pie.location,
                pie.radius * 2,
                pie.radius * 2,
            )),
            Self::NetLabel(label) => Some(text_extent(
                label.location,
                &label.text,
                &label.font,
                label.justification,
            )),
            Self::Junction(junction) => Some(CoordRect::new(junction.location, junction.location)),
            Self::Parameter(param) => (!param.hidden).then(|| {
                text_extent(param.location, &param.value, &param.font, param.justification)
            }),
            Self::TextFrame(frame) => Some(frame.rect),
            Self::Image(image) => Some(image.rect),
            Self::EllipticalArc(arc) => Some(CoordRect::from_center(
                arc.location,
                arc.primary_radius * 2,
                arc.secondary_radius * 2,
            )),
            Self::PowerObject(power) => {
                let reach = Coord::from_mils(100.0);
                Some(CoordRect::from_center(power.location, reach * 2, reach * 2))
            }
            Self::Symbol(_) => None,
        }
    }
}

/// Estimated extent of an unrotated single-line text.
fn text_extent(
    location: CoordPoint,
    text: &str,
    font: &SchFont,
    justification: TextJustification,
) -> CoordRect {
    let height = font.world_height();
    let chars = i32::try_from(text.chars().count()).unwrap_or(i32::MAX);
    let width = Coord::from_raw(
        (f64::from(height.raw()) * GLYPH_WIDTH_RATIO * f64::from(chars)).round() as i32,
    );

    let (h_align, v_align) = justification.align();
    let left = match h_align {
        HorizontalAlign::Left => location.x,
        HorizontalAlign::Center => location.x - width / 2,
        HorizontalAlign::Right => location.x - width,
    };
    let bottom = match v_align {
        VerticalAlign::Bottom | VerticalAlign::Baseline => location.y,
        VerticalAlign::Middle => location.y - height / 2,
        VerticalAlign::Top => location.y - height,
    };
    CoordRect::new(
        CoordPoint::new(left, bottom),
        CoordPoint::new(left + width, bottom + height),
    )
}

/// A schematic symbol.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SchComponent {
    pub name: String,
    pub description: String,
    pub bounds: CoordRect,
    pub part_count: u32,
    pub primitives: Vec<SchPrimitive>,
}

impl Default for SchComponent {
    fn default() -> Self {
        Self {
            name: String::new(),
            description: String::new(),
            bounds: CoordRect::default(),
            part_count: 1,
            primitives: Vec::new(),
        }
    }
}

impl SchComponent {
    /// Iterates the parameter primitives in order.
    pub fn parameters(&self) -> impl Iterator<Item = &Parameter> {
        self.primitives.iter().filter_map(|primitive| match primitive {
            SchPrimitive::Parameter(param) => Some(param),
            _ => None,
        })
    }

    /// Looks up a parameter by name, ignoring ASCII case.
    pub fn parameter(&self, name: &str) -> Option<&Parameter> {
        self.parameters()
            .find(|param| param.name.eq_ignore_ascii_case(name))
    }

    /// Resolves `=Name` indirection against the parameters.
    ///
    /// Text without a leading `=` is returned unchanged; an unknown name
    /// resolves to the bare name.
    ///
    /// # Examples
    ///
    /// ```
    /// use stencil_core::model::{Parameter, SchComponent, SchPrimitive};
    ///
    /// let mut component = SchComponent::default();
    /// component.primitives.push(SchPrimitive::Parameter(Parameter {
    ///     name: "Value".to_string(),
    ///     value: "10k".to_string(),
    ///     ..Parameter::default()
    /// }));
    /// assert_eq!(component.resolve_text("=value"), "10k");
    /// assert_eq!(component.resolve_text("=Missing"), "Missing");
    /// assert_eq!(component.resolve_text("R1"), "R1");
    /// ```
    pub fn resolve_text<'a>(&'a self, text: &'a str) -> &'a str {
        match text.strip_prefix('=') {
            Some(name) => self
                .parameter(name.trim())
                .map(|param| param.value.as_str())
                .unwrap_or(name),
            None => text,
        }
    }

    /// Stored bounds, or the union of primitive bounds when they are empty.
    pub fn effective_bounds(&self) -> CoordRect {
        if !self.bounds.is_empty() {
            return self.bounds;
        }
        self.primitives
            .iter()
            .filter_map(SchPrimitive::bounds)
            .reduce(|acc, rect| acc.union(&rect))
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn param(name: &str, value: &str) -> SchPrimitive {
        SchPrimitive::Parameter(Parameter {
            name: name.to_string(),
            value: value.to_string(),
            ..Parameter::default()
        })
    }

    #[test]
    fn test_owner_part_filter() {
        let shared = SchPrimitive::Line(Line::default());
        let part_two = SchPrimitive::Line(Line {
            owner_part_id: 2,
            ..Line::default()
        });
        assert!(shared.belongs_to_part(1));
        assert!(shared.belongs_to_part(2));
        assert!(part_two.belongs_to_part(2));
        assert!(!part_two.belongs_to_part(1));
    }

    #[test]
    fn test_parameter_lookup_ignores_case() {
        let component = SchComponent {
            primitives: vec![param("Value", "100n"), param("Comment", "=Value")],
            ..SchComponent::default()
        };
        assert_eq!(component.parameters().count(), 2);
        assert_eq!(component.parameter("VALUE").unwrap().value, "100n");
        assert!(component.parameter("Footprint").is_none());
        assert_eq!(component.resolve_text("=VaLuE"), "100n");
    }

    #[test]
    fn test_pin_hot_spot() {
        let pin = Pin {
            location: CoordPoint::from_mils(100.0, 0.0),
            length: Coord::from_mils(200.0),
            orientation: PinOrientation::Down,
            ..Pin::default()
        };
        assert_eq!(pin.hot_spot(), CoordPoint::from_mils(100.0, -200.0));
    }

    #[test]
    fn test_effective_bounds_falls_back_to_primitives() {
        let component = SchComponent {
            primitives: vec![
                SchPrimitive::Line(Line {
                    start: CoordPoint::from_raw(0, 0),
                    end: CoordPoint::from_raw(100, 50),
                    ..Line::default()
                }),
                SchPrimitive::Rectangle(Rectangle {
                    rect: CoordRect::new(CoordPoint::from_raw(-20, 10), CoordPoint::from_raw(5, 80)),
                    ..Rectangle::default()
                }),
                SchPrimitive::Symbol(Symbol::default()),
            ],
            ..SchComponent::default()
        };
        let bounds = component.effective_bounds();
        assert_eq!(bounds.location1(), CoordPoint::from_raw(-20, 0));
        assert_eq!(bounds.location2(), CoordPoint::from_raw(100, 80));
    }

    #[test]
    fn test_stored_bounds_win() {
        let stored = CoordRect::new(CoordPoint::from_raw(0, 0), CoordPoint::from_raw(1, 1));
        let component = SchComponent {
            bounds: stored,
            primitives: vec![SchPrimitive::Line(Line {
                end: CoordPoint::from_raw(500, 500),
                ..Line::default()
            })],
            ..SchComponent::default()
        };
        assert_eq!(component.effective_bounds(), stored);
    }

    #[test]
    fn test_text_extent_respects_justification() {
        let font = SchFont {
            size: 10.0,
            ..SchFont::default()
        };
        let location = CoordPoint::from_mils(0.0, 0.0);
        let left = text_extent(location, "AB", &font, TextJustification::BottomLeft);
        let right = text_extent(location, "AB", &font, TextJustification::TopRight);
        assert_eq!(left.location1(), location);
        assert_eq!(right.location2(), location);
        assert_eq!(left.height(), Coord::from_mils(100.0));
    }

    #[test]
    fn test_deserialize_primitive_with_defaults() {
        let json = r#"{"type":"pin","designator":"1","orientation":"Sideways","electrical":"Input"}"#;
        let primitive: SchPrimitive = serde_json::from_str(json).unwrap();
        let SchPrimitive::Pin(pin) = primitive else {
            panic!("expected a pin");
        };
        assert_eq!(pin.orientation, PinOrientation::Right);
        assert_eq!(pin.electrical, PinElectrical::Input);
        assert!(pin.show_name);
        assert_eq!(pin.length, Coord::from_mils(300.0));
    }

    #[test]
    fn test_justification_align() {
        assert_eq!(
            TextJustification::MiddleCenter.align(),
            (HorizontalAlign::Center, VerticalAlign::Middle)
        );
        assert_eq!(
            TextJustification::TopRight.align(),
            (HorizontalAlign::Right, VerticalAlign::Top)
        );
    }
}
