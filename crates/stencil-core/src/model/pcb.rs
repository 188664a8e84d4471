//! Footprint primitives.
//!
//! Every [`PcbPrimitive`] sits on one board [`Layer`]; the footprint renderer
//! orders primitives by that layer's draw priority.

use serde::{Deserialize, Serialize};

use crate::{
    coord::{Coord, CoordPoint, CoordRect},
    layer::Layer,
};

/// Average stroke-font advance as a fraction of the text height.
const STROKE_GLYPH_WIDTH_RATIO: f64 = 0.6;

/// Copper outline of one side of a pad.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PadShape {
    Rectangular,
    Octagonal,
    RoundedRectangle,
    #[default]
    #[serde(other)]
    Round,
}

/// Drill hole outline.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HoleShape {
    Square,
    Slot,
    #[default]
    #[serde(other)]
    Round,
}

/// Stroke (vector) or TrueType text.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PcbFontKind {
    TrueType,
    #[default]
    #[serde(other)]
    Stroke,
}

/// Shape and size of a pad on one copper side.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PadLayerShape {
    pub shape: PadShape,
    pub size_x: Coord,
    pub size_y: Coord,
    /// Corner radius of rounded rectangles, as a percentage of the smaller
    /// half-size.
    pub corner_radius_percent: u8,
}

impl Default for PadLayerShape {
    fn default() -> Self {
        Self {
            shape: PadShape::Round,
            size_x: Coord::from_mils(60.0),
            size_y: Coord::from_mils(60.0),
            corner_radius_percent: 50,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Pad {
    pub location: CoordPoint,
    /// Counter-clockwise degrees.
    pub rotation: f64,
    pub designator: String,
    /// `MultiLayer` for through-hole pads, a copper layer for SMD pads.
    pub layer: Layer,
    pub top: PadLayerShape,
    pub bottom: PadLayerShape,
    pub hole_size: Coord,
    pub hole_shape: HoleShape,
    /// Added to the pad rotation.
    pub hole_rotation: f64,
    pub hole_slot_length: Coord,
    pub solder_mask_expansion: Option<Coord>,
    pub plated: bool,
}

impl Pad {
    /// Returns `true` if the pad has a drill hole.
    pub fn has_hole(&self) -> bool {
        self.hole_size > Coord::ZERO
    }

    /// Returns `(top, bottom)`: which copper sides carry this pad.
    pub fn sides(&self) -> (bool, bool) {
        if self.layer == Layer::TOP {
            (true, false)
        } else if self.layer == Layer::BOTTOM {
            (false, true)
        } else {
            (true, true)
        }
    }
}

impl Default for Pad {
    fn default() -> Self {
        Self {
            location: CoordPoint::default(),
            rotation: 0.0,
            designator: String::new(),
            layer: Layer::MULTI_LAYER,
            top: PadLayerShape::default(),
            bottom: PadLayerShape::default(),
            hole_size: Coord::from_mils(30.0),
            hole_shape: HoleShape::Round,
            hole_rotation: 0.0,
            hole_slot_length: Coord::ZERO,
            solder_mask_expansion: None,
            plated: true,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Track {
    pub start: CoordPoint,
    pub end: CoordPoint,
    pub width: Coord,
    pub layer: Layer,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Via {
    pub location: CoordPoint,
    pub diameter: Coord,
    pub hole_size: Coord,
    pub from_layer: Layer,
    pub to_layer: Layer,
    pub solder_mask_expansion: Option<Coord>,
}

impl Default for Via {
    fn default() -> Self {
        Self {
            location: CoordPoint::default(),
            diameter: Coord::from_mils(50.0),
            hole_size: Coord::from_mils(28.0),
            from_layer: Layer::TOP,
            to_layer: Layer::BOTTOM,
            solder_mask_expansion: None,
        }
    }
}

/// Circular arc; angles are counter-clockwise degrees from +X.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Arc {
    pub location: CoordPoint,
    pub radius: Coord,
    pub start_angle: f64,
    pub end_angle: f64,
    pub width: Coord,
    pub layer: Layer,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Text {
    /// Bottom-left anchor of the unrotated text.
    pub location: CoordPoint,
    pub text: String,
    pub height: Coord,
    pub stroke_width: Coord,
    pub rotation: f64,
    pub mirrored: bool,
    pub layer: Layer,
    pub font_kind: PcbFontKind,
    pub font_name: String,
    pub bold: bool,
    pub italic: bool,
}

impl Text {
    /// Estimated unrotated extent.
    pub fn extent(&self) -> CoordRect {
        let chars = i32::try_from(self.text.chars().count()).unwrap_or(i32::MAX);
        let width = (f64::from(self.height.raw()) * STROKE_GLYPH_WIDTH_RATIO * f64::from(chars))
            .round() as i32;
        CoordRect::new(
            self.location,
            self.location.offset(Coord::from_raw(width), self.height),
        )
    }
}

impl Default for Text {
    fn default() -> Self {
        Self {
            location: CoordPoint::default(),
            text: String::new(),
            height: Coord::from_mils(60.0),
            stroke_width: Coord::from_mils(10.0),
            rotation: 0.0,
            mirrored: false,
            layer: Layer::TOP_OVERLAY,
            font_kind: PcbFontKind::Stroke,
            font_name: "Arial".to_string(),
            bold: false,
            italic: false,
        }
    }
}

/// Solid rectangle, optionally rotated about its center.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Fill {
    pub rect: CoordRect,
    pub rotation: f64,
    pub layer: Layer,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Region {
    pub outline: Vec<CoordPoint>,
    pub layer: Layer,
}

/// 3D body outline projected on a mechanical layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ComponentBody {
    pub outline: Vec<CoordPoint>,
    pub layer: Layer,
    pub height: Coord,
    pub name: String,
}

impl Default for ComponentBody {
    fn default() -> Self {
        Self {
            outline: Vec::new(),
            layer: Layer::MECHANICAL_FIRST,
            height: Coord::ZERO,
            name: String::new(),
        }
    }
}

/// A footprint primitive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PcbPrimitive {
    Pad(Pad),
    Track(Track),
    Via(Via),
    Arc(Arc),
    Text(Text),
    Fill(Fill),
    Region(Region),
    ComponentBody(ComponentBody),
}

impl PcbPrimitive {
    /// The layer this primitive is sorted by.
    pub fn layer(&self) -> Layer {
        match self {
            Self::Pad(pad) => pad.layer,
            Self::Track(track) => track.layer,
            Self::Via(_) => Layer::MULTI_LAYER,
            Self::Arc(arc) => arc.layer,
            Self::Text(text) => text.layer,
            Self::Fill(fill) => fill.layer,
            Self::Region(region) => region.layer,
            Self::ComponentBody(body) => body.layer,
        }
    }

    /// Short lowercase name, used in log records.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Pad(_) => "pad",
            Self::Track(_) => "track",
            Self::Via(_) => "via",
            Self::Arc(_) => "arc",
            Self::Text(_) => "text",
            Self::Fill(_) => "fill",
            Self::Region(_) => "region",
            Self::ComponentBody(_) => "component_body",
        }
    }

    /// Design-space extent, or `None` for primitives without geometry.
    pub fn bounds(&self) -> Option<CoordRect> {
        match self {
            Self::Pad(pad) => {
                let size_x = pad.top.size_x.max(pad.bottom.size_x);
                let size_y = pad.top.size_y.max(pad.bottom.size_y);
                let rect = CoordRect::from_center(pad.location, size_x, size_y);
                Some(rect.rotated_bounds(pad.location, pad.rotation))
            }
            Self::Track(track) => {
                Some(CoordRect::new(track.start, track.end).inflate(track.width / 2))
            }
            Self::Via(via) => Some(CoordRect::from_center(
                via.location,
                via.diameter,
                via.diameter,
            )),
            Self::Arc(arc) => Some(
                CoordRect::from_center(arc.location, arc.radius * 2, arc.radius * 2)
                    .inflate(arc.width / 2),
            ),
            Self::Text(text) => Some(text.extent().rotated_bounds(text.location, text.rotation)),
            Self::Fill(fill) => Some(fill.rect.rotated_bounds(fill.rect.center(), fill.rotation)),
            Self::Region(region) => CoordRect::from_points(region.outline.iter().copied()),
            Self::ComponentBody(body) => CoordRect::from_points(body.outline.iter().copied()),
        }
    }
}

/// A footprint.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PcbComponent {
    pub name: String,
    pub description: String,
    pub height: Coord,
    pub bounds: CoordRect,
    pub primitives: Vec<PcbPrimitive>,
}

impl PcbComponent {
    /// Stored bounds, or the union of primitive bounds when they are empty.
    pub fn effective_bounds(&self) -> CoordRect {
        if !self.bounds.is_empty() {
            return self.bounds;
        }
        self.primitives
            .iter()
            .filter_map(PcbPrimitive::bounds)
            .reduce(|acc, rect| acc.union(&rect))
            .unwrap_or_default()
    }
}
