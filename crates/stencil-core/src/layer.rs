//! PCB layers and the per-layer color / draw priority table.
//!
//! Footprint primitives name their layer with the board layer id used by
//! Altium-style libraries (1 = top copper, 32 = bottom copper, 74 = multi
//! layer, ...). [`Layer`] wraps that id without restricting it, so ids the
//! table does not know survive a round trip and simply fall back to neutral
//! defaults.
//!
//! [`LayerColors`] maps a layer to its display color and draw priority. The
//! footprint renderer sorts primitives by priority (ascending, stable) so the
//! board stack-up reads back to front:
//!
//! ```text
//! multi layer / holes → solder masks → pastes → bottom overlay
//!   → bottom copper → inner copper & planes → top copper → top overlay
//!   → keep-out → mechanical → drill layers → unknown
//! ```

use std::{collections::BTreeMap, fmt, str::FromStr};

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::color::Color;

/// A board layer id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Layer(u8);

impl Layer {
    pub const TOP: Layer = Layer(1);
    pub const MID_FIRST: Layer = Layer(2);
    pub const MID_LAST: Layer = Layer(31);
    pub const BOTTOM: Layer = Layer(32);
    pub const TOP_OVERLAY: Layer = Layer(33);
    pub const BOTTOM_OVERLAY: Layer = Layer(34);
    pub const TOP_PASTE: Layer = Layer(35);
    pub const BOTTOM_PASTE: Layer = Layer(36);
    pub const TOP_SOLDER: Layer = Layer(37);
    pub const BOTTOM_SOLDER: Layer = Layer(38);
    pub const PLANE_FIRST: Layer = Layer(39);
    pub const PLANE_LAST: Layer = Layer(54);
    pub const DRILL_GUIDE: Layer = Layer(55);
    pub const KEEP_OUT: Layer = Layer(56);
    pub const MECHANICAL_FIRST: Layer = Layer(57);
    pub const MECHANICAL_LAST: Layer = Layer(72);
    pub const DRILL_DRAWING: Layer = Layer(73);
    pub const MULTI_LAYER: Layer = Layer(74);
    pub const CONNECT: Layer = Layer(75);
    pub const BACKGROUND: Layer = Layer(76);
    pub const DRC_ERROR: Layer = Layer(77);
    pub const HIGHLIGHT: Layer = Layer(78);
    pub const GRID_FINE: Layer = Layer(79);
    pub const GRID_COARSE: Layer = Layer(80);
    pub const PAD_HOLE: Layer = Layer(81);
    pub const VIA_HOLE: Layer = Layer(82);
    pub const TOP_PAD_MASTER: Layer = Layer(83);
    pub const BOTTOM_PAD_MASTER: Layer = Layer(84);
    pub const DRC_DETAIL: Layer = Layer(85);

    /// Creates a layer from its raw id.
    pub const fn new(id: u8) -> Self {
        Self(id)
    }

    /// Returns the raw id.
    pub const fn id(self) -> u8 {
        self.0
    }

    /// Returns the n-th (1-based) inner signal layer.
    pub fn mid(n: u8) -> Option<Self> {
        (1..=30).contains(&n).then(|| Self(Self::MID_FIRST.0 + n - 1))
    }

    /// Returns the n-th (1-based) internal plane.
    pub fn plane(n: u8) -> Option<Self> {
        (1..=16).contains(&n).then(|| Self(Self::PLANE_FIRST.0 + n - 1))
    }

    /// Returns the n-th (1-based) mechanical layer.
    pub fn mechanical(n: u8) -> Option<Self> {
        (1..=16).contains(&n).then(|| Self(Self::MECHANICAL_FIRST.0 + n - 1))
    }

    pub fn is_mid(self) -> bool {
        (Self::MID_FIRST.0..=Self::MID_LAST.0).contains(&self.0)
    }

    pub fn is_plane(self) -> bool {
        (Self::PLANE_FIRST.0..=Self::PLANE_LAST.0).contains(&self.0)
    }

    pub fn is_mechanical(self) -> bool {
        (Self::MECHANICAL_FIRST.0..=Self::MECHANICAL_LAST.0).contains(&self.0)
    }

    /// Returns `true` for signal copper: top, inner and bottom.
    pub fn is_copper(self) -> bool {
        self == Self::TOP || self == Self::BOTTOM || self.is_mid()
    }

    /// Returns the canonical name, or `None` for ids outside the known table.
    pub fn name(self) -> Option<String> {
        let fixed = match self {
            Self::TOP => "TopLayer",
            Self::BOTTOM => "BottomLayer",
            Self::TOP_OVERLAY => "TopOverlay",
            Self::BOTTOM_OVERLAY => "BottomOverlay",
            Self::TOP_PASTE => "TopPaste",
            Self::BOTTOM_PASTE => "BottomPaste",
            Self::TOP_SOLDER => "TopSolder",
            Self::BOTTOM_SOLDER => "BottomSolder",
            Self::DRILL_GUIDE => "DrillGuide",
            Self::KEEP_OUT => "KeepOut",
            Self::DRILL_DRAWING => "DrillDrawing",
            Self::MULTI_LAYER => "MultiLayer",
            Self::CONNECT => "Connect",
            Self::BACKGROUND => "Background",
            Self::DRC_ERROR => "DrcError",
            Self::HIGHLIGHT => "Highlight",
            Self::GRID_FINE => "GridFine",
            Self::GRID_COARSE => "GridCoarse",
            Self::PAD_HOLE => "PadHole",
            Self::VIA_HOLE => "ViaHole",
            Self::TOP_PAD_MASTER => "TopPadMaster",
            Self::BOTTOM_PAD_MASTER => "BottomPadMaster",
            Self::DRC_DETAIL => "DrcDetail",
            layer if layer.is_mid() => {
                return Some(format!("MidLayer{}", layer.0 - Self::MID_FIRST.0 + 1));
            }
            layer if layer.is_plane() => {
                return Some(format!("InternalPlane{}", layer.0 - Self::PLANE_FIRST.0 + 1));
            }
            layer if layer.is_mechanical() => {
                return Some(format!("Mechanical{}", layer.0 - Self::MECHANICAL_FIRST.0 + 1));
            }
            _ => return None,
        };
        Some(fixed.to_string())
    }
}

/// Top copper.
impl Default for Layer {
    fn default() -> Self {
        Self::TOP
    }
}

impl fmt::Display for Layer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.name() {
            Some(name) => f.write_str(&name),
            None => write!(f, "Layer{}", self.0),
        }
    }
}

/// Parses a canonical layer name (case-insensitive), `Layer<id>`, or a bare id.
impl FromStr for Layer {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_ascii_lowercase();
        let numbered = |prefix: &str| {
            lower
                .strip_prefix(prefix)
                .and_then(|n| n.parse::<u8>().ok())
        };

        if let Ok(id) = lower.parse::<u8>() {
            return Ok(Layer(id));
        }
        if let Some(n) = numbered("midlayer") {
            return Layer::mid(n).ok_or_else(|| format!("mid layer out of range: `{s}`"));
        }
        if let Some(n) = numbered("internalplane") {
            return Layer::plane(n).ok_or_else(|| format!("internal plane out of range: `{s}`"));
        }
        if let Some(n) = numbered("mechanical") {
            return Layer::mechanical(n)
                .ok_or_else(|| format!("mechanical layer out of range: `{s}`"));
        }
        if let Some(id) = numbered("layer") {
            return Ok(Layer(id));
        }

        (1..=u8::MAX)
            .map(Layer)
            .find(|layer| {
                layer
                    .name()
                    .is_some_and(|name| name.eq_ignore_ascii_case(&lower))
            })
            .ok_or_else(|| format!("unknown layer `{s}`"))
    }
}

impl Serialize for Layer {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(self.0)
    }
}

/// Accepts a raw id or any name [`Layer::from_str`] understands.
impl<'de> Deserialize<'de> for Layer {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Id(u8),
            Name(String),
        }

        match Repr::deserialize(deserializer)? {
            Repr::Id(id) => Ok(Layer(id)),
            Repr::Name(name) => name.parse().map_err(serde::de::Error::custom),
        }
    }
}

/// Draw priority assigned to layers missing from the table.
pub const UNKNOWN_LAYER_PRIORITY: u32 = 100;

/// Palette cycled through by the inner signal layers.
const MID_LAYER_PALETTE: [Color; 6] = [
    Color::from_rgb(255, 176, 0),
    Color::from_rgb(0, 176, 176),
    Color::from_rgb(176, 0, 176),
    Color::from_rgb(0, 176, 0),
    Color::from_rgb(176, 176, 255),
    Color::from_rgb(176, 96, 0),
];

/// Per-layer color and draw priority.
///
/// Defaults come from a fixed table; colors may be overridden per layer.
///
/// # Examples
///
/// ```
/// use stencil_core::{color::Color, layer::{Layer, LayerColors}};
///
/// let mut colors = LayerColors::default();
/// assert!(colors.priority(Layer::BOTTOM) < colors.priority(Layer::TOP));
/// assert!(colors.priority(Layer::TOP) < colors.priority(Layer::TOP_OVERLAY));
///
/// colors.set_color(Layer::TOP, Color::from_rgb(0, 200, 0));
/// assert_eq!(colors.color(Layer::TOP), Color::from_rgb(0, 200, 0));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LayerColors {
    overrides: BTreeMap<Layer, Color>,
}

impl LayerColors {
    /// Returns the default `(color, priority)` for a layer, or `None` if the
    /// layer is not in the table.
    pub fn default_entry(layer: Layer) -> Option<(Color, u32)> {
        let entry = match layer {
            Layer::MULTI_LAYER => (Color::from_rgb(192, 192, 192), 0),
            Layer::PAD_HOLE => (Color::from_rgb(64, 64, 64), 1),
            Layer::VIA_HOLE => (Color::from_rgb(96, 96, 96), 2),
            Layer::BOTTOM_SOLDER => (Color::from_argb(0x80, 255, 0, 255), 10),
            Layer::TOP_SOLDER => (Color::from_argb(0x80, 128, 0, 128), 11),
            Layer::BOTTOM_PASTE => (Color::from_rgb(128, 0, 0), 20),
            Layer::TOP_PASTE => (Color::from_rgb(128, 128, 128), 21),
            Layer::BOTTOM_OVERLAY => (Color::from_rgb(128, 128, 0), 25),
            Layer::BOTTOM => (Color::from_rgb(0, 0, 255), 30),
            layer if layer.is_mid() => {
                let index = usize::from(layer.0 - Layer::MID_FIRST.0) % MID_LAYER_PALETTE.len();
                (MID_LAYER_PALETTE[index], 40)
            }
            layer if layer.is_plane() => (Color::from_rgb(0, 128, 0), 40),
            Layer::TOP => (Color::from_rgb(255, 0, 0), 50),
            Layer::TOP_OVERLAY => (Color::from_rgb(255, 255, 0), 60),
            Layer::KEEP_OUT => (Color::from_rgb(255, 0, 255), 70),
            layer if layer.is_mechanical() => (Color::from_rgb(128, 0, 128), 80),
            Layer::DRILL_GUIDE => (Color::from_rgb(128, 0, 0), 85),
            Layer::DRILL_DRAWING => (Color::from_rgb(255, 0, 42), 85),
            _ => return None,
        };
        Some(entry)
    }

    /// Returns the display color for a layer.
    pub fn color(&self, layer: Layer) -> Color {
        self.overrides.get(&layer).copied().unwrap_or_else(|| {
            Self::default_entry(layer)
                .map(|(color, _)| color)
                .unwrap_or(Color::GRAY)
        })
    }

    /// Returns the draw priority for a layer; lower draws first.
    pub fn priority(&self, layer: Layer) -> u32 {
        Self::default_entry(layer)
            .map(|(_, priority)| priority)
            .unwrap_or(UNKNOWN_LAYER_PRIORITY)
    }

    /// Overrides the color of one layer.
    pub fn set_color(&mut self, layer: Layer, color: Color) {
        self.overrides.insert(layer, color);
    }

    /// Builder form of [`LayerColors::set_color`].
    pub fn with_color(mut self, layer: Layer, color: Color) -> Self {
        self.set_color(layer, color);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stack_up_order() {
        let colors = LayerColors::default();
        let order = [
            Layer::MULTI_LAYER,
            Layer::BOTTOM_SOLDER,
            Layer::TOP_PASTE,
            Layer::BOTTOM_OVERLAY,
            Layer::BOTTOM,
            Layer::mid(3).unwrap(),
            Layer::TOP,
            Layer::TOP_OVERLAY,
            Layer::KEEP_OUT,
            Layer::mechanical(1).unwrap(),
            Layer::DRILL_DRAWING,
            Layer::new(200),
        ];
        for pair in order.windows(2) {
            assert!(
                colors.priority(pair[0]) < colors.priority(pair[1]),
                "{} should draw before {}",
                pair[0],
                pair[1]
            );
        }
    }

    #[test]
    fn test_unknown_layer_defaults() {
        let colors = LayerColors::default();
        let unknown = Layer::new(250);
        assert_eq!(colors.color(unknown), Color::GRAY);
        assert_eq!(colors.priority(unknown), UNKNOWN_LAYER_PRIORITY);
        assert!(LayerColors::default_entry(unknown).is_none());
    }

    #[test]
    fn test_solder_mask_is_translucent() {
        let colors = LayerColors::default();
        assert!(!colors.color(Layer::TOP_SOLDER).is_opaque());
        assert!(colors.color(Layer::TOP).is_opaque());
    }

    #[test]
    fn test_override_keeps_priority() {
        let colors = LayerColors::default().with_color(Layer::BOTTOM, Color::WHITE);
        assert_eq!(colors.color(Layer::BOTTOM), Color::WHITE);
        assert_eq!(colors.priority(Layer::BOTTOM), 30);
    }

    #[test]
    fn test_layer_names_round_trip() {
        for id in 1..=85u8 {
            let layer = Layer::new(id);
            let name = layer.to_string();
            assert_eq!(name.parse::<Layer>().unwrap(), layer, "{name}");
        }
    }

    #[test]
    fn test_layer_parse_forms() {
        assert_eq!("toplayer".parse::<Layer>().unwrap(), Layer::TOP);
        assert_eq!("MidLayer1".parse::<Layer>().unwrap(), Layer::new(2));
        assert_eq!("Mechanical16".parse::<Layer>().unwrap(), Layer::new(72));
        assert_eq!("74".parse::<Layer>().unwrap(), Layer::MULTI_LAYER);
        assert_eq!("Layer200".parse::<Layer>().unwrap(), Layer::new(200));
        assert!("MidLayer31".parse::<Layer>().is_err());
        assert!("Nowhere".parse::<Layer>().is_err());
    }

    #[test]
    fn test_layer_deserialize() {
        let by_id: Layer = serde_json::from_str("32").unwrap();
        let by_name: Layer = serde_json::from_str("\"TopOverlay\"").unwrap();
        assert_eq!(by_id, Layer::BOTTOM);
        assert_eq!(by_name, Layer::TOP_OVERLAY);
    }

    #[test]
    fn test_is_copper() {
        assert!(Layer::TOP.is_copper());
        assert!(Layer::BOTTOM.is_copper());
        assert!(Layer::mid(30).unwrap().is_copper());
        assert!(!Layer::MULTI_LAYER.is_copper());
        assert!(!Layer::TOP_OVERLAY.is_copper());
    }
}
