//! Library component data model.
//!
//! Components arrive from an external library parser (or as JSON through the
//! CLI) and are read-only to the renderers. Primitive sets are closed enums so
//! every renderer matches them exhaustively.
//!
//! - [`SchComponent`] / [`SchPrimitive`] - schematic symbols ([`sch`])
//! - [`PcbComponent`] / [`PcbPrimitive`] - footprints ([`pcb`])
//! - [`LibraryComponent`] - either of the two, tagged by `kind`
//! - [`Library`] - a batch of components

pub mod pcb;
pub mod sch;

use serde::{Deserialize, Serialize};

use crate::coord::CoordRect;

pub use pcb::{
    ComponentBody, Fill, HoleShape, Pad, PadLayerShape, PadShape, PcbComponent, PcbFontKind,
    PcbPrimitive, Region, Track, Via,
};
pub use sch::{
    Bezier, Ellipse, EllipticalArc, Image, Junction, Label, Line, LineShape, LineShapeSize,
    LineWidth, NetLabel, Parameter, Pie, Pin, PinElectrical, PinOrientation, Polygon, Polyline,
    PowerObject, PowerStyle, Rectangle, RoundedRectangle, SchComponent, SchFont, SchPrimitive,
    Symbol, TextFrame, TextJustification, Wire,
};

/// A schematic symbol or a footprint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LibraryComponent {
    Schematic(SchComponent),
    Footprint(PcbComponent),
}

impl LibraryComponent {
    pub fn name(&self) -> &str {
        match self {
            Self::Schematic(component) => &component.name,
            Self::Footprint(component) => &component.name,
        }
    }

    /// `"schematic"` or `"footprint"`.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Schematic(_) => "schematic",
            Self::Footprint(_) => "footprint",
        }
    }

    pub fn primitive_count(&self) -> usize {
        match self {
            Self::Schematic(component) => component.primitives.len(),
            Self::Footprint(component) => component.primitives.len(),
        }
    }

    /// Bounds used for auto-zoom.
    pub fn effective_bounds(&self) -> CoordRect {
        match self {
            Self::Schematic(component) => component.effective_bounds(),
            Self::Footprint(component) => component.effective_bounds(),
        }
    }
}

impl From<SchComponent> for LibraryComponent {
    fn from(component: SchComponent) -> Self {
        Self::Schematic(component)
    }
}

impl From<PcbComponent> for LibraryComponent {
    fn from(component: PcbComponent) -> Self {
        Self::Footprint(component)
    }
}

/// A batch of components, typically one library file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Library {
    pub name: String,
    pub components: Vec<LibraryComponent>,
}

/// Serde adapter storing bytes as a standard base64 string.
pub(crate) mod base64_bytes {
    use base64::{Engine, engine::general_purpose::STANDARD as BASE64};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&BASE64.encode(bytes))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let encoded = String::deserialize(deserializer)?;
        BASE64
            .decode(encoded.trim())
            .map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coord::CoordPoint;

    #[test]
    fn test_library_component_tagging() {
        let json = r#"{
            "name": "parts",
            "components": [
                {"kind": "schematic", "name": "RES", "primitives": [{"type": "symbol"}]},
                {"kind": "footprint", "name": "0603", "primitives": []}
            ]
        }"#;
        let library: Library = serde_json::from_str(json).unwrap();
        assert_eq!(library.components.len(), 2);
        assert_eq!(library.components[0].kind(), "schematic");
        assert_eq!(library.components[0].primitive_count(), 1);
        assert_eq!(library.components[1].name(), "0603");
    }

    #[test]
    fn test_image_data_is_base64() {
        let json = r#"{"type": "image", "data": "iVBORw=="}"#;
        let primitive: SchPrimitive = serde_json::from_str(json).unwrap();
        let SchPrimitive::Image(image) = primitive else {
            panic!("expected an image");
        };
        assert_eq!(image.data, vec![0x89, b'P', b'N', b'G']);

        let back = serde_json::to_string(&SchPrimitive::Image(image)).unwrap();
        assert!(back.contains("\"iVBORw==\""));
    }

    #[test]
    fn test_library_component_bounds() {
        let component: LibraryComponent = PcbComponent {
            primitives: vec![PcbPrimitive::Track(Track {
                start: CoordPoint::from_raw(0, 0),
                end: CoordPoint::from_raw(10, 0),
                ..Track::default()
            })],
            ..PcbComponent::default()
        }
        .into();
        assert_eq!(component.effective_bounds().width().raw(), 10);
    }
}
