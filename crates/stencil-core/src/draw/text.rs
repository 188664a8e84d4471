//! Text style values passed to `draw_text` and `measure_text`.
//!
//! - [`FontSpec`] - family, pixel size and weight/slant flags
//! - [`TextStyle`] - a font plus color and anchor alignment
//! - [`HorizontalAlign`] / [`VerticalAlign`] - which point of the text box
//!   sits on the anchor position

use serde::{Deserialize, Serialize};

use crate::color::Color;

/// Horizontal anchor of a text box.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HorizontalAlign {
    Center,
    Right,
    #[default]
    #[serde(other)]
    Left,
}

impl HorizontalAlign {
    /// Returns the SVG `text-anchor` value
    pub fn to_svg_value(self) -> &'static str {
        match self {
            Self::Left => "start",
            Self::Center => "middle",
            Self::Right => "end",
        }
    }

    /// Returns the alignment seen through a horizontal mirror.
    pub fn mirrored(self) -> Self {
        match self {
            Self::Left => Self::Right,
            Self::Center => Self::Center,
            Self::Right => Self::Left,
        }
    }
}

/// Vertical anchor of a text box.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VerticalAlign {
    Top,
    Middle,
    Bottom,
    #[default]
    #[serde(other)]
    Baseline,
}

impl VerticalAlign {
    /// Returns the SVG `dominant-baseline` value
    pub fn to_svg_value(self) -> &'static str {
        match self {
            Self::Top => "text-before-edge",
            Self::Middle => "central",
            Self::Bottom => "text-after-edge",
            Self::Baseline => "alphabetic",
        }
    }

    /// Returns the alignment seen through a vertical mirror.
    pub fn mirrored(self) -> Self {
        match self {
            Self::Top => Self::Bottom,
            Self::Bottom => Self::Top,
            other => other,
        }
    }
}

/// A font request: family name, size in pixels, bold and italic flags.
#[derive(Debug, Clone, PartialEq)]
pub struct FontSpec {
    family: String,
    size: f32,
    bold: bool,
    italic: bool,
}

impl FontSpec {
    /// Creates a regular-weight font of `size` pixels.
    pub fn new(family: impl Into<String>, size: f32) -> Self {
        Self {
            family: family.into(),
            size,
            bold: false,
            italic: false,
        }
    }

    pub fn family(&self) -> &str {
        &self.family
    }

    /// Size in pixels.
    pub fn size(&self) -> f32 {
        self.size
    }

    pub fn bold(&self) -> bool {
        self.bold
    }

    pub fn italic(&self) -> bool {
        self.italic
    }

    pub fn with_size(mut self, size: f32) -> Self {
        self.size = size;
        self
    }

    pub fn with_bold(mut self, bold: bool) -> Self {
        self.bold = bold;
        self
    }

    pub fn with_italic(mut self, italic: bool) -> Self {
        self.italic = italic;
        self
    }
}

impl Default for FontSpec {
    fn default() -> Self {
        Self::new("Arial", 12.0)
    }
}

/// Everything `draw_text` needs besides the string and its anchor.
///
/// # Examples
///
/// ```
/// use stencil_core::color::Color;
/// use stencil_core::draw::{FontSpec, HorizontalAlign, TextStyle, VerticalAlign};
///
/// let style = TextStyle::new(FontSpec::new("Arial", 10.0), Color::BLACK)
///     .with_align(HorizontalAlign::Center, VerticalAlign::Middle);
/// assert_eq!(style.h_align(), HorizontalAlign::Center);
/// assert_eq!(style.font().size(), 10.0);
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TextStyle {
    font: FontSpec,
    color: Color,
    h_align: HorizontalAlign,
    v_align: VerticalAlign,
}

impl TextStyle {
    /// Creates a left/baseline aligned style.
    pub fn new(font: FontSpec, color: Color) -> Self {
        Self {
            font,
            color,
            h_align: HorizontalAlign::default(),
            v_align: VerticalAlign::default(),
        }
    }

    pub fn font(&self) -> &FontSpec {
        &self.font
    }

    pub fn color(&self) -> Color {
        self.color
    }

    pub fn h_align(&self) -> HorizontalAlign {
        self.h_align
    }

    pub fn v_align(&self) -> VerticalAlign {
        self.v_align
    }

    pub fn with_align(mut self, h_align: HorizontalAlign, v_align: VerticalAlign) -> Self {
        self.h_align = h_align;
        self.v_align = v_align;
        self
    }

    pub fn with_font(mut self, font: FontSpec) -> Self {
        self.font = font;
        self
    }

    pub fn with_color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_align_svg_values() {
        assert_eq!(HorizontalAlign::Left.to_svg_value(), "start");
        assert_eq!(HorizontalAlign::Center.to_svg_value(), "middle");
        assert_eq!(HorizontalAlign::Right.to_svg_value(), "end");
        assert_eq!(VerticalAlign::Middle.to_svg_value(), "central");
        assert_eq!(VerticalAlign::Baseline.to_svg_value(), "alphabetic");
    }

    #[test]
    fn test_align_mirrored() {
        assert_eq!(HorizontalAlign::Left.mirrored(), HorizontalAlign::Right);
        assert_eq!(HorizontalAlign::Center.mirrored(), HorizontalAlign::Center);
        assert_eq!(VerticalAlign::Top.mirrored(), VerticalAlign::Bottom);
        assert_eq!(VerticalAlign::Baseline.mirrored(), VerticalAlign::Baseline);
    }

    #[test]
    fn test_font_spec_builders() {
        let font = FontSpec::new("Courier New", 8.0)
            .with_bold(true)
            .with_size(9.5);
        assert_eq!(font.family(), "Courier New");
        assert_eq!(font.size(), 9.5);
        assert!(font.bold());
        assert!(!font.italic());
    }

    #[test]
    fn test_text_style_defaults() {
        let style = TextStyle::default();
        assert_eq!(style.h_align(), HorizontalAlign::Left);
        assert_eq!(style.v_align(), VerticalAlign::Baseline);
        assert_eq!(style.color(), Color::BLACK);
    }
}
