//! Stroke and line-style definitions.
//!
//! Exported types:
//! - [`Stroke`]: color, width (pixels), style, cap and join of an outline
//! - [`StrokeStyle`]: line pattern (solid, dashed, dotted, ...)
//! - [`StrokeCap`]: how line endpoints are rendered
//! - [`StrokeJoin`]: how line corners are rendered
//!
//! The names follow SVG/CSS terminology; backends other than SVG map them to
//! their own pen settings.
//!
//! # Examples
//!
//! ```
//! use stencil_core::color::Color;
//! use stencil_core::draw::{Stroke, StrokeCap, StrokeStyle};
//!
//! let stroke = Stroke::solid(Color::BLACK, 2.0).with_cap(StrokeCap::Round);
//! assert_eq!(stroke.cap(), StrokeCap::Round);
//!
//! let dashed = Stroke::solid(Color::BLACK, 1.0).with_style(StrokeStyle::Dashed);
//! assert_eq!(dashed.style().dash_array(), Some("5,5"));
//! ```

use serde::{Deserialize, Serialize};

use crate::color::Color;

/// Line pattern of a stroke.
///
/// | Variant | Dash array |
/// |---------|------------|
/// | `Solid` | none |
/// | `Dashed` | `5,5` |
/// | `Dotted` | `2,3` |
/// | `DashDot` | `10,5,2,5` |
/// | `DashDotDot` | `10,5,2,5,2,5` |
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StrokeStyle {
    Dashed,
    Dotted,
    DashDot,
    DashDotDot,
    #[default]
    #[serde(other)]
    Solid,
}

impl StrokeStyle {
    /// Returns the dash pattern in pixels, or `None` for solid lines.
    pub fn dash_array(self) -> Option<&'static str> {
        match self {
            Self::Solid => None,
            Self::Dashed => Some("5,5"),
            Self::Dotted => Some("2,3"),
            Self::DashDot => Some("10,5,2,5"),
            Self::DashDotDot => Some("10,5,2,5,2,5"),
        }
    }
}

/// Defines how line endpoints are rendered.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StrokeCap {
    #[default]
    Butt,
    Round,
    Square,
}

impl StrokeCap {
    /// Returns the SVG stroke-linecap value
    pub fn to_svg_value(self) -> &'static str {
        match self {
            Self::Butt => "butt",
            Self::Round => "round",
            Self::Square => "square",
        }
    }
}

/// Defines how line corners are rendered.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StrokeJoin {
    #[default]
    Miter,
    Round,
    Bevel,
}

impl StrokeJoin {
    /// Returns the SVG stroke-linejoin value
    pub fn to_svg_value(self) -> &'static str {
        match self {
            Self::Miter => "miter",
            Self::Round => "round",
            Self::Bevel => "bevel",
        }
    }
}

/// An outline pen: color, width in pixels, pattern, cap and join.
///
/// Widths are screen pixels; the renderers decide whether a width scales
/// with zoom (PCB tracks) or stays fixed (schematic line weights).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Stroke {
    color: Color,
    width: f32,
    style: StrokeStyle,
    cap: StrokeCap,
    join: StrokeJoin,
}

impl Stroke {
    /// Creates a stroke with the given color and width; other properties
    /// take their defaults (solid, butt, miter).
    pub fn new(color: Color, width: f32) -> Self {
        Self {
            color,
            width,
            ..Self::default()
        }
    }

    /// Creates a solid stroke.
    pub fn solid(color: Color, width: f32) -> Self {
        Self::new(color, width)
    }

    /// Creates a solid stroke with round caps and joins.
    pub fn round(color: Color, width: f32) -> Self {
        Self::new(color, width)
            .with_cap(StrokeCap::Round)
            .with_join(StrokeJoin::Round)
    }

    /// Returns the stroke color.
    pub fn color(&self) -> Color {
        self.color
    }

    /// Returns the stroke width.
    pub fn width(&self) -> f32 {
        self.width
    }

    /// Returns the stroke style.
    pub fn style(&self) -> StrokeStyle {
        self.style
    }

    /// Returns the stroke cap style.
    pub fn cap(&self) -> StrokeCap {
        self.cap
    }

    /// Returns the stroke join style.
    pub fn join(&self) -> StrokeJoin {
        self.join
    }

    pub fn with_width(mut self, width: f32) -> Self {
        self.width = width;
        self
    }

    pub fn with_style(mut self, style: StrokeStyle) -> Self {
        self.style = style;
        self
    }

    pub fn with_cap(mut self, cap: StrokeCap) -> Self {
        self.cap = cap;
        self
    }

    pub fn with_join(mut self, join: StrokeJoin) -> Self {
        self.join = join;
        self
    }
}

impl Default for Stroke {
    fn default() -> Self {
        Self {
            color: Color::default(),
            width: 1.0,
            style: StrokeStyle::default(),
            cap: StrokeCap::default(),
            join: StrokeJoin::default(),
        }
    }
}
