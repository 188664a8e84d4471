//! 32-bit ARGB colors.
//!
//! Library data stores colors as packed integers and the drawing contract
//! passes them around by value, so [`Color`] is a plain `u32` in `0xAARRGGBB`
//! order. CSS color strings (from configuration or JSON input) are parsed
//! through the `color` crate's [`DynamicColor`] and converted to 8-bit sRGB.

use std::{fmt, str::FromStr};

use color::{DynamicColor, Srgb};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// A packed `0xAARRGGBB` color.
///
/// # Examples
///
/// ```
/// use stencil_core::color::Color;
///
/// let red = Color::new("#ff0000").unwrap();
/// assert_eq!(red.argb(), 0xFFFF0000);
///
/// let translucent = red.with_alpha(0x80);
/// assert!(!translucent.is_opaque());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color(u32);

impl Color {
    pub const BLACK: Color = Color(0xFF00_0000);
    pub const WHITE: Color = Color(0xFFFF_FFFF);
    pub const GRAY: Color = Color(0xFF80_8080);
    pub const TRANSPARENT: Color = Color(0x0000_0000);

    /// Parses a CSS color string such as `"#ff0000"`, `"rgb(255, 0, 0)"` or `"red"`.
    pub fn new(color_str: &str) -> Result<Self, String> {
        let parsed = DynamicColor::from_str(color_str)
            .map_err(|err| format!("invalid color `{color_str}`: {err}"))?;
        let rgba = parsed.to_alpha_color::<Srgb>().to_rgba8();
        Ok(Self::from_argb(rgba.a, rgba.r, rgba.g, rgba.b))
    }

    /// Creates a color from its packed `0xAARRGGBB` value.
    pub const fn from_u32(argb: u32) -> Self {
        Self(argb)
    }

    /// Creates a color from individual channels.
    pub const fn from_argb(a: u8, r: u8, g: u8, b: u8) -> Self {
        Self(((a as u32) << 24) | ((r as u32) << 16) | ((g as u32) << 8) | b as u32)
    }

    /// Creates an opaque color.
    pub const fn from_rgb(r: u8, g: u8, b: u8) -> Self {
        Self::from_argb(0xFF, r, g, b)
    }

    /// Creates an opaque color from a Win32 `0x00BBGGRR` value, the layout
    /// schematic records use for their colors.
    pub const fn from_bgr(bgr: u32) -> Self {
        let r = (bgr & 0xFF) as u8;
        let g = ((bgr >> 8) & 0xFF) as u8;
        let b = ((bgr >> 16) & 0xFF) as u8;
        Self::from_rgb(r, g, b)
    }

    /// Returns the packed `0xAARRGGBB` value.
    pub const fn argb(self) -> u32 {
        self.0
    }

    pub const fn a(self) -> u8 {
        (self.0 >> 24) as u8
    }

    pub const fn r(self) -> u8 {
        (self.0 >> 16) as u8
    }

    pub const fn g(self) -> u8 {
        (self.0 >> 8) as u8
    }

    pub const fn b(self) -> u8 {
        self.0 as u8
    }

    /// Returns the same color with a new alpha channel.
    pub const fn with_alpha(self, alpha: u8) -> Self {
        Self((self.0 & 0x00FF_FFFF) | ((alpha as u32) << 24))
    }

    /// Returns the alpha channel as a fraction in `[0, 1]`.
    pub fn opacity(self) -> f32 {
        f32::from(self.a()) / 255.0
    }

    pub const fn is_opaque(self) -> bool {
        self.a() == 0xFF
    }

    pub const fn is_transparent(self) -> bool {
        self.a() == 0
    }

    /// Formats the color channels as `rgb(r,g,b)`, ignoring alpha.
    pub fn to_rgb_string(self) -> String {
        format!("rgb({},{},{})", self.r(), self.g(), self.b())
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::BLACK
    }
}

impl FromStr for Color {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

/// Formats as `#rrggbb`, or `#rrggbbaa` when not opaque; both parse back.
impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r(), self.g(), self.b())?;
        if !self.is_opaque() {
            write!(f, "{:02x}", self.a())?;
        }
        Ok(())
    }
}

impl Serialize for Color {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Accepts either a CSS color string or a packed `0xAARRGGBB` integer.
impl<'de> Deserialize<'de> for Color {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Packed(u32),
            Css(String),
        }

        match Repr::deserialize(deserializer)? {
            Repr::Packed(argb) => Ok(Color::from_u32(argb)),
            Repr::Css(s) => Color::new(&s).map_err(serde::de::Error::custom),
        }
    }
}
