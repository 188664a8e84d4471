//! Per-render options.
//!
//! [`RenderOptions`] is built once and passed by reference to every render
//! call; renderers never mutate it.

use stencil_core::color::Color;

use crate::error::StencilError;

/// Default minimum pixel height for drawing glyphs instead of a box.
pub const DEFAULT_MIN_TEXT_PX: f32 = 3.0;

/// Default minimum font size in pixels for pad designators.
pub const DEFAULT_MIN_PAD_DESIGNATOR_PX: f32 = 4.0;

/// Thresholds below which text is replaced or omitted.
///
/// The defaults were tuned by eye against common EDA viewers; they are
/// empirical and may be overridden from configuration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Legibility {
    min_text_px: f32,
    min_pad_designator_px: f32,
}

impl Legibility {
    pub fn new(min_text_px: f32, min_pad_designator_px: f32) -> Self {
        Self {
            min_text_px,
            min_pad_designator_px,
        }
    }

    /// Text shorter than this many pixels is drawn as its bounding box.
    pub fn min_text_px(&self) -> f32 {
        self.min_text_px
    }

    /// Pad designators are drawn only above this font size in pixels.
    pub fn min_pad_designator_px(&self) -> f32 {
        self.min_pad_designator_px
    }
}

impl Default for Legibility {
    fn default() -> Self {
        Self::new(DEFAULT_MIN_TEXT_PX, DEFAULT_MIN_PAD_DESIGNATOR_PX)
    }
}

/// Canvas and view options for one render call.
///
/// # Examples
///
/// ```
/// use stencil::RenderOptions;
///
/// let options = RenderOptions::new(640, 480).with_auto_zoom(false).with_scale(0.001);
/// assert_eq!(options.width(), 640);
/// assert!(!options.auto_zoom());
/// assert!(options.validate().is_ok());
/// assert!(RenderOptions::new(0, 10).validate().is_err());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct RenderOptions {
    width: u32,
    height: u32,
    background: Color,
    auto_zoom: bool,
    scale: f64,
    part: Option<i32>,
    legibility: Legibility,
}

impl RenderOptions {
    /// Options for a `width` x `height` canvas with defaults elsewhere.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            ..Self::default()
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn background(&self) -> Color {
        self.background
    }

    pub fn auto_zoom(&self) -> bool {
        self.auto_zoom
    }

    /// Pixels per design unit when auto-zoom is off or cannot apply.
    pub fn scale(&self) -> f64 {
        self.scale
    }

    /// Part to draw for multi-part symbols; `None` draws every part.
    pub fn part(&self) -> Option<i32> {
        self.part
    }

    pub fn legibility(&self) -> Legibility {
        self.legibility
    }

    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    pub fn with_background(mut self, background: Color) -> Self {
        self.background = background;
        self
    }

    pub fn with_auto_zoom(mut self, auto_zoom: bool) -> Self {
        self.auto_zoom = auto_zoom;
        self
    }

    pub fn with_scale(mut self, scale: f64) -> Self {
        self.scale = scale;
        self
    }

    pub fn with_part(mut self, part: Option<i32>) -> Self {
        self.part = part;
        self
    }

    pub fn with_legibility(mut self, legibility: Legibility) -> Self {
        self.legibility = legibility;
        self
    }

    /// Checks the canvas size and scale.
    ///
    /// # Errors
    ///
    /// Returns [`StencilError::InvalidOptions`] for a zero-sized canvas or a
    /// non-positive or non-finite scale.
    pub fn validate(&self) -> Result<(), StencilError> {
        if self.width == 0 || self.height == 0 {
            return Err(StencilError::InvalidOptions(format!(
                "canvas must be non-empty, got {}x{}",
                self.width, self.height
            )));
        }
        if !self.scale.is_finite() || self.scale <= 0.0 {
            return Err(StencilError::InvalidOptions(format!(
                "scale must be a positive number, got {}",
                self.scale
            )));
        }
        Ok(())
    }
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            width: 800,
            height: 600,
            background: Color::WHITE,
            auto_zoom: true,
            scale: 1.0,
            part: None,
            legibility: Legibility::default(),
        }
    }
}
