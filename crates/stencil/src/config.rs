//! Configuration types for Stencil rendering.
//!
//! All types implement [`serde::Deserialize`] so they can be loaded from
//! TOML (the CLI does) or any other serde format. Every section is optional.
//!
//! # Overview
//!
//! - [`AppConfig`] - Top-level configuration
//! - [`RenderConfig`] - `[render]`: canvas size, scale and auto-zoom
//! - [`StyleConfig`] - `[style]`: background color
//! - [`LegibilityConfig`] - `[legibility]`: text fallback thresholds
//! - `[layers]` - layer name to color string, applied over the default table
//!
//! # Example
//!
//! ```
//! # use stencil::config::AppConfig;
//! let config: AppConfig = toml::from_str(r##"
//!     [render]
//!     width = 1024
//!
//!     [layers]
//!     TopLayer = "#00ff00"
//! "##).unwrap();
//!
//! let options = config.render_options().unwrap();
//! assert_eq!(options.width(), 1024);
//! assert_eq!(options.height(), 600);
//! assert!(config.layer_colors().is_ok());
//! ```

use indexmap::IndexMap;
use serde::Deserialize;

use stencil_core::{
    color::Color,
    layer::{Layer, LayerColors},
};

use crate::{
    error::StencilError,
    options::{DEFAULT_MIN_PAD_DESIGNATOR_PX, DEFAULT_MIN_TEXT_PX, Legibility, RenderOptions},
};

/// Top-level configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    render: RenderConfig,

    #[serde(default)]
    style: StyleConfig,

    #[serde(default)]
    legibility: LegibilityConfig,

    /// Layer name (or id) to color string, in file order.
    #[serde(default)]
    layers: IndexMap<String, String>,
}

impl AppConfig {
    /// Returns the render section.
    pub fn render(&self) -> &RenderConfig {
        &self.render
    }

    /// Returns the style section.
    pub fn style(&self) -> &StyleConfig {
        &self.style
    }

    /// Returns the legibility section.
    pub fn legibility(&self) -> &LegibilityConfig {
        &self.legibility
    }

    /// Builds render options from the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`StencilError::Config`] if the background color is invalid.
    pub fn render_options(&self) -> Result<RenderOptions, StencilError> {
        let mut options = RenderOptions::new(self.render.width, self.render.height)
            .with_auto_zoom(self.render.auto_zoom)
            .with_scale(self.render.scale)
            .with_legibility(self.legibility.to_legibility());
        if let Some(background) = self.style.background_color()? {
            options = options.with_background(background);
        }
        Ok(options)
    }

    /// Builds the layer color table with the `[layers]` overrides applied.
    ///
    /// # Errors
    ///
    /// Returns [`StencilError::Config`] for an unknown layer name or an
    /// invalid color string.
    pub fn layer_colors(&self) -> Result<LayerColors, StencilError> {
        self.layers
            .iter()
            .try_fold(LayerColors::default(), |colors, (name, color)| {
                let layer: Layer = name
                    .parse()
                    .map_err(|err| StencilError::Config(format!("[layers] {err}")))?;
                let color = Color::new(color)
                    .map_err(|err| StencilError::Config(format!("[layers] {name}: {err}")))?;
                Ok(colors.with_color(layer, color))
            })
    }
}

/// Canvas settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    width: u32,
    height: u32,
    scale: f64,
    auto_zoom: bool,
}

impl RenderConfig {
    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    pub fn auto_zoom(&self) -> bool {
        self.auto_zoom
    }
}

impl Default for RenderConfig {
    fn default() -> Self {
        let defaults = RenderOptions::default();
        Self {
            width: defaults.width(),
            height: defaults.height(),
            scale: defaults.scale(),
            auto_zoom: defaults.auto_zoom(),
        }
    }
}

/// Visual styling; unset fields fall back to renderer defaults.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct StyleConfig {
    /// Background color string.
    #[serde(default)]
    background_color: Option<String>,
}

impl StyleConfig {
    /// Returns the parsed background [`Color`], or `None` if not configured.
    ///
    /// # Errors
    ///
    /// Returns [`StencilError::Config`] if the color string cannot be parsed.
    pub fn background_color(&self) -> Result<Option<Color>, StencilError> {
        self.background_color
            .as_deref()
            .map(Color::new)
            .transpose()
            .map_err(|err| StencilError::Config(format!("invalid background color: {err}")))
    }
}

/// Text legibility thresholds in pixels.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LegibilityConfig {
    min_text_px: f32,
    min_pad_designator_px: f32,
}

impl LegibilityConfig {
    pub fn to_legibility(&self) -> Legibility {
        Legibility::new(self.min_text_px, self.min_pad_designator_px)
    }
}

impl Default for LegibilityConfig {
    fn default() -> Self {
        Self {
            min_text_px: DEFAULT_MIN_TEXT_PX,
            min_pad_designator_px: DEFAULT_MIN_PAD_DESIGNATOR_PX,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config: AppConfig = toml::from_str("").unwrap();
        let options = config.render_options().unwrap();
        assert_eq!(options, RenderOptions::default());
        assert_eq!(config.layer_colors().unwrap(), LayerColors::default());
    }

    #[test]
    fn test_full_config() {
        let config: AppConfig = toml::from_str(
            r##"
            [render]
            width = 300
            height = 200
            scale = 0.0005
            auto_zoom = false

            [style]
            background_color = "black"

            [legibility]
            min_text_px = 5.5

            [layers]
            BottomLayer = "#123456"
            "74" = "silver"
            "##,
        )
        .unwrap();

        let options = config.render_options().unwrap();
        assert_eq!(options.width(), 300);
        assert_eq!(options.height(), 200);
        assert!(!options.auto_zoom());
        assert_eq!(options.background(), Color::BLACK);
        assert_eq!(options.legibility().min_text_px(), 5.5);
        assert_eq!(
            options.legibility().min_pad_designator_px(),
            DEFAULT_MIN_PAD_DESIGNATOR_PX
        );

        let colors = config.layer_colors().unwrap();
        assert_eq!(colors.color(Layer::BOTTOM), Color::from_rgb(0x12, 0x34, 0x56));
        assert_eq!(colors.color(Layer::MULTI_LAYER), Color::from_rgb(192, 192, 192));
    }

    #[test]
    fn test_bad_layer_entries_are_reported() {
        let config: AppConfig = toml::from_str("[layers]\nNowhere = \"red\"").unwrap();
        assert!(matches!(config.layer_colors(), Err(StencilError::Config(_))));

        let config: AppConfig = toml::from_str("[layers]\nTopLayer = \"not-a-color\"").unwrap();
        assert!(matches!(config.layer_colors(), Err(StencilError::Config(_))));
    }

    #[test]
    fn test_bad_background_is_reported() {
        let config: AppConfig =
            toml::from_str("[style]\nbackground_color = \"nope\"").unwrap();
        assert!(config.render_options().is_err());
    }
}
