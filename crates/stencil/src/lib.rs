//! Stencil - renders schematic symbols and PCB footprints.
//!
//! Components from [`stencil_core::model`] are walked by a renderer that
//! converts design coordinates through a [`CoordTransform`] and issues calls
//! on a [`context::RenderContext`]. Two backends ship with the crate: SVG
//! documents ([`export::svg`]) and an in-memory display list
//! ([`export::record`]).
//!
//! [`RenderBuilder`] wires the pieces together for the common cases.

pub mod config;
pub mod context;
pub mod export;
pub mod measure;
pub mod options;
pub mod render;
pub mod transform;

mod error;

pub use stencil_core::{color, coord, draw, geometry, layer, model, overline};

pub use error::{DrawError, StencilError};
pub use options::{Legibility, RenderOptions};
pub use render::{PcbComponentRenderer, RenderSummary, SchComponentRenderer};
pub use transform::CoordTransform;

use std::io::Write;

use log::{debug, info, warn};

use stencil_core::{
    layer::LayerColors,
    model::{Library, LibraryComponent},
};

use config::AppConfig;
use context::RenderContext;
use export::svg::{SvgBuilder, SvgContext};
use measure::FontMetrics;

/// One component rendered by [`RenderBuilder::render_library`].
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedComponent {
    pub name: String,
    /// `"schematic"` or `"footprint"`.
    pub kind: &'static str,
    pub svg: String,
    pub summary: RenderSummary,
}

/// Builder for rendering library components.
///
/// Holds the layer color table and the text measurement choice; render
/// options are passed per call.
///
/// # Examples
///
/// ```
/// use stencil::{RenderBuilder, RenderOptions};
/// use stencil::coord::{Coord, CoordPoint};
/// use stencil::model::{LibraryComponent, Pin, SchComponent, SchPrimitive};
///
/// let mut symbol = SchComponent::default();
/// symbol.name = "BUF".to_string();
/// symbol.primitives.push(SchPrimitive::Pin(Pin {
///     name: "IN".to_string(),
///     length: Coord::from_mils(200.0),
///     ..Pin::default()
/// }));
///
/// let builder = RenderBuilder::default();
/// let svg = builder
///     .render_svg(&LibraryComponent::from(symbol), &RenderOptions::new(320, 240))
///     .unwrap();
/// assert!(svg.contains("width=\"320\""));
/// ```
#[derive(Debug, Clone, Default)]
pub struct RenderBuilder {
    colors: LayerColors,
    font_metrics: bool,
}

impl RenderBuilder {
    /// Creates a builder with the given layer colors.
    pub fn new(colors: LayerColors) -> Self {
        Self {
            colors,
            font_metrics: false,
        }
    }

    /// Creates a builder from the `[layers]` section of a configuration.
    ///
    /// # Errors
    ///
    /// Returns [`StencilError::Config`] for unknown layers or invalid colors.
    pub fn from_config(config: &AppConfig) -> Result<Self, StencilError> {
        Ok(Self::new(config.layer_colors()?))
    }

    /// Measures SVG text with real font metrics instead of the average
    /// glyph width.
    pub fn with_font_metrics(mut self, enabled: bool) -> Self {
        self.font_metrics = enabled;
        self
    }

    pub fn layer_colors(&self) -> &LayerColors {
        &self.colors
    }

    /// Renders `component` as an SVG document written to `sink`.
    ///
    /// # Errors
    ///
    /// Returns [`StencilError::InvalidOptions`] for invalid options,
    /// [`StencilError::Draw`] if the document cannot be completed and
    /// [`StencilError::Io`] if writing fails.
    pub fn render<W: Write>(
        &self,
        component: &LibraryComponent,
        sink: W,
        options: &RenderOptions,
    ) -> Result<RenderSummary, StencilError> {
        options.validate()?;
        let mut ctx = self.svg_context(options);
        let summary = self.render_with_context(component, &mut ctx, options)?;
        ctx.write_to(sink)?;
        Ok(summary)
    }

    /// Renders `component` to an SVG string.
    ///
    /// # Errors
    ///
    /// See [`RenderBuilder::render`].
    pub fn render_svg(
        &self,
        component: &LibraryComponent,
        options: &RenderOptions,
    ) -> Result<String, StencilError> {
        let mut buffer = Vec::new();
        self.render(component, &mut buffer, options)?;
        String::from_utf8(buffer).map_err(|err| StencilError::Export(Box::new(err)))
    }

    /// Renders `component` onto a caller-supplied context.
    ///
    /// The canvas is cleared to the background color first. The context is
    /// left open so callers can keep drawing or finish it themselves.
    ///
    /// # Errors
    ///
    /// Returns [`StencilError::InvalidOptions`] for invalid options and
    /// [`StencilError::Draw`] if the background cannot be cleared.
    pub fn render_with_context(
        &self,
        component: &LibraryComponent,
        ctx: &mut dyn RenderContext,
        options: &RenderOptions,
    ) -> Result<RenderSummary, StencilError> {
        options.validate()?;
        info!(
            name = component.name(),
            kind = component.kind(),
            primitives = component.primitive_count();
            "Rendering component"
        );

        let transform = self.transform_for(component, options);
        ctx.clear(options.background())?;

        let summary = match component {
            LibraryComponent::Schematic(symbol) => {
                SchComponentRenderer::new(&transform, options).render(symbol, ctx)
            }
            LibraryComponent::Footprint(footprint) => {
                PcbComponentRenderer::new(&transform, options, &self.colors).render(footprint, ctx)
            }
        };
        if summary.failed > 0 {
            warn!(
                name = component.name(),
                failed = summary.failed;
                "Some primitives could not be drawn"
            );
        }
        Ok(summary)
    }

    /// Renders every component of `library` to SVG.
    ///
    /// `is_cancelled` is polled before each component; a component that has
    /// started is always finished.
    ///
    /// # Errors
    ///
    /// Returns [`StencilError::Cancelled`] with the number of finished
    /// components when cancelled, or the first render error.
    pub fn render_library<F>(
        &self,
        library: &Library,
        options: &RenderOptions,
        is_cancelled: F,
    ) -> Result<Vec<RenderedComponent>, StencilError>
    where
        F: Fn() -> bool,
    {
        options.validate()?;
        info!(
            name = library.name.as_str(),
            components = library.components.len();
            "Rendering library"
        );

        let mut rendered = Vec::with_capacity(library.components.len());
        for component in &library.components {
            if is_cancelled() {
                info!(rendered = rendered.len(); "Library rendering cancelled");
                return Err(StencilError::Cancelled {
                    rendered: rendered.len(),
                });
            }
            let mut buffer = Vec::new();
            let summary = self.render(component, &mut buffer, options)?;
            let svg = String::from_utf8(buffer).map_err(|err| StencilError::Export(Box::new(err)))?;
            rendered.push(RenderedComponent {
                name: component.name().to_string(),
                kind: component.kind(),
                svg,
                summary,
            });
        }

        info!(rendered = rendered.len(); "Library rendered");
        Ok(rendered)
    }

    fn transform_for(&self, component: &LibraryComponent, options: &RenderOptions) -> CoordTransform {
        let mut transform = CoordTransform::new(f64::from(options.width()), f64::from(options.height()))
            .with_scale(options.scale());
        if options.auto_zoom() {
            transform.auto_zoom(&component.effective_bounds());
        }
        debug!(
            scale = transform.scale(),
            auto_zoom = options.auto_zoom();
            "Transform ready"
        );
        transform
    }

    fn svg_context(&self, options: &RenderOptions) -> SvgContext {
        let builder = SvgBuilder::new(options.width(), options.height());
        if self.font_metrics {
            builder.with_measurer(Box::new(FontMetrics::shared())).build()
        } else {
            builder.build()
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use stencil_core::{
        color::Color,
        coord::{Coord, CoordPoint},
        model::{Line, PcbComponent, PcbPrimitive, SchComponent, SchPrimitive, Track},
    };

    use super::*;
    use crate::export::record::{DrawCommand, RecordingContext};

    fn symbol(name: &str) -> LibraryComponent {
        SchComponent {
            name: name.to_string(),
            primitives: vec![SchPrimitive::Line(Line {
                start: CoordPoint::from_mils(-100.0, -50.0),
                end: CoordPoint::from_mils(100.0, 50.0),
                ..Line::default()
            })],
            ..SchComponent::default()
        }
        .into()
    }

    fn footprint() -> LibraryComponent {
        PcbComponent {
            name: "FP".to_string(),
            primitives: vec![PcbPrimitive::Track(Track {
                end: CoordPoint::from_mils(100.0, 0.0),
                width: Coord::from_mils(10.0),
                ..Track::default()
            })],
            ..PcbComponent::default()
        }
        .into()
    }

    #[test]
    fn test_render_with_context_clears_then_draws() {
        let options = RenderOptions::new(400, 200).with_background(Color::from_rgb(1, 2, 3));
        let mut ctx = RecordingContext::new();
        let summary = RenderBuilder::default()
            .render_with_context(&symbol("R"), &mut ctx, &options)
            .unwrap();
        assert_eq!(summary.drawn, 1);
        assert_eq!(
            ctx.commands()[0],
            DrawCommand::Clear {
                color: Color::from_rgb(1, 2, 3)
            }
        );
    }

    #[test]
    fn test_auto_zoom_fits_component() {
        let options = RenderOptions::new(400, 200);
        let mut ctx = RecordingContext::new();
        RenderBuilder::default()
            .render_with_context(&symbol("R"), &mut ctx, &options)
            .unwrap();
        match &ctx.commands()[1] {
            DrawCommand::Line { from, to, .. } => {
                assert!(from.x() >= 0.0 && to.x() <= 400.0);
                assert!(to.y() >= 0.0 && from.y() <= 200.0);
                // The line spans the canvas minus the margin.
                assert!((to.x() - from.x() - 380.0).abs() < 1e-2);
            }
            other => panic!("expected the line, got {other:?}"),
        }
    }

    #[test]
    fn test_invalid_options_rejected() {
        let result = RenderBuilder::default().render_svg(&symbol("R"), &RenderOptions::new(0, 100));
        assert!(matches!(result, Err(StencilError::InvalidOptions(_))));
    }

    #[test]
    fn test_render_svg_footprint() {
        let svg = RenderBuilder::default()
            .render_svg(&footprint(), &RenderOptions::new(300, 100))
            .unwrap();
        assert!(svg.contains("<line"));
        assert!(svg.contains("stroke-linecap=\"round\""));
        assert!(svg.contains("height=\"100\""));
    }

    #[test]
    fn test_render_library_cancellation() {
        let library = Library {
            name: "parts".to_string(),
            components: vec![symbol("A"), footprint(), symbol("C")],
        };
        let options = RenderOptions::new(100, 100);
        let builder = RenderBuilder::default();

        let all = builder.render_library(&library, &options, || false).unwrap();
        assert_eq!(
            all.iter().map(|r| r.name.as_str()).collect::<Vec<_>>(),
            vec!["A", "FP", "C"]
        );
        assert_eq!(all[1].kind, "footprint");

        let polls = Cell::new(0);
        let result = builder.render_library(&library, &options, || {
            polls.set(polls.get() + 1);
            polls.get() > 2
        });
        assert!(matches!(result, Err(StencilError::Cancelled { rendered: 2 })));
    }

    #[test]
    fn test_from_config_applies_layer_colors() {
        let config: AppConfig = toml::from_str(
            r##"
            [layers]
            TopLayer = "#00ff00"
            "##,
        )
        .unwrap();
        let builder = RenderBuilder::from_config(&config).unwrap();
        assert_eq!(
            builder.layer_colors().color(stencil_core::layer::Layer::TOP),
            Color::from_rgb(0, 255, 0)
        );
    }
}
