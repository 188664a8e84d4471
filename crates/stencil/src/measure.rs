//! Text measurement.
//!
//! Backends measure text through a [`TextMeasurer`]. [`HeuristicMeasurer`]
//! uses a fixed average glyph width and needs no fonts, so its output is
//! identical on every machine. [`FontMetrics`] shapes text with the system
//! fonts via `cosmic-text` for accurate widths.

use std::sync::{Mutex, OnceLock};

use cosmic_text::{Attrs, Buffer, Family, FontSystem, Metrics, Shaping, Style, Weight};
use log::{info, warn};

use stencil_core::{draw::FontSpec, geometry::Size};

/// Average glyph advance as a fraction of the font size.
pub const AVERAGE_GLYPH_RATIO: f32 = 0.6;

/// Line height as a multiple of the font size.
pub const LINE_HEIGHT_RATIO: f32 = 1.15;

/// Measures rendered text in pixels.
pub trait TextMeasurer: Send + Sync {
    fn measure(&self, text: &str, font: &FontSpec) -> Size;
}

impl<T: TextMeasurer + ?Sized> TextMeasurer for &T {
    fn measure(&self, text: &str, font: &FontSpec) -> Size {
        (**self).measure(text, font)
    }
}

/// Fixed-ratio measurement: every glyph is `0.6 * size` wide.
///
/// # Examples
///
/// ```
/// use stencil::measure::{HeuristicMeasurer, TextMeasurer};
/// use stencil_core::draw::FontSpec;
///
/// let size = HeuristicMeasurer.measure("abcd", &FontSpec::new("Arial", 10.0));
/// assert!((size.width() - 24.0).abs() < 1e-4);
/// assert_eq!(size.height(), 10.0);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct HeuristicMeasurer;

impl TextMeasurer for HeuristicMeasurer {
    fn measure(&self, text: &str, font: &FontSpec) -> Size {
        if text.is_empty() {
            return Size::default();
        }
        let (columns, lines) = text.lines().fold((0usize, 0usize), |(cols, lines), line| {
            (cols.max(line.chars().count()), lines + 1)
        });
        Size::new(
            columns as f32 * font.size() * AVERAGE_GLYPH_RATIO,
            lines.max(1) as f32 * font.size(),
        )
    }
}

/// Shaped measurement with real font metrics.
///
/// Creating a `FontSystem` scans the system fonts, so one shared instance
/// is kept for the process; see [`FontMetrics::shared`].
pub struct FontMetrics {
    font_system: Mutex<FontSystem>,
}

static FONT_METRICS: OnceLock<FontMetrics> = OnceLock::new();

impl FontMetrics {
    fn new() -> Self {
        info!("Initializing FontSystem");
        Self {
            font_system: Mutex::new(FontSystem::new()),
        }
    }

    /// Returns the process-wide instance, loading fonts on first use.
    pub fn shared() -> &'static FontMetrics {
        FONT_METRICS.get_or_init(Self::new)
    }
}

impl std::fmt::Debug for FontMetrics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FontMetrics").finish_non_exhaustive()
    }
}

impl TextMeasurer for FontMetrics {
    fn measure(&self, text: &str, font: &FontSpec) -> Size {
        // Shaping requires a positive line height.
        if text.is_empty() || !(font.size().is_finite() && font.size() > 0.0) {
            return Size::default();
        }

        let Ok(mut font_system) = self.font_system.lock() else {
            warn!(text; "FontSystem lock poisoned, using heuristic measurement");
            return HeuristicMeasurer.measure(text, font);
        };

        let line_height = font.size() * LINE_HEIGHT_RATIO;
        let metrics = Metrics::new(font.size(), line_height);

        let mut buffer = Buffer::new(&mut font_system, metrics);
        let mut buffer = buffer.borrow_with(&mut font_system);

        let mut attrs = Attrs::new().family(Family::Name(font.family()));
        if font.bold() {
            attrs = attrs.weight(Weight::BOLD);
        }
        if font.italic() {
            attrs = attrs.style(Style::Italic);
        }

        buffer.set_size(None, None);
        buffer.set_text(text, &attrs, Shaping::Advanced, None);
        buffer.shape_until_scroll(true);

        let mut max_width: f32 = 0.0;
        let mut total_height: f32 = 0.0;
        for run in buffer.layout_runs() {
            if let Some(last) = run.glyphs.last() {
                max_width = max_width.max(last.x + last.w);
            }
            total_height += metrics.line_height;
        }

        if total_height == 0.0 {
            // No runs: nothing shaped, e.g. no fonts installed.
            return HeuristicMeasurer.measure(text, font);
        }

        Size::new(max_width, total_height)
    }
}

#[cfg(test)]
mod tests {
    use float_cmp::assert_approx_eq;

    use super::*;

    #[test]
    fn test_heuristic_empty_text() {
        let size = HeuristicMeasurer.measure("", &FontSpec::default());
        assert_eq!(size, Size::default());
    }

    #[test]
    fn test_heuristic_counts_chars_not_bytes() {
        let font = FontSpec::new("Arial", 10.0);
        let size = HeuristicMeasurer.measure("µΩ", &font);
        assert_approx_eq!(f32, size.width(), 12.0);
    }

    #[test]
    fn test_heuristic_multiline_uses_widest_line() {
        let font = FontSpec::new("Arial", 10.0);
        let size = HeuristicMeasurer.measure("ab\nabcd\na", &font);
        assert_approx_eq!(f32, size.width(), 24.0);
        assert_approx_eq!(f32, size.height(), 30.0);
    }

    #[test]
    fn test_font_metrics_shared_is_singleton() {
        assert!(std::ptr::eq(FontMetrics::shared(), FontMetrics::shared()));
    }

    #[test]
    fn test_font_metrics_zero_size_is_empty() {
        let metrics = FontMetrics::shared();
        for size in [0.0, -1.0, f32::NAN, f32::INFINITY] {
            let measured = metrics.measure("REF", &FontSpec::new("Arial", size));
            assert_eq!(measured, Size::default());
        }
    }

    #[test]
    fn test_font_metrics_measures_positive_size() {
        let size = FontMetrics::shared().measure("Hello", &FontSpec::new("Arial", 12.0));
        assert!(size.width() > 0.0);
        assert!(size.height() > 0.0);
    }
}
