//! Command-line argument definitions for the Stencil CLI.
//!
//! Rendering flags given here override the matching `[render]` and `[style]`
//! values of the configuration file.

use clap::Parser;

/// Render schematic symbols and PCB footprints to SVG
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path to the input component or library (JSON)
    #[arg(help = "Path to the input file")]
    pub input: String,

    /// Output SVG file, or output directory for a library input
    #[arg(short, long)]
    pub output: Option<String>,

    /// Canvas width in pixels
    #[arg(long)]
    pub width: Option<u32>,

    /// Canvas height in pixels
    #[arg(long)]
    pub height: Option<u32>,

    /// Pixels per design unit, used when auto-zoom is off
    #[arg(long)]
    pub scale: Option<f64>,

    /// Keep the configured scale instead of fitting the component
    #[arg(long)]
    pub no_auto_zoom: bool,

    /// Part to draw for multi-part symbols
    #[arg(long)]
    pub part: Option<i32>,

    /// Background color (CSS syntax)
    #[arg(long)]
    pub background: Option<String>,

    /// Measure text with real font metrics
    #[arg(long)]
    pub font_metrics: bool,

    /// Path to configuration file (TOML)
    #[arg(short, long)]
    pub config: Option<String>,

    /// Log level (off, error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    pub log_level: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let args = Args::parse_from(["stencil", "part.json"]);
        assert_eq!(args.input, "part.json");
        assert!(args.output.is_none());
        assert!(!args.no_auto_zoom);
        assert_eq!(args.log_level, "info");
    }

    #[test]
    fn test_render_flags() {
        let args = Args::parse_from([
            "stencil",
            "lib.json",
            "-o",
            "out",
            "--width",
            "320",
            "--scale",
            "0.0002",
            "--no-auto-zoom",
            "--part",
            "2",
            "--background",
            "black",
            "--font-metrics",
        ]);
        assert_eq!(args.output.as_deref(), Some("out"));
        assert_eq!(args.width, Some(320));
        assert_eq!(args.height, None);
        assert_eq!(args.scale, Some(0.0002));
        assert!(args.no_auto_zoom);
        assert_eq!(args.part, Some(2));
        assert_eq!(args.background.as_deref(), Some("black"));
        assert!(args.font_metrics);
    }
}
