//! CLI logic for the Stencil renderer.
//!
//! The input is JSON: either a single component (an object with a `kind`
//! field) rendered to one SVG file, or a library (an object with a
//! `components` array) rendered to one `<name>.svg` per component in an
//! output directory.

pub mod error_adapter;

mod args;
mod config;
mod error;

pub use args::Args;
pub use error::CliError;

use std::{
    collections::HashSet,
    fs,
    path::{Path, PathBuf},
};

use log::{debug, info};

use stencil::{
    RenderBuilder, RenderOptions,
    color::Color,
    config::AppConfig,
    model::{Library, LibraryComponent},
};

const DEFAULT_OUTPUT_FILE: &str = "out.svg";
const DEFAULT_OUTPUT_DIR: &str = "out";

/// Parsed input file.
#[derive(Debug)]
enum Input {
    Component(Box<LibraryComponent>),
    Library(Library),
}

/// Run the Stencil CLI application
///
/// Reads the input file, renders it with the configured options and writes
/// the SVG output.
///
/// # Errors
///
/// Returns `CliError` for:
/// - File I/O errors
/// - Configuration loading errors
/// - Malformed input
/// - Invalid render options
/// - Rendering errors
pub fn run(args: &Args) -> Result<(), CliError> {
    info!(
        input_path = args.input,
        output_path:? = args.output;
        "Processing input"
    );

    let app_config = config::load_config(args.config.as_ref())?;
    let options = render_options(&app_config, args)?;
    let builder = RenderBuilder::from_config(&app_config)?.with_font_metrics(args.font_metrics);

    let source = fs::read_to_string(&args.input).map_err(|err| CliError::io(&args.input, err))?;
    match parse_input(Path::new(&args.input), source)? {
        Input::Component(component) => {
            let output = args.output.as_deref().unwrap_or(DEFAULT_OUTPUT_FILE);
            render_component(&builder, &component, Path::new(output), &options)
        }
        Input::Library(library) => {
            let output = args.output.as_deref().unwrap_or(DEFAULT_OUTPUT_DIR);
            render_library(&builder, &library, Path::new(output), &options)
        }
    }
}

/// Applies command-line overrides on top of the configured options.
fn render_options(config: &AppConfig, args: &Args) -> Result<RenderOptions, CliError> {
    let configured = config.render_options()?;
    let mut options = configured
        .clone()
        .with_size(
            args.width.unwrap_or(configured.width()),
            args.height.unwrap_or(configured.height()),
        )
        .with_scale(args.scale.unwrap_or(configured.scale()))
        .with_auto_zoom(configured.auto_zoom() && !args.no_auto_zoom)
        .with_part(args.part);
    if let Some(background) = &args.background {
        options = options.with_background(Color::new(background).map_err(CliError::Option)?);
    }
    options.validate()?;
    debug!(options:?; "Render options");
    Ok(options)
}

fn parse_input(path: &Path, source: String) -> Result<Input, CliError> {
    // Probe for the library shape first, then parse again into the concrete
    // type so errors keep their line and column.
    let parsed = match serde_json::from_str::<serde_json::Value>(&source) {
        Ok(value) if value.get("components").is_some() => {
            serde_json::from_str(&source).map(Input::Library)
        }
        Ok(_) => serde_json::from_str(&source).map(|c| Input::Component(Box::new(c))),
        Err(err) => Err(err),
    };
    parsed.map_err(|err| CliError::Input {
        path: path.to_path_buf(),
        src: source,
        err,
    })
}

fn render_component(
    builder: &RenderBuilder,
    component: &LibraryComponent,
    output: &Path,
    options: &RenderOptions,
) -> Result<(), CliError> {
    let mut svg = Vec::new();
    let summary = builder.render(component, &mut svg, options)?;
    fs::write(output, svg).map_err(|err| CliError::io(output, err))?;

    info!(
        output_file = output.display().to_string(),
        drawn = summary.drawn,
        skipped = summary.skipped;
        "SVG exported successfully"
    );
    Ok(())
}

fn render_library(
    builder: &RenderBuilder,
    library: &Library,
    output_dir: &Path,
    options: &RenderOptions,
) -> Result<(), CliError> {
    fs::create_dir_all(output_dir).map_err(|err| CliError::io(output_dir, err))?;

    let rendered = builder.render_library(library, options, || false)?;
    let mut used = HashSet::new();
    for component in &rendered {
        let path = output_dir.join(unique_file_name(&component.name, &mut used));
        fs::write(&path, &component.svg).map_err(|err| CliError::io(&path, err))?;
        debug!(
            name = component.name,
            kind = component.kind,
            path = path.display().to_string();
            "Component written"
        );
    }

    info!(
        output_dir = output_dir.display().to_string(),
        components = rendered.len();
        "Library exported successfully"
    );
    Ok(())
}

/// File name for a component: unsafe characters become `_`, empty names
/// become `component`, repeats get a numeric suffix.
fn unique_file_name(name: &str, used: &mut HashSet<String>) -> PathBuf {
    let stem: String = name
        .trim()
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || matches!(c, '-' | '_' | '.') {
                c
            } else {
                '_'
            }
        })
        .collect();
    let stem = match stem.trim_start_matches('.') {
        "" => "component".to_string(),
        trimmed => trimmed.to_string(),
    };

    let mut candidate = stem.clone();
    let mut n = 1;
    while !used.insert(candidate.to_lowercase()) {
        n += 1;
        candidate = format!("{stem}_{n}");
    }
    PathBuf::from(format!("{candidate}.svg"))
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::*;

    #[test]
    fn test_unique_file_name() {
        let mut used = HashSet::new();
        assert_eq!(unique_file_name("RES 0603", &mut used), PathBuf::from("RES_0603.svg"));
        assert_eq!(unique_file_name("res 0603", &mut used), PathBuf::from("res_0603_2.svg"));
        assert_eq!(unique_file_name("../x", &mut used), PathBuf::from("_x.svg"));
        assert_eq!(unique_file_name("", &mut used), PathBuf::from("component.svg"));
        assert_eq!(unique_file_name("  ", &mut used), PathBuf::from("component_2.svg"));
    }

    #[test]
    fn test_cli_flags_override_config() {
        let config: AppConfig = toml::from_str("[render]\nwidth = 1000\nheight = 700").unwrap();
        let args = Args::parse_from([
            "stencil",
            "in.json",
            "--height",
            "50",
            "--no-auto-zoom",
            "--part",
            "3",
            "--background",
            "#000000",
        ]);
        let options = render_options(&config, &args).unwrap();
        assert_eq!(options.width(), 1000);
        assert_eq!(options.height(), 50);
        assert!(!options.auto_zoom());
        assert_eq!(options.part(), Some(3));
        assert_eq!(options.background(), Color::BLACK);
    }

    #[test]
    fn test_bad_flags_are_rejected() {
        let config = AppConfig::default();
        let args = Args::parse_from(["stencil", "in.json", "--background", "sort-of-blue"]);
        assert!(matches!(render_options(&config, &args), Err(CliError::Option(_))));

        let args = Args::parse_from(["stencil", "in.json", "--width", "0"]);
        assert!(matches!(render_options(&config, &args), Err(CliError::Stencil(_))));
    }

    #[test]
    fn test_parse_input_shapes() {
        let component = parse_input(
            Path::new("a.json"),
            r#"{"kind": "footprint", "name": "SOT23"}"#.to_string(),
        )
        .unwrap();
        assert!(matches!(component, Input::Component(c) if c.name() == "SOT23"));

        let library = parse_input(
            Path::new("b.json"),
            r#"{"name": "lib", "components": []}"#.to_string(),
        )
        .unwrap();
        assert!(matches!(library, Input::Library(l) if l.name == "lib"));

        let missing_kind = parse_input(Path::new("c.json"), r#"{"name": "x"}"#.to_string());
        assert!(matches!(missing_kind, Err(CliError::Input { .. })));
    }
}
