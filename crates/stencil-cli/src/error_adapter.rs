//! Error adapter for converting CLI errors to miette diagnostics.
//!
//! Input errors carry the JSON source, so the report points at the offending
//! line and column. Every other error gets a code and, where there is
//! something useful to say, a help line.

use std::fmt;

use miette::{Diagnostic as MietteDiagnostic, LabeledSpan, SourceSpan};
use serde_json::error::Category;

use stencil::StencilError;

use crate::{config::ConfigError, error::CliError};

/// Adapter that renders a [`CliError`] as a miette diagnostic.
pub struct ErrorAdapter<'a>(pub &'a CliError);

impl fmt::Debug for ErrorAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.0, f)
    }
}

impl fmt::Display for ErrorAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl std::error::Error for ErrorAdapter<'_> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.0.source()
    }
}

impl MietteDiagnostic for ErrorAdapter<'_> {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        let code = match self.0 {
            CliError::Stencil(err) => match err {
                StencilError::Io(_) => "stencil::io",
                StencilError::InvalidOptions(_) => "stencil::options",
                StencilError::Config(_) => "stencil::config",
                StencilError::Draw(_) => "stencil::draw",
                StencilError::Export(_) => "stencil::export",
                StencilError::Cancelled { .. } => "stencil::cancelled",
            },
            CliError::Config(_) => "stencil::config",
            CliError::Io { .. } => "stencil::io",
            CliError::Input { .. } => "stencil::input",
            CliError::Option(_) => "stencil::option",
        };
        Some(Box::new(code))
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        let help = match self.0 {
            CliError::Stencil(StencilError::InvalidOptions(_)) => {
                "--width, --height and --scale must be positive"
            }
            CliError::Config(ConfigError::MissingFile(_)) => "check the path given to --config",
            CliError::Config(ConfigError::Validation(_)) | CliError::Option(_) => {
                "colors use CSS syntax, e.g. \"#1e90ff\" or \"navy\""
            }
            CliError::Input { .. } => {
                "expected a component object with a \"kind\" field, or a library object with a \"components\" array"
            }
            _ => return None,
        };
        Some(Box::new(help))
    }

    fn source_code(&self) -> Option<&dyn miette::SourceCode> {
        match self.0 {
            CliError::Input { src, .. } => Some(src as &dyn miette::SourceCode),
            _ => None,
        }
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        let CliError::Input { src, err, .. } = self.0 else {
            return None;
        };
        let offset = line_column_offset(src, err.line(), err.column())?;
        let len = usize::from(offset < src.len());
        let label = LabeledSpan::new_primary_with_span(
            Some(label_message(err).to_string()),
            SourceSpan::new(offset.into(), len),
        );
        Some(Box::new(std::iter::once(label)))
    }
}

fn label_message(err: &serde_json::Error) -> &'static str {
    match err.classify() {
        Category::Syntax => "syntax error here",
        Category::Data => "unexpected value here",
        Category::Eof => "input ends here",
        Category::Io => "read failed here",
    }
}

/// Byte offset of a 1-based line and column, clamped to the source length.
fn line_column_offset(src: &str, line: usize, column: usize) -> Option<usize> {
    if line == 0 {
        return None;
    }
    let line_start: usize = src
        .split_inclusive('\n')
        .take(line - 1)
        .map(str::len)
        .sum();
    let line_text = src[line_start..].split('\n').next().unwrap_or_default();
    let within = line_text
        .char_indices()
        .nth(column.saturating_sub(1))
        .map_or(line_text.len(), |(i, _)| i);
    Some((line_start + within).min(src.len()))
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;

    fn input_error(src: &str) -> CliError {
        let err = serde_json::from_str::<serde_json::Value>(src).unwrap_err();
        CliError::Input {
            path: PathBuf::from("part.json"),
            src: src.to_string(),
            err,
        }
    }

    #[test]
    fn test_line_column_offset() {
        let src = "ab\ncdef\ng";
        assert_eq!(line_column_offset(src, 1, 1), Some(0));
        assert_eq!(line_column_offset(src, 2, 3), Some(5));
        assert_eq!(line_column_offset(src, 3, 1), Some(8));
        assert_eq!(line_column_offset(src, 3, 9), Some(9));
        assert_eq!(line_column_offset(src, 0, 0), None);
    }

    #[test]
    fn test_input_error_points_at_source() {
        let err = input_error("{\n  \"kind\": ,\n}");
        let adapter = ErrorAdapter(&err);
        assert_eq!(adapter.code().unwrap().to_string(), "stencil::input");
        assert!(adapter.help().is_some());
        assert!(adapter.source_code().is_some());

        let labels: Vec<_> = adapter.labels().unwrap().collect();
        assert_eq!(labels.len(), 1);
        assert!(labels[0].primary());
        assert_eq!(labels[0].label(), Some("syntax error here"));
        // Somewhere on the second line.
        assert!((2..14).contains(&labels[0].offset()));
    }

    #[test]
    fn test_library_errors_have_codes() {
        let err = CliError::Stencil(StencilError::InvalidOptions("zero".to_string()));
        let adapter = ErrorAdapter(&err);
        assert_eq!(adapter.code().unwrap().to_string(), "stencil::options");
        assert!(adapter.help().is_some());
        assert!(adapter.labels().is_none());
        assert_eq!(adapter.to_string(), "invalid render options: zero");
    }

    #[test]
    fn test_config_error_codes() {
        let err = CliError::Config(ConfigError::Parse("bad".to_string()));
        let adapter = ErrorAdapter(&err);
        assert_eq!(adapter.code().unwrap().to_string(), "stencil::config");
        assert!(adapter.help().is_none());
        assert!(adapter.source_code().is_none());
    }
}
