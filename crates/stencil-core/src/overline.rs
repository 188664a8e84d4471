//! Backslash overline markup.
//!
//! Active-low signal names mark overlined characters with backslashes: every
//! backslash toggles overline mode, so `\RESET\` reads as an overlined
//! `RESET` and `A\B\C` overlines only the `B`. An unmatched trailing toggle
//! keeps the overline to the end of the text.

/// Upper bound on the number of segments one text is split into.
pub const MAX_SEGMENTS: usize = 32;

const TOGGLE: char = '\\';

/// A run of text sharing one overline state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OverlineSegment {
    pub text: String,
    pub overlined: bool,
}

impl OverlineSegment {
    fn new(text: String, overlined: bool) -> Self {
        Self { text, overlined }
    }
}

/// Parser for backslash overline markup.
///
/// # Examples
///
/// ```
/// use stencil_core::overline::OverlineHelper;
///
/// let segments = OverlineHelper::parse("A\\B\\C");
/// assert_eq!(segments.len(), 3);
/// assert!(segments[1].overlined);
/// assert_eq!(OverlineHelper::display_text("\\RESET\\"), "RESET");
/// ```
pub struct OverlineHelper;

impl OverlineHelper {
    /// Splits `text` into segments.
    ///
    /// Segments never contain backslashes, are never empty, and concatenate
    /// to the input with its backslashes removed. Beyond [`MAX_SEGMENTS`]
    /// the remaining text is merged into the last segment.
    pub fn parse(text: &str) -> Vec<OverlineSegment> {
        let mut segments = Vec::new();
        let mut current = String::new();
        let mut overlined = false;

        for ch in text.chars() {
            if ch == TOGGLE {
                if !current.is_empty() {
                    segments.push(OverlineSegment::new(std::mem::take(&mut current), overlined));
                }
                overlined = !overlined;
            } else {
                current.push(ch);
            }
        }
        if !current.is_empty() {
            segments.push(OverlineSegment::new(current, overlined));
        }

        if segments.len() > MAX_SEGMENTS {
            let tail: String = segments
                .drain(MAX_SEGMENTS..)
                .map(|segment| segment.text)
                .collect();
            if let Some(last) = segments.last_mut() {
                last.text.push_str(&tail);
            }
        }
        segments
    }

    /// Returns the text with the markup removed.
    pub fn display_text(text: &str) -> String {
        text.chars().filter(|&ch| ch != TOGGLE).collect()
    }

    /// Returns `true` if any character of `text` is overlined.
    pub fn has_overline(text: &str) -> bool {
        Self::parse(text).iter().any(|segment| segment.overlined)
    }
}


#[cfg(test)]
mod proptest_tests {
    use proptest::prelude::*;

    use super::*;

    // ===================
    // Strategies
    // ===================

    fn markup_strategy() -> impl Strategy<Value = String> {
        proptest::string::string_regex("[A-Z0-9\\\\]{0,80}").unwrap()
    }

    // ===================
    // Property Test Functions
    // ===================

    fn check_concatenation_matches_display(text: &str) -> Result<(), TestCaseError> {
        let segments = OverlineHelper::parse(text);
        let joined: String = segments.iter().map(|s| s.text.as_str()).collect();
        prop_assert_eq!(joined, OverlineHelper::display_text(text));
        Ok(())
    }

    fn check_segments_well_formed(text: &str) -> Result<(), TestCaseError> {
        let segments = OverlineHelper::parse(text);
        prop_assert!(segments.len() <= MAX_SEGMENTS);
        for segment in &segments {
            prop_assert!(!segment.text.is_empty());
            prop_assert!(!segment.text.contains('\\'));
        }
        Ok(())
    }

    // ===================
    // Proptest Wrappers
    // ===================

    proptest! {
        #[test]
        fn concatenation_matches_display(text in markup_strategy()) {
            check_concatenation_matches_display(&text)?;
        }

        #[test]
        fn segments_well_formed(text in markup_strategy()) {
            check_segments_well_formed(&text)?;
        }
    }
}
