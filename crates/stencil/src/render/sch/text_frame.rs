//! Text frames: a boxed, optionally word-wrapped block of text.

use stencil_core::{
    draw::{HorizontalAlign, TextStyle, VerticalAlign},
    geometry::Point,
    model::{SchComponent, TextFrame},
};

use super::SchComponentRenderer;
use crate::{
    context::{DrawError, RenderContext, with_saved_state},
    measure::LINE_HEIGHT_RATIO,
    render::{Outcome, text::draw_text_line},
};

impl SchComponentRenderer<'_> {
    pub(super) fn draw_text_frame(
        &self,
        component: &SchComponent,
        frame: &TextFrame,
        ctx: &mut dyn RenderContext,
    ) -> Result<Outcome, DrawError> {
        let bounds = self.bounds(&frame.rect);
        if frame.is_solid {
            ctx.fill_rectangle(bounds, frame.fill_color)?;
        }
        if frame.show_border {
            ctx.draw_rectangle(bounds, &Self::stroke(frame.color, frame.line_width))?;
        }

        let text = component.resolve_text(&frame.text);
        if text.trim().is_empty() {
            return Ok(Outcome::Drawn);
        }

        let inner = bounds.deflate(self.length(frame.text_margin));
        let font = self.font(&frame.font);
        let lines: Vec<String> = text
            .lines()
            .flat_map(|paragraph| {
                if frame.word_wrap {
                    wrap_words(paragraph, inner.width(), |s| ctx.measure_text(s, &font).width())
                } else {
                    vec![paragraph.to_string()]
                }
            })
            .collect();

        let line_height = font.size() * LINE_HEIGHT_RATIO;
        let total_height = line_height * lines.len() as f32;
        let top = match frame.vertical_alignment {
            VerticalAlign::Top | VerticalAlign::Baseline => inner.min_y(),
            VerticalAlign::Middle => inner.center().y() - total_height / 2.0,
            VerticalAlign::Bottom => inner.max_y() - total_height,
        };
        let x = match frame.alignment {
            HorizontalAlign::Left => inner.min_x(),
            HorizontalAlign::Center => inner.center().x(),
            HorizontalAlign::Right => inner.max_x(),
        };
        let style = TextStyle::new(font, frame.text_color).with_align(frame.alignment, VerticalAlign::Top);
        let legibility = self.options.legibility();

        let draw_lines = |ctx: &mut dyn RenderContext| -> Result<(), DrawError> {
            for (i, line) in lines.iter().enumerate() {
                let position = Point::new(x, top + line_height * i as f32);
                draw_text_line(ctx, line, position, &style, &legibility)?;
            }
            Ok(())
        };

        if frame.clip_to_rect {
            with_saved_state(ctx, |ctx| {
                ctx.set_clip_rect(bounds)?;
                let drawn = draw_lines(ctx);
                let reset = ctx.reset_clip();
                drawn.and(reset)
            })?;
        } else {
            draw_lines(ctx)?;
        }
        Ok(Outcome::Drawn)
    }
}

/// Greedy word wrap. A word wider than `max_width` gets a line of its own.
fn wrap_words(paragraph: &str, max_width: f32, measure: impl Fn(&str) -> f32) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();
    for word in paragraph.split_whitespace() {
        if current.is_empty() {
            current.push_str(word);
            continue;
        }
        let candidate = format!("{current} {word}");
        if measure(&candidate) <= max_width {
            current = candidate;
        } else {
            lines.push(std::mem::replace(&mut current, word.to_string()));
        }
    }
    lines.push(current);
    lines
}

#[cfg(test)]
mod tests {
    use stencil_core::{
        coord::{Coord, CoordPoint, CoordRect},
        model::{SchFont, SchPrimitive},
    };

    use super::*;
    use crate::{export::record::DrawCommand, options::RenderOptions, render::sch::tests::render};

    fn frame(text: &str) -> TextFrame {
        TextFrame {
            rect: CoordRect::new(CoordPoint::from_mils(0.0, 0.0), CoordPoint::from_mils(200.0, 100.0)),
            text: text.to_string(),
            font: SchFont {
                size: 1.0,
                ..SchFont::default()
            },
            text_margin: Coord::from_mils(50.0),
            ..TextFrame::default()
        }
    }

    fn render_frame(frame: TextFrame) -> Vec<DrawCommand> {
        let component = SchComponent {
            primitives: vec![SchPrimitive::TextFrame(frame)],
            ..SchComponent::default()
        };
        render(&component, &RenderOptions::default())
    }

    fn texts(commands: &[DrawCommand]) -> Vec<&str> {
        commands
            .iter()
            .filter_map(|c| match c {
                DrawCommand::Text { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_wrap_words_greedy() {
        let measure = |s: &str| s.chars().count() as f32;
        assert_eq!(wrap_words("aa bb cc", 5.0, measure), vec!["aa bb", "cc"]);
        assert_eq!(wrap_words("toolongword x", 4.0, measure), vec!["toolongword", "x"]);
        assert_eq!(wrap_words("", 4.0, measure), vec![""]);
    }

    #[test]
    fn test_frame_wraps_to_inner_width() {
        // 6px glyphs, 100px between the margins.
        let commands = render_frame(frame("one two three four"));
        assert_eq!(texts(&commands), vec!["one two three", "four"]);
        assert!(matches!(commands[0], DrawCommand::FillRectangle { .. }));
        assert!(matches!(commands[1], DrawCommand::Rectangle { .. }));
        assert_eq!(commands[2], DrawCommand::SaveState);
        assert!(matches!(commands[3], DrawCommand::SetClip { .. }));
        assert_eq!(commands.last(), Some(&DrawCommand::RestoreState));
    }

    #[test]
    fn test_explicit_newlines_without_wrap() {
        let commands = render_frame(TextFrame {
            word_wrap: false,
            clip_to_rect: false,
            is_solid: false,
            show_border: false,
            ..frame("first line is long\nsecond")
        });
        assert_eq!(texts(&commands), vec!["first line is long", "second"]);
        let positions: Vec<_> = commands
            .iter()
            .filter_map(|c| match c {
                DrawCommand::Text { position, .. } => Some(*position),
                _ => None,
            })
            .collect();
        assert!((positions[1].y() - positions[0].y() - 10.0 * LINE_HEIGHT_RATIO).abs() < 1e-3);
    }

    #[test]
    fn test_bottom_right_alignment() {
        let commands = render_frame(TextFrame {
            alignment: HorizontalAlign::Right,
            vertical_alignment: VerticalAlign::Bottom,
            ..frame("x")
        });
        let position = commands
            .iter()
            .find_map(|c| match c {
                DrawCommand::Text { position, style, .. } => {
                    assert_eq!(style.h_align(), HorizontalAlign::Right);
                    Some(*position)
                }
                _ => None,
            })
            .unwrap();
        // Frame spans x 500..700 and y 400..500 on screen; the margin is 50px.
        assert!((position.x() - 650.0).abs() < 1e-3);
        assert!((position.y() - (450.0 - 10.0 * LINE_HEIGHT_RATIO)).abs() < 1e-3);
    }

    #[test]
    fn test_empty_frame_draws_box_only() {
        let commands = render_frame(frame("  "));
        assert_eq!(commands.len(), 2);
    }
}
