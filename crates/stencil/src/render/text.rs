//! Shared text drawing: overline markup, legibility fallback and the
//! anchor-rotation pattern.

use stencil_core::{
    draw::{HorizontalAlign, Stroke, TextStyle, VerticalAlign},
    geometry::{Bounds, Point, Size},
    overline::OverlineHelper,
};

use crate::{
    context::{DrawError, RenderContext, with_saved_state},
    options::Legibility,
};

/// Baseline position as a fraction of the line height from the top.
const ASCENT_RATIO: f32 = 0.8;

/// Overline distance above the text box, as a fraction of the font size.
const OVERLINE_GAP_RATIO: f32 = 0.08;

/// Box covered by text of `size` anchored at `position`.
pub(crate) fn text_box(
    position: Point,
    size: Size,
    h_align: HorizontalAlign,
    v_align: VerticalAlign,
) -> Bounds {
    let left = match h_align {
        HorizontalAlign::Left => position.x(),
        HorizontalAlign::Center => position.x() - size.width() / 2.0,
        HorizontalAlign::Right => position.x() - size.width(),
    };
    let top = match v_align {
        VerticalAlign::Top => position.y(),
        VerticalAlign::Middle => position.y() - size.height() / 2.0,
        VerticalAlign::Bottom => position.y() - size.height(),
        VerticalAlign::Baseline => position.y() - size.height() * ASCENT_RATIO,
    };
    Bounds::new_from_top_left(Point::new(left, top), size)
}

/// Draws one line of text with overline markup.
///
/// Text whose font is smaller than the legibility threshold is drawn as a
/// filled box of its measured extent instead.
pub(crate) fn draw_text_line(
    ctx: &mut dyn RenderContext,
    text: &str,
    position: Point,
    style: &TextStyle,
    legibility: &Legibility,
) -> Result<(), DrawError> {
    let display = OverlineHelper::display_text(text);
    if display.is_empty() {
        return Ok(());
    }

    let font = style.font();
    if !(font.size().is_finite() && font.size() > 0.0) {
        return Ok(());
    }
    let size = ctx.measure_text(&display, font);
    let area = text_box(position, size, style.h_align(), style.v_align());

    if font.size() < legibility.min_text_px() {
        return ctx.fill_rectangle(area, style.color());
    }

    ctx.draw_text(&display, position, style)?;

    if !OverlineHelper::has_overline(text) {
        return Ok(());
    }
    let overline_y = area.min_y() - font.size() * OVERLINE_GAP_RATIO;
    let stroke = Stroke::solid(style.color(), (font.size() / 12.0).max(1.0));
    let mut offset = area.min_x();
    for segment in OverlineHelper::parse(text) {
        let width = ctx.measure_text(&segment.text, font).width();
        if segment.overlined {
            ctx.draw_line(
                Point::new(offset, overline_y),
                Point::new(offset + width, overline_y),
                &stroke,
            )?;
        }
        offset += width;
    }
    Ok(())
}

/// Draws text turned by `rotation` screen degrees about `anchor`.
pub(crate) fn draw_text_rotated(
    ctx: &mut dyn RenderContext,
    text: &str,
    anchor: Point,
    rotation: f32,
    style: &TextStyle,
    legibility: &Legibility,
) -> Result<(), DrawError> {
    if rotation.rem_euclid(360.0) == 0.0 {
        return draw_text_line(ctx, text, anchor, style, legibility);
    }
    with_saved_state(ctx, |ctx| {
        ctx.translate(anchor.x(), anchor.y())?;
        ctx.rotate(rotation)?;
        draw_text_line(ctx, text, Point::default(), style, legibility)
    })
}
