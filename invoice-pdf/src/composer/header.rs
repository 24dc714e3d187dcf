use crate::canvas::Canvas;
use crate::fonts::FontRef;
use crate::graphics::{Point, Rect, Stroke};
use crate::images::ImageFit;
use crate::text::{Align, TextStyle};

use super::{LayoutCursor, Stage};

/// What the header stage committed.
#[derive(Debug, Clone, PartialEq)]
pub struct HeaderLayout {
    pub title_top: f64,
    /// Horizontal frame the title was centered in.
    pub title_frame: (f64, f64),
    /// Slot the logo was fitted into, when drawn.
    pub logo: Option<Rect>,
    pub contact_lines: usize,
    pub rule_y: f64,
}

/// Title, contact block, logo and the rule beneath them.
///
/// The block has a fixed height: the rule sits `header_height` below the
/// header top and the cursor leaves `rule_gap` below the rule, however
/// many contact lines were configured.
pub(super) fn draw(
    stage: &Stage<'_>,
    canvas: &mut Canvas,
    cursor: LayoutCursor,
) -> (LayoutCursor, HeaderLayout) {
    let layout = stage.layout;
    let theme = stage.theme;
    let palette = &theme.palette;
    let top = cursor.y();
    let left = layout.content_left();

    let mut logo = None;
    if theme.show_logo {
        if let Some(id) = stage.image(canvas, "logo", &theme.logo_asset) {
            canvas.image(id, layout.logo_slot, ImageFit::Fit);
            logo = Some(layout.logo_slot);
        }
    }

    let title_font = stage
        .font(canvas, "title font", &theme.title_font_asset)
        .unwrap_or(FontRef::Builtin(theme.title_font));
    let title_style = TextStyle::new(title_font, layout.title_size, palette.accent);
    // Keep the centered title clear of the logo slot on both sides.
    let inset = match logo {
        Some(slot) => (layout.content_right() - slot.x).max(0.0),
        None => 0.0,
    };
    let title_frame = (left + inset, (layout.content_width - 2.0 * inset).max(0.0));
    canvas.text_in(
        &theme.company_name,
        title_frame.0,
        top,
        title_frame.1,
        Align::Center,
        title_style,
    );

    let contact_style = stage.body(layout.contact_size);
    let half = layout.content_width / 2.0;
    let shown = theme.contact_lines.len().min(layout.max_contact_lines);
    if shown < theme.contact_lines.len() {
        log::debug!(
            "header: dropping {} contact line(s) beyond the reserved block",
            theme.contact_lines.len() - shown
        );
    }
    for (i, line) in theme.contact_lines.iter().take(shown).enumerate() {
        let y = top + layout.contact_offset + i as f64 * layout.contact_line_height;
        canvas
            .text_in(&line.left, left, y, half, Align::Left, contact_style)
            .text_in(&line.right, left + half, y, half, Align::Right, contact_style);
    }

    let rule_y = top + layout.header_height;
    canvas.line(
        Point::new(left, rule_y),
        Point::new(layout.content_right(), rule_y),
        Stroke::new(palette.accent, layout.rule_width),
    );

    let next = cursor.advance(layout.header_height + layout.rule_gap);
    log::debug!("header stage: rule at {:.1}; cursor at {:.1}", rule_y, next.y());
    (
        next,
        HeaderLayout {
            title_top: top,
            title_frame,
            logo,
            contact_lines: shown,
            rule_y,
        },
    )
}
