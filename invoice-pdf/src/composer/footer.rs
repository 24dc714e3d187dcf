use crate::canvas::Canvas;
use crate::fonts::FontRef;
use crate::graphics::{Rect, Stroke};
use crate::text::{Align, TextStyle};

use super::table::TableLayout;
use super::{LayoutCursor, Stage};

/// Lines of bank details printed in the box.
const BANK_LINES: usize = 3;

/// What the bank and footer stage committed.
#[derive(Debug, Clone, PartialEq)]
pub struct FooterLayout {
    pub bank_box: Option<Rect>,
    /// Top of the thank-you line, anchored to the summary's last row.
    pub thank_you_top: f64,
    pub credit_top: Option<f64>,
    pub signature_top: Option<f64>,
    /// Whether the signature used an embedded accent font.
    pub signature_embedded: bool,
    pub bottom: f64,
}

/// Bank box on the left, thank-you line and signature on the right.
///
/// The box hangs below the summary's border; the right-hand block is
/// positioned from the top of the summary's last row. The two sides end
/// at different heights and the cursor leaves below whichever is lower.
pub(super) fn draw(
    stage: &Stage<'_>,
    canvas: &mut Canvas,
    cursor: LayoutCursor,
    summary: &TableLayout,
) -> (LayoutCursor, FooterLayout) {
    let layout = stage.layout;
    let theme = stage.theme;
    let palette = &theme.palette;
    let left = layout.content_left();
    let right_frame = layout.content_right() - layout.footer_width;
    let mut bottom = cursor.y();

    let mut bank_box = None;
    if theme.show_bank_box {
        let rect = Rect::new(
            left,
            cursor.y() + layout.bank_gap,
            layout.bank_box_width,
            layout.bank_box_height,
        );
        canvas.stroke_rect(rect, Stroke::new(palette.border, layout.border_width));
        let style = stage.body(layout.bank_size);
        let width = rect.width - 2.0 * layout.bank_inset;
        for (i, line) in theme.bank_details.iter().take(BANK_LINES).enumerate() {
            let y = rect.y + layout.bank_inset + i as f64 * layout.bank_line_height;
            canvas.text_in(line, rect.x + layout.bank_inset, y, width, Align::Left, style);
        }
        bottom = bottom.max(rect.bottom());
        bank_box = Some(rect);
    }

    let last_row_top = summary.rows.last().map_or(summary.top, |row| row.band.y);
    let thank_you_top = last_row_top + layout.footer_offset;
    let muted = stage.style(theme.body_font, layout.footer_size, palette.muted);
    canvas.text_in(
        &theme.thank_you,
        right_frame,
        thank_you_top,
        layout.footer_width,
        Align::Right,
        muted,
    );
    let mut right_y = thank_you_top + canvas.line_height(&muted);

    let mut credit_top = None;
    if theme.show_credit_line {
        let y = thank_you_top + layout.credit_gap;
        let faint = muted.with_color(palette.faint);
        canvas.text_in(
            &theme.credit_line,
            right_frame,
            y,
            layout.footer_width,
            Align::Right,
            faint,
        );
        right_y = y + canvas.line_height(&faint);
        credit_top = Some(y);
    }

    let mut signature_top = None;
    let mut signature_embedded = false;
    if theme.show_signature {
        let y = right_y.max(thank_you_top + layout.signature_gap);
        let font = match stage.font(canvas, "signature font", &theme.signature_font_asset) {
            Some(font) => {
                signature_embedded = true;
                font
            }
            None => FontRef::Builtin(theme.signature_fallback_font),
        };
        let style = TextStyle::new(font, layout.signature_size, palette.accent);
        canvas.text_in(
            &theme.signature_text,
            right_frame,
            y,
            layout.footer_width,
            Align::Right,
            style,
        );
        let caption_top = y + layout.caption_gap;
        let caption = stage.style(theme.body_font, layout.caption_size, palette.muted);
        canvas.text_in(
            &theme.signature_caption,
            right_frame,
            caption_top,
            layout.footer_width,
            Align::Right,
            caption,
        );
        right_y = caption_top + canvas.line_height(&caption);
        signature_top = Some(y);
    }

    bottom = bottom.max(right_y);
    let next = cursor.advance_to(bottom);
    if next.y() > layout.content_bottom() {
        log::warn!(
            "footer ends at {:.1}, past the bottom margin at {:.1}",
            next.y(),
            layout.content_bottom()
        );
    }
    log::debug!("bank and footer stage: cursor at {:.1}", next.y());
    (
        next,
        FooterLayout {
            bank_box,
            thank_you_top,
            credit_top,
            signature_top,
            signature_embedded,
            bottom,
        },
    )
}
