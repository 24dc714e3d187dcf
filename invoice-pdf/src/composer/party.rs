use crate::canvas::Canvas;
use crate::text::{clamp_lines, wrap, Align};

use super::{LayoutCursor, Stage};

/// What the party block committed.
#[derive(Debug, Clone, PartialEq)]
pub struct PartyLayout {
    pub top: f64,
    pub address_top: f64,
    /// Left edge and width of the Bill To and Ship To columns.
    pub address_columns: [(f64, f64); 2],
    /// Wrapped address lines as drawn, per column.
    pub address_lines: [Vec<String>; 2],
    pub bottom: f64,
}

/// Biller identity lines (two values per line), then the Bill To / Ship
/// To address columns.
pub(super) fn draw(
    stage: &Stage<'_>,
    canvas: &mut Canvas,
    cursor: LayoutCursor,
) -> (LayoutCursor, PartyLayout) {
    let layout = stage.layout;
    let record = stage.record;
    let left = layout.content_left();
    let top = cursor.y();

    let contact = record
        .contact
        .as_deref()
        .filter(|c| !c.trim().is_empty())
        .unwrap_or("-");
    let lines = [
        (format!("Name: {}", record.name), format!("Contact: {}", contact)),
        (format!("Date: {}", record.date), format!("Email: {}", record.recipient_email)),
        (format!("Invoice No: {}", stage.invoice_number), String::new()),
    ];
    let style = stage.bold(layout.party_size);
    let width = layout.party_column_width;
    let mut cursor = cursor;
    for (first, second) in &lines {
        let y = cursor.y();
        canvas
            .text_in(first, left, y, width, Align::Left, style)
            .text_in(second, layout.party_right_x, y, width, Align::Left, style);
        cursor = cursor.advance(layout.party_line_height);
    }
    cursor = cursor.advance(layout.address_gap);

    let column_width = layout.address_column_width;
    let columns = [
        (left, column_width),
        (left + column_width + layout.address_column_gap, column_width),
    ];
    let label_style = stage.bold(layout.address_label_size);
    let label_top = cursor.y();
    canvas
        .text_in("Bill To:", columns[0].0, label_top, column_width, Align::Left, label_style)
        .text_in("Ship To:", columns[1].0, label_top, column_width, Align::Left, label_style);
    cursor = cursor.advance(layout.address_label_height);

    let address_style = stage.body(layout.address_size);
    let address_top = cursor.y();
    let wrap_column = |text: &str| {
        let measure = |s: &str| canvas.measure(s, &address_style);
        clamp_lines(
            wrap(text, column_width, measure),
            layout.max_address_lines,
            column_width,
            measure,
        )
    };
    let address_lines = [
        wrap_column(record.bill_to_address()),
        wrap_column(record.ship_to_address()),
    ];
    for ((x, w), lines) in columns.iter().zip(&address_lines) {
        for (i, line) in lines.iter().enumerate() {
            let y = address_top + i as f64 * layout.address_line_height;
            canvas.text_in(line, *x, y, *w, Align::Left, address_style);
        }
    }
    let tallest = address_lines.iter().map(Vec::len).max().unwrap_or(0);
    cursor = cursor.advance(tallest as f64 * layout.address_line_height);
    let bottom = cursor.y();
    cursor = cursor.advance(layout.party_gap);

    log::debug!("party stage: {} address line(s); cursor at {:.1}", tallest, cursor.y());
    (
        cursor,
        PartyLayout {
            top,
            address_top,
            address_columns: columns,
            address_lines,
            bottom,
        },
    )
}
