use crate::canvas::Canvas;
use crate::config::ITEM_COLUMNS;
use crate::graphics::Stroke;
use crate::text::{Align, TextStyle};

use super::table::{column_edges, Grid, RowLayout, TableLayout};
use super::{LayoutCursor, Stage};

const HEADERS: [&str; ITEM_COLUMNS] = ["S.No", "Description", "Quantity", "Price/Unit", "Total"];
const ALIGNS: [Align; ITEM_COLUMNS] = [
    Align::Left,
    Align::Left,
    Align::Center,
    Align::Center,
    Align::Center,
];

/// Header row, then one fixed-height row per line item in record order.
///
/// Row `i` occupies `[top + h + h*i, top + 2h + h*i)` for row height `h`.
/// Descriptions are ellipsized to their cell, so row height never
/// depends on the data.
pub(super) fn draw(
    stage: &Stage<'_>,
    canvas: &mut Canvas,
    cursor: LayoutCursor,
) -> (LayoutCursor, TableLayout) {
    let layout = stage.layout;
    let theme = stage.theme;
    let palette = &theme.palette;
    let edges = column_edges(layout.content_left(), &layout.item_columns);
    let grid = Grid {
        edges: &edges,
        inset: layout.cell_inset,
        row_height: layout.row_height,
    };
    let top = cursor.y();
    let rule = Stroke::new(palette.table_header, layout.border_width);

    let header = grid.band(top);
    let header_style =
        TextStyle::new(theme.bold_font, layout.table_header_size, palette.table_header);
    let labels: Vec<String> = HEADERS.iter().map(|h| h.to_string()).collect();
    grid.cells(canvas, &header, &labels, &ALIGNS, header_style);
    let mut cursor = cursor.advance(layout.row_height);

    let cell_style = stage.body(layout.cell_size);
    let suffix = &theme.currency_suffix;
    let mut rows = Vec::with_capacity(stage.record.items.len());
    for (i, item) in stage.record.items.iter().enumerate() {
        let band = grid.band(cursor.y());
        let fill = if i % 2 == 1 {
            palette.alt_row_fill
        } else {
            palette.row_fill
        };
        canvas.fill_rect(band, fill);
        grid.dividers(canvas, &band, rule);
        let texts = [
            (i + 1).to_string(),
            item.description.clone(),
            item.quantity.clone(),
            format!("{}{}", item.price, suffix),
            format!("{}{}", item.total, suffix),
        ];
        let cells = grid.cells(canvas, &band, &texts, &ALIGNS, cell_style);
        rows.push(RowLayout { band, fill, cells });
        cursor = cursor.advance(layout.row_height);
    }

    // Drawn after the rows so the first row's fill cannot cover it.
    grid.rule(canvas, header.bottom(), rule);
    let border = grid.border(canvas, top, cursor.y(), rule);
    if cursor.y() > layout.content_bottom() {
        log::warn!(
            "item table ends at {:.1}, past the bottom margin at {:.1}",
            cursor.y(),
            layout.content_bottom()
        );
    }
    log::debug!("item table stage: {} row(s); cursor at {:.1}", rows.len(), cursor.y());
    (
        cursor,
        TableLayout {
            top,
            column_edges: edges.clone(),
            header,
            rows,
            border,
        },
    )
}
