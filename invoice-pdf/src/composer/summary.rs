use crate::canvas::Canvas;
use crate::config::SUMMARY_COLUMNS;
use crate::graphics::Stroke;
use crate::record::BillingRecord;
use crate::text::{Align, TextStyle};

use super::table::{column_edges, Grid, RowLayout, TableLayout};
use super::{LayoutCursor, Stage};

const ALIGNS: [Align; SUMMARY_COLUMNS] = [Align::Center, Align::Left, Align::Left];

/// The four summary rows, in the order they are printed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SummaryRow {
    Subtotal,
    Discount,
    Gst,
    GrandTotal,
}

impl SummaryRow {
    pub const ALL: [SummaryRow; 4] = [
        SummaryRow::Subtotal,
        SummaryRow::Discount,
        SummaryRow::Gst,
        SummaryRow::GrandTotal,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            SummaryRow::Subtotal => "Subtotal",
            SummaryRow::Discount => "Discount",
            SummaryRow::Gst => "GST Amount",
            SummaryRow::GrandTotal => "Grand Total",
        }
    }

    /// Percentage column text; only the discount row has one.
    fn percent(&self, record: &BillingRecord) -> String {
        match self {
            SummaryRow::Discount => record.discount_label(),
            _ => String::new(),
        }
    }

    fn amount<'r>(&self, record: &'r BillingRecord) -> &'r str {
        match self {
            SummaryRow::Subtotal => &record.subtotal,
            SummaryRow::Discount => &record.discount_amount,
            SummaryRow::Gst => &record.gst_amount,
            SummaryRow::GrandTotal => &record.total_amount,
        }
    }
}

/// Summary header and exactly four rows. Zero amounts are printed, never
/// skipped. Only the grand total row gets the emphasis fill.
pub(super) fn draw(
    stage: &Stage<'_>,
    canvas: &mut Canvas,
    cursor: LayoutCursor,
) -> (LayoutCursor, TableLayout) {
    let layout = stage.layout;
    let theme = stage.theme;
    let palette = &theme.palette;
    let edges = column_edges(layout.content_left(), &layout.summary_columns);
    let grid = Grid {
        edges: &edges,
        inset: layout.cell_inset,
        row_height: layout.row_height,
    };
    let rule = Stroke::new(palette.border, layout.border_width);

    let cursor = cursor.advance(layout.summary_gap);
    let top = cursor.y();
    let header = grid.band(top);
    let header_style =
        TextStyle::new(theme.bold_font, layout.table_header_size, palette.table_header);
    let labels = ["Summary".to_string(), String::new(), "Amount".to_string()];
    grid.cells(canvas, &header, &labels, &ALIGNS, header_style);
    let mut cursor = cursor.advance(layout.row_height);

    let style = stage.body(layout.cell_size);
    let mut rows = Vec::with_capacity(SummaryRow::ALL.len());
    for row in SummaryRow::ALL {
        let band = grid.band(cursor.y());
        let fill = match row {
            SummaryRow::GrandTotal => palette.total_fill,
            _ => palette.summary_fill,
        };
        canvas.fill_rect(band, fill);
        let texts = [
            row.label().to_string(),
            row.percent(stage.record),
            format!("{}{}", row.amount(stage.record), theme.currency_suffix),
        ];
        let cells = grid.cells(canvas, &band, &texts, &ALIGNS, style);
        rows.push(RowLayout { band, fill, cells });
        cursor = cursor.advance(layout.row_height);
    }

    // Drawn after the rows so the first row's fill cannot cover it.
    grid.rule(canvas, header.bottom(), rule);
    let border = grid.border(canvas, top, cursor.y(), rule);
    log::debug!("summary stage: cursor at {:.1}", cursor.y());
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
