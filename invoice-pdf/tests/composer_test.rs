mod common;

use std::sync::Arc;

use common::{png_bytes, record_with_items, sample_record};
use invoice_pdf::{
    BillingRecord, ContactLine, DocumentComposer, FontRef, InputError, InvoiceConfig, LineItem,
    MemoryAssets, Palette, Primitive, Theme,
};

fn composer() -> DocumentComposer {
    DocumentComposer::default()
}

fn branded_assets() -> MemoryAssets {
    MemoryAssets::new()
        .with("background.png", png_bytes(60, 80, false))
        .with("logo.png", png_bytes(40, 20, true))
}

// -------------------------------------------------------
// Item table
// -------------------------------------------------------

#[test]
fn item_rows_sit_at_fixed_offsets() {
    for n in [1, 2, 5, 9] {
        let page = composer().compose(&record_with_items(n)).unwrap();
        let items = &page.layout.items;
        assert_eq!(items.rows.len(), n);
        for (i, row) in items.rows.iter().enumerate() {
            assert_eq!(row.band.y, items.top + 25.0 + 25.0 * i as f64);
            assert_eq!(row.band.height, 25.0);
        }
        assert_eq!(items.border.y, items.top);
        assert_eq!(items.bottom(), items.top + 25.0 + 25.0 * n as f64);
    }
}

#[test]
fn zebra_parity_follows_row_index() {
    let palette = Palette::default();
    let page = composer().compose(&record_with_items(6)).unwrap();
    for (i, row) in page.layout.items.rows.iter().enumerate() {
        let expected = if i % 2 == 1 {
            palette.alt_row_fill
        } else {
            palette.row_fill
        };
        assert_eq!(row.fill, expected, "row {}", i);
    }
}

#[test]
fn rows_keep_record_order_and_serial_numbers() {
    let page = composer().compose(&record_with_items(3)).unwrap();
    let cells: Vec<(&str, &str)> = page
        .layout
        .items
        .rows
        .iter()
        .map(|r| (r.cells[0].as_str(), r.cells[1].as_str()))
        .collect();
    assert_eq!(cells, vec![("1", "Item 1"), ("2", "Item 2"), ("3", "Item 3")]);
    assert_eq!(page.layout.items.rows[0].cells[3], "10.00Rs.");
}

#[test]
fn long_description_is_ellipsized_without_moving_rows() {
    let short = composer().compose(&record_with_items(3)).unwrap();

    let mut record = record_with_items(3);
    record.items[1].description =
        "Premium hand-stitched leather notebook covers with brass corners and gilt edges".into();
    let long = composer().compose(&record).unwrap();

    let cell = &long.layout.items.rows[1].cells[1];
    assert!(cell.ends_with("..."), "got {:?}", cell);
    let run = long.canvas.text_runs().find(|r| &r.text == cell).unwrap();
    let edges = &long.layout.items.column_edges;
    assert!(run.x >= edges[1] && run.x + run.width <= edges[2]);

    assert_eq!(short.layout.items, {
        let mut items = long.layout.items.clone();
        items.rows[1].cells[1] = "Item 2".into();
        items
    });
    assert_eq!(short.layout.summary, long.layout.summary);
}

#[test]
fn wide_latin1_description_stays_inside_its_cell() {
    let mut record = record_with_items(2);
    record.items[0].description = "Ö".repeat(40);
    let page = composer().compose(&record).unwrap();

    let cell = &page.layout.items.rows[0].cells[1];
    assert!(cell.ends_with("..."), "got {:?}", cell);
    let run = page.canvas.text_runs().find(|r| &r.text == cell).unwrap();
    // Helvetica AFM: Odieresis 778, period 278.
    let kept = cell.chars().filter(|&c| c == 'Ö').count();
    let drawn_width = (kept as f64 * 778.0 + 3.0 * 278.0) * 10.0 / 1000.0;
    assert!((run.width - drawn_width).abs() < 1e-9);
    let edges = &page.layout.items.column_edges;
    assert!(run.x >= edges[1] && run.x + drawn_width <= edges[2]);
}

#[test]
fn dividers_use_the_column_edges() {
    let page = composer().compose(&record_with_items(2)).unwrap();
    let items = &page.layout.items;
    let first = items.rows[0].band;
    let xs: Vec<f64> = page
        .canvas
        .primitives()
        .iter()
        .filter_map(|p| match p {
            Primitive::Line { from, to, .. }
                if from.x == to.x && from.y == first.y && to.y == first.bottom() =>
            {
                Some(from.x)
            }
            _ => None,
        })
        .collect();
    assert_eq!(xs, items.column_edges[..5].to_vec());
}

#[test]
fn empty_items_are_rejected_before_drawing() {
    let record = BillingRecord {
        items: vec![],
        ..sample_record()
    };
    assert_eq!(
        composer().compose(&record).err(),
        Some(InputError::EmptyItems)
    );
}

// -------------------------------------------------------
// Summary
// -------------------------------------------------------

#[test]
fn summary_has_four_fixed_rows() {
    let page = composer().compose(&sample_record()).unwrap();
    let summary = &page.layout.summary;
    let labels: Vec<&str> = summary.rows.iter().map(|r| r.cells[0].as_str()).collect();
    assert_eq!(labels, vec!["Subtotal", "Discount", "GST Amount", "Grand Total"]);

    let palette = Palette::default();
    let fills: Vec<_> = summary.rows.iter().map(|r| r.fill).collect();
    assert_eq!(
        fills,
        vec![
            palette.summary_fill,
            palette.summary_fill,
            palette.summary_fill,
            palette.total_fill
        ]
    );
    assert_eq!(summary.rows[1].cells[1], "10%");
    assert_eq!(summary.rows[2].cells[1], "");
}

#[test]
fn grand_total_reads_106_20_rs() {
    let page = composer().compose(&sample_record()).unwrap();
    let total = &page.layout.summary.rows[3];
    assert_eq!(total.cells[2], "106.20Rs.");
    let run = page
        .canvas
        .text_runs()
        .find(|r| r.text == "106.20Rs.")
        .unwrap();
    assert_eq!(run.top, total.band.y + 5.0);
}

#[test]
fn zero_amounts_still_render() {
    let mut record = sample_record();
    record.discount = "0".into();
    record.discount_amount = "0.00".into();
    record.gst_amount = "0.00".into();
    record.total_amount = "100.00".into();
    let page = composer().compose(&record).unwrap();
    let rows = &page.layout.summary.rows;
    assert_eq!(rows.len(), 4);
    assert_eq!(rows[1].cells[2], "0.00Rs.");
    assert_eq!(rows[2].cells[2], "0.00Rs.");
}

#[test]
fn summary_follows_the_item_table() {
    let layout = InvoiceConfig::default().layout;
    for n in [1, 4] {
        let page = composer().compose(&record_with_items(n)).unwrap();
        let summary = &page.layout.summary;
        assert_eq!(summary.top, page.layout.items.bottom() + layout.summary_gap);
        assert_eq!(summary.bottom(), summary.top + 5.0 * layout.row_height);
    }
}

// -------------------------------------------------------
// Header and party block
// -------------------------------------------------------

#[test]
fn header_height_ignores_contact_line_count() {
    let mut config = InvoiceConfig::default();
    config.theme.contact_lines = vec![];
    let none = DocumentComposer::new(config.clone(), Arc::new(MemoryAssets::new()));
    config.theme.contact_lines = (0..6)
        .map(|i| ContactLine::new(&format!("left {}", i), &format!("right {}", i)))
        .collect();
    let many = DocumentComposer::new(config, Arc::new(MemoryAssets::new()));

    let a = none.compose(&sample_record()).unwrap().layout;
    let b = many.compose(&sample_record()).unwrap().layout;
    assert_eq!(a.header.rule_y, b.header.rule_y);
    assert_eq!(a.party.top, b.party.top);
    assert_eq!(b.header.contact_lines, 2);
    assert_eq!(a.party.top, a.header.rule_y + 15.0);
}

#[test]
fn invoice_number_is_printed() {
    let page = composer().compose(&sample_record()).unwrap();
    assert!(page
        .canvas
        .text_runs()
        .any(|r| r.text == "Invoice No: XYZ/1042/25-26"));
    assert!(page.canvas.text_runs().any(|r| r.text == "Email: asha@example.com"));
}

#[test]
fn addresses_wrap_inside_their_columns() {
    let mut record = sample_record();
    record.bill_to = Some(
        "Unit 4, Block C, Shree Ganesh Industrial Estate, Near Railway Crossing, \
         Bhosari MIDC, Pune, Maharashtra 411026, India. Attn: Stores Department, \
         Receiving Bay 3, Gate 2, open 9am to 6pm Monday to Saturday"
            .into(),
    );
    record.ship_to = Some("Warehouse 9, Chakan".into());
    let page = composer().compose(&record).unwrap();
    let party = &page.layout.party;

    assert_eq!(party.address_lines[0].len(), 3);
    assert!(party.address_lines[0][2].ends_with("..."));
    assert_eq!(party.address_lines[1], vec!["Warehouse 9, Chakan"]);

    for (column, lines) in party.address_columns.iter().zip(&party.address_lines) {
        for line in lines {
            let run = page.canvas.text_runs().find(|r| &r.text == line).unwrap();
            assert!(run.x >= column.0);
            assert!(run.x + run.width <= column.0 + column.1);
        }
    }
    assert!(party.address_columns[0].0 + party.address_columns[0].1 < party.address_columns[1].0);
}

#[test]
fn stages_run_top_to_bottom() {
    let layout = composer().compose(&record_with_items(4)).unwrap().layout;
    assert!(layout.header.title_top < layout.header.rule_y);
    assert!(layout.header.rule_y < layout.party.top);
    assert!(layout.party.bottom < layout.items.top);
    assert!(layout.items.bottom() < layout.summary.top);
    assert!(layout.summary.bottom() <= layout.end);
}

// -------------------------------------------------------
// Bank box and footer
// -------------------------------------------------------

#[test]
fn footer_anchors_on_the_last_summary_row() {
    let layout = composer().compose(&record_with_items(3)).unwrap().layout;
    let last_row = layout.summary.rows[3].band;
    assert_eq!(layout.footer.thank_you_top, last_row.y + 45.0);

    let bank = layout.footer.bank_box.unwrap();
    assert_eq!(bank.y, layout.summary.bottom() + 10.0);
    assert_eq!((bank.width, bank.height), (250.0, 60.0));
    // The two sides end at different heights.
    assert_ne!(bank.bottom(), layout.footer.bottom);
}

#[test]
fn signature_falls_back_to_builtin_font() {
    let page = composer().compose(&sample_record()).unwrap();
    let footer = &page.layout.footer;
    assert!(footer.signature_top.is_some());
    assert!(!footer.signature_embedded);
    let run = page
        .canvas
        .text_runs()
        .find(|r| r.text == "XYZ Company" && r.style.size == 24.0)
        .unwrap();
    assert_eq!(
        run.style.font,
        FontRef::Builtin(Theme::branded().signature_fallback_font)
    );
}

#[test]
fn plain_theme_has_credit_line_and_no_decorations() {
    let composer = DocumentComposer::new(InvoiceConfig::plain(), Arc::new(branded_assets()));
    let page = composer.compose(&sample_record()).unwrap();
    let layout = &page.layout;
    assert!(layout.background.image.is_none());
    assert!(layout.header.logo.is_none());
    assert!(layout.footer.bank_box.is_none());
    assert!(layout.footer.signature_top.is_none());
    assert_eq!(
        layout.footer.credit_top,
        Some(layout.footer.thank_you_top + 15.0)
    );
    let palette = Palette::default();
    let credit = page
        .canvas
        .text_runs()
        .find(|r| r.text == Theme::plain().credit_line)
        .unwrap();
    assert_eq!(credit.style.color, palette.faint);
}

// -------------------------------------------------------
// Assets
// -------------------------------------------------------

#[test]
fn missing_assets_degrade_to_plain_page() {
    let page = composer().compose(&sample_record()).unwrap();
    let layout = &page.layout;
    assert!(layout.background.image.is_none());
    assert!(layout.header.logo.is_none());
    assert_eq!(layout.header.title_frame, (50.0, 500.0));
    assert!(!page
        .canvas
        .primitives()
        .iter()
        .any(|p| matches!(p, Primitive::Image { .. })));
}

#[test]
fn present_assets_are_drawn_first() {
    let composer = DocumentComposer::new(InvoiceConfig::default(), Arc::new(branded_assets()));
    let page = composer.compose(&sample_record()).unwrap();
    let layout = &page.layout;
    assert_eq!(layout.background.image.map(|r| (r.width, r.height)), Some((595.0, 842.0)));
    assert!(layout.header.logo.is_some());
    // Title stays clear of the logo slot.
    assert_eq!(layout.header.title_frame, (110.0, 380.0));
    assert!(matches!(
        page.canvas.primitives().first(),
        Some(Primitive::Image { .. })
    ));
}

#[test]
fn long_title_never_reaches_the_logo() {
    let mut config = InvoiceConfig::default();
    config.theme.company_name =
        "Northern Consolidated Stationery and Office Supplies Private Limited".into();
    let composer = DocumentComposer::new(config, Arc::new(branded_assets()));
    let page = composer.compose(&sample_record()).unwrap();

    let logo = page.layout.header.logo.unwrap();
    let title = page
        .canvas
        .text_runs()
        .find(|r| r.style.size == 22.0)
        .unwrap();
    assert!(title.text.ends_with("..."), "got {:?}", title.text);
    assert!(title.x + title.width <= logo.x);
    assert!(title.x >= 50.0 + (550.0 - logo.x));
}

#[test]
fn broken_logo_is_skipped() {
    let assets = MemoryAssets::new().with("logo.png", b"\x89PNG but not really".to_vec());
    let composer = DocumentComposer::new(InvoiceConfig::default(), Arc::new(assets));
    let page = composer.compose(&sample_record()).unwrap();
    assert!(page.layout.header.logo.is_none());
}

#[test]
fn non_latin_description_is_kept_in_the_layout() {
    let mut record = sample_record();
    record.items = vec![LineItem::new("Chai ₹ special", "1", "20.00", "20.00")];
    let page = composer().compose(&record).unwrap();
    assert_eq!(page.layout.items.rows[0].cells[1], "Chai ₹ special");
}
