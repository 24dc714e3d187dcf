mod common;

use common::{assert_well_formed, contains, count, png_bytes};
use invoice_pdf::images::decode_image;
use invoice_pdf::{
    Align, BuiltinFont, Canvas, Color, DocumentError, ImageFit, Point, Primitive, Rect, Stroke,
    TextStyle,
};

fn body(size: f64) -> TextStyle {
    TextStyle::new(BuiltinFont::Helvetica, size, Color::BLACK)
}

#[test]
fn empty_canvas_seals_to_a_valid_page() {
    let pdf = Canvas::new(595.0, 842.0).seal().unwrap();
    assert_well_formed(&pdf);
    assert!(contains(&pdf, b"/Font <<"));
    assert!(!contains(&pdf, b"/XObject"));
}

#[test]
fn primitives_are_recorded_in_order() {
    let mut canvas = Canvas::new(595.0, 842.0);
    canvas
        .fill_rect(Rect::new(50.0, 100.0, 500.0, 25.0), Color::gray(0.95))
        .line(
            Point::new(50.0, 100.0),
            Point::new(50.0, 125.0),
            Stroke::new(Color::BLACK, 1.0),
        )
        .text("S.No", 55.0, 105.0, body(10.0));
    let kinds: Vec<&str> = canvas
        .primitives()
        .iter()
        .map(|p| match p {
            Primitive::Rect { .. } => "rect",
            Primitive::Line { .. } => "line",
            Primitive::Text(_) => "text",
            Primitive::Polygon { .. } => "polygon",
            Primitive::Image { .. } => "image",
        })
        .collect();
    assert_eq!(kinds, vec!["rect", "line", "text"]);
}

#[test]
fn text_baseline_is_below_the_line_top() {
    let mut canvas = Canvas::new(595.0, 842.0);
    canvas.text("Hi", 100.0, 100.0, body(10.0));
    let pdf = canvas.seal().unwrap();
    // Helvetica ascent is 7.18 at 10pt: baseline at layout y 107.18.
    assert!(contains(&pdf, b"100 734.82 Td\n(Hi) Tj"));
}

#[test]
fn each_text_run_carries_its_own_style() {
    let mut canvas = Canvas::new(595.0, 842.0);
    let accent = Color::rgb(0.0, 0.5, 1.0);
    canvas
        .text("A", 10.0, 10.0, body(10.0).with_color(accent))
        .text("B", 10.0, 30.0, TextStyle::new(BuiltinFont::HelveticaBold, 12.0, Color::BLACK));
    let pdf = canvas.seal().unwrap();
    assert!(contains(&pdf, b"0 0.5 1 rg\n/F1 10 Tf"));
    assert!(contains(&pdf, b"0 0 0 rg\n/F2 12 Tf"));
    assert_eq!(count(&pdf, b"BT\n"), 2);
    assert_eq!(count(&pdf, b"q\nBT\n"), 2);
}

#[test]
fn text_in_centers_inside_its_frame() {
    let mut canvas = Canvas::new(595.0, 842.0);
    canvas.text_in("Quantity", 220.0, 0.0, 80.0, Align::Center, body(10.0));
    let run = canvas.text_runs().next().unwrap();
    let left_gap = run.x - 220.0;
    let right_gap = 300.0 - (run.x + run.width);
    assert!((left_gap - right_gap).abs() < 1e-9);
}

#[test]
fn polygon_is_closed_and_stroked() {
    let mut canvas = Canvas::new(595.0, 842.0);
    canvas.polygon(
        vec![
            Point::new(50.0, 100.0),
            Point::new(550.0, 100.0),
            Point::new(550.0, 200.0),
            Point::new(50.0, 200.0),
        ],
        Stroke::new(Color::BLACK, 1.0),
    );
    let pdf = canvas.seal().unwrap();
    assert!(contains(&pdf, b"50 742 m\n550 742 l\n550 642 l\n50 642 l\nh\nS\n"));
}

#[test]
fn fill_and_stroke_rect_uses_b_operator() {
    let mut canvas = Canvas::new(595.0, 842.0);
    canvas.fill_stroke_rect(
        Rect::new(0.0, 0.0, 10.0, 10.0),
        Color::WHITE,
        Stroke::new(Color::BLACK, 0.5),
    );
    let pdf = canvas.seal().unwrap();
    assert!(contains(&pdf, b"1 1 1 rg\n0 0 0 RG\n0.5 w\n0 832 10 10 re\nB\n"));
}

#[test]
fn png_with_alpha_gets_a_soft_mask() {
    let mut canvas = Canvas::new(595.0, 842.0);
    let image = decode_image(&png_bytes(4, 2, true)).unwrap();
    let id = canvas.register_image(image);
    canvas.image(id, Rect::new(490.0, 15.0, 55.0, 55.0), ImageFit::Fit);
    let pdf = canvas.seal().unwrap();
    assert_well_formed(&pdf);
    assert!(contains(&pdf, b"/Width 4 /Height 2 /ColorSpace /DeviceRGB"));
    assert!(contains(&pdf, b"/ColorSpace /DeviceGray"));
    assert!(contains(&pdf, b"/SMask "));
    // Fit into 55x55: 55 wide, 27.5 tall, vertically centered.
    assert!(contains(&pdf, b"55 0 0 27.5 490 785.75 cm\n/Im1 Do"));
}

#[test]
fn jpeg_is_embedded_untouched() {
    // SOI + SOF0 (2x3, 3 components) + EOI.
    let jpeg = vec![
        0xFF, 0xD8, 0xFF, 0xC0, 0x00, 0x11, 0x08, 0x00, 0x02, 0x00, 0x03, 0x03, 0x01, 0x22, 0x00,
        0x02, 0x11, 0x01, 0x03, 0x11, 0x01, 0xFF, 0xD9,
    ];
    let mut canvas = Canvas::new(595.0, 842.0);
    canvas.set_compression(true);
    let id = canvas.register_image(decode_image(&jpeg).unwrap());
    canvas.image(id, Rect::new(0.0, 0.0, 30.0, 20.0), ImageFit::Stretch);
    let pdf = canvas.seal().unwrap();
    assert!(contains(&pdf, b"/Filter /DCTDecode"));
    assert!(contains(&pdf, &jpeg));
}

#[test]
fn fill_clips_to_the_slot() {
    let mut canvas = Canvas::new(595.0, 842.0);
    let id = canvas.register_image(decode_image(&png_bytes(10, 20, false)).unwrap());
    canvas.image(id, Rect::new(0.0, 0.0, 595.0, 842.0), ImageFit::Fill);
    let pdf = canvas.seal().unwrap();
    assert!(contains(&pdf, b"0 0 595 842 re\nW\nn\n"));
}

#[test]
fn unused_images_are_not_written() {
    let mut canvas = Canvas::new(595.0, 842.0);
    canvas.register_image(decode_image(&png_bytes(2, 2, false)).unwrap());
    let pdf = canvas.seal().unwrap();
    assert!(!contains(&pdf, b"/Subtype /Image"));
}

#[test]
fn info_entries_are_written_in_order() {
    let mut canvas = Canvas::new(595.0, 842.0);
    canvas.set_info("Title", "Invoice (draft)").set_info("Creator", "XYZ");
    let pdf = canvas.seal().unwrap();
    assert!(contains(&pdf, b"<< /Title (Invoice \\(draft\\)) /Creator (XYZ) >>"));
}

#[test]
fn seal_into_reports_write_failures() {
    struct Full;
    impl std::io::Write for Full {
        fn write(&mut self, _buf: &[u8]) -> std::io::Result<usize> {
            Err(std::io::Error::new(std::io::ErrorKind::Other, "disk full"))
        }
        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }
    let canvas = Canvas::new(595.0, 842.0);
    assert!(matches!(canvas.seal_into(Full), Err(DocumentError::Io(_))));
}
