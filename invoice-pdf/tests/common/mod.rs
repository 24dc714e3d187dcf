#![allow(dead_code)]

use invoice_pdf::{BillingRecord, LineItem};

/// One item: 2 x 50.00, 10% discount, 18% GST on 90.00.
pub const SAMPLE_JSON: &str = r#"{
    "name": "Asha Traders",
    "address": "12 MG Road, Pune",
    "date": "2025-04-01",
    "receiptNo": "1042",
    "recipientEmail": "asha@example.com",
    "contact": "+91 90000 00000",
    "subtotal": "100.00",
    "discount": "10",
    "gstPercentage": "18",
    "discountAmount": "10.00",
    "gstAmount": "16.20",
    "totalAmount": "106.20",
    "items": [
        { "description": "Gel pens (box)", "quantity": "2", "price": "50.00", "total": "100.00" }
    ]
}"#;

pub fn sample_record() -> BillingRecord {
    BillingRecord::from_json(SAMPLE_JSON).unwrap()
}

/// Sample record with `count` identical items.
pub fn record_with_items(count: usize) -> BillingRecord {
    let mut record = sample_record();
    record.items = (0..count)
        .map(|i| LineItem::new(&format!("Item {}", i + 1), "1", "10.00", "10.00"))
        .collect();
    record
}

pub fn contains(haystack: &[u8], needle: &[u8]) -> bool {
    haystack.windows(needle.len()).any(|w| w == needle)
}

pub fn count(haystack: &[u8], needle: &[u8]) -> usize {
    haystack.windows(needle.len()).filter(|w| *w == needle).count()
}

/// Encode a solid-color 8-bit PNG.
pub fn png_bytes(width: u32, height: u32, alpha: bool) -> Vec<u8> {
    let mut out = Vec::new();
    {
        let mut encoder = png::Encoder::new(&mut out, width, height);
        encoder.set_color(if alpha {
            png::ColorType::Rgba
        } else {
            png::ColorType::Rgb
        });
        encoder.set_depth(png::BitDepth::Eight);
        let mut writer = encoder.write_header().unwrap();
        let channels = if alpha { 4 } else { 3 };
        let data = vec![180u8; (width * height * channels) as usize];
        writer.write_image_data(&data).unwrap();
    }
    out
}

/// Check the trailer's startxref and every in-use xref entry point at
/// the right bytes.
pub fn assert_well_formed(pdf: &[u8]) {
    assert!(pdf.starts_with(b"%PDF-1.7\n"));
    assert!(pdf.ends_with(b"%%EOF\n"));

    let tail = pdf
        .windows(b"startxref\n".len())
        .rposition(|w| w == b"startxref\n")
        .unwrap();
    // Everything from the xref table on is ASCII.
    let rest = std::str::from_utf8(&pdf[tail + "startxref\n".len()..]).unwrap();
    let xref_offset: usize = rest.split('\n').next().unwrap().parse().unwrap();
    assert!(pdf[xref_offset..].starts_with(b"xref\n"));

    let table = std::str::from_utf8(&pdf[xref_offset..]).unwrap();
    let mut lines = table.split('\n').skip(1);
    let header = lines.next().unwrap();
    let size: u32 = header.split(' ').nth(1).unwrap().parse().unwrap();
    for num in 0..size {
        let entry = lines.next().unwrap();
        assert_eq!(entry.len(), 19, "entry {} must be 20 bytes with CRLF", num);
        if entry.ends_with(" n\r") {
            let offset: usize = entry[..10].parse().unwrap();
            let expected = format!("{} 0 obj\n", num);
            assert!(
                pdf[offset..].starts_with(expected.as_bytes()),
                "xref entry for object {} is off",
                num
            );
        }
    }
}
