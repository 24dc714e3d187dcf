/// Invoice example: render one billing record to a PDF file.
///
/// Run with:
///   cargo run --example generate_invoice -p invoice-demos -- \
///       [record.json] [config.json] [asset-dir]
///
/// Without arguments a built-in record is rendered with the default
/// branded theme and no assets. Set `RUST_LOG=debug` to see which
/// decorations were skipped.
///
/// Opens output at: demos/output/<invoice file name>.pdf
use std::sync::Arc;

use invoice_pdf::{
    AssetSource, BillingRecord, DirectoryAssets, DocumentComposer, InvoiceConfig, MemoryAssets,
};

const SAMPLE_RECORD: &str = r#"{
    "name": "Meera Kulkarni",
    "address": "Flat 4B, Lotus Residency, Baner Road, Pune 411045",
    "date": "2025-06-14",
    "receiptNo": "207",
    "recipientEmail": "meera.k@example.com",
    "contact": "+91 98220 12345",
    "subtotal": "2450.00",
    "discount": "5",
    "gstPercentage": "18",
    "discountAmount": "122.50",
    "gstAmount": "418.95",
    "totalAmount": "2746.45",
    "items": [
        { "description": "A4 copier paper (500 sheets)", "quantity": "5", "price": "290.00", "total": "1450.00" },
        { "description": "Whiteboard markers, assorted", "quantity": 4, "price": "125.00", "total": "500.00" },
        { "description": "Desk organiser", "quantity": 2, "price": 250, "total": "500.00" }
    ]
}"#;

/// Keep only characters that are safe in a file name on every platform.
fn file_safe(name: &str) -> String {
    name.chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '.' || c == '-' { c } else { '_' })
        .collect()
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let mut args = std::env::args().skip(1);

    let record_json = match args.next() {
        Some(path) => std::fs::read_to_string(path)?,
        None => SAMPLE_RECORD.to_string(),
    };
    let record = BillingRecord::from_json(&record_json)?;

    let config = match args.next() {
        Some(path) => InvoiceConfig::from_json_file(path)?,
        None => InvoiceConfig::default(),
    };
    let assets: Arc<dyn AssetSource> = match args.next() {
        Some(dir) => Arc::new(DirectoryAssets::new(dir)),
        None => Arc::new(MemoryAssets::new()),
    };
    log::info!("using {}", assets.describe());

    let composer = DocumentComposer::new(config, assets);
    let invoice = composer.render_invoice(&record)?;

    std::fs::create_dir_all("demos/output")?;
    let path = format!("demos/output/{}", file_safe(&invoice.file_name));
    std::fs::write(&path, &invoice.bytes)?;
    println!(
        "Written {} ({} bytes, {}) to {}",
        invoice.file_name,
        invoice.bytes.len(),
        invoice.media_type,
        path
    );
    Ok(())
}
