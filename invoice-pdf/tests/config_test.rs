mod common;

use std::sync::Arc;

use common::{contains, sample_record};
use invoice_pdf::{ConfigError, DocumentComposer, InvoiceConfig, MemoryAssets};

#[test]
fn config_file_overrides_wording_and_geometry() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("invoice.json");
    std::fs::write(
        &path,
        r#"{
            "theme": { "companyName": "Acme Stores", "invoicePrefix": "ACM" },
            "layout": { "rowHeight": 30 }
        }"#,
    )
    .unwrap();

    let config = InvoiceConfig::from_json_file(&path).unwrap();
    let composer = DocumentComposer::new(config, Arc::new(MemoryAssets::new()));
    let page = composer.compose(&sample_record()).unwrap();
    assert_eq!(page.layout.items.rows[0].band.height, 30.0);

    let pdf = composer.render(&sample_record()).unwrap();
    assert!(contains(&pdf, b"(Acme Stores) Tj"));
    assert!(contains(&pdf, b"/Title (Invoice ACM/1042/25-26)"));
}

#[test]
fn missing_config_file_is_an_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = InvoiceConfig::from_json_file(dir.path().join("absent.json")).unwrap_err();
    assert!(matches!(err, ConfigError::Io(_)));
}

#[test]
fn short_column_lists_are_rejected() {
    for json in [
        r#"{ "layout": { "summaryColumns": [250, 250] } }"#,
        r#"{ "layout": { "itemColumns": [] } }"#,
        r#"{ "layout": { "itemColumns": [30, 140, 80, 100, 150, 10] } }"#,
    ] {
        assert!(
            matches!(InvoiceConfig::from_json_str(json), Err(ConfigError::Invalid(_))),
            "{}",
            json
        );
    }
}

#[test]
fn non_positive_column_widths_are_rejected() {
    let json = r#"{ "layout": { "itemColumns": [30, 140, 0, 100, 150] } }"#;
    let err = InvoiceConfig::from_json_str(json).unwrap_err();
    assert!(matches!(err, ConfigError::Invalid(_)));
    assert!(err.to_string().contains("itemColumns"));

    let json = r#"{ "layout": { "summaryColumns": [200, -150, 450] } }"#;
    assert!(matches!(
        InvoiceConfig::from_json_str(json),
        Err(ConfigError::Invalid(_))
    ));
}

#[test]
fn rebalanced_columns_keep_every_cell() {
    let json = r#"{ "layout": { "summaryColumns": [250, 50, 200] } }"#;
    let config = InvoiceConfig::from_json_str(json).unwrap();
    let composer = DocumentComposer::new(config, Arc::new(MemoryAssets::new()));
    let page = composer.compose(&sample_record()).unwrap();
    let grand_total = &page.layout.summary.rows[3];
    assert_eq!(grand_total.cells.len(), 3);
    assert_eq!(grand_total.cells[2], "106.20Rs.");
}
