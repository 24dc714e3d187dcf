mod common;

use std::sync::Arc;

use common::{contains, png_bytes, sample_record};
use invoice_pdf::assets::load_image;
use invoice_pdf::{
    AssetError, AssetSource, DirectoryAssets, DocumentComposer, InvoiceConfig, Primitive,
};

#[test]
fn directory_assets_read_files_under_the_root() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("logo.png"), png_bytes(8, 8, true)).unwrap();

    let assets = DirectoryAssets::new(dir.path());
    let image = load_image(&assets, "logo.png").unwrap();
    assert_eq!((image.width, image.height), (8, 8));
    assert!(image.alpha.is_some());
}

#[test]
fn missing_file_is_not_found() {
    let dir = tempfile::tempdir().unwrap();
    let assets = DirectoryAssets::new(dir.path());
    assert!(matches!(
        assets.load("background.png"),
        Err(AssetError::NotFound(_))
    ));
}

#[test]
fn names_cannot_escape_the_root() {
    let dir = tempfile::tempdir().unwrap();
    let inner = dir.path().join("assets");
    std::fs::create_dir(&inner).unwrap();
    std::fs::write(dir.path().join("secret.png"), png_bytes(2, 2, false)).unwrap();

    let assets = DirectoryAssets::new(&inner);
    assert!(assets.load("../secret.png").is_err());
    assert!(assets.load("").is_err());
}

#[test]
fn garbage_bytes_are_invalid() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("logo.png"), b"not an image").unwrap();
    let assets = DirectoryAssets::new(dir.path());
    assert!(matches!(
        load_image(&assets, "logo.png"),
        Err(AssetError::Invalid { .. })
    ));
}

#[test]
fn composer_draws_background_from_a_directory() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("background.png"), png_bytes(60, 80, false)).unwrap();

    let composer = DocumentComposer::new(
        InvoiceConfig::default(),
        Arc::new(DirectoryAssets::new(dir.path())),
    );
    let page = composer.compose(&sample_record()).unwrap();
    let background = page.layout.background.image.unwrap();
    assert_eq!((background.width, background.height), (595.0, 842.0));
    assert!(matches!(
        page.canvas.primitives().first(),
        Some(Primitive::Image { .. })
    ));
    // Logo was not provided, so the title keeps the full content width.
    assert!(page.layout.header.logo.is_none());
    assert_eq!(page.layout.header.title_frame, (50.0, 500.0));

    let pdf = composer.render(&sample_record()).unwrap();
    assert!(contains(&pdf, b"/Im1 Do"));
}
