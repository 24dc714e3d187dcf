//! Error taxonomy for invoice rendering.
//!
//! Only [`InputError`] and [`DocumentError`] ever reach a caller of the
//! composer (wrapped in [`RenderError`]). [`AssetError`] is absorbed by the
//! stage that tried to load the asset; the element is skipped and the
//! failure logged.

use std::time::Duration;

use thiserror::Error;

/// The billing record violates an invariant the layout relies on.
/// Raised before any canvas exists.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InputError {
    #[error("billing record has no line items")]
    EmptyItems,
    #[error("required field '{field}' is missing")]
    MissingField { field: &'static str },
    #[error("field '{field}' is not a non-negative amount with two decimals: '{value}'")]
    InvalidAmount { field: &'static str, value: String },
    #[error("field '{field}' is not a non-negative number: '{value}'")]
    InvalidNumber { field: &'static str, value: String },
    #[error("item {index}: field '{field}' is invalid: '{value}'")]
    InvalidItem {
        index: usize,
        field: &'static str,
        value: String,
    },
    #[error("billing record is not valid JSON: {0}")]
    Json(String),
}

/// A decorative asset (background, logo, accent font) could not be used.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AssetError {
    #[error("asset not found: {0}")]
    NotFound(String),
    #[error("failed to read asset '{name}': {message}")]
    Unreadable { name: String, message: String },
    #[error("asset '{name}' is not usable: {message}")]
    Invalid { name: String, message: String },
}

/// The canvas or its output stream failed while sealing the document.
#[derive(Error, Debug)]
pub enum DocumentError {
    #[error("I/O error while writing document: {0}")]
    Io(#[from] std::io::Error),
    #[error("font error: {0}")]
    Font(String),
    #[error("image error: {0}")]
    Image(String),
}

/// Everything a render call can fail with.
#[derive(Error, Debug)]
pub enum RenderError {
    #[error("invalid billing record: {0}")]
    Input(#[from] InputError),
    #[error("failed to generate document: {0}")]
    Document(#[from] DocumentError),
    #[error("render did not finish within {0:?}; output discarded")]
    DeadlineExceeded(Duration),
    #[error("render ended without signalling completion")]
    Aborted,
}

/// Loading an [`InvoiceConfig`](crate::InvoiceConfig) failed.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("I/O error reading config: {0}")]
    Io(#[from] std::io::Error),
    #[error("config is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("config is not usable: {0}")]
    Invalid(String),
}
