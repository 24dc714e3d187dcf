//! Layout geometry, theme and top-level configuration.
//!
//! Every offset the composer uses lives in [`LayoutConfig`]; every string,
//! color, font and decorative toggle lives in [`Theme`]. Both deserialize
//! from partial JSON: absent keys keep their defaults.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::fonts::BuiltinFont;
use crate::graphics::{Color, Rect};
use crate::images::ImageFit;

/// Columns of the item table: S.No, Description, Quantity, Price/Unit, Total.
pub const ITEM_COLUMNS: usize = 5;
/// Columns of the summary table: label, percentage, amount.
pub const SUMMARY_COLUMNS: usize = 3;

/// Geometric constants, in layout units (1/72 inch), top-left origin.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LayoutConfig {
    pub page_width: f64,
    pub page_height: f64,
    pub margin: f64,
    /// Width of the rule and tables, starting at the left margin.
    pub content_width: f64,

    // Header
    /// Height reserved for title and contact block, measured from the top margin.
    pub header_height: f64,
    pub title_size: f64,
    pub logo_slot: Rect,
    /// Top of the first contact line, below the header top.
    pub contact_offset: f64,
    pub contact_size: f64,
    pub contact_line_height: f64,
    /// Contact lines beyond this are dropped.
    pub max_contact_lines: usize,
    pub rule_width: f64,
    /// Space between the header rule and the party block.
    pub rule_gap: f64,

    // Party block
    pub party_size: f64,
    pub party_line_height: f64,
    /// x of the right-hand value on each party line.
    pub party_right_x: f64,
    pub party_column_width: f64,
    pub address_gap: f64,
    pub address_label_size: f64,
    pub address_label_height: f64,
    pub address_size: f64,
    pub address_line_height: f64,
    pub address_column_width: f64,
    pub address_column_gap: f64,
    pub max_address_lines: usize,
    pub party_gap: f64,

    // Tables
    pub row_height: f64,
    pub cell_inset: f64,
    pub cell_size: f64,
    pub table_header_size: f64,
    pub border_width: f64,
    /// S.No, Description, Quantity, Price/Unit, Total.
    pub item_columns: Vec<f64>,
    pub summary_gap: f64,
    /// Label, percentage, amount.
    pub summary_columns: Vec<f64>,

    // Bank box and footer
    pub bank_gap: f64,
    pub bank_box_width: f64,
    pub bank_box_height: f64,
    pub bank_inset: f64,
    pub bank_size: f64,
    pub bank_line_height: f64,
    /// Offset of the footer from the top of the summary's last row.
    pub footer_offset: f64,
    pub footer_size: f64,
    pub footer_width: f64,
    pub credit_gap: f64,
    pub signature_gap: f64,
    pub signature_size: f64,
    pub caption_gap: f64,
    pub caption_size: f64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        LayoutConfig {
            page_width: 595.0,
            page_height: 842.0,
            margin: 50.0,
            content_width: 500.0,

            header_height: 70.0,
            title_size: 22.0,
            logo_slot: Rect::new(490.0, 15.0, 55.0, 55.0),
            contact_offset: 30.0,
            contact_size: 9.0,
            contact_line_height: 12.0,
            max_contact_lines: 2,
            rule_width: 2.0,
            rule_gap: 15.0,

            party_size: 11.0,
            party_line_height: 15.0,
            party_right_x: 300.0,
            party_column_width: 240.0,
            address_gap: 10.0,
            address_label_size: 11.0,
            address_label_height: 15.0,
            address_size: 10.0,
            address_line_height: 13.0,
            address_column_width: 240.0,
            address_column_gap: 20.0,
            max_address_lines: 3,
            party_gap: 15.0,

            row_height: 25.0,
            cell_inset: 5.0,
            cell_size: 10.0,
            table_header_size: 12.0,
            border_width: 1.0,
            item_columns: vec![30.0, 140.0, 80.0, 100.0, 150.0],
            summary_gap: 20.0,
            summary_columns: vec![200.0, 150.0, 150.0],

            bank_gap: 10.0,
            bank_box_width: 250.0,
            bank_box_height: 60.0,
            bank_inset: 8.0,
            bank_size: 10.0,
            bank_line_height: 16.0,
            footer_offset: 45.0,
            footer_size: 10.0,
            footer_width: 240.0,
            credit_gap: 15.0,
            signature_gap: 20.0,
            signature_size: 24.0,
            caption_gap: 32.0,
            caption_size: 9.0,
        }
    }
}

impl LayoutConfig {
    pub fn content_left(&self) -> f64 {
        self.margin
    }

    pub fn content_right(&self) -> f64 {
        self.margin + self.content_width
    }

    /// Lowest y content may reach before running into the bottom margin.
    pub fn content_bottom(&self) -> f64 {
        self.page_height - self.margin
    }

    /// Reject geometry the tables cannot be drawn with: every table needs
    /// one positive width per column it prints, and rows need height.
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_columns("itemColumns", &self.item_columns, ITEM_COLUMNS)?;
        check_columns("summaryColumns", &self.summary_columns, SUMMARY_COLUMNS)?;
        if !(self.row_height.is_finite() && self.row_height > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "rowHeight must be positive, got {}",
                self.row_height
            )));
        }
        Ok(())
    }
}

fn check_columns(key: &str, widths: &[f64], expected: usize) -> Result<(), ConfigError> {
    if widths.len() != expected {
        return Err(ConfigError::Invalid(format!(
            "{} needs {} widths, got {}",
            key,
            expected,
            widths.len()
        )));
    }
    if let Some(bad) = widths.iter().find(|w| !(w.is_finite() && **w > 0.0)) {
        return Err(ConfigError::Invalid(format!(
            "{} widths must be positive, got {}",
            key, bad
        )));
    }
    Ok(())
}

/// One line of the legal/contact block: a left-aligned and a
/// right-aligned value sharing a baseline.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ContactLine {
    pub left: String,
    pub right: String,
}

impl ContactLine {
    pub fn new(left: &str, right: &str) -> Self {
        ContactLine {
            left: left.to_string(),
            right: right.to_string(),
        }
    }
}

/// Colors used across the page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Palette {
    pub accent: Color,
    pub table_header: Color,
    pub border: Color,
    pub text: Color,
    pub row_fill: Color,
    pub alt_row_fill: Color,
    pub summary_fill: Color,
    pub total_fill: Color,
    pub muted: Color,
    pub faint: Color,
}

impl Default for Palette {
    fn default() -> Self {
        let hex = |h: &str| Color::from_hex(h).unwrap_or(Color::BLACK);
        Palette {
            accent: hex("#3498db"),
            table_header: hex("#2980b9"),
            border: hex("#2980b9"),
            text: Color::BLACK,
            row_fill: hex("#f1f1f1"),
            alt_row_fill: Color::WHITE,
            summary_fill: Color::WHITE,
            total_fill: hex("#4dff4d"),
            muted: hex("#7f8c8d"),
            faint: hex("#bdc3c7"),
        }
    }
}

/// Company identity, wording, fonts, assets and decorative toggles.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Theme {
    pub company_name: String,
    pub invoice_prefix: String,
    /// Financial year printed in the invoice number, e.g. "25-26".
    pub invoice_period: String,
    pub currency_suffix: String,
    pub contact_lines: Vec<ContactLine>,
    pub bank_details: Vec<String>,
    pub thank_you: String,
    pub credit_line: String,
    pub signature_text: String,
    pub signature_caption: String,

    pub palette: Palette,
    pub title_font: BuiltinFont,
    pub body_font: BuiltinFont,
    pub bold_font: BuiltinFont,
    /// Used for the signature when the signature font asset is unavailable.
    pub signature_fallback_font: BuiltinFont,

    pub background_asset: String,
    pub background_fit: ImageFit,
    pub logo_asset: String,
    pub title_font_asset: String,
    pub signature_font_asset: String,

    pub show_background: bool,
    pub show_logo: bool,
    pub show_bank_box: bool,
    pub show_signature: bool,
    pub show_credit_line: bool,
}

impl Default for Theme {
    fn default() -> Self {
        Theme::branded()
    }
}

impl Theme {
    /// Background art, logo, bank box and signature.
    pub fn branded() -> Self {
        Theme {
            company_name: "XYZ Company".to_string(),
            invoice_prefix: "XYZ".to_string(),
            invoice_period: "25-26".to_string(),
            currency_suffix: "Rs.".to_string(),
            contact_lines: vec![
                ContactLine::new("GSTIN: 27ABCDE1234F1Z5", "Phone: +91 98765 43210"),
                ContactLine::new(
                    "Plot 12, Industrial Area, Pune 411001",
                    "Email: billing@xyz.example",
                ),
            ],
            bank_details: vec![
                "Bank: State Bank of India".to_string(),
                "A/C No: 123456789012".to_string(),
                "IFSC: SBIN0001234".to_string(),
            ],
            thank_you: "Thank you for using our service!".to_string(),
            credit_line: "Generated by XYZ Company billing".to_string(),
            signature_text: "XYZ Company".to_string(),
            signature_caption: "Authorised Signatory".to_string(),

            palette: Palette::default(),
            title_font: BuiltinFont::HelveticaBold,
            body_font: BuiltinFont::Helvetica,
            bold_font: BuiltinFont::HelveticaBold,
            signature_fallback_font: BuiltinFont::TimesItalic,

            background_asset: "background.png".to_string(),
            background_fit: ImageFit::Stretch,
            logo_asset: "logo.png".to_string(),
            title_font_asset: "title.ttf".to_string(),
            signature_font_asset: "signature.ttf".to_string(),

            show_background: true,
            show_logo: true,
            show_bank_box: true,
            show_signature: true,
            show_credit_line: false,
        }
    }

    /// No decorative assets: gray thank-you line plus a lighter credit line.
    pub fn plain() -> Self {
        Theme {
            title_font_asset: String::new(),
            show_background: false,
            show_logo: false,
            show_bank_box: false,
            show_signature: false,
            show_credit_line: true,
            ..Theme::branded()
        }
    }
}

/// Everything a [`DocumentComposer`](crate::DocumentComposer) needs
/// besides its assets.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct InvoiceConfig {
    pub theme: Theme,
    pub layout: LayoutConfig,
    /// Deflate the content, image and font streams.
    pub compress: bool,
}

impl InvoiceConfig {
    /// Parse a (partial) JSON config and check its table geometry.
    pub fn from_json_str(json: &str) -> Result<InvoiceConfig, ConfigError> {
        let config: InvoiceConfig = serde_json::from_str(json)?;
        config.layout.validate()?;
        Ok(config)
    }

    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<InvoiceConfig, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    pub fn plain() -> Self {
        InvoiceConfig {
            theme: Theme::plain(),
            ..Default::default()
        }
    }
}
