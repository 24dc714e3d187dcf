//! The document composer: a fixed pipeline of drawing stages run against
//! one canvas.
//!
//! Every stage receives the running [`LayoutCursor`] and returns the next
//! one together with the geometry it committed. Stages only append to the
//! canvas; none of them moves back above the cursor it was handed.

mod background;
mod footer;
mod header;
mod items;
mod party;
mod summary;
mod table;

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use std::sync::Arc;

pub use background::BackgroundLayout;
pub use footer::FooterLayout;
pub use header::HeaderLayout;
pub use party::PartyLayout;
pub use summary::SummaryRow;
pub use table::{RowLayout, TableLayout};

use crate::assets::{load_font, load_image, AssetSource, MemoryAssets};
use crate::canvas::Canvas;
use crate::config::{InvoiceConfig, LayoutConfig, Theme};
use crate::error::{DocumentError, InputError, RenderError};
use crate::fonts::{BuiltinFont, FontRef};
use crate::graphics::Color;
use crate::images::ImageId;
use crate::record::BillingRecord;
use crate::text::TextStyle;

/// Media type of every rendered document.
pub const MEDIA_TYPE: &str = "application/pdf";

/// Running vertical offset shared by the stages of one render.
///
/// The cursor only moves down: [`advance`](LayoutCursor::advance) ignores
/// negative steps and [`advance_to`](LayoutCursor::advance_to) never
/// moves above the current offset.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutCursor {
    y: f64,
}

impl LayoutCursor {
    pub fn new(y: f64) -> Self {
        LayoutCursor { y }
    }

    pub fn y(&self) -> f64 {
        self.y
    }

    pub fn advance(self, dy: f64) -> Self {
        LayoutCursor {
            y: self.y + dy.max(0.0),
        }
    }

    pub fn advance_to(self, y: f64) -> Self {
        LayoutCursor { y: self.y.max(y) }
    }
}

/// Geometry committed by each stage, in layout units.
#[derive(Debug, Clone, PartialEq)]
pub struct PageLayout {
    pub background: BackgroundLayout,
    pub header: HeaderLayout,
    pub party: PartyLayout,
    pub items: TableLayout,
    pub summary: TableLayout,
    pub footer: FooterLayout,
    /// Cursor after the last stage.
    pub end: f64,
}

/// A fully drawn, not yet sealed page.
pub struct ComposedPage {
    pub canvas: Canvas,
    pub layout: PageLayout,
}

/// Finished document plus what a mail or HTTP collaborator needs to
/// deliver it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedInvoice {
    pub bytes: Vec<u8>,
    pub file_name: String,
    pub media_type: &'static str,
}

/// Renders billing records into invoice PDFs.
///
/// A composer holds only immutable configuration and a shared asset
/// source, so one instance can serve any number of concurrent renders.
/// Each render builds its own canvas and cursor.
#[derive(Debug, Clone)]
pub struct DocumentComposer {
    config: InvoiceConfig,
    assets: Arc<dyn AssetSource>,
}

impl Default for DocumentComposer {
    fn default() -> Self {
        DocumentComposer::new(InvoiceConfig::default(), Arc::new(MemoryAssets::new()))
    }
}

impl DocumentComposer {
    pub fn new(config: InvoiceConfig, assets: Arc<dyn AssetSource>) -> Self {
        DocumentComposer { config, assets }
    }

    pub fn config(&self) -> &InvoiceConfig {
        &self.config
    }

    /// `<prefix>/<receiptNo>/<period>` for this composer's theme.
    pub fn invoice_number(&self, record: &BillingRecord) -> String {
        let theme = &self.config.theme;
        record.invoice_number(&theme.invoice_prefix, &theme.invoice_period)
    }

    /// Suggested download name, `InvoiceNO:<number>.pdf`.
    pub fn file_name(&self, record: &BillingRecord) -> String {
        format!("InvoiceNO:{}.pdf", self.invoice_number(record))
    }

    /// Validate the record and run every drawing stage. The returned
    /// canvas is complete but unsealed.
    pub fn compose(&self, record: &BillingRecord) -> Result<ComposedPage, InputError> {
        record.validate()?;

        let layout = &self.config.layout;
        let theme = &self.config.theme;
        let mut canvas = Canvas::new(layout.page_width, layout.page_height);
        canvas
            .set_compression(self.config.compress)
            .set_info("Title", &format!("Invoice {}", self.invoice_number(record)))
            .set_info("Creator", &theme.company_name);

        let stage = Stage {
            layout,
            theme,
            assets: self.assets.as_ref(),
            record,
            invoice_number: self.invoice_number(record),
        };

        let cursor = LayoutCursor::new(layout.margin);
        let (cursor, background) = background::draw(&stage, &mut canvas, cursor);
        let (cursor, header) = header::draw(&stage, &mut canvas, cursor);
        let (cursor, party) = party::draw(&stage, &mut canvas, cursor);
        let (cursor, items) = items::draw(&stage, &mut canvas, cursor);
        let (cursor, summary) = summary::draw(&stage, &mut canvas, cursor);
        let (cursor, footer) = footer::draw(&stage, &mut canvas, cursor, &summary);

        Ok(ComposedPage {
            canvas,
            layout: PageLayout {
                background,
                header,
                party,
                items,
                summary,
                footer,
                end: cursor.y(),
            },
        })
    }

    /// Render `record` to PDF bytes.
    pub fn render(&self, record: &BillingRecord) -> Result<Vec<u8>, RenderError> {
        let page = self.compose(record)?;
        let bytes = page.canvas.seal()?;
        log::info!(
            "rendered invoice {} ({} bytes)",
            self.invoice_number(record),
            bytes.len()
        );
        Ok(bytes)
    }

    /// Render `record` into `writer`, returning the writer once the
    /// document is completely written.
    pub fn render_to<W: Write>(
        &self,
        record: &BillingRecord,
        writer: W,
    ) -> Result<W, RenderError> {
        let page = self.compose(record)?;
        let writer = page.canvas.seal_into(writer)?;
        log::info!("rendered invoice {}", self.invoice_number(record));
        Ok(writer)
    }

    /// Render `record` into a file at `path`.
    ///
    /// The document is sealed in memory first; `path` is only touched once
    /// every byte exists, and a failed write removes what it left behind.
    pub fn render_to_file<P: AsRef<Path>>(
        &self,
        record: &BillingRecord,
        path: P,
    ) -> Result<(), RenderError> {
        let path = path.as_ref();
        let bytes = self.compose(record)?.canvas.seal()?;
        if let Err(e) = write_file(path, &bytes) {
            if path.is_file() {
                if let Err(cleanup) = std::fs::remove_file(path) {
                    log::warn!("could not remove partial {}: {}", path.display(), cleanup);
                }
            }
            return Err(DocumentError::from(e).into());
        }
        log::info!(
            "rendered invoice {} to {}",
            self.invoice_number(record),
            path.display()
        );
        Ok(())
    }

    /// Render `record` as a deliverable attachment.
    pub fn render_invoice(&self, record: &BillingRecord) -> Result<RenderedInvoice, RenderError> {
        Ok(RenderedInvoice {
            bytes: self.render(record)?,
            file_name: self.file_name(record),
            media_type: MEDIA_TYPE,
        })
    }
}

fn write_file(path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    writer.write_all(bytes)?;
    writer.flush()
}

/// Read-only inputs shared by the stages of one render.
pub(crate) struct Stage<'a> {
    pub layout: &'a LayoutConfig,
    pub theme: &'a Theme,
    pub assets: &'a dyn AssetSource,
    pub record: &'a BillingRecord,
    pub invoice_number: String,
}

impl Stage<'_> {
    pub fn style(&self, font: BuiltinFont, size: f64, color: Color) -> TextStyle {
        TextStyle::new(font, size, color)
    }

    pub fn body(&self, size: f64) -> TextStyle {
        TextStyle::new(self.theme.body_font, size, self.theme.palette.text)
    }

    pub fn bold(&self, size: f64) -> TextStyle {
        TextStyle::new(self.theme.bold_font, size, self.theme.palette.text)
    }

    /// Load, decode and register an image asset. Failures are logged and
    /// yield `None` so the caller can skip the element.
    pub fn image(&self, canvas: &mut Canvas, role: &str, name: &str) -> Option<ImageId> {
        if name.is_empty() {
            log::debug!("no {} asset configured", role);
            return None;
        }
        match load_image(self.assets, name) {
            Ok(image) => Some(canvas.register_image(image)),
            Err(e) => {
                log::warn!(
                    "{} unavailable from {}: {}; drawing without it",
                    role,
                    self.assets.describe(),
                    e
                );
                None
            }
        }
    }

    /// Load and register a TrueType accent font, or `None` when it
    /// cannot be used.
    pub fn font(&self, canvas: &mut Canvas, role: &str, name: &str) -> Option<FontRef> {
        if name.is_empty() {
            log::debug!("no {} asset configured", role);
            return None;
        }
        match load_font(self.assets, name) {
            Ok(font) => Some(canvas.register_font(font)),
            Err(e) => {
                log::warn!(
                    "{} unavailable from {}: {}; using builtin font",
                    role,
                    self.assets.describe(),
                    e
                );
                None
            }
        }
    }
}
