pub mod assets;
pub mod canvas;
pub mod composer;
pub mod config;
pub mod error;
pub mod fonts;
pub mod graphics;
pub mod handoff;
pub mod images;
pub mod objects;
pub mod record;
pub mod text;
pub mod truetype;
pub mod writer;

pub use assets::{AssetData, AssetSource, DirectoryAssets, MemoryAssets};
pub use canvas::{Canvas, Primitive, TextRun};
pub use composer::{
    BackgroundLayout, ComposedPage, DocumentComposer, FooterLayout, HeaderLayout, LayoutCursor,
    PageLayout, PartyLayout, RenderedInvoice, RowLayout, SummaryRow, TableLayout, MEDIA_TYPE,
};
pub use config::{
    ContactLine, InvoiceConfig, LayoutConfig, Palette, Theme, ITEM_COLUMNS, SUMMARY_COLUMNS,
};
pub use error::{AssetError, ConfigError, DocumentError, InputError, RenderError};
pub use fonts::{BuiltinFont, EmbeddedFontId, FontMetrics, FontRef};
pub use graphics::{Color, Paint, Point, Rect, Stroke};
pub use handoff::{render_async, render_with_deadline};
pub use images::{ImageData, ImageFit, ImageId};
pub use record::{BillingRecord, LineItem};
pub use text::{Align, TextStyle};
pub use truetype::EmbeddedFont;
