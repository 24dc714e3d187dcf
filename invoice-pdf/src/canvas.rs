use std::collections::BTreeSet;
use std::io::Write;

use crate::error::DocumentError;
use crate::fonts::{encode_win_ansi, BuiltinFont, EmbeddedFontId, FontMetrics, FontRef};
use crate::graphics::{Color, Paint, Point, Rect, Stroke};
use crate::images::{
    calculate_placement, ImageData, ImageFit, ImageFormat, ImageId, ImagePlacement,
};
use crate::objects::{ObjId, PdfObject};
use crate::text::{aligned_x, ellipsize, Align, TextStyle};
use crate::truetype::EmbeddedFont;
use crate::writer::{encode_stream, escape_literal, fmt_num, PdfWriter};

const CATALOG_OBJ: ObjId = ObjId(1, 0);
const PAGES_OBJ: ObjId = ObjId(2, 0);
const PAGE_OBJ: ObjId = ObjId(3, 0);
const CONTENT_OBJ: ObjId = ObjId(4, 0);
const FIRST_RESOURCE_OBJ_NUM: u32 = 5;

/// A run of text placed on the page. `x` is the left edge after
/// alignment, `top` the top of the line box, `width` the measured
/// advance of `text`.
#[derive(Debug, Clone, PartialEq)]
pub struct TextRun {
    pub text: String,
    pub x: f64,
    pub top: f64,
    pub width: f64,
    pub style: TextStyle,
}

/// One drawing primitive. Each carries its complete style; the canvas
/// has no current color, font or line width.
#[derive(Debug, Clone, PartialEq)]
pub enum Primitive {
    Text(TextRun),
    Line { from: Point, to: Point, stroke: Stroke },
    Rect { rect: Rect, paint: Paint },
    /// Closed outline through `points`.
    Polygon { points: Vec<Point>, stroke: Stroke },
    Image { image: ImageId, placement: ImagePlacement },
}

/// Single-page drawing surface for one render.
///
/// Coordinates are layout units with a top-left origin. Primitives are
/// only ever appended; [`Canvas::seal`] consumes the canvas and writes
/// the finished PDF, so nothing can be drawn after the document is
/// produced.
pub struct Canvas {
    width: f64,
    height: f64,
    primitives: Vec<Primitive>,
    images: Vec<ImageData>,
    fonts: Vec<EmbeddedFont>,
    info: Vec<(String, String)>,
    compress: bool,
}

impl Canvas {
    pub fn new(width: f64, height: f64) -> Self {
        Canvas {
            width,
            height,
            primitives: Vec::new(),
            images: Vec::new(),
            fonts: Vec::new(),
            info: Vec::new(),
            compress: false,
        }
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    /// Deflate content, image and font streams when sealing.
    pub fn set_compression(&mut self, compress: bool) -> &mut Self {
        self.compress = compress;
        self
    }

    /// Set a document info entry (e.g. "Title", "Creator").
    pub fn set_info(&mut self, key: &str, value: &str) -> &mut Self {
        self.info.push((key.to_string(), value.to_string()));
        self
    }

    pub fn register_image(&mut self, image: ImageData) -> ImageId {
        self.images.push(image);
        ImageId(self.images.len() - 1)
    }

    pub fn register_font(&mut self, font: EmbeddedFont) -> FontRef {
        self.fonts.push(font);
        FontRef::Embedded(EmbeddedFontId(self.fonts.len() - 1))
    }

    /// Width of `text` in layout units for `style`.
    pub fn measure(&self, text: &str, style: &TextStyle) -> f64 {
        match style.font {
            FontRef::Builtin(font) => FontMetrics::measure_text(text, font, style.size),
            FontRef::Embedded(id) => self
                .fonts
                .get(id.0)
                .map_or(0.0, |f| f.measure_text(text, style.size)),
        }
    }

    pub fn line_height(&self, style: &TextStyle) -> f64 {
        match style.font {
            FontRef::Builtin(_) => FontMetrics::line_height(style.size),
            FontRef::Embedded(id) => self
                .fonts
                .get(id.0)
                .map_or(style.size * 1.2, |f| f.line_height(style.size)),
        }
    }

    fn ascent(&self, style: &TextStyle) -> f64 {
        match style.font {
            FontRef::Builtin(font) => FontMetrics::ascent(font, style.size),
            FontRef::Embedded(id) => self
                .fonts
                .get(id.0)
                .map_or(style.size, |f| f.ascent_at(style.size)),
        }
    }

    /// Place `text` with its left edge at `x` and line top at `top`.
    pub fn text(&mut self, text: &str, x: f64, top: f64, style: TextStyle) -> &mut Self {
        let width = self.measure(text, &style);
        self.primitives.push(Primitive::Text(TextRun {
            text: text.to_string(),
            x,
            top,
            width,
            style,
        }));
        self
    }

    /// Place `text` inside the frame `[x, x + width]`, ellipsized so it
    /// never leaves the frame, then aligned within it.
    pub fn text_in(
        &mut self,
        text: &str,
        x: f64,
        top: f64,
        width: f64,
        align: Align,
        style: TextStyle,
    ) -> &mut Self {
        let fitted = ellipsize(text, width, |s| self.measure(s, &style));
        let run_width = self.measure(&fitted, &style);
        let left = aligned_x(x, width, run_width, align);
        self.text(&fitted, left, top, style)
    }

    pub fn line(&mut self, from: Point, to: Point, stroke: Stroke) -> &mut Self {
        self.primitives.push(Primitive::Line { from, to, stroke });
        self
    }

    pub fn fill_rect(&mut self, rect: Rect, color: Color) -> &mut Self {
        self.primitives.push(Primitive::Rect {
            rect,
            paint: Paint::Fill(color),
        });
        self
    }

    pub fn stroke_rect(&mut self, rect: Rect, stroke: Stroke) -> &mut Self {
        self.primitives.push(Primitive::Rect {
            rect,
            paint: Paint::Stroke(stroke),
        });
        self
    }

    pub fn fill_stroke_rect(&mut self, rect: Rect, fill: Color, stroke: Stroke) -> &mut Self {
        self.primitives.push(Primitive::Rect {
            rect,
            paint: Paint::FillStroke(fill, stroke),
        });
        self
    }

    pub fn polygon(&mut self, points: Vec<Point>, stroke: Stroke) -> &mut Self {
        self.primitives.push(Primitive::Polygon { points, stroke });
        self
    }

    /// Draw a registered image into `slot`.
    pub fn image(&mut self, image: ImageId, slot: Rect, fit: ImageFit) -> &mut Self {
        let placement = match self.images.get(image.0) {
            Some(data) => calculate_placement(data.width, data.height, &slot, fit),
            None => ImagePlacement {
                rect: slot,
                clip: None,
            },
        };
        self.primitives.push(Primitive::Image { image, placement });
        self
    }

    pub fn primitives(&self) -> &[Primitive] {
        &self.primitives
    }

    /// All text runs in drawing order.
    pub fn text_runs(&self) -> impl Iterator<Item = &TextRun> {
        self.primitives.iter().filter_map(|p| match p {
            Primitive::Text(run) => Some(run),
            _ => None,
        })
    }

    /// Finish the page and return the complete PDF.
    pub fn seal(self) -> Result<Vec<u8>, DocumentError> {
        self.seal_into(Vec::new())
    }

    /// Finish the page, writing the complete PDF to `writer`.
    /// The writer is returned only once every byte has been written.
    pub fn seal_into<W: Write>(mut self, writer: W) -> Result<W, DocumentError> {
        let mut usage = Usage::default();
        let content = self.content_stream(&mut usage)?;

        let mut next = FIRST_RESOURCE_OBJ_NUM;
        let mut alloc = || {
            let id = ObjId(next, 0);
            next += 1;
            id
        };

        let builtin_ids: Vec<(BuiltinFont, ObjId)> =
            usage.builtin.iter().map(|&f| (f, alloc())).collect();
        let image_ids: Vec<(usize, ObjId, Option<ObjId>)> = usage
            .images
            .iter()
            .map(|&i| {
                let smask = self.images[i].alpha.as_ref().map(|_| alloc());
                (i, alloc(), smask)
            })
            .collect();
        let font_ids: Vec<(usize, EmbeddedObjIds)> = usage
            .embedded
            .iter()
            .map(|&i| {
                let ids = EmbeddedObjIds {
                    type0: alloc(),
                    cid_font: alloc(),
                    descriptor: alloc(),
                    file: alloc(),
                    to_unicode: alloc(),
                };
                (i, ids)
            })
            .collect();
        let info_id = if self.info.is_empty() { None } else { Some(alloc()) };

        let mut w = PdfWriter::new(writer);
        w.write_header()?;

        w.write_object(
            CATALOG_OBJ,
            &PdfObject::dict(vec![
                ("Type", PdfObject::name("Catalog")),
                ("Pages", PdfObject::Reference(PAGES_OBJ)),
            ]),
        )?;
        w.write_object(
            PAGES_OBJ,
            &PdfObject::dict(vec![
                ("Type", PdfObject::name("Pages")),
                ("Kids", PdfObject::array(vec![PdfObject::Reference(PAGE_OBJ)])),
                ("Count", PdfObject::Integer(1)),
            ]),
        )?;

        let embedded_names: Vec<String> =
            font_ids.iter().map(|(i, _)| embedded_name(*i)).collect();
        let image_names: Vec<String> =
            image_ids.iter().map(|(i, _, _)| image_name(*i)).collect();
        let mut font_res: Vec<(&str, PdfObject)> = builtin_ids
            .iter()
            .map(|(f, id)| (f.pdf_name(), PdfObject::Reference(*id)))
            .collect();
        for ((_, ids), name) in font_ids.iter().zip(&embedded_names) {
            font_res.push((name.as_str(), PdfObject::Reference(ids.type0)));
        }
        let xobject_res: Vec<(&str, PdfObject)> = image_ids
            .iter()
            .zip(&image_names)
            .map(|((_, id, _), name)| (name.as_str(), PdfObject::Reference(*id)))
            .collect();
        let mut resources = vec![("Font", PdfObject::dict(font_res))];
        if !xobject_res.is_empty() {
            resources.push(("XObject", PdfObject::dict(xobject_res)));
        }

        w.write_object(
            PAGE_OBJ,
            &PdfObject::dict(vec![
                ("Type", PdfObject::name("Page")),
                ("Parent", PdfObject::Reference(PAGES_OBJ)),
                ("MediaBox", PdfObject::rect_array(0.0, 0.0, self.width, self.height)),
                ("Contents", PdfObject::Reference(CONTENT_OBJ)),
                ("Resources", PdfObject::dict(resources)),
            ]),
        )?;
        w.write_object(CONTENT_OBJ, &encode_stream(vec![], content, self.compress)?)?;

        for (font, id) in &builtin_ids {
            w.write_object(
                *id,
                &PdfObject::dict(vec![
                    ("Type", PdfObject::name("Font")),
                    ("Subtype", PdfObject::name("Type1")),
                    ("BaseFont", PdfObject::name(font.pdf_base_name())),
                    ("Encoding", PdfObject::name("WinAnsiEncoding")),
                ]),
            )?;
        }

        for (index, id, smask) in &image_ids {
            let image = &self.images[*index];
            if let (Some(alpha), Some(smask_id)) = (&image.alpha, smask) {
                let obj = encode_stream(
                    image_dict(image.width, image.height, "DeviceGray"),
                    alpha.clone(),
                    self.compress,
                )?;
                w.write_object(*smask_id, &obj)?;
            }
            let mut dict = image_dict(image.width, image.height, image.color_space.pdf_name());
            if let Some(smask_id) = smask {
                dict.push(("SMask", PdfObject::Reference(*smask_id)));
            }
            let obj = match image.format {
                ImageFormat::Jpeg => {
                    dict.push(("Filter", PdfObject::name("DCTDecode")));
                    PdfObject::stream(dict, image.data.clone())
                }
                ImageFormat::Png => encode_stream(dict, image.data.clone(), self.compress)?,
            };
            w.write_object(*id, &obj)?;
        }

        for (index, ids) in &font_ids {
            write_embedded_font(&mut w, &self.fonts[*index], ids, self.compress)?;
        }

        if let Some(id) = info_id {
            let entries = self
                .info
                .iter()
                .map(|(k, v)| (k.as_str(), PdfObject::literal(encode_win_ansi(v))))
                .collect();
            w.write_object(id, &PdfObject::dict(entries))?;
        }

        Ok(w.finish(CATALOG_OBJ, info_id)?)
    }

    /// Translate the primitives into content stream operators, flipping
    /// to PDF's bottom-left origin and recording the resources used.
    fn content_stream(&mut self, usage: &mut Usage) -> Result<Vec<u8>, DocumentError> {
        let mut out = Vec::new();
        let primitives = std::mem::take(&mut self.primitives);
        for primitive in &primitives {
            match primitive {
                Primitive::Text(run) => self.emit_text(run, usage, &mut out)?,
                Primitive::Line { from, to, stroke } => {
                    push_ops(
                        &mut out,
                        &format!(
                            "q\n{}{} {} m\n{} {} l\nS\nQ\n",
                            stroke_ops(stroke),
                            fmt_num(from.x),
                            fmt_num(self.flip(from.y)),
                            fmt_num(to.x),
                            fmt_num(self.flip(to.y)),
                        ),
                    );
                }
                Primitive::Rect { rect, paint } => {
                    let (setup, op) = match paint {
                        Paint::Fill(color) => (fill_ops(color), "f"),
                        Paint::Stroke(stroke) => (stroke_ops(stroke), "S"),
                        Paint::FillStroke(color, stroke) => {
                            (format!("{}{}", fill_ops(color), stroke_ops(stroke)), "B")
                        }
                    };
                    push_ops(
                        &mut out,
                        &format!("q\n{}{} re\n{}\nQ\n", setup, self.rect_operands(rect), op),
                    );
                }
                Primitive::Polygon { points, stroke } => {
                    if points.len() < 2 {
                        continue;
                    }
                    let mut ops = format!("q\n{}", stroke_ops(stroke));
                    for (i, p) in points.iter().enumerate() {
                        let op = if i == 0 { "m" } else { "l" };
                        ops.push_str(&format!(
                            "{} {} {}\n",
                            fmt_num(p.x),
                            fmt_num(self.flip(p.y)),
                            op
                        ));
                    }
                    ops.push_str("h\nS\nQ\n");
                    push_ops(&mut out, &ops);
                }
                Primitive::Image { image, placement } => {
                    if image.0 >= self.images.len() {
                        return Err(DocumentError::Image(format!(
                            "image {} was never registered",
                            image.0
                        )));
                    }
                    usage.images.insert(image.0);
                    let mut ops = String::from("q\n");
                    if let Some(clip) = &placement.clip {
                        ops.push_str(&format!("{} re\nW\nn\n", self.rect_operands(clip)));
                    }
                    let r = &placement.rect;
                    ops.push_str(&format!(
                        "{} 0 0 {} {} {} cm\n/{} Do\nQ\n",
                        fmt_num(r.width),
                        fmt_num(r.height),
                        fmt_num(r.x),
                        fmt_num(self.flip(r.bottom())),
                        image_name(image.0),
                    ));
                    push_ops(&mut out, &ops);
                }
            }
        }
        self.primitives = primitives;
        Ok(out)
    }

    fn emit_text(
        &mut self,
        run: &TextRun,
        usage: &mut Usage,
        out: &mut Vec<u8>,
    ) -> Result<(), DocumentError> {
        let style = &run.style;
        let baseline = self.flip(run.top + self.ascent(style));
        let (resource, shown) = match style.font {
            FontRef::Builtin(font) => {
                usage.builtin.insert(font);
                let mut shown = b"(".to_vec();
                shown.extend(escape_literal(&encode_win_ansi(&run.text)));
                shown.push(b')');
                (font.pdf_name().to_string(), shown)
            }
            FontRef::Embedded(id) => match self.fonts.get_mut(id.0) {
                Some(font) => {
                    usage.embedded.insert(id.0);
                    (embedded_name(id.0), font.encode_hex(&run.text).into_bytes())
                }
                None => {
                    return Err(DocumentError::Font(format!(
                        "font {} was never registered",
                        id.0
                    )))
                }
            },
        };
        push_ops(
            out,
            &format!(
                "q\nBT\n{}/{} {} Tf\n{} {} Td\n",
                fill_ops(&style.color),
                resource,
                fmt_num(style.size),
                fmt_num(run.x),
                fmt_num(baseline),
            ),
        );
        out.extend_from_slice(&shown);
        out.extend_from_slice(b" Tj\nET\nQ\n");
        Ok(())
    }

    fn flip(&self, y: f64) -> f64 {
        self.height - y
    }

    /// `x y w h` operands of a layout rect in PDF coordinates.
    fn rect_operands(&self, rect: &Rect) -> String {
        format!(
            "{} {} {} {}",
            fmt_num(rect.x),
            fmt_num(self.flip(rect.bottom())),
            fmt_num(rect.width),
            fmt_num(rect.height),
        )
    }
}

/// Resources referenced by the content stream, in deterministic order.
#[derive(Default)]
struct Usage {
    builtin: BTreeSet<BuiltinFont>,
    embedded: BTreeSet<usize>,
    images: BTreeSet<usize>,
}

struct EmbeddedObjIds {
    type0: ObjId,
    cid_font: ObjId,
    descriptor: ObjId,
    file: ObjId,
    to_unicode: ObjId,
}

fn embedded_name(index: usize) -> String {
    format!("E{}", index + 1)
}

fn image_name(index: usize) -> String {
    format!("Im{}", index + 1)
}

fn push_ops(out: &mut Vec<u8>, ops: &str) {
    out.extend_from_slice(ops.as_bytes());
}

fn fill_ops(color: &Color) -> String {
    format!("{} {} {} rg\n", fmt_num(color.r), fmt_num(color.g), fmt_num(color.b))
}

fn stroke_ops(stroke: &Stroke) -> String {
    format!(
        "{} {} {} RG\n{} w\n",
        fmt_num(stroke.color.r),
        fmt_num(stroke.color.g),
        fmt_num(stroke.color.b),
        fmt_num(stroke.width),
    )
}

fn image_dict(width: u32, height: u32, color_space: &str) -> Vec<(&'static str, PdfObject)> {
    vec![
        ("Type", PdfObject::name("XObject")),
        ("Subtype", PdfObject::name("Image")),
        ("Width", PdfObject::Integer(width as i64)),
        ("Height", PdfObject::Integer(height as i64)),
        ("ColorSpace", PdfObject::name(color_space)),
        ("BitsPerComponent", PdfObject::Integer(8)),
    ]
}

/// Write the five objects of a Type0/CIDFontType2 font.
fn write_embedded_font<W: Write>(
    w: &mut PdfWriter<W>,
    font: &EmbeddedFont,
    ids: &EmbeddedObjIds,
    compress: bool,
) -> Result<(), DocumentError> {
    let ps_name = font.postscript_name();

    w.write_object(
        ids.type0,
        &PdfObject::dict(vec![
            ("Type", PdfObject::name("Font")),
            ("Subtype", PdfObject::name("Type0")),
            ("BaseFont", PdfObject::name(ps_name)),
            ("Encoding", PdfObject::name("Identity-H")),
            ("DescendantFonts", PdfObject::array(vec![PdfObject::Reference(ids.cid_font)])),
            ("ToUnicode", PdfObject::Reference(ids.to_unicode)),
        ]),
    )?;

    w.write_object(
        ids.cid_font,
        &PdfObject::dict(vec![
            ("Type", PdfObject::name("Font")),
            ("Subtype", PdfObject::name("CIDFontType2")),
            ("BaseFont", PdfObject::name(ps_name)),
            (
                "CIDSystemInfo",
                PdfObject::dict(vec![
                    ("Registry", PdfObject::literal(b"Adobe".to_vec())),
                    ("Ordering", PdfObject::literal(b"Identity".to_vec())),
                    ("Supplement", PdfObject::Integer(0)),
                ]),
            ),
            ("FontDescriptor", PdfObject::Reference(ids.descriptor)),
            ("DW", PdfObject::Integer(font.missing_width())),
            ("W", PdfObject::array(font.w_array())),
            ("CIDToGIDMap", PdfObject::name("Identity")),
        ]),
    )?;

    let [x_min, y_min, x_max, y_max] = font.bbox;
    w.write_object(
        ids.descriptor,
        &PdfObject::dict(vec![
            ("Type", PdfObject::name("FontDescriptor")),
            ("FontName", PdfObject::name(ps_name)),
            ("Flags", PdfObject::Integer(font.flags as i64)),
            (
                "FontBBox",
                PdfObject::array(vec![
                    PdfObject::Integer(font.scaled(x_min)),
                    PdfObject::Integer(font.scaled(y_min)),
                    PdfObject::Integer(font.scaled(x_max)),
                    PdfObject::Integer(font.scaled(y_max)),
                ]),
            ),
            ("ItalicAngle", PdfObject::Real(font.italic_angle)),
            ("Ascent", PdfObject::Integer(font.scaled(font.ascent))),
            ("Descent", PdfObject::Integer(font.scaled(font.descent))),
            ("CapHeight", PdfObject::Integer(font.scaled(font.cap_height))),
            ("StemV", PdfObject::Integer(font.stem_v as i64)),
            ("FontFile2", PdfObject::Reference(ids.file)),
        ]),
    )?;

    let file = encode_stream(
        vec![("Length1", PdfObject::Integer(font.data.len() as i64))],
        font.data.clone(),
        compress,
    )?;
    w.write_object(ids.file, &file)?;
    w.write_object(ids.to_unicode, &encode_stream(vec![], font.to_unicode_cmap(), compress)?)?;
    Ok(())
}
