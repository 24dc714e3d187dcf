use std::collections::{BTreeMap, BTreeSet};

use crate::objects::PdfObject;

/// A TrueType accent font (title or signature face) parsed from an
/// asset and embedded into the document as a CID-keyed Type0 font.
#[derive(Debug, Clone)]
pub struct EmbeddedFont {
    pub(crate) postscript_name: String,
    pub(crate) data: Vec<u8>,
    pub(crate) units_per_em: u16,
    pub(crate) ascent: i16,
    pub(crate) descent: i16,
    pub(crate) bbox: [i16; 4],
    pub(crate) cap_height: i16,
    pub(crate) italic_angle: f64,
    pub(crate) flags: u32,
    pub(crate) stem_v: i16,
    /// Unicode codepoint -> glyph ID.
    cmap: BTreeMap<u32, u16>,
    /// Glyph ID -> advance width in font units.
    advances: BTreeMap<u16, u16>,
    /// Glyph ID -> first codepoint mapping to it (for ToUnicode).
    glyph_to_unicode: BTreeMap<u16, u32>,
    /// Glyphs referenced by encoded text; drives /W and ToUnicode.
    used_glyphs: BTreeSet<u16>,
}

impl EmbeddedFont {
    /// Parse a font from raw `.ttf` bytes.
    pub fn from_bytes(data: Vec<u8>) -> Result<Self, String> {
        let face = ttf_parser::Face::parse(&data, 0)
            .map_err(|e| format!("failed to parse TrueType font: {}", e))?;

        let units_per_em = face.units_per_em();
        if units_per_em == 0 {
            return Err("font reports zero units per em".to_string());
        }
        let ascent = face.ascender();
        let bbox = face.global_bounding_box();
        let family = name_entry(&face, ttf_parser::name_id::FAMILY);
        let postscript_name = name_entry(&face, ttf_parser::name_id::POST_SCRIPT_NAME)
            .or_else(|| family.map(|f| f.replace(' ', "")))
            .unwrap_or_else(|| "AccentFont".to_string());

        let mut cmap = BTreeMap::new();
        let mut glyph_to_unicode = BTreeMap::new();
        let subtables = face
            .tables()
            .cmap
            .ok_or_else(|| "font has no cmap table".to_string())?;
        for subtable in subtables.subtables {
            if !subtable.is_unicode() {
                continue;
            }
            subtable.codepoints(|cp| {
                if let Some(gid) = subtable.glyph_index(cp) {
                    cmap.insert(cp, gid.0);
                    glyph_to_unicode.entry(gid.0).or_insert(cp);
                }
            });
        }

        let advances = (0..face.number_of_glyphs())
            .map(|gid| {
                let width = face
                    .glyph_hor_advance(ttf_parser::GlyphId(gid))
                    .unwrap_or(0);
                (gid, width)
            })
            .collect();
        let descent = face.descender();
        let cap_height = face.capital_height().unwrap_or(ascent);
        let italic_angle = face.italic_angle() as f64;
        let flags = descriptor_flags(&face);
        let stem_v = estimate_stem_v(&face);

        Ok(EmbeddedFont {
            postscript_name: sanitize_name(&postscript_name),
            data,
            units_per_em,
            ascent,
            descent,
            bbox: [bbox.x_min, bbox.y_min, bbox.x_max, bbox.y_max],
            cap_height,
            italic_angle,
            flags,
            stem_v,
            cmap,
            advances,
            glyph_to_unicode,
            used_glyphs: BTreeSet::new(),
        })
    }

    pub fn postscript_name(&self) -> &str {
        &self.postscript_name
    }

    fn glyph_for(&self, ch: char) -> u16 {
        self.cmap.get(&(ch as u32)).copied().unwrap_or(0)
    }

    /// Advance of a glyph in 1/1000 em.
    fn glyph_width(&self, gid: u16) -> u32 {
        let raw = self
            .advances
            .get(&gid)
            .or_else(|| self.advances.get(&0))
            .copied()
            .unwrap_or(0);
        raw as u32 * 1000 / self.units_per_em as u32
    }

    /// Width of `text` in points.
    pub fn measure_text(&self, text: &str, font_size: f64) -> f64 {
        let total: u32 = text.chars().map(|ch| self.glyph_width(self.glyph_for(ch))).sum();
        total as f64 * font_size / 1000.0
    }

    /// Line height from the font's ascent and descent.
    pub fn line_height(&self, font_size: f64) -> f64 {
        (self.ascent as f64 - self.descent as f64) / self.units_per_em as f64 * font_size
    }

    /// Distance from the top of the line box to the baseline.
    pub fn ascent_at(&self, font_size: f64) -> f64 {
        self.ascent as f64 / self.units_per_em as f64 * font_size
    }

    /// Encode text as a hex string of 2-byte glyph IDs, recording the
    /// glyphs as used.
    pub fn encode_hex(&mut self, text: &str) -> String {
        let mut hex = String::with_capacity(text.len() * 4 + 2);
        hex.push('<');
        for ch in text.chars() {
            let gid = self.glyph_for(ch);
            self.used_glyphs.insert(gid);
            hex.push_str(&format!("{:04X}", gid));
        }
        hex.push('>');
        hex
    }

    /// `/W` array for the used glyphs: runs of consecutive glyph IDs
    /// share one `start [w1 w2 ...]` entry.
    pub fn w_array(&self) -> Vec<PdfObject> {
        let glyphs: Vec<u16> = self.used_glyphs.iter().copied().collect();
        let mut out = Vec::new();
        let mut i = 0;
        while i < glyphs.len() {
            let start = glyphs[i];
            let mut widths = Vec::new();
            let mut j = i;
            while j < glyphs.len() && glyphs[j] as usize == start as usize + (j - i) {
                widths.push(PdfObject::Integer(self.glyph_width(glyphs[j]) as i64));
                j += 1;
            }
            out.push(PdfObject::Integer(start as i64));
            out.push(PdfObject::Array(widths));
            i = j;
        }
        out
    }

    /// ToUnicode CMap so text in the accent font stays extractable.
    pub fn to_unicode_cmap(&self) -> Vec<u8> {
        let mut cmap = String::from(
            "/CIDInit /ProcSet findresource begin\n\
             12 dict begin\n\
             begincmap\n\
             /CIDSystemInfo << /Registry (Adobe) /Ordering (UCS) /Supplement 0 >> def\n\
             /CMapName /Adobe-Identity-UCS def\n\
             /CMapType 2 def\n\
             1 begincodespacerange\n<0000> <FFFF>\nendcodespacerange\n",
        );
        let pairs: Vec<(u16, u32)> = self
            .used_glyphs
            .iter()
            .filter_map(|gid| self.glyph_to_unicode.get(gid).map(|&cp| (*gid, cp)))
            .collect();
        // At most 100 entries per bfchar block.
        for chunk in pairs.chunks(100) {
            cmap.push_str(&format!("{} beginbfchar\n", chunk.len()));
            for &(gid, cp) in chunk {
                cmap.push_str(&format!("<{:04X}> <{}>\n", gid, utf16_hex(cp)));
            }
            cmap.push_str("endbfchar\n");
        }
        cmap.push_str("endcmap\nCMapName currentdict /CMap defineresource pop\nend\nend\n");
        cmap.into_bytes()
    }

    /// Width of the missing glyph, used as the font's default width.
    pub(crate) fn missing_width(&self) -> i64 {
        self.glyph_width(0) as i64
    }

    /// Scale a font-unit value to 1/1000 em.
    pub(crate) fn scaled(&self, value: i16) -> i64 {
        value as i64 * 1000 / self.units_per_em as i64
    }
}

fn utf16_hex(cp: u32) -> String {
    char::from_u32(cp)
        .map(|c| {
            let mut units = [0u16; 2];
            c.encode_utf16(&mut units)
                .iter()
                .map(|u| format!("{:04X}", u))
                .collect()
        })
        .unwrap_or_else(|| "FFFD".to_string())
}

fn name_entry(face: &ttf_parser::Face, id: u16) -> Option<String> {
    face.names()
        .into_iter()
        .find(|name| name.name_id == id && name.is_unicode())
        .and_then(|name| name.to_string())
}

/// PDF names may not contain whitespace or delimiters.
fn sanitize_name(name: &str) -> String {
    name.chars()
        .filter(|c| c.is_ascii_graphic() && !"()<>[]{}/%#".contains(*c))
        .collect()
}

/// FontDescriptor flags: FixedPitch (1), Nonsymbolic (32), Italic (64).
fn descriptor_flags(face: &ttf_parser::Face) -> u32 {
    let mut flags = 32;
    if face.is_monospaced() {
        flags |= 1;
    }
    if face.is_italic() {
        flags |= 64;
    }
    flags
}

/// StemV approximated from the weight class.
fn estimate_stem_v(face: &ttf_parser::Face) -> i16 {
    let w = face.weight().to_number() as f64 / 1000.0;
    (10.0 + 220.0 * w * w) as i16
}
