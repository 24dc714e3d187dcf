use crate::fonts::FontRef;
use crate::graphics::Color;

/// Marker appended to text cut short to fit its frame.
pub const ELLIPSIS: &str = "...";

/// Complete style of one text primitive. Every primitive carries
/// its own style; nothing is inherited from earlier drawing calls.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextStyle {
    pub font: FontRef,
    pub size: f64,
    pub color: Color,
}

impl TextStyle {
    pub fn new(font: impl Into<FontRef>, size: f64, color: Color) -> Self {
        TextStyle {
            font: font.into(),
            size,
            color,
        }
    }

    pub fn with_color(self, color: Color) -> Self {
        TextStyle { color, ..self }
    }
}

/// Horizontal alignment of text inside its frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Center,
    Right,
}

/// Left edge of a run of `text_width` aligned inside a frame.
pub fn aligned_x(frame_x: f64, frame_width: f64, text_width: f64, align: Align) -> f64 {
    match align {
        Align::Left => frame_x,
        Align::Center => frame_x + (frame_width - text_width) / 2.0,
        Align::Right => frame_x + frame_width - text_width,
    }
}

/// Return `text` unchanged when it fits in `max_width`, otherwise the
/// longest prefix that fits with [`ELLIPSIS`] appended.
pub fn ellipsize(text: &str, max_width: f64, width: impl Fn(&str) -> f64) -> String {
    if width(text) <= max_width {
        return text.to_string();
    }
    truncate_with_ellipsis(text, max_width, width)
}

/// Always append [`ELLIPSIS`], dropping trailing characters until the
/// result fits. Yields an empty string when not even the marker fits.
pub fn truncate_with_ellipsis(text: &str, max_width: f64, width: impl Fn(&str) -> f64) -> String {
    let budget = max_width - width(ELLIPSIS);
    if budget < 0.0 {
        return String::new();
    }
    // Builtin and embedded metrics have no kerning, so widths add up.
    let mut used = 0.0;
    let mut kept = String::new();
    let mut buf = [0u8; 4];
    for ch in text.chars() {
        let glyph: &str = ch.encode_utf8(&mut buf);
        let w = width(glyph);
        if used + w > budget {
            break;
        }
        used += w;
        kept.push(ch);
    }
    let mut out = kept.trim_end().to_string();
    out.push_str(ELLIPSIS);
    out
}

/// Word-wrap `text` into lines no wider than `max_width`. Explicit
/// newlines start a new line; words wider than the frame are broken
/// between characters.
pub fn wrap(text: &str, max_width: f64, width: impl Fn(&str) -> f64) -> Vec<String> {
    let mut lines = Vec::new();
    for para in text.split('\n') {
        wrap_paragraph(para.trim(), max_width, &width, &mut lines);
    }
    if lines.is_empty() {
        lines.push(String::new());
    }
    lines
}

fn wrap_paragraph(text: &str, max_width: f64, width: &impl Fn(&str) -> f64, out: &mut Vec<String>) {
    if text.is_empty() {
        out.push(String::new());
        return;
    }
    let space = width(" ");
    let mut line = String::new();
    let mut line_width = 0.0;

    for word in text.split_whitespace() {
        let word_width = width(word);
        let needed = if line.is_empty() {
            word_width
        } else {
            line_width + space + word_width
        };
        if needed <= max_width {
            if !line.is_empty() {
                line.push(' ');
            }
            line.push_str(word);
            line_width = needed;
            continue;
        }
        if !line.is_empty() {
            out.push(std::mem::take(&mut line));
        }
        if word_width <= max_width {
            line.push_str(word);
            line_width = word_width;
        } else {
            let mut pieces = break_word(word, max_width, width);
            // The last piece stays open so the next word can follow it.
            let last = pieces.pop().unwrap_or_default();
            out.extend(pieces);
            line_width = width(&last);
            line = last;
        }
    }
    if !line.is_empty() {
        out.push(line);
    }
}

/// Split a word into pieces that each fit `max_width`. A single
/// character wider than the frame still gets its own piece.
fn break_word(word: &str, max_width: f64, width: &impl Fn(&str) -> f64) -> Vec<String> {
    let mut pieces = Vec::new();
    let mut piece = String::new();
    let mut piece_width = 0.0;
    let mut buf = [0u8; 4];
    for ch in word.chars() {
        let glyph: &str = ch.encode_utf8(&mut buf);
        let w = width(glyph);
        if piece_width + w > max_width && !piece.is_empty() {
            pieces.push(std::mem::take(&mut piece));
            piece_width = 0.0;
        }
        piece.push(ch);
        piece_width += w;
    }
    if !piece.is_empty() {
        pieces.push(piece);
    }
    pieces
}

/// Keep at most `max_lines` lines; when lines are dropped the last
/// kept line is ellipsized to show the cut.
pub fn clamp_lines(
    mut lines: Vec<String>,
    max_lines: usize,
    max_width: f64,
    width: impl Fn(&str) -> f64,
) -> Vec<String> {
    if lines.len() <= max_lines {
        return lines;
    }
    lines.truncate(max_lines);
    if let Some(last) = lines.last_mut() {
        *last = truncate_with_ellipsis(last, max_width, width);
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fonts::{BuiltinFont, FontMetrics};

    fn helv(text: &str) -> f64 {
        FontMetrics::measure_text(text, BuiltinFont::Helvetica, 10.0)
    }

    /// Every character is 1 unit wide.
    fn mono(text: &str) -> f64 {
        text.chars().count() as f64
    }

    #[test]
    fn short_text_is_untouched() {
        assert_eq!(ellipsize("Pens", 130.0, helv), "Pens");
    }

    #[test]
    fn long_text_gets_ellipsis_and_fits() {
        let text = "Premium hand-stitched leather notebook covers with brass corners";
        let out = ellipsize(text, 130.0, helv);
        assert!(out.ends_with(ELLIPSIS));
        assert!(helv(&out) <= 130.0);
        assert!(text.starts_with(out.trim_end_matches(ELLIPSIS)));
    }

    #[test]
    fn ellipsis_alone_when_frame_is_tiny() {
        assert_eq!(truncate_with_ellipsis("abcdef", 3.0, mono), "...");
        assert_eq!(truncate_with_ellipsis("abcdef", 2.0, mono), "");
    }

    #[test]
    fn trailing_space_is_trimmed_before_ellipsis() {
        assert_eq!(ellipsize("ab cdef", 6.0, mono), "ab...");
    }

    #[test]
    fn wrap_on_word_boundaries() {
        assert_eq!(wrap("aa bb cc", 5.0, mono), vec!["aa bb", "cc"]);
    }

    #[test]
    fn wrap_breaks_long_words() {
        assert_eq!(wrap("abcdefgh ij", 3.0, mono), vec!["abc", "def", "gh", "ij"]);
    }

    #[test]
    fn wrap_keeps_explicit_newlines() {
        assert_eq!(wrap("12 Road\nPune", 20.0, mono), vec!["12 Road", "Pune"]);
    }

    #[test]
    fn wrap_empty_text_yields_one_empty_line() {
        assert_eq!(wrap("", 10.0, mono), vec![String::new()]);
    }

    #[test]
    fn clamp_marks_the_cut() {
        let lines = vec!["aaaa".to_string(), "bbbb".to_string(), "cccc".to_string()];
        let out = clamp_lines(lines, 2, 6.0, mono);
        assert_eq!(out, vec!["aaaa", "bbb..."]);
    }

    #[test]
    fn alignment() {
        assert_eq!(aligned_x(50.0, 100.0, 40.0, Align::Left), 50.0);
        assert_eq!(aligned_x(50.0, 100.0, 40.0, Align::Center), 80.0);
        assert_eq!(aligned_x(50.0, 100.0, 40.0, Align::Right), 110.0);
    }
}
