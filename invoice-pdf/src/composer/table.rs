//! Column geometry and drawing helpers shared by the item and summary
//! tables. Cell frames, divider strokes and the enclosing border all
//! derive from one list of column edges.

use crate::canvas::Canvas;
use crate::graphics::{Color, Point, Rect, Stroke};
use crate::text::{ellipsize, Align, TextStyle};

/// Geometry of one drawn table, in layout units.
#[derive(Debug, Clone, PartialEq)]
pub struct TableLayout {
    /// Top of the header band.
    pub top: f64,
    /// x of every column edge, left to right (columns + 1 entries).
    pub column_edges: Vec<f64>,
    pub header: Rect,
    pub rows: Vec<RowLayout>,
    /// Enclosing border; its bottom edge is the cursor after the last row.
    pub border: Rect,
}

impl TableLayout {
    pub fn bottom(&self) -> f64 {
        self.border.bottom()
    }
}

/// One body row: its band, background fill and the cell texts as drawn
/// (after ellipsizing).
#[derive(Debug, Clone, PartialEq)]
pub struct RowLayout {
    pub band: Rect,
    pub fill: Color,
    pub cells: Vec<String>,
}

/// Running x positions of `widths` laid side by side from `left`.
pub(crate) fn column_edges(left: f64, widths: &[f64]) -> Vec<f64> {
    let mut edges = Vec::with_capacity(widths.len() + 1);
    let mut x = left;
    edges.push(x);
    for width in widths {
        x += width;
        edges.push(x);
    }
    edges
}

/// Table geometry plus the styling every cell shares.
pub(crate) struct Grid<'a> {
    pub edges: &'a [f64],
    pub inset: f64,
    pub row_height: f64,
}

impl Grid<'_> {
    pub fn left(&self) -> f64 {
        self.edges.first().copied().unwrap_or(0.0)
    }

    pub fn width(&self) -> f64 {
        self.edges.last().copied().unwrap_or(0.0) - self.left()
    }

    pub fn band(&self, top: f64) -> Rect {
        Rect::new(self.left(), top, self.width(), self.row_height)
    }

    /// Draw one line of cell text per column, each inside its column's
    /// inset frame. Extra texts beyond the configured columns are not
    /// drawn. Returns the texts as drawn.
    pub fn cells(
        &self,
        canvas: &mut Canvas,
        band: &Rect,
        texts: &[String],
        aligns: &[Align],
        style: TextStyle,
    ) -> Vec<String> {
        let top = band.y + self.inset;
        let mut drawn = Vec::with_capacity(texts.len());
        for ((edge, text), align) in self.edges.windows(2).zip(texts).zip(aligns) {
            let x = edge[0] + self.inset;
            let width = (edge[1] - edge[0] - 2.0 * self.inset).max(0.0);
            let fitted = ellipsize(text, width, |s| canvas.measure(s, &style));
            canvas.text_in(&fitted, x, top, width, *align, style);
            drawn.push(fitted);
        }
        drawn
    }

    /// One vertical stroke at the left edge of every column.
    pub fn dividers(&self, canvas: &mut Canvas, band: &Rect, stroke: Stroke) {
        let columns = self.edges.len().saturating_sub(1);
        for &x in &self.edges[..columns] {
            canvas.line(Point::new(x, band.y), Point::new(x, band.bottom()), stroke);
        }
    }

    /// Horizontal stroke across the table at `y`.
    pub fn rule(&self, canvas: &mut Canvas, y: f64, stroke: Stroke) {
        canvas.line(
            Point::new(self.left(), y),
            Point::new(self.left() + self.width(), y),
            stroke,
        );
    }

    /// Closed outline from `top` down to `bottom`.
    pub fn border(&self, canvas: &mut Canvas, top: f64, bottom: f64, stroke: Stroke) -> Rect {
        let rect = Rect::new(self.left(), top, self.width(), bottom - top);
        canvas.polygon(
            vec![
                Point::new(rect.x, rect.y),
                Point::new(rect.right(), rect.y),
                Point::new(rect.right(), rect.bottom()),
                Point::new(rect.x, rect.bottom()),
            ],
            stroke,
        );
        rect
    }
}
