use crate::canvas::Canvas;
use crate::graphics::Rect;

use super::{LayoutCursor, Stage};

/// What the background stage drew.
#[derive(Debug, Clone, PartialEq)]
pub struct BackgroundLayout {
    /// Full-bleed slot of the background image, when it was drawn.
    pub image: Option<Rect>,
}

/// Paint the background art across the whole page. The cursor is left
/// at the top margin, where the header reserves the title slot.
pub(super) fn draw(
    stage: &Stage<'_>,
    canvas: &mut Canvas,
    cursor: LayoutCursor,
) -> (LayoutCursor, BackgroundLayout) {
    let mut drawn = None;
    if stage.theme.show_background {
        let slot = Rect::new(0.0, 0.0, stage.layout.page_width, stage.layout.page_height);
        if let Some(id) = stage.image(canvas, "background", &stage.theme.background_asset) {
            canvas.image(id, slot, stage.theme.background_fit);
            drawn = Some(slot);
        }
    }
    log::debug!(
        "background stage: image {}; cursor at {:.1}",
        if drawn.is_some() { "drawn" } else { "skipped" },
        cursor.y()
    );
    (cursor, BackgroundLayout { image: drawn })
}
