//! Document viewer widget — renders the visible window of a [`Document`]
//! and owns the scroll offsets the animation engine drives.
//!
//! [`ViewerState`] is the app's [`ScrollSink`]: synthesized scroll steps land
//! here and move the vertical or horizontal offset, clamped to the content.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    text::Line,
    widgets::{
        Block, Scrollbar, ScrollbarOrientation, ScrollbarState, StatefulWidget, Widget,
    },
};
use unicode_width::UnicodeWidthChar;

use crate::core::doc::Document;
use crate::core::scroll::{Orientation, ScrollSink, ScrollStep};

use super::theme::Theme;

// ───────────────────────────────────────── state ─────────────

/// Persistent viewer state (scroll offsets + last-known geometry).
///
/// Geometry is refreshed on every render, so clamping always works against
/// the current terminal size even across resizes.
#[derive(Debug, Default)]
pub struct ViewerState {
    /// First visible content row.
    pub v_offset: usize,
    /// First visible display column.
    pub h_offset: usize,
    /// Content extent: (widest line in columns, line count).
    content: (usize, usize),
    /// Viewport extent in cells: (width, height).
    viewport: (u16, u16),
}

impl ViewerState {
    /// Rows one full viewport covers (for page scrolling).
    pub fn page_rows(&self) -> usize {
        self.viewport.1.max(1) as usize
    }

    pub fn max_v_offset(&self) -> usize {
        self.content.1.saturating_sub(self.viewport.1 as usize)
    }

    pub fn max_h_offset(&self) -> usize {
        self.content.0.saturating_sub(self.viewport.0 as usize)
    }

    /// Scroll vertically by whole rows; negative moves toward the start.
    pub fn scroll_rows(&mut self, rows: i64) {
        self.v_offset = add_clamped(self.v_offset, rows, self.max_v_offset());
    }

    /// Scroll horizontally by whole columns; negative moves toward column 0.
    pub fn scroll_columns(&mut self, columns: i64) {
        self.h_offset = add_clamped(self.h_offset, columns, self.max_h_offset());
    }

    pub fn jump_top(&mut self) {
        self.v_offset = 0;
    }

    pub fn jump_bottom(&mut self) {
        self.v_offset = self.max_v_offset();
    }

    /// Scroll position as a percentage for the status bar.
    pub fn percent(&self) -> u8 {
        let max = self.max_v_offset();
        if max == 0 {
            100
        } else {
            (self.v_offset * 100 / max) as u8
        }
    }

    fn set_bounds(&mut self, doc: &Document, viewport: Rect) {
        self.content = (doc.max_width(), doc.line_count());
        self.viewport = (viewport.width, viewport.height);
        self.v_offset = self.v_offset.min(self.max_v_offset());
        self.h_offset = self.h_offset.min(self.max_h_offset());
    }
}

impl ScrollSink for ViewerState {
    /// Positive step deltas scroll toward the document start (wheel pushed
    /// away), so they subtract from the offset.
    fn apply(&mut self, step: ScrollStep) {
        match step.orientation {
            Orientation::Vertical => self.scroll_rows(-i64::from(step.delta)),
            Orientation::Horizontal => self.scroll_columns(-i64::from(step.delta)),
        }
    }
}

fn add_clamped(value: usize, delta: i64, max: usize) -> usize {
    let moved = value as i64 + delta;
    moved.clamp(0, max as i64) as usize
}

// ───────────────────────────────────────── widget ────────────

/// The viewer widget itself — created fresh each frame.
pub struct ViewerWidget<'a> {
    doc: &'a Document,
    block: Option<Block<'a>>,
}

impl<'a> ViewerWidget<'a> {
    pub fn new(doc: &'a Document) -> Self {
        Self { doc, block: None }
    }

    pub fn block(mut self, block: Block<'a>) -> Self {
        self.block = Some(block);
        self
    }
}

impl StatefulWidget for ViewerWidget<'_> {
    type State = ViewerState;

    fn render(self, area: Rect, buf: &mut Buffer, state: &mut Self::State) {
        let inner = match self.block {
            Some(b) => {
                let inner = b.inner(area);
                b.render(area, buf);
                inner
            }
            None => area,
        };
        if inner.width == 0 || inner.height == 0 {
            return;
        }

        state.set_bounds(self.doc, inner);

        for row in 0..inner.height {
            let Some(text) = self.doc.line(state.v_offset + row as usize) else {
                break;
            };
            let visible = clip_columns(text, state.h_offset, inner.width as usize);
            let line = Line::styled(visible, Theme::text_style());
            buf.set_line(inner.x, inner.y + row, &line, inner.width);
        }

        render_scrollbars(state, area, buf);
    }
}

fn render_scrollbars(state: &ViewerState, area: Rect, buf: &mut Buffer) {
    let max_v = state.max_v_offset();
    if max_v > 0 {
        let mut bar = ScrollbarState::new(max_v).position(state.v_offset);
        Scrollbar::new(ScrollbarOrientation::VerticalRight)
            .style(Theme::scrollbar_style())
            .render(area, buf, &mut bar);
    }
    let max_h = state.max_h_offset();
    if max_h > 0 {
        let mut bar = ScrollbarState::new(max_h).position(state.h_offset);
        Scrollbar::new(ScrollbarOrientation::HorizontalBottom)
            .style(Theme::scrollbar_style())
            .render(area, buf, &mut bar);
    }
}

/// Cut `text` down to the display columns `[skip, skip + width)`.
/// A double-width glyph clipped at either edge degrades to a space so the
/// remaining cells stay aligned.
fn clip_columns(text: &str, skip: usize, width: usize) -> String {
    let mut out = String::new();
    let mut column = 0;
    let mut used = 0;
    for ch in text.chars() {
        let w = ch.width().unwrap_or(0);
        if column + w <= skip {
            column += w;
            continue;
        }
        if column < skip {
            // Wide glyph straddles the left edge.
            column += w;
            out.push(' ');
            used += 1;
            continue;
        }
        if used + w > width {
            if used < width {
                out.push(' ');
            }
            break;
        }
        out.push(ch);
        column += w;
        used += w;
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sized_state(content_w: usize, content_h: usize, vw: u16, vh: u16) -> ViewerState {
        let mut state = ViewerState::default();
        state.content = (content_w, content_h);
        state.viewport = (vw, vh);
        state
    }

    fn step(delta: i32, orientation: Orientation) -> ScrollStep {
        ScrollStep {
            delta,
            orientation,
            column: 0,
            row: 0,
        }
    }

    #[test]
    fn steps_route_to_their_axis() {
        let mut state = sized_state(200, 100, 80, 24);
        state.apply(step(-5, Orientation::Vertical));
        state.apply(step(-3, Orientation::Horizontal));
        assert_eq!(state.v_offset, 5);
        assert_eq!(state.h_offset, 3);
    }

    #[test]
    fn offsets_clamp_to_content() {
        let mut state = sized_state(100, 50, 80, 24);
        state.apply(step(-1000, Orientation::Vertical));
        assert_eq!(state.v_offset, 50 - 24);
        state.apply(step(1000, Orientation::Vertical));
        assert_eq!(state.v_offset, 0);
        state.apply(step(-1000, Orientation::Horizontal));
        assert_eq!(state.h_offset, 100 - 80);
    }

    #[test]
    fn short_content_never_scrolls() {
        let mut state = sized_state(10, 5, 80, 24);
        state.apply(step(-10, Orientation::Vertical));
        assert_eq!(state.v_offset, 0);
        assert_eq!(state.percent(), 100);
    }

    #[test]
    fn clips_by_display_column() {
        assert_eq!(clip_columns("abcdef", 2, 3), "cde");
        assert_eq!(clip_columns("abc", 0, 10), "abc");
        assert_eq!(clip_columns("abc", 5, 10), "");
    }

    #[test]
    fn wide_glyphs_degrade_at_the_edges() {
        // "日" is two columns wide; clipping inside it yields a space.
        assert_eq!(clip_columns("日本", 1, 3), " 本");
        assert_eq!(clip_columns("ab日", 0, 3), "ab ");
    }
}
