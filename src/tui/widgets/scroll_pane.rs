//! Vertically scrollable text pane with a scrollbar.

use ratatui::{
    layout::Rect,
    text::Line,
    widgets::{Block, Paragraph, Scrollbar, ScrollbarOrientation, ScrollbarState, Wrap},
    Frame,
};

/// Scroll position for a pane whose content is rebuilt every frame.
///
/// `follow` pins the view to the bottom until the user scrolls.
#[derive(Debug, Clone, Default)]
pub struct ScrollPane {
    offset: usize,
    follow: bool,
}

impl ScrollPane {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pane that starts pinned to the bottom (histories).
    pub fn following() -> Self {
        Self {
            offset: 0,
            follow: true,
        }
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn scroll_down(&mut self, n: usize) {
        self.offset = self.offset.saturating_add(n);
        self.follow = false;
    }

    pub fn scroll_up(&mut self, n: usize) {
        self.offset = self.offset.saturating_sub(n);
        self.follow = false;
    }

    pub fn to_top(&mut self) {
        self.offset = 0;
        self.follow = false;
    }

    pub fn to_bottom(&mut self) {
        self.follow = true;
    }

    /// First visible line for `total` lines in a viewport of `height`.
    pub fn effective_offset(&self, total: usize, height: usize) -> usize {
        let max_scroll = total.saturating_sub(height);
        if self.follow {
            max_scroll
        } else {
            self.offset.min(max_scroll)
        }
    }

    /// Render `lines` inside `block`. Long lines are wrapped by ratatui, so
    /// the scrollbar is approximate for very wide content.
    pub fn render(&self, frame: &mut Frame, area: Rect, block: Block<'_>, lines: Vec<Line<'static>>) {
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let height = inner.height as usize;
        let total = lines.len();
        let offset = self.effective_offset(total, height);

        let visible: Vec<Line> = lines.into_iter().skip(offset).take(height).collect();
        frame.render_widget(Paragraph::new(visible).wrap(Wrap { trim: false }), inner);

        if total > height {
            let mut state = ScrollbarState::new(total)
                .position(offset)
                .viewport_content_length(height);
            frame.render_stateful_widget(
                Scrollbar::new(ScrollbarOrientation::VerticalRight),
                area,
                &mut state,
            );
        }
    }
}
