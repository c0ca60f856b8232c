//! Root layout: configuration header, view tabs, main content, status bar.

use ratatui::layout::{Constraint, Layout, Rect};

/// Height of the configuration header (border + model + two prompt lines).
pub const HEADER_HEIGHT: u16 = 5;
/// Drop the header below this terminal height so the content stays usable.
pub const HIDE_HEADER_THRESHOLD: u16 = 16;

/// Computed layout regions for a single frame.
pub struct AppLayout {
    /// Configuration header (None on short terminals).
    pub header: Option<Rect>,
    /// View tab strip.
    pub tabs: Rect,
    /// Main content area.
    pub main: Rect,
    /// Status bar (bottom row).
    pub status: Rect,
}

impl AppLayout {
    pub fn compute(area: Rect) -> Self {
        let header_height = if area.height < HIDE_HEADER_THRESHOLD {
            0
        } else {
            HEADER_HEIGHT
        };

        let rows = Layout::vertical([
            Constraint::Length(header_height),
            Constraint::Length(1), // Tabs
            Constraint::Min(1),    // Content
            Constraint::Length(1), // Status bar
        ])
        .split(area);

        AppLayout {
            header: (header_height > 0).then_some(rows[0]),
            tabs: rows[1],
            main: rows[2],
            status: rows[3],
        }
    }
}
