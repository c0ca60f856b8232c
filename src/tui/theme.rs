//! Colors and styles for the Analysis, Questions and Configuration views.
//!
//! Views and the status bar take every color from here.

use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, Borders};

// ── Primary palette ─────────────────────────────────────────────────────────

/// Border of the pane being edited and the config field labels.
pub const PRIMARY: Color = Color::Rgb(0x00, 0x80, 0x80);
/// In-flight requests, the focused tab name and answer labels in the Q&A history.
pub const PRIMARY_LIGHT: Color = Color::Rgb(0x00, 0x96, 0x88);

// ── Accent ──────────────────────────────────────────────────────────────────

/// App title, analysis headings and the help overlay border.
pub const ACCENT: Color = Color::Rgb(0xFF, 0x7F, 0x50);

// ── Backgrounds ─────────────────────────────────────────────────────────────

/// Text drawn on top of the mode badges.
pub const BG_BASE: Color = Color::Rgb(0x0A, 0x19, 0x19);
/// Behind inline code and code blocks in the rendered analysis.
pub const BG_SURFACE: Color = Color::Rgb(0x12, 0x26, 0x26);

// ── Text ────────────────────────────────────────────────────────────────────

/// Analysis body and the editable prompts.
pub const TEXT: Color = Color::Rgb(0xE0, 0xE0, 0xE0);
/// Idle status, read-only prompts and blockquotes.
pub const TEXT_MUTED: Color = Color::Rgb(0x80, 0x80, 0x80);
/// Placeholders, list bullets and key names in hints.
pub const TEXT_DIM: Color = Color::Rgb(0x50, 0x50, 0x50);

// ── Semantic ────────────────────────────────────────────────────────────────

/// Failed extraction or completion call.
pub const ERROR: Color = Color::Rgb(0xEF, 0x53, 0x50);
/// Finished analysis, saved download, loaded document.
pub const SUCCESS: Color = Color::Rgb(0x66, 0xBB, 0x6A);
/// Recoverable problems such as a fallback model list. Also the edit badge.
pub const WARNING: Color = Color::Rgb(0xFF, 0xA7, 0x26);
/// Session reset notices and links in the analysis.
pub const INFO: Color = Color::Rgb(0x42, 0xA5, 0xF5);

// ── Domain ──────────────────────────────────────────────────────────────────

/// Questions in the Q&A history.
pub const QUESTION: Color = Color::Rgb(0xCE, 0x93, 0xD8);

// ── Style helpers ───────────────────────────────────────────────────────────

/// Header title and help overlay keys.
pub fn title() -> Style {
    Style::default().fg(ACCENT).add_modifier(Modifier::BOLD)
}

/// Field labels in the configuration summary and header.
pub fn heading() -> Style {
    Style::default().fg(PRIMARY).add_modifier(Modifier::BOLD)
}

/// Border of a pane that owns the keyboard.
pub fn border_focused() -> Style {
    Style::default().fg(PRIMARY)
}

/// Border of every other pane.
pub fn border_default() -> Style {
    Style::default().fg(TEXT_DIM)
}

/// Selected model and the active tab.
pub fn highlight() -> Style {
    Style::default().fg(ACCENT).add_modifier(Modifier::BOLD)
}

/// Secondary lines such as page counts and usage hints.
pub fn muted() -> Style {
    Style::default().fg(TEXT_MUTED)
}

/// Empty-state placeholders.
pub fn dim() -> Style {
    Style::default().fg(TEXT_DIM)
}

/// Key names in footers, e.g. `Ctrl+S`.
pub fn key_hint() -> Style {
    Style::default().fg(TEXT_DIM)
}

/// `GASTOS` badge at the left of the status bar.
pub fn brand_badge() -> Style {
    Style::default()
        .fg(BG_BASE)
        .bg(ACCENT)
        .add_modifier(Modifier::BOLD)
}

/// Shown while the question box is taking text.
pub fn insert_badge() -> Style {
    Style::default()
        .fg(BG_BASE)
        .bg(PRIMARY_LIGHT)
        .add_modifier(Modifier::BOLD)
}

/// Shown while the configuration is in edit mode.
pub fn edit_badge() -> Style {
    Style::default()
        .fg(BG_BASE)
        .bg(WARNING)
        .add_modifier(Modifier::BOLD)
}

// ── Block builders ──────────────────────────────────────────────────────────

/// Titled block for the pane being edited.
pub fn block_focused(title: &str) -> Block<'_> {
    Block::default()
        .title(format!(" {title} "))
        .borders(Borders::ALL)
        .border_style(border_focused())
}

/// Titled block for a read-only pane.
pub fn block_default(title: &str) -> Block<'_> {
    Block::default()
        .title(format!(" {title} "))
        .borders(Borders::ALL)
        .border_style(border_default())
}
