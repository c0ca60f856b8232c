//! Analysis view: pick a statement, run the analysis, read the result.

use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use super::InputResult;
use crate::core::llm::TokenUsage;
use crate::core::pipeline::AnalysisOutcome;
use crate::core::session::SessionState;
use crate::tui::events::{Action, Notification, NotificationLevel};
use crate::tui::theme;
use crate::tui::widgets::input_buffer::InputBuffer;
use crate::tui::widgets::markdown::{markdown_to_lines, plain_lines};
use crate::tui::widgets::scroll_pane::ScrollPane;

/// Document that produced the current analysis.
#[derive(Debug, Clone)]
struct LoadedDocument {
    path: String,
    page_count: usize,
    extracted_text: String,
    usage: Option<TokenUsage>,
}

pub struct AnalysisState {
    path: InputBuffer,
    editing_path: bool,
    document: Option<LoadedDocument>,
    show_extracted: bool,
    analysis_scroll: ScrollPane,
    extracted_scroll: ScrollPane,
}

impl AnalysisState {
    pub fn new(initial_path: Option<String>) -> Self {
        Self {
            path: InputBuffer::with_text(initial_path.unwrap_or_default()),
            editing_path: false,
            document: None,
            show_extracted: false,
            analysis_scroll: ScrollPane::new(),
            extracted_scroll: ScrollPane::new(),
        }
    }

    pub fn is_editing_path(&self) -> bool {
        self.editing_path
    }

    pub fn path(&self) -> &str {
        self.path.text()
    }

    pub fn on_analysis_finished(&mut self, path: String, outcome: &AnalysisOutcome) {
        self.document = Some(LoadedDocument {
            path,
            page_count: outcome.page_count,
            extracted_text: outcome.extracted_text.clone(),
            usage: outcome.usage,
        });
        self.analysis_scroll.to_top();
        self.extracted_scroll.to_top();
    }

    /// Forget the loaded document, keeping the typed path.
    pub fn reset(&mut self) {
        self.document = None;
        self.show_extracted = false;
        self.editing_path = false;
        self.analysis_scroll = ScrollPane::new();
        self.extracted_scroll = ScrollPane::new();
    }

    fn analyze_action(&self) -> InputResult {
        let path = self.path.text().trim();
        if path.is_empty() {
            return InputResult::Notify(Notification::new(
                "Press o to enter the path of a PDF first",
                NotificationLevel::Warning,
            ));
        }
        InputResult::Action(Action::Analyze(path.to_string()))
    }

    // ── Input ────────────────────────────────────────────────────────

    pub fn handle_input(&mut self, event: &Event, session: &SessionState) -> InputResult {
        let Event::Key(key @ KeyEvent {
            code,
            modifiers,
            kind: KeyEventKind::Press,
            ..
        }) = event
        else {
            return InputResult::Ignored;
        };

        if self.editing_path {
            return match (*modifiers, *code) {
                (_, KeyCode::Esc) => {
                    self.editing_path = false;
                    InputResult::Consumed
                }
                (_, KeyCode::Enter) => {
                    self.editing_path = false;
                    self.analyze_action()
                }
                (KeyModifiers::CONTROL, KeyCode::Char('u')) => {
                    self.path.clear();
                    InputResult::Consumed
                }
                (KeyModifiers::CONTROL, _) | (_, KeyCode::Tab | KeyCode::BackTab) => {
                    InputResult::Ignored
                }
                _ => {
                    self.path.handle_key(key, false);
                    InputResult::Consumed
                }
            };
        }

        if *modifiers != KeyModifiers::NONE && *modifiers != KeyModifiers::SHIFT {
            return InputResult::Ignored;
        }

        let pane = if self.show_extracted {
            &mut self.extracted_scroll
        } else {
            &mut self.analysis_scroll
        };

        match code {
            KeyCode::Char('o') => {
                self.editing_path = true;
                InputResult::Consumed
            }
            KeyCode::Enter => self.analyze_action(),
            KeyCode::Char('s') => {
                if session.has_analysis() {
                    InputResult::Action(Action::SaveDownload)
                } else {
                    InputResult::Notify(Notification::new(
                        "Nothing to save yet",
                        NotificationLevel::Warning,
                    ))
                }
            }
            KeyCode::Char('x') => {
                self.show_extracted = !self.show_extracted;
                InputResult::Consumed
            }
            KeyCode::Char('j') | KeyCode::Down => {
                pane.scroll_down(1);
                InputResult::Consumed
            }
            KeyCode::Char('k') | KeyCode::Up => {
                pane.scroll_up(1);
                InputResult::Consumed
            }
            KeyCode::PageDown => {
                pane.scroll_down(10);
                InputResult::Consumed
            }
            KeyCode::PageUp => {
                pane.scroll_up(10);
                InputResult::Consumed
            }
            KeyCode::Char('g') | KeyCode::Home => {
                pane.to_top();
                InputResult::Consumed
            }
            KeyCode::Char('G') | KeyCode::End => {
                pane.to_bottom();
                InputResult::Consumed
            }
            _ => InputResult::Ignored,
        }
    }

    // ── Rendering ────────────────────────────────────────────────────

    pub fn render(&self, frame: &mut Frame, area: Rect, session: &SessionState, busy: bool) {
        let chunks = Layout::vertical([
            Constraint::Length(3), // Path input
            Constraint::Length(1), // Document status
            Constraint::Min(1),    // Panes
        ])
        .split(area);

        self.render_path(frame, chunks[0]);
        self.render_status(frame, chunks[1], busy);

        if self.show_extracted {
            let panes = Layout::horizontal([Constraint::Percentage(40), Constraint::Percentage(60)])
                .split(chunks[2]);
            self.render_extracted(frame, panes[0]);
            self.render_analysis(frame, panes[1], session);
        } else {
            self.render_analysis(frame, chunks[2], session);
        }
    }

    fn render_path(&self, frame: &mut Frame, area: Rect) {
        let block = if self.editing_path {
            theme::block_focused("PDF (Enter: analyze, Esc: cancel)")
        } else {
            theme::block_default("PDF (o: edit path)")
        };
        let mut lines = self.path.to_lines(Style::default().fg(theme::TEXT), self.editing_path);
        if self.path.text().is_empty() && !self.editing_path {
            lines = vec![Line::styled("no file selected", theme::dim())];
        }
        frame.render_widget(Paragraph::new(lines).block(block), area);
    }

    fn render_status(&self, frame: &mut Frame, area: Rect, busy: bool) {
        let line = if busy {
            Line::from(Span::styled(
                " Analyzing…",
                Style::default()
                    .fg(theme::PRIMARY_LIGHT)
                    .add_modifier(Modifier::BOLD),
            ))
        } else if let Some(doc) = &self.document {
            let mut spans = vec![
                Span::styled(" ✓ document loaded ", Style::default().fg(theme::SUCCESS)),
                Span::styled(
                    format!(
                        "{} · {} page(s) · {} chars",
                        doc.path,
                        doc.page_count,
                        doc.extracted_text.chars().count()
                    ),
                    theme::muted(),
                ),
            ];
            if let Some(usage) = doc.usage {
                spans.push(Span::styled(
                    format!(" · {} tokens", usage.total()),
                    theme::muted(),
                ));
            }
            Line::from(spans)
        } else {
            Line::from(Span::styled(
                " Press Enter to analyze the selected PDF",
                theme::muted(),
            ))
        };
        frame.render_widget(Paragraph::new(line), area);
    }

    fn render_extracted(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(theme::border_default())
            .title(" Texto extraído (x: hide) ");
        let lines = match &self.document {
            Some(doc) if !doc.extracted_text.is_empty() => plain_lines(&doc.extracted_text),
            Some(_) => vec![Line::styled("(no text found in document)", theme::dim())],
            None => vec![Line::styled("Nothing extracted yet", theme::dim())],
        };
        self.extracted_scroll.render(frame, area, block, lines);
    }

    fn render_analysis(&self, frame: &mut Frame, area: Rect, session: &SessionState) {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(theme::border_focused())
            .title(" Análise de gastos ");

        let lines = match session.analysis() {
            Some(text) if !text.is_empty() => markdown_to_lines(text),
            Some(_) => vec![Line::styled("The model returned an empty analysis.", theme::dim())],
            None => vec![
                Line::raw(""),
                Line::styled(
                    "  Analyze your monthly expenses",
                    Style::default()
                        .fg(theme::ACCENT)
                        .add_modifier(Modifier::BOLD),
                ),
                Line::raw(""),
                Line::styled("  o      enter the path of a PDF statement", theme::muted()),
                Line::styled("  Enter  send it for analysis", theme::muted()),
                Line::styled("  x      show the extracted text", theme::muted()),
                Line::styled("  s      save analise_gastos.txt", theme::muted()),
            ],
        };
        self.analysis_scroll.render(frame, area, block, lines);
    }
}
