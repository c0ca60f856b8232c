//! Questions view: follow-up Q&A about the current analysis.

use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use super::InputResult;
use crate::core::session::{QAEntry, SessionState};
use crate::tui::events::{Action, Notification, NotificationLevel};
use crate::tui::theme;
use crate::tui::widgets::input_buffer::InputBuffer;
use crate::tui::widgets::markdown::markdown_to_lines;
use crate::tui::widgets::scroll_pane::ScrollPane;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuestionInputMode {
    Normal,
    Insert,
}

pub struct QuestionsState {
    input: InputBuffer,
    input_mode: QuestionInputMode,
    scroll: ScrollPane,
}

impl Default for QuestionsState {
    fn default() -> Self {
        Self::new()
    }
}

/// History lines, numbered from 1 in ask order.
fn history_lines(entries: &[QAEntry]) -> Vec<Line<'static>> {
    let mut lines = Vec::new();
    for (i, entry) in entries.iter().enumerate() {
        let n = i + 1;
        lines.push(Line::from(vec![
            Span::styled(
                format!("Pergunta {n}: "),
                Style::default()
                    .fg(theme::QUESTION)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw(entry.question.clone()),
        ]));
        lines.push(Line::styled(
            format!("Resposta {n}:"),
            Style::default()
                .fg(theme::PRIMARY_LIGHT)
                .add_modifier(Modifier::BOLD),
        ));
        lines.extend(markdown_to_lines(&entry.answer));
        lines.push(Line::raw(""));
    }
    lines
}

impl QuestionsState {
    pub fn new() -> Self {
        Self {
            input: InputBuffer::new(),
            input_mode: QuestionInputMode::Normal,
            scroll: ScrollPane::following(),
        }
    }

    pub fn input_mode(&self) -> QuestionInputMode {
        self.input_mode
    }

    /// Keep the newest answer in view.
    pub fn on_answer(&mut self) {
        self.scroll.to_bottom();
    }

    pub fn reset(&mut self) {
        *self = Self::new();
    }

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

        match self.input_mode {
            QuestionInputMode::Insert => self.handle_insert_input(key, *code, *modifiers),
            QuestionInputMode::Normal => self.handle_normal_input(*code, *modifiers, session),
        }
    }

    fn handle_insert_input(
        &mut self,
        key: &KeyEvent,
        code: KeyCode,
        modifiers: KeyModifiers,
    ) -> InputResult {
        match (modifiers, code) {
            (KeyModifiers::CONTROL, KeyCode::Char('c')) => InputResult::Ignored,
            (_, KeyCode::Tab) | (_, KeyCode::BackTab) => InputResult::Ignored,
            (KeyModifiers::NONE, KeyCode::Esc) => {
                self.input_mode = QuestionInputMode::Normal;
                InputResult::Consumed
            }
            (KeyModifiers::NONE, KeyCode::Enter) => {
                if self.input.text().trim().is_empty() {
                    return InputResult::Consumed;
                }
                let question = self.input.take();
                self.input_mode = QuestionInputMode::Normal;
                InputResult::Action(Action::Ask(question))
            }
            (KeyModifiers::CONTROL, KeyCode::Char('u')) => {
                self.input.clear();
                InputResult::Consumed
            }
            _ => {
                self.input.handle_key(key, false);
                InputResult::Consumed
            }
        }
    }

    fn handle_normal_input(
        &mut self,
        code: KeyCode,
        modifiers: KeyModifiers,
        session: &SessionState,
    ) -> InputResult {
        if modifiers != KeyModifiers::NONE && modifiers != KeyModifiers::SHIFT {
            return InputResult::Ignored;
        }

        match code {
            KeyCode::Char('i') | KeyCode::Enter => {
                if session.has_analysis() {
                    self.input_mode = QuestionInputMode::Insert;
                    InputResult::Consumed
                } else {
                    InputResult::Notify(Notification::new(
                        "Analyze a document before asking questions",
                        NotificationLevel::Warning,
                    ))
                }
            }
            KeyCode::Char('j') | KeyCode::Down => {
                self.scroll.scroll_down(1);
                InputResult::Consumed
            }
            KeyCode::Char('k') | KeyCode::Up => {
                self.scroll.scroll_up(1);
                InputResult::Consumed
            }
            KeyCode::Char('G') | KeyCode::End => {
                self.scroll.to_bottom();
                InputResult::Consumed
            }
            KeyCode::Char('g') | KeyCode::Home => {
                self.scroll.to_top();
                InputResult::Consumed
            }
            _ => InputResult::Ignored,
        }
    }

    // ── Rendering ────────────────────────────────────────────────────

    pub fn render(&self, frame: &mut Frame, area: Rect, session: &SessionState, busy: bool) {
        let chunks = Layout::vertical([
            Constraint::Min(1),    // History
            Constraint::Length(1), // Mode indicator
            Constraint::Length(3), // Input
        ])
        .split(area);

        self.render_history(frame, chunks[0], session);
        self.render_mode_line(frame, chunks[1], busy);
        self.render_input(frame, chunks[2], session);
    }

    fn render_history(&self, frame: &mut Frame, area: Rect, session: &SessionState) {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme::TEXT_MUTED))
            .title(" Perguntas sobre a análise ");

        let lines = if !session.has_analysis() {
            vec![
                Line::raw(""),
                Line::styled("  No analysis yet.", theme::muted()),
                Line::styled(
                    "  Run one from the Analysis view, then come back to ask about it.",
                    theme::muted(),
                ),
            ]
        } else if session.qa_log().is_empty() {
            vec![
                Line::raw(""),
                Line::styled("  Press i to ask about the analysis.", theme::muted()),
            ]
        } else {
            history_lines(session.qa_log())
        };

        self.scroll.render(frame, area, block, lines);
    }

    fn render_mode_line(&self, frame: &mut Frame, area: Rect, busy: bool) {
        let mut spans = vec![match self.input_mode {
            QuestionInputMode::Insert => Span::styled(" -- INSERT -- ", theme::insert_badge()),
            QuestionInputMode::Normal => Span::styled(
                " -- NORMAL -- ",
                Style::default().fg(theme::BG_BASE).bg(theme::TEXT_MUTED),
            ),
        }];
        if busy {
            spans.push(Span::raw(" "));
            spans.push(Span::styled(
                "waiting for answer...",
                Style::default().fg(theme::PRIMARY_LIGHT),
            ));
        }
        frame.render_widget(Paragraph::new(Line::from(spans)), area);
    }

    fn render_input(&self, frame: &mut Frame, area: Rect, session: &SessionState) {
        let insert = self.input_mode == QuestionInputMode::Insert;
        let block = if insert {
            theme::block_focused("Faça uma pergunta sobre a análise")
        } else {
            theme::block_default("Faça uma pergunta sobre a análise")
        };

        let lines = if !session.has_analysis() {
            vec![Line::styled("(disabled until an analysis exists)", theme::dim())]
        } else if self.input.text().is_empty() && !insert {
            vec![Line::styled("i to type, Enter to ask", theme::dim())]
        } else {
            self.input.to_lines(Style::default().fg(theme::TEXT), insert)
        };
        frame.render_widget(Paragraph::new(lines).block(block), area);
    }
}
