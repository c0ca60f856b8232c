//! Configuration view: show the active model and prompts, edit them.
//!
//! Edits go into a draft; nothing reaches the session until Ctrl+S.

use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use super::InputResult;
use crate::core::llm::{select_model_index, LLMError};
use crate::core::session::{Configuration, SessionState};
use crate::tui::events::Action;
use crate::tui::theme;
use crate::tui::widgets::input_buffer::InputBuffer;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DraftField {
    Model,
    SystemPrompt,
    UserPrompt,
}

impl DraftField {
    fn next(self) -> Self {
        match self {
            DraftField::Model => DraftField::SystemPrompt,
            DraftField::SystemPrompt => DraftField::UserPrompt,
            DraftField::UserPrompt => DraftField::Model,
        }
    }

    fn prev(self) -> Self {
        match self {
            DraftField::Model => DraftField::UserPrompt,
            DraftField::SystemPrompt => DraftField::Model,
            DraftField::UserPrompt => DraftField::SystemPrompt,
        }
    }
}

/// Pending edits while the session is in edit mode.
#[derive(Debug, Clone)]
pub struct ConfigDraft {
    pub models: Vec<String>,
    pub selected: usize,
    pub models_loading: bool,
    pub system_prompt: InputBuffer,
    pub user_prompt: InputBuffer,
    pub field: DraftField,
}

impl ConfigDraft {
    pub fn from_configuration(config: &Configuration) -> Self {
        Self {
            models: vec![config.model.clone()],
            selected: 0,
            models_loading: true,
            system_prompt: InputBuffer::with_text(&config.system_prompt),
            user_prompt: InputBuffer::with_text(&config.user_prompt),
            field: DraftField::Model,
        }
    }

    pub fn selected_model(&self) -> Option<&str> {
        self.models.get(self.selected).map(String::as_str)
    }

    fn save_action(&self) -> Option<Action> {
        Some(Action::SaveConfiguration {
            model: self.selected_model()?.to_string(),
            system_prompt: self.system_prompt.text().to_string(),
            user_prompt: self.user_prompt.text().to_string(),
        })
    }
}

#[derive(Default)]
pub struct ConfigurationState {
    draft: Option<ConfigDraft>,
}

impl ConfigurationState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn draft(&self) -> Option<&ConfigDraft> {
        self.draft.as_ref()
    }

    /// Open the editor pre-filled from `config`; the model list shows only
    /// the current model until the listing arrives.
    pub fn begin_edit(&mut self, config: &Configuration) {
        self.draft = Some(ConfigDraft::from_configuration(config));
    }

    pub fn end_edit(&mut self) {
        self.draft = None;
    }

    /// Apply a model listing. Failures and empty lists keep the current model
    /// selectable; returns a warning to show in that case.
    pub fn on_models_loaded(
        &mut self,
        result: Result<Vec<String>, LLMError>,
        current: &str,
    ) -> Option<String> {
        let draft = self.draft.as_mut()?;
        draft.models_loading = false;

        let (models, warning) = match result {
            Ok(models) if !models.is_empty() => (models, None),
            Ok(_) => (
                vec![current.to_string()],
                Some("No models available; keeping the current model".to_string()),
            ),
            Err(e) => (
                vec![current.to_string()],
                Some(format!("Could not list models ({}): {e}", e.kind())),
            ),
        };

        draft.selected = select_model_index(&models, current);
        draft.models = models;
        warning
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

        let Some(draft) = self.draft.as_mut().filter(|_| session.is_editing()) else {
            return match (*modifiers, *code) {
                (KeyModifiers::NONE, KeyCode::Char('e')) => {
                    InputResult::Action(Action::ToggleEditMode)
                }
                _ => InputResult::Ignored,
            };
        };

        match (*modifiers, *code) {
            (KeyModifiers::CONTROL, KeyCode::Char('s')) => match draft.save_action() {
                Some(action) => InputResult::Action(action),
                None => InputResult::Consumed,
            },
            (KeyModifiers::CONTROL, KeyCode::Char('c')) => InputResult::Ignored,
            (_, KeyCode::Esc) => InputResult::Action(Action::ToggleEditMode),
            (_, KeyCode::Tab) => {
                draft.field = draft.field.next();
                InputResult::Consumed
            }
            (_, KeyCode::BackTab) => {
                draft.field = draft.field.prev();
                InputResult::Consumed
            }
            _ => match draft.field {
                DraftField::Model => match code {
                    KeyCode::Char('e') => InputResult::Action(Action::ToggleEditMode),
                    KeyCode::Char('j') | KeyCode::Down => {
                        if draft.selected + 1 < draft.models.len() {
                            draft.selected += 1;
                        }
                        InputResult::Consumed
                    }
                    KeyCode::Char('k') | KeyCode::Up => {
                        draft.selected = draft.selected.saturating_sub(1);
                        InputResult::Consumed
                    }
                    _ => InputResult::Consumed,
                },
                DraftField::SystemPrompt => {
                    draft.system_prompt.handle_key(key, true);
                    InputResult::Consumed
                }
                DraftField::UserPrompt => {
                    draft.user_prompt.handle_key(key, true);
                    InputResult::Consumed
                }
            },
        }
    }

    // ── Rendering ────────────────────────────────────────────────────

    pub fn render(&self, frame: &mut Frame, area: Rect, session: &SessionState) {
        match (&self.draft, session.is_editing()) {
            (Some(draft), true) => self.render_editor(frame, area, draft),
            _ => self.render_summary(frame, area, session.configuration()),
        }
    }

    fn render_summary(&self, frame: &mut Frame, area: Rect, config: &Configuration) {
        let block = theme::block_default("Configuração atual");
        let label = theme::heading();
        let mut lines = vec![
            Line::from(vec![
                Span::styled("Modelo: ", label),
                Span::raw(config.model.clone()),
            ]),
            Line::raw(""),
            Line::styled("Prompt do sistema:", label),
        ];
        lines.extend(config.system_prompt.lines().map(|l| Line::raw(l.to_string())));
        lines.push(Line::raw(""));
        lines.push(Line::styled("Prompt do usuário:", label));
        lines.extend(config.user_prompt.lines().map(|l| Line::raw(l.to_string())));
        lines.push(Line::raw(""));
        lines.push(Line::from(vec![
            Span::styled("e", theme::highlight()),
            Span::styled(" edit configuration", theme::muted()),
        ]));

        frame.render_widget(
            Paragraph::new(lines).block(block).wrap(Wrap { trim: false }),
            area,
        );
    }

    fn render_editor(&self, frame: &mut Frame, area: Rect, draft: &ConfigDraft) {
        let chunks = Layout::vertical([
            Constraint::Length(1),      // Edit badge + hints
            Constraint::Percentage(30), // Models
            Constraint::Min(3),         // System prompt
            Constraint::Min(3),         // User prompt
        ])
        .split(area);

        let hints = Line::from(vec![
            Span::styled(" EDIT ", theme::edit_badge()),
            Span::raw(" "),
            Span::styled("Tab", theme::key_hint()),
            Span::raw(":field "),
            Span::styled("Alt+Enter", theme::key_hint()),
            Span::raw(":newline "),
            Span::styled("Ctrl+S", theme::key_hint()),
            Span::raw(":save "),
            Span::styled("Esc", theme::key_hint()),
            Span::raw(":discard"),
        ]);
        frame.render_widget(Paragraph::new(hints), chunks[0]);

        self.render_models(frame, chunks[1], draft);
        render_prompt_field(
            frame,
            chunks[2],
            "Prompt do sistema",
            &draft.system_prompt,
            draft.field == DraftField::SystemPrompt,
        );
        render_prompt_field(
            frame,
            chunks[3],
            "Prompt do usuário",
            &draft.user_prompt,
            draft.field == DraftField::UserPrompt,
        );
    }

    fn render_models(&self, frame: &mut Frame, area: Rect, draft: &ConfigDraft) {
        let focused = draft.field == DraftField::Model;
        let title = if draft.models_loading {
            " Modelo (loading…) "
        } else {
            " Modelo (j/k) "
        };
        let block = Block::default()
            .borders(Borders::ALL)
            .title(title)
            .border_style(if focused {
                theme::border_focused()
            } else {
                theme::border_default()
            });

        let inner_height = block.inner(area).height as usize;
        // Keep the selection visible
        let first = draft
            .selected
            .saturating_sub(inner_height.saturating_sub(1));

        let lines: Vec<Line> = draft
            .models
            .iter()
            .enumerate()
            .skip(first)
            .take(inner_height)
            .map(|(i, model)| {
                if i == draft.selected {
                    Line::from(vec![
                        Span::styled("▸ ", theme::highlight()),
                        Span::styled(model.clone(), theme::highlight()),
                    ])
                } else {
                    Line::from(vec![
                        Span::raw("  "),
                        Span::styled(model.clone(), Style::default().fg(theme::TEXT)),
                    ])
                }
            })
            .collect();

        frame.render_widget(Paragraph::new(lines).block(block), area);
    }
}

fn render_prompt_field(frame: &mut Frame, area: Rect, title: &str, buffer: &InputBuffer, focused: bool) {
    let block = if focused {
        theme::block_focused(title)
    } else {
        theme::block_default(title)
    };
    let style = if focused {
        Style::default().fg(theme::TEXT)
    } else {
        Style::default().fg(theme::TEXT_MUTED).add_modifier(Modifier::DIM)
    };
    frame.render_widget(
        Paragraph::new(buffer.to_lines(style, focused))
            .block(block)
            .wrap(Wrap { trim: false }),
        area,
    );
}
