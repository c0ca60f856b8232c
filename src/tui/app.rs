use std::io;
use std::time::Duration;

use crossterm::event::{Event, EventStream, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use futures::StreamExt;
use ratatui::{
    backend::CrosstermBackend,
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame, Terminal,
};
use tokio::sync::mpsc;

use super::events::{Action, AppEvent, Focus, Notification, NotificationLevel};
use super::layout::AppLayout;
use super::services::Services;
use super::theme;
use super::views::analysis::AnalysisState;
use super::views::configuration::ConfigurationState;
use super::views::questions::QuestionsState;
use super::views::InputResult;
use crate::core::commands;
use crate::core::pipeline::PipelineError;
use crate::core::session::SessionState;

/// The request currently in flight, if any.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Busy {
    Analysis,
    Question,
}

impl Busy {
    fn label(self) -> &'static str {
        match self {
            Busy::Analysis => "analyzing",
            Busy::Question => "answering",
        }
    }
}

/// Central application state (Elm architecture).
pub struct AppState {
    /// Whether the app is still running.
    pub running: bool,
    /// Currently focused top-level view.
    pub focus: Focus,
    /// Configuration, mode, analysis and Q&A log for this run.
    pub session: SessionState,
    /// At most one completion request at a time.
    pub busy: Option<Busy>,
    pub analysis: AnalysisState,
    pub questions: QuestionsState,
    pub configuration: ConfigurationState,
    /// Active notifications (max 3 visible).
    pub notifications: Vec<Notification>,
    /// Monotonic counter for notification IDs.
    notification_counter: u64,
    /// Whether the help modal is open.
    pub show_help: bool,
    /// Receiver for backend events.
    event_rx: mpsc::UnboundedReceiver<AppEvent>,
    /// Backend services handle.
    services: Services,
}

impl AppState {
    pub fn new(
        event_rx: mpsc::UnboundedReceiver<AppEvent>,
        services: Services,
        session: SessionState,
        initial_pdf: Option<String>,
    ) -> Self {
        Self {
            running: true,
            focus: Focus::Analysis,
            session,
            busy: None,
            analysis: AnalysisState::new(initial_pdf),
            questions: QuestionsState::new(),
            configuration: ConfigurationState::new(),
            notifications: Vec::new(),
            notification_counter: 0,
            show_help: false,
            event_rx,
            services,
        }
    }

    // ── Elm event loop ──────────────────────────────────────────────────

    /// Main event loop: render → select → update → loop.
    pub async fn run(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
        tick_rate: Duration,
    ) -> io::Result<()> {
        let mut tick_interval = tokio::time::interval(tick_rate);
        let mut event_stream = EventStream::new();

        while self.running {
            terminal.draw(|frame| self.render(frame))?;

            tokio::select! {
                _ = tick_interval.tick() => {
                    self.on_tick();
                }
                Some(event) = self.event_rx.recv() => {
                    self.handle_event(event);
                }
                Some(Ok(crossterm_event)) = event_stream.next() => {
                    self.handle_event(AppEvent::Input(crossterm_event));
                }
            }
        }

        Ok(())
    }

    // ── Event handling ──────────────────────────────────────────────────

    pub fn handle_event(&mut self, event: AppEvent) {
        match event {
            AppEvent::Input(crossterm_event) => {
                if self.show_help {
                    if let Some(action) = self.map_help_input(&crossterm_event) {
                        self.handle_action(action);
                    }
                    return;
                }

                match self.dispatch_view_input(&crossterm_event) {
                    InputResult::Consumed => {}
                    InputResult::Action(action) => self.handle_action(action),
                    InputResult::Notify(n) => self.push_notification(n.message, n.level),
                    InputResult::Ignored => {
                        if let Some(action) = self.map_input_to_action(crossterm_event) {
                            self.handle_action(action);
                        }
                    }
                }
            }
            AppEvent::Action(action) => self.handle_action(action),
            AppEvent::ModelsLoaded(result) => {
                let current = self.session.configuration().model.clone();
                if let Some(warning) = self.configuration.on_models_loaded(result, &current) {
                    tracing::warn!(%warning, "model listing downgraded");
                    self.push_notification(warning, NotificationLevel::Warning);
                }
            }
            AppEvent::AnalysisFinished { path, result } => {
                self.busy = None;
                match result {
                    Ok(outcome) => {
                        commands::apply_analysis(&mut self.session, &outcome);
                        self.analysis.on_analysis_finished(path, &outcome);
                        self.push_notification(
                            "Análise concluída".to_string(),
                            NotificationLevel::Success,
                        );
                    }
                    Err(e) => self.report_pipeline_error(&e),
                }
            }
            AppEvent::AnswerReceived(result) => {
                self.busy = None;
                match result {
                    Ok(outcome) => {
                        commands::apply_answer(&mut self.session, &outcome);
                        self.questions.on_answer();
                    }
                    Err(e) => self.report_pipeline_error(&e),
                }
            }
        }
    }

    /// Dispatch input to the currently focused view.
    fn dispatch_view_input(&mut self, event: &Event) -> InputResult {
        match self.focus {
            Focus::Analysis => self.analysis.handle_input(event, &self.session),
            Focus::Questions => self.questions.handle_input(event, &self.session),
            Focus::Configuration => self.configuration.handle_input(event, &self.session),
        }
    }

    // ── Input mapping ───────────────────────────────────────────────────

    fn map_help_input(&self, event: &Event) -> Option<Action> {
        let Event::Key(KeyEvent {
            code,
            kind: KeyEventKind::Press,
            ..
        }) = event
        else {
            return None;
        };
        match code {
            KeyCode::Esc | KeyCode::Char('?') => Some(Action::CloseHelp),
            _ => None,
        }
    }

    fn map_input_to_action(&self, event: Event) -> Option<Action> {
        let Event::Key(KeyEvent {
            code,
            modifiers,
            kind: KeyEventKind::Press,
            ..
        }) = event
        else {
            return None;
        };

        match (modifiers, code) {
            (KeyModifiers::CONTROL, KeyCode::Char('c')) => Some(Action::Quit),
            (KeyModifiers::CONTROL, KeyCode::Char('r')) => Some(Action::ResetSession),
            (KeyModifiers::NONE | KeyModifiers::SHIFT, _) => match code {
                KeyCode::Char('q') => Some(Action::Quit),
                KeyCode::Char('?') => Some(Action::ShowHelp),
                KeyCode::Tab => Some(Action::TabNext),
                KeyCode::BackTab => Some(Action::TabPrev),
                KeyCode::Char('1') => Some(Action::FocusAnalysis),
                KeyCode::Char('2') => Some(Action::FocusQuestions),
                KeyCode::Char('3') => Some(Action::FocusConfiguration),
                _ => None,
            },
            _ => None,
        }
    }

    pub fn handle_action(&mut self, action: Action) {
        match action {
            Action::Quit => self.running = false,
            Action::FocusAnalysis => self.focus = Focus::Analysis,
            Action::FocusQuestions => self.focus = Focus::Questions,
            Action::FocusConfiguration => self.focus = Focus::Configuration,
            Action::TabNext => self.focus = self.focus.next(),
            Action::TabPrev => self.focus = self.focus.prev(),
            Action::ShowHelp => self.show_help = true,
            Action::CloseHelp => self.show_help = false,
            Action::Analyze(path) => {
                if self.reject_if_busy() {
                    return;
                }
                tracing::info!(%path, "analysis requested");
                self.busy = Some(Busy::Analysis);
                self.services
                    .spawn_analysis(self.session.configuration().clone(), path);
            }
            Action::Ask(question) => {
                if self.reject_if_busy() {
                    return;
                }
                let Some(analysis) = self.session.analysis().filter(|a| !a.is_empty()) else {
                    self.report_pipeline_error(&PipelineError::NoAnalysis);
                    return;
                };
                self.busy = Some(Busy::Question);
                self.services.spawn_question(
                    self.session.configuration().clone(),
                    analysis.to_string(),
                    question,
                );
            }
            Action::ToggleEditMode => {
                commands::on_toggle_edit(&mut self.session);
                if self.session.is_editing() {
                    self.configuration.begin_edit(self.session.configuration());
                    self.services.spawn_model_listing();
                } else {
                    self.configuration.end_edit();
                }
            }
            Action::SaveConfiguration {
                model,
                system_prompt,
                user_prompt,
            } => {
                match commands::on_save_config(&mut self.session, &model, &system_prompt, &user_prompt)
                {
                    Ok(()) => {
                        self.configuration.end_edit();
                        self.push_notification(
                            "Configuração salva".to_string(),
                            NotificationLevel::Success,
                        );
                    }
                    Err(e) => self.push_notification(e.to_string(), NotificationLevel::Warning),
                }
            }
            Action::SaveDownload => match commands::on_download(&self.session) {
                Some(payload) => match payload.write_to(&self.services.export_dir) {
                    Ok(path) => self.push_notification(
                        format!("Saved {}", path.display()),
                        NotificationLevel::Success,
                    ),
                    Err(e) => {
                        tracing::error!(error = %e, "failed to write download");
                        self.push_notification(
                            format!("Could not save {}: {e}", payload.file_name),
                            NotificationLevel::Error,
                        );
                    }
                },
                None => self.push_notification(
                    "Nothing to save yet".to_string(),
                    NotificationLevel::Warning,
                ),
            },
            Action::ResetSession => {
                if self.reject_if_busy() {
                    return;
                }
                self.session.reset();
                self.analysis.reset();
                self.questions.reset();
                self.configuration.end_edit();
                self.push_notification("Session reset".to_string(), NotificationLevel::Info);
            }
        }
    }

    /// Warn and return true while a request is in flight.
    fn reject_if_busy(&mut self) -> bool {
        match self.busy {
            Some(busy) => {
                self.push_notification(
                    format!("Please wait, still {}…", busy.label()),
                    NotificationLevel::Warning,
                );
                true
            }
            None => false,
        }
    }

    fn report_pipeline_error(&mut self, error: &PipelineError) {
        tracing::warn!(error = %error, "request failed");
        let level = match error {
            PipelineError::NoAnalysis => NotificationLevel::Warning,
            _ => NotificationLevel::Error,
        };
        self.push_notification(error.to_string(), level);
    }

    // ── Notifications ───────────────────────────────────────────────────

    /// Push a notification (dedup by message, max 3).
    pub fn push_notification(&mut self, message: String, level: NotificationLevel) {
        if self.notifications.iter().any(|n| n.message == message) {
            return;
        }

        self.notification_counter += 1;
        self.notifications.push(Notification {
            id: self.notification_counter,
            message,
            level,
            ttl_ticks: 100,
        });

        while self.notifications.len() > 3 {
            self.notifications.remove(0);
        }
    }

    /// Tick: decrement notification TTLs, dismiss expired.
    fn on_tick(&mut self) {
        for n in &mut self.notifications {
            n.ttl_ticks = n.ttl_ticks.saturating_sub(1);
        }
        self.notifications.retain(|n| n.ttl_ticks > 0);
    }

    // ── Rendering ───────────────────────────────────────────────────────

    fn render(&self, frame: &mut Frame) {
        let area = frame.area();
        let layout = AppLayout::compute(area);

        if let Some(header) = layout.header {
            self.render_header(frame, header);
        }
        self.render_tabs(frame, layout.tabs);
        self.render_content(frame, layout.main);
        self.render_status_bar(frame, layout.status);

        self.render_notifications(frame, area);

        if self.show_help {
            self.render_help_modal(frame, area);
        }
    }

    fn render_header(&self, frame: &mut Frame, area: Rect) {
        let config = self.session.configuration();
        let label = theme::heading();
        let first_line = |text: &str| text.lines().next().unwrap_or("").to_string();

        let lines = vec![
            Line::from(vec![
                Span::styled("Modelo: ", label),
                Span::raw(config.model.clone()),
            ]),
            Line::from(vec![
                Span::styled("Prompt do sistema: ", label),
                Span::styled(first_line(&config.system_prompt), theme::muted()),
            ]),
            Line::from(vec![
                Span::styled("Prompt do usuário: ", label),
                Span::styled(first_line(&config.user_prompt), theme::muted()),
            ]),
        ];

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(theme::border_default())
            .title(Span::styled(" Analisador de Gastos Mensais ", theme::title()));
        frame.render_widget(Paragraph::new(lines).block(block), area);
    }

    fn render_tabs(&self, frame: &mut Frame, area: Rect) {
        let mut spans = Vec::new();
        for (i, focus) in Focus::ALL.iter().enumerate() {
            let style = if *focus == self.focus {
                theme::highlight().add_modifier(Modifier::UNDERLINED)
            } else {
                theme::muted()
            };
            spans.push(Span::styled(format!(" {} {} ", i + 1, focus.label()), style));
        }
        frame.render_widget(Paragraph::new(Line::from(spans)), area);
    }

    fn render_content(&self, frame: &mut Frame, area: Rect) {
        match self.focus {
            Focus::Analysis => {
                self.analysis
                    .render(frame, area, &self.session, self.busy == Some(Busy::Analysis))
            }
            Focus::Questions => {
                self.questions
                    .render(frame, area, &self.session, self.busy == Some(Busy::Question))
            }
            Focus::Configuration => self.configuration.render(frame, area, &self.session),
        }
    }

    fn render_status_bar(&self, frame: &mut Frame, area: Rect) {
        let llm_status = match self.busy {
            Some(busy) => Span::styled(busy.label(), Style::default().fg(theme::PRIMARY_LIGHT)),
            None => Span::styled("ready", Style::default().fg(theme::TEXT_MUTED)),
        };

        let mode_indicator = if self.session.is_editing() {
            Span::styled(" EDIT ", theme::edit_badge())
        } else {
            Span::raw("")
        };

        let status = Line::from(vec![
            Span::styled(" GASTOS ", theme::brand_badge()),
            Span::raw(" "),
            mode_indicator,
            Span::raw(" "),
            Span::styled(
                self.focus.label(),
                Style::default()
                    .fg(theme::PRIMARY_LIGHT)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw(" │ "),
            Span::styled("API:", theme::key_hint()),
            Span::raw(" "),
            llm_status,
            Span::raw(" │ "),
            Span::styled("Tab", theme::key_hint()),
            Span::raw(":nav "),
            Span::styled("?", theme::key_hint()),
            Span::raw(":help "),
            Span::styled("q", theme::key_hint()),
            Span::raw(":quit"),
        ]);

        frame.render_widget(Paragraph::new(status), area);
    }

    fn render_notifications(&self, frame: &mut Frame, area: Rect) {
        if self.notifications.is_empty() {
            return;
        }

        let max_width = 60.min(area.width.saturating_sub(2));
        let height = self.notifications.len() as u16;
        let x = area.width.saturating_sub(max_width + 1);
        let y = 1;

        let notification_area = Rect::new(x, y, max_width, height.min(area.height));

        let lines: Vec<Line> = self
            .notifications
            .iter()
            .map(|n| {
                let (prefix, color) = match n.level {
                    NotificationLevel::Info => ("ℹ", theme::INFO),
                    NotificationLevel::Success => ("✓", theme::SUCCESS),
                    NotificationLevel::Warning => ("⚠", theme::WARNING),
                    NotificationLevel::Error => ("✗", theme::ERROR),
                };
                Line::from(vec![
                    Span::styled(
                        format!(" {prefix} "),
                        Style::default().fg(color).add_modifier(Modifier::BOLD),
                    ),
                    Span::raw(n.message.clone()),
                ])
            })
            .collect();

        frame.render_widget(Clear, notification_area);
        frame.render_widget(Paragraph::new(lines), notification_area);
    }

    fn render_help_modal(&self, frame: &mut Frame, area: Rect) {
        let modal = centered_rect(60, 80, area);

        let keybindings = [
            ("Global:", ""),
            ("q / Ctrl+C", "Quit"),
            ("?", "Toggle this help"),
            ("Tab / Shift+Tab", "Next / previous view"),
            ("1-3", "Jump to view"),
            ("Ctrl+R", "Reset the session"),
            ("", ""),
            ("Analysis View:", ""),
            ("o", "Edit PDF path"),
            ("Enter", "Analyze the PDF"),
            ("x", "Show / hide extracted text"),
            ("s", "Save analise_gastos.txt"),
            ("j/k g/G", "Scroll"),
            ("", ""),
            ("Questions View:", ""),
            ("i / Enter", "Type a question"),
            ("Enter", "Ask (insert mode)"),
            ("Esc", "Leave insert mode"),
            ("", ""),
            ("Configuration View:", ""),
            ("e", "Edit / close without saving"),
            ("Tab", "Next field (edit mode)"),
            ("j/k", "Select model"),
            ("Alt+Enter", "Newline in a prompt"),
            ("Ctrl+S", "Save configuration"),
            ("Esc", "Discard edits"),
        ];

        let mut lines = vec![
            Line::raw(""),
            Line::from(Span::styled(" Keybindings", theme::title())),
            Line::raw(""),
        ];

        for (key, desc) in &keybindings {
            if key.is_empty() {
                lines.push(Line::raw(""));
            } else if desc.is_empty() {
                lines.push(Line::from(Span::styled(format!("  {key}"), theme::title())));
            } else {
                lines.push(Line::from(vec![
                    Span::raw("  "),
                    Span::styled(
                        format!("{:<22}", key),
                        Style::default()
                            .fg(theme::PRIMARY_LIGHT)
                            .add_modifier(Modifier::BOLD),
                    ),
                    Span::raw(*desc),
                ]));
            }
        }

        let block = Block::default()
            .title(" Help ")
            .title_alignment(Alignment::Center)
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme::ACCENT));

        frame.render_widget(Clear, modal);
        frame.render_widget(Paragraph::new(lines).block(block), modal);
    }
}

/// Calculate a centered rect using percentage of parent area.
pub(super) fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let popup_layout = Layout::vertical([
        Constraint::Percentage((100 - percent_y) / 2),
        Constraint::Percentage(percent_y),
        Constraint::Percentage((100 - percent_y) / 2),
    ])
    .split(area);

    Layout::horizontal([
        Constraint::Percentage((100 - percent_x) / 2),
        Constraint::Percentage(percent_x),
        Constraint::Percentage((100 - percent_x) / 2),
    ])
    .split(popup_layout[1])[1]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::llm::{ChatResponse, LLMError, MockLLMProvider};
    use crate::core::pipeline::{AnalysisOutcome, AnalysisPipeline, AnswerOutcome};
    use crate::core::session::{Configuration, QAEntry};
    use crate::ingestion::pdf_parser::MockTextExtractor;
    use std::sync::Arc;

    fn app() -> (AppState, mpsc::UnboundedReceiver<AppEvent>) {
        let mut provider = MockLLMProvider::new();
        provider
            .expect_chat()
            .returning(|_| Ok(ChatResponse::from_content("ok")));
        provider
            .expect_list_models()
            .returning(|| Ok(vec!["gpt-4o".to_string()]));
        let pipeline = AnalysisPipeline::new(Arc::new(provider), Arc::new(MockTextExtractor::new()));

        // Events spawned by services land in `spawned_rx`; tests feed results
        // back through `handle_event` directly.
        let (_tx, rx) = mpsc::unbounded_channel();
        let (spawned_tx, spawned_rx) = mpsc::unbounded_channel();
        let services = Services::new(pipeline, std::env::temp_dir(), spawned_tx);
        let session = SessionState::new(Configuration::new("gpt-3.5-turbo", "SYS", "USR"));
        (AppState::new(rx, services, session, None), spawned_rx)
    }

    fn outcome(analysis: &str) -> AnalysisOutcome {
        AnalysisOutcome {
            extracted_text: "Aluguel 1500".into(),
            page_count: 1,
            analysis: analysis.into(),
            usage: None,
        }
    }

    #[test]
    fn test_focus_cycles() {
        let mut f = Focus::Analysis;
        for _ in 0..3 {
            f = f.next();
        }
        assert_eq!(f, Focus::Analysis);
        assert_eq!(Focus::Analysis.prev(), Focus::Configuration);
    }

    #[test]
    fn test_focus_to_action_unique() {
        let actions: Vec<Action> = Focus::ALL.iter().map(|f| f.to_action()).collect();
        for (i, a) in actions.iter().enumerate() {
            for b in actions.iter().skip(i + 1) {
                assert_ne!(a, b);
            }
        }
    }

    #[tokio::test]
    async fn test_second_request_rejected_while_busy() {
        let (mut app, _spawned) = app();
        app.handle_action(Action::Analyze("/tmp/a.pdf".into()));
        assert_eq!(app.busy, Some(Busy::Analysis));

        app.handle_action(Action::Analyze("/tmp/b.pdf".into()));
        assert_eq!(app.busy, Some(Busy::Analysis));
        assert!(app
            .notifications
            .iter()
            .any(|n| n.level == NotificationLevel::Warning));
    }

    #[tokio::test]
    async fn test_analysis_finished_updates_session() {
        let (mut app, _spawned) = app();
        app.busy = Some(Busy::Analysis);
        app.handle_event(AppEvent::AnalysisFinished {
            path: "gastos.pdf".into(),
            result: Ok(outcome("T")),
        });

        assert_eq!(app.busy, None);
        assert_eq!(app.session.analysis(), Some("T"));
    }

    #[tokio::test]
    async fn test_failed_analysis_keeps_previous() {
        let (mut app, _spawned) = app();
        app.session.set_analysis("old");
        app.busy = Some(Busy::Analysis);
        app.handle_event(AppEvent::AnalysisFinished {
            path: "gastos.pdf".into(),
            result: Err(PipelineError::Completion(LLMError::RateLimited {
                retry_after_secs: 60,
            })),
        });

        assert_eq!(app.session.analysis(), Some("old"));
        assert!(app
            .notifications
            .iter()
            .any(|n| n.level == NotificationLevel::Error && n.message.contains("Erro ao chamar a API")));
    }

    #[tokio::test]
    async fn test_answer_appended() {
        let (mut app, _spawned) = app();
        app.session.set_analysis("A");
        app.handle_event(AppEvent::AnswerReceived(Ok(AnswerOutcome {
            question: "Q".into(),
            answer: "R".into(),
            usage: None,
        })));
        assert_eq!(app.session.qa_log(), &[QAEntry::new("Q", "R")]);
    }

    #[tokio::test]
    async fn test_ask_without_analysis_is_refused() {
        let (mut app, _spawned) = app();
        app.handle_action(Action::Ask("Q".into()));
        assert_eq!(app.busy, None);
        assert!(app.session.qa_log().is_empty());
    }

    #[tokio::test]
    async fn test_edit_then_save_configuration() {
        let (mut app, _spawned) = app();
        app.handle_action(Action::ToggleEditMode);
        assert!(app.session.is_editing());
        assert!(app.configuration.draft().is_some());

        app.handle_action(Action::SaveConfiguration {
            model: "gpt-4o".into(),
            system_prompt: "S".into(),
            user_prompt: "U".into(),
        });
        assert!(!app.session.is_editing());
        assert!(app.configuration.draft().is_none());
        assert_eq!(app.session.configuration(), &Configuration::new("gpt-4o", "S", "U"));
    }

    #[tokio::test]
    async fn test_save_while_viewing_is_refused() {
        let (mut app, _spawned) = app();
        app.handle_action(Action::SaveConfiguration {
            model: "gpt-4o".into(),
            system_prompt: "S".into(),
            user_prompt: "U".into(),
        });
        assert_eq!(app.session.configuration().model, "gpt-3.5-turbo");
    }

    #[test]
    fn test_notifications_dedup_and_cap() {
        let (mut app, _spawned) = app();
        for i in 0..5 {
            app.push_notification(format!("n{i}"), NotificationLevel::Info);
        }
        app.push_notification("n4".into(), NotificationLevel::Info);
        assert_eq!(app.notifications.len(), 3);
        assert_eq!(app.notifications[0].message, "n2");
    }

    #[test]
    fn test_notifications_expire_after_ttl_ticks() {
        let (mut app, _spawned) = app();
        app.push_notification("salvo".into(), NotificationLevel::Success);
        app.notifications[0].ttl_ticks = 2;

        app.on_tick();
        assert_eq!(app.notifications.len(), 1);
        app.on_tick();
        assert!(app.notifications.is_empty());
    }

    #[test]
    fn test_centered_rect() {
        let area = Rect::new(0, 0, 100, 50);
        let centered = centered_rect(50, 50, area);
        assert!(centered.x > 0);
        assert!(centered.y > 0);
        assert!(centered.x + centered.width <= area.width);
        assert!(centered.y + centered.height <= area.height);
    }
}
