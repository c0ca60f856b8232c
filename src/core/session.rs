//! Session store.
//!
//! Holds everything that lives for one interactive session: the active
//! configuration, the edit/view mode flag, the latest analysis and the
//! follow-up question log. Nothing here performs I/O.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::LlmConfig;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SessionError {
    #[error("Configuration can only be saved while editing")]
    NotEditing,
}

pub type SessionResult<T> = std::result::Result<T, SessionError>;

/// Model and prompt pair used for every completion request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Configuration {
    pub model: String,
    pub system_prompt: String,
    pub user_prompt: String,
}

impl Configuration {
    pub fn new(
        model: impl Into<String>,
        system_prompt: impl Into<String>,
        user_prompt: impl Into<String>,
    ) -> Self {
        Self {
            model: model.into(),
            system_prompt: system_prompt.into(),
            user_prompt: user_prompt.into(),
        }
    }
}

impl Default for Configuration {
    fn default() -> Self {
        Self::from(&LlmConfig::default())
    }
}

impl From<&LlmConfig> for Configuration {
    fn from(llm: &LlmConfig) -> Self {
        Self::new(&llm.model, &llm.system_prompt, &llm.user_prompt)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Mode {
    #[default]
    Viewing,
    Editing,
}

impl Mode {
    pub fn toggled(self) -> Self {
        match self {
            Mode::Viewing => Mode::Editing,
            Mode::Editing => Mode::Viewing,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Mode::Viewing => "viewing",
            Mode::Editing => "editing",
        }
    }
}

/// One answered follow-up question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QAEntry {
    pub question: String,
    pub answer: String,
}

impl QAEntry {
    pub fn new(question: impl Into<String>, answer: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            answer: answer.into(),
        }
    }
}

/// State of one interactive session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionState {
    initial: Configuration,
    configuration: Configuration,
    mode: Mode,
    analysis: Option<String>,
    qa_log: Vec<QAEntry>,
}

impl Default for SessionState {
    fn default() -> Self {
        Self::new(Configuration::default())
    }
}

impl SessionState {
    /// Start a session with `configuration`, viewing mode, no analysis and an
    /// empty question log.
    pub fn new(configuration: Configuration) -> Self {
        Self {
            initial: configuration.clone(),
            configuration,
            mode: Mode::Viewing,
            analysis: None,
            qa_log: Vec::new(),
        }
    }

    // ── Reads ───────────────────────────────────────────────────────────

    pub fn configuration(&self) -> &Configuration {
        &self.configuration
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn is_editing(&self) -> bool {
        self.mode == Mode::Editing
    }

    pub fn analysis(&self) -> Option<&str> {
        self.analysis.as_deref()
    }

    /// True when follow-up questions may be asked.
    pub fn has_analysis(&self) -> bool {
        self.analysis.as_deref().is_some_and(|a| !a.is_empty())
    }

    pub fn qa_log(&self) -> &[QAEntry] {
        &self.qa_log
    }

    // ── Mutations ───────────────────────────────────────────────────────

    pub fn toggle_edit_mode(&mut self) {
        self.mode = self.mode.toggled();
        tracing::debug!(mode = self.mode.label(), "edit mode toggled");
    }

    /// Replace the configuration and return to viewing mode.
    ///
    /// Rejected while viewing; the configuration is left untouched.
    pub fn save_configuration(
        &mut self,
        model: impl Into<String>,
        system_prompt: impl Into<String>,
        user_prompt: impl Into<String>,
    ) -> SessionResult<()> {
        if !self.is_editing() {
            tracing::debug!("save_configuration rejected: not editing");
            return Err(SessionError::NotEditing);
        }

        self.configuration = Configuration::new(model, system_prompt, user_prompt);
        self.mode = Mode::Viewing;
        tracing::info!(model = %self.configuration.model, "configuration saved");
        Ok(())
    }

    /// Last write wins; no merge with a previous analysis.
    pub fn set_analysis(&mut self, text: impl Into<String>) {
        let text = text.into();
        tracing::debug!(chars = text.len(), "analysis replaced");
        self.analysis = Some(text);
    }

    pub fn append_qa(&mut self, question: impl Into<String>, answer: impl Into<String>) {
        self.qa_log.push(QAEntry::new(question, answer));
        tracing::debug!(entries = self.qa_log.len(), "question answered");
    }

    /// Restart the session from its initial configuration.
    pub fn reset(&mut self) {
        *self = Self::new(self.initial.clone());
        tracing::info!("session reset");
    }
}
