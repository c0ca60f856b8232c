use crate::core::llm::LLMError;
use crate::core::pipeline::{AnalysisOutcome, AnswerOutcome, PipelineError};

/// Events flowing through the Elm-architecture event loop.
#[derive(Debug)]
pub enum AppEvent {
    /// Raw terminal input (keyboard/mouse).
    Input(crossterm::event::Event),
    /// Model listing finished (entering edit mode).
    ModelsLoaded(Result<Vec<String>, LLMError>),
    /// Analysis request finished.
    AnalysisFinished {
        path: String,
        result: Result<AnalysisOutcome, PipelineError>,
    },
    /// Follow-up question finished.
    AnswerReceived(Result<AnswerOutcome, PipelineError>),
    /// A resolved action to execute.
    Action(Action),
}

/// High-level actions dispatched by the input mapper.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    // Navigation
    FocusAnalysis,
    FocusQuestions,
    FocusConfiguration,
    TabNext,
    TabPrev,

    // Modals
    ShowHelp,
    CloseHelp,

    // Session
    Analyze(String),
    Ask(String),
    ToggleEditMode,
    SaveConfiguration {
        model: String,
        system_prompt: String,
        user_prompt: String,
    },
    SaveDownload,
    ResetSession,

    // Application
    Quit,
}

/// Which top-level view has focus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Focus {
    Analysis,
    Questions,
    Configuration,
}

impl Focus {
    pub const ALL: [Focus; 3] = [Focus::Analysis, Focus::Questions, Focus::Configuration];

    pub fn label(self) -> &'static str {
        match self {
            Focus::Analysis => "Analysis",
            Focus::Questions => "Questions",
            Focus::Configuration => "Configuration",
        }
    }

    pub fn next(self) -> Focus {
        let idx = Focus::ALL.iter().position(|&f| f == self).unwrap_or(0);
        Focus::ALL[(idx + 1) % Focus::ALL.len()]
    }

    pub fn prev(self) -> Focus {
        let idx = Focus::ALL.iter().position(|&f| f == self).unwrap_or(0);
        Focus::ALL[(idx + Focus::ALL.len() - 1) % Focus::ALL.len()]
    }

    pub fn to_action(self) -> Action {
        match self {
            Focus::Analysis => Action::FocusAnalysis,
            Focus::Questions => Action::FocusQuestions,
            Focus::Configuration => Action::FocusConfiguration,
        }
    }
}

/// Notification level for the overlay system.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    Info,
    Success,
    Warning,
    Error,
}

/// A timed notification shown in the overlay.
#[derive(Debug, Clone)]
pub struct Notification {
    pub id: u64,
    pub message: String,
    pub level: NotificationLevel,
    /// Ticks remaining before auto-dismiss.
    pub ttl_ticks: u32,
}

impl Notification {
    /// Notification whose id is assigned by `AppState` on arrival.
    pub fn new(message: impl Into<String>, level: NotificationLevel) -> Self {
        Self {
            id: 0,
            message: message.into(),
            level,
            ttl_ticks: 100,
        }
    }
}
