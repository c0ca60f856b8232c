use std::path::PathBuf;

use tokio::sync::mpsc;

use crate::core::pipeline::{AnalysisPipeline, PipelineError};
use crate::core::session::Configuration;

use super::events::AppEvent;

/// Handle to the backend shared with views.
///
/// Request methods spawn a task and report back through `event_tx`; they
/// never touch session state themselves.
#[derive(Clone)]
pub struct Services {
    pub pipeline: AnalysisPipeline,
    pub export_dir: PathBuf,
    pub event_tx: mpsc::UnboundedSender<AppEvent>,
}

impl Services {
    pub fn new(
        pipeline: AnalysisPipeline,
        export_dir: PathBuf,
        event_tx: mpsc::UnboundedSender<AppEvent>,
    ) -> Self {
        Self {
            pipeline,
            export_dir,
            event_tx,
        }
    }

    /// Read `path`, run the analysis, send [`AppEvent::AnalysisFinished`].
    pub fn spawn_analysis(&self, config: Configuration, path: String) {
        let pipeline = self.pipeline.clone();
        let tx = self.event_tx.clone();
        tokio::spawn(async move {
            let result = match tokio::fs::read(&path).await {
                Ok(bytes) => pipeline.run_analysis(&config, &bytes).await,
                Err(e) => Err(PipelineError::Extraction(e.into())),
            };
            let _ = tx.send(AppEvent::AnalysisFinished { path, result });
        });
    }

    /// Ask a follow-up question, send [`AppEvent::AnswerReceived`].
    pub fn spawn_question(&self, config: Configuration, analysis: String, question: String) {
        let pipeline = self.pipeline.clone();
        let tx = self.event_tx.clone();
        tokio::spawn(async move {
            let result = pipeline
                .answer_question(&config, Some(&analysis), &question)
                .await;
            let _ = tx.send(AppEvent::AnswerReceived(result));
        });
    }

    /// List selectable models, send [`AppEvent::ModelsLoaded`].
    pub fn spawn_model_listing(&self) {
        let provider = self.pipeline.provider();
        let tx = self.event_tx.clone();
        tokio::spawn(async move {
            let result = provider.list_models().await;
            let _ = tx.send(AppEvent::ModelsLoaded(result));
        });
    }
}
