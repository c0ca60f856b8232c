//! Session commands: each user action as one state transition.
//!
//! Pipeline calls happen first; the session is only touched once the call
//! has succeeded.

use std::path::Path;

use crate::core::export::DownloadPayload;
use crate::core::pipeline::{AnalysisOutcome, AnalysisPipeline, AnswerOutcome, PipelineError};
use crate::core::session::{SessionResult, SessionState};

pub fn on_toggle_edit(state: &mut SessionState) {
    state.toggle_edit_mode();
}

pub fn on_save_config(
    state: &mut SessionState,
    model: &str,
    system_prompt: &str,
    user_prompt: &str,
) -> SessionResult<()> {
    state.save_configuration(model, system_prompt, user_prompt)
}

/// Analyze a document already in memory and store the result.
pub async fn on_analyze(
    state: &mut SessionState,
    pipeline: &AnalysisPipeline,
    bytes: &[u8],
) -> Result<AnalysisOutcome, PipelineError> {
    let config = state.configuration().clone();
    let outcome = pipeline.run_analysis(&config, bytes).await?;
    apply_analysis(state, &outcome);
    Ok(outcome)
}

/// Read `path` and analyze it. The bytes are dropped once extracted.
pub async fn on_analyze_file(
    state: &mut SessionState,
    pipeline: &AnalysisPipeline,
    path: &Path,
) -> Result<AnalysisOutcome, PipelineError> {
    let bytes = tokio::fs::read(path)
        .await
        .map_err(|e| PipelineError::Extraction(e.into()))?;
    on_analyze(state, pipeline, &bytes).await
}

pub async fn on_ask(
    state: &mut SessionState,
    pipeline: &AnalysisPipeline,
    question: &str,
) -> Result<AnswerOutcome, PipelineError> {
    let config = state.configuration().clone();
    let outcome = pipeline
        .answer_question(&config, state.analysis(), question)
        .await?;
    apply_answer(state, &outcome);
    Ok(outcome)
}

pub fn apply_analysis(state: &mut SessionState, outcome: &AnalysisOutcome) {
    state.set_analysis(outcome.analysis.clone());
}

pub fn apply_answer(state: &mut SessionState, outcome: &AnswerOutcome) {
    state.append_qa(outcome.question.clone(), outcome.answer.clone());
}

/// Download payload for the current analysis, if there is one.
pub fn on_download(state: &SessionState) -> Option<DownloadPayload> {
    state.analysis().map(DownloadPayload::from_analysis)
}
