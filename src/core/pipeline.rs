//! Analysis pipeline: document bytes in, expense analysis out.
//!
//! The pipeline itself is stateless. Callers own the [`SessionState`] and
//! apply outcomes to it only after a call succeeds, so a failed step never
//! leaves partial state behind.
//!
//! [`SessionState`]: crate::core::session::SessionState

use std::sync::Arc;

use thiserror::Error;

use crate::core::llm::{ChatMessage, ChatRequest, LLMError, LLMProvider, TokenUsage};
use crate::core::session::Configuration;
use crate::ingestion::{concat_pages, PDFError, TextExtractor};

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Failed to read document: {0}")]
    Extraction(#[from] PDFError),

    #[error("Erro ao chamar a API: {0}")]
    Completion(#[from] LLMError),

    #[error("No analysis available yet; analyze a document first")]
    NoAnalysis,
}

pub type Result<T> = std::result::Result<T, PipelineError>;

/// Result of a successful analysis run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisOutcome {
    /// Concatenated page text that was sent to the model.
    pub extracted_text: String,
    pub page_count: usize,
    pub analysis: String,
    pub usage: Option<TokenUsage>,
}

/// Result of a successful follow-up question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnswerOutcome {
    pub question: String,
    pub answer: String,
    pub usage: Option<TokenUsage>,
}

/// Two-turn request that asks for the monthly expense analysis.
pub fn build_analysis_request(config: &Configuration, extracted_text: &str) -> ChatRequest {
    ChatRequest::new(
        &config.model,
        vec![
            ChatMessage::system(&config.system_prompt),
            ChatMessage::user(format!("{}\n\n{}", config.user_prompt, extracted_text)),
        ],
    )
}

/// Two-turn request for a follow-up question. Only the analysis is quoted;
/// the raw document text is not re-sent.
pub fn build_question_request(config: &Configuration, analysis: &str, question: &str) -> ChatRequest {
    ChatRequest::new(
        &config.model,
        vec![
            ChatMessage::system(&config.system_prompt),
            ChatMessage::user(format!(
                "Baseado na seguinte análise: {analysis}\n\nPergunta: {question}"
            )),
        ],
    )
}

/// Extract, prompt, and return the model's answer.
#[derive(Clone)]
pub struct AnalysisPipeline {
    provider: Arc<dyn LLMProvider>,
    extractor: Arc<dyn TextExtractor>,
}

impl std::fmt::Debug for AnalysisPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnalysisPipeline")
            .field("provider", &self.provider.id())
            .finish_non_exhaustive()
    }
}

impl AnalysisPipeline {
    pub fn new(provider: Arc<dyn LLMProvider>, extractor: Arc<dyn TextExtractor>) -> Self {
        Self {
            provider,
            extractor,
        }
    }

    pub fn provider(&self) -> Arc<dyn LLMProvider> {
        Arc::clone(&self.provider)
    }

    /// Concatenated text of every page. A document without pages yields `""`.
    pub fn extract_text(&self, bytes: &[u8]) -> Result<(String, usize)> {
        let pages = self.extractor.extract_pages(bytes)?;
        Ok((concat_pages(&pages), pages.len()))
    }

    /// Run one full analysis. Empty extracted text still reaches the model.
    pub async fn run_analysis(&self, config: &Configuration, bytes: &[u8]) -> Result<AnalysisOutcome> {
        let (extracted_text, page_count) = self.extract_text(bytes)?;
        tracing::info!(
            pages = page_count,
            chars = extracted_text.len(),
            model = %config.model,
            "document extracted, requesting analysis"
        );

        let request = build_analysis_request(config, &extracted_text);
        let response = self.provider.chat(request).await.map_err(|e| {
            tracing::warn!(kind = e.kind(), error = %e, "analysis request failed");
            e
        })?;

        tracing::info!(
            chars = response.content.len(),
            latency_ms = response.latency_ms,
            "analysis received"
        );

        Ok(AnalysisOutcome {
            extracted_text,
            page_count,
            analysis: response.content,
            usage: response.usage,
        })
    }

    /// Answer `question` about `analysis`. Requires a non-empty analysis.
    pub async fn answer_question(
        &self,
        config: &Configuration,
        analysis: Option<&str>,
        question: &str,
    ) -> Result<AnswerOutcome> {
        let analysis = match analysis {
            Some(a) if !a.is_empty() => a,
            _ => return Err(PipelineError::NoAnalysis),
        };

        let request = build_question_request(config, analysis, question);
        let response = self.provider.chat(request).await.map_err(|e| {
            tracing::warn!(kind = e.kind(), error = %e, "question request failed");
            e
        })?;

        tracing::debug!(chars = response.content.len(), "answer received");

        Ok(AnswerOutcome {
            question: question.to_string(),
            answer: response.content,
            usage: response.usage,
        })
    }
}
