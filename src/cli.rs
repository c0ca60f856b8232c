use std::io::Write;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use miette::IntoDiagnostic;

use crate::config::LlmConfig;
use crate::core::commands;
use crate::core::logging::{print_error, print_success, ExtractionError, LlmError};
use crate::core::pipeline::{AnalysisPipeline, PipelineError};
use crate::core::session::{Configuration, SessionState};

#[derive(Parser, Debug)]
#[command(name = "expense-analyst")]
#[command(about = "Analyze monthly expense statements with a language model")]
#[command(version)]
/// Command-line arguments.
pub struct Cli {
    /// Configuration file (defaults to the user config directory)
    #[arg(long, short = 'c', global = true)]
    pub config: Option<PathBuf>,

    /// Subcommand to execute (starts the TUI if omitted).
    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Open the terminal UI
    Tui {
        /// PDF to pre-fill in the Analysis view
        pdf: Option<PathBuf>,
    },
    /// Analyze a PDF without the terminal UI
    Analyze(AnalyzeArgs),
    /// Store the OpenAI API key in the system keyring
    SetKey {
        /// Key to store (read from stdin if omitted)
        key: Option<String>,
    },
}

#[derive(clap::Args, Debug, Clone)]
pub struct AnalyzeArgs {
    /// Statement to analyze
    pub pdf: PathBuf,

    /// Model to use instead of the configured one
    #[arg(long, short = 'm')]
    pub model: Option<String>,

    /// Follow-up question, asked after the analysis (repeatable)
    #[arg(long = "question", short = 'q')]
    pub questions: Vec<String>,

    /// Directory to write analise_gastos.txt into
    #[arg(long, short = 'o')]
    pub output: Option<PathBuf>,
}

/// Starting configuration, with `model` overriding the configured model.
pub fn initial_configuration(llm: &LlmConfig, model: Option<&str>) -> Configuration {
    let mut config = Configuration::from(llm);
    if let Some(model) = model.map(str::trim).filter(|m| !m.is_empty()) {
        config.model = model.to_string();
    }
    config
}

/// Map a pipeline failure onto the diagnostic shown at exit.
pub fn pipeline_diagnostic(error: PipelineError, pdf: &std::path::Path) -> miette::Report {
    match error {
        PipelineError::Extraction(e) => {
            ExtractionError::new(pdf.display().to_string(), e.to_string()).into()
        }
        PipelineError::Completion(e) => LlmError::new(e.kind(), e.to_string()).into(),
        other => miette::Report::msg(other.to_string()),
    }
}

/// Run one analysis and the follow-up questions, printing to `out`.
///
/// Extraction or analysis failures abort; a failed question is reported and
/// the remaining questions are still asked.
pub async fn run_analyze<W: Write>(
    pipeline: &AnalysisPipeline,
    session: &mut SessionState,
    args: &AnalyzeArgs,
    out: &mut W,
) -> miette::Result<()> {
    let outcome = commands::on_analyze_file(session, pipeline, &args.pdf)
        .await
        .map_err(|e| pipeline_diagnostic(e, &args.pdf))?;

    writeln!(
        out,
        "Documento carregado: {} página(s), {} caracteres extraídos",
        outcome.page_count,
        outcome.extracted_text.chars().count()
    )
    .into_diagnostic()?;
    writeln!(out).into_diagnostic()?;
    writeln!(out, "Análise de gastos:").into_diagnostic()?;
    writeln!(out, "{}", outcome.analysis).into_diagnostic()?;

    for (i, question) in args.questions.iter().enumerate() {
        let n = i + 1;
        match commands::on_ask(session, pipeline, question).await {
            Ok(answer) => {
                writeln!(out).into_diagnostic()?;
                writeln!(out, "Pergunta {n}: {}", answer.question).into_diagnostic()?;
                writeln!(out, "Resposta {n}: {}", answer.answer).into_diagnostic()?;
            }
            Err(e) => {
                tracing::warn!(question = n, error = %e, "follow-up question failed");
                print_error(&format!("Pergunta {n}: {e}"));
            }
        }
    }

    if let Some(dir) = &args.output {
        if let Some(payload) = commands::on_download(session) {
            let path = payload.write_to(dir).into_diagnostic()?;
            print_success(&format!("Saved {}", path.display()));
        }
    }

    Ok(())
}
