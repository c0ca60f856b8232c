use std::io::{self, BufRead};
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use miette::IntoDiagnostic;

use expense_analyst::cli::{self, Cli, Command};
use expense_analyst::config::AppConfig;
use expense_analyst::core::credentials::{self, mask_api_key, CredentialManager};
use expense_analyst::core::llm::OpenAIProvider;
use expense_analyst::core::logging::{self, print_success, StartupError};
use expense_analyst::core::pipeline::AnalysisPipeline;
use expense_analyst::core::session::SessionState;
use expense_analyst::ingestion::PDFParser;

#[tokio::main]
async fn main() -> miette::Result<()> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => AppConfig::try_load_from(path).map_err(|e| {
            StartupError::new(e.to_string())
                .with_help(format!("Fix or remove {}", path.display()))
        })?,
        None => AppConfig::load(),
    };

    let tui_mode = matches!(cli.command, None | Some(Command::Tui { .. }));
    let _log_guard = if tui_mode {
        logging::init_tui(&config.data_dir())
    } else {
        logging::init(&config.data_dir())
    };
    tracing::info!(version = expense_analyst::VERSION, "starting");

    match cli.command {
        Some(Command::SetKey { key }) => set_key(key),
        Some(Command::Analyze(args)) => {
            let pipeline = build_pipeline(&config)?;
            let mut session =
                SessionState::new(cli::initial_configuration(&config.llm, args.model.as_deref()));
            let mut stdout = io::stdout();
            cli::run_analyze(&pipeline, &mut session, &args, &mut stdout).await
        }
        Some(Command::Tui { pdf }) => run_tui(&config, pdf.map(|p| p.display().to_string())).await,
        None => run_tui(&config, None).await,
    }
}

fn build_pipeline(config: &AppConfig) -> miette::Result<AnalysisPipeline> {
    let (api_key, source) = credentials::resolve_api_key(config.llm.api_key.as_deref())
        .map_err(|e| {
            StartupError::new(e.to_string())
                .with_help("export OPEN_API_KEY=sk-... or run `expense-analyst set-key`")
        })?;
    tracing::info!(%source, key = %mask_api_key(&api_key), "API key resolved");

    let provider = OpenAIProvider::new(
        api_key,
        config.llm.max_tokens,
        config.llm.organization_id.clone(),
        Some(config.llm.base_url.clone()),
        config.llm.request_timeout(),
    )
    .map_err(|e| StartupError::new(format!("Failed to build HTTP client: {e}")))?;

    Ok(AnalysisPipeline::new(
        Arc::new(provider),
        Arc::new(PDFParser::new()),
    ))
}

async fn run_tui(config: &AppConfig, initial_pdf: Option<String>) -> miette::Result<()> {
    let pipeline = build_pipeline(config)?;
    let session = SessionState::new((&config.llm).into());

    expense_analyst::tui::run(
        pipeline,
        session,
        config.export_dir(),
        initial_pdf,
        Duration::from_millis(config.tui.tick_rate_ms),
    )
    .await
    .into_diagnostic()
}

fn set_key(key: Option<String>) -> miette::Result<()> {
    let key = match key {
        Some(key) => key,
        None => {
            let mut line = String::new();
            io::stdin().lock().read_line(&mut line).into_diagnostic()?;
            line
        }
    };

    CredentialManager::new()
        .store_api_key(&key)
        .map_err(|e| StartupError::new(e.to_string()))?;
    print_success(&format!("Stored API key {}", mask_api_key(key.trim())));
    Ok(())
}
