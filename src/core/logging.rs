//! Terminal Logging Module
//!
//! Provides:
//! - Daily rolling JSON log files (tracing-appender), gzip-compressing old days
//! - Pretty stderr logging for headless runs
//! - miette diagnostics tuned to the detected terminal
//! - Styled console output for the `analyze` command (console)

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use console::style;
use flate2::write::GzEncoder;
use flate2::Compression;
use miette::Diagnostic;
use supports_color::Stream;
use thiserror::Error;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

const LOG_FILE_PREFIX: &str = "expense-analyst.log";

static TERMINAL_CAPS: OnceLock<TerminalCapabilities> = OnceLock::new();

fn get_terminal_caps() -> &'static TerminalCapabilities {
    TERMINAL_CAPS.get_or_init(TerminalCapabilities::detect)
}

// ============================================================================
// Terminal Capability Detection
// ============================================================================

/// Terminal color support levels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorLevel {
    /// 24-bit TrueColor (16.7M colors)
    TrueColor,
    /// 256-color palette
    Ansi256,
    /// 16 ANSI colors
    Ansi16,
    /// No color support
    NoColor,
}

/// Detected terminal capabilities
#[derive(Debug, Clone)]
pub struct TerminalCapabilities {
    pub color_level: ColorLevel,
    pub supports_unicode: bool,
    pub is_interactive: bool,
}

impl TerminalCapabilities {
    /// Detect terminal capabilities from environment
    pub fn detect() -> Self {
        use is_terminal::IsTerminal;

        let color_level = match supports_color::on(Stream::Stdout) {
            Some(support) if support.has_16m => ColorLevel::TrueColor,
            Some(support) if support.has_256 => ColorLevel::Ansi256,
            Some(support) if support.has_basic => ColorLevel::Ansi16,
            _ => ColorLevel::NoColor,
        };

        let is_interactive = io::stdout().is_terminal();

        let supports_unicode = std::env::var("TERM")
            .map(|t| !t.contains("dumb"))
            .unwrap_or(true)
            && std::env::var("LANG")
                .map(|l| l.contains("UTF-8") || l.contains("utf8"))
                .unwrap_or(true);

        Self {
            color_level,
            supports_unicode,
            is_interactive,
        }
    }

    /// Check if colors should be used
    pub fn should_colorize(&self) -> bool {
        self.is_interactive && self.color_level != ColorLevel::NoColor
    }
}

// ============================================================================
// Logging Initialization
// ============================================================================

/// Log directory under the application data directory.
pub fn log_dir(data_dir: &Path) -> PathBuf {
    data_dir.join("logs")
}

fn prepare_log_dir(data_dir: &Path) -> PathBuf {
    let log_dir = log_dir(data_dir);
    if !log_dir.exists() {
        if let Err(e) = fs::create_dir_all(&log_dir) {
            eprintln!("Failed to create logs directory: {}", e);
        }
    }
    log_dir
}

fn default_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Initialize logging for headless runs.
///
/// Installs a JSON file layer and a pretty stderr layer and configures
/// miette. `init()` on the registry also forwards `log` records. The returned guard must be
/// held until exit so buffered lines are flushed.
pub fn init(data_dir: &Path) -> WorkerGuard {
    let log_dir = prepare_log_dir(data_dir);

    let file_appender = tracing_appender::rolling::daily(&log_dir, LOG_FILE_PREFIX);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let env_filter = default_filter();

    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(non_blocking)
        .json()
        .with_file(true)
        .with_line_number(true)
        .with_thread_ids(true)
        .with_target(true)
        .with_filter(env_filter.clone());

    // stdout carries the analysis output
    let terminal_layer = tracing_subscriber::fmt::layer()
        .with_writer(io::stderr)
        .pretty()
        .with_filter(env_filter);

    tracing_subscriber::registry()
        .with(file_layer)
        .with(terminal_layer)
        .init();

    finish_init(log_dir);
    guard
}

/// Initialize logging for TUI mode.
///
/// Same as [`init()`] without the terminal layer, which would corrupt the
/// screen while ratatui owns it.
pub fn init_tui(data_dir: &Path) -> WorkerGuard {
    let log_dir = prepare_log_dir(data_dir);

    let file_appender = tracing_appender::rolling::daily(&log_dir, LOG_FILE_PREFIX);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(non_blocking)
        .json()
        .with_file(true)
        .with_line_number(true)
        .with_thread_ids(true)
        .with_target(true)
        .with_filter(default_filter());

    tracing_subscriber::registry().with(file_layer).init();

    finish_init(log_dir);
    guard
}

fn finish_init(log_dir: PathBuf) {
    init_miette();

    let log_dir_clone = log_dir.clone();
    std::thread::spawn(move || {
        let today = chrono::Local::now().format("%Y-%m-%d").to_string();
        compress_old_logs(&log_dir_clone, &today);
    });

    log::info!(
        "Logging initialized. Writing to: {:?} (daily rolling)",
        log_dir.join(LOG_FILE_PREFIX)
    );
}

/// Gzip every rolled log except today's. Returns how many were compressed.
fn compress_old_logs(log_dir: &Path, today_suffix: &str) -> usize {
    let Ok(entries) = fs::read_dir(log_dir) else {
        return 0;
    };

    let prefix = format!("{LOG_FILE_PREFIX}.");
    let mut compressed = 0;
    for entry in entries.flatten() {
        let path = entry.path();
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };

        if name.starts_with(&prefix) && !name.ends_with(today_suffix) && !name.ends_with(".gz") {
            match compress_file(&path) {
                Ok(()) => {
                    log::info!("Compressed old log: {:?}", path);
                    compressed += 1;
                }
                Err(e) => log::warn!("Failed to compress old log {:?}: {}", path, e),
            }
        }
    }
    compressed
}

fn compress_file(path: &Path) -> io::Result<()> {
    let file = fs::File::open(path)?;
    let mut reader = io::BufReader::new(file);

    let mut gz_path_name = path
        .file_name()
        .ok_or_else(|| io::Error::new(io::ErrorKind::Other, "No filename"))?
        .to_os_string();
    gz_path_name.push(".gz");
    let parent_dir = path
        .parent()
        .ok_or_else(|| io::Error::new(io::ErrorKind::Other, "No parent directory"))?;
    let gz_path = parent_dir.join(gz_path_name);

    if gz_path.exists() {
        return Ok(());
    }

    let output = fs::File::create(&gz_path)?;
    let mut encoder = GzEncoder::new(output, Compression::default());

    io::copy(&mut reader, &mut encoder)?;
    encoder.finish()?;

    fs::remove_file(path)?;

    Ok(())
}

/// Configure miette's report handler for the detected terminal
fn init_miette() {
    let caps = get_terminal_caps();

    miette::set_hook(Box::new(move |_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(caps.color_level == ColorLevel::TrueColor)
                .unicode(caps.supports_unicode)
                .context_lines(3)
                .tab_width(4)
                .break_words(true)
                .color(caps.should_colorize())
                .build(),
        )
    }))
    .ok(); // Ignore if already set
}

// ============================================================================
// Diagnostics
// ============================================================================

/// Fatal startup error with a recovery hint.
#[derive(Debug, Error, Diagnostic)]
#[error("{message}")]
#[diagnostic(code("EXPENSE::STARTUP"))]
pub struct StartupError {
    message: String,

    #[help]
    help_text: Option<String>,
}

impl StartupError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            help_text: None,
        }
    }

    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help_text = Some(help.into());
        self
    }
}

/// Document could not be turned into text.
#[derive(Debug, Error, Diagnostic)]
#[error("Failed to extract content from {filename}: {reason}")]
#[diagnostic(
    code("EXPENSE::EXTRACTION_ERROR"),
    help("Check that the file is an unencrypted PDF and try again")
)]
pub struct ExtractionError {
    pub filename: String,
    pub reason: String,
}

impl ExtractionError {
    pub fn new(filename: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            filename: filename.into(),
            reason: reason.into(),
        }
    }
}

/// Completion API failure
#[derive(Debug, Error, Diagnostic)]
#[error("Erro ao chamar a API ({kind}): {message}")]
#[diagnostic(code("EXPENSE::LLM_ERROR"))]
pub struct LlmError {
    pub kind: String,
    pub message: String,

    #[help]
    pub recovery_hint: String,
}

impl LlmError {
    pub fn new(kind: impl Into<String>, message: impl Into<String>) -> Self {
        let kind = kind.into();
        let recovery_hint = match kind.as_str() {
            "authentication" => "Check the API key (OPEN_API_KEY or `expense-analyst set-key`)",
            "quota" => "Wait a moment or check the account's usage limits",
            "invalid model" => "Pick a model listed in the Configuration view or pass --model",
            _ => "Try again",
        }
        .to_string();
        Self {
            kind,
            message: message.into(),
            recovery_hint,
        }
    }
}

// ============================================================================
// Console Output Utilities
// ============================================================================

fn prefix(unicode: &'static str, ascii: &'static str) -> &'static str {
    if get_terminal_caps().supports_unicode {
        unicode
    } else {
        ascii
    }
}

pub fn print_success(message: &str) {
    println!("{} {}", style(prefix("✓", "[ok]")).green(), style(message).green());
}

pub fn print_error(message: &str) {
    eprintln!("{} {}", style(prefix("✗", "[x]")).red(), style(message).red().bold());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_terminal_caps_detection() {
        let caps = TerminalCapabilities::detect();
        if !caps.is_interactive {
            assert!(!caps.should_colorize());
        }

        let piped = TerminalCapabilities {
            color_level: ColorLevel::TrueColor,
            supports_unicode: true,
            is_interactive: false,
        };
        assert!(!piped.should_colorize());
    }

    #[derive(Clone, Default)]
    struct Captured(std::sync::Arc<std::sync::Mutex<Vec<u8>>>);

    impl io::Write for Captured {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    // Only global subscriber in this test binary.
    #[test]
    fn test_registry_init_forwards_log_records() {
        let captured = Captured::default();
        let writer = captured.clone();
        tracing_subscriber::registry()
            .with(
                tracing_subscriber::fmt::layer()
                    .with_ansi(false)
                    .with_writer(move || writer.clone()),
            )
            .try_init()
            .unwrap();

        log::info!("forwarded from log");

        let text = String::from_utf8(captured.0.lock().unwrap().clone()).unwrap();
        assert!(text.contains("forwarded from log"));
    }

    #[test]
    fn test_log_dir_under_data_dir() {
        assert_eq!(
            log_dir(Path::new("/tmp/expense")),
            PathBuf::from("/tmp/expense/logs")
        );
    }

    #[test]
    fn test_compress_old_logs_skips_today() {
        let dir = tempfile::tempdir().unwrap();
        let old = dir.path().join("expense-analyst.log.2026-01-01");
        let today = dir.path().join("expense-analyst.log.2026-01-02");
        let unrelated = dir.path().join("notes.txt");
        fs::write(&old, "old line\n").unwrap();
        fs::write(&today, "today line\n").unwrap();
        fs::write(&unrelated, "keep").unwrap();

        let count = compress_old_logs(dir.path(), "2026-01-02");

        assert_eq!(count, 1);
        assert!(!old.exists());
        assert!(dir.path().join("expense-analyst.log.2026-01-01.gz").exists());
        assert!(today.exists());
        assert!(unrelated.exists());
    }

    #[test]
    fn test_compressed_log_decodes() {
        use flate2::read::GzDecoder;
        use std::io::Read;

        let dir = tempfile::tempdir().unwrap();
        let old = dir.path().join("expense-analyst.log.2026-01-01");
        fs::write(&old, "{\"level\":\"INFO\"}\n").unwrap();
        compress_old_logs(dir.path(), "2026-01-02");

        let gz = fs::File::open(dir.path().join("expense-analyst.log.2026-01-01.gz")).unwrap();
        let mut text = String::new();
        GzDecoder::new(gz).read_to_string(&mut text).unwrap();
        assert_eq!(text, "{\"level\":\"INFO\"}\n");
    }

    #[test]
    fn test_llm_error_hint_by_kind() {
        let err = LlmError::new("authentication", "401");
        assert!(err.recovery_hint.contains("API key"));
        assert!(err.to_string().starts_with("Erro ao chamar a API"));
    }

    #[test]
    fn test_startup_error_help() {
        let err = StartupError::new("no key").with_help("set OPEN_API_KEY");
        assert_eq!(err.to_string(), "no key");
        assert_eq!(err.help_text.as_deref(), Some("set OPEN_API_KEY"));
    }
}
