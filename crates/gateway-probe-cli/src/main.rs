// crates/gateway-probe-cli/src/main.rs
// ============================================================================
// Module: Gateway Probe CLI Entry Point
// Description: Command-line driver for the gateway verification harness.
// Purpose: Resolve configuration, run the harness, and map the verdict to an exit code.
// Dependencies: clap, gateway-probe-config, gateway-probe-core, serde_json, thiserror, tokio.
// ============================================================================

//! ## Overview
//! `gateway-probe [RECIPIENT]` checks that a messaging gateway is up, logs
//! in through its development endpoint, picks the first listed device, and
//! sends a text, an image and a document to the recipient. The process exits
//! 0 only when every probe passed; any fatal stage failure, probe failure, or
//! interrupt exits 1.
//!
//! Operator output goes to stdout as colored text or, with `--format json`,
//! as one JSON report. Diagnostics go to stderr through `tracing`.

// ============================================================================
// SECTION: Modules
// ============================================================================


// ============================================================================
// SECTION: Imports
// ============================================================================

use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use clap::ValueEnum;
use gateway_probe_cli::console::Console;
use gateway_probe_cli::console::Tone;
use gateway_probe_cli::console::color_enabled;
use gateway_probe_cli::logging;
use gateway_probe_cli::t;
use gateway_probe_config::GatewayProbeConfig;
use gateway_probe_config::LogLevel;
use gateway_probe_core::Harness;
use gateway_probe_core::NoopObserver;
use thiserror::Error;
use tracing::debug;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// CLI error wrapper for catalog-rendered messages.
#[derive(Debug, Error)]
#[error("{message}")]
struct CliError {
    /// Human-readable error message.
    message: String,
}

impl CliError {
    /// Constructs a new [`CliError`] from a rendered message.
    const fn new(message: String) -> Self {
        Self {
            message,
        }
    }
}

/// CLI result alias for fallible operations.
type CliResult<T> = Result<T, CliError>;

// ============================================================================
// SECTION: CLI Types
// ============================================================================

/// Top-level CLI definition.
#[derive(Parser, Debug)]
#[command(name = "gateway-probe", version, about = "Verify message delivery through a gateway")]
struct Cli {
    /// Destination phone number (overrides `probes.recipient`).
    #[arg(value_name = "RECIPIENT")]
    recipient: Option<String>,
    /// Path to the TOML config file (overrides `GATEWAY_PROBE_CONFIG`).
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
    /// Gateway base URL (overrides config and `GATEWAY_PROBE_BASE_URL`).
    #[arg(long, value_name = "URL")]
    base_url: Option<String>,
    /// Report format written to stdout.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,
    /// Disable ANSI colors in text output.
    #[arg(long)]
    no_color: bool,
    /// Diagnostic log level (overrides `logging.level`).
    #[arg(long, value_enum, value_name = "LEVEL")]
    log_level: Option<LogLevelArg>,
}

/// Report output formats.
#[derive(ValueEnum, Copy, Clone, Debug, PartialEq, Eq)]
enum OutputFormat {
    /// Progress lines and a summary.
    Text,
    /// A single JSON run report.
    Json,
}

/// Diagnostic log level selections.
#[derive(ValueEnum, Copy, Clone, Debug, PartialEq, Eq)]
enum LogLevelArg {
    /// Errors only.
    Error,
    /// Warnings and errors.
    Warn,
    /// Stage transitions.
    Info,
    /// Request and response detail.
    Debug,
    /// Transport detail.
    Trace,
}

impl From<LogLevelArg> for LogLevel {
    fn from(value: LogLevelArg) -> Self {
        match value {
            LogLevelArg::Error => Self::Error,
            LogLevelArg::Warn => Self::Warn,
            LogLevelArg::Info => Self::Info,
            LogLevelArg::Debug => Self::Debug,
            LogLevelArg::Trace => Self::Trace,
        }
    }
}

// ============================================================================
// SECTION: Entry Point
// ============================================================================

/// CLI entry point returning an exit code.
#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    match run().await {
        Ok(code) => code,
        Err(err) => emit_error(&err.to_string()),
    }
}

/// Resolves configuration and runs the harness until done or interrupted.
async fn run() -> CliResult<ExitCode> {
    let cli = Cli::parse();
    let config = resolve_config(&cli)?;
    logging::init(&config.logging, cli.log_level.map(LogLevel::from))
        .map_err(|err| CliError::new(t!("logging.init_failed", error = err)))?;
    debug!(
        base_url = %config.gateway.base_url,
        recipient = %config.probes.recipient,
        "configuration resolved"
    );

    tokio::select! {
        biased;
        signal = tokio::signal::ctrl_c() => {
            signal.map_err(|err| CliError::new(t!("signal.install_failed", error = err)))?;
            write_stderr_line(&t!("run.interrupted"))
                .map_err(|err| CliError::new(output_error("stderr", &err)))?;
            Ok(ExitCode::FAILURE)
        }
        code = execute(&cli, config) => code,
    }
}

/// Loads the config file and applies environment and command-line overrides.
fn resolve_config(cli: &Cli) -> CliResult<GatewayProbeConfig> {
    let mut config = GatewayProbeConfig::load(cli.config.as_deref())
        .map_err(|err| CliError::new(t!("config.load_failed", error = err)))?;
    config
        .apply_env_overrides()
        .map_err(|err| CliError::new(t!("config.load_failed", error = err)))?;
    if let Some(base_url) = &cli.base_url {
        config
            .override_base_url(base_url.clone())
            .map_err(|err| CliError::new(t!("config.override_failed", error = err)))?;
    }
    if let Some(recipient) = &cli.recipient {
        config
            .override_recipient(recipient.clone())
            .map_err(|err| CliError::new(t!("config.override_failed", error = err)))?;
    }
    Ok(config)
}

/// Runs the harness and renders the result in the selected format.
async fn execute(cli: &Cli, config: GatewayProbeConfig) -> CliResult<ExitCode> {
    match cli.format {
        OutputFormat::Json => execute_json(config).await,
        OutputFormat::Text => execute_text(config, cli.no_color, cli.recipient.is_some()).await,
    }
}

/// Text mode: live progress, remediation hints, and the summary.
async fn execute_text(
    config: GatewayProbeConfig,
    no_color: bool,
    recipient_given: bool,
) -> CliResult<ExitCode> {
    let mut console = Console::new(std::io::stdout(), color_enabled(no_color));
    console.banner(&config);
    if !recipient_given {
        console.line(Tone::Info, &t!("run.recipient_hint", example = "+6281234567890"));
    }
    console.blank();

    let harness = Harness::new(config);
    let code = match harness.run(&mut console).await {
        Ok(report) => {
            console.summary(&report);
            exit_code(report.all_passed())
        }
        Err(err) => {
            console.fatal(&err, harness.config());
            ExitCode::FAILURE
        }
    };
    console.finish().map_err(|err| CliError::new(output_error("stdout", &err)))?;
    Ok(code)
}

/// JSON mode: the report on stdout, fatal errors on stderr.
async fn execute_json(config: GatewayProbeConfig) -> CliResult<ExitCode> {
    let harness = Harness::new(config);
    match harness.run(&mut NoopObserver).await {
        Ok(report) => {
            let rendered = serde_json::to_string_pretty(&report)
                .map_err(|err| CliError::new(t!("report.serialize_failed", error = err)))?;
            write_stdout_line(&rendered)
                .map_err(|err| CliError::new(output_error("stdout", &err)))?;
            Ok(exit_code(report.all_passed()))
        }
        Err(err) => Ok(emit_error(&err.to_string())),
    }
}

/// Maps the overall verdict to a process exit code.
fn exit_code(all_passed: bool) -> ExitCode {
    if all_passed { ExitCode::SUCCESS } else { ExitCode::FAILURE }
}

// ============================================================================
// SECTION: Output Helpers
// ============================================================================

/// Writes a single line to stdout.
fn write_stdout_line(message: &str) -> std::io::Result<()> {
    let mut stdout = std::io::stdout();
    writeln!(&mut stdout, "{message}")
}

/// Writes a single line to stderr.
fn write_stderr_line(message: &str) -> std::io::Result<()> {
    let mut stderr = std::io::stderr();
    writeln!(&mut stderr, "{message}")
}

/// Formats an output error message.
fn output_error(stream: &str, error: &std::io::Error) -> String {
    let stream_label = match stream {
        "stdout" => t!("output.stream.stdout"),
        "stderr" => t!("output.stream.stderr"),
        _ => t!("output.stream.unknown"),
    };
    t!("output.write_failed", stream = stream_label, error = error)
}

/// Emits an error message to stderr and returns a failure exit code.
fn emit_error(message: &str) -> ExitCode {
    let _ = write_stderr_line(message);
    ExitCode::FAILURE
}
