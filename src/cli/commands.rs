//! CLI command dispatch
//!
//! Builds settings and provider handles once, then hands off to the
//! relevant pipeline. Configuration problems abort here, before any
//! network call.

use std::path::Path;
use std::sync::Arc;

use crate::backend::{GeminiClient, GenerationBackend, OpenAiClient};
use crate::config::Settings;
use crate::content::{ContentSource, StaticSource};
use crate::explain::AudienceTier;
use crate::media::DeepfakeDetector;
use crate::observability::{log_event, Event};
use crate::pipeline::{MemoryStore, Orchestrator};

use super::args::{Cli, Command};
use super::errors::{CliError, CliResult};
use super::io::{read_content_items, write_json};

/// Parse arguments and run the selected command to completion
pub fn run() -> CliResult<()> {
    let cli = Cli::parse_args();
    let runtime = tokio::runtime::Runtime::new().map_err(|e| CliError::Runtime(e.to_string()))?;
    runtime.block_on(run_command(cli.command))
}

/// Execute one CLI command
pub async fn run_command(command: Command) -> CliResult<()> {
    let settings = Settings::from_env()?;
    log_event(Event::ConfigLoaded);

    let primary: Arc<dyn GenerationBackend> = Arc::new(GeminiClient::new(&settings));
    let secondary: Arc<dyn GenerationBackend> = Arc::new(OpenAiClient::new(&settings));

    match command {
        Command::Verify { text, audience } => {
            let orchestrator = build_orchestrator(&settings, primary, secondary, Vec::new());
            let outcome = orchestrator
                .verify_custom_claim(&text, AudienceTier::parse_or_general(&audience))
                .await;
            write_json(&outcome)
        }

        Command::Analyze { file, no_consensus } => {
            let detector =
                DeepfakeDetector::new(primary, secondary, settings.enable_consensus_mode);

            if is_video(&file) {
                let report = detector.analyze_video(&file).await?;
                write_json(&report)
            } else {
                let (result, _) = detector.analyze_image(&file, !no_consensus).await;
                write_json(&result)
            }
        }

        Command::Cycle => {
            let sources = piped_sources()?;
            let orchestrator = build_orchestrator(&settings, primary, secondary, sources);
            let stats = orchestrator.run_cycle().await;
            write_json(&stats)
        }

        Command::Monitor => {
            let sources = piped_sources()?;
            let orchestrator = build_orchestrator(&settings, primary, secondary, sources);
            orchestrator.start_monitoring().await;
            Ok(())
        }
    }
}

fn build_orchestrator(
    settings: &Settings,
    primary: Arc<dyn GenerationBackend>,
    secondary: Arc<dyn GenerationBackend>,
    sources: Vec<Box<dyn ContentSource>>,
) -> Orchestrator {
    Orchestrator::new(
        settings,
        primary,
        secondary,
        sources,
        Arc::new(MemoryStore::new()),
    )
}

/// Content items piped in on stdin become a single static source
fn piped_sources() -> CliResult<Vec<Box<dyn ContentSource>>> {
    let items = read_content_items()?;
    if items.is_empty() {
        return Ok(Vec::new());
    }
    Ok(vec![Box::new(StaticSource::new("stdin", items))])
}

fn is_video(path: &Path) -> bool {
    matches!(
        path.extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_lowercase())
            .as_deref(),
        Some("mp4" | "mov" | "avi" | "mkv" | "webm")
    )
}
