//! CLI entrypoint for chatlog-ingest
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

mod logging;
mod trigger;

use anyhow::{Result, bail};
use chatlog_application::{
    DedupLedger, DocumentSink, InMemoryLedger, NoRunProgress, RunIngestionUseCase,
    RunProgressNotifier,
};
use chatlog_infrastructure::{
    ConfigLoader, ElasticsearchSink, FileConfig, FileLedger, FsSourceScanner, InMemorySink,
    JsonFileReader,
};
use chatlog_presentation::{
    Cli, ConsoleFormatter, OutputFormat, ProgressMode, ProgressReporter, RunMode, SimpleProgress,
};
use clap::Parser;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use trigger::{Trigger, shutdown_signal};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.show_config {
        ConfigLoader::print_config_sources(cli.config.as_ref());
        return Ok(());
    }

    // === Configuration ===
    if let Some(path) = &cli.config
        && !path.exists()
    {
        bail!("Config file not found: {}", path.display());
    }
    let mut config = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_ref())?
    };
    if let Some(max_files) = cli.max_files {
        config.ingest.max_files_per_batch = max_files;
    }

    let _log_guard = logging::init_tracing(&config.logging, cli.verbose)?;
    info!("Starting chatlog-ingest");

    for issue in config.ensure_valid()? {
        warn!("Config: {}", issue.message);
    }

    // === Dependency Injection ===
    let scanner = Arc::new(FsSourceScanner::from_config(&config.source));
    let reader = Arc::new(JsonFileReader);
    let progress: Arc<dyn RunProgressNotifier> = match cli.progress_mode() {
        ProgressMode::Hidden => Arc::new(NoRunProgress),
        ProgressMode::Bar => Arc::new(ProgressReporter::new()),
        ProgressMode::Lines => Arc::new(SimpleProgress),
    };

    if let Some(user_id) = &cli.search_user {
        return search(&config, user_id, cli.size, cli.output).await;
    }

    let ledger = FileLedger::open(&config.ingest.ledger_path)?;

    if cli.dry_run {
        // Throwaway copy: nothing reaches the ledger file or the index.
        let ledger = InMemoryLedger::from_keys(ledger.entries());
        let sink = Arc::new(InMemorySink::new(config.sink.index_name.clone()));
        let use_case = RunIngestionUseCase::new(
            ledger,
            scanner,
            reader,
            sink.clone(),
            config.ingest.to_ingest_params(),
        );
        let trigger = Trigger::new(use_case, progress, cli.output, CancellationToken::new());
        trigger.run_once().await?;
        print_documents("Dry run: documents that would be indexed", &sink.documents(), cli.output);
        return Ok(());
    }

    let sink = Arc::new(ElasticsearchSink::new(config.sink.to_elasticsearch_config())?);
    match sink.ping().await {
        Ok(()) => info!("Connected to {}", sink.base_url()),
        Err(e) => warn!("Sink not reachable yet, runs will retry: {}", e),
    }

    let use_case = RunIngestionUseCase::new(
        ledger,
        scanner,
        reader,
        sink,
        config.ingest.to_ingest_params(),
    );

    let token = CancellationToken::new();
    let signal_token = token.clone();
    tokio::spawn(async move {
        shutdown_signal().await;
        info!("Shutdown signal received");
        signal_token.cancel();
    });

    let trigger = Trigger::new(use_case, progress, cli.output, token);
    run_mode(&trigger, &config, cli.mode()).await
}

async fn run_mode<L: DedupLedger + Sync + 'static>(
    trigger: &Trigger<L>,
    config: &FileConfig,
    mode: RunMode,
) -> Result<()> {
    match mode {
        RunMode::Once => match trigger.run_once().await {
            Ok(_) => Ok(()),
            Err(e) if e.is_cancelled() => {
                warn!("Run cancelled before completion");
                Ok(())
            }
            Err(e) => Err(e.into()),
        },
        RunMode::Schedule => {
            trigger.run_scheduled(config.ingest.interval()).await;
            Ok(())
        }
        RunMode::Watch => {
            trigger
                .run_watcher(config.ingest.poll_interval(), config.ingest.interval())
                .await;
            Ok(())
        }
    }
}

async fn search(config: &FileConfig, user_id: &str, size: usize, output: OutputFormat) -> Result<()> {
    let sink = ElasticsearchSink::new(config.sink.to_elasticsearch_config())?;
    let documents = sink.search_by_user(user_id, size).await?;
    print_documents(&format!("Latest documents for {}", user_id), &documents, output);
    Ok(())
}

fn print_documents(
    title: &str,
    documents: &[chatlog_domain::IngestDocument],
    output: OutputFormat,
) {
    let text = match output {
        OutputFormat::Text => ConsoleFormatter::format_hits(title, documents),
        OutputFormat::Json => ConsoleFormatter::format_hits_json(documents),
    };
    println!("{}", text);
}
