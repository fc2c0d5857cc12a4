//! Search Indexer Main Entry Point
//!
//! Runs one index lifecycle command against the configured search engine
//! and relational store.

use std::env;
use std::sync::Arc;

use clap::Parser;
use dotenv::dotenv;
use search_indexer::cli::{Cli, Command};
use search_indexer::commands::{self, IndexTarget};
use search_indexer::{Dependencies, IndexingError, Settings};
use search_indexer_repository::SearchIndexProvider;
use search_indexer_shared::all_definitions;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initialize tracing/logging.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new("search_indexer=info,search_indexer_repository=info")
    });

    let json = env::var("LOG_FORMAT")
        .map(|format| format.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    if json {
        // Deployed: one JSON object per event
        tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_target(true)
                    .with_thread_ids(true),
            )
            .init();

        info!(
            service_name = "search-indexer",
            service_version = env!("CARGO_PKG_VERSION"),
            "Tracing initialized with JSON format"
        );
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_target(true).pretty())
            .init();

        info!(
            service_name = "search-indexer",
            service_version = env!("CARGO_PKG_VERSION"),
            "Tracing initialized with console output"
        );
    }
}

/// Exit status for a process stopped by a second interrupt.
const INTERRUPTED_EXIT_CODE: i32 = 130;

/// Cancel `token` on the first Ctrl-C; exit at once on the second.
fn cancel_on_interrupt(token: CancellationToken) {
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_err() {
            return;
        }
        warn!("Interrupt received, cancelling");
        token.cancel();

        if tokio::signal::ctrl_c().await.is_ok() {
            error!("Second interrupt received, exiting");
            std::process::exit(INTERRUPTED_EXIT_CODE);
        }
    });
}

async fn run(cli: Cli, cancel: CancellationToken) -> Result<(), IndexingError> {
    let definitions = all_definitions()?;
    let deps = Dependencies::new(Settings::from_env()).await?;
    let provider: Arc<dyn SearchIndexProvider> = deps.provider.clone();

    match cli.command {
        Command::CreateIndices { force } => {
            commands::create_indices(provider.as_ref(), &definitions, force, &cancel).await
        }
        Command::Index(args) => {
            let pool = deps.connect_database().await?;
            let targets = args
                .entities()
                .into_iter()
                .map(|kind| IndexTarget::new(kind, &definitions, kind.source(pool.clone())))
                .collect::<Result<Vec<_>, _>>()?;

            commands::index(
                provider,
                targets,
                args.mode(),
                args.batch_size as usize,
                &cancel,
            )
            .await?;

            pool.close().await;
            Ok(())
        }
        Command::UpdateAlias { explain, set } => {
            commands::update_alias(
                provider.as_ref(),
                &definitions,
                set.as_deref(),
                explain,
                &cancel,
            )
            .await
        }
        Command::CleanupIndices { explain } => {
            commands::cleanup_indices(provider.as_ref(), &definitions, explain, &cancel).await
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), IndexingError> {
    // Load environment variables from .env file
    dotenv().ok();

    init_tracing();

    let cli = Cli::parse();
    info!(command = ?cli.command, "Starting search indexer");

    let cancel = CancellationToken::new();
    cancel_on_interrupt(cancel.clone());

    match run(cli, cancel).await {
        Ok(()) => {
            info!("Search indexer completed successfully");
            Ok(())
        }
        Err(e) => {
            error!(error = %e, "Search indexer failed");
            Err(e)
        }
    }
}
