mod api;
mod cli;
mod config;
mod error;
mod jobs;
mod llama;
mod split_plan;
mod ui;

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use cli::{Cli, Command};
use config::AutosplitConfig;
use error::AutosplitError;
use jobs::{JobRunner, JobStatus, JobStore, SplitOptions};
use llama::LlamaClient;
use split_plan::SplitPlan;
use ui::JobProgress;

const CLI_POLL_INTERVAL: Duration = Duration::from_millis(200);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let default_filter = if cli.verbose {
        "autosplit=debug,tower_http=debug"
    } else {
        "autosplit=info,tower_http=info"
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = match &cli.config {
        Some(path) => AutosplitConfig::load_from(path)?,
        None => AutosplitConfig::load()?,
    };
    config.require_api_key()?;

    let store = Arc::new(JobStore::new());
    let runner = Arc::new(build_runner(&config, Arc::clone(&store))?);

    match cli.command {
        Command::Serve { bind } => {
            serve(runner, &config, bind).await?;
            tracing::info!("Shutting down with {} jobs recorded", store.len());
            Ok(())
        }
        Command::Split {
            file,
            category_description,
        } => split(&runner, &file, category_description).await,
    }
}

fn build_runner(
    config: &AutosplitConfig,
    store: Arc<JobStore>,
) -> Result<JobRunner, AutosplitError> {
    let client = LlamaClient::from_config(config)?;
    Ok(JobRunner::new(store, Arc::new(client)))
}

async fn serve(
    runner: Arc<JobRunner>,
    config: &AutosplitConfig,
    bind: Option<String>,
) -> anyhow::Result<()> {
    let addr = bind.unwrap_or_else(|| config.bind_addr.clone());
    let app = api::create_router(runner, config.max_upload_bytes);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind to {addr}"))?;
    tracing::info!("Listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!("Failed to listen for shutdown signal: {}", e);
            }
        })
        .await
        .context("server error")?;
    Ok(())
}

async fn split(
    runner: &JobRunner,
    file: &Path,
    category_description: Option<String>,
) -> anyhow::Result<()> {
    let content = tokio::fs::read(file)
        .await
        .with_context(|| format!("failed to read {}", file.display()))?;

    let defaults = SplitOptions::default();
    let file_name = file
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or(defaults.file_name);
    let options = SplitOptions {
        file_name: file_name.clone(),
        content_type: defaults.content_type,
        category_description,
        file_id: None,
    };

    let id = runner.submit(content, options);
    tracing::debug!("Submitted job {} for {}", id, file_name);

    let progress = JobProgress::start(&file_name);
    let job = runner
        .wait_for_terminal(&id, CLI_POLL_INTERVAL, |status| progress.update_status(status))
        .await?;
    progress.complete(&job);

    if job.status == JobStatus::Failed {
        anyhow::bail!(
            "job {} failed: {}",
            id,
            job.error_message.as_deref().unwrap_or("unknown error")
        );
    }

    match SplitPlan::for_job(&job) {
        Ok(plan) => progress.print_plan(&plan),
        Err(e) => tracing::warn!("No split plan for {}: {}", file_name, e),
    }
    Ok(())
}
