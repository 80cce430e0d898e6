mod app;
mod form;

use anyhow::{bail, Result};
use std::{
    fs::{self, OpenOptions},
    path::PathBuf,
    time::Duration,
};

use slotscope_core::{
    config::{self, AppConfig},
    resource::{collector::CollectEvent, DatasetLoader, GameCollector},
};
use tokio::sync::mpsc;
use tracing::error;
use tracing_subscriber::{prelude::*, EnvFilter};

use crate::app::{DataEvent, SlotscopeApp};

#[tokio::main]
async fn main() -> Result<()> {
    init_logging()?;

    config::ensure_default_config()?;
    let config = AppConfig::load()?;

    let mut args = std::env::args().skip(1);
    match args.next().as_deref() {
        None => run_dashboard(config).await,
        Some("collect") => collect(config, args.next().map(PathBuf::from)).await,
        Some(other) => bail!("unknown command '{other}' (usage: slotscope [collect [OUTPUT]])"),
    }
}

async fn run_dashboard(config: AppConfig) -> Result<()> {
    let loader = DatasetLoader::from_config(&config)?;
    let (data_tx, data_rx) = mpsc::channel(4);

    let games_loader = loader.clone();
    let games_tx = data_tx.clone();
    tokio::spawn(async move {
        let games = games_loader.games().await;
        if games_tx.send(DataEvent::Games(games)).await.is_err() {
            error!("Dashboard closed before games finished loading");
        }
    });
    tokio::spawn(async move {
        let pots = loader.pots().await;
        if data_tx.send(DataEvent::Pots(pots)).await.is_err() {
            error!("Dashboard closed before pots finished loading");
        }
    });

    let mut app = SlotscopeApp::new(config);
    app.attach_data(data_rx);
    app.run().await
}

async fn collect(config: AppConfig, output: Option<PathBuf>) -> Result<()> {
    let mut settings = config.collector.clone();
    if let Some(output) = output {
        settings.output = output;
    }
    let output = settings.output.clone();
    let collector =
        GameCollector::new(settings, Duration::from_secs(config.request_timeout_secs))?;

    let (event_tx, mut event_rx) = mpsc::channel(16);
    let progress = tokio::spawn(async move {
        while let Some(event) = event_rx.recv().await {
            match event {
                CollectEvent::Page {
                    page,
                    records,
                    total,
                } => println!("Fetched page {page} ({records} games, {total} total)"),
                CollectEvent::Error(err) => eprintln!("Stopped early: {err:#}"),
                CollectEvent::Finished(manifest) => println!(
                    "Collected {} games from {} pages",
                    manifest.records, manifest.pages
                ),
            }
        }
    });

    let manifest = collector.run(event_tx).await?;
    let _ = progress.await;
    println!("Wrote {}", output.display());
    if manifest.records == 0 {
        bail!("no games were collected from {}", manifest.source);
    }
    Ok(())
}

fn init_logging() -> Result<()> {
    let log_dir = std::env::current_dir()?.join("logs");
    fs::create_dir_all(&log_dir)?;
    let log_path = log_dir.join("slotscope.log");
    let log_file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)?;

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let file_layer = tracing_subscriber::fmt::layer()
        .with_target(true)
        .with_ansi(false)
        .compact()
        .with_writer(std::sync::Mutex::new(log_file));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer)
        .init();

    Ok(())
}
