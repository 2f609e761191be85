mod catalog;
mod classifier;
mod cli;
mod clock;
mod db;
mod debounce;
mod input;
mod metrics;
mod notify;
mod pipeline;
mod resolver;
mod settings;
mod utils;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use tokio::io::{AsyncBufRead, BufReader};
use tokio_util::sync::CancellationToken;

pub use catalog::{CatalogError, ShortcutCatalog, ShortcutEntry};
pub use classifier::{
    ActionCandidate, ActionClassifier, ActionLabel, ClassifierConfig, ElementLocator,
    PatternRule, RegionLabel, Verdict,
};
pub use clock::{Clock, ManualClock, MonotonicClock};
pub use db::{Database, EventRecord, EventStore, StoreError, StoreRecord, TipOutcome, TipRecord};
pub use debounce::{DebounceConfig, Debouncer, Decision, KeyState, NotificationKey};
pub use input::{
    replay::{replay_lines, ReplayStats},
    AppContext, EventCategory, NormalizedEvent, Normalizer, RawEventKind, RawInputEvent,
    UNKNOWN_APP,
};
pub use metrics::{Counter, MetricsCollector, MetricsSnapshot, PipelineCounters};
pub use notify::{spawn_toast_worker, ChannelNotifier, LogNotifier, Notifier, Toast};
pub use pipeline::{InputSender, Pipeline, PipelineConfig, PipelineController, PipelineOutcome};
pub use resolver::{ResolvedTip, TipResolver};
pub use settings::{CoachSettings, SettingsStore};

use cli::Cli;
use utils::logging::debug_mode_from_env;

const ENABLE_LOGS: bool = true;

const TOAST_QUEUE_CAPACITY: usize = 16;

pub fn run() -> Result<()> {
    // Initialize logging (reads RUST_LOG env var)
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();

    let cli = Cli::parse();

    log_info!("Shortcut Coach starting up...");

    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("failed to build tokio runtime")?
        .block_on(run_with(cli))
}

fn default_data_dir() -> Result<PathBuf> {
    dirs::data_dir()
        .map(|dir| dir.join("shortcut-coach"))
        .ok_or_else(|| anyhow!("no data directory on this platform, pass --data-dir"))
}

fn load_catalog(path: Option<&Path>) -> Result<ShortcutCatalog> {
    let catalog = match path {
        Some(path) => ShortcutCatalog::load(path)
            .with_context(|| format!("failed to load catalog {}", path.display()))?,
        None => ShortcutCatalog::builtin().context("builtin catalog is invalid")?,
    };
    log_info!("catalog ready with {} shortcuts", catalog.len());
    Ok(catalog)
}

async fn run_with(cli: Cli) -> Result<()> {
    let data_dir = match cli.data_dir.clone() {
        Some(dir) => dir,
        None => default_data_dir()?,
    };
    std::fs::create_dir_all(&data_dir)
        .with_context(|| format!("failed to create data directory {}", data_dir.display()))?;

    let settings_store = SettingsStore::new(data_dir.join("settings.json"))?;
    let settings = settings_store.get();

    let catalog_path = cli.catalog.clone().or_else(|| settings.catalog_path.clone());
    let catalog = load_catalog(catalog_path.as_deref())?;

    if let Some(query) = &cli.search {
        print_entries(&catalog.search(query));
        return Ok(());
    }
    if let Some(app) = &cli.list {
        print_entries(&catalog.entries_for(app));
        return Ok(());
    }

    let database = Database::new(data_dir.join("shortcut-coach.sqlite3"))?;

    if cli.summary {
        return print_summary(&database).await;
    }

    let clock: Arc<dyn Clock> = Arc::new(MonotonicClock::new());
    let metrics = MetricsCollector::new();

    let (notifier, toast_rx) = ChannelNotifier::new(TOAST_QUEUE_CAPACITY);
    let toast_worker = spawn_toast_worker(toast_rx, Box::new(LogNotifier));

    let pipeline = Pipeline::new(
        &settings,
        Arc::new(catalog),
        Arc::clone(&clock),
        Arc::new(notifier),
    )
    .with_store(Arc::new(database.clone()))
    .with_metrics(metrics.clone())
    .with_debug(debug_mode_from_env());
    let run_id = pipeline.run_id().to_string();

    let mut controller = PipelineController::new();
    let sender = controller.start(pipeline)?;

    let cancel_token = CancellationToken::new();
    {
        let cancel_token = cancel_token.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                log_info!("interrupt received, shutting down");
                cancel_token.cancel();
            }
        });
    }

    let reader = open_replay(&cli.replay).await?;
    let replay_result = replay_lines(reader, &sender, clock.as_ref(), !cli.fast, &cancel_token).await;
    drop(sender);

    // Stop even if replay failed so queued events and writes are not lost.
    let pipeline = controller.stop().await?;
    drop(pipeline);
    match toast_worker.await {
        Ok(shown) => log_info!("{shown} tips displayed"),
        Err(err) => log_warn!("toast worker failed: {err}"),
    }
    database.flush().await?;

    let snapshot = metrics.get_snapshot().await;
    log_info!(
        "run {run_id} finished: {}",
        serde_json::to_string(&snapshot).unwrap_or_default()
    );

    replay_result.map(|_| ())
}

async fn open_replay(source: &str) -> Result<Box<dyn AsyncBufRead + Unpin + Send>> {
    if source == "-" {
        return Ok(Box::new(BufReader::new(tokio::io::stdin())));
    }
    let file = tokio::fs::File::open(source)
        .await
        .with_context(|| format!("failed to open replay file {source}"))?;
    Ok(Box::new(BufReader::new(file)))
}

fn print_entries(entries: &[&ShortcutEntry]) {
    if entries.is_empty() {
        println!("no matching shortcuts");
        return;
    }
    for entry in entries {
        println!(
            "{:<10} {:<28} {:<32} {}",
            entry.app_context, entry.action_label, entry.key_combo, entry.tip_text
        );
    }
}

async fn print_summary(database: &Database) -> Result<()> {
    let summary = database.tip_summary().await?;
    if summary.is_empty() {
        println!("no tips recorded yet");
        return Ok(());
    }
    println!("{:<28} {:>6} {:>10}", "action", "shown", "suppressed");
    for row in summary {
        println!("{:<28} {:>6} {:>10}", row.action, row.shown, row.suppressed);
    }

    println!();
    for tip in database.recent_tips(10).await? {
        println!(
            "{}  {:<22} {:<12} {}",
            tip.recorded_at.format("%Y-%m-%d %H:%M:%S"),
            tip.outcome,
            tip.app_context,
            tip.tip_text
        );
    }
    Ok(())
}
