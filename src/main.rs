//! Main application entry point.
//!
//! Attaches to a running mpv (`mpv --input-ipc-server=/tmp/mpv-socket`),
//! binds the clip hotkey and handles presses until mpv quits. Exports
//! still running at that point are finished before the process exits.

use std::path::PathBuf;
use std::sync::Arc;
use clipmark::config::{self, ClipmarkConfig};
use clipmark::export::ExportPipeline;
use clipmark::host::{MpvClient, PlayerError};
use clipmark::marks::{self, MarkController};
use clipmark::notify::Notifier;
use clipmark::prefs::{Preferences, YamlPreferences};
use clipmark::process::SystemRunner;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("clipmark starting up");

    let config_path = config::config_path();
    let config = config::load_config(&config_path);

    if let Err(e) = run(config, config_path).await {
        log::error!("clipmark stopped: {}", e);
        std::process::exit(1);
    }
}

async fn run(config: ClipmarkConfig, config_path: PathBuf) -> Result<(), PlayerError> {
    let (client, events) = MpvClient::connect(&config.socket_path).await?;
    let client = Arc::new(client);
    client.bind_hotkey(&config.hotkey).await?;

    let notifier = Notifier::new(client.clone());
    let prefs = Preferences::new(Arc::new(YamlPreferences::new(config_path)));
    let pipeline = ExportPipeline::new(Arc::new(SystemRunner), prefs, notifier.clone());
    let controller = Arc::new(MarkController::new(client.clone(), pipeline, notifier));

    marks::serve(controller, events).await;

    log::info!("mpv went away, exiting");
    Ok(())
}
