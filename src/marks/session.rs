//! Hotkey event loop.

use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinSet;
use crate::host::MpvEvent;
use crate::marks::MarkController;

/// Handle mark presses until the player goes away
///
/// Every press runs as its own task, so a slow export never delays the
/// next in-point. After `Shutdown` (or a closed channel) no new presses
/// are taken, but presses already running are awaited: an encoder still
/// writing a clip finishes and reports before this returns.
pub async fn serve(controller: Arc<MarkController>, mut events: mpsc::UnboundedReceiver<MpvEvent>) {
    let mut presses = JoinSet::new();

    loop {
        tokio::select! {
            event = events.recv() => match event {
                None | Some(MpvEvent::Shutdown) => break,
                Some(event) if event.is_mark_press() => {
                    let controller = Arc::clone(&controller);
                    presses.spawn(async move { controller.on_hotkey().await });
                }
                Some(_) => {}
            },
            Some(joined) = presses.join_next(), if !presses.is_empty() => reap(joined),
        }
    }

    if !presses.is_empty() {
        log::info!("Player closed, waiting for {} running press(es)", presses.len());
    }
    while let Some(joined) = presses.join_next().await {
        reap(joined);
    }
}

fn reap(joined: Result<bool, tokio::task::JoinError>) {
    if let Err(e) = joined {
        log::error!("Hotkey task did not finish: {}", e);
    }
}
