//! Hotkey controller coordinating marks and exports.

use std::sync::{Arc, Mutex, MutexGuard};
use crate::core::time::{clamp_seconds, format_timecode};
use crate::core::ClipRequest;
use crate::export::{ExportOutcome, ExportPipeline};
use crate::host::{PlayerError, PlayerQuery};
use crate::marks::state::MarkState;
use crate::notify::{durations, Notice, Notifier};

/// What a single hotkey press did
#[derive(Debug, Clone, PartialEq)]
pub enum PressOutcome {
    /// In-point recorded
    Armed { start: f64 },
    /// Out-point not after the in-point; mark dropped without a notice
    Discarded { start: f64, end: f64 },
    /// Export attempted
    Exported(ExportOutcome),
    /// The player could not answer
    Unavailable(String),
}

/// Two-press clip controller bound to one hotkey
///
/// The first press records the playback position as the in-point. The
/// second press takes the out-point and, if it lies after the in-point,
/// exports the range. The pending mark lives only in this controller and
/// is consumed before any await on the second press, so the controller is
/// `Idle` again however the export ends.
pub struct MarkController {
    player: Arc<dyn PlayerQuery>,
    pipeline: ExportPipeline,
    notifier: Notifier,
    state: Mutex<MarkState>,
}

impl MarkController {
    pub fn new(player: Arc<dyn PlayerQuery>, pipeline: ExportPipeline, notifier: Notifier) -> Self {
        Self {
            player,
            pipeline,
            notifier,
            state: Mutex::new(MarkState::Idle),
        }
    }

    fn lock_state(&self) -> MutexGuard<'_, MarkState> {
        match self.state.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    /// Current state
    pub fn state(&self) -> MarkState {
        *self.lock_state()
    }

    /// Hotkey handler. Always consumes the key.
    pub async fn on_hotkey(&self) -> bool {
        match self.press().await {
            PressOutcome::Exported(outcome) if outcome.is_success() => {
                log::info!("Export finished: {:?}", outcome)
            }
            PressOutcome::Exported(outcome) => log::warn!("Export did not complete: {:?}", outcome),
            outcome => log::debug!("Hotkey press: {:?}", outcome),
        }
        true
    }

    /// Handle one press and report what happened
    pub async fn press(&self) -> PressOutcome {
        let position = match self.player.position_seconds().await {
            Ok(position) => clamp_seconds(position),
            Err(e) => {
                log::warn!("Ignoring hotkey, no playback position: {}", e);
                return PressOutcome::Unavailable(e.to_string());
            }
        };

        let previous = self.lock_state().press(position);
        let Some(start) = previous else {
            log::info!("Start mark at {:.3}s", position);
            self.notifier
                .notify(Notice::info("Start set", format_timecode(position), durations::START_SET));
            return PressOutcome::Armed { start: position };
        };

        if !(position > start) {
            log::info!("End {:.3}s is not after start {:.3}s, mark discarded", position, start);
            return PressOutcome::Discarded { start, end: position };
        }

        let request = match self.build_request(start, position).await {
            Ok(Some(request)) => request,
            Ok(None) => return PressOutcome::Discarded { start, end: position },
            Err(e) => {
                log::error!("Cannot export, player query failed: {}", e);
                self.notifier
                    .notify(Notice::error("Execution error", e.to_string(), durations::FAILED));
                return PressOutcome::Unavailable(e.to_string());
            }
        };

        PressOutcome::Exported(self.pipeline.export(&request).await)
    }

    async fn build_request(&self, start: f64, end: f64) -> Result<Option<ClipRequest>, PlayerError> {
        let source_path = self.player.source_path().await?;
        let source_filename = self.player.source_filename().await?;
        Ok(ClipRequest::new(start, end, source_path, source_filename))
    }
}
