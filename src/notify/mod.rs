//! Transient on-screen notices.
//!
//! A [`Notifier`] shows a notice on a [`NotificationSurface`] and schedules
//! its dismissal. Showing a new notice cancels the pending dismissal of the
//! previous one, so an old timer never hides a newer message.

use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::task::JoinHandle;

/// Display durations in milliseconds
pub mod durations {
    pub const START_SET: u64 = 2600;
    pub const ENCODER_MISSING: u64 = 5000;
    pub const EXPORTING: u64 = 2000;
    pub const SAVED: u64 = 5200;
    pub const FAILED: u64 = 6500;
}

/// A message to show to the user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub title: String,
    pub detail: String,
    pub is_error: bool,
    pub duration_ms: u64,
}

impl Notice {
    pub fn info(title: impl Into<String>, detail: impl Into<String>, duration_ms: u64) -> Self {
        Self {
            title: title.into(),
            detail: detail.into(),
            is_error: false,
            duration_ms,
        }
    }

    pub fn error(title: impl Into<String>, detail: impl Into<String>, duration_ms: u64) -> Self {
        Self {
            title: title.into(),
            detail: detail.into(),
            is_error: true,
            duration_ms,
        }
    }

    /// Single-line rendering for plain-text surfaces and logs
    pub fn text(&self) -> String {
        if self.detail.is_empty() {
            self.title.clone()
        } else {
            format!("{}\n{}", self.title, self.detail)
        }
    }
}

/// Where notices are drawn
///
/// Both calls are fire-and-forget; a surface that cannot draw should log
/// and return.
pub trait NotificationSurface: Send + Sync {
    fn show(&self, notice: &Notice);
    fn hide(&self);
}

/// Schedules notices and their dismissal on a surface
#[derive(Clone)]
pub struct Notifier {
    surface: Arc<dyn NotificationSurface>,
    dismiss: Arc<Mutex<Option<JoinHandle<()>>>>,
}

impl Notifier {
    pub fn new(surface: Arc<dyn NotificationSurface>) -> Self {
        Self {
            surface,
            dismiss: Arc::new(Mutex::new(None)),
        }
    }

    /// Show `notice` now and hide it after its duration.
    /// Must be called from within a tokio runtime.
    pub fn notify(&self, notice: Notice) {
        if notice.is_error {
            log::warn!("notice: {}", notice.text().replace('\n', ": "));
        } else {
            log::info!("notice: {}", notice.text().replace('\n', ": "));
        }

        let mut pending = match self.dismiss.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        if let Some(previous) = pending.take() {
            previous.abort();
        }

        self.surface.show(&notice);

        let surface = Arc::clone(&self.surface);
        let delay = Duration::from_millis(notice.duration_ms);
        *pending = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            surface.hide();
        }));
    }
}


#[cfg(test)]
mod tests {
    use super::testing::{RecordingSurface, SurfaceEvent};
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_hides_after_duration() {
        let surface = Arc::new(RecordingSurface::default());
        let notifier = Notifier::new(surface.clone());

        notifier.notify(Notice::info("Start set", "00-00-10", 1000));
        tokio::time::sleep(Duration::from_millis(999)).await;
        assert_eq!(surface.events().len(), 1);

        tokio::time::sleep(Duration::from_millis(2)).await;
        assert_eq!(surface.events().last(), Some(&SurfaceEvent::Hide));
    }

    #[tokio::test(start_paused = true)]
    async fn test_new_notice_cancels_stale_dismiss() {
        let surface = Arc::new(RecordingSurface::default());
        let notifier = Notifier::new(surface.clone());

        notifier.notify(Notice::info("Exporting (fast)", "", 2000));
        tokio::time::sleep(Duration::from_millis(500)).await;
        notifier.notify(Notice::info("Saved", "/tmp/a.mp4", 5200));

        // first timer would have fired here
        tokio::time::sleep(Duration::from_millis(2000)).await;
        assert!(!surface.events().contains(&SurfaceEvent::Hide));

        tokio::time::sleep(Duration::from_millis(3300)).await;
        let events = surface.events();
        assert_eq!(events.iter().filter(|e| **e == SurfaceEvent::Hide).count(), 1);
        assert_eq!(events.last(), Some(&SurfaceEvent::Hide));
    }

    #[test]
    fn test_notice_text() {
        assert_eq!(Notice::info("Saved", "", 1).text(), "Saved");
        let err = Notice::error("Export failed", "code 1", 1);
        assert!(err.is_error);
        assert_eq!(err.text(), "Export failed\ncode 1");
    }
}
