//! Export pipeline for cutting a marked range into its own file.

use std::path::PathBuf;
use std::sync::Arc;
use crate::core::ClipRequest;
use crate::export::clipboard;
use crate::export::encoder::{EncodeError, Encoder, INSTALL_HINT};
use crate::export::paths;
use crate::notify::{durations, Notice, Notifier};
use crate::prefs::{PreferenceSnapshot, Preferences};
use crate::process::CommandRunner;

/// Error type for export operations
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("Encode error: {0}")]
    Encode(#[from] EncodeError),
    #[error("Filesystem error: {0}")]
    Filesystem(String),
}

/// Result of one export attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportOutcome {
    Success {
        output_path: PathBuf,
        copied_to_clipboard: bool,
    },
    EncoderMissing,
    EncoderFailed {
        exit_code: Option<i32>,
        stderr: String,
    },
    FilesystemError {
        detail: String,
    },
    LaunchError {
        detail: String,
    },
}

impl ExportOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, ExportOutcome::Success { .. })
    }

    /// What to tell the user
    pub fn notice(&self) -> Notice {
        match self {
            ExportOutcome::Success { output_path, copied_to_clipboard } => {
                let title = if *copied_to_clipboard { "Saved & copied" } else { "Saved" };
                Notice::info(title, output_path.to_string_lossy(), durations::SAVED)
            }
            ExportOutcome::EncoderMissing => {
                Notice::error("ffmpeg not found", INSTALL_HINT, durations::ENCODER_MISSING)
            }
            ExportOutcome::EncoderFailed { exit_code, stderr } => {
                let detail = if !stderr.trim().is_empty() {
                    stderr.clone()
                } else {
                    match exit_code {
                        Some(code) => format!("code {}", code),
                        None => "terminated by signal".to_string(),
                    }
                };
                Notice::error("Export failed", detail, durations::FAILED)
            }
            ExportOutcome::FilesystemError { detail } | ExportOutcome::LaunchError { detail } => {
                Notice::error("Execution error", detail.clone(), durations::FAILED)
            }
        }
    }
}

impl From<ExportError> for ExportOutcome {
    fn from(e: ExportError) -> Self {
        match e {
            ExportError::Encode(EncodeError::Missing) => ExportOutcome::EncoderMissing,
            ExportError::Encode(EncodeError::Failed { code, stderr }) => ExportOutcome::EncoderFailed {
                exit_code: code,
                stderr,
            },
            ExportError::Encode(EncodeError::Launch(detail)) => ExportOutcome::LaunchError { detail },
            ExportError::Filesystem(detail) => ExportOutcome::FilesystemError { detail },
        }
    }
}

/// Cuts clip requests with ffmpeg and reports the result
///
/// Each call to [`ExportPipeline::export`]:
/// 1. Reads preferences fresh
/// 2. Resolves the output directory (custom template or source dir)
/// 3. Locates ffmpeg; stops with `EncoderMissing` before running anything
/// 4. Creates the output directory
/// 5. Runs a stream copy, overwriting any previous clip at the same path
/// 6. Optionally registers the clip on the clipboard (best effort)
///
/// Errors never escape: every path ends in exactly one [`ExportOutcome`] and
/// one user notice.
#[derive(Clone)]
pub struct ExportPipeline {
    runner: Arc<dyn CommandRunner>,
    prefs: Preferences,
    notifier: Notifier,
}

impl ExportPipeline {
    /// Create a new export pipeline
    pub fn new(runner: Arc<dyn CommandRunner>, prefs: Preferences, notifier: Notifier) -> Self {
        Self {
            runner,
            prefs,
            notifier,
        }
    }

    /// Export `request`, notify the user, and return what happened
    pub async fn export(&self, request: &ClipRequest) -> ExportOutcome {
        let prefs = self.prefs.snapshot().await;

        let outcome = match self.run(request, &prefs).await {
            Ok((output_path, copied_to_clipboard)) => ExportOutcome::Success {
                output_path,
                copied_to_clipboard,
            },
            Err(e) => {
                log::error!("Export of {:?} failed: {}", request.source_path, e);
                e.into()
            }
        };

        self.notifier.notify(outcome.notice());
        outcome
    }

    async fn run(
        &self,
        request: &ClipRequest,
        prefs: &PreferenceSnapshot,
    ) -> Result<(PathBuf, bool), ExportError> {
        let runner = self.runner.as_ref();

        let output_dir = paths::resolve_output_dir(runner, request, prefs).await;
        let output_path = request.output_path_in(&output_dir);

        let encoder = Encoder::locate(runner).ok_or(EncodeError::Missing)?;

        paths::ensure_dir(runner, &output_dir)
            .await
            .map_err(|e| ExportError::Filesystem(e.to_string()))?;

        self.notifier
            .notify(Notice::info("Exporting (fast)", "", durations::EXPORTING));

        encoder.cut(runner, request, &output_path).await?;
        log::info!("Saved clip {:?}", output_path);

        let copied = prefs.copy_to_clipboard && self.copy_to_clipboard(&output_path).await;
        Ok((output_path, copied))
    }

    async fn copy_to_clipboard(&self, output_path: &std::path::Path) -> bool {
        match clipboard::copy_file(self.runner.as_ref(), output_path).await {
            Ok(()) => true,
            Err(e) => {
                log::warn!("Clipboard copy failed (ignored): {}", e);
                false
            }
        }
    }
}
