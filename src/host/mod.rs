//! Boundary to the hosting media player.

pub mod mpv;

use std::path::PathBuf;
use async_trait::async_trait;

pub use mpv::{MpvClient, MpvEvent};

/// Error type for player queries
#[derive(Debug, thiserror::Error)]
pub enum PlayerError {
    #[error("IO Error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Player disconnected")]
    Disconnected,
    #[error("Player rejected '{command}': {reason}")]
    Rejected { command: String, reason: String },
    #[error("Unexpected reply for '{0}'")]
    UnexpectedReply(String),
    #[error("Nothing is playing")]
    NothingPlaying,
    #[error("Not a local file: {0}")]
    NotLocal(String),
}

/// What the mark controller needs to know about playback
#[async_trait]
pub trait PlayerQuery: Send + Sync {
    /// Current playback position in seconds
    async fn position_seconds(&self) -> Result<f64, PlayerError>;

    /// Absolute path of the playing file
    async fn source_path(&self) -> Result<PathBuf, PlayerError>;

    /// Filename of the playing file as the player reports it
    async fn source_filename(&self) -> Result<String, PlayerError>;
}
