//! Core types for clip marking.
//!
//! This module provides the pure pieces of the exporter: timecode
//! formatting, filename sanitizing and the clip request derived from two
//! marks. Nothing here touches the filesystem or spawns processes.

pub mod clip;
pub mod name;
pub mod time;

// Re-export core data structures for easier access.
pub use clip::ClipRequest;
pub use name::{extension_from_filename, sanitize_base_name};
pub use time::{clamp_seconds, format_timecode};
