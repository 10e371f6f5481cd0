//! Two-press clip export for media players.
//!
//! Press the hotkey once to mark an in-point, again to mark the out-point;
//! the range is stream-copied out of the playing file with ffmpeg and the
//! new file can be put on the clipboard.
//!
//! * `core`: timecodes, filename sanitizing, clip requests
//! * `marks`: the hotkey state machine
//! * `export`: output paths, ffmpeg invocation, clipboard registration
//! * `prefs`: typed access to user preferences
//! * `notify`: transient on-screen notices
//! * `process`: subprocess capability shared by everything that runs programs
//! * `host`: the player boundary and its mpv implementation

pub mod config;
pub mod core;
pub mod export;
pub mod host;
pub mod marks;
pub mod notify;
pub mod prefs;
pub mod process;
