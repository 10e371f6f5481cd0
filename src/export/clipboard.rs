//! Clipboard file registration.
//!
//! Puts the exported file itself (not its path as text) on the general
//! pasteboard through AppKit, so pasting in Finder copies the clip. Other
//! platforms have no helper; the launch failure is swallowed by the caller.

use std::path::Path;
use crate::process::{CommandRunner, ProcessError};

pub const OSASCRIPT: &str = "/usr/bin/osascript";

/// Escape `s` for use inside an AppleScript string literal.
/// Line breaks cannot appear in a path literal and are dropped.
pub fn escape_applescript(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\r' | '\n' => {}
            c => out.push(c),
        }
    }
    out
}

/// osascript arguments registering `path` as a file URL on the pasteboard
pub fn register_args(path: &Path) -> Vec<String> {
    let path = escape_applescript(&path.to_string_lossy());
    let script = [
        "use framework \"AppKit\"".to_string(),
        "use framework \"Foundation\"".to_string(),
        format!("set thePath to \"{}\"", path),
        "set pb to current application's NSPasteboard's generalPasteboard()".to_string(),
        "pb's clearContents()".to_string(),
        "set fileURL to current application's NSURL's fileURLWithPath:thePath".to_string(),
        "pb's writeObjects:{fileURL}".to_string(),
    ];

    let mut args = vec!["-l".to_string(), "AppleScript".to_string()];
    for line in script {
        args.push("-e".to_string());
        args.push(line);
    }
    args
}

/// Place `path` on the clipboard as a file
pub async fn copy_file(runner: &dyn CommandRunner, path: &Path) -> Result<(), ProcessError> {
    runner.run(OSASCRIPT, &register_args(path)).await?.check(OSASCRIPT)?;
    log::info!("Copied {:?} to clipboard", path);
    Ok(())
}
