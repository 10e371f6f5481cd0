//! ffmpeg stream-copy invocation.
//! The encoder is an external binary; this module finds it and builds the
//! command line that cuts a range without re-encoding.

use std::path::Path;
use crate::core::time::format_seconds_arg;
use crate::core::ClipRequest;
use crate::process::{CommandRunner, ProcessOutput};

/// Bare command name, resolved through the search path
pub const ENCODER_NAME: &str = "ffmpeg";

/// Install locations probed when the search path has no ffmpeg
/// (GUI apps on macOS often start without Homebrew on PATH)
pub const WELL_KNOWN_LOCATIONS: [&str; 2] = ["/opt/homebrew/bin/ffmpeg", "/usr/local/bin/ffmpeg"];

/// Shown when no encoder can be found
pub const INSTALL_HINT: &str = "Install with Homebrew (brew install ffmpeg) or your package manager";

/// Number of trailing stderr lines kept for error reports
const DIAGNOSTIC_LINES: usize = 6;

/// Error type for encoding operations
#[derive(Debug)]
pub enum EncodeError {
    Missing,
    Launch(String),
    Failed { code: Option<i32>, stderr: String },
}

impl std::fmt::Display for EncodeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EncodeError::Missing => write!(f, "ffmpeg not found"),
            EncodeError::Launch(msg) => write!(f, "Could not start ffmpeg: {}", msg),
            EncodeError::Failed { code: Some(code), stderr } => write!(f, "ffmpeg exited with code {}: {}", code, stderr),
            EncodeError::Failed { code: None, stderr } => write!(f, "ffmpeg was terminated: {}", stderr),
        }
    }
}

impl std::error::Error for EncodeError {}

/// A located ffmpeg binary
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Encoder {
    program: String,
}

impl Encoder {
    /// Probe the search path, then the well-known locations; first hit wins
    pub fn locate(runner: &dyn CommandRunner) -> Option<Self> {
        let found = std::iter::once(ENCODER_NAME)
            .chain(WELL_KNOWN_LOCATIONS)
            .find(|candidate| runner.is_available(candidate));

        match found {
            Some(program) => {
                log::debug!("Using encoder {}", program);
                Some(Self { program: program.to_string() })
            }
            None => {
                log::warn!("No ffmpeg on PATH or in {:?}", WELL_KNOWN_LOCATIONS);
                None
            }
        }
    }

    /// Get the program name or path
    pub fn program(&self) -> &str {
        &self.program
    }

    /// Stream-copy command line: overwrite, seek, cut, copy all streams
    pub fn args(request: &ClipRequest, output_path: &Path) -> Vec<String> {
        vec![
            "-y".to_string(),
            "-ss".to_string(),
            format_seconds_arg(request.start),
            "-to".to_string(),
            format_seconds_arg(request.end),
            "-i".to_string(),
            request.source_path.to_string_lossy().into_owned(),
            "-c".to_string(),
            "copy".to_string(),
            output_path.to_string_lossy().into_owned(),
        ]
    }

    /// Cut `request` into `output_path`, waiting for ffmpeg to finish
    pub async fn cut(
        &self,
        runner: &dyn CommandRunner,
        request: &ClipRequest,
        output_path: &Path,
    ) -> Result<ProcessOutput, EncodeError> {
        let args = Self::args(request, output_path);
        log::info!(
            "Cutting {:.3}s-{:.3}s ({:.3}s) of {:?} into {:?}",
            request.start,
            request.end,
            request.duration(),
            request.source_path,
            output_path
        );

        let output = runner
            .run(&self.program, &args)
            .await
            .map_err(|e| EncodeError::Launch(e.to_string()))?;
        if output.success() {
            Ok(output)
        } else {
            Err(EncodeError::Failed {
                code: output.code,
                stderr: diagnostic(&output.stderr),
            })
        }
    }
}

/// Trailing non-empty lines of ffmpeg's stderr; the banner comes first and
/// the actual error last.
pub fn diagnostic(stderr: &str) -> String {
    let lines: Vec<&str> = stderr
        .lines()
        .map(str::trim_end)
        .filter(|l| !l.trim().is_empty())
        .collect();
    let skip = lines.len().saturating_sub(DIAGNOSTIC_LINES);
    lines[skip..].join("\n")
}
