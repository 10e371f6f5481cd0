//! Clip request describing one segment to cut out of the playing file.

use std::path::{Path, PathBuf};
use crate::core::name::{extension_from_filename, parent_dir, sanitize_base_name};
use crate::core::time::format_timecode;

/// A marked segment of the currently playing source file
///
/// Positions are in seconds. A request always spans a non-empty range:
/// [`ClipRequest::new`] refuses to build one where `end <= start`.
#[derive(Debug, Clone, PartialEq)]
pub struct ClipRequest {
    pub start: f64,
    pub end: f64,
    pub source_path: PathBuf,
    pub source_filename: String,
}

impl ClipRequest {
    /// Create a new request, or `None` when the range is empty or reversed
    pub fn new(
        start: f64,
        end: f64,
        source_path: impl Into<PathBuf>,
        source_filename: impl Into<String>,
    ) -> Option<Self> {
        if !(end > start) {
            return None;
        }

        Some(Self {
            start,
            end,
            source_path: source_path.into(),
            source_filename: source_filename.into(),
        })
    }

    /// Get the duration of the clip in seconds
    pub fn duration(&self) -> f64 {
        self.end - self.start
    }

    /// Directory holding the source file
    pub fn source_dir(&self) -> PathBuf {
        parent_dir(&self.source_path)
    }

    /// Output filename: `{base}_{start}_to_{end}.{ext}`
    pub fn output_file_name(&self) -> String {
        format!(
            "{}_{}_to_{}.{}",
            sanitize_base_name(&self.source_filename),
            format_timecode(self.start),
            format_timecode(self.end),
            extension_from_filename(&self.source_filename),
        )
    }

    /// Full output path inside `dir`
    pub fn output_path_in(&self, dir: &Path) -> PathBuf {
        dir.join(self.output_file_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_empty_or_reversed() {
        assert!(ClipRequest::new(10.0, 10.0, "/a/b.mp4", "b.mp4").is_none());
        assert!(ClipRequest::new(10.0, 5.0, "/a/b.mp4", "b.mp4").is_none());
        assert!(ClipRequest::new(f64::NAN, 5.0, "/a/b.mp4", "b.mp4").is_none());
        assert!(ClipRequest::new(1.0, 1.5, "/a/b.mp4", "b.mp4").is_some());
    }

    #[test]
    fn test_output_name() {
        let req = ClipRequest::new(10.0, 15.0, "/movies/My Clip.mkv", "My Clip.mkv").unwrap();
        assert_eq!(req.output_file_name(), "My_Clip_00-00-10_to_00-00-15.mkv");
        assert_eq!(req.source_dir(), PathBuf::from("/movies"));
        assert_eq!(
            req.output_path_in(&req.source_dir()),
            PathBuf::from("/movies/My_Clip_00-00-10_to_00-00-15.mkv")
        );
        assert_eq!(req.duration(), 5.0);
    }

    #[test]
    fn test_output_name_defaults_extension() {
        let req = ClipRequest::new(91.4, 93.9, "/tmp/stream", "stream").unwrap();
        assert_eq!(req.output_file_name(), "stream_00-01-31_to_00-01-33.mp4");
    }
}
