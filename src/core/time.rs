//! Timecode formatting for playback positions.
//! Positions arrive from the player as floating-point seconds and are
//! rendered as `HH-MM-SS`, which is safe to embed in filenames.

/// Time constants for conversions
pub mod constants {
    pub const SECONDS_PER_MINUTE: u64 = 60;
    pub const SECONDS_PER_HOUR: u64 = 3600;
}

/// Clamp a player-reported position to a usable, non-negative value.
/// NaN (mpv reports no position while idle) is treated as zero.
#[inline]
pub fn clamp_seconds(seconds: f64) -> f64 {
    if seconds.is_nan() {
        0.0
    } else {
        seconds.max(0.0)
    }
}

/// Split seconds into whole (hours, minutes, seconds), flooring each part.
pub fn decompose(seconds: f64) -> (u64, u64, u64) {
    let total = clamp_seconds(seconds).floor() as u64;
    let hours = total / constants::SECONDS_PER_HOUR;
    let minutes = (total % constants::SECONDS_PER_HOUR) / constants::SECONDS_PER_MINUTE;
    let secs = total % constants::SECONDS_PER_MINUTE;
    (hours, minutes, secs)
}

/// Format time as HH-MM-SS
///
/// Every field is padded to at least two digits. Hours are never truncated,
/// so 100+ hour positions produce a wider hour field.
pub fn format_timecode(seconds: f64) -> String {
    let (hours, minutes, secs) = decompose(seconds);
    format!("{:02}-{:02}-{:02}", hours, minutes, secs)
}

/// Render a position the way the encoder receives it on its command line.
/// Whole values print without a fractional part (`10`, `91.4`).
pub fn format_seconds_arg(seconds: f64) -> String {
    format!("{}", clamp_seconds(seconds))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn is_timecode(s: &str) -> bool {
        let parts: Vec<&str> = s.split('-').collect();
        parts.len() == 3
            && parts[0].len() >= 2
            && parts[1].len() == 2
            && parts[2].len() == 2
            && parts.iter().all(|p| p.chars().all(|c| c.is_ascii_digit()))
    }

    #[test]
    fn test_format_timecode() {
        assert_eq!(format_timecode(0.0), "00-00-00");
        assert_eq!(format_timecode(91.4), "00-01-31");
        assert_eq!(format_timecode(93.9), "00-01-33");
        assert_eq!(format_timecode(3661.5), "01-01-01");
    }

    #[test]
    fn test_negative_and_nan_clamp() {
        assert_eq!(format_timecode(-12.0), "00-00-00");
        assert_eq!(format_timecode(f64::NAN), "00-00-00");
        assert_eq!(clamp_seconds(-0.5), 0.0);
    }

    #[test]
    fn test_large_hours_widen() {
        // 123 hours, 4 minutes, 5 seconds
        let secs = 123.0 * 3600.0 + 4.0 * 60.0 + 5.0;
        assert_eq!(format_timecode(secs), "123-04-05");
    }

    #[test]
    fn test_shape_and_recombination() {
        let samples = [0.0, 0.99, 59.999, 60.0, 3599.5, 3600.0, 86399.9, 360000.25, 7.25];
        for &s in &samples {
            let tc = format_timecode(s);
            assert!(is_timecode(&tc), "bad shape: {}", tc);

            let (h, m, sec) = decompose(s);
            assert!(m < 60 && sec < 60);
            assert_eq!(h * 3600 + m * 60 + sec, s.floor() as u64);
        }
    }

    #[test]
    fn test_seconds_arg() {
        assert_eq!(format_seconds_arg(10.0), "10");
        assert_eq!(format_seconds_arg(91.4), "91.4");
        assert_eq!(format_seconds_arg(-3.0), "0");
    }
}
