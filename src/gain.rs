//! Per-track gain handling.
//!
//! Stored gains are device dB and are never clamped at rest; clamping to
//! the sink's control range happens only when a value is applied. Display
//! formatting mirrors the historical report format: round half-up at a
//! maximum number of decimals, then drop trailing zeros.

use tracing::warn;

use crate::audio::AudioSink;

/// Decimals used by the plain-text report.
pub const REPORT_DECIMALS: u32 = 1;
/// Decimals used by the JSON state document.
pub const DOCUMENT_DECIMALS: u32 = 2;

/// Clamp `gain` to the sink's control range and set it.
///
/// A rejected value is logged and otherwise ignored: playback continues
/// at whatever gain the sink last accepted.
pub fn apply<S: AudioSink + ?Sized>(gain: f32, sink: &S) {
    let (min_db, max_db) = sink.gain_range();
    let clamped = gain.clamp(min_db, max_db);
    if let Err(err) = sink.set_gain(clamped) {
        warn!(gain = clamped, "sink rejected gain value: {err}");
    }
}

/// Round half-up (away from zero) at `max_decimals` places.
pub fn round_gain(value: f32, max_decimals: u32) -> f32 {
    let factor = 10f64.powi(max_decimals as i32);
    ((value as f64 * factor).round() / factor) as f32
}

/// Format a gain the way `DecimalFormat("#.#")` would: round half-up at
/// `max_decimals`, trim trailing zeros and a dangling dot, and collapse
/// negative zero to `0`.
pub fn format_gain(value: f32, max_decimals: u32) -> String {
    let rounded = round_gain(value, max_decimals) as f64;
    let mut s = format!("{:.*}", max_decimals as usize, rounded);
    if s.contains('.') {
        while s.ends_with('0') {
            s.pop();
        }
        if s.ends_with('.') {
            s.pop();
        }
    }
    if s == "-0" {
        s = "0".to_string();
    }
    s
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_trims_trailing_zeros() {
        assert_eq!(format_gain(0.0, 1), "0");
        assert_eq!(format_gain(-2.5, 1), "-2.5");
        assert_eq!(format_gain(3.0, 1), "3");
        assert_eq!(format_gain(1.2, 2), "1.2");
        assert_eq!(format_gain(1.25, 2), "1.25");
    }

    #[test]
    fn format_rounds_half_up_away_from_zero() {
        assert_eq!(format_gain(0.25, 1), "0.3");
        assert_eq!(format_gain(-0.25, 1), "-0.3");
        assert_eq!(format_gain(1.249, 1), "1.2");
        assert_eq!(format_gain(0.015, 2), "0.02");
    }

    #[test]
    fn format_normalizes_negative_zero() {
        assert_eq!(format_gain(-0.04, 1), "0");
        assert_eq!(format_gain(-0.0, 1), "0");
    }

    #[test]
    fn accumulated_float_steps_format_cleanly() {
        // Ten 0.1 steps do not land exactly on 1.0 in binary; rounding at
        // one decimal must hide that.
        let mut g = 0.0f32;
        for _ in 0..10 {
            g += 0.1;
        }
        assert_eq!(format_gain(g, 1), "1");
    }
}
