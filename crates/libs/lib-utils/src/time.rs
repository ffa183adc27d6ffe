//! # Time Utilities
//!
//! Utilities for time formatting using chrono. `Utc::now()` is backed by
//! `Date.now()` in the browser through chrono's `wasmbind` feature.

use chrono::{DateTime, Utc};

/// Get current UTC time.
pub fn now_utc() -> DateTime<Utc> {
    Utc::now()
}

/// Format time as a wall-clock `HH:MM:SS` label.
pub fn format_clock(time: DateTime<Utc>) -> String {
    time.format("%H:%M:%S").to_string()
}
