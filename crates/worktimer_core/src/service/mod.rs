//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate repository calls into timer-ledger and reporting APIs.
//! - Keep the API surface decoupled from storage details.
//!
//! # Invariants
//! - The acting user identity is an explicit parameter on every
//!   user-scoped operation; there is no ambient session state.
//! - Reporting services are read-only and never mutate state.

use chrono::DateTime;

pub mod report_service;
pub mod timer_service;

/// Formats a second count as compact duration text: `"2h 15m"`, `"45m"`,
/// `"30s"`. Zero-length durations render as `"0m"`.
pub fn format_duration(total_seconds: i64) -> String {
    if total_seconds <= 0 {
        return "0m".to_string();
    }

    let days = total_seconds / 86_400;
    let hours = (total_seconds % 86_400) / 3_600;
    let minutes = (total_seconds % 3_600) / 60;
    let seconds = total_seconds % 60;

    let mut parts = Vec::new();
    if days > 0 {
        parts.push(format!("{days}d"));
    }
    if hours > 0 {
        parts.push(format!("{hours}h"));
    }
    if minutes > 0 {
        parts.push(format!("{minutes}m"));
    }
    // Sub-minute durations are all a fresh timer has to show.
    if parts.is_empty() {
        parts.push(format!("{seconds}s"));
    }

    parts.join(" ")
}

/// Formats fractional hours as compact duration text.
pub fn format_hours(hours: f64) -> String {
    format_duration((hours * 3600.0).round() as i64)
}

/// Formats an epoch-millisecond instant with a strftime-style pattern
/// (UTC). Falls back to `"--:--"` for out-of-range instants.
pub fn format_instant(instant_ms: i64, pattern: &str) -> String {
    DateTime::from_timestamp_millis(instant_ms)
        .map(|dt| dt.format(pattern).to_string())
        .unwrap_or_else(|| "--:--".to_string())
}
