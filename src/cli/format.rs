//! Output formatting for CLI display.

use std::collections::BTreeSet;

use jiff::{SignedDuration, Timestamp, tz::TimeZone};

use crate::model::BodyPart;

/// Format an elapsed duration as `m:ss`, like a stopwatch.
pub(super) fn format_elapsed(elapsed: SignedDuration) -> String {
    let secs = elapsed.as_secs().max(0);
    format!("{}:{:02}", secs / 60, secs % 60)
}

/// Format a workout duration in whole minutes.
pub(super) fn format_duration(duration: SignedDuration) -> String {
    let mins = duration.as_secs().max(0) / 60;
    if mins < 60 {
        format!("{mins} min")
    } else {
        format!("{}h {:02}m", mins / 60, mins % 60)
    }
}

/// Format a timestamp as a local date and time.
pub(super) fn format_date(ts: Timestamp) -> String {
    ts.to_zoned(TimeZone::system())
        .strftime("%a %Y-%m-%d %H:%M")
        .to_string()
}

pub(super) fn format_body_parts(parts: &BTreeSet<BodyPart>) -> String {
    if parts.is_empty() {
        return "untagged".to_string();
    }
    parts
        .iter()
        .map(|p| p.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Format a weight without a trailing `.0` on whole numbers.
pub(super) fn format_weight(weight: f64) -> String {
    format!("{weight}")
}

/// A crude horizontal bar for split and progress output.
pub(super) fn bar(value: f64, max: f64, width: usize) -> String {
    if max <= 0.0 || value <= 0.0 {
        return String::new();
    }
    let cells = ((value / max) * width as f64).round();
    "#".repeat(cells.clamp(1.0, width as f64) as usize)
}
