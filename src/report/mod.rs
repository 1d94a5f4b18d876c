//! Console summary and file exports of a finished run.
mod console;
mod export;
mod markdown;


use std::time::Duration;

use chrono::{DateTime, SecondsFormat, Utc};

use crate::slo::SloThresholds;
use crate::targets::TargetList;

pub use console::print_summary;
pub use export::{export_csv, export_json};
pub use markdown::export_markdown;

#[cfg(test)]
pub(crate) use console::render_summary;
#[cfg(test)]
pub(crate) use export::json_payload;
#[cfg(test)]
pub(crate) use markdown::render_markdown;

/// Run parameters that reports show next to the measured numbers.
#[derive(Debug, Clone, Copy)]
pub struct RunContext<'run> {
    pub targets: &'run TargetList,
    pub vus: usize,
    pub configured_duration: Duration,
    pub pause: Duration,
    pub thresholds: SloThresholds,
    pub started_at: DateTime<Utc>,
}

impl RunContext<'_> {
    fn started_at_rfc3339(&self) -> String {
        self.started_at.to_rfc3339_opts(SecondsFormat::Secs, true)
    }
}

/// Compact duration label: `2m`, `45s`, `1500ms`.
fn format_duration(duration: Duration) -> String {
    let millis = duration.as_millis();
    if millis % 1000 != 0 {
        return format!("{}ms", millis);
    }
    let secs = duration.as_secs();
    if secs != 0 && secs % 3600 == 0 {
        format!("{}h", secs / 3600)
    } else if secs != 0 && secs % 60 == 0 {
        format!("{}m", secs / 60)
    } else {
        format!("{}s", secs)
    }
}

/// Seconds with two decimals.
fn format_seconds(duration: Duration) -> String {
    let millis = duration.as_millis();
    format!("{}.{:02}", millis / 1000, (millis % 1000) / 10)
}

fn format_x100(value: u64) -> String {
    format!("{}.{:02}", value / 100, value % 100)
}
