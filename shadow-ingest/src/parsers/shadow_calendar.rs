//! Shadow calendar text parser
//!
//! Expected input (free text, one item per line):
//!   12 Jan, 2024
//!   09:00 - 10:00 -> Team sync
//!   10:15 – 11:00 → > Planning call
//!   3 März 2024
//!   9:30—10:00 - Verlagsinfo-Vorbereitung & Abstimmung
//!
//! A date header scopes every time range below it until the next header.
//! Anything else is ignored.

use std::sync::LazyLock;

use regex::Regex;
use shadow_core::TimeEntry;
use tracing::debug;

static DATE_HEADER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?P<date>[0-9]{1,2} [A-Za-zäöüÄÖÜ]+,? [0-9]{4})").expect("valid regex")
});

// ASCII digits only. Range separators: - – —. Description separators: → -> - – —
static TIME_RANGE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r"^(?P<start>[0-9]{1,2}:[0-9]{2})\s*[-–—]\s*",
        r"(?P<end>[0-9]{1,2}:[0-9]{2})\s*",
        r"(?:→|->|[-–—])\s*",
        r"(?P<desc>.+)$"
    ))
    .expect("valid regex")
});

/// `9:05` -> `09:05`
fn pad_hour(t: &str) -> String {
    match t.split_once(':') {
        Some((h, m)) if h.len() == 1 => format!("0{h}:{m}"),
        _ => t.to_string(),
    }
}

/// Parse shadow calendar text into time entries, in input order.
///
/// Never fails: lines that match neither grammar are skipped, and time ranges
/// seen before the first date header have no date and are dropped.
pub fn parse_shadow_calendar(text: &str) -> Vec<TimeEntry> {
    let mut current_date: Option<String> = None;
    let mut out = Vec::new();

    for line in text.lines().map(str::trim).filter(|l| !l.is_empty()) {
        if let Some(caps) = DATE_HEADER.captures(line) {
            current_date = Some(caps["date"].to_string());
            continue;
        }

        let Some(caps) = TIME_RANGE.captures(line) else {
            continue;
        };

        let Some(date) = current_date.as_ref() else {
            debug!(line, "time range before any date header, dropped");
            continue;
        };

        let desc = caps["desc"].trim_start();
        let desc = desc.strip_prefix('>').unwrap_or(desc).trim();

        out.push(TimeEntry::new(
            date.clone(),
            pad_hour(&caps["start"]),
            pad_hour(&caps["end"]),
            desc,
        ));
    }

    out
}
