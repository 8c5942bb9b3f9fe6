//! shadow-ingest: turn free-text shadow calendars into dated time entries.

pub mod parsers;

pub use parsers::shadow_calendar::parse_shadow_calendar;
pub use shadow_core::TimeEntry;
