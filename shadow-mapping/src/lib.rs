//! shadow-mapping: reference table, fuzzy matcher, learning loop and the
//! parse -> match -> export pipeline.

pub mod learning;
pub mod matcher;
pub mod pipeline;
pub mod reference_table;
pub mod shared;
pub mod store;

pub use learning::{resolve_unmapped, LearnReport, Resolver, SkipResolver};
pub use matcher::{match_description, match_entries, ConfidenceMode, MatchConfig, MatchOutcome};
pub use pipeline::{export_records, parse_calendar, process_text, process_with_learning, PipelineRun};
pub use reference_table::ReferenceTable;
pub use shared::SharedReferenceTable;
pub use store::ReferenceStore;
