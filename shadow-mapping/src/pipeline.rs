//! Function surface consumed by the CLI and any service wrapper.

use shadow_core::{to_output_records, MatchedEntry, OutputRecord, Result, ShadowError, TimeEntry};
use shadow_ingest::parse_shadow_calendar;

use crate::learning::{resolve_unmapped, LearnReport, Resolver};
use crate::matcher::{match_entries, MatchConfig};
use crate::reference_table::ReferenceTable;
use crate::shared::SharedReferenceTable;

pub fn parse_calendar(text: &str) -> Vec<TimeEntry> {
    parse_shadow_calendar(text)
}

pub fn export_records(entries: &[MatchedEntry], employee: &str) -> Result<Vec<OutputRecord>> {
    to_output_records(entries, employee)
}

fn require_text(text: &str) -> Result<()> {
    if text.trim().is_empty() {
        return Err(ShadowError::InputEmpty);
    }
    Ok(())
}

/// Parse, match and export in one go, without learning.
pub fn process_text(
    text: &str,
    employee: &str,
    table: &ReferenceTable,
    config: &MatchConfig,
) -> Result<Vec<OutputRecord>> {
    require_text(text)?;
    let matched = match_entries(parse_calendar(text), table, config);
    export_records(&matched, employee)
}

/// Output of a full run including the learning pass.
#[derive(Debug, Clone)]
pub struct PipelineRun {
    pub records: Vec<OutputRecord>,
    pub learn: LearnReport,
}

impl PipelineRun {
    pub fn unmapped_count(&self) -> usize {
        self.records
            .iter()
            .filter(|r| r.task_code == shadow_core::UNMAPPED)
            .count()
    }
}

/// Parse, match against a snapshot, resolve UNMAPPED entries, then export.
///
/// Entries are matched once before learning; answers learned in this run
/// only help later runs and later duplicates in this batch.
pub async fn process_with_learning<R: Resolver>(
    text: &str,
    employee: &str,
    table: &SharedReferenceTable,
    config: &MatchConfig,
    resolver: &R,
) -> Result<PipelineRun> {
    require_text(text)?;
    let snapshot = table.snapshot();
    let mut matched = match_entries(parse_calendar(text), &snapshot, config);
    let learn = resolve_unmapped(&mut matched, table, resolver).await?;
    let records = export_records(&matched, employee)?;
    Ok(PipelineRun { records, learn })
}

#[cfg(test)]
mod tests {
    use super::*;
    use shadow_core::ReferenceRecord;

    #[test]
    fn test_blank_text_is_input_empty() {
        let err = process_text("  \n ", "Me", &ReferenceTable::new(), &MatchConfig::default())
            .unwrap_err();
        assert!(matches!(err, ShadowError::InputEmpty));
    }

    #[test]
    fn test_process_text_end_to_end() {
        let table = ReferenceTable::from_records(vec![ReferenceRecord::new("Team sync", "T-100")]);
        let text = "12 Jan, 2024\n09:00 - 10:00 -> Team sync\n10:00 - 10:30 -> Dentist";
        let out = process_text(text, "Me", &table, &MatchConfig::default()).unwrap();
        assert_eq!(out.len(), 2);
        assert_eq!(out[0].task_code, "T-100");
        assert_eq!(out[0].date.to_string(), "2024-01-12");
        assert_eq!(out[1].task_code, shadow_core::UNMAPPED);
    }

    #[test]
    fn test_text_without_entries_exports_nothing() {
        let out = process_text("just notes", "Me", &ReferenceTable::new(), &MatchConfig::default())
            .unwrap();
        assert!(out.is_empty());
    }
}
