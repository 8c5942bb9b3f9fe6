//! Convert matched entries into ERP-ready output records.

use crate::dates::parse_date_header;
use crate::entry::{MatchedEntry, OutputRecord};
use crate::error::Result;

/// Build one output record per matched entry.
///
/// Fails with `DateParse` on the first entry whose date header cannot be read;
/// no partial output is returned.
pub fn to_output_records(entries: &[MatchedEntry], employee: &str) -> Result<Vec<OutputRecord>> {
    entries
        .iter()
        .map(|m| {
            Ok(OutputRecord {
                employee: employee.to_string(),
                date: parse_date_header(&m.entry.date)?,
                start_time: m.entry.start.clone(),
                end_time: m.entry.end.clone(),
                description: m.entry.description.clone(),
                task_code: m.task_code.clone(),
                confidence: m.confidence,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entry::{TimeEntry, UNMAPPED};
    use crate::error::ShadowError;

    fn sample() -> Vec<MatchedEntry> {
        vec![
            MatchedEntry::new(
                TimeEntry::new("12 Jan, 2024", "09:00", "10:00", "Team sync"),
                "T-100",
                1.0,
            ),
            MatchedEntry::unmapped(TimeEntry::new("13 Januar 2024", "14:00", "15:30", "Lunch walk")),
        ]
    }

    #[test]
    fn test_export_reformats_dates() {
        let out = to_output_records(&sample(), "Markus").unwrap();
        assert_eq!(out.len(), 2);
        assert_eq!(out[0].date.to_string(), "2024-01-12");
        assert_eq!(out[1].date.to_string(), "2024-01-13");
        assert_eq!(out[0].employee, "Markus");
        assert_eq!(out[1].task_code, UNMAPPED);
        assert_eq!(out[1].confidence, 0.0);
    }

    #[test]
    fn test_export_bad_date_is_surfaced() {
        let entries = vec![MatchedEntry::new(
            TimeEntry::new("12 Smarch, 2024", "09:00", "10:00", "Team sync"),
            "T-100",
            1.0,
        )];
        let err = to_output_records(&entries, "Me").unwrap_err();
        assert!(matches!(err, ShadowError::DateParse { ref date, .. } if date == "12 Smarch, 2024"));
    }

    #[test]
    fn test_export_is_deterministic() {
        let entries = sample();
        let a = serde_json::to_string(&to_output_records(&entries, "Me").unwrap()).unwrap();
        let b = serde_json::to_string(&to_output_records(&entries, "Me").unwrap()).unwrap();
        assert_eq!(a, b);
    }
}
