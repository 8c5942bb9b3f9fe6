//! In-memory reference table: known descriptions and their task codes.

use std::collections::BTreeSet;

use shadow_core::ReferenceRecord;

/// Ordered, append-only collection of reference records.
///
/// Normalized descriptions may repeat; lookups resolve ties by table order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReferenceTable {
    records: Vec<ReferenceRecord>,
}

impl ReferenceTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_records(records: Vec<ReferenceRecord>) -> Self {
        Self { records }
    }

    /// Append at the end. Existing records are never reordered.
    pub fn push(&mut self, record: ReferenceRecord) {
        self.records.push(record);
    }

    pub fn records(&self) -> &[ReferenceRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// First record whose normalized description equals `normalized`.
    pub fn first_with_normalized(&self, normalized: &str) -> Option<&ReferenceRecord> {
        self.records.iter().find(|r| r.normalized() == normalized)
    }

    /// Distinct task codes, sorted. Feeds manual-override pickers.
    pub fn task_codes(&self) -> Vec<String> {
        self.records
            .iter()
            .map(|r| r.task_code().to_string())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }
}
