//! Shared, lock-guarded reference table for concurrent callers.
//!
//! Readers take a cheap snapshot (an `Arc` of the current table) and match
//! against it without holding the lock. Learned records are appended under a
//! single write lock, persisted first and then published in memory, so the
//! file order always equals the in-memory order.

use std::sync::{Arc, PoisonError, RwLock};

use shadow_core::{ReferenceRecord, Result};
use tracing::info;

use crate::reference_table::ReferenceTable;
use crate::store::ReferenceStore;

#[derive(Debug)]
struct Inner {
    table: Arc<ReferenceTable>,
    store: Option<ReferenceStore>,
}

#[derive(Debug, Clone)]
pub struct SharedReferenceTable {
    inner: Arc<RwLock<Inner>>,
}

impl SharedReferenceTable {
    /// Table with no backing file; learned records live only in memory.
    pub fn in_memory(table: ReferenceTable) -> Self {
        Self::build(table, None)
    }

    /// Table whose learned records are also appended to `store`.
    pub fn persisted(table: ReferenceTable, store: ReferenceStore) -> Self {
        Self::build(table, Some(store))
    }

    fn build(table: ReferenceTable, store: Option<ReferenceStore>) -> Self {
        Self {
            inner: Arc::new(RwLock::new(Inner {
                table: Arc::new(table),
                store,
            })),
        }
    }

    /// Current table state. Later appends are not visible through it.
    pub fn snapshot(&self) -> Arc<ReferenceTable> {
        let inner = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(&inner.table)
    }

    /// Persist and publish a learned record. On a write failure the in-memory
    /// table is left untouched.
    pub fn learn(&self, record: ReferenceRecord) -> Result<()> {
        let mut inner = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        if let Some(store) = &inner.store {
            store.append(&record)?;
        }
        info!(
            description = record.description(),
            task_code = record.task_code(),
            "learned mapping"
        );
        Arc::make_mut(&mut inner.table).push(record);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.snapshot().len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshot().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::thread;
    use tempfile::TempDir;

    #[test]
    fn test_snapshot_is_stable_across_learn() {
        let shared = SharedReferenceTable::in_memory(ReferenceTable::from_records(vec![
            ReferenceRecord::new("Team sync", "T-100"),
        ]));
        let before = shared.snapshot();

        shared.learn(ReferenceRecord::new("Lunch walk", "T-300")).unwrap();

        assert_eq!(before.len(), 1);
        assert_eq!(shared.len(), 2);
        assert_eq!(shared.snapshot().records()[1].task_code(), "T-300");
    }

    #[test]
    fn test_concurrent_learn_loses_nothing() {
        let shared = SharedReferenceTable::in_memory(ReferenceTable::new());

        let handles: Vec<_> = (0..8)
            .map(|t| {
                let shared = shared.clone();
                thread::spawn(move || {
                    for i in 0..25 {
                        shared
                            .learn(ReferenceRecord::new(format!("task {t}-{i}"), format!("C-{t}")))
                            .unwrap();
                        let _ = shared.snapshot().len();
                    }
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }

        assert_eq!(shared.len(), 200);
        assert_eq!(shared.snapshot().task_codes().len(), 8);
    }

    #[test]
    fn test_concurrent_learn_persisted_keeps_file_in_memory_order() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("mapping.csv");
        fs::write(&path, "Project,Description,Subtask\nANY,Team sync,T-100\n").unwrap();

        let (store, table) = ReferenceStore::load(&path).unwrap();
        let shared = SharedReferenceTable::persisted(table, store);

        let handles: Vec<_> = (0..8)
            .map(|t| {
                let shared = shared.clone();
                thread::spawn(move || {
                    for i in 0..25 {
                        shared
                            .learn(ReferenceRecord::new(format!("task {t}-{i}, part"), format!("C-{t}")))
                            .unwrap();
                    }
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }

        let (_, reloaded) = ReferenceStore::load(&path).unwrap();
        let in_memory = shared.snapshot();
        assert_eq!(in_memory.len(), 201);
        assert_eq!(reloaded.records(), in_memory.records());
    }
}
