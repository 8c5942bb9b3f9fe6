//! Learning loop: ask for task codes of UNMAPPED entries and remember them.
//!
//! Resolution is delegated to an injected [`Resolver`], so the same pass runs
//! behind a terminal prompt, a service queue, or a test double.

use std::collections::HashMap;
use std::future::Future;

use shadow_core::{normalize, MatchedEntry, ReferenceRecord, Result, ShadowError};
use tracing::{info, warn};

use crate::shared::SharedReferenceTable;

/// Source of task codes for descriptions the matcher could not map.
pub trait Resolver {
    /// `Ok(None)` (or a blank answer) skips the entry.
    fn resolve(&self, description: &str) -> impl Future<Output = anyhow::Result<Option<String>>> + Send;
}

/// Resolver that never answers. Useful where no human is attached.
#[derive(Debug, Clone, Copy, Default)]
pub struct SkipResolver;

impl Resolver for SkipResolver {
    async fn resolve(&self, _description: &str) -> anyhow::Result<Option<String>> {
        Ok(None)
    }
}

/// Counters for one learning pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LearnReport {
    /// Resolver calls made
    pub prompted: usize,
    /// New records appended to the table
    pub learned: usize,
    /// Entries settled from an earlier answer in the same pass
    pub reused: usize,
    /// Entries left UNMAPPED
    pub skipped: usize,
}

/// Dedup key: normalized description with whitespace runs collapsed.
fn batch_key(description: &str) -> String {
    normalize(description).split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Resolve every UNMAPPED entry once, in order.
///
/// Each distinct normalized description is put to the resolver at most once
/// per pass; later duplicates reuse that answer (or that skip) without adding
/// another record. Entries already mapped are never re-matched.
pub async fn resolve_unmapped<R: Resolver>(
    entries: &mut [MatchedEntry],
    table: &SharedReferenceTable,
    resolver: &R,
) -> Result<LearnReport> {
    let mut report = LearnReport::default();
    let mut answers: HashMap<String, Option<String>> = HashMap::new();

    for entry in entries.iter_mut().filter(|e| e.is_unmapped()) {
        let description = entry.entry.description.clone();
        let key = batch_key(&description);

        if let Some(answer) = answers.get(&key) {
            match answer {
                Some(code) => {
                    entry.resolve(code.clone());
                    report.reused += 1;
                }
                None => report.skipped += 1,
            }
            continue;
        }

        report.prompted += 1;
        let answer = resolver
            .resolve(&description)
            .await
            .map_err(|e| ShadowError::Resolver {
                description: description.clone(),
                reason: format!("{e:#}"),
            })?
            .map(|code| code.trim().to_string())
            .filter(|code| !code.is_empty());

        match &answer {
            Some(code) => {
                table.learn(ReferenceRecord::new(description.as_str(), code.as_str()))?;
                entry.resolve(code.clone());
                report.learned += 1;
            }
            None => {
                warn!(description = %description, "left unmapped");
                report.skipped += 1;
            }
        }
        answers.insert(key, answer);
    }

    info!(
        prompted = report.prompted,
        learned = report.learned,
        reused = report.reused,
        skipped = report.skipped,
        "learning pass finished"
    );
    Ok(report)
}
