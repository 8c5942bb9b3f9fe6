//! Fuzzy matcher: free-text description -> closest known task code.
//!
//! Both sides are normalized and whitespace-collapsed, then scored with the
//! better of two normalized Levenshtein similarities: on the raw strings and
//! on their alphabetically sorted tokens (so word order does not matter).
//! The highest score at or above the threshold wins; equal scores resolve to
//! the earliest record in the table.

use serde::{Deserialize, Serialize};
use shadow_core::{normalize, MatchedEntry, TimeEntry, UNMAPPED};
use tracing::debug;

use crate::reference_table::ReferenceTable;

/// Default similarity floor below which no candidate is returned.
pub const DEFAULT_THRESHOLD: f64 = 0.6;

/// How the confidence of a successful match is reported.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfidenceMode {
    /// 1.0 for any match, 0.0 for UNMAPPED
    #[default]
    Binary,
    /// The winning candidate's similarity score
    Graded,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MatchConfig {
    pub threshold: f64,
    pub confidence: ConfidenceMode,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_THRESHOLD,
            confidence: ConfidenceMode::Binary,
        }
    }
}

/// Result of matching one description.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchOutcome {
    pub task_code: String,
    pub confidence: f64,
    /// Normalized description of the winning record, if any
    pub candidate: Option<String>,
    /// Raw similarity of the winner (0.0 when unmapped)
    pub score: f64,
}

impl MatchOutcome {
    fn unmapped() -> Self {
        Self {
            task_code: UNMAPPED.to_string(),
            confidence: 0.0,
            candidate: None,
            score: 0.0,
        }
    }

    pub fn is_unmapped(&self) -> bool {
        self.task_code == UNMAPPED
    }
}

fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn sorted_tokens(s: &str) -> String {
    let mut tokens: Vec<_> = s.split_whitespace().collect();
    tokens.sort_unstable();
    tokens.join(" ")
}

/// Similarity of two normalized strings in [0, 1].
pub fn similarity(a: &str, b: &str) -> f64 {
    let a = collapse_whitespace(a);
    let b = collapse_whitespace(b);
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }
    if a == b {
        return 1.0;
    }
    let plain = strsim::normalized_levenshtein(&a, &b);
    let by_tokens = strsim::normalized_levenshtein(&sorted_tokens(&a), &sorted_tokens(&b));
    plain.max(by_tokens)
}

/// Find the best task code for `description` in `table`.
///
/// Read-only; the same description against the same table state always
/// yields the same outcome.
pub fn match_description(
    description: &str,
    table: &ReferenceTable,
    config: &MatchConfig,
) -> MatchOutcome {
    let query = normalize(description);
    if query.trim().is_empty() {
        return MatchOutcome::unmapped();
    }

    let mut best: Option<(f64, &str)> = None;
    for record in table.records() {
        let score = similarity(&query, record.normalized());
        if score < config.threshold {
            continue;
        }
        match best {
            Some((best_score, _)) if score <= best_score => {}
            _ => best = Some((score, record.normalized())),
        }
    }

    let Some((score, candidate)) = best else {
        debug!(description, "no candidate above threshold");
        return MatchOutcome::unmapped();
    };

    // First record carrying the winning normalized description
    let Some(record) = table.first_with_normalized(candidate) else {
        return MatchOutcome::unmapped();
    };

    let confidence = match config.confidence {
        ConfidenceMode::Binary => 1.0,
        ConfidenceMode::Graded => score,
    };
    debug!(description, candidate, task_code = record.task_code(), score, "matched");

    MatchOutcome {
        task_code: record.task_code().to_string(),
        confidence,
        candidate: Some(candidate.to_string()),
        score,
    }
}

/// Match every entry against one table state.
pub fn match_entries(
    entries: Vec<TimeEntry>,
    table: &ReferenceTable,
    config: &MatchConfig,
) -> Vec<MatchedEntry> {
    entries
        .into_iter()
        .map(|entry| {
            let outcome = match_description(&entry.description, table, config);
            MatchedEntry::new(entry, outcome.task_code, outcome.confidence)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use shadow_core::ReferenceRecord;

    fn table() -> ReferenceTable {
        ReferenceTable::from_records(vec![
            ReferenceRecord::new("Team sync", "T-100"),
            ReferenceRecord::new("Code review", "T-200"),
            ReferenceRecord::new("Verlagsinfo-Vorbereitung & Abstimmung", "PUB-104"),
            ReferenceRecord::new("Team Sync.", "T-999"),
        ])
    }

    #[test]
    fn test_match_after_normalization() {
        let out = match_description("team   sync!!", &table(), &MatchConfig::default());
        assert_eq!(out.task_code, "T-100");
        assert_eq!(out.confidence, 1.0);
        assert_eq!(out.candidate.as_deref(), Some("team sync"));
    }

    #[test]
    fn test_duplicate_normalized_first_wins() {
        // "Team Sync." normalizes to the same string as "Team sync"; row order decides
        let out = match_description("TEAM SYNC", &table(), &MatchConfig::default());
        assert_eq!(out.task_code, "T-100");
    }

    #[test]
    fn test_match_typo_and_word_order() {
        let cfg = MatchConfig::default();
        assert_eq!(match_description("Code reveiw", &table(), &cfg).task_code, "T-200");
        assert_eq!(match_description("review code", &table(), &cfg).task_code, "T-200");
        assert_eq!(
            match_description("Verlagsinfo–Vorbereitung und Abstimmung", &table(), &cfg).task_code,
            "PUB-104"
        );
    }

    #[test]
    fn test_empty_table_is_unmapped() {
        let out = match_description("Team sync", &ReferenceTable::new(), &MatchConfig::default());
        assert!(out.is_unmapped());
        assert_eq!(out.confidence, 0.0);
        assert!(out.candidate.is_none());
    }

    #[test]
    fn test_unrelated_description_is_unmapped() {
        let out = match_description("Dentist appointment", &table(), &MatchConfig::default());
        assert!(out.is_unmapped());
    }

    #[test]
    fn test_blank_description_is_unmapped() {
        assert!(match_description("", &table(), &MatchConfig::default()).is_unmapped());
        assert!(match_description("?!", &table(), &MatchConfig::default()).is_unmapped());
    }

    #[test]
    fn test_graded_confidence_reports_score() {
        let cfg = MatchConfig {
            confidence: ConfidenceMode::Graded,
            ..MatchConfig::default()
        };
        let exact = match_description("Team sync", &table(), &cfg);
        assert_eq!(exact.confidence, 1.0);

        let typo = match_description("Tem sync", &table(), &cfg);
        assert_eq!(typo.task_code, "T-100");
        assert!(typo.confidence > 0.8 && typo.confidence < 1.0, "{}", typo.confidence);
        assert_eq!(typo.confidence, typo.score);
    }

    #[test]
    fn test_threshold_is_respected() {
        let strict = MatchConfig {
            threshold: 0.95,
            ..MatchConfig::default()
        };
        assert!(match_description("Tem sync", &table(), &strict).is_unmapped());
    }

    #[test]
    fn test_deterministic() {
        let t = table();
        let cfg = MatchConfig::default();
        let a = match_description("code rev", &t, &cfg);
        let b = match_description("code rev", &t, &cfg);
        assert_eq!(a, b);
    }

    #[test]
    fn test_match_entries_keeps_order() {
        let entries = vec![
            TimeEntry::new("12 Jan, 2024", "09:00", "10:00", "Team sync"),
            TimeEntry::new("12 Jan, 2024", "10:00", "11:00", "Dentist appointment"),
            TimeEntry::new("12 Jan, 2024", "11:00", "12:00", "Code review"),
        ];
        let mapped = match_entries(entries, &table(), &MatchConfig::default());
        let codes: Vec<_> = mapped.iter().map(|m| m.task_code.as_str()).collect();
        assert_eq!(codes, vec!["T-100", UNMAPPED, "T-200"]);
        assert_eq!(mapped[1].confidence, 0.0);
    }

    #[test]
    fn test_similarity_bounds() {
        assert_eq!(similarity("a b", "b a"), 1.0);
        assert_eq!(similarity("", "x"), 0.0);
        let s = similarity("team sync", "code review");
        assert!((0.0..0.6).contains(&s));
    }
}
