use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::utils::constants::NOT_APPLICABLE;

/// Row-level counters collected while cleaning one dataset.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CleaningStats {
    pub input_rows: usize,
    pub duplicates_removed: usize,
    pub empty_rows_removed: usize,
    pub invalid_timestamps_dropped: usize,
    pub values_coerced_to_missing: usize,
    pub values_imputed: BTreeMap<String, usize>,
    pub values_clipped: usize,
    pub temporal_column: Option<String>,
    pub categories: Vec<String>,
}

impl CleaningStats {
    pub fn total_imputed(&self) -> usize {
        self.values_imputed.values().sum()
    }
}

/// The per-file record reported after cleaning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CleaningSummary {
    pub filename: String,
    pub rows: usize,
    pub columns: usize,
    pub date_range: String,
    #[serde(default)]
    pub stats: CleaningStats,
}

impl CleaningSummary {
    pub fn date_range_text(range: Option<(&str, &str)>) -> String {
        match range {
            Some((first, last)) => format!("{} to {}", first, last),
            None => NOT_APPLICABLE.to_string(),
        }
    }

    pub fn summary(&self) -> String {
        format!(
            "{}: {} rows, {} columns, date range {}",
            self.filename, self.rows, self.columns, self.date_range
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailedFile {
    pub filename: String,
    pub error: String,
}

/// Outcome of a whole batch run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BatchReport {
    pub succeeded: Vec<CleaningSummary>,
    pub failed: Vec<FailedFile>,
}

impl BatchReport {
    pub fn total_files(&self) -> usize {
        self.succeeded.len() + self.failed.len()
    }

    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }

    pub fn generate_summary(&self) -> String {
        let mut summary = String::new();

        summary.push_str("=== Cleaning Report ===\n");
        summary.push_str(&format!(
            "Files: {} cleaned, {} failed, {} total\n",
            self.succeeded.len(),
            self.failed.len(),
            self.total_files()
        ));

        for file in &self.succeeded {
            summary.push_str(&format!("  ✓ {}\n", file.summary()));
            summary.push_str(&format!(
                "      duplicates: {}, empty rows: {}, bad timestamps: {}, imputed: {}, clipped: {}\n",
                file.stats.duplicates_removed,
                file.stats.empty_rows_removed,
                file.stats.invalid_timestamps_dropped,
                file.stats.total_imputed(),
                file.stats.values_clipped
            ));
        }

        for file in &self.failed {
            summary.push_str(&format!("  ✗ {}: {}\n", file.filename, file.error));
        }

        summary
    }
}
