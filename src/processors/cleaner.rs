use crate::analyzers::statistics::median;
use crate::config::CleanerConfig;
use crate::models::dataset::CellKey;
use crate::models::{
    Cell, CleaningStats, CleaningSummary, ColumnKind, ColumnRoles, Dataset, ResolvedColumn,
};
use crate::utils::cleaned_file_name;
use crate::utils::constants::CANONICAL_TIMESTAMP_FORMAT;
use crate::utils::timestamp::parse_timestamp;
use std::collections::HashSet;
use tracing::{debug, warn};

/// Turns a raw air-quality dataset into its cleaned form.
///
/// Every step is total: bad values are dropped or coerced, never reported as
/// errors. The steps run in a fixed order:
///
/// 1. drop exact duplicates, then rows with every field missing
/// 2. canonicalize the temporal column, dropping unparseable rows
/// 3. coerce pollutant and quality-index columns to numbers
/// 4. fill missing pollutant values with the column median
/// 5. mark the quality category column as categorical
/// 6. clip the quality index into its valid range
/// 7. sort ascending by the temporal column
/// 8. build the summary record
pub struct Cleaner {
    config: CleanerConfig,
}

impl Cleaner {
    pub fn new(config: CleanerConfig) -> Self {
        Self { config }
    }

    pub fn clean(&self, mut dataset: Dataset) -> (Dataset, CleaningSummary) {
        let mut stats = CleaningStats {
            input_rows: dataset.row_count(),
            ..CleaningStats::default()
        };

        let roles = ColumnRoles::resolve(dataset.headers(), &self.config);

        stats.duplicates_removed += remove_duplicates(&mut dataset);
        stats.empty_rows_removed += remove_empty_rows(&mut dataset);

        match &roles.temporal {
            Some(column) => {
                stats.invalid_timestamps_dropped = normalize_timestamps(&mut dataset, column);
                stats.temporal_column = Some(column.name.clone());
            }
            None => warn!(
                file = %dataset.name,
                "No temporal column found, skipping timestamp normalization"
            ),
        }

        for column in roles.pollutants.iter().chain(roles.quality_index.iter()) {
            stats.values_coerced_to_missing += coerce_numeric(&mut dataset, column);
        }

        for column in &roles.pollutants {
            self.impute_median(&mut dataset, column, &mut stats);
        }
        if self.config.impute_quality_index {
            if let Some(column) = &roles.quality_index {
                self.impute_median(&mut dataset, column, &mut stats);
            }
        }

        if let Some(column) = &roles.quality_category {
            stats.categories = mark_categorical(&mut dataset, column);
        }

        if let Some(column) = &roles.quality_index {
            stats.values_clipped = self.clip_quality_index(&mut dataset, column);
        }

        // Coercion and canonical timestamps can make distinct raw rows equal
        stats.duplicates_removed += remove_duplicates(&mut dataset);
        stats.empty_rows_removed += remove_empty_rows(&mut dataset);

        if let Some(column) = &roles.temporal {
            sort_chronologically(&mut dataset, column);
        }

        let summary = summarize(&dataset, roles.temporal.as_ref(), stats);
        (dataset, summary)
    }

    fn impute_median(
        &self,
        dataset: &mut Dataset,
        column: &ResolvedColumn,
        stats: &mut CleaningStats,
    ) {
        // inf and -inf together give a NaN median, which would not survive a rewrite
        let fill = median(&dataset.numeric_values(column.index)).filter(|m| m.is_finite());
        let Some(fill) = fill else {
            if dataset.column(column.index).any(Cell::is_missing) {
                warn!(
                    file = %dataset.name,
                    column = %column.name,
                    "Column has no finite median, leaving missing values in place"
                );
            }
            return;
        };

        let mut filled = 0;
        dataset.map_column(column.index, |cell| {
            if cell.is_missing() {
                filled += 1;
                Cell::Number(fill)
            } else {
                cell.clone()
            }
        });

        if filled > 0 {
            debug!(column = %column.name, filled, median = fill, "Imputed missing values");
            stats.values_imputed.insert(column.name.clone(), filled);
        }
    }

    fn clip_quality_index(&self, dataset: &mut Dataset, column: &ResolvedColumn) -> usize {
        let (min, max) = (self.config.quality_min, self.config.quality_max);
        let mut clipped = 0;

        dataset.map_column(column.index, |cell| match cell {
            Cell::Number(v) if *v < min || *v > max => {
                clipped += 1;
                Cell::Number(v.clamp(min, max))
            }
            other => other.clone(),
        });

        clipped
    }
}

/// Drop rows identical to an earlier row, keeping the first occurrence.
fn remove_duplicates(dataset: &mut Dataset) -> usize {
    let keep: Vec<bool> = {
        let mut seen: HashSet<Vec<CellKey<'_>>> = HashSet::with_capacity(dataset.row_count());
        dataset
            .rows()
            .iter()
            .map(|row| seen.insert(row.iter().map(Cell::identity).collect()))
            .collect()
    };

    let before = dataset.row_count();
    let mut flags = keep.into_iter();
    dataset.retain_rows(|_| flags.next().unwrap_or(true));
    before - dataset.row_count()
}

fn remove_empty_rows(dataset: &mut Dataset) -> usize {
    let before = dataset.row_count();
    dataset.retain_rows(|row| !row.iter().all(Cell::is_missing));
    before - dataset.row_count()
}

/// Rewrite the temporal column in canonical form; returns rows dropped.
fn normalize_timestamps(dataset: &mut Dataset, column: &ResolvedColumn) -> usize {
    dataset.map_column(column.index, |cell| {
        let parsed = match cell {
            Cell::Text(s) => parse_timestamp(s),
            Cell::Number(v) => parse_timestamp(&v.to_string()),
            Cell::Missing => None,
        };
        parsed
            .map(|dt| Cell::Text(dt.format(CANONICAL_TIMESTAMP_FORMAT).to_string()))
            .unwrap_or(Cell::Missing)
    });
    dataset.set_kind(column.index, ColumnKind::Temporal);

    let before = dataset.row_count();
    dataset.retain_rows(|row| !row[column.index].is_missing());
    let dropped = before - dataset.row_count();

    if dropped > 0 {
        debug!(column = %column.name, dropped, "Dropped rows with unparseable timestamps");
    }
    dropped
}

/// Coerce a column to numbers; returns how many present values became missing.
fn coerce_numeric(dataset: &mut Dataset, column: &ResolvedColumn) -> usize {
    let mut lost = 0;
    dataset.map_column(column.index, |cell| {
        let coerced = cell.to_numeric();
        if coerced.is_missing() && !cell.is_missing() {
            lost += 1;
        }
        coerced
    });
    dataset.set_kind(column.index, ColumnKind::Numeric);
    lost
}

/// Mark a label column categorical and return its labels in first-seen order.
fn mark_categorical(dataset: &mut Dataset, column: &ResolvedColumn) -> Vec<String> {
    dataset.set_kind(column.index, ColumnKind::Categorical);

    let mut seen = HashSet::new();
    dataset
        .column(column.index)
        .filter_map(|cell| match cell {
            Cell::Missing => None,
            other => Some(other.to_string()),
        })
        .filter(|label| seen.insert(label.clone()))
        .collect()
}

/// Stable sort; canonical timestamps order lexicographically.
fn sort_chronologically(dataset: &mut Dataset, column: &ResolvedColumn) {
    let index = column.index;
    dataset.sort_rows_by(|a, b| a[index].as_text().cmp(&b[index].as_text()));
}

fn summarize(
    dataset: &Dataset,
    temporal: Option<&ResolvedColumn>,
    stats: CleaningStats,
) -> CleaningSummary {
    let range = temporal.and_then(|column| {
        let first = dataset.rows().first()?[column.index].as_text()?;
        let last = dataset.rows().last()?[column.index].as_text()?;
        Some((first, last))
    });

    CleaningSummary {
        filename: cleaned_file_name(&dataset.name),
        rows: dataset.row_count(),
        columns: dataset.column_count(),
        date_range: CleaningSummary::date_range_text(range),
        stats,
    }
}
