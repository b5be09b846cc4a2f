use crate::analyzers::statistics::{mean, one_way_anova, pearson, AnovaResult};
use crate::config::{AnalysisConfig, CleanerConfig};
use crate::models::{AqiCategory, Cell, ColumnRoles, Dataset, ResolvedColumn};
use crate::utils::constants::CANONICAL_TIMESTAMP_FORMAT;
use crate::utils::timestamp::{parse_timestamp, season_bucket, season_name};
use chrono::{Datelike, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use tracing::{info, warn};

pub const NO_DATE_COLUMN: &str = "No date column found. Skipping time-based analysis.";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendPoint {
    pub timestamp: String,
    pub mean: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendSeries {
    pub pollutant: String,
    pub points: Vec<TrendPoint>,
}

/// Mean of the pollutant for one city at one timestamp.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CityTrendPoint {
    pub timestamp: String,
    pub city: String,
    pub mean: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyMean {
    pub year: i32,
    pub month: u32,
    pub mean: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeasonGroup {
    pub season: String,
    pub count: usize,
    pub mean: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeasonalAnova {
    pub pollutant: String,
    pub groups: Vec<SeasonGroup>,
    pub result: AnovaResult,
    pub significance_level: f64,
    pub significant: bool,
}

/// Pairwise Pearson correlations; `None` where a pair is undefined.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorrelationMatrix {
    pub columns: Vec<String>,
    pub values: Vec<Vec<Option<f64>>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CityMean {
    pub city: String,
    pub mean_quality_index: f64,
    pub observations: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryCount {
    pub category: String,
    pub count: usize,
}

/// Everything computed for one cleaned file. Skipped analyses are `None`,
/// with the reason recorded in `notes`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub filename: String,
    pub rows: usize,
    pub columns: Vec<String>,
    pub temporal_column: Option<String>,
    pub trend: Option<TrendSeries>,
    pub city_trend: Option<Vec<CityTrendPoint>>,
    pub monthly_trend: Option<Vec<MonthlyMean>>,
    pub seasonal_anova: Option<SeasonalAnova>,
    pub correlation: Option<CorrelationMatrix>,
    pub top_cities: Option<Vec<CityMean>>,
    pub category_distribution: Vec<CategoryCount>,
    pub notes: Vec<String>,
}

impl AnalysisReport {
    fn note(&mut self, message: impl Into<String>) {
        let message = message.into();
        warn!(file = %self.filename, "{}", message);
        self.notes.push(message);
    }

    pub fn summary(&self) -> String {
        let mut summary = format!("{}: {} rows", self.filename, self.rows);

        match &self.temporal_column {
            Some(column) => summary.push_str(&format!(", date column '{}'", column)),
            None => summary.push_str(", no date column"),
        }
        if let Some(trend) = &self.trend {
            summary.push_str(&format!(", {} trend points", trend.points.len()));
        }
        if let Some(anova) = &self.seasonal_anova {
            summary.push_str(&format!(
                ", seasonal ANOVA F={:.2} p={:.4}{}",
                anova.result.f_statistic,
                anova.result.p_value,
                if anova.significant { " (significant)" } else { "" }
            ));
        }
        if let Some(correlation) = &self.correlation {
            summary.push_str(&format!(
                ", {}x{} correlation matrix",
                correlation.columns.len(),
                correlation.columns.len()
            ));
        }

        summary
    }
}

/// Aggregations over a cleaned dataset.
pub struct AirQualityAnalyzer {
    columns: CleanerConfig,
    settings: AnalysisConfig,
}

impl AirQualityAnalyzer {
    pub fn new(columns: CleanerConfig, settings: AnalysisConfig) -> Self {
        Self { columns, settings }
    }

    pub fn analyze(&self, dataset: &Dataset) -> AnalysisReport {
        let roles = ColumnRoles::resolve(dataset.headers(), &self.columns);

        let mut report = AnalysisReport {
            filename: dataset.name.clone(),
            rows: dataset.row_count(),
            columns: dataset.headers().to_vec(),
            ..AnalysisReport::default()
        };
        info!(file = %report.filename, columns = ?report.columns, "Analyzing");

        // Rows whose timestamp parses; every row when there is no temporal column
        let timed = roles
            .temporal
            .as_ref()
            .map(|column| timed_rows(dataset, column));

        let row_ids: Vec<usize> = match &timed {
            Some(rows) => rows.iter().map(|(_, i)| *i).collect(),
            None => (0..dataset.row_count()).collect(),
        };

        match (&roles.temporal, &timed) {
            (Some(column), Some(rows)) => {
                info!(file = %report.filename, column = %column.name, "Date column detected");
                report.temporal_column = Some(column.name.clone());
                self.time_based(dataset, &roles, rows, &mut report);
            }
            _ => report.note(NO_DATE_COLUMN),
        }

        report.correlation = self.correlation_matrix(dataset, &roles, &row_ids);
        if report.correlation.is_none() {
            report.note("Not enough pollutants for correlation analysis.");
        }

        report.top_cities = self.top_cities(dataset, &roles, &row_ids);
        if report.top_cities.is_none() {
            report.note(format!(
                "Columns '{}' or '{}' not found. Skipping top cities.",
                self.columns.city_column, self.columns.quality_index
            ));
        }

        report.category_distribution = category_distribution(dataset, &roles, &row_ids);

        report
    }

    fn time_based(
        &self,
        dataset: &Dataset,
        roles: &ColumnRoles,
        rows: &[(NaiveDateTime, usize)],
        report: &mut AnalysisReport,
    ) {
        let pollutant_name = &self.settings.trend_pollutant;
        let Some(pollutant) = roles.pollutant(pollutant_name) else {
            report.note(format!(
                "No {} column. Skipping {} analysis.",
                pollutant_name, pollutant_name
            ));
            return;
        };

        report.trend = Some(pollutant_trend(dataset, pollutant, rows));
        report.city_trend = roles
            .city
            .as_ref()
            .map(|city| city_trend(dataset, pollutant, city, rows));
        report.monthly_trend = Some(monthly_trend(dataset, pollutant, rows));

        match self.seasonal_anova(dataset, pollutant, rows) {
            Ok(anova) => {
                info!(
                    file = %report.filename,
                    pollutant = %pollutant.name,
                    f = anova.result.f_statistic,
                    p = anova.result.p_value,
                    significant = anova.significant,
                    "Seasonal ANOVA"
                );
                report.seasonal_anova = Some(anova);
            }
            Err(reason) => report.note(reason),
        }
    }

    /// One-way ANOVA of a pollutant across the four month-derived seasons.
    pub fn seasonal_anova(
        &self,
        dataset: &Dataset,
        pollutant: &ResolvedColumn,
        rows: &[(NaiveDateTime, usize)],
    ) -> std::result::Result<SeasonalAnova, String> {
        let mut buckets: BTreeMap<u32, Vec<f64>> = BTreeMap::new();
        for (timestamp, row) in rows {
            let bucket = buckets.entry(season_bucket(timestamp.month())).or_default();
            if let Some(v) = numeric(dataset.cell(*row, pollutant.index)) {
                bucket.push(v);
            }
        }

        if buckets.values().filter(|b| !b.is_empty()).count() < 2 {
            return Err("Not enough seasons for ANOVA test.".to_string());
        }

        let groups: Vec<SeasonGroup> = buckets
            .iter()
            .filter(|(_, values)| !values.is_empty())
            .map(|(bucket, values)| SeasonGroup {
                season: season_name(*bucket).to_string(),
                count: values.len(),
                mean: mean(values).unwrap_or(f64::NAN),
            })
            .collect();

        let samples: Vec<Vec<f64>> = buckets.into_values().collect();
        let result = one_way_anova(&samples).map_err(|e| e.to_string())?;
        let significant = result.p_value < self.settings.significance_level;

        Ok(SeasonalAnova {
            pollutant: pollutant.name.clone(),
            groups,
            result,
            significance_level: self.settings.significance_level,
            significant,
        })
    }

    /// Pearson correlations using pairwise-complete observations.
    pub fn correlation_matrix(
        &self,
        dataset: &Dataset,
        roles: &ColumnRoles,
        row_ids: &[usize],
    ) -> Option<CorrelationMatrix> {
        if roles.pollutants.len() < 2 {
            return None;
        }

        let series: Vec<Vec<Option<f64>>> = roles
            .pollutants
            .iter()
            .map(|column| {
                row_ids
                    .iter()
                    .map(|row| numeric(dataset.cell(*row, column.index)))
                    .collect()
            })
            .collect();

        let values = series
            .iter()
            .map(|a| {
                series
                    .iter()
                    .map(|b| {
                        let (x, y): (Vec<f64>, Vec<f64>) = a
                            .iter()
                            .zip(b.iter())
                            .filter_map(|(x, y)| Some(((*x)?, (*y)?)))
                            .unzip();
                        pearson(&x, &y)
                    })
                    .collect()
            })
            .collect();

        Some(CorrelationMatrix {
            columns: roles.pollutants.iter().map(|c| c.name.clone()).collect(),
            values,
        })
    }

    /// Mean quality index per city, highest first.
    pub fn top_cities(
        &self,
        dataset: &Dataset,
        roles: &ColumnRoles,
        row_ids: &[usize],
    ) -> Option<Vec<CityMean>> {
        let city = roles.city.as_ref()?;
        let quality = roles.quality_index.as_ref()?;

        let mut totals: HashMap<String, (f64, usize)> = HashMap::new();
        for row in row_ids {
            let Cell::Text(name) = dataset.cell(*row, city.index) else {
                continue;
            };
            if let Some(v) = numeric(dataset.cell(*row, quality.index)) {
                let entry = totals.entry(name.clone()).or_insert((0.0, 0));
                entry.0 += v;
                entry.1 += 1;
            }
        }

        let mut cities: Vec<CityMean> = totals
            .into_iter()
            .map(|(city, (sum, count))| CityMean {
                city,
                mean_quality_index: sum / count as f64,
                observations: count,
            })
            .collect();

        cities.sort_by(|a, b| {
            b.mean_quality_index
                .total_cmp(&a.mean_quality_index)
                .then_with(|| a.city.cmp(&b.city))
        });
        cities.truncate(self.settings.top_n);

        Some(cities)
    }
}

fn numeric(cell: &Cell) -> Option<f64> {
    cell.to_numeric().as_number()
}

fn timed_rows(dataset: &Dataset, column: &ResolvedColumn) -> Vec<(NaiveDateTime, usize)> {
    dataset
        .column(column.index)
        .enumerate()
        .filter_map(|(row, cell)| cell.as_text().and_then(parse_timestamp).map(|ts| (ts, row)))
        .collect()
}

/// Mean of the pollutant per distinct timestamp, ascending.
fn pollutant_trend(
    dataset: &Dataset,
    pollutant: &ResolvedColumn,
    rows: &[(NaiveDateTime, usize)],
) -> TrendSeries {
    let mut groups: BTreeMap<NaiveDateTime, Vec<f64>> = BTreeMap::new();
    for (timestamp, row) in rows {
        if let Some(v) = numeric(dataset.cell(*row, pollutant.index)) {
            groups.entry(*timestamp).or_default().push(v);
        }
    }

    TrendSeries {
        pollutant: pollutant.name.clone(),
        points: groups
            .into_iter()
            .filter_map(|(timestamp, values)| {
                Some(TrendPoint {
                    timestamp: timestamp.format(CANONICAL_TIMESTAMP_FORMAT).to_string(),
                    mean: mean(&values)?,
                })
            })
            .collect(),
    }
}

/// Mean of the pollutant per (timestamp, city), ascending by both.
fn city_trend(
    dataset: &Dataset,
    pollutant: &ResolvedColumn,
    city: &ResolvedColumn,
    rows: &[(NaiveDateTime, usize)],
) -> Vec<CityTrendPoint> {
    let mut groups: BTreeMap<(NaiveDateTime, String), Vec<f64>> = BTreeMap::new();
    for (timestamp, row) in rows {
        let Cell::Text(name) = dataset.cell(*row, city.index) else {
            continue;
        };
        if let Some(v) = numeric(dataset.cell(*row, pollutant.index)) {
            groups.entry((*timestamp, name.clone())).or_default().push(v);
        }
    }

    groups
        .into_iter()
        .filter_map(|((timestamp, city), values)| {
            Some(CityTrendPoint {
                timestamp: timestamp.format(CANONICAL_TIMESTAMP_FORMAT).to_string(),
                city,
                mean: mean(&values)?,
            })
        })
        .collect()
}

fn monthly_trend(
    dataset: &Dataset,
    pollutant: &ResolvedColumn,
    rows: &[(NaiveDateTime, usize)],
) -> Vec<MonthlyMean> {
    let mut groups: BTreeMap<(i32, u32), Vec<f64>> = BTreeMap::new();
    for (timestamp, row) in rows {
        if let Some(v) = numeric(dataset.cell(*row, pollutant.index)) {
            groups
                .entry((timestamp.year(), timestamp.month()))
                .or_default()
                .push(v);
        }
    }

    groups
        .into_iter()
        .filter_map(|((year, month), values)| {
            Some(MonthlyMean {
                year,
                month,
                mean: mean(&values)?,
            })
        })
        .collect()
}

fn category_distribution(
    dataset: &Dataset,
    roles: &ColumnRoles,
    row_ids: &[usize],
) -> Vec<CategoryCount> {
    let Some(quality) = roles.quality_index.as_ref() else {
        return Vec::new();
    };

    let mut counts: BTreeMap<AqiCategory, usize> = BTreeMap::new();
    for row in row_ids {
        let category =
            numeric(dataset.cell(*row, quality.index)).and_then(AqiCategory::from_index);
        if let Some(category) = category {
            *counts.entry(category).or_default() += 1;
        }
    }

    counts
        .into_iter()
        .map(|(category, count)| CategoryCount {
            category: category.label().to_string(),
            count,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn analyzer() -> AirQualityAnalyzer {
        AirQualityAnalyzer::new(CleanerConfig::default(), AnalysisConfig::default())
    }

    fn city_dataset() -> Dataset {
        Dataset::from_raw_rows(
            "city_day_cleaned.csv",
            &["City", "Date", "PM2.5", "PM10", "AQI"],
            &[
                vec!["Delhi", "2020-01-01 00:00:00", "100", "200", "320"],
                vec!["Agra", "2020-01-01 00:00:00", "50", "100", "120"],
                vec!["Delhi", "2020-01-15 00:00:00", "110", "220", "340"],
                vec!["Delhi", "2020-04-01 00:00:00", "60", "120", "180"],
                vec!["Agra", "2020-04-10 00:00:00", "40", "80", "90"],
                vec!["Delhi", "2020-07-01 00:00:00", "30", "60", "80"],
                vec!["Agra", "2020-07-02 00:00:00", "20", "40", "45"],
                vec!["Delhi", "not-a-date", "999", "999", "500"],
            ],
        )
    }

    #[test]
    fn test_trend_groups_by_timestamp() {
        let report = analyzer().analyze(&city_dataset());
        let trend = report.trend.unwrap();

        assert_eq!(trend.pollutant, "PM2.5");
        assert_eq!(trend.points.len(), 6);
        assert_eq!(
            trend.points[0],
            TrendPoint {
                timestamp: "2020-01-01 00:00:00".to_string(),
                mean: 75.0
            }
        );
    }

    #[test]
    fn test_trend_split_by_city() {
        let report = analyzer().analyze(&city_dataset());
        let points = report.city_trend.unwrap();

        // One point per valid (timestamp, city) row
        assert_eq!(points.len(), 7);
        assert_eq!(
            points[0],
            CityTrendPoint {
                timestamp: "2020-01-01 00:00:00".to_string(),
                city: "Agra".to_string(),
                mean: 50.0
            }
        );
        assert_eq!(points[1].city, "Delhi");
        assert_eq!(points[1].mean, 100.0);
        assert!(points.iter().all(|p| p.mean != 999.0));
    }

    #[test]
    fn test_city_trend_needs_city_column() {
        let dataset = Dataset::from_raw_rows(
            "station_day_cleaned.csv",
            &["StationId", "Date", "PM2.5"],
            &[vec!["ST1", "2020-01-01", "1"], vec!["ST2", "2020-01-01", "3"]],
        );
        let report = analyzer().analyze(&dataset);

        assert!(report.trend.is_some());
        assert!(report.city_trend.is_none());
    }

    #[test]
    fn test_monthly_trend() {
        let report = analyzer().analyze(&city_dataset());
        let monthly = report.monthly_trend.unwrap();

        assert_eq!(monthly.len(), 3);
        assert_eq!(
            monthly[0],
            MonthlyMean {
                year: 2020,
                month: 1,
                mean: (100.0 + 50.0 + 110.0) / 3.0
            }
        );
    }

    #[test]
    fn test_seasonal_anova_runs_over_three_seasons() {
        let report = analyzer().analyze(&city_dataset());
        let anova = report.seasonal_anova.unwrap();

        let seasons: Vec<&str> = anova.groups.iter().map(|g| g.season.as_str()).collect();
        assert_eq!(seasons, vec!["Winter", "Spring", "Summer"]);
        assert_eq!(anova.result.df_between, 2);
        assert_eq!(anova.result.df_within, 4);
        assert!(anova.result.f_statistic > 0.0);
        assert!((0.0..=1.0).contains(&anova.result.p_value));
    }

    #[test]
    fn test_single_season_skips_anova() {
        let dataset = Dataset::from_raw_rows(
            "x.csv",
            &["Date", "PM2.5"],
            &[vec!["2020-01-01", "1"], vec!["2020-02-01", "2"]],
        );
        let report = analyzer().analyze(&dataset);

        assert!(report.seasonal_anova.is_none());
        assert!(report
            .notes
            .iter()
            .any(|n| n == "Not enough seasons for ANOVA test."));
    }

    #[test]
    fn test_correlation_of_proportional_columns() {
        let report = analyzer().analyze(&city_dataset());
        let correlation = report.correlation.unwrap();

        assert_eq!(correlation.columns, vec!["PM2.5", "PM10"]);
        let r = correlation.values[0][1].unwrap();
        assert!((r - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_top_cities_ordered_by_mean_aqi() {
        let report = analyzer().analyze(&city_dataset());
        let cities = report.top_cities.unwrap();

        assert_eq!(cities[0].city, "Delhi");
        assert_eq!(cities[0].observations, 4);
        assert_eq!(cities[0].mean_quality_index, (320.0 + 340.0 + 180.0 + 80.0) / 4.0);
        assert_eq!(cities[1].city, "Agra");
    }

    #[test]
    fn test_category_distribution() {
        let report = analyzer().analyze(&city_dataset());
        let total: usize = report.category_distribution.iter().map(|c| c.count).sum();

        assert_eq!(total, 7);
        assert_eq!(
            report.category_distribution[0],
            CategoryCount {
                category: "Good".to_string(),
                count: 1
            }
        );
    }

    #[test]
    fn test_no_date_column_reported_not_failed() {
        let dataset = Dataset::from_raw_rows(
            "stations_cleaned.csv",
            &["StationId", "City", "Status"],
            &[vec!["ST1", "Delhi", "Active"]],
        );
        let report = analyzer().analyze(&dataset);

        assert!(report.temporal_column.is_none());
        assert!(report.trend.is_none());
        assert!(report.seasonal_anova.is_none());
        assert!(report.correlation.is_none());
        assert!(report.notes.iter().any(|n| n == NO_DATE_COLUMN));
    }

    #[test]
    fn test_missing_trend_pollutant_is_skipped() {
        let dataset = Dataset::from_raw_rows(
            "x.csv",
            &["Date", "NO2", "SO2"],
            &[vec!["2020-01-01", "1", "2"], vec!["2020-06-01", "2", "5"]],
        );
        let report = analyzer().analyze(&dataset);

        assert!(report.trend.is_none());
        assert!(report.correlation.is_some());
        assert!(report.notes.iter().any(|n| n.starts_with("No PM2.5 column")));
    }
}
