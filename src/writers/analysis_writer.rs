use crate::analyzers::AnalysisReport;
use crate::error::Result;
use crate::utils::artifact_file_name;
use crate::writers::{write_json, CsvWriter};
use std::path::{Path, PathBuf};
use tracing::info;

/// Writes the tables behind each analysis next to a JSON report.
pub struct AnalysisWriter {
    csv: CsvWriter,
}

impl AnalysisWriter {
    pub fn new() -> Self {
        Self {
            csv: CsvWriter::new(),
        }
    }

    /// Returns the paths written, in a stable order.
    pub fn write_report(&self, report: &AnalysisReport, output_dir: &Path) -> Result<Vec<PathBuf>> {
        let mut written = Vec::new();
        let name = report.filename.as_str();

        if let Some(trend) = &report.trend {
            let slug = pollutant_slug(&trend.pollutant);
            let path = output_dir.join(artifact_file_name(name, &format!("_{}_trend", slug), "csv"));
            self.csv.write_table(
                &path,
                &["timestamp", trend.pollutant.as_str()],
                trend
                    .points
                    .iter()
                    .map(|p| vec![p.timestamp.clone(), p.mean.to_string()]),
            )?;
            written.push(path);

            if let Some(points) = &report.city_trend {
                let path = output_dir.join(artifact_file_name(
                    name,
                    &format!("_{}_trend_by_city", slug),
                    "csv",
                ));
                self.csv.write_table(
                    &path,
                    &["timestamp", "City", trend.pollutant.as_str()],
                    points
                        .iter()
                        .map(|p| vec![p.timestamp.clone(), p.city.clone(), p.mean.to_string()]),
                )?;
                written.push(path);
            }
        }

        if let (Some(trend), Some(monthly)) = (&report.trend, &report.monthly_trend) {
            let slug = pollutant_slug(&trend.pollutant);
            let path =
                output_dir.join(artifact_file_name(name, &format!("_monthly_{}", slug), "csv"));
            self.csv.write_table(
                &path,
                &["year", "month", trend.pollutant.as_str()],
                monthly
                    .iter()
                    .map(|m| vec![m.year.to_string(), m.month.to_string(), m.mean.to_string()]),
            )?;
            written.push(path);
        }

        if let Some(matrix) = &report.correlation {
            let path = output_dir.join(artifact_file_name(name, "_correlation", "csv"));
            let mut headers = vec![String::new()];
            headers.extend(matrix.columns.iter().cloned());

            let rows = matrix.columns.iter().zip(&matrix.values).map(|(column, values)| {
                let mut row = vec![column.clone()];
                row.extend(values.iter().map(|v| v.map(|r| r.to_string()).unwrap_or_default()));
                row
            });
            self.csv.write_table(&path, &headers, rows)?;
            written.push(path);
        }

        if let Some(cities) = &report.top_cities {
            let path = output_dir.join(artifact_file_name(name, "_top_cities", "csv"));
            self.csv.write_table(
                &path,
                &["City", "mean_AQI", "observations"],
                cities.iter().map(|c| {
                    vec![
                        c.city.clone(),
                        c.mean_quality_index.to_string(),
                        c.observations.to_string(),
                    ]
                }),
            )?;
            written.push(path);
        }

        let path = output_dir.join(artifact_file_name(name, "_analysis", "json"));
        write_json(report, &path)?;
        written.push(path);

        for path in &written {
            info!(path = %path.display(), "Saved");
        }

        Ok(written)
    }
}

impl Default for AnalysisWriter {
    fn default() -> Self {
        Self::new()
    }
}

/// `PM2.5` -> `pm25`
fn pollutant_slug(pollutant: &str) -> String {
    pollutant
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzers::{CityTrendPoint, CorrelationMatrix, TrendPoint, TrendSeries};
    use tempfile::TempDir;

    #[test]
    fn test_pollutant_slug() {
        assert_eq!(pollutant_slug("PM2.5"), "pm25");
        assert_eq!(pollutant_slug("NOx"), "nox");
    }

    #[test]
    fn test_writes_only_present_artifacts() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let report = AnalysisReport {
            filename: "city_day_cleaned.csv".to_string(),
            trend: Some(TrendSeries {
                pollutant: "PM2.5".to_string(),
                points: vec![TrendPoint {
                    timestamp: "2020-01-01 00:00:00".to_string(),
                    mean: 12.5,
                }],
            }),
            city_trend: Some(vec![CityTrendPoint {
                timestamp: "2020-01-01 00:00:00".to_string(),
                city: "Delhi".to_string(),
                mean: 12.5,
            }]),
            correlation: Some(CorrelationMatrix {
                columns: vec!["PM2.5".to_string(), "PM10".to_string()],
                values: vec![vec![Some(1.0), None], vec![None, Some(1.0)]],
            }),
            ..AnalysisReport::default()
        };

        let written = AnalysisWriter::new().write_report(&report, temp_dir.path())?;
        let names: Vec<String> = written
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();

        assert_eq!(
            names,
            vec![
                "city_day_cleaned_pm25_trend.csv",
                "city_day_cleaned_pm25_trend_by_city.csv",
                "city_day_cleaned_correlation.csv",
                "city_day_cleaned_analysis.json",
            ]
        );

        let trend = std::fs::read_to_string(&written[0])?;
        assert_eq!(trend, "timestamp,PM2.5\n2020-01-01 00:00:00,12.5\n");

        let by_city = std::fs::read_to_string(&written[1])?;
        assert_eq!(by_city, "timestamp,City,PM2.5\n2020-01-01 00:00:00,Delhi,12.5\n");

        let correlation = std::fs::read_to_string(&written[2])?;
        assert_eq!(correlation, ",PM2.5,PM10\nPM2.5,1,\nPM10,,1\n");
        Ok(())
    }
}
