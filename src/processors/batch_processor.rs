use crate::analyzers::{AirQualityAnalyzer, AnalysisReport};
use crate::config::AppConfig;
use crate::error::Result;
use crate::models::{BatchReport, CleaningSummary, FailedFile};
use crate::processors::Cleaner;
use crate::readers::DatasetReader;
use crate::utils::constants::BATCH_REPORT_FILE;
use crate::utils::{cleaned_file_name, ProgressReporter};
use crate::writers::{write_json, AnalysisWriter, CsvWriter};
use std::path::PathBuf;
use tracing::{error, info, info_span};

/// Outcome of analyzing every cleaned file.
#[derive(Debug, Default)]
pub struct AnalysisBatch {
    pub reports: Vec<AnalysisReport>,
    pub failed: Vec<FailedFile>,
}

impl AnalysisBatch {
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }

    pub fn generate_summary(&self) -> String {
        let mut summary = String::from("=== Analysis Report ===\n");
        summary.push_str(&format!(
            "Files: {} analyzed, {} failed\n",
            self.reports.len(),
            self.failed.len()
        ));
        for report in &self.reports {
            summary.push_str(&format!("  ✓ {}\n", report.summary()));
            for note in &report.notes {
                summary.push_str(&format!("      - {}\n", note));
            }
        }
        for file in &self.failed {
            summary.push_str(&format!("  ✗ {}: {}\n", file.filename, file.error));
        }
        summary
    }
}

/// Runs the cleaner and analyzer over the configured file list, one file at
/// a time, in list order. A failing file is recorded and the batch moves on.
pub struct BatchProcessor {
    config: AppConfig,
    silent: bool,
}

impl BatchProcessor {
    pub fn new(config: AppConfig) -> Self {
        Self {
            config,
            silent: false,
        }
    }

    pub fn with_silent(mut self, silent: bool) -> Self {
        self.silent = silent;
        self
    }

    pub fn clean_all(&self) -> BatchReport {
        let files = &self.config.paths.files;
        let progress = self.progress(files.len(), "Cleaning");
        let mut report = BatchReport::default();

        for filename in files {
            progress.start_file(filename);

            match self.clean_file(filename) {
                Ok(summary) => report.succeeded.push(summary),
                Err(e) => {
                    error!(file = %filename, error = %e, "Failed to clean file");
                    report.failed.push(FailedFile {
                        filename: filename.clone(),
                        error: e.to_string(),
                    });
                }
            }

            progress.finish_file();
        }

        progress.finish_with_message(&format!(
            "{} cleaned, {} failed",
            report.succeeded.len(),
            report.failed.len()
        ));
        report
    }

    /// Read, clean and write one raw file.
    pub fn clean_file(&self, filename: &str) -> Result<CleaningSummary> {
        let _span = info_span!("clean", file = %filename).entered();
        info!("Cleaning {}...", filename);

        let input = self.config.paths.raw_dir.join(filename);
        let dataset = DatasetReader::new().read_dataset(&input)?;

        let cleaner = Cleaner::new(self.config.cleaner.clone());
        let (cleaned, summary) = cleaner.clean(dataset);

        let output = self.config.paths.processed_dir.join(&summary.filename);
        CsvWriter::new().write_dataset(&cleaned, &output)?;
        info!(path = %output.display(), "Saved cleaned file");

        info!(
            filename = %summary.filename,
            rows = summary.rows,
            columns = summary.columns,
            date_range = %summary.date_range,
            "Summary"
        );

        Ok(summary)
    }

    /// Persist the batch report as JSON in the processed directory.
    pub fn write_report(&self, report: &BatchReport) -> Result<PathBuf> {
        let path = self.config.paths.processed_dir.join(BATCH_REPORT_FILE);
        write_json(report, &path)?;
        Ok(path)
    }

    pub fn analyze_all(&self) -> AnalysisBatch {
        let files: Vec<String> = self
            .config
            .paths
            .files
            .iter()
            .map(|f| cleaned_file_name(f))
            .collect();
        let progress = self.progress(files.len(), "Analyzing");
        let mut batch = AnalysisBatch::default();

        for filename in &files {
            progress.start_file(filename);

            match self.analyze_file(filename) {
                Ok(report) => batch.reports.push(report),
                Err(e) => {
                    error!(file = %filename, error = %e, "Failed to analyze file");
                    batch.failed.push(FailedFile {
                        filename: filename.clone(),
                        error: e.to_string(),
                    });
                }
            }

            progress.finish_file();
        }

        progress.finish_with_message(&format!(
            "{} analyzed, {} failed",
            batch.reports.len(),
            batch.failed.len()
        ));
        batch
    }

    /// Analyze one cleaned file and write its artifacts.
    pub fn analyze_file(&self, cleaned_filename: &str) -> Result<AnalysisReport> {
        let _span = info_span!("analyze", file = %cleaned_filename).entered();

        let input = self.config.paths.processed_dir.join(cleaned_filename);
        let dataset = DatasetReader::new().read_dataset(&input)?;

        let analyzer =
            AirQualityAnalyzer::new(self.config.cleaner.clone(), self.config.analysis.clone());
        let report = analyzer.analyze(&dataset);

        AnalysisWriter::new().write_report(&report, &self.config.paths.output_dir)?;
        Ok(report)
    }

    fn progress(&self, total: usize, message: &str) -> ProgressReporter {
        ProgressReporter::new(total as u64, message, self.silent)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn config_in(dir: &TempDir, files: &[&str]) -> AppConfig {
        let mut config = AppConfig::default();
        config.paths.raw_dir = dir.path().join("raw");
        config.paths.processed_dir = dir.path().join("processed");
        config.paths.output_dir = dir.path().join("output");
        config.paths.files = files.iter().map(|f| f.to_string()).collect();
        config
    }

    #[test]
    fn test_missing_file_does_not_stop_batch() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let config = config_in(&temp_dir, &["missing.csv", "city_day.csv"]);
        fs::create_dir_all(&config.paths.raw_dir)?;
        fs::write(
            config.paths.raw_dir.join("city_day.csv"),
            "City,Date,PM2.5,AQI\nDelhi,2020-01-02,,600\nDelhi,2020-01-01,10,-3\n",
        )?;

        let processor = BatchProcessor::new(config.clone()).with_silent(true);
        let report = processor.clean_all();

        assert_eq!(report.failed.len(), 1);
        assert_eq!(report.failed[0].filename, "missing.csv");
        assert_eq!(report.succeeded.len(), 1);
        assert_eq!(report.succeeded[0].filename, "city_day_cleaned.csv");

        let written = fs::read_to_string(config.paths.processed_dir.join("city_day_cleaned.csv"))?;
        assert_eq!(
            written,
            "City,Date,PM2.5,AQI\nDelhi,2020-01-01 00:00:00,10,0\nDelhi,2020-01-02 00:00:00,10,500\n"
        );
        Ok(())
    }

    #[test]
    fn test_analyze_after_clean() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let config = config_in(&temp_dir, &["stations.csv"]);
        fs::create_dir_all(&config.paths.raw_dir)?;
        fs::write(
            config.paths.raw_dir.join("stations.csv"),
            "StationId,StationName,City\nST1,Alpha,Delhi\nST1,Alpha,Delhi\n",
        )?;

        let processor = BatchProcessor::new(config.clone()).with_silent(true);
        assert!(processor.clean_all().is_success());

        let batch = processor.analyze_all();
        assert!(batch.is_success());
        assert!(batch.reports[0].temporal_column.is_none());
        assert!(config
            .paths
            .output_dir
            .join("stations_cleaned_analysis.json")
            .exists());
        Ok(())
    }
}
