use crate::error::Result;
use crate::models::Dataset;
use std::fs;
use std::path::Path;
use tracing::debug;

/// Writes datasets and derived tables as headed CSV.
pub struct CsvWriter;

impl CsvWriter {
    pub fn new() -> Self {
        Self
    }

    /// Write a dataset. Missing cells become empty fields.
    pub fn write_dataset(&self, dataset: &Dataset, path: &Path) -> Result<()> {
        let rows = dataset
            .rows()
            .iter()
            .map(|row| row.iter().map(|cell| cell.to_string()).collect::<Vec<_>>());

        self.write_table(path, dataset.headers(), rows)?;

        debug!(
            path = %path.display(),
            rows = dataset.row_count(),
            "Wrote dataset"
        );
        Ok(())
    }

    pub fn write_table<H, I, R, F>(&self, path: &Path, headers: &[H], rows: I) -> Result<()>
    where
        H: AsRef<str>,
        I: IntoIterator<Item = R>,
        R: IntoIterator<Item = F>,
        F: AsRef<str>,
    {
        ensure_parent_dir(path)?;

        let mut writer = csv::WriterBuilder::new().from_path(path)?;

        writer.write_record(headers.iter().map(|h| h.as_ref()))?;
        for row in rows {
            let fields: Vec<F> = row.into_iter().collect();
            writer.write_record(fields.iter().map(|f| f.as_ref()))?;
        }
        writer.flush()?;

        Ok(())
    }
}

impl Default for CsvWriter {
    fn default() -> Self {
        Self::new()
    }
}

pub(crate) fn ensure_parent_dir(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Cell;
    use tempfile::TempDir;

    #[test]
    fn test_write_dataset_round_trip_text() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let path = temp_dir.path().join("nested/out.csv");

        let mut dataset = Dataset::new("out.csv", vec!["Date".to_string(), "PM2.5".to_string()]);
        dataset.push_row(vec![
            Cell::Text("2020-01-01 00:00:00".to_string()),
            Cell::Number(10.0),
        ]);
        dataset.push_row(vec![Cell::Text("2020-01-02 00:00:00".to_string()), Cell::Missing]);

        CsvWriter::new().write_dataset(&dataset, &path)?;

        let written = std::fs::read_to_string(&path)?;
        assert_eq!(
            written,
            "Date,PM2.5\n2020-01-01 00:00:00,10\n2020-01-02 00:00:00,\n"
        );
        Ok(())
    }

    #[test]
    fn test_write_table_quotes_fields() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let path = temp_dir.path().join("table.csv");

        CsvWriter::new().write_table(
            &path,
            &["City", "AQI"],
            vec![vec!["Delhi, NCR".to_string(), "310".to_string()]],
        )?;

        let written = std::fs::read_to_string(&path)?;
        assert_eq!(written, "City,AQI\n\"Delhi, NCR\",310\n");
        Ok(())
    }
}
