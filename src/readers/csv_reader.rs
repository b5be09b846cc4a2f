use crate::error::{ProcessingError, Result};
use crate::models::{Cell, Dataset};
use encoding_rs::UTF_8;
use std::fs;
use std::path::Path;
use tracing::{debug, warn};

/// Reads a headed CSV file into a [`Dataset`].
pub struct DatasetReader;

impl DatasetReader {
    pub fn new() -> Self {
        Self
    }

    pub fn read_dataset(&self, path: &Path) -> Result<Dataset> {
        let bytes = fs::read(path)?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        self.read_bytes(&name, &bytes)
    }

    /// Decode as UTF-8 (BOM stripped, invalid sequences replaced) and parse.
    pub fn read_bytes(&self, name: &str, bytes: &[u8]) -> Result<Dataset> {
        let (content, had_errors) = UTF_8.decode_with_bom_removal(bytes);
        if had_errors {
            warn!(file = name, "Invalid UTF-8 sequences replaced while decoding");
        }

        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(content.as_bytes());

        let headers: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();
        if headers.is_empty() || headers.iter().all(|h| h.is_empty()) {
            return Err(ProcessingError::MissingData(format!(
                "No header row in {}",
                name
            )));
        }

        let mut dataset = Dataset::new(name, headers);
        let mut record = csv::StringRecord::new();
        let width = dataset.column_count();

        while reader.read_record(&mut record)? {
            if record.len() > width {
                return Err(ProcessingError::InvalidFormat(format!(
                    "{}: line {} has {} fields, expected {}",
                    name,
                    record.position().map_or(0, |p| p.line()),
                    record.len(),
                    width
                )));
            }
            dataset.push_row(record.iter().map(Cell::from_raw).collect());
        }

        debug!(
            file = name,
            rows = dataset.row_count(),
            columns = dataset.column_count(),
            "Read dataset"
        );

        Ok(dataset)
    }
}

impl Default for DatasetReader {
    fn default() -> Self {
        Self::new()
    }
}
