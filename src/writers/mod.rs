pub mod analysis_writer;
pub mod csv_writer;
pub mod json_writer;

pub use analysis_writer::AnalysisWriter;
pub use csv_writer::CsvWriter;
pub use json_writer::write_json;
