pub mod constants;
pub mod filename;
pub mod progress;
pub mod timestamp;

pub use constants::*;
pub use filename::{artifact_file_name, cleaned_file_name};
pub use progress::ProgressReporter;
pub use timestamp::{parse_timestamp, season_bucket, season_name};
