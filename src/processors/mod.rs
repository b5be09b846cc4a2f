pub mod batch_processor;
pub mod cleaner;

pub use batch_processor::{AnalysisBatch, BatchProcessor};
pub use cleaner::Cleaner;
