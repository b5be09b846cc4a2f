pub mod aqi;
pub mod dataset;
pub mod roles;
pub mod summary;

pub use aqi::AqiCategory;
pub use dataset::{Cell, ColumnKind, Dataset};
pub use roles::{ColumnRole, ColumnRoles, ResolvedColumn};
pub use summary::{BatchReport, CleaningStats, CleaningSummary, FailedFile};
