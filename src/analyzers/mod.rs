pub mod air_quality_analyzer;
pub mod statistics;

pub use air_quality_analyzer::{
    AirQualityAnalyzer, AnalysisReport, CategoryCount, CityMean, CityTrendPoint,
    CorrelationMatrix, MonthlyMean, SeasonGroup, SeasonalAnova, TrendPoint, TrendSeries,
    NO_DATE_COLUMN,
};
pub use statistics::AnovaResult;
