use std::path::Path;

use crate::utils::constants::CLEANED_SUFFIX;

/// `city_day.csv` -> `city_day_cleaned.csv`
pub fn cleaned_file_name(filename: &str) -> String {
    with_suffix(filename, CLEANED_SUFFIX, None)
}

/// Name of a derived artifact, e.g. `city_day_cleaned.csv` + `_correlation` -> `city_day_cleaned_correlation.csv`.
pub fn artifact_file_name(filename: &str, suffix: &str, extension: &str) -> String {
    with_suffix(filename, suffix, Some(extension))
}

fn with_suffix(filename: &str, suffix: &str, extension: Option<&str>) -> String {
    let path = Path::new(filename);
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| filename.to_string());
    let extension = extension
        .map(str::to_string)
        .or_else(|| path.extension().map(|e| e.to_string_lossy().into_owned()));

    match extension {
        Some(ext) => format!("{}{}.{}", stem, suffix, ext),
        None => format!("{}{}", stem, suffix),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cleaned_file_name() {
        assert_eq!(cleaned_file_name("city_day.csv"), "city_day_cleaned.csv");
        assert_eq!(cleaned_file_name("stations.csv"), "stations_cleaned.csv");
        assert_eq!(cleaned_file_name("readings"), "readings_cleaned");
    }

    #[test]
    fn test_artifact_file_name() {
        assert_eq!(
            artifact_file_name("city_day_cleaned.csv", "_pm25_trend", "csv"),
            "city_day_cleaned_pm25_trend.csv"
        );
        assert_eq!(
            artifact_file_name("city_day_cleaned.csv", "_analysis", "json"),
            "city_day_cleaned_analysis.json"
        );
    }
}
