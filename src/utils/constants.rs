/// Raw dataset file names, processed in this order
pub const CITY_DAY_FILE: &str = "city_day.csv";
pub const CITY_HOUR_FILE: &str = "city_hour.csv";
pub const STATION_DAY_FILE: &str = "station_day.csv";
pub const STATION_HOUR_FILE: &str = "station_hour.csv";
pub const STATIONS_FILE: &str = "stations.csv";

pub const DEFAULT_FILES: [&str; 5] = [
    CITY_DAY_FILE,
    CITY_HOUR_FILE,
    STATION_DAY_FILE,
    STATION_HOUR_FILE,
    STATIONS_FILE,
];

/// Directory names
pub const RAW_DATA_DIR: &str = "data/raw";
pub const PROCESSED_DATA_DIR: &str = "data/processed";
pub const OUTPUT_DIR: &str = "output";

/// Configuration file looked up in the working directory
pub const DEFAULT_CONFIG_FILE: &str = "aqi-processor.toml";
pub const ENV_PREFIX: &str = "AQI";

/// Suffix inserted before the extension of every cleaned file
pub const CLEANED_SUFFIX: &str = "_cleaned";
pub const BATCH_REPORT_FILE: &str = "cleaning_report.json";

/// Pollutant measurement columns
pub const POLLUTANTS: [&str; 12] = [
    "PM2.5", "PM10", "NO", "NO2", "NOx", "NH3", "CO", "SO2", "O3", "Benzene", "Toluene", "Xylene",
];

/// Temporal column aliases, highest priority first
pub const DATE_COLUMNS: [&str; 8] = [
    "Date",
    "date",
    "timestamp",
    "Datetime",
    "DateTime",
    "DATE",
    "RecordedDate",
    "dt",
];

pub const QUALITY_INDEX_COLUMN: &str = "AQI";
pub const QUALITY_CATEGORY_COLUMN: &str = "AQI_Bucket";
pub const CITY_COLUMN: &str = "City";

/// AQI constraints
pub const MIN_VALID_AQI: f64 = 0.0;
pub const MAX_VALID_AQI: f64 = 500.0;

/// Canonical timestamp layout written to cleaned files
pub const CANONICAL_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Tokens read as missing values
pub const NA_TOKENS: [&str; 19] = [
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

/// Summary value when no date range can be reported
pub const NOT_APPLICABLE: &str = "N/A";

/// Analysis defaults
pub const DEFAULT_TREND_POLLUTANT: &str = "PM2.5";
pub const DEFAULT_TOP_N: usize = 10;
pub const ANOVA_SIGNIFICANCE_LEVEL: f64 = 0.05;
