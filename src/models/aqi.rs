use serde::{Deserialize, Serialize};

/// Standard AQI severity bands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum AqiCategory {
    Good,
    Satisfactory,
    Moderate,
    Poor,
    VeryPoor,
    Severe,
}

impl AqiCategory {
    /// Band for an index value. Bands are integer ranges (0-50, 51-100, ...),
    /// so fractional values between two bands fall into the upper one.
    pub fn from_index(value: f64) -> Option<Self> {
        if value.is_nan() || value < 0.0 {
            return None;
        }

        let category = if value <= 50.0 {
            AqiCategory::Good
        } else if value <= 100.0 {
            AqiCategory::Satisfactory
        } else if value <= 200.0 {
            AqiCategory::Moderate
        } else if value <= 300.0 {
            AqiCategory::Poor
        } else if value <= 400.0 {
            AqiCategory::VeryPoor
        } else {
            AqiCategory::Severe
        };

        Some(category)
    }

    pub fn label(&self) -> &'static str {
        match self {
            AqiCategory::Good => "Good",
            AqiCategory::Satisfactory => "Satisfactory",
            AqiCategory::Moderate => "Moderate",
            AqiCategory::Poor => "Poor",
            AqiCategory::VeryPoor => "Very Poor",
            AqiCategory::Severe => "Severe",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_band_edges() {
        assert_eq!(AqiCategory::from_index(0.0), Some(AqiCategory::Good));
        assert_eq!(AqiCategory::from_index(50.0), Some(AqiCategory::Good));
        assert_eq!(AqiCategory::from_index(51.0), Some(AqiCategory::Satisfactory));
        assert_eq!(AqiCategory::from_index(200.0), Some(AqiCategory::Moderate));
        assert_eq!(AqiCategory::from_index(400.0), Some(AqiCategory::VeryPoor));
        assert_eq!(AqiCategory::from_index(401.0), Some(AqiCategory::Severe));
        assert_eq!(AqiCategory::from_index(-1.0), None);
    }
}
