use serde::Serialize;
use std::fmt;

use crate::aqi::calculator::Aqi;

/// EPA health category of an AQI value.
///
/// | AQI     | Category                       |
/// |---------|--------------------------------|
/// | 0–50    | Good                           |
/// | 51–100  | Moderate                       |
/// | 101–150 | Unhealthy for Sensitive Groups |
/// | 151–200 | Unhealthy                      |
/// | 201–300 | Very Unhealthy                 |
/// | 301–500 | Hazardous                      |
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AqiCategory {
    Good,
    Moderate,
    UnhealthyForSensitiveGroups,
    Unhealthy,
    VeryUnhealthy,
    Hazardous,
}

impl AqiCategory {
    pub fn from_aqi(aqi: Aqi) -> Self {
        match aqi.value() {
            v if v <= 50 => AqiCategory::Good,
            v if v <= 100 => AqiCategory::Moderate,
            v if v <= 150 => AqiCategory::UnhealthyForSensitiveGroups,
            v if v <= 200 => AqiCategory::Unhealthy,
            v if v <= 300 => AqiCategory::VeryUnhealthy,
            _ => AqiCategory::Hazardous,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            AqiCategory::Good => "Good",
            AqiCategory::Moderate => "Moderate",
            AqiCategory::UnhealthyForSensitiveGroups => "Unhealthy for Sensitive Groups",
            AqiCategory::Unhealthy => "Unhealthy",
            AqiCategory::VeryUnhealthy => "Very Unhealthy",
            AqiCategory::Hazardous => "Hazardous",
        }
    }
}

impl fmt::Display for AqiCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
