use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::aqi::{
    Aqi, AqiCategory, AqiError, Recommendation, WarningLevel, compute_aqi, early_warning,
    health_recommendation,
};

/// Everything derived from a single PM2.5 value.
#[derive(Debug, Serialize)]
pub struct Assessment {
    pub pm25: f64,
    pub aqi: Aqi,
    pub category: AqiCategory,
    pub warning: WarningLevel,
    pub recommendation: &'static Recommendation,
}

/// Computes the AQI of `pm25` and the advice that goes with it.
pub fn assess(pm25: f64) -> Result<Assessment, AqiError> {
    let aqi = compute_aqi(pm25)?;
    Ok(Assessment {
        pm25,
        aqi,
        category: aqi.category(),
        warning: early_warning(aqi),
        recommendation: health_recommendation(aqi),
    })
}

/// One row of the prediction log.
#[derive(Debug, Default, Serialize)]
pub struct PredictionRecord {
    pub timestamp: DateTime<Utc>,
    pub predicted_pm25: f64,
    pub aqi: Option<u16>,
    pub category: Option<AqiCategory>,
    pub warning: Option<WarningLevel>,

    // error tracking
    pub error_type: Option<String>,
    pub error_message: Option<String>,
}

impl PredictionRecord {
    pub fn from_outcome(pm25: f64, outcome: &Result<Assessment, AqiError>) -> Self {
        match outcome {
            Ok(a) => PredictionRecord {
                timestamp: Utc::now(),
                predicted_pm25: pm25,
                aqi: Some(a.aqi.value()),
                category: Some(a.category),
                warning: Some(a.warning),
                ..Default::default()
            },
            Err(e) => PredictionRecord {
                predicted_pm25: pm25,
                ..Self::from_error("out_of_range", &e.to_string())
            },
        }
    }

    /// Create an error record with timestamp and error information
    pub fn from_error(error_type: &str, error_message: &str) -> Self {
        PredictionRecord {
            timestamp: Utc::now(),
            error_type: Some(error_type.to_string()),
            error_message: Some(error_message.to_string()),
            ..Default::default()
        }
    }
}
