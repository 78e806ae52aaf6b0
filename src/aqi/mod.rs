//! PM2.5 to Air Quality Index conversion.
//!
//! [`compute_aqi`] maps a concentration onto the EPA breakpoint table and
//! returns an explicit [`AqiError::OutOfRange`] when no row covers it.
//! [`advisory`] turns the resulting index into warnings and health advice.

pub mod advisory;
pub mod calculator;
pub mod category;

pub use advisory::{Recommendation, WarningLevel, early_warning, health_recommendation};
pub use calculator::{
    Aqi, AqiError, Breakpoint, PM25_BREAKPOINTS, compute_aqi, compute_aqi_series,
};
pub use category::AqiCategory;
