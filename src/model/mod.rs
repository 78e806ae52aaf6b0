//! PM2.5 regression model.
//!
//! The model is trained elsewhere and shipped as an artifact; this module only
//! loads it and runs inference behind the [`Regressor`] trait.

pub mod features;
pub mod forest;

pub use features::{FEATURE_NAMES, Features};
pub use forest::ForestModel;

use anyhow::Result;

/// Predicts a PM2.5 concentration (µg/m³) from one set of measurements.
pub trait Regressor: Send + Sync {
    fn predict(&self, features: &Features) -> Result<f64>;
}
