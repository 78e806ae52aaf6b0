use anyhow::{Context, Result};
use clap::Args;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Column names of the regressor inputs, in the order used by
/// [`Features::values`].
pub const FEATURE_NAMES: [&str; 19] = [
    "ws",
    "wd",
    "temp",
    "rh",
    "dew_temp",
    "precipitation",
    "pressure",
    "wv",
    "blh",
    "bcaod550",
    "duaod550",
    "omaod550",
    "ssaod550",
    "suaod550",
    "aod469",
    "aod550",
    "aod670",
    "aod865",
    "aod1240",
];

/// Weather and aerosol measurements fed to the PM2.5 regressor.
#[derive(Debug, Clone, PartialEq, Args, Serialize, Deserialize)]
#[serde(default)]
pub struct Features {
    /// Wind speed
    #[arg(long, default_value_t = 0.0)]
    pub ws: f64,
    /// Wind direction
    #[arg(long, default_value_t = 0.0)]
    pub wd: f64,
    /// Temperature
    #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
    pub temp: f64,
    /// Relative humidity
    #[arg(long, default_value_t = 0.0)]
    pub rh: f64,
    /// Dew point temperature
    #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
    pub dew_temp: f64,
    #[arg(long, default_value_t = 0.0)]
    pub precipitation: f64,
    /// Surface pressure
    #[arg(long, default_value_t = 1013.25)]
    pub pressure: f64,
    /// Water vapour
    #[arg(long, default_value_t = 0.0)]
    pub wv: f64,
    /// Boundary layer height
    #[arg(long, default_value_t = 0.0)]
    pub blh: f64,
    /// Black carbon aerosol optical depth at 550nm
    #[arg(long, default_value_t = 0.0)]
    pub bcaod550: f64,
    /// Dust aerosol optical depth at 550nm
    #[arg(long, default_value_t = 0.0)]
    pub duaod550: f64,
    /// Organic matter aerosol optical depth at 550nm
    #[arg(long, default_value_t = 0.0)]
    pub omaod550: f64,
    /// Sea salt aerosol optical depth at 550nm
    #[arg(long, default_value_t = 0.0)]
    pub ssaod550: f64,
    /// Sulphate aerosol optical depth at 550nm
    #[arg(long, default_value_t = 0.0)]
    pub suaod550: f64,
    #[arg(long, default_value_t = 0.0)]
    pub aod469: f64,
    #[arg(long, default_value_t = 0.0)]
    pub aod550: f64,
    #[arg(long, default_value_t = 0.0)]
    pub aod670: f64,
    #[arg(long, default_value_t = 0.0)]
    pub aod865: f64,
    #[arg(long, default_value_t = 0.0)]
    pub aod1240: f64,
}

impl Default for Features {
    fn default() -> Self {
        Self {
            ws: 0.0,
            wd: 0.0,
            temp: 0.0,
            rh: 0.0,
            dew_temp: 0.0,
            precipitation: 0.0,
            pressure: 1013.25,
            wv: 0.0,
            blh: 0.0,
            bcaod550: 0.0,
            duaod550: 0.0,
            omaod550: 0.0,
            ssaod550: 0.0,
            suaod550: 0.0,
            aod469: 0.0,
            aod550: 0.0,
            aod670: 0.0,
            aod865: 0.0,
            aod1240: 0.0,
        }
    }
}

impl Features {
    /// All inputs in [`FEATURE_NAMES`] order.
    pub fn values(&self) -> [f64; 19] {
        [
            self.ws,
            self.wd,
            self.temp,
            self.rh,
            self.dew_temp,
            self.precipitation,
            self.pressure,
            self.wv,
            self.blh,
            self.bcaod550,
            self.duaod550,
            self.omaod550,
            self.ssaod550,
            self.suaod550,
            self.aod469,
            self.aod550,
            self.aod670,
            self.aod865,
            self.aod1240,
        ]
    }

    /// Reads feature values from a JSON object; missing keys take defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read features file '{}'", path.display()))?;
        serde_json::from_str(&content)
            .with_context(|| format!("Invalid features file '{}'", path.display()))
    }

    /// Position of `name` in [`FEATURE_NAMES`].
    pub fn index_of(name: &str) -> Option<usize> {
        FEATURE_NAMES.iter().position(|n| *n == name)
    }
}
