use serde::Serialize;
use std::fmt;
use thiserror::Error;

use crate::aqi::category::AqiCategory;

/// One row of the PM2.5 breakpoint table: a concentration sub-range in µg/m³
/// and the AQI sub-range it interpolates onto.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Breakpoint {
    pub conc_low: f64,
    pub conc_high: f64,
    pub index_low: u16,
    pub index_high: u16,
}

/// US EPA PM2.5 breakpoints, ascending by concentration.
///
/// | Concentration (µg/m³) | AQI       |
/// |-----------------------|-----------|
/// | 0.0 – 12.0            | 0 – 50    |
/// | 12.1 – 35.4           | 51 – 100  |
/// | 35.5 – 55.4           | 101 – 150 |
/// | 55.5 – 150.4          | 151 – 200 |
/// | 150.5 – 250.4         | 201 – 300 |
/// | 250.5 – 500.0         | 301 – 500 |
#[rustfmt::skip]
pub static PM25_BREAKPOINTS: [Breakpoint; 6] = [
    Breakpoint { conc_low: 0.0, conc_high: 12.0, index_low: 0, index_high: 50 },
    Breakpoint { conc_low: 12.1, conc_high: 35.4, index_low: 51, index_high: 100 },
    Breakpoint { conc_low: 35.5, conc_high: 55.4, index_low: 101, index_high: 150 },
    Breakpoint { conc_low: 55.5, conc_high: 150.4, index_low: 151, index_high: 200 },
    Breakpoint { conc_low: 150.5, conc_high: 250.4, index_low: 201, index_high: 300 },
    Breakpoint { conc_low: 250.5, conc_high: 500.0, index_low: 301, index_high: 500 },
];

/// Raised when a concentration is not covered by the breakpoint table.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum AqiError {
    #[error("PM2.5 concentration {concentration} µg/m³ is outside the AQI table (0 to 500)")]
    OutOfRange { concentration: f64 },
}

/// An Air Quality Index value on the 0–500 scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct Aqi(u16);

impl Aqi {
    pub const MAX: u16 = 500;

    /// Wraps an already-computed index. Returns `None` above [`Aqi::MAX`].
    pub fn new(value: u16) -> Option<Self> {
        (value <= Self::MAX).then_some(Aqi(value))
    }

    pub fn value(self) -> u16 {
        self.0
    }

    pub fn category(self) -> AqiCategory {
        AqiCategory::from_aqi(self)
    }
}

impl fmt::Display for Aqi {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<Aqi> for u16 {
    fn from(aqi: Aqi) -> Self {
        aqi.0
    }
}

impl Breakpoint {
    /// Linear interpolation of `concentration` onto this row's index range,
    /// truncated toward zero.
    fn interpolate(&self, concentration: f64) -> u16 {
        let span = f64::from(self.index_high - self.index_low);
        let fraction = (concentration - self.conc_low) / (self.conc_high - self.conc_low);
        (fraction * span + f64::from(self.index_low)).trunc() as u16
    }
}

/// Converts a PM2.5 concentration in µg/m³ into an AQI value.
///
/// The first breakpoint whose upper bound is not below `concentration` is
/// used. A concentration inside a table row gets exactly that row's
/// interpolation; one that falls between two rows (such as 12.05) is
/// interpolated on the following row and truncates to the previous row's
/// upper index, so the mapping stays monotonic.
///
/// # Errors
///
/// Returns [`AqiError::OutOfRange`] for negative values, values above 500 and NaN.
pub fn compute_aqi(concentration: f64) -> Result<Aqi, AqiError> {
    // NaN fails this comparison too.
    if !(concentration >= PM25_BREAKPOINTS[0].conc_low) {
        return Err(AqiError::OutOfRange { concentration });
    }

    PM25_BREAKPOINTS
        .iter()
        .find(|bp| concentration <= bp.conc_high)
        .map(|bp| Aqi(bp.interpolate(concentration)))
        .ok_or(AqiError::OutOfRange { concentration })
}

/// Applies [`compute_aqi`] to every value independently.
pub fn compute_aqi_series<I>(concentrations: I) -> Vec<Result<Aqi, AqiError>>
where
    I: IntoIterator<Item = f64>,
{
    concentrations.into_iter().map(compute_aqi).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn aqi(c: f64) -> u16 {
        compute_aqi(c).unwrap().value()
    }

    #[test]
    fn test_table_endpoints() {
        assert_eq!(aqi(0.0), 0);
        assert_eq!(aqi(12.0), 50);
        assert_eq!(aqi(12.1), 51);
        assert_eq!(aqi(35.4), 100);
        assert_eq!(aqi(35.5), 101);
        assert_eq!(aqi(55.4), 150);
        assert_eq!(aqi(55.5), 151);
        assert_eq!(aqi(150.4), 200);
        assert_eq!(aqi(150.5), 201);
        assert_eq!(aqi(250.4), 300);
        assert_eq!(aqi(250.5), 301);
        assert_eq!(aqi(500.0), 500);
    }

    #[test]
    fn test_truncates_instead_of_rounding() {
        // 6.0 / 12.0 * 50 = 25.0, 5.99 / 12.0 * 50 = 24.958...
        assert_eq!(aqi(6.0), 25);
        assert_eq!(aqi(5.99), 24);
        // 20.0 -> (7.9 / 23.3) * 49 + 51 = 67.61...
        assert_eq!(aqi(20.0), 67);
    }

    #[test]
    fn test_out_of_range() {
        assert_eq!(
            compute_aqi(-1.0),
            Err(AqiError::OutOfRange { concentration: -1.0 })
        );
        assert_eq!(
            compute_aqi(501.0),
            Err(AqiError::OutOfRange { concentration: 501.0 })
        );
        assert!(compute_aqi(500.0001).is_err());
        assert!(compute_aqi(-0.0001).is_err());
        assert!(compute_aqi(f64::NAN).is_err());
        assert!(compute_aqi(f64::INFINITY).is_err());
    }

    #[test]
    fn test_gap_between_rows_keeps_previous_upper_index() {
        assert_eq!(aqi(12.05), 50);
        assert_eq!(aqi(35.45), 100);
        assert_eq!(aqi(55.45), 150);
        assert_eq!(aqi(150.45), 200);
        assert_eq!(aqi(250.45), 300);
    }

    #[test]
    fn test_first_segment_bounds_and_monotonic() {
        let mut prev = 0;
        for step in 0..=1200 {
            let c = f64::from(step) / 100.0;
            let value = aqi(c);
            assert!(value <= 50, "aqi({c}) = {value}");
            assert!(value >= prev, "aqi({c}) = {value} < {prev}");
            prev = value;
        }
    }

    #[test]
    fn test_monotonic_over_full_domain() {
        let mut prev = 0;
        for step in 0..=500_000 {
            let c = f64::from(step) / 1000.0;
            let value = aqi(c);
            assert!(value >= prev, "aqi({c}) = {value} < {prev}");
            assert!(value <= 500);
            prev = value;
        }
    }

    #[test]
    fn test_deterministic() {
        for c in [0.0, 7.3, 12.05, 88.8, 499.9] {
            assert_eq!(compute_aqi(c), compute_aqi(c));
        }
    }

    #[test]
    fn test_series_is_element_wise() {
        let results = compute_aqi_series([12.0, -3.0, 35.4]);
        assert_eq!(results.len(), 3);
        assert_eq!(results[0].unwrap().value(), 50);
        assert!(results[1].is_err());
        assert_eq!(results[2].unwrap().value(), 100);
    }

    #[test]
    fn test_table_rows_are_ascending() {
        for pair in PM25_BREAKPOINTS.windows(2) {
            assert!(pair[0].conc_high < pair[1].conc_low);
            assert_eq!(pair[0].index_high + 1, pair[1].index_low);
        }
    }
}
