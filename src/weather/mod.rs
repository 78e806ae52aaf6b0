//! Current weather conditions for a location.
//!
//! [`WeatherProvider`] is the narrow interface the rest of the application
//! depends on; [`OpenWeatherClient`] implements it against the OpenWeatherMap
//! current-weather endpoint.

mod client;
mod report;

pub use client::{DEFAULT_BASE_URL, OpenWeatherClient};
pub use report::{CurrentWeatherResponse, WeatherReport};

use anyhow::{Result, bail};

/// A validated latitude/longitude pair in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinates {
    lat: f64,
    lon: f64,
}

impl Coordinates {
    pub fn new(lat: f64, lon: f64) -> Result<Self> {
        if !lat.is_finite() || !(-90.0..=90.0).contains(&lat) {
            bail!("latitude {lat} must be between -90 and 90");
        }
        if !lon.is_finite() || !(-180.0..=180.0).contains(&lon) {
            bail!("longitude {lon} must be between -180 and 180");
        }
        Ok(Self { lat, lon })
    }

    pub fn lat(&self) -> f64 {
        self.lat
    }

    pub fn lon(&self) -> f64 {
        self.lon
    }
}

/// Source of current weather observations.
#[async_trait::async_trait]
pub trait WeatherProvider {
    async fn current(&self, coords: Coordinates) -> Result<WeatherReport>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coordinates_accept_valid_range() {
        let c = Coordinates::new(28.61, 77.21).unwrap();
        assert_eq!(c.lat(), 28.61);
        assert_eq!(c.lon(), 77.21);
        assert!(Coordinates::new(-90.0, 180.0).is_ok());
    }

    #[test]
    fn test_coordinates_reject_out_of_range() {
        assert!(Coordinates::new(90.5, 0.0).is_err());
        assert!(Coordinates::new(0.0, -180.1).is_err());
        assert!(Coordinates::new(f64::NAN, 0.0).is_err());
    }
}
