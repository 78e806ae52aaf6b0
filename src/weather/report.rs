use anyhow::{Context, Result};
use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

const KELVIN_OFFSET: f64 = 273.15;

/// Subset of the OpenWeatherMap `/data/2.5/weather` payload that we display.
#[derive(Debug, Deserialize)]
pub struct CurrentWeatherResponse {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub weather: Vec<Condition>,
    pub main: MainBlock,
    pub wind: Wind,
    pub sys: Sys,
    pub visibility: Option<u32>,
}

#[derive(Debug, Deserialize)]
pub struct Condition {
    pub description: String,
}

#[derive(Debug, Deserialize)]
pub struct MainBlock {
    /// Kelvin, the API default unit.
    pub temp: f64,
    pub humidity: f64,
}

#[derive(Debug, Deserialize)]
pub struct Wind {
    pub speed: f64,
    #[serde(default)]
    pub deg: f64,
}

#[derive(Debug, Deserialize)]
pub struct Sys {
    pub sunrise: i64,
    pub sunset: i64,
}

/// Current conditions at a location, in display units and local time.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeatherReport {
    pub location: String,
    pub description: String,
    pub temperature_c: f64,
    pub humidity_pct: f64,
    pub wind_speed_mps: f64,
    pub wind_deg: f64,
    pub visibility_m: Option<u32>,
    pub sunrise: DateTime<FixedOffset>,
    pub sunset: DateTime<FixedOffset>,
}

impl WeatherReport {
    /// Converts an API payload, shifting sunrise and sunset into `offset`.
    pub fn from_response(raw: CurrentWeatherResponse, offset: FixedOffset) -> Result<Self> {
        let description = raw
            .weather
            .into_iter()
            .next()
            .map(|c| c.description)
            .unwrap_or_else(|| "unknown".to_string());

        Ok(Self {
            location: raw.name,
            description,
            temperature_c: raw.main.temp - KELVIN_OFFSET,
            humidity_pct: raw.main.humidity,
            wind_speed_mps: raw.wind.speed,
            wind_deg: raw.wind.deg,
            visibility_m: raw.visibility,
            sunrise: to_local(raw.sys.sunrise, offset)?,
            sunset: to_local(raw.sys.sunset, offset)?,
        })
    }

    pub fn sunrise_local(&self) -> String {
        self.sunrise.format("%Y-%m-%d %H:%M:%S").to_string()
    }

    pub fn sunset_local(&self) -> String {
        self.sunset.format("%Y-%m-%d %H:%M:%S").to_string()
    }
}

fn to_local(timestamp: i64, offset: FixedOffset) -> Result<DateTime<FixedOffset>> {
    let utc = DateTime::from_timestamp(timestamp, 0)
        .with_context(|| format!("timestamp {timestamp} is out of range"))?;
    Ok(utc.with_timezone(&offset))
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "coord": {"lon": 77.21, "lat": 28.61},
        "weather": [{"id": 721, "main": "Haze", "description": "haze", "icon": "50d"}],
        "main": {"temp": 298.15, "feels_like": 298.5, "pressure": 1012, "humidity": 65},
        "visibility": 3000,
        "wind": {"speed": 2.57, "deg": 290},
        "sys": {"country": "IN", "sunrise": 1700000000, "sunset": 1700040000},
        "name": "New Delhi"
    }"#;

    fn ist() -> FixedOffset {
        FixedOffset::east_opt(5 * 3600 + 30 * 60).unwrap()
    }

    #[test]
    fn test_from_response_converts_units() {
        let raw: CurrentWeatherResponse = serde_json::from_str(SAMPLE).unwrap();
        let report = WeatherReport::from_response(raw, ist()).unwrap();

        assert_eq!(report.location, "New Delhi");
        assert_eq!(report.description, "haze");
        assert!((report.temperature_c - 25.0).abs() < 1e-9);
        assert_eq!(report.humidity_pct, 65.0);
        assert_eq!(report.wind_speed_mps, 2.57);
        assert_eq!(report.wind_deg, 290.0);
        assert_eq!(report.visibility_m, Some(3000));
    }

    #[test]
    fn test_sun_times_in_local_offset() {
        let raw: CurrentWeatherResponse = serde_json::from_str(SAMPLE).unwrap();
        let report = WeatherReport::from_response(raw, ist()).unwrap();

        // 1700000000 is 2023-11-14 22:13:20 UTC
        assert_eq!(report.sunrise_local(), "2023-11-15 03:43:20");
        // 1700040000 is 2023-11-15 09:20:00 UTC
        assert_eq!(report.sunset_local(), "2023-11-15 14:50:00");
    }

    #[test]
    fn test_missing_condition_and_visibility() {
        let json = r#"{
            "main": {"temp": 273.15, "humidity": 80},
            "wind": {"speed": 0.0},
            "sys": {"sunrise": 0, "sunset": 0}
        }"#;
        let raw: CurrentWeatherResponse = serde_json::from_str(json).unwrap();
        let report = WeatherReport::from_response(raw, ist()).unwrap();
        assert_eq!(report.description, "unknown");
        assert_eq!(report.visibility_m, None);
        assert_eq!(report.temperature_c, 0.0);
    }
}
