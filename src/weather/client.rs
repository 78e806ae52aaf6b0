use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::FixedOffset;
use reqwest::Url;
use tracing::info;

use crate::fetch::auth::UrlParam;
use crate::fetch::{HttpClient, fetch_json};
use crate::weather::report::{CurrentWeatherResponse, WeatherReport};
use crate::weather::{Coordinates, WeatherProvider};

pub const DEFAULT_BASE_URL: &str = "https://api.openweathermap.org/data/2.5/weather";

/// OpenWeatherMap current-conditions client. The API key travels as the
/// `appid` query parameter.
pub struct OpenWeatherClient<C> {
    http: UrlParam<C>,
    base_url: Url,
    offset: FixedOffset,
}

impl<C: HttpClient> OpenWeatherClient<C> {
    /// `offset` is the zone sunrise and sunset are reported in.
    pub fn new(http: C, api_key: String, base_url: &str, offset: FixedOffset) -> Result<Self> {
        let base_url = Url::parse(base_url)
            .with_context(|| format!("Invalid weather API URL '{base_url}'"))?;
        Ok(Self {
            http: UrlParam::appid(http, api_key),
            base_url,
            offset,
        })
    }

    /// Request URL for `coords`, without the API key.
    pub fn request_url(&self, coords: Coordinates) -> Url {
        let mut url = self.base_url.clone();
        url.query_pairs_mut()
            .append_pair("lat", &coords.lat().to_string())
            .append_pair("lon", &coords.lon().to_string());
        url
    }
}

#[async_trait]
impl<C: HttpClient> WeatherProvider for OpenWeatherClient<C> {
    #[tracing::instrument(skip(self), fields(lat = coords.lat(), lon = coords.lon()))]
    async fn current(&self, coords: Coordinates) -> Result<WeatherReport> {
        let raw: CurrentWeatherResponse = fetch_json(&self.http, self.request_url(coords))
            .await
            .context("Failed to retrieve weather data")?;
        let report = WeatherReport::from_response(raw, self.offset)?;
        info!(location = %report.location, "Weather fetched");
        Ok(report)
    }
}
