//! `OpenWeather` HTTP client
//!
//! Talks to the direct geocoding endpoint and the 5 day / 3 hour forecast
//! endpoint, decoding their JSON into explicit structures before anything
//! downstream touches it.

use std::time::{Duration, Instant};

use chrono::DateTime;
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, instrument, warn};

use crate::config::WeatherConfig;
use crate::models::{Coordinates, ForecastSample, ForecastSeries};
use crate::{DashboardError, Result};

const USER_AGENT: &str = concat!("weather-dashboard/", env!("CARGO_PKG_VERSION"));
const SLOW_RESPONSE: Duration = Duration::from_secs(5);

/// Client for the `OpenWeather` geocoding and forecast APIs
#[derive(Debug, Clone)]
pub struct OpenWeatherClient {
    http: Client,
    base_url: String,
    api_key: String,
}

impl OpenWeatherClient {
    /// Create a new client from the weather configuration
    pub fn new(config: &WeatherConfig) -> Result<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds.into()))
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| DashboardError::config(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
        })
    }

    fn geocode_url(&self, query: &str) -> String {
        format!(
            "{}/geo/1.0/direct?q={}&limit=1&appid={}",
            self.base_url,
            urlencoding::encode(query),
            urlencoding::encode(&self.api_key)
        )
    }

    fn forecast_url(&self, coordinates: Coordinates) -> String {
        format!(
            "{}/data/2.5/forecast?lat={}&lon={}&appid={}&units=imperial",
            self.base_url,
            coordinates.latitude,
            coordinates.longitude,
            urlencoding::encode(&self.api_key)
        )
    }

    /// Look up a free-text city query, asking the provider for at most one match.
    ///
    /// An empty or undecodable body is reported as an invalid location rather than
    /// a transport problem, so callers can tell "city not found" apart.
    #[instrument(skip(self))]
    pub async fn geocode(&self, query: &str) -> Result<Vec<GeocodeMatch>> {
        let body = self.get_text(&self.geocode_url(query), "geocoding").await?;

        if body.trim().is_empty() {
            debug!("Geocoding returned an empty body");
            return Err(DashboardError::invalid_location(query));
        }

        serde_json::from_str(&body).map_err(|e| {
            debug!("Failed to parse geocoding response: {}", e);
            DashboardError::invalid_location(query)
        })
    }

    /// Fetch the imperial-unit forecast series for a coordinate pair
    #[instrument(skip(self), fields(lat = coordinates.latitude, lon = coordinates.longitude))]
    pub async fn fetch_forecast(&self, coordinates: Coordinates) -> Result<ForecastSeries> {
        let body = self
            .get_text(&self.forecast_url(coordinates), "forecast")
            .await?;

        let response: ForecastResponse = serde_json::from_str(&body).map_err(|e| {
            DashboardError::malformed(format!("Failed to parse forecast response: {e}"))
        })?;

        let series = response.into_series()?;
        debug!(
            "Forecast for {} contains {} samples",
            series.city_name,
            series.samples.len()
        );
        Ok(series)
    }

    async fn get_text(&self, url: &str, endpoint: &str) -> Result<String> {
        let start_time = Instant::now();

        let response = self.http.get(url).send().await.map_err(|e| {
            DashboardError::upstream(format!("{endpoint} request failed: {}", e.without_url()))
        })?;

        let status = response.status();
        let body = response.text().await.map_err(|e| {
            DashboardError::upstream(format!(
                "Failed to read {endpoint} response body: {}",
                e.without_url()
            ))
        })?;

        let elapsed = start_time.elapsed();
        if elapsed > SLOW_RESPONSE {
            warn!(
                "Slow {} response detected: {:.3}s",
                endpoint,
                elapsed.as_secs_f64()
            );
        }

        if !status.is_success() {
            return Err(DashboardError::upstream(format!(
                "{endpoint} request failed with status {status}: {}",
                truncate_body(&body)
            )));
        }

        Ok(body)
    }
}

/// One entry of the geocoding response
#[derive(Debug, Clone, Deserialize)]
pub struct GeocodeMatch {
    pub lat: f64,
    pub lon: f64,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
}

impl From<GeocodeMatch> for Coordinates {
    fn from(value: GeocodeMatch) -> Self {
        Coordinates::new(value.lat, value.lon)
    }
}

#[derive(Debug, Deserialize)]
struct OwMain {
    temp: f64,
    humidity: u8,
}

#[derive(Debug, Deserialize)]
struct OwWeather {
    icon: String,
    description: String,
}

#[derive(Debug, Deserialize)]
struct OwWind {
    speed: f64,
}

#[derive(Debug, Deserialize)]
struct OwCity {
    name: String,
}

#[derive(Debug, Deserialize)]
struct OwForecastEntry {
    dt: i64,
    main: OwMain,
    weather: Vec<OwWeather>,
    wind: OwWind,
}

#[derive(Debug, Deserialize)]
struct ForecastResponse {
    city: OwCity,
    list: Vec<OwForecastEntry>,
}

impl ForecastResponse {
    fn into_series(self) -> Result<ForecastSeries> {
        let samples = self
            .list
            .into_iter()
            .map(OwForecastEntry::into_sample)
            .collect::<Result<Vec<_>>>()?;

        Ok(ForecastSeries::new(self.city.name, samples))
    }
}

impl OwForecastEntry {
    fn into_sample(self) -> Result<ForecastSample> {
        let timestamp = DateTime::from_timestamp(self.dt, 0).ok_or_else(|| {
            DashboardError::malformed(format!("Forecast timestamp {} is out of range", self.dt))
        })?;

        let condition = self.weather.into_iter().next().ok_or_else(|| {
            DashboardError::malformed(format!(
                "Forecast sample at {} has no weather condition",
                self.dt
            ))
        })?;

        Ok(ForecastSample {
            timestamp,
            icon: condition.icon,
            description: condition.description,
            temperature: self.main.temp,
            wind_speed: self.wind.speed,
            humidity: self.main.humidity,
        })
    }
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    if body.chars().count() > MAX {
        format!("{}...", body.chars().take(MAX).collect::<String>())
    } else {
        body.to_string()
    }
}
