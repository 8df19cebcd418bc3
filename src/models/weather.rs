//! Weather sample models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One point of the provider's forecast series
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ForecastSample {
    /// Instant this sample is valid for
    pub timestamp: DateTime<Utc>,
    /// Provider icon code, e.g. "10d"
    pub icon: String,
    /// Human-readable description of weather conditions
    pub description: String,
    /// Temperature in Fahrenheit
    pub temperature: f64,
    /// Wind speed in miles per hour
    pub wind_speed: f64,
    /// Relative humidity percentage
    pub humidity: u8,
}

/// Normalized weather sample returned to clients
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct WeatherSample {
    pub city: String,
    /// Calendar day in `M/D/YYYY` form
    pub date: String,
    pub icon: String,
    pub icon_description: String,
    #[serde(rename = "tempF")]
    pub temperature_f: i32,
    pub wind_speed: i32,
    pub humidity: u8,
}

impl WeatherSample {
    /// Normalize a raw sample, rounding temperature and wind speed half away from zero
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn from_forecast(sample: &ForecastSample, city: &str, date: String) -> Self {
        Self {
            city: city.to_string(),
            date,
            icon: sample.icon.clone(),
            icon_description: sample.description.clone(),
            temperature_f: sample.temperature.round() as i32,
            wind_speed: sample.wind_speed.round() as i32,
            humidity: sample.humidity,
        }
    }
}
