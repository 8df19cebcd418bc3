//! Forecast resolution: city name to current conditions plus upcoming days

use std::time::Instant;

use chrono::{DateTime, Local, NaiveDate, Timelike, Utc};
use chrono_tz::Tz;
use tracing::{info, instrument};

use crate::Result;
use crate::config::WeatherConfig;
use crate::location_resolver::LocationResolver;
use crate::models::WeatherSample;

pub mod open_weather;
pub mod selection;

pub use open_weather::OpenWeatherClient;

/// Time zone in which sample timestamps are turned into calendar days and hours
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ForecastZone {
    /// Time zone of the running process
    #[default]
    Local,
    /// Explicit IANA zone
    Named(Tz),
}

impl ForecastZone {
    #[must_use]
    pub fn local_date(&self, timestamp: DateTime<Utc>) -> NaiveDate {
        match self {
            ForecastZone::Local => timestamp.with_timezone(&Local).date_naive(),
            ForecastZone::Named(tz) => timestamp.with_timezone(tz).date_naive(),
        }
    }

    #[must_use]
    pub fn local_hour(&self, timestamp: DateTime<Utc>) -> u32 {
        match self {
            ForecastZone::Local => timestamp.with_timezone(&Local).hour(),
            ForecastZone::Named(tz) => timestamp.with_timezone(tz).hour(),
        }
    }

    /// Calendar-day label used on the wire, e.g. `6/1/2024`
    #[must_use]
    pub fn date_label(&self, timestamp: DateTime<Utc>) -> String {
        format_date(self.local_date(timestamp))
    }
}

#[must_use]
pub fn format_date(date: NaiveDate) -> String {
    date.format("%-m/%-d/%Y").to_string()
}

/// Resolves a city name into the current conditions followed by up to five days
#[derive(Debug, Clone)]
pub struct ForecastResolver {
    client: OpenWeatherClient,
    zone: ForecastZone,
}

impl ForecastResolver {
    pub fn new(config: &WeatherConfig) -> Result<Self> {
        Ok(Self {
            client: OpenWeatherClient::new(config)?,
            zone: config.forecast_zone()?,
        })
    }

    #[must_use]
    pub fn with_zone(mut self, zone: ForecastZone) -> Self {
        self.zone = zone;
        self
    }

    #[must_use]
    pub fn zone(&self) -> ForecastZone {
        self.zone
    }

    /// Geocode the city, fetch its forecast and reshape it.
    ///
    /// Either the whole sequence is produced or the first failing stage's error is
    /// returned; geocoding failures never reach the forecast endpoint.
    #[instrument(skip(self))]
    pub async fn resolve_forecast(&self, city: &str) -> Result<Vec<WeatherSample>> {
        let start_time = Instant::now();

        let coordinates = LocationResolver::resolve_city(&self.client, city).await?;
        let series = self.client.fetch_forecast(coordinates).await?;

        let current = selection::current_conditions(&series, &self.zone)?;
        let upcoming = selection::daily_forecast(&series, &current.date, &self.zone);

        let mut samples = Vec::with_capacity(1 + upcoming.len());
        samples.push(current);
        samples.extend(upcoming);

        info!(
            "Resolved {} forecast entries for {} in {:.3}s",
            samples.len(),
            series.city_name,
            start_time.elapsed().as_secs_f64()
        );

        Ok(samples)
    }
}
