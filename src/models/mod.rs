//! Data models for the weather dashboard
//!
//! This module contains the core domain models organized by concern:
//! - Location: Geographic coordinates resolved from a city name
//! - Weather: Raw provider samples and the normalized samples we hand out
//! - Forecast: The raw time series returned for one location
//! - City: Entries of the persisted search history

pub mod city;
pub mod forecast;
pub mod location;
pub mod weather;

// Re-export all public types for convenient access
pub use city::CityRecord;
pub use forecast::ForecastSeries;
pub use location::Coordinates;
pub use weather::{ForecastSample, WeatherSample};
