//! Weather Dashboard - city forecast lookup backed by OpenWeather
//!
//! This library resolves a city name into its current conditions plus one
//! noon-nearest sample per upcoming day, keeps a search history on disk and
//! exposes both over a small HTTP API.

pub mod api;
pub mod config;
pub mod error;
pub mod history;
pub mod location_resolver;
pub mod models;
pub mod weather;
pub mod web;

// Re-export core types for public API
pub use api::AppState;
pub use config::DashboardConfig;
pub use error::DashboardError;
pub use history::HistoryStore;
pub use models::{CityRecord, Coordinates, ForecastSample, ForecastSeries, WeatherSample};
pub use weather::{ForecastResolver, ForecastZone, OpenWeatherClient};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Core result type used throughout the library
pub type Result<T> = std::result::Result<T, DashboardError>;
