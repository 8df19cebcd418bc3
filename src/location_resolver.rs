//! Location Resolution Module
//!
//! This module turns a free-text city name into the coordinates the forecast
//! endpoint needs, using only the provider's best match.

use crate::models::Coordinates;
use crate::weather::OpenWeatherClient;
use crate::{DashboardError, Result};
use tracing::debug;

/// Service for resolving city names
pub struct LocationResolver;

impl LocationResolver {
    /// Resolve a city name to coordinates via geocoding
    pub async fn resolve_city(client: &OpenWeatherClient, city: &str) -> Result<Coordinates> {
        debug!("Geocoding location name: {}", city);

        // Use the first (best) result
        let geocoding = client
            .geocode(city)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| DashboardError::invalid_location(city))?;

        debug!(
            "Found location: {} ({:.4}, {:.4})",
            geocoding.name.as_deref().unwrap_or(city),
            geocoding.lat,
            geocoding.lon
        );

        Ok(Coordinates::from(geocoding))
    }
}
