//! Raw forecast series as returned for one location

use super::ForecastSample;
use serde::{Deserialize, Serialize};

/// Forecast time series for a single location
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ForecastSeries {
    /// Canonical city name reported by the provider
    pub city_name: String,
    /// Samples in the order the provider returned them (chronological)
    pub samples: Vec<ForecastSample>,
}

impl ForecastSeries {
    /// Create a new series
    #[must_use]
    pub fn new(city_name: String, samples: Vec<ForecastSample>) -> Self {
        Self {
            city_name,
            samples,
        }
    }

    /// Earliest available sample, treated as the current conditions
    #[must_use]
    pub fn first(&self) -> Option<&ForecastSample> {
        self.samples.first()
    }
}
