//! Current-conditions extraction and noon-nearest day bucketing

use crate::models::{ForecastSample, ForecastSeries, WeatherSample};
use crate::{DashboardError, Result};

use super::ForecastZone;

/// Maximum number of upcoming days returned after the current conditions
pub const MAX_FORECAST_DAYS: usize = 5;

const NOON: i64 = 12;

/// Normalize the first sample of the series as "now".
pub fn current_conditions(series: &ForecastSeries, zone: &ForecastZone) -> Result<WeatherSample> {
    let first = series.first().ok_or_else(|| {
        DashboardError::malformed("Forecast response contained no samples")
    })?;

    Ok(WeatherSample::from_forecast(
        first,
        &series.city_name,
        zone.date_label(first.timestamp),
    ))
}

/// Pick one sample per upcoming calendar day, the one whose local hour is closest to noon.
///
/// Days are taken in the order they first appear in the series, the current day is
/// skipped entirely and at most [`MAX_FORECAST_DAYS`] days are returned. When two
/// samples are equally close to noon the earlier one in the series wins.
pub fn daily_forecast(
    series: &ForecastSeries,
    current_date: &str,
    zone: &ForecastZone,
) -> Vec<WeatherSample> {
    let labelled: Vec<(String, &ForecastSample)> = series
        .samples
        .iter()
        .map(|sample| (zone.date_label(sample.timestamp), sample))
        .collect();

    // Insertion order matters here, do not swap for a sorted set
    let mut dates: Vec<&str> = Vec::new();
    for (date, _) in &labelled {
        if date != current_date && !dates.contains(&date.as_str()) {
            dates.push(date);
        }
    }
    dates.truncate(MAX_FORECAST_DAYS);

    dates
        .into_iter()
        .filter_map(|date| {
            let day = labelled
                .iter()
                .filter(|(sample_date, _)| sample_date == date)
                .map(|(_, sample)| *sample);

            noon_nearest(day, zone).map(|winner| {
                WeatherSample::from_forecast(winner, &series.city_name, date.to_string())
            })
        })
        .collect()
}

fn noon_nearest<'a>(
    samples: impl Iterator<Item = &'a ForecastSample>,
    zone: &ForecastZone,
) -> Option<&'a ForecastSample> {
    let mut best: Option<(&ForecastSample, i64)> = None;

    for sample in samples {
        let distance = (NOON - i64::from(zone.local_hour(sample.timestamp))).abs();
        if best.is_none_or(|(_, best_distance)| distance < best_distance) {
            best = Some((sample, distance));
        }
    }

    best.map(|(sample, _)| sample)
}
