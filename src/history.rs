use std::path::{Path, PathBuf};

use tokio::fs;
use tokio::sync::Mutex;

use crate::models::CityRecord;
use crate::{DashboardError, Result};

/// Search history persisted as a JSON array of `{id, name}` records.
///
/// Every operation holds the store lock for its whole read-modify-write cycle.
#[derive(Debug)]
pub struct HistoryStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl HistoryStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Records in the order they were added
    #[tracing::instrument(name = "list_cities", level = "debug", skip(self))]
    pub async fn list_cities(&self) -> Result<Vec<CityRecord>> {
        let _guard = self.lock.lock().await;
        self.read().await
    }

    /// Add a city under its normalized name, returning the existing record if one matches
    #[tracing::instrument(name = "add_city", level = "debug", skip(self))]
    pub async fn add_city(&self, name: &str) -> Result<CityRecord> {
        let normalized = normalize_city_name(name);
        if normalized.is_empty() {
            return Err(DashboardError::validation("City name is required"));
        }

        let _guard = self.lock.lock().await;
        let mut cities = self.read().await?;

        if let Some(existing) = cities
            .iter()
            .find(|city| city.name.to_lowercase() == normalized.to_lowercase())
        {
            tracing::debug!("City already in history");
            return Ok(existing.clone());
        }

        let city = CityRecord::new(normalized);
        cities.push(city.clone());
        self.write(&cities).await?;

        tracing::info!("Added {} to search history", city.name);
        Ok(city)
    }

    /// Remove a record by id. Returns `false` when no record had that id.
    #[tracing::instrument(name = "remove_city", level = "debug", skip(self))]
    pub async fn remove_city(&self, id: &str) -> Result<bool> {
        let _guard = self.lock.lock().await;
        let mut cities = self.read().await?;
        let initial_len = cities.len();

        cities.retain(|city| city.id != id);

        if cities.len() == initial_len {
            return Ok(false);
        }

        self.write(&cities).await?;
        Ok(true)
    }

    async fn read(&self) -> Result<Vec<CityRecord>> {
        match fs::read_to_string(&self.path).await {
            Ok(contents) => Ok(serde_json::from_str(&contents).unwrap_or_else(|e| {
                tracing::error!("Error reading search history {}: {}", self.path.display(), e);
                Vec::new()
            })),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                self.write(&[]).await?;
                Ok(Vec::new())
            }
            Err(e) => {
                tracing::error!("Error reading search history {}: {}", self.path.display(), e);
                Ok(Vec::new())
            }
        }
    }

    async fn write(&self, cities: &[CityRecord]) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).await.map_err(|e| {
                DashboardError::history(format!(
                    "Failed to create history directory {}: {e}",
                    parent.display()
                ))
            })?;
        }

        let json = serde_json::to_string_pretty(cities)?;
        fs::write(&self.path, json).await.map_err(|e| {
            DashboardError::history(format!(
                "Failed to write search history {}: {e}",
                self.path.display()
            ))
        })
    }
}

/// Trim, lowercase, then capitalize the first letter of every space-separated word
#[must_use]
pub fn normalize_city_name(name: &str) -> String {
    name.trim()
        .to_lowercase()
        .split(' ')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}
