//! Search history entry

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A city the user has searched for
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct CityRecord {
    pub id: String,
    pub name: String,
}

impl CityRecord {
    /// Create a record with a freshly generated id
    #[must_use]
    pub fn new(name: String) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name,
        }
    }
}
