//! Error types and handling for the weather dashboard

use thiserror::Error;

/// Main error type for the weather dashboard
#[derive(Error, Debug)]
pub enum DashboardError {
    /// Configuration-related errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// Geocoding produced no usable match for the query
    #[error("Invalid location: {query}")]
    InvalidLocation { query: String },

    /// Upstream provider answered with a failure status or could not be reached
    #[error("Upstream error: {message}")]
    Upstream { message: String },

    /// Upstream provider answered successfully with a body we cannot use
    #[error("Malformed response: {message}")]
    MalformedResponse { message: String },

    /// Input validation errors
    #[error("Invalid input: {message}")]
    Validation { message: String },

    /// Search history persistence errors
    #[error("History error: {message}")]
    History { message: String },

    /// I/O operation errors
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },
}

impl DashboardError {
    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a new invalid location error
    pub fn invalid_location<S: Into<String>>(query: S) -> Self {
        Self::InvalidLocation {
            query: query.into(),
        }
    }

    /// Create a new upstream error
    pub fn upstream<S: Into<String>>(message: S) -> Self {
        Self::Upstream {
            message: message.into(),
        }
    }

    /// Create a new malformed response error
    pub fn malformed<S: Into<String>>(message: S) -> Self {
        Self::MalformedResponse {
            message: message.into(),
        }
    }

    /// Create a new validation error
    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Create a new history error
    pub fn history<S: Into<String>>(message: S) -> Self {
        Self::History {
            message: message.into(),
        }
    }

    /// Get a user-friendly error message
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            DashboardError::Config { .. } => {
                "Configuration error. Please check your config file and API keys.".to_string()
            }
            DashboardError::InvalidLocation { query } => format!("City not found: {query}"),
            DashboardError::Upstream { .. } => {
                "Failed to get weather data. Please try again later.".to_string()
            }
            DashboardError::MalformedResponse { .. } => {
                "The weather provider returned an unexpected response.".to_string()
            }
            DashboardError::Validation { message } => message.clone(),
            DashboardError::History { .. } | DashboardError::Io { .. } => {
                "Failed to update search history.".to_string()
            }
        }
    }
}

impl From<serde_json::Error> for DashboardError {
    fn from(err: serde_json::Error) -> Self {
        DashboardError::history(err.to_string())
    }
}
