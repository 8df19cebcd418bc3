use std::sync::Arc;

use axum::{
    Router,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::{delete, get, post},
};
use serde::{Deserialize, Serialize};

use crate::{
    DashboardError,
    history::HistoryStore,
    models::{CityRecord, WeatherSample},
    weather::ForecastResolver,
};

/// Shared state handed to every handler
#[derive(Clone)]
pub struct AppState {
    pub resolver: Arc<ForecastResolver>,
    pub history: Arc<HistoryStore>,
}

impl AppState {
    pub fn new(resolver: ForecastResolver, history: HistoryStore) -> Self {
        Self {
            resolver: Arc::new(resolver),
            history: Arc::new(history),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeatherRequest {
    pub city_name: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    fn new(message: impl Into<String>) -> Json<Self> {
        Json(Self {
            message: message.into(),
        })
    }
}

/// Error returned from handlers, rendered as `{"message": ...}`
#[derive(Debug)]
pub struct ApiError(DashboardError);

impl From<DashboardError> for ApiError {
    fn from(err: DashboardError) -> Self {
        Self(err)
    }
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match &self.0 {
            DashboardError::InvalidLocation { .. } => StatusCode::NOT_FOUND,
            DashboardError::Validation { .. } => StatusCode::BAD_REQUEST,
            DashboardError::Upstream { .. } | DashboardError::MalformedResponse { .. } => {
                StatusCode::BAD_GATEWAY
            }
            DashboardError::History { .. }
            | DashboardError::Io { .. }
            | DashboardError::Config { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();

        if status.is_server_error() {
            tracing::error!(error = %self.0, "Request failed");
        } else {
            tracing::debug!(error = %self.0, "Request rejected");
        }

        (status, MessageResponse::new(self.0.user_message())).into_response()
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/weather", post(search_weather))
        .route("/weather/history", get(get_history))
        .route("/weather/history/{id}", delete(delete_history))
        .with_state(state)
}

async fn search_weather(
    State(state): State<AppState>,
    payload: Result<Json<WeatherRequest>, JsonRejection>,
) -> Result<Json<Vec<WeatherSample>>, ApiError> {
    let city_name = payload
        .ok()
        .and_then(|Json(request)| request.city_name)
        .filter(|name| !name.trim().is_empty())
        .ok_or_else(|| DashboardError::validation("City name is required"))?;

    let city = state.history.add_city(&city_name).await?;
    let forecast = state.resolver.resolve_forecast(&city.name).await?;

    Ok(Json(forecast))
}

async fn get_history(State(state): State<AppState>) -> Result<Json<Vec<CityRecord>>, ApiError> {
    Ok(Json(state.history.list_cities().await?))
}

async fn delete_history(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Response, ApiError> {
    if state.history.remove_city(&id).await? {
        Ok(MessageResponse::new("City removed from search history").into_response())
    } else {
        Ok((
            StatusCode::NOT_FOUND,
            MessageResponse::new("City not found in search history"),
        )
            .into_response())
    }
}
