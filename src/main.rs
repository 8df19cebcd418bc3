use anyhow::Result;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use weather_dashboard::{AppState, DashboardConfig, ForecastResolver, HistoryStore, web};

fn init_tracing(config: &DashboardConfig) {
    // RUST_LOG wins over the configured level
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        format!(
            "weather_dashboard={level},tower_http={level}",
            level = config.logging.level
        )
        .into()
    });

    let is_json = config.logging.format == "json";
    let json_layer = is_json.then(|| tracing_subscriber::fmt::layer().json().flatten_event(true));
    let text_layer = (!is_json).then(tracing_subscriber::fmt::layer);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(json_layer)
        .with(text_layer)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let config = DashboardConfig::load()?;
    init_tracing(&config);

    tracing::info!("Starting weather dashboard v{}", weather_dashboard::VERSION);
    if config.weather.uses_fallback_key() {
        tracing::warn!("No OpenWeather API key configured, using the development placeholder");
    }

    let resolver = ForecastResolver::new(&config.weather)?;
    let history = HistoryStore::new(&config.history.file_path);
    tracing::info!("Search history stored at {}", history.path().display());

    web::run(&config.server, AppState::new(resolver, history)).await
}
