//! HTTP route tests for the `/api` surface and the static client fallback

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use chrono::{TimeZone, Utc};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tempfile::TempDir;
use tower::ServiceExt;
use weather_dashboard::config::WeatherConfig;
use weather_dashboard::{AppState, ForecastResolver, HistoryStore, web};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

struct TestApp {
    app: Router,
    _server: MockServer,
    _dir: TempDir,
}

async fn test_app() -> TestApp {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/geo/1.0/direct"))
        .and(query_param("q", "Oslo"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "name": "Oslo", "lat": 59.9133, "lon": 10.739, "country": "NO" }
        ])))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/geo/1.0/direct"))
        .and(query_param("q", "Atlantis"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/geo/1.0/direct"))
        .and(query_param("q", "Lagos"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let list: Vec<Value> = (1..=3)
        .flat_map(|day| {
            [9, 12, 15].into_iter().map(move |hour| {
                json!({
                    "dt": Utc.with_ymd_and_hms(2024, 6, day, hour, 0, 0).unwrap().timestamp(),
                    "main": { "temp": 48.5, "humidity": 81 },
                    "weather": [{ "icon": "04d", "description": "overcast clouds" }],
                    "wind": { "speed": 7.5 }
                })
            })
        })
        .collect();
    Mock::given(method("GET"))
        .and(path("/data/2.5/forecast"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "city": { "name": "Oslo" }, "list": list })),
        )
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let static_dir = dir.path().join("dist");
    std::fs::create_dir_all(&static_dir).unwrap();
    std::fs::write(static_dir.join("index.html"), "<html>dashboard</html>").unwrap();

    let config = WeatherConfig {
        base_url: server.uri(),
        api_key: "route-test-key".to_string(),
        timeout_seconds: 5,
        timezone: Some("UTC".to_string()),
    };
    let resolver = ForecastResolver::new(&config).unwrap();
    let history = HistoryStore::new(dir.path().join("db").join("searchHistory.json"));

    TestApp {
        app: web::app(AppState::new(resolver, history), &static_dir),
        _server: server,
        _dir: dir,
    }
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

fn post_weather(body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/api/weather")
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn delete(uri: &str) -> Request<Body> {
    Request::builder()
        .method("DELETE")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

#[tokio::test]
async fn test_post_weather_returns_forecast_and_records_history() {
    let test = test_app().await;

    let (status, body) = send(&test.app, post_weather(r#"{"cityName":"  oslo "}"#)).await;

    assert_eq!(status, StatusCode::OK);
    let samples = body.as_array().unwrap();
    assert_eq!(samples.len(), 3);
    assert_eq!(
        samples[0],
        json!({
            "city": "Oslo",
            "date": "6/1/2024",
            "icon": "04d",
            "iconDescription": "overcast clouds",
            "tempF": 49,
            "windSpeed": 8,
            "humidity": 81
        })
    );
    assert_eq!(samples[1]["date"], "6/2/2024");
    assert_eq!(samples[2]["date"], "6/3/2024");

    let (status, history) = send(&test.app, get("/api/weather/history")).await;
    assert_eq!(status, StatusCode::OK);
    let history = history.as_array().unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0]["name"], "Oslo");
    assert!(history[0]["id"].as_str().is_some_and(|id| !id.is_empty()));
}

#[tokio::test]
async fn test_repeated_search_keeps_single_history_entry() {
    let test = test_app().await;

    send(&test.app, post_weather(r#"{"cityName":"Oslo"}"#)).await;
    send(&test.app, post_weather(r#"{"cityName":"OSLO"}"#)).await;

    let (_, history) = send(&test.app, get("/api/weather/history")).await;
    assert_eq!(history.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_missing_city_name_is_bad_request() {
    let test = test_app().await;

    for body in ["{}", r#"{"cityName":"   "}"#, "not json"] {
        let (status, body) = send(&test.app, post_weather(body)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({ "message": "City name is required" }));
    }

    let (_, history) = send(&test.app, get("/api/weather/history")).await;
    assert_eq!(history, json!([]));
}

#[tokio::test]
async fn test_unknown_city_is_not_found() {
    let test = test_app().await;

    let (status, body) = send(&test.app, post_weather(r#"{"cityName":"atlantis"}"#)).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({ "message": "City not found: Atlantis" }));
}

#[tokio::test]
async fn test_upstream_failure_is_bad_gateway() {
    let test = test_app().await;

    let (status, body) = send(&test.app, post_weather(r#"{"cityName":"Lagos"}"#)).await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert!(body["message"].as_str().is_some());
}

#[tokio::test]
async fn test_delete_history_entry() {
    let test = test_app().await;
    send(&test.app, post_weather(r#"{"cityName":"Oslo"}"#)).await;
    let (_, history) = send(&test.app, get("/api/weather/history")).await;
    let id = history[0]["id"].as_str().unwrap().to_string();

    let (status, body) = send(&test.app, delete(&format!("/api/weather/history/{id}"))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "message": "City removed from search history" }));

    let (status, body) = send(&test.app, delete(&format!("/api/weather/history/{id}"))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({ "message": "City not found in search history" }));

    let (_, history) = send(&test.app, get("/api/weather/history")).await;
    assert_eq!(history, json!([]));
}

#[tokio::test]
async fn test_unknown_paths_serve_client_index() {
    let test = test_app().await;

    let response = test
        .app
        .clone()
        .oneshot(get("/dashboard/settings"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    assert_eq!(&bytes[..], b"<html>dashboard</html>");
}
