//! Integration tests for the aggregation API client using WireMock
//!
//! A mock server stands in for the aggregation API so paths, query strings and
//! failure handling can be checked without network access.

use weather_dashboard::config::ApiConfig;
use weather_dashboard::models::TrendDirection;
use weather_dashboard::{AggregatorClient, DashboardError, WeatherApi};
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{header, method, path, query_param},
};

// =============================================================================
// Test Helpers
// =============================================================================

fn client_for(server: &MockServer) -> AggregatorClient {
    AggregatorClient::new(&ApiConfig {
        base_url: server.uri(),
        timeout_seconds: Some(5),
    })
    .expect("Failed to create client")
}

fn json_response(body: serde_json::Value) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(body)
}

// =============================================================================
// Endpoint Tests
// =============================================================================

#[tokio::test]
async fn test_get_weather_sends_encoded_city_query() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/weather"))
        .and(query_param("city", "São Paulo"))
        .and(header(
            "user-agent",
            concat!("weather-dashboard/", env!("CARGO_PKG_VERSION")),
        ))
        .respond_with(json_response(serde_json::json!({
            "city": "São Paulo",
            "source": "openweathermap",
            "data": {
                "temperature": 24.5,
                "humidity": 70,
                "wind_speed": 2.1,
                "pressure": 1015,
                "weather": "scattered clouds"
            }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let reading = client_for(&server).get_weather("São Paulo").await.unwrap();

    assert_eq!(reading.city, "São Paulo");
    assert_eq!(reading.source, "openweathermap");
    let data = reading.data.unwrap();
    assert_eq!(data.format_temperature(), "24.5°C");
    assert_eq!(data.format_pressure(), "1015 hPa");
}

#[tokio::test]
async fn test_get_weather_tolerates_missing_fields() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/weather"))
        .respond_with(json_response(serde_json::json!({
            "city": "Oulu",
            "source": "fmi",
            "data": { "humidity": 90 }
        })))
        .mount(&server)
        .await;

    let reading = client_for(&server).get_weather("Oulu").await.unwrap();
    assert_eq!(reading.data.unwrap().format_temperature(), "N/A°C");
}

#[tokio::test]
async fn test_get_stats_uses_path_and_hours() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/weather/stats/Oulu"))
        .and(query_param("hours", "24"))
        .respond_with(json_response(serde_json::json!({
            "city": "Oulu",
            "statistics": {
                "min_temperature": -3.0,
                "max_temperature": 1.5,
                "avg_temperature": -0.75,
                "observation_count": 48
            }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let stats = client_for(&server).get_stats("Oulu", 24).await.unwrap().unwrap();
    assert_eq!(stats.format_avg(), "-0.75°C");
    assert_eq!(stats.observation_count, Some(48));
}

#[tokio::test]
async fn test_get_trend_decodes_direction() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/weather/trend/Oulu"))
        .and(query_param("hours", "12"))
        .respond_with(json_response(serde_json::json!({
            "trend_analysis": { "trend": "cooling", "change": -2.5 }
        })))
        .mount(&server)
        .await;

    let trend = client_for(&server).get_trend("Oulu", 12).await.unwrap().unwrap();
    assert_eq!(trend.trend, TrendDirection::Cooling);
    assert_eq!(trend.format_change(), "-2.5°C");
}

#[tokio::test]
async fn test_get_hourly_keeps_order() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/weather/hourly/Oulu"))
        .and(query_param("hours", "24"))
        .respond_with(json_response(serde_json::json!({
            "hourly_data": [
                { "hour": "00", "avg_temperature": 5 },
                { "hour": "01", "avg_temperature": 6 }
            ]
        })))
        .mount(&server)
        .await;

    let hourly = client_for(&server).get_hourly("Oulu", 24).await.unwrap();
    let hours: Vec<&str> = hourly.iter().map(|p| p.hour.as_str()).collect();
    assert_eq!(hours, ["00", "01"]);
    assert_eq!(hourly[1].avg_temperature, Some(6.0));
}

#[tokio::test]
async fn test_compare_sources_keeps_response_key_order() {
    let server = MockServer::start().await;
    // Raw body: a json! value would sort the keys
    let body = r#"{"source_comparison":{"weatherapi":{"count":3,"avg_temperature":2.0},"fmi":{"count":5},"openweathermap":{"count":4}}}"#;
    Mock::given(method("GET"))
        .and(path("/weather/compare/Rio%2FGrande"))
        .and(query_param("hours", "6"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(body, "application/json"))
        .mount(&server)
        .await;

    let comparison = client_for(&server)
        .compare_sources("Rio/Grande", 6)
        .await
        .unwrap();
    let sources: Vec<&str> = comparison.rows().iter().map(|r| r.source.as_str()).collect();
    assert_eq!(sources, ["weatherapi", "fmi", "openweathermap"]);
}

#[tokio::test]
async fn test_missing_comparison_is_empty() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/weather/compare/Oulu"))
        .respond_with(json_response(serde_json::json!({ "city": "Oulu" })))
        .mount(&server)
        .await;

    let comparison = client_for(&server).compare_sources("Oulu", 24).await.unwrap();
    assert!(comparison.is_empty());
}

#[tokio::test]
async fn test_get_history_encodes_city_in_path() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/weather/history/S%C3%A3o%20Paulo"))
        .and(query_param("hours", "48"))
        .respond_with(json_response(serde_json::json!({
            "history": [
                { "timestamp": "2024-01-15T10:00:00Z", "source": "fmi", "temperature": 21.0 },
                { "timestamp": "2024-01-15T11:00:00", "source": "weatherapi", "temperature": 22.5 }
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let history = client_for(&server).get_history("São Paulo", 48).await.unwrap();
    assert_eq!(history.len(), 2);
    assert!(history[0].format_line().starts_with("2024-01-15 10:00 UTC  [fmi]  21°C"));
}

// =============================================================================
// Failure Tests
// =============================================================================

#[tokio::test]
async fn test_server_error_maps_to_http_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/weather/stats/Oulu"))
        .respond_with(ResponseTemplate::new(500).set_body_string("database down"))
        .mount(&server)
        .await;

    let err = client_for(&server).get_stats("Oulu", 24).await.unwrap_err();
    match err {
        DashboardError::Http { status, message } => {
            assert_eq!(status, 500);
            assert!(message.contains("database down"));
        }
        other => panic!("Expected HTTP error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_not_found_is_an_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/weather"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let err = client_for(&server).get_weather("Atlantis").await.unwrap_err();
    assert!(matches!(err, DashboardError::Http { status: 404, .. }));
}

#[tokio::test]
async fn test_malformed_body_maps_to_decode_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/weather/hourly/Oulu"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"))
        .mount(&server)
        .await;

    let err = client_for(&server).get_hourly("Oulu", 24).await.unwrap_err();
    assert!(matches!(err, DashboardError::Decode { .. }));
}

#[tokio::test]
async fn test_unreachable_server_maps_to_network_error() {
    let client = AggregatorClient::new(&ApiConfig {
        base_url: "http://127.0.0.1:1".to_string(),
        timeout_seconds: Some(2),
    })
    .unwrap();
    let err = client.get_weather("Oulu").await.unwrap_err();
    assert!(matches!(err, DashboardError::Network { .. }));
}

#[tokio::test]
async fn test_failed_request_is_not_retried() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/weather/trend/Oulu"))
        .respond_with(ResponseTemplate::new(503))
        .expect(1)
        .mount(&server)
        .await;

    assert!(client_for(&server).get_trend("Oulu", 24).await.is_err());
}
