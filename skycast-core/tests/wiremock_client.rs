//! Integration tests for the OpenWeatherMap client against a mock server,
//! covering the error classification around transport, status and body
//! failures.

use skycast_core::{LocationQuery, OpenWeatherClient, Units, WeatherError};
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{method, path, query_param},
};

fn sample_current_response() -> serde_json::Value {
    serde_json::json!({
        "name": "Bangkok",
        "dt": 1_700_000_000,
        "timezone": 25_200,
        "visibility": 10_000,
        "main": {
            "temp": 31.2,
            "feels_like": 35.8,
            "temp_min": 29.0,
            "temp_max": 33.0,
            "pressure": 1008,
            "humidity": 70
        },
        "weather": [{"description": "light rain", "icon": "10d"}],
        "wind": {"speed": 3.6, "deg": 220},
        "sys": {"country": "TH", "sunrise": 1_699_999_000, "sunset": 1_700_040_000},
        "clouds": {"all": 75},
        "rain": {"1h": 0.4}
    })
}

fn sample_forecast_response() -> serde_json::Value {
    serde_json::json!({
        "city": {"name": "Bangkok", "country": "TH", "timezone": 25_200},
        "list": [
            {
                "dt": 1_700_000_000,
                "main": {"temp": 30.0, "humidity": 65},
                "weather": [{"description": "scattered clouds", "icon": "03d"}],
                "wind": {"speed": 4.0, "deg": 200},
                "clouds": {"all": 40},
                "pop": 0.2
            },
            {
                "dt": 1_700_010_800,
                "main": {"temp": 28.5, "humidity": 70},
                "weather": [{"description": "light rain", "icon": "10d"}],
                "wind": {"speed": 5.0, "deg": 210},
                "clouds": {"all": 80},
                "rain": {"3h": 1.1},
                "pop": 0.7
            }
        ]
    })
}

fn test_client(mock_server: &MockServer) -> OpenWeatherClient {
    OpenWeatherClient::new("TEST_KEY", Units::Metric, "en")
        .expect("client creation should succeed")
        .with_base_url(mock_server.uri())
}

fn bangkok() -> LocationQuery {
    LocationQuery::new("Bangkok").expect("non-blank")
}

#[tokio::test]
async fn current_weather_success_normalizes_the_body() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/weather"))
        .respond_with(ResponseTemplate::new(200).set_body_json(sample_current_response()))
        .mount(&mock_server)
        .await;

    let client = test_client(&mock_server);
    let weather = client.current(&bangkok()).await.expect("success");

    assert_eq!(weather.city, "Bangkok");
    assert_eq!(weather.country, "TH");
    assert!((weather.temperature - 31.2).abs() < 0.001);
    assert_eq!(weather.description, "Light Rain");
    assert_eq!(weather.visibility_km, Some(10.0));
}

#[tokio::test]
async fn request_carries_credential_units_and_language() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/weather"))
        .and(query_param("q", "Bangkok"))
        .and(query_param("appid", "TEST_KEY"))
        .and(query_param("units", "metric"))
        .and(query_param("lang", "en"))
        .respond_with(ResponseTemplate::new(200).set_body_json(sample_current_response()))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = test_client(&mock_server);
    let result = client.current(&bangkok()).await;

    assert!(result.is_ok(), "expected success, got: {result:?}");
}

#[tokio::test]
async fn forecast_requests_forty_samples() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/forecast"))
        .and(query_param("cnt", "40"))
        .respond_with(ResponseTemplate::new(200).set_body_json(sample_forecast_response()))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = test_client(&mock_server);
    let forecast = client.forecast(&bangkok()).await.expect("success");

    assert_eq!(forecast.samples.len(), 2);
    assert_eq!(forecast.utc_offset_secs, Some(25_200));
    assert!((forecast.samples[1].precipitation_probability - 0.7).abs() < 0.001);
}

#[tokio::test]
async fn provider_rejection_is_an_upstream_error_with_its_message() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/weather"))
        .respond_with(
            ResponseTemplate::new(404)
                .set_body_json(serde_json::json!({"cod": "404", "message": "city not found"})),
        )
        .mount(&mock_server)
        .await;

    let client = test_client(&mock_server);
    let result = client.current(&bangkok()).await;

    match result {
        Err(WeatherError::Upstream { status, message }) => {
            assert_eq!(status, 404);
            assert_eq!(message, "city not found");
        }
        other => panic!("expected Upstream, got: {other:?}"),
    }
}

#[tokio::test]
async fn invalid_json_body_is_malformed_response() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/weather"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not valid json"))
        .mount(&mock_server)
        .await;

    let client = test_client(&mock_server);
    let result = client.current(&bangkok()).await;

    assert!(
        matches!(result, Err(WeatherError::MalformedResponse(_))),
        "expected MalformedResponse, got: {result:?}"
    );
}

#[tokio::test]
async fn connection_failure_is_a_transport_error() {
    // Port 1 is reserved and nothing listens on it; the connection is
    // refused before any HTTP exchange happens.
    let client = OpenWeatherClient::new("TEST_KEY", Units::Metric, "en")
        .expect("client creation should succeed")
        .with_base_url("http://127.0.0.1:1");

    let result = client.current(&bangkok()).await;

    assert!(
        matches!(result, Err(WeatherError::Transport(_))),
        "expected Transport, got: {result:?}"
    );
}

#[tokio::test]
async fn forecast_without_list_yields_empty_samples() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/forecast"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({"city": {"name": "Bangkok"}})),
        )
        .mount(&mock_server)
        .await;

    let client = test_client(&mock_server);
    let forecast = client.forecast(&bangkok()).await.expect("not an error");

    assert!(forecast.samples.is_empty());
}

#[tokio::test]
async fn report_survives_a_failing_forecast() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/weather"))
        .respond_with(ResponseTemplate::new(200).set_body_json(sample_current_response()))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/forecast"))
        .respond_with(ResponseTemplate::new(500).set_body_string("Internal Server Error"))
        .mount(&mock_server)
        .await;

    let client = test_client(&mock_server);
    let report = client.report(&bangkok()).await.expect("current succeeded");

    assert_eq!(report.current.city, "Bangkok");
    assert!(report.forecast.samples.is_empty());
    assert!(report.forecast.daily_summaries().is_empty());
}

#[tokio::test]
async fn report_combines_current_and_daily_summaries() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/weather"))
        .respond_with(ResponseTemplate::new(200).set_body_json(sample_current_response()))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/forecast"))
        .respond_with(ResponseTemplate::new(200).set_body_json(sample_forecast_response()))
        .mount(&mock_server)
        .await;

    let client = test_client(&mock_server);
    let report = client.report(&bangkok()).await.expect("success");

    assert_eq!(report.forecast.samples.len(), 2);

    let summaries = report.forecast.daily_summaries();
    assert_eq!(summaries.len(), 1, "both samples fall on the same local day");
    assert!((summaries[0].temp_min - 28.5).abs() < 0.001);
    assert!((summaries[0].temp_max - 30.0).abs() < 0.001);
}
