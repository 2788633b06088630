//! Thin HTTP transport against the OpenWeatherMap 2.5 API.
//!
//! One GET per operation, a fixed connect/read timeout, no retries and no
//! caching. Everything interesting happens after the body arrives, in
//! [`crate::normalize`].

use std::time::Duration;

use reqwest::{Client, StatusCode};
use serde_json::Value;
use tracing::{debug, warn};

use crate::error::WeatherError;
use crate::model::{CurrentWeather, Forecast, LocationQuery, Units, WeatherReport};
use crate::normalize::{normalize_current, normalize_forecast};

const DEFAULT_BASE_URL: &str = "https://api.openweathermap.org/data/2.5";
const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// 5 days x 8 three-hour samples per day.
const FORECAST_ITEM_COUNT: u32 = 40;

/// Deterministic reference to the provider's icon artwork for a code.
pub fn icon_url(icon: &str) -> String {
    format!("https://openweathermap.org/img/wn/{icon}@2x.png")
}

/// Client for current conditions and the 5-day forecast.
#[derive(Debug, Clone)]
pub struct OpenWeatherClient {
    http: Client,
    api_key: String,
    units: Units,
    language: String,
    base_url: String,
}

impl OpenWeatherClient {
    /// Build a client for the given credential and display preferences.
    ///
    /// # Errors
    ///
    /// Returns [`WeatherError::Configuration`] for a blank or placeholder
    /// key, before anything touches the network, and
    /// [`WeatherError::Transport`] when the HTTP client cannot be built.
    pub fn new(
        api_key: impl Into<String>,
        units: Units,
        language: impl Into<String>,
    ) -> Result<Self, WeatherError> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() || api_key == crate::config::PLACEHOLDER_API_KEY {
            return Err(WeatherError::Configuration(
                "refusing to send requests without a real API key".into(),
            ));
        }

        let http = Client::builder()
            .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .build()
            .map_err(|e| WeatherError::Transport(e.to_string()))?;

        Ok(Self {
            http,
            api_key,
            units,
            language: language.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
        })
    }

    /// Point the client at a different endpoint, e.g. a mock server.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Fetch and normalize current conditions for a place.
    pub async fn current(&self, location: &LocationQuery) -> Result<CurrentWeather, WeatherError> {
        let raw = self.get_json("weather", location, None).await?;
        normalize_current(&raw)
    }

    /// Fetch and normalize the 5-day/3-hour forecast for a place.
    pub async fn forecast(&self, location: &LocationQuery) -> Result<Forecast, WeatherError> {
        let raw = self
            .get_json("forecast", location, Some(FORECAST_ITEM_COUNT))
            .await?;
        normalize_forecast(&raw)
    }

    /// Fetch current conditions and forecast as one report.
    ///
    /// The two calls run sequentially and independently: current conditions
    /// are required, the forecast is best-effort and degrades to an empty
    /// sequence on any failure.
    pub async fn report(&self, location: &LocationQuery) -> Result<WeatherReport, WeatherError> {
        let current = self.current(location).await?;

        let forecast = match self.forecast(location).await {
            Ok(forecast) => forecast,
            Err(err) => {
                warn!(error = %err, place = location.place(), "forecast fetch failed, continuing with current conditions only");
                Forecast::default()
            }
        };

        Ok(WeatherReport { current, forecast })
    }

    fn query_params(
        &self,
        location: &LocationQuery,
        count: Option<u32>,
    ) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("q", location.as_search_term()),
            ("appid", self.api_key.clone()),
            ("units", self.units.to_string()),
            ("lang", self.language.clone()),
        ];
        if let Some(count) = count {
            params.push(("cnt", count.to_string()));
        }
        params
    }

    async fn get_json(
        &self,
        endpoint: &str,
        location: &LocationQuery,
        count: Option<u32>,
    ) -> Result<Value, WeatherError> {
        let url = format!("{}/{}", self.base_url, endpoint);
        debug!(endpoint, place = location.place(), "requesting weather data");

        let response = self
            .http
            .get(&url)
            .query(&self.query_params(location, count))
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status();
        let body = response.text().await.map_err(transport_error)?;

        if !status.is_success() {
            return Err(upstream_error(status, &body));
        }

        serde_json::from_str(&body).map_err(|e| {
            WeatherError::MalformedResponse(format!("{endpoint} body is not valid JSON: {e}"))
        })
    }
}

fn transport_error(err: reqwest::Error) -> WeatherError {
    if err.is_timeout() {
        WeatherError::Transport(format!(
            "request timed out after {DEFAULT_TIMEOUT_SECS}s: {err}"
        ))
    } else {
        WeatherError::Transport(err.to_string())
    }
}

/// The request completed but the provider rejected it. Its own `message`
/// field is surfaced verbatim when the body carries one.
fn upstream_error(status: StatusCode, body: &str) -> WeatherError {
    let message = serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| {
            v.get("message")
                .and_then(Value::as_str)
                .map(str::to_owned)
        })
        .unwrap_or_else(|| format!("HTTP {status}"));

    WeatherError::Upstream {
        status: status.as_u16(),
        message,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_client() -> OpenWeatherClient {
        OpenWeatherClient::new("KEY", Units::Metric, "en").expect("valid key")
    }

    #[test]
    fn blank_or_placeholder_key_never_builds_a_client() {
        let err = OpenWeatherClient::new("", Units::Metric, "en").unwrap_err();
        assert!(matches!(err, WeatherError::Configuration(_)), "got: {err:?}");

        let err = OpenWeatherClient::new(crate::config::PLACEHOLDER_API_KEY, Units::Metric, "en")
            .unwrap_err();
        assert!(matches!(err, WeatherError::Configuration(_)), "got: {err:?}");
    }

    #[test]
    fn query_params_carry_credential_units_and_language() {
        let client = test_client();
        let location = LocationQuery::new("Bangkok")
            .expect("non-blank")
            .with_country("TH");

        let params = client.query_params(&location, None);
        assert!(params.contains(&("q", "Bangkok,TH".to_string())));
        assert!(params.contains(&("appid", "KEY".to_string())));
        assert!(params.contains(&("units", "metric".to_string())));
        assert!(params.contains(&("lang", "en".to_string())));
        assert!(!params.iter().any(|(name, _)| *name == "cnt"));
    }

    #[test]
    fn forecast_requests_bound_the_item_count() {
        let client = test_client();
        let location = LocationQuery::new("Oslo").expect("non-blank");

        let params = client.query_params(&location, Some(FORECAST_ITEM_COUNT));
        assert!(params.contains(&("cnt", "40".to_string())));
    }

    #[test]
    fn upstream_error_prefers_the_provider_message() {
        let err = upstream_error(StatusCode::NOT_FOUND, r#"{"cod": "404", "message": "city not found"}"#);
        match err {
            WeatherError::Upstream { status, message } => {
                assert_eq!(status, 404);
                assert_eq!(message, "city not found");
            }
            other => panic!("expected Upstream, got: {other:?}"),
        }
    }

    #[test]
    fn upstream_error_without_message_is_generic() {
        let err = upstream_error(StatusCode::BAD_GATEWAY, "<html>oops</html>");
        match err {
            WeatherError::Upstream { status, message } => {
                assert_eq!(status, 502);
                assert!(message.contains("502"));
            }
            other => panic!("expected Upstream, got: {other:?}"),
        }
    }

    #[test]
    fn icon_url_is_a_pure_template() {
        assert_eq!(
            icon_url("10d"),
            "https://openweathermap.org/img/wn/10d@2x.png"
        );
    }
}
