use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::error::WeatherError;

/// Unit system requested from the provider.
///
/// Selects the temperature and wind-speed units the provider reports in.
/// Display only: no value is ever converted between systems locally.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Units {
    #[default]
    Metric,
    Imperial,
}

impl Units {
    pub fn as_str(&self) -> &'static str {
        match self {
            Units::Metric => "metric",
            Units::Imperial => "imperial",
        }
    }

    pub fn temperature_suffix(&self) -> &'static str {
        match self {
            Units::Metric => "°C",
            Units::Imperial => "°F",
        }
    }

    pub fn wind_speed_suffix(&self) -> &'static str {
        match self {
            Units::Metric => "m/s",
            Units::Imperial => "mph",
        }
    }
}

impl std::fmt::Display for Units {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for Units {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.to_lowercase().as_str() {
            "metric" => Ok(Units::Metric),
            "imperial" => Ok(Units::Imperial),
            _ => Err(anyhow::anyhow!(
                "Unknown unit system '{value}'. Supported: metric, imperial."
            )),
        }
    }
}

/// Free-text place search, used verbatim as the provider's `q` parameter.
#[derive(Debug, Clone)]
pub struct LocationQuery {
    place: String,
    country: Option<String>,
}

impl LocationQuery {
    /// Build a query from a place name. The only validation is non-blank.
    pub fn new(place: impl Into<String>) -> Result<Self, WeatherError> {
        let place = place.into().trim().to_string();
        if place.is_empty() {
            return Err(WeatherError::Input("location query is empty".into()));
        }

        Ok(Self {
            place,
            country: None,
        })
    }

    /// Attach a country code to disambiguate the search, e.g. `"TH"`.
    pub fn with_country(mut self, country: impl Into<String>) -> Self {
        let country = country.into().trim().to_string();
        self.country = if country.is_empty() {
            None
        } else {
            Some(country)
        };
        self
    }

    pub fn place(&self) -> &str {
        &self.place
    }

    /// The search term sent to the provider: `"place"` or `"place,CC"`.
    pub fn as_search_term(&self) -> String {
        match &self.country {
            Some(country) => format!("{},{}", self.place, country),
            None => self.place.clone(),
        }
    }
}

/// Normalized current conditions for one place.
///
/// Every field is defined: absent provider fields fall back to the defaults
/// chosen in the normalizer. Instants equal to the Unix epoch mean "not
/// reported" -- the provider uses `0` for missing timestamps and we carry
/// that convention forward rather than invent a second marker.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentWeather {
    pub city: String,
    pub country: String,
    pub observed_at: DateTime<Utc>,
    pub temperature: f64,
    pub feels_like: f64,
    pub temp_min: f64,
    pub temp_max: f64,
    /// Atmospheric pressure in hPa.
    pub pressure: f64,
    /// Relative humidity in percent.
    pub humidity: u8,
    pub wind_speed: f64,
    pub wind_direction_deg: f64,
    /// Title-cased provider description, e.g. `"Light Rain"`.
    pub description: String,
    /// Provider icon code, e.g. `"10d"`; empty when not reported.
    pub icon: String,
    pub sunrise: DateTime<Utc>,
    pub sunset: DateTime<Utc>,
    /// Offset of the place's local time from UTC, in seconds.
    pub utc_offset_secs: i32,
    /// Visibility in kilometers. `None` means the provider did not report
    /// it, which is not the same thing as zero visibility.
    pub visibility_km: Option<f64>,
    /// Cloud cover in percent.
    pub cloud_cover_pct: u8,
    /// Rain volume over the last hour, in mm.
    pub rain_mm: f64,
    /// Snow volume over the last hour, in mm.
    pub snow_mm: f64,
}

/// One 3-hour-resolution forecast entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForecastSample {
    pub forecast_at: DateTime<Utc>,
    pub temperature: f64,
    pub feels_like: f64,
    pub temp_min: f64,
    pub temp_max: f64,
    pub pressure: f64,
    pub humidity: u8,
    pub wind_speed: f64,
    pub wind_direction_deg: f64,
    pub description: String,
    pub icon: String,
    pub visibility_km: Option<f64>,
    pub cloud_cover_pct: u8,
    /// Rain volume over the 3-hour window, in mm.
    pub rain_mm: f64,
    /// Snow volume over the 3-hour window, in mm.
    pub snow_mm: f64,
    /// Probability of precipitation, 0.0 to 1.0.
    pub precipitation_probability: f64,
}

/// Ordered forecast samples for one place, up to 40 entries (5 days x 8).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Forecast {
    pub city: String,
    pub country: String,
    /// UTC offset reported by the provider for the place, in seconds.
    pub utc_offset_secs: Option<i32>,
    pub samples: Vec<ForecastSample>,
}

impl Forecast {
    /// Aggregate the samples into at most five daily summaries, using the
    /// provider-reported UTC offset to decide calendar-day boundaries.
    pub fn daily_summaries(&self) -> Vec<DailySummary> {
        crate::normalize::group_into_daily(&self.samples, self.utc_offset_secs)
    }
}

/// Aggregate over all forecast samples falling on one calendar date.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DailySummary {
    pub date: NaiveDate,
    /// Minimum of the day's sample temperatures; `temp_min <= temp_max`.
    pub temp_min: f64,
    pub temp_max: f64,
    /// Most frequent icon code among the day's samples, first-seen order
    /// breaking ties.
    pub icon: String,
    /// Description of the first sample carrying the modal icon.
    pub description: String,
}

/// Current conditions plus forecast, combined defensively: a failed
/// forecast fetch leaves `forecast` empty instead of discarding `current`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeatherReport {
    pub current: CurrentWeather,
    pub forecast: Forecast,
}
