//! Translation of raw OpenWeatherMap JSON into the normalized records.
//!
//! Each provider section (`main`, `weather`, `wind`, `sys`, `clouds`,
//! `rain`, `snow`) is decoded into a fully-defaulted intermediate struct
//! before assembly, so every fallback value is a single explicit decision
//! here rather than scattered across call sites. An absent section decodes
//! to its default; a section that is present but not an object is a schema
//! change upstream and is reported as `MalformedResponse`, never silently
//! defaulted. No individual field is required: the empty object normalizes
//! to the all-defaults record.

use std::collections::BTreeMap;

use chrono::{DateTime, FixedOffset, NaiveDate, Utc};
use serde::Deserialize;
use serde_json::Value;

use crate::error::WeatherError;
use crate::model::{CurrentWeather, DailySummary, Forecast, ForecastSample};

/// Daily summaries are capped at the provider's forecast horizon.
const MAX_SUMMARY_DAYS: usize = 5;

#[derive(Debug, Default, Deserialize)]
struct RawCondition {
    #[serde(default)]
    description: String,
    #[serde(default)]
    icon: String,
}

#[derive(Debug, Default, Deserialize)]
struct RawMain {
    #[serde(default)]
    temp: f64,
    #[serde(default)]
    feels_like: f64,
    #[serde(default)]
    temp_min: f64,
    #[serde(default)]
    temp_max: f64,
    #[serde(default)]
    pressure: f64,
    #[serde(default)]
    humidity: u8,
}

#[derive(Debug, Default, Deserialize)]
struct RawWind {
    #[serde(default)]
    speed: f64,
    #[serde(default)]
    deg: f64,
}

#[derive(Debug, Default, Deserialize)]
struct RawSys {
    #[serde(default)]
    country: String,
    #[serde(default)]
    sunrise: i64,
    #[serde(default)]
    sunset: i64,
}

#[derive(Debug, Default, Deserialize)]
struct RawClouds {
    #[serde(default)]
    all: u8,
}

/// Accumulation section; the provider keys it by window length.
#[derive(Debug, Default, Deserialize)]
struct RawPrecipitation {
    #[serde(rename = "1h", default)]
    last_hour: f64,
    #[serde(rename = "3h", default)]
    last_three_hours: f64,
}

#[derive(Debug, Deserialize)]
struct RawCurrent {
    #[serde(default)]
    name: String,
    #[serde(default)]
    dt: i64,
    #[serde(default)]
    timezone: i32,
    #[serde(default)]
    visibility: Option<f64>,
    #[serde(default)]
    main: RawMain,
    #[serde(default)]
    weather: Vec<RawCondition>,
    #[serde(default)]
    wind: RawWind,
    #[serde(default)]
    sys: RawSys,
    #[serde(default)]
    clouds: RawClouds,
    #[serde(default)]
    rain: Option<RawPrecipitation>,
    #[serde(default)]
    snow: Option<RawPrecipitation>,
}

#[derive(Debug, Deserialize)]
struct RawForecastEntry {
    #[serde(default)]
    dt: i64,
    #[serde(default)]
    visibility: Option<f64>,
    #[serde(default)]
    main: RawMain,
    #[serde(default)]
    weather: Vec<RawCondition>,
    #[serde(default)]
    wind: RawWind,
    #[serde(default)]
    clouds: RawClouds,
    #[serde(default)]
    rain: Option<RawPrecipitation>,
    #[serde(default)]
    snow: Option<RawPrecipitation>,
    #[serde(default)]
    pop: f64,
}

#[derive(Debug, Default, Deserialize)]
struct RawCity {
    #[serde(default)]
    name: String,
    #[serde(default)]
    country: String,
    #[serde(default)]
    timezone: Option<i32>,
}

#[derive(Debug, Deserialize)]
struct RawForecast {
    #[serde(default)]
    city: RawCity,
    /// Kept untyped: an absent or non-array `list` means "no forecast",
    /// not a malformed response.
    #[serde(default)]
    list: Option<Value>,
}

/// Unix seconds to an instant. `0` maps to the epoch, the provider's own
/// marker for "not reported"; callers treat epoch instants as unavailable.
fn unix_to_utc(ts: i64) -> DateTime<Utc> {
    DateTime::from_timestamp(ts, 0).unwrap_or_default()
}

/// Meters to kilometers, keeping "not reported" distinct from zero.
fn visibility_km(meters: Option<f64>) -> Option<f64> {
    meters.map(|m| m / 1000.0)
}

/// Uppercase the first letter of each whitespace-separated word.
pub(crate) fn title_case(text: &str) -> String {
    text.split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Normalize one current-weather response body.
///
/// # Errors
///
/// Returns [`WeatherError::MalformedResponse`] when `raw` is not a JSON
/// object or a present section is not the expected shape.
pub fn normalize_current(raw: &Value) -> Result<CurrentWeather, WeatherError> {
    let raw = RawCurrent::deserialize(raw)
        .map_err(|e| WeatherError::MalformedResponse(format!("current conditions: {e}")))?;

    let condition = raw.weather.into_iter().next().unwrap_or_default();

    Ok(CurrentWeather {
        city: raw.name,
        country: raw.sys.country,
        observed_at: unix_to_utc(raw.dt),
        temperature: raw.main.temp,
        feels_like: raw.main.feels_like,
        temp_min: raw.main.temp_min,
        temp_max: raw.main.temp_max,
        pressure: raw.main.pressure,
        humidity: raw.main.humidity,
        wind_speed: raw.wind.speed,
        wind_direction_deg: raw.wind.deg,
        description: title_case(&condition.description),
        icon: condition.icon,
        sunrise: unix_to_utc(raw.sys.sunrise),
        sunset: unix_to_utc(raw.sys.sunset),
        utc_offset_secs: raw.timezone,
        visibility_km: visibility_km(raw.visibility),
        cloud_cover_pct: raw.clouds.all,
        rain_mm: raw.rain.map(|r| r.last_hour).unwrap_or_default(),
        snow_mm: raw.snow.map(|s| s.last_hour).unwrap_or_default(),
    })
}

/// Normalize one forecast response body into ordered samples.
///
/// An absent or non-array `list` yields an empty sequence: the forecast is
/// optional enrichment and its absence must not look like a failure.
///
/// # Errors
///
/// Returns [`WeatherError::MalformedResponse`] when `raw` is not a JSON
/// object or an individual entry violates the section shapes.
pub fn normalize_forecast(raw: &Value) -> Result<Forecast, WeatherError> {
    let raw = RawForecast::deserialize(raw)
        .map_err(|e| WeatherError::MalformedResponse(format!("forecast: {e}")))?;

    let entries = raw
        .list
        .as_ref()
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or_default();

    let mut samples = Vec::with_capacity(entries.len());
    for (index, entry) in entries.iter().enumerate() {
        let entry = RawForecastEntry::deserialize(entry)
            .map_err(|e| WeatherError::MalformedResponse(format!("forecast entry {index}: {e}")))?;

        let condition = entry.weather.into_iter().next().unwrap_or_default();

        samples.push(ForecastSample {
            forecast_at: unix_to_utc(entry.dt),
            temperature: entry.main.temp,
            feels_like: entry.main.feels_like,
            temp_min: entry.main.temp_min,
            temp_max: entry.main.temp_max,
            pressure: entry.main.pressure,
            humidity: entry.main.humidity,
            wind_speed: entry.wind.speed,
            wind_direction_deg: entry.wind.deg,
            description: title_case(&condition.description),
            icon: condition.icon,
            visibility_km: visibility_km(entry.visibility),
            cloud_cover_pct: entry.clouds.all,
            rain_mm: entry.rain.map(|r| r.last_three_hours).unwrap_or_default(),
            snow_mm: entry.snow.map(|s| s.last_three_hours).unwrap_or_default(),
            precipitation_probability: entry.pop,
        });
    }

    Ok(Forecast {
        city: raw.city.name,
        country: raw.city.country,
        utc_offset_secs: raw.city.timezone,
        samples,
    })
}

fn local_date(sample: &ForecastSample, offset: Option<FixedOffset>) -> NaiveDate {
    match offset {
        Some(offset) => sample.forecast_at.with_timezone(&offset).date_naive(),
        None => sample.forecast_at.date_naive(),
    }
}

/// Most frequent icon among the day's samples, first-seen order breaking
/// ties, paired with the description of the first sample carrying it.
fn modal_condition(day: &[&ForecastSample]) -> (String, String) {
    let mut counts: Vec<(&str, usize)> = Vec::new();
    for sample in day {
        match counts.iter_mut().find(|(icon, _)| *icon == sample.icon) {
            Some(entry) => entry.1 += 1,
            None => counts.push((sample.icon.as_str(), 1)),
        }
    }

    let mut best: Option<(&str, usize)> = None;
    for (icon, count) in counts {
        if best.map(|(_, c)| count > c).unwrap_or(true) {
            best = Some((icon, count));
        }
    }

    match best {
        Some((icon, _)) => {
            let description = day
                .iter()
                .find(|s| s.icon == icon)
                .map(|s| s.description.clone())
                .unwrap_or_default();
            (icon.to_string(), description)
        }
        None => (String::new(), String::new()),
    }
}

/// Group samples into at most five daily summaries, ordered by date.
///
/// Calendar dates are derived in the provider-reported UTC offset when
/// given, else UTC. This derivation never fails; empty in, empty out.
pub fn group_into_daily(
    samples: &[ForecastSample],
    utc_offset_secs: Option<i32>,
) -> Vec<DailySummary> {
    let offset = utc_offset_secs.and_then(FixedOffset::east_opt);

    let mut buckets: BTreeMap<NaiveDate, Vec<&ForecastSample>> = BTreeMap::new();
    for sample in samples {
        buckets
            .entry(local_date(sample, offset))
            .or_default()
            .push(sample);
    }

    buckets
        .into_iter()
        .take(MAX_SUMMARY_DAYS)
        .map(|(date, day)| {
            let temp_min = day
                .iter()
                .map(|s| s.temperature)
                .fold(f64::INFINITY, f64::min);
            let temp_max = day
                .iter()
                .map(|s| s.temperature)
                .fold(f64::NEG_INFINITY, f64::max);
            let (icon, description) = modal_condition(&day);

            DailySummary {
                date,
                temp_min,
                temp_max,
                icon,
                description,
            }
        })
        .collect()
}
