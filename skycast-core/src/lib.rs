//! Core library for the `skycast` weather client.
//!
//! This crate defines:
//! - Settings & credentials handling
//! - The OpenWeatherMap transport client
//! - Normalization of provider JSON into stable records
//! - The closed error taxonomy around fetch failures
//!
//! It is used by `skycast-cli`, but can also be reused by other binaries or
//! services; the normalized records are immutable values that can be handed
//! across thread boundaries.

pub mod client;
pub mod config;
pub mod error;
pub mod model;
pub mod normalize;

pub use client::{OpenWeatherClient, icon_url};
pub use config::{Config, ThemeMode};
pub use error::WeatherError;
pub use model::{
    CurrentWeather, DailySummary, Forecast, ForecastSample, LocationQuery, Units, WeatherReport,
};
pub use normalize::{group_into_daily, normalize_current, normalize_forecast};
