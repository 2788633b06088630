//! Terminal rendering of a weather report as two cards: current
//! conditions and the 5-day outlook.

use chrono::{DateTime, FixedOffset, Utc};
use crossterm::style::Stylize;

use skycast_core::{CurrentWeather, DailySummary, ThemeMode, Units, WeatherReport};

use crate::theme;

pub fn print_report(report: &WeatherReport, units: Units, mode: ThemeMode) {
    let palette = theme::palette(mode, report.current.temperature, units);
    let current = &report.current;

    println!("{}", heading(current).bold().with(palette.primary));
    println!(
        "{}",
        format_instant(current.observed_at, current.utc_offset_secs, "%A, %d %B %Y %H:%M")
            .with(palette.dim)
    );
    println!();
    println!(
        "  {} {}  {}",
        icon_glyph(&current.icon),
        format!("{:.1}{}", current.temperature, units.temperature_suffix())
            .bold()
            .with(palette.accent),
        current.description.clone().with(palette.primary)
    );
    println!();
    println!(
        "  Feels like: {:.1}{}   Humidity: {}%",
        current.feels_like,
        units.temperature_suffix(),
        current.humidity
    );
    println!(
        "  Wind: {} {} ({:.0}°)   Pressure: {:.0} hPa",
        current.wind_speed,
        units.wind_speed_suffix(),
        current.wind_direction_deg,
        current.pressure
    );
    println!(
        "  Visibility: {}   Clouds: {}%",
        visibility_text(current.visibility_km),
        current.cloud_cover_pct
    );
    if current.rain_mm > 0.0 {
        println!("  Rain (1h): {:.1} mm", current.rain_mm);
    }
    if current.snow_mm > 0.0 {
        println!("  Snow (1h): {:.1} mm", current.snow_mm);
    }
    println!(
        "  Sunrise: {}   Sunset: {}",
        format_instant(current.sunrise, current.utc_offset_secs, "%H:%M"),
        format_instant(current.sunset, current.utc_offset_secs, "%H:%M")
    );

    let summaries = report.forecast.daily_summaries();
    println!();
    println!("{}", "5-day forecast".bold().with(palette.primary));
    if summaries.is_empty() {
        println!("  {}", "unavailable".with(palette.dim));
        return;
    }
    for summary in summaries {
        println!("  {}", daily_row(&summary, units));
    }
}

fn heading(current: &CurrentWeather) -> String {
    if current.country.is_empty() {
        current.city.clone()
    } else {
        format!("{}, {}", current.city, current.country)
    }
}

/// Render an instant in the place's local time. Epoch instants are the
/// provider's "not reported" marker and render as `--`.
fn format_instant(instant: DateTime<Utc>, utc_offset_secs: i32, fmt: &str) -> String {
    if instant == DateTime::UNIX_EPOCH {
        return "--".to_string();
    }

    match FixedOffset::east_opt(utc_offset_secs) {
        Some(offset) => instant.with_timezone(&offset).format(fmt).to_string(),
        None => instant.format(fmt).to_string(),
    }
}

/// Absent visibility is "not reported", which is not the same as 0 km.
fn visibility_text(visibility_km: Option<f64>) -> String {
    match visibility_km {
        Some(km) => format!("{km:.1} km"),
        None => "n/a".to_string(),
    }
}

fn daily_row(summary: &DailySummary, units: Units) -> String {
    format!(
        "{}  {}  {:.0}{unit} / {:.0}{unit}  {}",
        summary.date.format("%a %d %b"),
        icon_glyph(&summary.icon),
        summary.temp_max,
        summary.temp_min,
        summary.description,
        unit = units.temperature_suffix()
    )
}

/// Rough glyph for an OpenWeatherMap icon code; the first two characters
/// carry the condition, the trailing d/n only day or night.
fn icon_glyph(icon: &str) -> &'static str {
    match icon.get(..2) {
        Some("01") => "☀",
        Some("02") => "⛅",
        Some("03") | Some("04") => "☁",
        Some("09") | Some("10") => "🌧",
        Some("11") => "⛈",
        Some("13") => "❄",
        Some("50") => "🌫",
        _ => "·",
    }
}
