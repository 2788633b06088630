use anyhow::Context;
use clap::{Parser, Subcommand};
use inquire::{Password, PasswordDisplayMode, Select, Text};

use skycast_core::{Config, LocationQuery, OpenWeatherClient, ThemeMode, Units};

use crate::render;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "skycast", version, about = "OpenWeatherMap client for the terminal")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store the API key and display preferences interactively.
    Configure,

    /// Show current conditions and the 5-day outlook for a place.
    Show {
        /// City name; repeats the last searched place when omitted.
        place: Option<String>,

        /// Two-letter country code to disambiguate the search, e.g. "TH".
        #[arg(long)]
        country: Option<String>,

        /// Override the configured unit system: "metric" or "imperial".
        #[arg(long)]
        units: Option<String>,
    },
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command {
            Command::Configure => configure(),
            Command::Show {
                place,
                country,
                units,
            } => show(place, country, units).await,
        }
    }
}

fn configure() -> anyhow::Result<()> {
    let mut config = Config::load()?;

    let key_prompt = if config.api_key.is_some() {
        "OpenWeatherMap API key (leave blank to keep the current one):"
    } else {
        "OpenWeatherMap API key:"
    };
    let api_key = Password::new(key_prompt)
        .with_display_mode(PasswordDisplayMode::Masked)
        .without_confirmation()
        .prompt()
        .context("Failed to read API key")?;
    if !api_key.trim().is_empty() {
        config.api_key = Some(api_key.trim().to_string());
    }

    let units = Select::new("Units:", vec!["metric", "imperial"])
        .prompt()
        .context("Failed to read unit selection")?;
    config.units = Units::try_from(units)?;

    let language = Text::new("Display language code (e.g. en, th):")
        .with_default(&config.language)
        .prompt()
        .context("Failed to read language")?;
    config.language = language.trim().to_string();

    let theme = Select::new(
        "Theme:",
        vec!["light", "dark", "auto by temperature"],
    )
    .prompt()
    .context("Failed to read theme selection")?;
    config.theme = match theme {
        "dark" => ThemeMode::Dark,
        "auto by temperature" => ThemeMode::AutoTemp,
        _ => ThemeMode::Light,
    };

    config.save()?;
    println!(
        "Saved settings to {}",
        Config::config_file_path()?.display()
    );

    Ok(())
}

async fn show(
    place: Option<String>,
    country: Option<String>,
    units: Option<String>,
) -> anyhow::Result<()> {
    let mut config = Config::load()?;

    let units = match units.as_deref() {
        Some(value) => Units::try_from(value)?,
        None => config.units,
    };

    let place = match place.or_else(|| config.last_location.clone()) {
        Some(place) => place,
        None => anyhow::bail!(
            "No place given and no previous search to repeat. Try `skycast show <city>`."
        ),
    };

    let mut location = LocationQuery::new(place)?;
    if let Some(country) = country {
        location = location.with_country(country);
    }

    let client = OpenWeatherClient::new(config.resolve_api_key()?, units, config.language.clone())?;
    let report = client.report(&location).await?;

    config.remember_location(location.place());
    config.save()?;

    render::print_report(&report, units, config.theme);

    Ok(())
}
