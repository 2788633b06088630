//! Color palettes for terminal output.
//!
//! `auto_temp` mirrors the settings dialog description: a warm palette for
//! hot weather, a cool one for cold, the light palette in between.

use crossterm::style::Color;
use skycast_core::{ThemeMode, Units};

/// Thresholds are in degrees Celsius; imperial readings are converted
/// before the comparison.
const HOT_THRESHOLD_C: f64 = 28.0;
const COLD_THRESHOLD_C: f64 = 15.0;

#[derive(Debug, Clone, Copy)]
pub struct Palette {
    /// Headings and condition text.
    pub primary: Color,
    /// The temperature itself.
    pub accent: Color,
    /// Timestamps and secondary detail.
    pub dim: Color,
}

const LIGHT: Palette = Palette {
    primary: Color::Rgb { r: 0x00, g: 0x7A, b: 0xFF },
    accent: Color::Rgb { r: 0xFF, g: 0x95, b: 0x00 },
    dim: Color::Grey,
};

const DARK: Palette = Palette {
    primary: Color::Rgb { r: 0x0A, g: 0x84, b: 0xFF },
    accent: Color::Rgb { r: 0xFF, g: 0x9F, b: 0x0A },
    dim: Color::DarkGrey,
};

const HOT: Palette = Palette {
    primary: Color::Rgb { r: 0xFF, g: 0x70, b: 0x43 },
    accent: Color::Rgb { r: 0xDD, g: 0x2C, b: 0x00 },
    dim: Color::Grey,
};

const COLD: Palette = Palette {
    primary: Color::Rgb { r: 0x21, g: 0x96, b: 0xF3 },
    accent: Color::Rgb { r: 0x0D, g: 0x47, b: 0xA1 },
    dim: Color::Grey,
};

pub fn palette(mode: ThemeMode, temperature: f64, units: Units) -> Palette {
    match mode {
        ThemeMode::Light => LIGHT,
        ThemeMode::Dark => DARK,
        ThemeMode::AutoTemp => {
            let celsius = match units {
                Units::Metric => temperature,
                Units::Imperial => (temperature - 32.0) * 5.0 / 9.0,
            };

            if celsius >= HOT_THRESHOLD_C {
                HOT
            } else if celsius <= COLD_THRESHOLD_C {
                COLD
            } else {
                LIGHT
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn primary_of(mode: ThemeMode, temperature: f64, units: Units) -> Color {
        palette(mode, temperature, units).primary
    }

    #[test]
    fn fixed_modes_ignore_temperature() {
        assert_eq!(
            primary_of(ThemeMode::Light, 40.0, Units::Metric),
            LIGHT.primary
        );
        assert_eq!(
            primary_of(ThemeMode::Dark, -10.0, Units::Metric),
            DARK.primary
        );
    }

    #[test]
    fn auto_mode_picks_palette_by_temperature() {
        assert_eq!(
            primary_of(ThemeMode::AutoTemp, 32.0, Units::Metric),
            HOT.primary
        );
        assert_eq!(
            primary_of(ThemeMode::AutoTemp, 10.0, Units::Metric),
            COLD.primary
        );
        assert_eq!(
            primary_of(ThemeMode::AutoTemp, 22.0, Units::Metric),
            LIGHT.primary
        );
    }

    #[test]
    fn auto_mode_converts_fahrenheit_first() {
        // 95 F is 35 C: hot, even though 95 > any Celsius threshold.
        assert_eq!(
            primary_of(ThemeMode::AutoTemp, 95.0, Units::Imperial),
            HOT.primary
        );
        // 50 F is 10 C: cold.
        assert_eq!(
            primary_of(ThemeMode::AutoTemp, 50.0, Units::Imperial),
            COLD.primary
        );
    }
}
