//! WMO weather codes as reported by Open-Meteo, with their descriptions and icons.
//!
//! See: https://open-meteo.com/en/docs#weathervariables

use std::{collections::HashMap, sync::LazyLock};

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Icon {
    Unknown,
    Cloudy,
    Dust,
    Fog,
    Hail,
    Hurricane,
    Lightning,
    LightningRainy,
    Night,
    NightPartlyCloudy,
    PartlyCloudy,
    PartlyRainy,
    PartlySnowy,
    PartlySnowyRainy,
    PartlyLightning,
    Pouring,
    Rainy,
    Snowy,
    SnowyHeavy,
    SnowyRainy,
    Sunny,
    Windy,
}

impl Icon {
    /// Short glyph for terminal output.
    pub fn glyph(&self) -> &'static str {
        match self {
            Icon::Unknown => "?",
            Icon::Cloudy => "☁",
            Icon::Dust => "≋",
            Icon::Fog => "🌫",
            Icon::Hail => "🌨",
            Icon::Hurricane => "🌀",
            Icon::Lightning => "🌩",
            Icon::LightningRainy => "⛈",
            Icon::Night => "☾",
            Icon::NightPartlyCloudy => "☁☾",
            Icon::PartlyCloudy => "⛅",
            Icon::PartlyRainy => "🌦",
            Icon::PartlySnowy => "🌨",
            Icon::PartlySnowyRainy => "🌨",
            Icon::PartlyLightning => "🌩",
            Icon::Pouring => "🌧",
            Icon::Rainy => "🌧",
            Icon::Snowy => "❄",
            Icon::SnowyHeavy => "❄❄",
            Icon::SnowyRainy => "🌨",
            Icon::Sunny => "☀",
            Icon::Windy => "🌬",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct WeatherCodeMapping {
    pub description: &'static str,
    pub icon: Icon,
    /// Alternate used at night, when defined.
    pub icon_night: Option<Icon>,
}

/// Returned for any code missing from the table.
pub const UNKNOWN: WeatherCodeMapping = WeatherCodeMapping {
    description: "unknown",
    icon: Icon::Unknown,
    icon_night: None,
};

const fn entry(description: &'static str, icon: Icon, icon_night: Option<Icon>) -> WeatherCodeMapping {
    WeatherCodeMapping { description, icon, icon_night }
}

static MAPPINGS: LazyLock<HashMap<i32, WeatherCodeMapping>> = LazyLock::new(|| {
    use Icon::*;

    HashMap::from([
        (0, entry("clear sky", Sunny, Some(Night))),
        (1, entry("mainly clear", Sunny, Some(Night))),
        (2, entry("partly cloudy", PartlyCloudy, Some(NightPartlyCloudy))),
        (3, entry("overcast", Cloudy, None)),
        (45, entry("fog", Fog, None)),
        (48, entry("depositing rime fog", Fog, None)),
        (51, entry("light drizzle", Rainy, Some(Rainy))),
        (52, entry("moderate drizzle", Rainy, None)),
        (53, entry("dense drizzle", Rainy, None)),
        (56, entry("light freezing drizzle", SnowyRainy, None)),
        (57, entry("dense freezing drizzle", SnowyRainy, None)),
        (61, entry("slight rain", Rainy, None)),
        (63, entry("moderate rain", Pouring, None)),
        (65, entry("heavy rain", Pouring, None)),
        (66, entry("light freezing rain", SnowyRainy, Some(Rainy))),
        (67, entry("heavy freezing rain", Pouring, None)),
        (71, entry("slight snow fall", Snowy, Some(Snowy))),
        (73, entry("moderate snow fall", Snowy, None)),
        (75, entry("heavy snow fall", SnowyHeavy, None)),
        (77, entry("snow grains", Snowy, None)),
        (80, entry("slight rain showers", Rainy, None)),
        (81, entry("moderate rain showers", Rainy, None)),
        (83, entry("violent rain showers", Pouring, None)),
        (85, entry("slight snow showers", Snowy, None)),
        (86, entry("heavy snow showers", SnowyHeavy, None)),
        (95, entry("thunderstorms", Lightning, None)),
        (96, entry("thunderstorms with slight hail", LightningRainy, None)),
        (99, entry("thunderstorms with heavy hail", Hail, None)),
    ])
});

/// Mapping for `code`, or [`UNKNOWN`] when the code is not in the table.
pub fn lookup(code: i32) -> &'static WeatherCodeMapping {
    match MAPPINGS.get(&code) {
        Some(m) => m,
        None => {
            tracing::warn!(code, "unmapped weather code");
            &UNKNOWN
        }
    }
}

pub fn is_known(code: i32) -> bool {
    MAPPINGS.contains_key(&code)
}

pub fn icon_for(code: i32, is_day: bool) -> Icon {
    let m = lookup(code);
    match (is_day, m.icon_night) {
        (false, Some(night)) => night,
        _ => m.icon,
    }
}

/// Description with every word capitalised, e.g. "Partly Cloudy".
pub fn title_description(code: i32) -> String {
    lookup(code)
        .description
        .split(' ')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
