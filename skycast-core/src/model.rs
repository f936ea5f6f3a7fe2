use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// A candidate city returned by the suggestion lookup.
///
/// `name` is the disambiguated display string, e.g. "Paris, Ile-de-France, FR".
/// Suggestions are produced fresh per query and never mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CitySuggestion {
    pub name: String,
    pub lat: f64,
    pub lon: f64,
}

/// Current conditions for one city.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeatherSnapshot {
    pub city: String,
    pub temperature_c: f64,
    pub humidity_pct: u8,
    pub wind_speed_mps: f64,
    pub description: String,
    pub icon: String,
}

/// One day of the daily forecast, ascending by date within the sequence.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DailyForecastEntry {
    pub date: NaiveDate,
    pub temperature_c: f64,
    pub humidity_pct: u8,
    pub wind_speed_mps: f64,
    pub description: String,
    pub icon: String,
}

/// One sample of a single day's hourly series, ascending by time.
///
/// The last sample of a day's series may be the next calendar day's
/// midnight (the rollover sample completing the 24-hour cycle).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HourlyForecastEntry {
    pub time: NaiveDateTime,
    pub temperature_c: f64,
    pub humidity_pct: u8,
    pub wind_speed_mps: f64,
    pub description: String,
    pub icon: String,
}
