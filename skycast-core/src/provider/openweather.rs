use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::{NaiveDate, NaiveDateTime, Timelike};
use reqwest::Client;
use serde::Deserialize;

use crate::error::BackendError;
use crate::model::{CitySuggestion, DailyForecastEntry, HourlyForecastEntry, WeatherSnapshot};

use super::WeatherBackend;

const GEO_URL: &str = "https://api.openweathermap.org/geo/1.0/direct";
const WEATHER_URL: &str = "https://api.openweathermap.org/data/2.5/weather";
const FORECAST_URL: &str = "https://api.openweathermap.org/data/2.5/forecast";

/// Hours a day's series is resampled to; the next day's midnight sample
/// completes the 24-hour cycle.
const TARGET_HOURS: [u32; 6] = [0, 4, 8, 12, 16, 20];

const MAX_SUGGESTIONS: usize = 5;
const GEO_LOOKUP_LIMIT: usize = 10;
const MAX_FORECAST_DAYS: usize = 7;

/// Maximum 3-hourly entries the forecast endpoint yields (5 days).
const FORECAST_COUNT: &str = "40";

#[derive(Debug, Clone)]
pub struct OpenWeatherBackend {
    api_key: String,
    http: Client,
}

impl OpenWeatherBackend {
    pub fn new(api_key: String) -> Self {
        Self {
            api_key,
            http: Client::new(),
        }
    }

    async fn get_body(
        &self,
        url: &str,
        params: &[(&str, &str)],
        context: &'static str,
        city: &str,
    ) -> Result<String, BackendError> {
        let res = self
            .http
            .get(url)
            .query(params)
            .send()
            .await
            .map_err(|source| BackendError::Transport { context, source })?;

        let status = res.status();
        let body = res
            .text()
            .await
            .map_err(|source| BackendError::Transport { context, source })?;

        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(BackendError::CityNotFound(city.to_string()));
        }
        if !status.is_success() {
            return Err(BackendError::Status {
                context,
                status: status.as_u16(),
                body: truncate_body(&body),
            });
        }

        Ok(body)
    }

    async fn fetch_forecast(&self, city: &str) -> Result<OwForecastResponse, BackendError> {
        let body = self
            .get_body(
                FORECAST_URL,
                &[
                    ("q", city),
                    ("appid", self.api_key.as_str()),
                    ("units", "metric"),
                    ("cnt", FORECAST_COUNT),
                ],
                "OpenWeather forecast request",
                city,
            )
            .await?;

        serde_json::from_str(&body).map_err(|source| BackendError::Decode {
            context: "OpenWeather forecast JSON",
            source,
        })
    }
}

#[derive(Debug, Deserialize)]
struct OwMain {
    temp: f64,
    humidity: u8,
}

#[derive(Debug, Deserialize)]
struct OwWeather {
    description: String,
    icon: String,
}

#[derive(Debug, Deserialize)]
struct OwWind {
    speed: f64,
}

#[derive(Debug, Deserialize)]
struct OwCurrentResponse {
    name: String,
    main: OwMain,
    weather: Vec<OwWeather>,
    wind: OwWind,
}

#[derive(Debug, Deserialize)]
struct OwForecastEntry {
    dt_txt: String,
    main: OwMain,
    weather: Vec<OwWeather>,
    wind: OwWind,
}

#[derive(Debug, Deserialize)]
struct OwForecastResponse {
    list: Vec<OwForecastEntry>,
}

#[derive(Debug, Deserialize)]
struct OwGeoEntry {
    name: String,
    lat: f64,
    lon: f64,
    country: Option<String>,
    state: Option<String>,
}

#[async_trait]
impl WeatherBackend for OpenWeatherBackend {
    async fn suggest_cities(&self, query: &str) -> Result<Vec<CitySuggestion>, BackendError> {
        let query = query.trim();
        if query.chars().count() < crate::search::MIN_QUERY_LEN {
            return Ok(Vec::new());
        }

        let limit = GEO_LOOKUP_LIMIT.to_string();
        let body = self
            .get_body(
                GEO_URL,
                &[("q", query), ("limit", limit.as_str()), ("appid", self.api_key.as_str())],
                "OpenWeather geocoding request",
                query,
            )
            .await?;

        let parsed: Vec<OwGeoEntry> = serde_json::from_str(&body).map_err(|source| {
            BackendError::Decode {
                context: "OpenWeather geocoding JSON",
                source,
            }
        })?;

        Ok(parsed
            .iter()
            .map(|entry| CitySuggestion {
                name: suggestion_name(entry),
                lat: entry.lat,
                lon: entry.lon,
            })
            .take(MAX_SUGGESTIONS)
            .collect())
    }

    async fn current_weather(&self, city: &str) -> Result<WeatherSnapshot, BackendError> {
        let body = self
            .get_body(
                WEATHER_URL,
                &[("q", city), ("appid", self.api_key.as_str()), ("units", "metric")],
                "OpenWeather current weather request",
                city,
            )
            .await?;

        let parsed: OwCurrentResponse = serde_json::from_str(&body).map_err(|source| {
            BackendError::Decode {
                context: "OpenWeather current weather JSON",
                source,
            }
        })?;

        let (description, icon) = primary_condition(&parsed.weather);

        Ok(WeatherSnapshot {
            city: parsed.name,
            temperature_c: parsed.main.temp,
            humidity_pct: parsed.main.humidity,
            wind_speed_mps: parsed.wind.speed,
            description,
            icon,
        })
    }

    async fn daily_forecast(&self, city: &str) -> Result<Vec<DailyForecastEntry>, BackendError> {
        let parsed = self.fetch_forecast(city).await?;
        Ok(daily_entries(&parsed.list))
    }

    async fn hourly_forecast(
        &self,
        city: &str,
        date: NaiveDate,
    ) -> Result<Vec<HourlyForecastEntry>, BackendError> {
        let parsed = self.fetch_forecast(city).await?;
        Ok(hourly_entries(&parsed.list, date))
    }
}

/// The forecast endpoint timestamps entries as "2025-06-10 15:00:00".
fn parse_dt_txt(s: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").ok()
}

fn primary_condition(weather: &[OwWeather]) -> (String, String) {
    weather
        .first()
        .map(|w| (w.description.clone(), w.icon.clone()))
        .unwrap_or_else(|| ("Unknown".to_string(), String::new()))
}

/// Display name for a geocoding hit: city name plus region/country when
/// known, so same-named cities stay distinguishable in the dropdown.
fn suggestion_name(entry: &OwGeoEntry) -> String {
    let mut name = entry.name.clone();
    for part in [entry.state.as_deref(), entry.country.as_deref()] {
        if let Some(part) = part.filter(|p| !p.is_empty()) {
            name.push_str(", ");
            name.push_str(part);
        }
    }
    name
}

/// Collapse the 3-hourly forecast list into one entry per calendar day.
///
/// The noon sample stands in for the whole day when one exists (the first
/// sample of the day otherwise), matching how the daily list presents
/// "the" weather of a day. Ascending by date, capped at seven days.
fn daily_entries(list: &[OwForecastEntry]) -> Vec<DailyForecastEntry> {
    let mut by_day: BTreeMap<NaiveDate, DailyForecastEntry> = BTreeMap::new();

    for item in list {
        let Some(time) = parse_dt_txt(&item.dt_txt) else {
            continue;
        };
        let date = time.date();
        if !by_day.contains_key(&date) || time.hour() == 12 {
            by_day.insert(date, to_daily(date, item));
        }
    }

    by_day.into_values().take(MAX_FORECAST_DAYS).collect()
}

/// Resample one day's 3-hourly entries to the chart's target hours, then
/// close the series with the next day's midnight (the rollover sample).
///
/// A date outside the forecast range yields an empty series; the caller
/// renders it as "no data".
fn hourly_entries(list: &[OwForecastEntry], date: NaiveDate) -> Vec<HourlyForecastEntry> {
    let timestamped: Vec<(NaiveDateTime, &OwForecastEntry)> = list
        .iter()
        .filter_map(|item| parse_dt_txt(&item.dt_txt).map(|time| (time, item)))
        .collect();

    let day: Vec<(NaiveDateTime, &OwForecastEntry)> = timestamped
        .iter()
        .copied()
        .filter(|(time, _)| time.date() == date)
        .collect();
    if day.is_empty() {
        return Vec::new();
    }

    let mut out = Vec::new();
    for hour in TARGET_HOURS {
        let Some(target) = date.and_hms_opt(hour, 0, 0) else {
            continue;
        };
        let nearest = day
            .iter()
            .copied()
            .min_by_key(|(time, _)| (*time - target).num_seconds().abs());
        if let Some((_, item)) = nearest {
            out.push(to_hourly(target, item));
        }
    }

    if let Some(next_day) = date.succ_opt() {
        let rollover = timestamped
            .iter()
            .copied()
            .filter(|(time, _)| time.date() == next_day)
            .min_by_key(|(time, _)| *time);
        if let Some((_, item)) = rollover
            && let Some(midnight) = next_day.and_hms_opt(0, 0, 0)
        {
            out.push(to_hourly(midnight, item));
        }
    }

    out
}

fn to_daily(date: NaiveDate, item: &OwForecastEntry) -> DailyForecastEntry {
    let (description, icon) = primary_condition(&item.weather);
    DailyForecastEntry {
        date,
        temperature_c: item.main.temp,
        humidity_pct: item.main.humidity,
        wind_speed_mps: item.wind.speed,
        description,
        icon,
    }
}

fn to_hourly(time: NaiveDateTime, item: &OwForecastEntry) -> HourlyForecastEntry {
    let (description, icon) = primary_condition(&item.weather);
    HourlyForecastEntry {
        time,
        temperature_c: item.main.temp,
        humidity_pct: item.main.humidity,
        wind_speed_mps: item.wind.speed,
        description,
        icon,
    }
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    if body.len() > MAX {
        format!("{}...", &body[..MAX])
    } else {
        body.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(dt_txt: &str, temp: f64, description: &str, icon: &str) -> OwForecastEntry {
        OwForecastEntry {
            dt_txt: dt_txt.to_string(),
            main: OwMain { temp, humidity: 60 },
            weather: vec![OwWeather {
                description: description.to_string(),
                icon: icon.to_string(),
            }],
            wind: OwWind { speed: 3.5 },
        }
    }

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, d).expect("valid date")
    }

    #[test]
    fn daily_prefers_the_noon_sample() {
        let list = vec![
            entry("2025-06-10 00:00:00", 9.0, "clear sky", "01n"),
            entry("2025-06-10 12:00:00", 21.0, "few clouds", "02d"),
            entry("2025-06-10 18:00:00", 17.0, "clear sky", "01d"),
            entry("2025-06-11 03:00:00", 8.0, "light rain", "10n"),
        ];

        let days = daily_entries(&list);
        assert_eq!(days.len(), 2);
        assert_eq!(days[0].date, day(10));
        assert_eq!(days[0].temperature_c, 21.0);
        assert_eq!(days[0].icon, "02d");
        // No noon sample for the 11th: its first sample stands in.
        assert_eq!(days[1].temperature_c, 8.0);
    }

    #[test]
    fn daily_is_ascending_and_capped_at_seven() {
        let list: Vec<OwForecastEntry> = (1..=9)
            .map(|d| entry(&format!("2025-06-{d:02} 12:00:00"), 15.0, "clear sky", "01d"))
            .collect();

        let days = daily_entries(&list);
        assert_eq!(days.len(), 7);
        for pair in days.windows(2) {
            assert!(pair[0].date < pair[1].date);
        }
    }

    #[test]
    fn daily_ignores_malformed_timestamps() {
        let list = vec![
            entry("not a timestamp", 5.0, "clear sky", "01d"),
            entry("2025-06-10 12:00:00", 21.0, "few clouds", "02d"),
        ];
        assert_eq!(daily_entries(&list).len(), 1);
    }

    #[test]
    fn hourly_resamples_to_target_hours_with_rollover() {
        let list = vec![
            entry("2025-06-10 02:00:00", 9.0, "clear sky", "01n"),
            entry("2025-06-10 08:00:00", 14.0, "clear sky", "01d"),
            entry("2025-06-10 14:00:00", 21.0, "few clouds", "02d"),
            entry("2025-06-10 20:00:00", 16.0, "clear sky", "01n"),
            entry("2025-06-11 02:00:00", 10.0, "light rain", "10n"),
            entry("2025-06-11 08:00:00", 13.0, "light rain", "10d"),
        ];

        let hours = hourly_entries(&list, day(10));
        // Six target hours plus the rollover midnight.
        assert_eq!(hours.len(), 7);

        let times: Vec<NaiveDateTime> = hours.iter().map(|h| h.time).collect();
        for pair in times.windows(2) {
            assert!(pair[0] < pair[1]);
        }

        // Rollover sample carries the next day's earliest conditions,
        // timestamped at that day's midnight.
        let last = hours.last().expect("rollover present");
        assert_eq!(last.time, day(11).and_hms_opt(0, 0, 0).expect("valid time"));
        assert_eq!(last.temperature_c, 10.0);

        // The 8-o'clock target picks the exact 08:00 sample.
        assert_eq!(hours[2].time, day(10).and_hms_opt(8, 0, 0).expect("valid time"));
        assert_eq!(hours[2].temperature_c, 14.0);
    }

    #[test]
    fn hourly_without_next_day_data_omits_the_rollover() {
        let list = vec![
            entry("2025-06-10 08:00:00", 14.0, "clear sky", "01d"),
            entry("2025-06-10 14:00:00", 21.0, "few clouds", "02d"),
        ];

        let hours = hourly_entries(&list, day(10));
        assert_eq!(hours.len(), TARGET_HOURS.len());
        assert!(hours.iter().all(|h| h.time.date() == day(10)));
    }

    #[test]
    fn hourly_for_a_date_out_of_range_is_empty() {
        let list = vec![entry("2025-06-10 08:00:00", 14.0, "clear sky", "01d")];
        assert!(hourly_entries(&list, day(25)).is_empty());
    }

    #[test]
    fn suggestion_names_are_disambiguated() {
        let full = OwGeoEntry {
            name: "Paris".to_string(),
            lat: 48.85,
            lon: 2.35,
            country: Some("FR".to_string()),
            state: Some("Ile-de-France".to_string()),
        };
        assert_eq!(suggestion_name(&full), "Paris, Ile-de-France, FR");

        let bare = OwGeoEntry {
            name: "Paris".to_string(),
            lat: 33.66,
            lon: -95.55,
            country: None,
            state: None,
        };
        assert_eq!(suggestion_name(&bare), "Paris");
    }

    #[test]
    fn current_weather_response_parses() {
        let body = r#"{
            "name": "London",
            "main": {"temp": 17.3, "humidity": 72},
            "weather": [{"description": "broken clouds", "icon": "04d"}],
            "wind": {"speed": 4.1}
        }"#;

        let parsed: OwCurrentResponse = serde_json::from_str(body).expect("valid payload");
        assert_eq!(parsed.name, "London");
        assert_eq!(parsed.main.humidity, 72);
        assert_eq!(primary_condition(&parsed.weather).1, "04d");
    }

    #[test]
    fn missing_condition_falls_back_to_unknown() {
        let (description, icon) = primary_condition(&[]);
        assert_eq!(description, "Unknown");
        assert!(icon.is_empty());
    }
}
