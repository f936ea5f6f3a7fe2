//! Core library for the `skycast` weather client.
//!
//! This crate defines:
//! - Shared domain models (suggestions, snapshots, forecast entries)
//! - The interaction core: search and forecast-selection controllers
//! - Chart scaling and hourly time labeling for the forecast view
//! - Abstraction over the weather/geocoding backend
//! - Configuration & credentials handling
//!
//! It is used by `skycast-tui`, but can also be reused by other frontends.

pub mod chart;
pub mod config;
pub mod error;
pub mod forecast;
pub mod icons;
pub mod model;
pub mod provider;
pub mod search;
pub mod timefmt;

pub use config::Config;
pub use error::BackendError;
pub use forecast::{ForecastSelectionController, HourlyLookup};
pub use model::{CitySuggestion, DailyForecastEntry, HourlyForecastEntry, WeatherSnapshot};
pub use provider::{WeatherBackend, openweather::OpenWeatherBackend};
pub use search::{DropdownView, SearchController, SuggestionLookup};
