use std::fmt::Debug;

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::error::BackendError;
use crate::model::{CitySuggestion, DailyForecastEntry, HourlyForecastEntry, WeatherSnapshot};

pub mod openweather;

/// Remote weather/geocoding collaborator.
///
/// Suggestion and hourly lookups are enhancement data: callers degrade
/// silently to empty results when they fail. Current weather and the
/// daily forecast are primary: their errors surface to the user, with
/// [`BackendError::CityNotFound`] getting a specialized message.
#[async_trait]
pub trait WeatherBackend: Send + Sync + Debug {
    /// Ordered list of candidate cities for a query of at least three
    /// characters; shorter queries yield an empty list.
    async fn suggest_cities(&self, query: &str) -> Result<Vec<CitySuggestion>, BackendError>;

    /// Current conditions for a city.
    async fn current_weather(&self, city: &str) -> Result<WeatherSnapshot, BackendError>;

    /// Daily forecast, ascending by date, up to seven days.
    async fn daily_forecast(&self, city: &str) -> Result<Vec<DailyForecastEntry>, BackendError>;

    /// Hourly series for one day, ascending by time, closed by the next
    /// day's midnight sample when one is available. Empty when the date
    /// is outside the backend's forecast range.
    async fn hourly_forecast(
        &self,
        city: &str,
        date: NaiveDate,
    ) -> Result<Vec<HourlyForecastEntry>, BackendError>;
}
