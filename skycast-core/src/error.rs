use thiserror::Error;

/// Failure modes of the weather/geocoding backend.
///
/// `CityNotFound` is the only variant callers branch on: it gets a
/// specialized user-facing message and, on the forecast view, a timed
/// return to the search entry point. Everything else is reported as-is.
#[derive(Debug, Error)]
pub enum BackendError {
    #[error("city not found: {0}")]
    CityNotFound(String),

    #[error("{context}")]
    Transport {
        context: &'static str,
        #[source]
        source: reqwest::Error,
    },

    #[error("{context} failed with status {status}: {body}")]
    Status {
        context: &'static str,
        status: u16,
        body: String,
    },

    #[error("{context}")]
    Decode {
        context: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

impl BackendError {
    pub fn is_city_not_found(&self) -> bool {
        matches!(self, BackendError::CityNotFound(_))
    }
}
