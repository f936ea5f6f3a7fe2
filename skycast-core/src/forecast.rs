//! Selection state for the hourly-forecast modal.

use chrono::NaiveDate;

use crate::model::HourlyForecastEntry;

/// An hourly-forecast lookup the caller must run. Carries the sequence
/// number and target date so the response can be applied as a pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HourlyLookup {
    pub seq: u64,
    pub date: NaiveDate,
}

/// Which forecast day is expanded, plus its hourly samples.
///
/// `open_date` and `samples` always correspond: a response updates both or
/// neither, so a render never observes one day's date paired with another
/// day's samples. Lookups are sequence-guarded the same way as the search
/// suggestions: under rapid day switching only the response for the most
/// recently selected day is applied.
#[derive(Debug, Default)]
pub struct ForecastSelectionController {
    open_date: Option<NaiveDate>,
    samples: Vec<HourlyForecastEntry>,
    seq: u64,
}

impl ForecastSelectionController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn open_date(&self) -> Option<NaiveDate> {
        self.open_date
    }

    pub fn samples(&self) -> &[HourlyForecastEntry] {
        &self.samples
    }

    /// The modal is open once a day has been selected, even when the
    /// fetch came back empty, which renders as "no data".
    pub fn is_open(&self) -> bool {
        self.open_date.is_some()
    }

    /// A forecast day was clicked.
    ///
    /// Re-selecting the day that is already open is a no-op (the data is
    /// not re-fetched). Otherwise returns the lookup to run; the day
    /// opens when its response arrives.
    pub fn select_day(&mut self, date: NaiveDate) -> Option<HourlyLookup> {
        if self.open_date == Some(date) {
            return None;
        }
        self.seq += 1;
        Some(HourlyLookup { seq: self.seq, date })
    }

    /// An hourly lookup resolved. Stale responses are discarded; the
    /// latest one sets the open date and samples together.
    pub fn hourly_arrived(&mut self, lookup: HourlyLookup, samples: Vec<HourlyForecastEntry>) {
        if lookup.seq != self.seq {
            tracing::debug!(
                seq = lookup.seq,
                latest = self.seq,
                "discarding stale hourly response"
            );
            return;
        }
        self.open_date = Some(lookup.date);
        self.samples = samples;
    }

    /// An hourly lookup failed. The failed date stays open with an empty
    /// sample set, which callers treat as "no data"; there is no
    /// user-visible error for hourly fetches.
    pub fn hourly_failed(&mut self, lookup: HourlyLookup) {
        if lookup.seq != self.seq {
            return;
        }
        tracing::debug!(date = %lookup.date, "hourly forecast fetch failed, showing no data");
        self.open_date = Some(lookup.date);
        self.samples.clear();
    }

    /// Close the modal.
    pub fn close(&mut self) {
        self.open_date = None;
        self.samples.clear();
        self.seq += 1; // a late response must not reopen the modal
    }
}
