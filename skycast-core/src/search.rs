//! City-search autocomplete state machine.

use crate::model::CitySuggestion;

/// Queries shorter than this never reach the network.
pub const MIN_QUERY_LEN: usize = 3;

/// A suggestion lookup the caller must run, tagged with the sequence
/// number that makes its response verifiable against later input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SuggestionLookup {
    pub seq: u64,
    pub query: String,
}

/// What the dropdown shows while it is open.
#[derive(Debug, PartialEq)]
pub enum DropdownView<'a> {
    /// A lookup is in flight.
    Loading,
    /// Candidate cities, in returned order.
    Suggestions(&'a [CitySuggestion]),
    /// The query was long enough but matched nothing.
    NoMatches,
    /// The query is too short to search.
    TypeMoreHint,
}

/// Interactive state of the city search field.
///
/// Owns the query text, suggestion list, highlight and dropdown
/// visibility; every mutation goes through the operations below.
///
/// Lookups are asynchronous: operations that need fresh suggestions
/// return a [`SuggestionLookup`] for the caller to run, and the outcome
/// comes back through [`suggestions_arrived`] or [`suggestions_failed`].
/// Each state change that invalidates pending lookups bumps an internal
/// sequence number, and a response is applied only if it carries the
/// latest one, so responses arriving out of order can never surface
/// suggestions for an older query.
///
/// [`suggestions_arrived`]: SearchController::suggestions_arrived
/// [`suggestions_failed`]: SearchController::suggestions_failed
#[derive(Debug, Default)]
pub struct SearchController {
    query: String,
    suggestions: Vec<CitySuggestion>,
    highlight: Option<usize>,
    open: bool,
    loading: bool,
    seq: u64,
}

impl SearchController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn suggestions(&self) -> &[CitySuggestion] {
        &self.suggestions
    }

    pub fn highlight(&self) -> Option<usize> {
        self.highlight
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// The user edited the query text.
    ///
    /// Opens the dropdown and clears the highlight. Returns a lookup to
    /// run when the query is long enough; otherwise the suggestion list
    /// is cleared immediately and no request is issued.
    pub fn input_changed(&mut self, text: &str) -> Option<SuggestionLookup> {
        self.query = text.to_string();
        self.open = true;
        self.highlight = None;
        self.seq += 1; // anything still in flight is stale now

        if self.query.chars().count() >= MIN_QUERY_LEN {
            self.loading = true;
            Some(SuggestionLookup { seq: self.seq, query: self.query.clone() })
        } else {
            self.suggestions.clear();
            self.loading = false;
            None
        }
    }

    /// The search field regained focus.
    ///
    /// Re-opens the dropdown and, when the query is long enough,
    /// re-triggers the same lookup as [`input_changed`](Self::input_changed)
    /// so the dropdown repopulates without retyping.
    pub fn focus_gained(&mut self) -> Option<SuggestionLookup> {
        self.open = true;
        if self.query.chars().count() >= MIN_QUERY_LEN {
            let query = self.query.clone();
            self.input_changed(&query)
        } else {
            None
        }
    }

    /// Move the highlight down, wrapping past the end to the first row.
    pub fn arrow_down(&mut self) {
        if !self.open || self.suggestions.is_empty() {
            return;
        }
        let last = self.suggestions.len() - 1;
        self.highlight = Some(match self.highlight {
            Some(i) if i < last => i + 1,
            _ => 0,
        });
    }

    /// Move the highlight up, wrapping past the start to the last row.
    pub fn arrow_up(&mut self) {
        if !self.open || self.suggestions.is_empty() {
            return;
        }
        let last = self.suggestions.len() - 1;
        self.highlight = Some(match self.highlight {
            Some(i) if i > 0 => i - 1,
            _ => last,
        });
    }

    /// Enter pressed: commit the highlighted suggestion, if any.
    ///
    /// Without a highlight this is a no-op: Enter never submits the raw
    /// typed text; that is [`submit`](Self::submit)'s job.
    pub fn commit_highlighted(&mut self) -> Option<String> {
        let index = self.highlight?;
        self.commit_suggestion(index)
    }

    /// A suggestion row was clicked.
    pub fn commit_suggestion(&mut self, index: usize) -> Option<String> {
        let name = self.suggestions.get(index)?.name.clone();
        Some(self.commit_city(name))
    }

    /// Explicit form submission: commit the raw query, independent of the
    /// suggestion state. No-op when the query is blank.
    pub fn submit(&mut self) -> Option<String> {
        if self.query.trim().is_empty() {
            return None;
        }
        let name = self.query.clone();
        Some(self.commit_city(name))
    }

    fn commit_city(&mut self, name: String) -> String {
        self.query = name.clone();
        self.suggestions.clear();
        self.open = false;
        self.highlight = None;
        self.loading = false;
        self.seq += 1; // a late response must not repopulate after commit
        name
    }

    /// An interaction happened outside the search region: close the
    /// dropdown without touching the query or committing anything.
    pub fn dismiss(&mut self) {
        self.open = false;
    }

    /// A suggestion lookup resolved. Stale responses (any sequence number
    /// but the latest issued) are discarded wholesale.
    pub fn suggestions_arrived(&mut self, seq: u64, suggestions: Vec<CitySuggestion>) {
        if seq != self.seq {
            tracing::debug!(seq, latest = self.seq, "discarding stale suggestion response");
            return;
        }
        self.suggestions = suggestions;
        self.loading = false;
    }

    /// A suggestion lookup failed. Suggestions are enhancement data, so
    /// this degrades to an empty list with no user-visible error.
    pub fn suggestions_failed(&mut self, seq: u64) {
        if seq != self.seq {
            return;
        }
        tracing::debug!(seq, "suggestion lookup failed, dropping results");
        self.suggestions.clear();
        self.loading = false;
    }

    /// Dropdown contents per the display policy, or `None` when hidden.
    pub fn dropdown(&self) -> Option<DropdownView<'_>> {
        if !self.open || self.query.is_empty() {
            return None;
        }
        Some(if self.loading {
            DropdownView::Loading
        } else if !self.suggestions.is_empty() {
            DropdownView::Suggestions(&self.suggestions)
        } else if self.query.chars().count() >= MIN_QUERY_LEN {
            DropdownView::NoMatches
        } else {
            DropdownView::TypeMoreHint
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn city(name: &str) -> CitySuggestion {
        CitySuggestion { name: name.to_string(), lat: 0.0, lon: 0.0 }
    }

    fn three_cities() -> Vec<CitySuggestion> {
        vec![city("Paris, FR"), city("Paris, Texas, US"), city("Parys, ZA")]
    }

    /// Drive the controller into an open dropdown with three suggestions.
    fn populated() -> SearchController {
        let mut search = SearchController::new();
        let lookup = search.input_changed("Par").expect("long enough to look up");
        search.suggestions_arrived(lookup.seq, three_cities());
        search
    }

    #[test]
    fn short_query_never_issues_a_lookup() {
        let mut search = SearchController::new();
        assert!(search.input_changed("P").is_none());
        assert!(search.input_changed("Pa").is_none());
        assert!(search.suggestions().is_empty());
        assert!(!search.is_loading());
    }

    #[test]
    fn three_character_query_issues_a_lookup() {
        let mut search = SearchController::new();
        let lookup = search.input_changed("Par").expect("lookup issued");
        assert_eq!(lookup.query, "Par");
        assert!(search.is_loading());
        assert!(search.is_open());
    }

    #[test]
    fn stale_response_is_discarded() {
        let mut search = SearchController::new();
        let first = search.input_changed("Lon").expect("lookup issued");
        let second = search.input_changed("Lond").expect("lookup issued");

        // The older response resolves after the newer one.
        search.suggestions_arrived(second.seq, vec![city("London, GB")]);
        search.suggestions_arrived(first.seq, vec![city("Long Beach, US")]);

        assert_eq!(search.suggestions().len(), 1);
        assert_eq!(search.suggestions()[0].name, "London, GB");
    }

    #[test]
    fn response_for_a_since_shortened_query_is_discarded() {
        let mut search = SearchController::new();
        let lookup = search.input_changed("Par").expect("lookup issued");
        search.input_changed("Pa"); // shortened below the threshold

        search.suggestions_arrived(lookup.seq, three_cities());
        assert!(search.suggestions().is_empty());
    }

    #[test]
    fn arrow_down_wraps_past_the_end() {
        let mut search = populated();
        assert_eq!(search.highlight(), None);

        search.arrow_down();
        assert_eq!(search.highlight(), Some(0));
        search.arrow_down();
        assert_eq!(search.highlight(), Some(1));
        search.arrow_down();
        assert_eq!(search.highlight(), Some(2));
        search.arrow_down();
        assert_eq!(search.highlight(), Some(0));
    }

    #[test]
    fn arrow_up_from_the_first_row_wraps_to_the_last() {
        let mut search = populated();
        search.arrow_down();
        assert_eq!(search.highlight(), Some(0));

        search.arrow_up();
        assert_eq!(search.highlight(), Some(2));
    }

    #[test]
    fn arrow_keys_are_noops_without_suggestions() {
        let mut search = SearchController::new();
        search.input_changed("Par");
        search.arrow_down();
        assert_eq!(search.highlight(), None);

        search.dismiss();
        search.arrow_up();
        assert_eq!(search.highlight(), None);
    }

    #[test]
    fn commit_resets_all_transient_state() {
        let mut search = populated();
        search.arrow_down();
        search.arrow_down();

        let committed = search.commit_highlighted().expect("row highlighted");
        assert_eq!(committed, "Paris, Texas, US");
        assert_eq!(search.query(), "Paris, Texas, US");
        assert!(search.suggestions().is_empty());
        assert!(!search.is_open());
        assert_eq!(search.highlight(), None);
    }

    #[test]
    fn enter_without_highlight_commits_nothing() {
        let mut search = populated();
        assert!(search.commit_highlighted().is_none());
        assert!(search.is_open());
        assert_eq!(search.suggestions().len(), 3);
    }

    #[test]
    fn response_arriving_after_commit_is_discarded() {
        let mut search = SearchController::new();
        let lookup = search.input_changed("Par").expect("lookup issued");
        search.suggestions_arrived(lookup.seq, three_cities());

        search.arrow_down();
        let slow = search.input_changed("Pari").expect("lookup issued");
        search.arrow_down();
        search.commit_highlighted();

        search.suggestions_arrived(slow.seq, vec![city("Paris, FR")]);
        assert!(search.suggestions().is_empty());
        assert!(!search.is_open());
    }

    #[test]
    fn submit_commits_the_raw_query() {
        let mut search = SearchController::new();
        search.input_changed("Lviv");
        assert_eq!(search.submit(), Some("Lviv".to_string()));
        assert!(!search.is_open());
    }

    #[test]
    fn submit_of_a_blank_query_is_a_noop() {
        let mut search = SearchController::new();
        search.input_changed("   ");
        assert!(search.submit().is_none());
    }

    #[test]
    fn focus_retriggers_the_lookup_for_a_committed_query() {
        let mut search = populated();
        search.arrow_down();
        search.commit_highlighted();

        let lookup = search.focus_gained().expect("query is long enough");
        assert_eq!(lookup.query, "Paris, FR");
        assert!(search.is_open());
    }

    #[test]
    fn focus_with_a_short_query_only_opens_the_dropdown() {
        let mut search = SearchController::new();
        search.input_changed("Pa");
        search.dismiss();

        assert!(search.focus_gained().is_none());
        assert!(search.is_open());
    }

    #[test]
    fn dismiss_keeps_the_query() {
        let mut search = populated();
        search.dismiss();
        assert!(!search.is_open());
        assert_eq!(search.query(), "Par");
    }

    #[test]
    fn failure_silently_clears_the_list() {
        let mut search = populated();
        let lookup = search.input_changed("Pari").expect("lookup issued");
        search.suggestions_failed(lookup.seq);

        assert!(search.suggestions().is_empty());
        assert!(!search.is_loading());
        assert!(search.is_open());
    }

    #[test]
    fn display_policy_follows_the_state() {
        let mut search = SearchController::new();
        assert_eq!(search.dropdown(), None);

        search.input_changed("Pa");
        assert_eq!(search.dropdown(), Some(DropdownView::TypeMoreHint));

        let lookup = search.input_changed("Par").expect("lookup issued");
        assert_eq!(search.dropdown(), Some(DropdownView::Loading));

        search.suggestions_arrived(lookup.seq, vec![]);
        assert_eq!(search.dropdown(), Some(DropdownView::NoMatches));

        let lookup = search.input_changed("Pari").expect("lookup issued");
        search.suggestions_arrived(lookup.seq, three_cities());
        assert!(matches!(search.dropdown(), Some(DropdownView::Suggestions(s)) if s.len() == 3));

        search.dismiss();
        assert_eq!(search.dropdown(), None);
    }
}
