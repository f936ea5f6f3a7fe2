//! Application state and event loop for the terminal client.

use std::io::Stdout;
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::Result;
use chrono::{DateTime, Local};
use crossterm::event::{
    DisableMouseCapture, EnableMouseCapture, Event, EventStream, KeyCode, KeyEvent, KeyEventKind,
    KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use futures::StreamExt;
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Position, Rect};
use skycast_core::{
    BackendError, CitySuggestion, DailyForecastEntry, ForecastSelectionController,
    HourlyForecastEntry, HourlyLookup, SearchController, SuggestionLookup, WeatherBackend,
    WeatherSnapshot,
};
use tokio::sync::mpsc;

use crate::ui;

/// How long the "couldn't find" notice stays up before the automatic
/// return to the search view.
const REDIRECT_DELAY: Duration = Duration::from_secs(3);

/// Result of a spawned backend call, delivered through the event loop.
#[derive(Debug)]
pub enum BackendEvent {
    Suggestions {
        lookup: SuggestionLookup,
        result: Result<Vec<CitySuggestion>, BackendError>,
    },
    ForecastLoaded {
        city: String,
        weather: WeatherSnapshot,
        days: Vec<DailyForecastEntry>,
    },
    ForecastFailed {
        city: String,
        error: BackendError,
    },
    Hourly {
        lookup: HourlyLookup,
        result: Result<Vec<HourlyForecastEntry>, BackendError>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Search,
    Forecast,
}

pub struct App {
    backend: Arc<dyn WeatherBackend>,
    tx: mpsc::UnboundedSender<BackendEvent>,

    pub route: Route,
    pub clock: DateTime<Local>,
    pub search: SearchController,
    pub selection: ForecastSelectionController,

    /// City the forecast view is showing; set on commit or submit.
    pub city: Option<String>,
    pub weather: Option<WeatherSnapshot>,
    pub days: Vec<DailyForecastEntry>,
    pub day_cursor: usize,
    pub loading_forecast: bool,

    pub error: Option<String>,
    pub redirecting: bool,
    redirect_at: Option<Instant>,

    // Regions from the last render, for mouse hit-testing.
    pub search_area: Option<Rect>,
    pub dropdown_area: Option<Rect>,
    pub day_list_area: Option<Rect>,
    pub modal_area: Option<Rect>,

    should_quit: bool,
}

impl App {
    fn new(backend: Arc<dyn WeatherBackend>, tx: mpsc::UnboundedSender<BackendEvent>) -> Self {
        Self {
            backend,
            tx,
            route: Route::Search,
            clock: Local::now(),
            search: SearchController::new(),
            selection: ForecastSelectionController::new(),
            city: None,
            weather: None,
            days: Vec::new(),
            day_cursor: 0,
            loading_forecast: false,
            error: None,
            redirecting: false,
            redirect_at: None,
            search_area: None,
            dropdown_area: None,
            day_list_area: None,
            modal_area: None,
            should_quit: false,
        }
    }

    /// Navigate to the forecast view for a committed city and start
    /// loading its data.
    fn open_city(&mut self, city: String) {
        tracing::info!(%city, "opening forecast view");
        self.route = Route::Forecast;
        self.weather = None;
        self.days.clear();
        self.day_cursor = 0;
        self.selection = ForecastSelectionController::new();
        self.error = None;
        self.redirecting = false;
        self.redirect_at = None;
        self.loading_forecast = true;
        self.city = Some(city.clone());
        self.spawn_forecast(city);
    }

    /// Return to a fresh search view, dropping all forecast state.
    fn back_to_search(&mut self) {
        self.route = Route::Search;
        self.search = SearchController::new();
        self.selection.close();
        self.city = None;
        self.weather = None;
        self.days.clear();
        self.day_cursor = 0;
        self.loading_forecast = false;
        self.error = None;
        self.redirecting = false;
        self.redirect_at = None;
    }

    fn spawn_suggestions(&self, lookup: SuggestionLookup) {
        let backend = Arc::clone(&self.backend);
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let result = backend.suggest_cities(&lookup.query).await;
            let _ = tx.send(BackendEvent::Suggestions { lookup, result });
        });
    }

    fn spawn_forecast(&self, city: String) {
        let backend = Arc::clone(&self.backend);
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let event = match backend.daily_forecast(&city).await {
                Ok(days) => match backend.current_weather(&city).await {
                    Ok(weather) => BackendEvent::ForecastLoaded { city, weather, days },
                    Err(error) => BackendEvent::ForecastFailed { city, error },
                },
                Err(error) => BackendEvent::ForecastFailed { city, error },
            };
            let _ = tx.send(event);
        });
    }

    fn spawn_hourly(&self, city: String, lookup: HourlyLookup) {
        let backend = Arc::clone(&self.backend);
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let result = backend.hourly_forecast(&city, lookup.date).await;
            let _ = tx.send(BackendEvent::Hourly { lookup, result });
        });
    }

    fn apply(&mut self, event: BackendEvent) {
        match event {
            BackendEvent::Suggestions { lookup, result } => match result {
                Ok(suggestions) => self.search.suggestions_arrived(lookup.seq, suggestions),
                Err(error) => {
                    tracing::warn!(%error, query = %lookup.query, "suggestion lookup failed");
                    self.search.suggestions_failed(lookup.seq);
                }
            },
            BackendEvent::ForecastLoaded { city, weather, days } => {
                if self.city.as_deref() != Some(city.as_str()) {
                    tracing::debug!(%city, "discarding forecast for a superseded city");
                    return;
                }
                self.loading_forecast = false;
                self.weather = Some(weather);
                self.days = days;
                self.day_cursor = 0;
            }
            BackendEvent::ForecastFailed { city, error } => {
                if self.city.as_deref() != Some(city.as_str()) {
                    return;
                }
                self.loading_forecast = false;
                if error.is_city_not_found() {
                    self.error =
                        Some(format!("We couldn't find \"{city}\". Please try another city."));
                    self.redirecting = true;
                    self.redirect_at = Some(Instant::now() + REDIRECT_DELAY);
                } else {
                    self.error = Some(format!("Error fetching forecast data: {error}"));
                }
            }
            BackendEvent::Hourly { lookup, result } => match result {
                Ok(samples) => self.selection.hourly_arrived(lookup, samples),
                Err(error) => {
                    tracing::warn!(%error, date = %lookup.date, "hourly forecast fetch failed");
                    self.selection.hourly_failed(lookup);
                }
            },
        }
    }

    fn on_tick(&mut self) {
        self.clock = Local::now();
        if let Some(at) = self.redirect_at
            && Instant::now() >= at
        {
            self.back_to_search();
        }
    }

    fn handle_key(&mut self, key: KeyEvent) {
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.should_quit = true;
            return;
        }
        match self.route {
            Route::Search => self.handle_search_key(key),
            Route::Forecast => self.handle_forecast_key(key),
        }
    }

    fn handle_search_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc => {
                if self.search.is_open() {
                    self.search.dismiss();
                } else {
                    self.should_quit = true;
                }
            }
            KeyCode::Down => self.search.arrow_down(),
            KeyCode::Up => self.search.arrow_up(),
            KeyCode::Enter => {
                if let Some(city) = self.search.commit_highlighted() {
                    self.open_city(city);
                } else if let Some(city) = self.search.submit() {
                    self.open_city(city);
                }
            }
            KeyCode::Backspace => {
                let mut query = self.search.query().to_string();
                query.pop();
                if let Some(lookup) = self.search.input_changed(&query) {
                    self.spawn_suggestions(lookup);
                }
            }
            KeyCode::Char(c) if key.modifiers.is_empty() || key.modifiers == KeyModifiers::SHIFT => {
                let mut query = self.search.query().to_string();
                query.push(c);
                if let Some(lookup) = self.search.input_changed(&query) {
                    self.spawn_suggestions(lookup);
                }
            }
            _ => {}
        }
    }

    fn handle_forecast_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Esc => {
                if self.selection.is_open() {
                    self.selection.close();
                } else {
                    self.back_to_search();
                }
            }
            KeyCode::Char('b') if !self.selection.is_open() => self.back_to_search(),
            KeyCode::Down => {
                if !self.days.is_empty() {
                    self.day_cursor = (self.day_cursor + 1).min(self.days.len() - 1);
                }
            }
            KeyCode::Up => {
                self.day_cursor = self.day_cursor.saturating_sub(1);
            }
            KeyCode::Enter => {
                if let Some(date) = self.days.get(self.day_cursor).map(|day| day.date) {
                    self.select_day_row(date);
                }
            }
            _ => {}
        }
    }

    fn select_day_row(&mut self, date: chrono::NaiveDate) {
        if let (Some(city), Some(lookup)) = (self.city.clone(), self.selection.select_day(date)) {
            self.spawn_hourly(city, lookup);
        }
    }

    fn handle_mouse(&mut self, mouse: MouseEvent) {
        let MouseEventKind::Down(MouseButton::Left) = mouse.kind else {
            return;
        };
        let position = Position::new(mouse.column, mouse.row);
        match self.route {
            Route::Search => self.handle_search_click(position),
            Route::Forecast => self.handle_forecast_click(position),
        }
    }

    fn handle_search_click(&mut self, position: Position) {
        if let Some(area) = self.dropdown_area
            && area.contains(position)
        {
            let index = (position.y - area.y) as usize;
            if let Some(city) = self.search.commit_suggestion(index) {
                self.open_city(city);
            }
            return;
        }
        if let Some(area) = self.search_area
            && area.contains(position)
        {
            // Clicking back into the field re-opens the dropdown.
            if let Some(lookup) = self.search.focus_gained() {
                self.spawn_suggestions(lookup);
            }
            return;
        }
        // Anywhere else counts as an outside interaction.
        self.search.dismiss();
    }

    fn handle_forecast_click(&mut self, position: Position) {
        if self.selection.is_open() {
            if let Some(area) = self.modal_area
                && !area.contains(position)
            {
                self.selection.close();
            }
            return;
        }
        if let Some(area) = self.day_list_area
            && area.contains(position)
        {
            let index = (position.y - area.y) as usize;
            if let Some(date) = self.days.get(index).map(|day| day.date) {
                self.day_cursor = index;
                self.select_day_row(date);
            }
        }
    }
}

/// Restores the terminal on drop, so a panic or early return cannot leave
/// raw mode, the alternate screen, or mouse capture behind.
struct TerminalGuard;

impl TerminalGuard {
    fn enter() -> Result<Self> {
        enable_raw_mode()?;
        crossterm::execute!(std::io::stdout(), EnterAlternateScreen, EnableMouseCapture)?;
        Ok(Self)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = crossterm::execute!(std::io::stdout(), DisableMouseCapture, LeaveAlternateScreen);
        let _ = disable_raw_mode();
    }
}

pub async fn run(backend: Arc<dyn WeatherBackend>, city: Option<String>) -> Result<()> {
    let _guard = TerminalGuard::enter()?;
    let mut terminal: Terminal<CrosstermBackend<Stdout>> =
        Terminal::new(CrosstermBackend::new(std::io::stdout()))?;

    let (tx, mut rx) = mpsc::unbounded_channel();
    let mut app = App::new(backend, tx);
    if let Some(city) = city {
        app.open_city(city);
    }

    let mut events = EventStream::new();
    // Wall-clock refresh; dropped with the loop on teardown.
    let mut tick = tokio::time::interval(Duration::from_secs(1));

    while !app.should_quit {
        terminal.draw(|frame| ui::draw(frame, &mut app))?;

        tokio::select! {
            _ = tick.tick() => app.on_tick(),
            Some(event) = rx.recv() => app.apply(event),
            maybe = events.next() => match maybe {
                Some(Ok(Event::Key(key))) if key.kind != KeyEventKind::Release => {
                    app.handle_key(key);
                }
                Some(Ok(Event::Mouse(mouse))) => app.handle_mouse(mouse),
                Some(Ok(_)) => {}
                Some(Err(error)) => return Err(error.into()),
                None => break,
            },
        }
    }

    Ok(())
}
