//! Rendering for the search view, forecast view, and hourly modal.

use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::canvas::{Canvas, Line as CanvasLine, Points};
use ratatui::widgets::{Block, Borders, Clear, List, ListItem, Paragraph, Row, Table, Wrap};
use skycast_core::{DropdownView, chart, icons, timefmt};

use crate::app::{App, Route};

pub fn draw(frame: &mut Frame, app: &mut App) {
    match app.route {
        Route::Search => draw_search(frame, app),
        Route::Forecast => draw_forecast(frame, app),
    }
}

fn draw_search(frame: &mut Frame, app: &mut App) {
    let column = centered_column(frame.area(), 64);
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(5), // title card
            Constraint::Length(3), // input
            Constraint::Length(8), // dropdown
            Constraint::Min(3),    // error banner
            Constraint::Length(1), // help
        ])
        .split(column);

    let header = Paragraph::new(vec![
        Line::from(Span::styled(
            "Skycast Weather",
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(app.clock.format("Today %-d %b · %H:%M:%S").to_string()),
        Line::from(Span::styled(
            "Live weather and 7-day forecasts for cities worldwide",
            Style::default().fg(Color::DarkGray),
        )),
    ])
    .alignment(Alignment::Center)
    .block(Block::default().borders(Borders::ALL));
    frame.render_widget(header, chunks[0]);

    let input = Paragraph::new(format!("{}\u{2590}", app.search.query()))
        .block(Block::default().borders(Borders::ALL).title("Search for cities"));
    frame.render_widget(input, chunks[1]);
    app.search_area = Some(chunks[1]);

    app.dropdown_area = None;
    match app.search.dropdown() {
        None => {}
        Some(DropdownView::Loading) => {
            frame.render_widget(
                Paragraph::new("Searching cities...")
                    .style(Style::default().fg(Color::Yellow)),
                chunks[2],
            );
        }
        Some(DropdownView::Suggestions(suggestions)) => {
            let rows = Rect {
                height: (suggestions.len() as u16).min(chunks[2].height),
                ..chunks[2]
            };
            let items: Vec<ListItem> = suggestions
                .iter()
                .enumerate()
                .map(|(index, suggestion)| {
                    let style = if app.search.highlight() == Some(index) {
                        Style::default().fg(Color::Cyan).add_modifier(Modifier::REVERSED)
                    } else {
                        Style::default()
                    };
                    ListItem::new(suggestion.name.clone()).style(style)
                })
                .collect();
            frame.render_widget(List::new(items), rows);
            app.dropdown_area = Some(rows);
        }
        Some(DropdownView::NoMatches) => {
            frame.render_widget(
                Paragraph::new("No matching cities found")
                    .style(Style::default().fg(Color::DarkGray)),
                chunks[2],
            );
        }
        Some(DropdownView::TypeMoreHint) => {
            frame.render_widget(
                Paragraph::new("Type at least 3 characters to search")
                    .style(Style::default().fg(Color::DarkGray)),
                chunks[2],
            );
        }
    }

    if let Some(error) = &app.error {
        frame.render_widget(
            Paragraph::new(error.as_str())
                .style(Style::default().fg(Color::Red))
                .wrap(Wrap { trim: true }),
            chunks[3],
        );
    }

    frame.render_widget(
        Paragraph::new("Enter get weather \u{b7} \u{2191}/\u{2193} choose \u{b7} Esc quit")
            .style(Style::default().fg(Color::DarkGray))
            .alignment(Alignment::Center),
        chunks[4],
    );
}

fn draw_forecast(frame: &mut Frame, app: &mut App) {
    let area = frame.area();
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(8), // current conditions card
            Constraint::Min(5),    // 7-day list
            Constraint::Length(1), // help
        ])
        .split(area);

    draw_current_card(frame, app, chunks[0]);
    draw_day_list(frame, app, chunks[1]);

    frame.render_widget(
        Paragraph::new(
            "\u{2191}/\u{2193} day \u{b7} Enter hourly detail \u{b7} Esc/b back \u{b7} q quit",
        )
        .style(Style::default().fg(Color::DarkGray))
        .alignment(Alignment::Center),
        chunks[2],
    );

    app.modal_area = None;
    if app.selection.is_open() {
        draw_hourly_modal(frame, app, area);
    }
}

fn draw_current_card(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default().borders(Borders::ALL).title("Skycast Weather");

    let mut lines = vec![Line::from(
        app.clock.format("Today %-d %b · %H:%M:%S").to_string(),
    )];

    if app.loading_forecast {
        lines.push(Line::from("Loading..."));
    } else if let Some(error) = &app.error {
        lines.push(Line::from(Span::styled(
            error.clone(),
            Style::default().fg(Color::Red),
        )));
        if app.redirecting {
            lines.push(Line::from(Span::styled(
                "Redirecting to search...",
                Style::default().fg(Color::DarkGray),
            )));
        }
    } else if let Some(weather) = &app.weather {
        lines.push(Line::from(vec![
            Span::styled(
                weather.city.clone(),
                Style::default().add_modifier(Modifier::BOLD),
            ),
            Span::raw("  "),
            Span::raw(icons::glyph(&weather.icon)),
            Span::raw(" "),
            Span::raw(weather.description.clone()),
        ]));
        lines.push(Line::from(format!(
            "{:.0}\u{b0}C",
            weather.temperature_c.round()
        )));
        lines.push(Line::from(format!(
            "Humidity: {}%   Wind: {:.1} m/s",
            weather.humidity_pct, weather.wind_speed_mps
        )));
    }

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn draw_day_list(frame: &mut Frame, app: &mut App, area: Rect) {
    let title = match &app.weather {
        Some(weather) => format!("Next 7 days for {}", weather.city),
        None => "7-Day Forecast".to_string(),
    };
    let block = Block::default().borders(Borders::ALL).title(title);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    if app.days.is_empty() {
        app.day_list_area = None;
        return;
    }

    let items: Vec<ListItem> = app
        .days
        .iter()
        .enumerate()
        .map(|(index, day)| {
            let selected = index == app.day_cursor;
            let cursor = if selected { "\u{25b8} " } else { "  " };
            let style = if selected {
                Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            };
            ListItem::new(Line::from(vec![
                Span::styled(cursor, style),
                Span::styled(day.date.format("%a %-d %b").to_string(), style),
                Span::raw("  "),
                Span::raw(icons::glyph(&day.icon)),
                Span::raw(format!(" {:.0}\u{b0}C  ", day.temperature_c.round())),
                Span::raw(day.description.clone()),
                Span::styled(
                    format!(
                        "  {}% \u{b7} {:.1} m/s",
                        day.humidity_pct, day.wind_speed_mps
                    ),
                    Style::default().fg(Color::DarkGray),
                ),
            ]))
        })
        .collect();

    frame.render_widget(List::new(items), inner);
    app.day_list_area = Some(inner);
}

fn draw_hourly_modal(frame: &mut Frame, app: &mut App, area: Rect) {
    let Some(reference) = app.selection.open_date() else {
        return;
    };

    let modal = centered_rect(86, 80, area);
    frame.render_widget(Clear, modal);

    let title = format!("Hourly forecast for {}", reference.format("%A, %b %-d"));
    let block = Block::default().borders(Borders::ALL).title(title);
    let inner = block.inner(modal);
    frame.render_widget(block, modal);
    app.modal_area = Some(modal);

    let samples = app.selection.samples();
    if samples.is_empty() {
        frame.render_widget(
            Paragraph::new("No hourly forecast data available for this day.")
                .alignment(Alignment::Center),
            inner,
        );
        return;
    }

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),  // time labels
            Constraint::Length(10), // temperature chart
            Constraint::Min(4),     // hourly table
        ])
        .split(inner);

    let labels: Vec<String> = samples
        .iter()
        .map(|sample| timefmt::hour_label(sample.time, reference))
        .collect();
    draw_time_labels(frame, &labels, chunks[0]);

    let temps: Vec<f64> = samples.iter().map(|s| s.temperature_c).collect();
    draw_temperature_chart(frame, &temps, chunks[1]);

    let rows: Vec<Row> = samples
        .iter()
        .zip(&labels)
        .map(|(sample, label)| {
            Row::new(vec![
                label.clone(),
                format!("{:.0}\u{b0}C", sample.temperature_c.round()),
                sample.description.clone(),
                format!("{}%", sample.humidity_pct),
                format!("{:.1} m/s", sample.wind_speed_mps),
            ])
        })
        .collect();
    let table = Table::new(
        rows,
        [
            Constraint::Length(18),
            Constraint::Length(6),
            Constraint::Min(16),
            Constraint::Length(9),
            Constraint::Length(9),
        ],
    )
    .header(
        Row::new(vec!["Time", "Temp", "Conditions", "Humidity", "Wind"])
            .style(Style::default().add_modifier(Modifier::BOLD)),
    );
    frame.render_widget(table, chunks[2]);
}

fn draw_time_labels(frame: &mut Frame, labels: &[String], area: Rect) {
    let constraints = vec![Constraint::Ratio(1, labels.len() as u32); labels.len()];
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(constraints)
        .split(area);
    for (label, column) in labels.iter().zip(columns.iter()) {
        frame.render_widget(
            Paragraph::new(label.as_str()).alignment(Alignment::Center),
            *column,
        );
    }
}

fn draw_temperature_chart(frame: &mut Frame, temps: &[f64], area: Rect) {
    let geometry = chart::scale(temps);
    if geometry.is_empty() {
        return;
    }

    let canvas = Canvas::default()
        .x_bounds([0.0, geometry.width()])
        .y_bounds([0.0, chart::CHART_HEIGHT])
        .paint(|ctx| {
            // The geometry's y grows downward; the canvas's grows upward.
            if let Some(points) = geometry.polyline() {
                for pair in points.windows(2) {
                    ctx.draw(&CanvasLine {
                        x1: pair[0].x,
                        y1: chart::CHART_HEIGHT - pair[0].y,
                        x2: pair[1].x,
                        y2: chart::CHART_HEIGHT - pair[1].y,
                        color: Color::LightRed,
                    });
                }
            } else {
                let dots: Vec<(f64, f64)> = geometry
                    .points()
                    .iter()
                    .map(|p| (p.x, chart::CHART_HEIGHT - p.y))
                    .collect();
                ctx.draw(&Points { coords: &dots, color: Color::LightRed });
            }
            ctx.print(0.0, chart::CHART_HEIGHT, Line::from("30\u{b0}"));
            ctx.print(0.0, 0.0, Line::from("0\u{b0}"));
        });
    frame.render_widget(canvas, area);
}

/// Center a column of at most `width` cells within `area`.
fn centered_column(area: Rect, width: u16) -> Rect {
    let width = width.min(area.width);
    Rect {
        x: area.x + (area.width - width) / 2,
        width,
        ..area
    }
}

/// Center a `percent_x` by `percent_y` rectangle within `area`.
fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);
    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1]);
    horizontal[1]
}
