use chrono::{DateTime, Utc};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    symbols::Marker,
    text::Span,
    widgets::{Axis, Block, Borders, Cell, Chart, Dataset, GraphType, Paragraph, Row, Table, Wrap},
    Frame,
};
use time_humanize::{Accuracy, HumanTime, Tense};

use crate::{
    app::App,
    clock::Clock,
    metrics::format_elapsed,
    record::SessionRecord,
    ui::charting::{compute_chart_bounds, format_label},
};

/// "3 minutes ago" style age of a finished session
pub fn humanize_age(ended_at: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let secs = (now - ended_at).num_seconds().max(0) as u64;
    HumanTime::from(std::time::Duration::from_secs(secs)).to_text_en(Accuracy::Rough, Tense::Past)
}

/// Pure presenter for a single history row
pub fn present_row(record: &SessionRecord, now: DateTime<Utc>) -> Row<'static> {
    let wpm_color = if record.wpm >= 60 {
        Color::Green
    } else if record.wpm >= 30 {
        Color::Yellow
    } else {
        Color::Red
    };

    let accuracy_color = if record.accuracy >= 95 {
        Color::Green
    } else if record.accuracy >= 80 {
        Color::Yellow
    } else {
        Color::Red
    };

    Row::new(vec![
        Cell::from(humanize_age(record.ended_at, now)),
        Cell::from(record.snippet.title.clone()).style(Style::default().add_modifier(Modifier::BOLD)),
        Cell::from(record.snippet.language.clone()),
        Cell::from(record.snippet.difficulty.to_string()),
        Cell::from(record.wpm.to_string()).style(Style::default().fg(wpm_color)),
        Cell::from(format!("{}%", record.accuracy)).style(Style::default().fg(accuracy_color)),
        Cell::from(record.error_count.to_string()),
        Cell::from(format_elapsed(record.duration())),
    ])
}

/// Render the session history screen: progress chart, summary and table
pub fn render_history<C: Clock>(app: &mut App<C>, f: &mut Frame) {
    let area = f.area();
    let now = app.tracker.now();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(2)
        .constraints([
            Constraint::Percentage(40), // chart
            Constraint::Length(1),      // summary
            Constraint::Min(0),         // table
            Constraint::Length(2),      // instructions
        ])
        .split(area);

    let history = app.tracker.history();
    if history.is_empty() {
        let no_data = Paragraph::new("No finished sessions yet. Complete a snippet to start tracking.")
            .alignment(Alignment::Center)
            .style(Style::default().fg(Color::Gray));
        f.render_widget(no_data, chunks[2]);
    } else {
        let points = history.progress_points();
        let wpm_coords: Vec<(f64, f64)> = points.iter().map(|p| p.wpm_coord()).collect();
        let accuracy_coords: Vec<(f64, f64)> = points.iter().map(|p| p.accuracy_coord()).collect();
        let (x_max, y_max) = compute_chart_bounds(&points);

        let datasets = vec![
            Dataset::default()
                .name("wpm")
                .marker(Marker::Braille)
                .style(Style::default().fg(Color::Magenta))
                .graph_type(GraphType::Line)
                .data(&wpm_coords),
            Dataset::default()
                .name("acc %")
                .marker(Marker::Braille)
                .style(Style::default().fg(Color::Cyan))
                .graph_type(GraphType::Line)
                .data(&accuracy_coords),
        ];

        let chart = Chart::new(datasets)
            .block(Block::default().borders(Borders::ALL).title("Recent sessions"))
            .x_axis(
                Axis::default()
                    .title("session")
                    .bounds([1.0, x_max])
                    .labels(vec![
                        Span::raw("1"),
                        Span::raw(format_label(x_max)),
                    ]),
            )
            .y_axis(
                Axis::default()
                    .bounds([0.0, y_max])
                    .labels(vec![
                        Span::raw("0"),
                        Span::raw(format_label(y_max / 2.0)),
                        Span::raw(format_label(y_max)),
                    ]),
            );
        f.render_widget(chart, chunks[0]);

        if let Some(summary) = history.summary() {
            let summary_text = format!(
                "{} sessions   avg {} wpm / {}%   best {} wpm / {}%   σ {:.1} wpm",
                summary.sessions,
                summary.average_wpm,
                summary.average_accuracy,
                summary.best_wpm,
                summary.best_accuracy,
                summary.wpm_std_dev
            );
            f.render_widget(
                Paragraph::new(summary_text)
                    .alignment(Alignment::Center)
                    .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::ITALIC)),
                chunks[1],
            );
        }

        // newest first
        let records: Vec<&SessionRecord> = history.records().iter().rev().collect();
        let table_height = chunks[2].height.saturating_sub(3) as usize; // borders + header
        let max_scroll = records.len().saturating_sub(table_height);
        let scroll = app.history_scroll.min(max_scroll);

        let visible_rows: Vec<Row> = records
            .iter()
            .skip(scroll)
            .take(table_height)
            .map(|r| present_row(r, now))
            .collect();

        let header = Row::new(vec![
            Cell::from("When"),
            Cell::from("Snippet"),
            Cell::from("Lang"),
            Cell::from("Level"),
            Cell::from("WPM"),
            Cell::from("Acc"),
            Cell::from("Errors"),
            Cell::from("Time"),
        ])
        .style(Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD));

        let widths = [
            Constraint::Length(16),
            Constraint::Min(14),
            Constraint::Length(10),
            Constraint::Length(7),
            Constraint::Length(5),
            Constraint::Length(5),
            Constraint::Length(7),
            Constraint::Length(6),
        ];

        let title = if records.len() > table_height {
            format!("History ({}/{} rows)", scroll + visible_rows.len(), records.len())
        } else {
            "History".to_string()
        };
        let table = Table::new(visible_rows, widths)
            .header(header)
            .block(Block::default().borders(Borders::ALL).title(title))
            .column_spacing(1);
        f.render_widget(table, chunks[2]);

        app.history_scroll = scroll;
    }

    let instructions =
        Paragraph::new("(↑/↓) scroll  (PgUp/PgDn) page  (Home) top  (b/backspace) back  (n) new  (r) retry")
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true });
    f.render_widget(instructions, chunks[3]);
}
