pub mod charting;
pub mod history;
pub mod screen;

use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Paragraph, Widget, Wrap},
};
use unicode_width::UnicodeWidthStr;

use crate::{
    app::{App, AppState},
    clock::Clock,
    metrics::{format_elapsed, Performance},
};

const HORIZONTAL_MARGIN: u16 = 5;
const VERTICAL_MARGIN: u16 = 2;

/// How a snippet character should be drawn
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CharClass {
    Correct,
    Incorrect,
    Cursor,
    Pending,
}

/// Classify every character of `body` against what has been typed so far
pub fn classify(body: &str, input: &str) -> Vec<CharClass> {
    let mut typed = input.chars();
    let typed_len = input.chars().count();

    body.chars()
        .enumerate()
        .map(|(idx, expected)| match typed.next() {
            Some(c) if c == expected => CharClass::Correct,
            Some(_) => CharClass::Incorrect,
            None if idx == typed_len => CharClass::Cursor,
            None => CharClass::Pending,
        })
        .collect()
}

/// Render the snippet body as styled lines, one per line break
pub fn snippet_lines(body: &str, input: &str) -> Vec<Line<'static>> {
    let bold_style = Style::default().add_modifier(Modifier::BOLD);
    let green_bold_style = bold_style.fg(Color::Green);
    let red_bold_style = bold_style.fg(Color::Red);
    let dim_style = Style::default().add_modifier(Modifier::DIM);
    let cursor_style = bold_style.add_modifier(Modifier::UNDERLINED | Modifier::DIM);

    let mut lines = Vec::new();
    let mut spans: Vec<Span<'static>> = Vec::new();

    for (expected, class) in body.chars().zip(classify(body, input)) {
        let style = match class {
            CharClass::Correct => green_bold_style,
            CharClass::Incorrect => red_bold_style.bg(Color::Rgb(80, 0, 0)),
            CharClass::Cursor => cursor_style,
            CharClass::Pending => dim_style,
        };

        let shown = match expected {
            // make whitespace visible where it matters
            '\n' if matches!(class, CharClass::Incorrect | CharClass::Cursor) => "↵".to_string(),
            '\n' => String::new(),
            '\t' => "→   ".to_string(),
            ' ' if class == CharClass::Incorrect => "·".to_string(),
            c => c.to_string(),
        };
        if !shown.is_empty() {
            spans.push(Span::styled(shown, style));
        }

        if expected == '\n' {
            lines.push(Line::from(std::mem::take(&mut spans)));
        }
    }
    lines.push(Line::from(spans));
    lines
}

impl<C: Clock> Widget for &App<C> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        match self.state {
            AppState::Typing => render_typing(self, area, buf),
            AppState::Results => render_results(self, area, buf),
            // drawn by ui::history with frame access for scrolling
            AppState::History => {}
        }
    }
}

fn render_typing<C: Clock>(app: &App<C>, area: Rect, buf: &mut Buffer) {
    let bold_style = Style::default().add_modifier(Modifier::BOLD);
    let dim_bold_style = bold_style.add_modifier(Modifier::DIM);
    let italic_style = Style::default().add_modifier(Modifier::ITALIC);

    let snippet = &app.snippet;
    let lines = snippet_lines(&snippet.body, app.tracker.input());
    let widest = snippet
        .body
        .lines()
        .map(|l| l.width())
        .max()
        .unwrap_or(0) as u16;
    let body_height = lines.len() as u16;

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .horizontal_margin(HORIZONTAL_MARGIN)
        .vertical_margin(VERTICAL_MARGIN)
        .constraints([
            Constraint::Length(1), // title
            Constraint::Length(1), // live stats
            Constraint::Length(1), // padding
            Constraint::Min(body_height.min(area.height)),
            Constraint::Length(1), // legend
        ])
        .split(area);

    let title = Paragraph::new(Line::from(vec![
        Span::styled(snippet.title.clone(), bold_style.fg(Color::Cyan)),
        Span::styled(
            format!("  {} · {}", snippet.language, snippet.difficulty),
            italic_style,
        ),
    ]))
    .alignment(Alignment::Center);
    title.render(chunks[0], buf);

    let tracker = &app.tracker;
    let elapsed = tracker
        .elapsed()
        .map(format_elapsed)
        .unwrap_or_else(|| "0:00".to_string());
    let mut stats = format!(
        "{} wpm   {}% acc   {}   {:.0}%",
        tracker.live_wpm(),
        tracker.live_accuracy(),
        elapsed,
        tracker.progress()
    );
    if let Some(remaining) = app.seconds_remaining() {
        stats.push_str(&format!("   {remaining}s left"));
    }
    Paragraph::new(Span::styled(stats, dim_bold_style))
        .alignment(Alignment::Center)
        .render(chunks[1], buf);

    // center short snippets horizontally, keep code left-aligned within
    let body_area = chunks[3];
    let pad = body_area.width.saturating_sub(widest) / 2;
    let body_rect = Rect {
        x: body_area.x + pad,
        width: body_area.width - pad,
        ..body_area
    };
    Paragraph::new(Text::from(lines))
        .wrap(Wrap { trim: false })
        .render(body_rect, buf);

    let legend = if tracker.is_active() {
        "(←) restart / (→) new snippet / (esc)ape"
    } else {
        "start typing to begin / (→) new snippet / (esc)ape"
    };
    Paragraph::new(Span::styled(legend, italic_style)).render(chunks[4], buf);
}

fn render_results<C: Clock>(app: &App<C>, area: Rect, buf: &mut Buffer) {
    let bold_style = Style::default().add_modifier(Modifier::BOLD);
    let italic_style = Style::default().add_modifier(Modifier::ITALIC);

    let Some(record) = app.tracker.history().last() else {
        Paragraph::new("no finished sessions yet").render(area, buf);
        return;
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .horizontal_margin(HORIZONTAL_MARGIN)
        .vertical_margin(VERTICAL_MARGIN)
        .constraints([
            Constraint::Min(1),
            Constraint::Length(1), // snippet
            Constraint::Length(1), // stats
            Constraint::Length(1), // performance message
            Constraint::Length(1), // history summary
            Constraint::Length(3), // settings
            Constraint::Min(1),
            Constraint::Length(1), // legend
        ])
        .split(area);

    Paragraph::new(Span::styled(
        format!("{} ({})", record.snippet.title, record.snippet.language),
        italic_style,
    ))
    .alignment(Alignment::Center)
    .render(chunks[1], buf);

    let mut stats = vec![Span::styled(
        format!(
            "{} wpm   {}% acc   {}   {} errors",
            record.wpm,
            record.accuracy,
            format_elapsed(record.duration()),
            record.error_count
        ),
        bold_style,
    )];
    if app.timed_out {
        // scored against the whole snippet, not just what was typed
        stats.push(Span::styled(
            "   time limit reached",
            italic_style.fg(Color::Yellow),
        ));
    }
    Paragraph::new(Line::from(stats))
        .alignment(Alignment::Center)
        .render(chunks[2], buf);

    let performance = record.performance();
    let color = match performance {
        Performance::Outstanding => Color::Yellow,
        Performance::Great => Color::Green,
        Performance::Good => Color::Blue,
        Performance::KeepPracticing => Color::Magenta,
    };
    Paragraph::new(Span::styled(performance.message(), bold_style.fg(color)))
        .alignment(Alignment::Center)
        .render(chunks[3], buf);

    if let Some(summary) = app.tracker.history().summary() {
        Paragraph::new(Span::styled(
            format!(
                "{} sessions   avg {} wpm / {}%   best {} wpm / {}%",
                summary.sessions,
                summary.average_wpm,
                summary.average_accuracy,
                summary.best_wpm,
                summary.best_accuracy
            ),
            Style::default().fg(Color::Cyan).add_modifier(Modifier::ITALIC),
        ))
        .alignment(Alignment::Center)
        .render(chunks[4], buf);
    }

    let settings_text = format!(
        "Language: {} | Difficulty: {}\n(l) Language (d) Difficulty",
        app.settings.language, app.settings.difficulty
    );
    Paragraph::new(settings_text)
        .style(Style::default().fg(Color::Gray).add_modifier(Modifier::ITALIC))
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .render(chunks[5], buf);

    Paragraph::new(Span::styled(
        "(r)etry / (n)ew / (h)istory / (esc)ape",
        italic_style,
    ))
    .render(chunks[7], buf);
}
