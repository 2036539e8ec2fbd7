use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
};

use crate::api::client::Endpoint;
use crate::terminal::state::{AppState, DisplayState, Focus, Tone};

const BLUE: Color = Color::Rgb(59, 130, 246);
const GREEN: Color = Color::Rgb(16, 185, 129);
const AMBER: Color = Color::Rgb(245, 158, 11);
const RED: Color = Color::Rgb(239, 68, 68);

fn tone_color(tone: Tone) -> Color {
    match tone {
        Tone::Idle => BLUE,
        Tone::Success => GREEN,
        Tone::Warning => AMBER,
        Tone::Error => RED,
    }
}

pub fn render(f: &mut Frame, state: &AppState) {
    let [title, url, key, status, code, history, footer] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Length(3),
        Constraint::Length(3),
        Constraint::Length(1),
        Constraint::Length(7),
        Constraint::Min(3),
        Constraint::Length(1),
    ])
    .margin(1)
    .areas(f.area());

    f.render_widget(
        Paragraph::new(" Verification Code Fetcher ")
            .alignment(Alignment::Center)
            .style(Style::default().add_modifier(Modifier::BOLD)),
        title,
    );

    render_field(f, url, " API URL ", &state.base_url, state.focus == Focus::Url);
    render_field(f, key, " API Key ", &state.api_key, state.focus == Focus::Key);

    let status_style = match state.display {
        DisplayState::Loading => Style::default().fg(Color::Yellow),
        _ => Style::default().fg(Color::Gray),
    };
    f.render_widget(
        Paragraph::new(state.status_text.as_str())
            .alignment(Alignment::Center)
            .style(status_style),
        status,
    );

    // code + details
    let code_block = Block::default().title(" Code ").borders(Borders::ALL);
    let mut lines = vec![
        Line::from(Span::styled(
            state.code_text.clone(),
            Style::default()
                .fg(tone_color(state.tone))
                .add_modifier(Modifier::BOLD),
        ))
        .alignment(Alignment::Center),
        Line::raw(""),
    ];
    lines.extend(state.detail_text.lines().map(|l| {
        Line::from(Span::styled(l.to_string(), Style::default().fg(Color::Gray)))
            .alignment(Alignment::Center)
    }));
    f.render_widget(
        Paragraph::new(Text::from(lines))
            .block(code_block)
            .wrap(Wrap { trim: true }),
        code,
    );

    render_history(f, history, state);
    render_footer(f, footer, state);

    if let Some(n) = &state.notice {
        let area = centered(f.area(), 50, 5);
        f.render_widget(Clear, area);
        f.render_widget(
            Paragraph::new(vec![
                Line::from(n.message.as_str()),
                Line::from(Span::styled(
                    "press any key",
                    Style::default().fg(Color::DarkGray),
                )),
            ])
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true })
            .block(
                Block::default()
                    .title(format!(" {} ", n.title))
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(AMBER)),
            ),
            area,
        );
    }
}

fn focus_border(focused: bool) -> Style {
    if focused {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default().fg(Color::DarkGray)
    }
}

fn render_field(f: &mut Frame, area: Rect, title: &str, value: &str, focused: bool) {
    let mut spans = vec![Span::raw(value.to_string())];
    if focused {
        spans.push(Span::styled("█", Style::default().fg(Color::Yellow)));
    }
    let block = Block::default()
        .title(title.to_string())
        .borders(Borders::ALL)
        .border_style(focus_border(focused));
    f.render_widget(Paragraph::new(Line::from(spans)).block(block), area);
}

fn render_history(f: &mut Frame, area: Rect, state: &AppState) {
    let block = Block::default()
        .title(format!(" History ({}) ", state.history.len()))
        .borders(Borders::ALL)
        .border_style(focus_border(state.focus == Focus::History));

    let height = area.height.saturating_sub(2) as usize;
    let top = state.history_top(height);
    let visible: Vec<Line> = state
        .history
        .iter()
        .skip(top)
        .take(height)
        .map(|l| Line::from(l.as_str()))
        .collect();

    f.render_widget(Paragraph::new(visible).block(block), area);
}

fn render_footer(f: &mut Frame, area: Rect, state: &AppState) {
    let bold = Style::default().add_modifier(Modifier::BOLD);
    let action = |enabled: bool| {
        if enabled {
            Style::default()
        } else {
            Style::default().fg(Color::DarkGray)
        }
    };

    let hint = Paragraph::new(Line::from(vec![
        Span::styled("Enter", bold),
        Span::styled(" latest  ", action(state.is_enabled(Endpoint::Latest))),
        Span::styled("^A", bold),
        Span::styled(" all  ", action(state.is_enabled(Endpoint::All))),
        Span::styled("^Y", bold),
        Span::styled(" copy  ", action(state.has_copyable_code())),
        Span::styled("Tab", bold),
        Span::raw(" focus  "),
        Span::styled("Esc", bold),
        Span::raw(" quit"),
    ]));
    f.render_widget(hint, area);
}

fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let w = width.min(area.width);
    let h = height.min(area.height);
    Rect {
        x: area.x + (area.width - w) / 2,
        y: area.y + (area.height - h) / 2,
        width: w,
        height: h,
    }
}
