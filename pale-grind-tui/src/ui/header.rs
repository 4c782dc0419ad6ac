// src/ui/header.rs
use crate::{app::App, ui::theme::color_or};
use pale_grind_lib::{format_clock, ClockStatus};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style, Stylize},
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, Paragraph},
    Frame,
};

pub fn render_header(f: &mut Frame, app: &App, area: Rect) {
    let theme = &app.service.config.theme;
    let header_color = color_or(&theme.header_color, Color::LightBlue);
    let accent_color = color_or(&theme.accent_color, Color::LightMagenta);

    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Pale Grind ")
        .title_style(Style::new().bold().fg(header_color))
        .border_style(Style::new().fg(header_color));
    let inner = block.inner(area);
    f.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Clock
            Constraint::Length(1), // Progress
            Constraint::Min(0),    // Stat tiles
        ])
        .split(inner);

    let clock = app.session.workout_clock();
    let status_style = match clock.status() {
        ClockStatus::NotStarted => Style::default().fg(Color::Gray),
        ClockStatus::Running => Style::default().fg(Color::LightGreen),
        ClockStatus::Paused => Style::default().fg(Color::LightYellow),
    };
    let clock_line = Line::from(vec![
        Span::styled(
            format_clock(clock.elapsed_seconds()),
            Style::default().add_modifier(Modifier::BOLD),
        ),
        Span::raw("  "),
        Span::styled(clock.status().to_string(), status_style),
    ]);
    f.render_widget(
        Paragraph::new(clock_line).alignment(Alignment::Center),
        chunks[0],
    );

    let stats = app.session.stats();
    let gauge = Gauge::default()
        .gauge_style(Style::default().fg(accent_color).bg(Color::DarkGray))
        .percent(u16::from(stats.percentage))
        .label(format!("{}% complete", stats.percentage));
    f.render_widget(gauge, chunks[1]);

    let tiles = [
        ("Done", stats.completed.to_string()),
        ("Total", stats.total.to_string()),
        ("Minutes", stats.minutes.to_string()),
        ("Categories", stats.categories.to_string()),
    ];
    let tile_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Ratio(1, 4); 4])
        .split(chunks[2]);
    for ((label, value), tile_area) in tiles.into_iter().zip(tile_chunks.iter()) {
        let tile = Paragraph::new(vec![
            Line::from(Span::styled(value, Style::default().bold().fg(accent_color))),
            Line::from(Span::styled(label, Style::default().fg(Color::Gray))),
        ])
        .alignment(Alignment::Center);
        f.render_widget(tile, *tile_area);
    }
}
