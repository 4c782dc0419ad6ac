// src/ui/modals.rs
use crate::{
    app::{ActiveModal, App},
    ui::layout::{centered_rect, centered_rect_fixed},
};
use pale_grind_lib::format_clock;
use ratatui::{
    layout::{Alignment, Margin, Rect},
    style::{Color, Style, Stylize},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

pub fn render_modal(f: &mut Frame, app: &App) {
    match app.active_modal {
        ActiveModal::Help => render_help_modal(f, app),
        ActiveModal::ConfirmReset => render_confirm_reset_modal(f),
        ActiveModal::None => {} // Should not happen if called correctly
    }
}

fn render_help_modal(f: &mut Frame, app: &App) {
    let block = Block::default()
        .title("Help (?)")
        .borders(Borders::ALL)
        .title_style(Style::new().bold())
        .border_style(Style::new().yellow());
    let area = centered_rect(60, 75, f.size());
    f.render_widget(Clear, area);
    f.render_widget(block, area);

    let presets = app
        .service
        .config
        .rest_presets
        .iter()
        .enumerate()
        .map(|(i, secs)| format!("{}={}s", i + 1, secs))
        .collect::<Vec<_>>()
        .join(", ");

    let mut help_text = vec![
        Line::from("--- Global ---").style(Style::new().bold().underlined()),
        Line::from(" q: Quit Application"),
        Line::from(" ?: Show/Hide This Help"),
        Line::from(" Space: Start / Pause / Resume Workout"),
        Line::from(" R: Reset Workout (asks first)"),
        Line::from(" s: Share"),
        Line::from(""),
        Line::from("--- Plan ---").style(Style::new().bold().underlined()),
        Line::from(" k / ↑: Navigate Up"),
        Line::from(" j / ↓: Navigate Down"),
        Line::from(" Enter: Expand/Collapse Section, or Toggle Exercise Complete"),
        Line::from(" c / x: Toggle Exercise Complete"),
        Line::from(" l / → / +: Next Set"),
        Line::from(" h / ← / -: Previous Set"),
        Line::from(""),
        Line::from("--- Rest ---").style(Style::new().bold().underlined()),
        Line::from(format!(" {presets}: Start Rest Preset")),
        Line::from(format!(
            " b: Start Default Rest ({}s)",
            app.session.settings().default_rest_seconds
        )),
        Line::from(""),
    ];
    if app.session.tips_available() {
        help_text.extend([
            Line::from("--- Tips ---").style(Style::new().bold().underlined()),
            Line::from(" t: Show/Hide Tips for Selected Exercise (retry after a failure)"),
            Line::from(" PgUp/PgDn: Scroll Tips"),
            Line::from(" Esc: Dismiss Tips"),
            Line::from(""),
        ]);
    } else {
        help_text.push(Line::from(Span::styled(
            " Tips are disabled: no API key configured (see `pg set-api-key`)",
            Style::new().fg(Color::DarkGray),
        )));
        help_text.push(Line::from(""));
    }
    help_text.push(Line::from(Span::styled(
        " Press Esc, ?, or Enter to close ",
        Style::new().italic().yellow(),
    )));

    let paragraph = Paragraph::new(help_text).wrap(Wrap { trim: false });
    f.render_widget(paragraph, area.inner(&Margin { vertical: 1, horizontal: 1 }));
}

fn render_confirm_reset_modal(f: &mut Frame) {
    let block = Block::default()
        .title("Reset Workout")
        .borders(Borders::ALL)
        .border_style(Style::new().yellow());
    let area = centered_rect_fixed(46, 6, f.size());
    f.render_widget(Clear, area);

    let text = vec![
        Line::from("Start over? All progress will be cleared."),
        Line::from(""),
        Line::from(Span::styled(
            "[y/Enter] Reset   [n/Esc] Cancel",
            Style::new().italic().yellow(),
        )),
    ];
    let paragraph = Paragraph::new(text)
        .block(block)
        .alignment(Alignment::Center);
    f.render_widget(paragraph, area);
}

/// Small countdown box pinned to the top-right corner. Does not take input.
pub fn render_rest_overlay(f: &mut Frame, app: &App) {
    let rest = app.session.rest_clock();
    if !rest.is_active() {
        return;
    }
    let screen = f.size();
    let width = 20.min(screen.width);
    let area = Rect {
        x: screen.x + screen.width.saturating_sub(width + 1),
        y: screen.y + 1,
        width,
        height: 4.min(screen.height),
    };

    let block = Block::default()
        .title(" Rest ")
        .borders(Borders::ALL)
        .border_style(Style::new().fg(Color::LightRed));
    let text = vec![
        Line::from(Span::styled(
            format_clock(rest.remaining_seconds()),
            Style::new().bold().fg(Color::LightRed),
        )),
        Line::from(Span::styled(
            format!("of {}", format_clock(rest.duration_seconds())),
            Style::new().fg(Color::Gray),
        )),
    ];
    f.render_widget(Clear, area);
    f.render_widget(
        Paragraph::new(text).block(block).alignment(Alignment::Center),
        area,
    );
}

pub fn render_celebration(f: &mut Frame, app: &App) {
    if !app.session.is_celebrating() {
        return;
    }
    let stats = app.session.stats();
    let area = centered_rect_fixed(40, 7, f.size());
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::new().fg(Color::LightGreen));
    let text = vec![
        Line::from(Span::styled(
            "🎉 Workout Complete! 🎉",
            Style::new().bold().fg(Color::LightGreen),
        )),
        Line::from(""),
        Line::from(format!(
            "{} exercises in {} min",
            stats.total, stats.minutes
        )),
        Line::from(Span::styled("Great job!", Style::new().italic())),
    ];
    f.render_widget(Clear, area);
    f.render_widget(
        Paragraph::new(text).block(block).alignment(Alignment::Center),
        area,
    );
}
