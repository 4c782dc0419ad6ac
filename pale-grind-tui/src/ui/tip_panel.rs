// src/ui/tip_panel.rs
use crate::{
    app::App,
    ui::{markdown::render_markdown, theme::color_or},
};
use pale_grind_lib::TipState;
use ratatui::{
    layout::Rect,
    style::{Color, Style, Stylize},
    text::{Line, Span},
    widgets::{
        block::{Position, Title},
        Block, Borders, Paragraph, Wrap,
    },
    Frame,
};

/// Height the tip panel wants, `0` when there is nothing to show.
pub fn tip_panel_height(app: &App, available: u16) -> u16 {
    match app.session.tip() {
        TipState::Idle => 0,
        TipState::Loading { .. } | TipState::Failed { .. } => 5,
        TipState::Loaded { .. } => available.saturating_mul(3) / 5,
    }
}

pub fn render_tip_panel(f: &mut Frame, app: &App, area: Rect) {
    let accent = color_or(&app.service.config.theme.accent_color, Color::LightMagenta);
    let tip = app.session.tip();
    let Some(exercise) = tip.target() else {
        return;
    };

    let (lines, hint, border) = match tip {
        TipState::Loading { .. } => (
            vec![Line::from(Span::styled(
                "Getting tips...",
                Style::default().italic().fg(Color::Gray),
            ))],
            " [Esc] Dismiss ",
            Color::DarkGray,
        ),
        TipState::Failed { failure, .. } => (
            vec![Line::from(Span::styled(
                failure.to_string(),
                Style::default().fg(Color::LightRed),
            ))],
            " [t] Try Again | [Esc] Dismiss ",
            Color::LightRed,
        ),
        TipState::Loaded { content, .. } => (
            render_markdown(content, accent),
            " [PgUp/PgDn] Scroll | [t] Hide | [Esc] Dismiss ",
            accent,
        ),
        TipState::Idle => return,
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!(" Tips: {exercise} "))
        .title(Title::from(hint).position(Position::Bottom))
        .border_style(Style::default().fg(border));

    let paragraph = Paragraph::new(lines)
        .block(block)
        .wrap(Wrap { trim: false })
        .scroll((app.tip_scroll, 0));
    f.render_widget(paragraph, area);
}
