// src/ui/status_bar.rs
use crate::app::{ActiveModal, App, MessageLevel};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    widgets::Paragraph,
    Frame,
};

pub fn render_status_bar(f: &mut Frame, app: &App, area: Rect) {
    let status_text = match app.active_modal {
        ActiveModal::None if app.session.tip().target().is_some() => {
            " [↑↓/jk] Nav | [Enter] Open/Done | [t] Tips | [Esc] Close Tips | [Space] Start/Pause | [?] Help | [q]uit "
        }
        ActiveModal::None => {
            " [↑↓/jk] Nav | [Enter] Open/Done | [←→] Set | [1-9] Rest | [Space] Start/Pause | [?] Help | [q]uit "
        }
        ActiveModal::Help => " [Esc/Enter/?] Close Help ",
        ActiveModal::ConfirmReset => " [y/Enter] Reset | [n/Esc] Cancel ",
    };

    let (message, message_color) = match &app.status_message {
        Some(message) => (
            message.text.as_str(),
            match message.level {
                MessageLevel::Info => Color::LightGreen,
                MessageLevel::Error => Color::Red,
            },
        ),
        None => ("", Color::Red),
    };

    let status_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(70), Constraint::Percentage(30)])
        .split(area);

    let status_paragraph =
        Paragraph::new(status_text).style(Style::default().bg(Color::DarkGray).fg(Color::White));
    f.render_widget(status_paragraph, status_chunks[0]);

    let message_paragraph = Paragraph::new(message)
        .style(Style::default().bg(Color::DarkGray).fg(message_color))
        .alignment(Alignment::Right);
    f.render_widget(message_paragraph, status_chunks[1]);
}
