// src/ui/layout.rs
use crate::{
    app::{ActiveModal, App},
    ui::{
        header::render_header,
        modals::{render_celebration, render_modal, render_rest_overlay},
        sections::render_sections,
        status_bar::render_status_bar,
        tip_panel::{render_tip_panel, tip_panel_height},
    },
};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    Frame,
};

const HEADER_HEIGHT: u16 = 6;

pub fn render_ui(f: &mut Frame, app: &mut App) {
    let size = f.size();

    // Header on top, plan below, status bar at bottom
    let main_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(HEADER_HEIGHT),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .split(size);

    render_header(f, app, main_chunks[0]);
    render_main_content(f, app, main_chunks[1]);
    render_status_bar(f, app, main_chunks[2]);

    // Overlays last, modal on top of everything
    render_rest_overlay(f, app);
    render_celebration(f, app);
    if app.active_modal != ActiveModal::None {
        render_modal(f, app);
    }
}

// Plan list, with the tip panel underneath while a tip is shown
fn render_main_content(f: &mut Frame, app: &mut App, area: Rect) {
    let tip_height = tip_panel_height(app, area.height);
    if tip_height == 0 {
        render_sections(f, app, area);
        return;
    }

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(4), Constraint::Length(tip_height)])
        .split(area);
    render_sections(f, app, chunks[0]);
    render_tip_panel(f, app, chunks[1]);
}

/// Helper function to create a centered rectangle for modals
pub fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let percent_x = percent_x.min(100);
    let percent_y = percent_y.min(100);
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

/// Centered rectangle of a fixed size, shrunk to fit `r`.
pub fn centered_rect_fixed(width: u16, height: u16, r: Rect) -> Rect {
    let width = width.min(r.width);
    let height = height.min(r.height);
    Rect {
        x: r.x + (r.width - width) / 2,
        y: r.y + (r.height - height) / 2,
        width,
        height,
    }
}
