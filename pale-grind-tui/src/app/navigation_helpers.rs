// src/app/navigation_helpers.rs
use super::state::{App, Row};
use ratatui::widgets::ListState;

fn list_next(state: &mut ListState, list_len: usize) {
    if list_len == 0 {
        return;
    }
    let i = match state.selected() {
        Some(i) if i >= list_len - 1 => 0,
        Some(i) => i + 1,
        None => 0,
    };
    state.select(Some(i));
}

fn list_previous(state: &mut ListState, list_len: usize) {
    if list_len == 0 {
        return;
    }
    let i = match state.selected() {
        Some(0) => list_len - 1,
        Some(i) => i - 1,
        None => list_len.saturating_sub(1),
    };
    state.select(Some(i));
}

pub fn row_next(app: &mut App) {
    let len = app.visible_rows().len();
    list_next(&mut app.row_state, len);
}

pub fn row_previous(app: &mut App) {
    let len = app.visible_rows().len();
    list_previous(&mut app.row_state, len);
}

/// Re-points the selection at `target` after the row list changed shape.
pub fn select_row(app: &mut App, target: &Row) {
    let rows = app.visible_rows();
    let index = rows.iter().position(|row| row == target).unwrap_or(0);
    app.row_state
        .select(if rows.is_empty() { None } else { Some(index) });
}
