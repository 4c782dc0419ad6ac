// src/ui/sections.rs
use crate::{
    app::{App, Row},
    ui::theme::{color_or, difficulty_color},
};
use pale_grind_lib::{ExerciseKey, SectionProgress};
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style, Stylize},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem},
    Frame,
};

pub fn render_sections(f: &mut Frame, app: &mut App, area: Rect) {
    let progress = app.session.section_progress();
    let items: Vec<ListItem> = app
        .visible_rows()
        .iter()
        .map(|row| match row {
            Row::Section(index) => section_item(app, *index, progress.get(*index)),
            Row::Exercise(key) => exercise_item(app, key),
        })
        .collect();

    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("Workout Plan")
                .border_style(Style::default().fg(Color::DarkGray)),
        )
        .highlight_style(Style::default().bg(Color::DarkGray).add_modifier(Modifier::BOLD))
        .highlight_symbol("> ");

    f.render_stateful_widget(list, area, &mut app.row_state);
}

fn section_item<'a>(
    app: &App,
    index: usize,
    progress: Option<&SectionProgress>,
) -> ListItem<'a> {
    let Some(section) = app.session.catalog().sections().get(index) else {
        return ListItem::new("");
    };
    let expanded = app.expanded_section.as_deref() == Some(section.id.as_str());
    let color = color_or(&section.color, Color::LightCyan);
    let (done, total) = progress.map_or((0, 0), |p| (p.completed, p.total));
    let count_style = if progress.is_some_and(SectionProgress::is_done) {
        Style::default().fg(Color::LightGreen).bold()
    } else {
        Style::default().fg(Color::Gray)
    };

    ListItem::new(Line::from(vec![
        Span::styled(if expanded { "▼ " } else { "▶ " }, Style::default().fg(color)),
        Span::raw(format!("{} ", section.icon)),
        Span::styled(section.title.clone(), Style::default().fg(color).bold()),
        Span::raw("  "),
        Span::styled(format!("{done}/{total}"), count_style),
    ]))
}

fn exercise_item<'a>(app: &App, key: &ExerciseKey) -> ListItem<'a> {
    let Some(exercise) = app.session.catalog().exercise(key) else {
        return ListItem::new("");
    };
    let complete = app.session.is_complete(key);

    let (mark, name_style) = if complete {
        (
            Span::styled("  [✓] ", Style::default().fg(Color::LightGreen)),
            Style::default()
                .fg(Color::DarkGray)
                .add_modifier(Modifier::CROSSED_OUT),
        )
    } else {
        (Span::raw("  [ ] "), Style::default().bold())
    };
    let mut title = vec![mark, Span::styled(exercise.name.clone(), name_style)];
    if app.session.tip().target() == Some(exercise.name.as_str()) {
        title.push(Span::styled("  💡", Style::default().fg(Color::LightYellow)));
    }

    let mut details = vec![
        Span::raw("      "),
        Span::raw(format!("{} × {}", exercise.sets, exercise.reps)),
        Span::styled("  ·  ", Style::default().fg(Color::DarkGray)),
        Span::raw(exercise.weight.clone()),
        Span::styled("  ·  ", Style::default().fg(Color::DarkGray)),
        Span::styled(
            exercise.difficulty.to_string(),
            Style::default().fg(difficulty_color(exercise.difficulty)),
        ),
    ];
    if !complete {
        details.push(Span::styled(
            format!("  Set {}/{}", app.session.current_set(key), exercise.sets),
            Style::default().fg(color_or(&app.service.config.theme.accent_color, Color::LightMagenta)),
        ));
        if app.session.tips_available() {
            details.push(Span::styled("  [t] tips", Style::default().fg(Color::DarkGray)));
        }
    }

    ListItem::new(vec![Line::from(title), Line::from(details)])
}
