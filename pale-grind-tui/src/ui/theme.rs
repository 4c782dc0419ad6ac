// src/ui/theme.rs
use pale_grind_lib::{parse_color, Difficulty, StandardColor};
use ratatui::style::Color;

// Terminal palette: the plain names are the bright variants
const fn to_ratatui(color: StandardColor) -> Color {
    match color {
        StandardColor::Black => Color::Black,
        StandardColor::Red => Color::LightRed,
        StandardColor::Green => Color::LightGreen,
        StandardColor::Yellow => Color::LightYellow,
        StandardColor::Blue => Color::LightBlue,
        StandardColor::Magenta => Color::LightMagenta,
        StandardColor::Cyan => Color::LightCyan,
        StandardColor::White => Color::White,
        StandardColor::DarkGrey => Color::DarkGray,
        StandardColor::DarkRed => Color::Red,
        StandardColor::DarkGreen => Color::Green,
        StandardColor::DarkYellow => Color::Yellow,
        StandardColor::DarkBlue => Color::Blue,
        StandardColor::DarkMagenta => Color::Magenta,
        StandardColor::DarkCyan => Color::Cyan,
        StandardColor::Grey => Color::Gray,
    }
}

/// Resolves a configured color name, using `fallback` for unknown names.
pub fn color_or(name: &str, fallback: Color) -> Color {
    parse_color(name).map_or(fallback, to_ratatui)
}

pub const fn difficulty_color(difficulty: Difficulty) -> Color {
    match difficulty {
        Difficulty::Easy => Color::LightGreen,
        Difficulty::Medium => Color::LightYellow,
        Difficulty::Hard => Color::LightRed,
    }
}
