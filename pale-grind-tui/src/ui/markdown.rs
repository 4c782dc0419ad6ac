// src/ui/markdown.rs
//! Best-effort markdown for tip text: headings, bullet and numbered lists,
//! rules, `**bold**`, `*italic*` and `` `code` ``. Anything unrecognised is
//! shown verbatim; rendering never fails.
use ratatui::{
    style::{Color, Modifier, Style},
    text::{Line, Span},
};

pub fn render_markdown(text: &str, accent: Color) -> Vec<Line<'static>> {
    text.lines().map(|line| render_line(line, accent)).collect()
}

fn render_line(line: &str, accent: Color) -> Line<'static> {
    let line = line.trim_end();
    let trimmed = line.trim_start();
    if trimmed.is_empty() {
        return Line::default();
    }

    if let Some((level, title)) = heading(trimmed) {
        let mut style = Style::default().fg(accent).add_modifier(Modifier::BOLD);
        if level <= 2 {
            style = style.add_modifier(Modifier::UNDERLINED);
        }
        return Line::from(inline_spans(title, style));
    }

    if trimmed.chars().all(|c| matches!(c, '-' | '*' | '_')) && trimmed.len() >= 3 {
        return Line::from(Span::styled("─".repeat(30), Style::default().fg(Color::DarkGray)));
    }

    let depth = (line.len() - trimmed.len()) / 2;
    let indent = "  ".repeat(depth);

    if let Some(item) = ["* ", "- ", "+ "]
        .iter()
        .find_map(|bullet| trimmed.strip_prefix(bullet))
    {
        let mut spans = vec![Span::styled(
            format!("{indent}  • "),
            Style::default().fg(accent),
        )];
        spans.extend(inline_spans(item, Style::default()));
        return Line::from(spans);
    }

    if let Some((number, item)) = numbered(trimmed) {
        let mut spans = vec![Span::styled(
            format!("{indent}  {number}. "),
            Style::default().fg(accent),
        )];
        spans.extend(inline_spans(item, Style::default()));
        return Line::from(spans);
    }

    Line::from(inline_spans(trimmed, Style::default()))
}

// "### Title" -> (3, "Title")
fn heading(line: &str) -> Option<(usize, &str)> {
    let level = line.chars().take_while(|&c| c == '#').count();
    if level == 0 || level > 6 {
        return None;
    }
    line[level..].strip_prefix(' ').map(|title| (level, title.trim()))
}

// "12. Item" -> ("12", "Item")
fn numbered(line: &str) -> Option<(&str, &str)> {
    let digits = line.chars().take_while(char::is_ascii_digit).count();
    if digits == 0 {
        return None;
    }
    line[digits..]
        .strip_prefix(". ")
        .map(|item| (&line[..digits], item))
}

fn inline_spans(text: &str, base: Style) -> Vec<Span<'static>> {
    let mut spans = Vec::new();
    let mut buf = String::new();
    let mut bold = false;
    let mut italic = false;
    let mut code = false;
    let mut rest = text;

    while let Some(c) = rest.chars().next() {
        if c == '`' && (code || rest[1..].contains('`')) {
            flush(&mut spans, &mut buf, style_for(base, bold, italic, code));
            code = !code;
            rest = &rest[1..];
            continue;
        }
        if !code {
            if let Some(marker) = ["**", "__"].into_iter().find(|m| rest.starts_with(m)) {
                let after = &rest[2..];
                if bold || opens(after, marker) {
                    flush(&mut spans, &mut buf, style_for(base, bold, italic, code));
                    bold = !bold;
                    rest = after;
                    continue;
                }
            } else if c == '*' {
                let after = &rest[1..];
                if italic || opens(after, "*") {
                    flush(&mut spans, &mut buf, style_for(base, bold, italic, code));
                    italic = !italic;
                    rest = after;
                    continue;
                }
            }
        }
        buf.push(c);
        rest = &rest[c.len_utf8()..];
    }
    flush(&mut spans, &mut buf, style_for(base, bold, italic, code));
    spans
}

// An opening marker needs text right after it and a closing marker later on
fn opens(after: &str, marker: &str) -> bool {
    after.chars().next().is_some_and(|c| !c.is_whitespace()) && after.contains(marker)
}

fn style_for(base: Style, bold: bool, italic: bool, code: bool) -> Style {
    let mut style = base;
    if bold {
        style = style.add_modifier(Modifier::BOLD);
    }
    if italic {
        style = style.add_modifier(Modifier::ITALIC);
    }
    if code {
        style = style.fg(Color::LightCyan);
    }
    style
}

fn flush(spans: &mut Vec<Span<'static>>, buf: &mut String, style: Style) {
    if !buf.is_empty() {
        spans.push(Span::styled(std::mem::take(buf), style));
    }
}
