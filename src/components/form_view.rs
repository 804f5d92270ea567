// ABOUTME: Shared palette and drawing helpers for the wizard screens
// Renders text fields, option lists, key hints, and the framed wizard shell

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use super::focus_group::FocusGroup;
use super::text_field::TextField;

// Color palette from TUI style guide
pub const CORNFLOWER_BLUE: Color = Color::Rgb(100, 149, 237);
pub const GOLD: Color = Color::Rgb(255, 215, 0);
pub const SELECTION_GREEN: Color = Color::Rgb(100, 200, 100);
pub const DARK_BG: Color = Color::Rgb(25, 25, 35);
pub const PANEL_BG: Color = Color::Rgb(30, 30, 40);
pub const SOFT_WHITE: Color = Color::Rgb(220, 220, 230);
pub const MUTED_GRAY: Color = Color::Rgb(120, 120, 140);
pub const SUBDUED_BORDER: Color = Color::Rgb(60, 60, 80);
pub const ERROR_RED: Color = Color::Rgb(220, 80, 80);

const LABEL_WIDTH: usize = 16;
const CURSOR: &str = "│";

/// Draw the header/content/footer shell and return the content area
pub fn render_shell(frame: &mut Frame, area: Rect, title: &str, help: Line<'static>) -> Rect {
    frame.render_widget(Clear, area);
    frame.render_widget(Block::default().style(Style::default().bg(DARK_BG)), area);

    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Title
            Constraint::Min(5),    // Step content
            Constraint::Length(2), // Key hints
        ])
        .split(area);

    let header = Block::default()
        .borders(Borders::BOTTOM)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(CORNFLOWER_BLUE))
        .style(Style::default().bg(PANEL_BG));
    let title = Paragraph::new(Line::from(Span::styled(
        title.to_string(),
        Style::default().fg(GOLD).add_modifier(Modifier::BOLD),
    )))
    .alignment(Alignment::Center)
    .block(header);
    frame.render_widget(title, layout[0]);

    let footer = Paragraph::new(help)
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::TOP)
                .border_style(Style::default().fg(SUBDUED_BORDER)),
        );
    frame.render_widget(footer, layout[2]);

    layout[1]
}

/// Rounded panel with a gold title; returns the inner area
pub fn render_panel(frame: &mut Frame, area: Rect, title: &str) -> Rect {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(CORNFLOWER_BLUE))
        .style(Style::default().bg(PANEL_BG))
        .title(format!(" {title} "))
        .title_style(Style::default().fg(GOLD).add_modifier(Modifier::BOLD));

    let inner = block.inner(area);
    frame.render_widget(block, area);
    inner
}

/// `key action • key action` hint line
pub fn help_line(bindings: &[(&str, &str)]) -> Line<'static> {
    let mut spans = Vec::new();
    for (idx, (key, action)) in bindings.iter().enumerate() {
        if idx > 0 {
            spans.push(Span::styled(" • ", Style::default().fg(SUBDUED_BORDER)));
        }
        spans.push(Span::styled(key.to_string(), Style::default().fg(GOLD)));
        spans.push(Span::styled(format!(" {action}"), Style::default().fg(MUTED_GRAY)));
    }
    Line::from(spans)
}

/// Radio-style option list with a description under each entry
pub fn option_lines(options: &[(&str, &str)], selected: usize) -> Vec<Line<'static>> {
    let mut lines = Vec::new();
    for (idx, (name, description)) in options.iter().enumerate() {
        let (symbol, style) = if idx == selected {
            ("● ", Style::default().fg(GOLD).add_modifier(Modifier::BOLD))
        } else {
            ("○ ", Style::default().fg(SOFT_WHITE))
        };
        lines.push(Line::from(vec![
            Span::styled(if idx == selected { "▶ " } else { "  " }, Style::default().fg(GOLD)),
            Span::styled(symbol, style),
            Span::styled(name.to_string(), style),
        ]));
        lines.push(Line::from(Span::styled(
            format!("      {description}"),
            Style::default().fg(MUTED_GRAY),
        )));
    }
    lines
}

/// One field as a label/value row, plus its hint when present
pub fn field_lines(field: &TextField, cursor_visible: bool) -> Vec<Line<'static>> {
    let focused = field.is_focused();
    let label_style = if focused {
        Style::default().fg(GOLD).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(SOFT_WHITE)
    };

    let mut spans = vec![
        Span::styled(if focused { "▶ " } else { "  " }, Style::default().fg(GOLD)),
        Span::styled(format!("{:<width$}", field.label(), width = LABEL_WIDTH), label_style),
    ];

    if field.is_empty() && !field.placeholder().is_empty() {
        if focused && cursor_visible {
            spans.push(Span::styled(CURSOR, Style::default().fg(GOLD)));
        }
        spans.push(Span::styled(
            field.placeholder().to_string(),
            Style::default().fg(MUTED_GRAY).add_modifier(Modifier::ITALIC),
        ));
    } else {
        let text = field.display();
        if focused && cursor_visible {
            let split = text
                .char_indices()
                .nth(field.cursor())
                .map_or(text.len(), |(i, _)| i);
            let (before, after) = text.split_at(split);
            spans.push(Span::styled(before.to_string(), Style::default().fg(SOFT_WHITE)));
            spans.push(Span::styled(CURSOR, Style::default().fg(GOLD)));
            spans.push(Span::styled(after.to_string(), Style::default().fg(SOFT_WHITE)));
        } else {
            spans.push(Span::styled(text, Style::default().fg(SOFT_WHITE)));
        }
    }

    let mut lines = vec![Line::from(spans)];
    if let Some(hint) = field.hint() {
        lines.push(Line::from(Span::styled(
            format!("  {:width$}{hint}", "", width = LABEL_WIDTH),
            Style::default().fg(MUTED_GRAY),
        )));
    }
    lines
}

/// All fields of a group, in order
pub fn group_lines(group: &FocusGroup, cursor_visible: bool) -> Vec<Line<'static>> {
    group
        .fields()
        .iter()
        .flat_map(|field| field_lines(field, cursor_visible))
        .collect()
}

pub fn error_line(message: &str) -> Line<'static> {
    Line::from(Span::styled(
        format!("Error: {message}"),
        Style::default().fg(ERROR_RED).add_modifier(Modifier::BOLD),
    ))
}

pub fn subtitle_line(text: &str) -> Line<'static> {
    Line::from(Span::styled(
        text.to_string(),
        Style::default().fg(CORNFLOWER_BLUE).add_modifier(Modifier::BOLD),
    ))
}

/// Render prepared lines into a panel body with wrapping
pub fn render_lines(frame: &mut Frame, area: Rect, lines: Vec<Line<'static>>) {
    let body = Paragraph::new(lines)
        .style(Style::default().bg(PANEL_BG))
        .wrap(Wrap { trim: false });
    frame.render_widget(body, area);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line_text(line: &Line) -> String {
        line.spans.iter().map(|s| &*s.content).collect()
    }

    #[test]
    fn test_field_line_shows_cursor_at_position() {
        let mut field = TextField::new("Host:").with_value("db");
        field.focus();
        field.cursor_left();
        let lines = field_lines(&field, true);
        assert!(line_text(&lines[0]).ends_with("d│b"));

        let hidden = field_lines(&field, false);
        assert!(line_text(&hidden[0]).ends_with("db"));
    }

    #[test]
    fn test_masked_field_never_shows_secret() {
        let field = TextField::new("Password:").masked().with_value("hunter2");
        let text = line_text(&field_lines(&field, true)[0]);
        assert!(!text.contains("hunter2"));
        assert!(text.contains("•••••••"));
    }

    #[test]
    fn test_hint_adds_second_line() {
        let field = TextField::new("Database:").with_hint("target database");
        let lines = field_lines(&field, false);
        assert_eq!(lines.len(), 2);
        assert!(line_text(&lines[1]).contains("target database"));
    }

    #[test]
    fn test_help_line_joins_bindings() {
        let line = help_line(&[("enter", "select"), ("esc", "back")]);
        assert_eq!(line_text(&line), "enter select • esc back");
    }

    #[test]
    fn test_option_lines_mark_selection() {
        let lines = option_lines(&[("One", "first"), ("Two", "second")], 1);
        assert_eq!(lines.len(), 4);
        assert!(line_text(&lines[0]).contains("○ One"));
        assert!(line_text(&lines[2]).contains("● Two"));
    }
}
