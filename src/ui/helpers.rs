use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};

/// Produce a rectangle centered within `area` that spans the requested percent
/// of the width and height. Used for modal dialogs.
pub(crate) fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(area);

    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(horizontal[1]);

    vertical[1]
}

/// Column of the input cursor within a field row: after the `Label: ` prefix
/// and the typed text, pinned to the last column of a `width`-wide area.
pub(crate) fn cursor_offset(prefix_len: usize, value_len: usize, width: u16) -> u16 {
    let column = prefix_len.saturating_add(value_len);
    u16::try_from(column)
        .unwrap_or(u16::MAX)
        .min(width.saturating_sub(1))
}

/// Build a footer line from `(key, description)` pairs.
pub(crate) fn key_hints(hints: &[(&'static str, &'static str)]) -> Line<'static> {
    let mut spans = Vec::with_capacity(hints.len() * 3);
    for (idx, (key, action)) in hints.iter().enumerate() {
        if idx > 0 {
            spans.push(Span::raw("  "));
        }
        spans.push(Span::styled(*key, Style::default().fg(Color::Yellow)));
        spans.push(Span::raw(format!(" {action}")));
    }
    Line::from(spans)
}

/// Bordered box with a caption and one large value, used for the statistics.
pub(crate) fn metric_card(title: &'static str, value: String) -> Paragraph<'static> {
    Paragraph::new(Line::from(Span::styled(
        value,
        Style::default().add_modifier(Modifier::BOLD),
    )))
    .alignment(Alignment::Center)
    .block(Block::default().title(title).borders(Borders::ALL))
}
