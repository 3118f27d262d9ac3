//! Input line rendering

use crate::session::Language;
use crate::ui::theme::DEFAULT_THEME;
use ratatui::{
    layout::{Position, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

/// Render the prompt and the line being edited, placing the cursor
pub fn render_input_pane(
    frame: &mut Frame,
    area: Rect,
    language: Language,
    input: &str,
    cursor: usize,
) {
    let prompt = language.prompt();
    let block = Block::default()
        .title(" Input ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(DEFAULT_THEME.border_focused));

    let line = Line::from(vec![
        Span::styled(
            prompt,
            Style::default()
                .fg(DEFAULT_THEME.prompt)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(input, Style::default().fg(DEFAULT_THEME.fg)),
    ]);
    frame.render_widget(Paragraph::new(line).block(block), area);

    let column = (prompt.chars().count() + cursor) as u16;
    let x = area.x.saturating_add(1).saturating_add(column);
    frame.set_cursor_position(Position::new(x.min(area.right().saturating_sub(2)), area.y + 1));
}
