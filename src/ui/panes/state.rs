//! Engine state pane: Forth stack and words, or the Prolog database

use crate::forth::Value;
use crate::session::{Language, Session};
use crate::ui::theme::DEFAULT_THEME;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

fn heading(text: &str) -> Line<'static> {
    Line::from(Span::styled(
        text.to_string(),
        Style::default()
            .fg(DEFAULT_THEME.primary)
            .add_modifier(Modifier::BOLD),
    ))
}

fn value_span(value: &Value) -> Span<'static> {
    let color = match value {
        Value::Str(_) => DEFAULT_THEME.string,
        Value::Int(_) | Value::Float(_) => DEFAULT_THEME.number,
    };
    Span::styled(value.repr(), Style::default().fg(color))
}

fn forth_lines(session: &Session) -> Vec<Line<'static>> {
    let engine = session.forth();
    let stack = engine.stack();
    let mut lines = vec![heading(&format!("Stack <{}>", stack.depth()))];

    if stack.is_empty() {
        lines.push(Line::styled("  (empty)", Style::default().fg(DEFAULT_THEME.comment)));
    }
    // Top of stack first
    for (i, value) in stack.items().iter().rev().enumerate() {
        lines.push(Line::from(vec![
            Span::styled(format!("  {:>3}: ", i), Style::default().fg(DEFAULT_THEME.comment)),
            value_span(value),
        ]));
    }

    if let Some(name) = engine.compilation().name.as_deref().filter(|_| engine.is_compiling()) {
        lines.push(Line::default());
        lines.push(Line::styled(
            format!("Compiling {} ...", name),
            Style::default().fg(DEFAULT_THEME.secondary),
        ));
    }

    lines.push(Line::default());
    lines.push(heading("User words"));
    let words = engine.dictionary().user_words();
    if words.is_empty() {
        lines.push(Line::styled("  (none)", Style::default().fg(DEFAULT_THEME.comment)));
    }
    for (name, body) in words {
        lines.push(Line::from(vec![
            Span::styled(format!("  : {} ", name), Style::default().fg(DEFAULT_THEME.word)),
            Span::styled(format!("{} ;", body.join(" ")), Style::default().fg(DEFAULT_THEME.fg)),
        ]));
    }
    lines
}

fn prolog_lines(session: &Session) -> Vec<Line<'static>> {
    let engine = session.prolog();
    let database = engine.database();
    let mut lines = vec![heading(&format!(
        "Database ({} clauses){}",
        database.clause_count(),
        if engine.is_tracing() { " [trace]" } else { "" }
    ))];

    if database.is_empty() {
        lines.push(Line::styled("  (empty)", Style::default().fg(DEFAULT_THEME.comment)));
    }
    for text in database.listing() {
        lines.push(Line::styled(format!("  {}", text), Style::default().fg(DEFAULT_THEME.fg)));
    }
    lines
}

/// Render the state of the active engine
pub fn render_state_pane(
    frame: &mut Frame,
    area: Rect,
    session: &Session,
    language: Language,
    is_focused: bool,
    scroll_offset: &mut usize,
) {
    let border_style = if is_focused {
        Style::default()
            .fg(DEFAULT_THEME.border_focused)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(DEFAULT_THEME.border_normal)
    };

    let lines = match language {
        Language::Forth => forth_lines(session),
        Language::Prolog => prolog_lines(session),
    };

    let visible_height = area.height.saturating_sub(2).max(1) as usize;
    *scroll_offset = (*scroll_offset).min(lines.len().saturating_sub(visible_height));

    let block = Block::default()
        .title(format!(" {} state ", language))
        .borders(Borders::ALL)
        .border_style(border_style);

    let paragraph = Paragraph::new(lines)
        .block(block)
        .scroll((*scroll_offset as u16, 0));
    frame.render_widget(paragraph, area);
}
