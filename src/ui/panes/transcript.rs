//! Transcript pane rendering

use crate::ui::app::{EntryKind, TranscriptEntry};
use crate::ui::theme::DEFAULT_THEME;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    widgets::{Block, Borders, List, ListItem, Padding, Paragraph},
    Frame,
};

fn entry_style(kind: EntryKind) -> Style {
    match kind {
        EntryKind::Input => Style::default()
            .fg(DEFAULT_THEME.prompt)
            .add_modifier(Modifier::BOLD),
        EntryKind::Output => Style::default().fg(DEFAULT_THEME.fg),
        EntryKind::Debug => Style::default()
            .fg(DEFAULT_THEME.comment)
            .add_modifier(Modifier::ITALIC),
        EntryKind::Error => Style::default().fg(DEFAULT_THEME.error),
    }
}

/// Render the transcript of submitted lines and engine output
pub fn render_transcript_pane(
    frame: &mut Frame,
    area: Rect,
    entries: &[TranscriptEntry],
    show_debug: bool,
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

    let block = Block::default()
        .title(" Transcript ")
        .borders(Borders::ALL)
        .border_style(border_style);

    let visible: Vec<&TranscriptEntry> = entries
        .iter()
        .filter(|e| show_debug || e.kind != EntryKind::Debug)
        .collect();

    if visible.is_empty() {
        let paragraph = Paragraph::new("(type a line and press Enter)")
            .block(block)
            .style(Style::default().fg(DEFAULT_THEME.comment));
        frame.render_widget(paragraph, area);
        return;
    }

    let block = block.padding(Padding::new(1, 0, 0, 0));
    let total_items = visible.len();
    let visible_height = area.height.saturating_sub(2).max(1) as usize;

    // Clamp scroll offset only if content exceeds visible area
    if total_items > visible_height {
        *scroll_offset = (*scroll_offset).min(total_items - visible_height);
    } else {
        *scroll_offset = 0;
    }

    let items: Vec<ListItem> = visible
        .into_iter()
        .skip(*scroll_offset)
        .take(visible_height)
        .map(|entry| ListItem::new(entry.text.as_str()).style(entry_style(entry.kind)))
        .collect();

    frame.render_widget(List::new(items).block(block), area);
}
