use super::Frame;
use crate::state::State;
use crate::ui::widgets::styling;
use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem},
};

/// Render the log panel with the most recent entries.
///
pub fn log(frame: &mut Frame, size: Rect, state: &mut State) {
    let theme = state.get_theme().clone();
    let block = Block::default()
        .title("Log (Ctrl+L: hide)")
        .borders(Borders::ALL)
        .border_style(styling::normal_block_border_style(&theme));

    let visible = size.height.saturating_sub(2) as usize;
    let entries = state.get_log_entries();
    let start = entries.len().saturating_sub(visible);
    let items: Vec<ListItem> = entries[start..]
        .iter()
        .map(|entry| {
            ListItem::new(Line::from(Span::styled(
                entry.clone(),
                styling::dim_text_style(&theme),
            )))
        })
        .collect();

    let list = List::new(items)
        .style(styling::normal_text_style(&theme))
        .block(block);
    frame.render_widget(list, size);
}
