use super::Frame;
use crate::state::{Focus, State};
use crate::ui::widgets::styling;
use crate::utils::text_processing::truncate_text;
use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};

/// Render the footer: transient notices take priority, then the pending
/// selection and the hints for the focused panel.
///
pub fn footer(frame: &mut Frame, size: Rect, state: &mut State) {
    let theme = state.get_theme().clone();
    let compact = state.get_terminal_size().width < 100;
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(styling::normal_block_border_style(&theme));

    let line = if state.is_submit_in_flight() {
        Line::from(Span::styled(
            "Submitting selection…".to_string(),
            styling::highlight_text_style(&theme),
        ))
    } else if let Some(notice) = state.get_notice() {
        Line::from(Span::styled(
            notice.to_owned(),
            styling::highlight_text_style(&theme),
        ))
    } else {
        let mut spans = vec![];
        if let Some(selected) = state.picker().selected() {
            spans.push(Span::styled(
                format!(
                    "Selected: {} (id {})",
                    truncate_text(&selected.name, 40),
                    selected.id
                ),
                styling::active_list_item_style(&theme),
            ));
            spans.push(Span::styled("  ·  ", styling::dim_text_style(&theme)));
        }
        let hints = match (state.current_focus(), compact) {
            (Focus::TypeBar, false) => {
                "←/→: entity type · Tab: focus · Ctrl+N: notifications · Ctrl+C: quit"
            }
            (Focus::TypeBar, true) => "←/→: type · Tab · Ctrl+C: quit",
            (Focus::Search, false) => {
                "type to search · ↓: results · Tab: focus · Ctrl+N: notifications"
            }
            (Focus::Search, true) => "type to search · ↓: results",
            (Focus::Results, false) => {
                "↑/↓: move · Enter: select · m: more · s: submit · y: copy id · r: retry"
            }
            (Focus::Results, true) => "↑/↓ · Enter: select · s: submit",
        };
        spans.push(Span::styled(
            hints.to_owned(),
            styling::dim_text_style(&theme),
        ));
        let unread = state.unread_count();
        if unread > 0 {
            spans.push(Span::styled(
                format!("  ·  {} unread", unread),
                styling::highlight_text_style(&theme),
            ));
        }
        Line::from(spans)
    };

    frame.render_widget(Paragraph::new(line).block(block), size);
}
