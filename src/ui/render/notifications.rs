use super::Frame;
use crate::state::State;
use crate::ui::widgets::styling;
use ratatui::{
    layout::Rect,
    style::Modifier,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem},
};

/// Render the notifications popup over the picker view.
///
pub fn popup(frame: &mut Frame, area: Rect, state: &mut State) {
    let theme = state.get_theme().clone();
    let rect = super::all::centered_rect(60, 60, area);

    let unread = state.unread_count();
    let title = if unread > 0 {
        format!("Notifications ({} unread) · r: mark all read · Esc: close", unread)
    } else {
        "Notifications · Esc: close".to_string()
    };
    let block = Block::default()
        .title(Span::styled(title, styling::active_block_title_style()))
        .borders(Borders::ALL)
        .border_style(styling::active_block_border_style(&theme));

    let feed = state.get_notifications();
    let items: Vec<ListItem> = if feed.is_empty() {
        vec![ListItem::new(Line::from(Span::styled(
            "No notifications",
            styling::dim_text_style(&theme),
        )))]
    } else {
        feed.iter()
            .map(|notification| {
                let message_style = if notification.is_read {
                    styling::normal_text_style(&theme)
                } else {
                    styling::normal_text_style(&theme).add_modifier(Modifier::BOLD)
                };
                let mut spans = vec![];
                if !notification.is_read {
                    spans.push(Span::styled(
                        "• ",
                        styling::active_list_item_style(&theme),
                    ));
                } else {
                    spans.push(Span::raw("  "));
                }
                spans.push(Span::styled(notification.message.clone(), message_style));
                ListItem::new(vec![
                    Line::from(spans),
                    Line::from(Span::styled(
                        format!("  {}", notification.created_at),
                        styling::dim_text_style(&theme),
                    )),
                ])
            })
            .collect()
    };

    let list = List::new(items)
        .style(styling::normal_text_style(&theme))
        .block(block);

    frame.render_widget(Clear, rect);
    frame.render_widget(list, rect);
}
