use super::Frame;
use crate::state::State;
use crate::ui::widgets::{spinner, styling};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};

const BANNER: &str = r#"
        _
  _ __ | | __ _ _ __  _ __ ___  __ _
 | '_ \| |/ _` | '_ \| '__/ _ \/ _` |
 | |_) | | (_| | | | | | |  __/ (_| |
 | .__/|_|\__,_|_| |_|_|  \___|\__, |
 |_|                           |___/
"#;

/// Render the welcome screen: banner, session onboarding input, and any
/// authentication error.
///
pub fn welcome(frame: &mut Frame, area: Rect, state: &mut State) {
    let theme = state.get_theme().clone();
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(8),
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Min(1),
        ])
        .split(area);

    let banner = Paragraph::new(BANNER)
        .style(styling::banner_style(&theme))
        .alignment(Alignment::Center);
    frame.render_widget(banner, chunks[0]);

    // Connecting spinner while a configured session bootstraps.
    if state.has_session() && !state.is_session_ready() && state.get_auth_error().is_none() {
        let connecting = Paragraph::new(Line::from(vec![
            Span::styled(
                spinner::frame(state.get_spinner_index()),
                styling::active_list_item_style(&theme),
            ),
            Span::styled(" Connecting to the registry…", styling::dim_text_style(&theme)),
        ]))
        .alignment(Alignment::Center);
        frame.render_widget(connecting, chunks[1]);
        return;
    }

    let input_block = Block::default()
        .title(Span::styled(
            "Session cookie (paste from your browser, Enter to connect)",
            styling::active_block_title_style(),
        ))
        .borders(Borders::ALL)
        .border_style(styling::active_block_border_style(&theme));
    let masked: String = state.get_session_input().chars().map(|_| '*').collect();
    let input = Paragraph::new(Line::from(vec![
        Span::styled(masked, styling::normal_text_style(&theme)),
        Span::styled("█", styling::dim_text_style(&theme)),
    ]))
    .block(input_block);
    frame.render_widget(input, chunks[1]);

    if let Some(error) = state.get_auth_error() {
        let error_line = Paragraph::new(Line::from(Span::styled(
            error.to_owned(),
            styling::error_text_style(&theme),
        )))
        .alignment(Alignment::Center);
        frame.render_widget(error_line, chunks[2]);
    }
}
