use super::Frame;
use crate::state::{State, View};
use ratatui::layout::{Constraint, Direction, Layout, Rect};

/// Render the whole interface according to state.
///
pub fn all(frame: &mut Frame, state: &mut State) {
    let area = frame.size();
    match state.current_view() {
        View::Welcome => super::welcome::welcome(frame, area, state),
        View::Picker => picker_view(frame, area, state),
    }
}

/// The picker view: entity type bar, query input, results, optional log
/// panel, footer. The notifications popup overlays everything.
///
fn picker_view(frame: &mut Frame, area: Rect, state: &mut State) {
    let constraints = if state.is_log_open() {
        vec![
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Min(5),
            Constraint::Length(8),
            Constraint::Length(3),
        ]
    } else {
        vec![
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Min(5),
            Constraint::Length(3),
        ]
    };
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(area);

    super::picker::type_bar(frame, chunks[0], state);
    super::picker::search_input(frame, chunks[1], state);
    super::picker::results(frame, chunks[2], state);
    if state.is_log_open() {
        super::log::log(frame, chunks[3], state);
        super::footer::footer(frame, chunks[4], state);
    } else {
        super::footer::footer(frame, chunks[3], state);
    }

    if state.is_notifications_open() {
        super::notifications::popup(frame, area, state);
    }
}

/// Centered popup rectangle, clamped to the given area.
///
pub fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);
    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1]);
    horizontal[1]
}
