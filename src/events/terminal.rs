use crate::api::EntityType;
use crate::state::{Focus, State, View};
use anyhow::Result;
use clipboard::{ClipboardContext, ClipboardProvider};
use crossterm::{
    event,
    event::{Event as CrosstermEvent, KeyCode, KeyEvent, KeyModifiers},
};
use log::*;
use std::{sync::mpsc, thread, time::Duration, time::Instant};

/// Specify terminal event poll rate in milliseconds.
///
const TICK_RATE_IN_MS: u64 = 60;

/// Specify different terminal event types.
///
#[derive(Debug)]
pub enum Event<I> {
    Input(I),
    Tick,
}

/// Specify struct for managing terminal events channel.
///
pub struct Handler {
    rx: mpsc::Receiver<Event<KeyEvent>>,
    _tx: mpsc::Sender<Event<KeyEvent>>,
}

impl Handler {
    /// Return new instance after spawning new input polling thread.
    ///
    pub fn new() -> Self {
        let (tx, rx) = mpsc::channel();
        let tx_clone = tx.clone();
        thread::spawn(move || loop {
            let tick_rate = Duration::from_millis(TICK_RATE_IN_MS);
            if event::poll(tick_rate).unwrap() {
                if let CrosstermEvent::Key(key) = event::read().unwrap() {
                    tx_clone.send(Event::Input(key)).unwrap();
                }
            }
            tx_clone.send(Event::Tick).unwrap();
        });
        Handler { rx, _tx: tx }
    }

    /// Receive next terminal event and handle it accordingly. Returns result
    /// with value true if should continue or false if exit was requested.
    ///
    pub fn handle_next(&self, state: &mut State) -> Result<bool> {
        match self.rx.recv()? {
            Event::Input(event) => Ok(Self::handle_key(state, event)),
            Event::Tick => {
                state.on_tick(Instant::now());
                Ok(true)
            }
        }
    }

    /// Route one key event according to the current view and focus. Returns
    /// false when an exit was requested.
    ///
    pub fn handle_key(state: &mut State, event: KeyEvent) -> bool {
        if event.code == KeyCode::Char('c') && event.modifiers.contains(KeyModifiers::CONTROL) {
            debug!("Processing exit terminal event '{:?}'...", event);
            return false;
        }

        match state.current_view() {
            View::Welcome => Self::handle_welcome_key(state, event),
            View::Picker => Self::handle_picker_key(state, event),
        }
        true
    }

    /// Session onboarding: every printable character goes into the cookie
    /// input field.
    ///
    fn handle_welcome_key(state: &mut State, event: KeyEvent) {
        match event.code {
            KeyCode::Char(c) if !event.modifiers.contains(KeyModifiers::CONTROL) => {
                if state.get_auth_error().is_some() {
                    state.clear_auth_error();
                }
                state.add_session_input_char(c);
            }
            KeyCode::Backspace => {
                state.backspace_session_input();
            }
            KeyCode::Enter => {
                debug!("Processing session input submit event...");
                state.submit_session_input();
            }
            _ => {}
        }
    }

    fn handle_picker_key(state: &mut State, event: KeyEvent) {
        // The notifications popup swallows input while open.
        if state.is_notifications_open() {
            match event.code {
                KeyCode::Char('r') => {
                    debug!("Processing mark-all-read event...");
                    state.mark_all_notifications_read();
                }
                KeyCode::Esc | KeyCode::Char('n') => {
                    state.close_notifications();
                }
                _ => {}
            }
            return;
        }

        if event.modifiers.contains(KeyModifiers::CONTROL) {
            match event.code {
                KeyCode::Char('n') => {
                    state.toggle_notifications();
                }
                KeyCode::Char('l') => {
                    state.toggle_log();
                }
                _ => {}
            }
            return;
        }

        match event.code {
            KeyCode::Tab => {
                state.focus_next();
            }
            KeyCode::BackTab => {
                state.focus_prev();
            }
            _ => match state.current_focus() {
                Focus::TypeBar => Self::handle_type_bar_key(state, event),
                Focus::Search => Self::handle_search_key(state, event),
                Focus::Results => Self::handle_results_key(state, event),
            },
        }
    }

    /// Entity type tabs: arrows switch the active collection, digits jump.
    ///
    fn handle_type_bar_key(state: &mut State, event: KeyEvent) {
        match event.code {
            KeyCode::Left | KeyCode::Char('h') => {
                state.change_entity_prev();
                state.set_focus(Focus::TypeBar);
            }
            KeyCode::Right | KeyCode::Char('l') => {
                state.change_entity_next();
                state.set_focus(Focus::TypeBar);
            }
            KeyCode::Char('1') => {
                state.change_entity(EntityType::Organization);
            }
            KeyCode::Char('2') => {
                state.change_entity(EntityType::Ministry);
            }
            KeyCode::Char('3') => {
                state.change_entity(EntityType::Region);
            }
            KeyCode::Enter | KeyCode::Down => {
                state.set_focus(Focus::Search);
            }
            _ => {}
        }
    }

    /// Query input: all printable characters feed the debounced search.
    ///
    fn handle_search_key(state: &mut State, event: KeyEvent) {
        match event.code {
            KeyCode::Char(c) => {
                state.add_query_char(c);
            }
            KeyCode::Backspace => {
                state.backspace_query();
            }
            KeyCode::Esc => {
                state.clear_query();
            }
            KeyCode::Up => {
                state.set_focus(Focus::TypeBar);
            }
            KeyCode::Down | KeyCode::Enter => {
                if !state.picker().active_state().hits().is_empty() {
                    state.set_focus(Focus::Results);
                }
            }
            _ => {}
        }
    }

    /// Results list: navigate, select, paginate, submit.
    ///
    fn handle_results_key(state: &mut State, event: KeyEvent) {
        match event.code {
            KeyCode::Down | KeyCode::Char('j') => {
                state.cursor_down();
            }
            KeyCode::Up | KeyCode::Char('k') => {
                state.cursor_up();
            }
            KeyCode::Enter => {
                state.select_under_cursor();
            }
            KeyCode::Char('m') => {
                state.load_more();
            }
            KeyCode::Char('r') => {
                state.retry_search();
            }
            KeyCode::Char('s') => {
                state.submit_selection();
            }
            KeyCode::Char('y') => {
                Self::copy_selection(state);
            }
            KeyCode::Esc => {
                state.set_focus(Focus::Search);
            }
            _ => {}
        }
    }

    /// Copy the selected entity id to the system clipboard.
    ///
    fn copy_selection(state: &mut State) {
        let value = state.picker().pending_field_value();
        if value.is_empty() {
            state.set_notice("Nothing selected to copy");
            return;
        }
        let context: Result<ClipboardContext, _> = ClipboardProvider::new();
        match context {
            Ok(mut context) => {
                if let Err(e) = context.set_contents(value.clone()) {
                    error!("Failed to copy to clipboard: {}", e);
                    state.set_notice("Clipboard unavailable");
                } else {
                    state.set_notice(&format!("Copied id {}", value));
                }
            }
            Err(e) => {
                error!("Failed to open clipboard: {}", e);
                state.set_notice("Clipboard unavailable");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::EntityHit;
    use std::sync::mpsc as std_mpsc;
    use std::time::Duration;

    fn test_state() -> (State, std_mpsc::Receiver<crate::events::network::Event>) {
        let (tx, rx) = std_mpsc::channel();
        let (save_tx, _save_rx) = std_mpsc::channel();
        let mut state = State::new(
            tx,
            save_tx,
            Duration::from_millis(300),
            2,
            true,
            crate::ui::Theme::default(),
        );
        state.set_session_ready();
        (state, rx)
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn hits(n: usize) -> Vec<EntityHit> {
        (0..n)
            .map(|i| EntityHit {
                id: i as i64 + 1,
                name: format!("Entity {}", i + 1),
                okpo: None,
                ynp: None,
                ministry: None,
            })
            .collect()
    }

    #[test]
    fn ctrl_c_requests_exit() {
        let (mut state, _rx) = test_state();
        let event = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert!(!Handler::handle_key(&mut state, event));
    }

    #[test]
    fn typed_characters_reach_the_query() {
        let (mut state, _rx) = test_state();
        assert!(Handler::handle_key(&mut state, key(KeyCode::Char('a'))));
        Handler::handle_key(&mut state, key(KeyCode::Char('z')));
        assert_eq!(state.picker().active_state().query(), "az");

        Handler::handle_key(&mut state, key(KeyCode::Backspace));
        assert_eq!(state.picker().active_state().query(), "a");
    }

    #[test]
    fn tab_cycles_focus_panels() {
        let (mut state, _rx) = test_state();
        assert_eq!(state.current_focus(), Focus::Search);
        Handler::handle_key(&mut state, key(KeyCode::Tab));
        assert_eq!(state.current_focus(), Focus::Results);
        Handler::handle_key(&mut state, key(KeyCode::Tab));
        assert_eq!(state.current_focus(), Focus::TypeBar);
        Handler::handle_key(&mut state, key(KeyCode::BackTab));
        assert_eq!(state.current_focus(), Focus::Results);
    }

    #[test]
    fn type_bar_arrows_switch_entity_and_keep_bar_focused() {
        let (mut state, _rx) = test_state();
        state.set_focus(Focus::TypeBar);
        Handler::handle_key(&mut state, key(KeyCode::Right));
        assert_eq!(state.picker().active(), EntityType::Ministry);
        assert_eq!(state.current_focus(), Focus::TypeBar);

        Handler::handle_key(&mut state, key(KeyCode::Enter));
        assert_eq!(state.current_focus(), Focus::Search);
    }

    #[test]
    fn digits_jump_to_entity_type() {
        let (mut state, _rx) = test_state();
        state.set_focus(Focus::TypeBar);
        Handler::handle_key(&mut state, key(KeyCode::Char('3')));
        assert_eq!(state.picker().active(), EntityType::Region);
        assert_eq!(state.current_focus(), Focus::Search);
    }

    #[test]
    fn enter_in_results_selects_row() {
        let (mut state, _rx) = test_state();
        state.add_query_char('a');
        state.add_query_char('z');
        state.apply_search_page(EntityType::Organization, hits(2), false, false);
        state.set_focus(Focus::Results);

        Handler::handle_key(&mut state, key(KeyCode::Down));
        Handler::handle_key(&mut state, key(KeyCode::Enter));
        assert_eq!(state.picker().pending_field_value(), "2");
    }

    #[test]
    fn submit_key_without_selection_sets_notice() {
        let (mut state, rx) = test_state();
        state.set_focus(Focus::Results);
        Handler::handle_key(&mut state, key(KeyCode::Char('s')));
        assert!(state.get_notice().is_some());
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn escape_in_search_clears_query_and_results() {
        let (mut state, _rx) = test_state();
        state.add_query_char('a');
        state.add_query_char('z');
        state.apply_search_page(EntityType::Organization, hits(1), false, false);

        Handler::handle_key(&mut state, key(KeyCode::Esc));
        assert_eq!(state.picker().active_state().query(), "");
        assert!(state.picker().active_state().hits().is_empty());
    }

    #[test]
    fn popup_swallows_keys_while_open() {
        let (mut state, rx) = test_state();
        state.toggle_notifications();
        let _ = rx.try_recv();

        Handler::handle_key(&mut state, key(KeyCode::Char('x')));
        assert_eq!(state.picker().active_state().query(), "");

        Handler::handle_key(&mut state, key(KeyCode::Char('r')));
        assert!(matches!(
            rx.try_recv(),
            Ok(crate::events::network::Event::MarkAllRead)
        ));

        Handler::handle_key(&mut state, key(KeyCode::Esc));
        assert!(!state.is_notifications_open());
    }

    #[test]
    fn welcome_keys_feed_session_input() {
        let (tx, _rx) = std_mpsc::channel();
        let (save_tx, _save_rx) = std_mpsc::channel();
        let mut state = State::new(
            tx,
            save_tx,
            Duration::from_millis(300),
            2,
            false,
            crate::ui::Theme::default(),
        );

        Handler::handle_key(&mut state, key(KeyCode::Char('a')));
        Handler::handle_key(&mut state, key(KeyCode::Char('b')));
        Handler::handle_key(&mut state, key(KeyCode::Backspace));
        assert_eq!(state.get_session_input(), "a");
    }
}
