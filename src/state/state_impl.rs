use crate::api::{EntityType, Notification};
use crate::app::{ConfigSaveSender, NetworkEventSender};
use crate::events::network::Event as NetworkEvent;
use crate::ui::SPINNER_FRAME_COUNT;
use log::*;
use ratatui::layout::Rect;
use std::time::{Duration, Instant};

use super::navigation::{Focus, View};
use super::picker::{FetchPage, Picker, SelectedItem};

/// How long a transient notice stays on screen.
const NOTICE_TTL: Duration = Duration::from_secs(3);

/// Cap on retained log lines.
const MAX_LOG_ENTRIES: usize = 500;

/// Houses data representative of application state.
///
pub struct State {
    net_sender: Option<NetworkEventSender>,
    config_save_sender: Option<ConfigSaveSender>,
    picker: Picker,
    notifications: Vec<Notification>,
    notifications_open: bool,
    view_stack: Vec<View>,
    current_focus: Focus,
    notice: Option<(String, Instant)>,
    spinner_index: usize,
    terminal_size: Rect,
    log_entries: Vec<String>,
    show_log: bool,
    has_session: bool,
    session_ready: bool,
    session_input: String,
    session_cookie: Option<String>,
    auth_error: Option<String>,
    submit_in_flight: bool,
    theme: crate::ui::Theme,
}

/// Defines default application state.
///
impl Default for State {
    fn default() -> State {
        State {
            net_sender: None,
            config_save_sender: None,
            picker: Picker::new(Duration::from_millis(300), 2),
            notifications: vec![],
            notifications_open: false,
            view_stack: vec![View::Welcome],
            current_focus: Focus::Search,
            notice: None,
            spinner_index: 0,
            terminal_size: Rect::default(),
            log_entries: vec![],
            show_log: false,
            has_session: false,
            session_ready: false,
            session_input: String::new(),
            session_cookie: None,
            auth_error: None,
            submit_in_flight: false,
            theme: crate::ui::Theme::default(),
        }
    }
}

impl State {
    pub fn new(
        net_sender: NetworkEventSender,
        config_save_sender: ConfigSaveSender,
        debounce: Duration,
        min_search_length: usize,
        has_session: bool,
        theme: crate::ui::Theme,
    ) -> Self {
        State {
            net_sender: Some(net_sender),
            config_save_sender: Some(config_save_sender),
            picker: Picker::new(debounce, min_search_length),
            has_session,
            theme,
            ..State::default()
        }
    }

    /// Get the current theme.
    ///
    pub fn get_theme(&self) -> &crate::ui::Theme {
        &self.theme
    }

    /// Returns the view on top of the stack.
    ///
    pub fn current_view(&self) -> &View {
        self.view_stack.last().unwrap_or(&View::Welcome)
    }

    /// Returns the focused picker panel.
    ///
    pub fn current_focus(&self) -> Focus {
        self.current_focus
    }

    /// Move focus to the next panel in tab order.
    ///
    pub fn focus_next(&mut self) -> &mut Self {
        self.current_focus = self.current_focus.next();
        self
    }

    /// Move focus to the previous panel in tab order.
    ///
    pub fn focus_prev(&mut self) -> &mut Self {
        self.current_focus = self.current_focus.prev();
        self
    }

    /// Set focus directly.
    ///
    pub fn set_focus(&mut self, focus: Focus) -> &mut Self {
        self.current_focus = focus;
        self
    }

    /// Advance time-driven bits: the spinner, notice expiry, and the picker's
    /// armed debounce deadline.
    ///
    pub fn on_tick(&mut self, now: Instant) {
        self.spinner_index = (self.spinner_index + 1) % SPINNER_FRAME_COUNT;
        if let Some((_, since)) = self.notice {
            if now.duration_since(since) >= NOTICE_TTL {
                self.notice = None;
            }
        }
        if let Some(fetch) = self.picker.poll(now) {
            self.dispatch_fetch(fetch);
        }
    }

    pub fn get_spinner_index(&self) -> usize {
        self.spinner_index
    }

    pub fn set_terminal_size(&mut self, size: Rect) -> &mut Self {
        self.terminal_size = size;
        self
    }

    pub fn get_terminal_size(&self) -> Rect {
        self.terminal_size
    }

    // --- picker -----------------------------------------------------------

    /// Read access for rendering.
    ///
    pub fn picker(&self) -> &Picker {
        &self.picker
    }

    /// Route one typed character into the active query.
    ///
    pub fn add_query_char(&mut self, c: char) -> &mut Self {
        self.picker.push_char(c, Instant::now());
        self
    }

    /// Remove the last character of the active query.
    ///
    pub fn backspace_query(&mut self) -> &mut Self {
        self.picker.backspace(Instant::now());
        self
    }

    /// Clear the active query and results.
    ///
    pub fn clear_query(&mut self) -> &mut Self {
        self.picker.clear_query(Instant::now());
        self
    }

    /// Move the results cursor down; on the last row, chain into load-more
    /// the way the source widget's button sits under the list.
    ///
    pub fn cursor_down(&mut self) -> &mut Self {
        if self.picker.cursor_down() {
            self.load_more();
        }
        self
    }

    pub fn cursor_up(&mut self) -> &mut Self {
        self.picker.cursor_up();
        self
    }

    /// Mark the row under the cursor as the pending selection.
    ///
    pub fn select_under_cursor(&mut self) -> &mut Self {
        let selected = self.picker.select_cursor().cloned();
        if let Some(SelectedItem { id, name }) = selected {
            info!(
                "Selected {} '{}' (id {})",
                self.picker.active().tag(),
                name,
                id
            );
        }
        self
    }

    /// Request the next page of the active search, if one is available and
    /// nothing is in flight.
    ///
    pub fn load_more(&mut self) -> &mut Self {
        match self.picker.load_more() {
            Some(fetch) => self.dispatch_fetch(fetch),
            None => debug!("Load more suppressed (no further pages or fetch in flight)"),
        }
        self
    }

    /// Re-issue the active search from page one.
    ///
    pub fn retry_search(&mut self) -> &mut Self {
        if let Some(fetch) = self.picker.retry() {
            self.dispatch_fetch(fetch);
        }
        self
    }

    /// Switch to the next/previous entity type. Per-type state resets and
    /// focus returns to the query input.
    ///
    pub fn change_entity_next(&mut self) -> &mut Self {
        let next = self.picker.active().next();
        self.change_entity(next)
    }

    pub fn change_entity_prev(&mut self) -> &mut Self {
        let prev = self.picker.active().prev();
        self.change_entity(prev)
    }

    pub fn change_entity(&mut self, entity: EntityType) -> &mut Self {
        self.picker.switch_entity(entity);
        self.current_focus = Focus::Search;
        self
    }

    /// Attempt to submit the pending selection. Without a selection this is
    /// blocked client-side with a transient notice; the server still
    /// revalidates on its side.
    ///
    pub fn submit_selection(&mut self) -> &mut Self {
        if self.submit_in_flight {
            debug!("Submit suppressed, one is already in flight");
            return self;
        }
        match self.picker.submit_payload() {
            Some((entity, id)) => {
                self.submit_in_flight = true;
                self.send_network_event(NetworkEvent::Submit { entity, id });
            }
            None => {
                warn!("Submit attempted without a selection");
                self.set_notice("Select an item from the list first");
            }
        }
        self
    }

    /// Fold the submit outcome back into state.
    ///
    pub fn submit_finished(&mut self, result: Result<(), String>) -> &mut Self {
        self.submit_in_flight = false;
        match result {
            Ok(()) => self.set_notice("Selection submitted"),
            Err(message) => self.set_notice(&format!("Submit failed: {}", message)),
        };
        self
    }

    pub fn is_submit_in_flight(&self) -> bool {
        self.submit_in_flight
    }

    /// Fold one fetched page into the picker.
    ///
    pub fn apply_search_page(
        &mut self,
        entity: EntityType,
        hits: Vec<crate::api::EntityHit>,
        has_next: bool,
        append: bool,
    ) -> &mut Self {
        self.picker.apply_page(entity, hits, has_next, append);
        self
    }

    /// Fold a fetch failure into the picker.
    ///
    pub fn apply_search_error(
        &mut self,
        entity: EntityType,
        message: String,
        append: bool,
    ) -> &mut Self {
        self.picker.apply_error(entity, message, append);
        self
    }

    // --- notifications ----------------------------------------------------

    pub fn get_notifications(&self) -> &[Notification] {
        &self.notifications
    }

    pub fn set_notifications(&mut self, notifications: Vec<Notification>) -> &mut Self {
        self.notifications = notifications;
        self
    }

    pub fn unread_count(&self) -> usize {
        self.notifications.iter().filter(|n| !n.is_read).count()
    }

    pub fn is_notifications_open(&self) -> bool {
        self.notifications_open
    }

    /// Toggle the notifications popup; opening refreshes the feed.
    ///
    pub fn toggle_notifications(&mut self) -> &mut Self {
        self.notifications_open = !self.notifications_open;
        if self.notifications_open {
            self.send_network_event(NetworkEvent::Notifications);
        }
        self
    }

    pub fn close_notifications(&mut self) -> &mut Self {
        self.notifications_open = false;
        self
    }

    /// Ask the server to mark the whole feed read.
    ///
    pub fn mark_all_notifications_read(&mut self) -> &mut Self {
        self.send_network_event(NetworkEvent::MarkAllRead);
        self
    }

    // --- session ----------------------------------------------------------

    pub fn has_session(&self) -> bool {
        self.has_session
    }

    pub fn is_session_ready(&self) -> bool {
        self.session_ready
    }

    /// Mark the session bootstrapped and enter the picker view.
    ///
    pub fn set_session_ready(&mut self) -> &mut Self {
        self.session_ready = true;
        self.has_session = true;
        self.auth_error = None;
        self.view_stack = vec![View::Picker];
        self.current_focus = Focus::Search;
        self
    }

    pub fn get_auth_error(&self) -> Option<&str> {
        self.auth_error.as_deref()
    }

    pub fn set_auth_error(&mut self, message: String) -> &mut Self {
        self.auth_error = Some(message);
        // The cookie proved invalid; onboarding collects a fresh one.
        self.has_session = false;
        self.session_ready = false;
        self.view_stack = vec![View::Welcome];
        self
    }

    pub fn clear_auth_error(&mut self) -> &mut Self {
        self.auth_error = None;
        self
    }

    pub fn get_session_input(&self) -> &str {
        &self.session_input
    }

    pub fn add_session_input_char(&mut self, c: char) -> &mut Self {
        self.session_input.push(c);
        self
    }

    pub fn backspace_session_input(&mut self) -> &mut Self {
        self.session_input.pop();
        self
    }

    /// Take the pasted session cookie, request a connect, and signal the
    /// config saver so the cookie survives restarts.
    ///
    pub fn submit_session_input(&mut self) -> &mut Self {
        let cookie = self.session_input.trim().to_owned();
        if cookie.is_empty() {
            self.set_notice("Paste a session cookie first");
            return self;
        }
        self.session_input.clear();
        self.has_session = true;
        self.session_cookie = Some(cookie.clone());
        self.send_network_event(NetworkEvent::Connect {
            session_cookie: Some(cookie),
        });
        if let Some(sender) = &self.config_save_sender {
            if let Err(e) = sender.send(()) {
                error!("Failed to signal config save: {}", e);
            }
        }
        self
    }

    /// The cookie the config saver persists across restarts.
    ///
    pub fn get_session_cookie(&self) -> Option<&str> {
        self.session_cookie.as_deref()
    }

    // --- notices ----------------------------------------------------------

    /// Show a transient notice in the footer.
    ///
    pub fn set_notice(&mut self, message: &str) -> &mut Self {
        self.notice = Some((message.to_owned(), Instant::now()));
        self
    }

    pub fn get_notice(&self) -> Option<&str> {
        self.notice.as_ref().map(|(message, _)| message.as_str())
    }

    // --- log --------------------------------------------------------------

    pub fn push_log_entry(&mut self, entry: String) -> &mut Self {
        self.log_entries.push(entry);
        let len = self.log_entries.len();
        if len > MAX_LOG_ENTRIES {
            self.log_entries.drain(..len - MAX_LOG_ENTRIES);
        }
        self
    }

    pub fn get_log_entries(&self) -> &[String] {
        &self.log_entries
    }

    pub fn is_log_open(&self) -> bool {
        self.show_log
    }

    pub fn toggle_log(&mut self) -> &mut Self {
        self.show_log = !self.show_log;
        self
    }

    // --- plumbing ---------------------------------------------------------

    fn dispatch_fetch(&mut self, fetch: FetchPage) {
        let FetchPage {
            entity,
            query,
            page,
            append,
        } = fetch;
        self.send_network_event(NetworkEvent::Search {
            entity,
            query,
            page,
            append,
        });
    }

    /// Hand an event to the network thread. A missing or closed channel is
    /// logged and otherwise ignored so the UI keeps running.
    ///
    fn send_network_event(&self, event: NetworkEvent) {
        match &self.net_sender {
            Some(sender) => {
                if let Err(e) = sender.send(event) {
                    error!("Failed to send network event: {}", e);
                }
            }
            None => warn!("Network channel not wired, dropping event {:?}", event),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::EntityHit;
    use std::sync::mpsc;

    fn state_with_channel() -> (State, mpsc::Receiver<NetworkEvent>) {
        let (tx, rx) = mpsc::channel();
        let (save_tx, _save_rx) = mpsc::channel();
        let state = State::new(
            tx,
            save_tx,
            Duration::from_millis(300),
            2,
            true,
            crate::ui::Theme::default(),
        );
        (state, rx)
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
    fn submit_without_selection_is_blocked_with_notice() {
        let (mut state, rx) = state_with_channel();
        state.submit_selection();
        assert!(state.get_notice().is_some());
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn submit_with_selection_sends_event() {
        let (mut state, rx) = state_with_channel();
        state.add_query_char('a');
        state.add_query_char('z');
        state.apply_search_page(EntityType::Organization, hits(1), false, false);
        state.select_under_cursor();
        state.submit_selection();

        match rx.try_recv() {
            Ok(NetworkEvent::Submit { entity, id }) => {
                assert_eq!(entity, EntityType::Organization);
                assert_eq!(id, 1);
            }
            other => panic!("expected Submit event, got {:?}", other),
        }
        assert!(state.is_submit_in_flight());

        // A second submit while one is in flight is suppressed.
        state.submit_selection();
        assert!(rx.try_recv().is_err());

        state.submit_finished(Ok(()));
        assert!(!state.is_submit_in_flight());
        assert_eq!(state.get_notice(), Some("Selection submitted"));
    }

    #[test]
    fn ticking_past_the_debounce_dispatches_one_search() {
        let (mut state, rx) = state_with_channel();
        for c in "azote".chars() {
            state.add_query_char(c);
        }
        state.on_tick(Instant::now() + Duration::from_millis(400));

        match rx.try_recv() {
            Ok(NetworkEvent::Search {
                entity,
                query,
                page,
                append,
            }) => {
                assert_eq!(entity, EntityType::Organization);
                assert_eq!(query, "azote");
                assert_eq!(page, 1);
                assert!(!append);
            }
            other => panic!("expected Search event, got {:?}", other),
        }
        state.on_tick(Instant::now() + Duration::from_secs(2));
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn load_more_without_next_page_sends_nothing() {
        let (mut state, rx) = state_with_channel();
        state.add_query_char('a');
        state.add_query_char('z');
        state.apply_search_page(EntityType::Organization, hits(2), false, false);
        state.load_more();
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn cursor_past_last_row_chains_into_load_more() {
        let (mut state, rx) = state_with_channel();
        state.add_query_char('a');
        state.add_query_char('z');
        state.apply_search_page(EntityType::Organization, hits(2), true, false);

        state.cursor_down();
        assert!(rx.try_recv().is_err());
        state.cursor_down();
        match rx.try_recv() {
            Ok(NetworkEvent::Search { page, append, .. }) => {
                assert_eq!(page, 2);
                assert!(append);
            }
            other => panic!("expected appending Search event, got {:?}", other),
        }
    }

    #[test]
    fn changing_entity_refocuses_search_and_disables_submit() {
        let (mut state, _rx) = state_with_channel();
        state.add_query_char('a');
        state.add_query_char('z');
        state.apply_search_page(EntityType::Organization, hits(1), false, false);
        state.select_under_cursor();
        state.set_focus(Focus::Results);

        state.change_entity_next();
        assert_eq!(state.picker().active(), EntityType::Ministry);
        assert_eq!(state.current_focus(), Focus::Search);
        assert!(!state.picker().can_submit());
    }

    #[test]
    fn opening_notifications_requests_the_feed() {
        let (mut state, rx) = state_with_channel();
        state.toggle_notifications();
        assert!(state.is_notifications_open());
        assert!(matches!(rx.try_recv(), Ok(NetworkEvent::Notifications)));

        state.toggle_notifications();
        assert!(!state.is_notifications_open());
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn unread_count_counts_unread_only() {
        let (mut state, _rx) = state_with_channel();
        state.set_notifications(vec![
            Notification {
                message: "a".into(),
                created_at: "2026-01-01 10:00:00".into(),
                is_read: false,
            },
            Notification {
                message: "b".into(),
                created_at: "2026-01-01 11:00:00".into(),
                is_read: true,
            },
        ]);
        assert_eq!(state.unread_count(), 1);
    }

    #[test]
    fn notice_expires_after_ttl() {
        let (mut state, _rx) = state_with_channel();
        state.set_notice("hello");
        assert_eq!(state.get_notice(), Some("hello"));
        state.on_tick(Instant::now() + Duration::from_secs(4));
        assert!(state.get_notice().is_none());
    }

    #[test]
    fn session_input_flow_sends_connect() {
        let (mut state, rx) = state_with_channel();
        for c in "cookie-value".chars() {
            state.add_session_input_char(c);
        }
        state.submit_session_input();
        match rx.try_recv() {
            Ok(NetworkEvent::Connect { session_cookie }) => {
                assert_eq!(session_cookie.as_deref(), Some("cookie-value"));
            }
            other => panic!("expected Connect event, got {:?}", other),
        }
        assert_eq!(state.get_session_input(), "");
    }

    #[test]
    fn empty_session_input_is_rejected() {
        let (mut state, rx) = state_with_channel();
        state.submit_session_input();
        assert!(state.get_notice().is_some());
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn session_ready_enters_picker_view() {
        let (mut state, _rx) = state_with_channel();
        assert_eq!(state.current_view(), &View::Welcome);
        state.set_session_ready();
        assert_eq!(state.current_view(), &View::Picker);
    }

    #[test]
    fn auth_error_returns_to_welcome() {
        let (mut state, _rx) = state_with_channel();
        state.set_session_ready();
        state.set_auth_error("Session expired or not authenticated".to_string());
        assert_eq!(state.current_view(), &View::Welcome);
        assert!(state.get_auth_error().is_some());
    }

    #[test]
    fn log_entries_are_capped() {
        let (mut state, _rx) = state_with_channel();
        for i in 0..(MAX_LOG_ENTRIES + 10) {
            state.push_log_entry(format!("entry {}", i));
        }
        assert_eq!(state.get_log_entries().len(), MAX_LOG_ENTRIES);
        assert!(state.get_log_entries()[0].contains("entry 10"));
    }
}
