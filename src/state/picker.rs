//! Entity picker state machine.
//!
//! One parametrized search-select unit shared by all entity types: a keyed
//! mapping from entity type to its search state, a single pending selection,
//! and debounce bookkeeping. The picker itself never performs I/O; it yields
//! `FetchPage` commands that the caller dispatches to the network thread.

use crate::api::{EntityHit, EntityType};
use std::collections::HashMap;
use std::time::{Duration, Instant};

/// Phase of one entity type's search lifecycle.
///
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SearchPhase {
    Idle,
    Searching,
    Populated,
    LoadingMore,
    Empty,
    Errored,
}

/// A fetch the caller should dispatch: one page of one entity collection.
///
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FetchPage {
    pub entity: EntityType,
    pub query: String,
    pub page: u32,
    pub append: bool,
}

/// The chosen remote entity, pending form submission.
///
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SelectedItem {
    pub id: i64,
    pub name: String,
}

/// Per-entity-type search state record.
///
#[derive(Debug)]
pub struct SearchState {
    query: String,
    page: u32,
    has_more: bool,
    loading: bool,
    phase: SearchPhase,
    deadline: Option<Instant>,
    hits: Vec<EntityHit>,
    cursor: usize,
    error: Option<String>,
}

impl Default for SearchState {
    fn default() -> SearchState {
        SearchState {
            query: String::new(),
            page: 1,
            has_more: false,
            loading: false,
            phase: SearchPhase::Idle,
            deadline: None,
            hits: vec![],
            cursor: 0,
            error: None,
        }
    }
}

impl SearchState {
    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn phase(&self) -> SearchPhase {
        self.phase
    }

    pub fn hits(&self) -> &[EntityHit] {
        &self.hits
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn has_more(&self) -> bool {
        self.has_more
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }
}

/// Houses the picker: active entity type, keyed per-type search states, and
/// the single pending selection.
///
pub struct Picker {
    active: EntityType,
    states: HashMap<EntityType, SearchState>,
    selected: Option<SelectedItem>,
    debounce: Duration,
    min_query_len: usize,
}

impl Picker {
    /// Returns a new instance with the given debounce interval and minimum
    /// query length.
    ///
    pub fn new(debounce: Duration, min_query_len: usize) -> Picker {
        let states = EntityType::ALL
            .into_iter()
            .map(|entity| (entity, SearchState::default()))
            .collect();
        Picker {
            active: EntityType::Organization,
            states,
            selected: None,
            debounce,
            min_query_len,
        }
    }

    /// Returns the active entity type.
    ///
    pub fn active(&self) -> EntityType {
        self.active
    }

    /// Returns the search state record for the given entity type.
    ///
    pub fn state(&self, entity: EntityType) -> &SearchState {
        &self.states[&entity]
    }

    /// Returns the search state record for the active entity type.
    ///
    pub fn active_state(&self) -> &SearchState {
        self.state(self.active)
    }

    /// Returns the pending selection, if any.
    ///
    pub fn selected(&self) -> Option<&SelectedItem> {
        self.selected.as_ref()
    }

    /// Returns the value the hidden form field would carry: the selected id
    /// or the empty string.
    ///
    pub fn pending_field_value(&self) -> String {
        self.selected
            .as_ref()
            .map(|s| s.id.to_string())
            .unwrap_or_default()
    }

    /// Whether a submit attempt would be allowed.
    ///
    pub fn can_submit(&self) -> bool {
        self.selected.is_some()
    }

    /// Returns the entity type and id to submit, if a selection exists.
    ///
    pub fn submit_payload(&self) -> Option<(EntityType, i64)> {
        self.selected.as_ref().map(|s| (self.active, s.id))
    }

    /// Append one character to the active query. Clears the prior selection,
    /// resets to page one, and re-arms the debounce deadline. Queries below
    /// the minimum length never fetch; they clear results and return to Idle.
    ///
    pub fn push_char(&mut self, c: char, now: Instant) {
        let mut query = self.active_state().query.to_owned();
        query.push(c);
        self.set_query(query, now);
    }

    /// Remove the last character of the active query, with the same reset
    /// semantics as `push_char`.
    ///
    pub fn backspace(&mut self, now: Instant) {
        let mut query = self.active_state().query.to_owned();
        query.pop();
        self.set_query(query, now);
    }

    /// Replace the active query wholesale. The raw text is kept for display;
    /// length gating and the dispatched query use the trimmed form, the way
    /// the search endpoints expect it.
    ///
    pub fn set_query(&mut self, query: String, now: Instant) {
        self.selected = None;
        let min_query_len = self.min_query_len;
        let debounce = self.debounce;
        let state = self.active_state_mut();
        state.query = query;
        state.page = 1;
        state.cursor = 0;
        state.error = None;
        if state.query.trim().chars().count() >= min_query_len {
            state.deadline = Some(now + debounce);
            state.phase = SearchPhase::Searching;
        } else {
            state.deadline = None;
            state.hits.clear();
            state.has_more = false;
            state.phase = SearchPhase::Idle;
        }
    }

    /// Clear the active query and results.
    ///
    pub fn clear_query(&mut self, now: Instant) {
        self.set_query(String::new(), now);
    }

    /// Fire the armed fetch once its deadline has passed. A deadline firing
    /// while a fetch is already in flight is suppressed, not queued; the
    /// in-flight response still lands (last response wins).
    ///
    pub fn poll(&mut self, now: Instant) -> Option<FetchPage> {
        let entity = self.active;
        let state = self.active_state_mut();
        let deadline = state.deadline?;
        if now < deadline {
            return None;
        }
        state.deadline = None;
        if state.loading {
            return None;
        }
        state.loading = true;
        state.phase = SearchPhase::Searching;
        Some(FetchPage {
            entity,
            query: state.query.trim().to_owned(),
            page: 1,
            append: false,
        })
    }

    /// Request the next page. No-op when no further pages are known, the
    /// query is gone, or a fetch is already in flight.
    ///
    pub fn load_more(&mut self) -> Option<FetchPage> {
        let entity = self.active;
        let min_query_len = self.min_query_len;
        let state = self.active_state_mut();
        if !state.has_more || state.loading || state.query.trim().chars().count() < min_query_len {
            return None;
        }
        state.page += 1;
        state.loading = true;
        state.phase = SearchPhase::LoadingMore;
        Some(FetchPage {
            entity,
            query: state.query.trim().to_owned(),
            page: state.page,
            append: true,
        })
    }

    /// Re-issue the current search from page one, e.g. after an error.
    ///
    pub fn retry(&mut self) -> Option<FetchPage> {
        let entity = self.active;
        let min_query_len = self.min_query_len;
        let state = self.active_state_mut();
        if state.loading || state.query.trim().chars().count() < min_query_len {
            return None;
        }
        state.page = 1;
        state.error = None;
        state.loading = true;
        state.phase = SearchPhase::Searching;
        Some(FetchPage {
            entity,
            query: state.query.trim().to_owned(),
            page: 1,
            append: false,
        })
    }

    /// Fold one fetched page into the given entity type's state.
    ///
    pub fn apply_page(
        &mut self,
        entity: EntityType,
        hits: Vec<EntityHit>,
        has_next: bool,
        append: bool,
    ) {
        let state = self.state_mut(entity);
        state.loading = false;
        state.has_more = has_next;
        state.error = None;
        if append {
            state.hits.extend(hits);
            state.phase = SearchPhase::Populated;
        } else {
            state.hits = hits;
            state.cursor = 0;
            state.phase = if state.hits.is_empty() {
                SearchPhase::Empty
            } else {
                SearchPhase::Populated
            };
        }
    }

    /// Fold a fetch failure into the given entity type's state. A failed
    /// append leaves the already-fetched rows untouched; a failed first page
    /// replaces them with an inline error row.
    ///
    pub fn apply_error(&mut self, entity: EntityType, message: String, append: bool) {
        let state = self.state_mut(entity);
        state.loading = false;
        state.error = Some(message);
        if append {
            // Roll back the speculative page bump so a later retry re-asks
            // for the page that failed.
            state.page = state.page.saturating_sub(1).max(1);
            state.phase = SearchPhase::Populated;
        } else {
            state.hits.clear();
            state.has_more = false;
            state.phase = SearchPhase::Errored;
        }
    }

    /// Move the results cursor down. Returns true when already on the last
    /// row, which callers use to chain into `load_more`.
    ///
    pub fn cursor_down(&mut self) -> bool {
        let state = self.active_state_mut();
        if state.hits.is_empty() {
            return false;
        }
        if state.cursor + 1 < state.hits.len() {
            state.cursor += 1;
            false
        } else {
            true
        }
    }

    /// Move the results cursor up.
    ///
    pub fn cursor_up(&mut self) {
        let state = self.active_state_mut();
        state.cursor = state.cursor.saturating_sub(1);
    }

    /// Mark the row under the cursor as the pending selection.
    ///
    pub fn select_cursor(&mut self) -> Option<&SelectedItem> {
        let (id, name) = {
            let state = &self.states[&self.active];
            let hit = state.hits.get(state.cursor)?;
            (hit.id, hit.name.clone())
        };
        self.selected = Some(SelectedItem { id, name });
        self.selected.as_ref()
    }

    /// Whether the given row id is the pending selection.
    ///
    pub fn is_selected(&self, id: i64) -> bool {
        self.selected.as_ref().map(|s| s.id) == Some(id)
    }

    /// Switch the active entity type. The previous type's record is reset
    /// wholesale and the pending selection is dropped, so the submit action
    /// disables until a new row is chosen.
    ///
    pub fn switch_entity(&mut self, entity: EntityType) {
        if entity == self.active {
            return;
        }
        let previous = self.active;
        self.states.insert(previous, SearchState::default());
        self.active = entity;
        self.selected = None;
    }

    fn active_state_mut(&mut self) -> &mut SearchState {
        let active = self.active;
        self.state_mut(active)
    }

    fn state_mut(&mut self, entity: EntityType) -> &mut SearchState {
        self.states
            .get_mut(&entity)
            .expect("picker state exists for every entity type")
    }
}
