use crate::api::{ApiError, EntityType, Registry};
use crate::state::State;
use anyhow::Result;
use log::*;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Specify different network event types.
///
#[derive(Debug, Clone)]
pub enum Event {
    Connect {
        session_cookie: Option<String>,
    },
    Search {
        entity: EntityType,
        query: String,
        page: u32,
        append: bool,
    },
    Notifications,
    MarkAllRead,
    Submit {
        entity: EntityType,
        id: i64,
    },
}

/// Specify struct for managing state with network events.
///
pub struct Handler<'a> {
    state: &'a Arc<Mutex<State>>,
    registry: &'a mut Registry,
}

impl<'a> Handler<'a> {
    /// Return new instance with reference to state.
    ///
    pub fn new(state: &'a Arc<Mutex<State>>, registry: &'a mut Registry) -> Self {
        Handler { state, registry }
    }

    /// Handle network events by type.
    ///
    pub async fn handle(&mut self, event: Event) -> Result<()> {
        debug!("Processing network event '{:?}'...", event);
        match event {
            Event::Connect { session_cookie } => self.connect(session_cookie).await?,
            Event::Search {
                entity,
                query,
                page,
                append,
            } => self.search(entity, query, page, append).await?,
            Event::Notifications => self.notifications().await?,
            Event::MarkAllRead => self.mark_all_read().await?,
            Event::Submit { entity, id } => self.submit(entity, id).await?,
        }
        Ok(())
    }

    /// Bootstrap the session: optionally install a fresh cookie, then fetch
    /// the CSRF token and the notification feed.
    ///
    async fn connect(&mut self, session_cookie: Option<String>) -> Result<()> {
        info!("Connecting to the registry backend...");
        if let Some(cookie) = session_cookie {
            self.registry.set_session_cookie(&cookie);
        }
        match self.registry.bootstrap().await {
            Ok(()) => {
                let mut state = self.state.lock().await;
                state.set_session_ready();
                drop(state);
                info!("Session ready.");
                self.notifications().await
            }
            Err(e) => {
                error!("Session bootstrap failed: {}", e);
                let mut state = self.state.lock().await;
                state.set_auth_error(e.to_string());
                Ok(())
            }
        }
    }

    /// Fetch one page of search results and fold it into the picker. Errors
    /// are folded in as inline state, never propagated past this boundary.
    ///
    async fn search(
        &mut self,
        entity: EntityType,
        query: String,
        page: u32,
        append: bool,
    ) -> Result<()> {
        match self.registry.search(entity, &query, page).await {
            Ok((hits, has_next)) => {
                info!(
                    "Received {} {} hits for {:?} (page {})",
                    hits.len(),
                    entity.tag(),
                    query,
                    page
                );
                let mut state = self.state.lock().await;
                state.apply_search_page(entity, hits, has_next, append);
            }
            Err(e) => {
                error!("Search for {} failed: {}", entity.tag(), e);
                let mut state = self.state.lock().await;
                state.apply_search_error(entity, Self::inline_message(&e), append);
            }
        }
        Ok(())
    }

    /// Refresh the notification feed.
    ///
    async fn notifications(&mut self) -> Result<()> {
        match self.registry.notifications().await {
            Ok(feed) => {
                info!("Received {} notifications.", feed.len());
                let mut state = self.state.lock().await;
                state.set_notifications(feed);
            }
            Err(e) => {
                error!("Failed to fetch notifications: {}", e);
                let mut state = self.state.lock().await;
                state.set_notice("Could not load notifications");
            }
        }
        Ok(())
    }

    /// Mark the whole feed read, then reload it so the badge catches up.
    ///
    async fn mark_all_read(&mut self) -> Result<()> {
        match self.registry.mark_all_read().await {
            Ok(message) => {
                info!("Server acknowledged mark-all-read: {}", message);
                self.notifications().await
            }
            Err(e) => {
                error!("Failed to mark notifications read: {}", e);
                let mut state = self.state.lock().await;
                state.set_notice("Could not mark notifications read");
                Ok(())
            }
        }
    }

    /// Submit the selected entity as a form POST.
    ///
    async fn submit(&mut self, entity: EntityType, id: i64) -> Result<()> {
        let result = self
            .registry
            .submit_selection(entity, id)
            .await
            .map_err(|e| e.to_string());
        if let Err(ref message) = result {
            error!("Submit of {} {} failed: {}", entity.tag(), id, message);
        } else {
            info!("Submitted {} {}.", entity.tag(), id);
        }
        let mut state = self.state.lock().await;
        state.submit_finished(result);
        Ok(())
    }

    /// Compress an API error into the short inline row text; the full error
    /// already went to the log.
    ///
    fn inline_message(error: &ApiError) -> String {
        match error {
            ApiError::SessionExpired => "Session expired, reconnect".to_string(),
            ApiError::Status { status, .. } => format!("Loading error (HTTP {})", status),
            _ => "Loading error".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::SearchPhase;
    use httpmock::MockServer;
    use serde_json::json;
    use std::time::Duration;

    fn shared_state() -> Arc<Mutex<State>> {
        let (tx, _rx) = std::sync::mpsc::channel();
        let (save_tx, _save_rx) = std::sync::mpsc::channel();
        Arc::new(Mutex::new(State::new(
            tx,
            save_tx,
            Duration::from_millis(300),
            2,
            true,
            crate::ui::Theme::default(),
        )))
    }

    #[tokio::test]
    async fn search_success_populates_picker() -> Result<()> {
        let server = MockServer::start();
        server
            .mock_async(|when, then| {
                when.method("GET").path("/api/regions");
                then.status(200).json_body(json!({
                    "regions": [{"id": 1, "name": "Brest region"}],
                    "has_next": false
                }));
            })
            .await;

        let state = shared_state();
        let mut registry = Registry::new(&server.base_url(), Some("s"), "/profile/entity");
        let mut handler = Handler::new(&state, &mut registry);
        handler
            .handle(Event::Search {
                entity: EntityType::Region,
                query: "br".to_string(),
                page: 1,
                append: false,
            })
            .await?;

        let state = state.lock().await;
        let record = state.picker().state(EntityType::Region);
        assert_eq!(record.phase(), SearchPhase::Populated);
        assert_eq!(record.hits().len(), 1);
        Ok(())
    }

    #[tokio::test]
    async fn search_failure_becomes_inline_error_not_a_crash() -> Result<()> {
        let server = MockServer::start();
        server
            .mock_async(|when, then| {
                when.method("GET").path("/api/organizations");
                then.status(500)
                    .json_body(json!({"error": "Internal server error"}));
            })
            .await;

        let state = shared_state();
        let mut registry = Registry::new(&server.base_url(), Some("s"), "/profile/entity");
        let mut handler = Handler::new(&state, &mut registry);
        let result = handler
            .handle(Event::Search {
                entity: EntityType::Organization,
                query: "az".to_string(),
                page: 1,
                append: false,
            })
            .await;
        assert!(result.is_ok());

        let state = state.lock().await;
        let record = state.picker().state(EntityType::Organization);
        assert_eq!(record.phase(), SearchPhase::Errored);
        assert_eq!(record.error(), Some("Loading error (HTTP 500)"));
        assert!(!state.picker().can_submit());
        Ok(())
    }

    #[tokio::test]
    async fn connect_failure_sets_auth_error() -> Result<()> {
        let server = MockServer::start();
        server
            .mock_async(|when, then| {
                when.method("GET").path("/");
                then.status(401).body("unauthorized");
            })
            .await;

        let state = shared_state();
        let mut registry = Registry::new(&server.base_url(), Some("bad"), "/profile/entity");
        let mut handler = Handler::new(&state, &mut registry);
        handler
            .handle(Event::Connect {
                session_cookie: None,
            })
            .await?;

        let state = state.lock().await;
        assert!(state.get_auth_error().is_some());
        assert!(!state.is_session_ready());
        Ok(())
    }

    #[tokio::test]
    async fn mark_all_read_reloads_the_feed() -> Result<()> {
        let server = MockServer::start();
        server
            .mock_async(|when, then| {
                when.method("GET").path("/");
                then.status(200)
                    .body(r#"<meta name="csrf-token" content="t">"#);
            })
            .await;
        server
            .mock_async(|when, then| {
                when.method("POST").path("/api/notifications/mark-all-read");
                then.status(200).json_body(json!({"message": "ok"}));
            })
            .await;
        let feed_mock = server
            .mock_async(|when, then| {
                when.method("GET").path("/api/notifications");
                then.status(200).json_body(json!([
                    {
                        "id": 1,
                        "message": "Plan approved",
                        "created_at": "2026-01-12 09:30:00",
                        "is_read": true
                    }
                ]));
            })
            .await;

        let state = shared_state();
        let mut registry = Registry::new(&server.base_url(), Some("s"), "/profile/entity");
        registry.bootstrap().await?;
        let mut handler = Handler::new(&state, &mut registry);
        handler.handle(Event::MarkAllRead).await?;

        feed_mock.assert_async().await;
        let state = state.lock().await;
        assert_eq!(state.get_notifications().len(), 1);
        assert_eq!(state.unread_count(), 0);
        Ok(())
    }
}
