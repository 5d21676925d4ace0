mod client;
mod error;
mod models;
mod resource;

pub use error::ApiError;
pub use resource::*;

use client::Client;
use log::*;
use models::{
    MessageEnvelope, MinistriesEnvelope, NotificationModel, OrganizationsEnvelope, RegionsEnvelope,
};

/// Responsible for asynchronous interaction with the registry backend,
/// including transformation of response data into explicitly-defined types.
///
pub struct Registry {
    client: Client,
    submit_path: String,
}

impl Registry {
    /// Returns a new instance for the given base URL, optional session
    /// cookie, and entity form submit path.
    ///
    pub fn new(base_url: &str, session_cookie: Option<&str>, submit_path: &str) -> Registry {
        debug!("Initializing registry client for {}...", base_url);
        Registry {
            client: Client::new(base_url, session_cookie),
            submit_path: submit_path.to_owned(),
        }
    }

    /// Replaces the session cookie carried on subsequent requests.
    ///
    pub fn set_session_cookie(&mut self, cookie: &str) {
        self.client.set_session_cookie(cookie);
    }

    /// Prepare the session: fetch the base page and extract the CSRF token
    /// required for any POST. Fails when the session cookie is invalid.
    ///
    pub async fn bootstrap(&mut self) -> Result<(), ApiError> {
        debug!("Bootstrapping registry session...");
        self.client.fetch_csrf_token().await?;
        Ok(())
    }

    /// Returns one page of search results for the given entity collection,
    /// plus the server's "has more pages" flag.
    ///
    pub async fn search(
        &mut self,
        entity: EntityType,
        query: &str,
        page: u32,
    ) -> Result<(Vec<EntityHit>, bool), ApiError> {
        debug!(
            "Requesting {} page {} for query {:?}...",
            entity.tag(),
            page,
            query
        );
        let params = [("q", query.to_owned()), ("page", page.to_string())];
        let path = entity.search_path();

        let (hits, has_next) = match entity {
            EntityType::Organization => {
                let envelope: OrganizationsEnvelope = self.client.get(path, &params).await?;
                let hits = envelope
                    .organizations
                    .into_iter()
                    .map(|o| EntityHit {
                        id: o.id,
                        name: o.name,
                        okpo: o.okpo,
                        ynp: o.ynp,
                        ministry: o.ministry,
                    })
                    .collect();
                (hits, envelope.has_next)
            }
            EntityType::Ministry => {
                let envelope: MinistriesEnvelope = self.client.get(path, &params).await?;
                (Self::named_hits(envelope.ministries), envelope.has_next)
            }
            EntityType::Region => {
                let envelope: RegionsEnvelope = self.client.get(path, &params).await?;
                (Self::named_hits(envelope.regions), envelope.has_next)
            }
        };

        debug!(
            "Received {} {} hits (has_next: {})",
            hits.len(),
            entity.tag(),
            has_next
        );
        Ok((hits, has_next))
    }

    /// Returns the account's notification feed, newest first as the server
    /// orders it.
    ///
    pub async fn notifications(&mut self) -> Result<Vec<Notification>, ApiError> {
        debug!("Requesting notification feed...");
        let entries: Vec<NotificationModel> = self.client.get("/api/notifications", &[]).await?;
        Ok(entries
            .into_iter()
            .map(|n| Notification {
                message: n.message,
                created_at: n.created_at,
                is_read: n.is_read,
            })
            .collect())
    }

    /// Marks every notification read. Returns the server's status message.
    ///
    pub async fn mark_all_read(&mut self) -> Result<String, ApiError> {
        debug!("Marking all notifications read...");
        let envelope: MessageEnvelope = self
            .client
            .post_json("/api/notifications/mark-all-read", serde_json::json!({}))
            .await?;
        Ok(envelope.message)
    }

    /// Submit the selected entity as a standard form POST: the id in the
    /// type-specific hidden field, the entity type tag, and the CSRF token.
    ///
    pub async fn submit_selection(&mut self, entity: EntityType, id: i64) -> Result<(), ApiError> {
        info!("Submitting {} selection {}...", entity.tag(), id);
        let csrf_token = self
            .client
            .csrf_token()
            .ok_or(ApiError::CsrfTokenMissing)?
            .to_owned();
        let fields = [
            ("entity_type", entity.tag().to_owned()),
            (entity.field_name(), id.to_string()),
            ("csrf_token", csrf_token),
        ];
        let submit_path = self.submit_path.clone();
        self.client.post_form(&submit_path, &fields).await
    }

    /// Map ministry/region rows into the unified hit shape.
    ///
    fn named_hits(rows: Vec<models::NamedModel>) -> Vec<EntityHit> {
        rows.into_iter()
            .map(|m| EntityHit {
                id: m.id,
                name: m.name,
                okpo: None,
                ynp: None,
                ministry: None,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fake::{Fake, Faker};
    use httpmock::MockServer;
    use serde_json::json;

    fn registry_for(server: &MockServer) -> Registry {
        Registry::new(&server.base_url(), Some("test-session"), "/profile/entity")
    }

    #[tokio::test]
    async fn search_organizations_success() -> Result<(), ApiError> {
        let hit: EntityHit = Faker.fake();

        let server = MockServer::start();
        let mock = server
            .mock_async(|when, then| {
                when.method("GET")
                    .path("/api/organizations")
                    .header("Cookie", "session=test-session")
                    .query_param("q", "azot")
                    .query_param("page", "2");
                then.status(200).json_body(json!({
                    "organizations": [
                        {
                            "id": hit.id,
                            "name": hit.name.clone(),
                            "okpo": hit.okpo.clone(),
                            "ynp": hit.ynp.clone(),
                            "ministry": hit.ministry.clone(),
                        }
                    ],
                    "page": 2,
                    "has_next": true,
                    "total_pages": 4,
                    "total_items": 31
                }));
            })
            .await;

        let mut registry = registry_for(&server);
        let (hits, has_next) = registry.search(EntityType::Organization, "azot", 2).await?;
        mock.assert_async().await;
        assert_eq!(hits, vec![hit]);
        assert!(has_next);
        Ok(())
    }

    #[tokio::test]
    async fn search_ministries_uses_server_key_spelling() -> Result<(), ApiError> {
        let server = MockServer::start();
        let mock = server
            .mock_async(|when, then| {
                when.method("GET")
                    .path("/api/ministries")
                    .query_param("q", "energy")
                    .query_param("page", "1");
                then.status(200).json_body(json!({
                    "ministrys": [{ "id": 5, "name": "Ministry of Energy" }],
                    "has_next": false
                }));
            })
            .await;

        let mut registry = registry_for(&server);
        let (hits, has_next) = registry.search(EntityType::Ministry, "energy", 1).await?;
        mock.assert_async().await;
        assert_eq!(hits[0].id, 5);
        assert_eq!(hits[0].name, "Ministry of Energy");
        assert!(hits[0].okpo.is_none());
        assert!(!has_next);
        Ok(())
    }

    #[tokio::test]
    async fn search_server_error_is_reported() {
        let server = MockServer::start();
        let mock = server
            .mock_async(|when, then| {
                when.method("GET").path("/api/regions");
                then.status(500)
                    .json_body(json!({"error": "Internal server error"}));
            })
            .await;

        let mut registry = registry_for(&server);
        let result = registry.search(EntityType::Region, "br", 1).await;
        mock.assert_async().await;
        assert!(matches!(result, Err(ApiError::Status { status: 500, .. })));
    }

    #[tokio::test]
    async fn search_html_body_means_session_expired() {
        let server = MockServer::start();
        server
            .mock_async(|when, then| {
                when.method("GET").path("/api/regions");
                then.status(200)
                    .header("Content-Type", "text/html")
                    .body("<!DOCTYPE html><html><body>Sign in</body></html>");
            })
            .await;

        let mut registry = registry_for(&server);
        let result = registry.search(EntityType::Region, "br", 1).await;
        assert!(matches!(result, Err(ApiError::SessionExpired)));
    }

    #[tokio::test]
    async fn notifications_success() -> Result<(), ApiError> {
        let server = MockServer::start();
        let mock = server
            .mock_async(|when, then| {
                when.method("GET").path("/api/notifications");
                then.status(200).json_body(json!([
                    {
                        "id": 1,
                        "message": "Plan approved",
                        "created_at": "2026-01-12 09:30:00",
                        "is_read": false
                    },
                    {
                        "id": 2,
                        "message": "Indicator deadline moved",
                        "created_at": "2026-01-10 14:00:00",
                        "is_read": true
                    }
                ]));
            })
            .await;

        let mut registry = registry_for(&server);
        let feed = registry.notifications().await?;
        mock.assert_async().await;
        assert_eq!(feed.len(), 2);
        assert!(!feed[0].is_read);
        assert_eq!(feed[1].message, "Indicator deadline moved");
        Ok(())
    }

    #[tokio::test]
    async fn mark_all_read_sends_csrf_header() -> Result<(), ApiError> {
        let server = MockServer::start();
        server
            .mock_async(|when, then| {
                when.method("GET").path("/");
                then.status(200).body(
                    r#"<html><head><meta name="csrf-token" content="tok-123"></head></html>"#,
                );
            })
            .await;
        let mock = server
            .mock_async(|when, then| {
                when.method("POST")
                    .path("/api/notifications/mark-all-read")
                    .header("X-CSRFToken", "tok-123")
                    .json_body(json!({}));
                then.status(200).json_body(json!({"message": "All read"}));
            })
            .await;

        let mut registry = registry_for(&server);
        registry.bootstrap().await?;
        let message = registry.mark_all_read().await?;
        mock.assert_async().await;
        assert_eq!(message, "All read");
        Ok(())
    }

    #[tokio::test]
    async fn submit_selection_posts_form_fields() -> Result<(), ApiError> {
        let server = MockServer::start();
        server
            .mock_async(|when, then| {
                when.method("GET").path("/");
                then.status(200).body(
                    r#"<html><head><meta content="tok-9" name="csrf-token"></head></html>"#,
                );
            })
            .await;
        let mock = server
            .mock_async(|when, then| {
                when.method("POST")
                    .path("/profile/entity")
                    .body_contains("entity_type=ministry")
                    .body_contains("ministry_id=42")
                    .body_contains("csrf_token=tok-9");
                then.status(200).body("ok");
            })
            .await;

        let mut registry = registry_for(&server);
        registry.bootstrap().await?;
        registry.submit_selection(EntityType::Ministry, 42).await?;
        mock.assert_async().await;
        Ok(())
    }

    #[tokio::test]
    async fn submit_without_bootstrap_is_rejected() {
        let server = MockServer::start();
        let mut registry = registry_for(&server);
        let result = registry.submit_selection(EntityType::Region, 1).await;
        assert!(matches!(result, Err(ApiError::CsrfTokenMissing)));
    }

    #[tokio::test]
    async fn bootstrap_without_token_in_page_fails() {
        let server = MockServer::start();
        server
            .mock_async(|when, then| {
                when.method("GET").path("/");
                then.status(200)
                    .body("<html><head></head><body></body></html>");
            })
            .await;

        let mut registry = registry_for(&server);
        let result = registry.bootstrap().await;
        assert!(matches!(result, Err(ApiError::CsrfTokenMissing)));
    }
}
