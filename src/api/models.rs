//! Wire models for registry API responses.
//!
//! These mirror the JSON bodies the server actually sends; they are mapped
//! into the public resource types by the `Registry` facade.

use serde::Deserialize;

/// Organization row as returned by `/api/organizations`.
///
#[derive(Debug, Deserialize)]
pub struct OrganizationModel {
    pub id: i64,
    pub name: String,
    pub okpo: Option<String>,
    pub ynp: Option<String>,
    pub ministry: Option<String>,
}

/// Row shape shared by ministries and regions.
///
#[derive(Debug, Deserialize)]
pub struct NamedModel {
    pub id: i64,
    pub name: String,
}

/// Envelope for `/api/organizations`. Extra pagination fields (`page`,
/// `total_pages`, `total_items`) are ignored; `has_next` is the only
/// paging signal the client acts on.
///
#[derive(Debug, Deserialize)]
pub struct OrganizationsEnvelope {
    pub organizations: Vec<OrganizationModel>,
    pub has_next: bool,
}

/// Envelope for `/api/ministries`. The server spells the key `ministrys`.
///
#[derive(Debug, Deserialize)]
pub struct MinistriesEnvelope {
    #[serde(rename = "ministrys")]
    pub ministries: Vec<NamedModel>,
    pub has_next: bool,
}

/// Envelope for `/api/regions`.
///
#[derive(Debug, Deserialize)]
pub struct RegionsEnvelope {
    pub regions: Vec<NamedModel>,
    pub has_next: bool,
}

/// Notification entry as returned by `/api/notifications`.
///
#[derive(Debug, Deserialize)]
pub struct NotificationModel {
    pub message: String,
    pub created_at: String,
    pub is_read: bool,
}

/// Envelope carrying a human-readable status message.
///
#[derive(Debug, Deserialize)]
pub struct MessageEnvelope {
    pub message: String,
}
