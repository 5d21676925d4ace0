//! Registry API-specific error types.

/// Errors that can occur while talking to the registry backend.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    HttpRequest(#[from] reqwest::Error),

    /// Server answered with a non-success status
    #[error("API error (status {status}): {body}")]
    Status { status: u16, body: String },

    /// Failed to deserialize API response
    #[error("Failed to deserialize API response: {0}")]
    Deserialization(#[from] serde_json::Error),

    /// The server answered with HTML where JSON was expected, which is what
    /// an expired session looks like behind the login redirect
    #[error("Session expired or not authenticated")]
    SessionExpired,

    /// The base page did not carry a csrf-token meta tag
    #[error("CSRF token not found in server page")]
    CsrfTokenMissing,

    /// Generic API error
    #[error("Registry API error: {0}")]
    #[allow(dead_code)]
    Other(String),
}
