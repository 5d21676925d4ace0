//! HTTP client for registry API requests.
//!
//! Low-level wrapper around `reqwest` that carries the session cookie and
//! CSRF token, builds query strings, and parses JSON responses.

use super::error::ApiError;
use log::*;
use regex::Regex;
use serde::de::DeserializeOwned;

/// Name of the session cookie issued by the registry backend.
const SESSION_COOKIE_NAME: &str = "session";

/// Header carrying the CSRF token on JSON POSTs, as the backend expects it.
const CSRF_HEADER: &str = "X-CSRFToken";

/// Makes requests to the registry backend and conforms response bodies to
/// the given wire model.
///
pub struct Client {
    base_url: String,
    session_cookie: Option<String>,
    csrf_token: Option<String>,
    http_client: reqwest::Client,
}

impl Client {
    /// Returns a new instance for the given base URL and optional session
    /// cookie value.
    ///
    /// # Panics
    /// Panics if the HTTP client cannot be created. This should never happen
    /// in practice as `reqwest::Client::builder().build()` only fails on
    /// invalid configuration, which we don't use.
    pub fn new(base_url: &str, session_cookie: Option<&str>) -> Self {
        Client {
            base_url: base_url.trim_end_matches('/').to_owned(),
            session_cookie: session_cookie.map(str::to_owned),
            csrf_token: None,
            http_client: reqwest::Client::builder()
                .build()
                .expect("Failed to create HTTP client - this should never happen"),
        }
    }

    /// Replaces the session cookie carried on subsequent requests.
    ///
    pub fn set_session_cookie(&mut self, cookie: &str) {
        self.session_cookie = Some(cookie.to_owned());
    }

    /// Returns the stored CSRF token, if a bootstrap has run.
    ///
    pub fn csrf_token(&self) -> Option<&str> {
        self.csrf_token.as_deref()
    }

    /// Fetch the server-rendered base page and extract the CSRF token from
    /// its `<meta name="csrf-token">` tag. The token is stored on the client
    /// and attached to every subsequent POST.
    ///
    pub async fn fetch_csrf_token(&mut self) -> Result<String, ApiError> {
        debug!("Requesting base page for CSRF token...");
        let response = self.request(reqwest::Method::GET, "/").send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::Status {
                status: status.as_u16(),
                body: response.text().await.unwrap_or_default(),
            });
        }
        let page = response.text().await?;

        // Attribute order differs between templates, try both.
        let patterns = [
            r#"<meta\s+name="csrf-token"\s+content="([^"]+)""#,
            r#"<meta\s+content="([^"]+)"\s+name="csrf-token""#,
        ];
        for pattern in patterns {
            let re = match Regex::new(pattern) {
                Ok(r) => r,
                Err(e) => {
                    warn!("Failed to compile regex pattern '{}': {}", pattern, e);
                    continue;
                }
            };
            if let Some(caps) = re.captures(&page) {
                if let Some(token) = caps.get(1) {
                    let token = token.as_str().to_owned();
                    self.csrf_token = Some(token.clone());
                    return Ok(token);
                }
            }
        }
        Err(ApiError::CsrfTokenMissing)
    }

    /// Issue a GET and conform the JSON body to the given model.
    ///
    pub async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, String)],
    ) -> Result<T, ApiError> {
        let response = self
            .request(reqwest::Method::GET, path)
            .query(params)
            .send()
            .await?;
        Self::conform(response).await
    }

    /// Issue a JSON POST with the CSRF header and conform the response body
    /// to the given model.
    ///
    pub async fn post_json<T: DeserializeOwned>(
        &self,
        path: &str,
        body: serde_json::Value,
    ) -> Result<T, ApiError> {
        let mut request = self.request(reqwest::Method::POST, path).json(&body);
        if let Some(token) = &self.csrf_token {
            request = request.header(CSRF_HEADER, token);
        }
        Self::conform(request.send().await?).await
    }

    /// Issue a form-encoded POST, the way a browser submits a server-rendered
    /// form. The caller includes `csrf_token` among the fields; redirects are
    /// followed, so a successful submission resolves to the landing page.
    ///
    pub async fn post_form(&self, path: &str, fields: &[(&str, String)]) -> Result<(), ApiError> {
        let response = self
            .request(reqwest::Method::POST, path)
            .form(fields)
            .send()
            .await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::Status {
                status: status.as_u16(),
                body: response.text().await.unwrap_or_default(),
            });
        }
        Ok(())
    }

    /// Build a request for the given path with the session cookie attached.
    ///
    fn request(&self, method: reqwest::Method, path: &str) -> reqwest::RequestBuilder {
        let url = format!("{}{}", self.base_url, path);
        let mut request = self.http_client.request(method, &url);
        if let Some(cookie) = &self.session_cookie {
            request = request.header(
                reqwest::header::COOKIE,
                format!("{}={}", SESSION_COOKIE_NAME, cookie),
            );
        }
        request
    }

    /// Check the response status and parse the JSON body. An HTML body in
    /// place of JSON means the login redirect was followed, so the session
    /// is gone.
    ///
    async fn conform<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ApiError> {
        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            error!("API request failed with status {}: {}", status, body);
            return Err(ApiError::Status {
                status: status.as_u16(),
                body,
            });
        }
        match serde_json::from_str::<T>(&body) {
            Ok(model) => Ok(model),
            Err(e) => {
                if body.trim_start().starts_with('<') {
                    warn!("Expected JSON but received an HTML page, session is likely expired");
                    Err(ApiError::SessionExpired)
                } else {
                    error!("Failed to deserialize API response: {}. Body: {}", e, body);
                    Err(ApiError::Deserialization(e))
                }
            }
        }
    }
}
