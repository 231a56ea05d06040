//! HTTP API client shared by every service module.
//!
//! Attaches the persisted bearer token to each request, logs traffic, and
//! applies the session-expiry rule: a 401 on a GET clears the session and
//! sends the user to login, a 401 on any other method is only reported back
//! so an in-progress form is not torn down.

use std::rc::Rc;

use lms_admin_shared::ApiError;
use reqwest::{header, Client, Method, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::auth_session::SessionState;
use crate::config::AppConfig;
use crate::navigation::Navigator;

/// HTTP client bound to one configuration and one session.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    config: Rc<AppConfig>,
    session: Rc<SessionState>,
    navigator: Rc<dyn Navigator>,
}

impl ApiClient {
    pub fn new(config: Rc<AppConfig>, session: Rc<SessionState>, navigator: Rc<dyn Navigator>) -> Self {
        Self {
            client: build_client(&config),
            config,
            session,
            navigator,
        }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn session(&self) -> &Rc<SessionState> {
        &self.session
    }

    fn url(&self, path: &str) -> String {
        self.config.api_url(path)
    }

    fn request(&self, method: Method, url: &str) -> RequestBuilder {
        let mut rb = self
            .client
            .request(method, url)
            .header(header::CONTENT_TYPE, "application/json");

        if let Some(token) = self.session.tokens().get() {
            rb = rb.bearer_auth(token);
        }
        rb
    }

    /// Send, log, and apply the 401 rule. Returns the raw success body.
    async fn execute(&self, method: Method, url: &str, rb: RequestBuilder) -> Result<String, ApiError> {
        crate::log_debug!("API Request: {} {}", method, url);

        let resp = rb.send().await.map_err(|e| {
            crate::log_error!("Request Error: {} {}: {}", method, url, e);
            ApiError::Network(e.to_string())
        })?;

        let status = resp.status();
        let text = resp
            .text()
            .await
            .map_err(|e| ApiError::Network(format!("failed to read body: {e}")))?;

        if !status.is_success() {
            let err = ApiError::Http {
                status: status.as_u16(),
                body: text,
            };
            crate::log_error!(
                "Response Error: {} {} {}: {}",
                status.as_u16(),
                method,
                url,
                err.user_message()
            );
            if status == StatusCode::UNAUTHORIZED {
                self.handle_unauthorized(&method);
            }
            return Err(err);
        }

        crate::log_debug!("API Response: {} {}", status.as_u16(), url);
        Ok(text)
    }

    fn handle_unauthorized(&self, method: &Method) {
        if *method == Method::GET {
            crate::log_error!("GET request unauthorized, clearing session and redirecting to login");
            self.session.expire();
            self.navigator.to_login();
        } else {
            crate::log_warn!("{method} request unauthorized, leaving it to the caller");
        }
    }

    fn decode<T: DeserializeOwned>(text: &str) -> Result<T, ApiError> {
        let text = if text.trim().is_empty() { "null" } else { text };
        serde_json::from_str(text).map_err(|e| ApiError::Deserialize(e.to_string()))
    }

    fn encode<B: Serialize + ?Sized>(body: &B) -> Result<Vec<u8>, ApiError> {
        serde_json::to_vec(body).map_err(|e| ApiError::Deserialize(e.to_string()))
    }

    /// GET a JSON resource.
    pub async fn get_json<TRes: DeserializeOwned>(&self, path: &str) -> Result<TRes, ApiError> {
        let url = self.url(path);
        let rb = self.request(Method::GET, &url);
        let text = self.execute(Method::GET, &url, rb).await?;
        Self::decode(&text)
    }

    /// GET with serialized query parameters (`None` fields are skipped).
    pub async fn get_json_with_query<TQuery: Serialize + ?Sized, TRes: DeserializeOwned>(
        &self,
        path: &str,
        query: &TQuery,
    ) -> Result<TRes, ApiError> {
        let url = self.url(path);
        let rb = self.request(Method::GET, &url).query(query);
        let text = self.execute(Method::GET, &url, rb).await?;
        Self::decode(&text)
    }

    /// POST a JSON body.
    pub async fn post_json<TReq: Serialize + ?Sized, TRes: DeserializeOwned>(
        &self,
        path: &str,
        body: &TReq,
    ) -> Result<TRes, ApiError> {
        self.send_body(Method::POST, path, body).await
    }

    /// POST with no body.
    pub async fn post_empty<TRes: DeserializeOwned>(&self, path: &str) -> Result<TRes, ApiError> {
        let url = self.url(path);
        let rb = self.request(Method::POST, &url);
        let text = self.execute(Method::POST, &url, rb).await?;
        Self::decode(&text)
    }

    /// POST an empty JSON object with query parameters.
    pub async fn post_with_query<TQuery: Serialize + ?Sized, TRes: DeserializeOwned>(
        &self,
        path: &str,
        query: &TQuery,
    ) -> Result<TRes, ApiError> {
        let url = self.url(path);
        let rb = self
            .request(Method::POST, &url)
            .query(query)
            .body("{}".to_string());
        let text = self.execute(Method::POST, &url, rb).await?;
        Self::decode(&text)
    }

    /// PUT a JSON body.
    pub async fn put_json<TReq: Serialize + ?Sized, TRes: DeserializeOwned>(
        &self,
        path: &str,
        body: &TReq,
    ) -> Result<TRes, ApiError> {
        self.send_body(Method::PUT, path, body).await
    }

    /// PATCH a JSON body.
    pub async fn patch_json<TReq: Serialize + ?Sized, TRes: DeserializeOwned>(
        &self,
        path: &str,
        body: &TReq,
    ) -> Result<TRes, ApiError> {
        self.send_body(Method::PATCH, path, body).await
    }

    /// DELETE a resource; any success body is ignored.
    pub async fn delete(&self, path: &str) -> Result<(), ApiError> {
        let url = self.url(path);
        let rb = self.request(Method::DELETE, &url);
        self.execute(Method::DELETE, &url, rb).await?;
        Ok(())
    }

    async fn send_body<TReq: Serialize + ?Sized, TRes: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: &TReq,
    ) -> Result<TRes, ApiError> {
        let url = self.url(path);
        let body_bytes = Self::encode(body)?;
        let rb = self.request(method.clone(), &url).body(body_bytes);
        let text = self.execute(method, &url, rb).await?;
        Self::decode(&text)
    }
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.config.api_base_url)
            .finish()
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn build_client(config: &AppConfig) -> Client {
    Client::builder()
        .timeout(config.timeout())
        .build()
        .unwrap_or_else(|e| {
            crate::log_warn!("falling back to default HTTP client: {e}");
            Client::new()
        })
}

// The browser fetch backend has no client-wide timeout.
#[cfg(target_arch = "wasm32")]
fn build_client(_config: &AppConfig) -> Client {
    Client::new()
}

/// Percent-encode one path segment (ids are user-supplied strings).
pub fn segment(raw: &str) -> String {
    urlencoding::encode(raw).into_owned()
}
