// libs/shared/backend/src/client.rs
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Client, Method, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::RwLock;
use std::time::Duration;
use tracing::{debug, error, warn};

use shared_config::AppConfig;

#[derive(Debug, Clone)]
pub struct AuthTokens {
    pub access: String,
    pub refresh: String,
}

#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    #[error("network error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("api error ({status}): {body}")]
    Api { status: u16, body: String },
}

/// Thin JSON client for the booking REST backend.
///
/// Carries the user's token pair and transparently retries a request once
/// after refreshing an expired access token, the same way the original web
/// client's response interceptor did. A failed refresh clears both tokens.
pub struct BackendClient {
    client: Client,
    base_url: String,
    tokens: RwLock<Option<AuthTokens>>,
}

impl BackendClient {
    pub fn new(config: &AppConfig) -> Result<Self, BackendError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;

        Ok(Self {
            client,
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
            tokens: RwLock::new(None),
        })
    }

    pub fn set_tokens(&self, tokens: AuthTokens) {
        *self.tokens.write().expect("token lock poisoned") = Some(tokens);
    }

    pub fn clear_tokens(&self) {
        *self.tokens.write().expect("token lock poisoned") = None;
    }

    /// Best-effort local check: true when an access token is present and its
    /// `exp` claim lies in the future. The server remains the authority.
    pub fn is_authenticated(&self) -> bool {
        let guard = self.tokens.read().expect("token lock poisoned");
        let Some(tokens) = guard.as_ref() else {
            return false;
        };
        match jwt_expiry(&tokens.access) {
            Some(exp) => exp > chrono::Utc::now().timestamp(),
            None => false,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn headers(&self, access_token: Option<&str>) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        if let Some(token) = access_token {
            if let Ok(value) = HeaderValue::from_str(&format!("Bearer {}", token)) {
                headers.insert(AUTHORIZATION, value);
            }
        }

        headers
    }

    fn current_tokens(&self) -> Option<AuthTokens> {
        self.tokens.read().expect("token lock poisoned").clone()
    }

    pub async fn request<T>(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
    ) -> Result<T, BackendError>
    where
        T: DeserializeOwned,
    {
        let tokens = self.current_tokens();
        let access = tokens.as_ref().map(|t| t.access.clone());

        let response = self
            .send_once(method.clone(), path, body.clone(), access.as_deref())
            .await?;

        if response.status() != StatusCode::UNAUTHORIZED {
            return Self::decode(response).await;
        }

        // Expired access token: refresh once and replay the request.
        let Some(refresh) = tokens.map(|t| t.refresh) else {
            return Self::decode(response).await;
        };

        match self.refresh_access_token(&refresh).await {
            Ok(new_access) => {
                debug!("access token refreshed, replaying {}", path);
                let retried = self
                    .send_once(method, path, body, Some(new_access.as_str()))
                    .await?;
                Self::decode(retried).await
            }
            Err(refresh_err) => {
                warn!("token refresh failed, clearing session: {}", refresh_err);
                self.clear_tokens();
                Self::decode(response).await
            }
        }
    }

    async fn send_once(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
        access_token: Option<&str>,
    ) -> Result<reqwest::Response, BackendError> {
        let url = format!("{}{}", self.base_url, path);
        debug!("request {} {}", method, url);

        let mut req = self
            .client
            .request(method, &url)
            .headers(self.headers(access_token));

        if let Some(body_data) = body {
            req = req.json(&body_data);
        }

        Ok(req.send().await?)
    }

    async fn decode<T>(response: reqwest::Response) -> Result<T, BackendError>
    where
        T: DeserializeOwned,
    {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!("api error ({}): {}", status, body);
            return Err(BackendError::Api {
                status: status.as_u16(),
                body,
            });
        }

        Ok(response.json::<T>().await?)
    }

    async fn refresh_access_token(&self, refresh: &str) -> Result<String, BackendError> {
        let response = self
            .send_once(
                Method::POST,
                "/token/refresh/",
                Some(serde_json::json!({ "refresh": refresh })),
                None,
            )
            .await?;

        let payload: Value = Self::decode(response).await?;
        let access = payload
            .get("access")
            .and_then(Value::as_str)
            .ok_or_else(|| BackendError::Api {
                status: 200,
                body: "refresh response missing access token".to_string(),
            })?
            .to_string();

        if let Some(tokens) = self.tokens.write().expect("token lock poisoned").as_mut() {
            tokens.access = access.clone();
        }

        Ok(access)
    }
}

fn jwt_expiry(token: &str) -> Option<i64> {
    let payload = token.split('.').nth(1)?;
    let decoded = URL_SAFE_NO_PAD.decode(payload).ok()?;
    let claims: Value = serde_json::from_slice(&decoded).ok()?;
    claims.get("exp").and_then(Value::as_i64)
}
