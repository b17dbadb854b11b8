//! IAM authentication
//!
//! Exchanges an API key for a bearer token and caches it until shortly
//! before it expires.

use serde::Deserialize;
use tokio::sync::Mutex;

use crate::error::BackupRecoveryError;

const APIKEY_GRANT_TYPE: &str = "urn:ibm:params:oauth:grant-type:apikey";

/// Refresh this many seconds before the token expires
const REFRESH_MARGIN_SECS: i64 = 60;

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    /// Epoch seconds
    expiration: Option<i64>,
    expires_in: Option<i64>,
}

#[derive(Clone)]
struct CachedToken {
    access_token: String,
    expires_at: i64,
}

pub struct IamAuthenticator {
    http: reqwest::Client,
    api_key: String,
    iam_url: String,
    cached: Mutex<Option<CachedToken>>,
}

impl IamAuthenticator {
    pub fn new(http: reqwest::Client, api_key: String, iam_url: String) -> Self {
        Self {
            http,
            api_key,
            iam_url,
            cached: Mutex::new(None),
        }
    }

    /// Current bearer token, fetching a new one when needed
    pub async fn token(&self) -> Result<String, BackupRecoveryError> {
        let mut cached = self.cached.lock().await;
        let now = chrono::Utc::now().timestamp();

        if let Some(token) = cached.as_ref()
            && token.expires_at - REFRESH_MARGIN_SECS > now
        {
            return Ok(token.access_token.clone());
        }

        let fresh = self.request_token(now).await?;
        let access_token = fresh.access_token.clone();
        *cached = Some(fresh);
        Ok(access_token)
    }

    async fn request_token(&self, now: i64) -> Result<CachedToken, BackupRecoveryError> {
        let url = format!("{}/identity/token", self.iam_url);
        log::debug!("Requesting IAM token from {}", url);

        let response = self
            .http
            .post(&url)
            .header(reqwest::header::ACCEPT, "application/json")
            .form(&[("grant_type", APIKEY_GRANT_TYPE), ("apikey", &self.api_key)])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body: serde_json::Value = response.json().await.unwrap_or_default();
            let message = body
                .get("errorMessage")
                .or_else(|| body.get("message"))
                .and_then(|m| m.as_str())
                .unwrap_or("token request rejected")
                .to_string();
            return Err(BackupRecoveryError::Auth {
                message: format!("{} ({})", message, status.as_u16()),
            });
        }

        let token: TokenResponse =
            response
                .json()
                .await
                .map_err(|e| BackupRecoveryError::Auth {
                    message: format!("Failed to parse token response: {}", e),
                })?;

        let expires_at = token
            .expiration
            .or_else(|| token.expires_in.map(|secs| now + secs))
            .unwrap_or(now);

        Ok(CachedToken {
            access_token: token.access_token,
            expires_at,
        })
    }
}

impl std::fmt::Debug for IamAuthenticator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IamAuthenticator")
            .field("api_key", &"[REDACTED]")
            .field("iam_url", &self.iam_url)
            .finish()
    }
}
