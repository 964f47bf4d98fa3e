//! Password auth against `<url>/auth/v1`.

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use fiat_core::session::{AuthProvider, AuthUser, Credentials, Session};
use fiat_core::{FiatError, Result};
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::client::{error_message, transport_error};
use crate::config::BackendSettings;
use crate::session_store::SessionFileStore;

#[derive(Debug, Deserialize)]
struct UserDto {
    id: String,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    user_metadata: Option<Value>,
}

impl From<UserDto> for AuthUser {
    fn from(user: UserDto) -> Self {
        let username = user
            .user_metadata
            .as_ref()
            .and_then(|m| m.get("username"))
            .and_then(Value::as_str)
            .map(str::to_string);
        AuthUser {
            id: user.id,
            email: user.email,
            username,
        }
    }
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    refresh_token: String,
    #[serde(default)]
    expires_in: Option<i64>,
    #[serde(default)]
    expires_at: Option<i64>,
    user: UserDto,
}

impl TokenResponse {
    fn into_session(self, now: DateTime<Utc>) -> Session {
        let expires_at = self
            .expires_at
            .and_then(|secs| DateTime::from_timestamp(secs, 0))
            .or_else(|| self.expires_in.map(|secs| now + Duration::seconds(secs)));
        Session {
            access_token: self.access_token,
            refresh_token: self.refresh_token,
            expires_at,
            user: self.user.into(),
        }
    }
}

#[derive(Serialize)]
struct PasswordGrant<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Serialize)]
struct SignUpRequest<'a> {
    email: &'a str,
    password: &'a str,
    data: SignUpMetadata<'a>,
}

#[derive(Serialize)]
struct SignUpMetadata<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    username: Option<&'a str>,
}

#[derive(Serialize)]
struct RefreshGrant<'a> {
    refresh_token: &'a str,
}

/// Talks to the auth endpoints and remembers the resulting session on disk.
pub struct AuthClient {
    http: Client,
    settings: BackendSettings,
    store: SessionFileStore,
}

impl AuthClient {
    pub fn new(settings: BackendSettings, store: SessionFileStore) -> Result<Self> {
        let http = Client::builder()
            .timeout(settings.timeout)
            .build()
            .map_err(|e| FiatError::internal(format!("failed to build HTTP client: {e}")))?;
        Ok(Self {
            http,
            settings,
            store,
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/auth/v1/{}", self.settings.url, path)
    }

    async fn post<B: Serialize>(&self, path: &str, body: &B, bearer: Option<&str>) -> Result<Value> {
        let mut request = self
            .http
            .post(self.endpoint(path))
            .header("apikey", &self.settings.anon_key)
            .json(body);
        if let Some(token) = bearer {
            request = request.bearer_auth(token);
        }

        let response = request.send().await.map_err(transport_error)?;
        let status = response.status();
        tracing::debug!("auth/{} -> {}", path.split('?').next().unwrap_or(path), status);

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(auth_error(status, &body));
        }
        if status == StatusCode::NO_CONTENT {
            return Ok(Value::Null);
        }
        let bytes = response.bytes().await.map_err(transport_error)?;
        if bytes.is_empty() {
            return Ok(Value::Null);
        }
        Ok(serde_json::from_slice(&bytes)?)
    }

    fn remember(&self, value: Value) -> Result<Session> {
        let token: TokenResponse = serde_json::from_value(value)?;
        let session = token.into_session(Utc::now());
        self.store.save(&session)?;
        Ok(session)
    }
}

/// Auth failures are about the request, not the caller's identity, so 401
/// here is a rejection ("invalid login credentials"), not `NotSignedIn`.
fn auth_error(status: StatusCode, body: &str) -> FiatError {
    let message = error_message(body);
    if status.is_server_error()
        || status == StatusCode::TOO_MANY_REQUESTS
        || status == StatusCode::REQUEST_TIMEOUT
    {
        FiatError::remote_unavailable(format!("{status}: {message}"))
    } else {
        FiatError::RemoteRejected {
            status: status.as_u16(),
            message,
        }
    }
}

#[async_trait]
impl AuthProvider for AuthClient {
    async fn current_session(&self) -> Result<Option<Session>> {
        self.store.load()
    }

    async fn sign_in_with_password(&self, credentials: &Credentials) -> Result<Session> {
        let body = PasswordGrant {
            email: &credentials.email,
            password: &credentials.password,
        };
        let value = self.post("token?grant_type=password", &body, None).await?;
        let session = self.remember(value)?;
        tracing::info!("Signed in as {}", session.user_id());
        Ok(session)
    }

    async fn sign_up(
        &self,
        credentials: &Credentials,
        username: Option<&str>,
    ) -> Result<Option<Session>> {
        let body = SignUpRequest {
            email: &credentials.email,
            password: &credentials.password,
            data: SignUpMetadata {
                username: username.map(str::trim).filter(|u| !u.is_empty()),
            },
        };
        let value = self.post("signup", &body, None).await?;

        // Without an access token the account awaits email confirmation.
        if value.get("access_token").is_none() {
            tracing::info!("Sign-up accepted, waiting for email confirmation");
            return Ok(None);
        }
        self.remember(value).map(Some)
    }

    async fn sign_out(&self, session: &Session) -> Result<()> {
        let result = self
            .post("logout", &serde_json::json!({}), Some(&session.access_token))
            .await;
        // Local credentials are dropped even when the server call fails.
        self.store.clear()?;
        if let Err(e) = result {
            tracing::warn!("Server-side sign-out failed, local session cleared: {}", e);
        }
        Ok(())
    }

    async fn refresh_session(&self, session: &Session) -> Result<Session> {
        let body = RefreshGrant {
            refresh_token: &session.refresh_token,
        };
        let value = self
            .post("token?grant_type=refresh_token", &body, None)
            .await?;
        let refreshed = self.remember(value)?;
        tracing::info!("Refreshed session for {}", refreshed.user_id());
        Ok(refreshed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_token_response_to_session() {
        let token: TokenResponse = serde_json::from_value(json!({
            "access_token": "a",
            "refresh_token": "r",
            "expires_in": 3600,
            "token_type": "bearer",
            "user": {
                "id": "u1",
                "email": "a@x.io",
                "user_metadata": {"username": "ana"}
            }
        }))
        .unwrap();
        let now = Utc::now();
        let session = token.into_session(now);
        assert_eq!(session.user.username.as_deref(), Some("ana"));
        assert_eq!(session.expires_at, Some(now + Duration::seconds(3600)));
    }

    #[test]
    fn test_absolute_expiry_wins() {
        let token: TokenResponse = serde_json::from_value(json!({
            "access_token": "a",
            "refresh_token": "r",
            "expires_in": 3600,
            "expires_at": 1_900_000_000,
            "user": {"id": "u1"}
        }))
        .unwrap();
        let session = token.into_session(Utc::now());
        assert_eq!(session.expires_at.map(|t| t.timestamp()), Some(1_900_000_000));
    }

    #[test]
    fn test_bad_credentials_are_rejected_not_signed_out() {
        let err = auth_error(
            StatusCode::BAD_REQUEST,
            r#"{"error":"invalid_grant","error_description":"Invalid login credentials"}"#,
        );
        assert!(err.to_string().contains("Invalid login credentials"));
        assert!(!err.is_not_signed_in());
    }
}
