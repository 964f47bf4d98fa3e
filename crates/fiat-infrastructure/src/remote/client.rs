//! HTTPS client for the hosted row API.

use fiat_core::session::{Session, SessionContext};
use fiat_core::{FiatError, Result};
use reqwest::{Client, Method, RequestBuilder, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;

use super::query::RowQuery;
use crate::config::BackendSettings;

/// Which credentials a request travels with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    /// Owned tables: requires a signed-in user, fails with `NotSignedIn` before any I/O.
    User,
    /// Globally readable tables: the user's token when present, else the project key.
    Public,
}

/// Authenticated access to `<url>/rest/v1/<table>`.
///
/// Cloning is cheap; clones share the connection pool and the session view.
#[derive(Clone)]
pub struct RemoteClient {
    http: Client,
    settings: BackendSettings,
    session: SessionContext,
}

impl RemoteClient {
    pub fn new(settings: BackendSettings, session: SessionContext) -> Result<Self> {
        let http = Client::builder()
            .timeout(settings.timeout)
            .build()
            .map_err(|e| FiatError::internal(format!("failed to build HTTP client: {e}")))?;
        Ok(Self {
            http,
            settings,
            session,
        })
    }

    pub fn settings(&self) -> &BackendSettings {
        &self.settings
    }

    pub fn session(&self) -> &SessionContext {
        &self.session
    }

    pub fn require_session(&self) -> Result<Session> {
        self.session.require_session()
    }

    pub async fn select<R: DeserializeOwned>(
        &self,
        table: &str,
        query: &RowQuery,
        access: Access,
    ) -> Result<Vec<R>> {
        let request = self.request(Method::GET, table, query, access)?;
        self.send(table, request).await
    }

    /// Inserts `body`. With an `on_conflict` target in `query`, rows that
    /// collide are merged instead (upsert).
    pub async fn insert<B, R>(
        &self,
        table: &str,
        body: &B,
        query: &RowQuery,
        access: Access,
    ) -> Result<Vec<R>>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let upsert = query.params().iter().any(|(k, _)| k == "on_conflict");
        let prefer = if upsert {
            "return=representation,resolution=merge-duplicates"
        } else {
            "return=representation"
        };
        let request = self
            .request(Method::POST, table, query, access)?
            .header("Prefer", prefer)
            .json(body);
        self.send(table, request).await
    }

    pub async fn update<B, R>(&self, table: &str, body: &B, query: &RowQuery) -> Result<Vec<R>>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let request = self
            .request(Method::PATCH, table, query, Access::User)?
            .header("Prefer", "return=representation")
            .json(body);
        self.send(table, request).await
    }

    /// Deletes matching rows and returns them, so callers can tell "nothing matched".
    pub async fn delete<R: DeserializeOwned>(&self, table: &str, query: &RowQuery) -> Result<Vec<R>> {
        let request = self
            .request(Method::DELETE, table, query, Access::User)?
            .header("Prefer", "return=representation");
        self.send(table, request).await
    }

    fn request(
        &self,
        method: Method,
        table: &str,
        query: &RowQuery,
        access: Access,
    ) -> Result<RequestBuilder> {
        let token = match access {
            Access::User => self.require_session()?.access_token,
            Access::Public => self
                .session
                .session()
                .map(|s| s.access_token)
                .unwrap_or_else(|| self.settings.anon_key.clone()),
        };
        let url = format!("{}/rest/v1/{}", self.settings.url, table);
        Ok(self
            .http
            .request(method, url)
            .query(query.params())
            .header("apikey", &self.settings.anon_key)
            .bearer_auth(token))
    }

    async fn send<R: DeserializeOwned>(&self, table: &str, request: RequestBuilder) -> Result<Vec<R>> {
        let response = request.send().await.map_err(transport_error)?;
        let status = response.status();
        tracing::debug!("{} -> {}", table, status);

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(status_error(status, &body));
        }
        if status == StatusCode::NO_CONTENT {
            return Ok(Vec::new());
        }

        let bytes = response.bytes().await.map_err(transport_error)?;
        if bytes.is_empty() {
            return Ok(Vec::new());
        }
        Ok(serde_json::from_slice(&bytes)?)
    }
}

pub(crate) fn transport_error(err: reqwest::Error) -> FiatError {
    if err.is_decode() {
        FiatError::Serialization {
            format: "JSON".to_string(),
            message: err.to_string(),
        }
    } else {
        FiatError::remote_unavailable(err.to_string())
    }
}

/// Best human-readable message in an error body.
pub(crate) fn error_message(body: &str) -> String {
    let parsed: Option<serde_json::Value> = serde_json::from_str(body).ok();
    parsed
        .as_ref()
        .and_then(|v| {
            ["message", "error_description", "msg", "error"]
                .iter()
                .find_map(|key| v.get(*key).and_then(|m| m.as_str()))
        })
        .map(str::to_string)
        .unwrap_or_else(|| body.trim().to_string())
}

/// Maps a failed response onto the error taxonomy.
pub(crate) fn status_error(status: StatusCode, body: &str) -> FiatError {
    let message = error_message(body);
    match status {
        StatusCode::UNAUTHORIZED => FiatError::NotSignedIn,
        StatusCode::REQUEST_TIMEOUT | StatusCode::TOO_MANY_REQUESTS => {
            FiatError::remote_unavailable(format!("{status}: {message}"))
        }
        s if s.is_server_error() => FiatError::remote_unavailable(format!("{status}: {message}")),
        s => FiatError::RemoteRejected {
            status: s.as_u16(),
            message,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fiat_core::session::AuthState;
    use std::time::Duration;

    fn client(state: AuthState) -> RemoteClient {
        let settings = BackendSettings {
            url: "http://127.0.0.1:9".to_string(),
            anon_key: "anon".to_string(),
            timeout: Duration::from_secs(1),
        };
        RemoteClient::new(settings, SessionContext::fixed(state)).unwrap()
    }

    #[test]
    fn test_status_mapping() {
        assert!(status_error(StatusCode::UNAUTHORIZED, "").is_not_signed_in());
        assert!(matches!(
            status_error(StatusCode::BAD_GATEWAY, ""),
            FiatError::RemoteUnavailable(_)
        ));
        match status_error(StatusCode::CONFLICT, r#"{"message":"duplicate key"}"#) {
            FiatError::RemoteRejected { status, message } => {
                assert_eq!(status, 409);
                assert_eq!(message, "duplicate key");
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_error_message_falls_back_to_body() {
        assert_eq!(error_message("plain failure\n"), "plain failure");
        assert_eq!(
            error_message(r#"{"error_description":"Invalid login credentials"}"#),
            "Invalid login credentials"
        );
    }

    #[tokio::test]
    async fn test_user_access_without_session_fails_before_io() {
        let client = client(AuthState::Unauthenticated);
        let err = client
            .select::<serde_json::Value>("moods", &RowQuery::new(), Access::User)
            .await
            .unwrap_err();
        assert!(err.is_not_signed_in());
    }

    #[tokio::test]
    async fn test_unreachable_backend_is_remote_unavailable() {
        let client = client(AuthState::Unauthenticated);
        let err = client
            .select::<serde_json::Value>("truth_board", &RowQuery::new(), Access::Public)
            .await
            .unwrap_err();
        assert!(matches!(err, FiatError::RemoteUnavailable(_)));
    }
}
