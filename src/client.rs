//! HTTP transport for the remote auth/user service. This is the only module
//! that performs network calls and the only one that touches the persisted
//! token. Every response embedding a user document is normalized here,
//! exactly once; downstream code never sees the storage `_id`.

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;

use crate::config::ApiConfig;
use crate::error::AuthError;
use crate::identity::{
    AuthResponse, AuthResponseDoc, LoginData, OtpSetup, RegisterData, ServerMessage, User,
    UserDoc, UserKind,
};
use crate::token::TokenStore;

/// Remote operations the session store depends on. [`ApiClient`] is the real
/// implementation; tests substitute scripted doubles.
#[async_trait]
pub trait AuthApi: Send + Sync {
    /// Never persists a token, regardless of the response shape.
    async fn register(&self, data: &RegisterData) -> Result<AuthResponse, AuthError>;
    /// Persists the token before returning on a direct success; a
    /// second-factor challenge persists nothing.
    async fn login(&self, data: &LoginData) -> Result<AuthResponse, AuthError>;
    /// On success behaves like a direct login success.
    async fn verify_login_otp(&self, code: &str, user_id: &str)
        -> Result<AuthResponse, AuthError>;
    /// "Who am I" call; requires a stored token the server still accepts.
    async fn current_user(&self) -> Result<User, AuthError>;
    /// Whether a bearer token is currently persisted.
    fn has_token(&self) -> Result<bool, AuthError>;
    /// Local only: drop the persisted token. No server round trip.
    fn logout(&self) -> Result<(), AuthError>;
}

#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    config: ApiConfig,
    tokens: Arc<dyn TokenStore>,
}

impl ApiClient {
    pub fn new(config: ApiConfig, tokens: Arc<dyn TokenStore>) -> Result<Self, AuthError> {
        let http = reqwest::Client::builder().build()?;
        Ok(Self { http, config, tokens })
    }

    /// Build a request with the stored bearer token attached, when present.
    fn request(&self, method: Method, path: &str) -> Result<reqwest::RequestBuilder, AuthError> {
        let url = self.config.endpoint(path)?;
        let mut req = self.http.request(method, url);
        if let Some(token) = self.tokens.load()? {
            req = req.bearer_auth(token);
        }
        Ok(req)
    }

    /// Single round trip, no retries. Non-success statuses are classified
    /// into the error taxonomy with the server's `message` when it sends one.
    async fn execute(
        &self,
        req: reqwest::RequestBuilder,
        credential_check: bool,
    ) -> Result<reqwest::Response, AuthError> {
        let resp = req.send().await?;
        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }
        let message = read_error_message(resp).await;
        Err(AuthError::from_status(status.as_u16(), message, credential_check))
    }

    async fn decode<T: DeserializeOwned>(resp: reqwest::Response) -> Result<T, AuthError> {
        resp.json::<T>().await.map_err(AuthError::from)
    }

    async fn auth_call(
        &self,
        path: &str,
        body: &Value,
        credential_check: bool,
    ) -> Result<AuthResponse, AuthError> {
        let resp = self
            .execute(self.request(Method::POST, path)?.json(body), credential_check)
            .await?;
        Self::decode::<AuthResponseDoc>(resp).await?.normalize()
    }

    fn users_from_list(kind: UserKind, body: Value) -> Result<Vec<User>, AuthError> {
        let docs = body.get(kind.collection()).cloned().ok_or_else(|| {
            AuthError::decode(format!("missing `{}` in list response", kind.collection()))
        })?;
        let docs: Vec<UserDoc> = serde_json::from_value(docs)?;
        docs.into_iter().map(UserDoc::into_user).collect()
    }

    // ---- OTP management (enrolment, not login) ----

    pub async fn setup_otp(&self) -> Result<OtpSetup, AuthError> {
        let resp = self
            .execute(self.request(Method::POST, "auth/setup-otp")?, false)
            .await?;
        Self::decode(resp).await
    }

    pub async fn enable_otp(&self, code: &str) -> Result<ServerMessage, AuthError> {
        let body = serde_json::json!({ "token": code });
        let resp = self
            .execute(self.request(Method::POST, "auth/verify-otp")?.json(&body), false)
            .await?;
        Self::decode(resp).await
    }

    pub async fn disable_otp(&self, code: &str) -> Result<ServerMessage, AuthError> {
        let body = serde_json::json!({ "token": code });
        let resp = self
            .execute(self.request(Method::POST, "auth/disable-otp")?.json(&body), false)
            .await?;
        Self::decode(resp).await
    }

    // ---- User CRUD passthroughs ----

    pub async fn user_by_id(&self, kind: UserKind, id: &str) -> Result<User, AuthError> {
        let path = format!("users/{}/{}", kind.collection(), id);
        let resp = self.execute(self.request(Method::GET, &path)?, false).await?;
        Self::decode::<UserEnvelope>(resp).await?.user.into_user()
    }

    pub async fn list_users(&self, kind: UserKind) -> Result<Vec<User>, AuthError> {
        let path = format!("users/{}", kind.collection());
        let resp = self.execute(self.request(Method::GET, &path)?, false).await?;
        Self::users_from_list(kind, Self::decode(resp).await?)
    }

    /// Listing gated behind an extra OTP re-check on the server side.
    pub async fn list_users_with_otp(
        &self,
        kind: UserKind,
        code: &str,
    ) -> Result<Vec<User>, AuthError> {
        let path = format!("users/{}/verify-otp", kind.collection());
        let body = serde_json::json!({ "token": code });
        let resp = self
            .execute(self.request(Method::POST, &path)?.json(&body), false)
            .await?;
        Self::users_from_list(kind, Self::decode(resp).await?)
    }

    /// `fields` is a partial user object; only the provided keys change.
    pub async fn update_user(&self, id: &str, fields: &Value) -> Result<User, AuthError> {
        debug!(target: "lampus::client", id, "update user");
        let path = format!("users/{id}");
        let resp = self
            .execute(self.request(Method::PUT, &path)?.json(fields), false)
            .await?;
        Self::decode::<UserEnvelope>(resp).await?.user.into_user()
    }

    pub async fn delete_user(&self, id: &str) -> Result<(), AuthError> {
        debug!(target: "lampus::client", id, "delete user");
        let path = format!("users/{id}");
        self.execute(self.request(Method::DELETE, &path)?, false)
            .await?;
        Ok(())
    }
}

#[async_trait]
impl AuthApi for ApiClient {
    async fn register(&self, data: &RegisterData) -> Result<AuthResponse, AuthError> {
        debug!(target: "lampus::client", username = %data.username, "register");
        // Whatever the body carries, registration never stores a token. A
        // 401 here means the caller lacks authorization, not bad credentials,
        // so this is not a credential-check endpoint.
        self.auth_call("auth/register", &serde_json::to_value(data)?, false)
            .await
    }

    async fn login(&self, data: &LoginData) -> Result<AuthResponse, AuthError> {
        let out = self
            .auth_call("auth/login", &serde_json::to_value(data)?, true)
            .await?;
        if !out.require_otp {
            if let Some(token) = &out.token {
                self.tokens.save(token)?;
            }
        }
        debug!(target: "lampus::client", require_otp = out.require_otp, "login completed");
        Ok(out)
    }

    async fn verify_login_otp(
        &self,
        code: &str,
        user_id: &str,
    ) -> Result<AuthResponse, AuthError> {
        let body = serde_json::json!({ "token": code, "userId": user_id });
        let out = self.auth_call("auth/verify-login-otp", &body, true).await?;
        if let Some(token) = &out.token {
            self.tokens.save(token)?;
        }
        debug!(target: "lampus::client", "second factor verified");
        Ok(out)
    }

    async fn current_user(&self) -> Result<User, AuthError> {
        let resp = self
            .execute(self.request(Method::GET, "users/me")?, false)
            .await?;
        Self::decode::<UserEnvelope>(resp).await?.user.into_user()
    }

    fn has_token(&self) -> Result<bool, AuthError> {
        Ok(self.tokens.load()?.is_some())
    }

    fn logout(&self) -> Result<(), AuthError> {
        debug!(target: "lampus::client", "clearing stored token");
        self.tokens.clear()
    }
}

#[derive(serde::Deserialize)]
struct UserEnvelope {
    user: UserDoc,
}

async fn read_error_message(resp: reqwest::Response) -> String {
    let status = resp.status();
    match resp.json::<Value>().await {
        Ok(v) => v
            .get("message")
            .and_then(Value::as_str)
            .map(str::to_string)
            .unwrap_or_else(|| format!("HTTP {status}")),
        Err(_) => format!("HTTP {status}"),
    }
}
