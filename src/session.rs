//! Authentication session state machine. One instance per process (see
//! [`crate::context`]); operations suspend only at transport calls and mutate
//! state only on explicit success paths, so a failed call always leaves the
//! session exactly where it was.
//!
//! Overlapping mutating calls (say a `logout` racing an in-flight `login`)
//! are not serialized here; the final state follows completion order and
//! callers own the ordering of their intents.

use parking_lot::RwLock;
use tracing::{debug, info, warn};

use crate::client::AuthApi;
use crate::error::AuthError;
use crate::identity::{AuthResponse, LoginData, RegisterData, User};

/// Tagged session state. Exactly one variant holds at any instant.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionState {
    /// Start-up only: a persisted token may still prove an identity.
    Restoring,
    Unauthenticated,
    /// Primary check passed; waiting on a one-time code for this account.
    PendingSecondFactor { user_id: String },
    Authenticated { user: User },
}

/// Read-only projection handed to consumers (views, the route guard).
#[derive(Debug, Clone, PartialEq)]
pub struct SessionSnapshot {
    pub user: Option<User>,
    pub is_authenticated: bool,
    /// True only while the start-up restoration has not finished.
    pub is_loading: bool,
}

pub struct AuthSession<A: AuthApi> {
    api: A,
    state: RwLock<SessionState>,
}

impl<A: AuthApi> AuthSession<A> {
    /// Fresh session in `Restoring`. Call [`AuthSession::restore`] once at
    /// start-up before consulting the session.
    pub fn new(api: A) -> Self {
        Self {
            api,
            state: RwLock::new(SessionState::Restoring),
        }
    }

    pub fn state(&self) -> SessionState {
        self.state.read().clone()
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        let state = self.state.read();
        SessionSnapshot {
            user: match &*state {
                SessionState::Authenticated { user } => Some(user.clone()),
                _ => None,
            },
            is_authenticated: matches!(&*state, SessionState::Authenticated { .. }),
            is_loading: matches!(&*state, SessionState::Restoring),
        }
    }

    /// Reconcile the persisted token with the server. Exits `Restoring` to
    /// exactly one of `Unauthenticated` or `Authenticated`; once exited it is
    /// never re-entered, and calling `restore` again is rejected.
    pub async fn restore(&self) -> Result<(), AuthError> {
        if *self.state.read() != SessionState::Restoring {
            return Err(AuthError::context("restore may only run once, at start-up"));
        }
        if !self.api.has_token()? {
            debug!(target: "lampus::session", "no stored token, starting unauthenticated");
            *self.state.write() = SessionState::Unauthenticated;
            return Ok(());
        }
        match self.api.current_user().await {
            Ok(user) => {
                info!(target: "lampus::session", user = %user.username, "session restored");
                *self.state.write() = SessionState::Authenticated { user };
            }
            Err(e) => {
                // Any failure here, including a rejected token, ends the
                // stored session rather than surfacing an error at start-up.
                warn!(target: "lampus::session", kind = e.kind(), "restore failed, discarding token");
                self.api.logout()?;
                *self.state.write() = SessionState::Unauthenticated;
            }
        }
        Ok(())
    }

    /// Delegate to the transport and advance state only on success. A
    /// second-factor challenge parks the session in `PendingSecondFactor`
    /// without touching the authentication flag.
    pub async fn login(&self, data: &LoginData) -> Result<AuthResponse, AuthError> {
        let resp = self.api.login(data).await?;
        if resp.require_otp {
            let user_id = resp.user_id.clone().ok_or_else(|| {
                AuthError::decode("second-factor challenge without a pending user id")
            })?;
            info!(target: "lampus::session", "second factor required");
            *self.state.write() = SessionState::PendingSecondFactor { user_id };
        } else {
            let user = resp
                .user
                .clone()
                .ok_or_else(|| AuthError::decode("login succeeded without a user payload"))?;
            info!(target: "lampus::session", user = %user.username, "logged in");
            *self.state.write() = SessionState::Authenticated { user };
        }
        Ok(resp)
    }

    /// Close a pending second-factor challenge. On failure the session stays
    /// in `PendingSecondFactor` and the error propagates.
    pub async fn verify_otp(&self, code: &str, user_id: &str) -> Result<AuthResponse, AuthError> {
        let resp = self.api.verify_login_otp(code, user_id).await?;
        let user = resp
            .user
            .clone()
            .ok_or_else(|| AuthError::decode("verification succeeded without a user payload"))?;
        info!(target: "lampus::session", user = %user.username, "second factor verified");
        *self.state.write() = SessionState::Authenticated { user };
        Ok(resp)
    }

    /// Authentication-neutral: session state is untouched whatever the
    /// outcome, and any stored token is dropped afterward so registration can
    /// never carry a session over.
    pub async fn register(&self, data: &RegisterData) -> Result<AuthResponse, AuthError> {
        let out = self.api.register(data).await;
        self.api.logout()?;
        out
    }

    /// Synchronous and local: drops the token and clears the identity, from
    /// any state.
    pub fn logout(&self) -> Result<(), AuthError> {
        self.api.logout()?;
        *self.state.write() = SessionState::Unauthenticated;
        info!(target: "lampus::session", "logged out");
        Ok(())
    }

    /// Replace the held identity with an already-normalized one, e.g. after a
    /// profile update. Explicitly rejected outside `Authenticated`.
    pub fn update_user(&self, user: User) -> Result<(), AuthError> {
        let mut state = self.state.write();
        match &*state {
            SessionState::Authenticated { .. } => {
                *state = SessionState::Authenticated { user };
                Ok(())
            }
            _ => Err(AuthError::context(
                "cannot update identity outside an authenticated session",
            )),
        }
    }
}
