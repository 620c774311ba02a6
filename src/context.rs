//! Process-wide session context. Applications construct one [`AuthSession`]
//! at start-up, install it here, and views fetch it through [`current`].
//! Accessing the context before installation is a programming error surfaced
//! as an error value, never a silent default. Tests should construct their
//! own sessions directly instead of going through this module.

use std::sync::Arc;

use once_cell::sync::OnceCell;

use crate::client::ApiClient;
use crate::error::AuthError;
use crate::session::AuthSession;

/// The session type views consume in a running application.
pub type SharedSession = Arc<AuthSession<ApiClient>>;

static CONTEXT: OnceCell<SharedSession> = OnceCell::new();

/// Install the session for the lifetime of the process. Fails if a session
/// was already installed.
pub fn install(session: SharedSession) -> Result<(), AuthError> {
    CONTEXT
        .set(session)
        .map_err(|_| AuthError::context("session context already installed"))
}

/// Fetch the installed session. Fails loudly when no provider installed one.
pub fn current() -> Result<SharedSession, AuthError> {
    CONTEXT
        .get()
        .cloned()
        .ok_or_else(|| AuthError::context("session context accessed before installation"))
}
