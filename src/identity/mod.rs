//! User identity types and wire messages for the auth/user endpoints.
//! Keep the public surface thin and split implementation across sub-modules.

mod messages;
mod user;

pub use messages::{AuthResponse, LoginData, OtpSetup, RegisterData, ServerMessage};
pub use user::{User, UserKind, UserRole};

pub(crate) use messages::AuthResponseDoc;
pub(crate) use user::UserDoc;
