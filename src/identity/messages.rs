use serde::{Deserialize, Serialize};

use crate::error::AuthError;

use super::user::{User, UserDoc, UserRole};

/// Credentials for `POST /auth/login`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginData {
    pub email: String,
    pub password: String,
}

/// Fields for `POST /auth/register`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterData {
    pub username: String,
    pub email: String,
    pub password: String,
    pub role: UserRole,
}

/// Raw body shared by the auth endpoints. `user` still carries the
/// persistence identifier; [`AuthResponseDoc::normalize`] rewrites it before
/// anything leaves the transport client.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct AuthResponseDoc {
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default)]
    pub user: Option<UserDoc>,
    #[serde(default, rename = "requireOTP")]
    pub require_otp: bool,
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

/// Normalized outcome of register/login/verify, handed to the session store
/// and its callers. Either `token` + `user` (direct success) or `require_otp`
/// with the pending `user_id` and neither of the former.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default)]
    pub user: Option<User>,
    #[serde(default, rename = "requireOTP")]
    pub require_otp: bool,
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

impl AuthResponseDoc {
    pub fn normalize(self) -> Result<AuthResponse, AuthError> {
        let user = match self.user {
            Some(doc) => Some(doc.into_user()?),
            None => None,
        };
        Ok(AuthResponse {
            token: self.token,
            user,
            require_otp: self.require_otp,
            user_id: self.user_id,
            message: self.message,
        })
    }
}

/// Response to `POST /auth/setup-otp`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OtpSetup {
    pub secret: String,
    pub qr_code: String,
}

/// Plain acknowledgement body used by the OTP enable/disable endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerMessage {
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn direct_success_body_normalizes_user() {
        let doc: AuthResponseDoc = serde_json::from_value(serde_json::json!({
            "token": "t1",
            "user": {"_id": "u1", "username": "a", "email": "a@x", "role": "admin"}
        }))
        .unwrap();
        let resp = doc.normalize().unwrap();
        assert_eq!(resp.token.as_deref(), Some("t1"));
        assert_eq!(resp.user.as_ref().unwrap().id, "u1");
        assert!(!resp.require_otp);
    }

    #[test]
    fn second_factor_body_carries_pending_user_id() {
        let doc: AuthResponseDoc = serde_json::from_value(serde_json::json!({
            "requireOTP": true,
            "userId": "u2",
            "message": "OTP required"
        }))
        .unwrap();
        let resp = doc.normalize().unwrap();
        assert!(resp.require_otp);
        assert_eq!(resp.user_id.as_deref(), Some("u2"));
        assert!(resp.token.is_none());
        assert!(resp.user.is_none());
    }

    #[test]
    fn otp_setup_uses_camel_case_wire_names() {
        let setup: OtpSetup =
            serde_json::from_value(serde_json::json!({"secret": "s", "qrCode": "data:img"}))
                .unwrap();
        assert_eq!(setup.qr_code, "data:img");
    }
}
