use serde::{Deserialize, Serialize};

use crate::error::AuthError;

/// Application roles as stored by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Admin,
    Etudiant,
    Intervenant,
}

/// Non-admin user collections exposed under the `/users` routes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserKind {
    Etudiant,
    Intervenant,
}

impl UserKind {
    /// Collection name, used both as the URL segment and as the key wrapping
    /// list responses.
    pub fn collection(&self) -> &'static str {
        match self {
            UserKind::Etudiant => "etudiants",
            UserKind::Intervenant => "intervenants",
        }
    }
}

/// Persistence-layer user document as the backend returns it: the storage
/// identifier arrives under `_id`. This shape never leaves the transport
/// client; [`UserDoc::into_user`] collapses it into the public [`User`].
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct UserDoc {
    #[serde(rename = "_id", default)]
    pub raw_id: Option<String>,
    #[serde(default)]
    pub id: Option<String>,
    pub username: String,
    pub email: String,
    pub role: UserRole,
    /// Profile fields this crate does not interpret.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// Public user shape consumed by the rest of the application. Exactly one
/// identifier field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub username: String,
    pub email: String,
    pub role: UserRole,
    /// Opaque profile fields, passed through untouched.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl UserDoc {
    /// Collapse the storage identifier into the public `id`. A pre-populated
    /// `id` wins over `_id`; a document carrying neither is malformed.
    pub fn into_user(self) -> Result<User, AuthError> {
        let id = self
            .id
            .or(self.raw_id)
            .ok_or_else(|| AuthError::decode("user document has no identifier"))?;
        Ok(User {
            id,
            username: self.username,
            email: self.email,
            role: self.role,
            extra: self.extra,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(json: serde_json::Value) -> UserDoc {
        serde_json::from_value(json).expect("valid user doc")
    }

    #[test]
    fn storage_id_becomes_public_id() {
        let u = doc(serde_json::json!({
            "_id": "64a1", "username": "alice", "email": "a@lampus.fr", "role": "etudiant"
        }))
        .into_user()
        .unwrap();
        assert_eq!(u.id, "64a1");
        assert_eq!(u.role, UserRole::Etudiant);
    }

    #[test]
    fn existing_public_id_wins() {
        let u = doc(serde_json::json!({
            "_id": "raw", "id": "pub", "username": "b", "email": "b@x", "role": "admin"
        }))
        .into_user()
        .unwrap();
        assert_eq!(u.id, "pub");
    }

    #[test]
    fn document_without_any_identifier_is_rejected() {
        let err = doc(serde_json::json!({
            "username": "c", "email": "c@x", "role": "intervenant"
        }))
        .into_user()
        .unwrap_err();
        assert!(matches!(err, AuthError::Decode { .. }));
    }

    #[test]
    fn unknown_profile_fields_survive_normalization() {
        let u = doc(serde_json::json!({
            "_id": "1", "username": "d", "email": "d@x", "role": "etudiant",
            "promo": "2026", "otpEnabled": true
        }))
        .into_user()
        .unwrap();
        assert_eq!(u.extra.get("promo").and_then(|v| v.as_str()), Some("2026"));
        assert_eq!(u.extra.get("otpEnabled").and_then(|v| v.as_bool()), Some(true));
    }

    #[test]
    fn role_wire_values_are_lowercase() {
        assert_eq!(serde_json::to_string(&UserRole::Admin).unwrap(), "\"admin\"");
        assert_eq!(
            serde_json::from_str::<UserRole>("\"intervenant\"").unwrap(),
            UserRole::Intervenant
        );
    }
}
