use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Access level attached to an identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Doctor,
    User,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Doctor => "doctor",
            Self::User => "user",
        }
    }

    /// Whether the role may read and export the prediction history.
    pub fn can_view_history(&self) -> bool {
        matches!(self, Self::Admin | Self::Doctor)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An authenticated user and the role the credential table grants them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub username: String,
    pub role: Role,
}

/// Per-request session context.
///
/// A session is either fully authenticated or fully anonymous; there is no
/// way to hold a username without its role or the reverse.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Session {
    #[default]
    Anonymous,
    Authenticated(Identity),
}

impl Session {
    /// Returns the identity when the session is authenticated.
    pub fn identity(&self) -> Option<&Identity> {
        match self {
            Self::Anonymous => None,
            Self::Authenticated(identity) => Some(identity),
        }
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self, Self::Authenticated(_))
    }
}

/// A session as held by the session store.
#[derive(Debug, Clone)]
pub struct StoredSession {
    /// The identity this session belongs to.
    pub identity: Identity,
    /// The timestamp when the session expires.
    pub expires_at: DateTime<Utc>,
}

impl StoredSession {
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now > self.expires_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_admin_and_doctor_see_history() {
        assert!(Role::Admin.can_view_history());
        assert!(Role::Doctor.can_view_history());
        assert!(!Role::User.can_view_history());
    }

    #[test]
    fn roles_deserialize_from_lowercase_names() {
        let role: Role = serde_json::from_str(r#""doctor""#).unwrap();
        assert_eq!(role, Role::Doctor);
        assert!(serde_json::from_str::<Role>(r#""Admin""#).is_err());
    }

    #[test]
    fn anonymous_session_has_no_identity() {
        let session = Session::default();
        assert!(!session.is_authenticated());
        assert!(session.identity().is_none());
    }
}
