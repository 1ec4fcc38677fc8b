//! The persisted session record and its identity projection.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Display name shown for signed-in users until the backend grows profiles.
pub const DEFAULT_DISPLAY_NAME: &str = "John Doe";

/// Placeholder avatar image.
pub const DEFAULT_AVATAR_URL: &str = "https://i.pravatar.cc/300";

/// The single persisted session of the client.
///
/// At most one session exists at a time; it is created on a successful
/// login, read on every authenticated request, and destroyed on logout or a
/// forced logout after an unrecoverable authorization failure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    /// Email the user signed in with.
    pub email: String,
    /// Role names granted to the user, when the directory knows any.
    pub roles: Option<Vec<String>>,
    /// Bearer token for the backend; absent until the first refresh.
    pub token: Option<String>,
    /// When this session was established.
    pub created_at: DateTime<Utc>,
}

impl Session {
    /// Create a session established now.
    pub fn new(email: impl Into<String>, roles: Option<Vec<String>>, token: Option<String>) -> Self {
        Self {
            email: email.into(),
            roles,
            token,
            created_at: Utc::now(),
        }
    }

    /// Project the session into the richer identity view shown in the UI.
    pub fn identity(&self) -> Identity {
        Identity {
            email: self.email.clone(),
            roles: self.roles.clone(),
            display_name: DEFAULT_DISPLAY_NAME.to_string(),
            avatar_url: DEFAULT_AVATAR_URL.to_string(),
        }
    }
}

/// What the UI knows about the signed-in user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Identity {
    /// Email the user signed in with.
    pub email: String,
    /// Role names granted to the user.
    pub roles: Option<Vec<String>>,
    /// Name rendered in the header bar.
    pub display_name: String,
    /// Avatar image URL.
    pub avatar_url: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_projects_session_fields() {
        let session = Session::new(
            "apip@mail.com",
            Some(vec!["admin".to_string()]),
            Some("tok".to_string()),
        );
        let identity = session.identity();

        assert_eq!(identity.email, "apip@mail.com");
        assert_eq!(identity.roles, Some(vec!["admin".to_string()]));
        assert_eq!(identity.display_name, DEFAULT_DISPLAY_NAME);
        assert_eq!(identity.avatar_url, DEFAULT_AVATAR_URL);
    }

    #[test]
    fn session_round_trips_through_json() {
        let session = Session::new("rania@mail.com", None, None);
        let encoded = serde_json::to_string(&session).expect("session serializes");
        let decoded: Session = serde_json::from_str(&encoded).expect("session deserializes");
        assert_eq!(decoded, session);
    }
}
