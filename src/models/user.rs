use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A row from the remote `users` table.
///
/// The store matches `username` and `password` by plain column equality;
/// the password comes back exactly as stored. It is kept on the record so a
/// restored session round-trips byte-for-byte, but it is redacted from
/// Debug output so it never lands in logs.
#[derive(Clone, PartialEq, Serialize, Deserialize)]
pub struct UserRecord {
    pub id: String,
    pub username: String,
    pub password: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl std::fmt::Debug for UserRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UserRecord")
            .field("id", &self.id)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("created_at", &self.created_at)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_user_row() {
        let json = r#"{"id":"e3b0c442-98fc-4f21-b00b-9c1d3a6f0001","username":"admin","password":"secret","created_at":"2024-03-01T12:00:00Z"}"#;
        let user: UserRecord = serde_json::from_str(json).expect("valid user row");
        assert_eq!(user.username, "admin");
        assert_eq!(user.password, "secret");
    }

    #[test]
    fn test_debug_redacts_password() {
        let user = UserRecord {
            id: "1".to_string(),
            username: "admin".to_string(),
            password: "secret".to_string(),
            created_at: None,
        };
        let debug = format!("{:?}", user);
        assert!(!debug.contains("secret"));
        assert!(debug.contains("<redacted>"));
    }
}
