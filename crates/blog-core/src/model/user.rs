//! User model.

use crate::Patch;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A registered blog user.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Patch)]
pub struct User {
    /// Store-assigned identifier.
    #[patch(skip)]
    pub id: Uuid,

    pub first_name: String,

    pub last_name: String,

    pub email: String,

    /// Unique handle.
    pub username: String,

    /// Credential as handed over by the API layer.
    pub hashed_password: String,

    pub birth_date: NaiveDate,

    /// Creation timestamp (ISO 8601 UTC).
    #[patch(skip)]
    pub created_at: DateTime<Utc>,

    /// Last update timestamp (ISO 8601 UTC).
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Create a user with the two required fields set.
    #[must_use]
    pub fn new(username: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            email: email.into(),
            ..Self::default()
        }
    }

    /// Set first and last name.
    #[must_use]
    pub fn with_name(mut self, first: impl Into<String>, last: impl Into<String>) -> Self {
        self.first_name = first.into();
        self.last_name = last.into();
        self
    }

    /// Set the birth date.
    #[must_use]
    pub fn with_birth_date(mut self, birth_date: NaiveDate) -> Self {
        self.birth_date = birth_date;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PatchError;
    use crate::patch::{Patch as _, patch_struct};
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;

    fn stored() -> User {
        let created = Utc.with_ymd_and_hms(2006, 1, 2, 0, 0, 0).unwrap();
        User {
            id: Uuid::parse_str("0853f607-2422-4631-8526-832edaa479c4").unwrap(),
            first_name: "Alice".to_string(),
            last_name: "Smith".to_string(),
            email: "alice@example.com".to_string(),
            username: "alice_s".to_string(),
            hashed_password: "hashed_pwd_1".to_string(),
            birth_date: NaiveDate::from_ymd_opt(1990, 4, 12).unwrap(),
            created_at: created,
            updated_at: created,
        }
    }

    #[test]
    fn test_patch_only_supplied_fields() {
        let mut user = stored();
        let update = User {
            email: "alice@new.example.com".to_string(),
            last_name: "Jones".to_string(),
            ..User::default()
        };

        user.patch(&update);

        let mut want = stored();
        want.email = "alice@new.example.com".to_string();
        want.last_name = "Jones".to_string();
        assert_eq!(user, want);
    }

    #[test]
    fn test_patch_never_touches_identity() {
        let mut user = stored();
        let update = User {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
            ..User::default()
        };

        user.patch(&update);

        assert_eq!(user, stored());
    }

    #[test]
    fn test_dynamic_patch() {
        let mut user = stored();
        let update = User {
            username: "alice_j".to_string(),
            ..User::default()
        };
        patch_struct(&mut user, &update).unwrap();
        assert_eq!(user.username, "alice_j");

        let post = crate::model::Post::new("Hello", user.id);
        let err = patch_struct(&mut user, &post).unwrap_err();
        assert!(matches!(err, PatchError::TypeMismatch { .. }));
        assert_eq!(user.username, "alice_j");
    }

    #[test]
    fn test_builder() {
        let user = User::new("bob", "bob@example.com")
            .with_name("Bob", "Stone")
            .with_birth_date(NaiveDate::from_ymd_opt(1985, 7, 1).unwrap());

        assert_eq!(user.username, "bob");
        assert_eq!(user.first_name, "Bob");
        assert_eq!(user.last_name, "Stone");
        assert!(user.id.is_nil());
    }

    #[test]
    fn test_serialization() {
        let json = serde_json::to_string(&stored()).unwrap();

        assert!(json.contains(r#""username":"alice_s""#));
        assert!(json.contains(r#""birth_date":"1990-04-12""#));
    }
}
